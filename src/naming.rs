//! Card image filename convention.
//!
//! Card images are stored as `NNN-name.ext` — a numeric prefix that is the
//! card's identifier, followed by an optional human-readable name. Double-sided
//! cards carry their reverse face in a sibling file whose name part ends in
//! `-back`:
//!
//! ```text
//! cards/
//! ├── 001-Leader.png          # front face of card 1
//! ├── 001-Leader-back.png     # reverse face of card 1
//! ├── 017-Anger-Charge.png
//! ├── 101.jpg                 # number-only filenames are fine
//! ├── back.png                # shared card back (interleaved pages)
//! └── blank.png               # blank filler (deck padding)
//! ```
//!
//! The `back` and `blank` stems are reserved: they never parse as cards and
//! are picked up by the store as shared special images.

/// Which face of a card an image file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Back,
}

/// Result of parsing a card image file stem like `001-Leader-back`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCardName {
    /// Card number from the `NNN` prefix, if present.
    pub number: Option<u32>,
    /// Name part after `NNN-`, with any `-back` face suffix stripped.
    pub name: String,
    /// Face this file holds.
    pub face: CardFace,
}

/// Parse a card image file stem following the `NNN-name[-back]` convention.
///
/// Handles these patterns:
/// - `"001-Leader"` → number=Some(1), name="Leader", front
/// - `"001-Leader-back"` → number=Some(1), name="Leader", back
/// - `"101"` → number=Some(101), name="", front
/// - `"017-back"` → number=Some(17), name="", back
/// - `"back"` / `"blank"` → number=None (reserved special stems)
pub fn parse_card_stem(stem: &str) -> ParsedCardName {
    let (stem, face) = match stem.strip_suffix("-back") {
        Some(rest) => (rest, CardFace::Back),
        None => (stem, CardFace::Front),
    };

    if let Some(dash_pos) = stem.find('-') {
        let prefix = &stem[..dash_pos];
        if let Ok(num) = prefix.parse::<u32>() {
            return ParsedCardName {
                number: Some(num),
                name: stem[dash_pos + 1..].to_string(),
                face,
            };
        }
    }
    if let Ok(num) = stem.parse::<u32>() {
        return ParsedCardName {
            number: Some(num),
            name: String::new(),
            face,
        };
    }
    ParsedCardName {
        number: None,
        name: stem.to_string(),
        face,
    }
}
