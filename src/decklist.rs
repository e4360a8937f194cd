//! Deck-export parsing and resolution.
//!
//! A deck list is a plain text export: one card per line, in deck order.
//! Lines carry an optional copy count and the card number, optionally
//! parenthesized the way deck-site exports write it:
//!
//! ```text
//! # 54-card Dragon Ball deck
//! leader (101)      # double-sided: expands to front + back face
//! 4 (17)            # four copies of card 17
//! 2 23              # parens are optional
//! 56                # bare number, one copy
//! ```
//!
//! Blank lines and `#` comments are ignored. Resolution against the
//! [`CardStore`] turns entries into the ordered image-path sequence the
//! layout pipeline consumes; a `leader` entry contributes both faces,
//! back-to-back, exactly where it sits in the list.

use crate::deck::DeckProfile;
use crate::store::{CardStore, StoreError};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("deck list line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("deck list has no entries")]
    Empty,
}

/// One deck-list line: a card number, how many copies, and whether the card
/// is double-sided (contributes its back face inline).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeckEntry {
    pub number: u32,
    pub copies: u32,
    pub double_sided: bool,
}

/// Read and parse a deck-list export file.
pub fn load_deck_list(path: &std::path::Path) -> Result<Vec<DeckEntry>, DeckListError> {
    let text = std::fs::read_to_string(path)?;
    parse_deck_list(&text)
}

/// Parse a deck-list export into ordered entries.
pub fn parse_deck_list(text: &str) -> Result<Vec<DeckEntry>, DeckListError> {
    let mut entries = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => raw[..pos].trim(),
            None => raw.trim(),
        };
        if line.is_empty() {
            continue;
        }
        let entry = parse_entry(line).map_err(|reason| DeckListError::Malformed {
            line: idx + 1,
            reason,
        })?;
        entries.push(entry);
    }
    if entries.is_empty() {
        return Err(DeckListError::Empty);
    }
    Ok(entries)
}

fn parse_entry(text: &str) -> Result<DeckEntry, String> {
    let (double_sided, rest) = match text.strip_prefix("leader") {
        Some(r) if r.is_empty() => (true, r),
        Some(r) if r.starts_with(char::is_whitespace) => (true, r.trim_start()),
        _ => (false, text),
    };

    let (count_part, number_part) = match (rest.find('('), rest.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            (rest[..open].trim(), rest[open + 1..close].trim())
        }
        (Some(_), _) | (_, Some(_)) => return Err("unbalanced parentheses".to_string()),
        _ => {
            let mut tokens = rest.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(only), None, _) => ("", only),
                (Some(count), Some(number), None) => (count, number),
                _ => return Err("expected `[count] number`".to_string()),
            }
        }
    };

    let copies = if count_part.is_empty() {
        1
    } else {
        count_part
            .parse::<u32>()
            .map_err(|_| format!("bad copy count `{count_part}`"))?
    };
    if copies == 0 {
        return Err("zero copies".to_string());
    }
    let number = number_part
        .parse::<u32>()
        .map_err(|_| format!("bad card number `{number_part}`"))?;

    Ok(DeckEntry {
        number,
        copies,
        double_sided,
    })
}

/// Entries the expansion will produce — double-sided cards count both faces.
pub fn expanded_len(entries: &[DeckEntry]) -> usize {
    entries
        .iter()
        .map(|e| e.copies as usize * if e.double_sided { 2 } else { 1 })
        .sum()
}

/// Resolve entries to the ordered image-path sequence, preserving deck order.
pub fn resolve(entries: &[DeckEntry], store: &CardStore) -> Result<Vec<PathBuf>, StoreError> {
    let mut images = Vec::with_capacity(expanded_len(entries));
    for entry in entries {
        if entry.double_sided {
            let (front, back) = store.resolve_pair(entry.number)?;
            for _ in 0..entry.copies {
                images.push(front.to_path_buf());
                images.push(back.to_path_buf());
            }
        } else {
            let front = store.resolve(entry.number)?;
            for _ in 0..entry.copies {
                images.push(front.to_path_buf());
            }
        }
    }
    Ok(images)
}

/// Everything the resolve stage knows about a deck — human-inspectable via
/// `check`, dumpable as a JSON manifest.
#[derive(Debug, Serialize)]
pub struct DeckManifest {
    /// Parsed deck-list entries, in deck order.
    pub entries: Vec<DeckEntry>,
    /// Resolved card images before back insertion.
    pub images: Vec<PathBuf>,
    /// Entries after back insertion; what tiling validates against.
    pub expected_total: usize,
    /// Pages the final document will hold.
    pub pages: usize,
}

impl DeckManifest {
    pub fn new(entries: Vec<DeckEntry>, images: Vec<PathBuf>, profile: &DeckProfile) -> Self {
        Self {
            entries,
            images,
            expected_total: profile.expected_total(),
            pages: profile.page_count(),
        }
    }
}
