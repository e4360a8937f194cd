//! Build configuration module.
//!
//! Handles loading and validating `proofsheet.toml`. There is no mutable
//! global anywhere: the config is loaded once, validated, and threaded
//! explicitly through the pipeline.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output = "./result.pdf"   # Output document path
//! cards_dir = "cards"       # Card image directory (scanned recursively)
//!
//! [deck]
//! preset = "keyforge"       # keyforge (36 cards) or dragonball (54 cards)
//! # cards = 36              # Explicit card count (overrides preset)
//! interleave_backs = true   # One back page after every card page
//! pad_with_blanks = false   # Pad short decks with the blank image
//!
//! [render]
//! quality = 94              # JPEG page quality (1-100)
//! border_width = 30         # Page border in pixels
//! border_color = "white"    # ImageMagick color name or #rrggbb
//! crop_marks = false        # Crop-mark page variant
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # Only turn on crop marks
//! [render]
//! crop_marks = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::deck::CARDS_PER_PAGE;
use crate::render::{Quality, RenderOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `proofsheet.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProofConfig {
    /// Output document path.
    pub output: String,
    /// Card image directory, scanned recursively.
    pub cards_dir: String,
    /// Deck-size contract and interleaving.
    pub deck: DeckConfig,
    /// Page render settings.
    pub render: RenderConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for ProofConfig {
    fn default() -> Self {
        Self {
            output: "./result.pdf".to_string(),
            cards_dir: "cards".to_string(),
            deck: DeckConfig::default(),
            render: RenderConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl ProofConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cards = self.deck.card_count()?;
        if cards == 0 || cards % CARDS_PER_PAGE != 0 {
            return Err(ConfigError::Validation(format!(
                "deck.cards must be a positive multiple of {CARDS_PER_PAGE}, got {cards}"
            )));
        }
        if !(1..=100).contains(&self.render.quality) {
            return Err(ConfigError::Validation(format!(
                "render.quality must be 1-100, got {}",
                self.render.quality
            )));
        }
        if let Some(0) = self.processing.max_processes {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Deck-size contract: which game profile, and how filler pages interleave.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeckConfig {
    /// Named game profile; `cards` overrides it when set.
    pub preset: Option<String>,
    /// Explicit card count (before back insertion).
    pub cards: Option<usize>,
    /// Insert one back page after every card page.
    pub interleave_backs: bool,
    /// Pad a short card list with the store's blank image.
    pub pad_with_blanks: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            preset: Some("keyforge".to_string()),
            cards: None,
            interleave_backs: true,
            pad_with_blanks: false,
        }
    }
}

impl DeckConfig {
    /// Card entries a valid deck holds, before back insertion.
    pub fn card_count(&self) -> Result<usize, ConfigError> {
        if let Some(cards) = self.cards {
            return Ok(cards);
        }
        match self.preset.as_deref() {
            Some("keyforge") => Ok(36),
            Some("dragonball") => Ok(54),
            Some(other) => Err(ConfigError::Validation(format!(
                "unknown deck.preset `{other}` (expected keyforge or dragonball)"
            ))),
            None => Err(ConfigError::Validation(
                "set deck.preset or deck.cards".to_string(),
            )),
        }
    }
}

/// Page render settings; converted to [`RenderOptions`] for the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub quality: u32,
    pub border_width: u32,
    pub border_color: String,
    pub crop_marks: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: 94,
            border_width: 30,
            border_color: "white".to_string(),
            crop_marks: false,
        }
    }
}

impl RenderConfig {
    pub fn to_options(&self) -> RenderOptions {
        RenderOptions {
            quality: Quality::new(self.quality),
            border_width: self.border_width,
            border_color: self.border_color.clone(),
            crop_marks: self.crop_marks,
        }
    }
}

/// Parallel processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum parallel page renders. Omit for auto (CPU cores).
    pub max_processes: Option<usize>,
}

/// Effective worker count: caps at the number of available CPU cores — the
/// user can constrain down, not up.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match config.max_processes {
        Some(n) if n >= 1 => n.min(cores),
        _ => cores,
    }
}

/// Load configuration.
///
/// An explicit path must exist and parse. With no explicit path,
/// `./proofsheet.toml` is used when present, stock defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<ProofConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = Path::new("proofsheet.toml");
            if !default.exists() {
                let config = ProofConfig::default();
                config.validate()?;
                return Ok(config);
            }
            default.to_path_buf()
        }
    };
    let content = fs::read_to_string(&path)?;
    let config: ProofConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// A documented stock `proofsheet.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# proofsheet configuration
# All options are optional - defaults shown.

# Output document path.
output = "./result.pdf"

# Card image directory, scanned recursively. Filenames follow NNN-name.ext;
# `back.png` and `blank.png` are the shared back and the blank filler.
cards_dir = "cards"

[deck]
# Named game profile: keyforge (36 cards) or dragonball (54 cards).
preset = "keyforge"
# Or set the card count directly (must be a multiple of 9):
# cards = 36

# Insert one back page after every card page.
interleave_backs = true

# Pad a short card list with the blank image up to the profile size.
pad_with_blanks = false

[render]
# JPEG page quality (1-100).
quality = 94

# Border around each page, in pixels, and its color.
border_width = 30
border_color = "white"

# Render crop marks for physical cutting.
crop_marks = false

[processing]
# Max parallel page renders. Omit for auto (CPU cores).
# max_processes = 4
"##
}
