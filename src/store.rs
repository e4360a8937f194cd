//! Card image store: maps card numbers to image files on disk.
//!
//! The store scans a cards directory once at startup and answers lookups from
//! memory. It does not download anything and does not manage a cache — the
//! directory is assumed to be populated (by hand, by a separate fetch tool,
//! whatever). Subdirectories are scanned too, so per-expansion layouts work:
//!
//! ```text
//! cards/
//! ├── back.png
//! ├── blank.png
//! └── Age of Ascension/
//!     ├── 001-Leader.png
//!     ├── 001-Leader-back.png
//!     └── 002-Mimicry.png
//! ```
//!
//! Filenames follow the [`naming`](crate::naming) convention; the reserved
//! `back` and `blank` stems become the shared back image (interleaved pages)
//! and the blank filler (deck padding).
//!
//! ## Validation
//!
//! The scanner enforces these rules:
//! - No duplicate card numbers across the tree (same face)
//! - Lookups of numbers the tree does not contain fail up front, before any
//!   rendering starts

use crate::naming::{parse_card_stem, CardFace};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extensions recognized as card images.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cards directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("duplicate card number {number}: {first} and {second}")]
    DuplicateCard {
        number: u32,
        first: String,
        second: String,
    },
    #[error("card {0} is not in the cards directory")]
    UnknownCard(u32),
    #[error("card {0} has no back face image")]
    MissingBackFace(u32),
    #[error("cards directory has no {0} image")]
    MissingSpecial(&'static str),
}

/// In-memory index of a cards directory.
#[derive(Debug, Default)]
pub struct CardStore {
    fronts: BTreeMap<u32, PathBuf>,
    backs: BTreeMap<u32, PathBuf>,
    back_image: Option<PathBuf>,
    blank_image: Option<PathBuf>,
}

impl CardStore {
    /// Walk `root` and index every recognized card image.
    pub fn scan(root: &Path) -> Result<Self, StoreError> {
        let mut store = Self::default();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !is_image {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            match stem {
                "back" => store.back_image = Some(path.to_path_buf()),
                "blank" => store.blank_image = Some(path.to_path_buf()),
                _ => store.index_card(stem, path)?,
            }
        }
        Ok(store)
    }

    fn index_card(&mut self, stem: &str, path: &Path) -> Result<(), StoreError> {
        let parsed = parse_card_stem(stem);
        let Some(number) = parsed.number else {
            // Unnumbered files (cover art, notes) are simply not cards.
            return Ok(());
        };
        let map = match parsed.face {
            CardFace::Front => &mut self.fronts,
            CardFace::Back => &mut self.backs,
        };
        if let Some(first) = map.get(&number) {
            return Err(StoreError::DuplicateCard {
                number,
                first: first.display().to_string(),
                second: path.display().to_string(),
            });
        }
        map.insert(number, path.to_path_buf());
        Ok(())
    }

    /// Front face of a card.
    pub fn resolve(&self, number: u32) -> Result<&Path, StoreError> {
        self.fronts
            .get(&number)
            .map(PathBuf::as_path)
            .ok_or(StoreError::UnknownCard(number))
    }

    /// Both faces of a double-sided card.
    pub fn resolve_pair(&self, number: u32) -> Result<(&Path, &Path), StoreError> {
        let front = self.resolve(number)?;
        let back = self
            .backs
            .get(&number)
            .map(PathBuf::as_path)
            .ok_or(StoreError::MissingBackFace(number))?;
        Ok((front, back))
    }

    /// Shared card back, required when a profile interleaves back pages.
    pub fn back_image(&self) -> Result<&Path, StoreError> {
        self.back_image
            .as_deref()
            .ok_or(StoreError::MissingSpecial("back"))
    }

    /// Blank filler, required when a deck pads with blanks.
    pub fn blank_image(&self) -> Result<&Path, StoreError> {
        self.blank_image
            .as_deref()
            .ok_or(StoreError::MissingSpecial("blank"))
    }

    /// Number of distinct card fronts indexed.
    pub fn len(&self) -> usize {
        self.fronts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fronts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn scan_indexes_numbered_images() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-Leader.png");
        touch(tmp.path(), "002-Mimicry.jpg");
        touch(tmp.path(), "notes.txt");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.resolve(1).unwrap().ends_with("001-Leader.png"));
        assert!(store.resolve(2).unwrap().ends_with("002-Mimicry.jpg"));
    }

    #[test]
    fn scan_recurses_into_expansion_directories() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Age of Ascension/017-Anger.png");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(store.resolve(17).is_ok());
    }

    #[test]
    fn unknown_card_is_an_error() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-Leader.png");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(matches!(store.resolve(99), Err(StoreError::UnknownCard(99))));
    }

    #[test]
    fn duplicate_numbers_are_rejected() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-Leader.png");
        touch(tmp.path(), "sub/001-Other.png");

        let err = CardStore::scan(tmp.path()).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCard { number: 1, .. }));
    }

    #[test]
    fn same_number_front_and_back_is_not_a_duplicate() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-Leader.png");
        touch(tmp.path(), "001-Leader-back.png");

        let store = CardStore::scan(tmp.path()).unwrap();
        let (front, back) = store.resolve_pair(1).unwrap();
        assert!(front.ends_with("001-Leader.png"));
        assert!(back.ends_with("001-Leader-back.png"));
    }

    #[test]
    fn missing_back_face() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "001-Leader.png");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(matches!(
            store.resolve_pair(1),
            Err(StoreError::MissingBackFace(1))
        ));
    }

    #[test]
    fn reserved_stems_become_specials() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "back.png");
        touch(tmp.path(), "blank.png");
        touch(tmp.path(), "001-Card.png");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(store.back_image().unwrap().ends_with("back.png"));
        assert!(store.blank_image().unwrap().ends_with("blank.png"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_specials_error_by_name() {
        let tmp = TempDir::new().unwrap();
        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(matches!(
            store.back_image(),
            Err(StoreError::MissingSpecial("back"))
        ));
        assert!(matches!(
            store.blank_image(),
            Err(StoreError::MissingSpecial("blank"))
        ));
    }

    #[test]
    fn extension_case_is_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "003-Shadow.PNG");

        let store = CardStore::scan(tmp.path()).unwrap();
        assert!(store.resolve(3).is_ok());
    }
}
