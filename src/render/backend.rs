//! Compositing backend trait and shared types.
//!
//! The [`RenderBackend`] trait defines the four operations every backend must
//! support: identify, compose_page, crop_marks, and assemble.
//!
//! The production implementation is
//! [`MagickBackend`](super::magick::MagickBackend) — ImageMagick `convert`
//! driven as a subprocess. The backend is opaque to the pipeline beyond its
//! success/failure signal; a failure carries the tool's diagnostic output.

use super::params::{AssembleParams, ComposePageParams, CropMarkParams};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The compositing tool exited non-zero. Carries the tool's merged
    /// stdout/stderr so callers can surface or log the full diagnostic.
    #[error("convert exited with {status}: {diagnostic}")]
    CommandFailed { status: i32, diagnostic: String },
    #[error("processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for page-compositing backends.
///
/// Every backend must implement all four operations so the pipeline is
/// backend-agnostic. `Sync` because page composition fans out across the
/// rayon pool with the backend shared by reference.
pub trait RenderBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Compose nine cards into one bordered page image.
    fn compose_page(&self, params: &ComposePageParams) -> Result<(), BackendError>;

    /// Draw the registration-mark overlay to `output`.
    fn crop_marks(&self, params: &CropMarkParams, output: &Path) -> Result<(), BackendError>;

    /// Concatenate rendered pages into the multi-page output document.
    fn assemble(&self, params: &AssembleParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Mock backend that records operations without invoking anything.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Fail `compose_page` for the group whose first card is this path.
        pub fail_page_with_first_card: Option<PathBuf>,
        /// Per-group artificial latency, keyed by the group's first card.
        pub compose_delays: Mutex<HashMap<PathBuf, Duration>>,
        /// Create empty files at output paths, so temp-file lifecycle is
        /// observable from tests.
        pub touch_outputs: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(PathBuf),
        ComposePage {
            first_card: PathBuf,
            output: PathBuf,
            overlay: Option<PathBuf>,
            quality: u32,
        },
        CropMarks {
            width: u32,
            height: u32,
            output: PathBuf,
        },
        Assemble {
            pages: Vec<PathBuf>,
            output: PathBuf,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        /// Fail the page whose first card is `first_card`; other pages render.
        pub fn failing_page(first_card: PathBuf) -> Self {
            Self {
                fail_page_with_first_card: Some(first_card),
                ..Self::default()
            }
        }

        pub fn touching_outputs(mut self) -> Self {
            self.touch_outputs = true;
            self
        }

        pub fn delay_page(&self, first_card: PathBuf, delay: Duration) {
            self.compose_delays.lock().unwrap().insert(first_card, delay);
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        /// Compose operations only, in call order.
        pub fn composed_pages(&self) -> Vec<RecordedOp> {
            self.get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::ComposePage { .. }))
                .collect()
        }
    }

    impl RenderBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_path_buf()));

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        fn compose_page(&self, params: &ComposePageParams) -> Result<(), BackendError> {
            let first_card = params.cards[0].clone();

            let delay = self.compose_delays.lock().unwrap().get(&first_card).copied();
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }

            self.operations.lock().unwrap().push(RecordedOp::ComposePage {
                first_card: first_card.clone(),
                output: params.output.clone(),
                overlay: params.overlay.clone(),
                quality: params.quality.value(),
            });

            if self.fail_page_with_first_card.as_deref() == Some(first_card.as_path()) {
                return Err(BackendError::CommandFailed {
                    status: 1,
                    diagnostic: format!("convert: unable to open image `{}'", first_card.display()),
                });
            }
            if self.touch_outputs {
                std::fs::write(&params.output, b"")?;
            }
            Ok(())
        }

        fn crop_marks(&self, params: &CropMarkParams, output: &Path) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::CropMarks {
                width: params.width,
                height: params.height,
                output: output.to_path_buf(),
            });
            if self.touch_outputs {
                std::fs::write(output, b"")?;
            }
            Ok(())
        }

        fn assemble(&self, params: &AssembleParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Assemble {
                pages: params.pages.clone(),
                output: params.output.clone(),
            });
            if self.touch_outputs {
                std::fs::write(&params.output, b"")?;
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 750,
            height: 1050,
        }]);

        let result = backend.identify(Path::new("/cards/001.png")).unwrap();
        assert_eq!(result.width, 750);
        assert_eq!(result.height, 1050);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == Path::new("/cards/001.png")));
    }

    #[test]
    fn mock_records_compose_and_fails_marked_page() {
        use crate::render::Quality;

        let cards: [PathBuf; 9] = std::array::from_fn(|i| PathBuf::from(format!("c{i}.png")));
        let backend = MockBackend::failing_page(PathBuf::from("c0.png"));

        let err = backend
            .compose_page(&ComposePageParams {
                cards,
                overlay: None,
                output: PathBuf::from("/tmp/page.jpg"),
                quality: Quality::new(94),
                border_width: 30,
                border_color: "white".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, BackendError::CommandFailed { status: 1, .. }));
        assert_eq!(backend.composed_pages().len(), 1);
    }
}
