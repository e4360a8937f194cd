//! Parameter types for page composition.
//!
//! These structs describe *what* to render, not *how* to render it. They are
//! the interface between the pipeline (which decides what pages to build) and
//! the [`backend`](super::backend) (which drives the actual compositing).
//! This separation allows swapping backends (e.g. for testing with a mock)
//! without changing pipeline logic.
//!
//! ## Types
//!
//! - [`Quality`] — JPEG export quality (1–100, default 94). Clamped on construction.
//! - [`RenderOptions`] — document-wide render settings (quality, border, crop marks).
//! - [`ComposePageParams`] — full specification for one page composite.
//! - [`CropMarkParams`] — full specification for the registration overlay.
//! - [`AssembleParams`] — ordered page list and the output document path.

use crate::deck::CARDS_PER_PAGE;
use std::path::PathBuf;

/// Default registration mark length in pixels.
pub const DEFAULT_MARK_LENGTH: u32 = 24;
/// Default registration mark stroke width in pixels.
pub const DEFAULT_MARK_WIDTH: u32 = 2;

/// Quality setting for JPEG page export (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(94)
    }
}

/// Document-wide render settings, threaded explicitly through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub quality: Quality,
    /// Border added around the plain page composite, in pixels.
    pub border_width: u32,
    /// ImageMagick color name or `#rrggbb` literal.
    pub border_color: String,
    /// Render the crop-mark page variant instead of the plain bordered one.
    pub crop_marks: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            quality: Quality::default(),
            border_width: 30,
            border_color: "white".to_string(),
            crop_marks: false,
        }
    }
}

/// Parameters for composing one page from nine card images.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposePageParams {
    /// Row-major card images, top-left to bottom-right.
    pub cards: [PathBuf; CARDS_PER_PAGE],
    /// Registration overlay for the crop-mark variant; `None` renders the
    /// plain bordered page.
    pub overlay: Option<PathBuf>,
    pub output: PathBuf,
    pub quality: Quality,
    pub border_width: u32,
    pub border_color: String,
}

/// Parameters for the registration-mark overlay.
///
/// One transparent `width × height` cell with L-shaped corner marks, tiled
/// 3×3 so every cell of the page grid gets marks at its boundaries. Generated
/// once per document, not once per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropMarkParams {
    /// Cell width — the card width in pixels.
    pub width: u32,
    /// Cell height — the card height in pixels.
    pub height: u32,
    pub mark_length: u32,
    pub mark_width: u32,
}

impl CropMarkParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            mark_length: DEFAULT_MARK_LENGTH,
            mark_width: DEFAULT_MARK_WIDTH,
        }
    }
}

/// Parameters for concatenating rendered pages into the output document.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembleParams {
    /// Page images in final document order.
    pub pages: Vec<PathBuf>,
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(94).value(), 94);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_94() {
        assert_eq!(Quality::default().value(), 94);
    }

    #[test]
    fn render_options_defaults() {
        let opts = RenderOptions::default();
        assert_eq!(opts.border_width, 30);
        assert_eq!(opts.border_color, "white");
        assert!(!opts.crop_marks);
    }

    #[test]
    fn crop_mark_params_default_marks() {
        let p = CropMarkParams::new(750, 1050);
        assert_eq!(p.mark_length, 24);
        assert_eq!(p.mark_width, 2);
    }
}
