//! Page composition — ImageMagick `convert` behind a backend trait.
//!
//! | Operation | `convert` expression |
//! |---|---|
//! | **Identify** | `image::image_dimensions` (no subprocess) |
//! | **Compose page** | nested triad tree: `+append` ×3, `-append`, border/canvas |
//! | **Crop marks** | one drawn cell, `-duplicate 2 +append`, `-duplicate 2 -append` |
//! | **Assemble** | page list → multi-page PDF export |
//!
//! The module is split into:
//! - **Params**: data structures describing render operations
//! - **Marks**: pure geometry for the registration overlay (unit testable)
//! - **Backend**: [`RenderBackend`] trait + shared error type
//! - **Magick**: the production subprocess implementation

pub mod backend;
pub mod magick;
pub mod marks;
mod params;

pub use backend::{BackendError, Dimensions, RenderBackend};
pub use magick::MagickBackend;
pub use params::{
    AssembleParams, ComposePageParams, CropMarkParams, Quality, RenderOptions,
    DEFAULT_MARK_LENGTH, DEFAULT_MARK_WIDTH,
};
