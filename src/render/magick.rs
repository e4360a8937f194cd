//! ImageMagick subprocess backend.
//!
//! Drives the `convert` tool with a nested parenthesized argument tree:
//! three horizontal triads appended left-to-right, the triads appended
//! top-to-bottom, then either a plain re-border or the crop-mark variant
//! (A4 canvas, distort to the bordered viewport, overlay composite, center
//! composite). The tree shape is the contract — argument construction is
//! split from execution so it can be tested without ImageMagick installed.
//!
//! `convert` merges well with this pipeline because one invocation expresses
//! a whole page composition; there is no intermediate-file shuffle beyond
//! the single output each operation writes.

use super::backend::{BackendError, Dimensions, RenderBackend};
use super::marks;
use super::params::{AssembleParams, ComposePageParams, CropMarkParams};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Page canvas for the crop-mark variant, A4 at 300dpi.
const A4_CANVAS: &str = "2480x3508";
/// Distort viewport that shrinks the grid onto the bordered print area.
const BORDERED_VIEWPORT: &str = "2274x3174-12-12";
/// Identity scale-rotate-translate; the viewport does the actual framing.
const IDENTITY_SRT: &str = "0,0 1,1 0";
/// Registration marks print in red so they stand out from card art.
const MARK_COLOR: &str = "red";

/// Compositing backend that shells out to ImageMagick `convert`.
pub struct MagickBackend {
    convert: PathBuf,
}

impl MagickBackend {
    pub fn new() -> Self {
        Self {
            convert: PathBuf::from("convert"),
        }
    }

    /// Use an explicit `convert` binary instead of resolving via `PATH`.
    pub fn with_convert(convert: impl Into<PathBuf>) -> Self {
        Self {
            convert: convert.into(),
        }
    }

    fn run(&self, args: Vec<OsString>) -> Result<(), BackendError> {
        let output = Command::new(&self.convert).args(&args).output()?;
        if !output.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
            if !output.stderr.is_empty() {
                if !diagnostic.is_empty() {
                    diagnostic.push('\n');
                }
                diagnostic.push_str(&String::from_utf8_lossy(&output.stderr));
            }
            return Err(BackendError::CommandFailed {
                status: output.status.code().unwrap_or(-1),
                diagnostic,
            });
        }
        Ok(())
    }
}

impl Default for MagickBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for MagickBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path)
            .map_err(|e| BackendError::ProcessingFailed(format!("{}: {e}", path.display())))?;
        Ok(Dimensions { width, height })
    }

    fn compose_page(&self, params: &ComposePageParams) -> Result<(), BackendError> {
        self.run(compose_page_args(params))
    }

    fn crop_marks(&self, params: &CropMarkParams, output: &Path) -> Result<(), BackendError> {
        self.run(crop_mark_args(params, output))
    }

    fn assemble(&self, params: &AssembleParams) -> Result<(), BackendError> {
        self.run(assemble_args(params))
    }
}

fn os(s: &str) -> OsString {
    OsString::from(s)
}

/// `( ( c0 c1 c2 +append ) ( c3 c4 c5 +append ) ( c6 c7 c8 +append ) -append )`
fn grid_expr(cards: &[PathBuf; 9]) -> Vec<OsString> {
    let mut args = vec![os("(")];
    for row in cards.chunks(3) {
        args.push(os("("));
        for card in row {
            args.push(card.clone().into_os_string());
        }
        args.push(os("+append"));
        args.push(os(")"));
    }
    args.push(os("-append"));
    args.push(os(")"));
    args
}

/// Serialize one page composition into a `convert` argument list.
///
/// Plain variant — grid, repage, re-border, export:
///
/// ```text
/// ( <grid> +repage ) -quality Q -bordercolor white -border 30 out.jpg
/// ```
///
/// Crop-mark variant — grid distorted onto the bordered viewport, overlay
/// composited over it, the result centered on an A4 canvas:
///
/// ```text
/// -size 2480x3508 xc:white
/// ( <grid>
///   -set option:distort:viewport 2274x3174-12-12
///   -virtual-pixel mirror -distort SRT "0,0 1,1 0"
///   overlay.png -gravity center -compose over -composite +repage )
/// -gravity center -composite -quality Q out.jpg
/// ```
pub(crate) fn compose_page_args(params: &ComposePageParams) -> Vec<OsString> {
    let mut args = Vec::new();

    match &params.overlay {
        None => {
            args.push(os("("));
            args.extend(grid_expr(&params.cards));
            args.push(os("+repage"));
            args.push(os(")"));
            args.push(os("-quality"));
            args.push(os(&params.quality.value().to_string()));
            args.push(os("-bordercolor"));
            args.push(os(&params.border_color));
            args.push(os("-border"));
            args.push(os(&params.border_width.to_string()));
        }
        Some(overlay) => {
            args.push(os("-size"));
            args.push(os(A4_CANVAS));
            args.push(os("xc:white"));
            args.push(os("("));
            args.extend(grid_expr(&params.cards));
            args.push(os("-set"));
            args.push(os("option:distort:viewport"));
            args.push(os(BORDERED_VIEWPORT));
            args.push(os("-virtual-pixel"));
            args.push(os("mirror"));
            args.push(os("-distort"));
            args.push(os("SRT"));
            args.push(os(IDENTITY_SRT));
            args.push(overlay.clone().into_os_string());
            args.push(os("-gravity"));
            args.push(os("center"));
            args.push(os("-compose"));
            args.push(os("over"));
            args.push(os("-composite"));
            args.push(os("+repage"));
            args.push(os(")"));
            args.push(os("-gravity"));
            args.push(os("center"));
            args.push(os("-composite"));
            args.push(os("-quality"));
            args.push(os(&params.quality.value().to_string()));
        }
    }

    args.push(params.output.clone().into_os_string());
    args
}

/// Serialize the overlay generation: draw one marked cell, then duplicate it
/// twice horizontally and twice vertically for the 3×3 page grid.
pub(crate) fn crop_mark_args(params: &CropMarkParams, output: &Path) -> Vec<OsString> {
    vec![
        os("("),
        os("-size"),
        os(&format!("{}x{}", params.width, params.height)),
        os("xc:none"),
        os("-fill"),
        os(MARK_COLOR),
        os("-strokewidth"),
        os(&params.mark_width.to_string()),
        os("-draw"),
        os(&marks::draw_commands(params)),
        os(")"),
        os("-duplicate"),
        os("2"),
        os("+append"),
        os("-duplicate"),
        os("2"),
        os("-append"),
        os("+repage"),
        output.to_path_buf().into_os_string(),
    ]
}

/// Serialize document assembly: the ordered page images, then the output
/// path; `convert`'s multi-page export does the rest.
pub(crate) fn assemble_args(params: &AssembleParams) -> Vec<OsString> {
    let mut args: Vec<OsString> = params
        .pages
        .iter()
        .map(|p| p.clone().into_os_string())
        .collect();
    args.push(params.output.clone().into_os_string());
    args
}
