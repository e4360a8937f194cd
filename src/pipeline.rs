//! Deck-to-document build pipeline.
//!
//! Stage 2 of the proof sheet build. Takes the resolved deck from the
//! resolve stage and turns it into the output PDF:
//!
//! ```text
//! resolved deck ─ insert backs ─ tile ─┬─ render page 0 ─┐
//!                                      ├─ render page 1 ─┤─ assemble ─ result.pdf
//!                                      └─ render page N ─┘
//! ```
//!
//! Page renders fan out across the rayon pool and fan back in by original
//! group index, so document order always reproduces deck order no matter
//! which worker finishes first. Every render task owns its scratch file;
//! the only state shared across tasks is the cancellation flag.
//!
//! ## Failure policy
//!
//! One failed page aborts the whole document — no partial PDFs. The first
//! failure flips the cancellation flag so queued tasks return without
//! invoking the backend, and the first failure in page order is what the
//! caller sees. Scratch files are kept on failure (the partial output plus
//! the backend diagnostic is what you debug from) and deleted only after a
//! successful assembly; deletion problems are reported on the summary as
//! warnings, never as the build's error.

use crate::deck::{insert_fillers, tile_pages, DeckError, DeckProfile, PageGroup};
use crate::render::{
    AssembleParams, BackendError, ComposePageParams, CropMarkParams, MagickBackend, RenderBackend,
    RenderOptions,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("crop-mark overlay: {0}")]
    Overlay(BackendError),
    #[error("page {page} render failed: {source}")]
    Render { page: usize, source: BackendError },
    #[error("document assembly failed: {0}")]
    Assemble(BackendError),
    /// A sibling page failed first; this task never ran. Internal — the
    /// fan-in step reports the sibling's error instead.
    #[error("render cancelled after an earlier failure")]
    Cancelled,
}

/// Progress event for one page render, streamed to the caller's printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEvent {
    /// 1-based page number.
    pub page: usize,
    pub pages_total: usize,
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Rendered,
    Failed,
}

/// What a successful build produced.
#[derive(Debug)]
pub struct BuildSummary {
    pub pages: usize,
    pub output: PathBuf,
    /// Scratch files that survived cleanup, with the reason. Non-fatal.
    pub cleanup_failures: Vec<(PathBuf, std::io::Error)>,
}

/// Build the proof sheet with the production ImageMagick backend.
pub fn build(
    deck: &[PathBuf],
    profile: &DeckProfile,
    options: &RenderOptions,
    output: &Path,
    events: Option<Sender<RenderEvent>>,
) -> Result<BuildSummary, PipelineError> {
    let backend = MagickBackend::new();
    build_with_backend(&backend, deck, profile, options, output, events)
}

/// Build using a specific backend (allows testing with a mock).
pub fn build_with_backend(
    backend: &impl RenderBackend,
    deck: &[PathBuf],
    profile: &DeckProfile,
    options: &RenderOptions,
    output: &Path,
    events: Option<Sender<RenderEvent>>,
) -> Result<BuildSummary, PipelineError> {
    // Deck/profile mismatch is cheap to detect here and expensive to detect
    // after rendering has started; nothing touches the backend before this.
    profile.validate_card_count(deck.len())?;

    let full_deck = match profile.insertion_plan() {
        Some(plan) => insert_fillers(deck, &plan),
        None => deck.to_vec(),
    };
    let groups = tile_pages(full_deck, profile.expected_total())?;

    let overlay = match (options.crop_marks, deck.first()) {
        (true, Some(first_card)) => Some(generate_overlay(backend, first_card)?),
        _ => None,
    };

    let pages_total = groups.len();
    let cancelled = AtomicBool::new(false);

    let results: Vec<Result<PathBuf, PipelineError>> = groups
        .par_iter()
        .enumerate()
        .map_with(events, |events, (index, group)| {
            render_page(
                backend,
                group,
                index,
                pages_total,
                options,
                overlay.as_deref(),
                &cancelled,
                events,
            )
        })
        .collect();

    let mut pages = Vec::with_capacity(pages_total);
    let mut first_failure = None;
    for result in results {
        match result {
            Ok(path) => pages.push(path),
            Err(PipelineError::Cancelled) => {}
            Err(err) if first_failure.is_none() => first_failure = Some(err),
            Err(_) => {}
        }
    }
    if let Some(err) = first_failure {
        return Err(err);
    }

    backend
        .assemble(&AssembleParams {
            pages: pages.clone(),
            output: output.to_path_buf(),
        })
        .map_err(PipelineError::Assemble)?;

    let mut cleanup_failures = Vec::new();
    for path in pages.into_iter().chain(overlay) {
        if let Err(err) = std::fs::remove_file(&path) {
            cleanup_failures.push((path, err));
        }
    }

    Ok(BuildSummary {
        pages: pages_total,
        output: output.to_path_buf(),
        cleanup_failures,
    })
}

/// Draw the registration overlay once per document, sized to the first card.
fn generate_overlay(
    backend: &impl RenderBackend,
    first_card: &Path,
) -> Result<PathBuf, PipelineError> {
    let dims = backend.identify(first_card).map_err(PipelineError::Overlay)?;
    let path = scratch_path(".png")?;
    let params = CropMarkParams::new(dims.width, dims.height);
    backend
        .crop_marks(&params, &path)
        .map_err(PipelineError::Overlay)?;
    Ok(path)
}

#[allow(clippy::too_many_arguments)]
fn render_page(
    backend: &impl RenderBackend,
    group: &PageGroup,
    index: usize,
    pages_total: usize,
    options: &RenderOptions,
    overlay: Option<&Path>,
    cancelled: &AtomicBool,
    events: &mut Option<Sender<RenderEvent>>,
) -> Result<PathBuf, PipelineError> {
    if cancelled.load(Ordering::Relaxed) {
        return Err(PipelineError::Cancelled);
    }

    let page_path = scratch_path(".jpg")?;
    let result = backend.compose_page(&ComposePageParams {
        cards: group.images().clone(),
        overlay: overlay.map(Path::to_path_buf),
        output: page_path.clone(),
        quality: options.quality,
        border_width: options.border_width,
        border_color: options.border_color.clone(),
    });

    let outcome = match &result {
        Ok(()) => PageOutcome::Rendered,
        Err(_) => PageOutcome::Failed,
    };
    if let Some(tx) = events {
        let _ = tx.send(RenderEvent {
            page: index + 1,
            pages_total,
            outcome,
        });
    }

    result.map_err(|source| {
        cancelled.store(true, Ordering::Relaxed);
        PipelineError::Render {
            page: index + 1,
            source,
        }
    })?;
    Ok(page_path)
}

/// Allocate a unique scratch file path. The file is created (claiming the
/// name) and kept; the render task that requested it owns it from here on.
fn scratch_path(suffix: &str) -> Result<PathBuf, PipelineError> {
    let path = tempfile::Builder::new()
        .prefix("proofsheet-")
        .suffix(suffix)
        .tempfile()?
        .into_temp_path()
        .keep()
        .map_err(|e| PipelineError::Io(e.error))?;
    Ok(path)
}
