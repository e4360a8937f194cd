//! # proofsheet
//!
//! Turn a trading-card deck export into a print-ready proof sheet PDF.
//! Each page tiles nine cards in a fixed 3×3 grid; card-back pages are
//! interleaved between card pages for double-sided printing, and pages can
//! carry crop marks for physical cutting.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Resolve   deck.txt + cards/  →  ordered image paths  (text → layout input)
//! 2. Render    resolved deck     →  result.pdf            (layout → pages → document)
//! ```
//!
//! The resolve stage is pure lookup: parse the deck export, map every card
//! number to an image file in the cards directory. The render stage is where
//! the real contract lives: interleave back pages, tile into groups of nine,
//! fan the page renders out across a worker pool, and concatenate the results
//! — in deck order, never completion order — into one document. A deck/size
//! mismatch is rejected before the first render; a single failed page aborts
//! the whole document rather than shipping a partial PDF.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`decklist`] | Stage 1 — deck-export parsing and resolution to image paths |
//! | [`store`] | Card-number → image-path index built from one directory scan |
//! | [`naming`] | `NNN-name[-back]` card filename convention parser |
//! | [`deck`] | Back interleaving and 3×3 page tiling — the pure layout core |
//! | [`pipeline`] | Stage 2 — parallel page rendering and document assembly |
//! | [`render`] | Compositing backend: params, crop-mark geometry, ImageMagick driver |
//! | [`config`] | `proofsheet.toml` loading and validation |
//! | [`output`] | CLI output formatting — per-page progress and build summary |
//!
//! # Design Decisions
//!
//! ## ImageMagick Behind a Trait
//!
//! All compositing goes through the [`render::RenderBackend`] trait, with
//! ImageMagick `convert` as the production implementation. A whole page is
//! one `convert` invocation — a nested argument tree of three `+append`ed
//! triads, `-append`ed vertically, then bordered (or canvased with crop
//! marks). The trait seam keeps the pipeline testable without ImageMagick
//! installed and keeps the subprocess details in one file.
//!
//! ## Deck Profiles Over Hardcoded Sizes
//!
//! Deck-size contracts are data ([`deck::DeckProfile`]): 36-card and 54-card
//! game presets ship, any multiple of nine works. The back-interleaving
//! schedule is derived from the profile — one back page after every card
//! page — instead of being a constant baked into the layout code.
//!
//! ## Explicit Configuration, No Globals
//!
//! Output path, quality, border, crop marks, and worker count travel in
//! [`config::ProofConfig`] and are threaded through the pipeline as
//! arguments. Nothing mutates process-wide state; the same process can build
//! two decks with different settings back to back.
//!
//! ## Fail the Document, Not the Page
//!
//! A failed page render cancels outstanding work and aborts the build with
//! the backend's full diagnostic. Scratch files are kept on failure for
//! troubleshooting and deleted only after a successful assembly.

pub mod config;
pub mod deck;
pub mod decklist;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod store;
