//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (deck entry, page, document) is its semantic identity —
//! card number, page position — with filesystem paths shown as secondary
//! context via indented `Source:` lines.
//!
//! # Output Format
//!
//! ## Check / resolve
//!
//! ```text
//! Deck
//!     001 card 101 ×1 (double-sided)
//!         Source: cards/101-Leader.png
//!     002 card 17 ×4
//!         Source: cards/017-Anger-Charge.png
//!
//! 36 cards → 72 entries → 8 pages
//! ```
//!
//! ## Render
//!
//! ```text
//! page 03/08: rendered
//! page 04/08: rendered
//! Wrote ./result.pdf (8 pages)
//! ```
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.

use crate::decklist::DeckManifest;
use crate::pipeline::{BuildSummary, PageOutcome, RenderEvent};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

// ============================================================================
// Stage 1: Resolve / check output
// ============================================================================

/// Format the resolved deck: entries with their source images, then the
/// layout arithmetic line.
pub fn format_check_output(manifest: &DeckManifest) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Deck".to_string());

    let mut image_cursor = 0usize;
    for (i, entry) in manifest.entries.iter().enumerate() {
        let sides = if entry.double_sided {
            " (double-sided)"
        } else {
            ""
        };
        lines.push(format!(
            "    {} card {} \u{00d7}{}{}",
            format_index(i + 1),
            entry.number,
            entry.copies,
            sides
        ));
        if let Some(image) = manifest.images.get(image_cursor) {
            lines.push(format!("        Source: {}", image.display()));
        }
        image_cursor += entry.copies as usize * if entry.double_sided { 2 } else { 1 };
    }

    lines.push(String::new());
    lines.push(format!(
        "{} cards \u{2192} {} entries \u{2192} {} pages",
        manifest.images.len(),
        manifest.expected_total,
        manifest.pages
    ));
    lines
}

/// Print check output to stdout.
pub fn print_check_output(manifest: &DeckManifest) {
    for line in format_check_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Render output
// ============================================================================

/// Format a single page render event as display lines.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    let width = event.pages_total.to_string().len().max(2);
    let status = match event.outcome {
        PageOutcome::Rendered => "rendered",
        PageOutcome::Failed => "FAILED",
    };
    vec![format!(
        "page {:0>width$}/{}: {}",
        event.page, event.pages_total, status
    )]
}

/// Format the build summary, cleanup warnings first so the success line
/// lands last.
pub fn format_build_summary(summary: &BuildSummary) -> Vec<String> {
    let mut lines = Vec::new();
    for (path, err) in &summary.cleanup_failures {
        lines.push(format!(
            "warning: could not remove {}: {}",
            path.display(),
            err
        ));
    }
    lines.push(format!(
        "Wrote {} ({} pages)",
        summary.output.display(),
        summary.pages
    ));
    lines
}

/// Print the build summary to stdout.
pub fn print_build_summary(summary: &BuildSummary) {
    for line in format_build_summary(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::DeckProfile;
    use crate::decklist::DeckEntry;
    use std::path::PathBuf;

    fn manifest() -> DeckManifest {
        let entries = vec![
            DeckEntry {
                number: 101,
                copies: 1,
                double_sided: true,
            },
            DeckEntry {
                number: 17,
                copies: 4,
                double_sided: false,
            },
        ];
        let mut images = vec![
            PathBuf::from("cards/101-Leader.png"),
            PathBuf::from("cards/101-Leader-back.png"),
        ];
        images.extend((0..4).map(|_| PathBuf::from("cards/017-Anger.png")));
        // 6 entries stand in for a full deck here; profile arithmetic is
        // covered by deck.rs tests.
        let profile = DeckProfile::new(36, Some(PathBuf::from("cards/back.png"))).unwrap();
        DeckManifest::new(entries, images, &profile)
    }

    #[test]
    fn check_output_leads_with_card_identity() {
        let lines = format_check_output(&manifest());
        assert_eq!(lines[0], "Deck");
        assert_eq!(lines[1], "    001 card 101 \u{00d7}1 (double-sided)");
        assert_eq!(lines[2], "        Source: cards/101-Leader.png");
        assert_eq!(lines[3], "    002 card 17 \u{00d7}4");
        assert_eq!(lines[4], "        Source: cards/017-Anger.png");
    }

    #[test]
    fn check_output_ends_with_layout_arithmetic() {
        let lines = format_check_output(&manifest());
        assert_eq!(
            lines.last().unwrap(),
            "6 cards \u{2192} 72 entries \u{2192} 8 pages"
        );
    }

    #[test]
    fn render_event_lines() {
        let rendered = RenderEvent {
            page: 3,
            pages_total: 8,
            outcome: PageOutcome::Rendered,
        };
        assert_eq!(format_render_event(&rendered), vec!["page 03/8: rendered"]);

        let failed = RenderEvent {
            page: 12,
            pages_total: 24,
            outcome: PageOutcome::Failed,
        };
        assert_eq!(format_render_event(&failed), vec!["page 12/24: FAILED"]);
    }

    #[test]
    fn summary_warnings_come_before_success_line() {
        let summary = BuildSummary {
            pages: 8,
            output: PathBuf::from("./result.pdf"),
            cleanup_failures: vec![(
                PathBuf::from("/tmp/proofsheet-x.jpg"),
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            )],
        };
        let lines = format_build_summary(&summary);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("warning: could not remove /tmp/proofsheet-x.jpg"));
        assert_eq!(lines[1], "Wrote ./result.pdf (8 pages)");
    }
}
