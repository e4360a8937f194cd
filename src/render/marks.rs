//! Registration-mark geometry for the crop-mark page variant.
//!
//! One card cell gets two short line segments per corner — an L-shaped mark
//! at each of the four corners. The backend tiles that single cell 3×3
//! (horizontal then vertical duplication), so every card on the page ends up
//! with marks at its boundaries. All functions here are pure; the backend
//! turns the segments into an actual overlay image.

use super::params::CropMarkParams;

/// An axis-aligned line segment in cell pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: (u32, u32),
    pub to: (u32, u32),
}

impl Segment {
    fn line(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            from: (x1, y1),
            to: (x2, y2),
        }
    }

    /// Manhattan length — exact for axis-aligned segments.
    pub fn length(&self) -> u32 {
        self.from.0.abs_diff(self.to.0) + self.from.1.abs_diff(self.to.1)
    }
}

/// The eight corner segments for one cell: two per corner, L-shaped.
///
/// Edge pixels sit at `w-1` / `h-1`, so the far-corner marks anchor there.
pub fn corner_segments(params: &CropMarkParams) -> [Segment; 8] {
    let (w, h, l) = (params.width, params.height, params.mark_length);
    [
        // top-left
        Segment::line(0, 0, 0, l),
        Segment::line(0, 0, l, 0),
        // bottom-left
        Segment::line(0, h - 1, 0, h - l),
        Segment::line(0, h - 1, l, h - 1),
        // top-right
        Segment::line(w - 1, 0, w - 1, l),
        Segment::line(w - 1, 0, w - l, 0),
        // bottom-right
        Segment::line(w - 1, h - 1, w - l, h - 1),
        Segment::line(w - 1, h - 1, w - 1, h - l),
    ]
}

/// Serialize the corner segments as an ImageMagick `-draw` primitive string.
pub fn draw_commands(params: &CropMarkParams) -> String {
    corner_segments(params)
        .iter()
        .map(|s| {
            format!(
                "line {},{} {},{}",
                s.from.0, s.from.1, s.to.0, s.to.1
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> CropMarkParams {
        CropMarkParams::new(750, 1050)
    }

    #[test]
    fn eight_segments_total() {
        assert_eq!(corner_segments(&cell()).len(), 8);
    }

    #[test]
    fn two_segments_anchored_at_each_corner() {
        let params = cell();
        let corners = [(0u32, 0u32), (0, 1049), (749, 0), (749, 1049)];
        let segments = corner_segments(&params);

        for corner in corners {
            let anchored = segments
                .iter()
                .filter(|s| {
                    s.from.0.abs_diff(corner.0) <= 1 && s.from.1.abs_diff(corner.1) <= 1
                })
                .count();
            assert_eq!(anchored, 2, "corner {corner:?}");
        }
    }

    #[test]
    fn segment_lengths_match_mark_length_within_a_pixel() {
        let params = cell();
        for s in corner_segments(&params) {
            let diff = s.length().abs_diff(params.mark_length);
            assert!(diff <= 1, "segment {s:?} has length {}", s.length());
        }
    }

    #[test]
    fn segments_are_axis_aligned() {
        for s in corner_segments(&cell()) {
            assert!(s.from.0 == s.to.0 || s.from.1 == s.to.1, "{s:?}");
        }
    }

    #[test]
    fn draw_commands_serialization() {
        let params = CropMarkParams::new(100, 200);
        let draw = draw_commands(&params);
        assert!(draw.starts_with("line 0,0 0,24 line 0,0 24,0"));
        assert!(draw.contains("line 0,199 0,176"));
        assert!(draw.contains("line 99,199 99,176"));
        assert_eq!(draw.matches("line ").count(), 8);
    }

    #[test]
    fn custom_mark_length_is_honored() {
        let params = CropMarkParams {
            mark_length: 40,
            ..CropMarkParams::new(750, 1050)
        };
        assert_eq!(corner_segments(&params)[0].length(), 40);
    }
}
