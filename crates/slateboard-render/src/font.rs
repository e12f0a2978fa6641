//! Built-in stroke font for text actions.
//!
//! Glyphs are polylines authored on a 4x9 grid (cap height rows 0..=8,
//! descenders to row 9) and scaled at layout time so columns land on the
//! engine's monospace advance. Lowercase letters render with the uppercase
//! forms; spaces and characters without a glyph advance silently.

use kurbo::{BezPath, Point};
use slateboard_core::action::{CHAR_WIDTH_FACTOR, LINE_PITCH_FACTOR};

/// Glyph cell width in grid units.
const CELL_WIDTH: f64 = 4.0;
/// Glyph cell cap height in grid units.
const CELL_HEIGHT: f64 = 8.0;
/// Cap height as a fraction of the font size.
const CAP_HEIGHT_FACTOR: f64 = 0.7;

type Strokes = &'static [&'static [(i8, i8)]];

/// Stroke width that keeps glyphs legible across the font size steps.
pub fn text_stroke_width(font_size: f64) -> f64 {
    (font_size / 12.0).max(1.0)
}

/// Stroke path for a text block: `lines` laid out top to bottom from the
/// `anchor` (top-left corner) at the engine's monospace metrics.
pub fn text_path(lines: &[&str], anchor: Point, font_size: f64) -> BezPath {
    let advance = CHAR_WIDTH_FACTOR * font_size;
    let pitch = LINE_PITCH_FACTOR * font_size;
    let scale = font_size * CAP_HEIGHT_FACTOR / CELL_HEIGHT;
    // Center each glyph cell inside its advance and line slot.
    let x_pad = (advance - CELL_WIDTH * scale) / 2.0;
    let y_pad = (pitch - CELL_HEIGHT * scale) / 2.0;

    let mut path = BezPath::new();
    for (row, line) in lines.iter().enumerate() {
        let top = anchor.y + row as f64 * pitch + y_pad;
        for (col, c) in line.chars().enumerate() {
            let Some(strokes) = glyph(c) else {
                continue;
            };
            let left = anchor.x + col as f64 * advance + x_pad;
            for stroke in strokes {
                let mut points = stroke.iter();
                let Some(&(x, y)) = points.next() else {
                    continue;
                };
                path.move_to(Point::new(left + x as f64 * scale, top + y as f64 * scale));
                for &(x, y) in points {
                    path.line_to(Point::new(left + x as f64 * scale, top + y as f64 * scale));
                }
            }
        }
    }
    path
}

/// Polyline strokes for `c`, or `None` when the font has no glyph for it.
fn glyph(c: char) -> Option<Strokes> {
    let c = c.to_ascii_uppercase();
    let strokes: Strokes = match c {
        'A' => &[&[(0, 8), (0, 3), (2, 0), (4, 3), (4, 8)], &[(0, 5), (4, 5)]],
        'B' => &[
            &[(0, 8), (0, 0), (3, 0), (4, 1), (4, 3), (3, 4), (0, 4)],
            &[(3, 4), (4, 5), (4, 7), (3, 8), (0, 8)],
        ],
        'C' => &[&[(4, 1), (3, 0), (1, 0), (0, 1), (0, 7), (1, 8), (3, 8), (4, 7)]],
        'D' => &[&[(0, 0), (0, 8), (2, 8), (4, 6), (4, 2), (2, 0), (0, 0)]],
        'E' => &[&[(4, 0), (0, 0), (0, 8), (4, 8)], &[(0, 4), (3, 4)]],
        'F' => &[&[(4, 0), (0, 0), (0, 8)], &[(0, 4), (3, 4)]],
        'G' => &[&[
            (4, 1),
            (3, 0),
            (1, 0),
            (0, 1),
            (0, 7),
            (1, 8),
            (3, 8),
            (4, 7),
            (4, 4),
            (2, 4),
        ]],
        'H' => &[&[(0, 0), (0, 8)], &[(4, 0), (4, 8)], &[(0, 4), (4, 4)]],
        'I' => &[&[(1, 0), (3, 0)], &[(2, 0), (2, 8)], &[(1, 8), (3, 8)]],
        'J' => &[&[(4, 0), (4, 7), (3, 8), (1, 8), (0, 7)]],
        'K' => &[&[(0, 0), (0, 8)], &[(4, 0), (0, 4), (4, 8)]],
        'L' => &[&[(0, 0), (0, 8), (4, 8)]],
        'M' => &[&[(0, 8), (0, 0), (2, 3), (4, 0), (4, 8)]],
        'N' => &[&[(0, 8), (0, 0), (4, 8), (4, 0)]],
        'O' => &[&[(1, 0), (3, 0), (4, 1), (4, 7), (3, 8), (1, 8), (0, 7), (0, 1), (1, 0)]],
        'P' => &[&[(0, 8), (0, 0), (3, 0), (4, 1), (4, 3), (3, 4), (0, 4)]],
        'Q' => &[
            &[(1, 0), (3, 0), (4, 1), (4, 7), (3, 8), (1, 8), (0, 7), (0, 1), (1, 0)],
            &[(2, 6), (4, 8)],
        ],
        'R' => &[
            &[(0, 8), (0, 0), (3, 0), (4, 1), (4, 3), (3, 4), (0, 4)],
            &[(2, 4), (4, 8)],
        ],
        'S' => &[&[
            (4, 1),
            (3, 0),
            (1, 0),
            (0, 1),
            (0, 3),
            (1, 4),
            (3, 4),
            (4, 5),
            (4, 7),
            (3, 8),
            (1, 8),
            (0, 7),
        ]],
        'T' => &[&[(0, 0), (4, 0)], &[(2, 0), (2, 8)]],
        'U' => &[&[(0, 0), (0, 7), (1, 8), (3, 8), (4, 7), (4, 0)]],
        'V' => &[&[(0, 0), (2, 8), (4, 0)]],
        'W' => &[&[(0, 0), (1, 8), (2, 5), (3, 8), (4, 0)]],
        'X' => &[&[(0, 0), (4, 8)], &[(4, 0), (0, 8)]],
        'Y' => &[&[(0, 0), (2, 4), (4, 0)], &[(2, 4), (2, 8)]],
        'Z' => &[&[(0, 0), (4, 0), (0, 8), (4, 8)]],
        '0' => &[
            &[(1, 0), (3, 0), (4, 1), (4, 7), (3, 8), (1, 8), (0, 7), (0, 1), (1, 0)],
            &[(0, 6), (4, 2)],
        ],
        '1' => &[&[(1, 1), (2, 0), (2, 8)], &[(1, 8), (3, 8)]],
        '2' => &[&[(0, 1), (1, 0), (3, 0), (4, 1), (4, 3), (0, 8), (4, 8)]],
        '3' => &[
            &[(0, 1), (1, 0), (3, 0), (4, 1), (4, 3), (3, 4), (1, 4)],
            &[(3, 4), (4, 5), (4, 7), (3, 8), (1, 8), (0, 7)],
        ],
        '4' => &[&[(3, 8), (3, 0), (0, 5), (4, 5)]],
        '5' => &[&[(4, 0), (0, 0), (0, 4), (3, 4), (4, 5), (4, 7), (3, 8), (1, 8), (0, 7)]],
        '6' => &[&[
            (4, 1),
            (3, 0),
            (1, 0),
            (0, 1),
            (0, 7),
            (1, 8),
            (3, 8),
            (4, 7),
            (4, 5),
            (3, 4),
            (0, 4),
        ]],
        '7' => &[&[(0, 0), (4, 0), (1, 8)]],
        '8' => &[
            &[(1, 4), (0, 3), (0, 1), (1, 0), (3, 0), (4, 1), (4, 3), (3, 4), (1, 4)],
            &[(1, 4), (0, 5), (0, 7), (1, 8), (3, 8), (4, 7), (4, 5), (3, 4)],
        ],
        '9' => &[&[
            (4, 4),
            (1, 4),
            (0, 3),
            (0, 1),
            (1, 0),
            (3, 0),
            (4, 1),
            (4, 7),
            (3, 8),
            (1, 8),
            (0, 7),
        ]],
        '.' => &[&[(2, 7), (2, 8)]],
        ',' => &[&[(2, 7), (1, 9)]],
        ':' => &[&[(2, 2), (2, 3)], &[(2, 6), (2, 7)]],
        ';' => &[&[(2, 2), (2, 3)], &[(2, 6), (1, 8)]],
        '!' => &[&[(2, 0), (2, 5)], &[(2, 7), (2, 8)]],
        '?' => &[&[(0, 1), (1, 0), (3, 0), (4, 1), (4, 3), (2, 5)], &[(2, 7), (2, 8)]],
        '\'' => &[&[(2, 0), (2, 2)]],
        '"' => &[&[(1, 0), (1, 2)], &[(3, 0), (3, 2)]],
        '-' => &[&[(1, 4), (3, 4)]],
        '+' => &[&[(2, 2), (2, 6)], &[(0, 4), (4, 4)]],
        '=' => &[&[(0, 3), (4, 3)], &[(0, 5), (4, 5)]],
        '/' => &[&[(0, 8), (4, 0)]],
        '\\' => &[&[(0, 0), (4, 8)]],
        '(' => &[&[(3, 0), (2, 1), (2, 7), (3, 8)]],
        ')' => &[&[(1, 0), (2, 1), (2, 7), (1, 8)]],
        '[' => &[&[(3, 0), (1, 0), (1, 8), (3, 8)]],
        ']' => &[&[(1, 0), (3, 0), (3, 8), (1, 8)]],
        '<' => &[&[(4, 1), (0, 4), (4, 7)]],
        '>' => &[&[(0, 1), (4, 4), (0, 7)]],
        '_' => &[&[(0, 9), (4, 9)]],
        _ => return None,
    };
    Some(strokes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn test_glyph_coverage() {
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(glyph(c).is_some(), "missing glyph for {c:?}");
        }
        assert!(glyph(' ').is_none());
        assert!(glyph('~').is_none());
    }

    #[test]
    fn test_lowercase_uses_uppercase_forms() {
        let upper = text_path(&["RUST"], Point::ZERO, 24.0);
        let lower = text_path(&["rust"], Point::ZERO, 24.0);
        assert_eq!(upper.bounding_box(), lower.bounding_box());
    }

    #[test]
    fn test_columns_land_on_advance() {
        let size = 24.0;
        let one = text_path(&["H"], Point::ZERO, size);
        let two = text_path(&["HH"], Point::ZERO, size);
        let shift = two.bounding_box().x1 - one.bounding_box().x1;
        assert!((shift - CHAR_WIDTH_FACTOR * size).abs() < 1e-9);
    }

    #[test]
    fn test_lines_land_on_pitch() {
        let size = 16.0;
        let one = text_path(&["A"], Point::ZERO, size);
        let two = text_path(&["A", "A"], Point::ZERO, size);
        let shift = two.bounding_box().y1 - one.bounding_box().y1;
        assert!((shift - LINE_PITCH_FACTOR * size).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_chars_keep_their_column() {
        let with_space = text_path(&["A B"], Point::ZERO, 24.0);
        let packed = text_path(&["AB"], Point::ZERO, 24.0);
        let advance = CHAR_WIDTH_FACTOR * 24.0;
        let gap = with_space.bounding_box().x1 - packed.bounding_box().x1;
        assert!((gap - advance).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_is_empty_path() {
        assert!(text_path(&[""], Point::ZERO, 24.0).elements().is_empty());
        assert!(text_path(&[], Point::ZERO, 24.0).elements().is_empty());
    }

    #[test]
    fn test_anchor_offsets_block() {
        let at_origin = text_path(&["X"], Point::ZERO, 24.0);
        let shifted = text_path(&["X"], Point::new(100.0, 50.0), 24.0);
        let a = at_origin.bounding_box();
        let b = shifted.bounding_box();
        assert!((b.x0 - a.x0 - 100.0).abs() < 1e-9);
        assert!((b.y0 - a.y0 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_stroke_width_scales_with_font() {
        assert!(text_stroke_width(16.0) < text_stroke_width(36.0));
        assert!(text_stroke_width(4.0) >= 1.0);
    }
}
