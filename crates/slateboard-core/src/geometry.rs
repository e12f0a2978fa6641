//! Geometry kernel: bounding boxes and distances.
//!
//! Pure functions with no state. Containment paddings layered on top of
//! these live in [`crate::hit`].

use kurbo::{Point, Rect};

/// An axis whose extent falls below this is treated as degenerate.
pub const DEGENERATE_EXTENT: f64 = 10.0;

/// Per-side expansion applied to a degenerate axis before containment tests.
/// Keeps zero-width lines and single points selectable.
pub const DEGENERATE_EXPAND: f64 = 20.0;

/// Axis-aligned bounding box of a point sequence.
///
/// Returns [`Rect::ZERO`] for an empty slice; callers reject empty actions
/// before geometry ever runs.
pub fn bounding_box(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    let mut rect = Rect::new(first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        rect.x0 = rect.x0.min(p.x);
        rect.y0 = rect.y0.min(p.y);
        rect.x1 = rect.x1.max(p.x);
        rect.y1 = rect.y1.max(p.y);
    }
    rect
}

/// Expand any axis of `rect` whose extent is under [`DEGENERATE_EXTENT`]
/// symmetrically by [`DEGENERATE_EXPAND`] per side.
pub fn expand_degenerate(rect: Rect) -> Rect {
    let mut out = rect;
    if (rect.x1 - rect.x0).abs() < DEGENERATE_EXTENT {
        out.x0 -= DEGENERATE_EXPAND;
        out.x1 += DEGENERATE_EXPAND;
    }
    if (rect.y1 - rect.y0).abs() < DEGENERATE_EXTENT {
        out.y0 -= DEGENERATE_EXPAND;
        out.y1 += DEGENERATE_EXPAND;
    }
    out
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}
