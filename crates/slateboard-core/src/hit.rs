//! Hit-testing for selection.

use crate::action::{ActionId, ActionKind, DrawAction};
use crate::board::BoardSnapshot;
use crate::geometry;
use kurbo::{Point, Rect};

/// Padding around a shape's expanded bounding box. Empirically chosen in the
/// original tool; kept as a tunable constant.
pub const HIT_PADDING: f64 = 10.0;

/// Padding around the heuristic text rectangle.
pub const TEXT_HIT_PADDING: f64 = 5.0;

/// Does `point` hit `action`?
///
/// Images use their exact placed rectangle; text uses the monospace
/// heuristic block; everything else uses the degenerate-expanded bounding
/// box padded by [`HIT_PADDING`].
pub fn contains(point: Point, action: &DrawAction) -> bool {
    if action.points.is_empty() {
        return false;
    }
    match action.kind {
        ActionKind::Image => action.image_rect().contains(point),
        ActionKind::Text => text_rect(action)
            .inflate(TEXT_HIT_PADDING, TEXT_HIT_PADDING)
            .contains(point),
        _ => geometry::expand_degenerate(action.bounds())
            .inflate(HIT_PADDING, HIT_PADDING)
            .contains(point),
    }
}

/// Heuristic rectangle of a text block, unpadded.
pub fn text_rect(action: &DrawAction) -> Rect {
    let anchor = action.start();
    let (w, h) = action.text_block_size();
    Rect::new(anchor.x, anchor.y, anchor.x + w, anchor.y + h)
}

/// Topmost action under `point`: scan from last-painted to first and return
/// the first hit.
pub fn pick_topmost(snapshot: &BoardSnapshot, point: Point) -> Option<ActionId> {
    snapshot.iter().rev().find(|a| contains(point, *a)).map(|a| a.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ImageSize;
    use crate::color::Rgba;

    fn two_point(kind: ActionKind, start: Point, end: Point) -> DrawAction {
        let mut a = DrawAction::new(kind, start, Rgba::INK, 2);
        a.points.push(end);
        a
    }

    #[test]
    fn test_degenerate_line_is_selectable() {
        // Start == end: without expansion this box would be a point.
        let p = Point::new(100.0, 100.0);
        let a = two_point(ActionKind::Line, p, p);
        assert!(contains(p, &a));
        // Expansion (±20) plus padding (10) reaches 30 units out.
        assert!(contains(Point::new(129.0, 100.0), &a));
        assert!(!contains(Point::new(131.0, 100.0), &a));
    }

    #[test]
    fn test_padded_bounding_box() {
        let a = two_point(ActionKind::Rect, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert!(contains(Point::new(50.0, 25.0), &a));
        assert!(contains(Point::new(109.0, 25.0), &a));
        assert!(!contains(Point::new(111.0, 25.0), &a));
    }

    #[test]
    fn test_image_exact_rect() {
        let mut a = DrawAction::new(ActionKind::Image, Point::new(10.0, 10.0), Rgba::INK, 2);
        a.image_size = Some(ImageSize { width: 100, height: 50 });
        assert!(contains(Point::new(50.0, 30.0), &a));
        // No padding on images.
        assert!(!contains(Point::new(9.0, 30.0), &a));
        assert!(!contains(Point::new(111.0, 30.0), &a));
    }

    #[test]
    fn test_text_heuristic_rect() {
        let a = DrawAction::text(Point::new(0.0, 0.0), "hello", Rgba::INK, 2);
        // 5 chars * 0.55 * 16 = 44 wide, 1.2 * 16 = 19.2 tall, padded by 5.
        assert!(contains(Point::new(40.0, 10.0), &a));
        assert!(contains(Point::new(48.0, 10.0), &a));
        assert!(!contains(Point::new(50.0, 10.0), &a));
        assert!(!contains(Point::new(40.0, 25.0), &a));
    }

    #[test]
    fn test_topmost_wins() {
        let below = two_point(ActionKind::Rect, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        let above = two_point(ActionKind::Rect, Point::new(40.0, 40.0), Point::new(60.0, 60.0));
        let snap = BoardSnapshot::from_actions(vec![below.clone(), above.clone()]);

        // Overlap region picks the later-painted action.
        assert_eq!(pick_topmost(&snap, Point::new(50.0, 50.0)), Some(above.id));
        // Outside the small rect but inside the big one.
        assert_eq!(pick_topmost(&snap, Point::new(10.0, 10.0)), Some(below.id));
        assert_eq!(pick_topmost(&snap, Point::new(500.0, 500.0)), None);
    }
}
