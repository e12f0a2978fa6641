//! Fixed-geometry glyphs for circuit symbols and logic gates.
//!
//! Each glyph is authored in a local coordinate space spanning roughly
//! ±20..±30 units around the origin, then placed with [`placement`]: scaled
//! uniformly to the gesture box (never below [`MIN_GLYPH_SCALE`]) and
//! translated to its center. A gesture smaller than [`MIN_GESTURE`] places
//! the glyph unscaled at the cursor point so a click still produces a
//! recognizable symbol.

use crate::action::{CircuitKind, GateKind};
use kurbo::{Affine, Arc, BezPath, Circle, Point, Shape as KurboShape, Vec2};

/// Gesture extent that maps to scale 1.0.
pub const GLYPH_UNIT: f64 = 40.0;

/// Lower bound on the uniform glyph scale.
pub const MIN_GLYPH_SCALE: f64 = 0.5;

/// Gestures smaller than this place the glyph unscaled at the cursor.
pub const MIN_GESTURE: f64 = 10.0;

/// Stroke width in glyph-local units; the painted width scales with the glyph.
pub const GLYPH_STROKE_WIDTH: f64 = 2.0;

/// Placement transform and uniform scale for a glyph spanned by two points.
pub fn placement(start: Point, end: Point) -> (Affine, f64) {
    let w = end.x - start.x;
    let h = end.y - start.y;
    let size = w.abs().max(h.abs());
    if size < MIN_GESTURE {
        (Affine::translate(end.to_vec2()), 1.0)
    } else {
        let center = Point::new(start.x + w / 2.0, start.y + h / 2.0);
        let scale = (size / GLYPH_UNIT).max(MIN_GLYPH_SCALE);
        (Affine::translate(center.to_vec2()) * Affine::scale(scale), scale)
    }
}

/// Local-space path for a circuit symbol.
pub fn circuit_path(kind: CircuitKind) -> BezPath {
    match kind {
        CircuitKind::Resistor => resistor(),
        CircuitKind::Capacitor => capacitor(),
        CircuitKind::Inductor => inductor(),
        CircuitKind::Source => source(),
        CircuitKind::Diode => diode(),
    }
}

/// Local-space path for a logic gate.
pub fn gate_path(kind: GateKind) -> BezPath {
    match kind {
        GateKind::And => and_gate(),
        GateKind::Or => or_gate(),
        GateKind::Not => not_gate(),
    }
}

fn segment(path: &mut BezPath, from: (f64, f64), to: (f64, f64)) {
    path.move_to(from);
    path.line_to(to);
}

/// Append a circular arc, connecting the current subpath to its start point.
fn arc_to(path: &mut BezPath, center: (f64, f64), radius: f64, start_angle: f64, sweep: f64) {
    let center = Point::new(center.0, center.1);
    let start = center + Vec2::new(radius * start_angle.cos(), radius * start_angle.sin());
    path.line_to(start);
    let arc = Arc::new(center, Vec2::new(radius, radius), start_angle, sweep, 0.0);
    path.extend(arc.append_iter(0.1));
}

fn resistor() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((-20.0, 0.0));
    for pt in [
        (-10.0, 0.0),
        (-7.0, -5.0),
        (-3.0, 5.0),
        (1.0, -5.0),
        (5.0, 5.0),
        (9.0, -5.0),
        (10.0, 0.0),
        (20.0, 0.0),
    ] {
        p.line_to(pt);
    }
    p
}

fn capacitor() -> BezPath {
    let mut p = BezPath::new();
    segment(&mut p, (-20.0, 0.0), (-5.0, 0.0));
    segment(&mut p, (-5.0, -15.0), (-5.0, 15.0));
    segment(&mut p, (5.0, -15.0), (5.0, 15.0));
    segment(&mut p, (5.0, 0.0), (20.0, 0.0));
    p
}

fn inductor() -> BezPath {
    use std::f64::consts::PI;
    let mut p = BezPath::new();
    p.move_to((-20.0, 0.0));
    arc_to(&mut p, (-10.0, 0.0), 5.0, PI, PI);
    arc_to(&mut p, (0.0, 0.0), 5.0, PI, PI);
    arc_to(&mut p, (10.0, 0.0), 5.0, PI, PI);
    p.line_to((20.0, 0.0));
    p
}

fn source() -> BezPath {
    let mut p = Circle::new(Point::ZERO, 15.0).to_path(0.1);
    segment(&mut p, (0.0, -15.0), (0.0, -25.0));
    segment(&mut p, (0.0, 15.0), (0.0, 25.0));
    // Polarity marks.
    segment(&mut p, (-5.0, -5.0), (5.0, -5.0));
    segment(&mut p, (0.0, -10.0), (0.0, 0.0));
    segment(&mut p, (-5.0, 5.0), (5.0, 5.0));
    p
}

fn diode() -> BezPath {
    let mut p = BezPath::new();
    segment(&mut p, (-20.0, 0.0), (-10.0, 0.0));
    p.move_to((-10.0, -10.0));
    p.line_to((-10.0, 10.0));
    p.line_to((10.0, 0.0));
    p.close_path();
    segment(&mut p, (10.0, -10.0), (10.0, 10.0));
    segment(&mut p, (10.0, 0.0), (20.0, 0.0));
    p
}

fn and_gate() -> BezPath {
    use std::f64::consts::FRAC_PI_2;
    let mut p = BezPath::new();
    p.move_to((-20.0, -20.0));
    p.line_to((0.0, -20.0));
    arc_to(&mut p, (0.0, 0.0), 20.0, -FRAC_PI_2, std::f64::consts::PI);
    p.line_to((-20.0, 20.0));
    p.line_to((-20.0, -20.0));
    segment(&mut p, (20.0, 0.0), (30.0, 0.0));
    segment(&mut p, (-20.0, -10.0), (-30.0, -10.0));
    segment(&mut p, (-20.0, 10.0), (-30.0, 10.0));
    p
}

fn or_gate() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((-20.0, -20.0));
    p.quad_to((0.0, -20.0), (20.0, 0.0));
    p.quad_to((0.0, 20.0), (-20.0, 20.0));
    p.quad_to((-10.0, 0.0), (-20.0, -20.0));
    segment(&mut p, (20.0, 0.0), (30.0, 0.0));
    segment(&mut p, (-15.0, -10.0), (-30.0, -10.0));
    segment(&mut p, (-15.0, 10.0), (-30.0, 10.0));
    p
}

fn not_gate() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((-10.0, -10.0));
    p.line_to((10.0, 0.0));
    p.line_to((-10.0, 10.0));
    p.close_path();
    p.extend(Circle::new(Point::new(14.0, 0.0), 4.0).to_path(0.1));
    segment(&mut p, (18.0, 0.0), (28.0, 0.0));
    segment(&mut p, (-10.0, 0.0), (-20.0, 0.0));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_scale_floor() {
        // A 12-unit gesture would scale to 0.3; the floor keeps it at 0.5.
        let (_, scale) = placement(Point::ZERO, Point::new(12.0, 12.0));
        assert_eq!(scale, MIN_GLYPH_SCALE);
    }

    #[test]
    fn test_placement_proportional() {
        let (_, scale) = placement(Point::ZERO, Point::new(80.0, 20.0));
        assert_eq!(scale, 2.0);
    }

    #[test]
    fn test_placement_tiny_gesture_at_cursor() {
        let end = Point::new(105.0, 203.0);
        let (affine, scale) = placement(Point::new(100.0, 200.0), end);
        assert_eq!(scale, 1.0);
        assert_eq!(affine * Point::ZERO, end);
    }

    #[test]
    fn test_placement_centers_glyph() {
        let (affine, scale) = placement(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        assert_eq!(scale, 1.0);
        assert_eq!(affine * Point::ZERO, Point::new(20.0, 20.0));
    }

    #[test]
    fn test_resistor_extent() {
        let bbox = resistor().bounding_box();
        assert_eq!(bbox.x0, -20.0);
        assert_eq!(bbox.x1, 20.0);
        assert_eq!(bbox.y0, -5.0);
        assert_eq!(bbox.y1, 5.0);
    }

    #[test]
    fn test_all_glyphs_nonempty() {
        for kind in [
            CircuitKind::Resistor,
            CircuitKind::Capacitor,
            CircuitKind::Inductor,
            CircuitKind::Source,
            CircuitKind::Diode,
        ] {
            assert!(!circuit_path(kind).elements().is_empty());
        }
        for kind in [GateKind::And, GateKind::Or, GateKind::Not] {
            assert!(!gate_path(kind).elements().is_empty());
        }
    }

    #[test]
    fn test_inductor_bumps_rise() {
        // The winding bumps arc above the axis (negative y).
        let bbox = inductor().bounding_box();
        assert!(bbox.y0 < -4.0);
        assert!(bbox.y1 <= 0.1);
    }
}
