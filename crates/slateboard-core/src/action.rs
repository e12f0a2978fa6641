//! Draw actions: the typed record describing one drawn object.

use crate::color::Rgba;
use crate::geometry;
use crate::glyphs;
use kurbo::{BezPath, Circle, Ellipse, Line, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity of a draw action.
pub type ActionId = Uuid;

/// Stroke width bounds enforced by the engine.
pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 50;

/// Maximum placed image width; wider bitmaps are downscaled at creation.
pub const MAX_IMAGE_WIDTH: u32 = 500;

/// Eraser strokes always paint the background color at this width.
pub const ERASER_WIDTH: f64 = 20.0;

/// Arrow head stroke length, at ±30° off the shaft.
pub const ARROW_HEAD_LEN: f64 = 15.0;

/// Monospace text heuristic: advance per character as a fraction of font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.55;

/// Vertical pitch between text lines as a fraction of font size.
pub const LINE_PITCH_FACTOR: f64 = 1.2;

/// Circuit diagram symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitKind {
    Resistor,
    Capacitor,
    Inductor,
    Source,
    Diode,
}

/// Logic gate symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    And,
    Or,
    Not,
}

/// Closed set of drawable kinds. Renderer and hit-tester match exhaustively,
/// so adding a kind is a compile-checked extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    FreehandStroke,
    Eraser,
    Line,
    Arrow,
    Rect,
    Circle,
    Ellipse,
    Diamond,
    Triangle,
    Polygon,
    Table,
    Text,
    Image,
    CircuitSymbol(CircuitKind),
    LogicGate(GateKind),
}

impl ActionKind {
    /// Kinds whose points accumulate one sample per pointer move.
    pub fn is_freehand(&self) -> bool {
        matches!(self, ActionKind::FreehandStroke | ActionKind::Eraser)
    }

    /// Kinds drawn as a fixed glyph scaled to the gesture box.
    pub fn is_glyph(&self) -> bool {
        matches!(self, ActionKind::CircuitSymbol(_) | ActionKind::LogicGate(_))
    }
}

/// Opaque reference to bitmap data (base64-encoded image bytes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn from_bytes(data: &[u8]) -> Self {
        use base64::{Engine, engine::general_purpose::STANDARD};
        Self(STANDARD.encode(data))
    }

    /// Decode back to raw bytes. `None` if the payload is not valid base64.
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        use base64::{Engine, engine::general_purpose::STANDARD};
        STANDARD.decode(&self.0).ok()
    }
}

/// Placed size of an image action, in board units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    /// Aspect-preserving downscale so `width <= MAX_IMAGE_WIDTH`.
    pub fn fit_width(source_width: u32, source_height: u32) -> Self {
        if source_width <= MAX_IMAGE_WIDTH || source_width == 0 {
            return Self { width: source_width, height: source_height };
        }
        let scale = MAX_IMAGE_WIDTH as f64 / source_width as f64;
        Self {
            width: MAX_IMAGE_WIDTH,
            height: (source_height as f64 * scale).round() as u32,
        }
    }
}

/// One drawn object on the board.
///
/// `points` semantics depend on `kind`: freehand/eraser carry the full
/// sampled stroke; two-point kinds carry `[anchor, cursor]`; polygons carry
/// a closed vertex list; tables carry `[topLeft, bottomRight]`; text and
/// image carry a single anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawAction {
    pub id: ActionId,
    pub kind: ActionKind,
    pub points: Vec<Point>,
    pub color: Rgba,
    pub stroke_width: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl DrawAction {
    /// Seed a new action at a single starting point.
    pub fn new(kind: ActionKind, start: Point, color: Rgba, stroke_width: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: vec![start],
            color,
            stroke_width: stroke_width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH),
            rows: None,
            cols: None,
            text: None,
            image_ref: None,
            image_size: None,
        }
    }

    /// Create a text action anchored at `anchor`.
    pub fn text(anchor: Point, text: impl Into<String>, color: Rgba, stroke_width: u32) -> Self {
        let mut action = Self::new(ActionKind::Text, anchor, color, stroke_width);
        action.text = Some(text.into());
        action
    }

    /// Create an image action from encoded bytes and the source pixel size.
    /// The placed size is downscaled so its width stays within
    /// [`MAX_IMAGE_WIDTH`].
    pub fn image(anchor: Point, data: &[u8], source_width: u32, source_height: u32) -> Self {
        let mut action = Self::new(ActionKind::Image, anchor, Rgba::INK, 2);
        action.image_ref = Some(ImageRef::from_bytes(data));
        action.image_size = Some(ImageSize::fit_width(source_width, source_height));
        action
    }

    /// First recorded point (the anchor).
    pub fn start(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    /// Last recorded point (the cursor for two-point kinds).
    pub fn end(&self) -> Point {
        self.points.last().copied().unwrap_or(Point::ZERO)
    }

    /// Raw bounding box of the recorded points.
    pub fn bounds(&self) -> Rect {
        geometry::bounding_box(&self.points)
    }

    /// Table row count, defaulting to 3.
    pub fn table_rows(&self) -> u32 {
        self.rows.filter(|r| *r > 0).unwrap_or(3)
    }

    /// Table column count, defaulting to 3.
    pub fn table_cols(&self) -> u32 {
        self.cols.filter(|c| *c > 0).unwrap_or(3)
    }

    /// Rendered font size for text, stepped from the stroke width.
    pub fn font_size(&self) -> f64 {
        match self.stroke_width {
            0..=2 => 16.0,
            3..=4 => 24.0,
            _ => 36.0,
        }
    }

    /// Text content split into lines (at least one, possibly empty).
    pub fn text_lines(&self) -> Vec<&str> {
        let text = self.text.as_deref().unwrap_or("");
        let lines: Vec<&str> = text.lines().collect();
        if lines.is_empty() { vec![""] } else { lines }
    }

    /// Heuristic width × height of the rendered text block.
    pub fn text_block_size(&self) -> (f64, f64) {
        let font_size = self.font_size();
        let lines = self.text_lines();
        let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        (
            longest as f64 * CHAR_WIDTH_FACTOR * font_size,
            lines.len() as f64 * LINE_PITCH_FACTOR * font_size,
        )
    }

    /// Placed rectangle of an image action (anchor + placed size).
    pub fn image_rect(&self) -> Rect {
        let anchor = self.start();
        let size = self.image_size.unwrap_or(ImageSize { width: 0, height: 0 });
        Rect::new(
            anchor.x,
            anchor.y,
            anchor.x + size.width as f64,
            anchor.y + size.height as f64,
        )
    }

    /// Copy with every point translated by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        let mut out = self.clone();
        let delta = Vec2::new(dx, dy);
        for p in &mut out.points {
            *p += delta;
        }
        out
    }

    /// Stroke width used when painting, which for some kinds diverges from
    /// the recorded `stroke_width`: erasers always paint at a fixed width and
    /// glyphs paint a normalized width that scales with the glyph.
    pub fn paint_width(&self) -> f64 {
        match self.kind {
            ActionKind::Eraser => ERASER_WIDTH,
            ActionKind::CircuitSymbol(_) | ActionKind::LogicGate(_) => {
                let (_, scale) = glyphs::placement(self.start(), self.end());
                glyphs::GLYPH_STROKE_WIDTH * scale
            }
            _ => self.stroke_width as f64,
        }
    }

    /// Outline geometry for this action, matched exhaustively by kind.
    ///
    /// Text and image actions return their bounding rectangle; the renderer
    /// draws their content specially and uses this path only for the
    /// selection overlay.
    pub fn to_path(&self) -> BezPath {
        let start = self.start();
        let end = self.end();
        match self.kind {
            ActionKind::FreehandStroke | ActionKind::Eraser if self.points.len() == 1 => {
                // A click without movement keeps a degenerate segment so a
                // round-capped stroke still paints a dot.
                let mut path = BezPath::new();
                path.move_to(start);
                path.line_to(start);
                path
            }
            ActionKind::FreehandStroke | ActionKind::Eraser => polyline(&self.points, false),
            ActionKind::Line => Line::new(start, end).to_path(0.1),
            ActionKind::Arrow => arrow_path(start, end),
            ActionKind::Rect => Rect::from_points(start, end).to_path(0.1),
            ActionKind::Circle => {
                Circle::new(start, geometry::distance(start, end)).to_path(0.1)
            }
            ActionKind::Ellipse => {
                Ellipse::from_rect(Rect::from_points(start, end)).to_path(0.1)
            }
            ActionKind::Diamond => {
                let r = Rect::from_points(start, end);
                polyline(
                    &[
                        Point::new(r.x0 + r.width() / 2.0, r.y0),
                        Point::new(r.x1, r.y0 + r.height() / 2.0),
                        Point::new(r.x0 + r.width() / 2.0, r.y1),
                        Point::new(r.x0, r.y0 + r.height() / 2.0),
                    ],
                    true,
                )
            }
            ActionKind::Triangle => {
                if self.points.len() >= 3 {
                    polyline(&self.points, true)
                } else {
                    let r = Rect::from_points(start, end);
                    polyline(
                        &[
                            Point::new(r.x0 + r.width() / 2.0, r.y0),
                            Point::new(r.x1, r.y1),
                            Point::new(r.x0, r.y1),
                        ],
                        true,
                    )
                }
            }
            ActionKind::Polygon => polyline(&self.points, true),
            ActionKind::Table => table_path(start, end, self.table_rows(), self.table_cols()),
            ActionKind::Text => {
                let (w, h) = self.text_block_size();
                Rect::new(start.x, start.y, start.x + w, start.y + h).to_path(0.1)
            }
            ActionKind::Image => self.image_rect().to_path(0.1),
            ActionKind::CircuitSymbol(kind) => {
                let (affine, _) = glyphs::placement(start, end);
                affine * glyphs::circuit_path(kind)
            }
            ActionKind::LogicGate(kind) => {
                let (affine, _) = glyphs::placement(start, end);
                affine * glyphs::gate_path(kind)
            }
        }
    }
}

/// Open or closed polyline through `points`.
fn polyline(points: &[Point], close: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(first) = points.first() else {
        return path;
    };
    path.move_to(*first);
    for p in &points[1..] {
        path.line_to(*p);
    }
    if close {
        path.close_path();
    }
    path
}

/// Shaft plus two head strokes at ±30° off the shaft angle.
fn arrow_path(start: Point, end: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(start);
    path.line_to(end);
    let angle = (end.y - start.y).atan2(end.x - start.x);
    for side in [-1.0, 1.0] {
        let theta = angle + side * std::f64::consts::FRAC_PI_6;
        path.move_to(end);
        path.line_to(Point::new(
            end.x - ARROW_HEAD_LEN * theta.cos(),
            end.y - ARROW_HEAD_LEN * theta.sin(),
        ));
    }
    path
}

/// Internal separator segments of a table: `cols - 1` vertical and
/// `rows - 1` horizontal, evenly spaced inside the spanned rectangle.
pub fn table_separators(start: Point, end: Point, rows: u32, cols: u32) -> (Vec<Line>, Vec<Line>) {
    let w = end.x - start.x;
    let h = end.y - start.y;
    let mut vertical = Vec::new();
    for i in 1..cols {
        let x = start.x + w * i as f64 / cols as f64;
        vertical.push(Line::new(Point::new(x, start.y), Point::new(x, end.y)));
    }
    let mut horizontal = Vec::new();
    for i in 1..rows {
        let y = start.y + h * i as f64 / rows as f64;
        horizontal.push(Line::new(Point::new(start.x, y), Point::new(end.x, y)));
    }
    (vertical, horizontal)
}

fn table_path(start: Point, end: Point, rows: u32, cols: u32) -> BezPath {
    let mut path = Rect::from_points(start, end).to_path(0.1);
    let (vertical, horizontal) = table_separators(start, end, rows, cols);
    for line in vertical.iter().chain(horizontal.iter()) {
        path.move_to(line.p0);
        path.line_to(line.p1);
    }
    path
}
