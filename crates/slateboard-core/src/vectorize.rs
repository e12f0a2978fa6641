//! Vectorization boundary: the contract with the hosted vision model that
//! converts a rasterized board into typed shape elements.
//!
//! The transport is someone else's problem (see the [`VectorizeClient`]
//! trait); this module owns the response schema, the parser, and the
//! deterministic element-to-action mapping. Providers tend to wrap their
//! JSON in Markdown code fences, so the parser strips them first.

use crate::action::{ActionKind, DrawAction};
use crate::color::Rgba;
use crate::error::{EngineError, EngineResult};
use crate::storage::BoxFuture;
use kurbo::Point;
use log::{debug, warn};
use serde::Deserialize;

/// Stroke width assigned to every mapped action.
pub const MAPPED_STROKE_WIDTH: u32 = 2;

/// External vectorization collaborator. Submits a rasterized board (PNG
/// bytes) and resolves to the provider's raw text payload, which is fed to
/// [`map_response`]. Implementations live outside this crate.
pub trait VectorizeClient: Send + Sync {
    fn vectorize(&self, png: &[u8]) -> BoxFuture<'_, EngineResult<String>>;
}

/// One element of a vectorization response.
///
/// Box kinds carry `x, y, w, h`; line kinds carry endpoints; polygons carry
/// a vertex list. The tag set is open on the wire: anything the engine does
/// not recognize deserializes as [`VectorElement::Unknown`] and is dropped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum VectorElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Circle {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Ellipse {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Triangle {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Diamond {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Arrow {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        #[serde(default)]
        color: Option<String>,
    },
    Text {
        x: f64,
        y: f64,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    Polygon {
        #[serde(default)]
        points: Vec<Point>,
        #[serde(default)]
        color: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    elements: Vec<serde_json::Value>,
}

/// Strip a Markdown code fence (with optional info string) around `raw`.
/// Text without a fence passes through trimmed.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest.split_once('\n').map_or("", |(_, body)| body);
        if let Some((body, _)) = text.rsplit_once("```") {
            text = body;
        }
        text = text.trim();
    }
    text
}

/// Parse a raw provider payload and map it to draw actions.
///
/// Malformed and unrecognized elements are dropped individually; a payload
/// that is not JSON, or that maps to zero actions, is a
/// [`EngineError::Parse`] so the caller leaves the board untouched.
pub fn map_response(raw: &str) -> EngineResult<Vec<DrawAction>> {
    let text = strip_code_fences(raw);
    let envelope: ResponseEnvelope = serde_json::from_str(text)
        .map_err(|e| EngineError::Parse(format!("vectorization response is not valid JSON: {e}")))?;

    let mut actions = Vec::new();
    for value in envelope.elements {
        match serde_json::from_value::<VectorElement>(value) {
            Ok(element) => {
                if let Some(action) = map_element(element) {
                    actions.push(action);
                }
            }
            Err(err) => warn!("vectorize: dropping malformed element: {}", err),
        }
    }

    if actions.is_empty() {
        return Err(EngineError::Parse(
            "no usable elements in vectorization response".to_string(),
        ));
    }
    debug!("vectorize: mapped {} elements", actions.len());
    Ok(actions)
}

/// Map one element to a draw action. `None` for elements the board cannot
/// use: unknown types, blank text, empty polygons.
pub fn map_element(element: VectorElement) -> Option<DrawAction> {
    match element {
        VectorElement::Rect { x, y, w, h, color } => {
            Some(box_action(ActionKind::Rect, x, y, w, h, color))
        }
        VectorElement::Circle { x, y, w, h, color } => {
            // Radius encloses the detected box; the rim point sits due east
            // of the center so the two-point record stays deterministic.
            let radius = w.max(h) / 2.0;
            let center = Point::new(x + w / 2.0, y + h / 2.0);
            Some(two_point(
                ActionKind::Circle,
                center,
                Point::new(center.x + radius, center.y),
                color,
            ))
        }
        VectorElement::Ellipse { x, y, w, h, color } => {
            Some(box_action(ActionKind::Ellipse, x, y, w, h, color))
        }
        VectorElement::Triangle { x, y, w, h, color } => {
            Some(box_action(ActionKind::Triangle, x, y, w, h, color))
        }
        VectorElement::Diamond { x, y, w, h, color } => {
            Some(box_action(ActionKind::Diamond, x, y, w, h, color))
        }
        VectorElement::Line { x1, y1, x2, y2, color } => Some(two_point(
            ActionKind::Line,
            Point::new(x1, y1),
            Point::new(x2, y2),
            color,
        )),
        VectorElement::Arrow { x1, y1, x2, y2, color } => Some(two_point(
            ActionKind::Arrow,
            Point::new(x1, y1),
            Point::new(x2, y2),
            color,
        )),
        VectorElement::Text { x, y, text, color } => {
            let content = text.unwrap_or_default();
            let content = content.trim();
            if content.is_empty() {
                warn!("vectorize: dropping text element without content");
                return None;
            }
            Some(DrawAction::text(
                Point::new(x, y),
                content,
                parse_color(color),
                MAPPED_STROKE_WIDTH,
            ))
        }
        VectorElement::Polygon { points, color } => {
            if points.is_empty() {
                warn!("vectorize: dropping polygon element without points");
                return None;
            }
            let mut action = DrawAction::new(
                ActionKind::Polygon,
                points[0],
                parse_color(color),
                MAPPED_STROKE_WIDTH,
            );
            action.points = points;
            Some(action)
        }
        VectorElement::Unknown => {
            warn!("vectorize: dropping element of unrecognized type");
            None
        }
    }
}

fn parse_color(color: Option<String>) -> Rgba {
    color.as_deref().and_then(Rgba::from_hex).unwrap_or(Rgba::INK)
}

fn two_point(kind: ActionKind, start: Point, end: Point, color: Option<String>) -> DrawAction {
    let mut action = DrawAction::new(kind, start, parse_color(color), MAPPED_STROKE_WIDTH);
    action.points.push(end);
    action
}

fn box_action(kind: ActionKind, x: f64, y: f64, w: f64, h: f64, color: Option<String>) -> DrawAction {
    two_point(kind, Point::new(x, y), Point::new(x + w, y + h), color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_map_rect_and_text() {
        let raw = r##"{"elements":[
            {"type":"RECT","x":0,"y":0,"w":10,"h":10,"color":"#000"},
            {"type":"TEXT","x":5,"y":5,"text":"hi","color":"#ff0000"}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions.len(), 2);

        assert_eq!(actions[0].kind, ActionKind::Rect);
        assert_eq!(actions[0].points, vec![Point::ZERO, Point::new(10.0, 10.0)]);
        assert_eq!(actions[0].color, Rgba::BLACK);

        assert_eq!(actions[1].kind, ActionKind::Text);
        assert_eq!(actions[1].text.as_deref(), Some("hi"));
        assert_eq!(actions[1].color, Rgba::opaque(0xff, 0, 0));
    }

    #[test]
    fn test_circle_mapping() {
        let raw = r##"{"elements":[{"type":"CIRCLE","x":0,"y":0,"w":40,"h":20,"color":"#000"}]}"##;
        let actions = map_response(raw).unwrap();
        // Center of the box, rim due east at radius max(w, h) / 2.
        assert_eq!(actions[0].kind, ActionKind::Circle);
        assert_eq!(actions[0].points[0], Point::new(20.0, 10.0));
        assert_eq!(actions[0].points[1], Point::new(40.0, 10.0));
    }

    #[test]
    fn test_line_like_mapping() {
        let raw = r##"{"elements":[
            {"type":"LINE","x1":1,"y1":2,"x2":3,"y2":4,"color":"#000"},
            {"type":"ARROW","x1":5,"y1":6,"x2":7,"y2":8,"color":"#000"}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions[0].kind, ActionKind::Line);
        assert_eq!(actions[0].points, vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        assert_eq!(actions[1].kind, ActionKind::Arrow);
        assert_eq!(actions[1].points, vec![Point::new(5.0, 6.0), Point::new(7.0, 8.0)]);
    }

    #[test]
    fn test_polygon_mapping() {
        let raw = r##"{"elements":[{"type":"POLYGON","points":[
            {"x":0,"y":0},{"x":10,"y":0},{"x":5,"y":8}
        ],"color":"#000"}]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions[0].kind, ActionKind::Polygon);
        assert_eq!(actions[0].points.len(), 3);
        assert_eq!(actions[0].points[2], Point::new(5.0, 8.0));
    }

    #[test]
    fn test_unknown_type_dropped() {
        let raw = r##"{"elements":[
            {"type":"SPLINE","x":0,"y":0},
            {"type":"RECT","x":0,"y":0,"w":5,"h":5,"color":"#000"}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::Rect);
    }

    #[test]
    fn test_malformed_element_dropped() {
        // First RECT is missing `h`; the LINE still maps.
        let raw = r##"{"elements":[
            {"type":"RECT","x":0,"y":0,"w":5},
            {"type":"LINE","x1":0,"y1":0,"x2":1,"y2":1}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ActionKind::Line);
    }

    #[test]
    fn test_blank_text_dropped() {
        let raw = r##"{"elements":[{"type":"TEXT","x":0,"y":0,"text":"  "}]}"##;
        assert!(matches!(map_response(raw), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_not_json_is_parse_error() {
        assert!(matches!(map_response("sure, here you go"), Err(EngineError::Parse(_))));
        assert!(matches!(map_response(""), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_empty_elements_is_parse_error() {
        assert!(matches!(map_response(r#"{"elements":[]}"#), Err(EngineError::Parse(_))));
    }

    #[test]
    fn test_fenced_payload_parses() {
        let raw = "```json\n{\"elements\":[{\"type\":\"RECT\",\"x\":0,\"y\":0,\"w\":1,\"h\":1}]}\n```";
        let actions = map_response(raw).unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn test_color_fallback_to_ink() {
        let raw = r##"{"elements":[
            {"type":"RECT","x":0,"y":0,"w":1,"h":1,"color":"teal"},
            {"type":"RECT","x":0,"y":0,"w":1,"h":1}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_eq!(actions[0].color, Rgba::INK);
        assert_eq!(actions[1].color, Rgba::INK);
    }

    #[test]
    fn test_mapped_ids_are_unique() {
        let raw = r##"{"elements":[
            {"type":"RECT","x":0,"y":0,"w":1,"h":1},
            {"type":"RECT","x":2,"y":2,"w":1,"h":1}
        ]}"##;
        let actions = map_response(raw).unwrap();
        assert_ne!(actions[0].id, actions[1].id);
    }
}
