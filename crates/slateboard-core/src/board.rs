//! Board snapshots: immutable ordered action lists.

use crate::action::{ActionId, DrawAction};
use serde::{Deserialize, Serialize};

/// One immutable board state. Paint order is array order; later entries draw
/// on top. Edits produce a new snapshot rather than mutating in place (the
/// live-drag `replace_top` in [`crate::history`] is the one exception).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot {
    actions: Vec<DrawAction>,
}

impl BoardSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_actions(actions: Vec<DrawAction>) -> Self {
        Self { actions }
    }

    pub fn actions(&self) -> &[DrawAction] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DrawAction> {
        self.actions.iter()
    }

    pub fn find(&self, id: ActionId) -> Option<&DrawAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// New snapshot with `action` appended on top.
    pub fn with_appended(&self, action: DrawAction) -> Self {
        let mut actions = self.actions.clone();
        actions.push(action);
        Self { actions }
    }

    /// New snapshot without the action identified by `id`.
    pub fn without(&self, id: ActionId) -> Self {
        Self {
            actions: self.actions.iter().filter(|a| a.id != id).cloned().collect(),
        }
    }

    /// New snapshot with the identified action translated by `(dx, dy)`.
    pub fn with_translated(&self, id: ActionId, dx: f64, dy: f64) -> Self {
        Self {
            actions: self
                .actions
                .iter()
                .map(|a| if a.id == id { a.translated(dx, dy) } else { a.clone() })
                .collect(),
        }
    }

    /// Serialize to JSON (an array of actions).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl<'a> IntoIterator for &'a BoardSnapshot {
    type Item = &'a DrawAction;
    type IntoIter = std::slice::Iter<'a, DrawAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::color::Rgba;
    use kurbo::Point;

    fn line_at(x: f64) -> DrawAction {
        let mut a = DrawAction::new(ActionKind::Line, Point::new(x, 0.0), Rgba::INK, 2);
        a.points.push(Point::new(x + 10.0, 10.0));
        a
    }

    #[test]
    fn test_append_preserves_order() {
        let a = line_at(0.0);
        let b = line_at(50.0);
        let snap = BoardSnapshot::new().with_appended(a.clone()).with_appended(b.clone());
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.actions()[0].id, a.id);
        assert_eq!(snap.actions()[1].id, b.id);
    }

    #[test]
    fn test_without() {
        let a = line_at(0.0);
        let b = line_at(50.0);
        let snap = BoardSnapshot::from_actions(vec![a.clone(), b.clone()]);
        let pruned = snap.without(a.id);
        assert_eq!(pruned.len(), 1);
        assert_eq!(pruned.actions()[0].id, b.id);
        // Original untouched.
        assert_eq!(snap.len(), 2);
    }

    #[test]
    fn test_with_translated_targets_one_action() {
        let a = line_at(0.0);
        let b = line_at(50.0);
        let snap = BoardSnapshot::from_actions(vec![a.clone(), b.clone()]);
        let moved = snap.with_translated(b.id, 5.0, -5.0);
        assert_eq!(moved.actions()[0].points[0], Point::new(0.0, 0.0));
        assert_eq!(moved.actions()[1].points[0], Point::new(55.0, -5.0));
    }

    #[test]
    fn test_json_roundtrip() {
        let snap = BoardSnapshot::from_actions(vec![line_at(1.0), line_at(2.0)]);
        let json = snap.to_json().unwrap();
        // Transparent representation: a bare array.
        assert!(json.starts_with('['));
        let back = BoardSnapshot::from_json(&json).unwrap();
        assert_eq!(back, snap);
    }
}
