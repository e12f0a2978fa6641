//! The whiteboard engine: a pointer/keyboard state machine owning history,
//! selection, and drawing settings.
//!
//! Primary button draws and types; secondary button selects and drags.
//! Every committed edit flows through [`History::commit`]; live drag frames
//! go through [`History::replace_top`] so a whole drag stays one undo step.

use crate::action::{
    ActionId, ActionKind, CircuitKind, DrawAction, GateKind, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH,
};
use crate::board::BoardSnapshot;
use crate::color::Rgba;
use crate::error::{EngineError, EngineResult};
use crate::history::History;
use crate::hit;
use crate::input::{PointerButton, PointerEvent, TextKey};
use crate::vectorize;
use kurbo::Point;
use log::{debug, warn};

/// Palette tool driving what a primary-button gesture produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Select,
    Pen,
    Eraser,
    Line,
    Arrow,
    Rect,
    Circle,
    Ellipse,
    Diamond,
    Triangle,
    Table,
    Text,
    Circuit(CircuitKind),
    Gate(GateKind),
}

impl Tool {
    /// The action kind a drawing gesture with this tool produces.
    /// `None` for tools that do not draw (Select, Text).
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Tool::Select | Tool::Text => None,
            Tool::Pen => Some(ActionKind::FreehandStroke),
            Tool::Eraser => Some(ActionKind::Eraser),
            Tool::Line => Some(ActionKind::Line),
            Tool::Arrow => Some(ActionKind::Arrow),
            Tool::Rect => Some(ActionKind::Rect),
            Tool::Circle => Some(ActionKind::Circle),
            Tool::Ellipse => Some(ActionKind::Ellipse),
            Tool::Diamond => Some(ActionKind::Diamond),
            Tool::Triangle => Some(ActionKind::Triangle),
            Tool::Table => Some(ActionKind::Table),
            Tool::Circuit(kind) => Some(ActionKind::CircuitSymbol(*kind)),
            Tool::Gate(kind) => Some(ActionKind::LogicGate(*kind)),
        }
    }
}

/// Interaction state. Selection lives here, not in snapshots: it is
/// ephemeral UI state layered over the current snapshot at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    /// A provisional action follows the pointer; nothing is committed yet.
    Drawing { action: DrawAction },
    /// An inline text buffer is open at `anchor`.
    Typing { anchor: Point, buffer: String },
    /// An action is selected. `pressed` holds the pointer position while the
    /// secondary button is still down (a move then starts a drag).
    SelectedIdle { id: ActionId, pressed: Option<Point> },
    /// The selected action follows the pointer; frames mutate the current
    /// history slot in place.
    Dragging { id: ActionId, last: Point },
}

/// The engine instance: history, interaction phase, palette settings, and
/// the single-slot vectorization gate. No globals; callers hold exactly one.
#[derive(Debug)]
pub struct BoardEngine {
    history: History,
    phase: Phase,
    tool: Tool,
    ink: Rgba,
    stroke_width: u32,
    table_rows: u32,
    table_cols: u32,
    analyzing: bool,
}

impl BoardEngine {
    pub fn new() -> Self {
        Self {
            history: History::new(),
            phase: Phase::Idle,
            tool: Tool::Pen,
            ink: Rgba::INK,
            stroke_width: 2,
            table_rows: 3,
            table_cols: 3,
            analyzing: false,
        }
    }

    // --- Views ---

    /// The committed board being displayed.
    pub fn snapshot(&self) -> &BoardSnapshot {
        self.history.current()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn ink(&self) -> Rgba {
        self.ink
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn table_grid(&self) -> (u32, u32) {
        (self.table_rows, self.table_cols)
    }

    /// Whether a vectorization request is in flight.
    pub fn analyzing(&self) -> bool {
        self.analyzing
    }

    /// Currently selected action, if any.
    pub fn selection(&self) -> Option<ActionId> {
        match &self.phase {
            Phase::SelectedIdle { id, .. } | Phase::Dragging { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// The uncommitted action the renderer should paint on top: the drawing
    /// in progress, or a preview of the open text buffer.
    pub fn current_drawing(&self) -> Option<DrawAction> {
        match &self.phase {
            Phase::Drawing { action } => Some(action.clone()),
            Phase::Typing { anchor, buffer } if !buffer.is_empty() => Some(DrawAction::text(
                *anchor,
                buffer.clone(),
                self.ink,
                self.stroke_width,
            )),
            _ => None,
        }
    }

    // --- Palette settings ---

    /// Switch tools. Finalizes any open text buffer first.
    pub fn set_tool(&mut self, tool: Tool) {
        self.finish_typing();
        self.tool = tool;
    }

    pub fn set_ink(&mut self, color: Rgba) {
        self.ink = color;
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    pub fn set_table_grid(&mut self, rows: u32, cols: u32) {
        self.table_rows = rows.max(1);
        self.table_cols = cols.max(1);
    }

    // --- Pointer state machine ---

    /// Feed one pointer event. Returns true when the displayed board (or an
    /// overlay on it) changed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { position, button } => match button {
                PointerButton::Primary => self.primary_down(position),
                PointerButton::Secondary => self.secondary_down(position),
            },
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Wheel { delta } => {
                self.wheel(delta);
                false
            }
        }
    }

    fn primary_down(&mut self, position: Point) -> bool {
        // A primary press while a drag is live is inconsistent input: two
        // gestures cannot own the pointer. Reset rather than risk a stuck
        // drag.
        if matches!(self.phase, Phase::Dragging { .. }) {
            warn!("engine: primary press during drag, resetting to idle");
            self.phase = Phase::Idle;
            return true;
        }

        let mut changed = self.finish_typing();

        match self.tool {
            Tool::Select => {
                // Selection belongs to the secondary button; with the select
                // tool the primary button has nothing to do.
            }
            Tool::Text => {
                self.phase = Phase::Typing {
                    anchor: position,
                    buffer: String::new(),
                };
                changed = true;
            }
            _ => {
                if let Some(kind) = self.tool.kind() {
                    let mut action = DrawAction::new(kind, position, self.ink, self.stroke_width);
                    if kind == ActionKind::Table {
                        action.rows = Some(self.table_rows);
                        action.cols = Some(self.table_cols);
                    }
                    debug!("engine: start drawing {:?}", kind);
                    self.phase = Phase::Drawing { action };
                    changed = true;
                }
            }
        }
        changed
    }

    fn secondary_down(&mut self, position: Point) -> bool {
        if matches!(self.phase, Phase::Dragging { .. }) {
            return false;
        }
        // Finalizing an open buffer may commit a text action the same click
        // can then select.
        self.finish_typing();

        match hit::pick_topmost(self.history.current(), position) {
            Some(id) => {
                debug!("engine: selected {}", id);
                self.phase = Phase::SelectedIdle {
                    id,
                    pressed: Some(position),
                };
                true
            }
            None => {
                let had_selection = self.selection().is_some();
                self.phase = Phase::Idle;
                had_selection
            }
        }
    }

    fn pointer_move(&mut self, position: Point) -> bool {
        match &mut self.phase {
            Phase::Drawing { action } => {
                if action.kind.is_freehand() {
                    action.points.push(position);
                } else if action.points.len() < 2 {
                    action.points.push(position);
                } else {
                    action.points[1] = position;
                    action.points.truncate(2);
                }
                true
            }
            Phase::SelectedIdle {
                id,
                pressed: Some(press),
            } => {
                let id = *id;
                let press = *press;
                // Drag begins: snapshot the pre-drag board so one undo
                // reverts the entire drag.
                self.history.commit(self.history.current().clone());
                let moved = self
                    .history
                    .current()
                    .with_translated(id, position.x - press.x, position.y - press.y);
                self.history.replace_top(moved);
                self.phase = Phase::Dragging { id, last: position };
                true
            }
            Phase::Dragging { id, last } => {
                let id = *id;
                let delta = position - *last;
                *last = position;
                let moved = self.history.current().with_translated(id, delta.x, delta.y);
                self.history.replace_top(moved);
                true
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self, _position: Point, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => {
                if matches!(self.phase, Phase::Drawing { .. }) {
                    let Phase::Drawing { action } =
                        std::mem::replace(&mut self.phase, Phase::Idle)
                    else {
                        return false;
                    };
                    self.commit_appended(action)
                } else {
                    false
                }
            }
            PointerButton::Secondary => match &mut self.phase {
                Phase::Dragging { .. } => {
                    // Drop deselects.
                    self.phase = Phase::Idle;
                    true
                }
                Phase::SelectedIdle { pressed, .. } => {
                    *pressed = None;
                    false
                }
                _ => false,
            },
        }
    }

    fn wheel(&mut self, delta: f64) {
        if delta > 0.0 {
            self.set_stroke_width(self.stroke_width.saturating_add(1));
        } else if delta < 0.0 {
            self.set_stroke_width(self.stroke_width.saturating_sub(1));
        }
    }

    // --- Typing ---

    /// Feed a keystroke to the open text buffer. Ignored outside Typing.
    pub fn handle_text_key(&mut self, key: TextKey) -> bool {
        let Phase::Typing { buffer, .. } = &mut self.phase else {
            return false;
        };
        match key {
            TextKey::Char(c) => buffer.push(c),
            TextKey::Newline => buffer.push('\n'),
            TextKey::Backspace => {
                buffer.pop();
            }
        }
        true
    }

    /// Close the text buffer: commit a Text action if the trimmed content is
    /// non-empty, discard silently otherwise. Returns whether a commit
    /// happened.
    pub fn finish_typing(&mut self) -> bool {
        if !matches!(self.phase, Phase::Typing { .. }) {
            return false;
        }
        let Phase::Typing { anchor, buffer } = std::mem::replace(&mut self.phase, Phase::Idle)
        else {
            return false;
        };
        if buffer.trim().is_empty() {
            debug!("engine: discarding empty text buffer");
            return false;
        }
        let action = DrawAction::text(anchor, buffer, self.ink, self.stroke_width);
        self.commit_appended(action)
    }

    // --- Direct operations ---

    /// Step back one snapshot. Clears selection and any open gesture.
    pub fn undo(&mut self) -> bool {
        self.phase = Phase::Idle;
        self.history.undo()
    }

    /// Step forward one snapshot. Clears selection and any open gesture.
    pub fn redo(&mut self) -> bool {
        self.phase = Phase::Idle;
        self.history.redo()
    }

    /// Commit an empty board. No-op when the board is already empty.
    pub fn clear(&mut self) {
        self.phase = Phase::Idle;
        if !self.history.current().is_empty() {
            self.history.commit(BoardSnapshot::new());
        }
    }

    /// Remove the selected action as one commit. Returns whether anything
    /// was deleted.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection() else {
            return false;
        };
        let pruned = self.history.current().without(id);
        self.history.commit(pruned);
        self.phase = Phase::Idle;
        true
    }

    /// Place a bitmap on the board as one commit. The placed size is
    /// downscaled so its width stays within the engine limit.
    pub fn insert_image(
        &mut self,
        anchor: Point,
        data: &[u8],
        source_width: u32,
        source_height: u32,
    ) -> EngineResult<ActionId> {
        if data.is_empty() || source_width == 0 || source_height == 0 {
            return Err(EngineError::Validation(
                "image data or dimensions are empty".to_string(),
            ));
        }
        let action = DrawAction::image(anchor, data, source_width, source_height);
        let id = action.id;
        self.commit_appended(action);
        Ok(id)
    }

    /// Replace the board wholesale (e.g. with a catalog load), undoably.
    pub fn load_snapshot(&mut self, snapshot: BoardSnapshot) {
        self.phase = Phase::Idle;
        self.history.commit(snapshot);
    }

    // --- Vectorization gate ---

    /// Claim the single vectorization slot. Fails with [`EngineError::Busy`]
    /// while a request is already in flight.
    pub fn begin_vectorize(&mut self) -> EngineResult<()> {
        if self.analyzing {
            return Err(EngineError::Busy);
        }
        self.analyzing = true;
        debug!("engine: vectorization started");
        Ok(())
    }

    /// Consume a vectorization response: parse, map, and replace the whole
    /// board as one undoable commit. Releases the gate on every path. An
    /// unusable response leaves the board untouched.
    pub fn apply_vectorize_output(&mut self, raw: &str) -> EngineResult<usize> {
        self.analyzing = false;
        let actions = vectorize::map_response(raw)?;
        let count = actions.len();
        self.phase = Phase::Idle;
        self.history.commit(BoardSnapshot::from_actions(actions));
        debug!("engine: vectorization replaced board with {} actions", count);
        Ok(count)
    }

    /// Record that the in-flight vectorization call failed in transport;
    /// releases the gate without touching the board.
    pub fn vectorize_failed(&mut self) {
        self.analyzing = false;
    }

    // --- Internals ---

    /// Append `action` to the current snapshot as a commit. Malformed
    /// actions are dropped, never committed; pointer paths must not panic.
    fn commit_appended(&mut self, action: DrawAction) -> bool {
        if action.points.is_empty() {
            warn!("engine: dropping zero-point {:?} action", action.kind);
            return false;
        }
        let next = self.history.current().with_appended(action);
        self.history.commit(next);
        true
    }
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new()
    }
}
