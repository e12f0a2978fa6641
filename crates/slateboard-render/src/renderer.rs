//! Renderer trait abstraction.

use kurbo::Size;
use slateboard_core::{ActionId, BoardSnapshot, DrawAction, Rgba};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Encode failed: {0}")]
    EncodeFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
///
/// Rendering is a pure function of this context: the committed snapshot,
/// the optional in-progress action painted on top, and the selection.
pub struct RenderContext<'a> {
    /// The committed board to render, in paint order.
    pub snapshot: &'a BoardSnapshot,
    /// In-progress action painted above the snapshot, never selected.
    pub current: Option<&'a DrawAction>,
    /// Action to draw with the selection treatment.
    pub selected: Option<ActionId>,
    /// Viewport size in physical pixels.
    pub viewport_size: Size,
    /// Background color. The eraser paints with this.
    pub background: Rgba,
    /// Selection highlight color.
    pub selection_color: Rgba,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the default white board styling.
    pub fn new(snapshot: &'a BoardSnapshot, viewport_size: Size) -> Self {
        Self {
            snapshot,
            current: None,
            selected: None,
            viewport_size,
            background: Rgba::WHITE,
            selection_color: Rgba::SELECTION,
        }
    }

    /// Set the in-progress action.
    pub fn with_current(mut self, current: Option<&'a DrawAction>) -> Self {
        self.current = current;
        self
    }

    /// Set the selected action id.
    pub fn with_selected(mut self, selected: Option<ActionId>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }
}

/// One rasterized frame: straight-alpha RGBA, row major, top-left origin.
#[derive(Debug, Clone)]
pub struct PngRender {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PngRender {
    /// The RGBA quadruple at pixel `(x, y)`. Useful in tests.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }
}

/// Trait for rendering backends.
///
/// Two contexts with equal snapshots, current actions, and selections must
/// rasterize to identical frames.
pub trait Renderer {
    /// Rasterize one frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<PngRender>;
}
