//! tiny-skia renderer implementation.
//!
//! CPU rasterization of board snapshots: actions paint in array order onto
//! a background-filled pixmap, the in-progress action goes on top, and the
//! selected action gets the dashed accent treatment. The same raster feeds
//! the on-screen frame, PNG export, and the vectorization payload.

use crate::font;
use crate::renderer::{PngRender, RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{BezPath, PathEl};
use log::warn;
use slateboard_core::action::{ActionKind, DrawAction};
use slateboard_core::{ActionId, Rgba};
use std::collections::HashMap;
use tiny_skia::{
    Color, ColorU8, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pixmap, PixmapPaint,
    Stroke, StrokeDash, Transform,
};

/// Dash pattern for selection overlays.
const SELECTION_DASH: [f32; 2] = [5.0, 5.0];
/// Extra stroke width given to selected shapes.
const SELECTION_WIDTH_BOOST: f64 = 2.0;
/// Stroke width of the dashed rectangle around selected text and images.
const SELECTION_FRAME_WIDTH: f64 = 2.0;

/// CPU renderer over tiny-skia.
pub struct SkiaRenderer {
    /// Decoded bitmaps keyed by action id, so images are not re-decoded
    /// every frame.
    image_cache: HashMap<ActionId, Pixmap>,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self {
            image_cache: HashMap::new(),
        }
    }

    /// Rasterize one frame and encode it as PNG.
    pub fn render_png(&mut self, ctx: &RenderContext) -> RenderResult<Vec<u8>> {
        let frame = self.render(ctx)?;
        encode_png(&frame)
    }

    fn paint_action(
        &mut self,
        pixmap: &mut Pixmap,
        action: &DrawAction,
        selected: bool,
        ctx: &RenderContext,
    ) {
        match action.kind {
            ActionKind::Image => self.paint_image(pixmap, action, selected, ctx),
            ActionKind::Text => Self::paint_text(pixmap, action, selected, ctx),
            _ => {
                // The eraser keeps its fixed background paint even while
                // selected; everything else takes the accent color and a
                // slightly heavier stroke.
                let (color, width) = match action.kind {
                    ActionKind::Eraser => (ctx.background, action.paint_width()),
                    _ if selected => {
                        (ctx.selection_color, action.paint_width() + SELECTION_WIDTH_BOOST)
                    }
                    _ => (action.color, action.paint_width()),
                };
                Self::paint_path(pixmap, &action.to_path(), color, width, selected);
            }
        }
    }

    /// Text paints its glyph strokes in the action color; selection adds a
    /// dashed frame around the block instead of recoloring the glyphs.
    fn paint_text(pixmap: &mut Pixmap, action: &DrawAction, selected: bool, ctx: &RenderContext) {
        let font_size = action.font_size();
        let path = font::text_path(&action.text_lines(), action.start(), font_size);
        Self::paint_path(
            pixmap,
            &path,
            action.color,
            font::text_stroke_width(font_size),
            false,
        );
        if selected {
            Self::paint_path(
                pixmap,
                &action.to_path(),
                ctx.selection_color,
                SELECTION_FRAME_WIDTH,
                true,
            );
        }
    }

    fn paint_image(
        &mut self,
        pixmap: &mut Pixmap,
        action: &DrawAction,
        selected: bool,
        ctx: &RenderContext,
    ) {
        let rect = action.image_rect();
        if let Some(src) = self.cached_image(action) {
            if src.width() > 0 && src.height() > 0 && rect.width() > 0.0 && rect.height() > 0.0 {
                let sx = (rect.width() / src.width() as f64) as f32;
                let sy = (rect.height() / src.height() as f64) as f32;
                let transform =
                    Transform::from_scale(sx, sy).post_translate(rect.x0 as f32, rect.y0 as f32);
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                pixmap.draw_pixmap(0, 0, src.as_ref(), &paint, transform, None);
            }
        }
        if selected {
            Self::paint_path(
                pixmap,
                &action.to_path(),
                ctx.selection_color,
                SELECTION_FRAME_WIDTH,
                true,
            );
        }
    }

    fn cached_image(&mut self, action: &DrawAction) -> Option<&Pixmap> {
        if !self.image_cache.contains_key(&action.id) {
            let decoded = decode_image(action)?;
            self.image_cache.insert(action.id, decoded);
        }
        self.image_cache.get(&action.id)
    }

    fn paint_path(pixmap: &mut Pixmap, path: &BezPath, color: Rgba, width: f64, dashed: bool) {
        let Some(skia_path) = to_skia_path(path) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(to_skia_color(color));
        paint.anti_alias = true;
        let stroke = Stroke {
            width: width.max(0.1) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            dash: dashed
                .then(|| StrokeDash::new(SELECTION_DASH.to_vec(), 0.0))
                .flatten(),
            ..Stroke::default()
        };
        pixmap.stroke_path(&skia_path, &paint, &stroke, Transform::identity(), None);
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SkiaRenderer {
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<PngRender> {
        let (w, h) = (ctx.viewport_size.width, ctx.viewport_size.height);
        if !(w.is_finite() && h.is_finite() && w >= 1.0 && h >= 1.0) {
            return Err(RendererError::InvalidViewport(format!("{}x{}", w, h)));
        }
        let (width, height) = (w.round() as u32, h.round() as u32);
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::RenderFailed(format!("could not allocate {}x{} pixmap", width, height))
        })?;
        pixmap.fill(to_skia_color(ctx.background));

        for action in ctx.snapshot.iter() {
            let selected = ctx.selected == Some(action.id);
            self.paint_action(&mut pixmap, action, selected, ctx);
        }
        if let Some(current) = ctx.current {
            self.paint_action(&mut pixmap, current, false, ctx);
        }

        Ok(PngRender {
            rgba: demultiply(&pixmap),
            width,
            height,
        })
    }
}

/// Encode a frame as a PNG file. Equal frames encode byte-identically.
pub fn encode_png(frame: &PngRender) -> RenderResult<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, frame.width, frame.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RendererError::EncodeFailed(e.to_string()))?;
        writer
            .write_image_data(&frame.rgba)
            .map_err(|e| RendererError::EncodeFailed(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| RendererError::EncodeFailed(e.to_string()))?;
    }
    Ok(out)
}

fn decode_image(action: &DrawAction) -> Option<Pixmap> {
    let image_ref = action.image_ref.as_ref()?;
    let Some(bytes) = image_ref.to_bytes() else {
        warn!("renderer: image {} payload is not valid base64", action.id);
        return None;
    };
    let decoded = match image::load_from_memory(&bytes) {
        Ok(img) => img.to_rgba8(),
        Err(err) => {
            warn!("renderer: failed to decode image {}: {}", action.id, err);
            return None;
        }
    };
    let mut out = Pixmap::new(decoded.width(), decoded.height())?;
    for (dst, px) in out
        .pixels_mut()
        .iter_mut()
        .zip(decoded.as_raw().chunks_exact(4))
    {
        *dst = ColorU8::from_rgba(px[0], px[1], px[2], px[3]).premultiply();
    }
    Some(out)
}

fn to_skia_path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for el in path.elements() {
        match el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(p1, p) => pb.quad_to(p1.x as f32, p1.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(p1, p2, p) => pb.cubic_to(
                p1.x as f32,
                p1.y as f32,
                p2.x as f32,
                p2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

fn to_skia_color(c: Rgba) -> Color {
    Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn demultiply(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.pixels().len() * 4);
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
