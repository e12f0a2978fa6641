//! SlateBoard Render Library
//!
//! Renderer abstraction and implementations for SlateBoard.
//! The default implementation rasterizes on the CPU with tiny-skia.

pub mod font;
mod renderer;
mod skia_impl;

pub use renderer::{PngRender, RenderContext, RenderResult, Renderer, RendererError};
pub use skia_impl::{SkiaRenderer, encode_png};
