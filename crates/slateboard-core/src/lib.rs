//! SlateBoard Core Library
//!
//! Platform-agnostic engine for the SlateBoard whiteboard: drawing actions,
//! geometry, history, hit-testing, pointer interaction, board persistence,
//! and the vectorization boundary contract.

pub mod action;
pub mod board;
pub mod catalog;
pub mod color;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod glyphs;
pub mod history;
pub mod hit;
pub mod input;
pub mod storage;
pub mod vectorize;

pub use action::{ActionId, ActionKind, CircuitKind, DrawAction, GateKind, ImageRef, ImageSize};
pub use board::BoardSnapshot;
pub use catalog::{BoardCatalog, ImageHost, SavedBoard};
pub use color::Rgba;
pub use engine::{BoardEngine, Phase, Tool};
pub use error::{EngineError, EngineResult};
pub use history::History;
pub use input::{PointerButton, PointerEvent, TextKey};
pub use vectorize::{VectorElement, VectorizeClient};
