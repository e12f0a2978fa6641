//! SlateBoard Cloud Library
//!
//! HTTP collaborators for the SlateBoard engine: the hosted vectorization
//! model and the unsigned image host behind catalog previews. Both expose
//! the core crate's collaborator traits and return boxed futures, so the
//! caller picks the executor. Nothing here is required for core drawing.

mod upload;
mod vectorize;

pub use upload::HttpImageHost;
pub use vectorize::HttpVectorizeClient;
