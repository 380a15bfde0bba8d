//! # Wrangle Core
//!
//! Schema inference and entity export over arbitrary triple graphs. A graph is
//! classified into its entity types; each type gets type, list, view and field
//! descriptors inferred from the properties its instances carry, and each
//! instance gets an entity record. Everything is written as a deterministic
//! tree of JSON-LD documents.

pub mod classify;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod instance;
pub mod naming;
pub mod schema;
pub mod sink;
pub mod traits;
pub mod types;
pub mod vocab;

pub mod pipeline;

// Re-export commonly used types and traits
pub use errors::{CoreError, ExitStatus, FetchError, SinkError};
pub use graph::{Graph, NamespaceTable};
pub use traits::GraphSource;
pub use types::{Iri, Literal, Term, Triple};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::classify::*;
    pub use crate::errors::*;
    pub use crate::extract::*;
    pub use crate::graph::*;
    pub use crate::pipeline::*;
    pub use crate::sink::*;
    pub use crate::traits::*;
    pub use crate::types::*;
    pub use async_trait::async_trait;
}
