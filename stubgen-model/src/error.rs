//! Error types for the type model.

use thiserror::Error;

/// Error type for type model queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// An embedded type's definition is not available.
    #[error("embedded type '{name}' has no known definition")]
    OpaqueEmbedded {
        /// Embedded type name.
        name: String,
    },

    /// An embedded type is not an interface.
    #[error("embedded type '{name}' is not an interface")]
    NotAnInterface {
        /// Embedded type name.
        name: String,
    },

    /// An interface embeds itself.
    #[error("interface '{name}' embeds itself")]
    EmbeddingCycle {
        /// Interface name.
        name: String,
    },

    /// An arena id does not belong to the arena.
    #[error("unknown named type id {id}")]
    UnknownId {
        /// Raw id.
        id: u32,
    },
}
