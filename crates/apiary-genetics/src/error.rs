//! Error types for genetics operations

use thiserror::Error;

/// Errors raised while building or querying genetic data
#[derive(Debug, Error)]
pub enum GeneticsError {
    /// Identifier already in use by another registration
    #[error("identifier '{0}' is already registered")]
    DuplicateIdentifier(String),

    /// No allele is registered under this identifier
    #[error("allele '{0}' not found")]
    NotFound(String),

    /// A template omits a slot that has no species default either
    #[error("template is missing chromosome '{slot}' and no default is available")]
    IncompleteTemplate {
        /// Name of the missing chromosome slot
        slot: &'static str,
    },

    /// No template is registered under this identifier
    #[error("template '{0}' not found")]
    UnknownTemplate(String),

    /// Serialized genome does not match the karyotype it is restored into
    #[error("genome has {actual} chromosomes, karyotype expects {expected}")]
    KaryotypeMismatch {
        /// Number of slots in the karyotype
        expected: usize,
        /// Number of chromosomes found
        actual: usize,
    },

    /// Mode lookup on an empty mode registry
    #[error("no breeding modes registered")]
    NoModes,

    /// Encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Tracker files could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for genetics operations
pub type Result<T> = std::result::Result<T, GeneticsError>;
