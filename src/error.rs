//! Error types for document decoding and schema resolution.
use thiserror::Error;

/// The input could not be turned into a document tree.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid YAML at {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A YAML mapping key that has no sensible string form (nested mapping, sequence).
    #[error("unsupported mapping key at {path}")]
    UnsupportedKey { path: String },
}

/// Resolution failures. Unrecognised shapes are never errors; these are guard rails.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("schema nesting exceeds {limit} levels at `{path}`")]
    DepthExceeded { path: String, limit: usize },

    #[error("nested object at `{path}` collides with declaration `{name}` of a different shape")]
    NameCollision { name: String, path: String },
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to serialize declarations: {0}")]
    Serialize(#[from] serde_json::Error),
}
