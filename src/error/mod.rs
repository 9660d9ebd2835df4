//! Error types for configuration generation

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Listing or inspecting the image tree failed
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A manifest could not be hashed after it passed discovery
    #[error("Failed to compute digest of {path}: {source}")]
    Digest {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the generated configuration failed
    #[error("Output error: {0}")]
    Output(#[source] std::io::Error),

    /// Invalid arguments or configuration
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        RegistryError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn digest(path: &std::path::Path, source: std::io::Error) -> Self {
        RegistryError::Digest {
            path: path.display().to_string(),
            source,
        }
    }
}
