//! Error types for loading the registry
//!
//! Only construction can fail. Malformed lines are absorbed by the parser and
//! lookup misses are plain `None` values, so neither shows up here.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The registry file could not be opened.
    #[error("registry source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed part way through the registry text.
    #[error("failed to read registry text at line {line}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The process-wide registry was already built or installed.
    #[error("process-wide registry is already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, RegistryError>;
