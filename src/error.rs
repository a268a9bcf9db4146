use std::path::PathBuf;
use thiserror::Error;

/// Error type for gffclean operations.
#[derive(Debug, Error)]
pub enum GffCleanError {
    /// Input extension is missing or not supported.
    #[error("unsupported input extension: {0}")]
    UnsupportedExtension(String),
    /// Resolution or insertion requested without a mapping source.
    #[error("no mapping file available for {0}; supply one with --resolve-duplicates")]
    MissingMappingFile(&'static str),
    /// Mapping file could not be loaded at all.
    #[error("cannot read mapping file {path}: {reason}")]
    MappingFile { path: PathBuf, reason: String },
    /// Failed to build a Rayon thread pool.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    /// Wraps standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for gffclean operations.
pub type Result<T> = std::result::Result<T, GffCleanError>;
