use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for craftpack operations outside the resolver core.
#[derive(Debug, Error, Diagnostic)]
pub enum CraftpackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or malformed pack manifest (`Craftpack.toml`).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your Craftpack.toml for syntax errors"))]
    Manifest { message: String },

    /// The mod index could not be read or parsed.
    #[error("Index error: {message}")]
    #[diagnostic(help("Pass --index or set [index] path in ~/.craftpack/config.toml"))]
    Index { message: String },

    /// Global configuration could not be read or parsed.
    #[error("Config error: {message}")]
    Config { message: String },

    /// Dependency resolution or validation reported blocking problems.
    #[error("Dependency resolution failed: {message}")]
    Resolution { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type CraftpackResult<T> = miette::Result<T>;
