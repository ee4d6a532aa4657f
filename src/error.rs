//! Domain-specific error types.
//!
//! - `CliError`: argument parsing and validation errors.
//! - `ConfigError`: `.cstructinfo.toml` loading/parsing errors.
//! - `ParseError`: a translation unit failed to parse.
//! - `ExtractError`: extraction/flowchart-building failures.
//! - `AppError`: top-level error encompassing all of the above, with an
//!   exit code mapping for `main`.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no input files given")]
    NoInputFiles,

    #[error("invalid argument value: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration file {}: {source}", .path.display())]
    InvalidConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not read {}: {source}", .path.display())]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parser produced no usable syntax tree for {}", .path.display())]
    NoSyntaxTree { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("{0}")]
    Failed(String),
}

/// Top-level application error.
///
/// `ConfigError` has no variant here: a malformed or unreadable
/// `.cstructinfo.toml` is never fatal (see [`crate::config`]), so it never
/// reaches this boundary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Cli(#[from] CliError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Extract(#[from] ExtractError),
}

impl AppError {
    /// Process exit code for this error: 1 for input/parse/extract
    /// failures, 2 for CLI usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Cli(_) => 2,
            AppError::Parse(_) | AppError::Extract(_) => 1,
        }
    }
}
