//! Top-level error types for the packager binary.

use crate::bundler::Error as PackagingError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for a CLI run
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors writing terminal output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Packaging errors
    #[error("{0}")]
    Bundler(#[from] PackagingError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        let BundlerError::Bundler(error) = self else {
            return vec!["Run with --help for usage".to_string()];
        };
        match error.root() {
            PackagingError::ArchiveNotFound { dir, .. } => vec![
                format!("Run electron-builder with the zip target so it writes into {}", dir.display()),
                "Or point --dist-dir at the directory holding the archive".to_string(),
            ],
            PackagingError::ToolNotFound { .. } => vec![
                "Install the WiX 3 toolset and pass its bin directory to --wix-dir".to_string(),
            ],
            PackagingError::UnexpectedHost { .. } | PackagingError::InvalidRepository(_) => vec![
                "Set package.json \"repository\" to https://github.com/<owner>/<repo>".to_string(),
            ],
            PackagingError::VersionParse(_) => vec![
                "Use a MAJOR.MINOR.PATCH version in package.json".to_string(),
            ],
            PackagingError::ExternalProcess { .. } => vec![
                "See the tool output above for details".to_string(),
            ],
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}
