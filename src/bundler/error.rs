//! Error types for MSI packaging operations.
//!
//! Provides contextual error chaining, filesystem-specific errors with path
//! context, and the failure taxonomy of the packaging pipeline.
//!
//! # Features
//!
//! - **Context trait**: Add context to errors similar to anyhow
//! - **ErrorExt trait**: Filesystem operations with automatic path context
//! - **bail! macro**: Early return with formatted error messages

use std::{
    fmt::Display,
    io,
    path::PathBuf,
    process::ExitStatus,
};
use thiserror::Error as DeriveError;

/// Errors returned by the packager.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "reading config file")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// No distribution archive with the expected suffix was found.
    #[error("could not find a *{suffix} archive in {}", dir.display())]
    ArchiveNotFound {
        /// Directory that was scanned
        dir: PathBuf,
        /// Required file name suffix
        suffix: &'static str,
    },

    /// Version string does not look like `vMAJOR.MINOR.PATCH[-OFFSET-gHASH]`.
    #[error("could not parse version string {0}")]
    VersionParse(String),

    /// Repository URL is not hosted on the recognized service.
    #[error("unexpected repository reference {url}")]
    UnexpectedHost {
        /// The repository URL after `.git` stripping
        url: String,
    },

    /// Repository metadata is missing or does not name an owner and repo.
    #[error("invalid repository reference: {0}")]
    InvalidRepository(String),

    /// Malformed resource archive or missing entry.
    #[error("asar archive {}: {reason}", path.display())]
    Asar {
        /// Archive that was being read
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// External tool exited unsuccessfully.
    #[error("{command} exited with {status}")]
    ExternalProcess {
        /// Tool that was run
        command: String,
        /// Its exit status
        status: ExitStatus,
    },

    /// Child process could not be started.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// Required external tool is missing.
    #[error("{tool} not found: {hint}")]
    ToolNotFound {
        /// Tool name
        tool: String,
        /// Where it was expected / how to install it
        hint: String,
    },

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking the application directory.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// ZIP archive extraction error.
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Handlebars template rendering error.
    #[error("{0}")]
    HandleBarsError(#[from] handlebars::RenderError),

    /// Handlebars template parsing error.
    #[error("{0}")]
    Template(#[from] handlebars::TemplateError),

    /// JSON deserialization error (package.json, asar index).
    #[error("{0}")]
    JsonError(#[from] serde_json::error::Error),

    /// YAML parse/serialize error (electron-builder.yml, app-update.yml).
    #[error("{0}")]
    YamlError(#[from] serde_yaml::Error),

    /// URL parsing error.
    #[error("{0}")]
    UrlParse(#[from] url::ParseError),

    /// Background task failed to complete.
    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the packager's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

impl Error {
    /// Returns the innermost error, skipping [`Error::Context`] wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root(),
            other => other,
        }
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($msg.into()))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::error::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::error::Error::GenericError(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_chain_root() {
        let err: Result<()> = Err(Error::VersionParse("garbage".into()));
        let err = err.context("reading app version").unwrap_err();
        assert!(matches!(err.root(), Error::VersionParse(s) if s == "garbage"));
        assert_eq!(
            err.to_string(),
            "reading app version: could not parse version string garbage"
        );
    }

    #[test]
    fn test_fs_context_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Err::<(), _>(io)
            .fs_context("reading file", "/tmp/x.json")
            .unwrap_err();
        assert_eq!(err.to_string(), "reading file /tmp/x.json: gone");
    }
}
