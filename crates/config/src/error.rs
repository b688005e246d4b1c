//! Configuration errors and their human-readable rendering.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why a configuration could not be used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The file could not be read.
    #[error("cannot read config: {message}")]
    Read {
        path: Option<PathBuf>,
        message: String,
    },
    /// The text is not a valid RON configuration.
    #[error("{line}:{col}: {message}")]
    Parse {
        path: Option<PathBuf>,
        /// 1-based.
        line: usize,
        /// 1-based.
        col: usize,
        message: String,
        /// Surrounding source with a caret under the error.
        excerpt: String,
    },
    /// The file parsed but holds a value the host cannot run with.
    #[error("invalid config: {message}")]
    Validation {
        path: Option<PathBuf>,
        message: String,
    },
}

impl Error {
    /// Multi-line report for a terminal: location, message and excerpt.
    pub fn pretty(&self) -> String {
        let place = self
            .path()
            .map_or_else(|| "<config>".to_string(), |p| p.display().to_string());
        match self {
            Self::Read { message, .. } => format!("{place}: cannot read config: {message}"),
            Self::Parse {
                line,
                col,
                message,
                excerpt,
                ..
            } => format!("{place}:{line}:{col}: {message}\n{excerpt}"),
            Self::Validation { message, .. } => format!("{place}: invalid config: {message}"),
        }
    }

    /// File the error came from, if known.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path.as_deref()
            }
        }
    }

    /// Attach `at` unless a path is already set.
    pub(crate) fn at(mut self, at: &Path) -> Self {
        match &mut self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Validation { path, .. } => {
                path.get_or_insert_with(|| at.to_path_buf());
            }
        }
        self
    }
}

/// The line before `line`, `line` itself with a caret under `col`, and the
/// line after.
pub fn excerpt_at(source: &str, line: usize, col: usize) -> String {
    let mut out = String::new();
    for (n, text) in (1..).zip(source.lines()) {
        if n + 1 < line {
            continue;
        }
        if n > line + 1 {
            break;
        }
        out.push_str(&format!("{n:>4} | {text}\n"));
        if n == line {
            out.push_str(&format!("{:>4} | {:>col$}\n", "", "^", col = col.max(1)));
        }
    }
    out
}
