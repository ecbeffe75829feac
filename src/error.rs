use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading case data or rendering it.
///
/// Nothing is retried and nothing is downgraded to a warning: the first
/// failure aborts the current parse or render call.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or non-numeric data, or a missing header line.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        /// 1-based line number, `0` when the problem is not tied to a line.
        line: usize,
        message: String,
    },

    /// The root of a result tree is missing or unreadable.
    #[error("cannot read directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A column or tree key was requested that does not exist.
    #[error("key '{key}' not found (available: {})", available.join(", "))]
    KeyNotFound { key: String, available: Vec<String> },

    /// Invalid selector, style list or configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Reading an input file or writing an output file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The plotting backend failed while drawing or saving.
    #[error("failed to draw plot: {0}")]
    Plot(String),

    /// The interactive window could not be opened.
    #[error("failed to display plot: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn key_not_found<I, S>(key: impl Into<String>, available: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Error::KeyNotFound {
            key: key.into(),
            available: available.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_not_found_lists_available_keys() {
        let err = Error::key_not_found("p", ["x", "U"]);
        assert_eq!(err.to_string(), "key 'p' not found (available: x, U)");
    }

    #[test]
    fn parse_error_mentions_location() {
        let err = Error::parse("case/bottom.xy", 4, "'abc' is not a number");
        assert_eq!(err.to_string(), "case/bottom.xy:4: 'abc' is not a number");
    }
}
