//! Error types for the hexidirect crate

use thiserror::Error;

/// Result type alias for hexidirect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while compiling rules or loading a world
#[derive(Debug, Error)]
pub enum Error {
    /// A canonical rule string could not be parsed
    #[error("Invalid rule syntax in '{rule}': {message}")]
    Syntax {
        /// The offending rule text
        rule: String,
        /// What went wrong
        message: String,
    },

    /// Macro expansion could not rewrite an authored rule
    #[error("Cannot expand rule '{rule}': {message}")]
    Expansion {
        /// The authored rule text
        rule: String,
        /// What went wrong
        message: String,
    },

    /// Direction value outside 1..=6
    #[error("Invalid direction: {0} (expected 1-6)")]
    InvalidDirection(u8),

    /// Malformed cell text such as "a9" or "ab"
    #[error("Invalid cell: {0}")]
    InvalidCell(String),

    /// Reading a configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding a configuration file failed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn syntax(rule: &str, message: impl Into<String>) -> Self {
        Error::Syntax {
            rule: rule.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn expansion(rule: &str, message: impl Into<String>) -> Self {
        Error::Expansion {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}
