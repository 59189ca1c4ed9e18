//! Error taxonomy for the configuration engine.
//!
//! Every failure is signaled through [`ConfigError`]; the engine never
//! terminates the host process on its own. The soft variants
//! ([`FileUnreadable`](ConfigError::FileUnreadable) and
//! [`UnsupportedFormat`](ConfigError::UnsupportedFormat)) are absorbed by
//! the file loader, which logs and continues with the remaining sources.

use camino::Utf8PathBuf;

use crate::format::FileFormat;
use crate::value::ValueType;

/// An error produced by the configuration engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A key was empty (or whitespace-only) on read or write.
    InvalidKey,

    /// A key was read with no stored value and no default while strict
    /// mode is active.
    UndefinedKey {
        /// The normalized key that was requested.
        key: String,
    },

    /// A stored or default value does not match the grammar of the
    /// requested type.
    TypeConversion {
        /// The normalized key that was read.
        key: String,
        /// The raw value that failed to convert.
        value: String,
        /// The type that was requested.
        expected: ValueType,
    },

    /// A configured file path is missing or unreadable.
    FileUnreadable {
        /// The path that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error message.
        message: String,
    },

    /// The capability needed to flatten this format is not available.
    UnsupportedFormat {
        /// The format that could not be handled.
        format: FileFormat,
    },

    /// A document could not be parsed by an available flattener.
    ParseFailure {
        /// The path of the document.
        path: Utf8PathBuf,
        /// The parser's error message.
        message: String,
    },

    /// Validation found keys with empty values.
    Validation {
        /// The keys whose stored value is the empty string.
        empty_keys: Vec<String>,
    },
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidKey => write!(f, "configuration key must not be empty"),
            ConfigError::UndefinedKey { key } => {
                write!(f, "undefined configuration key '{key}' (strict mode)")
            }
            ConfigError::TypeConversion {
                key,
                value,
                expected,
            } => {
                write!(f, "value '{value}' for key '{key}' is not a valid {expected}")
            }
            ConfigError::FileUnreadable { path, message } => {
                write!(f, "cannot read config file {path}: {message}")
            }
            ConfigError::UnsupportedFormat { format } => {
                write!(f, "no parser available for {format} files")
            }
            ConfigError::ParseFailure { path, message } => {
                write!(f, "error parsing {path}: {message}")
            }
            ConfigError::Validation { empty_keys } => {
                write!(
                    f,
                    "{} key(s) have empty values: {}",
                    empty_keys.len(),
                    empty_keys.join(", ")
                )
            }
        }
    }
}

impl core::error::Error for ConfigError {}
