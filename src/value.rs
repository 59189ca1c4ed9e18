//! Typed reads over stringly-stored values.
//!
//! The store keeps every value as a raw string; typed interpretation is
//! deferred to read time. The same key may be read as different types at
//! different call sites, so conversion happens per-read against the
//! caller-supplied [`ValueType`], never at write time.

use crate::error::ConfigError;

/// The type a caller expects when reading a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    /// Pass-through; always succeeds.
    #[default]
    String,
    /// Decimal integer, `^-?[0-9]+$` exactly. No floats, no locale parsing.
    Int,
    /// Case-insensitive truthy/falsy word sets.
    Bool,
    /// Comma-separated string, returned verbatim; splitting is left to the
    /// caller by design.
    Array,
}

impl ValueType {
    /// Resolve a string type tag leniently.
    ///
    /// Unrecognized tags log a warning and degrade to [`ValueType::String`]
    /// rather than erroring.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => Self::String,
            "int" => Self::Int,
            "bool" => Self::Bool,
            "array" => Self::Array,
            other => {
                tracing::warn!(tag = other, "unknown value type tag, treating as string");
                Self::String
            }
        }
    }
}

impl core::fmt::Display for ValueType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Array => "array",
        };
        write!(f, "{name}")
    }
}

/// A value read from the store, tagged with its converted type.
///
/// [`Display`](core::fmt::Display) renders the canonical string form:
/// integers in decimal, booleans as `true`/`false`, arrays verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// A raw string.
    Str(String),
    /// A converted integer.
    Int(i64),
    /// A converted boolean.
    Bool(bool),
    /// A comma-separated list, unsplit.
    Array(String),
}

impl ConfigValue {
    /// The raw string if this is a [`Str`](ConfigValue::Str).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer if this is an [`Int`](ConfigValue::Int).
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The boolean if this is a [`Bool`](ConfigValue::Bool).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render the canonical string form, consuming the value.
    pub fn into_string(self) -> String {
        match self {
            Self::Str(s) | Self::Array(s) => s,
            Self::Int(i) => i.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }
}

impl core::fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Str(s) | Self::Array(s) => write!(f, "{s}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Convert a raw stored value to the requested type.
///
/// `key` is only used for error reporting.
pub(crate) fn convert(key: &str, raw: &str, ty: ValueType) -> Result<ConfigValue, ConfigError> {
    match ty {
        ValueType::String => Ok(ConfigValue::Str(raw.to_string())),
        ValueType::Array => Ok(ConfigValue::Array(raw.to_string())),
        ValueType::Int => {
            if is_integer(raw) {
                // The grammar guarantees this parses unless it overflows i64,
                // which we also report as a conversion error.
                raw.parse::<i64>()
                    .map(ConfigValue::Int)
                    .map_err(|_| conversion_error(key, raw, ty))
            } else {
                Err(conversion_error(key, raw, ty))
            }
        }
        ValueType::Bool => match raw.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" | "enabled" => Ok(ConfigValue::Bool(true)),
            "false" | "no" | "0" | "off" | "disabled" | "" => Ok(ConfigValue::Bool(false)),
            _ => Err(conversion_error(key, raw, ty)),
        },
    }
}

fn conversion_error(key: &str, raw: &str, expected: ValueType) -> ConfigError {
    ConfigError::TypeConversion {
        key: key.to_string(),
        value: raw.to_string(),
        expected,
    }
}

/// Match `^-?[0-9]+$` exactly.
fn is_integer(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
