//! Source provenance for stored configuration values.
//!
//! Every key in the store carries a [`Source`] tag recording where its
//! current value came from. The tag is metadata for diagnostics and
//! precedence auditing only — value selection is purely by write order, so
//! there is deliberately no priority accessor here.

use camino::Utf8PathBuf;

/// The provenance of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Written directly through [`set`](crate::ConfigStore::set) by the host.
    Manual,

    /// Written by the CLI scanner.
    Cli {
        /// The argument token that carried the value, e.g. `--config-db.host`.
        token: String,
    },

    /// Written by the environment scanner.
    Env {
        /// The environment variable name, e.g. `MYAPP_DB_HOST`.
        var: String,
    },

    /// Written by a file loader.
    File {
        /// Path of the configuration file.
        path: Utf8PathBuf,
    },

    /// Seeded from a schema default.
    Schema,

    /// Placeholder for a value that was never written.
    Undefined,
}

impl Source {
    /// Create a CLI source.
    pub fn cli(token: impl Into<String>) -> Self {
        Self::Cli {
            token: token.into(),
        }
    }

    /// Create an environment source.
    pub fn env(var: impl Into<String>) -> Self {
        Self::Env { var: var.into() }
    }

    /// Create a file source.
    pub fn file(path: impl Into<Utf8PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Check if this value came from the CLI scanner.
    pub fn is_cli(&self) -> bool {
        matches!(self, Self::Cli { .. })
    }

    /// Check if this value came from the environment scanner.
    pub fn is_env(&self) -> bool {
        matches!(self, Self::Env { .. })
    }

    /// Check if this value came from a file loader.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Check if this value was set manually.
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl core::fmt::Display for Source {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Cli { token } => write!(f, "cli:{token}"),
            Self::Env { var } => write!(f, "env:{var}"),
            Self::File { path } => write!(f, "file:{path}"),
            Self::Schema => write!(f, "schema"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_labels() {
        assert_eq!(Source::Manual.to_string(), "manual");
        assert_eq!(Source::cli("--config-db.host").to_string(), "cli:--config-db.host");
        assert_eq!(Source::env("MYAPP_DB_HOST").to_string(), "env:MYAPP_DB_HOST");
        assert_eq!(Source::file("app.ini").to_string(), "file:app.ini");
        assert_eq!(Source::Undefined.to_string(), "undefined");
    }

    #[test]
    fn predicates() {
        assert!(Source::cli("-v").is_cli());
        assert!(!Source::cli("-v").is_env());
        assert!(Source::env("HOME").is_env());
        assert!(Source::file("a.ini").is_file());
        assert!(Source::Manual.is_manual());
    }
}
