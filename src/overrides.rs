//! Explicit mapping registries for the environment and CLI scanners.
//!
//! The host application registers exact-match associations between external
//! names and config keys before configuration loading. Explicit mappings
//! are checked before any prefix/suffix pattern matching and short-circuit
//! it. The registries are append-only: a mapping can be replaced by
//! re-defining it, but never removed.

use indexmap::IndexMap;

/// Which registry a mapping targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideKind {
    /// Environment variable name → config key.
    Env,
    /// Long CLI token (e.g. `--verbose`) → config key.
    Cli,
    /// Single-character CLI flag → config key.
    Short,
}

/// The mapping registries, kept separate from the store's entry data.
#[derive(Debug, Default)]
pub struct Overrides {
    env: IndexMap<String, String>,
    cli: IndexMap<String, String>,
    short: IndexMap<char, String>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl Overrides {
    /// Create empty registries.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an explicit mapping from an external name to a config key.
    ///
    /// For [`OverrideKind::Cli`] the source may be given with or without
    /// the leading `--`; it is stored normalized with it. For
    /// [`OverrideKind::Short`] only the first character of `source` is
    /// used (a leading `-` is ignored).
    pub fn define(&mut self, kind: OverrideKind, source: &str, target_key: &str) {
        let target = target_key.to_string();
        match kind {
            OverrideKind::Env => {
                self.env.insert(source.to_string(), target);
            }
            OverrideKind::Cli => {
                let token = if source.starts_with("--") {
                    source.to_string()
                } else {
                    format!("--{source}")
                };
                self.cli.insert(token, target);
            }
            OverrideKind::Short => {
                if let Some(c) = source.trim_start_matches('-').chars().next() {
                    self.short.insert(c, target);
                }
            }
        }
    }

    /// Register an environment variable prefix, e.g. `MYAPP_`.
    ///
    /// Scanned in registration order; the first matching prefix wins.
    pub fn add_env_prefix(&mut self, prefix: impl Into<String>) {
        self.prefixes.push(prefix.into());
    }

    /// Register an environment variable suffix, e.g. `_CONFIG`.
    pub fn add_env_suffix(&mut self, suffix: impl Into<String>) {
        self.suffixes.push(suffix.into());
    }

    /// The config key explicitly mapped to this environment variable.
    pub fn env_target(&self, var: &str) -> Option<&str> {
        self.env.get(var).map(String::as_str)
    }

    /// The config key explicitly mapped to this long CLI token
    /// (with leading `--`).
    pub fn cli_target(&self, token: &str) -> Option<&str> {
        self.cli.get(token).map(String::as_str)
    }

    /// The config key mapped to this short flag character.
    pub fn short_target(&self, flag: char) -> Option<&str> {
        self.short.get(&flag).map(String::as_str)
    }

    /// Registered environment prefixes, in registration order.
    pub fn env_prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Registered environment suffixes, in registration order.
    pub fn env_suffixes(&self) -> &[String] {
        &self.suffixes
    }
}
