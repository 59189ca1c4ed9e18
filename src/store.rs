//! The configuration store: an ordered key→(value, source) map.
//!
//! This is an explicit struct owned by the caller — there is no hidden
//! module-level singleton, so every test can build a fresh store and the
//! loaders in [`crate::layers`] take it by mutable reference.
//!
//! Resolution is by **write order**: whichever source writes a key last
//! wins, unconditionally. Priority between files, environment and CLI is a
//! call-order protocol enforced by [`ConfigBuilder::load`](crate::ConfigBuilder::load),
//! not a property of the data model; the [`Source`] tag on each entry is
//! diagnostics metadata and never participates in value selection.

use indexmap::IndexMap;

use crate::error::ConfigError;
use crate::key::normalize;
use crate::source::Source;
use crate::value::{self, ConfigValue, ValueType};

/// A stored value together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The raw string value. Typed interpretation is deferred to read time.
    pub value: String,
    /// Where the current value came from.
    pub source: Source,
}

/// The multi-source key/value store.
///
/// Keys are normalized dot-delimited paths; values are raw strings with
/// lazy typed reads ([`get_typed`](ConfigStore::get_typed)).
#[derive(Debug)]
pub struct ConfigStore {
    entries: IndexMap<String, Entry>,
    case_sensitive: bool,
    strict: bool,
    auto_transform: bool,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    /// Create an empty store with default modes: case-insensitive keys,
    /// permissive reads, kebab→dot auto-transform enabled.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            case_sensitive: false,
            strict: false,
            auto_transform: true,
        }
    }

    // ------------------------------------------------------------------
    // Engine-wide modes
    // ------------------------------------------------------------------

    /// Whether keys are case-sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Enable or disable case-sensitive keys.
    ///
    /// Changing this does not re-normalize existing entries; set it before
    /// loading.
    pub fn set_case_sensitive(&mut self, on: bool) {
        self.case_sensitive = on;
    }

    /// Whether strict-undefined mode is active.
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Enable or disable strict-undefined mode: reading an absent key with
    /// no default becomes an error instead of an empty value.
    pub fn set_strict(&mut self, on: bool) {
        self.strict = on;
    }

    /// Whether kebab→dot auto-transform is enabled for the scanners.
    pub fn auto_transform(&self) -> bool {
        self.auto_transform
    }

    /// Enable or disable kebab→dot auto-transform.
    pub fn set_auto_transform(&mut self, on: bool) {
        self.auto_transform = on;
    }

    // ------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------

    /// Write a value with its source, overwriting any prior entry.
    ///
    /// Value and source are replaced together; there is no partial update.
    /// Fails only with [`ConfigError::InvalidKey`] when the key is empty
    /// after normalization.
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<String>,
        source: Source,
    ) -> Result<(), ConfigError> {
        let key = normalize(key, self.case_sensitive);
        if key.is_empty() {
            return Err(ConfigError::InvalidKey);
        }
        let value = value.into();
        tracing::debug!(key = %key, source = %source, "set");
        self.entries.insert(key, Entry { value, source });
        Ok(())
    }

    /// Write a value with [`Source::Manual`] provenance.
    pub fn set_manual(&mut self, key: &str, value: impl Into<String>) -> Result<(), ConfigError> {
        self.set(key, value, Source::Manual)
    }

    /// Write a pre-normalized key without the empty-key check.
    ///
    /// Used by the INI loader, whose grammar already guarantees a non-empty
    /// well-formed key.
    pub(crate) fn insert_unchecked(&mut self, key: String, value: String, source: Source) {
        let key = normalize(&key, self.case_sensitive);
        self.entries.insert(key, Entry { value, source });
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Read a key as a string with an empty default.
    ///
    /// Under strict mode an absent key is [`ConfigError::UndefinedKey`];
    /// otherwise an absent key reads as the empty string.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        self.get_typed(key, "", ValueType::String)
            .map(ConfigValue::into_string)
    }

    /// Read a key as a string, falling back to `default` when absent.
    ///
    /// With an empty `default` under strict mode this behaves like
    /// permissive [`get`](ConfigStore::get) and returns the empty string.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        match self.get_typed(key, default, ValueType::String) {
            Ok(v) => v.into_string(),
            Err(_) => default.to_string(),
        }
    }

    /// Read a key with a default and a requested type.
    ///
    /// Resolution order:
    /// 1. the stored value, if the key is present;
    /// 2. else `default`, if non-empty (the store is not consulted for its
    ///    source — the key is simply absent);
    /// 3. else [`ConfigError::UndefinedKey`] under strict mode, or the
    ///    empty string otherwise.
    ///
    /// The chosen raw string is then converted; a grammar mismatch is
    /// [`ConfigError::TypeConversion`] and no value is returned — the
    /// default is *not* silently substituted for an unconvertible stored
    /// value.
    pub fn get_typed(
        &self,
        key: &str,
        default: &str,
        ty: ValueType,
    ) -> Result<ConfigValue, ConfigError> {
        let key = normalize(key, self.case_sensitive);
        if key.is_empty() {
            return Err(ConfigError::InvalidKey);
        }
        let raw = match self.entries.get(&key) {
            Some(entry) => entry.value.as_str(),
            None if !default.is_empty() => default,
            None if self.strict => {
                return Err(ConfigError::UndefinedKey { key });
            }
            None => "",
        };
        value::convert(&key, raw, ty)
    }

    /// Read a key with a string type tag (`"string"`, `"int"`, `"bool"`,
    /// `"array"`).
    ///
    /// Unrecognized tags log a warning and fall back to a plain string
    /// read.
    pub fn get_tagged(
        &self,
        key: &str,
        default: &str,
        tag: &str,
    ) -> Result<ConfigValue, ConfigError> {
        self.get_typed(key, default, ValueType::from_tag(tag))
    }

    /// The provenance of a key's current value, if present.
    pub fn source(&self, key: &str) -> Option<&Source> {
        let key = normalize(key, self.case_sensitive);
        self.entries.get(&key).map(|e| &e.source)
    }

    /// Whether a key has a stored value.
    pub fn contains(&self, key: &str) -> bool {
        let key = normalize(key, self.case_sensitive);
        self.entries.contains_key(&key)
    }

    /// Iterate stored keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate `(key, entry)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove all entries. Modes are left untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // ------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------

    /// Flag every key whose stored value is the empty string.
    ///
    /// Non-fatal per key: all offenders are collected (and logged) before
    /// the single [`ConfigError::Validation`] is returned. Deliberately
    /// shallow — no schema, type or range checking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let empty_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, e)| e.value.is_empty())
            .map(|(k, e)| {
                tracing::warn!(key = %k, source = %e.source, "empty configuration value");
                k.clone()
            })
            .collect();
        if empty_keys.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation { empty_keys })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_identity() {
        let mut store = ConfigStore::new();
        store.set_manual("db.host", "example.com").unwrap();
        assert_eq!(store.get("db.host").unwrap(), "example.com");
    }

    #[test]
    fn empty_key_is_invalid() {
        let mut store = ConfigStore::new();
        assert_eq!(store.set_manual("", "x"), Err(ConfigError::InvalidKey));
        assert_eq!(store.set_manual("   ", "x"), Err(ConfigError::InvalidKey));
        assert_eq!(store.get(""), Err(ConfigError::InvalidKey));
    }

    #[test]
    fn keys_fold_case_by_default() {
        let mut store = ConfigStore::new();
        store.set_manual("Db.Host", "a").unwrap();
        assert_eq!(store.get("db.host").unwrap(), "a");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn case_sensitive_mode_keeps_distinct_keys() {
        let mut store = ConfigStore::new();
        store.set_case_sensitive(true);
        store.set_manual("Db.Host", "a").unwrap();
        store.set_manual("db.host", "b").unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("Db.Host").unwrap(), "a");
    }

    #[test]
    fn last_write_wins_regardless_of_source() {
        let mut store = ConfigStore::new();
        store.set("app.name", "CliApp", Source::cli("--config-app.name")).unwrap();
        store.set("app.name", "FileApp", Source::file("app.ini")).unwrap();
        assert_eq!(store.get("app.name").unwrap(), "FileApp");
        assert!(store.source("app.name").unwrap().is_file());
    }

    #[test]
    fn value_and_source_replaced_together() {
        let mut store = ConfigStore::new();
        store.set("k", "v1", Source::env("K")).unwrap();
        store.set_manual("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), "v2");
        assert!(store.source("k").unwrap().is_manual());
    }

    #[test]
    fn absent_key_reads_empty_when_permissive() {
        let store = ConfigStore::new();
        assert_eq!(store.get("missing").unwrap(), "");
    }

    #[test]
    fn absent_key_errors_when_strict() {
        let mut store = ConfigStore::new();
        store.set_strict(true);
        assert_eq!(
            store.get("missing"),
            Err(ConfigError::UndefinedKey {
                key: "missing".into()
            })
        );
    }

    #[test]
    fn nonempty_default_satisfies_strict_mode() {
        let mut store = ConfigStore::new();
        store.set_strict(true);
        assert_eq!(store.get_or("missing", "fallback"), "fallback");
    }

    #[test]
    fn stored_value_beats_default() {
        let mut store = ConfigStore::new();
        store.set_manual("x", "42").unwrap();
        let v = store.get_typed("x", "0", ValueType::Int).unwrap();
        assert_eq!(v.to_string(), "42");
    }

    #[test]
    fn bad_stored_value_is_an_error_not_the_default() {
        let mut store = ConfigStore::new();
        store.set_manual("x", "abc").unwrap();
        let err = store.get_typed("x", "0", ValueType::Int).unwrap_err();
        assert!(matches!(err, ConfigError::TypeConversion { .. }));
    }

    #[test]
    fn default_is_also_type_checked() {
        let store = ConfigStore::new();
        assert!(store.get_typed("missing", "not-a-number", ValueType::Int).is_err());
        assert_eq!(
            store.get_typed("missing", "8080", ValueType::Int).unwrap(),
            ConfigValue::Int(8080)
        );
    }

    #[test]
    fn bool_reads_render_canonical_strings() {
        let mut store = ConfigStore::new();
        store.set_manual("a", "yes").unwrap();
        store.set_manual("b", "No").unwrap();
        assert_eq!(store.get_typed("a", "", ValueType::Bool).unwrap().to_string(), "true");
        assert_eq!(store.get_typed("b", "", ValueType::Bool).unwrap().to_string(), "false");
        store.set_manual("c", "maybe").unwrap();
        assert!(store.get_typed("c", "", ValueType::Bool).is_err());
    }

    #[test]
    fn tagged_reads_degrade_gracefully() {
        let mut store = ConfigStore::new();
        store.set_manual("x", "not a float").unwrap();
        // Unknown tag: warn + raw string, not an error.
        assert_eq!(store.get_tagged("x", "", "float").unwrap().to_string(), "not a float");
    }

    #[test]
    fn validate_collects_empty_values() {
        let mut store = ConfigStore::new();
        store.set_manual("a", "1").unwrap();
        store.set_manual("b", "").unwrap();
        store.set_manual("c", "").unwrap();
        match store.validate() {
            Err(ConfigError::Validation { empty_keys }) => {
                assert_eq!(empty_keys, vec!["b".to_string(), "c".to_string()]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn validate_passes_on_clean_store() {
        let mut store = ConfigStore::new();
        store.set_manual("a", "1").unwrap();
        assert!(store.validate().is_ok());
    }
}
