//! Environment variable scanning.
//!
//! For every variable visible to the process, the first matching rule wins:
//!
//! 1. An explicit mapping registered for the exact variable name
//!    short-circuits everything else.
//! 2. A registered prefix (`MYAPP_` …): strip it, transform the remainder
//!    to dot notation, write. First matching prefix wins.
//! 3. A registered suffix (`_CONFIG` …), symmetric by trailing match.
//! 4. The legacy patterns `APP_*`, `CONFIG_*` and `*_CONFIG`.
//! 5. Otherwise the variable is ignored.
//!
//! Variables are scanned in sorted name order, so when two variables map
//! onto the same config key the lexicographically later name wins
//! deterministically.

use indexmap::IndexMap;

use crate::key::{normalize, transform, KeyFormat};
use crate::overrides::Overrides;
use crate::source::Source;
use crate::store::ConfigStore;

/// Legacy affixes checked when no registered prefix or suffix matched.
const LEGACY_PREFIXES: [&str; 2] = ["APP_", "CONFIG_"];
const LEGACY_SUFFIXES: [&str; 1] = ["_CONFIG"];

// ============================================================================
// EnvSource trait
// ============================================================================

/// Abstraction over environment variable sources.
///
/// This allows testing without modifying the actual environment.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;

    /// Iterate over all environment variables.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(std::env::vars())
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set an environment variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

// ============================================================================
// Scanning
// ============================================================================

/// Scan the environment into the store.
///
/// Each variable maps independently; only the explicit-vs-pattern
/// precedence within a single variable matters. Writes carry
/// `env:<NAME>` provenance.
pub fn load_env(store: &mut ConfigStore, overrides: &Overrides, source: &dyn EnvSource) {
    let mut vars: Vec<(String, String)> = source.vars().collect();
    vars.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, value) in vars {
        // Rule 1: explicit mapping short-circuits.
        if let Some(target) = overrides.env_target(&name) {
            let target = target.to_string();
            write_env(store, &target, &value, &name);
            continue;
        }

        // Rule 2: registered prefixes, first match wins.
        if let Some(rest) = overrides
            .env_prefixes()
            .iter()
            .find_map(|p| name.strip_prefix(p.as_str()))
        {
            scan_remainder(store, rest, &value, &name);
            continue;
        }

        // Rule 3: registered suffixes, symmetric.
        if let Some(rest) = overrides
            .env_suffixes()
            .iter()
            .find_map(|s| name.strip_suffix(s.as_str()))
        {
            scan_remainder(store, rest, &value, &name);
            continue;
        }

        // Rule 4: legacy affix patterns.
        let legacy = LEGACY_PREFIXES
            .iter()
            .find_map(|p| name.strip_prefix(p))
            .or_else(|| LEGACY_SUFFIXES.iter().find_map(|s| name.strip_suffix(s)));
        if let Some(rest) = legacy {
            scan_remainder(store, rest, &value, &name);
            continue;
        }

        // Rule 5: not ours.
        tracing::debug!(var = %name, "environment variable ignored");
    }
}

/// Transform a stripped variable remainder into a dot key and write it.
fn scan_remainder(store: &mut ConfigStore, rest: &str, value: &str, var: &str) {
    if rest.is_empty() {
        tracing::warn!(var = %var, "environment variable is empty after affix strip");
        return;
    }
    let key = if store.auto_transform() {
        transform(rest, KeyFormat::Dot)
    } else {
        rest.to_lowercase().replace('_', ".")
    };
    write_env(store, &key, value, var);
}

fn write_env(store: &mut ConfigStore, key: &str, value: &str, var: &str) {
    let key = normalize(key, store.case_sensitive());
    if store.set(&key, value, Source::env(var)).is_err() {
        tracing::warn!(var = %var, "environment variable maps to an empty key");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overrides::OverrideKind;

    fn store() -> ConfigStore {
        ConfigStore::new()
    }

    #[test]
    fn explicit_mapping_short_circuits_prefixes() {
        let mut ov = Overrides::new();
        ov.define(OverrideKind::Env, "MYAPP_DB_URL", "database.url");
        ov.add_env_prefix("MYAPP_");
        let env = MockEnv::from_pairs([("MYAPP_DB_URL", "postgres://x")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        // Written to the mapped key, not the prefix-derived db.url.
        assert_eq!(store.get("database.url").unwrap(), "postgres://x");
        assert!(!store.contains("db.url"));
        assert_eq!(
            store.source("database.url").unwrap().to_string(),
            "env:MYAPP_DB_URL"
        );
    }

    #[test]
    fn registered_prefix_strips_and_transforms() {
        let mut ov = Overrides::new();
        ov.add_env_prefix("MYAPP_");
        let env = MockEnv::from_pairs([("MYAPP_DB_HOST", "h"), ("UNRELATED", "x")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("db.host").unwrap(), "h");
        assert!(!store.contains("unrelated"));
    }

    #[test]
    fn first_matching_prefix_wins() {
        let mut ov = Overrides::new();
        ov.add_env_prefix("MYAPP_DB_");
        ov.add_env_prefix("MYAPP_");
        let env = MockEnv::from_pairs([("MYAPP_DB_HOST", "h")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("host").unwrap(), "h");
        assert!(!store.contains("db.host"));
    }

    #[test]
    fn registered_suffix_matches_trailing() {
        let mut ov = Overrides::new();
        ov.add_env_suffix("_SETTING");
        let env = MockEnv::from_pairs([("TIMEOUT_SETTING", "30")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("timeout").unwrap(), "30");
    }

    #[test]
    fn legacy_patterns_apply_without_registrations() {
        let ov = Overrides::new();
        let env = MockEnv::from_pairs([
            ("APP_NAME", "demo"),
            ("CONFIG_DB_PORT", "5432"),
            ("CACHE_CONFIG", "lru"),
            ("SOMETHING_ELSE", "no"),
        ]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("name").unwrap(), "demo");
        assert_eq!(store.get("db.port").unwrap(), "5432");
        assert_eq!(store.get("cache").unwrap(), "lru");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn auto_transform_disabled_still_dots_underscores() {
        let mut ov = Overrides::new();
        ov.add_env_prefix("MYAPP_");
        let env = MockEnv::from_pairs([("MYAPP_DB_HOST", "h")]);

        let mut store = store();
        store.set_auto_transform(false);
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("db.host").unwrap(), "h");
    }

    #[test]
    fn bare_affix_is_skipped_with_warning() {
        let mut ov = Overrides::new();
        ov.add_env_prefix("MYAPP_");
        let env = MockEnv::from_pairs([("MYAPP_", "oops")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert!(store.is_empty());
    }

    #[test]
    fn same_destination_key_resolves_by_sorted_name_order() {
        let mut ov = Overrides::new();
        ov.add_env_prefix("A_");
        ov.add_env_prefix("B_");
        // Both map to "port"; B_PORT sorts after A_PORT so it wins.
        let env = MockEnv::from_pairs([("B_PORT", "2"), ("A_PORT", "1")]);

        let mut store = store();
        load_env(&mut store, &ov, &env);

        assert_eq!(store.get("port").unwrap(), "2");
        assert_eq!(store.source("port").unwrap().to_string(), "env:B_PORT");
    }
}
