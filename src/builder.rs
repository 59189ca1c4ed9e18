//! Builder API and load orchestration.
//!
//! [`ConfigBuilder`] assembles the store, the mapping registries and the
//! flattening capability, then [`load`](ConfigBuilder::load) runs the
//! loaders in the documented order — files (as listed), then environment,
//! then CLI — so that later sources overwrite earlier ones. That order *is*
//! the priority model; anything that reorders these calls breaks
//! precedence. A manual [`set`](crate::ConfigStore::set) after loading is
//! necessarily the last write and always wins.

use camino::Utf8PathBuf;

use crate::format::{DocumentFlattener, Flattener};
use crate::layers::cli::{parse_cli_args, CliOutcome};
use crate::layers::env::{load_env, EnvSource, StdEnv};
use crate::layers::file::load_files;
use crate::overrides::{OverrideKind, Overrides};
use crate::store::ConfigStore;

/// The result of a full layered load.
#[derive(Debug)]
pub struct Loaded {
    /// The populated store.
    pub store: ConfigStore,
    /// The mapping registries, returned for reuse in later rescans.
    pub overrides: Overrides,
    /// Argument tokens the CLI scanner did not own.
    pub remaining: Vec<String>,
}

/// Fluent construction of a layered configuration load.
pub struct ConfigBuilder {
    files: Vec<Utf8PathBuf>,
    overrides: Overrides,
    case_sensitive: bool,
    strict: bool,
    auto_transform: bool,
    env_source: Box<dyn EnvSource>,
    flattener: Box<dyn Flattener>,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    /// Start a builder with default modes, the process environment, and
    /// the serde-backed flattener.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            overrides: Overrides::new(),
            case_sensitive: false,
            strict: false,
            auto_transform: true,
            env_source: Box::new(StdEnv),
            flattener: Box::new(DocumentFlattener),
        }
    }

    /// Append a configuration file. Files load in the order given; later
    /// files overwrite earlier ones.
    pub fn file(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Append several configuration files.
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Utf8PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Register an environment variable prefix (e.g. `MYAPP_`).
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.overrides.add_env_prefix(prefix);
        self
    }

    /// Register an environment variable suffix (e.g. `_CONFIG`).
    pub fn env_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.overrides.add_env_suffix(suffix);
        self
    }

    /// Map an exact environment variable name to a config key.
    pub fn map_env(mut self, var: &str, target_key: &str) -> Self {
        self.overrides.define(OverrideKind::Env, var, target_key);
        self
    }

    /// Map a long CLI option to a config key.
    pub fn map_cli(mut self, token: &str, target_key: &str) -> Self {
        self.overrides.define(OverrideKind::Cli, token, target_key);
        self
    }

    /// Map a single-character CLI flag to a config key.
    pub fn map_short(mut self, flag: char, target_key: &str) -> Self {
        self.overrides
            .define(OverrideKind::Short, &flag.to_string(), target_key);
        self
    }

    /// Enable case-sensitive keys.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// Enable strict-undefined mode.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Disable kebab→dot auto-transform in the scanners.
    pub fn no_auto_transform(mut self) -> Self {
        self.auto_transform = false;
        self
    }

    /// Use a custom environment source (for testing).
    pub fn env_source(mut self, source: impl EnvSource + 'static) -> Self {
        self.env_source = Box::new(source);
        self
    }

    /// Use a custom flattening capability.
    pub fn flattener(mut self, flattener: impl Flattener + 'static) -> Self {
        self.flattener = Box::new(flattener);
        self
    }

    /// Run the full load: files (listed order, then argv-supplied), then
    /// environment, then CLI.
    ///
    /// The argument vector is pre-scanned for `--config-file` occurrences
    /// and engine flags so those take effect *before* the file layer runs,
    /// while the value-carrying CLI writes still land last.
    pub fn load<I, S>(self, args: I) -> Loaded
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        let mut store = ConfigStore::new();
        store.set_case_sensitive(self.case_sensitive);
        store.set_strict(self.strict);
        store.set_auto_transform(self.auto_transform);

        let mut files = self.files;
        prescan(&mut store, &args, &mut files);

        load_files(&mut store, &files, self.flattener.as_ref());
        load_env(&mut store, &self.overrides, self.env_source.as_ref());
        let CliOutcome { remaining, .. } = parse_cli_args(&mut store, &self.overrides, &args);

        Loaded {
            store,
            overrides: self.overrides,
            remaining,
        }
    }
}

/// Extract `--config-file` paths and engine flags from the argument vector
/// before the file layer runs. The main CLI scan later re-consumes these
/// tokens; its file list is ignored since the files are already loaded.
fn prescan(store: &mut ConfigStore, args: &[String], files: &mut Vec<Utf8PathBuf>) {
    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        if arg == "--" {
            break;
        }
        match arg {
            "--strict-config" => store.set_strict(true),
            "--permissive-config" => store.set_strict(false),
            "--auto-transform-keys" => store.set_auto_transform(true),
            "--no-auto-transform-keys" => store.set_auto_transform(false),
            "--config-file" => {
                if let Some(path) = args.get(i + 1) {
                    files.push(Utf8PathBuf::from(path));
                    i += 1;
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--config-file=") {
                    files.push(Utf8PathBuf::from(path));
                }
            }
        }
        i += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::env::MockEnv;

    #[test]
    fn builder_load_with_no_sources_is_empty() {
        let loaded = ConfigBuilder::new()
            .env_source(MockEnv::new())
            .load(Vec::<String>::new());
        assert!(loaded.store.is_empty());
        assert!(loaded.remaining.is_empty());
    }

    #[test]
    fn modes_reach_the_store() {
        let loaded = ConfigBuilder::new()
            .strict()
            .case_sensitive()
            .no_auto_transform()
            .env_source(MockEnv::new())
            .load(Vec::<String>::new());
        assert!(loaded.store.strict());
        assert!(loaded.store.case_sensitive());
        assert!(!loaded.store.auto_transform());
    }

    #[test]
    fn engine_flags_are_applied_before_loading() {
        let env = MockEnv::from_pairs([("APP_SOME_KEY", "v")]);
        let loaded = ConfigBuilder::new()
            .env_source(env)
            .load(["--no-auto-transform-keys"].map(String::from));
        // The pre-scan disabled auto-transform before the env layer ran.
        assert!(!loaded.store.auto_transform());
        assert_eq!(loaded.store.get("some.key").unwrap(), "v");
    }

    #[test]
    fn env_overwrites_files_and_cli_overwrites_env() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::with_suffix(".ini").unwrap();
        write!(file, "app.name=FileApp\napp.port=1\n").unwrap();
        let path = Utf8PathBuf::from_path_buf(file.path().to_path_buf()).unwrap();

        let env = MockEnv::from_pairs([("CONFIG_APP_NAME", "EnvApp")]);
        let loaded = ConfigBuilder::new()
            .file(path)
            .env_source(env)
            .load(["--config-app.name=CliApp"].map(String::from));

        assert_eq!(loaded.store.get("app.name").unwrap(), "CliApp");
        assert!(loaded.store.source("app.name").unwrap().is_cli());
        // Untouched by env/CLI, still the file value.
        assert_eq!(loaded.store.get("app.port").unwrap(), "1");
        assert!(loaded.store.source("app.port").unwrap().is_file());
    }

    #[test]
    fn manual_set_after_load_always_wins() {
        let env = MockEnv::from_pairs([("APP_NAME", "EnvApp")]);
        let loaded = ConfigBuilder::new().env_source(env).load(Vec::<String>::new());
        let mut store = loaded.store;
        assert_eq!(store.get("name").unwrap(), "EnvApp");
        store.set_manual("name", "Override").unwrap();
        assert_eq!(store.get("name").unwrap(), "Override");
        assert!(store.source("name").unwrap().is_manual());
    }

    #[test]
    fn argv_config_file_loads_at_file_priority() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::with_suffix(".ini").unwrap();
        write!(file, "from.argv=yes\n").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let env = MockEnv::from_pairs([("APP_FROM_ARGV", "env-wins")]);
        let loaded = ConfigBuilder::new()
            .env_source(env)
            .load(["--config-file".to_string(), path]);

        // Loaded, but overwritten by the env layer that runs afterwards.
        assert_eq!(loaded.store.get("from.argv").unwrap(), "env-wins");
        assert!(loaded.store.source("from.argv").unwrap().is_env());
    }
}
