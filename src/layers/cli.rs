//! CLI argument scanning.
//!
//! The scanner shares the argument vector with the host program's own
//! option parser: it walks left-to-right, consumes only the tokens it owns,
//! and hands everything else back untouched in
//! [`CliOutcome::remaining`]. Each matched rule decides whether it consumed
//! one or two tokens so the scan pointer always advances correctly.
//!
//! Recognized shapes, in precedence order:
//!
//! 1. `--config-file PATH` / `--config-file=PATH` — appended to the
//!    file-load list, no store write.
//! 2. Engine flags: `--strict-config`, `--permissive-config`,
//!    `--auto-transform-keys`, `--no-auto-transform-keys`.
//! 3. `--config-KEY=VALUE` / `--config-KEY VALUE`.
//! 4. `-x VALUE` for a registered short mapping.
//! 5. A long option with an explicit CLI mapping (`=value`, separate
//!    argument, or bare flag meaning `"true"`).
//! 6. A long option with an internal hyphen and an explicit value, when
//!    kebab→dot auto-transform is enabled.
//! 7. Anything else is returned to the caller.

use camino::Utf8PathBuf;

use crate::key::{normalize, transform, KeyFormat};
use crate::overrides::Overrides;
use crate::source::Source;
use crate::store::ConfigStore;

/// The fixed prefix of rule-3 value tokens and the rule-1 file flag.
const CONFIG_PREFIX: &str = "--config-";
const CONFIG_FILE_FLAG: &str = "--config-file";

/// What the scanner consumed and what it left behind.
#[derive(Debug, Default)]
pub struct CliOutcome {
    /// Tokens the scanner does not own, in their original order.
    pub remaining: Vec<String>,
    /// Paths collected from `--config-file` occurrences, in order.
    pub config_files: Vec<Utf8PathBuf>,
}

/// Scan an argument vector into the store.
///
/// Writes carry `cli:<token>` provenance where the token is the flag
/// (without its value). For priority to hold, invoke this after the file
/// and environment loaders.
pub fn parse_cli_args(
    store: &mut ConfigStore,
    overrides: &Overrides,
    args: &[String],
) -> CliOutcome {
    let mut scan = Scanner {
        store,
        overrides,
        args,
        index: 0,
        outcome: CliOutcome::default(),
    };
    scan.run();
    scan.outcome
}

/// Scanner state over the argument vector.
struct Scanner<'a> {
    store: &'a mut ConfigStore,
    overrides: &'a Overrides,
    args: &'a [String],
    index: usize,
    outcome: CliOutcome,
}

impl Scanner<'_> {
    fn run(&mut self) {
        while self.index < self.args.len() {
            let arg = &self.args[self.index];

            // Everything after `--` belongs to the host.
            if arg == "--" {
                self.outcome
                    .remaining
                    .extend(self.args[self.index..].iter().cloned());
                return;
            }

            if self.config_file(arg)
                || self.engine_flag(arg)
                || self.config_value(arg)
                || self.short_mapping(arg)
                || self.cli_mapping(arg)
                || self.hyphenated(arg)
            {
                continue;
            }

            self.outcome.remaining.push(arg.clone());
            self.index += 1;
        }
    }

    /// The next token, if it exists and does not look like a flag.
    fn lookahead_value(&self) -> Option<&str> {
        self.args
            .get(self.index + 1)
            .map(String::as_str)
            .filter(|next| !next.starts_with('-'))
    }

    /// Rule 1: `--config-file`.
    fn config_file(&mut self, arg: &str) -> bool {
        if let Some(path) = arg.strip_prefix(CONFIG_FILE_FLAG) {
            if let Some(path) = path.strip_prefix('=') {
                self.outcome.config_files.push(Utf8PathBuf::from(path));
                self.index += 1;
                return true;
            }
            if path.is_empty() {
                match self.args.get(self.index + 1) {
                    Some(next) => {
                        self.outcome.config_files.push(Utf8PathBuf::from(next));
                        self.index += 2;
                    }
                    None => {
                        tracing::warn!("--config-file given without a path");
                        self.index += 1;
                    }
                }
                return true;
            }
        }
        false
    }

    /// Rule 2: engine-wide mode flags.
    fn engine_flag(&mut self, arg: &str) -> bool {
        match arg {
            "--strict-config" => self.store.set_strict(true),
            "--permissive-config" => self.store.set_strict(false),
            "--auto-transform-keys" => self.store.set_auto_transform(true),
            "--no-auto-transform-keys" => self.store.set_auto_transform(false),
            _ => return false,
        }
        self.index += 1;
        true
    }

    /// Rule 3: `--config-KEY=VALUE` / `--config-KEY VALUE`.
    fn config_value(&mut self, arg: &str) -> bool {
        let Some(rest) = arg.strip_prefix(CONFIG_PREFIX) else {
            return false;
        };
        let (raw_key, value, consumed) = match rest.split_once('=') {
            Some((k, v)) => (k, v.to_string(), 1),
            None => match self.args.get(self.index + 1) {
                Some(next) => (rest, next.clone(), 2),
                None => {
                    tracing::warn!(flag = %arg, "config option given without a value");
                    self.index += 1;
                    return true;
                }
            },
        };
        if raw_key.is_empty() {
            tracing::warn!(flag = %arg, "config option with empty key");
            self.index += consumed;
            return true;
        }
        let key = self.scanner_key(raw_key);
        let token = format!("{CONFIG_PREFIX}{raw_key}");
        self.write(&key, value, &token);
        self.index += consumed;
        true
    }

    /// Rule 4: `-x VALUE` with a registered short mapping.
    fn short_mapping(&mut self, arg: &str) -> bool {
        let mut chars = arg.chars();
        if chars.next() != Some('-') {
            return false;
        }
        let Some(flag) = chars.next() else {
            return false;
        };
        if flag == '-' || chars.next().is_some() {
            return false;
        }
        let Some(target) = self.overrides.short_target(flag) else {
            return false;
        };
        let target = target.to_string();
        match self.args.get(self.index + 1) {
            Some(value) => {
                let value = value.clone();
                self.write(&target, value, arg);
                self.index += 2;
            }
            None => {
                tracing::warn!(flag = %arg, "short option given without a value");
                self.index += 1;
            }
        }
        true
    }

    /// Rule 5: a long option with an explicit CLI mapping.
    fn cli_mapping(&mut self, arg: &str) -> bool {
        if !arg.starts_with("--") {
            return false;
        }
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) => (f, Some(v)),
            None => (arg, None),
        };
        let Some(target) = self.overrides.cli_target(flag) else {
            return false;
        };
        let target = target.to_string();
        let flag = flag.to_string();
        if let Some(value) = inline {
            self.write(&target, value.to_string(), &flag);
            self.index += 1;
        } else if let Some(value) = self.lookahead_value() {
            let value = value.to_string();
            self.write(&target, value, &flag);
            self.index += 2;
        } else {
            // Bare mapped flag: presence means true.
            self.write(&target, "true".to_string(), &flag);
            self.index += 1;
        }
        true
    }

    /// Rule 6: kebab long option with an explicit value, auto-transformed.
    ///
    /// Without a value the token is not ours — a bare hyphenated flag is
    /// left for the host parser (only explicit mappings get presence
    /// semantics).
    fn hyphenated(&mut self, arg: &str) -> bool {
        if !self.store.auto_transform() || !arg.starts_with("--") {
            return false;
        }
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) => (f, Some(v)),
            None => (arg, None),
        };
        let body = &flag[2..];
        if body.is_empty() || !body.contains('-') {
            return false;
        }
        let key = transform(body, KeyFormat::Dot);
        let flag = flag.to_string();
        if let Some(value) = inline {
            self.write(&key, value.to_string(), &flag);
            self.index += 1;
            true
        } else if let Some(value) = self.lookahead_value() {
            let value = value.to_string();
            self.write(&key, value, &flag);
            self.index += 2;
            true
        } else {
            false
        }
    }

    /// Apply the auto-transform setting to a rule-3 key.
    fn scanner_key(&self, raw: &str) -> String {
        if self.store.auto_transform() {
            transform(raw, KeyFormat::Dot)
        } else {
            normalize(raw, self.store.case_sensitive())
        }
    }

    fn write(&mut self, key: &str, value: String, token: &str) {
        if self.store.set(key, value, Source::cli(token)).is_err() {
            tracing::warn!(flag = %token, "cli option maps to an empty key");
        }
    }
}
