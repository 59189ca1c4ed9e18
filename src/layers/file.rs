//! Configuration file loading.
//!
//! Files load in the order the caller lists them; later files overwrite
//! earlier ones for the same key, and everything here runs before the
//! environment and CLI scanners, so file values sit at the bottom of the
//! priority stack.
//!
//! An unreadable file is logged and skipped — the load sequence continues
//! with the remaining sources. A JSON or YAML file whose flattening
//! capability is absent falls back to being parsed as INI with a warning
//! rather than failing outright; that line-based second chance is a
//! deliberate design choice, unusual as it looks.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ConfigError;
use crate::format::{FileFormat, Flattener};
use crate::source::Source;
use crate::store::ConfigStore;

/// Load a list of configuration files into the store, in order.
///
/// Per-file failures are absorbed: unreadable paths and malformed
/// documents are logged and skipped, a missing flattening capability
/// triggers the INI fallback. This never returns an error and never
/// aborts the sequence.
pub fn load_files<P>(store: &mut ConfigStore, paths: &[P], flattener: &dyn Flattener)
where
    P: AsRef<Utf8Path>,
{
    for path in paths {
        load_file(store, path.as_ref(), flattener);
    }
}

/// Load a single configuration file into the store.
pub fn load_file(store: &mut ConfigStore, path: &Utf8Path, flattener: &dyn Flattener) {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::FileUnreadable {
                path: Utf8PathBuf::from(path),
                message: e.to_string(),
            };
            tracing::warn!(%err, "skipping config file");
            return;
        }
    };

    match FileFormat::from_path(path) {
        FileFormat::Ini => parse_ini(store, path, &contents),
        format => match flattener.flatten(format, path, &contents) {
            Ok(pairs) => {
                tracing::debug!(path = %path, pairs = pairs.len(), "loaded {format} file");
                for (key, value) in pairs {
                    if store.set(&key, value, Source::file(path)).is_err() {
                        tracing::warn!(path = %path, "dropping pair with empty key");
                    }
                }
            }
            Err(err @ ConfigError::UnsupportedFormat { .. }) => {
                tracing::warn!(path = %path, %err, "falling back to INI parsing");
                parse_ini(store, path, &contents);
            }
            Err(err) => {
                tracing::warn!(path = %path, %err, "skipping config file");
            }
        },
    }
}

/// The native line-oriented grammar.
///
/// Blank lines and `#`/`;` comments are skipped. `[section]` opens a
/// section whose name prefixes subsequent keys as `section.key` until the
/// next header or EOF. `key=value` pairs are trimmed on both sides; a value
/// fully wrapped in matching single or double quotes loses the quotes.
fn parse_ini(store: &mut ConfigStore, path: &Utf8Path, contents: &str) {
    let mut section = String::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if name.is_empty() {
                tracing::debug!(path = %path, line = %line, "ignoring empty section header");
            } else {
                section = name.trim().to_string();
            }
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            tracing::debug!(path = %path, line = %line, "ignoring malformed line");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            tracing::debug!(path = %path, line = %line, "ignoring pair with empty key");
            continue;
        }
        let value = strip_quotes(value.trim());

        let full_key = if section.is_empty() {
            key.to_string()
        } else {
            format!("{section}.{key}")
        };

        // Keys out of this grammar are already well-formed; skip the
        // set() validation path.
        store.insert_unchecked(full_key, value.to_string(), Source::file(path));
    }
}

/// Strip one pair of matching surrounding quotes, if present.
fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
