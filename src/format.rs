//! File format dispatch and the document-flattening capability.
//!
//! Format selection is by file extension: `.json` and `.yaml`/`.yml` get
//! their structured loaders, everything else (including `.ini`, `.conf`,
//! `.cfg` and extensionless paths) falls to the native INI grammar in
//! [`crate::layers::file`].
//!
//! Flattening nested documents into dot-notation leaves is modeled as a
//! capability behind the [`Flattener`] trait, selected once when the loader
//! is constructed rather than re-probed per call. The default
//! [`DocumentFlattener`] is backed by `serde_json`/`serde_yaml` behind the
//! `json`/`yaml` cargo features; a build without the needed feature (or an
//! injected [`NoFlattener`]) signals
//! [`UnsupportedFormat`](crate::ConfigError::UnsupportedFormat), which the
//! file loader answers with its documented INI fallback.

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::ConfigError;

/// The file formats the loader distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Native line-oriented `key=value` grammar with `[section]` headers.
    Ini,
    /// JSON document, flattened to dot-notation leaves.
    Json,
    /// YAML document, flattened to dot-notation leaves.
    Yaml,
}

impl FileFormat {
    /// Select a format from a path's extension. Anything unrecognized is
    /// treated as INI — the default fallback grammar.
    pub fn from_path(path: &Utf8Path) -> Self {
        match path.extension().map(|e| e.to_ascii_lowercase()).as_deref() {
            Some("json") => Self::Json,
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Ini,
        }
    }
}

impl core::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Ini => "INI",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        };
        write!(f, "{name}")
    }
}

/// Capability interface for flattening a structured document into ordered
/// dot-notation `(key, value)` leaf pairs.
pub trait Flattener {
    /// Flatten `contents` parsed as `format`.
    ///
    /// Returns [`ConfigError::UnsupportedFormat`] when the capability for
    /// this format is absent (the loader then falls back to INI), or
    /// [`ConfigError::ParseFailure`] when the document is malformed.
    fn flatten(
        &self,
        format: FileFormat,
        path: &Utf8Path,
        contents: &str,
    ) -> Result<Vec<(String, String)>, ConfigError>;
}

/// The serde-backed flattener. Per-format support follows the `json` and
/// `yaml` cargo features.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFlattener;

impl Flattener for DocumentFlattener {
    fn flatten(
        &self,
        format: FileFormat,
        path: &Utf8Path,
        contents: &str,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        match format {
            FileFormat::Ini => Err(ConfigError::UnsupportedFormat { format }),
            FileFormat::Json => flatten_json(path, contents),
            FileFormat::Yaml => flatten_yaml(path, contents),
        }
    }
}

/// A flattener with no capabilities at all.
///
/// Every request signals [`ConfigError::UnsupportedFormat`], forcing the
/// loader's INI fallback. Useful in tests and in hosts that only ship the
/// native grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlattener;

impl Flattener for NoFlattener {
    fn flatten(
        &self,
        format: FileFormat,
        _path: &Utf8Path,
        _contents: &str,
    ) -> Result<Vec<(String, String)>, ConfigError> {
        Err(ConfigError::UnsupportedFormat { format })
    }
}

#[cfg(feature = "json")]
fn flatten_json(path: &Utf8Path, contents: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let root: serde_json::Value =
        serde_json::from_str(contents).map_err(|e| ConfigError::ParseFailure {
            path: Utf8PathBuf::from(path),
            message: e.to_string(),
        })?;
    let mut pairs = Vec::new();
    flatten_json_value("", &root, &mut pairs);
    Ok(pairs)
}

#[cfg(not(feature = "json"))]
fn flatten_json(_path: &Utf8Path, _contents: &str) -> Result<Vec<(String, String)>, ConfigError> {
    Err(ConfigError::UnsupportedFormat {
        format: FileFormat::Json,
    })
}

#[cfg(feature = "json")]
fn flatten_json_value(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    use serde_json::Value;
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_json_value(&join_key(prefix, k), v, out);
            }
        }
        Value::Array(items) => flatten_array(
            prefix,
            items.iter().map(|v| (v, json_scalar(v))),
            |p, v, out| flatten_json_value(p, v, out),
            out,
        ),
        other => {
            if !prefix.is_empty() {
                out.push((prefix.to_string(), json_scalar(other).unwrap_or_default()));
            }
        }
    }
}

#[cfg(feature = "json")]
fn json_scalar(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(feature = "yaml")]
fn flatten_yaml(path: &Utf8Path, contents: &str) -> Result<Vec<(String, String)>, ConfigError> {
    let root: serde_yaml::Value =
        serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseFailure {
            path: Utf8PathBuf::from(path),
            message: e.to_string(),
        })?;
    let mut pairs = Vec::new();
    flatten_yaml_value("", &root, &mut pairs);
    Ok(pairs)
}

#[cfg(not(feature = "yaml"))]
fn flatten_yaml(_path: &Utf8Path, _contents: &str) -> Result<Vec<(String, String)>, ConfigError> {
    Err(ConfigError::UnsupportedFormat {
        format: FileFormat::Yaml,
    })
}

#[cfg(feature = "yaml")]
fn flatten_yaml_value(prefix: &str, value: &serde_yaml::Value, out: &mut Vec<(String, String)>) {
    use serde_yaml::Value;
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = yaml_scalar(k).unwrap_or_default();
                flatten_yaml_value(&join_key(prefix, &key), v, out);
            }
        }
        Value::Sequence(items) => flatten_array(
            prefix,
            items.iter().map(|v| (v, yaml_scalar(v))),
            |p, v, out| flatten_yaml_value(p, v, out),
            out,
        ),
        Value::Tagged(tagged) => flatten_yaml_value(prefix, &tagged.value, out),
        other => {
            if !prefix.is_empty() {
                out.push((prefix.to_string(), yaml_scalar(other).unwrap_or_default()));
            }
        }
    }
}

#[cfg(feature = "yaml")]
fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Flatten an array node.
///
/// An array of scalars collapses to one comma-joined value (matching the
/// engine's comma-separated `array` read type); an array containing
/// structures flattens each element under a numeric index segment instead.
#[cfg(any(feature = "json", feature = "yaml"))]
fn flatten_array<'v, V: 'v>(
    prefix: &str,
    items: impl Iterator<Item = (&'v V, Option<String>)>,
    recurse: impl Fn(&str, &'v V, &mut Vec<(String, String)>),
    out: &mut Vec<(String, String)>,
) {
    let items: Vec<(&V, Option<String>)> = items.collect();
    if items.iter().all(|(_, scalar)| scalar.is_some()) {
        if !prefix.is_empty() {
            let joined = items
                .iter()
                .filter_map(|(_, s)| s.clone())
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
    } else {
        for (i, (item, _)) in items.into_iter().enumerate() {
            recurse(&join_key(prefix, &i.to_string()), item, out);
        }
    }
}

#[cfg(any(feature = "json", feature = "yaml"))]
fn join_key(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}.{segment}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_dispatch_by_extension() {
        assert_eq!(FileFormat::from_path("app.json".into()), FileFormat::Json);
        assert_eq!(FileFormat::from_path("app.YAML".into()), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path("app.yml".into()), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path("app.ini".into()), FileFormat::Ini);
        assert_eq!(FileFormat::from_path("app.conf".into()), FileFormat::Ini);
        assert_eq!(FileFormat::from_path("apprc".into()), FileFormat::Ini);
    }

    #[test]
    fn no_flattener_signals_unsupported() {
        let err = NoFlattener
            .flatten(FileFormat::Json, "a.json".into(), "{}")
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_flattens_to_dot_leaves() {
        let pairs = DocumentFlattener
            .flatten(
                FileFormat::Json,
                "a.json".into(),
                r#"{"debug": true, "db": {"host": "x.example.com", "port": 5432}}"#,
            )
            .unwrap();
        assert!(pairs.contains(&("debug".to_string(), "true".to_string())));
        assert!(pairs.contains(&("db.host".to_string(), "x.example.com".to_string())));
        assert!(pairs.contains(&("db.port".to_string(), "5432".to_string())));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_scalar_arrays_join_with_commas() {
        let pairs = DocumentFlattener
            .flatten(FileFormat::Json, "a.json".into(), r#"{"tags": ["a", "b", "c"]}"#)
            .unwrap();
        assert_eq!(pairs, vec![("tags".to_string(), "a,b,c".to_string())]);
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_structured_arrays_use_index_segments() {
        let pairs = DocumentFlattener
            .flatten(
                FileFormat::Json,
                "a.json".into(),
                r#"{"servers": [{"host": "a"}, {"host": "b"}]}"#,
            )
            .unwrap();
        assert!(pairs.contains(&("servers.0.host".to_string(), "a".to_string())));
        assert!(pairs.contains(&("servers.1.host".to_string(), "b".to_string())));
    }

    #[cfg(feature = "json")]
    #[test]
    fn malformed_json_is_a_parse_failure() {
        let err = DocumentFlattener
            .flatten(FileFormat::Json, "a.json".into(), r#"{"port": }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseFailure { .. }));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_flattens_nested_mappings() {
        let pairs = DocumentFlattener
            .flatten(
                FileFormat::Yaml,
                "a.yaml".into(),
                "db:\n  host: x.example.com\n  replicas: [r1, r2]\n",
            )
            .unwrap();
        assert!(pairs.contains(&("db.host".to_string(), "x.example.com".to_string())));
        assert!(pairs.contains(&("db.replicas".to_string(), "r1,r2".to_string())));
    }
}
