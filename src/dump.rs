//! Provenance audit dump.
//!
//! Renders every stored key with its value and source tag in aligned
//! columns. This is the auditing surface the source tags exist for; the
//! engine itself never consults them for resolution.

use std::io::Write;

use owo_colors::OwoColorize;

use crate::store::ConfigStore;

/// Maximum rendered value width before truncation.
const MAX_VALUE_WIDTH: usize = 50;

/// Write an aligned `key = value (source)` listing of the store.
///
/// Keys appear in insertion order. Colors are always emitted; callers
/// dumping to something other than a terminal should not call this.
pub fn dump(store: &ConfigStore, w: &mut impl Write) -> std::io::Result<()> {
    let key_width = store.keys().map(str::len).max().unwrap_or(0);
    let value_width = store
        .iter()
        .map(|(_, e)| e.value.len().min(MAX_VALUE_WIDTH))
        .max()
        .unwrap_or(0);

    for (key, entry) in store.iter() {
        let value = truncate(&entry.value);
        // Pad before coloring so ANSI codes don't count against the width.
        let key = format!("{key:key_width$}");
        let value = format!("{value:value_width$}");
        writeln!(
            w,
            "{} = {}  {}",
            key.cyan(),
            value.green(),
            entry.source.to_string().bright_black(),
        )?;
    }
    Ok(())
}

fn truncate(value: &str) -> String {
    if value.len() > MAX_VALUE_WIDTH {
        let cut: String = value.chars().take(MAX_VALUE_WIDTH - 1).collect();
        format!("{cut}…")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;

    #[test]
    fn dump_lists_every_key_with_source() {
        let mut store = ConfigStore::new();
        store.set("db.host", "example.com", Source::file("app.ini")).unwrap();
        store.set("db.port", "5432", Source::env("APP_DB_PORT")).unwrap();

        let mut buf = Vec::new();
        dump(&store, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();

        assert!(out.contains("db.host"));
        assert!(out.contains("example.com"));
        assert!(out.contains("file:app.ini"));
        assert!(out.contains("env:APP_DB_PORT"));
    }

    #[test]
    fn long_values_are_truncated() {
        let mut store = ConfigStore::new();
        store.set_manual("k", "x".repeat(200)).unwrap();

        let mut buf = Vec::new();
        dump(&store, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains('…'));
        assert!(!out.contains(&"x".repeat(100)));
    }
}
