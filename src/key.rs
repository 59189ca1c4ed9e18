//! Key normalization and notation transforms.
//!
//! Keys are dot-delimited hierarchical paths (`database.host`). The same
//! logical key may surface in other notations — `database-host` on the
//! command line, `DATABASE_HOST` in the environment — and [`transform`]
//! rewrites between them.
//!
//! The transforms are plain separator rewrites and are **not** round-trip
//! safe: `a-b.c` transformed to dot notation becomes `a.b.c`, and the
//! original separator identity is gone. That is accepted behavior.

/// Target notation for [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// `database.host` — the store's canonical notation.
    Dot,
    /// `database-host` — long CLI options.
    Kebab,
    /// `database_host` — shell-friendly lowercase.
    Snake,
    /// `DATABASE_HOST` — environment variable names.
    Env,
}

/// Normalize a key: trim surrounding whitespace and, unless case-sensitive
/// mode is active, fold to lowercase.
///
/// Idempotent: `normalize(normalize(k)) == normalize(k)`.
pub fn normalize(key: &str, case_sensitive: bool) -> String {
    let trimmed = key.trim();
    if case_sensitive {
        trimmed.to_string()
    } else {
        trimmed.to_lowercase()
    }
}

/// Rewrite a key's separators into the target notation.
///
/// | target | rule |
/// |---|---|
/// | [`Dot`](KeyFormat::Dot) | `-` and `_` become `.` |
/// | [`Kebab`](KeyFormat::Kebab) | `.` and `_` become `-` |
/// | [`Snake`](KeyFormat::Snake) | `.` and `-` become `_` |
/// | [`Env`](KeyFormat::Env) | `.` and `-` become `_`, then uppercase |
pub fn transform(key: &str, target: KeyFormat) -> String {
    match target {
        KeyFormat::Dot => key.replace(['-', '_'], "."),
        KeyFormat::Kebab => key.replace(['.', '_'], "-"),
        KeyFormat::Snake => key.replace(['.', '-'], "_"),
        KeyFormat::Env => key.replace(['.', '-'], "_").to_uppercase(),
    }
}
