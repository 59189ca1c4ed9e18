#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod builder;
pub(crate) mod dump;
pub(crate) mod error;
pub(crate) mod format;
pub(crate) mod key;
pub(crate) mod layers;
pub(crate) mod overrides;
pub(crate) mod source;
pub(crate) mod store;
pub(crate) mod value;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use builder::{ConfigBuilder, Loaded};
pub use dump::dump;
pub use error::ConfigError;
pub use format::{DocumentFlattener, FileFormat, Flattener, NoFlattener};
pub use key::{normalize, transform, KeyFormat};
pub use layers::cli::{parse_cli_args, CliOutcome};
pub use layers::env::{load_env, EnvSource, MockEnv, StdEnv};
pub use layers::file::{load_file, load_files};
pub use overrides::{OverrideKind, Overrides};
pub use source::Source;
pub use store::{ConfigStore, Entry};
pub use value::{ConfigValue, ValueType};
