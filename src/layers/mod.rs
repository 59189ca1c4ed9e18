//! Source loaders: configuration files, environment variables, CLI
//! arguments.
//!
//! Each loader writes into a caller-owned [`ConfigStore`](crate::ConfigStore)
//! by mutable reference. Priority between loaders is encoded purely by the
//! order the caller invokes them (files, then environment, then CLI);
//! [`ConfigBuilder::load`](crate::ConfigBuilder::load) is the orchestration
//! that preserves that order.

pub mod cli;
pub mod env;
pub mod file;
