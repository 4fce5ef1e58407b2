//! `sketchbench-client` - HTTP edge for the sketch service.
//!
//! Implements the session crate's store and toolchain contracts over the
//! service's JSON API, and carries the `sketchbench` command-line binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

/// Service client implementing the remote store and toolchain contracts.
pub mod client;
/// Client configuration loaded from `sketchbench.toml`.
pub mod config;
pub mod types;

pub use client::ServiceClient;
pub use config::{BoardDefaults, ClientConfig, ServiceSettings};
