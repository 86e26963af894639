//! wiki-settings library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # Layers
//!
//! ```text
//! wiki-settings
//!   ├── application/     SettingsService use case over the SettingsStore port
//!   └── infrastructure/
//!         └── storage/   file and in-memory stores, the tool's TOML config
//! ```
//!
//! The settings record itself lives in `wiki-core`.

pub mod application;
pub mod infrastructure;
