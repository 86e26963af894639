//! Storage infrastructure: settings persistence and tool configuration.
//!
//! - `file_store` keeps each record as `<data_dir>/<id>.json`, the exact text
//!   produced by `SiteSettings::to_json`.
//! - `memory` keeps records in a `HashMap`, for tests and dry runs.
//! - `config` reads and writes the admin tool's TOML config file (where the
//!   data directory is and how verbose logging should be).

pub mod config;
pub mod file_store;
pub mod memory;

pub use file_store::FileSettingsStore;
pub use memory::InMemorySettingsStore;
