//! Application layer use cases for the settings admin tool.
//!
//! Use cases here orchestrate the `wiki-core` settings record against the
//! [`manage_settings::SettingsStore`] port.  They contain no file system
//! access; the infrastructure layer supplies the store.
//!
//! # Sub-modules
//!
//! - **`manage_settings`**: Load, save, update a single field, reset to
//!   defaults, and import a JSON document, all keyed by the fixed settings id.

pub mod manage_settings;
