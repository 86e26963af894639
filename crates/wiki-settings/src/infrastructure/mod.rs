//! Infrastructure layer: everything that touches the file system.
//!
//! - **`storage`**: [`SettingsStore`](crate::application::manage_settings::SettingsStore)
//!   implementations and the admin tool's own TOML configuration file.

pub mod storage;
