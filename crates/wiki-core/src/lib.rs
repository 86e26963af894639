//! # wiki-core
//!
//! Domain types for the wiki's editable site settings: the settings that can
//! change at runtime without restarting the application (branding, markup
//! engine, upload restrictions, Recaptcha keys, theme).
//!
//! This crate has zero dependencies on storage, HTTP, or UI code.  It defines
//! the shape of the settings record and the JSON text that the persistence
//! layer reads and writes.
//!
//! # Architecture overview
//!
//! - **`domain::site_settings`**: The [`SiteSettings`] record with its
//!   defaults, the two derived views (`theme_path`, `allowed_file_types_list`)
//!   and the `to_json` / `load_from_json` pair that is the whole contract with
//!   storage.
//!
//! - **`domain::log`**: The [`SettingsLog`] capability.  Settings operations
//!   that need to report something (an empty file-types value being healed, a
//!   corrupt JSON blob being replaced with defaults) do so through this trait,
//!   so they stay testable without a real logging backend.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `wiki_core::SiteSettings` instead of `wiki_core::domain::site_settings::SiteSettings`.
pub use domain::log::{LogLevel, RecordingLog, SettingsLog, TracingLog};
pub use domain::site_settings::{
    LoadSource, SettingsError, SiteSettings, DEFAULT_ALLOWED_FILE_TYPES, KNOWN_MARKUP_TYPES,
    SITE_SETTINGS_ID, THEMES_ROOT,
};
