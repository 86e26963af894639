//! Domain layer: the settings record and the logging capability it reports
//! through.
//!
//! Nothing in here touches the file system, the network, or a global logger.
//! Log events leave through the [`log::SettingsLog`] trait, which the caller
//! supplies.

pub mod log;
pub mod site_settings;
