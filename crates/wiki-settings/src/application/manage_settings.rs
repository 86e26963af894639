//! ManageSettingsUseCase: load, change, and persist the site settings record.
//!
//! The wiki keeps exactly one settings record.  It is stored as the JSON text
//! produced by [`SiteSettings::to_json`] under the fixed key
//! [`SITE_SETTINGS_ID`], and read back with
//! [`SiteSettings::load_from_json_with`].  That pair is the whole contract with
//! storage, so the [`SettingsStore`] port only moves strings.
//!
//! # Missing and corrupt records
//!
//! ```text
//! fetch ──► None           ──► defaults (warning)
//!       ──► "" / "null"    ──► defaults (warning)
//!       ──► invalid JSON   ──► defaults (error)
//!       ──► wrong shape    ──► ManageSettingsError::Settings
//!       ──► settings JSON  ──► parsed record
//! ```
//!
//! A recovered record is not written back until the caller saves.
//!
//! [`SettingsService::import`] is stricter: only a settings object is stored.
//! Empty or invalid input is refused with
//! [`ManageSettingsError::NothingToImport`] and the stored record is kept.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use wiki_core::{
    LoadSource, SettingsError, SettingsLog, SiteSettings, TracingLog, SITE_SETTINGS_ID,
};

/// Errors reported by a [`SettingsStore`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another thread panicked while holding the store's lock.
    #[error("settings store lock was poisoned")]
    Poisoned,
}

/// Errors from the settings use case.
#[derive(Debug, Error)]
pub enum ManageSettingsError {
    #[error("unknown setting '{0}'")]
    UnknownField(String),

    /// Derived views are computed from other fields and cannot be set.
    #[error("setting '{0}' is derived and cannot be changed")]
    ReadOnly(&'static str),

    #[error("invalid value '{value}' for {field}: expected true/false, yes/no or 1/0")]
    InvalidBool { field: &'static str, value: String },

    /// Import input that held no settings object.
    #[error("nothing to import: the input was {0:?}, stored settings left unchanged")]
    NothingToImport(LoadSource),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Persistence port for the settings record.
///
/// Implementations store opaque JSON text by id.  Fetching an id that was
/// never stored returns `Ok(None)`.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore {
    fn fetch(&self, id: Uuid) -> Result<Option<String>, StoreError>;
    fn store(&self, id: Uuid, json: &str) -> Result<(), StoreError>;
}

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn fetch(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        (**self).fetch(id)
    }

    fn store(&self, id: Uuid, json: &str) -> Result<(), StoreError> {
        (**self).store(id, json)
    }
}

// ── Field addressing ──────────────────────────────────────────────────────────

/// A named setting, as addressed from the command line.
///
/// Names parse case-insensitively and ignore `_` and `-`, so `SiteName`,
/// `site_name` and `site-name` are the same field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    AllowedFileTypes,
    AllowUserSignup,
    IsRecaptchaEnabled,
    MarkupType,
    RecaptchaPrivateKey,
    RecaptchaPublicKey,
    SiteUrl,
    SiteName,
    Theme,
    ThemePath,
    AllowedFileTypesList,
}

impl SettingField {
    pub const ALL: [SettingField; 11] = [
        SettingField::AllowedFileTypes,
        SettingField::AllowUserSignup,
        SettingField::IsRecaptchaEnabled,
        SettingField::MarkupType,
        SettingField::RecaptchaPrivateKey,
        SettingField::RecaptchaPublicKey,
        SettingField::SiteUrl,
        SettingField::SiteName,
        SettingField::Theme,
        SettingField::ThemePath,
        SettingField::AllowedFileTypesList,
    ];

    /// The field's key in the stored JSON document (or, for derived views,
    /// the name they are displayed under).
    pub fn name(self) -> &'static str {
        match self {
            Self::AllowedFileTypes => "AllowedFileTypes",
            Self::AllowUserSignup => "AllowUserSignup",
            Self::IsRecaptchaEnabled => "IsRecaptchaEnabled",
            Self::MarkupType => "MarkupType",
            Self::RecaptchaPrivateKey => "RecaptchaPrivateKey",
            Self::RecaptchaPublicKey => "RecaptchaPublicKey",
            Self::SiteUrl => "SiteUrl",
            Self::SiteName => "SiteName",
            Self::Theme => "Theme",
            Self::ThemePath => "ThemePath",
            Self::AllowedFileTypesList => "AllowedFileTypesList",
        }
    }

    pub fn is_derived(self) -> bool {
        matches!(self, Self::ThemePath | Self::AllowedFileTypesList)
    }

    /// Reads the field as display text.
    ///
    /// The allowed file types go through the healing read, so an empty stored
    /// value is repaired in `settings` and reported to `log`.  The list view is
    /// joined with `,`.
    pub fn read(self, settings: &mut SiteSettings, log: &dyn SettingsLog) -> String {
        match self {
            Self::AllowedFileTypes => settings.allowed_file_types_with(log).to_string(),
            Self::AllowUserSignup => settings.allow_user_signup.to_string(),
            Self::IsRecaptchaEnabled => settings.is_recaptcha_enabled.to_string(),
            Self::MarkupType => settings.markup_type.clone(),
            Self::RecaptchaPrivateKey => settings.recaptcha_private_key.clone(),
            Self::RecaptchaPublicKey => settings.recaptcha_public_key.clone(),
            Self::SiteUrl => settings.site_url.clone(),
            Self::SiteName => settings.site_name.clone(),
            Self::Theme => settings.theme.clone(),
            Self::ThemePath => settings.theme_path(),
            Self::AllowedFileTypesList => settings.allowed_file_types_list_with(log).join(","),
        }
    }

    /// Writes `value` into the field.
    ///
    /// # Errors
    ///
    /// [`ManageSettingsError::ReadOnly`] for derived views and
    /// [`ManageSettingsError::InvalidBool`] when a boolean field gets
    /// something other than true/false, yes/no or 1/0.
    pub fn apply(
        self,
        settings: &mut SiteSettings,
        value: &str,
    ) -> Result<(), ManageSettingsError> {
        match self {
            Self::AllowedFileTypes => settings.set_allowed_file_types(value),
            Self::AllowUserSignup => settings.allow_user_signup = parse_bool(self, value)?,
            Self::IsRecaptchaEnabled => settings.is_recaptcha_enabled = parse_bool(self, value)?,
            Self::MarkupType => settings.markup_type = value.to_string(),
            Self::RecaptchaPrivateKey => settings.recaptcha_private_key = value.to_string(),
            Self::RecaptchaPublicKey => settings.recaptcha_public_key = value.to_string(),
            Self::SiteUrl => settings.site_url = value.to_string(),
            Self::SiteName => settings.site_name = value.to_string(),
            Self::Theme => settings.theme = value.to_string(),
            Self::ThemePath | Self::AllowedFileTypesList => {
                return Err(ManageSettingsError::ReadOnly(self.name()))
            }
        }
        Ok(())
    }
}

impl FromStr for SettingField {
    type Err = ManageSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();

        Self::ALL
            .into_iter()
            .find(|field| field.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| ManageSettingsError::UnknownField(s.to_string()))
    }
}

impl fmt::Display for SettingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_bool(field: SettingField, value: &str) -> Result<bool, ManageSettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(ManageSettingsError::InvalidBool {
            field: field.name(),
            value: value.to_string(),
        }),
    }
}

// ── Use case ──────────────────────────────────────────────────────────────────

/// Loads and persists the settings record through a [`SettingsStore`].
///
/// Settings log events (healing reads, recovered loads) go to `L`, which
/// defaults to [`TracingLog`].
pub struct SettingsService<S, L = TracingLog> {
    store: S,
    log: L,
}

impl<S: SettingsStore> SettingsService<S> {
    pub fn new(store: S) -> Self {
        Self::with_log(store, TracingLog)
    }
}

impl<S: SettingsStore, L: SettingsLog> SettingsService<S, L> {
    pub fn with_log(store: S, log: L) -> Self {
        Self { store, log }
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Reads the stored record, falling back to defaults when it is absent,
    /// empty, or not valid JSON.
    pub fn load(&self) -> Result<SiteSettings, ManageSettingsError> {
        let json = self.store.fetch(SITE_SETTINGS_ID)?;
        debug!(
            "loading site settings ({})",
            if json.is_some() { "stored" } else { "absent" }
        );
        Ok(SiteSettings::load_from_json_with(json.as_deref(), &self.log)?)
    }

    /// Serializes `settings` and stores it under the fixed settings id.
    pub fn save(&self, settings: &SiteSettings) -> Result<(), ManageSettingsError> {
        let json = settings.to_json()?;
        self.store.store(SITE_SETTINGS_ID, &json)?;
        info!("site settings saved");
        Ok(())
    }

    /// Reads a single field from the stored record.
    pub fn get(&self, field: SettingField) -> Result<String, ManageSettingsError> {
        let mut settings = self.load()?;
        Ok(field.read(&mut settings, &self.log))
    }

    /// Loads the record, changes one field, saves, and returns the result.
    pub fn update(
        &self,
        field: SettingField,
        value: &str,
    ) -> Result<SiteSettings, ManageSettingsError> {
        let mut settings = self.load()?;
        field.apply(&mut settings, value)?;

        if field == SettingField::MarkupType && !settings.uses_known_markup_type() {
            warn!("markup type '{value}' is not one of the bundled engines");
        }

        self.save(&settings)?;
        info!("setting {field} updated");
        Ok(settings)
    }

    /// Replaces the stored record with the defaults.
    pub fn reset(&self) -> Result<SiteSettings, ManageSettingsError> {
        let settings = SiteSettings::default();
        self.save(&settings)?;
        info!("site settings reset to defaults");
        Ok(settings)
    }

    /// Reads `json` as a settings object and stores it.
    ///
    /// # Errors
    ///
    /// [`ManageSettingsError::NothingToImport`] when `json` is empty, `null`
    /// or not valid JSON, and [`ManageSettingsError::Settings`] when it is
    /// JSON of the wrong shape.  The stored record is untouched in both cases.
    pub fn import(&self, json: &str) -> Result<SiteSettings, ManageSettingsError> {
        let (settings, source) = SiteSettings::parse_json(Some(json), &self.log)?;
        if source != LoadSource::Parsed {
            return Err(ManageSettingsError::NothingToImport(source));
        }
        self.save(&settings)?;
        info!("site settings imported");
        Ok(settings)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
