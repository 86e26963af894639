//! The editable site settings record.
//!
//! [`SiteSettings`] holds every setting that can change without restarting the
//! wiki.  It is stored as a single JSON document under the fixed key
//! [`SITE_SETTINGS_ID`]; [`SiteSettings::to_json`] produces that document and
//! [`SiteSettings::load_from_json`] turns it back into a record.
//!
//! # JSON shape
//!
//! A flat object keyed by the PascalCase field names, pretty-printed on output:
//!
//! ```json
//! {
//!   "AllowedFileTypes": "jpg, png, gif",
//!   "AllowUserSignup": false,
//!   "IsRecaptchaEnabled": false,
//!   "MarkupType": "Creole",
//!   "RecaptchaPrivateKey": "",
//!   "RecaptchaPublicKey": "",
//!   "SiteUrl": "",
//!   "SiteName": "Your site",
//!   "Theme": "Mediawiki"
//! }
//! ```
//!
//! Keys missing from the input take the defaults above, `null` text values
//! read as empty strings, and unknown keys (including the derived `ThemePath`
//! and `AllowedFileTypesList`) are ignored.
//!
//! # Recovery rules on load
//!
//! | Input                                   | Result                              | Log   |
//! |-----------------------------------------|-------------------------------------|-------|
//! | `None`, `""` or the document `null`     | defaults                            | warn  |
//! | syntactically invalid or truncated JSON | defaults                            | error |
//! | valid JSON of the wrong shape or types  | `Err(SettingsError::Incompatible)`  | none  |
//! | a settings object                       | the parsed record                   | none  |

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::log::{SettingsLog, TracingLog};

/// Storage key of the one and only settings record.
pub const SITE_SETTINGS_ID: Uuid = Uuid::from_u128(0xb960e8e5_529f_4f7c_aee4_28eb23e13dbd);

/// Upload extensions used when none are configured.
pub const DEFAULT_ALLOWED_FILE_TYPES: &str = "jpg, png, gif";

/// Root-relative directory that holds one sub-directory per theme.
pub const THEMES_ROOT: &str = "~/Themes";

pub const DEFAULT_MARKUP_TYPE: &str = "Creole";
pub const DEFAULT_SITE_NAME: &str = "Your site";
pub const DEFAULT_THEME: &str = "Mediawiki";

/// Markup engines the front end ships parsers for.
///
/// `markup_type` is free text and is not checked against this list.
pub const KNOWN_MARKUP_TYPES: [&str; 3] = ["Creole", "Markdown", "MediaWiki"];

const EMPTY_FILE_TYPES_WARNING: &str =
    "the allowed file types setting is empty, populating with default types jpg, png, gif";
const EMPTY_JSON_WARNING: &str = "settings json was empty, returning default settings";

/// Errors surfaced by the JSON contract.
///
/// Syntax errors on load are not in here: they are logged and replaced with
/// defaults.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The text is valid JSON but does not describe a settings object
    /// (wrong value types, an array, a bare number, ...).
    #[error("settings json does not match the settings shape: {0}")]
    Incompatible(#[source] serde_json::Error),

    /// The record could not be rendered as JSON.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Which path [`SiteSettings::parse_json`] took to produce its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The input was a settings object.
    Parsed,
    /// The input was absent, empty, or the JSON literal `null`.
    EmptyInput,
    /// The input was not valid JSON; defaults were substituted.
    Malformed,
}

/// Site-wide settings that do not require a restart when changed.
///
/// `SiteSettings::default()` (or [`SiteSettings::new`]) yields the fully
/// populated default record.  All fields except the allowed file types are
/// public; that one is kept behind accessors because reading it repairs an
/// empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SiteSettings {
    /// Upload extensions, comma separated with optional spaces.
    #[serde(deserialize_with = "null_as_empty")]
    allowed_file_types: String,

    /// Whether visitors may register themselves.  Ignored by the auth layer
    /// when Windows authentication is active.
    pub allow_user_signup: bool,

    /// Whether Recaptcha guards signups and password resets.
    pub is_recaptcha_enabled: bool,

    /// Markup engine identifier, e.g. `Creole`, `Markdown`, `MediaWiki`.
    ///
    /// Kept as text so it can be handed to the front-end editor unchanged.
    #[serde(deserialize_with = "null_as_empty")]
    pub markup_type: String,

    /// Only meaningful when `is_recaptcha_enabled` is set.
    #[serde(deserialize_with = "null_as_empty")]
    pub recaptcha_private_key: String,

    #[serde(deserialize_with = "null_as_empty")]
    pub recaptcha_public_key: String,

    /// Fully-qualified url of the site.
    #[serde(deserialize_with = "null_as_empty")]
    pub site_url: String,

    /// Display name of the site.
    #[serde(deserialize_with = "null_as_empty")]
    pub site_name: String,

    /// Theme directory name under [`THEMES_ROOT`].
    #[serde(deserialize_with = "null_as_empty")]
    pub theme: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES.to_string(),
            allow_user_signup: false,
            is_recaptcha_enabled: false,
            markup_type: DEFAULT_MARKUP_TYPE.to_string(),
            recaptcha_private_key: String::new(),
            recaptcha_public_key: String::new(),
            site_url: String::new(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

impl SiteSettings {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Allowed file types ────────────────────────────────────────────────────

    /// Returns the allowed upload extensions, logging through `tracing`.
    ///
    /// See [`allowed_file_types_with`](Self::allowed_file_types_with).
    pub fn allowed_file_types(&mut self) -> &str {
        self.allowed_file_types_with(&TracingLog)
    }

    /// Returns the allowed upload extensions.
    ///
    /// An empty stored value is replaced with [`DEFAULT_ALLOWED_FILE_TYPES`]
    /// before returning, and a warning is sent to `log`.  The replacement is
    /// kept, so the next read neither warns nor changes anything.
    pub fn allowed_file_types_with(&mut self, log: &dyn SettingsLog) -> &str {
        if self.allowed_file_types.is_empty() {
            log.warn(EMPTY_FILE_TYPES_WARNING);
            self.allowed_file_types = DEFAULT_ALLOWED_FILE_TYPES.to_string();
        }
        &self.allowed_file_types
    }

    /// The stored value as-is, without repairing an empty one.
    pub fn stored_allowed_file_types(&self) -> &str {
        &self.allowed_file_types
    }

    /// Replaces the allowed upload extensions.  An empty value is accepted and
    /// repaired on the next read.
    pub fn set_allowed_file_types(&mut self, value: impl Into<String>) {
        self.allowed_file_types = value.into();
    }

    /// The allowed extensions as separate tokens, logging through `tracing`.
    pub fn allowed_file_types_list(&mut self) -> Vec<String> {
        self.allowed_file_types_list_with(&TracingLog)
    }

    /// The allowed extensions as separate tokens.
    ///
    /// Spaces are stripped and the value is split on `,`.  Tokens keep their
    /// input order; duplicates and empty tokens (`"jpg,,png"`) are kept.
    /// Recomputed on every call.
    pub fn allowed_file_types_list_with(&mut self, log: &dyn SettingsLog) -> Vec<String> {
        self.allowed_file_types_with(log)
            .replace(' ', "")
            .split(',')
            .map(str::to_string)
            .collect()
    }

    // ── Derived views ─────────────────────────────────────────────────────────

    /// Root-relative path of the current theme, without a trailing separator.
    pub fn theme_path(&self) -> String {
        format!("{THEMES_ROOT}/{}", self.theme)
    }

    pub fn uses_known_markup_type(&self) -> bool {
        KNOWN_MARKUP_TYPES.contains(&self.markup_type.as_str())
    }

    // ── JSON contract ─────────────────────────────────────────────────────────

    /// Renders the record as indented JSON.
    ///
    /// The derived views are not part of the output.  The allowed file types
    /// are written as stored, so an empty value stays empty until it is read.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)
    }

    /// Builds a record from persisted JSON, logging through `tracing`.
    ///
    /// See [`load_from_json_with`](Self::load_from_json_with).
    pub fn load_from_json(json: Option<&str>) -> Result<Self, SettingsError> {
        Self::load_from_json_with(json, &TracingLog)
    }

    /// Builds a record from persisted JSON.
    ///
    /// Empty input and invalid JSON both produce the default record; only
    /// well-formed JSON of the wrong shape is an error.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Incompatible`] when the text parses as JSON but
    /// cannot be read as a settings object.
    pub fn load_from_json_with(
        json: Option<&str>,
        log: &dyn SettingsLog,
    ) -> Result<Self, SettingsError> {
        Self::parse_json(json, log).map(|(settings, _)| settings)
    }

    /// Like [`load_from_json_with`](Self::load_from_json_with), but also
    /// reports which path produced the record.
    pub fn parse_json(
        json: Option<&str>,
        log: &dyn SettingsLog,
    ) -> Result<(Self, LoadSource), SettingsError> {
        let Some(text) = json.filter(|t| !t.is_empty()) else {
            log.warn(EMPTY_JSON_WARNING);
            return Ok((Self::default(), LoadSource::EmptyInput));
        };

        // Parsed to a `Value` first so a repeated key keeps its last value.
        let value = match serde_json::from_str::<Value>(text) {
            Ok(Value::Null) => {
                log.warn(EMPTY_JSON_WARNING);
                return Ok((Self::default(), LoadSource::EmptyInput));
            }
            Ok(value) => value,
            Err(e) => {
                log.error(&format!(
                    "failed to parse settings json, returning default settings: {e}"
                ));
                return Ok((Self::default(), LoadSource::Malformed));
            }
        };

        let settings = serde_json::from_value(value).map_err(SettingsError::Incompatible)?;
        Ok((settings, LoadSource::Parsed))
    }
}

/// Reads a JSON string, treating `null` as the empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
