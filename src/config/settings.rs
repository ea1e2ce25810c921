//! User preference management with XDG Base Directory compliance.
//!
//! This module loads the feature configuration and the per-resource column
//! toggles from the settings file. Both are read once at startup; the album
//! views only ever read them.

use std::{
    collections::BTreeMap,
    env::var,
    fs::{create_dir_all, read_to_string, write},
    io::Error as StdError,
    path::PathBuf,
};

use {
    parking_lot::{RwLock, RwLockReadGuard},
    serde::{Deserialize, Serialize},
    serde_json::{Error as SerdeJsonError, from_str, to_string_pretty},
    thiserror::Error,
    tracing::debug,
};

use crate::ui::fields::{ALBUM_RESOURCE, AlbumField};

/// Error type for settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to read or write settings file.
    #[error("IO error: {0}")]
    IoError(#[from] StdError),
    /// Failed to serialize or deserialize settings.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] SerdeJsonError),
    /// Invalid settings value.
    #[error("Invalid settings value: {reason}")]
    InvalidValue { reason: String },
}

/// Process-wide feature flags gating optional fields and controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureConfig {
    /// Whether albums can be rated with stars.
    pub enable_star_rating: bool,
    /// Whether albums can be marked as favourites.
    pub enable_favourites: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            enable_star_rating: true,
            enable_favourites: true,
        }
    }
}

/// Serializable user settings structure with default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    /// Feature flags.
    pub features: FeatureConfig,
    /// Column toggles per resource, keyed by field key.
    pub toggleable_fields: BTreeMap<String, BTreeMap<String, bool>>,
    /// Fields hidden per resource until the user turns them on.
    pub default_off_fields: BTreeMap<String, Vec<String>>,
    /// Override for the library database location.
    pub database_path: Option<String>,
}

impl UserSettings {
    /// Checks that every configured album field key names a known field.
    ///
    /// Entries for other resources belong to other views and are skipped.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidValue` naming the first unknown key.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let resources = self
            .toggleable_fields
            .keys()
            .chain(self.default_off_fields.keys())
            .filter(|resource| resource.as_str() != ALBUM_RESOURCE);
        for resource in resources {
            debug!(%resource, "Skipping validation of non-album fields");
        }

        let toggled = self
            .toggleable_fields
            .get(ALBUM_RESOURCE)
            .into_iter()
            .flat_map(BTreeMap::keys);
        let default_off = self
            .default_off_fields
            .get(ALBUM_RESOURCE)
            .into_iter()
            .flatten();

        for key in toggled.chain(default_off) {
            if AlbumField::from_key(key).is_none() {
                return Err(SettingsError::InvalidValue {
                    reason: format!("unknown field '{key}' for resource '{ALBUM_RESOURCE}'"),
                });
            }
        }
        Ok(())
    }

    /// Resolves the library database path, honouring the override.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .as_ref()
            .map_or_else(crate::library::get_database_path, PathBuf::from)
    }
}

/// Handles loading, saving, and validation of user preferences.
#[derive(Debug)]
pub struct SettingsManager {
    /// Thread-safe user settings storage.
    settings: RwLock<UserSettings>,
    /// Path to the configuration file on disk.
    config_path: PathBuf,
}

impl Clone for SettingsManager {
    fn clone(&self) -> Self {
        Self {
            settings: RwLock::new(self.settings.read().clone()),
            config_path: self.config_path.clone(),
        }
    }
}

impl SettingsManager {
    /// Creates a new settings manager with default config path.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be loaded from disk.
    pub fn new() -> Result<Self, SettingsError> {
        Self::with_config_path(get_config_path())
    }

    /// Creates a new settings manager with a custom config path.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Custom path for the settings file
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if settings cannot be read, parsed, or validated.
    pub fn with_config_path(config_path: PathBuf) -> Result<Self, SettingsError> {
        if let Some(parent) = config_path.parent() {
            create_dir_all(parent)?;
        }

        let settings = if config_path.exists() {
            debug!("Loading settings from existing file: {:?}", config_path);
            let contents = read_to_string(&config_path)?;
            let settings: UserSettings = from_str(&contents)?;
            settings.validate()?;
            settings
        } else {
            debug!("Using default settings, no file at {:?}", config_path);
            UserSettings::default()
        };

        Ok(SettingsManager {
            settings: RwLock::new(settings),
            config_path,
        })
    }

    /// Gets the current settings.
    pub fn get_settings(&self) -> RwLockReadGuard<'_, UserSettings> {
        self.settings.read()
    }

    /// Gets the feature flags.
    #[must_use]
    pub fn features(&self) -> FeatureConfig {
        self.settings.read().features
    }

    /// Gets the configuration file path.
    #[must_use]
    pub fn get_config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Replaces the settings and saves them to disk.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the settings are invalid or cannot be saved.
    pub fn update_settings(&self, new_settings: UserSettings) -> Result<(), SettingsError> {
        new_settings.validate()?;
        *self.settings.write() = new_settings;
        self.save_settings()
    }

    fn save_settings(&self) -> Result<(), SettingsError> {
        debug!("Saving settings to file: {:?}", self.config_path);
        let contents = to_string_pretty(&*self.settings.read())?;
        write(&self.config_path, contents)?;
        Ok(())
    }
}

/// Path to the settings file under the XDG config home.
#[must_use]
pub fn get_config_path() -> PathBuf {
    let mut config_dir = xdg_home("XDG_CONFIG_HOME", ".config");
    config_dir.push("albumview");
    config_dir.push("settings.json");
    config_dir
}

/// Application data directory under the XDG data home.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    let mut data_dir = xdg_home("XDG_DATA_HOME", ".local/share");
    data_dir.push("albumview");
    data_dir
}

/// Uses `env_key` if set and non-empty, otherwise `$HOME/<home_fallback>`.
fn xdg_home(env_key: &str, home_fallback: &str) -> PathBuf {
    if let Ok(dir) = var(env_key)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }

    if let Ok(home) = var("HOME") {
        let mut path = PathBuf::from(home);
        path.push(home_fallback);
        return path;
    }

    PathBuf::from(".")
}
