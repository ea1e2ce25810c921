//! User preferences and feature configuration.
//!
//! This module provides settings management with XDG Base Directory
//! compliance, including the feature flags and column toggles read by the
//! album views.

pub mod settings;

pub use settings::{
    FeatureConfig, SettingsError, SettingsManager, UserSettings, get_config_path, get_data_dir,
};
