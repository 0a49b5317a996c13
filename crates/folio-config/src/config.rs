//! High-level configuration structure for Folio.
//!
//! This module provides the main `FolioConfig` struct and environment overlay logic.
//! For file discovery, see the `discovery` module.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::build::{BuildMode, BuildOptions, Environment};
use crate::error::{ConfigError, Result as ConfigResult};
use crate::merge::{merge_layers, merge_values};
use crate::page::{PageDefaults, PageDescriptor, PageOptions};
use crate::settings::GlobalSettings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub build: BuildOptions,

    #[serde(default)]
    pub pages: Vec<PageOptions>,

    #[serde(default)]
    pub mode: BuildMode,

    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,

    #[serde(default)]
    pub settings: GlobalSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub build: Value,

    #[serde(default)]
    pub settings: Value,

    #[serde(default)]
    pub mode: Option<BuildMode>,
}

/// Environment-level layer applied on top of the global build options.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvConfig {
    pub environment: Environment,
    /// Built-in environment defaults merged with the matching profile's `build` table
    pub overlay: Value,
}

impl EnvConfig {
    /// Environment layer with only the built-in defaults.
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            overlay: environment.defaults(),
        }
    }
}

impl FolioConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use folio_config::{FolioConfig, BuildMode};
    /// use serde_json::json;
    ///
    /// let value = json!({
    ///     "mode": "shared",
    ///     "pages": [{ "title": "Home", "entry": { "home": "home.js" } }]
    /// });
    ///
    /// let config = FolioConfig::from_value(value).unwrap();
    /// assert_eq!(config.mode, BuildMode::Shared);
    /// assert_eq!(config.pages.len(), 1);
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to serde_json::Value
    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Validate every page record into a [`PageDescriptor`].
    ///
    /// Pages inherit `build.entry` and `build.template` when they declare none.
    pub fn page_descriptors(&self) -> ConfigResult<Vec<PageDescriptor>> {
        if self.pages.is_empty() {
            return Err(ConfigError::NoPages);
        }

        let defaults = PageDefaults {
            entry: self.build.entry.as_ref(),
            template: self.build.template.as_deref(),
        };

        self.pages
            .iter()
            .enumerate()
            .map(|(index, page)| PageDescriptor::from_options(index, page, defaults))
            .collect()
    }

    /// Environment layer: built-in defaults, then `[profiles.<env>.build]`.
    pub fn env_config(&self, environment: Environment) -> ConfigResult<EnvConfig> {
        let mut overlay = environment.defaults();

        if let Some(profile) = self.profiles.get(environment.profile_name()) {
            if !profile.build.is_null() && !profile.build.is_object() {
                return Err(ConfigError::InvalidProfileOverride {
                    message: format!(
                        "profiles.{}.build must be a table",
                        environment.profile_name()
                    ),
                });
            }
            merge_values(&mut overlay, &profile.build);
        }

        tracing::debug!(%environment, overlay = %overlay, "resolved environment overlay");
        Ok(EnvConfig {
            environment,
            overlay,
        })
    }

    /// Resolve the config for one environment.
    ///
    /// Environment defaults and the matching profile's `build` table are merged
    /// into `build`, the profile's `settings` and `mode` are applied and the
    /// `profiles` table is dropped.
    pub fn materialize(&self, environment: Environment) -> ConfigResult<Self> {
        let env = self.env_config(environment)?;
        let build = merge_layers(&self.build, &[&env.overlay])?;

        Ok(Self {
            build,
            pages: self.pages.clone(),
            mode: self.mode_for(environment),
            profiles: HashMap::new(),
            settings: self.settings_for(environment)?,
        })
    }

    /// Planning mode, honouring a profile-level `mode` override.
    pub fn mode_for(&self, environment: Environment) -> BuildMode {
        self.profiles
            .get(environment.profile_name())
            .and_then(|profile| profile.mode)
            .unwrap_or(self.mode)
    }

    /// Global settings with the environment's profile applied.
    pub fn settings_for(&self, environment: Environment) -> ConfigResult<GlobalSettings> {
        let Some(profile) = self.profiles.get(environment.profile_name()) else {
            return Ok(self.settings.clone());
        };
        if profile.settings.is_null() {
            return Ok(self.settings.clone());
        }

        let mut base = serde_json::to_value(&self.settings).map_err(|err| {
            ConfigError::InvalidProfileOverride {
                message: err.to_string(),
            }
        })?;
        merge_values(&mut base, &profile.settings);
        serde_json::from_value(base).map_err(|err| ConfigError::InvalidProfileOverride {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_creates_config() {
        let value = json!({
            "build": { "out_dir": "public" },
            "pages": [{ "title": "Demo", "entry": { "app": "main.js" } }]
        });

        let config = FolioConfig::from_value(value).unwrap();
        assert_eq!(config.build.out_dir, std::path::PathBuf::from("public"));
        assert_eq!(config.mode, BuildMode::Isolated);
    }

    #[test]
    fn to_value_serializes_config() {
        let mut config = FolioConfig::default();
        config.build.minify = true;

        let value = config.to_value().unwrap();
        assert_eq!(value["build"]["minify"], json!(true));
    }

    #[test]
    fn no_pages_is_an_error() {
        let config = FolioConfig::default();
        assert!(matches!(
            config.page_descriptors().unwrap_err(),
            ConfigError::NoPages
        ));
    }

    #[test]
    fn env_config_layers_profile_over_defaults() {
        let config = FolioConfig::from_value(json!({
            "profiles": {
                "production": {
                    "build": { "hash_filenames": false, "plugins": ["compress"] }
                }
            }
        }))
        .unwrap();

        let env = config.env_config(Environment::Production).unwrap();
        assert_eq!(env.overlay["minify"], json!(true));
        assert_eq!(env.overlay["hash_filenames"], json!(false));
        assert_eq!(env.overlay["plugins"], json!(["compress"]));
    }

    #[test]
    fn profile_can_switch_mode() {
        let config = FolioConfig::from_value(json!({
            "mode": "isolated",
            "profiles": { "production": { "mode": "shared" } }
        }))
        .unwrap();

        assert_eq!(config.mode_for(Environment::Development), BuildMode::Isolated);
        assert_eq!(config.mode_for(Environment::Production), BuildMode::Shared);
    }

    #[test]
    fn settings_for_applies_profile() {
        let config = FolioConfig::from_value(json!({
            "settings": { "log_level": "info" },
            "profiles": { "development": { "settings": { "log_level": "debug" } } }
        }))
        .unwrap();

        let settings = config.settings_for(Environment::Development).unwrap();
        assert_eq!(settings.log_level.as_deref(), Some("debug"));
        let settings = config.settings_for(Environment::Production).unwrap();
        assert_eq!(settings.log_level.as_deref(), Some("info"));
    }

    #[test]
    fn materialize_applies_profile_and_drops_profiles() {
        let config = FolioConfig::from_value(json!({
            "build": { "plugins": ["base"] },
            "mode": "isolated",
            "pages": [{ "title": "Demo", "entry": { "app": "main.js" } }],
            "profiles": {
                "production": {
                    "build": { "plugins": ["prod"] },
                    "settings": { "log_level": "warn" },
                    "mode": "shared"
                }
            }
        }))
        .unwrap();

        let resolved = config.materialize(Environment::Production).unwrap();
        assert!(resolved.build.minify);
        assert_eq!(resolved.build.plugins, vec!["base", "prod"]);
        assert_eq!(resolved.mode, BuildMode::Shared);
        assert_eq!(resolved.settings.log_level.as_deref(), Some("warn"));
        assert!(resolved.profiles.is_empty());
    }
}
