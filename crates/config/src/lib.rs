//! Manages application configuration by loading settings from standard locations.
//!
//! This crate provides a unified configuration object (`Config`) that aggregates
//! settings from files and environment variables, making them accessible
//! globally via a lazily initialized static reference (`CONFIG`).
//!
//! Library code never reads [`CONFIG`] directly; it is handed a
//! [`ValidationConfig`] value at construction time instead.

use std::sync::LazyLock;

use etcetera::BaseStrategy;
use figment::providers::{Env, Format, Toml};
use figment::{Figment, Metadata, Provider};
use serde::{Deserialize, Serialize};

/// The default configuration values
const DEFAULT_TOML_CONFIG: &str = include_str!("./pkglint.default.toml");

/// The ceiling on package identifier length shared by the identifier grammar and the
/// rule catalog.
pub const DEFAULT_MAX_ID_LENGTH: usize = 100;

const ENV_PREFIX: &str = "PKGLINT_";

//================================================================================================
// Statics
//================================================================================================

/// Provides a lazily instantiated static reference to the application `Config`.
///
/// This static variable ensures that configuration is parsed only once from
/// canonical locations and then made immutably available throughout the
/// application's lifecycle.
pub static CONFIG: LazyLock<Config> = LazyLock::new(load_config);

//================================================================================================
// Types
//================================================================================================

/// Settings consumed by the manifest validation engine.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum length of a package identifier, in characters.
    pub max_id_length: usize,
    /// Whether dependency ids, version ranges and target frameworks declared in
    /// dependency and framework groups are validated as well.
    pub strict_group_validation: bool,
    /// URL schemes accepted for the icon, project and license URLs.
    pub allowed_url_schemes: Vec<String>,
}

/// Represents the application's primary configuration structure.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Validation engine settings.
    #[serde(default)]
    pub validation: ValidationConfig,
}

//================================================================================================
// Impls
//================================================================================================

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_id_length: DEFAULT_MAX_ID_LENGTH,
            strict_group_validation: false,
            allowed_url_schemes: vec!["http".into(), "https".into()],
        }
    }
}

impl ValidationConfig {
    /// Returns a copy of these settings with group validation toggled.
    pub fn with_strict_groups(mut self, strict: bool) -> Self {
        self.strict_group_validation = strict;
        self
    }
}

impl Config {
    /// Constructs a `Figment` instance for configuration loading.
    ///
    /// This method builds a configuration provider by layering default settings,
    /// user-specific configuration files, and environment variables.
    pub fn figment() -> Figment {
        let mut fig = Figment::from(Config::default()).merge(Toml::string(DEFAULT_TOML_CONFIG));

        if let Ok(c) = etcetera::choose_base_strategy() {
            let config = c.config_dir().join("pkglint.toml");
            fig = fig.merge(Toml::file(config));
        }

        fig.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Creates a `Config` instance from a given provider.
    pub fn from<T: Provider>(provider: T) -> Result<Config, Box<figment::Error>> {
        Figment::from(provider).extract().map_err(Box::new)
    }
}

impl Provider for Config {
    fn metadata(&self) -> figment::Metadata {
        Metadata::named("pkglint Config")
    }

    fn data(
        &self,
    ) -> Result<figment::value::Map<figment::Profile, figment::value::Dict>, figment::Error> {
        figment::providers::Serialized::defaults(self).data()
    }
}

//================================================================================================
// Functions
//================================================================================================

/// Loads the application configuration using the default `Figment` provider.
///
/// This function is used to initialize the `CONFIG` static variable.
fn load_config() -> Config {
    Config::figment().extract().unwrap_or_else(|e| {
        tracing::error!(error = %e, "problem loading config from default sources, falling back to defaults");
        Config::default()
    })
}
