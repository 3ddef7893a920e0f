mod loader;
pub mod section;
pub mod value;

use std::collections::HashMap;
use std::path::Path;

pub use section::ConfigSection;
pub use value::{ConfigValue, FromConfigValue};

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// The requested key was not found in the configuration.
    NotFound(String),
    /// The value could not be converted to the requested type.
    TypeMismatch { key: String, expected: &'static str },
    /// An I/O or YAML parsing error occurred while loading config files.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NotFound(key) => write!(f, "missing config key: {key}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "config value for '{key}' is not a valid {expected}")
            }
            ConfigError::Load(msg) => write!(f, "failed to load configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application configuration loaded from YAML files, `.env` files, and
/// environment variables, flattened into dot-separated keys.
///
/// Resolution order (lowest to highest priority):
/// 1. `application.yaml` (base)
/// 2. `application-{profile}.yaml` (profile override)
/// 3. `.env` file (loaded into the process environment)
/// 4. `.env.{profile}` file (loaded into the process environment)
/// 5. Environment variables (e.g. `SERVICE_MESSAGE` overrides `service.message`)
///
/// `.env` files never overwrite already-set environment variables; the
/// profile file is loaded first, which is what gives it precedence over
/// `.env`. All files are looked up in the current working directory; an
/// absent file is not an error, a malformed one is.
///
/// Profile is determined by: `HOWDY_PROFILE` env var > argument > default `"dev"`.
#[derive(Debug, Clone)]
pub struct HowdyConfig {
    values: HashMap<String, ConfigValue>,
    profile: String,
}

impl HowdyConfig {
    /// Load configuration for the given profile.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let active_profile =
            std::env::var("HOWDY_PROFILE").unwrap_or_else(|_| profile.to_string());

        let mut values = HashMap::new();

        // 1. Base config
        loader::load_yaml_file(Path::new("application.yaml"), &mut values)?;

        // 2. Profile config
        let profile_path = format!("application-{active_profile}.yaml");
        loader::load_yaml_file(Path::new(&profile_path), &mut values)?;

        // 3. .env files; the profile file goes first so it wins, and
        //    variables that are already set are never overwritten
        loader::load_dotenv_files(&active_profile)?;

        // 4. Environment overlay: SERVICE_MESSAGE <-> service.message
        for (env_key, env_val) in std::env::vars() {
            let config_key = env_key.to_lowercase().replace('_', ".");
            values.insert(config_key, ConfigValue::String(env_val));
        }

        Ok(HowdyConfig {
            values,
            profile: active_profile,
        })
    }

    /// Create a config from a YAML string (useful for testing).
    pub fn from_yaml_str(yaml: &str, profile: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        loader::load_yaml_str(yaml, &mut values)?;
        Ok(HowdyConfig {
            values,
            profile: profile.to_string(),
        })
    }

    /// Create an empty config (useful for testing).
    pub fn empty() -> Self {
        HowdyConfig {
            values: HashMap::new(),
            profile: "test".to_string(),
        }
    }

    /// Get a typed value for the given dot-separated key.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the key does not exist, or
    /// `ConfigError::TypeMismatch` if the value cannot be converted.
    pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| ConfigError::NotFound(key.to_string()))?;
        T::from_config_value(value, key)
    }

    /// Get a typed value, returning a default if the key is missing.
    pub fn get_or<T: FromConfigValue>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Check whether a key exists in the config.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Set a value programmatically.
    pub fn set(&mut self, key: &str, value: ConfigValue) {
        self.values.insert(key.to_string(), value);
    }

    /// The active profile name.
    pub fn profile(&self) -> &str {
        &self.profile
    }
}
