//! The message provider: one configured greeting, held immutably.
//!
//! Mirrors the split between a reusable service library and the application
//! that wires it: [`MessageSettings`] binds the `service.*` config section,
//! [`MessageProvider`] holds the resolved value and hands it out.

use crate::config::{ConfigError, ConfigSection, HowdyConfig};

/// Greeting used when `service.message` is not configured (or is null).
///
/// An empty string is a *configured* value and is served verbatim; only a
/// truly absent key falls back to this default.
pub const DEFAULT_MESSAGE: &str = "Hello";

/// Typed view of the `service.*` configuration section.
#[derive(Debug, Clone)]
pub struct MessageSettings {
    /// The greeting to serve, from `service.message` (env: `SERVICE_MESSAGE`).
    pub message: String,
}

impl ConfigSection for MessageSettings {
    fn prefix() -> &'static str {
        "service"
    }

    fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError> {
        let message = match config.get::<Option<String>>(&Self::key("message")) {
            Ok(Some(message)) => message,
            Ok(None) => DEFAULT_MESSAGE.to_string(),
            Err(ConfigError::NotFound(_)) => DEFAULT_MESSAGE.to_string(),
            Err(e) => return Err(e),
        };
        Ok(MessageSettings { message })
    }
}

/// Holds the configured greeting string for the lifetime of the process.
///
/// The value is fixed at construction; there is no mutator, so clones can be
/// shared across request handlers and read concurrently without
/// synchronization.
#[derive(Debug, Clone)]
pub struct MessageProvider {
    message: String,
}

impl MessageProvider {
    /// Create a provider holding `message`. Any string is accepted,
    /// including the empty string.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Construct the provider from loaded configuration, applying
    /// [`DEFAULT_MESSAGE`] when `service.message` is absent.
    pub fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError> {
        let settings = MessageSettings::from_config(config)?;
        Ok(Self::new(settings.message))
    }

    /// The configured message, exactly as configured.
    pub fn message(&self) -> &str {
        &self.message
    }
}
