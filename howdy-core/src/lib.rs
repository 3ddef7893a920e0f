pub mod config;
pub mod message;

pub use config::{ConfigError, ConfigSection, ConfigValue, FromConfigValue, HowdyConfig};
pub use message::{MessageProvider, MessageSettings, DEFAULT_MESSAGE};
