use super::{ConfigError, HowdyConfig};

/// Trait for strongly-typed configuration sections.
///
/// A section owns a key prefix (e.g. `"service"`) and knows how to construct
/// itself from a [`HowdyConfig`]. Implementations apply defaults only when a
/// key is missing or explicitly null; a present-but-invalid value is an
/// error, so bad configuration is rejected at startup rather than papered
/// over.
///
/// ```
/// use howdy_core::config::{ConfigError, ConfigSection, HowdyConfig};
///
/// struct GreetingSettings {
///     prefix: String,
/// }
///
/// impl ConfigSection for GreetingSettings {
///     fn prefix() -> &'static str {
///         "greeting"
///     }
///
///     fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError> {
///         Ok(GreetingSettings {
///             prefix: config.get_or(&Self::key("prefix"), String::new()),
///         })
///     }
/// }
///
/// assert_eq!(GreetingSettings::key("prefix"), "greeting.prefix");
/// ```
pub trait ConfigSection: Sized {
    /// The configuration key prefix for this section.
    fn prefix() -> &'static str;

    /// The absolute key for a field of this section: `"{prefix}.{name}"`.
    fn key(name: &str) -> String {
        format!("{}.{name}", Self::prefix())
    }

    /// Construct the section from loaded configuration.
    fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError>;
}
