use howdy_core::config::{ConfigError, ConfigSection, ConfigValue, HowdyConfig};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ── In-memory behavior ───────────────────────────────────────────────────

#[test]
fn test_empty_config() {
    let config = HowdyConfig::empty();
    assert!(config.get::<String>("nonexistent").is_err());
}

#[test]
fn test_set_and_get() {
    let mut config = HowdyConfig::empty();
    config.set("app.name", ConfigValue::String("howdy".into()));
    assert_eq!(config.get::<String>("app.name").unwrap(), "howdy");
}

#[test]
fn test_get_or_default() {
    let config = HowdyConfig::empty();
    assert_eq!(config.get_or("missing", 42i64), 42);
}

#[test]
fn test_type_conversions() {
    let mut config = HowdyConfig::empty();
    config.set("int_val", ConfigValue::Integer(42));
    config.set("bool_val", ConfigValue::Bool(true));
    config.set("null_val", ConfigValue::Null);

    assert_eq!(config.get::<i64>("int_val").unwrap(), 42);
    assert!(config.get::<bool>("bool_val").unwrap());
    assert_eq!(config.get::<String>("int_val").unwrap(), "42");
    assert!(config.get::<Option<String>>("null_val").unwrap().is_none());
}

#[test]
fn test_string_values_parse_as_numbers() {
    let mut config = HowdyConfig::empty();
    config.set("port", ConfigValue::String("8080".into()));
    assert_eq!(config.get::<u16>("port").unwrap(), 8080);
    assert_eq!(config.get::<i64>("port").unwrap(), 8080);
}

#[test]
fn test_u16_out_of_range() {
    let mut config = HowdyConfig::empty();
    config.set("port", ConfigValue::Integer(70_000));
    let err = config.get::<u16>("port").unwrap_err();
    assert!(matches!(err, ConfigError::TypeMismatch { .. }));
}

#[test]
fn test_null_is_not_a_string() {
    let mut config = HowdyConfig::empty();
    config.set("key", ConfigValue::Null);
    assert!(config.get::<String>("key").is_err());
}

#[test]
fn test_contains_key() {
    let mut config = HowdyConfig::empty();
    config.set("exists", ConfigValue::String("yes".into()));
    assert!(config.contains_key("exists"));
    assert!(!config.contains_key("nope"));
}

#[test]
fn test_flatten_yaml() {
    let yaml = r#"
service:
  message: "Greetings"
server:
  port: 9090
"#;
    let config = HowdyConfig::from_yaml_str(yaml, "test").unwrap();

    assert_eq!(config.get::<String>("service.message").unwrap(), "Greetings");
    assert_eq!(config.get::<u16>("server.port").unwrap(), 9090);
    assert_eq!(config.profile(), "test");
}

#[test]
fn test_list_indexed_access() {
    let yaml = r#"
app:
  features:
    - "greeting"
    - "health"
"#;
    let config = HowdyConfig::from_yaml_str(yaml, "test").unwrap();
    assert_eq!(config.get::<String>("app.features.0").unwrap(), "greeting");
    assert_eq!(config.get::<String>("app.features.1").unwrap(), "health");
}

#[test]
fn test_invalid_yaml_is_load_error() {
    let err = HowdyConfig::from_yaml_str("service: [unclosed", "test").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

// ── ConfigSection ────────────────────────────────────────────────────────

struct DemoSettings {
    name: String,
    retries: i64,
}

impl ConfigSection for DemoSettings {
    fn prefix() -> &'static str {
        "demo"
    }

    fn from_config(config: &HowdyConfig) -> Result<Self, ConfigError> {
        Ok(DemoSettings {
            name: config.get(&Self::key("name"))?,
            retries: config.get_or(&Self::key("retries"), 3),
        })
    }
}

#[test]
fn test_section_key_joins_prefix() {
    assert_eq!(DemoSettings::key("name"), "demo.name");
}

#[test]
fn test_section_from_config() {
    let yaml = r#"
demo:
  name: "howdy"
"#;
    let config = HowdyConfig::from_yaml_str(yaml, "test").unwrap();
    let settings = DemoSettings::from_config(&config).unwrap();
    assert_eq!(settings.name, "howdy");
    assert_eq!(settings.retries, 3);
}

#[test]
fn test_section_missing_required_key() {
    let config = HowdyConfig::empty();
    assert!(DemoSettings::from_config(&config).is_err());
}

// ── File and environment loading ─────────────────────────────────────────
//
// These tests change the working directory and the process environment,
// so they are serialized and clean up after themselves.

struct CwdGuard {
    original: PathBuf,
}

impl CwdGuard {
    fn new(path: &Path) -> Self {
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(path).unwrap();
        CwdGuard { original }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

#[test]
#[serial]
fn load_reads_base_yaml() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write("application.yaml", "service:\n  message: \"from base\"\n").unwrap();

    let config = HowdyConfig::load("nosuchprofile").unwrap();
    assert_eq!(config.get::<String>("service.message").unwrap(), "from base");
}

#[test]
#[serial]
fn load_without_files_is_empty_but_ok() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());

    let config = HowdyConfig::load("nosuchprofile").unwrap();
    assert!(config.get::<String>("service.message").is_err());
}

#[test]
#[serial]
fn load_profile_overrides_base() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(
        "application.yaml",
        "service:\n  message: \"base\"\nserver:\n  port: 8080\n",
    )
    .unwrap();
    fs::write("application-prod.yaml", "service:\n  message: \"prod\"\n").unwrap();

    let config = HowdyConfig::load("prod").unwrap();
    assert_eq!(config.get::<String>("service.message").unwrap(), "prod");
    // keys absent from the profile file keep their base value
    assert_eq!(config.get::<u16>("server.port").unwrap(), 8080);
    assert_eq!(config.profile(), "prod");
}

#[test]
#[serial]
fn load_honors_profile_env_var() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write("application-staging.yaml", "service:\n  message: \"staged\"\n").unwrap();
    std::env::set_var("HOWDY_PROFILE", "staging");

    let config = HowdyConfig::load("dev").unwrap();

    std::env::remove_var("HOWDY_PROFILE");
    assert_eq!(config.profile(), "staging");
    assert_eq!(config.get::<String>("service.message").unwrap(), "staged");
}

#[test]
#[serial]
fn load_env_var_overrides_yaml() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write("application.yaml", "service:\n  message: \"from file\"\n").unwrap();
    std::env::set_var("SERVICE_MESSAGE", "from env");

    let config = HowdyConfig::load("nosuchprofile").unwrap();

    std::env::remove_var("SERVICE_MESSAGE");
    assert_eq!(config.get::<String>("service.message").unwrap(), "from env");
}

#[test]
#[serial]
fn load_reads_dotenv_file() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(".env", "SERVICE_MESSAGE=\"from dotenv\"\n").unwrap();

    let config = HowdyConfig::load("nosuchprofile").unwrap();

    std::env::remove_var("SERVICE_MESSAGE");
    assert_eq!(config.get::<String>("service.message").unwrap(), "from dotenv");
}

#[test]
#[serial]
fn load_reads_profile_dotenv_file() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(".env.ci", "SERVICE_MESSAGE=\"from ci dotenv\"\n").unwrap();

    let config = HowdyConfig::load("ci").unwrap();

    std::env::remove_var("SERVICE_MESSAGE");
    assert_eq!(
        config.get::<String>("service.message").unwrap(),
        "from ci dotenv"
    );
}

#[test]
#[serial]
fn load_profile_dotenv_beats_base_dotenv() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(".env", "SERVICE_MESSAGE=\"from base dotenv\"\n").unwrap();
    fs::write(".env.ci", "SERVICE_MESSAGE=\"from ci dotenv\"\n").unwrap();

    let config = HowdyConfig::load("ci").unwrap();

    std::env::remove_var("SERVICE_MESSAGE");
    assert_eq!(
        config.get::<String>("service.message").unwrap(),
        "from ci dotenv"
    );
}

#[test]
#[serial]
fn load_real_env_beats_dotenv() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(".env", "SERVICE_MESSAGE=\"from dotenv\"\n").unwrap();
    std::env::set_var("SERVICE_MESSAGE", "from real env");

    let config = HowdyConfig::load("nosuchprofile").unwrap();

    std::env::remove_var("SERVICE_MESSAGE");
    assert_eq!(
        config.get::<String>("service.message").unwrap(),
        "from real env"
    );
}

#[test]
#[serial]
fn load_rejects_malformed_dotenv() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    // unquoted value with spaces does not parse
    fs::write(".env", "SERVICE_MESSAGE=howdy partner\n").unwrap();

    let err = HowdyConfig::load("nosuchprofile").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)), "unexpected: {err}");
}

#[test]
#[serial]
fn load_rejects_malformed_profile_dotenv() {
    let tmp = TempDir::new().unwrap();
    let _cwd = CwdGuard::new(tmp.path());
    fs::write(".env.ci", "SERVICE_MESSAGE=howdy partner\n").unwrap();

    let err = HowdyConfig::load("ci").unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)), "unexpected: {err}");
}
