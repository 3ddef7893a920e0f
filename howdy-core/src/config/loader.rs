use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::value::ConfigValue;
use super::ConfigError;

/// Load and parse a YAML file, flattening it into the values map.
///
/// A missing file is skipped silently; unreadable or malformed files are
/// load errors.
pub(crate) fn load_yaml_file(
    path: &Path,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    if path.exists() {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        load_yaml_str(&content, values)?;
    }
    Ok(())
}

/// Load `.env.{profile}` and then `.env` into the process environment.
///
/// Variables that are already set are never overwritten, so the profile
/// file takes precedence over the base file and the real environment beats
/// both. A missing file is skipped silently; a malformed one is a load
/// error.
pub(crate) fn load_dotenv_files(profile: &str) -> Result<(), ConfigError> {
    apply_dotenv(dotenvy::from_filename(format!(".env.{profile}")))?;
    apply_dotenv(dotenvy::dotenv())
}

fn apply_dotenv(result: Result<PathBuf, dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ConfigError::Load(e.to_string())),
    }
}

/// Parse a YAML string and flatten it into the values map.
pub(crate) fn load_yaml_str(
    content: &str,
    values: &mut HashMap<String, ConfigValue>,
) -> Result<(), ConfigError> {
    let yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))?;
    flatten_yaml("", &yaml, values);
    Ok(())
}

/// Flatten a YAML tree into dot-separated keys.
///
/// Sequence items land under indexed keys (`key.0`, `key.1`, ...), which
/// keeps every entry addressable by an environment variable.
fn flatten_yaml(prefix: &str, node: &serde_yaml::Value, out: &mut HashMap<String, ConfigValue>) {
    match node {
        serde_yaml::Value::Mapping(map) => {
            for (key, child) in map {
                let name = match key {
                    serde_yaml::Value::String(s) => s.clone(),
                    other => format!("{other:?}"),
                };
                let child_key = if prefix.is_empty() {
                    name
                } else {
                    format!("{prefix}.{name}")
                };
                flatten_yaml(&child_key, child, out);
            }
        }
        serde_yaml::Value::Sequence(items) => {
            if !prefix.is_empty() {
                for (index, item) in items.iter().enumerate() {
                    let child_key = format!("{prefix}.{index}");
                    flatten_yaml(&child_key, item, out);
                }
            }
        }
        leaf => {
            if !prefix.is_empty() {
                out.insert(prefix.to_string(), ConfigValue::from_yaml(leaf));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> HashMap<String, ConfigValue> {
        let mut values = HashMap::new();
        load_yaml_str(yaml, &mut values).unwrap();
        values
    }

    #[test]
    fn nested_mappings_become_dotted_keys() {
        let values = parse("service:\n  message: \"hi\"\n  nested:\n    flag: true\n");
        assert!(matches!(
            values.get("service.message"),
            Some(ConfigValue::String(s)) if s == "hi"
        ));
        assert!(matches!(
            values.get("service.nested.flag"),
            Some(ConfigValue::Bool(true))
        ));
    }

    #[test]
    fn sequences_become_indexed_keys() {
        let values = parse("hosts:\n  - \"a\"\n  - \"b\"\n");
        assert!(matches!(values.get("hosts.0"), Some(ConfigValue::String(s)) if s == "a"));
        assert!(matches!(values.get("hosts.1"), Some(ConfigValue::String(s)) if s == "b"));
    }

    #[test]
    fn top_level_scalar_is_ignored() {
        let values = parse("\"just a string\"");
        assert!(values.is_empty());
    }

    #[test]
    fn null_leaf_is_kept() {
        let values = parse("service:\n  message:\n");
        assert!(matches!(values.get("service.message"), Some(ConfigValue::Null)));
    }
}
