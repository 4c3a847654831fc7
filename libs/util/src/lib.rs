use std::path::Path;

use anyhow::Context;
use toml::{map::Map, Value};

pub fn load_config(path: impl AsRef<Path>) -> anyhow::Result<Map<String, Value>> {
    let path = path.as_ref();
    let config = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    toml::from_str::<Map<String, Value>>(&config)
        .with_context(|| format!("failed to parse {}", path.display()))
}

pub fn section<'a>(
    config: &'a Map<String, Value>,
    name: &str,
) -> anyhow::Result<&'a Value> {
    config
        .get(name)
        .with_context(|| format!("failed to load {} config", name))
}

pub fn get_str(
    config: &Map<String, Value>,
    section_name: &str,
    key: &str,
) -> anyhow::Result<String> {
    Ok(section(config, section_name)?
        .get(key)
        .with_context(|| format!("failed to load {} config", key))?
        .as_str()
        .with_context(|| format!("failed to parse {} config", key))?
        .to_string())
}

pub fn get_integer(
    config: &Map<String, Value>,
    section_name: &str,
    key: &str,
) -> anyhow::Result<i64> {
    section(config, section_name)?
        .get(key)
        .with_context(|| format!("failed to load {} config", key))?
        .as_integer()
        .with_context(|| format!("failed to parse {} config", key))
}

/// Like [`get_integer`], but a missing key yields `default`.
pub fn get_integer_or(
    config: &Map<String, Value>,
    section_name: &str,
    key: &str,
    default: i64,
) -> anyhow::Result<i64> {
    match section(config, section_name)?.get(key) {
        Some(value) => value
            .as_integer()
            .with_context(|| format!("failed to parse {} config", key)),
        None => Ok(default),
    }
}

pub fn get_bool_or(
    config: &Map<String, Value>,
    section_name: &str,
    key: &str,
    default: bool,
) -> anyhow::Result<bool> {
    match section(config, section_name)?.get(key) {
        Some(value) => value
            .as_bool()
            .with_context(|| format!("failed to parse {} config", key)),
        None => Ok(default),
    }
}
