use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PuliError, Result};
use crate::suggest::find_alternatives;

const CONFIG_DIR: &str = "puli";
const CONFIG_FILE: &str = "config.toml";

/// Known configuration keys and their built-in values.
pub const DEFAULTS: &[(&str, &str)] = &[
    ("puli-dir", ".puli"),
    ("factory.auto-generate", "true"),
    ("factory.out.class", "GeneratedPuliFactory"),
    ("repository.type", "json"),
    ("discovery.type", "json"),
];

/// User-wide configuration, shared by every project.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GlobalConfig {
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

/// Where an effective configuration value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Default,
    Global,
    Project,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Origin::Default => "default",
            Origin::Global => "global",
            Origin::Project => "project",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue {
    pub value: String,
    pub origin: Origin,
}

/// Returns the global config file location.
pub fn global_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_home = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home.join(".config"));
    config_home.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Reads the global config, returning an empty config if missing.
pub fn read_global(path: &Path) -> Result<GlobalConfig> {
    if !path.exists() {
        return Ok(GlobalConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Writes the global config, creating parent directories as needed.
pub fn write_global(path: &Path, config: &GlobalConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

pub fn default_value(key: &str) -> Option<&'static str> {
    DEFAULTS
        .iter()
        .find(|(known, _)| *known == key)
        .map(|(_, value)| *value)
}

/// Fails for keys that are not known configuration keys.
pub fn check_key(key: &str) -> Result<()> {
    if default_value(key).is_some() {
        return Ok(());
    }

    let alternatives = find_alternatives(key, DEFAULTS.iter().map(|(known, _)| *known));
    let mut message = format!("The config key \"{}\" does not exist.", key);
    if let Some(first) = alternatives.first() {
        message.push_str(&format!(" Did you mean \"{}\"?", first));
    }
    Err(PuliError::Message(message))
}

/// Merges defaults, global and project values, later layers winning.
pub fn effective(
    global: &BTreeMap<String, String>,
    project: &BTreeMap<String, String>,
) -> BTreeMap<String, ConfigValue> {
    let mut merged: BTreeMap<String, ConfigValue> = DEFAULTS
        .iter()
        .map(|(key, value)| {
            (
                key.to_string(),
                ConfigValue {
                    value: value.to_string(),
                    origin: Origin::Default,
                },
            )
        })
        .collect();

    let layers = [(global, Origin::Global), (project, Origin::Project)];
    for (values, origin) in layers {
        for (key, value) in values {
            merged.insert(
                key.clone(),
                ConfigValue {
                    value: value.clone(),
                    origin,
                },
            );
        }
    }
    merged
}
