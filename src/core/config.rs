//! Persistent configuration for telecrafter.
//!
//! Stored at `~/Library/Application Support/telecrafter/config.toml` (macOS)
//! or `~/.local/share/telecrafter/config.toml` (Linux). The directory can be
//! moved with `TELECRAFTER_DATA_DIR`.
//!
//! Values can also be set via environment variables (higher priority).

use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use super::generator::{self, Mode, DEFAULT_COUNT};
use super::prefix::{self, Prefix};

const ENV_PREFIX: &str = "TELECRAFTER";

/// Keys understood by [`Settings::load`].
pub const KNOWN_KEYS: &[&str] = &["defaults.prefix", "defaults.mode", "defaults.count", "export.dir"];

/// Get the telecrafter data directory.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("TELECRAFTER_DATA_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("telecrafter")
}

/// Get the config file path.
pub fn config_path() -> PathBuf {
    data_dir().join("config.toml")
}

/// Env var consulted for `key`: "export.dir" → "TELECRAFTER_EXPORT_DIR".
fn env_key(key: &str) -> String {
    format!("{}_{}", ENV_PREFIX, key.replace('.', "_").to_uppercase())
}

/// Read a config value. Checks the env var first, then the config file.
pub fn get(key: &str) -> Option<String> {
    if let Ok(val) = std::env::var(env_key(key)) {
        if !val.is_empty() {
            return Some(val);
        }
    }
    load_config().unwrap_or_default().get(key).cloned()
}

/// Set a config value in the config file. Known keys are validated.
pub fn set(key: &str, value: &str) -> Result<()> {
    validate(key, value)?;
    let mut config = load_config().unwrap_or_default();
    config.insert(key.to_string(), value.to_string());
    save_config(&config)
}

/// Remove a config value from the config file.
pub fn unset(key: &str) -> Result<()> {
    let mut config = load_config().unwrap_or_default();
    config.remove(key);
    save_config(&config)
}

/// List all config values.
pub fn list() -> HashMap<String, String> {
    load_config().unwrap_or_default()
}

fn validate(key: &str, value: &str) -> Result<()> {
    // Values are written between double quotes with no escaping.
    if value.contains('"') {
        bail!("config values cannot contain '\"'");
    }
    match key {
        "defaults.prefix" => Prefix::parse(value).map(|_| ()),
        "defaults.mode" => Mode::from_str(value).map(|_| ()),
        "defaults.count" => {
            value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("defaults.count must be a number, got '{}'", value))?;
            Ok(())
        }
        "export.dir" if value.trim().is_empty() => bail!("export.dir cannot be empty"),
        "export.dir" => Ok(()),
        _ => bail!("unknown config key '{}' (known: {})", key, KNOWN_KEYS.join(", ")),
    }
}

/// Effective defaults for the form and the `generate` command.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub prefix: Prefix,
    pub mode: Mode,
    pub count: u32,
    pub export_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            prefix: prefix::DEFAULT,
            mode: Mode::Random,
            count: DEFAULT_COUNT,
            export_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Resolve settings from env and config file. Bad values are logged and
    /// replaced by the built-in default.
    pub fn load() -> Self {
        Self::from_lookup(get)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut s = Settings::default();

        if let Some(v) = lookup("defaults.prefix") {
            match Prefix::parse(&v) {
                Ok(p) => s.prefix = p,
                Err(e) => log::warn!("ignoring defaults.prefix: {}", e),
            }
        }
        if let Some(v) = lookup("defaults.mode") {
            match Mode::from_str(v.trim()) {
                Ok(m) => s.mode = m,
                Err(e) => log::warn!("ignoring defaults.mode: {}", e),
            }
        }
        if let Some(v) = lookup("defaults.count") {
            s.count = generator::parse_count(&v);
        }
        if let Some(v) = lookup("export.dir") {
            s.export_dir = PathBuf::from(v);
        }
        s
    }
}

fn load_config() -> Result<HashMap<String, String>> {
    let path = config_path();
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(_) => return Ok(HashMap::new()),
    };
    Ok(parse_config(&content))
}

/// Simple key=value format (one per line). Lines starting with # are
/// comments. Section headers [name] prefix subsequent keys.
fn parse_config(content: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let mut section = String::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        if let Some(eq_pos) = line.find('=') {
            let key = line[..eq_pos].trim();
            let value = line[eq_pos + 1..].trim().trim_matches('"');
            let full_key = if section.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", section, key)
            };
            map.insert(full_key, value.to_string());
        }
    }

    map
}

/// Render in the same TOML-like format, sections sorted.
fn render_config(config: &HashMap<String, String>) -> String {
    let mut sections: BTreeMap<&str, BTreeMap<&str, &str>> = BTreeMap::new();
    for (key, value) in config {
        let (section, field) = key.split_once('.').unwrap_or(("", key.as_str()));
        sections.entry(section).or_default().insert(field, value.as_str());
    }

    let mut output = String::new();

    // Top-level keys sort first under the empty section name
    for (name, fields) in &sections {
        if !name.is_empty() {
            output.push_str(&format!("[{}]\n", name));
        }
        for (k, v) in fields {
            output.push_str(&format!("{} = \"{}\"\n", k, v));
        }
        output.push('\n');
    }

    output
}

fn save_config(config: &HashMap<String, String>) -> Result<()> {
    let dir = data_dir();
    std::fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = config_path();
    std::fs::write(&path, render_config(config))
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(())
}
