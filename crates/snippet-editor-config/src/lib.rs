use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// How many numbered snippets each list starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnippetSeed {
    pub available: usize,
    pub selected: usize,
}

impl Default for SnippetSeed {
    fn default() -> Self {
        Self {
            available: 10,
            selected: 5,
        }
    }
}

/// User settings for the editor front end.
///
/// Every field has a default, so a partial file (or none at all) is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Key combo to mark name, e.g. `"mod+b" = "bold"`.
    pub hotkeys: BTreeMap<String, String>,
    pub snippets: SnippetSeed,
    /// Where the log goes; `~` and `$VARS` are expanded on load.
    pub log_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let hotkeys = [
            ("mod+b", "bold"),
            ("mod+i", "italic"),
            ("mod+u", "underline"),
            ("mod+`", "code"),
        ]
        .into_iter()
        .map(|(combo, mark)| (combo.to_string(), mark.to_string()))
        .collect();
        Self {
            hotkeys,
            snippets: SnippetSeed::default(),
            log_path: None,
        }
    }
}

impl Config {
    /// Read the config at `config_path`, falling back to defaults when the
    /// file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.log_path = config
            .log_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(config)
    }

    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/snippet-editor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Hotkey bindings as `(combo, mark name)` pairs.
    pub fn hotkey_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hotkeys
            .iter()
            .map(|(combo, mark)| (combo.as_str(), mark.as_str()))
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
