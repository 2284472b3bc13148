use pagekit_blocks::{BlockRegistry, IdGenerator};
use pagekit_editor::{SessionConfig, DEFAULT_HISTORY_LEVELS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "pagekit.config.json";

/// Pagekit configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Quiet period before a property edit commits
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Undo levels kept per session (0 = unlimited)
    #[serde(default = "default_history_levels")]
    pub history_levels: usize,

    /// How new block ids are generated
    #[serde(default)]
    pub id_strategy: IdStrategy,

    /// Prefix for sequential ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_seed: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Random,
    Sequential,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_history_levels() -> usize {
    DEFAULT_HISTORY_LEVELS
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_debounce(Duration::from_millis(self.debounce_ms))
            .with_history_levels(self.history_levels)
    }

    pub fn registry(&self) -> BlockRegistry {
        match self.id_strategy {
            IdStrategy::Random => BlockRegistry::new(IdGenerator::random()),
            IdStrategy::Sequential => {
                BlockRegistry::sequential(self.id_seed.as_deref().unwrap_or("block"))
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            history_levels: default_history_levels(),
            id_strategy: IdStrategy::Random,
            id_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagekit_blocks::BlockType;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "debounceMs": 150,
            "historyLevels": 20,
            "idStrategy": "sequential",
            "idSeed": "page"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.history_levels, 20);
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert_eq!(config.session_config().debounce, Duration::from_millis(150));

        let mut registry = config.registry();
        assert_eq!(registry.create(BlockType::Text).id, "page-1");
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.session_config(), SessionConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().display().to_string()).unwrap();
        assert_eq!(config.id_strategy, IdStrategy::Random);
    }
}
