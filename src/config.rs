use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/syncflow/syncflow.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub spam: SpamConfig,
    pub mms: MmsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpamConfig {
    pub threshold: f32,
    /// Extra whitelist entries, matched as case-insensitive substrings of the sender.
    pub trusted_senders: Vec<String>,
    /// User-blocked senders; matched after the whitelist.
    pub blocked_senders: Vec<String>,
    pub extra_keywords: Vec<String>,
}

impl Default for SpamConfig {
    fn default() -> Self {
        Self {
            threshold: crate::spam::DEFAULT_THRESHOLD,
            trusted_senders: Vec::new(),
            blocked_senders: Vec::new(),
            extra_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MmsConfig {
    /// Carrier-reported maximum message size in bytes.
    pub max_message_bytes: usize,
    pub max_image_width: Option<u32>,
    pub max_image_height: Option<u32>,
}

impl Default for MmsConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: 300 * 1024,
            max_image_width: Some(1280),
            max_image_height: Some(1280),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> Result<(), ConfigError> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.spam.threshold) {
            return Err(ConfigError::Invalid {
                field: "spam.threshold",
                message: format!("{} is outside 0.0..=1.0", self.spam.threshold),
            });
        }

        if self.mms.max_message_bytes == 0 {
            return Err(ConfigError::Invalid {
                field: "mms.max_message_bytes",
                message: "must be greater than zero".to_string(),
            });
        }

        for (field, value) in [
            ("mms.max_image_width", self.mms.max_image_width),
            ("mms.max_image_height", self.mms.max_image_height),
        ] {
            if value == Some(0) {
                return Err(ConfigError::Invalid {
                    field,
                    message: "must be greater than zero when set".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.spam.threshold, 0.5);
        assert_eq!(config.mms.max_message_bytes, 307_200);
    }

    #[test]
    fn test_partial_sections() {
        let yaml = r#"
spam:
  threshold: 0.7
  blocked_senders:
    - "+15550001111"
mms:
  max_message_bytes: 600000
  max_image_width: null
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.spam.threshold, 0.7);
        assert_eq!(config.spam.blocked_senders, vec!["+15550001111".to_string()]);
        assert!(config.spam.trusted_senders.is_empty());
        assert_eq!(config.mms.max_message_bytes, 600_000);
        assert_eq!(config.mms.max_image_width, None);
        assert_eq!(config.mms.max_image_height, Some(1280));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            Config::from_yaml("spam:\n  threshold: 1.5\n"),
            Err(ConfigError::Invalid {
                field: "spam.threshold",
                ..
            })
        ));
        assert!(matches!(
            Config::from_yaml("mms:\n  max_message_bytes: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Config::from_yaml("mms:\n  max_image_height: 0\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            Config::from_yaml("spam: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("syncflow-config-{}.yaml", std::process::id()));
        let path = path.to_string_lossy().to_string();

        let mut config = Config::default();
        config.spam.extra_keywords = vec!["crore".to_string()];
        config.to_file(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
