use crate::KEYS_PER_SPLIT;
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid splitter config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("keys_per_split must be at least 1")]
    ZeroKeysPerSplit,
}

///
/// SplitterConfig
///
/// Tunables for `QuerySplitter`. Every field has a default, so an empty
/// document is a valid configuration.
///
/// ```toml
/// keys_per_split = 32
/// strict = false
/// ```
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SplitterConfig {
    /// Scatter samples requested per desired boundary.
    pub keys_per_split: usize,

    /// Also reject queries the store cannot combine with a `__key__` range:
    /// limits, sort orders and inequality filters.
    pub strict: bool,
}

impl SplitterConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.keys_per_split == 0 {
            return Err(ConfigError::ZeroKeysPerSplit);
        }

        Ok(())
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            keys_per_split: KEYS_PER_SPLIT,
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SplitterConfig::from_toml_str("").expect("empty config should parse");

        assert_eq!(config, SplitterConfig::default());
        assert_eq!(config.keys_per_split, KEYS_PER_SPLIT);
        assert!(!config.strict);
    }

    #[test]
    fn overrides_are_applied() {
        let config = SplitterConfig::from_toml_str("keys_per_split = 8\nstrict = true\n")
            .expect("config should parse");

        assert_eq!(config.keys_per_split, 8);
        assert!(config.strict);
    }

    #[test]
    fn zero_keys_per_split_is_rejected() {
        let err = SplitterConfig::from_toml_str("keys_per_split = 0").unwrap_err();

        assert!(matches!(err, ConfigError::ZeroKeysPerSplit));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SplitterConfig::from_toml_str("num_shards = 4").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
