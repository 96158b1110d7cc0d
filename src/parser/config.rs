use super::error::ConfigError;
use serde::Deserialize;

/// Nesting depth allowed when no configuration says otherwise.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard ceiling on nesting depth. Each open group costs stack frames, so no
/// configuration may go past this.
pub const MAX_SUPPORTED_DEPTH: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
    /// Deepest group nesting accepted before parsing fails with
    /// [`NestingTooDeep`](super::ParseError::NestingTooDeep). Values above
    /// [`MAX_SUPPORTED_DEPTH`] fail validation and are capped by the parser.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl ParserConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses a configuration from TOML and validates it.
    ///
    /// The text holds the fields of this struct at its top level; missing
    /// fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ParserConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::invalid_value(
                "max_depth",
                "must be at least 1",
            ));
        }
        if self.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConfigError::invalid_value(
                "max_depth",
                format!("must be at most {MAX_SUPPORTED_DEPTH}"),
            ));
        }
        Ok(())
    }

    /// The depth the parser actually enforces.
    pub(crate) fn depth_limit(&self) -> usize {
        self.max_depth.min(MAX_SUPPORTED_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parses_custom_depth() {
        let config = ParserConfig::from_toml_str("max_depth = 16").unwrap();
        assert_eq!(config.max_depth, 16);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = ParserConfig::from_toml_str("").unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn rejects_zero_depth() {
        let err = ParserConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_depth",
                ..
            }
        ));
    }

    #[test]
    fn rejects_depth_above_ceiling() {
        let text = format!("max_depth = {}", MAX_SUPPORTED_DEPTH + 1);
        let err = ParserConfig::from_toml_str(&text).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_depth",
                ..
            }
        ));
        assert!(err.to_string().contains("at most 512"));
    }

    #[test]
    fn accepts_depth_at_ceiling() {
        let text = format!("max_depth = {MAX_SUPPORTED_DEPTH}");
        let config = ParserConfig::from_toml_str(&text).unwrap();
        assert_eq!(config.depth_limit(), MAX_SUPPORTED_DEPTH);
    }

    #[test]
    fn builder_value_is_capped_at_ceiling() {
        let config = ParserConfig::default().with_max_depth(usize::MAX);
        assert!(config.validate().is_err());
        assert_eq!(config.depth_limit(), MAX_SUPPORTED_DEPTH);
    }

    #[test]
    fn errors_on_invalid_toml() {
        let result = ParserConfig::from_toml_str("not valid [[[toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn errors_on_unknown_field() {
        let result = ParserConfig::from_toml_str("max_dept = 4");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn builder_overrides_depth() {
        let config = ParserConfig::default().with_max_depth(3);
        assert_eq!(config.max_depth, 3);
    }
}
