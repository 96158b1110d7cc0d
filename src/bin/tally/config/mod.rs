use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use atom_tally::ParserConfig;
use serde::Deserialize;

use crate::cli::{CommonOptions, OutputFormat};

/// Effective settings after merging the config file and command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub parser: ParserConfig,
    pub format: OutputFormat,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    parser: ParserConfig,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSection {
    format: Option<OutputFormat>,
}

pub fn build_settings(opts: &CommonOptions) -> Result<Settings> {
    let file = match &opts.config {
        Some(path) => load_file(path)?,
        None => FileConfig::default(),
    };
    merge(file, opts)
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_file(&text).with_context(|| format!("Invalid config file: {}", path.display()))
}

fn parse_file(text: &str) -> Result<FileConfig> {
    toml::from_str(text).map_err(|e| atom_tally::ConfigError::Parse(e).into())
}

fn merge(file: FileConfig, opts: &CommonOptions) -> Result<Settings> {
    let mut parser = file.parser;
    if let Some(depth) = opts.max_depth {
        parser.max_depth = depth;
    }
    parser.validate()?;

    let format = opts.format.or(file.output.format).unwrap_or_default();

    Ok(Settings { parser, format })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atom_tally::{ConfigError, DEFAULT_MAX_DEPTH};

    fn opts() -> CommonOptions {
        CommonOptions {
            format: None,
            max_depth: None,
            config: None,
            quiet: false,
        }
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = build_settings(&opts()).unwrap();
        assert_eq!(settings.parser.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(settings.format, OutputFormat::Lines);
    }

    #[test]
    fn file_values_apply() {
        let file = parse_file(
            r#"
            [parser]
            max_depth = 12

            [output]
            format = "toml"
            "#,
        )
        .unwrap();
        let settings = merge(file, &opts()).unwrap();
        assert_eq!(settings.parser.max_depth, 12);
        assert_eq!(settings.format, OutputFormat::Toml);
    }

    #[test]
    fn flags_override_file() {
        let file = parse_file(
            r#"
            [parser]
            max_depth = 12

            [output]
            format = "toml"
            "#,
        )
        .unwrap();
        let mut o = opts();
        o.max_depth = Some(4);
        o.format = Some(OutputFormat::Compact);

        let settings = merge(file, &o).unwrap();
        assert_eq!(settings.parser.max_depth, 4);
        assert_eq!(settings.format, OutputFormat::Compact);
    }

    #[test]
    fn zero_depth_flag_is_rejected() {
        let mut o = opts();
        o.max_depth = Some(0);
        let err = build_settings(&o).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }

    #[test]
    fn depth_flag_above_ceiling_is_rejected() {
        let mut o = opts();
        o.max_depth = Some(1_000_000);
        let err = build_settings(&o).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::InvalidValue {
                field: "max_depth",
                ..
            })
        ));
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = parse_file("[parsr]\nmax_depth = 3").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let mut o = opts();
        o.config = Some("/nonexistent/tally.toml".into());
        let err = build_settings(&o).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tally.toml"));
    }
}
