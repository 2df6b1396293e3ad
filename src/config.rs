use crate::checker::languagetool::DEFAULT_API_URL;
use crate::highlight::word_diff::DiffStrategy;
use crate::highlight::{HighlightOptions, Marker, DEFAULT_INPUT_COLOR, DEFAULT_OUTPUT_COLOR};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".gramlight.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub api_url: String,
    pub timeout_secs: u64,
    pub input_highlight_color: String,
    pub output_highlight_color: String,
    pub diff_strategy: DiffStrategy,
    pub highlight_appended_words: bool,
    pub disabled_rules: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            input_highlight_color: DEFAULT_INPUT_COLOR.to_string(),
            output_highlight_color: DEFAULT_OUTPUT_COLOR.to_string(),
            diff_strategy: DiffStrategy::Positional,
            highlight_appended_words: false,
            disabled_rules: Vec::new(),
        }
    }
}

/// Settings given on the command line; `None` leaves the file value alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<String>,
    pub api_url: Option<String>,
    pub diff_strategy: Option<DiffStrategy>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global_config = Self::from_file(&global_path)?;
                config = config.merge(global_config);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        config.apply(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    fn merge(mut self, other: Self) -> Self {
        // Values left at their defaults in `other` do not override `self`.
        let defaults = Self::default();
        if other.language != defaults.language {
            self.language = other.language;
        }
        if other.api_url != defaults.api_url {
            self.api_url = other.api_url;
        }
        if other.timeout_secs != defaults.timeout_secs {
            self.timeout_secs = other.timeout_secs;
        }
        if other.input_highlight_color != defaults.input_highlight_color {
            self.input_highlight_color = other.input_highlight_color;
        }
        if other.output_highlight_color != defaults.output_highlight_color {
            self.output_highlight_color = other.output_highlight_color;
        }
        if other.diff_strategy != defaults.diff_strategy {
            self.diff_strategy = other.diff_strategy;
        }
        if other.highlight_appended_words != defaults.highlight_appended_words {
            self.highlight_appended_words = other.highlight_appended_words;
        }
        if !other.disabled_rules.is_empty() {
            self.disabled_rules = other.disabled_rules;
        }
        self
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(language) = overrides.language {
            self.language = language;
        }
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(strategy) = overrides.diff_strategy {
            self.diff_strategy = strategy;
        }
    }

    pub fn highlight_options(&self) -> HighlightOptions {
        HighlightOptions {
            input_marker: Marker::background(&self.input_highlight_color),
            output_marker: Marker::background(&self.output_highlight_color),
            diff_strategy: self.diff_strategy,
            highlight_appended_words: self.highlight_appended_words,
        }
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gramlight").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.language, "en-US");
        assert_eq!(config.api_url, "https://api.languagetool.org/v2");
        assert_eq!(config.diff_strategy, DiffStrategy::Positional);
        assert!(!config.highlight_appended_words);
    }

    #[test]
    fn test_merge_configs() {
        let base = Config {
            timeout_secs: 5,
            ..Default::default()
        };
        let override_config = Config {
            language: "en-GB".to_string(),
            diff_strategy: DiffStrategy::Aligned,
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.language, "en-GB");
        assert_eq!(merged.diff_strategy, DiffStrategy::Aligned);
        assert_eq!(merged.timeout_secs, 5);
    }

    #[test]
    fn test_local_file_keeps_global_flag() {
        let dir = tempdir().unwrap();
        let global_path = dir.path().join("config.toml");
        let local_path = dir.path().join(LOCAL_CONFIG_FILE);
        fs::write(&global_path, "highlight_appended_words = true\n").unwrap();
        fs::write(&local_path, "language = \"en-GB\"\n").unwrap();

        let merged = Config::default()
            .merge(Config::from_file(&global_path).unwrap())
            .merge(Config::from_file(&local_path).unwrap());

        assert!(merged.highlight_appended_words);
        assert_eq!(merged.language, "en-GB");
        assert!(merged.highlight_options().highlight_appended_words);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "diff_strategy = \"aligned\"\ndisabled_rules = [\"WHITESPACE_RULE\"]\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.diff_strategy, DiffStrategy::Aligned);
        assert_eq!(config.disabled_rules, vec!["WHITESPACE_RULE"]);
        assert_eq!(config.language, "en-US");
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = Config::default();
        config.apply(Overrides {
            language: Some("de-DE".to_string()),
            api_url: None,
            diff_strategy: Some(DiffStrategy::Aligned),
        });
        assert_eq!(config.language, "de-DE");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.diff_strategy, DiffStrategy::Aligned);
    }

    #[test]
    fn test_highlight_options_use_colors() {
        let config = Config {
            input_highlight_color: "#fff3b0".to_string(),
            ..Default::default()
        };
        let options = config.highlight_options();
        assert_eq!(
            options.input_marker.wrap("x"),
            "<span style='background-color:#fff3b0'>x</span>"
        );
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let config = Config::default();
        let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }
}
