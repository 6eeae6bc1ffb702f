// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Settings of the submission bridge.
//!
//! Read from the agent's main YAML file, then overridden by `DD_`
//! environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{Level, debug};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/datadog.yaml";

const ENV_LOG_LEVEL: &str = "DD_LOG_LEVEL";
const ENV_LOG_UNKNOWN_METRIC_TYPES: &str = "DD_PYTHON_CHECK_SUBMISSION_LOG_UNKNOWN_METRIC_TYPES";

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    log_level: Option<String>,
    #[serde(default)]
    python_check_submission: SubmissionSection,
}

#[derive(Debug, Deserialize)]
struct SubmissionSection {
    #[serde(default = "default_true")]
    log_unknown_metric_types: bool,
}

impl Default for SubmissionSection {
    fn default() -> Self {
        Self {
            log_unknown_metric_types: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Most verbose level let through the `log` facade.
    pub log_level: Level,
    /// Log metrics dropped because of an unknown metric type. When false they
    /// are dropped silently.
    pub log_unknown_metric_types: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Level::Info,
            log_unknown_metric_types: true,
        }
    }
}

impl Config {
    /// Load the configuration from `path` (the agent's default location when
    /// `None`), then apply environment overrides.
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let file = if path.exists() {
            read_file(&path)?
        } else {
            debug!(
                "Config file not found at {}. Checking environment variables only.",
                path.display()
            );
            FileConfig::default()
        };

        let mut config = Config {
            log_level: file
                .log_level
                .as_deref()
                .map(parse_log_level)
                .unwrap_or(Level::Info),
            log_unknown_metric_types: file.python_check_submission.log_unknown_metric_types,
        };
        config.apply_env();
        Ok(config)
    }

    /// Environment-only configuration.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(level) = env::var(ENV_LOG_LEVEL) {
            self.log_level = parse_log_level(&level);
        }
        if let Some(enabled) = get_env_bool_option(ENV_LOG_UNKNOWN_METRIC_TYPES) {
            self.log_unknown_metric_types = enabled;
        }
    }

    /// Restrict the `log` facade to the configured level.
    pub fn apply(&self) {
        log::set_max_level(self.log_level.to_level_filter());
    }
}

fn read_file(path: &Path) -> Result<FileConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let file: Option<FileConfig> =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(file.unwrap_or_default())
}

/// Parse an agent log level string.
/// Unknown levels silently default to Info
fn parse_log_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warn,
        "error" | "critical" | "off" => Level::Error,
        _ => Level::Info,
    }
}

fn get_env_bool_option(env_var: &str) -> Option<bool> {
    let value = env::var(env_var).ok()?;
    match value.to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::max_level_guard;
    use log::LevelFilter;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NO_ENV: [(&str, Option<&str>); 2] =
        [(ENV_LOG_LEVEL, None), (ENV_LOG_UNKNOWN_METRIC_TYPES, None)];

    fn create_test_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_apply_sets_max_level() {
        let _guard = max_level_guard();
        let config = Config {
            log_level: Level::Warn,
            ..Config::default()
        };
        config.apply();
        assert_eq!(log::max_level(), LevelFilter::Warn);

        Config::default().apply();
        assert_eq!(log::max_level(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        temp_env::with_vars(NO_ENV, || {
            let dir = tempfile::tempdir().unwrap();
            let config = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap();
            assert_eq!(config, Config::default());
        });
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        temp_env::with_vars(NO_ENV, || {
            let file = create_test_config("");
            let config = Config::load(Some(file.path())).unwrap();
            assert_eq!(config, Config::default());
        });
    }

    #[test]
    fn test_yaml_values() {
        temp_env::with_vars(NO_ENV, || {
            let file = create_test_config(
                r#"
api_key: unrelated
log_level: DEBUG
python_check_submission:
  log_unknown_metric_types: false
"#,
            );
            let config = Config::load(Some(file.path())).unwrap();
            assert_eq!(config.log_level, Level::Debug);
            assert!(!config.log_unknown_metric_types);
        });
    }

    #[test]
    fn test_env_overrides_yaml() {
        let file = create_test_config(
            r#"
log_level: error
python_check_submission:
  log_unknown_metric_types: false
"#,
        );
        temp_env::with_vars(
            [
                (ENV_LOG_LEVEL, Some("trace")),
                (ENV_LOG_UNKNOWN_METRIC_TYPES, Some("1")),
            ],
            || {
                let config = Config::load(Some(file.path())).unwrap();
                assert_eq!(config.log_level, Level::Trace);
                assert!(config.log_unknown_metric_types);
            },
        );
    }

    #[test]
    fn test_invalid_env_bool_is_ignored() {
        temp_env::with_vars(
            [
                (ENV_LOG_LEVEL, None),
                (ENV_LOG_UNKNOWN_METRIC_TYPES, Some("maybe")),
            ],
            || {
                let config = Config::from_env();
                assert!(config.log_unknown_metric_types);
            },
        );
    }

    #[test]
    fn test_invalid_yaml() {
        temp_env::with_vars(NO_ENV, || {
            let file = create_test_config("log_level: [unterminated");
            let err = Config::load(Some(file.path())).unwrap_err();
            assert!(format!("{err:#}").contains("parsing"));
        });
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("warning"), Level::Warn);
        assert_eq!(parse_log_level("Critical"), Level::Error);
        assert_eq!(parse_log_level("off"), Level::Error);
        assert_eq!(parse_log_level("verbose"), Level::Info);
    }
}
