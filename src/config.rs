//! ES-010: Project configuration: `episeq.yaml` parsing and validation.
//!
//! Validates structural constraints:
//! - Version must be "1.0"
//! - Pattern must select JSON files
//! - Output path must not be empty
//! - Log level must be a known tracing level

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default config file name.
pub const CONFIG_FILE: &str = "episeq.yaml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

// ============================================================================
// Top-level episeq.yaml
// ============================================================================

/// Root configuration for a translation project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpiseqConfig {
    /// Schema version (must be "1.0")
    pub version: String,

    /// Directory holding the episode logs
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// File name pattern inside `input_dir`
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Batch output path
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Batch policy
    #[serde(default)]
    pub policy: Policy,

    /// Logging
    #[serde(default)]
    pub logging: Logging,
}

impl Default for EpiseqConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            input_dir: default_input_dir(),
            pattern: default_pattern(),
            output: default_output(),
            policy: Policy::default(),
            logging: Logging::default(),
        }
    }
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("all_game_files")
}

fn default_pattern() -> String {
    "*.game.json".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("seq_all.json")
}

// ============================================================================
// Policy
// ============================================================================

/// Batch execution policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// What a malformed file does to the batch
    #[serde(default)]
    pub failure: FailurePolicy,

    /// Sort the merged records by file path
    #[serde(default = "default_true")]
    pub sort_by_file: bool,

    /// Concurrent workers (0 = available parallelism)
    #[serde(default)]
    pub jobs: usize,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            failure: FailurePolicy::default(),
            sort_by_file: true,
            jobs: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Failure handling strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First unreadable file aborts the batch
    #[default]
    StopOnFirst,
    /// Record the failure and keep translating the rest
    ContinueIndependent,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopOnFirst => write!(f, "stop_on_first"),
            Self::ContinueIndependent => write!(f, "continue_independent"),
        }
    }
}

/// Logging settings. `RUST_LOG` overrides `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

// ============================================================================
// Parsing and validation
// ============================================================================

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse an episeq.yaml file from disk.
pub fn parse_config_file(path: &Path) -> Result<EpiseqConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    parse_config(&content)
}

/// Parse an episeq.yaml from a string.
pub fn parse_config(yaml: &str) -> Result<EpiseqConfig, String> {
    serde_yaml_ng::from_str(yaml).map_err(|e| format!("YAML parse error: {}", e))
}

/// Validate a parsed config. Returns a list of errors (empty = valid).
pub fn validate_config(config: &EpiseqConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.version != "1.0" {
        errors.push(ValidationError {
            message: format!("version must be \"1.0\", got \"{}\"", config.version),
        });
    }

    if !config.pattern.ends_with(".json") {
        errors.push(ValidationError {
            message: format!("pattern must select .json files, got \"{}\"", config.pattern),
        });
    }

    if config.pattern.contains('/') {
        errors.push(ValidationError {
            message: format!(
                "pattern must be a file name pattern, got \"{}\"",
                config.pattern
            ),
        });
    }

    if config.output.as_os_str().is_empty() {
        errors.push(ValidationError {
            message: "output must not be empty".to_string(),
        });
    }

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError {
            message: format!(
                "logging.level must be one of {}, got \"{}\"",
                LOG_LEVELS.join("/"),
                config.logging.level
            ),
        });
    }

    errors
}

/// Template written by `episeq init`.
pub fn template() -> &'static str {
    r#"version: "1.0"
input_dir: all_game_files
pattern: "*.game.json"
output: seq_all.json

policy:
  failure: stop_on_first
  sort_by_file: true
  jobs: 0

logging:
  level: info
"#
}
