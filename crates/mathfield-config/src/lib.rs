use serde::{Deserialize, Serialize};
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

    #[error("auto command {0:?} must be at least two ASCII letters")]
    InvalidAutoCommand(String),

    #[error("auto operator name {0:?} must be at least two ASCII letters")]
    InvalidOperatorName(String),

    #[error("max_depth must be at least 1, got {0}")]
    InvalidMaxDepth(usize),
}

/// Which block a vertical hint names, e.g. a fraction's numerator for `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Up,
    Down,
}

/// Operator names recognised out of the box.
pub const DEFAULT_OPERATOR_NAMES: &[&str] = &[
    "arg", "cos", "cosh", "cot", "coth", "csc", "deg", "det", "dim", "exp", "gcd", "hom", "inf",
    "ker", "lg", "lim", "ln", "log", "max", "min", "sec", "sin", "sinh", "sup", "tan", "tanh",
];

/// Options threaded into parsing and cursor decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Deepest block nesting allowed; the root block is depth 1.
    pub max_depth: Option<usize>,
    /// Command names that typing their letters converts, e.g. `sqrt`.
    pub auto_commands: Vec<String>,
    /// Letter runs that typing turns into upright operator names.
    pub auto_operator_names: Vec<String>,
    /// Space leaves the current block like Tab does.
    pub space_behaves_like_tab: bool,
    /// Moving left/right into a command enters this block instead of the
    /// nearest one.
    pub left_right_into_cmd_goes: Option<Vertical>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: None,
            auto_commands: Vec::new(),
            auto_operator_names: DEFAULT_OPERATOR_NAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            space_behaves_like_tab: false,
            left_right_into_cmd_goes: None,
        }
    }
}

impl Options {
    /// Check option values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(depth) = self.max_depth
            && depth == 0
        {
            return Err(ConfigError::InvalidMaxDepth(depth));
        }
        if let Some(bad) = self.auto_commands.iter().find(|n| !is_word(n)) {
            return Err(ConfigError::InvalidAutoCommand(bad.clone()));
        }
        if let Some(bad) = self.auto_operator_names.iter().find(|n| !is_word(n)) {
            return Err(ConfigError::InvalidOperatorName(bad.clone()));
        }
        Ok(())
    }

    /// Parse a space-separated list, as in `"pi sqrt sum"`.
    pub fn with_auto_commands(mut self, names: &str) -> Result<Self, ConfigError> {
        self.auto_commands = names.split_whitespace().map(str::to_string).collect();
        self.validate()?;
        Ok(self)
    }

    /// Longest auto command, bounding how far back typing has to look.
    pub fn longest_auto_word(&self) -> usize {
        self.auto_commands
            .iter()
            .chain(&self.auto_operator_names)
            .map(String::len)
            .max()
            .unwrap_or(0)
    }
}

fn is_word(name: &str) -> bool {
    name.len() >= 2 && name.chars().all(|c| c.is_ascii_alphabetic())
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: Options,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.options.validate()?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mathfield");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}
