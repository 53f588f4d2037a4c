use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main configuration for AppGraph
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppGraphConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report rendering configuration
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "pretty", "json", "compact"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Report rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DisplayConfig {
    /// Terminal hyperlinks for cloud console links: "auto", "always", "never"
    #[serde(default)]
    pub hyperlinks: HyperlinkMode,

    /// Output format: "text" or "json"
    #[serde(default)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HyperlinkMode {
    /// Only when standard output is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl HyperlinkMode {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            HyperlinkMode::Auto => is_terminal,
            HyperlinkMode::Always => true,
            HyperlinkMode::Never => false,
        }
    }
}

impl FromStr for HyperlinkMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(HyperlinkMode::Auto),
            "always" => Ok(HyperlinkMode::Always),
            "never" => Ok(HyperlinkMode::Never),
            other => Err(ConfigError::ValidationError(format!(
                "Invalid hyperlink mode: {}. Must be one of: auto, always, never",
                other
            ))),
        }
    }
}

impl fmt::Display for HyperlinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HyperlinkMode::Auto => "auto",
            HyperlinkMode::Always => "always",
            HyperlinkMode::Never => "never",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::ValidationError(format!(
                "Invalid output format: {}. Must be one of: text, json",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration manager with file discovery and environment overrides
#[derive(Debug)]
pub struct ConfigManager {
    config: AppGraphConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with the following precedence:
    /// 1. Environment variables (.env file)
    /// 2. Config file (explicit path, .appgraph.toml, ~/.appgraph/config.toml)
    /// 3. Sensible defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_dotenv();

        let (config, config_path) = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()));
                }
                (Self::read_toml_file(path)?, Some(path.to_path_buf()))
            }
            None => Self::load_config_file()?,
        };

        let config = Self::apply_env_overrides(config)?;
        Self::validate_config(&config)?;

        match config_path {
            Some(ref path) => info!("Config file: {}", path.display()),
            None => debug!("No config file found, using defaults"),
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Build a manager around an already constructed configuration.
    pub fn from_config(config: AppGraphConfig) -> Result<Self, ConfigError> {
        Self::validate_config(&config)?;
        Ok(Self {
            config,
            config_path: None,
        })
    }

    /// Load .env file if it exists
    fn load_dotenv() {
        if Path::new(".env").exists() {
            if let Err(e) = dotenv::from_filename(".env") {
                warn!("Failed to load .env file: {}", e);
            }
            return;
        }

        if let Some(home) = dirs::home_dir() {
            let home_env = home.join(".appgraph.env");
            if home_env.exists() {
                if let Err(e) = dotenv::from_path(&home_env) {
                    warn!("Failed to load .appgraph.env: {}", e);
                }
            }
        }
    }

    /// Find and load config file
    /// Search order:
    /// 1. ./.appgraph.toml (current directory)
    /// 2. ~/.appgraph/config.toml (user config)
    /// 3. Use defaults
    fn load_config_file() -> Result<(AppGraphConfig, Option<PathBuf>), ConfigError> {
        let local_config = Path::new(".appgraph.toml");
        if local_config.exists() {
            let config = Self::read_toml_file(local_config)?;
            return Ok((config, Some(local_config.to_path_buf())));
        }

        if let Some(path) = Self::user_config_path() {
            if path.exists() {
                let config = Self::read_toml_file(&path)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((AppGraphConfig::default(), None))
    }

    /// Location of the per-user configuration file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".appgraph").join("config.toml"))
    }

    /// Read TOML config file
    pub fn read_toml_file(path: &Path) -> Result<AppGraphConfig, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: AppGraphConfig) -> Result<AppGraphConfig, ConfigError> {
        if let Ok(level) =
            std::env::var("APPGRAPH_LOG_LEVEL").or_else(|_| std::env::var("RUST_LOG"))
        {
            // RUST_LOG may carry directives; only a bare level is meaningful here.
            if is_log_level(&level) {
                config.logging.level = level;
            }
        }
        if let Ok(format) = std::env::var("APPGRAPH_LOG_FORMAT") {
            config.logging.format = format;
        }
        if let Ok(mode) = std::env::var("APPGRAPH_HYPERLINKS") {
            config.display.hyperlinks = mode.parse()?;
        }
        if let Ok(output) = std::env::var("APPGRAPH_OUTPUT") {
            config.display.output = output.parse()?;
        }

        Ok(config)
    }

    /// Validate configuration
    fn validate_config(config: &AppGraphConfig) -> Result<(), ConfigError> {
        if !is_log_level(&config.logging.level) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                config.logging.level
            )));
        }

        match config.logging.format.as_str() {
            "pretty" | "json" | "compact" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {}. Must be one of: pretty, json, compact",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &AppGraphConfig {
        &self.config
    }

    /// Mutable access, used to apply command-line overrides
    pub fn config_mut(&mut self) -> &mut AppGraphConfig {
        &mut self.config
    }

    /// Get the path to the config file that was loaded, if any
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Render the active configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(&self.config).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Create a default config file
    pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        let config = AppGraphConfig::default();
        let toml_str =
            toml::to_string_pretty(&config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::ReadError(e.to_string()))?;
        }

        std::fs::write(path, toml_str).map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Ok(())
    }
}

fn is_log_level(level: &str) -> bool {
    matches!(level, "trace" | "debug" | "info" | "warn" | "error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppGraphConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.display.hyperlinks, HyperlinkMode::Auto);
        assert_eq!(config.display.output, OutputFormat::Text);
    }

    #[test]
    fn test_config_validation() {
        let config = AppGraphConfig::default();
        assert!(ConfigManager::validate_config(&config).is_ok());

        let mut bad_config = config.clone();
        bad_config.logging.level = "loud".to_string();
        assert!(ConfigManager::validate_config(&bad_config).is_err());

        let mut bad_config = config;
        bad_config.logging.format = "xml".to_string();
        assert!(ConfigManager::validate_config(&bad_config).is_err());
    }

    #[test]
    fn test_hyperlink_mode() {
        assert!(HyperlinkMode::Auto.enabled(true));
        assert!(!HyperlinkMode::Auto.enabled(false));
        assert!(HyperlinkMode::Always.enabled(false));
        assert!(!HyperlinkMode::Never.enabled(true));

        assert_eq!("ALWAYS".parse::<HyperlinkMode>().unwrap(), HyperlinkMode::Always);
        assert!("sometimes".parse::<HyperlinkMode>().is_err());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
