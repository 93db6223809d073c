//! Configuration management for mdv.
//!
//! Parses `mdv.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `plantuml.server_url`

mod expand;

use mdv_diagrams::DEFAULT_PLANTUML_SERVER;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override `PlantUML` server URL.
    pub plantuml_server_url: Option<String>,
    /// Override `PlantUML` image format.
    pub plantuml_format: Option<ImageFormat>,
    /// Override `PlantUML` source encoding.
    pub plantuml_encoding: Option<EncodingKind>,
    /// Override Mermaid repair enabled flag.
    pub repair_enabled: Option<bool>,
    /// Override soft line break rendering.
    pub breaks: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdv.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Markdown rendering options.
    pub markdown: MarkdownConfig,
    /// Mermaid repair options.
    pub mermaid: MermaidConfig,
    /// `PlantUML` image options.
    pub plantuml: PlantUmlConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
    /// Render soft line breaks as `<br>`.
    pub breaks: bool,
    /// Use the first H1 heading as the document title.
    pub extract_title: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: true,
            extract_title: true,
        }
    }
}

/// Mermaid repair configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MermaidConfig {
    /// Whether diagram sources are repaired before rendering.
    pub repair: bool,
    /// Words treated as reserved in addition to the built-in keywords.
    pub extra_reserved_words: Vec<String>,
}

impl Default for MermaidConfig {
    fn default() -> Self {
        Self {
            repair: true,
            extra_reserved_words: Vec::new(),
        }
    }
}

/// `PlantUML` image configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PlantUmlConfig {
    /// Server that renders encoded sources.
    pub server_url: String,
    /// Image format requested from the server.
    pub format: ImageFormat,
    /// Source encoding used in image URLs.
    pub encoding: EncodingKind,
}

impl Default for PlantUmlConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_PLANTUML_SERVER.to_owned(),
            format: ImageFormat::default(),
            encoding: EncodingKind::default(),
        }
    }
}

/// `PlantUML` image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

/// `PlantUML` source encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingKind {
    /// Raw DEFLATE with `PlantUML` base64.
    #[default]
    Deflate,
    /// Uncompressed `~h` hex.
    Hex,
    /// No encoder; `PlantUML` blocks render an error state.
    None,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`plantuml.server_url`").
        field: String,
        /// Error message (e.g., "${`PLANTUML_SERVER`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdv.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.plantuml_server_url {
            self.plantuml.server_url.clone_from(url);
        }
        if let Some(format) = settings.plantuml_format {
            self.plantuml.format = format;
        }
        if let Some(encoding) = settings.plantuml_encoding {
            self.plantuml.encoding = encoding;
        }
        if let Some(repair) = settings.repair_enabled {
            self.mermaid.repair = repair;
        }
        if let Some(breaks) = settings.breaks {
            self.markdown.breaks = breaks;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_from(&cwd)
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and expansion
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_plantuml()?;
        self.validate_mermaid()?;
        Ok(())
    }

    /// Validate `PlantUML` configuration.
    fn validate_plantuml(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.plantuml.server_url, "plantuml.server_url")?;
        require_http_url(&self.plantuml.server_url, "plantuml.server_url")?;
        Ok(())
    }

    /// Validate Mermaid configuration.
    fn validate_mermaid(&self) -> Result<(), ConfigError> {
        for word in &self.mermaid.extra_reserved_words {
            require_non_empty(word, "mermaid.extra_reserved_words")?;
            if !word.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(ConfigError::Validation(format!(
                    "mermaid.extra_reserved_words entry '{word}' must be a single identifier word"
                )));
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.plantuml.server_url =
            expand::expand_env(&self.plantuml.server_url, "plantuml.server_url")?;
        Ok(())
    }
}
