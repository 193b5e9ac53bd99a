//! Configuration management for apidoc.
//!
//! Parses `apidoc.toml` configuration files with auto-discovery.
//!
//! # Configuration File Format
//!
//! ```toml
//! [output]
//! dir = "build/apidoc"
//! extension = "md"
//! line_separator = "lf"
//! table_style = "html"
//! clean = true
//!
//! [model]
//! root_type = "java.lang.Object"
//!
//! [render]
//! no_comment = false
//! show_hierarchy = true
//! constants_page = true
//! ```
//!
//! # Environment Variable Expansion
//!
//! `output.dir` supports `${VAR}` and `${VAR:-default}` expansion:
//!
//! ```toml
//! [output]
//! dir = "${APIDOC_OUT:-build/apidoc}"
//! ```

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use expand::expand_env;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "apidoc.toml";

const DEFAULT_OUTPUT_DIR: &str = "build/apidoc";
const DEFAULT_EXTENSION: &str = "md";
const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
    /// Override page file extension.
    pub extension: Option<String>,
    /// Override table rendering style.
    pub table_style: Option<TableStyle>,
    /// Override line separator.
    pub line_separator: Option<LineSeparator>,
    /// Override destination cleaning.
    pub clean: Option<bool>,
    /// Override comment suppression.
    pub no_comment: Option<bool>,
}

/// Line separator used for every line of every page in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSeparator {
    #[default]
    Lf,
    Crlf,
}

impl LineSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

/// How tables are written into pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStyle {
    #[default]
    Html,
    Markdown,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (raw from TOML).
    #[serde(rename = "output")]
    output_raw: OutputConfigRaw,
    /// Declaration model configuration.
    pub model: ModelConfig,
    /// Page rendering configuration.
    pub render: RenderConfig,
    /// Resolved output configuration (populated after loading).
    #[serde(skip)]
    pub output: OutputConfig,
    /// Path to the loaded config file.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
    line_separator: Option<LineSeparator>,
    table_style: Option<TableStyle>,
    clean: Option<bool>,
}

/// Resolved output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Destination directory for generated pages.
    pub dir: PathBuf,
    /// Page file extension, without the leading dot.
    pub extension: String,
    pub line_separator: LineSeparator,
    pub table_style: TableStyle,
    /// Delete the destination directory before writing.
    pub clean: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_owned(),
            line_separator: LineSeparator::default(),
            table_style: TableStyle::default(),
            clean: true,
        }
    }
}

/// Declaration model configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Implicit root of the class hierarchy.
    pub root_type: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            root_type: DEFAULT_ROOT_TYPE.to_owned(),
        }
    }
}

/// Page rendering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Leave doc-comment descriptions out of every page.
    pub no_comment: bool,
    /// Show the ancestor chain on class pages.
    pub show_hierarchy: bool,
    /// Generate the constant values page.
    pub constants_page: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            no_comment: false,
            show_hierarchy: true,
            constants_page: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    Validation(String),
    #[error("Environment variable error in {field}: {message}")]
    EnvVar { field: String, message: String },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `apidoc.toml` in current directory and parents.
    /// If no config file is found, returns default configuration.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Optional explicit path to config file
    /// * `cli_settings` - Optional CLI settings to override config values
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
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings overrides to this configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.output_dir {
            self.output.dir.clone_from(dir);
        }
        if let Some(extension) = &settings.extension {
            self.output.extension.clone_from(extension);
        }
        if let Some(table_style) = settings.table_style {
            self.output.table_style = table_style;
        }
        if let Some(line_separator) = settings.line_separator {
            self.output.line_separator = line_separator;
        }
        if let Some(clean) = settings.clean {
            self.output.clean = clean;
        }
        if let Some(no_comment) = settings.no_comment {
            self.render.no_comment = no_comment;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        Self::discover_from(&cwd)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Create default config with paths resolved relative to current directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths resolved relative to the given base.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self::default();
        config.output.dir = base.join(DEFAULT_OUTPUT_DIR);
        config
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let extension = &self.output.extension;
        require_non_empty(extension, "output.extension")?;
        if extension.contains(['.', '/']) {
            return Err(ConfigError::Validation(format!(
                "output.extension must be a bare extension, got '{extension}'"
            )));
        }
        require_non_empty(&self.model.root_type, "model.root_type")?;
        Ok(())
    }

    /// Expand environment variables in path fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.output_raw.dir {
            self.output_raw.dir = Some(expand_env(dir, "output.dir")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let raw = &self.output_raw;
        let defaults = OutputConfig::default();
        self.output = OutputConfig {
            dir: config_dir.join(raw.dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)),
            extension: raw.extension.clone().unwrap_or(defaults.extension),
            line_separator: raw.line_separator.unwrap_or(defaults.line_separator),
            table_style: raw.table_style.unwrap_or(defaults.table_style),
            clean: raw.clean.unwrap_or(defaults.clean),
        };
    }
}
