//! Configuration management for helpdocs.
//!
//! Parses `helpdocs.toml` configuration files with serde and provides
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
//! - `zendesk.url`
//! - `zendesk.username`
//! - `zendesk.password`
//! - `zendesk.token`
//! - `zendesk.oauth_token`
//! - `zendesk.locale`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override the help center locale.
    pub locale: Option<String>,
    /// Override the number of concurrent API calls.
    pub max_concurrent: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "helpdocs.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zendesk connection settings.
    pub zendesk: Option<ZendeskConfig>,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Publishing behaviour.
    pub publish: PublishConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    meta_name: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug)]
pub struct DocsConfig {
    /// Root of the category/section/article tree.
    pub source_dir: PathBuf,
    /// Filename of the metadata sidecar in category and section directories.
    pub meta_name: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("docs"),
            meta_name: default_meta_name(),
        }
    }
}

fn default_meta_name() -> String {
    "meta.yaml".to_owned()
}

/// Zendesk Help Center connection settings.
///
/// Exactly one authentication method is used per request, chosen by
/// precedence: `oauth_token`, then `password`, then `token`.
#[derive(Debug, Clone, Deserialize)]
pub struct ZendeskConfig {
    /// Instance URL, e.g. `https://acme.zendesk.com`.
    pub url: String,
    /// Agent email address.
    #[serde(default)]
    pub username: String,
    /// Agent password.
    #[serde(default)]
    pub password: Option<String>,
    /// API token.
    #[serde(default)]
    pub token: Option<String>,
    /// OAuth access token.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// Help center locale used for articles and translations.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl ZendeskConfig {
    /// Base URL of the Help Center REST API.
    #[must_use]
    pub fn api_base_url(&self) -> String {
        format!("{}/api/v2/help_center", self.url.trim_end_matches('/'))
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a field is empty, has an invalid
    /// format, or no credential is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.url, "zendesk.url")?;
        require_http_url(&self.url, "zendesk.url")?;
        require_non_empty(&self.locale, "zendesk.locale")?;

        let has = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        if has(&self.oauth_token) {
            return Ok(());
        }
        require_non_empty(&self.username, "zendesk.username")?;
        if !has(&self.password) && !has(&self.token) {
            return Err(ConfigError::Validation(
                "zendesk requires one of oauth_token, password or token".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_locale() -> String {
    "en-us".to_owned()
}

/// Publishing behaviour.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Maximum number of API calls in flight (library default when unset).
    pub max_concurrent: Option<usize>,
    /// Maximum number of retries per call (library default when unset).
    pub max_retries: Option<u32>,
    /// Permission group assigned to newly created articles.
    pub permission_group_id: Option<u64>,
    /// User segment assigned to newly created articles.
    pub user_segment_id: Option<u64>,
    /// Notify followers when an article is created.
    pub notify_subscribers: bool,
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
        /// Config field path (e.g., "`zendesk.token`").
        field: String,
        /// Error message (e.g., "${`ZENDESK_TOKEN`} not set").
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
    /// Otherwise, searches for `helpdocs.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
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

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(locale) = &settings.locale
            && let Some(zendesk) = self.zendesk.as_mut()
        {
            zendesk.locale.clone_from(locale);
        }
        if let Some(max_concurrent) = settings.max_concurrent {
            self.publish.max_concurrent = Some(max_concurrent);
        }
    }

    /// Get validated Zendesk configuration.
    ///
    /// Use this instead of accessing the `zendesk` field directly when the
    /// command talks to the help center.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_zendesk(&self) -> Result<&ZendeskConfig, ConfigError> {
        let zendesk = self.zendesk.as_ref().ok_or_else(|| {
            ConfigError::Validation("[zendesk] section required in config".into())
        })?;
        zendesk.validate()?;
        Ok(zendesk)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
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

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            zendesk: None,
            docs: DocsConfigRaw::default(),
            publish: PublishConfig::default(),
            docs_resolved: DocsConfig {
                source_dir: base.join("docs"),
                meta_name: default_meta_name(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// The `[zendesk]` section is not validated here; commands that need it
    /// call [`Config::require_zendesk`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.docs_resolved.meta_name, "docs.meta_name")?;

        if self.publish.max_concurrent == Some(0) {
            return Err(ConfigError::Validation(
                "publish.max_concurrent must be greater than 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref mut zendesk) = self.zendesk {
            zendesk.url = expand::expand_env(&zendesk.url, "zendesk.url")?;
            zendesk.username = expand::expand_env(&zendesk.username, "zendesk.username")?;
            zendesk.password = expand::expand_env_opt(zendesk.password.as_ref(), "zendesk.password")?;
            zendesk.token = expand::expand_env_opt(zendesk.token.as_ref(), "zendesk.token")?;
            zendesk.oauth_token =
                expand::expand_env_opt(zendesk.oauth_token.as_ref(), "zendesk.oauth_token")?;
            zendesk.locale = expand::expand_env(&zendesk.locale, "zendesk.locale")?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(self.docs.source_dir.as_deref().unwrap_or("docs")),
            meta_name: self.docs.meta_name.clone().unwrap_or_else(default_meta_name),
        };
    }
}
