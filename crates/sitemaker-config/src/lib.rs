//! Configuration management for sitemaker.
//!
//! Parses `sitemaker.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [sitemap]
//! timezone = "Europe/Lisbon"
//! output = "public/sitemap.xml"
//! base_url = "https://example.com"
//!
//! [server]
//! port = 8080
//!
//! [[urls]]
//! loc = "/"
//! changefreq = "daily"
//! priority = 1.0
//! lastmod = "2024-01-15 10:30:00"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `sitemap.base_url`
//! - `server.host`
//! - `urls[].loc`

mod expand;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use sitemaker_core::{ChangeFrequency, DEFAULT_TIMEZONE, Sitemap, SitemapError, Url, priority};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override sitemap timezone.
    pub timezone: Option<String>,
    /// Override output file path.
    pub output: Option<PathBuf>,
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "sitemaker.toml";

/// Default output filename, relative to the config directory.
const DEFAULT_OUTPUT: &str = "sitemap.xml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sitemap rendering configuration.
    pub sitemap: SitemapConfig,
    /// Server configuration.
    pub server: ServerConfig,
    /// Entries listed in the sitemap, in order.
    pub urls: Vec<UrlConfig>,

    /// Resolved output path (set after loading).
    #[serde(skip)]
    pub output_resolved: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Sitemap rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// IANA timezone for `lastmod` values without an offset.
    pub timezone: String,
    /// Output file, relative to the config file directory.
    output: Option<String>,
    /// Prefix for `loc` values that start with `/`.
    pub base_url: Option<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_owned(),
            output: None,
            base_url: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Route serving the sitemap.
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7980,
            path: "/sitemap.xml".to_owned(),
        }
    }
}

/// A `[[urls]]` entry.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UrlConfig {
    /// Absolute URL, or a path starting with `/` when `base_url` is set.
    pub loc: String,
    /// Change frequency hint.
    pub changefreq: Option<String>,
    /// Priority hint, written as a string or a float.
    #[serde(default, deserialize_with = "deserialize_priority")]
    pub priority: Option<String>,
    /// Last modification hint.
    pub lastmod: Option<String>,
}

/// Accept both `priority = "0.8"` and `priority = 0.8`.
fn deserialize_priority<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Priority {
        Text(String),
        Number(f64),
    }

    Ok(Option::<Priority>::deserialize(deserializer)?.map(|p| match p {
        Priority::Text(text) => text,
        Priority::Number(number) => {
            // `Display` drops the fraction of integral floats; keep `1.0`, not `1`.
            let text = number.to_string();
            if number.is_finite() && !text.contains('.') {
                format!("{text}.0")
            } else {
                text
            }
        }
    }))
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
        /// Config field path (e.g., "`sitemap.base_url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
    /// A `[[urls]]` entry was rejected by the sitemap model.
    #[error("Invalid URL entry: {0}")]
    Sitemap(#[from] SitemapError),
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
    /// Otherwise, searches for `sitemaker.toml` in current directory and parents.
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
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(timezone) = &settings.timezone {
            self.sitemap.timezone.clone_from(timezone);
        }
        if let Some(output) = &settings.output {
            self.output_resolved.clone_from(output);
        }
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
    }

    /// Build a [`Sitemap`] from the `[[urls]]` entries.
    ///
    /// Locations starting with `/` are prefixed with `sitemap.base_url` when it
    /// is set. Change frequencies and priorities outside the recommended
    /// values are kept but logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Sitemap` if a location is not an absolute URL.
    pub fn build_sitemap(&self) -> Result<Sitemap, ConfigError> {
        let mut sitemap = Sitemap::with_timezone(self.sitemap.timezone.as_str());

        for entry in &self.urls {
            let mut url = Url::new(self.resolve_location(&entry.loc))?;

            if let Some(freq) = &entry.changefreq {
                if freq.parse::<ChangeFrequency>().is_err() {
                    tracing::warn!(loc = %entry.loc, changefreq = %freq, "Unrecognized change frequency");
                }
                url.set_change_frequency(freq.as_str());
            }
            if let Some(prio) = &entry.priority {
                if !priority::is_recommended(prio) {
                    tracing::warn!(loc = %entry.loc, priority = %prio, "Priority outside 0.0-1.0 in 0.1 steps");
                }
                url.set_priority(prio.as_str());
            }
            if let Some(lastmod) = &entry.lastmod {
                url.set_last_modified(lastmod.as_str());
            }

            sitemap.add(url);
        }

        tracing::debug!(entries = sitemap.len(), timezone = %sitemap.timezone(), "Built sitemap from config");
        Ok(sitemap)
    }

    /// Join root-relative locations onto `base_url`.
    fn resolve_location(&self, loc: &str) -> String {
        match &self.sitemap.base_url {
            Some(base) if loc.starts_with('/') => {
                format!("{}{loc}", base.trim_end_matches('/'))
            }
            _ => loc.to_owned(),
        }
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
            sitemap: SitemapConfig::default(),
            server: ServerConfig::default(),
            urls: Vec::new(),
            output_resolved: base.join(DEFAULT_OUTPUT),
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

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks that all required fields are properly set and contain valid values.
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_sitemap()?;
        self.validate_server()?;
        Ok(())
    }

    /// Validate sitemap configuration.
    fn validate_sitemap(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.sitemap.timezone, "sitemap.timezone")?;
        if let Some(ref base_url) = self.sitemap.base_url {
            require_http_url(base_url, "sitemap.base_url")?;
        }
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::Validation(
                "server.path must start with /".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        if let Some(ref base_url) = self.sitemap.base_url {
            self.sitemap.base_url = Some(expand::expand_env(base_url, "sitemap.base_url")?);
        }

        for (index, entry) in self.urls.iter_mut().enumerate() {
            entry.loc = expand::expand_env(&entry.loc, &format!("urls[{index}].loc"))?;
        }

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved =
            config_dir.join(self.sitemap.output.as_deref().unwrap_or(DEFAULT_OUTPUT));
    }
}
