//! Crawler configuration.
//!
//! A [`CrawlerConfig`] is built once in `main` (defaults, then an optional
//! YAML file, then CLI overrides) and handed to each component at
//! construction. Nothing reads configuration from global state.

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Feeds crawled when neither the config file nor the CLI lists any.
pub const DEFAULT_FEEDS: [&str; 3] = [
    "https://g1.globo.com/rss/g1/tecnologia/",
    "https://rss.app/feeds/tzsWys2U6rj4mrqc.xml",
    "https://rss.app/feeds/zdt1qrt08NPr3QJz.xml",
];

/// All options recognized by the crawler.
///
/// # YAML
///
/// ```yaml
/// user_agent: "NewsCrawler/1.0 (+https://example.com)"
/// timeout_secs: 10
/// delay_secs: 1.0
/// output_dir: output
/// image_dir: output/images
/// max_entries: 10
/// feeds:
///   - https://example.com/rss
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Identity header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Fixed delay before each article fetch, in seconds.
    pub delay_secs: f64,
    /// Directory receiving snapshot files.
    pub output_dir: PathBuf,
    /// Directory receiving mirrored images; `None` means `<output_dir>/images`.
    pub image_dir: Option<PathBuf>,
    /// Maximum entries taken from each feed.
    pub max_entries: usize,
    /// Feed URLs, crawled in order. Blank entries yield nothing.
    pub feeds: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "NewsCrawler/1.0 (+https://example.com)".to_string(),
            timeout_secs: 10,
            delay_secs: 1.0,
            output_dir: PathBuf::from("output"),
            image_dir: None,
            max_entries: 10,
            feeds: DEFAULT_FEEDS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl CrawlerConfig {
    /// Load a config from a YAML file. Missing keys take their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        info!(feeds = config.feeds.len(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Build the effective config: YAML file (if any), then CLI flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if !cli.feeds.is_empty() {
            config.feeds = cli.feeds.clone();
        }
        if let Some(dir) = &cli.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(dir) = &cli.image_dir {
            config.image_dir = Some(dir.clone());
        }
        if let Some(n) = cli.max_entries {
            config.max_entries = n;
        }
        if let Some(delay) = cli.delay_secs {
            config.delay_secs = delay;
        }
        if let Some(timeout) = cli.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(agent) = &cli.user_agent {
            config.user_agent = agent.clone();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.delay_secs.is_finite() || self.delay_secs < 0.0 {
            return Err(ConfigError::Invalid {
                field: "delay_secs",
                reason: format!("{} is not a non-negative number of seconds", self.delay_secs),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        // validate() guarantees a finite, non-negative value
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }

    pub fn images_dir(&self) -> PathBuf {
        self.image_dir
            .clone()
            .unwrap_or_else(|| self.output_dir.join("images"))
    }
}
