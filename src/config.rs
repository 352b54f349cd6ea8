use chrono::Duration;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

const API_URL_ENV: &str = "SHARKDECK_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for the header (defaults to the program name)
  pub title: Option<String>,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default = "default_page_size")]
  pub page_size: usize,
  /// Default log level; RUST_LOG takes precedence
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the deals API (e.g. the API gateway stage URL)
  pub url: String,
  /// Path of the deals resource relative to `url`
  #[serde(default = "default_deals_path")]
  pub deals_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Age after which the local snapshot is refetched
  #[serde(default = "default_ttl_hours")]
  pub ttl_hours: i64,
  /// SQLite file location (default: $XDG_DATA_HOME/sharkdeck/cache.db)
  pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      ttl_hours: default_ttl_hours(),
      path: None,
    }
  }
}

fn default_page_size() -> usize {
  10
}

fn default_log_level() -> String {
  "info".to_string()
}

fn default_deals_path() -> String {
  "deals".to_string()
}

fn default_true() -> bool {
  true
}

fn default_ttl_hours() -> i64 {
  24
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./sharkdeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/sharkdeck/config.yaml
  ///
  /// Without a file, a config is built from `SHARKDECK_API_URL` or the
  /// `api_url` override. The override always wins over the file.
  pub fn load(explicit_path: Option<&Path>, api_url: Option<String>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let api_url = api_url.or_else(|| std::env::var(API_URL_ENV).ok());

    let mut config = match (path, api_url.clone()) {
      (Some(p), _) => Self::load_from_path(&p)?,
      (None, Some(url)) => Self::from_api_url(url),
      (None, None) => {
        return Err(eyre!(
          "No configuration file found. Create one at ~/.config/sharkdeck/config.yaml\n\
                 or set {} to the deals API URL.",
          API_URL_ENV
        ))
      }
    };

    if let Some(url) = api_url {
      config.api.url = url;
    }

    config.validate()?;
    Ok(config)
  }

  /// Config with defaults for everything but the API URL
  pub fn from_api_url(url: String) -> Self {
    Self {
      api: ApiConfig {
        url,
        deals_path: default_deals_path(),
      },
      title: None,
      cache: CacheConfig::default(),
      page_size: default_page_size(),
      log_level: default_log_level(),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("sharkdeck.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("sharkdeck").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
  }

  fn validate(&self) -> Result<()> {
    if self.page_size == 0 {
      return Err(eyre!("page_size must be at least 1"));
    }
    if self.cache.ttl_hours <= 0 {
      return Err(eyre!("cache.ttl_hours must be positive"));
    }
    if Duration::try_hours(self.cache.ttl_hours).is_none() {
      return Err(eyre!(
        "cache.ttl_hours out of range: {}",
        self.cache.ttl_hours
      ));
    }
    self.deals_url()?;
    Ok(())
  }

  /// Full URL of the deals resource.
  pub fn deals_url(&self) -> Result<Url> {
    let mut base = Url::parse(&self.api.url)
      .map_err(|e| eyre!("Invalid API url '{}': {}", self.api.url, e))?;

    // Url::join replaces the last segment unless the base ends with '/'
    if !base.path().ends_with('/') {
      base.set_path(&format!("{}/", base.path()));
    }

    base
      .join(self.api.deals_path.trim_start_matches('/'))
      .map_err(|e| eyre!("Invalid deals path '{}': {}", self.api.deals_path, e))
  }

  pub fn cache_ttl(&self) -> Duration {
    // validate() rejects values chrono cannot represent
    Duration::try_hours(self.cache.ttl_hours).unwrap_or(Duration::MAX)
  }

  /// Name shown at the left of the header
  pub fn display_title(&self) -> String {
    self
      .title
      .clone()
      .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_minimal_yaml_uses_defaults() {
    let config = Config::from_yaml("api:\n  url: https://example.com/dev\n").unwrap();
    assert_eq!(config.page_size, 10);
    assert_eq!(config.log_level, "info");
    assert!(config.cache.enabled);
    assert_eq!(config.cache_ttl(), Duration::hours(24));
    assert_eq!(config.api.deals_path, "deals");
  }

  #[test]
  fn test_deals_url_keeps_stage_segment() {
    let config = Config::from_api_url("https://abc.execute-api.us-east-1.amazonaws.com/dev".into());
    assert_eq!(
      config.deals_url().unwrap().as_str(),
      "https://abc.execute-api.us-east-1.amazonaws.com/dev/deals"
    );
  }

  #[test]
  fn test_display_title_falls_back_to_name() {
    let mut config = Config::from_api_url("https://api.example.com/dev".into());
    assert_eq!(config.display_title(), "sharkdeck");

    config.title = Some("Shark Tank Brasil".into());
    assert_eq!(config.display_title(), "Shark Tank Brasil");
  }

  #[test]
  fn test_validate_rejects_zero_page_size() {
    let mut config = Config::from_api_url("https://api.example.com".into());
    config.page_size = 0;
    assert!(config.validate().is_err());
  }

  #[test]
  fn test_validate_rejects_huge_ttl() {
    let config = Config::from_yaml(
      "api:\n  url: https://example.com/dev\ncache:\n  ttl_hours: 9000000000000000\n",
    )
    .unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("cache.ttl_hours out of range"));
    assert_eq!(config.cache_ttl(), Duration::MAX);
  }

  #[test]
  fn test_full_yaml() {
    let yaml = r#"
api:
  url: https://api.example.com/prod
  deals_path: /v2/deals
title: Deals
cache:
  enabled: false
  ttl_hours: 6
page_size: 25
log_level: debug
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert!(!config.cache.enabled);
    assert_eq!(config.cache_ttl(), Duration::hours(6));
    assert_eq!(config.page_size, 25);
    assert_eq!(
      config.deals_url().unwrap().as_str(),
      "https://api.example.com/prod/v2/deals"
    );
  }
}
