use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default root of the Trello REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub trello: TrelloConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloConfig {
  /// Application key; `LAZYTRELLO_API_KEY` overrides it when set
  #[serde(default)]
  pub api_key: Option<String>,
  /// API root (defaults to the public Trello endpoint)
  #[serde(default = "default_base_url")]
  pub base_url: String,
}

fn default_base_url() -> String {
  DEFAULT_BASE_URL.to_string()
}

/// The credential pair attached to every request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  pub api_key: String,
  pub oauth_token: String,
}

impl Credentials {
  pub fn new(api_key: impl Into<String>, oauth_token: impl Into<String>) -> Self {
    Self {
      api_key: api_key.into(),
      oauth_token: oauth_token.into(),
    }
  }
}

// Keep the token out of logs.
impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("api_key", &self.api_key)
      .field("oauth_token", &"<redacted>")
      .finish()
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./lazytrello.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/lazytrello/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(Error::Config(format!(
          "Config file not found: {}",
          p.display()
        )));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(Error::Config(
        "No configuration file found. Create one at ~/.config/lazytrello/config.yaml".to_string(),
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("lazytrello.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("lazytrello").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
      Error::Config(format!(
        "Failed to read config file {}: {}",
        path.display(),
        e
      ))
    })?;

    Self::from_yaml(&contents)
      .map_err(|e| Error::Config(format!("{} ({})", e, path.display())))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    serde_yaml::from_str(contents)
      .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
  }

  /// Resolve the credential pair from this config and the environment.
  pub fn credentials(&self) -> Result<Credentials> {
    let api_key = std::env::var("LAZYTRELLO_API_KEY")
      .ok()
      .or_else(|| self.trello.api_key.clone())
      .ok_or_else(|| {
        Error::Config("Trello API key not configured. Set trello.api_key or LAZYTRELLO_API_KEY.".to_string())
      })?;

    Ok(Credentials::new(api_key, Self::get_token()?))
  }

  /// Get the OAuth token from environment variables.
  ///
  /// Checks LAZYTRELLO_TOKEN first, then TRELLO_TOKEN as fallback.
  pub fn get_token() -> Result<String> {
    std::env::var("LAZYTRELLO_TOKEN")
      .or_else(|_| std::env::var("TRELLO_TOKEN"))
      .map_err(|_| {
        Error::Config(
          "Trello token not found. Set LAZYTRELLO_TOKEN or TRELLO_TOKEN environment variable."
            .to_string(),
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_base_url_defaults() {
    let config = Config::from_yaml("trello:\n  api_key: abc\n").unwrap();
    assert_eq!(config.trello.api_key.as_deref(), Some("abc"));
    assert_eq!(config.trello.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn test_base_url_override() {
    let config =
      Config::from_yaml("trello:\n  api_key: abc\n  base_url: http://localhost:9000/1\n").unwrap();
    assert_eq!(config.trello.base_url, "http://localhost:9000/1");
  }

  #[test]
  fn test_missing_section_is_config_error() {
    let err = Config::from_yaml("nothing: here\n").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "trello:\n  api_key: from-file").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.trello.api_key.as_deref(), Some("from-file"));
  }

  #[test]
  fn test_load_missing_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(&dir.path().join("absent.yaml"))).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_credentials_debug_redacts_token() {
    let creds = Credentials::new("key", "secret-token");
    let rendered = format!("{:?}", creds);
    assert!(rendered.contains("key"));
    assert!(!rendered.contains("secret-token"));
  }
}
