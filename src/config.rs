//! Configuration: client settings, form defaults and credentials

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use log::{debug, warn};

/// Key looked up in both the secrets store and the environment
pub const TOKEN_KEY: &str = "HF_TOKEN";

pub const DEFAULT_API_BASE: &str
  = "https://router.huggingface.co";
pub const DEFAULT_HUB_BASE: &str
  = "https://huggingface.co";
pub const DEFAULT_PROVIDER: &str = "featherless-ai";
pub const DEFAULT_MODEL: &str
  = "marcelbinz/Llama-3.1-Centaur-70B";
pub const DEFAULT_SECRETS_PATH: &str = "secrets.toml";

pub const MIN_NEW_TOKENS: u32 = 1;
pub const MAX_NEW_TOKENS: u32 = 2000;
pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 2.0;

/// How the inference client reaches the remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings
{   /// Router base URL
    pub api_base: String
  , /// Hub base URL, used by the access probe
    pub hub_base: String
  , /// Request timeout in seconds; None keeps the client default
    pub timeout_secs: Option<u64>
}

impl Default for ClientSettings
{   fn default() -> Self
    {   ClientSettings
        {   api_base: DEFAULT_API_BASE.to_string()
          , hub_base: DEFAULT_HUB_BASE.to_string()
          , timeout_secs: None
        }
    }
}

/// Initial values and choices for the input controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDefaults
{   /// Models offered by the selector; the first one is preselected
    pub models: Vec<String>
  , pub max_new_tokens: u32
  , pub temperature: f32
  , /// Named backend provider; None or "" uses the default routing
    pub provider: Option<String>
}

impl Default for FormDefaults
{   fn default() -> Self
    {   FormDefaults
        {   models: vec![DEFAULT_MODEL.to_string()]
          , max_new_tokens: 70
          , temperature: 0.70
          , provider: Some(DEFAULT_PROVIDER.to_string())
        }
    }
}

impl FormDefaults
{   pub fn default_model(&self) -> &str
    {   self.models.first()
          .map(String::as_str)
          .unwrap_or(DEFAULT_MODEL)
    }

    pub fn offers_model(&self, model: &str) -> bool
    {   self.models.iter().any(|m| m == model)
    }

    /// Configured provider, with an empty name meaning default routing
    pub fn default_provider(&self) -> Option<&str>
    {   self.provider.as_deref()
          .map(str::trim)
          .filter(|p| !p.is_empty())
    }
}

/// hfgen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig
{   pub client: ClientSettings
  , pub form: FormDefaults
  , /// TOML file holding HF_TOKEN
    pub secrets_path: PathBuf
}

impl Default for AppConfig
{   fn default() -> Self
    {   AppConfig
        {   client: ClientSettings::default()
          , form: FormDefaults::default()
          , secrets_path: PathBuf::from(DEFAULT_SECRETS_PATH)
        }
    }
}

impl AppConfig
{   /// Load from a TOML file, or defaults when no path is given
    pub fn load(path: Option<&Path>)
      -> Result<Self, crate::error::Error>
    {   let Some(path) = path else
        {   debug!("No config file given, using defaults");
            return Ok(AppConfig::default());
        };
        debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| {
          crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          )
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str)
      -> Result<Self, crate::error::Error>
    {   let config: AppConfig = toml::from_str(text).map_err(|e| {
          crate::error::Error::InvalidConfiguration(e.to_string())
        })?;
        if config.form.models.is_empty()
        {   return Err(crate::error::Error::InvalidConfiguration(
              "form.models must list at least one model".to_string()
            ));
        }
        Ok(config)
    }
}

/// Bearer token for the inference service, loaded once per session
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials
{   token: String
}

impl Credentials
{   pub fn new(token: impl Into<String>) -> Self
    {   Credentials { token: token.into() }
    }

    pub fn token(&self) -> &str
    {   &self.token
    }

    /// Token prefix and length, safe for diagnostics
    pub fn redacted(&self) -> String
    {   let prefix: String = self.token.chars().take(10).collect();
        format!("{}... ({} chars)", prefix, self.token.chars().count())
    }

    /// Secrets store first, then the process environment
    pub fn resolve(secrets_path: &Path)
      -> Result<Self, crate::error::Error>
    {   Self::resolve_with(secrets_path, |key| std::env::var(key).ok())
    }

    /// Like `resolve`, with an injectable environment lookup
    pub fn resolve_with<F>(secrets_path: &Path, env: F)
      -> Result<Self, crate::error::Error>
    where F: Fn(&str) -> Option<String>
    {   if let Some(token) = read_secret(secrets_path, TOKEN_KEY)?
        {   debug!("{} loaded from secrets store", TOKEN_KEY);
            return Ok(Credentials::new(token));
        }
        match env(TOKEN_KEY).filter(|t| !t.trim().is_empty())
        {   Some(token) => {
              debug!("{} loaded from environment", TOKEN_KEY);
              Ok(Credentials::new(token.trim()))
            }
          , None => {
              warn!("{} not configured", TOKEN_KEY);
              Err(crate::error::Error::MissingToken)
            }
        }
    }
}

impl fmt::Debug for Credentials
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("Credentials")
          .field("token", &"<redacted>")
          .finish()
    }
}

/// A missing file or key is not an error; an unparseable file is
fn read_secret(path: &Path, key: &str)
  -> Result<Option<String>, crate::error::Error>
{   let text = match fs::read_to_string(path)
    {   Ok(text) => text
      , Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
          debug!("No secrets file at {}", path.display());
          return Ok(None);
        }
      , Err(e) => {
          return Err(crate::error::Error::InvalidConfiguration(
            format!("{}: {}", path.display(), e)
          ));
        }
    };
    let table: toml::Table = text.parse().map_err(|e| {
      crate::error::Error::InvalidConfiguration(
        format!("{}: {}", path.display(), e)
      )
    })?;
    Ok(table.get(key)
      .and_then(|v| v.as_str())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(str::to_string))
}

#[cfg(test)]
mod tests
{   use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf
    {   let path = std::env::temp_dir().join(format!(
          "hfgen-{}-{}", std::process::id(), name
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_match_form_controls()
    {   let config = AppConfig::default();
        assert_eq!(config.form.max_new_tokens, 70);
        assert!((config.form.temperature - 0.70).abs() < f32::EPSILON);
        assert_eq!(config.form.default_model(), DEFAULT_MODEL);
        assert_eq!(
          config.form.default_provider(),
          Some(DEFAULT_PROVIDER)
        );
        assert_eq!(config.client.timeout_secs, None);
    }

    #[test]
    fn partial_toml_keeps_defaults()
    {   let config = AppConfig::from_toml_str(
          "[client]\ntimeout_secs = 30\n[form]\nprovider = \"together\"\n"
        ).unwrap();
        assert_eq!(config.form.default_provider(), Some("together"));
        assert_eq!(config.client.timeout_secs, Some(30));
        assert_eq!(config.client.api_base, DEFAULT_API_BASE);
        assert_eq!(config.form.max_new_tokens, 70);
        assert_eq!(config.form.default_model(), DEFAULT_MODEL);
    }

    #[test]
    fn empty_provider_means_default_routing()
    {   let config = AppConfig::from_toml_str("[form]\nprovider = \"\"\n")
          .unwrap();
        assert_eq!(config.form.default_provider(), None);
    }

    #[test]
    fn empty_model_list_is_rejected()
    {   let err = AppConfig::from_toml_str("[form]\nmodels = []\n")
          .unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn secrets_file_wins_over_environment()
    {   let path = temp_file("secrets-wins.toml", "HF_TOKEN = \"hf_file\"\n");
        let creds = Credentials::resolve_with(&path, |_| {
          Some("hf_env".to_string())
        }).unwrap();
        assert_eq!(creds.token(), "hf_file");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn falls_back_to_environment()
    {   let path = temp_file("secrets-other.toml", "OTHER = \"x\"\n");
        let creds = Credentials::resolve_with(&path, |key| {
          (key == TOKEN_KEY).then(|| "hf_env".to_string())
        }).unwrap();
        assert_eq!(creds.token(), "hf_env");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_everywhere_is_fatal()
    {   let path = std::env::temp_dir().join("hfgen-does-not-exist.toml");
        let err = Credentials::resolve_with(&path, |_| None).unwrap_err();
        assert_eq!(err, crate::error::Error::MissingToken);

        let err = Credentials::resolve_with(&path, |_| {
          Some("   ".to_string())
        }).unwrap_err();
        assert_eq!(err, crate::error::Error::MissingToken);
    }

    #[test]
    fn broken_secrets_file_is_a_configuration_error()
    {   let path = temp_file("secrets-broken.toml", "HF_TOKEN = \n");
        let err = Credentials::resolve_with(&path, |_| None).unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn debug_never_prints_token()
    {   let creds = Credentials::new("hf_abcdefghijklmnop");
        let shown = format!("{:?}", creds);
        assert!(!shown.contains("hf_abcdefghijklmnop"));
        assert_eq!(creds.redacted(), "hf_abcdefg... (19 chars)");
    }
}
