use directories::BaseDirs;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Process-wide client configuration: base URL, request timeout. Loaded
/// once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(detail) => {
                format!("Inkweave is misconfigured—{detail}. Update inkweave.yaml.")
            }
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        let base_url = match Url::parse(DEFAULT_BASE_URL) {
            Ok(url) => url,
            Err(_) => unreachable!("default base url is valid"),
        };
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
        let base_url = parse_base_url(base_url.as_ref())?;
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the first `inkweave.yaml` found in the
    /// usual locations, then apply environment overrides. Falls back to
    /// defaults when no file exists so the client is always constructible.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match locate_config_file() {
            Some(path) => {
                let contents = fs::read_to_string(&path).map_err(|err| {
                    ConfigError::Invalid(format!("failed to read {}: {err}", path.display()))
                })?;
                let file: ConfigFile = serde_yaml::from_str(&contents)
                    .map_err(|err| ConfigError::Invalid(format!("invalid inkweave.yaml: {err}")))?;
                Self::from_file(file)?
            }
            None => Self::default(),
        };

        if let Ok(base_url) = std::env::var("INKWEAVE_BASE_URL") {
            config.base_url = parse_base_url(&base_url)?;
        }
        if let Ok(secs) = std::env::var("INKWEAVE_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "INKWEAVE_TIMEOUT_SECS must be an integer, got {secs}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        let server = file.server.unwrap_or_default();
        let mut config = Self::default();
        if let Some(base_url) = server.base_url {
            config.base_url = parse_base_url(&base_url)?;
        }
        if let Some(secs) = server.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(
            "base URL must not be empty".to_string(),
        ));
    }
    // A trailing slash makes Url::join treat the last segment as a directory.
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized)
        .map_err(|err| ConfigError::Invalid(format!("invalid base URL {trimmed}: {err}")))
}

fn locate_config_file() -> Option<PathBuf> {
    config_file_candidates()
        .into_iter()
        .find(|path| path.exists())
}

fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(base) = BaseDirs::new() {
        let config_dir = base.config_dir().join("inkweave");
        paths.push(config_dir.join("inkweave.yaml"));
        paths.push(config_dir.join("inkweave.yml"));
        let home_dir = base.home_dir();
        paths.push(home_dir.join(".inkweave").join("inkweave.yaml"));
        paths.push(home_dir.join(".inkweave").join("inkweave.yml"));
    } else {
        paths.push(PathBuf::from("inkweave.yaml"));
        paths.push(PathBuf::from("inkweave.yml"));
    }
    paths
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    server: Option<ServerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}
