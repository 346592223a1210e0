use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "gh-rest";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Construction-time settings shared by every request a client makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub base_url: String,
    /// Sent as a bearer token when present and non-empty.
    pub token: Option<String>,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct ConfigFile {
    base_url: Option<String>,
    token: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
}

impl ConfigFile {
    fn into_options(self) -> ClientOptions {
        let defaults = ClientOptions::default();
        ClientOptions {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            token: self.token.filter(|token| !token.is_empty()),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

impl ClientOptions {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.is_empty()).then_some(token);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Loads the user config file, falling back to defaults when it does not
    /// exist. `GITHUB_TOKEN` fills in the token when the file has none.
    pub fn load() -> Result<Self> {
        let options = Self::load_from(&config_path())?;
        Ok(options.with_env_token(env::var(TOKEN_ENV).ok()))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        Ok(file.into_options())
    }

    fn with_env_token(mut self, env_token: Option<String>) -> Self {
        if self.token.is_none() {
            self.token = env_token.filter(|token| !token.is_empty());
        }
        self
    }
}

fn config_path() -> PathBuf {
    config_dir().join("gh-rest").join("config.toml")
}

fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&dir).to_path_buf();
    }

    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config");
    }

    env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
