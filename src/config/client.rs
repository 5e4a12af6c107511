// src/config/client.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const ENV_CONFIG_PATH: &str = "TRUTH_LENS_CONFIG_PATH";
pub const ENV_BASE_URL: &str = "TRUTH_LENS_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TRUTH_LENS_TIMEOUT_SECS";
pub const DEFAULT_CONFIG_PATH: &str = "config/client.toml";

pub const UPLOAD_PATH: &str = "/api/upload";
pub const ANALYZE_PATH: &str = "/api/analyze";

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_connect_timeout_secs() -> u64 {
    5
}
fn default_user_agent() -> String {
    concat!("truth-lens/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_theme_path() -> PathBuf {
    PathBuf::from("prefs/theme.json")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme + host (+ optional path prefix) of the analysis backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Upper bound for each backend call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Where the light/dark preference is persisted.
    #[serde(default = "default_theme_path")]
    pub theme_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            theme_path: default_theme_path(),
        }
    }
}

impl ClientConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading client config from {}", path.display()))?;
        let mut cfg: ClientConfig = toml::from_str(&data)
            .with_context(|| format!("parsing client config {}", path.display()))?;
        cfg.sanitize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve config the usual way:
    /// 1) $TRUTH_LENS_CONFIG_PATH (must exist)
    /// 2) config/client.toml
    /// 3) built-in defaults
    ///
    /// then apply env overrides ($TRUTH_LENS_BASE_URL, $TRUTH_LENS_TIMEOUT_SECS).
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                bail!("{ENV_CONFIG_PATH} points to non-existent path {}", pb.display());
            }
            Self::load_from_file(&pb)?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from_file(&default_p)?
            } else {
                Self::default()
            }
        };
        cfg.apply_env_overrides()?;
        cfg.sanitize();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                self.base_url = url;
            }
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs
                .trim()
                .parse()
                .map_err(|_| anyhow!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
        }
        Ok(())
    }

    /// Command-line flags win over file and env.
    pub fn override_with(&mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout_secs = secs;
        }
        self.sanitize();
        self.validate()
    }

    fn sanitize(&mut self) {
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        if self.connect_timeout_secs == 0 {
            self.connect_timeout_secs = default_connect_timeout_secs();
        }
        // A connect timeout longer than the whole call makes no sense.
        self.connect_timeout_secs = self.connect_timeout_secs.min(self.timeout_secs);
        if self.user_agent.trim().is_empty() {
            self.user_agent = default_user_agent();
        }
    }

    fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("base_url '{}' is not a valid URL", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("base_url must use http or https, got '{}'", parsed.scheme());
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn upload_url(&self) -> String {
        format!("{}{UPLOAD_PATH}", self.base_url)
    }

    pub fn analyze_url(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }
}
