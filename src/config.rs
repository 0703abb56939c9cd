use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub contact: ContactConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_fallback_path")]
    pub fallback_path: String,
    #[serde(default)]
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_recipient")]
    pub recipient: String,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    /// Named in the first line of every relayed message.
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_redirect_to")]
    pub redirect_to: String,
    #[serde(default)]
    pub webhook_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub fallback_path: Option<String>,
    pub remote_url: Option<String>,
    pub remote_key: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/solo-picker/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.fallback_path {
            self.catalog.fallback_path = path;
        }
        if let Some(url) = overrides.remote_url {
            self.catalog.remote.url = url;
        }
        if let Some(key) = overrides.remote_key {
            self.catalog.remote.anon_key = key;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn default_template() -> String {
        let template = r#"[catalog]
fallback_path = "data/places.json"

[catalog.remote]
# Leave url or anon_key empty to read the fallback file only.
url = ""
anon_key = ""
table = "places"
limit = 200
timeout_secs = 12

[server]
host = "127.0.0.1"
port = 3001

[contact]
recipient = "hello@solo-picker.invalid"
sender = "Solo Picker <no-reply@solo-picker.invalid>"
subject = "Solo Picker — place suggestion"
site_name = "Bruxelles Solo"
redirect_to = "/merci.html"
# POST composed messages to this HTTP mail API; empty logs them instead.
webhook_url = ""
"#;
        template.to_string()
    }
}

impl CatalogConfig {
    pub fn resolved_fallback_path(&self) -> PathBuf {
        expand_tilde(&self.fallback_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            fallback_path: default_fallback_path(),
            remote: RemoteConfig::default(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            recipient: default_recipient(),
            sender: default_sender(),
            subject: default_subject(),
            site_name: default_site_name(),
            redirect_to: default_redirect_to(),
            webhook_url: String::new(),
        }
    }
}

fn default_fallback_path() -> String {
    "data/places.json".to_string()
}

fn default_table() -> String {
    "places".to_string()
}

fn default_limit() -> usize {
    200
}

fn default_timeout_secs() -> u64 {
    12
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_recipient() -> String {
    "hello@solo-picker.invalid".to_string()
}

fn default_sender() -> String {
    "Solo Picker <no-reply@solo-picker.invalid>".to_string()
}

fn default_subject() -> String {
    "Solo Picker — place suggestion".to_string()
}

fn default_site_name() -> String {
    "Bruxelles Solo".to_string()
}

fn default_redirect_to() -> String {
    "/merci.html".to_string()
}
