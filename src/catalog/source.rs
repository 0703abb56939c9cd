use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::catalog::http::{api_key_headers, build_client, fetch_json};
use crate::catalog::normalize::{normalize_rows, RemoteRow, REMOTE_FIELDS};
use crate::catalog::schema::Place;
use crate::config::RemoteConfig;

/// Anything that can produce a full list of places in one go.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch(&self) -> Result<Vec<Place>>;
}

/// PostgREST-style `places` table.
pub struct RemoteSource {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
    limit: usize,
}

impl RemoteSource {
    /// Returns `None` unless both a URL and a key are configured.
    pub fn from_config(config: &RemoteConfig) -> Option<Self> {
        if config.url.trim().is_empty() || config.anon_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            client: build_client(config.timeout_secs),
            base_url: config.url.trim().trim_end_matches('/').to_string(),
            api_key: config.anon_key.trim().to_string(),
            table: config.table.clone(),
            limit: config.limit,
        })
    }

    pub fn query_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select={}&limit={}",
            self.base_url, self.table, REMOTE_FIELDS, self.limit
        )
    }
}

#[async_trait]
impl CatalogSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    async fn fetch(&self) -> Result<Vec<Place>> {
        let url = self.query_url();
        let rows: Vec<RemoteRow> =
            fetch_json(&self.client, &url, api_key_headers(&self.api_key)?).await?;
        Ok(normalize_rows(rows))
    }
}

/// Static JSON file holding places in their normalized shape.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch(&self) -> Result<Vec<Place>> {
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed reading places file: {}", self.path.display()))?;
        let places: Vec<Place> = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing places file: {}", self.path.display()))?;
        Ok(places)
    }
}
