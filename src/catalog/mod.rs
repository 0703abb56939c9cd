pub mod http;
pub mod normalize;
pub mod schema;
pub mod source;

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

pub use normalize::{normalize_row, RemoteRow};
pub use schema::{Budget, DurationRange, Links, Place, SocialEnergy};
pub use source::{CatalogSource, FileSource, RemoteSource};

use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load fallback catalog from {source_name}: {message}")]
    Fallback {
        source_name: String,
        message: String,
    },
    #[error("catalog from {0} is empty")]
    Empty(String),
}

/// Places loaded once at startup, shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    places: Arc<Vec<Place>>,
    origin: String,
}

impl Catalog {
    pub fn new(places: Vec<Place>, origin: impl Into<String>) -> Self {
        Self {
            places: Arc::new(places),
            origin: origin.into(),
        }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Tries `remote` first and falls back to `fallback` on any failure or an
/// empty result. Only the fallback can fail the load.
pub async fn load_catalog(
    remote: Option<&dyn CatalogSource>,
    fallback: &dyn CatalogSource,
) -> Result<Catalog, CatalogError> {
    if let Some(remote) = remote {
        match remote.fetch().await {
            Ok(places) if !places.is_empty() => {
                normalize::warn_on_invalid(&places);
                info!("loaded {} places from {}", places.len(), remote.name());
                return Ok(Catalog::new(places, remote.name()));
            }
            Ok(_) => debug!("{} returned no places, using fallback", remote.name()),
            Err(err) => warn!("{} catalog unavailable, using fallback: {err:#}", remote.name()),
        }
    }

    let places = fallback.fetch().await.map_err(|err| CatalogError::Fallback {
        source_name: fallback.name().to_string(),
        message: format!("{err:#}"),
    })?;
    if places.is_empty() {
        return Err(CatalogError::Empty(fallback.name().to_string()));
    }
    normalize::warn_on_invalid(&places);
    info!("loaded {} places from {}", places.len(), fallback.name());
    Ok(Catalog::new(places, fallback.name()))
}

/// Builds the configured sources and loads the catalog.
pub async fn load_from_config(config: &CatalogConfig) -> Result<Catalog, CatalogError> {
    let remote = RemoteSource::from_config(&config.remote);
    let fallback = FileSource::new(config.resolved_fallback_path());
    load_catalog(
        remote.as_ref().map(|source| source as &dyn CatalogSource),
        &fallback,
    )
    .await
}
