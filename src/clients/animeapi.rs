use anyhow::Result;
use reqwest::Client;

use crate::config::MetadataConfig;
use crate::domain::ExternalId;

/// Client for the cross-reference source mapping one ID to every other
/// site's identifier.
#[derive(Clone)]
pub struct AnimeApiClient {
    client: Client,
    metadata: MetadataConfig,
}

impl AnimeApiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client(config.request_timeout_seconds)?,
            metadata: config.clone(),
        })
    }

    #[must_use]
    pub fn mapping_url(&self, id: ExternalId) -> String {
        self.metadata.cross_reference_url_for(id)
    }

    pub async fn get_mapping_raw(&self, id: ExternalId) -> Result<Option<String>> {
        super::fetch_raw(&self.client, "AnimeAPI", &self.mapping_url(id)).await
    }
}
