use anyhow::Result;
use reqwest::Client;

use crate::config::MetadataConfig;
use crate::domain::ExternalId;

/// Client for the primary metadata source (`GET /anime/{id}` on Jikan or a
/// compatible mirror).
#[derive(Clone)]
pub struct JikanClient {
    client: Client,
    metadata: MetadataConfig,
}

impl JikanClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MetadataConfig) -> Result<Self> {
        Ok(Self {
            client: super::build_http_client(config.request_timeout_seconds)?,
            metadata: config.clone(),
        })
    }

    #[must_use]
    pub fn anime_url(&self, id: ExternalId) -> String {
        self.metadata.primary_url_for(id)
    }

    /// The raw `{"data": {...}}` body for `id`, or `None` if the source
    /// does not know it.
    pub async fn get_anime_raw(&self, id: ExternalId) -> Result<Option<String>> {
        super::fetch_raw(&self.client, "Jikan", &self.anime_url(id)).await
    }
}
