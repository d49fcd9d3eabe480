use async_trait::async_trait;
use tracing::debug;

use crate::error::ProviderError;
use crate::suggest::SuggestionRequest;

/// An external solver that proposes a mix.
///
/// Implementations return the raw response body. Parsing and validation
/// happen on the engine side.
#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<String, ProviderError>;
}

/// Posts the request as JSON to an HTTP endpoint.
pub struct HttpSuggestionProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSuggestionProvider {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl SuggestionProvider for HttpSuggestionProvider {
    async fn suggest(&self, request: &SuggestionRequest) -> Result<String, ProviderError> {
        debug!(endpoint = %self.endpoint, animal = %request.animal, "requesting mix suggestion");

        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
