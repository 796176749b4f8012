use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;
use zeronight_shared::constants::{GUESS_ENDPOINT, LEVELS_ENDPOINT, LEVEL_STATE_ENDPOINT, STATE_ENDPOINT};
use zeronight_shared::shared_word_game::{
    ErrorBody, GuessRequest, GuessResponse, LevelStateResponse, LevelsResponse, StateResponse,
};

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};

/// Request/response exchange with the game server.
pub trait GameApi: Clone + Send + Sync + 'static {
    fn fetch_levels(&self) -> impl Future<Output = Result<LevelsResponse, ApiError>> + Send;

    /// `full` also asks for the level catalog.
    fn fetch_state(&self, full: bool) -> impl Future<Output = Result<StateResponse, ApiError>> + Send;

    fn fetch_level_state(&self, level: u32) -> impl Future<Output = Result<LevelStateResponse, ApiError>> + Send;

    fn submit_guess(&self, request: GuessRequest) -> impl Future<Output = Result<GuessResponse, ApiError>> + Send;
}

/// JSON-over-HTTP client. Keeps the server's `sid` cookie for player identity.
#[derive(Clone)]
pub struct HttpGameApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Decodes a success body, or turns a non-2xx status into [`ApiError::Rejected`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let body: ErrorBody =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(format!("{} error body: {}", status, e)))?;
        debug!(%status, detail = ?body.detail, "request rejected");
        return Err(ApiError::Rejected {
            status,
            detail: body.detail,
        });
    }

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

impl GameApi for HttpGameApi {
    async fn fetch_levels(&self) -> Result<LevelsResponse, ApiError> {
        let response = self.client.get(self.url(LEVELS_ENDPOINT)).send().await?;
        read_json(response).await
    }

    async fn fetch_state(&self, full: bool) -> Result<StateResponse, ApiError> {
        let mut request = self.client.get(self.url(STATE_ENDPOINT));
        if full {
            request = request.query(&[("full", "1")]);
        }
        read_json(request.send().await?).await
    }

    async fn fetch_level_state(&self, level: u32) -> Result<LevelStateResponse, ApiError> {
        let response = self
            .client
            .get(self.url(LEVEL_STATE_ENDPOINT))
            .query(&[("level", level)])
            .send()
            .await?;
        read_json(response).await
    }

    async fn submit_guess(&self, request: GuessRequest) -> Result<GuessResponse, ApiError> {
        let response = self.client.post(self.url(GUESS_ENDPOINT)).json(&request).send().await?;
        read_json(response).await
    }
}
