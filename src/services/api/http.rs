use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ApiClientConfig {
    pub fn try_from_url(url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(url.trim())?;
        Ok(Self::new(base_url))
    }

    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(15),
            user_agent: format!("LoanLens/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Resolves an endpoint path against the base URL. Trailing slashes on
    /// the base are stripped so `http://x/` + `/dashboard/...` never yields
    /// a doubled slash.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(ApiError::from)
    }
}

#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ApiClientConfig,
}

impl HttpClient {
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ApiError::Request)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub async fn get_json(&self, url: Url) -> Result<Value, ApiError> {
        let response = self.client.get(url).send().await.map_err(ApiError::Request)?;
        Self::hydrate_response(response).await
    }

    async fn hydrate_response(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(ApiError::Request)?;

        // Error responses carrying a JSON body (e.g. {"detail": ...}) are
        // passed through for display, matching fetch-then-parse semantics.
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(source) if status.is_success() => Err(ApiError::Deserialize { source, body }),
            Err(_) => Err(ApiError::HttpStatus { status, body }),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: StatusCode, body: String },
    #[error("failed to deserialize response: {source}")]
    Deserialize {
        source: serde_json::Error,
        body: String,
    },
}
