use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use toml::{map::Map, Value};

use crate::response::{IntoResponse, Response};
use crate::BoardClientError;

const DEFAULT_TIMEOUT_SECS: i64 = 10;

#[derive(Clone, Debug)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Response<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Bamboo-Rust-App"));

        let http = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .into_response("failed to build http client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Reads `board.base_url` and `board.timeout_secs`.
    pub fn from_config(config: &Map<String, Value>) -> anyhow::Result<Self> {
        let base_url = util::get_str(config, "board", "base_url")?;
        let timeout_secs = util::get_integer_or(
            config,
            "board",
            "timeout_secs",
            DEFAULT_TIMEOUT_SECS,
        )?;
        anyhow::ensure!(timeout_secs > 0, "timeout_secs must be positive");

        Ok(Self::new(
            &base_url,
            Duration::from_secs(timeout_secs as u64),
        )?)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub(crate) async fn get(&self, path: &str) -> Response<String> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();
        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(BoardClientError::FailedStatusCode {
                status_code: status,
                message: text,
            });
        }

        Ok(text)
    }

    pub(crate) async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Response<String> {
        let body =
            serde_json::to_string(body).into_response("failed to serialize body")?;

        let response = self
            .http
            .post(self.url(path))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .into_response("failed to send")?;

        let status = response.status();
        let text = response.text().await.into_response("failed to get text")?;

        if !status.is_success() {
            return Err(BoardClientError::FailedStatusCode {
                status_code: status,
                message: text,
            });
        }

        Ok(text)
    }
}
