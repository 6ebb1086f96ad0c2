use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;

use super::{Query, Transport, error::ApiError};

/// `{server}/api/v1/{api_type}/{path}` over reqwest, bearer token auth
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig, api_type: &str) -> Result<Self, ApiError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent(api_type))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url(&config.server, api_type),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn base_url(server: &str, api_type: &str) -> String {
    format!("{}/api/v1/{}", server.trim_end_matches('/'), api_type)
}

/// `pe` -> `AdaptiveApiPe/1.0`
fn user_agent(api_type: &str) -> String {
    let mut chars = api_type.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("AdaptiveApi{capitalized}/1.0")
}

impl Transport for HttpTransport {
    async fn fetch(&self, path: &str, query: &Query) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let res = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn post(&self, path: &str, query: &Query, body: &Value) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let res = self
            .client
            .post(&url)
            .query(query)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}
