//! HTTP transport and the per-slice query functions.
//!
//! Query functions are pass-throughs: one request, parsed body out, every
//! failure returned to the caller untouched.

pub mod countries;
pub mod graphql;
pub mod punk;

pub use countries::CountriesApi;
pub use graphql::GraphqlClient;
pub use punk::PunkApi;

use crate::utils::error::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("punk-atlas/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn post_json<B, T>(&self, url: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.post(url).json(payload).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let body = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}
