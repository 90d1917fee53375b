use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::time::Duration;

use crate::config::ServiceSettings;
use crate::domain::Credential;
use crate::errors::ServiceError;

/// HTTP client bound to one service base URL, with a per-request timeout
#[derive(Clone)]
pub struct ServiceHttpClient {
    client: Client,
    base_url: String,
}

impl ServiceHttpClient {
    pub fn new(settings: &ServiceSettings) -> Result<Self> {
        let client = Self::build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(
        &self,
        endpoint: &'static str,
        bearer: Option<&Credential>,
    ) -> Result<Response, ServiceError> {
        let request = self.client.get(self.build_url(endpoint));
        self.send(endpoint, Self::authorize(request, bearer)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &T,
        bearer: Option<&Credential>,
    ) -> Result<Response, ServiceError> {
        let request = self.client.post(self.build_url(endpoint)).json(body);
        self.send(endpoint, Self::authorize(request, bearer)).await
    }

    pub async fn post_form<T: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        form: &T,
    ) -> Result<Response, ServiceError> {
        let request = self.client.post(self.build_url(endpoint)).form(form);
        self.send(endpoint, request).await
    }

    // --- Helper Methods ---

    fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
        Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build HTTP client")
    }

    fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(request: RequestBuilder, bearer: Option<&Credential>) -> RequestBuilder {
        match bearer {
            Some(credential) => request.bearer_auth(credential.as_str()),
            None => request,
        }
    }

    /// Sends the request; any non-2xx status becomes `ServiceError::Status`
    async fn send(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Response, ServiceError> {
        debug!("Sending request to {}", endpoint);

        let response = request
            .send()
            .await
            .map_err(|source| ServiceError::Transport { endpoint, source })?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let detail = response.text().await.unwrap_or_default();
        Err(ServiceError::status(endpoint, status, detail))
    }
}
