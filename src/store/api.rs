//! Thin JSON client for the remote ClassBook API.
//!
//! Every call is a single request with no retry; failures surface as
//! [`Error::Network`] and the facade decides whether a local fallback
//! applies. An optional bearer token is attached to every request.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Error;

/// HTTP client bound to an API base URL (e.g. `https://host/api`).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the full URL for an endpoint path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {}", token)),
            None => req,
        }
    }

    async fn check(response: reqwest::Response, path: &str) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Error::Network(format!(
                "API {} returned {}",
                path,
                response.status()
            )))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let response = self
            .apply_auth(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check(response, path)
            .await?
            .json()
            .await
            .map_err(|e| Error::Network(e.to_string()))
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let response = self
            .apply_auth(self.http.post(self.url(path)).json(body))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check(response, path).await.map(|_| ())
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let response = self
            .apply_auth(self.http.put(self.url(path)).json(body))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check(response, path).await.map(|_| ())
    }

    pub async fn patch<B: Serialize>(&self, path: &str, body: &B) -> Result<(), Error> {
        let response = self
            .apply_auth(self.http.patch(self.url(path)).json(body))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check(response, path).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        let response = self
            .apply_auth(self.http.delete(self.url(path)))
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        Self::check(response, path).await.map(|_| ())
    }

    /// Returns whether a POST failure came back as a client rejection
    /// (4xx-shaped) rather than an unreachable server. Used by the
    /// two-phase leave-request write to pick rollback over keep-tentative.
    pub fn is_rejection(err: &Error) -> bool {
        match err {
            Error::Network(msg) => msg.contains("returned 4"),
            _ => false,
        }
    }
}
