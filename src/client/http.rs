//! HTTP client for the ConnectHub API
//!
//! Thin wrapper over `reqwest` that speaks the server's JSON envelope: a
//! successful response is unwrapped to its `data`, anything else becomes
//! [`ConnectHubError::Api`] carrying the status and the server's message.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;
use crate::handlers::ApiResponse;
use crate::models::{AboutPage, ContactMessage, CreateContactMessageRequest, HomePage, ProprietorView};
use crate::services::{LoginRequest, LoginResponse};
use crate::utils::errors::{ConnectHubError, Result};
use crate::utils::logging::log_api_error;
use crate::validation::Validate;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorPayload,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: String,
}

/// API client bound to one server
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("ConnectHub-Client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Attach a bearer token to every following request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let builder = self.client.request(method, self.url(path)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send<T>(&self, builder: RequestBuilder) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = builder.send().await?;
        let status = response.status();
        let response_url = response.url().clone();
        debug!(status = status.as_u16(), url = %response_url, "API response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) if body.trim().is_empty() => status.canonical_reason().unwrap_or("Request failed").to_string(),
                Err(_) => body,
            };
            log_api_error(response_url.as_str(), &message, Some(status.as_u16()));
            return Err(ConnectHubError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        Ok(envelope.data)
    }

    pub async fn get<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path)?).await
    }

    /// GET with query-string filters
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path)?.json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PATCH, path)?.json(body)).await
    }

    pub async fn delete<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// Sign in to the admin panel and keep the issued token
    pub async fn login(&mut self, request: &LoginRequest) -> Result<LoginResponse> {
        let response: LoginResponse = self.post("/api/admin/login", request).await?;
        self.token = Some(response.token.clone());
        Ok(response)
    }

    pub async fn home(&self) -> Result<HomePage> {
        self.get("/api/public/home").await
    }

    pub async fn about(&self) -> Result<AboutPage> {
        self.get("/api/public/about").await
    }

    /// Current state of a registration started with the wizard
    pub async fn registration(&self, submission_id: &str) -> Result<ProprietorView> {
        self.get(&format!("/api/registration/{}", path_segment(submission_id))).await
    }

    /// Send the contact form; nothing is sent while a field is invalid
    pub async fn submit_contact(&self, request: &CreateContactMessageRequest) -> Result<ContactMessage> {
        request.validate()?;
        self.post("/api/contact", request).await
    }
}

/// Escape a value for use as one path segment
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let client = ApiClient::new("http://localhost:3000/backend").unwrap();
        assert_eq!(client.url("/api/health").unwrap().as_str(), "http://localhost:3000/backend/api/health");

        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.url("api/health").unwrap().as_str(), "http://localhost:3000/api/health");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ConnectHubError::UrlParse(_))));
    }

    #[test]
    fn test_path_segment_escapes() {
        assert_eq!(path_segment("site name/x"), "site%20name%2Fx");
    }
}
