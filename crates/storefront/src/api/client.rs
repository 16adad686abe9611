//! HTTP client wrapper for the backend gateway.
//!
//! Every live request goes through [`ApiClient`]: it attaches the bearer
//! credential from the session store when one is present, applies the
//! configured timeout, and handles the cross-cutting 401 behavior (clear
//! the stored credential, emit a session-expired event).

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::config::BackendConfig;
use crate::session::{CredentialStore, SessionEvent, SessionEvents, TOKEN_KEY};

use super::ApiError;

/// Maximum response-body excerpt kept on a non-2xx error.
const BODY_EXCERPT_LEN: usize = 500;

/// Client for the backend gateway's REST API.
///
/// Cheap to clone; all clones share one connection pool, credential store,
/// and event channel.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    credentials: Arc<dyn CredentialStore>,
    events: SessionEvents,
}

impl ApiClient {
    /// Create a new gateway client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: &BackendConfig,
        credentials: Arc<dyn CredentialStore>,
        events: SessionEvents,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        if let Some(token) = &config.auth_token {
            use secrecy::ExposeSecret;
            credentials.insert(TOKEN_KEY, token.expose_secret());
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_base_url.clone(),
                credentials,
                events,
            }),
        })
    }

    /// Issue a GET request with optional query parameters.
    pub async fn get<T, Q>(&self, path: &str, query: Option<&Q>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut request = self.inner.client.get(self.endpoint(path));
        if let Some(query) = query {
            request = request.query(query);
        }
        self.send(request).await
    }

    /// Issue a POST request with a JSON body.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.inner.client.post(self.endpoint(path)).json(body))
            .await
    }

    /// Issue a POST request with no body.
    pub async fn post_empty<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(self.inner.client.post(self.endpoint(path))).await
    }

    /// Issue a PUT request with a JSON body.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(self.inner.client.put(self.endpoint(path)).json(body))
            .await
    }

    /// Issue a DELETE request.
    pub async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send(self.inner.client.delete(self.endpoint(path)))
            .await
    }

    /// Join `path` (always starting with `/`) onto the configured base URL.
    fn endpoint(&self, path: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    /// Send a request: attach the bearer credential, check the status,
    /// handle 401 teardown, and parse the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        mut request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        if let Some(token) = self.inner.credentials.get(TOKEN_KEY) {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            // The stored credential is no longer valid. Clear it and tell
            // the UI layer; this is observable globally, once per response.
            debug!("Gateway rejected credential, clearing session");
            self.inner.credentials.remove(TOKEN_KEY);
            self.inner.events.emit(SessionEvent::Expired);
            return Err(ApiError::Unauthorized);
        }

        // Read the body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            let excerpt: String = response_text.chars().take(BODY_EXCERPT_LEN).collect();
            error!(
                status = %status,
                body = %excerpt,
                "Gateway returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: excerpt,
            });
        }

        match serde_json::from_str(&response_text) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(
                    error = %e,
                    body = %response_text.chars().take(BODY_EXCERPT_LEN).collect::<String>(),
                    "Failed to parse gateway response"
                );
                Err(ApiError::Parse(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;

    fn client_for(base: &str) -> ApiClient {
        let config = BackendConfig::live(base).expect("valid url");
        ApiClient::new(&config, MemoryCredentialStore::shared(), SessionEvents::new())
            .expect("client builds")
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = client_for("http://localhost:8080/api");
        assert_eq!(client.endpoint("/books"), "http://localhost:8080/api/books");

        let client = client_for("http://localhost:8080/api/");
        assert_eq!(
            client.endpoint("/books/42"),
            "http://localhost:8080/api/books/42"
        );
    }

    #[test]
    fn test_seed_token_lands_in_store() {
        let mut config = BackendConfig::fixtures();
        config.auth_token = Some(secrecy::SecretString::from("seed-token"));

        let store = MemoryCredentialStore::shared();
        let _client = ApiClient::new(&config, store.clone(), SessionEvents::new())
            .expect("client builds");
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("seed-token"));
    }
}
