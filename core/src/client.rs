use crate::config::{ClientConfig, ConfigError};
use crate::error::{ApiError, ErrorEnvelope};
use crate::notify::{Notifier, TracingNotifier};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

type SessionExpiredHook = Arc<dyn Fn() + Send + Sync>;

/// One configured HTTP client shared by every API module.
///
/// Requests carry the session cookie automatically; responses pass through
/// a single classify/report path so each failure produces exactly one user
/// notification before the typed error reaches the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    notifier: Arc<dyn Notifier>,
    session_expired: Option<SessionExpiredHook>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(|err| ConfigError::Invalid(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url,
            notifier: Arc::new(TracingNotifier),
            session_expired: None,
        })
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Register the 401 side effect: the generalization of "force
    /// navigation to the login page". Fires on every unauthorized
    /// response, independent of the caller's own error handling.
    pub fn on_session_expired(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.session_expired = Some(Arc::new(hook));
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Request(format!("invalid request path {path}: {err}")))
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http.request(method, url)
    }

    /// Single execute path for every request/response pair. On success the
    /// body is handed back for typed decoding; on failure the error is
    /// classified, reported once, and returned.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                let classified = classify_transport(err);
                self.report(&classified);
                return Err(classified);
            }
        };
        if response.status().is_success() {
            return Ok(response);
        }
        let classified = classify_status(response).await;
        self.report(&classified);
        Err(classified)
    }

    /// Surface the transient notification, exactly once per failure, and
    /// fire the session-expiry hook on 401.
    pub(crate) fn report(&self, err: &ApiError) {
        self.notifier.error(&err.user_message());
        debug!(target: "inkweave::http", error = %err, "request failed");
        if err.is_unauthorized() {
            if let Some(hook) = &self.session_expired {
                hook();
            }
        }
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::Stream(format!("failed to read response body: {err}")))?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        self.decode(response).await
    }

    pub(crate) async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::GET, url).query(query)).await?;
        self.decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::POST, url).json(body)).await?;
        self.decode(response).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::PUT, url).json(body)).await?;
        self.decode(response).await
    }

    pub(crate) async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        self.decode(response).await
    }

    /// For endpoints that answer 204 or an empty body.
    pub(crate) async fn delete_empty(&self, path: &str) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    pub(crate) async fn post_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path)?;
        self.send(self.request(Method::POST, url).json(body)).await?;
        Ok(())
    }
}

fn classify_transport(err: reqwest::Error) -> ApiError {
    if err.is_builder() {
        // The request never left the client.
        ApiError::Request(err.to_string())
    } else {
        // Sent, but no response came back (connect failure, timeout, reset).
        ApiError::Network(err)
    }
}

async fn classify_status(response: Response) -> ApiError {
    let status = response.status();
    let envelope = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ErrorEnvelope>(&bytes).unwrap_or_default(),
        Err(err) => {
            warn!(target: "inkweave::http", %err, "failed to read error body");
            ErrorEnvelope::default()
        }
    };
    if status == StatusCode::UNPROCESSABLE_ENTITY && !envelope.errors.is_empty() {
        debug!(target: "inkweave::http", errors = ?envelope.errors, "validation failure detail");
    }
    ApiError::from_status(status.as_u16(), envelope)
}
