//! Configured HTTP client with request/response interceptors.
//!
//! ARCHITECTURE
//! ============
//! Every service call funnels through `ApiClient::execute`:
//!
//! 1. request interceptor: attach `Authorization: Bearer <token>` from the
//!    persisted session, when there is one;
//! 2. dispatch through the shared `reqwest::Client`;
//! 3. response interceptor: failures become a typed `ApiError` and the
//!    cross-cutting ones trigger their global side effect once, here.
//!
//! | failure   | side effect                                            |
//! |-----------|--------------------------------------------------------|
//! | 401       | tear down session, navigate to login, expiry notice    |
//! | 403       | permission notice                                      |
//! | 5xx       | server notice                                          |
//! | no reply  | connectivity notice                                    |
//!
//! The error is always returned to the caller afterwards so call sites can
//! still apply field-level handling.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{
    ApiError, ErrorKind, MSG_BAD_RESPONSE, MSG_FORBIDDEN, MSG_NETWORK, MSG_SERVER, MSG_SESSION_EXPIRED,
};
use crate::config::ClientConfig;
use crate::state::session::SessionStore;
use crate::util::nav::{LogNavigator, Navigator};
use crate::util::notify::{Notice, Notifier, TracingNotifier};
use crate::util::storage::MemoryStore;

/// Shared handle to the API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: String,
    login_path: String,
    session: Arc<SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

/// Builder wiring the client to its session and side-effect sinks.
pub struct ApiClientBuilder {
    config: ClientConfig,
    session: Option<Arc<SessionStore>>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClientBuilder {
    #[must_use]
    pub fn session(mut self, session: Arc<SessionStore>) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Build the client. Without an explicit session an in-memory one is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest` client fails to build.
    pub fn build(self) -> Result<ApiClient, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(self.config.request_timeout)
            .connect_timeout(self.config.connect_timeout)
            .user_agent(concat!("encenape/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let session = self
            .session
            .unwrap_or_else(|| Arc::new(SessionStore::new(Arc::new(MemoryStore::new()))));
        Ok(ApiClient {
            inner: Arc::new(Inner {
                http,
                base_url: self.config.api_base(),
                login_path: self.config.login_path,
                session,
                notifier: self.notifier,
                navigator: self.navigator,
            }),
        })
    }
}

impl ApiClient {
    #[must_use]
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            session: None,
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(LogNavigator),
        }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.inner.session
    }

    #[must_use]
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.inner.notifier
    }

    #[must_use]
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.inner.navigator
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.inner.login_path
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // =========================================================================
    // VERBS
    // =========================================================================

    /// `GET path`, JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, path, |req| req).await?;
        decode_json(response).await
    }

    /// `GET path?query`, JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.execute(Method::GET, path, |req| req.query(query)).await?;
        decode_json(response).await
    }

    /// `POST path` with a JSON body, JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(Method::POST, path, |req| req.json(body)).await?;
        decode_json(response).await
    }

    /// `POST path` with a JSON body, bare-string reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let response = self.execute(Method::POST, path, |req| req.json(body)).await?;
        decode_text(response).await
    }

    /// `POST path?query` with no body, bare-string reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn post_query_text<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<String, ApiError> {
        let response = self.execute(Method::POST, path, |req| req.query(query)).await?;
        decode_text(response).await
    }

    /// `POST path` with a `text/plain` body, JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn post_plain<T: DeserializeOwned>(&self, path: &str, body: String) -> Result<T, ApiError> {
        let response = self
            .execute(Method::POST, path, |req| {
                req.header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
                    .body(body)
            })
            .await?;
        decode_json(response).await
    }

    /// `PUT path` with a JSON body, JSON reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.execute(Method::PUT, path, |req| req.json(body)).await?;
        decode_json(response).await
    }

    /// `PUT path` with a JSON body, bare-string reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn put_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let response = self.execute(Method::PUT, path, |req| req.json(body)).await?;
        decode_text(response).await
    }

    /// `DELETE path`, bare-string reply.
    ///
    /// # Errors
    ///
    /// Returns the intercepted `ApiError` on any failure.
    pub async fn delete_text(&self, path: &str) -> Result<String, ApiError> {
        let response = self.execute(Method::DELETE, path, |req| req).await?;
        decode_text(response).await
    }

    // =========================================================================
    // INTERCEPTORS
    // =========================================================================

    async fn execute(
        &self,
        method: Method,
        path: &str,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        let mut request = self.inner.http.request(method.clone(), url);
        if let Some(token) = self.inner.session.persisted_token() {
            request = request.bearer_auth(token);
        }
        let request = build(request);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, %method, %path, "request got no response");
                return Err(self.intercept(ApiError::network()));
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(%method, %path, status = status.as_u16(), "request ok");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response(status, &body);
        tracing::debug!(%method, %path, status = status.as_u16(), message = %error.message, "request failed");
        Err(self.intercept(error))
    }

    /// Global side effects for cross-cutting failures. Returns the error
    /// unchanged.
    fn intercept(&self, error: ApiError) -> ApiError {
        match error.kind {
            ErrorKind::Auth => {
                if self.inner.session.teardown() {
                    tracing::info!("session invalidated by server");
                    self.inner.navigator.navigate(&self.inner.login_path);
                    self.inner.notifier.notify(Notice::error(MSG_SESSION_EXPIRED));
                }
            }
            ErrorKind::Permission => self.inner.notifier.notify(Notice::error(MSG_FORBIDDEN)),
            ErrorKind::Server => self.inner.notifier.notify(Notice::error(MSG_SERVER)),
            ErrorKind::Network => self.inner.notifier.notify(Notice::error(MSG_NETWORK)),
            ErrorKind::Validation | ErrorKind::Application => {}
        }
        error
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "failed to read response body");
        ApiError::new(ErrorKind::Application, MSG_BAD_RESPONSE)
    })?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(error = %e, "failed to decode response body");
        ApiError::new(ErrorKind::Application, MSG_BAD_RESPONSE)
    })
}

async fn decode_text(response: Response) -> Result<String, ApiError> {
    response.text().await.map_err(|e| {
        tracing::warn!(error = %e, "failed to read response body");
        ApiError::new(ErrorKind::Application, MSG_BAD_RESPONSE)
    })
}
