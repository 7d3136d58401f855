//! HTTP gateway to the Content Explorer API.
//!
//! Every request goes through [`ApiGateway::execute`], which attaches the
//! bearer token held by the [`SessionStore`], normalizes failures into
//! [`ApiError`] and tears the session down when the server rejects the
//! credential.

use crate::error::ApiError;
use crate::session::SessionStore;
use crate::signal::{AuthSignal, Subscribers};
use futures::channel::mpsc::UnboundedReceiver;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::config::ClientConfig;
use shared::models::{
    Credentials, DEFAULT_ERROR_MESSAGE, ErrorBody, GeneratedImage, ImageHistoryResponse,
    SearchHistoryResponse, SearchResponse, Session,
};

/// Substring that marks an authentication failure in older servers that do
/// not answer with 401.
const EXPIRED_TOKEN_MARKER: &str = "expired token";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Auth endpoints; never carry a token and never force a logout.
    Public,
    /// Everything else.
    Authenticated,
}

/// Client for the remote API, shared by every page or command.
#[derive(Clone, Debug)]
pub struct ApiGateway {
    base_url: String,
    client: Client,
    session: SessionStore,
    login_path: String,
    match_expired_message: bool,
    subscribers: Subscribers,
}

impl ApiGateway {
    /// Create a gateway for `config`, authenticating through `session`.
    #[must_use]
    pub fn new(config: &ClientConfig, session: SessionStore) -> Self {
        Self::with_client(config, session, Client::new())
    }

    /// Create a gateway that sends requests through an existing client.
    #[must_use]
    pub fn with_client(config: &ClientConfig, session: SessionStore, client: Client) -> Self {
        Self {
            base_url: config.api_base.trim_end_matches('/').to_string(),
            client,
            session,
            login_path: config.login_path.clone(),
            match_expired_message: config.match_expired_message,
            subscribers: Subscribers::default(),
        }
    }

    /// The session store requests are authenticated with.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Receive an [`AuthSignal`] whenever the gateway forces a logout.
    ///
    /// Dropping the receiver unsubscribes.
    #[must_use]
    pub fn subscribe(&self) -> UnboundedReceiver<AuthSignal> {
        self.subscribers.subscribe()
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, access: Access) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.api_url(path))
            .header(header::CONTENT_TYPE, "application/json");

        match (access, self.session.token()) {
            (Access::Authenticated, Some(token)) if self.session.is_logged_in() => {
                request.bearer_auth(token)
            }
            _ => request,
        }
    }

    fn is_auth_failure(&self, status: StatusCode, message: &str) -> bool {
        status == StatusCode::UNAUTHORIZED
            || (self.match_expired_message && message.contains(EXPIRED_TOKEN_MARKER))
    }

    fn force_logout(&self, generation: u64, message: &str) {
        match self.session.logout_if_current(generation) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(reason = message, "ignoring rejection of a superseded session");
                return;
            }
            Err(err) => tracing::error!(error = %err, "failed to clear persisted session"),
        }
        tracing::warn!(reason = message, "session rejected by server, logging out");
        self.subscribers.publish(&AuthSignal::Expired {
            message: message.to_string(),
            redirect_to: self.login_path.clone(),
        });
    }

    async fn execute<T>(&self, request: RequestBuilder, access: Access) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let generation = self.session.generation();
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().path().to_string();
        let body = response.bytes().await?;
        tracing::debug!(%status, path = %url, bytes = body.len(), "api response");

        if status.is_success() {
            return decode(&body);
        }

        let message = ErrorBody::message_or_default(&body);
        if access == Access::Authenticated && self.is_auth_failure(status, &message) {
            self.force_logout(generation, &message);
            return Err(ApiError::AuthExpired { status, message });
        }

        Err(ApiError::Http { status, message })
    }

    /// Exchange credentials for a session payload.
    ///
    /// The caller installs the result with [`SessionStore::login`].
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails or the payload carries
    /// no token.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self
            .request(Method::POST, "auth/login", Access::Public)
            .json(credentials);
        self.execute(request, Access::Public).await
    }

    /// Create an account.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn register(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        let request = self
            .request(Method::POST, "auth/register", Access::Public)
            .json(credentials);
        self.execute(request, Access::Public).await
    }

    /// Run a search.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn search(&self, query: &str) -> Result<SearchResponse, ApiError> {
        let request = self
            .request(Method::GET, "search", Access::Authenticated)
            .query(&[("query", query)]);
        self.execute(request, Access::Authenticated).await
    }

    /// List past searches.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn search_history(&self) -> Result<SearchHistoryResponse, ApiError> {
        let request = self.request(Method::GET, "search/history", Access::Authenticated);
        self.execute(request, Access::Authenticated).await
    }

    /// Delete one search history entry.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn delete_search(&self, id: i64) -> Result<Value, ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("search/history/{id}"),
            Access::Authenticated,
        );
        self.execute(request, Access::Authenticated).await
    }

    /// Generate an image for `prompt`.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, ApiError> {
        let request = self
            .request(Method::POST, "image", Access::Authenticated)
            .query(&[("prompt", prompt)]);
        self.execute(request, Access::Authenticated).await
    }

    /// List previously generated images.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn image_history(&self) -> Result<ImageHistoryResponse, ApiError> {
        let request = self.request(Method::GET, "image/history", Access::Authenticated);
        self.execute(request, Access::Authenticated).await
    }

    /// Delete one image history entry.
    ///
    /// # Errors
    /// Returns an [`ApiError`] when the request fails.
    pub async fn delete_image(&self, id: i64) -> Result<Value, ApiError> {
        let request = self.request(
            Method::DELETE,
            &format!("image/history/{id}"),
            Access::Authenticated,
        );
        self.execute(request, Access::Authenticated).await
    }
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value(Value::Null)
    } else {
        serde_json::from_slice(body)
    };

    parsed.map_err(|source| {
        tracing::debug!(error = %source, "undecodable response body");
        ApiError::Decode {
            message: DEFAULT_ERROR_MESSAGE.to_string(),
            source,
        }
    })
}
