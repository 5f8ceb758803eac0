//! Authenticated JSON client for the dashboard backend.
//!
//! Every request carries the current credential as a bearer header (when
//! one is stored) and the cookie jar, since some endpoints are gated by the
//! cookie session and others by the bearer token.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::common::{ChatUser, Message};
use crate::config::ApiRoutes;
use crate::session::IdentityStore;

use super::api::{
    DashboardApi, DirectoryResponse, MessagesResponse, NotificationPage, OutgoingMessage,
};
use super::error::ApiError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    routes: ApiRoutes,
    identity: IdentityStore,
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    access_token: String,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        routes: ApiRoutes,
        identity: IdentityStore,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|err| ApiError::Transport {
                message: format!("failed to build HTTP client: {err}"),
            })?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes,
            identity,
        })
    }

    pub fn identity(&self) -> &IdentityStore {
        &self.identity
    }

    /// Resolves `path` against the base origin, adding a leading `/` if missing.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url(path)).map_err(|err| ApiError::Transport {
            message: format!("invalid URL for `{path}`: {err}"),
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.endpoint(path, &[])?;
        self.send(method, url, body).await
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn send(&self, method: Method, url: Url, body: Option<&Value>) -> Result<Value, ApiError> {
        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.identity.credential() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            log::debug!("{method} {} failed before a response: {err}", url.path());
            ApiError::Transport {
                message: err.to_string(),
            }
        })?;

        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(is_json_media_type);
        let raw = response.text().await.map_err(|err| ApiError::Transport {
            message: format!("failed to read response body: {err}"),
        })?;
        let data = parse_body(&raw, is_json);

        if !status.is_success() {
            log::debug!("{method} {} returned {status}", url.path());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: status_message(status, &data),
                body: (!data.is_null()).then_some(data),
            });
        }

        if let Some(error) = data.get("error").filter(|error| !error.is_null()) {
            return Err(ApiError::Application {
                status: status.as_u16(),
                message: value_text(error),
                body: data,
            });
        }

        Ok(data)
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        let data = self.send(Method::GET, url, None).await?;
        decode(data)
    }

    /// Exchanges username/email and password for an access token.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let data = self
            .post(
                &self.routes.login,
                &json!({ "username": username, "password": password }),
            )
            .await?;
        let response: SignInResponse = decode(data)?;
        Ok(response.access_token)
    }
}

/// `application/json` and structured-suffix types such as `application/problem+json`.
fn is_json_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

fn parse_body(raw: &str, is_json: bool) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if is_json {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

fn status_message(status: StatusCode, data: &Value) -> String {
    let server_message = data
        .get("error")
        .or_else(|| data.get("message"))
        .filter(|value| !value.is_null())
        .map(value_text);
    if let Some(message) = server_message {
        return message;
    }
    match data {
        Value::String(text) if !text.trim().is_empty() => text.clone(),
        _ => format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown Status")
        ),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|err| ApiError::Decode {
        message: err.to_string(),
    })
}

#[async_trait]
impl DashboardApi for ApiClient {
    async fn fetch_messages(&self, counterpart_id: &str) -> Result<Vec<Message>, ApiError> {
        let response: MessagesResponse = self
            .get_typed(&self.routes.messages, &[("counterpart_id", counterpart_id)])
            .await?;
        Ok(response.into_messages())
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<(), ApiError> {
        let body = serde_json::to_value(message).map_err(|err| ApiError::Decode {
            message: err.to_string(),
        })?;
        self.post(&self.routes.send_message, &body).await?;
        Ok(())
    }

    async fn fetch_directory(&self) -> Result<Vec<ChatUser>, ApiError> {
        let response: DirectoryResponse = self.get_typed(&self.routes.directory, &[]).await?;
        Ok(response.users)
    }

    async fn fetch_notifications(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<NotificationPage, ApiError> {
        let page = page.to_string();
        let limit = limit.to_string();
        self.get_typed(
            &self.routes.notifications,
            &[("page", page.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    async fn mark_seen(&self, ids: &[String]) -> Result<(), ApiError> {
        self.post(&self.routes.mark_seen, &json!({ "ids": ids }))
            .await?;
        Ok(())
    }
}
