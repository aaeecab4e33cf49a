pub mod auth;
pub mod backend;
pub mod export;
pub mod kpi;
pub mod layout;
pub mod teams;
pub mod users;
pub mod weekly_rates;
pub mod work_session;

use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ApiErrorCode, AppError, AppResult};

pub use auth::AuthApi;
pub use backend::{AuthBackend, KpiBackend, LayoutBackend};
pub use export::ExportApi;
pub use kpi::KpiApi;
pub use layout::LayoutApi;
pub use teams::TeamApi;
pub use users::UserApi;
pub use weekly_rates::WeeklyRateApi;
pub use work_session::WorkSessionApi;

/// Name of the HTTP-only cookie carrying the session JWT.
pub const SESSION_COOKIE: &str = "token";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shared HTTP client for every resource of the Time Manager API.
///
/// Authentication rides on the `token` cookie set by `auth/login`, so all
/// resource views share one cookie jar through this client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.api_root())
            .map_err(|err| AppError::config(format!("invalid API root {}: {err}", config.api_root())))?;
        let jar = Arc::new(Jar::default());

        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .cookie_provider(Arc::clone(&jar))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(StdDuration::from_secs(90)))
            .build()
            .map_err(|err| AppError::config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            jar,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn teams(&self) -> TeamApi<'_> {
        TeamApi::new(self)
    }

    pub fn work_session(&self) -> WorkSessionApi<'_> {
        WorkSessionApi::new(self)
    }

    pub fn kpi(&self) -> KpiApi<'_> {
        KpiApi::new(self)
    }

    pub fn export(&self) -> ExportApi<'_> {
        ExportApi::new(self)
    }

    pub fn layout(&self) -> LayoutApi<'_> {
        LayoutApi::new(self)
    }

    pub fn weekly_rates(&self) -> WeeklyRateApi<'_> {
        WeeklyRateApi::new(self)
    }

    /// Current value of the session cookie, if the server set one.
    pub fn session_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let raw = header.to_str().ok()?;
        raw.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
    }

    /// Seeds the cookie jar with a token obtained elsewhere.
    pub fn restore_session_token(&self, token: &str) {
        let cookie = format!("{SESSION_COOKIE}={token}; Path=/");
        self.jar.add_cookie_str(&cookie, &self.base_url);
    }

    pub(crate) fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|err| {
            AppError::api(
                ApiErrorCode::InvalidRequest,
                format!("invalid resource path {path}: {err}"),
            )
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let request = self.http.get(self.url(path)?);
        self.send_json(Method::GET, path, request).await
    }

    pub(crate) async fn get_with_query<Q, T>(&self, path: &str, query: &Q) -> AppResult<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.get(self.url(path)?).query(query);
        self.send_json(Method::GET, path, request).await
    }

    pub(crate) async fn post<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.url(path)?).json(body);
        self.send_json(Method::POST, path, request).await
    }

    pub(crate) async fn post_empty(&self, path: &str) -> AppResult<()> {
        let request = self.http.post(self.url(path)?);
        self.send_unit(Method::POST, path, request).await
    }

    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.post(self.url(path)?).json(body);
        self.send_unit(Method::POST, path, request).await
    }

    pub(crate) async fn put_unit<B>(&self, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.put(self.url(path)?).json(body);
        self.send_unit(Method::PUT, path, request).await
    }

    pub(crate) async fn delete(&self, path: &str) -> AppResult<()> {
        let request = self.http.delete(self.url(path)?);
        self.send_unit(Method::DELETE, path, request).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
    ) -> AppResult<T> {
        let (request_id, response) = self.dispatch(&method, path, request).await?;

        let body = response.bytes().await.map_err(|err| {
            AppError::api_with_details(
                ApiErrorCode::InvalidResponse,
                format!("failed to read response body: {err}"),
                None,
                Some(json!({ "requestId": request_id, "path": path })),
            )
        })?;

        serde_json::from_slice(&body).map_err(|err| {
            AppError::api_with_details(
                ApiErrorCode::InvalidResponse,
                format!("unexpected response shape for {method} {path}: {err}"),
                None,
                Some(json!({ "requestId": request_id, "path": path })),
            )
        })
    }

    async fn send_unit(&self, method: Method, path: &str, request: RequestBuilder) -> AppResult<()> {
        self.dispatch(&method, path, request).await.map(|_| ())
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        request: RequestBuilder,
    ) -> AppResult<(String, reqwest::Response)> {
        let request_id = Uuid::new_v4().to_string();
        debug!(
            target: "app::api",
            method = %method,
            path,
            request_id = %request_id,
            "sending request"
        );

        let start = Instant::now();
        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await
            .map_err(|err| {
                warn!(
                    target: "app::api",
                    method = %method,
                    path,
                    request_id = %request_id,
                    "request failed before a response arrived"
                );
                error_from_reqwest(err, &request_id)
            })?;

        let status = response.status();
        let latency_ms = start.elapsed().as_millis();

        if status.is_success() {
            debug!(
                target: "app::api",
                method = %method,
                path,
                status = status.as_u16(),
                latency_ms,
                request_id = %request_id,
                "request completed"
            );
            return Ok((request_id, response));
        }

        let server_message = response
            .json::<JsonValue>()
            .await
            .ok()
            .and_then(|body| extract_server_message(&body));

        warn!(
            target: "app::api",
            method = %method,
            path,
            status = status.as_u16(),
            latency_ms,
            request_id = %request_id,
            "API returned non-success status"
        );

        Err(map_http_error(status, server_message, &request_id))
    }
}

fn extract_server_message(body: &JsonValue) -> Option<String> {
    ["error", "message"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|value| value.as_str()))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

fn map_http_error(status: StatusCode, server_message: Option<String>, request_id: &str) -> AppError {
    let (code, fallback) = match status {
        StatusCode::UNAUTHORIZED => (ApiErrorCode::Unauthorized, "session is missing or expired".to_string()),
        StatusCode::FORBIDDEN => (ApiErrorCode::Forbidden, "insufficient permissions".to_string()),
        StatusCode::NOT_FOUND => (ApiErrorCode::NotFound, "resource not found".to_string()),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            (ApiErrorCode::InvalidRequest, "request was rejected by the server".to_string())
        }
        status if status.is_server_error() => (
            ApiErrorCode::ServerUnavailable,
            format!("server error (status {})", status.as_u16()),
        ),
        status => (
            ApiErrorCode::Unknown,
            format!("unexpected status {}", status.as_u16()),
        ),
    };

    let (code, message) = match server_message {
        Some(message) if code == ApiErrorCode::Unauthorized && message == "invalid credentials" => {
            (ApiErrorCode::InvalidCredentials, message)
        }
        Some(message) => (code, message),
        None => (code, fallback),
    };

    AppError::api_with_details(
        code,
        message,
        Some(status.as_u16()),
        Some(json!({ "requestId": request_id })),
    )
}

fn error_from_reqwest(err: reqwest::Error, request_id: &str) -> AppError {
    let details = Some(json!({ "requestId": request_id }));
    if err.is_timeout() {
        AppError::api_with_details(ApiErrorCode::HttpTimeout, "request timed out", None, details)
    } else if err.is_connect() {
        AppError::api_with_details(
            ApiErrorCode::Network,
            "could not reach the API server",
            None,
            details,
        )
    } else if let Some(status) = err.status() {
        map_http_error(status, None, request_id)
    } else {
        AppError::api_with_details(
            ApiErrorCode::Unknown,
            format!("request failed: {err}"),
            None,
            details,
        )
    }
}

pub mod testing {
    use super::*;

    /// Exposes status mapping for integration tests without widening the public API surface.
    pub fn map_http_error(status: StatusCode, server_message: Option<&str>) -> AppError {
        super::map_http_error(status, server_message.map(str::to_string), "test-request-id")
    }
}
