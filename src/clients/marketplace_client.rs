use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

use super::api::SavedPropertyApi;
use super::helpers::{cookie_value, error_message};
use crate::config::Config;
use crate::errors::{StoreError, StoreResult};
use crate::models::user::{AuthResponse, LoginRequest, SignupRequest};
use crate::models::{CurrentUser, SavePropertyPayload, SavedPropertyRecord};

pub const SESSION_COOKIE: &str = "sessionid";
pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// reqwest client for the marketplace API. Session and CSRF cookies live in a
/// shared jar, so cookies set by the server (login) are sent on later calls.
#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base_url: Url,
}

impl MarketplaceClient {
    pub fn new(config: &Config) -> StoreResult<MarketplaceClient> {
        let base = config.api_base_url.trim_end_matches('/');
        let base_url = Url::parse(&format!("{base}/")).map_err(|e| {
            StoreError::InvalidInput(format!("invalid api_base_url '{base}': {e}"))
        })?;

        let jar = Arc::new(Jar::default());
        if let Some(session) = config.session_cookie.as_deref() {
            jar.add_cookie_str(&format!("{SESSION_COOKIE}={session}; Path=/"), &base_url);
        }
        if let Some(token) = config.csrf_token.as_deref() {
            jar.add_cookie_str(&format!("{CSRF_COOKIE}={token}; Path=/"), &base_url);
        }

        let mut builder = reqwest::Client::builder().cookie_provider(jar.clone());
        if let Some(seconds) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(MarketplaceClient {
            http: builder.build()?,
            jar,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Django routes end in a slash.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}/", self.base_url, path.trim_matches('/'))
    }

    pub fn csrf_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        cookie_value(header.to_str().ok()?, CSRF_COOKIE)
    }

    fn with_csrf(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.csrf_token() {
            Some(token) => builder.header(CSRF_HEADER, token),
            None => builder,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> StoreResult<CurrentUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(StoreError::InvalidInput(
                "email and password are required".to_string(),
            ));
        }

        let response = self
            .with_csrf(self.http.post(self.endpoint("login")))
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: AuthResponse = response.json().await?;

        info!("Logged in as {}", body.user.username);
        Ok(body.user)
    }

    /// Registers a new account. The server signs the new user in, so the jar
    /// holds a session afterwards.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> StoreResult<CurrentUser> {
        if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(StoreError::InvalidInput(
                "username, email and password are required".to_string(),
            ));
        }

        let response = self
            .with_csrf(self.http.post(self.endpoint("signup")))
            .json(&SignupRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: AuthResponse = response.json().await?;

        info!("Signed up as {}", body.user.username);
        Ok(body.user)
    }

    pub async fn logout(&self) -> StoreResult<()> {
        let response = self
            .with_csrf(self.http.post(self.endpoint("logout")))
            .send()
            .await?;
        ensure_success(response).await?;
        info!("Logged out");
        Ok(())
    }
}

async fn ensure_success(response: Response) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Remote {
        status,
        message: error_message(status, &body),
    })
}

#[async_trait]
impl SavedPropertyApi for MarketplaceClient {
    async fn current_user(&self) -> StoreResult<Option<CurrentUser>> {
        let response = self.http.get(self.endpoint("me")).send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Session is not authenticated");
            return Ok(None);
        }

        let response = ensure_success(response).await?;
        Ok(Some(response.json().await?))
    }

    async fn saved_properties(&self) -> StoreResult<Vec<SavedPropertyRecord>> {
        let response = self
            .http
            .get(self.endpoint("saved-properties"))
            .send()
            .await?;
        let body: Value = ensure_success(response).await?.json().await?;

        let items = match body {
            Value::Array(items) => items,
            other => {
                warn!("Saved properties response was not a list: {}", other);
                return Ok(Vec::new());
            }
        };

        Ok(items
            .iter()
            .filter(|item| item.is_object())
            .map(SavedPropertyRecord::from_value)
            .collect())
    }

    async fn save_property(&self, payload: &SavePropertyPayload) -> StoreResult<Value> {
        let response = self
            .with_csrf(self.http.post(self.endpoint("save-property")))
            .json(payload)
            .send()
            .await?;
        let text = ensure_success(response).await?.text().await?;

        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    async fn remove_property(&self, id: &str) -> StoreResult<()> {
        let response = self
            .with_csrf(self.http.delete(self.endpoint(&format!("remove-property/{id}"))))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
