use chrono::Utc;
use tracing::{debug, warn};

use crate::logger::MessageLogger;
use crate::protocol::{APP_ID_HEADER, LoginResponse, login_body, login_url};
use crate::{Error, Result};

/// Owns the Heatzy user token and its expiry. No other component
/// stores or caches the token value; callers only ever ask for a
/// usable one via [`ensure_valid`](TokenManager::ensure_valid).
pub(crate) struct TokenManager {
    username: String,
    password: String,
    token: String,
    expires_at_ms: i64,
}

impl TokenManager {
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            token: String::new(),
            // Start 10s in the past so the first write forces a login.
            expires_at_ms: Utc::now().timestamp_millis() - 10_000,
        }
    }

    fn is_valid(&self) -> bool {
        Utc::now().timestamp_millis() < self.expires_at_ms
    }

    /// Returns a non-expired token, logging in first if needed. On a
    /// failed refresh the stored token is left unchanged and the
    /// error propagates; the caller's write cannot proceed anyway.
    pub async fn ensure_valid(
        &mut self,
        http: &reqwest::Client,
        base_url: &str,
        app_id: &str,
        mut logger: Option<&mut MessageLogger>,
    ) -> Result<&str> {
        if self.is_valid() {
            return Ok(&self.token);
        }

        debug!("token expired, logging in");
        let resp = http
            .post(login_url(base_url))
            .header(APP_ID_HEADER, app_id)
            .json(&login_body(&self.username, &self.password))
            .send()
            .await?;

        let status = resp.status();
        if let Some(l) = logger.as_deref_mut() {
            l.log_login(status.as_u16());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = crate::protocol::vendor_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            warn!(status = status.as_u16(), %message, "login rejected");
            return Err(Error::Auth {
                status: status.as_u16(),
                message,
            });
        }

        let login: LoginResponse = resp.json().await?;
        self.token = login.token;
        self.expires_at_ms = login.expire_at * 1000;
        debug!(expires_at_ms = self.expires_at_ms, "token refreshed");
        Ok(&self.token)
    }
}
