use serde::Deserialize;
use serde_json::{Value, json};

use crate::types::DeviceAttributes;

pub const DEFAULT_BASE_URL: &str = "https://euapi.gizwits.com/app";

// Fixed application id published with the Heatzy API documentation.
pub const DEFAULT_APP_ID: &str = "c70a66ff039d41b4a220e198b0fcc8b3";

pub const APP_ID_HEADER: &str = "X-Gizwits-Application-Id";
pub const USER_TOKEN_HEADER: &str = "X-Gizwits-User-token";

pub fn login_url(base_url: &str) -> String {
    format!("{base_url}/login")
}

pub fn device_data_url(base_url: &str, device_id: &str) -> String {
    format!("{base_url}/devdata/{device_id}/latest")
}

pub fn control_url(base_url: &str, device_id: &str) -> String {
    format!("{base_url}/control/{device_id}")
}

pub fn login_body(username: &str, password: &str) -> Value {
    json!({
        "username": username,
        "password": password,
        "lang": "en",
    })
}

pub fn control_mode_body(mode: &str) -> Value {
    json!({ "attrs": { "mode": mode } })
}

pub fn control_timer_body(enabled: bool) -> Value {
    json!({ "attrs": { "timer_switch": if enabled { 1 } else { 0 } } })
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    /// Epoch seconds; converted to millis when installed.
    pub expire_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeviceData {
    pub attr: DeviceAttributes,
}

/// Pull the vendor's `error_message` out of an error body, if any.
pub fn vendor_error_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("error_message")
        .and_then(|v| v.as_str())
        .map(String::from)
}
