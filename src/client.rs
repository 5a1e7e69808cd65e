use std::time::Duration;

use tracing::{debug, info, warn};

use crate::logger::{MessageLogMode, MessageLogger};
use crate::protocol::{
    APP_ID_HEADER, DEFAULT_APP_ID, DEFAULT_BASE_URL, DeviceData, USER_TOKEN_HEADER,
    control_mode_body, control_timer_body, control_url, device_data_url, vendor_error_message,
};
use crate::reconcile::ModeCache;
use crate::token::TokenManager;
use crate::types::{DeviceAttributes, DisplayUnit, Event, Mode};
use crate::{Error, Result};

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

const FAKE_TEMP_MIN: f64 = 10.0;
const FAKE_TEMP_MAX: f64 = 38.0;
const DEFAULT_FAKE_TEMP: f64 = 20.0;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
// Well under the poll interval so a hung request cannot starve polls.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct HeatzyClientBuilder {
    device_id: String,
    username: String,
    password: String,
    base_url: String,
    app_id: String,
    poll_interval: Duration,
    request_timeout: Duration,
    fake_temperature: f64,
    display_unit: DisplayUnit,
    event_callbacks: Vec<EventCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl HeatzyClientBuilder {
    pub fn new(
        device_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            username: username.into(),
            password: password.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            app_id: DEFAULT_APP_ID.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            fake_temperature: DEFAULT_FAKE_TEMP,
            display_unit: DisplayUnit::Celsius,
            event_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn app_id(mut self, id: impl Into<String>) -> Self {
        self.app_id = id.into();
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Display-only readback temperature; the Pilote has no sensor.
    pub fn fake_temperature(mut self, temp: f64) -> Self {
        self.fake_temperature = temp;
        self
    }

    pub fn display_unit(mut self, unit: DisplayUnit) -> Self {
        self.display_unit = unit;
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> HeatzyClient {
        let http = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .expect("failed to build HTTP client");

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => {
                Some(MessageLogger::new(mode, &path).expect("failed to open log file"))
            }
            _ => None,
        };

        HeatzyClient {
            http,
            read_url: device_data_url(&self.base_url, &self.device_id),
            write_url: control_url(&self.base_url, &self.device_id),
            base_url: self.base_url,
            app_id: self.app_id,
            token: TokenManager::new(self.username, self.password),
            current: ModeCache::default(),
            target: ModeCache::default(),
            poll_interval: self.poll_interval,
            fake_temperature: self.fake_temperature.clamp(FAKE_TEMP_MIN, FAKE_TEMP_MAX),
            display_unit: self.display_unit,
            event_callbacks: self.event_callbacks,
            logger,
        }
    }
}

/// Client for a single Heatzy Pilote device. Reads are
/// unauthenticated; control writes go through the token manager.
pub struct HeatzyClient {
    http: reqwest::Client,
    read_url: String,
    write_url: String,
    base_url: String,
    app_id: String,
    token: TokenManager,
    current: ModeCache,
    target: ModeCache,
    poll_interval: Duration,
    fake_temperature: f64,
    display_unit: DisplayUnit,
    event_callbacks: Vec<EventCallback>,
    logger: Option<MessageLogger>,
}

impl HeatzyClient {
    pub fn builder(
        device_id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> HeatzyClientBuilder {
        HeatzyClientBuilder::new(device_id, username, password)
    }

    /// What the device is doing right now (Off/Heat/Eco). Always a
    /// live read; the cache is only a change-detection aid.
    pub async fn current_mode(&mut self) -> Result<Mode> {
        Ok(self.fetch_attributes().await?.current_mode())
    }

    /// What the device is set to, including Program.
    pub async fn target_mode(&mut self) -> Result<Mode> {
        Ok(self.fetch_attributes().await?.target_mode())
    }

    /// Apply a logical mode as ordered vendor writes: the timer flag
    /// first (unconditionally), then the mode unless Program was
    /// requested. A failure after the first write may leave a partial
    /// change on the device; the next poll reconciles it.
    pub async fn set_target_mode(&mut self, mode: Mode) -> Result<Mode> {
        self.write_control("set_timer_switch", control_timer_body(mode == Mode::Program))
            .await?;
        if let Some(wire) = mode.as_heatzy_str() {
            self.write_control("set_mode", control_mode_body(wire))
                .await?;
        }
        Ok(mode)
    }

    /// One poll cycle for the thermostat surface: read once, then
    /// diff both the current and target projections against their
    /// caches, notifying on real transitions only. A failed read
    /// leaves both caches untouched.
    pub async fn poll(&mut self) -> Result<()> {
        let attrs = self.fetch_attributes().await?;
        self.reconcile_current(&attrs);
        self.reconcile_target(&attrs);
        Ok(())
    }

    /// Poll cycle for the switch surface: current projection only.
    pub async fn poll_current(&mut self) -> Result<()> {
        let attrs = self.fetch_attributes().await?;
        self.reconcile_current(&attrs);
        Ok(())
    }

    /// Last confirmed current mode, `None` until the first poll.
    pub fn last_current_mode(&self) -> Option<Mode> {
        self.current.get()
    }

    /// Last confirmed target mode, `None` until the first poll.
    pub fn last_target_mode(&self) -> Option<Mode> {
        self.target.get()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn fake_temperature(&self) -> f64 {
        self.fake_temperature
    }

    pub fn display_unit(&self) -> DisplayUnit {
        self.display_unit
    }

    fn reconcile_current(&mut self, attrs: &DeviceAttributes) {
        if let Some((from, to)) = self.current.observe(attrs.current_mode()) {
            info!(%from, %to, "current mode changed");
            self.emit(&Event::CurrentModeChanged { from, to });
        }
    }

    fn reconcile_target(&mut self, attrs: &DeviceAttributes) {
        if let Some((from, to)) = self.target.observe(attrs.target_mode()) {
            info!(%from, %to, "target mode changed");
            self.emit(&Event::TargetModeChanged { from, to });
        }
    }

    fn emit(&self, event: &Event) {
        for cb in &self.event_callbacks {
            cb(event);
        }
    }

    async fn fetch_attributes(&mut self) -> Result<DeviceAttributes> {
        let resp = self
            .http
            .get(&self.read_url)
            .header(APP_ID_HEADER, &self.app_id)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = vendor_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            if let Some(ref mut logger) = self.logger {
                logger.log_read(status.as_u16(), None);
            }
            warn!(status = status.as_u16(), %message, "device read rejected");
            return Err(Error::Vendor {
                status: status.as_u16(),
                message,
            });
        }

        let data: DeviceData = resp.json().await?;
        if let Some(ref mut logger) = self.logger {
            logger.log_read(status.as_u16(), Some(&data.attr));
        }
        debug!(mode = %data.attr.mode, timer_switch = data.attr.timer_switch, "device state read");
        Ok(data.attr)
    }

    async fn write_control(&mut self, action: &str, body: serde_json::Value) -> Result<()> {
        let token = self
            .token
            .ensure_valid(&self.http, &self.base_url, &self.app_id, self.logger.as_mut())
            .await?
            .to_string();

        if let Some(ref mut logger) = self.logger {
            logger.log_command(action, &body);
        }
        debug!(action, "sending control command");

        let resp = self
            .http
            .post(&self.write_url)
            .header(APP_ID_HEADER, &self.app_id)
            .header(USER_TOKEN_HEADER, token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let resp_body = resp.text().await.unwrap_or_default();
            let message = vendor_error_message(&resp_body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
            warn!(action, status = status.as_u16(), %message, "control command rejected");
            return Err(Error::Vendor {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }
}
