use std::time::Duration;

use tracing::warn;

use crate::Result;
use crate::client::HeatzyClient;
use crate::types::{DisplayUnit, Mode};

/// Four-valued thermostat surface over one Heatzy client. Thin
/// adapter: all state logic lives in [`HeatzyClient`].
pub struct Thermostat {
    client: HeatzyClient,
}

impl Thermostat {
    pub fn new(client: HeatzyClient) -> Self {
        Self { client }
    }

    pub async fn current_state(&mut self) -> Result<Mode> {
        self.client.current_mode().await
    }

    pub async fn target_state(&mut self) -> Result<Mode> {
        self.client.target_mode().await
    }

    pub async fn set_target_state(&mut self, mode: Mode) -> Result<Mode> {
        self.client.set_target_mode(mode).await
    }

    /// Display-only readback; the Pilote has no temperature sensor.
    pub fn current_temperature(&self) -> f64 {
        self.client.fake_temperature()
    }

    pub fn target_temperature(&self) -> f64 {
        self.client.fake_temperature()
    }

    pub fn display_units(&self) -> DisplayUnit {
        self.client.display_unit()
    }

    pub fn poll_interval(&self) -> Duration {
        self.client.poll_interval()
    }

    /// One scheduled poll cycle (current + target). Failures are
    /// logged here and never propagate; the next interval retries.
    pub async fn refresh(&mut self) {
        if let Err(e) = self.client.poll().await {
            warn!(error = %e, "poll failed, keeping last known state");
        }
    }

    pub fn client(&self) -> &HeatzyClient {
        &self.client
    }
}

/// Boolean on/off surface: on means actively heating (`cft`),
/// everything else reads as off.
pub struct HeaterSwitch {
    client: HeatzyClient,
}

impl HeaterSwitch {
    pub fn new(client: HeatzyClient) -> Self {
        Self { client }
    }

    pub async fn is_on(&mut self) -> Result<bool> {
        Ok(self.client.current_mode().await? == Mode::Heat)
    }

    pub async fn set_on(&mut self, on: bool) -> Result<bool> {
        let mode = if on { Mode::Heat } else { Mode::Off };
        Ok(self.client.set_target_mode(mode).await? == Mode::Heat)
    }

    pub fn poll_interval(&self) -> Duration {
        self.client.poll_interval()
    }

    /// One scheduled poll cycle, current projection only. Failures
    /// are logged here and never propagate.
    pub async fn refresh(&mut self) {
        if let Err(e) = self.client.poll_current().await {
            warn!(error = %e, "poll failed, keeping last known state");
        }
    }

    pub fn client(&self) -> &HeatzyClient {
        &self.client
    }
}
