use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use serde_valid::Validate;

pub const MIN_POLL_INTERVAL_MS: u64 = 500;
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// Values the host page injects when the UI loads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
pub struct HostConfig {
    pub device_id: String,
    #[validate(min_length = 1)]
    pub device_serial: String,
    pub sw_version: String,
    pub sw_build: String,
    #[serde(default)]
    pub sw_label: Option<String>,
    #[serde(default)]
    #[validate(minimum = 500)]
    #[validate(maximum = 3_600_000)]
    pub poll_interval_ms: Option<u64>,
}

impl HostConfig {
    /// Poll interval override, or `None` when absent or out of range
    pub fn poll_interval(&self) -> Option<u64> {
        self.poll_interval_ms
            .filter(|ms| (MIN_POLL_INTERVAL_MS..=MAX_POLL_INTERVAL_MS).contains(ms))
    }
}

/// Request timeouts the shell transport applies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestTimeouts {
    pub read_ms: u64,
    pub settings_save_ms: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self {
            read_ms: 10_000,
            settings_save_ms: 15_000,
        }
    }
}

/// `GET /api/status` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: DeviceStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceStatus {
    pub free_heap: u64,
    pub min_free_heap: u64,
    /// Microseconds since boot
    pub time_since_boot: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memguard_threshold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memguard_mode: Option<u8>,
}

impl DeviceStatus {
    pub fn uptime_text(&self) -> String {
        format_time_since_boot(self.time_since_boot)
    }
}

pub fn format_time_since_boot(microseconds: u64) -> String {
    let mut seconds = microseconds / 1_000_000;

    let days = seconds / 86_400;
    seconds %= 86_400;
    let hours = seconds / 3_600;
    seconds %= 3_600;
    let minutes = seconds / 60;
    seconds %= 60;

    format!("{days} days {hours} hours {minutes} minutes {seconds} seconds")
}

#[derive(Debug, Clone, Copy, Serialize_repr, Deserialize_repr, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum RelayKind {
    #[default]
    Actuator = 0,
    /// Contact sensor; `state` means closed to GND
    Sensor = 1,
}

/// One entry of `GET /api/relays`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Relay {
    pub relay_key: String,
    pub channel: u32,
    pub gpio_pin: i32,
    pub state: bool,
    #[serde(rename = "type")]
    pub kind: RelayKind,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub inverted: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayListResponse {
    pub data: Vec<Relay>,
}
