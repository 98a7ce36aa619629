use serde::{Deserialize, Serialize};

use crate::types::*;

/// Events that can happen in the app
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Event {
    /// Host page values, sent once when the page loads
    Initialize(HostConfig),

    Poll(PollEvent),
    Relay(RelayEvent),
    Firmware(FirmwareEvent),
    Ui(UiEvent),
}

/// Periodic status and relay list refresh
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// Fired by the shell every `status_interval_ms`
    StatusTick,
    /// Fired by the shell every `relay_interval_ms`
    RelayTick,

    #[serde(skip)]
    StatusResponse(Result<DeviceStatus, String>),
    /// `generation` is the relay write generation the fetch was issued under
    #[serde(skip)]
    RelaysResponse {
        generation: u64,
        result: Result<Vec<Relay>, String>,
    },
}

/// User initiated relay writes
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum RelayEvent {
    SetRelayState {
        relay_key: String,
        channel: u32,
        state: bool,
    },
    UpdateRelayConfig {
        relay_key: String,
        channel: u32,
        gpio_pin: i32,
        enabled: bool,
        inverted: bool,
    },

    #[serde(skip)]
    SetRelayStateResponse {
        relay_key: String,
        result: Result<RelayUpdateResponse, String>,
    },
    #[serde(skip)]
    UpdateRelayConfigResponse {
        relay_key: String,
        result: Result<RelayUpdateResponse, String>,
    },
}

/// Firmware update detection
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum FirmwareEvent {
    /// The OTA URL field was populated or edited and lost focus
    OtaUrlChanged { url: String },
    /// Re-check with the current OTA URL (startup and manual re-check)
    CheckForUpdate,
    /// Submit the update form for the available candidate
    StartOtaUpdate,

    #[serde(skip)]
    BuildInfoResponse {
        sequence: u64,
        result: Result<BuildInfo, String>,
    },
    #[serde(skip)]
    StartOtaUpdateResponse(Result<(), String>),
}

/// Banner handling
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum UiEvent {
    DismissNotification { key: NotificationKey },
    /// Keys the shell kept in session storage across a reload
    RestoreDismissed { keys: Vec<NotificationKey> },
    ClearError,
    ClearSuccess,
}
