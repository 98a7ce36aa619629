use serde::{Deserialize, Serialize};

use crate::types::*;

/// Trait for types that can handle error messages
///
/// This allows HTTP helper functions to work with Model without directly depending on it.
pub trait ModelErrorHandler {
    fn set_error(&mut self, error: String);
}

/// Application Model - the complete state, also serves as the ViewModel
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Model {
    // Host page values
    pub device_id: String,
    pub device_serial: String,
    pub request_timeouts: RequestTimeouts,

    // Device state
    pub status: Option<DeviceStatus>,
    pub uptime_text: Option<String>,
    pub actuators: Vec<Relay>,
    pub sensors: Vec<Relay>,
    /// Last result line per relay of a configuration update
    pub relay_config_status: Vec<(String, String)>,

    // Relay poll/write coordination
    pub poll: PollCoordinator,

    // Firmware update detection
    pub running_firmware: FirmwareDescriptor,
    pub ota_url: String,
    pub update_verdict: Option<UpdateVerdict>,
    pub update_notification: Option<Notification>,
    /// Raised on initialization; the shell answers with `CheckForUpdate`
    pub startup_update_check_pending: bool,
    pub update_check_sequence: u64,
    pub applied_update_check: u64,

    // Session-scoped dismissals, persisted by the shell in session storage
    pub dismissed_notifications: NotificationDismissalStore,

    // UI state
    pub is_loading: bool,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl Model {
    /// Start a loading operation (sets is_loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.is_loading = true;
        self.error_message = None;
    }

    /// Stop loading and clear error
    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.error_message = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.is_loading = false;
        self.error_message = Some(error);
    }

    /// Set an error message, stop loading, and return a render command
    pub fn set_error_and_render(
        &mut self,
        error: String,
    ) -> crux_core::Command<crate::Effect, crate::events::Event> {
        self.set_error(error);
        crux_core::render::render()
    }

    /// Replace the relay tables with a fresh list from the device
    pub fn apply_relays(&mut self, relays: Vec<Relay>) {
        let (actuators, sensors) = relays
            .into_iter()
            .partition(|relay| relay.kind == RelayKind::Actuator);
        self.actuators = actuators;
        self.sensors = sensors;
    }

    pub fn relay_mut(&mut self, relay_key: &str) -> Option<&mut Relay> {
        self.actuators
            .iter_mut()
            .chain(self.sensors.iter_mut())
            .find(|relay| relay.relay_key == relay_key)
    }

    pub fn set_relay_config_status(&mut self, relay_key: &str, text: String) {
        match self
            .relay_config_status
            .iter_mut()
            .find(|(key, _)| key == relay_key)
        {
            Some((_, existing)) => *existing = text,
            None => self.relay_config_status.push((relay_key.to_string(), text)),
        }
    }

    /// Show `notification` unless the user dismissed it earlier in this session
    pub fn show_update_notification(&mut self, notification: Notification) {
        self.update_notification = self.dismissed_notifications.filter(notification);
    }
}

impl ModelErrorHandler for Model {
    fn set_error(&mut self, error: String) {
        Model::set_error(self, error)
    }
}
