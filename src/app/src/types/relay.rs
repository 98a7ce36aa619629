use serde::{Deserialize, Serialize};

/// `POST /api/relay/update` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayUpdateRequest {
    pub device_id: String,
    pub device_serial: String,
    pub data: RelayUpdateData,
}

/// Either a state toggle or a configuration change of one relay
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RelayUpdateData {
    State {
        relay_key: String,
        relay_channel: u32,
        relay_state: bool,
    },
    Config {
        relay_key: String,
        relay_channel: u32,
        relay_gpio_pin: i32,
        relay_enabled: bool,
        relay_inverted: bool,
    },
}

/// `status` object of a relay update response; `code == 0` is success
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseStatus {
    pub code: i32,
    #[serde(default)]
    pub error: String,
}

/// Relay fields echoed back by the device after an update
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayUpdateEcho {
    pub gpio_pin: i32,
    pub enabled: bool,
    pub inverted: bool,
    #[serde(default)]
    pub state: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayUpdateResponse {
    #[serde(default)]
    pub status: Option<ResponseStatus>,
    #[serde(default)]
    pub data: Option<RelayUpdateEcho>,
}

impl RelayUpdateResponse {
    /// Fails with the device's error text unless the status code is zero.
    ///
    /// A response without a status object counts as success.
    pub fn into_result(self) -> Result<Self, String> {
        match &self.status {
            Some(status) if status.code != 0 => Err(format!(
                "Relay update rejected (code {}): {}",
                status.code, status.error
            )),
            _ => Ok(self),
        }
    }

    pub fn status_text(&self) -> String {
        self.status
            .as_ref()
            .map(|status| status.error.clone())
            .unwrap_or_else(|| "OK".to_string())
    }
}
