use crux_core::{render::render, Command};

use crate::events::{Event, RelayEvent};
use crate::http_helpers::handle_request_error;
use crate::json_post;
use crate::model::Model;
use crate::types::{RelayUpdateData, RelayUpdateRequest, RelayUpdateResponse};
use crate::Effect;

use super::poll::handle_relay_tick;

const RELAY_UPDATE_ENDPOINT: &str = "/api/relay/update";

/// Handle relay state toggles and relay configuration updates
pub fn handle(event: RelayEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        RelayEvent::SetRelayState {
            relay_key,
            channel,
            state,
        } => {
            let request = relay_request(
                model,
                RelayUpdateData::State {
                    relay_key: relay_key.clone(),
                    relay_channel: channel,
                    relay_state: state,
                },
            );
            // the write flag is only raised once the body is known to serialize
            let body = match serde_json::to_value(&request) {
                Ok(body) => body,
                Err(e) => return handle_request_error(model, "Relay update", e),
            };
            model.poll.begin_write();
            json_post!(Relay, RelayEvent, model, RELAY_UPDATE_ENDPOINT, SetRelayStateResponse, "Relay update",
                relay_key: relay_key,
                body_json: &body,
                expect_json: RelayUpdateResponse
            )
        }

        RelayEvent::SetRelayStateResponse { relay_key, result } => {
            handle_set_relay_state_response(&relay_key, result, model)
        }

        RelayEvent::UpdateRelayConfig {
            relay_key,
            channel,
            gpio_pin,
            enabled,
            inverted,
        } => {
            let request = relay_request(
                model,
                RelayUpdateData::Config {
                    relay_key: relay_key.clone(),
                    relay_channel: channel,
                    relay_gpio_pin: gpio_pin,
                    relay_enabled: enabled,
                    relay_inverted: inverted,
                },
            );
            json_post!(Relay, RelayEvent, model, RELAY_UPDATE_ENDPOINT, UpdateRelayConfigResponse, "Relay config update",
                relay_key: relay_key,
                body_json: &request,
                expect_json: RelayUpdateResponse
            )
        }

        RelayEvent::UpdateRelayConfigResponse { relay_key, result } => {
            handle_update_relay_config_response(&relay_key, result, model)
        }
    }
}

fn relay_request(model: &Model, data: RelayUpdateData) -> RelayUpdateRequest {
    RelayUpdateRequest {
        device_id: model.device_id.clone(),
        device_serial: model.device_serial.clone(),
        data,
    }
}

/// Write finished: back to idle, refresh the relay list only on success
pub fn handle_set_relay_state_response(
    relay_key: &str,
    result: Result<RelayUpdateResponse, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    let result = result.and_then(RelayUpdateResponse::into_result);
    let refresh = model.poll.finish_write(result.is_ok());

    if let Err(e) = result {
        log::warn!("failed to update relay {relay_key}: {e}");
        return model.set_error_and_render(e);
    }

    if refresh {
        Command::all([render(), handle_relay_tick(model)])
    } else {
        render()
    }
}

pub fn handle_update_relay_config_response(
    relay_key: &str,
    result: Result<RelayUpdateResponse, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    match result {
        Ok(response) => {
            model.set_relay_config_status(relay_key, format!("Status: {}", response.status_text()));
            if let Ok(RelayUpdateResponse {
                data: Some(echo), ..
            }) = response.into_result()
            {
                if let Some(relay) = model.relay_mut(relay_key) {
                    relay.gpio_pin = echo.gpio_pin;
                    relay.enabled = echo.enabled;
                    relay.inverted = echo.inverted;
                }
            }
        }
        Err(e) => {
            log::warn!("failed to update relay config {relay_key}: {e}");
            model.set_relay_config_status(relay_key, format!("Error: {e}"));
        }
    }
    render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_helpers::build_url;
    use crate::types::{PollState, Relay, RelayUpdateEcho, ResponseStatus};

    fn http_requests(cmd: &mut Command<Effect, Event>) -> Vec<(String, Vec<u8>)> {
        cmd.effects()
            .filter_map(|effect| match effect {
                Effect::Http(request) => Some((
                    request.operation.url.clone(),
                    request.operation.body.clone(),
                )),
                _ => None,
            })
            .collect()
    }

    fn accepted() -> RelayUpdateResponse {
        RelayUpdateResponse {
            status: Some(ResponseStatus {
                code: 0,
                error: "OK".to_string(),
            }),
            data: Some(RelayUpdateEcho {
                gpio_pin: 27,
                enabled: true,
                inverted: true,
                state: Some(true),
            }),
        }
    }

    fn model_with_relay() -> Model {
        let mut model = Model {
            device_id: "relayboard".to_string(),
            device_serial: "A1B2".to_string(),
            ..Default::default()
        };
        model.apply_relays(vec![Relay {
            relay_key: "relay_ch_0".to_string(),
            channel: 0,
            gpio_pin: 32,
            ..Default::default()
        }]);
        model
    }

    #[test]
    fn set_relay_state_enters_write_in_flight_and_posts() {
        let mut model = model_with_relay();

        let mut cmd = handle(
            RelayEvent::SetRelayState {
                relay_key: "relay_ch_0".to_string(),
                channel: 0,
                state: true,
            },
            &mut model,
        );

        assert_eq!(model.poll.state(), PollState::WriteInFlight);
        let requests = http_requests(&mut cmd);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, build_url(RELAY_UPDATE_ENDPOINT));

        let body: serde_json::Value =
            serde_json::from_slice(&requests[0].1).expect("json body");
        assert_eq!(body["device_serial"], "A1B2");
        assert_eq!(body["data"]["relay_state"], true);
    }

    #[test]
    fn write_proceeds_while_polling() {
        let mut model = model_with_relay();
        model.poll.begin_poll();

        let mut cmd = handle(
            RelayEvent::SetRelayState {
                relay_key: "relay_ch_0".to_string(),
                channel: 0,
                state: false,
            },
            &mut model,
        );

        assert_eq!(http_requests(&mut cmd).len(), 1);
        assert_eq!(model.poll.state(), PollState::WriteInFlight);
    }

    #[test]
    fn successful_write_refreshes_relays_once() {
        let mut model = model_with_relay();
        model.poll.begin_write();

        let mut cmd = handle_set_relay_state_response("relay_ch_0", Ok(accepted()), &mut model);

        assert_eq!(model.poll.state(), PollState::Polling);
        let requests = http_requests(&mut cmd);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, build_url("/api/relays"));
    }

    #[test]
    fn failed_write_returns_to_idle_without_refresh() {
        let mut model = model_with_relay();
        model.poll.begin_write();

        let mut cmd = handle_set_relay_state_response(
            "relay_ch_0",
            Err("Relay update failed: timeout".to_string()),
            &mut model,
        );

        assert_eq!(model.poll.state(), PollState::Idle);
        assert!(http_requests(&mut cmd).is_empty());
        assert_eq!(
            model.error_message.as_deref(),
            Some("Relay update failed: timeout")
        );
    }

    #[test]
    fn rejected_write_code_counts_as_failure() {
        let mut model = model_with_relay();
        model.poll.begin_write();
        let rejected = RelayUpdateResponse {
            status: Some(ResponseStatus {
                code: 1,
                error: "Missing mandatory fields".to_string(),
            }),
            data: None,
        };

        let mut cmd = handle_set_relay_state_response("relay_ch_0", Ok(rejected), &mut model);

        assert_eq!(model.poll.state(), PollState::Idle);
        assert!(http_requests(&mut cmd).is_empty());
        assert!(model.error_message.is_some());
    }

    #[test]
    fn config_update_does_not_touch_poll_state() {
        let mut model = model_with_relay();

        let mut cmd = handle(
            RelayEvent::UpdateRelayConfig {
                relay_key: "relay_ch_0".to_string(),
                channel: 0,
                gpio_pin: 27,
                enabled: true,
                inverted: true,
            },
            &mut model,
        );

        assert_eq!(model.poll.state(), PollState::Idle);
        let requests = http_requests(&mut cmd);
        let body: serde_json::Value =
            serde_json::from_slice(&requests[0].1).expect("json body");
        assert_eq!(body["data"]["relay_gpio_pin"], 27);
        assert_eq!(body["data"]["relay_inverted"], true);
    }

    #[test]
    fn accepted_config_update_applies_echo() {
        let mut model = model_with_relay();

        let _ = handle_update_relay_config_response("relay_ch_0", Ok(accepted()), &mut model);

        let relay = model.relay_mut("relay_ch_0").expect("relay present");
        assert_eq!(relay.gpio_pin, 27);
        assert!(relay.enabled);
        assert!(relay.inverted);
        assert_eq!(
            model.relay_config_status,
            vec![("relay_ch_0".to_string(), "Status: OK".to_string())]
        );
    }

    #[test]
    fn rejected_config_update_keeps_relay() {
        let mut model = model_with_relay();
        let rejected = RelayUpdateResponse {
            status: Some(ResponseStatus {
                code: 2,
                error: "GPIO pin is in use".to_string(),
            }),
            data: None,
        };

        let _ = handle_update_relay_config_response("relay_ch_0", Ok(rejected), &mut model);

        assert_eq!(model.relay_mut("relay_ch_0").map(|r| r.gpio_pin), Some(32));
        assert_eq!(
            model.relay_config_status,
            vec![(
                "relay_ch_0".to_string(),
                "Status: GPIO pin is in use".to_string()
            )]
        );
    }

    #[test]
    fn failed_config_update_reports_error_line() {
        let mut model = model_with_relay();

        let _ = handle_update_relay_config_response(
            "relay_ch_0",
            Err("Relay config update failed: Invalid GPIO pin".to_string()),
            &mut model,
        );

        assert_eq!(
            model.relay_config_status[0].1,
            "Error: Relay config update failed: Invalid GPIO pin"
        );
    }
}
