use crux_core::{render::render, Command};

use crate::events::{Event, PollEvent};
use crate::http_get;
use crate::http_helpers::build_url;
use crate::model::Model;
use crate::process_json_response;
use crate::types::{RelayListResponse, StatusResponse};
use crate::{Effect, HttpCmd};

/// Handle status and relay list polling
pub fn handle(event: PollEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        PollEvent::StatusTick => fetch_status(),
        PollEvent::RelayTick => handle_relay_tick(model),
        PollEvent::StatusResponse(result) => handle_status_response(result, model),
        PollEvent::RelaysResponse { generation, result } => {
            handle_relays_response(generation, result, model)
        }
    }
}

fn fetch_status() -> Command<Effect, Event> {
    http_get!(
        Poll,
        PollEvent,
        build_url("/api/status"),
        StatusResponse,
        "Status poll",
        expect_json: StatusResponse,
        map: |response: StatusResponse| response.status
    )
}

fn fetch_relays(generation: u64) -> Command<Effect, Event> {
    HttpCmd::get(build_url("/api/relays"))
        .build()
        .then_send(move |result| {
            let result = process_json_response::<RelayListResponse>("Relay poll", result)
                .map(|response| response.data);
            Event::Poll(PollEvent::RelaysResponse { generation, result })
        })
}

/// Relay tick - skipped entirely while a relay write is in flight.
///
/// Also issues the one-off refresh after a successful write.
pub fn handle_relay_tick(model: &mut Model) -> Command<Effect, Event> {
    match model.poll.begin_poll() {
        Some(generation) => fetch_relays(generation),
        None => {
            log::debug!("relay poll skipped: write in flight");
            Command::done()
        }
    }
}

fn handle_status_response(
    result: Result<crate::types::DeviceStatus, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    match result {
        Ok(status) => {
            model.uptime_text = Some(status.uptime_text());
            model.status = Some(status);
            render()
        }
        Err(e) => {
            log::error!("failed to fetch device status: {e}");
            Command::done()
        }
    }
}

fn handle_relays_response(
    generation: u64,
    result: Result<Vec<crate::types::Relay>, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    if !model.poll.finish_poll(generation) {
        log::debug!("relay list discarded: issued before the latest relay write");
        return Command::done();
    }

    match result {
        Ok(relays) => {
            model.apply_relays(relays);
            render()
        }
        Err(e) => {
            log::error!("failed to fetch relay list: {e}");
            Command::done()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceStatus, PollState, Relay, RelayKind};

    fn http_requests(cmd: &mut Command<Effect, Event>) -> Vec<String> {
        cmd.effects()
            .filter_map(|effect| match effect {
                Effect::Http(request) => Some(request.operation.url.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn relay_tick_fetches_when_idle() {
        let mut model = Model::default();

        let mut cmd = handle(PollEvent::RelayTick, &mut model);

        assert_eq!(http_requests(&mut cmd), vec![build_url("/api/relays")]);
        assert_eq!(model.poll.state(), PollState::Polling);
    }

    #[test]
    fn relay_tick_during_write_fetches_nothing() {
        let mut model = Model::default();
        model.poll.begin_write();

        let mut cmd = handle(PollEvent::RelayTick, &mut model);

        assert!(http_requests(&mut cmd).is_empty());
        assert_eq!(model.poll.state(), PollState::WriteInFlight);
    }

    #[test]
    fn next_tick_after_write_fetches_again() {
        let mut model = Model::default();
        model.poll.begin_write();
        let mut skipped = handle(PollEvent::RelayTick, &mut model);
        assert!(http_requests(&mut skipped).is_empty());

        model.poll.finish_write(false);
        assert_eq!(model.poll.state(), PollState::Idle);

        let mut cmd = handle(PollEvent::RelayTick, &mut model);
        assert_eq!(http_requests(&mut cmd).len(), 1);
    }

    #[test]
    fn status_tick_ignores_write_in_flight() {
        let mut model = Model::default();
        model.poll.begin_write();

        let mut cmd = handle(PollEvent::StatusTick, &mut model);

        assert_eq!(http_requests(&mut cmd), vec![build_url("/api/status")]);
    }

    #[test]
    fn status_response_sets_uptime() {
        let mut model = Model::default();
        let status = DeviceStatus {
            free_heap: 100_000,
            min_free_heap: 80_000,
            time_since_boot: 3_661_000_000,
            ..Default::default()
        };

        let _ = handle(PollEvent::StatusResponse(Ok(status.clone())), &mut model);

        assert_eq!(model.status, Some(status));
        assert_eq!(
            model.uptime_text.as_deref(),
            Some("0 days 1 hours 1 minutes 1 seconds")
        );
    }

    #[test]
    fn failed_status_poll_keeps_last_values() {
        let mut model = Model {
            uptime_text: Some("previous".to_string()),
            ..Default::default()
        };

        let _ = handle(
            PollEvent::StatusResponse(Err("Status poll failed: timeout".to_string())),
            &mut model,
        );

        assert_eq!(model.uptime_text.as_deref(), Some("previous"));
        assert_eq!(model.error_message, None);
    }

    #[test]
    fn relay_response_splits_tables_and_returns_to_idle() {
        let mut model = Model::default();
        let generation = model.poll.begin_poll().expect("tick proceeds");
        let relays = vec![
            Relay {
                relay_key: "relay_ch_0".to_string(),
                kind: RelayKind::Actuator,
                ..Default::default()
            },
            Relay {
                relay_key: "relay_ch_1".to_string(),
                kind: RelayKind::Sensor,
                ..Default::default()
            },
        ];

        let _ = handle(
            PollEvent::RelaysResponse {
                generation,
                result: Ok(relays),
            },
            &mut model,
        );

        assert_eq!(model.actuators.len(), 1);
        assert_eq!(model.sensors.len(), 1);
        assert_eq!(model.poll.state(), PollState::Idle);
    }

    #[test]
    fn failed_relay_poll_returns_to_idle() {
        let mut model = Model::default();
        let generation = model.poll.begin_poll().expect("tick proceeds");

        let _ = handle(
            PollEvent::RelaysResponse {
                generation,
                result: Err("Relay poll failed".to_string()),
            },
            &mut model,
        );

        assert_eq!(model.poll.state(), PollState::Idle);
    }

    #[test]
    fn relay_response_during_write_is_discarded() {
        let mut model = Model::default();
        let generation = model.poll.begin_poll().expect("tick proceeds");
        model.poll.begin_write();
        let relays = vec![Relay {
            relay_key: "relay_ch_0".to_string(),
            state: false,
            ..Default::default()
        }];

        let _ = handle(
            PollEvent::RelaysResponse {
                generation,
                result: Ok(relays),
            },
            &mut model,
        );

        assert!(model.actuators.is_empty());
        assert_eq!(model.poll.state(), PollState::WriteInFlight);
    }

    #[test]
    fn relay_response_from_before_finished_write_is_discarded() {
        let mut model = Model::default();
        model.apply_relays(vec![Relay {
            relay_key: "relay_ch_0".to_string(),
            state: true,
            ..Default::default()
        }]);
        let before_write = model.poll.begin_poll().expect("tick proceeds");
        model.poll.begin_write();
        model.poll.finish_write(true);
        let mut refresh = handle(PollEvent::RelayTick, &mut model);
        assert_eq!(http_requests(&mut refresh).len(), 1);

        let _ = handle(
            PollEvent::RelaysResponse {
                generation: before_write,
                result: Ok(vec![Relay {
                    relay_key: "relay_ch_0".to_string(),
                    state: false,
                    ..Default::default()
                }]),
            },
            &mut model,
        );

        assert!(model.actuators[0].state);
        assert_eq!(model.poll.state(), PollState::Polling);
    }
}
