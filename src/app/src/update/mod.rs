mod firmware;
mod poll;
mod relay;
mod ui;

use crux_core::{render::render, Command};
use serde_valid::Validate;

use crate::events::{Event, PollEvent};
use crate::model::Model;
use crate::types::{FirmwareDescriptor, HostConfig};
use crate::Effect;

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, model: &mut Model) -> Command<Effect, Event> {
    match event {
        Event::Initialize(config) => initialize(config, model),
        Event::Poll(event) => poll::handle(event, model),
        Event::Relay(event) => relay::handle(event, model),
        Event::Firmware(event) => firmware::handle(event, model),
        Event::Ui(event) => ui::handle(event, model),
    }
}

/// Apply the host page values, start both poll timers and load the first data
fn initialize(config: HostConfig, model: &mut Model) -> Command<Effect, Event> {
    if let Err(e) = config.validate() {
        log::warn!("invalid host configuration: {e}");
        model.set_error(format!("Invalid page configuration: {e}"));
    }

    model.device_id = config.device_id.clone();
    model.device_serial = config.device_serial.clone();
    model.running_firmware = FirmwareDescriptor::new(
        &config.sw_version,
        &config.sw_build,
        config.sw_label.as_deref(),
    );
    model.poll.start_timers(config.poll_interval());
    model.startup_update_check_pending = true;

    log::info!(
        "running firmware {} (poll every {} ms)",
        model.running_firmware.display_label,
        model.poll.relay_interval_ms
    );

    Command::all([
        render(),
        poll::handle(PollEvent::StatusTick, model),
        poll::handle(PollEvent::RelayTick, model),
    ])
}
