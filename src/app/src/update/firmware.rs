//! Firmware update detection
//!
//! A check reads the OTA binary URL, fetches `build_info.json` from the same
//! directory and compares it against the running firmware. Each check replaces
//! the previous verdict.

use crux_core::{render::render, Command};
use url::Url;

use crate::events::{Event, FirmwareEvent};
use crate::form_post;
use crate::handle_response;
use crate::http_helpers::{cache_buster, process_json_response};
use crate::model::Model;
use crate::types::{
    BuildInfo, Notification, OtaUpdateForm, Severity, UpdateCheckError, UpdateVerdict,
};
use crate::version::is_newer;
use crate::{Effect, HttpCmd};

/// Descriptor file published next to every OTA binary
pub const BUILD_INFO_FILE: &str = "build_info.json";

/// Handle firmware update events
pub fn handle(event: FirmwareEvent, model: &mut Model) -> Command<Effect, Event> {
    match event {
        FirmwareEvent::OtaUrlChanged { url } => {
            model.ota_url = url.trim().to_string();
            check_for_update(model)
        }

        FirmwareEvent::CheckForUpdate => {
            model.startup_update_check_pending = false;
            check_for_update(model)
        }

        FirmwareEvent::BuildInfoResponse { sequence, result } => {
            handle_build_info_response(sequence, result, model)
        }

        FirmwareEvent::StartOtaUpdate => start_ota_update(model),

        FirmwareEvent::StartOtaUpdateResponse(result) => handle_response!(model, result, {
            success_message: "Firmware update started, the device will reboot when done",
        }),
    }
}

/// Location of the descriptor file for an OTA binary URL, query string dropped
pub fn build_info_url(ota_url: &str) -> Result<Url, UpdateCheckError> {
    let base =
        Url::parse(ota_url).map_err(|e| UpdateCheckError::InvalidLocation(e.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(UpdateCheckError::InvalidLocation(format!(
            "{ota_url} has no path"
        )));
    }

    let mut url = base
        .join(BUILD_INFO_FILE)
        .map_err(|e| UpdateCheckError::InvalidLocation(e.to_string()))?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn check_for_update(model: &mut Model) -> Command<Effect, Event> {
    if model.ota_url.is_empty() {
        // not configured: nothing to compare against
        model.update_verdict = None;
        model.update_notification = None;
        return render();
    }

    let mut url = match build_info_url(&model.ota_url) {
        Ok(url) => url,
        Err(reason) => return apply_verdict(UpdateVerdict::CheckFailed { reason }, model),
    };

    model.update_check_sequence += 1;
    let sequence = model.update_check_sequence;
    url.query_pairs_mut()
        .append_pair("_", &cache_buster(sequence));

    log::debug!("checking for firmware update at {url}");

    HttpCmd::get(url.as_str())
        .build()
        .then_send(move |result| {
            let result = process_json_response::<BuildInfo>("Build info fetch", result);
            Event::Firmware(FirmwareEvent::BuildInfoResponse { sequence, result })
        })
}

pub fn handle_build_info_response(
    sequence: u64,
    result: Result<BuildInfo, String>,
    model: &mut Model,
) -> Command<Effect, Event> {
    if sequence < model.applied_update_check {
        log::warn!(
            "applying stale build info response #{sequence} after #{}",
            model.applied_update_check
        );
    }
    model.applied_update_check = model.applied_update_check.max(sequence);

    let verdict = match result {
        Err(e) => UpdateVerdict::CheckFailed {
            reason: UpdateCheckError::NetworkFailure(e),
        },
        Ok(info) => match info.to_descriptor() {
            Err(reason) => UpdateVerdict::CheckFailed { reason },
            Ok(candidate) if is_newer(&model.running_firmware, &candidate) => {
                UpdateVerdict::UpdateAvailable { candidate }
            }
            Ok(_) => UpdateVerdict::UpToDate {
                current: model.running_firmware.clone(),
            },
        },
    };

    apply_verdict(verdict, model)
}

/// Store the verdict and show its notification unless dismissed this session
fn apply_verdict(verdict: UpdateVerdict, model: &mut Model) -> Command<Effect, Event> {
    let notification = notification_for(&verdict);
    log::info!("firmware update check: {}", notification.message);

    model.update_verdict = Some(verdict);
    model.show_update_notification(notification);
    render()
}

pub fn notification_for(verdict: &UpdateVerdict) -> Notification {
    match verdict {
        UpdateVerdict::UpToDate { current } => Notification::new(
            Severity::Success,
            format!("Firmware is up to date ({})", current.display_label),
        ),
        UpdateVerdict::UpdateAvailable { candidate } => Notification::new(
            Severity::Warning,
            format!("New firmware available: {}", candidate.display_label),
        ),
        UpdateVerdict::CheckFailed { reason } => {
            let severity = match reason {
                UpdateCheckError::NetworkFailure(_) => Severity::Danger,
                UpdateCheckError::SchemaError(_) | UpdateCheckError::InvalidLocation(_) => {
                    Severity::Warning
                }
            };
            Notification::new(severity, reason.to_string())
        }
    }
}

fn start_ota_update(model: &mut Model) -> Command<Effect, Event> {
    let Some(candidate) = model
        .update_verdict
        .as_ref()
        .and_then(UpdateVerdict::candidate)
    else {
        return model.set_error_and_render("No firmware update available".to_string());
    };

    let form = OtaUpdateForm::new(&model.running_firmware, candidate);
    form_post!(Firmware, FirmwareEvent, model, "/ota-update", StartOtaUpdateResponse, "Firmware update",
        body_form: form.encode()
    )
}
