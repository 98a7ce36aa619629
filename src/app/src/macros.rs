/// Macro for model field updates with automatic rendering.
/// Supports both single and multiple field updates.
///
/// # Examples
///
/// Single field update:
/// ```ignore
/// update_field!(model.error_message, None)
/// ```
///
/// Multiple field updates:
/// ```ignore
/// update_field!(
///     model.update_verdict, None;
///     model.update_notification, None
/// )
/// ```
#[macro_export]
macro_rules! update_field {
    // Multiple field updates (must come first to match the pattern)
    ($($model_field:expr, $value:expr);+ $(;)?) => {{
        let mut changed = false;
        $(
            let value = $value;
            if $model_field != value {
                $model_field = value;
                changed = true;
            }
        )+
        if changed {
            crux_core::render::render()
        } else {
            crux_core::Command::done()
        }
    }};

    // Single field update
    ($model_field:expr, $value:expr) => {{
        update_field!($model_field, $value;)
    }};
}

// Re-export http_helpers functions for macro use
pub use crate::http_helpers::{
    build_url, check_response_status, extract_error_message, handle_request_error,
    is_response_success, map_http_error, parse_json_response, process_json_response,
    process_status_response, BASE_URL,
};

/// Macro for simple HTTP GET requests expecting JSON response.
/// Does not set loading state; used by the background polls.
///
/// The response type is unwrapped with `map` before it is sent as an event.
///
/// # Example
/// ```ignore
/// http_get!(Poll, PollEvent, build_url("/api/status"), StatusResponse, "Status poll",
///     expect_json: StatusResponse,
///     map: |response: StatusResponse| response.status)
/// ```
#[macro_export]
macro_rules! http_get {
    ($domain:ident, $domain_event:ident, $url:expr, $response_event:ident, $action:expr, expect_json: $response_type:ty, map: $mapper:expr) => {
        $crate::HttpCmd::get($url).build().then_send(|result| {
            let event_result = $crate::process_json_response::<$response_type>($action, result)
                .map($mapper);
            $crate::events::Event::$domain($crate::events::$domain_event::$response_event(
                event_result,
            ))
        })
    };
}

/// Macro for POST requests with a JSON body expecting a JSON response.
///
/// The response event is a struct variant carrying `relay_key` so the handler
/// knows which relay the answer belongs to.
///
/// # Example
/// ```ignore
/// json_post!(Relay, RelayEvent, model, "/api/relay/update", SetRelayStateResponse, "Relay update",
///     relay_key: relay_key,
///     body_json: &request,
///     expect_json: RelayUpdateResponse
/// )
/// ```
#[macro_export]
macro_rules! json_post {
    ($domain:ident, $domain_event:ident, $model:expr, $endpoint:expr, $response_event:ident, $action:expr, relay_key: $relay_key:expr, body_json: $body:expr, expect_json: $response_type:ty) => {{
        let relay_key: String = $relay_key;
        match $crate::HttpCmd::post($crate::build_url($endpoint))
            .header("Content-Type", "application/json")
            .body_json($body)
        {
            Ok(builder) => crux_core::Command::all([
                crux_core::render::render(),
                builder.build().then_send(move |result| {
                    let event_result: Result<$response_type, String> =
                        $crate::process_json_response($action, result);
                    $crate::events::Event::$domain($crate::events::$domain_event::$response_event {
                        relay_key,
                        result: event_result,
                    })
                }),
            ]),
            Err(e) => $crate::handle_request_error($model, $action, e),
        }
    }};
}

/// Macro for urlencoded form submissions expecting a status-only response.
///
/// # Example
/// ```ignore
/// form_post!(Firmware, FirmwareEvent, model, "/ota-update", StartOtaUpdateResponse, "Firmware update",
///     body_form: form.encode()
/// )
/// ```
#[macro_export]
macro_rules! form_post {
    ($domain:ident, $domain_event:ident, $model:expr, $endpoint:expr, $response_event:ident, $action:expr, body_form: $body:expr) => {{
        $model.start_loading();
        crux_core::Command::all([
            crux_core::render::render(),
            $crate::HttpCmd::post($crate::build_url($endpoint))
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body_string($body)
                .build()
                .then_send(|result| {
                    let event_result = $crate::process_status_response($action, result);
                    $crate::events::Event::$domain(
                        $crate::events::$domain_event::$response_event(event_result),
                    )
                }),
        ])
    }};
}

/// Macro for handling status-only response events with standard loading state
/// and error handling.
///
/// ```ignore
/// handle_response!(model, result, {
///     success_message: "Operation successful",
/// })
/// ```
#[macro_export]
macro_rules! handle_response {
    ($model:expr, $result:expr, {
        success_message: $msg:expr $(,)?
    }) => {{
        $model.stop_loading();
        match $result {
            Ok(()) => {
                $model.success_message = Some($msg.to_string());
            }
            Err(e) => {
                $model.set_error(e);
            }
        }
        crux_core::render::render()
    }};
}
