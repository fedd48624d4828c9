//! Metric instruments for the autofocus controller.
//!
//! Built from the `"autofocus-rs"` meter on the global `MeterProvider`; they
//! are no-ops until telemetry installs one.

use opentelemetry::metrics::{Counter, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("autofocus-rs")
}

/// Counter: focus requests issued to the camera, including failed ones.
pub fn focus_requests() -> Counter<u64> {
    meter()
        .u64_counter("autofocus.focus.requests")
        .with_description("Focus requests issued to the camera")
        .build()
}

/// Counter: focus results delivered by the camera.
/// Labels: `success`.
pub fn focus_results() -> Counter<u64> {
    meter()
        .u64_counter("autofocus.focus.results")
        .with_description("Focus results delivered by the camera")
        .build()
}

/// Counter: delayed re-arms that went on to request focus.
pub fn rearms() -> Counter<u64> {
    meter()
        .u64_counter("autofocus.rearms")
        .with_description("Re-arm timers that fired while active")
        .build()
}

/// Counter: camera errors absorbed by the controller.
/// Labels: `operation` ("request_focus" | "cancel_focus").
pub fn camera_errors() -> Counter<u64> {
    meter()
        .u64_counter("autofocus.camera.errors")
        .with_description("Camera errors absorbed while focusing")
        .build()
}
