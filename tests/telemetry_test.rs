//! Integration tests for telemetry initialization and span helpers.

use autofocus_rs::FocusMode;
use autofocus_rs::controller::FocusPhase;
use uuid::Uuid;

#[test]
fn telemetry_initializes_without_endpoint() {
    // Only one global subscriber per process; an Err here means another
    // test got there first, which is acceptable.
    let config = autofocus_rs::telemetry::TelemetryConfig {
        endpoint: None,
        service_name: "autofocus-test".to_string(),
        log_level: "debug".to_string(),
    };
    let _guard = autofocus_rs::telemetry::init_telemetry(config);
}

#[test]
fn session_span_records_phase_transitions() {
    let span = autofocus_rs::telemetry::focus::start_session_span(&Uuid::new_v4(), FocusMode::Auto);
    autofocus_rs::telemetry::focus::record_phase_transition(
        &span,
        FocusPhase::Inactive,
        FocusPhase::Focusing,
    );
}

#[test]
fn metric_instruments_build_without_provider() {
    autofocus_rs::telemetry::metrics::focus_requests().add(1, &[]);
    autofocus_rs::telemetry::metrics::camera_errors()
        .add(1, &[opentelemetry::KeyValue::new("operation", "request_focus")]);
}
