//! Focus session span helpers.

use crate::camera::FocusMode;
use crate::controller::FocusPhase;
use tracing::Span;
use uuid::Uuid;

/// Start the span that scopes one controller's log events.
pub fn start_session_span(session_id: &Uuid, mode: FocusMode) -> Span {
    tracing::info_span!(
        "autofocus.session",
        "autofocus.session_id" = %session_id,
        "autofocus.focus_mode" = %mode,
    )
}

/// Emit a phase change as a debug event inside `span`.
pub fn record_phase_transition(span: &Span, from: FocusPhase, to: FocusPhase) {
    span.in_scope(|| {
        tracing::debug!(from = %from, to = %to, "phase_transition");
    });
}
