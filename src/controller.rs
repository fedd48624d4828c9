//! Autofocus controller: request focus, wait for the result, re-arm after a
//! fixed delay, until stopped.
//!
//! All controller state lives in one mutex-guarded block. The session thread
//! (`start`/`stop`), the camera's completion callback and the delayed re-arm
//! task each take that lock for their whole critical section, so the four
//! entry points are linearized. Camera calls are made while holding it.

use crate::camera::{FocusCallback, FocusControl};
use crate::error::{Error, Result};
use crate::telemetry::focus::{record_phase_transition, start_session_span};
use crate::telemetry::metrics;
use opentelemetry::KeyValue;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{Span, debug, info, warn};
use uuid::Uuid;

/// Delay between a focus result and the next focus request.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Configuration for the autofocus controller.
#[derive(Debug, Clone)]
pub struct AutoFocusConfig {
    /// Delay after each focus result before focusing again.
    pub interval: Duration,
}

impl Default for AutoFocusConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
        }
    }
}

/// Where the controller is in its focus cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusPhase {
    /// Stopped, or never started because the camera can't autofocus.
    Inactive,
    /// A focus request has been issued and its result is outstanding.
    Focusing,
    /// Result received; the re-arm timer is running.
    Waiting,
}

impl std::fmt::Display for FocusPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FocusPhase::Inactive => "inactive",
            FocusPhase::Focusing => "focusing",
            FocusPhase::Waiting => "waiting",
        };
        write!(f, "{s}")
    }
}

struct FocusState {
    active: bool,
    /// Bumped on every stop. Callbacks and timers carry the epoch they were
    /// issued in and are ignored once it moves on.
    epoch: u64,
    /// Identifies the current re-arm timer among those of one epoch.
    timer: u64,
    phase: FocusPhase,
    pending: Option<JoinHandle<()>>,
}

struct Shared {
    camera: Arc<dyn FocusControl>,
    supports_autofocus: bool,
    interval: Duration,
    runtime: Handle,
    span: Span,
    state: Mutex<FocusState>,
}

/// Keeps a camera focused by chaining focus requests.
///
/// Construct one per camera session. Dropping the controller stops it.
pub struct AutoFocusController {
    shared: Arc<Shared>,
}

impl AutoFocusController {
    /// Create a controller on the current tokio runtime and start focusing if
    /// the camera's focus mode calls for it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a tokio runtime.
    pub fn new(camera: Arc<dyn FocusControl>, config: AutoFocusConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self::with_handle(camera, config, runtime))
    }

    /// Create a controller whose timers run on `runtime`.
    pub fn with_handle(
        camera: Arc<dyn FocusControl>,
        config: AutoFocusConfig,
        runtime: Handle,
    ) -> Self {
        let mode = camera.focus_mode();
        let supports_autofocus = camera.supports_continuous_autofocus();
        let span = start_session_span(&Uuid::new_v4(), mode);

        span.in_scope(|| {
            info!(
                focus_mode = %mode,
                use_autofocus = supports_autofocus,
                interval = ?config.interval,
                "autofocus controller created"
            );
        });

        let controller = Self {
            shared: Arc::new(Shared {
                camera,
                supports_autofocus,
                interval: config.interval,
                runtime,
                span,
                state: Mutex::new(FocusState {
                    active: false,
                    epoch: 0,
                    timer: 0,
                    phase: FocusPhase::Inactive,
                    pending: None,
                }),
            }),
        };
        controller.start();
        controller
    }

    /// Begin (or keep) focusing. Issues a focus request immediately.
    pub fn start(&self) {
        self.shared.start();
    }

    /// Stop focusing: cancel the outstanding focus pass and any pending
    /// re-arm. No further focus requests are made until [`Self::start`].
    pub fn stop(&self) {
        self.shared.stop();
    }

    /// Whether the controller is between a start and the next stop.
    pub fn is_active(&self) -> bool {
        self.shared.lock().active
    }

    /// Whether the camera's focus mode allowed autofocus at construction.
    pub fn supports_autofocus(&self) -> bool {
        self.shared.supports_autofocus
    }

    /// Current point in the focus cycle.
    pub fn phase(&self) -> FocusPhase {
        self.shared.lock().phase
    }
}

impl Drop for AutoFocusController {
    fn drop(&mut self) {
        self.shared.stop();
    }
}

impl Shared {
    /// Every unlock leaves the state consistent, so a poisoned lock is safe
    /// to reuse.
    fn lock(&self) -> MutexGuard<'_, FocusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn start(self: &Arc<Self>) {
        if !self.supports_autofocus {
            return;
        }
        let _entered = self.span.enter();
        let mut state = self.lock();
        // A start while waiting replaces the armed re-arm; the new request
        // becomes the only chain of this epoch.
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.timer = state.timer.wrapping_add(1);
        self.request_focus(&mut state);
    }

    fn stop(&self) {
        if !self.supports_autofocus {
            return;
        }
        let _entered = self.span.enter();
        let mut state = self.lock();
        if !state.active {
            return;
        }

        if let Err(e) = self.camera.cancel_focus() {
            metrics::camera_errors().add(1, &[KeyValue::new("operation", "cancel_focus")]);
            warn!(error = %e, "unexpected error while cancelling focus");
        }
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.active = false;
        state.epoch = state.epoch.wrapping_add(1);
        self.set_phase(&mut state, FocusPhase::Inactive);
        debug!(epoch = state.epoch, "autofocus stopped");
    }

    /// Issue one focus request. Caller holds the lock.
    fn request_focus(self: &Arc<Self>, state: &mut FocusState) {
        state.active = true;
        self.set_phase(state, FocusPhase::Focusing);

        metrics::focus_requests().add(1, &[]);
        match self.camera.request_focus(self.focus_callback(state.epoch)) {
            Ok(()) => debug!(epoch = state.epoch, "focus requested"),
            Err(e) => {
                // Stay active, but no result will come: only the next start retries.
                metrics::camera_errors().add(1, &[KeyValue::new("operation", "request_focus")]);
                warn!(error = %e, "unexpected error while focusing");
            }
        }
    }

    /// Build the callback handed to the camera for one focus pass.
    ///
    /// The result is delivered through the runtime rather than inline, so a
    /// camera that completes synchronously inside `request_focus` does not
    /// re-enter the lock it was called under.
    fn focus_callback(self: &Arc<Self>, epoch: u64) -> FocusCallback {
        let shared = Arc::downgrade(self);
        Box::new(move |success| {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let runtime = shared.runtime.clone();
            runtime.spawn(async move {
                shared.on_focus_result(epoch, success);
            });
        })
    }

    /// Handle a completed focus pass: re-arm regardless of `success`.
    fn on_focus_result(self: &Arc<Self>, epoch: u64, success: bool) {
        let _entered = self.span.enter();
        metrics::focus_results().add(1, &[KeyValue::new("success", success)]);

        let mut state = self.lock();
        if !state.active || state.epoch != epoch {
            debug!(success, epoch, "discarding focus result after stop");
            return;
        }

        if let Some(previous) = state.pending.take() {
            previous.abort();
        }
        state.timer = state.timer.wrapping_add(1);
        let timer = state.timer;
        let interval = self.interval;
        let shared = Arc::downgrade(self);
        state.pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(interval).await;
            if let Some(shared) = shared.upgrade() {
                shared.rearm(epoch, timer);
            }
        }));
        self.set_phase(&mut state, FocusPhase::Waiting);
        debug!(
            success,
            delay = ?interval,
            "focus result received, re-arm scheduled"
        );
    }

    /// Delayed effect of a re-arm timer.
    fn rearm(self: &Arc<Self>, epoch: u64, timer: u64) {
        let _entered = self.span.enter();
        let mut state = self.lock();
        if !state.active || state.epoch != epoch || state.timer != timer {
            debug!(epoch, "stale re-arm ignored");
            return;
        }
        state.pending = None;
        metrics::rearms().add(1, &[]);
        self.request_focus(&mut state);
    }

    fn set_phase(&self, state: &mut FocusState, to: FocusPhase) {
        if state.phase != to {
            record_phase_transition(&self.span, state.phase, to);
            state.phase = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_two_seconds() {
        assert_eq!(AutoFocusConfig::default().interval, Duration::from_millis(2000));
    }

    #[test]
    fn phase_display_names() {
        assert_eq!(FocusPhase::Inactive.to_string(), "inactive");
        assert_eq!(FocusPhase::Focusing.to_string(), "focusing");
        assert_eq!(FocusPhase::Waiting.to_string(), "waiting");
    }
}
