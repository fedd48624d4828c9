//! Simulated camera for demos and local runs.
//!
//! A focus pass completes after a fixed latency on the tokio runtime. Faults
//! can be injected: every Nth request can fail to start, and every Nth pass
//! can report an unfocused result.

use super::{FocusCallback, FocusControl, FocusMode};
use crate::error::{Error, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

/// Behaviour of a [`SimulatedCamera`].
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub mode: FocusMode,
    /// Time from request to result.
    pub latency: Duration,
    /// Every Nth request returns a camera error instead of focusing.
    pub fail_every: Option<u32>,
    /// Every Nth completed pass reports `success = false`.
    pub miss_every: Option<u32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            mode: FocusMode::Auto,
            latency: Duration::from_millis(300),
            fail_every: None,
            miss_every: None,
        }
    }
}

/// Counters observed by the simulated camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimStats {
    pub requests: u64,
    pub rejected: u64,
    pub cancels: u64,
    pub focused: u64,
    pub missed: u64,
}

#[derive(Default)]
struct SimState {
    stats: SimStats,
    outstanding: Option<JoinHandle<()>>,
}

pub struct SimulatedCamera {
    config: SimConfig,
    runtime: Handle,
    state: Arc<Mutex<SimState>>,
}

impl SimulatedCamera {
    /// Create a simulated camera on the current tokio runtime.
    pub fn new(config: SimConfig) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;
        Ok(Self {
            config,
            runtime,
            state: Arc::new(Mutex::new(SimState::default())),
        })
    }

    pub fn stats(&self) -> SimStats {
        lock(&self.state).stats
    }
}

fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn nth(count: u64, every: Option<u32>) -> bool {
    matches!(every, Some(n) if n > 0 && count % u64::from(n) == 0)
}

impl FocusControl for SimulatedCamera {
    fn focus_mode(&self) -> FocusMode {
        self.config.mode
    }

    fn request_focus(&self, on_result: FocusCallback) -> Result<()> {
        let mut state = lock(&self.state);
        state.stats.requests += 1;
        let request = state.stats.requests;
        if nth(request, self.config.fail_every) {
            state.stats.rejected += 1;
            return Err(Error::Camera(format!("autofocus request {request} rejected")));
        }

        // A new pass supersedes one still in flight; its callback never fires.
        if let Some(previous) = state.outstanding.take() {
            previous.abort();
        }

        let latency = self.config.latency;
        let miss_every = self.config.miss_every;
        let shared = Arc::clone(&self.state);
        state.outstanding = Some(self.runtime.spawn(async move {
            tokio::time::sleep(latency).await;
            let success = {
                let mut state = lock(&shared);
                state.outstanding = None;
                let completed = state.stats.focused + state.stats.missed + 1;
                let success = !nth(completed, miss_every);
                if success {
                    state.stats.focused += 1;
                } else {
                    state.stats.missed += 1;
                }
                success
            };
            debug!(request, success, "simulated focus pass complete");
            on_result(success);
        }));
        Ok(())
    }

    fn cancel_focus(&self) -> Result<()> {
        let mut state = lock(&self.state);
        state.stats.cancels += 1;
        if let Some(pass) = state.outstanding.take() {
            pass.abort();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn completes_after_latency() {
        let camera = SimulatedCamera::new(SimConfig::default()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        camera
            .request_focus(Box::new(move |success| {
                assert!(success);
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(camera.stats().focused, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_outstanding_pass() {
        let camera = SimulatedCamera::new(SimConfig::default()).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        camera
            .request_focus(Box::new(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        camera.cancel_focus().unwrap();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(camera.stats().cancels, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn injects_request_failures() {
        let camera = SimulatedCamera::new(SimConfig {
            fail_every: Some(2),
            ..SimConfig::default()
        })
        .unwrap();
        assert!(camera.request_focus(Box::new(|_| {})).is_ok());
        assert!(matches!(
            camera.request_focus(Box::new(|_| {})),
            Err(Error::Camera(_))
        ));
        assert_eq!(camera.stats().rejected, 1);
    }
}
