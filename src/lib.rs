//! # autofocus-rs
//!
//! Keeps a camera continuously focused: request a focus pass, wait for the
//! completion callback, re-arm after a fixed delay, and stay safe under
//! concurrent start/stop.
//!
//! Provides the controller, the camera control-surface trait (with a
//! simulated camera), configuration, and OpenTelemetry observability.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod telemetry;

pub use camera::{FocusCallback, FocusControl, FocusMode};
pub use controller::{AutoFocusConfig, AutoFocusController, FocusPhase};
pub use error::{Error, Result};
