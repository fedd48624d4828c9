//! Camera control surface: the focus operations the controller drives.
//!
//! The controller never talks to hardware directly. Anything that can report
//! its focus mode, start a focus pass, and cancel one can be driven.

pub mod sim;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Completion callback for one focus pass. Invoked exactly once with
/// whether the camera reports the pass as focused.
pub type FocusCallback = Box<dyn FnOnce(bool) + Send + 'static>;

// ---------------------------------------------------------------------------
// Focus mode
// ---------------------------------------------------------------------------

/// Focus mode currently configured on the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FocusMode {
    /// Single-shot autofocus, triggered by the application.
    Auto,
    /// Close-up autofocus, triggered by the application.
    Macro,
    /// Camera refocuses on its own, tuned for stills.
    ContinuousPicture,
    /// Camera refocuses on its own, tuned for video.
    ContinuousVideo,
    /// Extended depth of field; no focusing.
    Edof,
    Fixed,
    Infinity,
}

impl FocusMode {
    pub const ALL: [FocusMode; 7] = [
        FocusMode::Auto,
        FocusMode::Macro,
        FocusMode::ContinuousPicture,
        FocusMode::ContinuousVideo,
        FocusMode::Edof,
        FocusMode::Fixed,
        FocusMode::Infinity,
    ];

    /// Does this mode need the application to trigger each focus pass?
    pub fn calls_autofocus(self) -> bool {
        matches!(self, FocusMode::Auto | FocusMode::Macro)
    }
}

impl std::fmt::Display for FocusMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FocusMode::Auto => "auto",
            FocusMode::Macro => "macro",
            FocusMode::ContinuousPicture => "continuous-picture",
            FocusMode::ContinuousVideo => "continuous-video",
            FocusMode::Edof => "edof",
            FocusMode::Fixed => "fixed",
            FocusMode::Infinity => "infinity",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for FocusMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FocusMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == s)
            .ok_or_else(|| Error::Other(format!("unknown focus mode: {s}")))
    }
}

// ---------------------------------------------------------------------------
// Control surface
// ---------------------------------------------------------------------------

/// The camera operations the autofocus controller needs.
///
/// Implementations may invoke the focus callback from any thread, including
/// synchronously from inside [`FocusControl::request_focus`].
pub trait FocusControl: Send + Sync {
    /// Focus mode the camera is currently configured with.
    fn focus_mode(&self) -> FocusMode;

    /// Whether the current mode supports repeatedly triggered autofocus.
    fn supports_continuous_autofocus(&self) -> bool {
        self.focus_mode().calls_autofocus()
    }

    /// Start one focus pass. `on_result` fires exactly once when it completes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Camera`] when the hardware refuses to start focusing.
    fn request_focus(&self, on_result: FocusCallback) -> Result<()>;

    /// Cancel any outstanding focus pass. Must tolerate nothing outstanding.
    fn cancel_focus(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_auto_and_macro_call_autofocus() {
        let calling: Vec<_> = FocusMode::ALL
            .into_iter()
            .filter(|m| m.calls_autofocus())
            .collect();
        assert_eq!(calling, vec![FocusMode::Auto, FocusMode::Macro]);
    }

    #[test]
    fn focus_mode_parses_its_display_name() {
        for mode in FocusMode::ALL {
            assert_eq!(mode.to_string().parse::<FocusMode>().unwrap(), mode);
        }
        assert!("sharp".parse::<FocusMode>().is_err());
    }
}
