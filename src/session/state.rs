use serde::{Deserialize, Serialize};

/// Which kind of call a session carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallMode {
    /// Voice-only call
    Voice,
    /// Video-avatar call
    Video,
}

impl std::fmt::Display for CallMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallMode::Voice => write!(f, "voice"),
            CallMode::Video => write!(f, "video"),
        }
    }
}

/// State of a call session
///
/// Exactly one variant is active at any time. The in-call toggles live on
/// the `Active` variant so they cannot outlive the call that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallState {
    /// No call in progress
    Idle,
    /// Call requested, transport not yet established
    Connecting,
    /// Call established, elapsed time ticking
    Active {
        /// Whole seconds since the call connected
        elapsed_secs: u64,
        /// Microphone muted
        mic_muted: bool,
        /// Speaker off (voice mode) or camera off (video mode)
        speaker_or_video_off: bool,
    },
    /// Call terminated; duration retained for display
    Ended {
        /// Elapsed seconds captured at the moment the call ended
        final_elapsed_secs: u64,
    },
}

impl CallState {
    /// Whether the call is established and ticking
    pub fn is_active(&self) -> bool {
        matches!(self, CallState::Active { .. })
    }

    /// Whether a call is underway (requested or established)
    pub fn is_in_progress(&self) -> bool {
        matches!(self, CallState::Connecting | CallState::Active { .. })
    }

    /// Elapsed seconds while active, or the retained duration after the
    /// call has ended
    pub fn elapsed_secs(&self) -> Option<u64> {
        match self {
            CallState::Active { elapsed_secs, .. } => Some(*elapsed_secs),
            CallState::Ended { final_elapsed_secs } => Some(*final_elapsed_secs),
            _ => None,
        }
    }
}

impl std::fmt::Display for CallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallState::Idle => write!(f, "Idle"),
            CallState::Connecting => write!(f, "Connecting"),
            CallState::Active { elapsed_secs, .. } => {
                write!(f, "Active ({})", format_elapsed(*elapsed_secs))
            }
            CallState::Ended { final_elapsed_secs } => {
                write!(f, "Ended ({})", format_elapsed(*final_elapsed_secs))
            }
        }
    }
}

/// Render elapsed seconds as `minutes:seconds`, both zero-padded to two
/// digits. Minutes grow past two digits instead of wrapping.
pub fn format_elapsed(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
