//! Configuration for call sessions

use crate::session::state::CallMode;
use crate::{Result, VoxlineError};
use std::time::Duration;

/// Configuration for a call session controller
#[derive(Clone, Debug)]
pub struct CallConfig {
    /// Call mode (voice or video)
    pub mode: CallMode,

    /// Simulated connection setup time before a call becomes active
    pub setup_delay: Duration,

    /// Interval between elapsed-time ticks
    pub tick_interval: Duration,

    /// Initial speaker-off value when a voice call becomes active
    pub voice_speaker_off_default: bool,

    /// Initial camera-off value when a video call becomes active
    pub video_off_default: bool,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            mode: CallMode::Voice,
            setup_delay: Duration::from_millis(3000),
            tick_interval: Duration::from_millis(1000),
            voice_speaker_off_default: false,
            video_off_default: false,
        }
    }
}

impl CallConfig {
    /// Create a configuration for the given call mode
    pub fn for_mode(mode: CallMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Set the call mode
    pub fn with_mode(mut self, mode: CallMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the simulated connection setup delay
    pub fn with_setup_delay(mut self, delay: Duration) -> Self {
        self.setup_delay = delay;
        self
    }

    /// Set the elapsed-time tick interval
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// The mode-specific initial value for the speaker/video toggle
    pub fn default_toggle_off(&self) -> bool {
        match self.mode {
            CallMode::Voice => self.voice_speaker_off_default,
            CallMode::Video => self.video_off_default,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(VoxlineError::ConfigError(
                "tick interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
