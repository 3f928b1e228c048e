//! Audio profile
//!
//! Which audio channels a generation should carry and how loud each one is.

use crate::engine::VolumePercent;
use serde::{Deserialize, Serialize};

/// User-editable audio settings
///
/// Updates are structural: every `with_*` method returns a new profile and
/// leaves the other fields untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// Spoken narration describing the scene
    pub include_narration: bool,

    /// Looping ambient sound matching the environment
    pub include_ambience: bool,

    pub narration_volume: VolumePercent,

    pub ambience_volume: VolumePercent,
}

impl Default for AudioProfile {
    fn default() -> Self {
        Self {
            include_narration: true,
            include_ambience: true,
            narration_volume: VolumePercent::default(),
            ambience_volume: VolumePercent::default(),
        }
    }
}

impl AudioProfile {
    /// Profile with both channels disabled
    pub fn silent() -> Self {
        Self {
            include_narration: false,
            include_ambience: false,
            ..Self::default()
        }
    }

    pub fn with_narration(self, include: bool) -> Self {
        Self {
            include_narration: include,
            ..self
        }
    }

    pub fn with_ambience(self, include: bool) -> Self {
        Self {
            include_ambience: include,
            ..self
        }
    }

    /// Set narration volume, clamped to `[0, 100]`
    pub fn with_narration_volume(self, percent: u32) -> Self {
        Self {
            narration_volume: VolumePercent::new(percent),
            ..self
        }
    }

    /// Set ambience volume, clamped to `[0, 100]`
    pub fn with_ambience_volume(self, percent: u32) -> Self {
        Self {
            ambience_volume: VolumePercent::new(percent),
            ..self
        }
    }

    /// True when at least one channel is enabled
    pub fn any_enabled(&self) -> bool {
        self.include_narration || self.include_ambience
    }
}
