//! Channel Gain
//!
//! Maps the user-facing integer volume percent onto the continuous gain
//! applied to a media handle.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Maximum volume percent
pub const MAX_VOLUME_PERCENT: u8 = 100;

/// Volume percent used when the user has not chosen one
pub const DEFAULT_VOLUME_PERCENT: u8 = 75;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a volume percent to a linear gain
///
/// Values above 100 are clamped, so the result is always in `[0.0, 1.0]`.
///
/// # Example
/// ```
/// use scenecast::engine::percent_to_gain;
/// assert_eq!(percent_to_gain(50), 0.5);
/// assert_eq!(percent_to_gain(250), 1.0);
/// ```
#[inline]
pub fn percent_to_gain(percent: u32) -> f32 {
    percent.min(MAX_VOLUME_PERCENT as u32) as f32 / MAX_VOLUME_PERCENT as f32
}

// ============================================================================
// Volume Percent
// ============================================================================

/// Integer volume in `[0, 100]`
///
/// The clamp happens on every construction path, including deserialization,
/// so an out-of-range value can never reach a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Silent
    pub const MUTE: VolumePercent = VolumePercent(0);

    /// Full scale
    pub const FULL: VolumePercent = VolumePercent(MAX_VOLUME_PERCENT);

    /// Create a volume, clamping to `[0, 100]`
    pub fn new(percent: u32) -> Self {
        Self(percent.min(MAX_VOLUME_PERCENT as u32) as u8)
    }

    /// Get the raw percent
    pub fn get(self) -> u8 {
        self.0
    }

    /// Get the linear gain for this volume
    pub fn gain(self) -> f32 {
        percent_to_gain(self.0 as u32)
    }
}

impl Default for VolumePercent {
    fn default() -> Self {
        Self(DEFAULT_VOLUME_PERCENT)
    }
}

impl From<u32> for VolumePercent {
    fn from(percent: u32) -> Self {
        Self::new(percent)
    }
}

impl From<VolumePercent> for u32 {
    fn from(volume: VolumePercent) -> Self {
        volume.0 as u32
    }
}

impl fmt::Display for VolumePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
