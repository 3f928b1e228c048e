//! Playback Engine Module
//!
//! Dual-channel audio playback for a generated animation:
//! - Volume percent to gain mapping
//! - Media handle boundary and a simulated backend
//! - Per-channel controllers
//! - Session-level sync engine

pub mod channel;
pub mod gain;
pub mod media;
pub mod simulated;
pub mod sync;

pub use channel::AudioChannelController;
pub use gain::{percent_to_gain, VolumePercent, DEFAULT_VOLUME_PERCENT, MAX_VOLUME_PERCENT};
pub use media::{ChannelKind, MediaBackend, MediaHandle};
pub use simulated::{HandleState, MediaEvent, SimulatedBackend};
pub use sync::{AudioSyncEngine, PlaybackSession, PlaybackState};
