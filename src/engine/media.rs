//! Media handle boundary
//!
//! A [`MediaBackend`] turns a URL into a [`MediaHandle`]; the handle is the
//! underlying playable resource of one channel.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which audio channel of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Spoken narration, plays once
    Narration,
    /// Ambient background sound, loops
    Ambience,
}

impl ChannelKind {
    /// Ambience loops indefinitely; narration plays once
    pub fn loops(&self) -> bool {
        matches!(self, ChannelKind::Ambience)
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKind::Narration => write!(f, "narration"),
            ChannelKind::Ambience => write!(f, "ambience"),
        }
    }
}

/// A playable media resource
///
/// `play` is the only asynchronous operation: it may fail on decode errors
/// or autoplay restrictions after a delay.
#[async_trait]
pub trait MediaHandle: Send + Sync {
    /// Set output gain in `[0.0, 1.0]`
    fn set_volume(&self, gain: f32);

    fn set_muted(&self, muted: bool);

    fn set_looping(&self, looping: bool);

    /// Start (or resume) playback from the current position
    async fn play(&self) -> Result<()>;

    fn pause(&self);

    fn seek_to_start(&self);

    /// Current playhead position
    fn position(&self) -> Duration;

    /// Free the underlying resource
    fn close(&self);
}

/// Factory for media handles
pub trait MediaBackend: Send + Sync {
    /// Create a handle for `url`
    fn open(&self, url: &str) -> Result<Arc<dyn MediaHandle>>;
}
