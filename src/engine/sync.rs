//! Audio Sync Engine
//!
//! Drives the narration and ambience channels of one generation result in
//! step with the visual preview.
//!
//! A session is bound to exactly one result. Binding a new result releases
//! every channel of the outgoing session before anything of the new one
//! exists, so two sessions never hold live handles at the same time.

use crate::coordinator::RequestState;
use crate::engine::channel::AudioChannelController;
use crate::engine::media::{ChannelKind, MediaBackend};
use crate::model::GenerationResult;
use crate::notify::{Notice, NotificationSink};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Playback state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing playing, channels rewound (default state)
    #[default]
    Stopped,
    /// Play was requested; individual channels may still have failed
    Playing,
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackState::Stopped => write!(f, "Stopped"),
            PlaybackState::Playing => write!(f, "Playing"),
        }
    }
}

/// Playback state bound to one generation result
pub struct PlaybackSession {
    id: Uuid,
    result: Arc<GenerationResult>,
    narration: AudioChannelController,
    ambience: AudioChannelController,
    state: PlaybackState,
    muted: bool,
}

impl PlaybackSession {
    fn new(result: Arc<GenerationResult>, muted: bool) -> Self {
        let profile = result.audio_profile;
        let mut narration = AudioChannelController::new(
            ChannelKind::Narration,
            profile.include_narration,
            profile.narration_volume,
        );
        let mut ambience = AudioChannelController::new(
            ChannelKind::Ambience,
            profile.include_ambience,
            profile.ambience_volume,
        );
        narration.set_muted(muted);
        ambience.set_muted(muted);

        Self {
            id: Uuid::new_v4(),
            result,
            narration,
            ambience,
            state: PlaybackState::Stopped,
            muted,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn result(&self) -> &GenerationResult {
        &self.result
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn narration(&self) -> &AudioChannelController {
        &self.narration
    }

    pub fn ambience(&self) -> &AudioChannelController {
        &self.ambience
    }

    fn channels_mut(&mut self) -> [&mut AudioChannelController; 2] {
        [&mut self.narration, &mut self.ambience]
    }

    fn release(&mut self) {
        for channel in self.channels_mut() {
            channel.release();
        }
    }
}

/// Composes two channels into one playback session
///
/// Channel starts are fire-and-observe. Narration is started before
/// ambience but without a barrier, so the two may begin audibly at slightly
/// different times.
pub struct AudioSyncEngine {
    backend: Arc<dyn MediaBackend>,
    notifier: Arc<dyn NotificationSink>,
    session: Option<PlaybackSession>,
}

impl AudioSyncEngine {
    pub fn new(backend: Arc<dyn MediaBackend>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            backend,
            notifier,
            session: None,
        }
    }

    // ========================================================================
    // Session Lifecycle
    // ========================================================================

    /// Replace the current session with one bound to `result`
    ///
    /// The outgoing session's channels are released first. Mute carries
    /// over to the new session.
    pub fn bind_session(&mut self, result: Arc<GenerationResult>) -> Uuid {
        let muted = match self.session.take() {
            Some(mut outgoing) => {
                outgoing.release();
                tracing::debug!(session = %outgoing.id, "session released");
                outgoing.muted
            }
            None => false,
        };

        let session = PlaybackSession::new(result, muted);
        let id = session.id;
        tracing::info!(
            session = %id,
            result = %session.result.id,
            narration = session.narration.is_enabled(),
            ambience = session.ambience.is_enabled(),
            "session bound"
        );
        self.session = Some(session);
        id
    }

    /// Follow coordinator state: bind when a new result has succeeded
    ///
    /// Returns true when a new session was bound. Observing the result the
    /// current session already holds is a no-op.
    pub fn sync_with(&mut self, state: &RequestState) -> bool {
        let RequestState::Succeeded(result) = state else {
            return false;
        };
        if let Some(session) = &self.session {
            if session.result.id == result.id {
                return false;
            }
        }
        self.bind_session(Arc::clone(result));
        true
    }

    /// Release everything; called when the owning scope is destroyed
    pub fn teardown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            tracing::debug!(session = %session.id, "session torn down");
        }
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Start every enabled channel, narration first
    ///
    /// Marks the session playing regardless of individual channel outcomes.
    pub fn play(&mut self) {
        let Some(session) = self.session.as_mut() else {
            self.notifier
                .notify(Notice::info("Generate an animation first to play it"));
            return;
        };

        let backend = Arc::clone(&self.backend);
        let result = Arc::clone(&session.result);
        let sources = [
            result.narration_audio.resolve_url(),
            result.ambience_audio.resolve_url(),
        ];

        for (channel, url) in session.channels_mut().into_iter().zip(sources) {
            if !channel.is_enabled() {
                continue;
            }
            match channel.ensure_handle(backend.as_ref(), url) {
                Ok(()) => channel.start(),
                Err(e) => {
                    tracing::warn!(channel = %channel.kind(), error = %e, "could not load audio");
                }
            }
        }

        session.state = PlaybackState::Playing;
        tracing::info!(session = %session.id, "playback started");
        self.notifier
            .notify(Notice::success("Playing animation with audio"));
    }

    /// Stop both channels and rewind; no-op unless playing
    pub fn reset(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.is_playing() {
            return;
        }

        for channel in session.channels_mut() {
            channel.stop();
        }
        session.state = PlaybackState::Stopped;
        tracing::info!(session = %session.id, "playback reset");
        self.notifier.notify(Notice::success("Preview reset!"));
    }

    /// Flip mute on both channels
    ///
    /// Returns the new mute state, or `None` without a session.
    pub fn toggle_mute(&mut self) -> Option<bool> {
        let session = self.session.as_mut()?;
        let muted = !session.muted;
        session.muted = muted;
        for channel in session.channels_mut() {
            channel.set_muted(muted);
        }

        self.notifier.notify(Notice::info(if muted {
            "Audio muted"
        } else {
            "Audio unmuted"
        }));
        Some(muted)
    }

    /// Wait for in-flight channel starts to settle
    pub async fn settle(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.narration.settle().await;
            session.ambience.settle().await;
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> PlaybackState {
        self.session
            .as_ref()
            .map(|s| s.state)
            .unwrap_or_default()
    }

    pub fn is_playing(&self) -> bool {
        self.state() == PlaybackState::Playing
    }

    pub fn is_muted(&self) -> bool {
        self.session.as_ref().map(|s| s.muted).unwrap_or(false)
    }

    /// True when the bound result has an audio channel to play
    pub fn has_audio(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.result.has_audio())
            .unwrap_or(false)
    }
}

impl Drop for AudioSyncEngine {
    fn drop(&mut self) {
        self.teardown();
    }
}
