//! Audio Channel Controller
//!
//! Owns one media handle end-to-end: lazy creation, start/stop, volume,
//! mute and release. The handle is created at most once per session and
//! `release` is the only path that frees it (also run on drop).

use crate::engine::gain::VolumePercent;
use crate::engine::media::{ChannelKind, MediaBackend, MediaHandle};
use crate::error::Result;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Controller for one playable audio channel
///
/// Starts are fire-and-observe: [`start`](Self::start) spawns the
/// asynchronous play call and returns. A start that settles after a later
/// `stop` or `release` is stale; its outcome is discarded. If it succeeded
/// and no newer start has been issued, the handle is paused again.
pub struct AudioChannelController {
    kind: ChannelKind,
    enabled: bool,
    volume: VolumePercent,
    muted: bool,
    handle: Option<Arc<dyn MediaHandle>>,

    /// Bumped by stop/release; a start only counts if it still matches
    epoch: Arc<AtomicU64>,

    /// Sequence number of the most recent start
    starts: Arc<AtomicU64>,

    /// Non-stale start failures
    failures: Arc<AtomicUsize>,

    pending: Vec<JoinHandle<()>>,
}

impl AudioChannelController {
    /// Create a controller with no handle yet
    pub fn new(kind: ChannelKind, enabled: bool, volume: VolumePercent) -> Self {
        Self {
            kind,
            enabled,
            volume,
            muted: false,
            handle: None,
            epoch: Arc::new(AtomicU64::new(0)),
            starts: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicUsize::new(0)),
            pending: Vec::new(),
        }
    }

    // ========================================================================
    // Handle Lifecycle
    // ========================================================================

    /// Create the media handle on first use
    ///
    /// Later calls are no-ops that keep the existing handle. Stored volume
    /// and mute state are applied to a freshly created handle.
    pub fn ensure_handle(&mut self, backend: &dyn MediaBackend, url: &str) -> Result<()> {
        if self.handle.is_some() {
            return Ok(());
        }

        let handle = backend.open(url)?;
        handle.set_volume(self.volume.gain());
        handle.set_muted(self.muted);
        handle.set_looping(self.kind.loops());
        tracing::debug!(channel = %self.kind, url, "media handle created");

        self.handle = Some(handle);
        Ok(())
    }

    /// Pause and discard the handle
    ///
    /// Idempotent: a controller without a handle has nothing to free.
    pub fn release(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.pause();
            handle.close();
            tracing::debug!(channel = %self.kind, "media handle released");
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Start playback from the handle's current position
    ///
    /// No-op when the channel is disabled or has no handle. Failures are
    /// logged and counted, never propagated.
    pub fn start(&mut self) {
        if !self.enabled {
            return;
        }
        let Some(handle) = self.handle.clone() else {
            tracing::warn!(channel = %self.kind, "start requested before a handle exists");
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(channel = %self.kind, "no async runtime, cannot start playback");
            return;
        };

        let kind = self.kind;
        let started_at = self.epoch.load(Ordering::SeqCst);
        let sequence = self.starts.fetch_add(1, Ordering::SeqCst) + 1;
        let epoch = Arc::clone(&self.epoch);
        let starts = Arc::clone(&self.starts);
        let failures = Arc::clone(&self.failures);

        self.pending.retain(|task| !task.is_finished());
        self.pending.push(runtime.spawn(async move {
            let outcome = handle.play().await;

            if epoch.load(Ordering::SeqCst) != started_at {
                // A newer start owns the handle now; leave its playback alone
                let superseded = starts.load(Ordering::SeqCst) != sequence;
                if outcome.is_ok() && !superseded {
                    handle.pause();
                }
                tracing::debug!(channel = %kind, "discarding superseded start");
                return;
            }

            if let Err(e) = outcome {
                failures.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(channel = %kind, error = %e, "playback failed to start");
            }
        }));
    }

    /// Pause and seek to the start
    ///
    /// Idempotent. In-flight starts become stale.
    pub fn stop(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = &self.handle {
            handle.pause();
            handle.seek_to_start();
        }
    }

    /// Wait for every in-flight start to settle
    pub async fn settle(&mut self) {
        for task in self.pending.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!(channel = %self.kind, error = %e, "start task did not complete");
            }
        }
    }

    // ========================================================================
    // Level
    // ========================================================================

    /// Set volume percent; applied now if a handle exists, otherwise on creation
    pub fn set_volume(&mut self, volume: VolumePercent) {
        self.volume = volume;
        if let Some(handle) = &self.handle {
            handle.set_volume(volume.gain());
        }
    }

    /// Mute or unmute without touching the stored volume
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(handle) = &self.handle {
            handle.set_muted(muted);
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn volume(&self) -> VolumePercent {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// Playhead position, zero without a handle
    pub fn position(&self) -> Duration {
        self.handle
            .as_ref()
            .map(|h| h.position())
            .unwrap_or(Duration::ZERO)
    }

    /// Number of starts that failed while still current
    pub fn start_failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl Drop for AudioChannelController {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulated::{MediaEvent, SimulatedBackend};
    use approx::assert_relative_eq;

    const URL: &str = "mock://test/narration.mp3";

    fn narration(enabled: bool) -> AudioChannelController {
        AudioChannelController::new(ChannelKind::Narration, enabled, VolumePercent::new(60))
    }

    #[test]
    fn test_ensure_handle_creates_once() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(true);

        channel.ensure_handle(&backend, URL).unwrap();
        channel.ensure_handle(&backend, URL).unwrap();

        assert!(channel.has_handle());
        assert_eq!(backend.opened(), 1);
    }

    #[test]
    fn test_volume_deferred_until_handle_exists() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(true);
        channel.set_volume(VolumePercent::new(30));

        channel.ensure_handle(&backend, URL).unwrap();

        let state = backend.handle_state(0).unwrap();
        assert_relative_eq!(state.gain, 0.3);
        assert!(!state.looping);
    }

    #[test]
    fn test_mute_keeps_volume() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.set_muted(true);
        assert_eq!(channel.volume().get(), 60);
        assert!(backend.handle_state(0).unwrap().muted);

        channel.set_muted(false);
        let state = backend.handle_state(0).unwrap();
        assert!(!state.muted);
        assert_relative_eq!(state.gain, 0.6);
    }

    #[test]
    fn test_ambience_handle_loops() {
        let backend = SimulatedBackend::new();
        let mut channel =
            AudioChannelController::new(ChannelKind::Ambience, true, VolumePercent::default());
        channel.ensure_handle(&backend, "mock://test/ambience.mp3").unwrap();
        assert!(backend.handle_state(0).unwrap().looping);
    }

    #[tokio::test]
    async fn test_disabled_channel_does_not_start() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(false);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        channel.settle().await;

        assert!(!backend.handle_state(0).unwrap().playing);
    }

    #[tokio::test]
    async fn test_start_then_stop_rewinds() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        channel.settle().await;
        backend.advance(Duration::from_secs(3));
        assert_eq!(channel.position(), Duration::from_secs(3));

        channel.stop();
        channel.stop();
        assert_eq!(channel.position(), Duration::ZERO);
        assert!(!backend.handle_state(0).unwrap().playing);
    }

    #[tokio::test]
    async fn test_start_failure_is_counted_not_propagated() {
        let backend = SimulatedBackend::new();
        backend.fail_starts_for("narration");
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        channel.settle().await;

        assert_eq!(channel.start_failures(), 1);
    }

    #[tokio::test]
    async fn test_stale_start_is_discarded() {
        let backend = SimulatedBackend::gated();
        backend.fail_starts_for("narration");
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        tokio::task::yield_now().await;
        channel.stop();
        backend.open_gate();
        channel.settle().await;

        assert_eq!(channel.start_failures(), 0);
    }

    #[tokio::test]
    async fn test_late_success_after_release_does_not_play() {
        let backend = SimulatedBackend::gated();
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        tokio::task::yield_now().await;
        channel.release();
        backend.open_gate();
        channel.settle().await;

        let state = backend.handle_state(0).unwrap();
        assert!(state.closed);
        assert!(!state.playing);
    }

    #[tokio::test]
    async fn test_superseded_start_does_not_pause_newer_playback() {
        let backend = SimulatedBackend::new();
        backend.slow_first_start(Duration::from_millis(50));
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.start();
        tokio::task::yield_now().await;
        channel.stop();
        channel.start();
        channel.settle().await;

        let state = backend.handle_state(0).unwrap();
        assert_eq!(state.starts, 2);
        assert!(state.playing);
        assert_eq!(backend.events().last(), Some(&MediaEvent::Played { handle: 0 }));
    }

    #[test]
    fn test_drop_releases_handle() {
        let backend = SimulatedBackend::new();
        {
            let mut channel = narration(true);
            channel.ensure_handle(&backend, URL).unwrap();
        }
        assert!(backend.events().contains(&MediaEvent::Closed { handle: 0 }));
    }

    #[test]
    fn test_release_is_single_shot() {
        let backend = SimulatedBackend::new();
        let mut channel = narration(true);
        channel.ensure_handle(&backend, URL).unwrap();

        channel.release();
        channel.release();
        drop(channel);

        let closes = backend
            .events()
            .into_iter()
            .filter(|e| matches!(e, MediaEvent::Closed { .. }))
            .count();
        assert_eq!(closes, 1);
    }
}
