//! Playback Tests
//!
//! Session-level guarantees of the sync engine against the simulated backend.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use scenecast::engine::{
    percent_to_gain, AudioSyncEngine, MediaEvent, PlaybackState, SimulatedBackend,
};
use scenecast::model::{AudioProfile, EmotionalTone, GenerationResult, MediaKind, MediaRef};
use scenecast::notify::RecordingSink;

fn result(id: &str, profile: AudioProfile) -> Arc<GenerationResult> {
    let media = |kind: MediaKind| MediaRef::new(kind, format!("mock://{}/{}.bin", id, kind));
    Arc::new(GenerationResult {
        id: id.to_string(),
        created_at: Utc::now(),
        prompt: format!("prompt {}", id),
        emotional_tone: EmotionalTone::Surprised,
        audio_profile: profile,
        video: media(MediaKind::Video),
        narration_audio: media(MediaKind::Narration),
        ambience_audio: media(MediaKind::Ambience),
        model: media(MediaKind::Model),
        texture: media(MediaKind::Texture),
        animation: media(MediaKind::Animation),
        is_ai_generated: true,
    })
}

fn engine(backend: &SimulatedBackend) -> AudioSyncEngine {
    AudioSyncEngine::new(Arc::new(backend.clone()), Arc::new(RecordingSink::new()))
}

// === Gain ===

#[test]
fn test_gain_is_linear_and_monotonic() {
    let mut previous = 0.0f32;
    for p in 0..=100u32 {
        let gain = percent_to_gain(p);
        assert!((gain - p as f32 / 100.0).abs() < 1e-6);
        assert!((0.0..=1.0).contains(&gain));
        assert!(gain >= previous);
        previous = gain;
    }
}

// === Reset ===

#[tokio::test]
async fn test_reset_rewinds_both_channels_and_is_idempotent() {
    let backend = SimulatedBackend::new();
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));

    engine.play();
    engine.settle().await;
    backend.advance(Duration::from_millis(2500));

    engine.reset();
    assert_eq!(engine.state(), PlaybackState::Stopped);
    for state in backend.handle_states() {
        assert_eq!(state.position, Duration::ZERO);
        assert!(!state.playing);
    }

    let events = backend.events().len();
    engine.reset();
    assert_eq!(backend.events().len(), events);
}

// === Mute ===

#[tokio::test]
async fn test_double_toggle_restores_mute_in_any_state() {
    let backend = SimulatedBackend::new();
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));

    // Stopped, no handles yet
    engine.toggle_mute();
    engine.toggle_mute();
    assert!(!engine.is_muted());

    engine.play();
    engine.settle().await;
    let before: Vec<bool> = backend.handle_states().iter().map(|s| s.muted).collect();
    engine.toggle_mute();
    engine.toggle_mute();
    let after: Vec<bool> = backend.handle_states().iter().map(|s| s.muted).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_mute_keeps_volume() {
    let backend = SimulatedBackend::new();
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default().with_narration_volume(40)));
    engine.play();
    engine.settle().await;

    engine.toggle_mute();
    engine.toggle_mute();

    let narration = backend.handle_state(0).unwrap();
    assert!((narration.gain - 0.4).abs() < 1e-6);
    assert_eq!(engine.session().unwrap().narration().volume().get(), 40);
}

// === Session Binding ===

#[tokio::test]
async fn test_rebind_releases_before_creating() {
    let backend = SimulatedBackend::new();
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));
    engine.play();
    engine.settle().await;

    engine.bind_session(result("b", AudioProfile::default()));
    engine.play();
    engine.settle().await;

    let events = backend.events();
    let a_closed: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, MediaEvent::Closed { handle } if *handle < 2))
        .map(|(i, _)| i)
        .collect();
    let b_opened = events
        .iter()
        .position(|e| matches!(e, MediaEvent::Opened { url, .. } if url.starts_with("mock://b/")))
        .unwrap();

    assert_eq!(a_closed.len(), 2);
    assert!(a_closed.iter().all(|&i| i < b_opened));
}

#[tokio::test]
async fn test_at_most_one_session_holds_handles() {
    let backend = SimulatedBackend::new();
    let mut engine = engine(&backend);

    for id in ["a", "b", "c"] {
        engine.bind_session(result(id, AudioProfile::default()));
        engine.play();
        engine.settle().await;
        assert_eq!(backend.live_handles(), 2);
    }
}

// === Best-effort Starts ===

#[tokio::test]
async fn test_failing_channel_does_not_stop_other() {
    let backend = SimulatedBackend::new();
    backend.fail_starts_for("ambience");
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));

    engine.play();
    engine.settle().await;

    assert!(engine.is_playing());
    let session = engine.session().unwrap();
    assert_eq!(session.ambience().start_failures(), 1);
    assert!(backend.handle_state(0).unwrap().playing);
}

#[tokio::test]
async fn test_replay_after_reset_survives_late_first_start() {
    let backend = SimulatedBackend::new();
    backend.slow_first_start(Duration::from_millis(50));
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));

    engine.play();
    tokio::task::yield_now().await;
    engine.reset();
    engine.play();
    engine.settle().await;

    assert!(engine.is_playing());
    let states = backend.handle_states();
    assert_eq!(states.len(), 2);
    assert!(states.iter().all(|s| s.playing && s.starts == 2));
}

#[tokio::test]
async fn test_late_start_after_rebind_is_discarded() {
    let backend = SimulatedBackend::gated();
    let mut engine = engine(&backend);
    engine.bind_session(result("a", AudioProfile::default()));
    engine.play();
    tokio::task::yield_now().await;

    engine.bind_session(result("b", AudioProfile::default()));
    backend.open_gate();
    engine.settle().await;
    tokio::task::yield_now().await;

    assert!(!engine.is_playing());
    assert!(backend.handle_states().iter().all(|s| !s.playing));
    assert!(!backend
        .events()
        .iter()
        .any(|e| matches!(e, MediaEvent::Played { .. })));
}
