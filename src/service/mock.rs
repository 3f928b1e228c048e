//! Mock generation service
//!
//! Does no inference. Returns a well-formed result whose media references
//! are derived from a fingerprint of the request, after a configurable
//! latency. Failures and a start gate can be injected so tests can hold a
//! request in flight.

use super::GenerationService;
use crate::error::{Result, SceneError};
use crate::model::{GenerationRequest, GenerationResult, MediaKind, MediaRef};
use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

/// URL scheme for mock media
const MOCK_SCHEME: &str = "mock://scenecast";

/// Mock text-to-animation service
pub struct MockGenerationService {
    latency: Duration,
    failure: Mutex<Option<String>>,
    dispatched: AtomicUsize,
    gate: Option<watch::Sender<bool>>,
}

impl MockGenerationService {
    /// Create a mock that answers immediately
    pub fn new() -> Self {
        Self::with_latency(Duration::ZERO)
    }

    /// Create a mock that answers after `latency`
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            failure: Mutex::new(None),
            dispatched: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Create a mock whose requests stay in flight until [`open_gate`](Self::open_gate)
    pub fn gated() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            gate: Some(tx),
            ..Self::new()
        }
    }

    /// Make every following request fail with `reason`
    pub fn fail_with(&self, reason: impl Into<String>) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = Some(reason.into());
    }

    /// Make following requests succeed again
    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Release every request waiting on the gate
    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.send_replace(true);
        }
    }

    /// Number of requests that reached the service
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::SeqCst)
    }

    fn fingerprint(request: &GenerationRequest) -> String {
        let mut hasher = Sha256::new();
        hasher.update(request.prompt().as_bytes());
        hasher.update(b"|");
        hasher.update(request.emotional_tone().as_str().as_bytes());
        let digest = format!("{:x}", hasher.finalize());
        digest[..16].to_string()
    }

    fn media(fingerprint: &str, kind: MediaKind, extension: &str) -> MediaRef {
        MediaRef::new(
            kind,
            format!("{}/{}/{}.{}", MOCK_SCHEME, fingerprint, kind, extension),
        )
    }
}

impl Default for MockGenerationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(prompt = request.prompt(), "mock generation started");

        if let Some(gate) = &self.gate {
            let mut rx = gate.subscribe();
            // Sender lives in self, so the channel cannot close while we wait
            let _ = rx.wait_for(|open| *open).await;
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let failure = self
            .failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(reason) = failure {
            return Err(SceneError::Service { reason });
        }

        let fp = Self::fingerprint(&request);
        Ok(GenerationResult {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            prompt: request.prompt().to_string(),
            emotional_tone: request.emotional_tone(),
            audio_profile: request.audio_profile(),
            video: Self::media(&fp, MediaKind::Video, "mp4"),
            narration_audio: Self::media(&fp, MediaKind::Narration, "mp3"),
            ambience_audio: Self::media(&fp, MediaKind::Ambience, "mp3"),
            model: Self::media(&fp, MediaKind::Model, "glb"),
            texture: Self::media(&fp, MediaKind::Texture, "png"),
            animation: Self::media(&fp, MediaKind::Animation, "json"),
            is_ai_generated: true,
        })
    }

    async fn fetch_media(&self, media: &MediaRef) -> Result<Vec<u8>> {
        let url = media.resolve_url();
        if !url.starts_with(MOCK_SCHEME) {
            return Err(SceneError::ServiceUnavailable {
                reason: format!("mock service cannot fetch {}", url),
            });
        }
        Ok(format!("MOCK {} {}", media.kind, url).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AudioProfile, EmotionalTone};

    fn request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(prompt, EmotionalTone::Excited, AudioProfile::default()).unwrap()
    }

    #[tokio::test]
    async fn test_mock_returns_result_for_request() {
        let service = MockGenerationService::new();
        let result = service.generate(request("a dragon surfing")).await.unwrap();

        assert_eq!(result.prompt, "a dragon surfing");
        assert_eq!(result.emotional_tone, EmotionalTone::Excited);
        assert!(result.narration_audio.resolve_url().ends_with("narration.mp3"));
        assert_eq!(service.dispatched(), 1);
    }

    #[tokio::test]
    async fn test_media_urls_are_deterministic_per_request() {
        let service = MockGenerationService::new();
        let a = service.generate(request("same")).await.unwrap();
        let b = service.generate(request("same")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.video, b.video);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let service = MockGenerationService::new();
        service.fail_with("gpu on fire");

        let err = service.generate(request("x")).await.unwrap_err();
        assert!(err.to_string().contains("gpu on fire"));

        service.clear_failure();
        assert!(service.generate(request("x")).await.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_media() {
        let service = MockGenerationService::new();
        let result = service.generate(request("fetch me")).await.unwrap();
        let bytes = service.fetch_media(&result.video).await.unwrap();
        assert!(bytes.starts_with(b"MOCK video"));

        let foreign = MediaRef::new(MediaKind::Video, "https://elsewhere/v.mp4");
        assert!(service.fetch_media(&foreign).await.is_err());
    }
}
