//! Generation request and result types
//!
//! A request is built fresh for every submission and never mutated. A result
//! is immutable once received and is shared read-only between the
//! coordinator and the playback engine.

use crate::error::{Result, SceneError};
use crate::model::{AudioProfile, EmotionalTone, GeneratorConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a media reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Narration,
    Ambience,
    Model,
    Texture,
    Animation,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Narration => "narration",
            Self::Ambience => "ambience",
            Self::Model => "model",
            Self::Texture => "texture",
            Self::Animation => "animation",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque reference to a remote or local binary asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub kind: MediaKind,
    url: String,
}

impl MediaRef {
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
        }
    }

    /// Resolve to a playable/downloadable URL
    pub fn resolve_url(&self) -> &str {
        &self.url
    }
}

/// One submission to the generation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    emotional_tone: EmotionalTone,
    audio_profile: AudioProfile,
}

impl GenerationRequest {
    /// Build a request from the prompt, tone and audio profile
    ///
    /// The prompt is trimmed; an empty or whitespace-only prompt is rejected.
    pub fn new(prompt: &str, emotional_tone: EmotionalTone, audio_profile: AudioProfile) -> Result<Self> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SceneError::EmptyPrompt);
        }

        Ok(Self {
            prompt: prompt.to_string(),
            emotional_tone,
            audio_profile,
        })
    }

    /// Build a request from the fields of a full configuration that the
    /// service consumes
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        Self::new(&config.prompt, config.emotional_tone, config.audio)
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn emotional_tone(&self) -> EmotionalTone {
        self.emotional_tone
    }

    pub fn audio_profile(&self) -> AudioProfile {
        self.audio_profile
    }
}

/// A generated multi-track artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub prompt: String,
    pub emotional_tone: EmotionalTone,

    /// Audio profile as resolved by the service
    pub audio_profile: AudioProfile,

    pub video: MediaRef,
    pub narration_audio: MediaRef,
    pub ambience_audio: MediaRef,
    pub model: MediaRef,
    pub texture: MediaRef,
    pub animation: MediaRef,

    #[serde(default = "default_ai_generated")]
    pub is_ai_generated: bool,
}

fn default_ai_generated() -> bool {
    true
}

impl GenerationResult {
    /// True when the preview has at least one audio channel to play
    pub fn has_audio(&self) -> bool {
        self.audio_profile.any_enabled()
    }

    /// All media references carried by this result
    pub fn media(&self) -> [&MediaRef; 6] {
        [
            &self.video,
            &self.narration_audio,
            &self.ambience_audio,
            &self.model,
            &self.texture,
            &self.animation,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_trims_prompt() {
        let request =
            GenerationRequest::new("  a cat dancing  ", EmotionalTone::Happy, AudioProfile::default())
                .unwrap();
        assert_eq!(request.prompt(), "a cat dancing");
    }

    #[test]
    fn test_request_rejects_blank_prompt() {
        for prompt in ["", "   ", "\t\n"] {
            let err = GenerationRequest::new(prompt, EmotionalTone::Sad, AudioProfile::default())
                .unwrap_err();
            assert!(matches!(err, SceneError::EmptyPrompt));
        }
    }

    #[test]
    fn test_request_from_config_uses_tone_and_audio() {
        let config = GeneratorConfig::default()
            .with_prompt("robot in the rain")
            .with_tone(EmotionalTone::Surprised)
            .with_audio(AudioProfile::silent());
        let request = GenerationRequest::from_config(&config).unwrap();

        assert_eq!(request.emotional_tone(), EmotionalTone::Surprised);
        assert_eq!(request.audio_profile(), AudioProfile::silent());
    }

    #[test]
    fn test_media_ref_resolves_url() {
        let media = MediaRef::new(MediaKind::Narration, "https://cdn.example/n.mp3");
        assert_eq!(media.resolve_url(), "https://cdn.example/n.mp3");
        assert_eq!(media.kind.to_string(), "narration");
    }
}
