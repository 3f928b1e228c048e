//! Data Model
//!
//! Plain value types shared by the coordinator, the service boundary and
//! the playback engine:
//! - Audio profile (which channels, at what volume)
//! - Character and scene customization
//! - Generation requests and results

pub mod audio;
pub mod customization;
pub mod generation;

pub use audio::AudioProfile;
pub use customization::{
    CharacterCustomization, CharacterType, EmotionalTone, Environment, GeneratorConfig,
    SceneCustomization,
};
pub use generation::{GenerationRequest, GenerationResult, MediaKind, MediaRef};
