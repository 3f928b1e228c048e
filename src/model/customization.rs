//! Character and scene customization
//!
//! Plain configuration values edited by the user. Only the prompt, the
//! emotional tone and the audio profile feed the generation request; the
//! rest drives the local preview.

use crate::model::AudioProfile;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default primary color for a new character
pub const DEFAULT_CHARACTER_COLOR: &str = "#3b82f6";

/// Emotional tone of the generated scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionalTone {
    #[default]
    Happy,
    Sad,
    Excited,
    Surprised,
}

impl EmotionalTone {
    pub const ALL: [EmotionalTone; 4] = [
        EmotionalTone::Happy,
        EmotionalTone::Sad,
        EmotionalTone::Excited,
        EmotionalTone::Surprised,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Excited => "excited",
            Self::Surprised => "surprised",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Some(Self::Happy),
            "sad" => Some(Self::Sad),
            "excited" => Some(Self::Excited),
            "surprised" => Some(Self::Surprised),
            _ => None,
        }
    }

    /// Label shown on the preview badge
    pub fn label(&self) -> &'static str {
        match self {
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Excited => "Excited",
            Self::Surprised => "Surprised",
        }
    }
}

impl fmt::Display for EmotionalTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of character in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CharacterType {
    Human,
    #[default]
    Animal,
    FantasyCreature,
}

impl CharacterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Animal => "animal",
            Self::FantasyCreature => "fantasyCreature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "human" => Some(Self::Human),
            "animal" => Some(Self::Animal),
            "fantasycreature" | "fantasy-creature" | "fantasy" => Some(Self::FantasyCreature),
            _ => None,
        }
    }
}

impl fmt::Display for CharacterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scene environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    City,
    Desert,
    #[default]
    Space,
    Underwater,
    Forest,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Desert => "desert",
            Self::Space => "space",
            Self::Underwater => "underwater",
            Self::Forest => "forest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "city" => Some(Self::City),
            "desert" => Some(Self::Desert),
            "space" => Some(Self::Space),
            "underwater" => Some(Self::Underwater),
            "forest" => Some(Self::Forest),
            _ => None,
        }
    }

    /// What the ambience channel sounds like in this environment
    pub fn ambience_description(&self) -> &'static str {
        match self {
            Self::Space => "Ambient space hum, cosmic sounds",
            Self::Forest => "Birds chirping, rustling leaves",
            Self::City => "Urban ambience, traffic sounds",
            Self::Underwater => "Bubbling water, ocean sounds",
            Self::Desert => "Wind, distant echoes",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Character appearance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCustomization {
    pub character_type: CharacterType,

    /// Primary color as `#rrggbb`
    pub color: String,

    pub props: Vec<String>,

    pub accessories: Vec<String>,
}

impl Default for CharacterCustomization {
    fn default() -> Self {
        Self {
            character_type: CharacterType::default(),
            color: DEFAULT_CHARACTER_COLOR.to_string(),
            props: Vec::new(),
            accessories: Vec::new(),
        }
    }
}

/// Scene backdrop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneCustomization {
    pub environment: Environment,
    pub background_elements: Vec<String>,
}

/// Everything the user has configured before pressing generate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub prompt: String,
    pub emotional_tone: EmotionalTone,
    pub character: CharacterCustomization,
    pub scene: SceneCustomization,
    pub audio: AudioProfile,
}

impl GeneratorConfig {
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn with_tone(mut self, tone: EmotionalTone) -> Self {
        self.emotional_tone = tone;
        self
    }

    pub fn with_audio(mut self, audio: AudioProfile) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.scene.environment = environment;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.character.color = color.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_product() {
        let config = GeneratorConfig::default();
        assert_eq!(config.character.character_type, CharacterType::Animal);
        assert_eq!(config.character.color, "#3b82f6");
        assert_eq!(config.emotional_tone, EmotionalTone::Happy);
        assert_eq!(config.scene.environment, Environment::Space);
        assert!(config.prompt.is_empty());
    }

    #[test]
    fn test_tone_conversion() {
        assert_eq!(EmotionalTone::from_str("Excited"), Some(EmotionalTone::Excited));
        assert_eq!(EmotionalTone::from_str("angry"), None);
        for tone in EmotionalTone::ALL {
            assert_eq!(EmotionalTone::from_str(tone.as_str()), Some(tone));
        }
    }

    #[test]
    fn test_character_type_wire_names() {
        let json = serde_json::to_string(&CharacterType::FantasyCreature).unwrap();
        assert_eq!(json, "\"fantasyCreature\"");
        assert_eq!(
            CharacterType::from_str("fantasy-creature"),
            Some(CharacterType::FantasyCreature)
        );
    }

    #[test]
    fn test_every_environment_has_ambience() {
        for env in ["city", "desert", "space", "underwater", "forest"] {
            let env = Environment::from_str(env).unwrap();
            assert!(!env.ambience_description().is_empty());
        }
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"prompt": "a fox", "emotional_tone": "sad"}"#).unwrap();
        assert_eq!(config.prompt, "a fox");
        assert_eq!(config.emotional_tone, EmotionalTone::Sad);
        assert_eq!(config.audio, AudioProfile::default());
    }
}
