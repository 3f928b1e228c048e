//! CLI Module
//!
//! Command-line interface for the Scenecast animation generator.

pub mod commands;

use crate::model::{CharacterType, EmotionalTone, Environment, GeneratorConfig};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Scenecast - text to animated scene generator with narration and ambience
#[derive(Parser, Debug)]
#[command(name = "scenecast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an animation and print the result
    #[command(name = "generate")]
    Generate {
        #[command(flatten)]
        args: GenerateArgs,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate, then run a playback session on the simulated backend
    #[command(name = "preview")]
    Preview {
        #[command(flatten)]
        args: GenerateArgs,

        /// Toggle mute once playback has started
        #[arg(long)]
        mute: bool,

        /// How far to advance the playheads before resetting
        #[arg(long, default_value_t = 3000)]
        advance_ms: u64,
    },

    /// Print the hue rotation for a character color
    #[command(name = "hue")]
    Hue {
        /// Color as #rrggbb
        color: String,
    },

    /// Generate, then save the video locally
    #[command(name = "download")]
    Download {
        #[command(flatten)]
        args: GenerateArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
}

/// Generator form fields; anything left out comes from the configuration
#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// What the animation should show
    pub prompt: String,

    /// Emotional tone: happy, sad, excited, surprised
    #[arg(short, long, value_parser = parse_tone)]
    pub tone: Option<EmotionalTone>,

    /// Character type: human, animal, fantasy-creature
    #[arg(long, value_parser = parse_character)]
    pub character: Option<CharacterType>,

    /// Character color as #rrggbb
    #[arg(long)]
    pub color: Option<String>,

    /// Environment: city, desert, space, underwater, forest
    #[arg(short, long, value_parser = parse_environment)]
    pub environment: Option<Environment>,

    /// Leave out the narration track
    #[arg(long)]
    pub no_narration: bool,

    /// Leave out the ambience track
    #[arg(long)]
    pub no_ambience: bool,

    /// Narration volume percent
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub narration_volume: Option<u32>,

    /// Ambience volume percent
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub ambience_volume: Option<u32>,
}

impl GenerateArgs {
    /// Apply these arguments on top of configured defaults
    pub fn to_config(&self, defaults: &GeneratorConfig) -> GeneratorConfig {
        let mut config = defaults.clone().with_prompt(self.prompt.clone());

        if let Some(tone) = self.tone {
            config = config.with_tone(tone);
        }
        if let Some(character) = self.character {
            config.character.character_type = character;
        }
        if let Some(color) = &self.color {
            config = config.with_color(color.clone());
        }
        if let Some(environment) = self.environment {
            config = config.with_environment(environment);
        }

        let mut audio = config.audio;
        if self.no_narration {
            audio = audio.with_narration(false);
        }
        if self.no_ambience {
            audio = audio.with_ambience(false);
        }
        if let Some(volume) = self.narration_volume {
            audio = audio.with_narration_volume(volume);
        }
        if let Some(volume) = self.ambience_volume {
            audio = audio.with_ambience_volume(volume);
        }
        config.with_audio(audio)
    }
}

fn parse_tone(s: &str) -> Result<EmotionalTone, String> {
    EmotionalTone::from_str(s).ok_or_else(|| format!("unknown tone '{}'", s))
}

fn parse_character(s: &str) -> Result<CharacterType, String> {
    CharacterType::from_str(s).ok_or_else(|| format!("unknown character type '{}'", s))
}

fn parse_environment(s: &str) -> Result<Environment, String> {
    Environment::from_str(s).ok_or_else(|| format!("unknown environment '{}'", s))
}
