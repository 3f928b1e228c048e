//! Scenecast - Text to Animated Scene Generator
//!
//! Scenecast turns a text prompt plus character, scene and audio settings
//! into a multi-track animation (video, narration, ambience) and previews it
//! with synchronized playback.
//!
//! # Architecture
//!
//! - `coordinator`: one in-flight generation request with observable state
//! - `engine`: dual-channel audio playback bound to a generation result
//! - `preview`: hue rotation for the character image and video download
//! - `service`: the external generation service boundary (mock or HTTP)
//!
//! The coordinator and engine run on a single cooperative event loop; their
//! only suspension points are the service call and each channel's start.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod preview;
pub mod service;

pub use error::{Result, SceneError};
