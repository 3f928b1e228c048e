//! Preview helpers
//!
//! Display-side logic that does not depend on playback state: hue rotation
//! for the character image and the video download action.

pub mod download;
pub mod hue;

pub use download::{download_file_name, download_video};
pub use hue::{hue_degrees, hue_from_rgb, parse_hex_color};
