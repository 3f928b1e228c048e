//! Video download
//!
//! Saves the video track of a result to a local file named after the prompt.

use crate::error::{Result, SceneError};
use crate::model::GenerationResult;
use crate::notify::{Notice, NotificationSink};
use crate::service::GenerationService;
use std::path::{Path, PathBuf};

/// UTF-16 code units of the prompt kept in the file name
const FILE_NAME_PROMPT_UNITS: usize = 30;

const FILE_NAME_SUFFIX: &str = "_animation.mp4";

/// File name for a downloaded video
///
/// The first 30 UTF-16 code units of the prompt, each replaced by `_`
/// unless it is an ASCII letter or digit. A character outside the BMP takes
/// two units and so becomes `__`.
///
/// # Example
/// ```
/// use scenecast::preview::download_file_name;
///
/// assert_eq!(download_file_name("a cat, dancing!"), "a_cat__dancing__animation.mp4");
/// ```
pub fn download_file_name(prompt: &str) -> String {
    let mut name: String = prompt
        .encode_utf16()
        .take(FILE_NAME_PROMPT_UNITS)
        .map(|unit| match u8::try_from(unit) {
            Ok(byte) if byte.is_ascii_alphanumeric() => char::from(byte),
            _ => '_',
        })
        .collect();
    name.push_str(FILE_NAME_SUFFIX);
    name
}

/// Fetch the video of `result` and write it into `dir`
///
/// Emits exactly one notice: download started, no video, or failure.
/// Returns the path of the written file.
pub async fn download_video(
    service: &dyn GenerationService,
    result: Option<&GenerationResult>,
    prompt: &str,
    dir: &Path,
    notifier: &dyn NotificationSink,
) -> Result<PathBuf> {
    let Some(video) = result
        .map(|r| &r.video)
        .filter(|video| !video.resolve_url().is_empty())
    else {
        let error = SceneError::NoVideo;
        notifier.notify(Notice::error(error.friendly_message()));
        return Err(error);
    };

    let path = dir.join(download_file_name(prompt));
    let written = async {
        let bytes = service.fetch_media(video).await?;
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, &bytes).await?;
        Ok::<usize, SceneError>(bytes.len())
    }
    .await;

    match written {
        Ok(size) => {
            tracing::info!(path = %path.display(), bytes = size, "video downloaded");
            notifier.notify(Notice::success("Download started"));
            Ok(path)
        }
        Err(e) => {
            tracing::error!(url = video.resolve_url(), error = %e, "video download failed");
            notifier.notify(Notice::error("Failed to download video. Please try again."));
            Err(e)
        }
    }
}
