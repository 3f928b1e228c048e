//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tracing::info;

use crate::cli::{Commands, GenerateArgs};
use crate::config::AppConfig;
use crate::coordinator::{GenerationCoordinator, RequestState};
use crate::engine::{AudioSyncEngine, SimulatedBackend};
use crate::error::SceneError;
use crate::model::{GenerationResult, GeneratorConfig};
use crate::notify::{NotificationSink, RecordingSink};
use crate::preview::{download_video, hue_degrees};
use crate::service::{self, GenerationService};

/// Run one parsed command.
pub async fn run(command: Option<Commands>, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Some(Commands::Generate { args, json }) => generate(config, &args, json).await,
        Some(Commands::Preview {
            args,
            mute,
            advance_ms,
        }) => preview(config, &args, mute, Duration::from_millis(advance_ms)).await,
        Some(Commands::Hue { color }) => hue(&color),
        Some(Commands::Download { args, out }) => download(config, &args, &out).await,
        None => {
            println!("Scenecast v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

/// Recovery hints for a failed command
///
/// Empty unless the error chain holds a recoverable [`SceneError`].
pub fn error_hints(err: &anyhow::Error) -> Vec<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<SceneError>())
        .filter(|scene| scene.is_recoverable())
        .map(SceneError::recovery_suggestions)
        .unwrap_or_default()
}

/// Submit through a coordinator and wait for the outcome.
async fn run_generation(
    service: Arc<dyn GenerationService>,
    sink: Arc<RecordingSink>,
    config: &GeneratorConfig,
) -> anyhow::Result<Arc<GenerationResult>> {
    if !service.is_available().await {
        bail!("generation service '{}' is not available", service.name());
    }

    let coordinator = GenerationCoordinator::new(service, sink);
    coordinator.submit(config)?.settled().await;

    match coordinator.state() {
        RequestState::Succeeded(result) => Ok(result),
        RequestState::Failed(reason) => bail!("{}", reason),
        other => bail!("generation ended in unexpected state: {}", other),
    }
}

fn print_notices(sink: &RecordingSink) {
    for notice in sink.take() {
        println!("{}", notice);
    }
}

/// Generate an animation and print the result.
pub async fn generate(config: &AppConfig, args: &GenerateArgs, json: bool) -> anyhow::Result<()> {
    let generator = args.to_config(&config.defaults);
    info!("Generating: {}", generator.prompt);

    let sink = Arc::new(RecordingSink::new());
    let outcome = run_generation(service::from_config(&config.service), sink.clone(), &generator).await;
    print_notices(&sink);
    let result = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(result.as_ref())?);
        return Ok(());
    }

    println!("Result:  {}", result.id);
    println!("Created: {}", result.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Prompt:  {}", result.prompt);
    println!("Tone:    {}", result.emotional_tone.label());
    println!("{:-<60}", "");
    for media in result.media() {
        println!("{:<10} {}", media.kind, media.resolve_url());
    }
    println!("{:-<60}", "");
    println!("Audio: {}", if result.has_audio() { "yes" } else { "no" });

    Ok(())
}

/// Generate, then drive one playback session on the simulated backend.
pub async fn preview(
    config: &AppConfig,
    args: &GenerateArgs,
    mute: bool,
    advance: Duration,
) -> anyhow::Result<()> {
    let generator = args.to_config(&config.defaults);
    let hue = hue_degrees(&generator.character.color)?;

    let sink = Arc::new(RecordingSink::new());
    let service = service::from_config(&config.service);
    let coordinator = GenerationCoordinator::new(service, sink.clone());
    let backend = SimulatedBackend::new();
    let mut engine = AudioSyncEngine::new(Arc::new(backend.clone()), sink.clone());

    coordinator.submit(&generator)?.settled().await;
    let state = coordinator.state();
    if let RequestState::Failed(reason) = &state {
        print_notices(&sink);
        bail!("{}", reason);
    }
    engine.sync_with(&state);

    println!(
        "Character: {} {} (hue-rotate {}deg)",
        generator.character.character_type, generator.character.color, hue
    );
    println!(
        "Scene:     {} ({})",
        generator.scene.environment,
        generator.scene.environment.ambience_description()
    );
    println!("Tone:      {}", generator.emotional_tone.label());
    println!("Audio:     {}", if engine.has_audio() { "yes" } else { "no" });

    engine.play();
    engine.settle().await;
    if mute {
        engine.toggle_mute();
    }
    backend.advance(advance);

    if let Some(session) = engine.session() {
        println!(
            "After {:?}: narration at {:?}, ambience at {:?}",
            advance,
            session.narration().position(),
            session.ambience().position()
        );
    }

    engine.reset();
    engine.teardown();

    println!("{:-<60}", "");
    print_notices(&sink);
    println!("{:-<60}", "");
    for event in backend.events() {
        println!("{:?}", event);
    }

    Ok(())
}

/// Print the hue rotation for a color.
pub fn hue(color: &str) -> anyhow::Result<()> {
    let degrees = hue_degrees(color)?;
    println!("{}", degrees);
    Ok(())
}

/// Generate, then save the video into `out`.
pub async fn download(config: &AppConfig, args: &GenerateArgs, out: &Path) -> anyhow::Result<()> {
    let generator = args.to_config(&config.defaults);
    let service = service::from_config(&config.service);
    let sink = Arc::new(RecordingSink::new());

    let result = match run_generation(Arc::clone(&service), sink.clone(), &generator).await {
        Ok(result) => result,
        Err(e) => {
            print_notices(&sink);
            return Err(e);
        }
    };

    let notifier: &dyn NotificationSink = sink.as_ref();
    let saved = download_video(
        service.as_ref(),
        Some(result.as_ref()),
        &generator.prompt,
        out,
        notifier,
    )
    .await;
    print_notices(&sink);

    let path = saved.with_context(|| format!("saving video into {}", out.display()))?;
    println!("Saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ServiceBackend, ServiceConfig};

    fn offline_config() -> AppConfig {
        AppConfig {
            service: ServiceConfig {
                backend: ServiceBackend::Mock,
                mock_latency_ms: 0,
                ..ServiceConfig::default()
            },
            ..AppConfig::default()
        }
    }

    fn args(prompt: &str) -> GenerateArgs {
        GenerateArgs {
            prompt: prompt.to_string(),
            ..GenerateArgs::default()
        }
    }

    #[tokio::test]
    async fn test_generate_command() {
        generate(&offline_config(), &args("a robot painting"), true)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_prompt() {
        assert!(generate(&offline_config(), &args("  "), false).await.is_err());
    }

    #[tokio::test]
    async fn test_preview_command() {
        preview(&offline_config(), &args("a jellyfish glowing"), true, Duration::from_secs(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_download_command() {
        let dir = tempfile::tempdir().unwrap();
        download(&offline_config(), &args("a kite"), dir.path())
            .await
            .unwrap();
        assert!(dir.path().join("a_kite_animation.mp4").exists());
    }

    #[tokio::test]
    async fn test_empty_prompt_error_carries_hints() {
        let err = generate(&offline_config(), &args(""), false).await.unwrap_err();
        let hints = error_hints(&err);
        assert!(hints.contains(&"Describe the scene you want to animate"));
    }

    #[test]
    fn test_bad_color_hint_survives_context() {
        let err = hue("teal").context("running hue").unwrap_err();
        assert_eq!(error_hints(&err), vec!["Use a six digit hex color such as #3b82f6"]);
    }

    #[test]
    fn test_unrecoverable_errors_have_no_hints() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(error_hints(&anyhow::Error::from(SceneError::from(io))).is_empty());
        assert!(error_hints(&anyhow::anyhow!("plain failure")).is_empty());
    }

    #[test]
    fn test_hue_command_rejects_bad_color() {
        assert!(hue("blue").is_err());
        assert!(hue("#0000ff").is_ok());
    }
}
