use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use pulse_desktop::action::ActionExecutor;
use pulse_desktop::capture::platform_source;
use pulse_desktop::cloud::CloudPredictor;
use pulse_desktop::config::AppSettings;
use pulse_desktop::engine::{EngineCommand, EngineConfig, EngineEvent, PulseEngine};
use pulse_desktop::input::platform_synthesizer;
use pulse_desktop::persist::SuggestionStore;
use pulse_desktop::sense::{IdleSensor, SystemIdleSensor};
use pulse_desktop::{telemetry, utils};

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry = telemetry::init().context("Failed to initialize telemetry")?;

    let config_path = utils::config_file_path().ok();
    let settings = AppSettings::load(config_path.as_deref())?;

    let idle: Arc<dyn IdleSensor> = Arc::new(SystemIdleSensor::new());
    let source = platform_source(idle.clone());
    let predictor = Arc::new(CloudPredictor::new(&settings.cloud)?);
    let executor = Arc::new(ActionExecutor::new(
        platform_synthesizer(),
        settings.execution.clone().into(),
    ));
    let store = Arc::new(SuggestionStore::open(&utils::audit_db_path()?)?);

    let engine = Arc::new(PulseEngine::new(
        EngineConfig::from_settings(&settings),
        source,
        idle,
        predictor,
        executor,
        Some(store),
    ));

    spawn_event_logger(&engine);
    spawn_console_commands(&engine);

    let runner = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.run().await }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    tracing::info!("shutdown requested");

    engine.shutdown();
    runner.await??;

    Ok(())
}

/// Stand-in for the overlay: surface suggestions and failures on the log
fn spawn_event_logger(engine: &Arc<PulseEngine>) {
    let mut events = engine.subscribe();

    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(EngineEvent::SuggestionReady(suggestion)) => {
                    tracing::info!(
                        "suggestion: {} ({:.0}% confident, {} steps). Type 'a' to approve, 'd' to dismiss",
                        suggestion.description,
                        suggestion.confidence * 100.0,
                        suggestion.plan.len()
                    );
                }
                Ok(EngineEvent::SuggestionDismissed) => {
                    tracing::info!("suggestion dismissed");
                }
                Ok(EngineEvent::ExecutionError(message)) => {
                    tracing::error!("suggestion failed: {message}");
                }
                Ok(EngineEvent::StateChanged { .. }) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Console approval loop until the overlay UI lands
fn spawn_console_commands(engine: &Arc<PulseEngine>) {
    let commands = engine.command_channel(8);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let command = match line.trim() {
                "a" | "approve" => EngineCommand::Approve,
                "d" | "dismiss" => EngineCommand::Dismiss,
                _ => continue,
            };

            if commands.send(command).await.is_err() {
                break;
            }
        }
    });
}
