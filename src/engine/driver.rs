use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc, Mutex};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{EngineEvent, EventBus, PulseMachine, PulseState, Suggestion, SuggestionStatus};
use crate::action::ActionExecutor;
use crate::capture::{CaptureContext, FrameRing, FrameSource};
use crate::cloud::{translate, Predictor};
use crate::config::AppSettings;
use crate::persist::SuggestionStore;
use crate::sense::IdleSensor;

/// Engine timing and thresholds
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fps: u32,
    pub buffer_seconds: u32,
    pub pause_threshold: Duration,
    pub min_confidence: f64,
    pub cooling_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: 3,
            buffer_seconds: 4,
            pause_threshold: Duration::from_millis(1000),
            min_confidence: 0.80,
            cooling_period: Duration::from_millis(500),
        }
    }
}

impl EngineConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            fps: settings.capture.frames_per_second,
            buffer_seconds: settings.capture.buffer_seconds,
            pause_threshold: settings.pause_threshold(),
            min_confidence: settings.capture.min_confidence,
            cooling_period: settings.cooling_period(),
        }
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Frames sent with each prediction: the whole buffer window
    fn window(&self) -> usize {
        (self.fps * self.buffer_seconds).max(1) as usize
    }
}

/// UI-to-engine requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    Approve,
    Dismiss,
}

/// The long-running driver: ticks the state machine at the capture cadence,
/// escalates to the predictor when the user pauses, and serializes approval,
/// execution and cooling.
pub struct PulseEngine {
    config: EngineConfig,
    machine: Arc<PulseMachine>,
    ring: Arc<FrameRing>,
    source: Mutex<Box<dyn FrameSource>>,
    idle: Arc<dyn IdleSensor>,
    predictor: Arc<dyn Predictor>,
    executor: Arc<ActionExecutor>,
    store: Option<Arc<SuggestionStore>>,
    events: EventBus,
    cancel: CancellationToken,
}

impl PulseEngine {
    pub fn new(
        config: EngineConfig,
        source: Box<dyn FrameSource>,
        idle: Arc<dyn IdleSensor>,
        predictor: Arc<dyn Predictor>,
        executor: Arc<ActionExecutor>,
        store: Option<Arc<SuggestionStore>>,
    ) -> Self {
        let ring = Arc::new(FrameRing::new(config.window()));

        Self {
            config,
            machine: Arc::new(PulseMachine::new()),
            ring,
            source: Mutex::new(source),
            idle,
            predictor,
            executor,
            store,
            events: EventBus::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn machine(&self) -> Arc<PulseMachine> {
        Arc::clone(&self.machine)
    }

    pub fn ring(&self) -> Arc<FrameRing> {
        Arc::clone(&self.ring)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request a graceful stop: the current tick unwinds at its next
    /// suspension point and the frame source is released.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Spawn the UI command loop and hand back its sender. Keeping commands
    /// on a channel avoids a UI<->engine reference cycle.
    pub fn command_channel(self: &Arc<Self>, buffer: usize) -> mpsc::Sender<EngineCommand> {
        let (tx, mut rx) = mpsc::channel(buffer);
        let engine = Arc::clone(self);

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    EngineCommand::Approve => engine.approve().await,
                    EngineCommand::Dismiss => engine.dismiss().await,
                }
            }
        });

        tx
    }

    /// Drive the capture/predict/approve cycle until cancelled. A startup
    /// failure of the frame source is fatal; per-tick errors are logged and
    /// followed by a one-second backoff.
    pub async fn run(&self) -> Result<()> {
        self.source.lock().await.start()?;
        tracing::info!(fps = self.config.fps, "pulse engine running");

        loop {
            if self.cancel.is_cancelled() {
                break;
            }

            if let Err(err) = self.tick().await {
                tracing::warn!("engine tick failed: {err:#}");
                tokio::select! {
                    _ = self.cancel.cancelled() => break,
                    _ = sleep(Duration::from_secs(1)) => {}
                }
            }

            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = sleep(self.config.frame_interval()) => {}
            }
        }

        self.source.lock().await.stop();
        tracing::info!("pulse engine stopped");
        Ok(())
    }

    async fn tick(&self) -> Result<()> {
        match self.machine.state() {
            PulseState::Idle => {
                self.transition(PulseState::Capturing);
            }
            PulseState::Capturing => {
                if let Some(frame) = self.source.lock().await.capture_one().await {
                    self.ring.push(frame);
                }

                if self.idle.is_idle(self.config.pause_threshold) {
                    self.transition(PulseState::IntentDetected);
                } else {
                    self.transition(PulseState::Idle);
                }
            }
            PulseState::IntentDetected => {
                self.transition(PulseState::ProcessingCloud);
                self.process_cloud().await;
            }
            // Waiting on an external event; nothing to do this tick
            PulseState::ProcessingCloud | PulseState::AwaitingApproval | PulseState::Executing => {}
            PulseState::Cooling => {
                tokio::select! {
                    _ = self.cancel.cancelled() => return Ok(()),
                    _ = sleep(self.config.cooling_period) => {}
                }
                self.transition(PulseState::Idle);
            }
        }

        Ok(())
    }

    /// Ask the remote model what the user wants next. Anything short of a
    /// confident, non-empty plan silently returns the machine to Idle.
    async fn process_cloud(&self) {
        let frames = self.ring.recent(self.config.window());
        let Some(latest) = frames.last() else {
            tracing::debug!("no frames buffered, skipping prediction");
            self.transition(PulseState::Idle);
            return;
        };

        let context = CaptureContext::from_frame(latest, self.idle.cursor_position());
        let Some(prediction) = self.predictor.predict(&frames, &context).await else {
            self.transition(PulseState::Idle);
            return;
        };

        if prediction.confidence < self.config.min_confidence {
            tracing::debug!(
                confidence = prediction.confidence,
                floor = self.config.min_confidence,
                "prediction below confidence floor"
            );
            self.transition(PulseState::Idle);
            return;
        }

        let plan = translate(&prediction);
        if plan.is_empty() {
            tracing::debug!("prediction produced an empty plan");
            self.transition(PulseState::Idle);
            return;
        }

        let description = prediction
            .description
            .clone()
            .or_else(|| prediction.suggestion.clone())
            .unwrap_or_else(|| "Suggested action".to_string());

        let suggestion = Suggestion::new(description, prediction.confidence, plan);
        tracing::info!(
            id = %suggestion.id,
            confidence = suggestion.confidence,
            steps = suggestion.plan.len(),
            "suggestion ready"
        );

        self.machine.set_suggestion(suggestion.clone());
        self.transition(PulseState::AwaitingApproval);
        self.events.emit(EngineEvent::SuggestionReady(suggestion));
    }

    /// Execute the current suggestion. Valid only while awaiting approval;
    /// called from the UI side.
    pub async fn approve(&self) {
        if self.cancel.is_cancelled() {
            return;
        }

        if self.machine.state() != PulseState::AwaitingApproval {
            tracing::warn!("approve ignored outside the approval window");
            return;
        }

        let Some(suggestion) = self.machine.suggestion() else {
            tracing::warn!("no suggestion attached, returning to idle");
            self.transition(PulseState::Idle);
            return;
        };

        if !self.transition(PulseState::Executing) {
            return;
        }

        match self.executor.run_plan(&suggestion.plan, &self.cancel).await {
            Ok(()) => {
                self.finalize_suggestion(SuggestionStatus::Executed);
                self.transition(PulseState::Cooling);
            }
            Err(err) => {
                tracing::error!("plan execution failed: {err:#}");
                self.finalize_suggestion(SuggestionStatus::Failed);
                self.events
                    .emit(EngineEvent::ExecutionError(format!("{err:#}")));
                self.transition(PulseState::Idle);
            }
        }
    }

    /// Reject the current suggestion without synthesizing any input
    pub async fn dismiss(&self) {
        if self.cancel.is_cancelled() {
            return;
        }

        if self.machine.state() != PulseState::AwaitingApproval {
            tracing::warn!("dismiss ignored outside the approval window");
            return;
        }

        self.finalize_suggestion(SuggestionStatus::Dismissed);
        self.transition(PulseState::Idle);
        self.events.emit(EngineEvent::SuggestionDismissed);
    }

    /// Stamp the suggestion's terminal status and append it to the audit log
    fn finalize_suggestion(&self, status: SuggestionStatus) {
        let Some(suggestion) = self.machine.update_suggestion_status(status) else {
            return;
        };

        if let Some(store) = &self.store {
            if let Err(err) = store.append(&suggestion) {
                tracing::warn!("audit log append failed: {err}");
            }
        }
    }

    fn transition(&self, to: PulseState) -> bool {
        match self.machine.transition(to) {
            Some((from, to)) => {
                self.events.emit(EngineEvent::StateChanged { from, to });
                true
            }
            None => false,
        }
    }
}
