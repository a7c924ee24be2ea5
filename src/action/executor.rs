use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use super::{Action, ActionPlan, ScrollDirection};
use crate::config::ExecutionSettings;
use crate::input::InputSynthesizer;

/// Pacing bounds for the uniform random delay between plan steps
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(300),
        }
    }
}

impl From<ExecutionSettings> for ExecutorConfig {
    fn from(settings: ExecutionSettings) -> Self {
        Self {
            min_delay: Duration::from_millis(settings.min_delay_ms),
            max_delay: Duration::from_millis(settings.max_delay_ms.max(settings.min_delay_ms)),
        }
    }
}

/// Runs action plans through the injected synthesizer with human-like pacing
/// and keeps the reverse of the last executed plan's final action as the
/// current undo.
pub struct ActionExecutor {
    synth: Arc<dyn InputSynthesizer>,
    config: ExecutorConfig,
    rng: Mutex<StdRng>,
    last_reverse: Mutex<Option<Action>>,
}

impl ActionExecutor {
    pub fn new(synth: Arc<dyn InputSynthesizer>, config: ExecutorConfig) -> Self {
        Self {
            synth,
            config,
            rng: Mutex::new(StdRng::from_entropy()),
            last_reverse: Mutex::new(None),
        }
    }

    /// Deterministic jitter for tests
    pub fn with_seed(synth: Arc<dyn InputSynthesizer>, config: ExecutorConfig, seed: u64) -> Self {
        Self {
            synth,
            config,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            last_reverse: Mutex::new(None),
        }
    }

    /// Execute the plan's actions in order. Cancellation between actions
    /// stops further dispatch; an in-flight action finishes its events. Any
    /// error escaping an action is fatal for the plan.
    pub async fn run_plan(&self, plan: &ActionPlan, cancel: &CancellationToken) -> Result<()> {
        if plan.is_empty() {
            tracing::debug!("empty plan, nothing to execute");
            return Ok(());
        }

        let last_index = plan.len() - 1;
        let mut completed = true;

        for (index, action) in plan.actions.iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("plan cancelled before step {}/{}", index + 1, plan.len());
                completed = false;
                break;
            }

            tracing::debug!(
                step = index + 1,
                total = plan.len(),
                kind = action.kind(),
                target = action.target(),
                "dispatching action"
            );

            self.dispatch(action)
                .await
                .with_context(|| format!("step {} ({}) failed", index + 1, action.kind()))?;

            if index < last_index {
                let pause = self.jitter();
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("plan cancelled after step {}/{}", index + 1, plan.len());
                        completed = false;
                        break;
                    }
                    _ = sleep(pause) => {}
                }
            }
        }

        if completed {
            *self.last_reverse.lock() = plan.actions.last().and_then(Action::reverse);
        }

        Ok(())
    }

    /// Execute the stored reverse action, if any. Calling this with nothing
    /// stored is a logged no-op.
    pub async fn undo_last(&self) -> Result<()> {
        let reverse = self.last_reverse.lock().take();
        match reverse {
            None => {
                tracing::warn!("undo requested but no reverse action is stored");
                Ok(())
            }
            Some(action) => {
                tracing::info!(kind = action.kind(), "executing reverse action");
                self.dispatch(&action).await
            }
        }
    }

    /// Snapshot of the currently stored undo
    pub fn last_reverse(&self) -> Option<Action> {
        self.last_reverse.lock().clone()
    }

    async fn dispatch(&self, action: &Action) -> Result<()> {
        match action {
            Action::Click { target, region } => match region {
                Some(region) => {
                    let (x, y) = region.center();
                    self.synth.click(x, y).await
                }
                None => skip_without_region("click", target),
            },
            Action::RightClick { target, region } => match region {
                Some(region) => {
                    let (x, y) = region.center();
                    self.synth.right_click(x, y).await
                }
                None => skip_without_region("right click", target),
            },
            Action::DoubleClick { target, region } => match region {
                Some(region) => {
                    let (x, y) = region.center();
                    self.synth.double_click(x, y).await
                }
                None => skip_without_region("double click", target),
            },
            Action::Type { region, text, .. } => {
                // Focus the target first when we know where it is
                if let Some(region) = region {
                    let (x, y) = region.center();
                    self.synth.click(x, y).await?;
                }
                self.synth.type_text(text).await
            }
            Action::KeyChord { keys, .. } => self.synth.press_keys(keys).await,
            Action::Drag { source, dest, .. } => {
                let (sx, sy) = source.center();
                let (ex, ey) = dest.center();
                self.synth.drag(sx, sy, ex, ey).await
            }
            Action::Scroll {
                target,
                region,
                direction,
                amount,
            } => match region {
                Some(region) => {
                    let (x, y) = region.center();
                    let notches = match direction {
                        ScrollDirection::Up => *amount,
                        ScrollDirection::Down => -*amount,
                    };
                    self.synth.scroll(x, y, notches).await
                }
                None => skip_without_region("scroll", target),
            },
        }
    }

    fn jitter(&self) -> Duration {
        let min = self.config.min_delay.as_millis() as u64;
        let max = (self.config.max_delay.as_millis() as u64).max(min);
        let ms = self.rng.lock().gen_range(min..=max);
        Duration::from_millis(ms)
    }
}

fn skip_without_region(what: &str, target: &str) -> Result<()> {
    tracing::debug!("{what} on '{target}' skipped: no target region");
    Ok(())
}
