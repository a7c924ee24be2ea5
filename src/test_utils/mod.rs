//! Shared fakes for unit and scenario tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::capture::{CaptureContext, Frame, FrameSource};
use crate::cloud::{Prediction, Predictor};
use crate::engine::{PulseMachine, PulseState};
use crate::input::InputSynthesizer;
use crate::sense::IdleSensor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthCall {
    MoveMouse { x: i32, y: i32 },
    Click { x: i32, y: i32 },
    RightClick { x: i32, y: i32 },
    DoubleClick { x: i32, y: i32 },
    TypeText(String),
    PressKeys(String),
    Drag { sx: i32, sy: i32, ex: i32, ey: i32 },
    Scroll { x: i32, y: i32, amount: i32 },
}

/// Records every synthesized event instead of touching the OS
#[derive(Default)]
pub struct RecordingSynthesizer {
    calls: Mutex<Vec<SynthCall>>,
}

impl RecordingSynthesizer {
    pub fn calls(&self) -> Vec<SynthCall> {
        self.calls.lock().clone()
    }

    fn record(&self, call: SynthCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl InputSynthesizer for RecordingSynthesizer {
    async fn move_mouse(&self, x: i32, y: i32) -> Result<()> {
        self.record(SynthCall::MoveMouse { x, y });
        Ok(())
    }

    async fn click(&self, x: i32, y: i32) -> Result<()> {
        self.record(SynthCall::Click { x, y });
        Ok(())
    }

    async fn right_click(&self, x: i32, y: i32) -> Result<()> {
        self.record(SynthCall::RightClick { x, y });
        Ok(())
    }

    async fn double_click(&self, x: i32, y: i32) -> Result<()> {
        self.record(SynthCall::DoubleClick { x, y });
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        self.record(SynthCall::TypeText(text.to_string()));
        Ok(())
    }

    async fn press_keys(&self, spec: &str) -> Result<()> {
        self.record(SynthCall::PressKeys(spec.to_string()));
        Ok(())
    }

    async fn drag(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> Result<()> {
        self.record(SynthCall::Drag { sx, sy, ex, ey });
        Ok(())
    }

    async fn scroll(&self, x: i32, y: i32, amount: i32) -> Result<()> {
        self.record(SynthCall::Scroll { x, y, amount });
        Ok(())
    }
}

/// Fails every event; exercises the fatal plan-execution path
pub struct FailingSynthesizer;

#[async_trait]
impl InputSynthesizer for FailingSynthesizer {
    async fn move_mouse(&self, _x: i32, _y: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn click(&self, _x: i32, _y: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn right_click(&self, _x: i32, _y: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn double_click(&self, _x: i32, _y: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn type_text(&self, _text: &str) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn press_keys(&self, _spec: &str) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn drag(&self, _sx: i32, _sy: i32, _ex: i32, _ey: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }

    async fn scroll(&self, _x: i32, _y: i32, _amount: i32) -> Result<()> {
        Err(anyhow::anyhow!("synthetic input failure"))
    }
}

/// Idle sensor with a controllable idle duration
pub struct FakeIdleSensor {
    idle_ms: AtomicU64,
    cursor: Mutex<(i32, i32)>,
}

impl FakeIdleSensor {
    pub fn new(idle_ms: u64) -> Self {
        Self {
            idle_ms: AtomicU64::new(idle_ms),
            cursor: Mutex::new((0, 0)),
        }
    }

    pub fn set_idle_ms(&self, idle_ms: u64) {
        self.idle_ms.store(idle_ms, Ordering::SeqCst);
    }
}

impl IdleSensor for FakeIdleSensor {
    fn idle_duration(&self) -> Duration {
        Duration::from_millis(self.idle_ms.load(Ordering::SeqCst))
    }

    fn cursor_position(&self) -> (i32, i32) {
        *self.cursor.lock()
    }
}

pub fn test_frame(width: u32, height: u32) -> Frame {
    Frame::new(vec![0xFF, 0xD8, 0xFF, 0xD9], Utc::now(), width, height, (0, 0))
}

/// Frame source fed from a queue, optionally falling back to a repeating
/// template frame stamped at capture time.
pub struct ScriptedSource {
    queue: Mutex<VecDeque<Frame>>,
    template: Option<Frame>,
}

impl ScriptedSource {
    pub fn queued(frames: Vec<Frame>) -> Self {
        Self {
            queue: Mutex::new(frames.into()),
            template: None,
        }
    }

    pub fn repeating(template: Frame) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            template: Some(template),
        }
    }
}

#[async_trait]
impl FrameSource for ScriptedSource {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) {}

    async fn capture_one(&mut self) -> Option<Frame> {
        if let Some(frame) = self.queue.lock().pop_front() {
            return Some(frame);
        }

        self.template.as_ref().map(|template| {
            let mut frame = template.clone();
            frame.captured_at = Utc::now();
            frame
        })
    }
}

/// Canned predictor that records how often and from which machine state it
/// was called.
pub struct StubPredictor {
    response: Mutex<Option<Prediction>>,
    take_once: bool,
    calls: AtomicUsize,
    machine: Mutex<Option<Arc<PulseMachine>>>,
    observed_states: Mutex<Vec<PulseState>>,
}

impl StubPredictor {
    /// Always answer with a clone of `response`
    pub fn repeating(response: Prediction) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            take_once: false,
            calls: AtomicUsize::new(0),
            machine: Mutex::new(None),
            observed_states: Mutex::new(Vec::new()),
        }
    }

    /// Answer once, then report "no prediction"
    pub fn once(response: Prediction) -> Self {
        Self {
            response: Mutex::new(Some(response)),
            take_once: true,
            calls: AtomicUsize::new(0),
            machine: Mutex::new(None),
            observed_states: Mutex::new(Vec::new()),
        }
    }

    pub fn never() -> Self {
        Self {
            response: Mutex::new(None),
            take_once: false,
            calls: AtomicUsize::new(0),
            machine: Mutex::new(None),
            observed_states: Mutex::new(Vec::new()),
        }
    }

    /// Watch this machine to record the state at each prediction call
    pub fn observe(&self, machine: Arc<PulseMachine>) {
        *self.machine.lock() = Some(machine);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn observed_states(&self) -> Vec<PulseState> {
        self.observed_states.lock().clone()
    }
}

#[async_trait]
impl Predictor for StubPredictor {
    async fn predict(&self, _frames: &[Frame], _context: &CaptureContext) -> Option<Prediction> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(machine) = self.machine.lock().as_ref() {
            self.observed_states.lock().push(machine.state());
        }

        let mut response = self.response.lock();
        if self.take_once {
            response.take()
        } else {
            response.clone()
        }
    }
}
