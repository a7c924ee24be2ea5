// Core pipeline modules
pub mod action;
pub mod capture;
pub mod cloud;
pub mod engine;
pub mod sense;

// Input synthesis
pub mod input;

// Suggestion audit log
pub mod persist;

// Hotkey tap classification
pub mod hotkey;

// Configuration
pub mod config;

// Telemetry (logging, tracing)
pub mod telemetry;

pub mod error;
pub mod utils;

#[cfg(test)]
mod test_utils;

pub use action::{Action, ActionExecutor, ActionPlan, ExecutorConfig, Region, ScrollDirection};
pub use capture::{CaptureContext, Frame, FrameRing, FrameSource};
pub use cloud::{CloudPredictor, Prediction, Predictor};
pub use engine::{
    EngineCommand, EngineConfig, EngineEvent, PulseEngine, PulseMachine, PulseState, Suggestion,
    SuggestionStatus,
};
pub use error::PulseError;
pub use sense::{IdleSensor, SystemIdleSensor};
