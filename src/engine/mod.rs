mod driver;
mod events;
mod machine;
mod suggestion;


pub use driver::{EngineCommand, EngineConfig, PulseEngine};
pub use events::{EngineEvent, EventBus};
pub use machine::{PulseMachine, PulseState};
pub use suggestion::{Suggestion, SuggestionStatus};
