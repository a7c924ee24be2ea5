mod keys;
mod synthesizer;

#[cfg(windows)]
mod keyboard;
#[cfg(windows)]
mod mouse;

pub use keys::parse_chord;
pub use synthesizer::{platform_synthesizer, InputSynthesizer};

#[cfg(windows)]
pub use keys::virtual_key;
#[cfg(windows)]
pub use synthesizer::SendInputSynthesizer;
