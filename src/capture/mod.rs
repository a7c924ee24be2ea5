mod frame;
mod ring;
mod source;

pub use frame::{CaptureContext, Frame};
pub use ring::FrameRing;
pub use source::{platform_source, FrameSource};

#[cfg(windows)]
pub use source::ScreenSource;
