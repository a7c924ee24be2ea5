use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::Frame;

/// Bounded, time-ordered buffer of recent frames. The ring exclusively owns
/// its frames; every accessor returns cloned snapshots.
pub struct FrameRing {
    frames: Mutex<VecDeque<Frame>>,
    capacity: usize,
}

impl FrameRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Append a frame, evicting the oldest when at capacity
    pub fn push(&self, frame: Frame) {
        let mut frames = self.frames.lock();
        if frames.len() == self.capacity {
            frames.pop_front();
        }
        frames.push_back(frame);
    }

    /// Up to the `n` most recently appended frames, in chronological order
    pub fn recent(&self, n: usize) -> Vec<Frame> {
        let frames = self.frames.lock();
        let skip = frames.len().saturating_sub(n);
        frames.iter().skip(skip).cloned().collect()
    }

    /// Frames captured at or after `t`
    pub fn since(&self, t: DateTime<Utc>) -> Vec<Frame> {
        let frames = self.frames.lock();
        frames
            .iter()
            .filter(|frame| frame.captured_at >= t)
            .cloned()
            .collect()
    }

    /// The most recently appended frame, if any
    pub fn latest(&self) -> Option<Frame> {
        self.frames.lock().back().cloned()
    }

    pub fn clear(&self) {
        self.frames.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
