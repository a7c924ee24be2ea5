use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A single captured screen frame. Immutable once produced; the compressed
/// payload is shared so buffer reads stay cheap.
#[derive(Clone)]
pub struct Frame {
    /// Lossy-compressed (JPEG) image bytes
    pub data: Arc<[u8]>,
    pub captured_at: DateTime<Utc>,
    pub width: u32,
    pub height: u32,
    pub cursor_x: i32,
    pub cursor_y: i32,
}

impl Frame {
    pub fn new(
        data: Vec<u8>,
        captured_at: DateTime<Utc>,
        width: u32,
        height: u32,
        cursor: (i32, i32),
    ) -> Self {
        Self {
            data: Arc::from(data),
            captured_at,
            width,
            height,
            cursor_x: cursor.0,
            cursor_y: cursor.1,
        }
    }

    /// Encode the compressed payload for the wire
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("bytes", &self.data.len())
            .field("captured_at", &self.captured_at)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("cursor", &(self.cursor_x, self.cursor_y))
            .finish()
    }
}

/// Snapshot of the desktop at prediction time, built from the most recent
/// frame plus the live cursor position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureContext {
    pub monitor_width: u32,
    pub monitor_height: u32,
    pub cursor_x: i32,
    pub cursor_y: i32,
    pub timestamp: DateTime<Utc>,
}

impl CaptureContext {
    pub fn from_frame(frame: &Frame, cursor: (i32, i32)) -> Self {
        Self {
            monitor_width: frame.width,
            monitor_height: frame.height,
            cursor_x: cursor.0,
            cursor_y: cursor.1,
            timestamp: Utc::now(),
        }
    }
}
