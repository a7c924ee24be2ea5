use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::Frame;
use crate::sense::IdleSensor;

/// Produces screen frames for the capture loop. Only the engine driver calls
/// `capture_one`; implementations need not support concurrent capture.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Acquire platform resources. A failure here is fatal for the engine.
    fn start(&mut self) -> Result<()>;

    /// Release platform resources; idempotent.
    fn stop(&mut self);

    /// Fetch the next frame. `None` covers timeouts, no-new-frame ticks and
    /// recoverable platform errors; the source reinitializes lazily.
    async fn capture_one(&mut self) -> Option<Frame>;
}

/// Build the screen source for the current platform
pub fn platform_source(idle: Arc<dyn IdleSensor>) -> Box<dyn FrameSource> {
    #[cfg(windows)]
    {
        Box::new(ScreenSource::new(idle))
    }

    #[cfg(not(windows))]
    {
        let _ = idle;
        Box::new(NullSource)
    }
}

/// Primary-display capture backed by the `screenshots` crate, with frames
/// JPEG-compressed off the async runtime.
#[cfg(windows)]
pub struct ScreenSource {
    idle: Arc<dyn IdleSensor>,
    jpeg_quality: u8,
    started: bool,
}

#[cfg(windows)]
impl ScreenSource {
    pub fn new(idle: Arc<dyn IdleSensor>) -> Self {
        Self {
            idle,
            jpeg_quality: 75,
            started: false,
        }
    }
}

#[cfg(windows)]
#[async_trait]
impl FrameSource for ScreenSource {
    fn start(&mut self) -> Result<()> {
        use anyhow::Context;

        let screens = screenshots::Screen::all().context("Failed to enumerate displays")?;
        let primary = screens
            .first()
            .ok_or_else(|| anyhow::anyhow!("No displays detected for capture"))?;

        tracing::info!(
            width = primary.display_info.width,
            height = primary.display_info.height,
            "screen capture ready"
        );
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) {
        if self.started {
            self.started = false;
            tracing::debug!("screen capture stopped");
        }
    }

    async fn capture_one(&mut self) -> Option<Frame> {
        if !self.started {
            // Lazy reinitialization after a lost display or transient error
            if let Err(err) = self.start() {
                tracing::warn!("screen capture reinit failed: {err:#}");
                return None;
            }
        }

        let quality = self.jpeg_quality;
        match tokio::task::spawn_blocking(move || capture_primary_jpeg(quality)).await {
            Ok(Ok((data, width, height))) => Some(Frame::new(
                data,
                chrono::Utc::now(),
                width,
                height,
                self.idle.cursor_position(),
            )),
            Ok(Err(err)) => {
                tracing::debug!("frame capture miss: {err:#}");
                self.started = false;
                None
            }
            Err(err) => {
                tracing::warn!("capture task failed: {err}");
                None
            }
        }
    }
}

#[cfg(windows)]
fn capture_primary_jpeg(quality: u8) -> Result<(Vec<u8>, u32, u32)> {
    use anyhow::Context;

    let screens = screenshots::Screen::all().context("Failed to enumerate displays")?;
    let screen = screens
        .first()
        .ok_or_else(|| anyhow::anyhow!("No displays detected for capture"))?;
    let pixels = screen
        .capture()
        .context("Failed to capture primary screen")?;

    let (width, height) = (pixels.width(), pixels.height());
    let rgb = image::DynamicImage::ImageRgba8(pixels).to_rgb8();

    let mut data = Vec::new();
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut data, quality);
    encoder.encode(rgb.as_raw(), width, height, image::ColorType::Rgb8)?;

    Ok((data, width, height))
}

/// Inert source for platforms without a capture backend; the pipeline still
/// runs, it just never sees a frame.
#[cfg(not(windows))]
pub struct NullSource;

#[cfg(not(windows))]
#[async_trait]
impl FrameSource for NullSource {
    fn start(&mut self) -> Result<()> {
        tracing::warn!("screen capture is only implemented for Windows; frames will be empty");
        Ok(())
    }

    fn stop(&mut self) {}

    async fn capture_one(&mut self) -> Option<Frame> {
        None
    }
}
