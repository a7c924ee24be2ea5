use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

/// Performs individual low-level input events. Methods may suspend briefly
/// for settle delays but never block the pipeline for long.
///
/// Per-event synthesis failures are swallowed inside the implementation
/// (logged, the call still succeeds); only a catastrophic failure surfaces as
/// an error, which the executor treats as fatal for the whole plan.
#[async_trait]
pub trait InputSynthesizer: Send + Sync {
    /// Set the cursor to absolute screen coordinates
    async fn move_mouse(&self, x: i32, y: i32) -> Result<()>;

    async fn click(&self, x: i32, y: i32) -> Result<()>;

    async fn right_click(&self, x: i32, y: i32) -> Result<()>;

    async fn double_click(&self, x: i32, y: i32) -> Result<()>;

    /// Type each code unit of `text` as a unicode key event pair
    async fn type_text(&self, text: &str) -> Result<()>;

    /// Press a `+`-separated chord: tokens go down in order and release in
    /// reverse order. Unknown tokens are skipped.
    async fn press_keys(&self, spec: &str) -> Result<()>;

    /// Press the primary button at the source, glide to the destination in
    /// interpolated steps, release.
    async fn drag(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> Result<()>;

    /// Move to `(x, y)` and emit a wheel event of `amount` notches
    /// (sign = direction).
    async fn scroll(&self, x: i32, y: i32, amount: i32) -> Result<()>;
}

/// Build the input backend for the current platform
pub fn platform_synthesizer() -> Arc<dyn InputSynthesizer> {
    #[cfg(windows)]
    {
        Arc::new(SendInputSynthesizer::new())
    }

    #[cfg(not(windows))]
    {
        Arc::new(NoopSynthesizer)
    }
}

#[cfg(windows)]
pub use windows_impl::SendInputSynthesizer;

#[cfg(windows)]
mod windows_impl {
    use std::time::Duration;

    use anyhow::Result;
    use async_trait::async_trait;
    use tokio::time::sleep;

    use super::InputSynthesizer;
    use crate::input::keyboard::KeyDriver;
    use crate::input::keys::{parse_chord, virtual_key};
    use crate::input::mouse::{MouseButton, MouseDriver};

    const SETTLE_DELAY: Duration = Duration::from_millis(50);
    const DOUBLE_CLICK_GAP: Duration = Duration::from_millis(100);
    const TYPING_DELAY: Duration = Duration::from_millis(10);
    const DRAG_STEPS: i32 = 20;
    const DRAG_STEP_DELAY: Duration = Duration::from_millis(10);

    /// `SendInput`-backed synthesizer with human-scale settle delays
    pub struct SendInputSynthesizer {
        mouse: MouseDriver,
        keyboard: KeyDriver,
    }

    impl SendInputSynthesizer {
        pub fn new() -> Self {
            Self {
                mouse: MouseDriver::new(),
                keyboard: KeyDriver::new(),
            }
        }

        fn swallow(result: Result<()>, what: &str) {
            if let Err(err) = result {
                tracing::warn!("input event dropped ({what}): {err:#}");
            }
        }
    }

    impl Default for SendInputSynthesizer {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl InputSynthesizer for SendInputSynthesizer {
        async fn move_mouse(&self, x: i32, y: i32) -> Result<()> {
            Self::swallow(self.mouse.move_to(x, y), "move");
            Ok(())
        }

        async fn click(&self, x: i32, y: i32) -> Result<()> {
            self.move_mouse(x, y).await?;
            sleep(SETTLE_DELAY).await;
            Self::swallow(self.mouse.button_click(MouseButton::Left), "click");
            Ok(())
        }

        async fn right_click(&self, x: i32, y: i32) -> Result<()> {
            self.move_mouse(x, y).await?;
            sleep(SETTLE_DELAY).await;
            Self::swallow(self.mouse.button_click(MouseButton::Right), "right click");
            Ok(())
        }

        async fn double_click(&self, x: i32, y: i32) -> Result<()> {
            self.click(x, y).await?;
            sleep(DOUBLE_CLICK_GAP).await;
            self.click(x, y).await
        }

        async fn type_text(&self, text: &str) -> Result<()> {
            for ch in text.chars() {
                Self::swallow(self.keyboard.send_unicode(ch), "type");
                sleep(TYPING_DELAY).await;
            }
            Ok(())
        }

        async fn press_keys(&self, spec: &str) -> Result<()> {
            let keys: Vec<u16> = parse_chord(spec)
                .iter()
                .filter_map(|token| virtual_key(token))
                .collect();

            for vk in &keys {
                Self::swallow(self.keyboard.key_down(*vk), "key down");
            }
            for vk in keys.iter().rev() {
                Self::swallow(self.keyboard.key_up(*vk), "key up");
            }
            Ok(())
        }

        async fn drag(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> Result<()> {
            self.move_mouse(sx, sy).await?;
            sleep(SETTLE_DELAY).await;
            Self::swallow(self.mouse.press_primary(), "drag press");

            for step in 1..=DRAG_STEPS {
                let t = step as f64 / DRAG_STEPS as f64;
                let x = sx + ((ex - sx) as f64 * t) as i32;
                let y = sy + ((ey - sy) as f64 * t) as i32;
                Self::swallow(self.mouse.move_to(x, y), "drag move");
                sleep(DRAG_STEP_DELAY).await;
            }

            Self::swallow(self.mouse.release_primary(), "drag release");
            Ok(())
        }

        async fn scroll(&self, x: i32, y: i32, amount: i32) -> Result<()> {
            self.move_mouse(x, y).await?;
            sleep(SETTLE_DELAY).await;
            Self::swallow(self.mouse.wheel(amount), "scroll");
            Ok(())
        }
    }
}

/// Logging stand-in for platforms without an input backend
#[cfg(not(windows))]
pub struct NoopSynthesizer;

#[cfg(not(windows))]
#[async_trait]
impl InputSynthesizer for NoopSynthesizer {
    async fn move_mouse(&self, x: i32, y: i32) -> Result<()> {
        tracing::debug!("move_mouse({x}, {y}) ignored: no input backend");
        Ok(())
    }

    async fn click(&self, x: i32, y: i32) -> Result<()> {
        tracing::debug!("click({x}, {y}) ignored: no input backend");
        Ok(())
    }

    async fn right_click(&self, x: i32, y: i32) -> Result<()> {
        tracing::debug!("right_click({x}, {y}) ignored: no input backend");
        Ok(())
    }

    async fn double_click(&self, x: i32, y: i32) -> Result<()> {
        tracing::debug!("double_click({x}, {y}) ignored: no input backend");
        Ok(())
    }

    async fn type_text(&self, text: &str) -> Result<()> {
        tracing::debug!("type_text({} chars) ignored: no input backend", text.len());
        Ok(())
    }

    async fn press_keys(&self, spec: &str) -> Result<()> {
        tracing::debug!("press_keys({spec}) ignored: no input backend");
        Ok(())
    }

    async fn drag(&self, sx: i32, sy: i32, ex: i32, ey: i32) -> Result<()> {
        tracing::debug!("drag(({sx}, {sy}) -> ({ex}, {ey})) ignored: no input backend");
        Ok(())
    }

    async fn scroll(&self, x: i32, y: i32, amount: i32) -> Result<()> {
        tracing::debug!("scroll({x}, {y}, {amount}) ignored: no input backend");
        Ok(())
    }
}
