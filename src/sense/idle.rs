use std::time::Duration;

/// Reports how long the user has been inactive and where the cursor sits.
///
/// Implementations must never block and never fail: a sensor that cannot
/// answer reports zero idle time (treated as active) and a `(0, 0)` cursor,
/// so a broken query can't trigger a spurious escalation.
pub trait IdleSensor: Send + Sync {
    /// Time since the last OS-level input event
    fn idle_duration(&self) -> Duration;

    /// Current cursor position in screen coordinates
    fn cursor_position(&self) -> (i32, i32);

    fn is_idle(&self, threshold: Duration) -> bool {
        self.idle_duration() >= threshold
    }
}

/// OS-backed sensor. On Windows it queries `GetLastInputInfo` and
/// `GetCursorPos`; elsewhere it always reports an active user.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemIdleSensor;

impl SystemIdleSensor {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl IdleSensor for SystemIdleSensor {
    fn idle_duration(&self) -> Duration {
        use windows::Win32::System::SystemInformation::GetTickCount;
        use windows::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};

        let mut info = LASTINPUTINFO {
            cbSize: std::mem::size_of::<LASTINPUTINFO>() as u32,
            dwTime: 0,
        };

        let ok = unsafe { GetLastInputInfo(&mut info) };
        if !ok.as_bool() {
            return Duration::ZERO;
        }

        // Tick counts wrap every ~49.7 days; wrapping_sub stays correct.
        let now = unsafe { GetTickCount() };
        Duration::from_millis(now.wrapping_sub(info.dwTime) as u64)
    }

    fn cursor_position(&self) -> (i32, i32) {
        use windows::Win32::Foundation::POINT;
        use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

        let mut point = POINT { x: 0, y: 0 };
        match unsafe { GetCursorPos(&mut point) } {
            Ok(()) => (point.x, point.y),
            Err(_) => (0, 0),
        }
    }
}

#[cfg(not(windows))]
impl IdleSensor for SystemIdleSensor {
    fn idle_duration(&self) -> Duration {
        Duration::ZERO
    }

    fn cursor_position(&self) -> (i32, i32) {
        (0, 0)
    }
}
