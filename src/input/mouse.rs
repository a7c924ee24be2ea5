use anyhow::{anyhow, Result};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_MOUSE, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP,
    MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL, MOUSEINPUT,
    MOUSE_EVENT_FLAGS,
};
use windows::Win32::UI::WindowsAndMessaging::SetCursorPos;

#[derive(Debug, Clone, Copy)]
pub enum MouseButton {
    Left,
    Right,
}

/// Low-level mouse event dispatch via `SendInput`
pub struct MouseDriver;

impl MouseDriver {
    pub fn new() -> Self {
        Self
    }

    pub fn move_to(&self, x: i32, y: i32) -> Result<()> {
        unsafe { SetCursorPos(x, y) }.map_err(|err| anyhow!("SetCursorPos failed: {err:?}"))
    }

    /// Press/release pair at the current cursor position
    pub fn button_click(&self, button: MouseButton) -> Result<()> {
        let (down_flag, up_flag) = match button {
            MouseButton::Left => (MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP),
            MouseButton::Right => (MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP),
        };

        let mut inputs = [mouse_input(down_flag, 0), mouse_input(up_flag, 0)];
        self.dispatch(&mut inputs)
    }

    pub fn press_primary(&self) -> Result<()> {
        self.dispatch(&mut [mouse_input(MOUSEEVENTF_LEFTDOWN, 0)])
    }

    pub fn release_primary(&self) -> Result<()> {
        self.dispatch(&mut [mouse_input(MOUSEEVENTF_LEFTUP, 0)])
    }

    /// Wheel event; one notch is 120 units, sign selects the direction
    pub fn wheel(&self, amount: i32) -> Result<()> {
        self.dispatch(&mut [mouse_input(MOUSEEVENTF_WHEEL, (amount * 120) as u32)])
    }

    fn dispatch(&self, inputs: &mut [INPUT]) -> Result<()> {
        let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent == inputs.len() as u32 {
            Ok(())
        } else {
            Err(anyhow!("SendInput failed for mouse operation"))
        }
    }
}

fn mouse_input(flags: MOUSE_EVENT_FLAGS, mouse_data: u32) -> INPUT {
    INPUT {
        r#type: INPUT_MOUSE,
        Anonymous: INPUT_0 {
            mi: MOUSEINPUT {
                dx: 0,
                dy: 0,
                mouseData: mouse_data,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}
