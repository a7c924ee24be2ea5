use anyhow::{anyhow, Result};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, VIRTUAL_KEY, VK_RETURN,
};

/// Low-level keyboard event dispatch via `SendInput`
pub struct KeyDriver;

impl KeyDriver {
    pub fn new() -> Self {
        Self
    }

    /// Send one character as a unicode key event pair
    pub fn send_unicode(&self, ch: char) -> Result<()> {
        if ch == '\r' || ch == '\n' {
            return self.tap(VK_RETURN.0);
        }

        let code = ch as u32;
        if code > 0xFFFF {
            // Surrogate pairs are not representable as a single scan code
            return Ok(());
        }
        let scan = code as u16;

        let mut inputs = [
            unicode_input(scan, KEYBD_EVENT_FLAGS(0)),
            unicode_input(scan, KEYEVENTF_KEYUP),
        ];
        self.dispatch(&mut inputs)
    }

    pub fn key_down(&self, virtual_key: u16) -> Result<()> {
        self.dispatch(&mut [vk_input(virtual_key, KEYBD_EVENT_FLAGS(0))])
    }

    pub fn key_up(&self, virtual_key: u16) -> Result<()> {
        self.dispatch(&mut [vk_input(virtual_key, KEYEVENTF_KEYUP)])
    }

    /// Press and release a key in one dispatch
    pub fn tap(&self, virtual_key: u16) -> Result<()> {
        let mut inputs = [
            vk_input(virtual_key, KEYBD_EVENT_FLAGS(0)),
            vk_input(virtual_key, KEYEVENTF_KEYUP),
        ];
        self.dispatch(&mut inputs)
    }

    fn dispatch(&self, inputs: &mut [INPUT]) -> Result<()> {
        let sent = unsafe { SendInput(inputs, std::mem::size_of::<INPUT>() as i32) };
        if sent == inputs.len() as u32 {
            Ok(())
        } else {
            Err(anyhow!("SendInput failed to deliver keyboard events"))
        }
    }
}

fn vk_input(virtual_key: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(virtual_key),
                wScan: 0,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

fn unicode_input(scan: u16, extra_flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: scan,
                dwFlags: KEYEVENTF_UNICODE | extra_flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}
