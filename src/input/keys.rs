/// Parse a `+`-separated chord spec (e.g. `ctrl+shift+s`) into canonical key
/// tokens. Unknown tokens are skipped with a warning; aliases normalize to a
/// single spelling so the platform lookup stays simple.
pub fn parse_chord(spec: &str) -> Vec<String> {
    spec.split('+')
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match normalize(&token) {
            Some(canonical) => Some(canonical),
            None => {
                tracing::warn!("unknown key token skipped: {token}");
                None
            }
        })
        .collect()
}

fn normalize(token: &str) -> Option<String> {
    let canonical = match token {
        "control" => "ctrl",
        "return" => "enter",
        "escape" => "esc",
        "del" => "delete",
        "ins" => "insert",
        "meta" | "super" => "win",
        "pgup" => "pageup",
        "pgdown" | "pgdn" => "pagedown",
        "arrowup" => "up",
        "arrowdown" => "down",
        "arrowleft" => "left",
        "arrowright" => "right",
        _ => token,
    };

    if is_known(canonical) {
        Some(canonical.to_string())
    } else {
        None
    }
}

fn is_known(token: &str) -> bool {
    matches!(
        token,
        "ctrl" | "alt" | "shift" | "win" | "enter" | "tab" | "esc" | "backspace" | "delete"
            | "insert" | "home" | "end" | "pageup" | "pagedown" | "up" | "down" | "left"
            | "right" | "space"
    ) || is_function_key(token)
        || is_character_key(token)
}

fn is_function_key(token: &str) -> bool {
    token
        .strip_prefix('f')
        .and_then(|digits| digits.parse::<u8>().ok())
        .is_some_and(|n| (1..=12).contains(&n))
        && token.len() > 1
}

fn is_character_key(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 1 && (bytes[0].is_ascii_lowercase() || bytes[0].is_ascii_digit())
}

/// Map a canonical token to its Windows virtual-key code
#[cfg(windows)]
pub fn virtual_key(token: &str) -> Option<u16> {
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        VK_BACK, VK_CONTROL, VK_DELETE, VK_DOWN, VK_END, VK_ESCAPE, VK_F1, VK_HOME, VK_INSERT,
        VK_LEFT, VK_LWIN, VK_MENU, VK_NEXT, VK_PRIOR, VK_RETURN, VK_RIGHT, VK_SHIFT, VK_SPACE,
        VK_TAB, VK_UP,
    };

    let vk = match token {
        "ctrl" => VK_CONTROL.0,
        "alt" => VK_MENU.0,
        "shift" => VK_SHIFT.0,
        "win" => VK_LWIN.0,
        "enter" => VK_RETURN.0,
        "tab" => VK_TAB.0,
        "esc" => VK_ESCAPE.0,
        "backspace" => VK_BACK.0,
        "delete" => VK_DELETE.0,
        "insert" => VK_INSERT.0,
        "home" => VK_HOME.0,
        "end" => VK_END.0,
        "pageup" => VK_PRIOR.0,
        "pagedown" => VK_NEXT.0,
        "up" => VK_UP.0,
        "down" => VK_DOWN.0,
        "left" => VK_LEFT.0,
        "right" => VK_RIGHT.0,
        "space" => VK_SPACE.0,
        _ => {
            let bytes = token.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii_lowercase() {
                // Letter virtual keys match uppercase ASCII
                bytes[0].to_ascii_uppercase() as u16
            } else if bytes.len() == 1 && bytes[0].is_ascii_digit() {
                bytes[0] as u16
            } else if let Some(n) = token
                .strip_prefix('f')
                .and_then(|digits| digits.parse::<u16>().ok())
            {
                if (1..=12).contains(&n) {
                    VK_F1.0 + n - 1
                } else {
                    return None;
                }
            } else {
                return None;
            }
        }
    };

    Some(vk)
}
