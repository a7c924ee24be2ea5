mod executor;

pub use executor::{ActionExecutor, ExecutorConfig};

use serde::{Deserialize, Serialize};

/// Rectangular screen area targeted by an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A region of the given size centered on a point
    pub fn around_point(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x: x - width / 2,
            y: y - height / 2,
            width,
            height,
        }
    }

    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

impl ScrollDirection {
    pub fn opposite(self) -> Self {
        match self {
            ScrollDirection::Up => ScrollDirection::Down,
            ScrollDirection::Down => ScrollDirection::Up,
        }
    }

    /// Parse a wire direction string; anything that isn't "up" scrolls down
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("up") {
            ScrollDirection::Up
        } else {
            ScrollDirection::Down
        }
    }
}

/// One semantic step of a plan. Actions are plain data; the executor owns the
/// synthesizer and dispatches on the variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Click {
        target: String,
        region: Option<Region>,
    },
    RightClick {
        target: String,
        region: Option<Region>,
    },
    DoubleClick {
        target: String,
        region: Option<Region>,
    },
    Type {
        target: String,
        region: Option<Region>,
        text: String,
    },
    KeyChord {
        target: String,
        keys: String,
    },
    Drag {
        target: String,
        source: Region,
        dest: Region,
    },
    Scroll {
        target: String,
        region: Option<Region>,
        direction: ScrollDirection,
        amount: i32,
    },
}

/// Backspace presses retained for a typed-text undo; longer strings are only
/// partially reverted.
const TYPE_REVERSE_CAP: usize = 10;

impl Action {
    /// Human-readable label of the UI element this action aims at
    pub fn target(&self) -> &str {
        match self {
            Action::Click { target, .. }
            | Action::RightClick { target, .. }
            | Action::DoubleClick { target, .. }
            | Action::Type { target, .. }
            | Action::KeyChord { target, .. }
            | Action::Drag { target, .. }
            | Action::Scroll { target, .. } => target,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Click { .. } => "click",
            Action::RightClick { .. } => "right_click",
            Action::DoubleClick { .. } => "double_click",
            Action::Type { .. } => "type",
            Action::KeyChord { .. } => "key_chord",
            Action::Drag { .. } => "drag",
            Action::Scroll { .. } => "scroll",
        }
    }

    /// Best-effort inverse of this action, where one exists
    pub fn reverse(&self) -> Option<Action> {
        match self {
            Action::Click { .. }
            | Action::RightClick { .. }
            | Action::DoubleClick { .. }
            | Action::KeyChord { .. } => None,
            Action::Type { target, text, .. } => {
                let count = text.chars().count().min(TYPE_REVERSE_CAP);
                if count == 0 {
                    return None;
                }
                if text.chars().count() > TYPE_REVERSE_CAP {
                    tracing::warn!(
                        "typed text exceeds {TYPE_REVERSE_CAP} characters; undo will be partial"
                    );
                }
                Some(Action::KeyChord {
                    target: target.clone(),
                    keys: vec!["backspace"; count].join("+"),
                })
            }
            Action::Drag {
                target,
                source,
                dest,
            } => Some(Action::Drag {
                target: target.clone(),
                source: *dest,
                dest: *source,
            }),
            Action::Scroll {
                target,
                region,
                direction,
                amount,
            } => Some(Action::Scroll {
                target: target.clone(),
                region: *region,
                direction: direction.opposite(),
                amount: *amount,
            }),
        }
    }
}

/// Ordered, finite sequence of actions. Empty plans are valid but are never
/// executed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionPlan {
    pub actions: Vec<Action>,
}

impl ActionPlan {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
