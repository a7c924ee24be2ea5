use super::types::{CloudAction, Coordinates, Prediction};
use crate::action::{Action, ActionPlan, Region, ScrollDirection};

/// Synthetic target size used when the service supplies a bare point
const TARGET_WIDTH: i32 = 50;
const TARGET_HEIGHT: i32 = 30;

const DEFAULT_TARGET: &str = "UI element";
const DEFAULT_SCROLL_AMOUNT: i32 = 3;

/// Normalize a prediction into an executable plan. Entries that cannot be
/// translated are dropped with a warning; the remaining plan stays valid.
pub fn translate(prediction: &Prediction) -> ActionPlan {
    if let Some(entries) = &prediction.actions {
        return translate_entries(entries);
    }

    if let (Some(verb), Some(coords)) = (&prediction.action, &prediction.coordinates) {
        return translate_legacy(verb, coords, prediction.suggestion.as_deref());
    }

    ActionPlan::default()
}

/// Back-compat single-action shape: one step aimed at a synthetic region
/// centered on the supplied coordinates.
fn translate_legacy(verb: &str, coords: &Coordinates, suggestion: Option<&str>) -> ActionPlan {
    let target = suggestion.unwrap_or(DEFAULT_TARGET).to_string();
    let region = Some(Region::around_point(
        coords.x,
        coords.y,
        TARGET_WIDTH,
        TARGET_HEIGHT,
    ));

    let action = match verb.to_ascii_uppercase().as_str() {
        "CLICK" => Action::Click { target, region },
        "RIGHT_CLICK" => Action::RightClick { target, region },
        "DOUBLE_CLICK" => Action::DoubleClick { target, region },
        "TYPE" => Action::Type {
            target,
            region,
            text: String::new(),
        },
        "SCROLL_UP" => Action::Scroll {
            target,
            region,
            direction: ScrollDirection::Up,
            amount: DEFAULT_SCROLL_AMOUNT,
        },
        "SCROLL_DOWN" => Action::Scroll {
            target,
            region,
            direction: ScrollDirection::Down,
            amount: DEFAULT_SCROLL_AMOUNT,
        },
        other => {
            tracing::warn!("unknown action verb '{other}', falling back to click");
            Action::Click { target, region }
        }
    };

    ActionPlan::new(vec![action])
}

fn translate_entries(entries: &[CloudAction]) -> ActionPlan {
    let mut actions = Vec::with_capacity(entries.len());

    for entry in entries {
        let region = entry_region(entry);
        let target = entry
            .target
            .clone()
            .unwrap_or_else(|| DEFAULT_TARGET.to_string());

        match entry.kind.to_ascii_lowercase().as_str() {
            "click" => actions.push(Action::Click { target, region }),
            "right_click" => actions.push(Action::RightClick { target, region }),
            "double_click" => actions.push(Action::DoubleClick { target, region }),
            "type" => actions.push(Action::Type {
                target,
                region,
                text: entry.text.clone().unwrap_or_default(),
            }),
            "key" => actions.push(Action::KeyChord {
                target,
                keys: entry.keys.clone().unwrap_or_default(),
            }),
            "drag" => match (entry.source_region, entry.target_region) {
                (Some(source), Some(dest)) => actions.push(Action::Drag {
                    target,
                    source,
                    dest,
                }),
                _ => {
                    tracing::warn!("drag entry missing source or target region, dropped");
                }
            },
            "scroll" => actions.push(Action::Scroll {
                target,
                region,
                direction: ScrollDirection::parse(entry.direction.as_deref().unwrap_or("down")),
                amount: entry.amount.unwrap_or(DEFAULT_SCROLL_AMOUNT),
            }),
            other => {
                tracing::warn!("unknown action type '{other}', dropped");
            }
        }
    }

    ActionPlan::new(actions)
}

/// A bare point wins over an explicit region; absent both, the step carries
/// no region and executes as a no-op.
fn entry_region(entry: &CloudAction) -> Option<Region> {
    match (entry.x, entry.y) {
        (Some(x), Some(y)) => Some(Region::around_point(x, y, TARGET_WIDTH, TARGET_HEIGHT)),
        _ => entry.region,
    }
}
