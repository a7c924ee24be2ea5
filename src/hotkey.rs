use std::time::{Duration, Instant};

/// Window within which a second tap turns an approval into a dismissal
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(400);

/// Outcome of feeding one modifier tap into the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapDecision {
    /// First tap seen; approve once the window elapses without a second tap
    Pending,
    /// Second tap inside the window: dismiss
    Double,
}

/// Turns raw modifier taps into approve/dismiss intents. The OS hook feeds
/// `on_tap` and polls `take_matured_tap`; everything here is pure state so
/// the double-tap discrimination is testable without a keyboard.
#[derive(Debug)]
pub struct TapClassifier {
    window: Duration,
    pending_since: Option<Instant>,
}

impl TapClassifier {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending_since: None,
        }
    }

    pub fn on_tap(&mut self, now: Instant) -> TapDecision {
        if let Some(previous) = self.pending_since.take() {
            if now.duration_since(previous) <= self.window {
                return TapDecision::Double;
            }
        }

        self.pending_since = Some(now);
        TapDecision::Pending
    }

    /// True exactly once when a pending single tap has outlived the
    /// double-tap window and should be treated as an approval.
    pub fn take_matured_tap(&mut self, now: Instant) -> bool {
        match self.pending_since {
            Some(previous) if now.duration_since(previous) > self.window => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for TapClassifier {
    fn default() -> Self {
        Self::new(DOUBLE_TAP_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tap_matures_into_approval() {
        let mut taps = TapClassifier::default();
        let start = Instant::now();

        assert_eq!(taps.on_tap(start), TapDecision::Pending);
        assert!(!taps.take_matured_tap(start + Duration::from_millis(100)));
        assert!(taps.take_matured_tap(start + Duration::from_millis(401)));
        // Consumed: a second poll reports nothing
        assert!(!taps.take_matured_tap(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_two_quick_taps_dismiss() {
        let mut taps = TapClassifier::default();
        let start = Instant::now();

        assert_eq!(taps.on_tap(start), TapDecision::Pending);
        assert_eq!(
            taps.on_tap(start + Duration::from_millis(200)),
            TapDecision::Double
        );
        // The pair is consumed; nothing matures later
        assert!(!taps.take_matured_tap(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_slow_second_tap_starts_a_new_sequence() {
        let mut taps = TapClassifier::default();
        let start = Instant::now();

        assert_eq!(taps.on_tap(start), TapDecision::Pending);
        let late = start + Duration::from_millis(600);
        assert_eq!(taps.on_tap(late), TapDecision::Pending);
        assert!(taps.take_matured_tap(late + Duration::from_millis(401)));
    }
}
