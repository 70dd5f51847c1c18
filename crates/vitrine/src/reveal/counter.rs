//! Count-up animation state for numeric counters.

use std::time::Duration;

use vitrine_core::ElementId;

/// The outcome of one counter tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterStep {
    /// The integer value to display after this tick.
    pub value: u64,
    /// Whether the counter reached its target on this tick.
    pub finished: bool,
}

/// A running count-up from zero toward a target value.
///
/// The displayed value advances linearly: each tick adds
/// `target / (duration / tick_interval)` and the final tick clamps exactly
/// to the target. Values are monotonically non-decreasing.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    element: ElementId,
    target: u64,
    current: f64,
    increment: f64,
}

impl CounterAnimation {
    /// Create a counter animation.
    ///
    /// A zero `duration` or `tick_interval` degenerates to a single clamping
    /// tick rather than dividing by zero.
    pub fn new(element: ElementId, target: u64, duration: Duration, tick_interval: Duration) -> Self {
        let ticks = if tick_interval.is_zero() {
            1.0
        } else {
            (duration.as_secs_f64() / tick_interval.as_secs_f64()).max(1.0)
        };
        Self {
            element,
            target,
            current: 0.0,
            increment: target as f64 / ticks,
        }
    }

    /// The element whose text this counter drives.
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// The target value.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Advance one tick.
    pub fn advance(&mut self) -> CounterStep {
        self.current += self.increment;
        if self.current >= self.target as f64 {
            self.current = self.target as f64;
            CounterStep {
                value: self.target,
                finished: true,
            }
        } else {
            CounterStep {
                value: self.current as u64,
                finished: false,
            }
        }
    }
}

/// Parse a counter target the way the page contract expects: leading ASCII
/// digits after trimming, anything else ignored.
///
/// `"500+"` parses as 500; `"₹10L+"` has no leading digits and yields `None`.
pub fn parse_target(text: &str) -> Option<u64> {
    let trimmed = text.trim_start();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_core::Scene;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn element() -> ElementId {
        Scene::new().create_element("span")
    }

    #[test]
    fn test_converges_exactly_to_target() {
        let mut counter = CounterAnimation::new(element(), 500, ms(2000), ms(16));
        let mut last = 0;
        let mut ticks = 0;
        loop {
            let step = counter.advance();
            assert!(step.value >= last, "monotonically non-decreasing");
            last = step.value;
            ticks += 1;
            if step.finished {
                break;
            }
        }
        assert_eq!(last, 500);
        // 2000 / 16 = 125 ticks to reach the target.
        assert_eq!(ticks, 125);
    }

    #[test]
    fn test_stays_clamped_after_finish() {
        let mut counter = CounterAnimation::new(element(), 10, ms(32), ms(16));
        while !counter.advance().finished {}
        let step = counter.advance();
        assert_eq!(step.value, 10);
        assert!(step.finished);
    }

    #[test]
    fn test_zero_tick_interval_degenerates() {
        let mut counter = CounterAnimation::new(element(), 42, ms(2000), Duration::ZERO);
        let step = counter.advance();
        assert_eq!(step.value, 42);
        assert!(step.finished);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target("500"), Some(500));
        assert_eq!(parse_target("  500+"), Some(500));
        assert_eq!(parse_target("50 events"), Some(50));
        assert_eq!(parse_target("₹10L+"), None);
        assert_eq!(parse_target(""), None);
        assert_eq!(parse_target("soon"), None);
    }
}
