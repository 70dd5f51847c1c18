//! Countdown to the event date.
//!
//! [`Countdown`] is the pure time math: remaining days/hours/minutes/seconds
//! to a target instant, clamped at zero. [`CountdownTicker`] drives four
//! display elements from a one-second repeating timer and pulses each unit
//! whose value changed, staggered left to right.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use vitrine_core::{ElementId, Scene, TimerId, TimerManager, Transform};

/// Interval between countdown display updates.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Stagger between pulses of adjacent units.
pub const PULSE_STAGGER: Duration = Duration::from_millis(50);
/// How long a unit stays scaled up during a pulse.
pub const PULSE_DURATION: Duration = Duration::from_millis(150);
/// Scale applied at the peak of a pulse.
pub const PULSE_SCALE: f32 = 1.05;

/// Time remaining until a target, split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    /// Whether the target has been reached.
    pub fn is_zero(&self) -> bool {
        *self == TimeLeft::default()
    }

    /// The unit values in display order (days first).
    pub fn units(&self) -> [i64; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }
}

/// Countdown math toward a fixed target instant.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    target: DateTime<Utc>,
}

impl Countdown {
    /// Create a countdown toward `target`.
    pub fn new(target: DateTime<Utc>) -> Self {
        Self { target }
    }

    /// The target instant.
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Time remaining at `now`. Past targets yield all zeros, never
    /// negative values.
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeLeft {
        let total = self.target.signed_duration_since(now).num_seconds().max(0);
        TimeLeft {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }

    /// Whether `now` is at or past the target.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.target
    }
}

/// Format a unit value as at least two digits.
pub fn pad2(value: i64) -> String {
    format!("{value:02}")
}

/// The display elements a ticker writes into, in days/hours/minutes/seconds
/// order. Missing elements are skipped silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownDisplays {
    pub days: Option<ElementId>,
    pub hours: Option<ElementId>,
    pub minutes: Option<ElementId>,
    pub seconds: Option<ElementId>,
}

impl CountdownDisplays {
    fn units(&self) -> [Option<ElementId>; 4] {
        [self.days, self.hours, self.minutes, self.seconds]
    }
}

/// One step of a unit pulse.
#[derive(Debug, Clone, Copy)]
enum PulseStep {
    /// Scale the element up, then schedule the release.
    Up(ElementId),
    /// Return the element to the identity transform.
    Down(ElementId),
}

/// Drives countdown display elements from a repeating timer.
pub struct CountdownTicker {
    countdown: Countdown,
    displays: CountdownDisplays,
    tick_timer: Option<TimerId>,
    pulses: HashMap<TimerId, PulseStep>,
    last: Option<TimeLeft>,
}

impl CountdownTicker {
    /// Create a ticker for the given target and display elements.
    pub fn new(target: DateTime<Utc>, displays: CountdownDisplays) -> Self {
        Self {
            countdown: Countdown::new(target),
            displays,
            tick_timer: None,
            pulses: HashMap::new(),
            last: None,
        }
    }

    /// The underlying countdown.
    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    /// Whether the ticker's repeating timer is running.
    pub fn is_running(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Start ticking and render the initial values immediately.
    pub fn start(
        &mut self,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
        wall: DateTime<Utc>,
    ) {
        self.stop(timers);
        self.render(scene, timers, now, wall);
        if !self.countdown.is_expired(wall) {
            self.tick_timer = Some(timers.start_repeating(now, TICK_INTERVAL));
        }
    }

    /// Stop ticking and cancel pending pulses.
    pub fn stop(&mut self, timers: &mut TimerManager) {
        if let Some(timer) = self.tick_timer.take() {
            let _ = timers.stop(timer);
        }
        for (&timer, _) in self.pulses.iter() {
            let _ = timers.stop(timer);
        }
        self.pulses.clear();
    }

    /// Handle a fired timer. Returns `true` when the timer belonged to this
    /// ticker.
    pub fn on_timer(
        &mut self,
        timer: TimerId,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
        wall: DateTime<Utc>,
    ) -> bool {
        if self.tick_timer == Some(timer) {
            self.render(scene, timers, now, wall);
            if self.countdown.is_expired(wall) {
                // The display is pinned at zero; nothing left to tick.
                if let Some(timer) = self.tick_timer.take() {
                    let _ = timers.stop(timer);
                }
                tracing::debug!(target: "vitrine::countdown", "countdown expired");
            }
            return true;
        }

        if let Some(step) = self.pulses.remove(&timer) {
            match step {
                PulseStep::Up(element) => {
                    scene.set_transform(
                        element,
                        Transform {
                            scale: PULSE_SCALE,
                            ..Transform::IDENTITY
                        },
                    );
                    let release = timers.start_one_shot(now, PULSE_DURATION);
                    self.pulses.insert(release, PulseStep::Down(element));
                }
                PulseStep::Down(element) => {
                    scene.set_transform(element, Transform::IDENTITY);
                }
            }
            return true;
        }

        false
    }

    /// Write the current values into the displays, pulsing changed units.
    fn render(
        &mut self,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
        wall: DateTime<Utc>,
    ) {
        let left = self.countdown.remaining(wall);
        let previous = self.last.replace(left);

        for (index, (element, value)) in self
            .displays
            .units()
            .into_iter()
            .zip(left.units())
            .enumerate()
        {
            let Some(element) = element else {
                continue;
            };
            let changed = previous.is_none_or(|p| p.units()[index] != value);
            if !changed {
                continue;
            }
            scene.set_text(element, pad2(value));
            // Changed units pulse left to right, 50 ms apart.
            let start = timers.start_one_shot(now, PULSE_STAGGER * index as u32);
            self.pulses.insert(start, PulseStep::Up(element));
        }
    }
}
