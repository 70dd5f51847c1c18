//! Drives particle systems on a shared tick timer.

use std::time::{Duration, Instant};

use vitrine_core::{TimerId, TimerManager};

use super::particles::ParticleSystem;

/// Interval between particle ticks.
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Owns every live particle system and steps them on one repeating timer.
///
/// The timer is lazy: it starts with the first system and stops as soon as
/// the last system dies, so an idle page schedules nothing.
#[derive(Default)]
pub struct EffectsRunner {
    systems: Vec<Box<dyn ParticleSystem>>,
    tick_timer: Option<TimerId>,
}

impl EffectsRunner {
    /// Create an idle runner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live systems.
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Total live particles across every system.
    pub fn particle_count(&self) -> usize {
        self.systems.iter().map(|s| s.particles().len()).sum()
    }

    /// Whether the tick timer is running.
    pub fn is_ticking(&self) -> bool {
        self.tick_timer.is_some()
    }

    /// Add a system, starting the tick timer if idle.
    pub fn add(
        &mut self,
        system: Box<dyn ParticleSystem>,
        timers: &mut TimerManager,
        now: Instant,
    ) {
        self.systems.push(system);
        if self.tick_timer.is_none() {
            self.tick_timer = Some(timers.start_repeating(now, TICK_INTERVAL));
            tracing::trace!(target: "vitrine::effects", "tick timer started");
        }
    }

    /// Handle a fired timer. Returns `true` when the timer was the tick
    /// timer.
    pub fn on_timer(&mut self, timer: TimerId, timers: &mut TimerManager) -> bool {
        if self.tick_timer != Some(timer) {
            return false;
        }
        self.systems.retain_mut(|system| system.step());
        if self.systems.is_empty()
            && let Some(timer) = self.tick_timer.take()
        {
            let _ = timers.stop(timer);
            tracing::trace!(target: "vitrine::effects", "tick timer stopped");
        }
        true
    }

    /// Drop every system and stop the tick timer.
    pub fn dispose(&mut self, timers: &mut TimerManager) {
        self.systems.clear();
        if let Some(timer) = self.tick_timer.take() {
            let _ = timers.stop(timer);
        }
    }
}
