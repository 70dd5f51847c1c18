//! Scroll reveal coordination.
//!
//! The coordinator scans the scene for reveal markers, registers each marked
//! element with a [`VisibilityWatcher`], and reacts to visibility events by
//! starting reveal animations, staggered child reveals, or count-up counters.
//! Every element animates at most once per coordinator lifetime; re-entering
//! the viewport never replays a reveal.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use vitrine_core::{ElementId, Scene, TimerId, TimerManager, VisibilityEvent, VisibilityWatcher};

use crate::analytics::{AnalyticsSink, EventPayload};
use crate::animation::{Easing, RevealKind};

use super::counter::{CounterAnimation, parse_target};

/// Marker attribute for single-element reveals.
pub const REVEAL_ATTR: &str = "data-reveal";
/// Optional per-element reveal delay, in milliseconds.
pub const REVEAL_DELAY_ATTR: &str = "data-reveal-delay";
/// Marker attribute for staggered child reveals. The value, when present and
/// well-formed, overrides the default per-child delay in milliseconds.
pub const STAGGER_ATTR: &str = "data-stagger";
/// Optional counter target override; falls back to the element's text.
pub const TARGET_ATTR: &str = "data-target";
/// Classes that mark an element as a count-up counter.
pub const COUNTER_CLASSES: [&str; 2] = ["stat-number", "countdown-number"];
/// Class added once a reveal animation completes.
pub const REVEALED_CLASS: &str = "revealed";

/// Visibility threshold for single reveals.
pub const SIMPLE_THRESHOLD: f32 = 0.1;
/// Visibility threshold for stagger containers.
pub const STAGGER_THRESHOLD: f32 = 0.2;
/// Visibility threshold for counters.
pub const COUNTER_THRESHOLD: f32 = 0.5;

/// Tunable timing for the coordinator.
#[derive(Debug, Clone, Copy)]
pub struct RevealOptions {
    /// Duration of a reveal animation.
    pub reveal_duration: Duration,
    /// Easing curve applied to reveal progress.
    pub reveal_easing: Easing,
    /// Default per-child delay for staggered reveals.
    pub stagger_delay: Duration,
    /// Total duration of a counter count-up.
    pub counter_duration: Duration,
    /// Interval between counter ticks.
    pub counter_tick: Duration,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            reveal_duration: Duration::from_millis(800),
            reveal_easing: Easing::EaseOut,
            stagger_delay: Duration::from_millis(100),
            counter_duration: Duration::from_millis(2000),
            counter_tick: Duration::from_millis(16),
        }
    }
}

/// Which marker put an element under watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Simple,
    Stagger,
    Counter,
}

/// A reveal currently interpolating toward its final style.
#[derive(Debug, Clone, Copy)]
struct ActiveReveal {
    kind: RevealKind,
    started: Instant,
}

/// A reveal waiting on its delay timer.
#[derive(Debug, Clone, Copy)]
struct DelayedReveal {
    element: ElementId,
    kind: RevealKind,
}

/// Coordinates scroll-triggered reveals, staggers, and counters.
pub struct RevealCoordinator {
    options: RevealOptions,
    /// Marker category per scanned element.
    markers: HashMap<ElementId, Marker>,
    /// Elements whose animation has been triggered. Membership is permanent
    /// for the coordinator's lifetime; this is what makes reveals one-shot.
    animated: HashSet<ElementId>,
    active: HashMap<ElementId, ActiveReveal>,
    delayed: HashMap<TimerId, DelayedReveal>,
    counters: HashMap<TimerId, CounterAnimation>,
    sink: Option<Arc<dyn AnalyticsSink>>,
    disposed: bool,
}

impl RevealCoordinator {
    /// Create a coordinator with the given timing options.
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            markers: HashMap::new(),
            animated: HashSet::new(),
            active: HashMap::new(),
            delayed: HashMap::new(),
            counters: HashMap::new(),
            sink: None,
            disposed: false,
        }
    }

    /// Attach an analytics sink.
    pub fn set_analytics(&mut self, sink: Arc<dyn AnalyticsSink>) {
        self.sink = Some(sink);
    }

    /// Number of elements currently mid-reveal.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether an element has already been triggered.
    pub fn is_animated(&self, element: ElementId) -> bool {
        self.animated.contains(&element)
    }

    /// Scan the scene for reveal markers and register each marked element
    /// with the watcher.
    ///
    /// Scanning is idempotent: elements already registered are skipped, so a
    /// re-scan after the scene grows only picks up the new elements.
    pub fn scan(&mut self, scene: &Scene, watcher: &mut dyn VisibilityWatcher) {
        for element in scene.document_order() {
            if self.markers.contains_key(&element) {
                continue;
            }
            let marker = if scene.has_attribute(element, REVEAL_ATTR) {
                Marker::Simple
            } else if scene.has_attribute(element, STAGGER_ATTR) {
                Marker::Stagger
            } else if COUNTER_CLASSES.iter().any(|c| scene.has_class(element, c)) {
                Marker::Counter
            } else {
                continue;
            };
            let threshold = match marker {
                Marker::Simple => SIMPLE_THRESHOLD,
                Marker::Stagger => STAGGER_THRESHOLD,
                Marker::Counter => COUNTER_THRESHOLD,
            };
            watcher.watch(element, threshold);
            self.markers.insert(element, marker);
            tracing::trace!(target: "vitrine::reveal", ?element, ?marker, "element registered");
        }
    }

    /// React to a visibility event.
    ///
    /// Only entry events for registered, not-yet-animated elements do
    /// anything; exits and duplicate entries are ignored.
    pub fn on_visibility(
        &mut self,
        event: VisibilityEvent,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
    ) {
        if self.disposed || !event.visible {
            return;
        }
        let Some(&marker) = self.markers.get(&event.element) else {
            return;
        };
        if self.animated.contains(&event.element) {
            tracing::trace!(target: "vitrine::reveal", element = ?event.element, "already animated, ignoring");
            return;
        }

        match marker {
            Marker::Simple => self.trigger_simple(event.element, scene, timers, now),
            Marker::Stagger => self.trigger_stagger(event.element, scene, timers, now),
            Marker::Counter => self.trigger_counter(event.element, scene, timers, now),
        }
    }

    fn trigger_simple(
        &mut self,
        element: ElementId,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
    ) {
        // Mark before anything async so a duplicate event cannot re-trigger.
        self.animated.insert(element);

        let kind = RevealKind::parse(scene.attribute(element, REVEAL_ATTR).ok().flatten().unwrap_or(""));
        let delay = attr_millis(scene, element, REVEAL_DELAY_ATTR).unwrap_or(Duration::ZERO);

        if delay.is_zero() {
            self.begin_reveal(element, kind, scene, now);
        } else {
            let timer = timers.start_one_shot(now, delay);
            self.delayed.insert(timer, DelayedReveal { element, kind });
        }
    }

    fn trigger_stagger(
        &mut self,
        parent: ElementId,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
    ) {
        self.animated.insert(parent);

        let delay = attr_millis(scene, parent, STAGGER_ATTR).unwrap_or(self.options.stagger_delay);
        let children: Vec<ElementId> = match scene.children(parent) {
            Ok(children) => children.to_vec(),
            Err(_) => return,
        };

        for (index, child) in children.into_iter().enumerate() {
            if !self.animated.insert(child) {
                continue;
            }
            // The first child gets a zero-delay timer so every child starts
            // through the same path.
            let timer = timers.start_one_shot(now, delay * index as u32);
            self.delayed.insert(
                timer,
                DelayedReveal {
                    element: child,
                    kind: RevealKind::FadeUp,
                },
            );
        }
    }

    fn trigger_counter(
        &mut self,
        element: ElementId,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
    ) {
        self.animated.insert(element);

        let target = scene
            .attribute(element, TARGET_ATTR)
            .ok()
            .flatten()
            .and_then(parse_target)
            .or_else(|| scene.text(element).ok().and_then(parse_target));

        let Some(target) = target.filter(|&t| t > 0) else {
            // No usable target: leave the element's text alone.
            tracing::debug!(target: "vitrine::reveal", ?element, "counter has no numeric target, skipping");
            return;
        };

        let timer = timers.start_repeating(now, self.options.counter_tick);
        self.counters.insert(
            timer,
            CounterAnimation::new(element, target, self.options.counter_duration, self.options.counter_tick),
        );
        scene.set_text(element, "0");
        tracing::debug!(target: "vitrine::reveal", ?element, target, "counter started");
    }

    fn begin_reveal(&mut self, element: ElementId, kind: RevealKind, scene: &mut Scene, now: Instant) {
        if !scene.contains(element) {
            tracing::trace!(target: "vitrine::reveal", ?element, "element gone before reveal began");
            return;
        }
        let hidden = kind.hidden_style();
        scene.set_opacity(element, hidden.opacity);
        scene.set_transform(element, hidden.transform);
        self.active.insert(element, ActiveReveal { kind, started: now });

        if let Some(sink) = &self.sink {
            sink.track(
                "Element Revealed",
                &EventPayload::new().with("kind", format!("{kind:?}")),
            );
        }
    }

    /// Handle a fired timer. Returns `true` when the timer belonged to this
    /// coordinator.
    pub fn on_timer(
        &mut self,
        timer: TimerId,
        scene: &mut Scene,
        timers: &mut TimerManager,
        now: Instant,
    ) -> bool {
        if let Some(delayed) = self.delayed.remove(&timer) {
            self.begin_reveal(delayed.element, delayed.kind, scene, now);
            return true;
        }

        if let Some(counter) = self.counters.get_mut(&timer) {
            let element = counter.element();
            let step = counter.advance();
            scene.set_text(element, step.value.to_string());
            if step.finished {
                let _ = timers.stop(timer);
                self.counters.remove(&timer);
                tracing::debug!(target: "vitrine::reveal", ?element, "counter finished");
            }
            return true;
        }

        false
    }

    /// Advance every active reveal to `now` and write the interpolated styles
    /// into the scene. Completed reveals get the [`REVEALED_CLASS`] class.
    pub fn update(&mut self, now: Instant, scene: &mut Scene) {
        let duration = self.options.reveal_duration;
        let easing = self.options.reveal_easing;

        self.active.retain(|&element, reveal| {
            if !scene.contains(element) {
                return false;
            }
            let elapsed = now.saturating_duration_since(reveal.started);
            let progress = if duration.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
            };
            let style = reveal.kind.style_at(easing, progress);
            scene.set_opacity(element, style.opacity);
            scene.set_transform(element, style.transform);

            if progress >= 1.0 {
                scene.add_class(element, REVEALED_CLASS);
                false
            } else {
                true
            }
        });
    }

    /// Tear down: unwatch every registered element, cancel outstanding
    /// timers, and forget all state. Safe to call more than once.
    pub fn dispose(&mut self, watcher: &mut dyn VisibilityWatcher, timers: &mut TimerManager) {
        if self.disposed {
            return;
        }
        for &element in self.markers.keys() {
            watcher.unwatch(element);
        }
        for &timer in self.delayed.keys() {
            let _ = timers.stop(timer);
        }
        for &timer in self.counters.keys() {
            let _ = timers.stop(timer);
        }
        self.markers.clear();
        self.animated.clear();
        self.active.clear();
        self.delayed.clear();
        self.counters.clear();
        self.disposed = true;
        tracing::debug!(target: "vitrine::reveal", "coordinator disposed");
    }
}

impl Default for RevealCoordinator {
    fn default() -> Self {
        Self::new(RevealOptions::default())
    }
}

/// Read a millisecond attribute. Absent or malformed values yield `None`.
fn attr_millis(scene: &Scene, element: ElementId, name: &str) -> Option<Duration> {
    scene
        .attribute(element, name)
        .ok()
        .flatten()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
}
