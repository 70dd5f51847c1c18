//! Testimonial carousel.
//!
//! A circular slide carousel with wrap-around navigation, autoplay on a
//! repeating timer, and horizontal drag (swipe) navigation. The carousel owns
//! no elements; consumers read [`Carousel::offset_percent`] and apply it to
//! their track element.

use std::sync::Arc;
use std::time::{Duration, Instant};

use vitrine_core::{TimerId, TimerManager};

use crate::analytics::{AnalyticsSink, EventPayload};

/// Default autoplay interval.
pub const DEFAULT_AUTOPLAY_INTERVAL: Duration = Duration::from_secs(5);
/// Minimum horizontal drag distance, in pixels, to count as a swipe.
pub const SWIPE_MIN_DISTANCE: f32 = 50.0;

/// One testimonial slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Testimonial {
    /// The quoted text.
    pub quote: String,
    /// Who said it.
    pub author: String,
    /// The author's role or affiliation.
    pub role: String,
    /// Avatar image location, if any.
    pub image_url: Option<String>,
}

/// A circular carousel over a fixed slide list.
pub struct Carousel {
    slides: Vec<Testimonial>,
    index: usize,
    autoplay_interval: Duration,
    autoplay_timer: Option<TimerId>,
    drag_origin: Option<f32>,
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl Carousel {
    /// Create a carousel showing the first slide.
    pub fn new(slides: Vec<Testimonial>) -> Self {
        Self {
            slides,
            index: 0,
            autoplay_interval: DEFAULT_AUTOPLAY_INTERVAL,
            autoplay_timer: None,
            drag_origin: None,
            sink: None,
        }
    }

    /// Override the autoplay interval. Takes effect on the next
    /// [`start_autoplay`](Self::start_autoplay).
    pub fn set_autoplay_interval(&mut self, interval: Duration) {
        self.autoplay_interval = interval;
    }

    /// Attach an analytics sink.
    pub fn set_analytics(&mut self, sink: Arc<dyn AnalyticsSink>) {
        self.sink = Some(sink);
    }

    /// The slides.
    pub fn slides(&self) -> &[Testimonial] {
        &self.slides
    }

    /// The current slide index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The current slide, if the carousel is non-empty.
    pub fn current(&self) -> Option<&Testimonial> {
        self.slides.get(self.index)
    }

    /// Whether slide `index` is the one showing. Drives indicator and card
    /// active states.
    pub fn is_active(&self, index: usize) -> bool {
        !self.slides.is_empty() && index == self.index
    }

    /// The horizontal track offset for the current index, as a percentage.
    /// Slide `i` sits at `-100 * i`.
    pub fn offset_percent(&self) -> f32 {
        -(self.index as f32) * 100.0
    }

    /// Whether autoplay is running.
    pub fn is_autoplaying(&self) -> bool {
        self.autoplay_timer.is_some()
    }

    /// Advance to the next slide, wrapping at the end.
    pub fn next(&mut self) {
        self.step(1, "next");
    }

    /// Go back one slide, wrapping at the start.
    pub fn prev(&mut self) {
        self.step(-1, "prev");
    }

    /// Jump directly to a slide. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) {
        if index >= self.slides.len() || index == self.index {
            return;
        }
        self.index = index;
        self.track_move("goto");
    }

    fn step(&mut self, direction: isize, label: &str) {
        let len = self.slides.len();
        if len == 0 {
            return;
        }
        self.index = (self.index as isize + direction).rem_euclid(len as isize) as usize;
        self.track_move(label);
    }

    fn track_move(&self, direction: &str) {
        tracing::debug!(target: "vitrine::carousel", index = self.index, direction, "carousel moved");
        if let Some(sink) = &self.sink {
            sink.track(
                "Carousel Moved",
                &EventPayload::new()
                    .with("direction", direction)
                    .with("index", self.index as u64),
            );
        }
    }

    /// Start (or restart) autoplay. An empty carousel never autoplays.
    pub fn start_autoplay(&mut self, timers: &mut TimerManager, now: Instant) {
        self.stop_autoplay(timers);
        if self.slides.len() < 2 {
            return;
        }
        self.autoplay_timer = Some(timers.start_repeating(now, self.autoplay_interval));
    }

    /// Stop autoplay if running.
    pub fn stop_autoplay(&mut self, timers: &mut TimerManager) {
        if let Some(timer) = self.autoplay_timer.take() {
            let _ = timers.stop(timer);
        }
    }

    /// Handle a fired timer. Returns `true` when the timer was the autoplay
    /// timer.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        if self.autoplay_timer == Some(timer) {
            self.step(1, "autoplay");
            true
        } else {
            false
        }
    }

    /// Begin a horizontal drag at the given x position.
    pub fn begin_drag(&mut self, x: f32) {
        self.drag_origin = Some(x);
    }

    /// End a drag at the given x position.
    ///
    /// A drag of at least [`SWIPE_MIN_DISTANCE`] navigates: leftward (toward
    /// negative x) advances, rightward goes back. Shorter drags do nothing.
    /// A swipe restarts the autoplay interval so the next automatic advance
    /// comes a full interval after the interaction.
    pub fn end_drag(&mut self, x: f32, timers: &mut TimerManager, now: Instant) {
        let Some(origin) = self.drag_origin.take() else {
            return;
        };
        let delta = origin - x;
        if delta.abs() < SWIPE_MIN_DISTANCE {
            return;
        }
        if delta > 0.0 {
            self.step(1, "swipe");
        } else {
            self.step(-1, "swipe");
        }
        if self.autoplay_timer.is_some() {
            self.start_autoplay(timers, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slides(n: usize) -> Vec<Testimonial> {
        (0..n)
            .map(|i| Testimonial {
                quote: format!("quote {i}"),
                author: format!("author {i}"),
                role: "attendee".to_string(),
                image_url: None,
            })
            .collect()
    }

    #[test]
    fn test_wraps_both_directions() {
        let mut carousel = Carousel::new(slides(3));
        assert_eq!(carousel.index(), 0);

        carousel.prev();
        assert_eq!(carousel.index(), 2);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 1);
        carousel.next();
        carousel.next();
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_offset_tracks_index() {
        let mut carousel = Carousel::new(slides(4));
        assert_eq!(carousel.offset_percent(), 0.0);
        carousel.go_to(2);
        assert_eq!(carousel.offset_percent(), -200.0);
        assert!(carousel.is_active(2));
        assert!(!carousel.is_active(0));
    }

    #[test]
    fn test_go_to_out_of_range_ignored() {
        let mut carousel = Carousel::new(slides(3));
        carousel.go_to(7);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_empty_carousel_is_inert() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut carousel = Carousel::new(Vec::new());

        carousel.next();
        carousel.prev();
        assert_eq!(carousel.index(), 0);
        assert_eq!(carousel.offset_percent(), 0.0);
        assert!(carousel.current().is_none());

        carousel.start_autoplay(&mut timers, now);
        assert!(!carousel.is_autoplaying());
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_autoplay_advances_every_interval() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut carousel = Carousel::new(slides(3));
        carousel.start_autoplay(&mut timers, now);
        assert!(carousel.is_autoplaying());

        let fired = timers.process_expired(now + Duration::from_secs(5));
        assert_eq!(fired.len(), 1);
        assert!(carousel.on_timer(fired[0]));
        assert_eq!(carousel.index(), 1);

        let fired = timers.process_expired(now + Duration::from_secs(10));
        carousel.on_timer(fired[0]);
        assert_eq!(carousel.index(), 2);

        carousel.stop_autoplay(&mut timers);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_unrelated_timer_not_claimed() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut carousel = Carousel::new(slides(3));
        carousel.start_autoplay(&mut timers, now);

        let other = timers.start_one_shot(now, Duration::from_millis(1));
        assert!(!carousel.on_timer(other));
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_swipe_navigation() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut carousel = Carousel::new(slides(3));

        // Leftward swipe past the threshold advances.
        carousel.begin_drag(300.0);
        carousel.end_drag(240.0, &mut timers, now);
        assert_eq!(carousel.index(), 1);

        // Rightward swipe goes back.
        carousel.begin_drag(100.0);
        carousel.end_drag(180.0, &mut timers, now);
        assert_eq!(carousel.index(), 0);

        // Under the threshold: no navigation.
        carousel.begin_drag(100.0);
        carousel.end_drag(130.0, &mut timers, now);
        assert_eq!(carousel.index(), 0);

        // End without begin is ignored.
        carousel.end_drag(0.0, &mut timers, now);
        assert_eq!(carousel.index(), 0);
    }

    #[test]
    fn test_swipe_restarts_autoplay() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut carousel = Carousel::new(slides(3));
        carousel.start_autoplay(&mut timers, now);

        // Swipe at 4s: the pending 5s fire is replaced by a fresh interval.
        let swipe_at = now + Duration::from_secs(4);
        carousel.begin_drag(200.0);
        carousel.end_drag(100.0, &mut timers, swipe_at);
        assert_eq!(carousel.index(), 1);

        assert!(timers.process_expired(now + Duration::from_secs(5)).is_empty());
        let fired = timers.process_expired(swipe_at + Duration::from_secs(5));
        assert_eq!(fired.len(), 1);
        assert!(carousel.on_timer(fired[0]));
        assert_eq!(carousel.index(), 2);
    }

    #[test]
    fn test_analytics_reports_moves() {
        use crate::analytics::tests_support::RecordingSink;

        let sink = Arc::new(RecordingSink::default());
        let mut carousel = Carousel::new(slides(3));
        carousel.set_analytics(sink.clone());

        carousel.next();
        carousel.go_to(0);

        let events = sink.events.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0, "Carousel Moved");
        assert_eq!(events[0].1.get("direction"), Some(&"next".into()));
        assert_eq!(events[1].1.get("direction"), Some(&"goto".into()));
    }
}
