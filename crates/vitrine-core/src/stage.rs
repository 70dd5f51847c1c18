//! The per-page runtime.
//!
//! A [`Stage`] owns everything a page's interactivity layer mutates: the
//! scene, the timer manager, the frame queue, and the viewport state. All
//! page-wide mutable state hangs off one stage instance constructed at page
//! load and dropped at teardown, so multiple stages (for example in tests)
//! never interfere with each other.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use vitrine_core::Stage;
//!
//! let mut stage = Stage::new(800.0, 600.0);
//! let now = Instant::now();
//! let id = stage.timers_mut().start_one_shot(now, Duration::from_millis(100));
//!
//! let fired = stage.tick(now + Duration::from_millis(100));
//! assert_eq!(fired, vec![id]);
//! ```

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::frame::FrameQueue;
use crate::scene::{Rect, Scene};
use crate::timer::{TimerId, TimerManager};

/// Owns the scene, timers, frame queue, and viewport for one page.
pub struct Stage {
    scene: Scene,
    timers: TimerManager,
    frames: FrameQueue,
    viewport: Rect,
    scroll_y: f32,
}

impl Stage {
    /// Create a stage with the given viewport size.
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            scene: Scene::new(),
            timers: TimerManager::new(),
            frames: FrameQueue::new(),
            viewport: Rect::new(0.0, 0.0, viewport_width, viewport_height),
            scroll_y: 0.0,
        }
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The timer manager, mutably.
    pub fn timers_mut(&mut self) -> &mut TimerManager {
        &mut self.timers
    }

    /// The timer manager.
    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    /// The frame queue, mutably.
    pub fn frames_mut(&mut self) -> &mut FrameQueue {
        &mut self.frames
    }

    /// The viewport rectangle (origin plus size).
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Current vertical scroll offset in pixels.
    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Record a scroll position change.
    pub fn set_scroll_y(&mut self, scroll_y: f32) {
        self.scroll_y = scroll_y.max(0.0);
    }

    /// Split borrows for callers that need the scene and timers together.
    pub fn scene_and_timers(&mut self) -> (&mut Scene, &mut TimerManager) {
        (&mut self.scene, &mut self.timers)
    }

    /// Advance the stage to `now`.
    ///
    /// Fires due timers (returning their IDs for the owner to route) and then
    /// runs the frame queue. Timer handlers typically queue frame callbacks,
    /// which therefore run within the same tick.
    pub fn tick(&mut self, now: Instant) -> Vec<TimerId> {
        let fired = self.timers.process_expired(now);
        self.frames.run_frame(&mut self.scene);
        fired
    }

    /// Drop all pending timers and frame callbacks.
    ///
    /// Called at page teardown so nothing mutates the scene afterwards.
    pub fn shutdown(&mut self) {
        self.timers.clear();
        self.frames.clear();
        tracing::debug!(target: "vitrine_core::stage", "stage shut down");
    }
}

/// A cloneable, thread-safe handle to a stage.
///
/// The runtime itself is single-threaded; this wrapper only exists so a
/// stage can be handed to callbacks that require `'static` ownership.
#[derive(Clone)]
pub struct SharedStage {
    inner: Arc<Mutex<Stage>>,
}

impl SharedStage {
    /// Wrap a stage in a shared handle.
    pub fn new(stage: Stage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stage)),
        }
    }

    /// Run a closure with exclusive access to the stage.
    pub fn with<R>(&self, f: impl FnOnce(&mut Stage) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Advance the stage to `now`.
    pub fn tick(&self, now: Instant) -> Vec<TimerId> {
        self.inner.lock().tick(now)
    }
}
