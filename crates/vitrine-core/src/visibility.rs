//! Viewport visibility watching.
//!
//! The reveal coordinator never inspects geometry itself; it watches elements
//! through the narrow [`VisibilityWatcher`] seam and reacts to the
//! [`VisibilityEvent`]s the watcher delivers. The production implementation,
//! [`ViewportWatcher`], computes intersection ratios from element rects and
//! the viewport rect and reports threshold crossings. Tests inject their own
//! watcher and deliver events synchronously, duplicates included.

use std::collections::HashMap;

use crate::scene::{ElementId, Rect, Scene};

/// A visibility change delivered for a watched element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityEvent {
    /// The watched element.
    pub element: ElementId,
    /// Whether the element is now at or above its visibility threshold.
    pub visible: bool,
    /// The fraction of the element's area inside the viewport (0.0 to 1.0).
    pub ratio: f32,
}

/// Watches elements for viewport visibility changes.
///
/// `watch` is idempotent per element: watching an already-watched element
/// updates its threshold instead of registering it twice.
pub trait VisibilityWatcher {
    /// Begin watching an element with the given visibility threshold.
    fn watch(&mut self, element: ElementId, threshold: f32);

    /// Stop watching an element. Unknown elements are ignored.
    fn unwatch(&mut self, element: ElementId);

    /// Check whether an element is currently watched.
    fn is_watching(&self, element: ElementId) -> bool;

    /// Stop watching everything.
    fn clear(&mut self);
}

/// Per-element watch state.
#[derive(Debug, Clone, Copy)]
struct WatchEntry {
    /// Minimum intersection ratio to count as visible.
    threshold: f32,
    /// Whether the element was visible at the last poll.
    was_visible: bool,
}

/// Geometry-driven visibility watcher.
///
/// Polled by the stage with the current viewport rectangle; emits one event
/// per watched element whenever that element crosses its threshold in either
/// direction. Elements without a rect (or destroyed elements) are treated as
/// not visible.
#[derive(Debug, Default)]
pub struct ViewportWatcher {
    watched: HashMap<ElementId, WatchEntry>,
}

impl ViewportWatcher {
    /// Create a watcher with no watched elements.
    pub fn new() -> Self {
        Self {
            watched: HashMap::new(),
        }
    }

    /// Number of watched elements.
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Compare every watched element against the viewport and collect
    /// threshold crossings since the previous poll.
    pub fn poll(&mut self, scene: &Scene, viewport: Rect) -> Vec<VisibilityEvent> {
        let mut events = Vec::new();

        for (&element, entry) in self.watched.iter_mut() {
            let ratio = scene
                .rect(element)
                .ok()
                .flatten()
                .map(|rect| rect.intersection_ratio(&viewport))
                .unwrap_or(0.0);

            let visible = ratio >= entry.threshold && ratio > 0.0;
            if visible != entry.was_visible {
                entry.was_visible = visible;
                events.push(VisibilityEvent {
                    element,
                    visible,
                    ratio,
                });
            }
        }

        // HashMap iteration order is unspecified; deliver in a stable order.
        events.sort_by_key(|e| e.element);
        events
    }
}

impl VisibilityWatcher for ViewportWatcher {
    fn watch(&mut self, element: ElementId, threshold: f32) {
        let threshold = threshold.clamp(0.0, 1.0);
        self.watched
            .entry(element)
            .and_modify(|e| e.threshold = threshold)
            .or_insert(WatchEntry {
                threshold,
                was_visible: false,
            });
    }

    fn unwatch(&mut self, element: ElementId) {
        self.watched.remove(&element);
    }

    fn is_watching(&self, element: ElementId) -> bool {
        self.watched.contains_key(&element)
    }

    fn clear(&mut self) {
        self.watched.clear();
    }
}
