//! Next-frame callback queue.
//!
//! Deferring work "to the next rendering opportunity" lets a mutation take
//! effect after the current state has been observed, the same way page code
//! defers style changes to the next animation frame. Each frame drains only
//! the batch that was queued before it began.

use std::collections::VecDeque;

use crate::scene::Scene;

/// A unique identifier for a queued frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameCallbackId(u64);

impl FrameCallbackId {
    /// Get the raw u64 value of this callback ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A boxed frame callback.
type BoxedFrameCallback = Box<dyn FnOnce(&mut Scene)>;

/// Internal callback data.
struct FrameCallbackData {
    id: FrameCallbackId,
    callback: BoxedFrameCallback,
}

/// Queue of callbacks to run on the next frame.
#[derive(Default)]
pub struct FrameQueue {
    /// Pending callbacks in request order.
    callbacks: VecDeque<FrameCallbackData>,
    /// Next callback ID to hand out.
    next_id: u64,
}

impl FrameQueue {
    /// Create an empty frame queue.
    pub fn new() -> Self {
        Self {
            callbacks: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Queue a callback for the next frame.
    ///
    /// Returns an ID that can be used to cancel the callback before it runs.
    pub fn request(&mut self, callback: impl FnOnce(&mut Scene) + 'static) -> FrameCallbackId {
        let id = FrameCallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push_back(FrameCallbackData {
            id,
            callback: Box::new(callback),
        });
        id
    }

    /// Cancel a queued callback.
    ///
    /// Returns `true` if the callback was still pending.
    pub fn cancel(&mut self, id: FrameCallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|c| c.id != id);
        self.callbacks.len() != before
    }

    /// Run every callback queued before this frame began, in request order.
    ///
    /// Callbacks queued by the callbacks themselves run on the next frame.
    /// Returns the number of callbacks executed.
    pub fn run_frame(&mut self, scene: &mut Scene) -> usize {
        let batch = self.callbacks.len();
        for _ in 0..batch {
            let Some(data) = self.callbacks.pop_front() else {
                break;
            };
            (data.callback)(scene);
        }
        batch
    }

    /// Number of callbacks currently queued.
    pub fn pending_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Drop every queued callback without running it.
    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_request_order() {
        let mut queue = FrameQueue::new();
        let mut scene = Scene::new();
        let el = scene.create_element("div");

        queue.request(move |s| s.set_text(el, "first"));
        queue.request(move |s| {
            let text = s.text(el).unwrap().to_string();
            s.set_text(el, format!("{text},second"));
        });

        assert_eq!(queue.run_frame(&mut scene), 2);
        assert_eq!(scene.text(el).unwrap(), "first,second");
        assert_eq!(queue.pending_count(), 0);
    }

    #[test]
    fn test_cancel() {
        let mut queue = FrameQueue::new();
        let mut scene = Scene::new();
        let el = scene.create_element("div");

        let id = queue.request(move |s| s.set_text(el, "should not run"));
        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));

        queue.run_frame(&mut scene);
        assert_eq!(scene.text(el).unwrap(), "");
    }

    #[test]
    fn test_each_frame_drains_its_own_batch() {
        let mut queue = FrameQueue::new();
        let mut scene = Scene::new();
        let ran = Rc::new(Cell::new(0u32));

        let r = ran.clone();
        queue.request(move |_| r.set(r.get() + 1));
        assert_eq!(queue.run_frame(&mut scene), 1);

        let r = ran.clone();
        queue.request(move |_| r.set(r.get() + 1));
        assert_eq!(queue.pending_count(), 1);
        assert_eq!(queue.run_frame(&mut scene), 1);
        assert_eq!(ran.get(), 2);
    }

    #[test]
    fn test_clear() {
        let mut queue = FrameQueue::new();
        let mut scene = Scene::new();
        let el = scene.create_element("div");
        queue.request(move |s| s.set_text(el, "x"));
        queue.clear();
        assert_eq!(queue.run_frame(&mut scene), 0);
        assert_eq!(scene.text(el).unwrap(), "");
    }
}
