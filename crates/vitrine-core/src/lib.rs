//! Core runtime for Vitrine.
//!
//! This crate provides the foundational pieces of the Vitrine interactivity
//! toolkit:
//!
//! - **Scene Model**: Slotmap-backed element tree with attributes, classes,
//!   text, style, and layout rectangles
//! - **Timers**: One-shot and repeating timers driven by an explicit clock
//! - **Frame Queue**: Deferred "next rendering opportunity" callbacks
//! - **Visibility Watching**: Threshold-crossing viewport intersection events
//!   behind a narrow trait seam
//! - **Stage**: The per-page owner of all of the above
//!
//! # Concurrency model
//!
//! The runtime is single-threaded and cooperative. Timers and frame
//! callbacks are delivered one at a time from [`Stage::tick`]; there is no
//! parallel execution and no locking on the hot path. Every time-dependent
//! API takes an explicit `now: Instant` so behavior is deterministic under
//! test.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use vitrine_core::{Rect, Stage, ViewportWatcher, VisibilityWatcher};
//!
//! let mut stage = Stage::new(800.0, 600.0);
//! let hero = stage.scene_mut().create_element("section");
//! stage.scene_mut().set_rect(hero, Rect::new(0.0, 100.0, 800.0, 400.0));
//!
//! let mut watcher = ViewportWatcher::new();
//! watcher.watch(hero, 0.1);
//!
//! let events = watcher.poll(stage.scene(), stage.viewport());
//! assert!(events[0].visible);
//! ```

mod error;
mod frame;
pub mod logging;
mod scene;
mod stage;
mod timer;
mod visibility;

pub use error::{Result, SceneError, SceneResult, TimerError, VitrineError};
pub use frame::{FrameCallbackId, FrameQueue};
pub use scene::{ElementId, Rect, Scene, Style, Transform};
pub use stage::{SharedStage, Stage};
pub use timer::{TimerId, TimerKind, TimerManager};
pub use visibility::{ViewportWatcher, VisibilityEvent, VisibilityWatcher};
