//! Scroll-triggered reveal animations.

mod coordinator;
mod counter;

pub use coordinator::{
    COUNTER_CLASSES, COUNTER_THRESHOLD, REVEAL_ATTR, REVEAL_DELAY_ATTR, REVEALED_CLASS,
    RevealCoordinator, RevealOptions, SIMPLE_THRESHOLD, STAGGER_ATTR, STAGGER_THRESHOLD,
    TARGET_ATTR,
};
pub use counter::{CounterAnimation, CounterStep, parse_target};
