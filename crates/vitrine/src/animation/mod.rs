//! Animation primitives: easing curves and reveal styles.

mod easing;
mod reveal_style;

pub use easing::Easing;
pub use reveal_style::RevealKind;
