//! Visual celebration effects: particles and click ripples.

mod particles;
mod ripple;
mod runner;

pub use particles::{
    ConfettiBurst, PALETTE, Particle, ParticleShape, ParticleSystem, Rgb, SPARKLE_FADE,
    SPARKLE_GRAVITY, SparkleBurst,
};
pub use ripple::{RIPPLE_CLASS, spawn_ripple};
pub use runner::{EffectsRunner, TICK_INTERVAL as EFFECTS_TICK_INTERVAL};
