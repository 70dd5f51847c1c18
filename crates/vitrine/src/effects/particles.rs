//! Celebration particle systems.
//!
//! Particles advance in fixed ticks driven by the effects runner. A system
//! reports whether it is still alive from [`ParticleSystem::step`]; dead
//! systems are dropped by the runner.

use rand::Rng;

use vitrine_core::Rect;

/// Downward acceleration per tick for sparkles.
pub const SPARKLE_GRAVITY: f32 = 0.5;
/// Opacity lost per tick for sparkles.
pub const SPARKLE_FADE: f32 = 0.02;

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The celebration palette.
pub const PALETTE: [Rgb; 6] = [
    Rgb { r: 99, g: 102, b: 241 },
    Rgb { r: 139, g: 92, b: 246 },
    Rgb { r: 236, g: 72, b: 153 },
    Rgb { r: 245, g: 158, b: 11 },
    Rgb { r: 16, g: 185, b: 129 },
    Rgb { r: 239, g: 68, b: 68 },
];

/// Particle silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleShape {
    Circle,
    Square,
    Triangle,
}

/// One particle.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Rotation change per tick.
    pub spin: f32,
    /// Phase offset for sway, in radians.
    pub phase: f32,
    pub opacity: f32,
    pub size: f32,
    pub shape: ParticleShape,
    pub color: Rgb,
}

/// A batch of particles advanced together.
pub trait ParticleSystem {
    /// Advance one tick. Returns `false` once every particle is gone.
    fn step(&mut self) -> bool;

    /// The live particles.
    fn particles(&self) -> &[Particle];
}

fn random_shape(rng: &mut impl Rng) -> ParticleShape {
    match rng.gen_range(0..3) {
        0 => ParticleShape::Circle,
        1 => ParticleShape::Square,
        _ => ParticleShape::Triangle,
    }
}

fn random_color(rng: &mut impl Rng) -> Rgb {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

/// Confetti falling from above the viewport, swaying as it drops.
pub struct ConfettiBurst {
    particles: Vec<Particle>,
    floor: f32,
    tick: u32,
}

impl ConfettiBurst {
    /// Spawn `count` pieces spread across the top of `viewport`.
    pub fn spawn(rng: &mut impl Rng, count: usize, viewport: Rect) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: viewport.x + rng.gen_range(0.0..viewport.width.max(1.0)),
                y: viewport.y - rng.gen_range(10.0..60.0),
                velocity_x: 0.0,
                velocity_y: rng.gen_range(2.0..5.0),
                rotation: rng.gen_range(0.0..360.0),
                spin: rng.gen_range(-5.0..5.0),
                phase: rng.gen_range(0.0..std::f32::consts::TAU),
                opacity: 1.0,
                size: rng.gen_range(6.0..12.0),
                shape: random_shape(rng),
                color: random_color(rng),
            })
            .collect();
        Self {
            particles,
            floor: viewport.y + viewport.height,
            tick: 0,
        }
    }
}

impl ParticleSystem for ConfettiBurst {
    fn step(&mut self) -> bool {
        let phase_base = self.tick as f32 * 0.1;
        let floor = self.floor;
        self.tick += 1;
        for p in &mut self.particles {
            p.y += p.velocity_y;
            p.x += (phase_base + p.phase).sin() * 1.5;
            p.rotation += p.spin;
        }
        self.particles.retain(|p| p.y <= floor);
        !self.particles.is_empty()
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// A radial sparkle burst that arcs under gravity and fades out.
pub struct SparkleBurst {
    particles: Vec<Particle>,
}

impl SparkleBurst {
    /// Spawn `count` sparkles radiating from `(x, y)`.
    pub fn spawn(rng: &mut impl Rng, count: usize, x: f32, y: f32) -> Self {
        let particles = (0..count)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / count.max(1) as f32
                    + rng.gen_range(-0.2..0.2);
                let speed = rng.gen_range(2.0..6.0);
                Particle {
                    x,
                    y,
                    velocity_x: angle.cos() * speed,
                    velocity_y: angle.sin() * speed,
                    rotation: 0.0,
                    spin: 0.0,
                    phase: 0.0,
                    opacity: 1.0,
                    size: rng.gen_range(2.0..5.0),
                    shape: ParticleShape::Circle,
                    color: random_color(rng),
                }
            })
            .collect();
        Self { particles }
    }
}

impl ParticleSystem for SparkleBurst {
    fn step(&mut self) -> bool {
        for p in &mut self.particles {
            p.velocity_y += SPARKLE_GRAVITY;
            p.x += p.velocity_x;
            p.y += p.velocity_y;
            p.opacity -= SPARKLE_FADE;
        }
        self.particles.retain(|p| p.opacity > 0.0);
        !self.particles.is_empty()
    }

    fn particles(&self) -> &[Particle] {
        &self.particles
    }
}
