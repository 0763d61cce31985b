//! Glow/decay color overlay.
//!
//! Every frame each field fades all particle colors toward the field's base
//! color, occasionally flashes a random particle to full white, and decays
//! active flashes linearly until they expire. Colors always stay a blend
//! between the base color and white.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::config::GlowConfig;

const WHITE: Vec3 = Vec3::ONE;

/// A transient highlight on one particle.
#[derive(Debug, Clone, Copy)]
pub struct GlowEvent {
    /// Index of the highlighted particle.
    pub index: usize,
    /// Blend strength toward white, in `(0, 1]`.
    pub intensity: f32,
}

/// Pool of active glow events for one particle field.
#[derive(Debug, Default)]
pub struct GlowPool {
    events: Vec<GlowEvent>,
}

impl GlowPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active event count.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Advance the overlay one frame over `colors`.
    ///
    /// Order matters and matches the visual model: possibly spawn, fade all
    /// colors toward `base`, then apply and decay every active event.
    /// Multiple events on one index blend cumulatively within the frame.
    pub fn step(&mut self, colors: &mut [Vec3], base: Vec3, cfg: &GlowConfig, rng: &mut SmallRng) {
        if colors.is_empty() {
            return;
        }

        if rng.gen::<f32>() < cfg.spawn_chance {
            self.events.push(GlowEvent {
                index: rng.gen_range(0..colors.len()),
                intensity: 1.0,
            });
        }

        for color in colors.iter_mut() {
            *color = color.lerp(base, cfg.fade);
        }

        let decay = cfg.decay;
        self.events.retain_mut(|event| {
            colors[event.index] = colors[event.index].lerp(WHITE, event.intensity);
            event.intensity -= decay;
            event.intensity > 0.0
        });
    }
}
