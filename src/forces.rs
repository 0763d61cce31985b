//! Per-frame force model for the sphere field.
//!
//! Two terms, evaluated per particle: a cursor repulsion gated on a fixed
//! radius, and a spring pulling toward the particle's rest position.
//! Velocity is decayed by explicit viscous damping each frame: tuned
//! constants, not a physical mass model. The result is a cloud that scatters
//! away from the pointer and settles back on its own.
//!
//! Forces act in group-local coordinates; the rigid group rotation is a
//! render-time transform and does not feed back into the dynamics.

use glam::Vec3;

use crate::field::ParticleField;

/// Tuned force constants.
#[derive(Debug, Clone, Copy)]
pub struct ForceParams {
    /// Repulsion kicks in below this distance from the cursor point.
    pub repel_radius: f32,
    /// Repulsion magnitude per frame.
    pub repel_strength: f32,
    /// Spring constant toward the rest position.
    pub spring: f32,
    /// Per-frame velocity retention factor, < 1.
    pub damping: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            repel_radius: 40.0,
            repel_strength: 0.8,
            spring: 0.01,
            damping: 0.95,
        }
    }
}

/// Advance every particle one frame.
///
/// `cursor_point` is the cursor proxy lifted onto the frontal interaction
/// plane (see [`crate::cursor::CursorTracker::field_point`]). With the
/// cursor at its sentinel the point sits far outside `repel_radius` and the
/// repulsion term never fires.
pub fn step(field: &mut ParticleField, cursor_point: Vec3, params: &ForceParams) {
    for i in 0..field.len() {
        let pos = field.positions[i];
        let mut force = Vec3::ZERO;

        let away = pos - cursor_point;
        if away.length() < params.repel_radius {
            force += away.normalize_or_zero() * params.repel_strength;
        }

        force += (field.rest[i] - pos) * params.spring;

        let vel = field.velocities[i] * params.damping + force;
        field.velocities[i] = vel;
        field.positions[i] = pos + vel;
    }
}
