//! Fixed configuration for the backdrop.
//!
//! Geometry, physics and heuristic constants are configuration, not values
//! computed from input. Everything here carries the tuned defaults the
//! backdrop ships with; construct a struct and override fields to experiment.

use glam::{Vec2, Vec3};

/// Base color of the sphere field (cyan, `0x00ffff`).
pub const SPHERE_BASE_COLOR: Vec3 = Vec3::new(0.0, 1.0, 1.0);

/// Base color of the mark field (dim teal, `0x009999`).
pub const MARK_BASE_COLOR: Vec3 = Vec3::new(0.0, 0.6, 0.6);

/// Starfield point color (light gray, `0xaaaaaa`).
pub const STAR_COLOR: Vec3 = Vec3::new(0.667, 0.667, 0.667);

/// The holographic sphere field.
#[derive(Debug, Clone)]
pub struct SphereConfig {
    /// Number of particles on the sphere surface.
    pub particle_count: usize,
    /// Sphere radius in world units.
    pub radius: f32,
    /// Rigid group rotation per frame, radians (x, y).
    pub rotation_rate: Vec2,
    /// Base color particles fade back to.
    pub base_color: Vec3,
    /// Billboard size in clip units.
    pub point_size: f32,
    /// Overall opacity multiplier.
    pub opacity: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            particle_count: 5000,
            radius: 80.0,
            rotation_rate: Vec2::new(0.0006, 0.0015),
            base_color: SPHERE_BASE_COLOR,
            point_size: 0.006,
            opacity: 0.8,
        }
    }
}

/// The stylized-initials mark field.
#[derive(Debug, Clone)]
pub struct MarkConfig {
    /// Sampled points per stroke segment (inclusive endpoints).
    pub points_per_segment: usize,
    /// Depth layers stacked along z for visual thickness.
    pub depth_layers: usize,
    /// Total z extent of the layer stack.
    pub thickness: f32,
    /// Per-axis jitter span (offsets drawn from `±jitter / 2`).
    pub jitter: f32,
    /// Base color particles fade back to.
    pub base_color: Vec3,
    /// Vertical bob amplitude in world units.
    pub bob_amplitude: f32,
    /// Bob angular rate in radians per second.
    pub bob_rate: f32,
    /// Billboard size in clip units.
    pub point_size: f32,
    /// Overall opacity multiplier.
    pub opacity: f32,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            points_per_segment: 150,
            depth_layers: 20,
            thickness: 12.0,
            jitter: 3.0,
            base_color: MARK_BASE_COLOR,
            bob_amplitude: 2.0,
            bob_rate: 0.5,
            point_size: 0.0075,
            opacity: 0.4,
        }
    }
}

/// The rotating starfield background.
#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    /// Number of stars.
    pub star_count: usize,
    /// Half-size of the spawn cube.
    pub half_size: f32,
    /// Rigid y rotation per frame, radians.
    pub rotation_rate: f32,
    /// Star color.
    pub color: Vec3,
    /// Billboard size in clip units.
    pub point_size: f32,
    /// Overall opacity multiplier.
    pub opacity: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 6000,
            half_size: 1000.0,
            rotation_rate: 0.00005,
            color: STAR_COLOR,
            point_size: 0.0015,
            opacity: 1.0,
        }
    }
}

/// Glow overlay tuning, shared by sphere and mark fields.
#[derive(Debug, Clone, Copy)]
pub struct GlowConfig {
    /// Chance per frame of enqueueing a new glow event.
    pub spawn_chance: f32,
    /// Per-frame blend factor toward the field base color.
    pub fade: f32,
    /// Per-frame intensity decrement of an active event.
    pub decay: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.1,
            fade: 0.05,
            decay: 0.05,
        }
    }
}

/// Camera placement for one rendered layer.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Camera distance along +z, looking at the origin.
    pub z: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

/// Camera for the sphere and mark layers.
pub const SPHERE_CAMERA: CameraConfig = CameraConfig {
    fov_deg: 75.0,
    z: 150.0,
    near: 0.1,
    far: 1000.0,
};

/// Camera for the starfield layer.
pub const STAR_CAMERA: CameraConfig = CameraConfig {
    fov_deg: 60.0,
    z: 1.0,
    near: 1.0,
    far: 1000.0,
};

/// Everything the backdrop needs to start.
#[derive(Debug, Clone, Default)]
pub struct BackdropConfig {
    pub sphere: SphereConfig,
    pub marks: MarkConfig,
    pub starfield: StarfieldConfig,
    pub glow: GlowConfig,
}
