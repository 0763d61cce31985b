//! Simulation contexts for the two backdrop layers.
//!
//! Each scene owns its particle state and exposes an explicit `tick` the
//! frame driver calls once per frame. Ticks are pure CPU work, so tests can
//! step a scene thousands of frames without a window or a GPU.

use glam::{EulerRot, Mat4, Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{BackdropConfig, GlowConfig, MarkConfig, SphereConfig, StarfieldConfig};
use crate::cursor::CursorTracker;
use crate::field::{fibonacci_sphere, initials_strokes, sample_strokes, ParticleField};
use crate::forces::{self, ForceParams};
use crate::glow::GlowPool;

/// Depth of the frontal plane the cursor proxy is lifted onto.
const CURSOR_PLANE_Z: f32 = 50.0;

/// The holographic sphere with its stylized-initials marks.
pub struct SphereScene {
    /// The mouse-reactive sphere field.
    pub sphere: ParticleField,
    /// The glyph marks: glow only, no force model.
    pub marks: ParticleField,
    /// Rigid rotation of the sphere group, radians (x, y).
    pub rotation: Vec2,
    /// Vertical offset of the marks for the bob animation.
    pub mark_offset_y: f32,
    sphere_cfg: SphereConfig,
    mark_cfg: MarkConfig,
    glow_cfg: GlowConfig,
    force_params: ForceParams,
    sphere_glow: GlowPool,
    mark_glow: GlowPool,
    rng: SmallRng,
}

impl SphereScene {
    pub fn new(cfg: &BackdropConfig) -> Self {
        let mut rng = SmallRng::from_entropy();
        let sphere = ParticleField::new(
            fibonacci_sphere(cfg.sphere.particle_count, cfg.sphere.radius),
            cfg.sphere.base_color,
        );
        let marks = ParticleField::new(
            sample_strokes(&initials_strokes(), &cfg.marks, &mut rng),
            cfg.marks.base_color,
        );

        Self {
            sphere,
            marks,
            rotation: Vec2::ZERO,
            mark_offset_y: 0.0,
            sphere_cfg: cfg.sphere.clone(),
            mark_cfg: cfg.marks.clone(),
            glow_cfg: cfg.glow,
            force_params: ForceParams::default(),
            sphere_glow: GlowPool::new(),
            mark_glow: GlowPool::new(),
            rng,
        }
    }

    /// Advance one frame: rotate the group, bob the marks, run the force
    /// model over the sphere field, then the glow overlay over both fields.
    pub fn tick(&mut self, cursor: &CursorTracker, elapsed_secs: f32) {
        self.rotation += self.sphere_cfg.rotation_rate;
        self.mark_offset_y =
            (elapsed_secs * self.mark_cfg.bob_rate).sin() * self.mark_cfg.bob_amplitude;

        let cursor_point = cursor.field_point(self.sphere_cfg.radius, CURSOR_PLANE_Z);
        forces::step(&mut self.sphere, cursor_point, &self.force_params);

        self.sphere_glow.step(
            &mut self.sphere.colors,
            self.sphere_cfg.base_color,
            &self.glow_cfg,
            &mut self.rng,
        );
        self.mark_glow.step(
            &mut self.marks.colors,
            self.mark_cfg.base_color,
            &self.glow_cfg,
            &mut self.rng,
        );
    }

    /// Model matrix of the rotating sphere group.
    pub fn sphere_model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }

    /// Model matrix of the bobbing marks (not part of the rotating group).
    pub fn marks_model(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, self.mark_offset_y, 0.0))
    }
}

/// The rotating starfield background.
pub struct Starfield {
    /// Star positions, immutable after creation.
    pub positions: Vec<Vec3>,
    /// Rigid rotation around y, radians.
    pub rotation_y: f32,
    rotation_rate: f32,
}

impl Starfield {
    pub fn new(cfg: &StarfieldConfig) -> Self {
        let mut rng = SmallRng::from_entropy();
        let positions = (0..cfg.star_count)
            .map(|_| {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * 2.0 * cfg.half_size,
                    (rng.gen::<f32>() - 0.5) * 2.0 * cfg.half_size,
                    (rng.gen::<f32>() - 0.5) * 2.0 * cfg.half_size,
                )
            })
            .collect();

        Self {
            positions,
            rotation_y: 0.0,
            rotation_rate: cfg.rotation_rate,
        }
    }

    /// Advance the rigid rotation one frame.
    pub fn tick(&mut self) {
        self.rotation_y += self.rotation_rate;
    }

    /// Model matrix of the whole field.
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_scene_particle_counts() {
        let cfg = BackdropConfig::default();
        let scene = SphereScene::new(&cfg);
        assert_eq!(scene.sphere.len(), cfg.sphere.particle_count);
        // 9 strokes x 20 layers x 151 samples.
        assert_eq!(
            scene.marks.len(),
            9 * cfg.marks.depth_layers * (cfg.marks.points_per_segment + 1)
        );
    }

    #[test]
    fn test_tick_advances_rotation() {
        let cfg = BackdropConfig::default();
        let mut scene = SphereScene::new(&cfg);
        let cursor = CursorTracker::new(800, 600);

        for _ in 0..10 {
            scene.tick(&cursor, 0.0);
        }
        assert!((scene.rotation.y - 10.0 * cfg.sphere.rotation_rate.y).abs() < 1e-6);
        assert!((scene.rotation.x - 10.0 * cfg.sphere.rotation_rate.x).abs() < 1e-6);
    }

    #[test]
    fn test_rest_positions_never_change() {
        let cfg = BackdropConfig::default();
        let mut scene = SphereScene::new(&cfg);
        let rest_before = scene.sphere.rest.clone();
        let mut cursor = CursorTracker::new(800, 600);
        cursor.set_window_size(800, 600);

        for _ in 0..300 {
            scene.tick(&cursor, 1.0);
        }
        assert_eq!(scene.sphere.rest, rest_before);
    }

    #[test]
    fn test_mark_bob_oscillates_within_amplitude() {
        let cfg = BackdropConfig::default();
        let mut scene = SphereScene::new(&cfg);
        let cursor = CursorTracker::new(800, 600);

        for i in 0..100 {
            scene.tick(&cursor, i as f32 * 0.1);
            assert!(scene.mark_offset_y.abs() <= cfg.marks.bob_amplitude + 1e-5);
        }
    }

    #[test]
    fn test_starfield_positions_are_rigid() {
        let cfg = StarfieldConfig::default();
        let mut stars = Starfield::new(&cfg);
        assert_eq!(stars.positions.len(), cfg.star_count);
        let before = stars.positions.clone();

        for _ in 0..500 {
            stars.tick();
        }
        assert_eq!(stars.positions, before);
        assert!((stars.rotation_y - 500.0 * cfg.rotation_rate).abs() < 1e-5);
    }

    #[test]
    fn test_starfield_positions_inside_cube() {
        let cfg = StarfieldConfig::default();
        let stars = Starfield::new(&cfg);
        for p in &stars.positions {
            assert!(p.x.abs() <= cfg.half_size);
            assert!(p.y.abs() <= cfg.half_size);
            assert!(p.z.abs() <= cfg.half_size);
        }
    }
}
