//! Particle storage and field initializers.
//!
//! A [`ParticleField`] holds one position/rest/velocity/color quadruple per
//! particle. Rest positions are set once at construction and never move; the
//! force model pulls displaced particles back toward them. Particle counts
//! are fixed for the whole session; nothing is spawned or destroyed while
//! the backdrop runs.
//!
//! Two initializers build the backdrop's fields:
//!
//! - [`fibonacci_sphere`]: golden-angle spacing over a sphere surface, so
//!   density looks uniform from every direction.
//! - [`sample_strokes`]: literal line segments (the stylized "SM" glyph
//!   strokes) sampled with jitter across stacked depth layers.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::config::MarkConfig;

/// A fixed-size set of particles with spring rest positions.
#[derive(Debug, Clone)]
pub struct ParticleField {
    /// Current positions, mutated every frame.
    pub positions: Vec<Vec3>,
    /// Spring targets, immutable after construction.
    pub rest: Vec<Vec3>,
    /// Per-particle velocities.
    pub velocities: Vec<Vec3>,
    /// Per-particle colors, mutated by the glow overlay.
    pub colors: Vec<Vec3>,
}

impl ParticleField {
    /// Create a field with every particle at its rest position, at rest,
    /// carrying the base color.
    pub fn new(rest: Vec<Vec3>, base_color: Vec3) -> Self {
        let n = rest.len();
        Self {
            positions: rest.clone(),
            rest,
            velocities: vec![Vec3::ZERO; n],
            colors: vec![base_color; n],
        }
    }

    /// Number of particles in the field.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the field holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Evenly spaced points on a sphere surface via golden-angle spacing.
///
/// For particle `i` of `n`: `phi = acos(-1 + 2i/n)`,
/// `theta = sqrt(n * pi) * phi`. This winds a single spiral from pole to
/// pole with visually uniform surface density.
pub fn fibonacci_sphere(count: usize, radius: f32) -> Vec<Vec3> {
    let n = count as f32;
    (0..count)
        .map(|i| {
            let phi = (-1.0 + 2.0 * i as f32 / n).acos();
            let theta = (n * std::f32::consts::PI).sqrt() * phi;
            Vec3::new(
                radius * theta.cos() * phi.sin(),
                radius * theta.sin() * phi.sin(),
                radius * phi.cos(),
            )
        })
        .collect()
}

/// Stroke segments for the stylized "SM" initials, in the sphere's world
/// units, drawn in the z = 0 plane.
pub fn initials_strokes() -> Vec<(Vec2, Vec2)> {
    // "S": five strokes boxed between x in [-60, -15], y in [-25, 25].
    let (s_left, s_right, s_top, s_bottom, s_mid) = (-60.0, -15.0, 25.0, -25.0, 0.0);
    // "M": four strokes boxed between x in [15, 60], meeting at (37.5, 0).
    let (m_left, m_right, m_top, m_bottom, m_mid_x, m_mid_y) = (15.0, 60.0, 25.0, -25.0, 37.5, 0.0);

    vec![
        (Vec2::new(s_right, s_top), Vec2::new(s_left, s_top)),
        (Vec2::new(s_left, s_top), Vec2::new(s_left, s_mid)),
        (Vec2::new(s_left, s_mid), Vec2::new(s_right, s_mid)),
        (Vec2::new(s_right, s_mid), Vec2::new(s_right, s_bottom)),
        (Vec2::new(s_right, s_bottom), Vec2::new(s_left, s_bottom)),
        (Vec2::new(m_left, m_bottom), Vec2::new(m_left, m_top)),
        (Vec2::new(m_left, m_top), Vec2::new(m_mid_x, m_mid_y)),
        (Vec2::new(m_mid_x, m_mid_y), Vec2::new(m_right, m_top)),
        (Vec2::new(m_right, m_top), Vec2::new(m_right, m_bottom)),
    ]
}

/// Sample stroke segments into a jittered, depth-layered point cloud.
///
/// Every segment is sampled at `points_per_segment + 1` points per depth
/// layer. Layers are centered on z = 0 and span `thickness`; each point gets
/// per-axis jitter in `±jitter / 2` so the strokes read as hazy light rather
/// than crisp lines.
pub fn sample_strokes(
    segments: &[(Vec2, Vec2)],
    cfg: &MarkConfig,
    rng: &mut SmallRng,
) -> Vec<Vec3> {
    let layers = cfg.depth_layers as f32;
    let mut points =
        Vec::with_capacity(segments.len() * cfg.depth_layers * (cfg.points_per_segment + 1));

    for &(start, end) in segments {
        for layer in 0..cfg.depth_layers {
            let z_offset = (layer as f32 - layers / 2.0) * (cfg.thickness / layers);
            for i in 0..=cfg.points_per_segment {
                let t = i as f32 / cfg.points_per_segment as f32;
                let p = start.lerp(end, t);
                points.push(Vec3::new(
                    p.x + (rng.gen::<f32>() - 0.5) * cfg.jitter,
                    p.y + (rng.gen::<f32>() - 0.5) * cfg.jitter,
                    z_offset + (rng.gen::<f32>() - 0.5) * cfg.jitter,
                ));
            }
        }
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_fibonacci_sphere_radius() {
        let points = fibonacci_sphere(500, 80.0);
        assert_eq!(points.len(), 500);
        for p in &points {
            assert!((p.length() - 80.0).abs() < 0.01);
        }
    }

    #[test]
    fn test_fibonacci_sphere_covers_both_hemispheres() {
        let points = fibonacci_sphere(1000, 1.0);
        let above = points.iter().filter(|p| p.z > 0.0).count();
        // Roughly half the points on each side of the equator.
        assert!(above > 400 && above < 600);
    }

    #[test]
    fn test_sample_strokes_count_and_bounds() {
        let cfg = MarkConfig::default();
        let mut rng = SmallRng::seed_from_u64(7);
        let segments = initials_strokes();
        let points = sample_strokes(&segments, &cfg, &mut rng);

        assert_eq!(
            points.len(),
            segments.len() * cfg.depth_layers * (cfg.points_per_segment + 1)
        );
        let half_jitter = cfg.jitter / 2.0;
        for p in &points {
            assert!(p.x.abs() <= 60.0 + half_jitter);
            assert!(p.y.abs() <= 25.0 + half_jitter);
            assert!(p.z.abs() <= cfg.thickness / 2.0 + half_jitter);
        }
    }

    #[test]
    fn test_field_starts_at_rest() {
        let field = ParticleField::new(fibonacci_sphere(100, 10.0), Vec3::ONE);
        assert_eq!(field.len(), 100);
        assert_eq!(field.positions, field.rest);
        assert!(field.velocities.iter().all(|v| *v == Vec3::ZERO));
        assert!(field.colors.iter().all(|c| *c == Vec3::ONE));
    }
}
