//! Ring lattice of bounce points for the ball's final hops.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rotate_about_y;

/// Lattice shape.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpRingConfig {
    pub ring_count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Points per ring.
    pub slot_count: usize,
}

impl Default for JumpRingConfig {
    fn default() -> Self {
        Self {
            ring_count: 5,
            min_radius: 2.77,
            max_radius: 4.0,
            slot_count: 60,
        }
    }
}

/// Generate `ring_count * slot_count` points on concentric rings, in the
/// wheel-local frame (relative to the wheel center, at pocket height).
///
/// Ring `r` sits at `min_radius + r * (max_radius - min_radius) / (ring_count - 1)`;
/// a single ring sits at `min_radius`. Points are evenly spaced around each ring.
pub fn generate(
    ring_count: usize,
    min_radius: f32,
    max_radius: f32,
    slot_count: usize,
) -> Vec<Vec3> {
    if ring_count == 0 || slot_count == 0 {
        return Vec::new();
    }
    let radius_step = if ring_count > 1 {
        (max_radius - min_radius) / (ring_count - 1) as f32
    } else {
        0.0
    };
    let angle_step = 360.0 / slot_count as f32;

    let mut points = Vec::with_capacity(ring_count * slot_count);
    for ring in 0..ring_count {
        let radius = min_radius + ring as f32 * radius_step;
        for slot in 0..slot_count {
            let (sin, cos) = (slot as f32 * angle_step).to_radians().sin_cos();
            points.push(Vec3::new(radius * cos, 0.0, radius * sin));
        }
    }
    points
}

/// The generated lattice, riding on the wheel.
#[derive(Clone, Debug, PartialEq)]
pub struct JumpLattice {
    center: Vec3,
    points: Vec<Vec3>,
    per_ring: usize,
}

impl JumpLattice {
    pub fn new(center: Vec3, config: &JumpRingConfig) -> Self {
        Self {
            center,
            points: generate(
                config.ring_count,
                config.min_radius,
                config.max_radius,
                config.slot_count,
            ),
            per_ring: config.slot_count,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Wheel-local offset of point `index`.
    pub fn local(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn ring_of(&self, index: usize) -> Option<usize> {
        (index < self.points.len()).then(|| index / self.per_ring.max(1))
    }

    /// World position of point `index` with the wheel turned by `rotation`.
    pub fn world_position(&self, index: usize, rotation: f32) -> Option<Vec3> {
        self.local(index)
            .map(|offset| self.center + rotate_about_y(offset, -rotation))
    }

    /// Indices of points within `radius` of `target`.
    pub fn candidates_near(&self, target: Vec3, radius: f32, rotation: f32) -> Vec<usize> {
        (0..self.points.len())
            .filter(|&index| {
                self.world_position(index, rotation)
                    .is_some_and(|point| point.distance(target) <= radius)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::plane_radius;

    #[test]
    fn test_generate_counts() {
        assert_eq!(generate(5, 2.77, 4.0, 60).len(), 300);
        assert!(generate(0, 2.77, 4.0, 60).is_empty());
        assert!(generate(5, 2.77, 4.0, 0).is_empty());
    }

    #[test]
    fn test_ring_radii_are_evenly_stepped() {
        let points = generate(5, 2.0, 4.0, 8);
        for ring in 0..5 {
            let expected = 2.0 + ring as f32 * 0.5;
            for point in &points[ring * 8..(ring + 1) * 8] {
                assert!((plane_radius(Vec3::ZERO, *point) - expected).abs() < 1e-5);
                assert_eq!(point.y, 0.0);
            }
        }
    }

    #[test]
    fn test_single_ring_uses_min_radius() {
        let points = generate(1, 3.0, 9.0, 4);
        assert_eq!(points.len(), 4);
        for point in points {
            assert!((plane_radius(Vec3::ZERO, point) - 3.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_lattice_rides_on_the_wheel() {
        let lattice = JumpLattice::new(Vec3::new(0.0, 1.0, 0.0), &JumpRingConfig::default());
        assert_eq!(lattice.len(), 300);
        assert_eq!(lattice.ring_of(59), Some(0));
        assert_eq!(lattice.ring_of(60), Some(1));
        assert_eq!(lattice.ring_of(300), None);

        // Point 0 is at local angle 0; turning the wheel by 90 moves it to -90.
        let moved = lattice.world_position(0, 90.0).unwrap();
        assert!(moved.x.abs() < 1e-4);
        assert!((moved.z + 2.77).abs() < 1e-4);
        assert_eq!(moved.y, 1.0);
    }

    #[test]
    fn test_candidates_near() {
        let lattice = JumpLattice::new(Vec3::ZERO, &JumpRingConfig::default());
        let target = Vec3::new(3.2, 0.0, 0.0);
        let near = lattice.candidates_near(target, 1.0, 0.0);
        assert!(!near.is_empty());
        for index in near {
            assert!(lattice.world_position(index, 0.0).unwrap().distance(target) <= 1.0);
        }
        assert!(lattice.candidates_near(Vec3::new(50.0, 0.0, 0.0), 1.0, 0.0).is_empty());
    }
}
