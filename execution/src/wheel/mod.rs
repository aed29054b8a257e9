//! Wheel geometry, the jump-point lattice, the ball trajectory engine and the
//! controller that ties them to the game phase.
//!
//! ## Frames
//!
//! Angles are in degrees in the horizontal (x, z) plane, measured as
//! `atan2(z, x)` around the wheel center. The wheel turns by `rotation`
//! degrees; a point fixed to the wheel at local angle `a` sits at world angle
//! `a - rotation`. Heights are offsets along +y from the wheel center.

mod controller;
mod jump_path;
mod layout;
mod trajectory;

pub use controller::{DiamondConfig, WheelConfig, WheelController};
pub use jump_path::{generate, JumpLattice, JumpRingConfig};
pub use layout::{LayoutConfig, PocketLayout};
pub use trajectory::{
    BallTrajectory, TrajectoryConfig, TrajectoryPhase, TrajectoryStatus, WheelFrame,
};

use glam::Vec3;

/// Wrap an angle into `[0, 360)`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`, in `(-180, 180]`.
pub fn delta_degrees(from: f32, to: f32) -> f32 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}

/// Plane angle of `point` around `center`.
pub fn plane_angle(center: Vec3, point: Vec3) -> f32 {
    normalize_degrees((point.z - center.z).atan2(point.x - center.x).to_degrees())
}

/// Horizontal distance of `point` from `center`.
pub fn plane_radius(center: Vec3, point: Vec3) -> f32 {
    let dx = point.x - center.x;
    let dz = point.z - center.z;
    (dx * dx + dz * dz).sqrt()
}

/// Point on a horizontal circle around `center`.
pub fn point_on_circle(center: Vec3, angle: f32, radius: f32, height: f32) -> Vec3 {
    let (sin, cos) = angle.to_radians().sin_cos();
    Vec3::new(
        center.x + radius * cos,
        center.y + height,
        center.z + radius * sin,
    )
}

/// Rotate an offset about the vertical axis by `degrees` (increasing plane angle).
pub fn rotate_about_y(offset: Vec3, degrees: f32) -> Vec3 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec3::new(
        offset.x * cos - offset.z * sin,
        offset.y,
        offset.x * sin + offset.z * cos,
    )
}
