//! Outcome-rigged ball trajectory.
//!
//! The ball looks like it spins freely and loses energy, but every path ends in
//! the pocket chosen before the spin started. [`BallTrajectory`] is a per-tick
//! state machine:
//!
//! 1. **Idle**: orbit the bowl at a fixed radius, height and speed.
//! 2. **Approaching**: keep orbiting for an initial delay, then until the
//!    target pocket's current angle is within the acquisition threshold.
//! 3. **Transitioning**: drop from the orbit toward the diamond nearest the
//!    target pocket while still revolving.
//! 4. **Bouncing**: hop across a few lattice points near the pocket, each hop
//!    lower than the last.
//! 5. **Settled**: one short hop in the pocket's own frame onto its origin,
//!    then ride with the pocket. The result is reported exactly once.

use croupier_types::BallStopped;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{
    delta_degrees, normalize_degrees, plane_angle, plane_radius, point_on_circle,
    rotate_about_y, JumpLattice, PocketLayout,
};
use crate::{ConfigError, TableRng};

/// Orbit laps after the initial delay before the ball acquires the pocket unconditionally.
const MAX_APPROACH_DEGREES: f32 = 720.0;

/// Ball motion tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrajectoryConfig {
    /// Orbit angular speed in degrees per second.
    pub spin_speed: f32,
    pub orbit_radius: f32,
    pub orbit_height: f32,
    /// Plane angle the ball starts from on every spin.
    pub start_angle: f32,
    pub initial_delay_secs: f32,
    /// Angular window (degrees) in which the ball acquires the target pocket.
    pub acquire_threshold: f32,
    /// Distance from the diamond at which the transition ends.
    pub arrival_epsilon: f32,
    pub min_transition_secs: f32,
    /// Lattice points closer than this to the pocket are bounce candidates.
    pub jump_search_radius: f32,
    pub min_hops: usize,
    pub max_hops: usize,
    pub hop_min_secs: f32,
    pub hop_max_secs: f32,
    /// Lowest possible hop apex.
    pub hop_height_floor: f32,
    /// Apex ceiling of the last hop.
    pub hop_height_low: f32,
    /// Apex ceiling of the first hop.
    pub hop_height_high: f32,
}

impl Default for TrajectoryConfig {
    fn default() -> Self {
        Self {
            spin_speed: 180.0,
            orbit_radius: 5.58,
            orbit_height: 2.29,
            start_angle: 0.0,
            initial_delay_secs: 3.0,
            acquire_threshold: 30.0,
            arrival_epsilon: 0.2,
            min_transition_secs: 0.05,
            jump_search_radius: 1.0,
            min_hops: 2,
            max_hops: 4,
            hop_min_secs: 0.3,
            hop_max_secs: 1.0,
            hop_height_floor: 0.5,
            hop_height_low: 0.6,
            hop_height_high: 2.0,
        }
    }
}

impl TrajectoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if !(self.spin_speed > 0.0) {
            return invalid("trajectory.spin_speed", "must be positive");
        }
        if !(self.orbit_radius > 0.0) {
            return invalid("trajectory.orbit_radius", "must be positive");
        }
        if !(self.initial_delay_secs >= 0.0) {
            return invalid("trajectory.initial_delay_secs", "must not be negative");
        }
        if !(self.acquire_threshold > 0.0 && self.acquire_threshold <= 180.0) {
            return invalid("trajectory.acquire_threshold", "must be in (0, 180]");
        }
        if !(self.min_transition_secs > 0.0) {
            return invalid("trajectory.min_transition_secs", "must be positive");
        }
        if self.min_hops > self.max_hops {
            return invalid("trajectory.min_hops", "must not exceed max_hops");
        }
        if !(self.hop_min_secs > 0.0 && self.hop_min_secs <= self.hop_max_secs) {
            return invalid("trajectory.hop_min_secs", "must be positive and at most hop_max_secs");
        }
        if !(self.hop_height_floor <= self.hop_height_low
            && self.hop_height_low <= self.hop_height_high)
        {
            return invalid(
                "trajectory.hop_height_floor",
                "hop heights must satisfy floor <= low <= high",
            );
        }
        Ok(())
    }
}

/// Externally visible phase of the ball.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryPhase {
    Idle,
    Approaching,
    Transitioning,
    Bouncing,
    Settled,
}

/// What a tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrajectoryStatus {
    /// Orbiting with no spin requested.
    Idle,
    /// A spin is under way in the given phase.
    Moving(TrajectoryPhase),
    /// The ball landed this tick. Reported once per spin.
    Stopped(BallStopped),
    /// Resting in the pocket after a reported landing.
    AtRest,
}

/// Read-only view of the wheel for one tick.
#[derive(Clone, Copy, Debug)]
pub struct WheelFrame<'a> {
    pub layout: &'a PocketLayout,
    pub lattice: &'a JumpLattice,
    /// Deflector positions on the stationary bowl.
    pub diamonds: &'a [Vec3],
    /// Current wheel rotation in degrees.
    pub rotation: f32,
}

impl WheelFrame<'_> {
    fn pocket(&self, target: &Target) -> Vec3 {
        self.layout.position_at(target.slot, self.rotation)
    }
}

#[derive(Clone, Copy, Debug)]
struct Target {
    number: u8,
    slot: usize,
    slot_count: u8,
}

/// Orbit progress while waiting for the target pocket to come round.
#[derive(Clone, Copy, Debug)]
struct Approach {
    target: Target,
    delay_left: f32,
    travelled: f32,
    /// Forward gap to the pocket on the previous tick.
    last_gap: Option<f32>,
}

#[derive(Clone, Copy, Debug)]
struct Hop {
    /// Start point: world space for lattice hops, pocket-local for the settle hop.
    from: Vec3,
    elapsed: f32,
    duration: f32,
    height: f32,
}

impl Hop {
    fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed += dt;
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    fn point(&self, to: Vec3, t: f32) -> Vec3 {
        self.from.lerp(to, t) + Vec3::Y * (4.0 * self.height * t * (1.0 - t))
    }
}

#[derive(Clone, Debug)]
enum Motion {
    Idle,
    Approaching(Approach),
    Transitioning {
        target: Target,
        from_angle: f32,
        from_radius: f32,
        from_height: f32,
        sweep: f32,
        elapsed: f32,
        duration: f32,
        diamond: Vec3,
    },
    Bouncing {
        target: Target,
        path: Vec<usize>,
        next: usize,
        hop: Hop,
    },
    Settling {
        target: Target,
        hop: Hop,
    },
    Settled {
        target: Target,
    },
}

/// Ball state machine. Owns exactly one motion; a new request replaces it.
#[derive(Clone, Debug)]
pub struct BallTrajectory {
    config: TrajectoryConfig,
    center: Vec3,
    angle: f32,
    position: Vec3,
    motion: Motion,
}

impl BallTrajectory {
    pub fn new(config: TrajectoryConfig, center: Vec3) -> Self {
        let mut ball = Self {
            config,
            center,
            angle: 0.0,
            position: center,
            motion: Motion::Idle,
        };
        ball.reset();
        ball
    }

    pub fn config(&self) -> &TrajectoryConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Plane angle of the ball while it is orbiting or transitioning.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn phase(&self) -> TrajectoryPhase {
        match self.motion {
            Motion::Idle => TrajectoryPhase::Idle,
            Motion::Approaching(_) => TrajectoryPhase::Approaching,
            Motion::Transitioning { .. } => TrajectoryPhase::Transitioning,
            Motion::Bouncing { .. } => TrajectoryPhase::Bouncing,
            Motion::Settling { .. } | Motion::Settled { .. } => TrajectoryPhase::Settled,
        }
    }

    /// Pocket number of the spin under way or just finished.
    pub fn target(&self) -> Option<u8> {
        match &self.motion {
            Motion::Idle => None,
            Motion::Approaching(Approach { target, .. })
            | Motion::Transitioning { target, .. }
            | Motion::Bouncing { target, .. }
            | Motion::Settling { target, .. }
            | Motion::Settled { target } => Some(target.number),
        }
    }

    /// True from the spin request until the landing is reported.
    pub fn is_in_flight(&self) -> bool {
        !matches!(self.motion, Motion::Idle | Motion::Settled { .. })
    }

    /// Cancel whatever is running and orbit from the start angle.
    pub fn idle(&mut self) {
        self.reset();
        self.motion = Motion::Idle;
    }

    /// Cancel whatever is running and start a spin that ends in pocket `number`.
    pub fn spin_to(&mut self, number: u8, layout: &PocketLayout) -> Result<(), ConfigError> {
        let slot = layout
            .index_of(number)
            .ok_or(ConfigError::UnknownPocket { number })?;
        self.reset();
        self.motion = Motion::Approaching(Approach {
            target: Target {
                number,
                slot,
                slot_count: layout.slot_count() as u8,
            },
            delay_left: self.config.initial_delay_secs,
            travelled: 0.0,
            last_gap: None,
        });
        debug!(number, "ball spin started");
        Ok(())
    }

    /// Advance the ball by `dt` seconds. At most one phase change happens per tick.
    pub fn tick(
        &mut self,
        dt: f32,
        frame: &WheelFrame<'_>,
        rng: &mut TableRng,
    ) -> TrajectoryStatus {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let motion = std::mem::replace(&mut self.motion, Motion::Idle);
        let (motion, status) = match motion {
            Motion::Idle => {
                self.orbit(dt);
                (Motion::Idle, TrajectoryStatus::Idle)
            }
            Motion::Approaching(approach) => self.approach(dt, frame, approach, rng),
            Motion::Transitioning {
                target,
                from_angle,
                from_radius,
                from_height,
                sweep,
                elapsed,
                duration,
                diamond,
            } => {
                let elapsed = elapsed + dt;
                let t = (elapsed / duration).clamp(0.0, 1.0);
                let (to_radius, to_height) = self.radius_and_height(diamond);
                self.angle = normalize_degrees(from_angle + sweep * t);
                self.position = point_on_circle(
                    self.center,
                    self.angle,
                    from_radius + (to_radius - from_radius) * t,
                    from_height + (to_height - from_height) * t,
                );
                if t >= 1.0 || self.position.distance(diamond) < self.config.arrival_epsilon {
                    self.position = diamond;
                    self.angle = plane_angle(self.center, diamond);
                    self.begin_bounce(frame, target, rng)
                } else {
                    (
                        Motion::Transitioning {
                            target,
                            from_angle,
                            from_radius,
                            from_height,
                            sweep,
                            elapsed,
                            duration,
                            diamond,
                        },
                        TrajectoryStatus::Moving(TrajectoryPhase::Transitioning),
                    )
                }
            }
            Motion::Bouncing {
                target,
                path,
                next,
                mut hop,
            } => {
                let t = hop.advance(dt);
                let goal = path
                    .get(next)
                    .and_then(|&index| frame.lattice.world_position(index, frame.rotation))
                    .unwrap_or_else(|| frame.pocket(&target));
                self.position = hop.point(goal, t);
                if t < 1.0 {
                    (
                        Motion::Bouncing {
                            target,
                            path,
                            next,
                            hop,
                        },
                        TrajectoryStatus::Moving(TrajectoryPhase::Bouncing),
                    )
                } else {
                    self.position = goal;
                    let next = next + 1;
                    if next < path.len() {
                        let hop = self.hop(goal, next, path.len(), rng);
                        trace!(hop = next, "ball bounce");
                        (
                            Motion::Bouncing {
                                target,
                                path,
                                next,
                                hop,
                            },
                            TrajectoryStatus::Moving(TrajectoryPhase::Bouncing),
                        )
                    } else {
                        self.begin_settle(frame, target, rng)
                    }
                }
            }
            Motion::Settling { target, mut hop } => {
                let t = hop.advance(dt);
                let pocket = frame.pocket(&target);
                let local = hop.point(Vec3::ZERO, t);
                self.position = pocket + rotate_about_y(local, -frame.rotation);
                if t < 1.0 {
                    (
                        Motion::Settling { target, hop },
                        TrajectoryStatus::Moving(TrajectoryPhase::Settled),
                    )
                } else {
                    self.position = pocket;
                    debug!(number = target.number, "ball settled");
                    (
                        Motion::Settled { target },
                        TrajectoryStatus::Stopped(BallStopped {
                            result_number: target.number,
                            slot_count: target.slot_count,
                        }),
                    )
                }
            }
            Motion::Settled { target } => {
                self.position = frame.pocket(&target);
                (Motion::Settled { target }, TrajectoryStatus::AtRest)
            }
        };
        self.motion = motion;
        status
    }

    fn reset(&mut self) {
        self.angle = normalize_degrees(self.config.start_angle);
        self.position = self.orbit_point(self.angle);
    }

    fn orbit_point(&self, angle: f32) -> Vec3 {
        point_on_circle(
            self.center,
            angle,
            self.config.orbit_radius,
            self.config.orbit_height,
        )
    }

    /// Returns the degrees travelled.
    fn orbit(&mut self, dt: f32) -> f32 {
        let step = self.config.spin_speed * dt;
        self.angle = normalize_degrees(self.angle + step);
        self.position = self.orbit_point(self.angle);
        step
    }

    fn radius_and_height(&self, point: Vec3) -> (f32, f32) {
        (plane_radius(self.center, point), point.y - self.center.y)
    }

    fn approach(
        &mut self,
        dt: f32,
        frame: &WheelFrame<'_>,
        approach: Approach,
        rng: &mut TableRng,
    ) -> (Motion, TrajectoryStatus) {
        let Approach {
            target,
            delay_left,
            travelled,
            last_gap,
        } = approach;
        let step = self.orbit(dt);
        let moving = TrajectoryStatus::Moving(TrajectoryPhase::Approaching);
        if delay_left > 0.0 {
            return (
                Motion::Approaching(Approach {
                    delay_left: delay_left - dt,
                    last_gap: None,
                    ..approach
                }),
                moving,
            );
        }

        let travelled = travelled + step;
        let pocket_angle = frame.layout.angle_at(target.slot, frame.rotation);
        let gap = normalize_degrees(pocket_angle - self.angle);
        let within = delta_degrees(self.angle, pocket_angle).abs() < self.config.acquire_threshold;
        // The forward gap shrinks every tick until the ball passes the pocket.
        let passed = last_gap.is_some_and(|previous| gap > previous);
        if within || passed || travelled >= MAX_APPROACH_DEGREES {
            return self.begin_transition(frame, target, rng);
        }
        (
            Motion::Approaching(Approach {
                target,
                delay_left: 0.0,
                travelled,
                last_gap: Some(gap),
            }),
            moving,
        )
    }

    fn begin_transition(
        &mut self,
        frame: &WheelFrame<'_>,
        target: Target,
        rng: &mut TableRng,
    ) -> (Motion, TrajectoryStatus) {
        let pocket = frame.pocket(&target);
        let Some(diamond) = frame
            .diamonds
            .iter()
            .copied()
            .min_by(|a, b| a.distance(pocket).total_cmp(&b.distance(pocket)))
        else {
            return self.begin_bounce(frame, target, rng);
        };
        let sweep = normalize_degrees(plane_angle(self.center, diamond) - self.angle);
        let duration = (sweep / self.config.spin_speed).max(self.config.min_transition_secs);
        let (from_radius, from_height) = self.radius_and_height(self.position);
        debug!(number = target.number, sweep, duration, "ball acquired pocket");
        (
            Motion::Transitioning {
                target,
                from_angle: self.angle,
                from_radius,
                from_height,
                sweep,
                elapsed: 0.0,
                duration,
                diamond,
            },
            TrajectoryStatus::Moving(TrajectoryPhase::Transitioning),
        )
    }

    fn begin_bounce(
        &mut self,
        frame: &WheelFrame<'_>,
        target: Target,
        rng: &mut TableRng,
    ) -> (Motion, TrajectoryStatus) {
        let pocket = frame.pocket(&target);
        let mut candidates =
            frame
                .lattice
                .candidates_near(pocket, self.config.jump_search_radius, frame.rotation);
        let wanted = rng.range_inclusive(self.config.min_hops, self.config.max_hops);
        let mut path = Vec::with_capacity(wanted);
        while path.len() < wanted {
            match rng.draw(&mut candidates) {
                Some(index) => path.push(index),
                None => break,
            }
        }
        if path.is_empty() {
            return self.begin_settle(frame, target, rng);
        }
        let hop = self.hop(self.position, 0, path.len(), rng);
        debug!(number = target.number, hops = path.len(), "ball bouncing");
        (
            Motion::Bouncing {
                target,
                path,
                next: 0,
                hop,
            },
            TrajectoryStatus::Moving(TrajectoryPhase::Bouncing),
        )
    }

    fn begin_settle(
        &mut self,
        frame: &WheelFrame<'_>,
        target: Target,
        rng: &mut TableRng,
    ) -> (Motion, TrajectoryStatus) {
        let pocket = frame.pocket(&target);
        let from = rotate_about_y(self.position - pocket, frame.rotation);
        let hop = self.hop(from, 1, 2, rng);
        (
            Motion::Settling { target, hop },
            TrajectoryStatus::Moving(TrajectoryPhase::Settled),
        )
    }

    /// Hop `index` of `total`: the first hop may rise highest, the last lowest.
    fn hop(&self, from: Vec3, index: usize, total: usize, rng: &mut TableRng) -> Hop {
        let energy = if total > 1 {
            (total - 1 - index.min(total - 1)) as f32 / (total - 1) as f32
        } else {
            1.0
        };
        let ceiling = self.config.hop_height_low
            + (self.config.hop_height_high - self.config.hop_height_low) * energy;
        Hop {
            from,
            elapsed: 0.0,
            duration: rng.range_f32(self.config.hop_min_secs, self.config.hop_max_secs),
            height: rng.range_f32(self.config.hop_height_floor, ceiling),
        }
    }
}
