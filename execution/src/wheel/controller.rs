use std::time::Duration;

use croupier_types::{BallStopped, GamePhase, TargetSelected, WheelSave, WheelVariant};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{
    normalize_degrees, point_on_circle, BallTrajectory, JumpLattice, JumpRingConfig,
    LayoutConfig, PocketLayout, TrajectoryConfig, TrajectoryPhase, TrajectoryStatus, WheelFrame,
};
use crate::{ConfigError, Saveable, Signal, SnapshotError, TableRng};

/// Deflectors on the stationary bowl.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiamondConfig {
    pub count: usize,
    pub radius: f32,
    pub height: f32,
    /// Plane angle of the first diamond.
    pub offset_angle: f32,
}

impl Default for DiamondConfig {
    fn default() -> Self {
        Self {
            count: 8,
            radius: 4.74,
            height: 2.04,
            offset_angle: 0.0,
        }
    }
}

impl DiamondConfig {
    pub fn positions(&self, center: Vec3) -> Vec<Vec3> {
        let step = if self.count > 0 {
            360.0 / self.count as f32
        } else {
            0.0
        };
        (0..self.count)
            .map(|i| {
                let angle = self.offset_angle + i as f32 * step;
                point_on_circle(center, angle, self.radius, self.height)
            })
            .collect()
    }
}

/// Everything needed to build a wheel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    pub variant: WheelVariant,
    /// Wheel angular speed in degrees per second.
    pub rotation_speed: f32,
    pub layout: LayoutConfig,
    pub jump_rings: JumpRingConfig,
    pub diamonds: DiamondConfig,
    pub trajectory: TrajectoryConfig,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            variant: WheelVariant::default(),
            rotation_speed: 10.0,
            layout: LayoutConfig::default(),
            jump_rings: JumpRingConfig::default(),
            diamonds: DiamondConfig::default(),
            trajectory: TrajectoryConfig::default(),
        }
    }
}

impl WheelConfig {
    pub fn with_variant(variant: WheelVariant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.trajectory.validate()?;
        if !self.rotation_speed.is_finite()
            || !(self.trajectory.spin_speed + self.rotation_speed > 0.0)
        {
            return Err(ConfigError::Invalid {
                field: "rotation_speed",
                reason: "ball must outrun the wheel",
            });
        }
        Ok(())
    }
}

/// Owns the wheel geometry and the ball, and turns phase changes into spins.
#[derive(Debug)]
pub struct WheelController {
    variant: WheelVariant,
    layout: PocketLayout,
    lattice: JumpLattice,
    diamonds: Vec<Vec3>,
    rotation: f32,
    rotation_speed: f32,
    ball: BallTrajectory,
    target: u8,
    rng: TableRng,
    target_selected: Signal<TargetSelected>,
    ball_stopped: Signal<BallStopped>,
}

impl WheelController {
    /// Build the wheel, put the ball in idle orbit and draw a first target.
    pub fn new(config: &WheelConfig, rng: TableRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = PocketLayout::for_variant(config.variant, &config.layout)?;
        let center = config.layout.center;
        let mut wheel = Self {
            variant: config.variant,
            layout,
            lattice: JumpLattice::new(center, &config.jump_rings),
            diamonds: config.diamonds.positions(center),
            rotation: 0.0,
            rotation_speed: config.rotation_speed,
            ball: BallTrajectory::new(config.trajectory, center),
            target: 0,
            rng,
            target_selected: Signal::replaying("target_selected"),
            ball_stopped: Signal::one_shot("ball_stopped"),
        };
        wheel.enter_betting();
        Ok(wheel)
    }

    pub fn variant(&self) -> WheelVariant {
        self.variant
    }

    pub fn slot_count(&self) -> u8 {
        self.variant.slot_count()
    }

    pub fn layout(&self) -> &PocketLayout {
        &self.layout
    }

    pub fn lattice(&self) -> &JumpLattice {
        &self.lattice
    }

    pub fn diamonds(&self) -> &[Vec3] {
        &self.diamonds
    }

    /// Current wheel rotation in degrees.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn ball_position(&self) -> Vec3 {
        self.ball.position()
    }

    pub fn ball_phase(&self) -> TrajectoryPhase {
        self.ball.phase()
    }

    /// Number the next spin will land on.
    pub fn target(&self) -> u8 {
        self.target
    }

    pub fn is_spinning(&self) -> bool {
        self.ball.is_in_flight()
    }

    pub fn pocket_position(&self, number: u8) -> Result<Vec3, ConfigError> {
        self.layout.position_of(number, self.rotation)
    }

    /// Override the next result.
    pub fn set_target(&mut self, number: u8) -> Result<(), ConfigError> {
        if !self.variant.contains(number) {
            return Err(ConfigError::TargetOutOfRange {
                number,
                slot_count: self.slot_count(),
            });
        }
        self.target = number;
        debug!(number, "target selected");
        self.target_selected.publish(TargetSelected { number });
        Ok(())
    }

    /// Draw a uniformly random target.
    pub fn draw_target(&mut self) -> u8 {
        let number = self.rng.pocket(self.slot_count());
        self.target = number;
        debug!(number, "target drawn");
        self.target_selected.publish(TargetSelected { number });
        number
    }

    /// Launch the ball toward the current target. Ignored while a spin is in flight.
    pub fn spin(&mut self) -> Result<(), ConfigError> {
        if self.ball.is_in_flight() {
            debug!(target = self.target, "spin already in flight");
            return Ok(());
        }
        if let Err(err) = self.ball.spin_to(self.target, &self.layout) {
            error!(?err, target = self.target, "target pocket missing from layout");
            return Err(err);
        }
        info!(target = self.target, rotation = self.rotation, "wheel spinning");
        Ok(())
    }

    pub fn on_phase_changed(&mut self, phase: GamePhase) -> Result<(), ConfigError> {
        match phase {
            GamePhase::Betting => {
                self.enter_betting();
                Ok(())
            }
            GamePhase::Spinning => self.spin(),
            GamePhase::Result => Ok(()),
        }
    }

    /// Turn the wheel and advance the ball. Returns the landing on the tick it happens.
    pub fn tick(&mut self, dt: Duration) -> Option<BallStopped> {
        let secs = dt.as_secs_f32();
        self.rotation = normalize_degrees(self.rotation + self.rotation_speed * secs);
        let frame = WheelFrame {
            layout: &self.layout,
            lattice: &self.lattice,
            diamonds: &self.diamonds,
            rotation: self.rotation,
        };
        match self.ball.tick(secs, &frame, &mut self.rng) {
            TrajectoryStatus::Stopped(event) => {
                info!(result = event.result_number, "ball stopped");
                self.ball_stopped.publish(event);
                Some(event)
            }
            _ => None,
        }
    }

    pub fn target_selected(&mut self) -> &mut Signal<TargetSelected> {
        &mut self.target_selected
    }

    pub fn ball_stopped(&mut self) -> &mut Signal<BallStopped> {
        &mut self.ball_stopped
    }

    fn enter_betting(&mut self) {
        self.ball.idle();
        self.draw_target();
    }
}

impl Saveable for WheelController {
    const SAVE_KEY: &'static str = "wheel";
    type State = WheelSave;

    fn capture_state(&self) -> WheelSave {
        WheelSave {
            target_number: self.target,
        }
    }

    fn restore_state(&mut self, state: WheelSave) -> Result<(), SnapshotError> {
        self.set_target(state.target_number)?;
        Ok(())
    }
}
