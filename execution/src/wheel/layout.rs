//! Pocket positions around the wheel.

use std::collections::BTreeMap;

use croupier_types::WheelVariant;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::{normalize_degrees, point_on_circle};
use crate::ConfigError;

/// Pocket ring geometry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Wheel center in world space.
    pub center: Vec3,
    /// Distance of every pocket origin from the center.
    pub radius: f32,
    /// Angular width of the divider between adjacent pockets.
    pub divider_angle: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            radius: 3.2,
            divider_angle: 1.0,
        }
    }
}

/// Maps an ordered sequence of pocket numbers onto positions around the wheel.
///
/// Slot `i` spans `(360 - N * divider) / N` degrees and is centered at
/// `i * (slot + divider) + slot / 2` in the wheel's local frame.
#[derive(Clone, Debug, PartialEq)]
pub struct PocketLayout {
    order: Vec<u8>,
    slots: BTreeMap<u8, usize>,
    center: Vec3,
    radius: f32,
    divider_angle: f32,
    slot_angle: f32,
}

impl PocketLayout {
    pub fn new(order: &[u8], config: &LayoutConfig) -> Result<Self, ConfigError> {
        if order.is_empty() {
            return Err(ConfigError::EmptyLayout);
        }
        if !(config.radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "layout.radius",
                reason: "must be positive",
            });
        }
        let slot_count = order.len();
        let slot_angle = (360.0 - slot_count as f32 * config.divider_angle) / slot_count as f32;
        if !(config.divider_angle >= 0.0) || !(slot_angle > 0.0) {
            return Err(ConfigError::InvalidDivider {
                slots: slot_count,
                divider: config.divider_angle,
            });
        }

        let mut slots = BTreeMap::new();
        for (idx, &number) in order.iter().enumerate() {
            if slots.insert(number, idx).is_some() {
                return Err(ConfigError::DuplicatePocket(number));
            }
        }

        Ok(Self {
            order: order.to_vec(),
            slots,
            center: config.center,
            radius: config.radius,
            divider_angle: config.divider_angle,
            slot_angle,
        })
    }

    pub fn for_variant(variant: WheelVariant, config: &LayoutConfig) -> Result<Self, ConfigError> {
        Self::new(variant.pocket_order(), config)
    }

    pub fn slot_count(&self) -> usize {
        self.order.len()
    }

    pub fn order(&self) -> &[u8] {
        &self.order
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Angular width of one pocket, dividers excluded.
    pub fn slot_angle(&self) -> f32 {
        self.slot_angle
    }

    /// Index of `number` in the wheel order.
    pub fn index_of(&self, number: u8) -> Option<usize> {
        self.slots.get(&number).copied()
    }

    /// Center angle of slot `index` in the wheel's local frame.
    pub fn local_angle(&self, index: usize) -> f32 {
        index as f32 * (self.slot_angle + self.divider_angle) + self.slot_angle / 2.0
    }

    /// World angle of slot `index` with the wheel turned by `rotation`.
    pub fn angle_at(&self, index: usize, rotation: f32) -> f32 {
        normalize_degrees(self.local_angle(index) - rotation)
    }

    pub fn position_at(&self, index: usize, rotation: f32) -> Vec3 {
        point_on_circle(self.center, self.angle_at(index, rotation), self.radius, 0.0)
    }

    pub fn angle_of(&self, number: u8, rotation: f32) -> Result<f32, ConfigError> {
        let index = self
            .index_of(number)
            .ok_or(ConfigError::UnknownPocket { number })?;
        Ok(self.angle_at(index, rotation))
    }

    /// World position of pocket `number`.
    pub fn position_of(&self, number: u8, rotation: f32) -> Result<Vec3, ConfigError> {
        let index = self
            .index_of(number)
            .ok_or(ConfigError::UnknownPocket { number })?;
        Ok(self.position_at(index, rotation))
    }

    /// Pocket under `world_angle`, or `None` when the angle falls on a divider.
    pub fn number_at_angle(&self, world_angle: f32, rotation: f32) -> Option<u8> {
        let local = normalize_degrees(world_angle + rotation);
        let pitch = self.slot_angle + self.divider_angle;
        let index = (local / pitch).floor() as usize;
        let within = local - index as f32 * pitch;
        if within > self.slot_angle {
            return None;
        }
        self.order.get(index).copied()
    }
}
