use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{ensure, Context};
use croupier_execution::TableConfig;
use croupier_types::ChipType;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Service configuration (from the `--config` YAML file).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveTableConfig {
    pub log_level: String,
    /// Structured JSON log lines instead of the human format.
    pub json_logs: bool,
    /// Table time advanced per tick.
    pub tick_ms: u64,
    /// Pace ticks against the wall clock. Otherwise ticks run back to back.
    pub realtime: bool,
    /// Stop after this many resolved rounds. Zero runs until interrupted.
    pub rounds: u64,
    /// Results to rig, cycled round by round. Empty leaves the wheel's draw.
    pub fixed_targets: Vec<u8>,
    /// Table state is restored from here at start and written back on exit.
    pub snapshot_path: Option<PathBuf>,
    pub table: TableConfig,
    pub autoplayer: AutoplayerConfig,
}

impl Default for LiveTableConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            tick_ms: 16,
            realtime: false,
            rounds: 10,
            fixed_targets: Vec::new(),
            snapshot_path: None,
            table: TableConfig::default(),
            autoplayer: AutoplayerConfig::default(),
        }
    }
}

impl LiveTableConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("could not parse config file {}", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.level()?;
        ensure!(self.tick_ms > 0, "tick_ms must be greater than zero");
        let variant = self.table.wheel.variant;
        if let Some(&number) = self.fixed_targets.iter().find(|&&n| !variant.contains(n)) {
            anyhow::bail!("fixed target {number} is not on a {variant} wheel");
        }
        self.table.validate().context("invalid table config")?;
        self.autoplayer.validate()
    }

    pub fn level(&self) -> anyhow::Result<Level> {
        Level::from_str(&self.log_level)
            .with_context(|| format!("invalid log level {:?}", self.log_level))
    }
}

/// Simulated player placing random bets each round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoplayerConfig {
    pub enabled: bool,
    pub seed: u64,
    pub bets_per_round_min: u8,
    pub bets_per_round_max: u8,
    /// Chips to pick from, as face values.
    pub chips: Vec<ChipType>,
    /// Probability of undoing the previous bet after each placement.
    pub undo_chance: f64,
}

impl Default for AutoplayerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 42,
            bets_per_round_min: 1,
            bets_per_round_max: 3,
            chips: vec![ChipType::One, ChipType::Five, ChipType::Ten],
            undo_chance: 0.1,
        }
    }
}

impl AutoplayerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        ensure!(
            self.bets_per_round_min <= self.bets_per_round_max,
            "bets_per_round_min ({}) exceeds bets_per_round_max ({})",
            self.bets_per_round_min,
            self.bets_per_round_max
        );
        ensure!(!self.chips.is_empty(), "autoplayer needs at least one chip");
        ensure!(
            (0.0..=1.0).contains(&self.undo_chance),
            "undo_chance must be within [0, 1]"
        );
        Ok(())
    }
}
