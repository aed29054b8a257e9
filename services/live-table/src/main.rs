mod autoplayer;
mod config;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use croupier_execution::{RoundOutcome, Snapshot, Table, WalletService};
use croupier_types::{BalanceChanged, BetResult, GamePhase, PhaseChanged};
use tokio::time;
use tracing::{debug, info, warn};

use autoplayer::Autoplayer;
use config::LiveTableConfig;

/// Drives one table: bets for the autoplayer, rigs targets, spins, ticks.
struct Session {
    table: Table,
    autoplayer: Autoplayer,
    fixed_targets: Vec<u8>,
    manual_spin: bool,
    prepared_round: Option<u64>,
    rounds_played: u64,
}

impl Session {
    fn new(config: &LiveTableConfig) -> anyhow::Result<Self> {
        let table = Table::new(&config.table).context("invalid table config")?;
        Ok(Self {
            table,
            autoplayer: Autoplayer::new(config.autoplayer.clone()),
            fixed_targets: config.fixed_targets.clone(),
            manual_spin: !config.table.phases.is_timed_betting(),
            prepared_round: None,
            rounds_played: 0,
        })
    }

    /// Prepare the round once when betting opens, then advance table time.
    fn step(&mut self, dt: Duration) -> anyhow::Result<Option<RoundOutcome>> {
        let round_id = self.table.round_id();
        if self.table.phase() == GamePhase::Betting && self.prepared_round != Some(round_id) {
            self.prepared_round = Some(round_id);
            self.autoplayer.play(&mut self.table);
            if !self.fixed_targets.is_empty() {
                let index = (self.rounds_played as usize) % self.fixed_targets.len();
                self.table
                    .set_target(self.fixed_targets[index])
                    .context("fixed target rejected")?;
            }
            if self.manual_spin {
                self.table.request_spin().context("spin failed")?;
            }
        }

        let outcome = self.table.tick(dt).context("tick failed")?;
        if let Some(outcome) = &outcome {
            self.rounds_played += 1;
            info!(
                round_id = outcome.round_id,
                result = %outcome.history.label,
                color = ?outcome.history.color,
                staked = outcome.resolution.total_staked,
                paid = outcome.result.winning_amount,
                balance = self.table.balance(),
                "round resolved"
            );
        }
        Ok(outcome)
    }

    /// Whether the player can no longer cover the cheapest chip.
    fn is_broke(&self) -> bool {
        self.autoplayer.is_enabled()
            && self.table.bets().total_bet() == 0
            && self
                .autoplayer
                .min_chip()
                .is_some_and(|chip| self.table.balance() < chip.value())
    }

    fn watch(&mut self) {
        self.table.phase_changed().subscribe(|event: &PhaseChanged| {
            debug!(round_id = event.round_id, phase = event.phase.as_str(), "phase")
        });
        self.table.bet_result().subscribe(|event: &BetResult| {
            debug!(
                winner = event.winner_number,
                won = event.winning_amount,
                lost = event.lose_amount,
                "bet result"
            )
        });
        self.table
            .wallet_mut()
            .balance_changed()
            .subscribe(|event: &BalanceChanged| {
                debug!(balance = event.balance, profit = event.profit, "balance")
            });
    }
}

fn init_tracing(config: &LiveTableConfig) -> anyhow::Result<()> {
    let level = config.level()?;
    let builder = tracing_subscriber::fmt().with_max_level(level);
    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| anyhow::anyhow!("could not initialise logging: {err}"))
}

fn load_snapshot(path: &Path) -> anyhow::Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("could not read snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("could not parse snapshot {}", path.display()))?;
    Ok(Some(snapshot))
}

fn save_snapshot<W: WalletService + 'static>(table: &Table<W>, path: &Path) -> anyhow::Result<()> {
    let snapshot = table.capture().context("could not capture table state")?;
    let raw = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(path, raw)
        .with_context(|| format!("could not write snapshot {}", path.display()))?;
    info!(path = %path.display(), "snapshot saved");
    Ok(())
}

async fn run(session: &mut Session, config: &LiveTableConfig) -> anyhow::Result<()> {
    let dt = Duration::from_millis(config.tick_ms);
    let mut interval = time::interval(dt);
    interval.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if config.realtime {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    return Ok(());
                }
            }
        } else {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    return Ok(());
                }
                _ = tokio::task::yield_now() => {}
            }
        }

        session.step(dt)?;
        if config.rounds > 0 && session.rounds_played >= config.rounds {
            return Ok(());
        }
        if session.table.phase() == GamePhase::Betting && session.is_broke() {
            warn!(balance = session.table.balance(), "player is out of chips");
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments
    let matches = Command::new("live-table")
        .about("Run a headless roulette table.")
        .arg(Arg::new("config").long("config").required(false))
        .arg(
            Arg::new("seed")
                .long("seed")
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("rounds")
                .long("rounds")
                .required(false)
                .value_parser(value_parser!(u64)),
        )
        .get_matches();

    // Load from config file
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => LiveTableConfig::load(path)?,
        None => LiveTableConfig::default(),
    };
    if let Some(&seed) = matches.get_one::<u64>("seed") {
        config.table.seed = Some(seed);
    }
    if let Some(&rounds) = matches.get_one::<u64>("rounds") {
        config.rounds = rounds;
    }
    config.validate()?;

    // Setup logging
    init_tracing(&config)?;
    info!(
        variant = %config.table.wheel.variant,
        seed = ?config.table.seed,
        rounds = config.rounds,
        tick_ms = config.tick_ms,
        realtime = config.realtime,
        "starting live table"
    );

    let mut session = Session::new(&config)?;
    session.watch();
    if let Some(path) = &config.snapshot_path {
        if let Some(snapshot) = load_snapshot(path)? {
            let restored = session
                .table
                .restore(&snapshot)
                .context("snapshot does not fit this table")?;
            info!(restored, path = %path.display(), "snapshot restored");
        }
    }

    run(&mut session, &config).await?;

    if let Some(path) = &config.snapshot_path {
        save_snapshot(&session.table, path)?;
    }
    info!(
        rounds = session.rounds_played,
        balance = session.table.balance(),
        profit = session.table.wallet().profit(),
        history = session.table.history().len(),
        "live table stopped"
    );
    Ok(())
}
