use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use auto_2048::autoplay::{play_game, AutoplayOptions, GameSummary};
use auto_2048::engine::GameStatus;
use auto_2048::logging;
use auto_2048::strategy::{StrategyConfig, StrategyKind};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Greedy,
    Rollout,
    Random,
}

impl From<StrategyArg> for StrategyKind {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => StrategyKind::Greedy,
            StrategyArg::Rollout => StrategyKind::Rollout,
            StrategyArg::Random => StrategyKind::Random,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "autoplay", about = "Play headless 2048 games with a move-selection strategy")]
struct Args {
    /// Strategy to play with (overrides the config file)
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,

    /// Seed for a reproducible batch; entropy when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Stop each game after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Keep playing after 2048 is reached
    #[arg(long)]
    keep_going: bool,

    /// JSON strategy config (weights, rollout knobs)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Rollout trials per decision (overrides the config file)
    #[arg(long)]
    trials: Option<usize>,

    /// Evaluate on the calling thread instead of the rayon pool
    #[arg(long)]
    sequential: bool,

    /// Suppress the progress bar
    #[arg(long)]
    quiet: bool,

    /// Debug-level logging (RUST_LOG still wins)
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::setup(args.verbose);

    let mut cfg = match &args.config {
        Some(path) => StrategyConfig::from_json_path(path)
            .with_context(|| format!("loading strategy config from {}", path.display()))?,
        None => StrategyConfig::default(),
    };
    if let Some(kind) = args.strategy {
        cfg.kind = kind.into();
    }
    if let Some(trials) = args.trials {
        cfg.rollout.trials = trials;
    }
    if args.sequential {
        cfg.parallel = false;
    }
    cfg.validate().context("invalid strategy config")?;

    let options = AutoplayOptions { max_steps: args.steps, stop_on_win: !args.keep_going };
    let mut master = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    tracing::info!(kind = ?cfg.kind, games = args.games, seed = ?args.seed, "starting batch");

    let pb = if args.quiet {
        None
    } else {
        let pb = ProgressBar::new(u64::from(args.games));
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:30}] {pos}/{len} | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let start = Instant::now();
    let mut summaries: Vec<GameSummary> = Vec::with_capacity(args.games as usize);
    for _ in 0..args.games {
        // One stream per game so a batch replays game by game.
        let mut rng = StdRng::seed_from_u64(master.gen());
        let mut strategy = cfg.build()?;
        let summary = play_game(strategy.as_mut(), &mut rng, options);
        summaries.push(summary);
        if let Some(pb) = &pb {
            pb.inc(1);
            pb.set_message(format!("last score: {} | best tile: {}", summary.score, summary.highest_tile));
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    report(&cfg, &summaries, start.elapsed());
    Ok(())
}

fn report(cfg: &StrategyConfig, summaries: &[GameSummary], elapsed: Duration) {
    if summaries.is_empty() {
        println!("games=0");
        return;
    }
    let mut scores: Vec<u64> = summaries.iter().map(|s| s.score).collect();
    scores.sort_unstable();
    let total: u64 = scores.iter().sum();
    let moves: u64 = summaries.iter().map(|s| s.moves).sum();
    let wins = summaries.iter().filter(|s| s.status == GameStatus::Won || s.highest_tile >= 2048).count();
    let mut tiles: BTreeMap<u32, usize> = BTreeMap::new();
    for s in summaries {
        *tiles.entry(s.highest_tile).or_default() += 1;
    }

    println!("strategy={:?}", cfg.kind);
    println!("games={}", summaries.len());
    println!("avg_score={:.1}", total as f64 / summaries.len() as f64);
    println!("median_score={}", scores[scores.len() / 2]);
    println!("min_score={}", scores[0]);
    println!("max_score={}", scores[scores.len() - 1]);
    println!("wins={}", wins);
    println!("moves={}", moves);
    println!("moves_per_sec={:.1}", moves as f64 / elapsed.as_secs_f64().max(1e-6));
    for (tile, count) in tiles.iter().rev() {
        println!("highest_tile[{}]={}", tile, count);
    }
}
