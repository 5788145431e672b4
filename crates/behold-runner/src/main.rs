//! Behold headless runner
//!
//! Spawns an arena, lets the autopilot photographer play the story through
//! and writes the news feed it produced.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use behold_core::{default_config_toml, SeedPolicy, Session};
use behold_runner::{play, FeedWriter, HostSettings, RunOptions};
use clap::Parser;
use newsroom::{create_backend, BackendKind, HeadlineDesk, NewsroomConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the runner
#[derive(Parser, Debug)]
#[command(name = "behold")]
#[command(about = "Photograph a crowd until the news turns it on itself")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// TOML config file (game sections and [newsroom])
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 300)]
    duration_secs: u64,

    /// Frame length in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u32,

    /// Directory for feed.jsonl and summary.json
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Never call a headline backend
    #[arg(long)]
    offline: bool,

    /// Pace frames against the wall clock
    #[arg(long)]
    realtime: bool,

    /// What to do when a seed step finds nobody suitable (strict, recruit).
    /// Overrides the config file; recruit when neither sets it
    #[arg(long)]
    seed_policy: Option<SeedPolicy>,

    /// Autopilot idle time before each shot, in milliseconds
    #[arg(long, default_value_t = 500)]
    settle_ms: u32,

    /// Keep playing after the ending until the duration runs out
    #[arg(long)]
    replay: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", default_config_toml());
        println!();
        println!("[newsroom]");
        print!("{}", toml::to_string(&NewsroomConfig::default())?);
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let HostSettings {
        game: config,
        mut newsroom,
    } = HostSettings::load(args.config.as_deref(), args.seed_policy)?;
    if args.offline {
        newsroom.backend = BackendKind::Offline;
    }

    info!(
        seed = args.seed,
        seed_policy = ?config.narrative.seed_policy,
        peeps = config.population.peep_count,
        "configuration loaded"
    );

    let backend = create_backend(&newsroom, newsroom.api_key());
    let desk = Arc::new(HeadlineDesk::new(
        backend,
        Duration::from_millis(newsroom.timeout_ms),
    ));

    let options = RunOptions {
        frame_ms: args.frame_ms,
        duration_ms: args.duration_secs.saturating_mul(1000),
        realtime: args.realtime,
        settle_ms: args.settle_ms,
        replay: args.replay,
    };

    let mut session = Session::new(config, args.seed);
    let mut feed = FeedWriter::new(&args.output)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(play(&mut session, desk, &mut feed, &options))?;

    feed.write_summary(&report.summary, session.state())?;

    info!(
        completed = report.completed,
        posts = report.posts_written,
        shots = report.shots,
        output = %feed.output_dir().display(),
        "run complete"
    );
    Ok(())
}
