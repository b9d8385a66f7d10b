use std::io::{self, Write};
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use duosnake::{DEFAULT_TICK_MS, GameState, RunStats, Simulation, TickReport};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod view;

use view::{ViewCommand, run_view};

#[derive(Parser)]
#[command(
    name = "duosnake",
    version,
    about = "Two cooperative snakes sharing one food pellet on an 18x18 board",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Drive the simulation at a fixed cadence
    Run {
        /// Number of ticks to run (omit for continuous)
        #[arg(short = 't', long)]
        ticks: Option<u64>,
        /// Desired tick rate (ticks per second). If set, overrides delay-ms.
        #[arg(long)]
        tick_rate: Option<f64>,
        /// Delay between ticks in milliseconds
        #[arg(short = 'd', long, default_value_t = DEFAULT_TICK_MS)]
        delay_ms: u64,
        /// RNG seed for reproducible food placement
        #[arg(long)]
        seed: Option<u64>,
        /// Print one snapshot JSON document per tick instead of text
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        json: bool,
        /// Only print the final summary
        #[arg(short = 'q', long, action = ArgAction::SetTrue, default_value_t = false)]
        quiet: bool,
    },
    /// Inspect a state without driving it
    View {
        #[command(subcommand)]
        command: ViewCommand,
    },
}

pub fn run() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run {
            ticks,
            tick_rate,
            delay_ms,
            seed,
            json,
            quiet,
        } => {
            let delay = tick_delay(tick_rate, delay_ms)?;
            let output = match (json, quiet) {
                (_, true) => Output::Quiet,
                (true, false) => Output::Json,
                (false, false) => Output::Text,
            };
            run_simulation(ticks, delay, seed, output)
        }
        Command::View { command } => run_view(command),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Text,
    Json,
    Quiet,
}

fn tick_delay(tick_rate: Option<f64>, delay_ms: u64) -> Result<Duration, String> {
    match tick_rate {
        Some(rate) => {
            if !rate.is_finite() || rate <= 0.0 {
                return Err("tick_rate must be a positive number".into());
            }
            Ok(Duration::from_secs_f64(1.0 / rate))
        }
        None => Ok(Duration::from_millis(delay_ms)),
    }
}

fn run_simulation(
    ticks: Option<u64>,
    delay: Duration,
    seed: Option<u64>,
    output: Output,
) -> Result<(), String> {
    let mut sim = match seed {
        Some(seed) => Simulation::seeded(seed),
        None => Simulation::from_entropy(),
    };
    let mut stats = RunStats::new();
    info!(?seed, ?ticks, delay_ms = delay.as_millis() as u64, "simulation started");

    if output == Output::Json {
        emit_json(sim.state())?;
    }

    let mut remaining = ticks;
    loop {
        match remaining {
            Some(0) => break,
            Some(ref mut n) => *n -= 1,
            None => {}
        }

        let processed = sim.state().tick;
        let report = sim.step();
        stats.record(&report, sim.state());

        match output {
            Output::Text => print_tick(&report, processed, sim.state()),
            Output::Json => emit_json(sim.state())?,
            Output::Quiet => {}
        }

        if remaining == Some(0) {
            break;
        }
        if delay > Duration::ZERO {
            std::thread::sleep(delay);
        }
    }

    for line in stats.summary_lines() {
        if output == Output::Json {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
    Ok(())
}

fn emit_json(state: &GameState) -> Result<(), String> {
    let json = duosnake::snapshot(state)
        .to_json()
        .map_err(|e| format!("serialize snapshot: {}", e))?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", json).map_err(|e| e.to_string())?;
    if let Err(err) = stdout.flush() {
        warn!(%err, "failed to flush stdout");
    }
    Ok(())
}

fn print_tick(report: &TickReport, processed: u64, state: &GameState) {
    if let Some(collision) = &report.collision {
        println!("Tick {}: {} -> reset", processed, collision);
        return;
    }

    let scores: Vec<String> = state
        .agents
        .iter()
        .map(|a| format!("{} len={} score={} head={}", a.id, a.len(), a.score, a.head()))
        .collect();
    println!(
        "Tick {}: {} | food={}",
        report.tick,
        scores.join(" | "),
        state.food
    );
    for id in &report.eaten {
        println!(" - {} ate", id);
    }
    for message in state.messages.entries().iter().filter(|m| m.tick == processed) {
        println!(" - {}: {}", message.agent, message.text);
    }
}
