use clap::{ArgAction, Subcommand};
use duosnake::{AgentId, Simulation};

#[derive(Subcommand)]
pub enum ViewCommand {
    /// Print a snapshot as JSON (the starting layout unless --after is given)
    Snapshot {
        /// RNG seed for food placement
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Advance this many ticks before taking the snapshot
        #[arg(long, default_value_t = 0)]
        after: u64,
        /// Pretty-print the JSON
        #[arg(long, action = ArgAction::SetTrue, default_value_t = false)]
        pretty: bool,
    },
    /// Summarize the agents after a number of ticks
    Agents {
        /// RNG seed for food placement
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Advance this many ticks before summarizing
        #[arg(long, default_value_t = 0)]
        after: u64,
    },
}

pub(super) fn run_view(cmd: ViewCommand) -> Result<(), String> {
    match cmd {
        ViewCommand::Snapshot {
            seed,
            after,
            pretty,
        } => {
            let sim = advanced(seed, after);
            let snapshot = sim.snapshot();
            let rendered = if pretty {
                snapshot.to_json_pretty()
            } else {
                snapshot.to_json()
            };
            println!("{}", rendered.map_err(|e| e.to_string())?);
        }
        ViewCommand::Agents { seed, after } => {
            let sim = advanced(seed, after);
            let snapshot = sim.snapshot();
            println!(
                "Tick {} | food=({}, {}) | messages={}",
                snapshot.tick,
                snapshot.food.x,
                snapshot.food.y,
                snapshot.recent_messages.len()
            );
            for id in AgentId::ALL {
                let Some(agent) = snapshot.agent(id) else {
                    continue;
                };
                println!(
                    " - {} {} heading {} | head=({}, {}) length={} score={} steps_since_food={}",
                    agent.name,
                    agent.color,
                    agent.direction,
                    agent.head.x,
                    agent.head.y,
                    agent.length,
                    agent.score,
                    agent.steps_since_food
                );
            }
            for message in &snapshot.recent_messages {
                println!("   [{}] {}: {}", message.tick, message.agent, message.text);
            }
        }
    }

    Ok(())
}

fn advanced(seed: u64, ticks: u64) -> Simulation {
    let mut sim = Simulation::seeded(seed);
    for _ in 0..ticks {
        sim.step();
    }
    sim
}
