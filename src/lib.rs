pub mod modules;

pub use modules::engine::{
    Agent, AgentId, Collision, DEFAULT_TICK_MS, FoodSource, GameState, MAX_MESSAGES, Message,
    MessageLog, SPAWN_OFFSET, START_LENGTH, Simulation, TickReport, advance, advance_with_report,
    initialize, starting_agents,
};
pub use modules::grid::{self, BOARD_SIZE, Cell, Direction, distance, in_bounds, step};
pub use modules::occupancy::{OccupancyIndex, Occupant};
pub use modules::planner::{BRAVO_INTERCEPT_LEEWAY, Plan, PlanInput, candidate_moves, plan_move};
pub use modules::stats::{AgentStats, ResetCounts, RunStats};
pub use modules::view::{AgentView, CellView, Snapshot, snapshot};
