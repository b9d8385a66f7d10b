use std::collections::VecDeque;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::modules::grid::{self, BOARD_SIZE, Cell, Direction};
use crate::modules::occupancy::OccupancyIndex;
use crate::modules::planner::{Plan, PlanInput, plan_move};
use crate::modules::view::{Snapshot, snapshot};

/// Capacity of the status message log.
pub const MAX_MESSAGES: usize = 9;
/// Body length of each agent at spawn.
pub const START_LENGTH: i32 = 3;
/// Distance of each spawn head from the board center.
pub const SPAWN_OFFSET: i32 = 4;
/// Suggested driver cadence in milliseconds; the engine itself is untimed.
pub const DEFAULT_TICK_MS: u64 = 180;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentId {
    Alpha,
    Bravo,
}

impl AgentId {
    /// Processing order within a tick.
    pub const ALL: [AgentId; 2] = [AgentId::Alpha, AgentId::Bravo];

    pub const fn label(self) -> &'static str {
        match self {
            AgentId::Alpha => "Alpha",
            AgentId::Bravo => "Bravo",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            AgentId::Alpha => "#4caf50",
            AgentId::Bravo => "#2196f3",
        }
    }

    pub const fn partner(self) -> Self {
        match self {
            AgentId::Alpha => AgentId::Bravo,
            AgentId::Bravo => AgentId::Alpha,
        }
    }

    const fn index(self) -> usize {
        match self {
            AgentId::Alpha => 0,
            AgentId::Bravo => 1,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One snake. `body` runs head first, tail last, and is never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    pub score: u32,
    pub steps_since_food: u32,
}

impl Agent {
    pub fn new(id: AgentId, body: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let body: VecDeque<Cell> = body.into_iter().collect();
        assert!(!body.is_empty(), "agent {} needs at least one segment", id);
        Self {
            id,
            body,
            direction,
            score: 0,
            steps_since_food: 0,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn tail(&self) -> Cell {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn color(&self) -> &'static str {
        self.id.color()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub tick: u64,
    pub agent: AgentId,
    pub text: String,
}

/// Chronological status log; trimmed to the newest entries once per tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn push(&mut self, message: Message) {
        self.entries.push(message);
    }

    /// Drop the oldest entries until at most `limit` remain.
    pub fn trim(&mut self, limit: usize) {
        if self.entries.len() > limit {
            let drop = self.entries.len() - limit;
            self.entries.drain(0..drop);
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Complete simulation state. Each tick produces a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub agents: [Agent; 2],
    pub food: Cell,
    pub tick: u64,
    pub messages: MessageLog,
}

impl GameState {
    /// A tick-zero state with an empty log.
    pub fn from_parts(agents: [Agent; 2], food: Cell) -> Self {
        Self {
            agents,
            food,
            tick: 0,
            messages: MessageLog::default(),
        }
    }

    pub fn agent(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    pub fn alpha(&self) -> &Agent {
        self.agent(AgentId::Alpha)
    }

    pub fn bravo(&self) -> &Agent {
        self.agent(AgentId::Bravo)
    }

    pub fn occupancy(&self) -> OccupancyIndex {
        OccupancyIndex::build(self.agents.iter())
    }
}

/// A move that ends the run and forces a reset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall {
        agent: AgentId,
        cell: Cell,
    },
    SelfBody {
        agent: AgentId,
        cell: Cell,
    },
    Partner {
        agent: AgentId,
        partner: AgentId,
        cell: Cell,
    },
}

impl Collision {
    pub fn agent(&self) -> AgentId {
        match self {
            Collision::Wall { agent, .. }
            | Collision::SelfBody { agent, .. }
            | Collision::Partner { agent, .. } => *agent,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Collision::Wall { .. } => "wall",
            Collision::SelfBody { .. } => "self",
            Collision::Partner { .. } => "partner",
        }
    }
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collision::Wall { agent, cell } => {
                write!(f, "{} ran into the wall at {}", agent, cell)
            }
            Collision::SelfBody { agent, cell } => {
                write!(f, "{} ran into its own body at {}", agent, cell)
            }
            Collision::Partner {
                agent,
                partner,
                cell,
            } => write!(f, "{} ran into {} at {}", agent, partner, cell),
        }
    }
}

impl std::error::Error for Collision {}

/// Where new food comes from. Implemented for [`StdRng`]; tests plug in
/// scripted sequences.
pub trait FoodSource {
    /// Choose one of `free`, or `None` when nothing fits.
    fn pick(&mut self, free: &[Cell]) -> Option<Cell>;
}

impl FoodSource for StdRng {
    fn pick(&mut self, free: &[Cell]) -> Option<Cell> {
        free.choose(self).copied()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Tick counter of the resulting state.
    pub tick: u64,
    pub eaten: Vec<AgentId>,
    /// Set when the tick ended in a reset.
    pub collision: Option<Collision>,
}

/// The two agents as they stand at the start of every run: three segments
/// each, mirrored around the center row and facing each other.
pub fn starting_agents() -> [Agent; 2] {
    let mid = BOARD_SIZE / 2;
    let alpha_head = Cell::new(mid - SPAWN_OFFSET, mid);
    let bravo_head = Cell::new(mid + SPAWN_OFFSET, mid);

    [
        Agent::new(
            AgentId::Alpha,
            (0..START_LENGTH).map(|i| alpha_head.offset(-i, 0)),
            Direction::Right,
        ),
        Agent::new(
            AgentId::Bravo,
            (0..START_LENGTH).map(|i| bravo_head.offset(i, 0)),
            Direction::Left,
        ),
    ]
}

pub fn initialize<F: FoodSource + ?Sized>(source: &mut F) -> GameState {
    let agents = starting_agents();
    let occupancy = OccupancyIndex::build(agents.iter());
    let food = spawn_food(&occupancy, source);
    GameState::from_parts(agents, food)
}

/// Run one tick. A collision yields a fresh [`initialize`] state.
pub fn advance<F: FoodSource + ?Sized>(state: &GameState, source: &mut F) -> GameState {
    advance_with_report(state, source).0
}

pub fn advance_with_report<F: FoodSource + ?Sized>(
    state: &GameState,
    source: &mut F,
) -> (GameState, TickReport) {
    match resolve_tick(state, source) {
        Ok((next, eaten)) => {
            let report = TickReport {
                tick: next.tick,
                eaten,
                collision: None,
            };
            (next, report)
        }
        Err(collision) => {
            info!(
                tick = state.tick,
                agent = %collision.agent(),
                cause = collision.label(),
                "{}; resetting",
                collision
            );
            let fresh = initialize(source);
            let report = TickReport {
                tick: fresh.tick,
                eaten: Vec::new(),
                collision: Some(collision),
            };
            (fresh, report)
        }
    }
}

/// Apply both agents' moves in order, or report the first collision.
pub(crate) fn resolve_tick<F: FoodSource + ?Sized>(
    state: &GameState,
    source: &mut F,
) -> Result<(GameState, Vec<AgentId>), Collision> {
    let mut next = state.clone();
    let mut occupancy = next.occupancy();
    let mut food_claimed = false;
    let mut eaten = Vec::new();

    for id in AgentId::ALL {
        let plan = apply_agent_move(&mut next, id, &mut occupancy, food_claimed, source)?;
        food_claimed |= plan.pursuing;
        if plan.eats {
            eaten.push(id);
        }
    }

    next.messages.trim(MAX_MESSAGES);
    next.tick += 1;
    Ok((next, eaten))
}

fn apply_agent_move<F: FoodSource + ?Sized>(
    state: &mut GameState,
    id: AgentId,
    occupancy: &mut OccupancyIndex,
    food_claimed: bool,
    source: &mut F,
) -> Result<Plan, Collision> {
    let plan = plan_move(PlanInput {
        agent: state.agent(id),
        partner: state.agent(id.partner()),
        food: state.food,
        occupancy: &*occupancy,
        food_claimed,
    });

    if let Some(text) = plan.message.clone() {
        state.messages.push(Message {
            tick: state.tick,
            agent: id,
            text,
        });
    }

    let agent = &mut state.agents[id.index()];
    let head = grid::step(agent.head(), plan.direction);
    if !grid::in_bounds(head) {
        return Err(Collision::Wall {
            agent: id,
            cell: head,
        });
    }

    let grows = plan.eats;
    if let Some(occupant) = occupancy.get(head) {
        if !occupancy.is_enterable(head, id, grows) {
            return Err(if occupant.agent == id {
                Collision::SelfBody {
                    agent: id,
                    cell: head,
                }
            } else {
                Collision::Partner {
                    agent: id,
                    partner: occupant.agent,
                    cell: head,
                }
            });
        }
    }

    if !grows {
        occupancy.vacate(agent.tail());
    }
    agent.direction = plan.direction;
    agent.body.push_front(head);
    if grows {
        agent.score += 1;
        agent.steps_since_food = 0;
    } else {
        agent.body.pop_back();
        agent.steps_since_food += 1;
    }
    occupancy.claim(head, id, false);
    occupancy.claim(agent.tail(), id, true);

    debug!(
        tick = state.tick,
        agent = %id,
        direction = %plan.direction,
        %head,
        length = agent.len(),
        grows,
        "moved"
    );

    if grows {
        state.food = spawn_food(occupancy, source);
        debug!(tick = state.tick, agent = %id, food = %state.food, "food eaten and respawned");
    }

    Ok(plan)
}

/// Pick a free cell for food, falling back to the origin on a full board.
fn spawn_food<F: FoodSource + ?Sized>(occupancy: &OccupancyIndex, source: &mut F) -> Cell {
    let free = occupancy.free_cells();
    source
        .pick(&free)
        .filter(|cell| grid::in_bounds(*cell) && !occupancy.is_occupied(*cell))
        .or_else(|| free.first().copied())
        .unwrap_or_else(Cell::origin)
}

/// Owns the current state and its food source; each step replaces the state.
#[derive(Debug)]
pub struct Simulation<F = StdRng> {
    state: GameState,
    source: F,
}

impl Simulation<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<F: FoodSource> Simulation<F> {
    pub fn new(mut source: F) -> Self {
        let state = initialize(&mut source);
        Self { state, source }
    }

    /// Resume from an existing state.
    pub fn with_state(state: GameState, source: F) -> Self {
        Self { state, source }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot(&self.state)
    }

    pub fn step(&mut self) -> TickReport {
        let (next, report) = advance_with_report(&self.state, &mut self.source);
        self.state = next;
        report
    }

    pub fn reset(&mut self) {
        self.state = initialize(&mut self.source);
    }
}
