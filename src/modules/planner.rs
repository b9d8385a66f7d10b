use tracing::trace;

use crate::modules::engine::{Agent, AgentId};
use crate::modules::grid::{self, Cell, Direction};
use crate::modules::occupancy::OccupancyIndex;

/// Extra distance Bravo tolerates when deciding to intercept food Alpha has
/// not committed to.
pub const BRAVO_INTERCEPT_LEEWAY: i32 = 1;

/// Everything an agent looks at before choosing its move.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub agent: &'a Agent,
    pub partner: &'a Agent,
    pub food: Cell,
    pub occupancy: &'a OccupancyIndex,
    /// Set when an earlier mover this tick already committed to the food.
    pub food_claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub direction: Direction,
    pub pursuing: bool,
    pub eats: bool,
    pub target: Cell,
    pub message: Option<String>,
}

pub fn plan_move(input: PlanInput<'_>) -> Plan {
    let agent = input.agent;
    let head = agent.head();
    let own_distance = grid::distance(head, input.food);
    let partner_distance = grid::distance(input.partner.head(), input.food);

    let pursuing = match agent.id {
        AgentId::Alpha => own_distance <= partner_distance,
        AgentId::Bravo => {
            !input.food_claimed && own_distance <= partner_distance + BRAVO_INTERCEPT_LEEWAY
        }
    };
    let target = if pursuing { input.food } else { agent.tail() };
    let anticipates_growth = pursuing && own_distance == 1;

    let mut candidates = candidate_moves(agent, input.occupancy, anticipates_growth);
    candidates.sort_by_key(|(_, cell)| grid::distance(*cell, target));

    let (direction, next) = candidates
        .first()
        .copied()
        .unwrap_or_else(|| (agent.direction, grid::step(head, agent.direction)));
    let eats = pursuing && next == input.food;

    trace!(
        agent = %agent.id,
        pursuing,
        %direction,
        %target,
        options = candidates.len(),
        "planned move"
    );

    Plan {
        direction,
        pursuing,
        eats,
        target,
        message: status_message(agent.id, pursuing, input.food_claimed, input.food),
    }
}

/// Safe moves for `agent`, current heading first, then the remaining
/// directions in canonical order. Reversal is never offered.
pub fn candidate_moves(
    agent: &Agent,
    occupancy: &OccupancyIndex,
    anticipates_growth: bool,
) -> Vec<(Direction, Cell)> {
    let head = agent.head();
    let reverse = agent.direction.opposite();

    std::iter::once(agent.direction)
        .chain(
            Direction::ALL
                .into_iter()
                .filter(|dir| *dir != agent.direction),
        )
        .filter(|dir| *dir != reverse)
        .map(|dir| (dir, grid::step(head, dir)))
        .filter(|(_, cell)| grid::in_bounds(*cell))
        .filter(|(_, cell)| occupancy.is_enterable(*cell, agent.id, anticipates_growth))
        .collect()
}

fn status_message(id: AgentId, pursuing: bool, food_claimed: bool, food: Cell) -> Option<String> {
    match id {
        AgentId::Alpha if pursuing => Some(format!("tracking food at {}", food)),
        AgentId::Alpha => Some("optimizing coil while Bravo closes in".to_string()),
        AgentId::Bravo if pursuing => Some(format!("intercepting food at {}", food)),
        AgentId::Bravo if food_claimed => Some("condensing tail while Alpha feeds".to_string()),
        AgentId::Bravo => None,
    }
}
