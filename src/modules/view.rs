use serde::{Deserialize, Serialize};

use crate::modules::engine::{AgentId, GameState, Message};
use crate::modules::grid::{BOARD_SIZE, Cell, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub cell: Cell,
    pub agent: Option<AgentId>,
    pub is_head: bool,
    pub is_tail: bool,
}

impl CellView {
    fn empty(cell: Cell) -> Self {
        Self {
            cell,
            agent: None,
            is_head: false,
            is_tail: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub name: String,
    pub color: String,
    pub direction: Direction,
    pub head: Cell,
    pub length: usize,
    pub score: u32,
    pub steps_since_food: u32,
    pub body: Vec<Cell>,
}

/// Read-only projection of a [`GameState`] for renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub food: Cell,
    /// Row-major: `grid[y][x]`.
    pub grid: Vec<Vec<CellView>>,
    pub agents: Vec<AgentView>,
    /// Newest first.
    pub recent_messages: Vec<Message>,
}

impl Snapshot {
    pub fn cell(&self, cell: Cell) -> Option<&CellView> {
        let row = self.grid.get(usize::try_from(cell.y).ok()?)?;
        row.get(usize::try_from(cell.x).ok()?)
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn snapshot(state: &GameState) -> Snapshot {
    let mut grid: Vec<Vec<CellView>> = (0..BOARD_SIZE)
        .map(|y| {
            (0..BOARD_SIZE)
                .map(|x| CellView::empty(Cell::new(x, y)))
                .collect()
        })
        .collect();

    for agent in &state.agents {
        let last = agent.len().saturating_sub(1);
        for (idx, cell) in agent.body.iter().enumerate() {
            let (Ok(x), Ok(y)) = (usize::try_from(cell.x), usize::try_from(cell.y)) else {
                continue;
            };
            if let Some(view) = grid.get_mut(y).and_then(|row| row.get_mut(x)) {
                view.agent = Some(agent.id);
                view.is_head = idx == 0;
                view.is_tail = idx == last;
            }
        }
    }

    let agents = state
        .agents
        .iter()
        .map(|a| AgentView {
            id: a.id,
            name: a.id.label().to_string(),
            color: a.color().to_string(),
            direction: a.direction,
            head: a.head(),
            length: a.len(),
            score: a.score,
            steps_since_food: a.steps_since_food,
            body: a.body.iter().copied().collect(),
        })
        .collect();

    Snapshot {
        tick: state.tick,
        food: state.food,
        grid,
        agents,
        recent_messages: state.messages.recent().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::engine::starting_agents;

    fn state() -> GameState {
        let mut state = GameState::from_parts(starting_agents(), Cell::new(9, 0));
        state.tick = 4;
        for (tick, text) in [(2, "first"), (3, "second")] {
            state.messages.push(Message {
                tick,
                agent: AgentId::Bravo,
                text: text.to_string(),
            });
        }
        state
    }

    #[test]
    fn grid_marks_heads_and_tails() {
        let snap = snapshot(&state());

        assert_eq!(snap.grid.len(), BOARD_SIZE as usize);
        assert!(snap.grid.iter().all(|row| row.len() == BOARD_SIZE as usize));

        let head = snap.cell(Cell::new(5, 9)).unwrap();
        assert_eq!(head.agent, Some(AgentId::Alpha));
        assert!(head.is_head && !head.is_tail);

        let middle = snap.cell(Cell::new(14, 9)).unwrap();
        assert_eq!(middle.agent, Some(AgentId::Bravo));
        assert!(!middle.is_head && !middle.is_tail);

        let tail = snap.cell(Cell::new(15, 9)).unwrap();
        assert!(tail.is_tail);

        let occupied = snap.grid.iter().flatten().filter(|c| c.agent.is_some()).count();
        assert_eq!(occupied, 6);
        assert!(snap.cell(Cell::new(-1, 0)).is_none());
    }

    #[test]
    fn messages_are_newest_first() {
        let snap = snapshot(&state());
        let texts: Vec<_> = snap
            .recent_messages
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert_eq!(snap.tick, 4);
        assert_eq!(snap.food, Cell::new(9, 0));
    }

    #[test]
    fn snapshot_leaves_state_alone() {
        let original = state();
        let copy = original.clone();
        let _ = snapshot(&original);
        assert_eq!(original, copy);
    }

    #[test]
    fn serializes_to_json() {
        let snap = snapshot(&state());
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"food\":{\"x\":9,\"y\":0}"));
        assert!(json.contains("\"id\":\"alpha\""));

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.agent(AgentId::Bravo).map(|a| a.length), Some(3));
    }
}
