use std::collections::HashMap;

use crate::modules::engine::{Agent, AgentId};
use crate::modules::grid::{self, Cell};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub agent: AgentId,
    pub is_tail: bool,
}

/// Per-tick map from cell to the agent holding it.
///
/// Rebuilt from the agent bodies at the start of every tick and patched as
/// each agent's move lands, so later movers see earlier movers' new bodies.
#[derive(Debug, Clone, Default)]
pub struct OccupancyIndex {
    cells: HashMap<Cell, Occupant>,
}

impl OccupancyIndex {
    pub fn build<'a>(agents: impl IntoIterator<Item = &'a Agent>) -> Self {
        let mut cells = HashMap::new();
        for agent in agents {
            let last = agent.body.len().saturating_sub(1);
            for (idx, cell) in agent.body.iter().enumerate() {
                cells.insert(
                    *cell,
                    Occupant {
                        agent: agent.id,
                        is_tail: idx == last,
                    },
                );
            }
        }
        Self { cells }
    }

    pub fn get(&self, cell: Cell) -> Option<Occupant> {
        self.cells.get(&cell).copied()
    }

    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Whether `agent` may move its head into `cell`.
    ///
    /// Free cells are always enterable. The agent's own tail is enterable
    /// only when the move does not grow, since a growing agent keeps its tail.
    pub fn is_enterable(&self, cell: Cell, agent: AgentId, grows: bool) -> bool {
        match self.get(cell) {
            None => true,
            Some(occupant) => occupant.agent == agent && occupant.is_tail && !grows,
        }
    }

    pub fn vacate(&mut self, cell: Cell) -> Option<Occupant> {
        self.cells.remove(&cell)
    }

    pub fn claim(&mut self, cell: Cell, agent: AgentId, is_tail: bool) {
        self.cells.insert(cell, Occupant { agent, is_tail });
    }

    /// In-bounds cells with no occupant, row-major.
    pub fn free_cells(&self) -> Vec<Cell> {
        grid::all_cells()
            .filter(|cell| !self.cells.contains_key(cell))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::grid::{BOARD_SIZE, Direction};

    fn alpha() -> Agent {
        Agent::new(
            AgentId::Alpha,
            [Cell::new(3, 3), Cell::new(2, 3), Cell::new(1, 3)],
            Direction::Right,
        )
    }

    fn bravo() -> Agent {
        Agent::new(
            AgentId::Bravo,
            [Cell::new(8, 8), Cell::new(9, 8)],
            Direction::Left,
        )
    }

    #[test]
    fn build_marks_owner_and_tail() {
        let (a, b) = (alpha(), bravo());
        let index = OccupancyIndex::build([&a, &b]);

        assert_eq!(index.len(), 5);
        assert_eq!(
            index.get(Cell::new(3, 3)),
            Some(Occupant {
                agent: AgentId::Alpha,
                is_tail: false
            })
        );
        assert_eq!(
            index.get(Cell::new(1, 3)),
            Some(Occupant {
                agent: AgentId::Alpha,
                is_tail: true
            })
        );
        assert_eq!(
            index.get(Cell::new(9, 8)),
            Some(Occupant {
                agent: AgentId::Bravo,
                is_tail: true
            })
        );
        assert_eq!(index.get(Cell::new(0, 0)), None);
    }

    #[test]
    fn own_tail_is_enterable_only_without_growth() {
        let (a, b) = (alpha(), bravo());
        let index = OccupancyIndex::build([&a, &b]);
        let tail = Cell::new(1, 3);

        assert!(index.is_enterable(tail, AgentId::Alpha, false));
        assert!(!index.is_enterable(tail, AgentId::Alpha, true));
        assert!(!index.is_enterable(tail, AgentId::Bravo, false));
        assert!(!index.is_enterable(Cell::new(2, 3), AgentId::Alpha, false));
        assert!(index.is_enterable(Cell::new(0, 0), AgentId::Bravo, true));
    }

    #[test]
    fn free_cells_excludes_bodies() {
        let (a, b) = (alpha(), bravo());
        let mut index = OccupancyIndex::build([&a, &b]);
        let free = index.free_cells();

        assert_eq!(free.len(), (BOARD_SIZE * BOARD_SIZE) as usize - 5);
        assert!(!free.contains(&Cell::new(8, 8)));

        index.vacate(Cell::new(8, 8));
        index.claim(Cell::new(0, 0), AgentId::Bravo, false);
        let free = index.free_cells();
        assert!(free.contains(&Cell::new(8, 8)));
        assert!(!free.contains(&Cell::new(0, 0)));
    }
}
