use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::modules::engine::{AgentId, Collision, GameState, TickReport};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentStats {
    pub food_eaten: u64,
    pub best_length: usize,
    pub best_score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetCounts {
    pub wall: u64,
    pub self_body: u64,
    pub partner: u64,
}

impl ResetCounts {
    pub fn total(&self) -> u64 {
        self.wall
            .saturating_add(self.self_body)
            .saturating_add(self.partner)
    }

    fn record(&mut self, collision: &Collision) {
        let slot = match collision {
            Collision::Wall { .. } => &mut self.wall,
            Collision::SelfBody { .. } => &mut self.self_body,
            Collision::Partner { .. } => &mut self.partner,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Counters a driver keeps across resets for one process lifetime.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub ticks: u64,
    pub resets: ResetCounts,
    pub per_agent: BTreeMap<AgentId, AgentStats>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            ticks: 0,
            resets: ResetCounts::default(),
            per_agent: AgentId::ALL
                .into_iter()
                .map(|id| (id, AgentStats::default()))
                .collect(),
        }
    }

    /// Fold in one tick's report and the state it produced.
    pub fn record(&mut self, report: &TickReport, state: &GameState) {
        self.ticks = self.ticks.saturating_add(1);
        if let Some(collision) = &report.collision {
            self.resets.record(collision);
        }
        for id in &report.eaten {
            let stats = self.per_agent.entry(*id).or_default();
            stats.food_eaten = stats.food_eaten.saturating_add(1);
        }
        for agent in &state.agents {
            let stats = self.per_agent.entry(agent.id).or_default();
            stats.best_length = stats.best_length.max(agent.len());
            stats.best_score = stats.best_score.max(agent.score);
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Run started {} | ticks={} | resets={} (wall={} self={} partner={})",
                self.started_at.to_rfc3339(),
                self.ticks,
                self.resets.total(),
                self.resets.wall,
                self.resets.self_body,
                self.resets.partner
            ),
        ];
        for (id, stats) in &self.per_agent {
            lines.push(format!(
                "  {}: food={} best_score={} best_length={}",
                id, stats.food_eaten, stats.best_score, stats.best_length
            ));
        }
        lines
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::engine::{Simulation, starting_agents};
    use crate::modules::grid::Cell;

    #[test]
    fn counts_food_and_resets() {
        let mut stats = RunStats::new();
        let mut state = GameState::from_parts(starting_agents(), Cell::new(9, 0));
        state.agents[0].body.push_back(Cell::new(2, 9));
        state.agents[0].score = 1;

        stats.record(
            &TickReport {
                tick: 1,
                eaten: vec![AgentId::Alpha],
                collision: None,
            },
            &state,
        );
        stats.record(
            &TickReport {
                tick: 0,
                eaten: Vec::new(),
                collision: Some(Collision::Wall {
                    agent: AgentId::Bravo,
                    cell: Cell::new(18, 9),
                }),
            },
            &GameState::from_parts(starting_agents(), Cell::new(9, 0)),
        );

        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.resets.wall, 1);
        assert_eq!(stats.resets.total(), 1);
        let alpha = &stats.per_agent[&AgentId::Alpha];
        assert_eq!(alpha.food_eaten, 1);
        assert_eq!(alpha.best_length, 4);
        assert_eq!(alpha.best_score, 1);
        assert_eq!(stats.per_agent[&AgentId::Bravo].best_length, 3);
        assert_eq!(stats.summary_lines().len(), 3);
    }

    #[test]
    fn tracks_a_seeded_run() {
        let mut sim = Simulation::seeded(11);
        let mut stats = RunStats::new();
        for _ in 0..200 {
            let report = sim.step();
            stats.record(&report, sim.state());
        }
        assert_eq!(stats.ticks, 200);
        for agent in &sim.state().agents {
            assert!(stats.per_agent[&agent.id].best_length >= agent.len());
        }
    }
}
