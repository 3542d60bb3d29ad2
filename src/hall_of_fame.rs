//! Hall of fame
//!
//! Keeps the best agent runs seen across episodes. Each agent holds at most one
//! place (its best run), so a single strong policy cannot fill the board.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::policy::LinearPolicy;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// One agent's best evaluated run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallEntry {
    /// Host-side agent index
    pub agent: usize,
    /// Weights that produced the run
    pub policy: LinearPolicy,
    pub fitness: f64,
    /// Pipes cleared in the episode
    pub score: u32,
    pub ticks: u64,
    /// Episode seed (replays the same pipes)
    pub seed: u64,
}

impl HallEntry {
    /// Board order: higher fitness first, higher score breaks ties
    fn cmp_rank(&self, other: &Self) -> Ordering {
        other
            .fitness
            .total_cmp(&self.fitness)
            .then_with(|| other.score.cmp(&self.score))
    }
}

/// Leaderboard, best run first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HallOfFame {
    pub entries: Vec<HallEntry>,
}

impl HallOfFame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run, returning its 1-indexed place if it made the board.
    ///
    /// A run that does not beat the agent's existing entry is ignored; one
    /// that does replaces it. Equal runs keep the earlier entry ahead.
    pub fn record(&mut self, entry: HallEntry) -> Option<usize> {
        if !entry.fitness.is_finite() {
            return None;
        }

        if let Some(i) = self.entries.iter().position(|e| e.agent == entry.agent) {
            if self.entries[i].cmp_rank(&entry) != Ordering::Greater {
                return None;
            }
            self.entries.remove(i);
        }

        let place = self
            .entries
            .partition_point(|e| e.cmp_rank(&entry) != Ordering::Greater);
        if place >= MAX_ENTRIES {
            return None;
        }

        self.entries.insert(place, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(place + 1)
    }

    pub fn best(&self) -> Option<&HallEntry> {
        self.entries.first()
    }
}
