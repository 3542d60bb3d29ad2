//! Episode driver
//!
//! Runs one generation-evaluation: builds the world for a population, ticks it to
//! a terminal phase and reports how it ended. Fitness lands in the entrants' cells.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use super::state::{Arena, Entrant, EpisodeState, Phase, TerminationReason};
use super::tick::tick;
use crate::error::SimError;

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub reason: TerminationReason,
    pub score: u32,
    pub ticks: u64,
}

/// Run an episode to completion.
///
/// `on_tick` sees a read-only snapshot after every tick (rendering, recording).
/// Returning `ControlFlow::Break` stops the episode before the next tick with
/// [`TerminationReason::ExternalQuit`].
pub fn run_episode<F>(
    arena: &Arena,
    entrants: &mut [Entrant<'_>],
    seed: u64,
    max_score: u32,
    mut on_tick: F,
) -> Result<EpisodeOutcome, SimError>
where
    F: FnMut(&EpisodeState) -> ControlFlow<()>,
{
    let mut state = EpisodeState::new(arena, seed, entrants.len(), max_score);
    log::info!(
        "Episode (seed {}) started with {} birds",
        seed,
        entrants.len()
    );

    loop {
        if let Phase::Terminated(reason) = tick(&mut state, arena, entrants)? {
            return Ok(EpisodeOutcome {
                reason,
                score: state.score,
                ticks: state.time_ticks,
            });
        }

        if on_tick(&state).is_break() {
            state.quit();
        }
    }
}

/// [`run_episode`] without an observer
pub fn run_episode_headless(
    arena: &Arena,
    entrants: &mut [Entrant<'_>],
    seed: u64,
    max_score: u32,
) -> Result<EpisodeOutcome, SimError> {
    run_episode(arena, entrants, seed, max_score, |_| ControlFlow::Continue(()))
}
