//! Episode state and core simulation types
//!
//! Everything a tick reads or writes lives here, except the fitness cells, which
//! belong to the optimizer and are only borrowed through [`Entrant`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::floor::Floor;
use super::mask::SpriteSet;
use super::pipe::Pipe;
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::policy::Policy;

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// Last bird was removed
    AllAgentsEliminated,
    /// Score went past the cap
    ScoreThresholdReached,
    /// Host asked to stop between ticks
    ExternalQuit,
}

/// Episode phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    Terminated(TerminationReason),
}

impl Phase {
    pub fn is_terminated(&self) -> bool {
        matches!(self, Phase::Terminated(_))
    }
}

/// Immutable rules of the world: tuning plus collision silhouettes
#[derive(Debug, Clone)]
pub struct Arena {
    config: SimConfig,
    sprites: SpriteSet,
}

impl Arena {
    pub fn new(config: SimConfig, sprites: SpriteSet) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, sprites })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sprites(&self) -> &SpriteSet {
        &self.sprites
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            config: SimConfig::default(),
            sprites: SpriteSet::builtin(),
        }
    }
}

/// An optimizer-side agent: its decision function and fitness cell
pub struct Entrant<'a> {
    pub policy: &'a dyn Policy,
    pub fitness: &'a mut f64,
}

impl<'a> Entrant<'a> {
    pub fn new(policy: &'a dyn Policy, fitness: &'a mut f64) -> Self {
        Self { policy, fitness }
    }
}

/// Complete episode state (deterministic for a given seed)
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeState {
    /// Seed for pipe placement
    pub seed: u64,
    pub phase: Phase,
    /// Pipes cleared
    pub score: u32,
    /// Episode ends once score exceeds this
    pub max_score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Number of entrants this episode was started with
    pub population: usize,
    /// Live birds, in population order
    pub birds: Vec<Bird>,
    /// Live pipes, in creation (= x) order
    pub pipes: Vec<Pipe>,
    pub floor: Floor,
    #[serde(skip)]
    rng: Pcg32,
    next_id: u32,
}

impl EpisodeState {
    /// One bird per entrant at the start position, one pipe upstream
    pub fn new(arena: &Arena, seed: u64, population: usize, max_score: u32) -> Self {
        let config = arena.config();
        let start = Vec2::new(config.bird_start_x, config.bird_start_y);
        let mut state = Self {
            seed,
            phase: Phase::Running,
            score: 0,
            max_score,
            time_ticks: 0,
            population,
            birds: (0..population).map(|slot| Bird::new(slot, start)).collect(),
            pipes: Vec::new(),
            floor: Floor::new(config.floor_y, config.floor_width),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        };
        state.spawn_pipe(arena, config.initial_pipe_x);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a pipe at `x` with a random opening height
    pub fn spawn_pipe(&mut self, arena: &Arena, x: f32) -> &Pipe {
        let config = arena.config();
        let sprites = arena.sprites();
        let opening_y = self
            .rng
            .random_range(config.gap_center_min..config.gap_center_max);
        let id = self.next_entity_id();
        self.pipes.push(Pipe::new(
            id,
            x,
            opening_y as f32,
            config.pipe_gap,
            sprites.pipe_width() as f32,
            sprites.pipe_top_height() as f32,
        ));
        log::debug!("Spawned pipe {} at x={} opening_y={}", id, x, opening_y);
        &self.pipes[self.pipes.len() - 1]
    }

    /// Index of the pipe the whole population observes.
    ///
    /// Moves to the second pipe once the first bird is past the first pipe's
    /// right edge.
    pub fn lead_pipe_index(&self) -> usize {
        match (self.birds.first(), self.pipes.first()) {
            (Some(bird), Some(pipe)) if self.pipes.len() > 1 && bird.pos.x > pipe.right() => 1,
            _ => 0,
        }
    }

    pub fn lead_pipe(&self) -> Option<&Pipe> {
        self.pipes.get(self.lead_pipe_index())
    }

    /// Stop the episode between ticks
    pub fn quit(&mut self) {
        if self.phase == Phase::Running {
            log::info!("Episode (seed {}) quit at tick {}", self.seed, self.time_ticks);
            self.phase = Phase::Terminated(TerminationReason::ExternalQuit);
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
}
