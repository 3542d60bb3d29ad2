//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (population order for birds, creation order for pipes)
//! - No rendering or platform dependencies

pub mod bird;
pub mod collision;
pub mod episode;
pub mod floor;
pub mod mask;
pub mod pipe;
pub mod state;
pub mod tick;

pub use bird::Bird;
pub use collision::{PipeContact, PipePart, bird_hits_pipe, bird_pipe_collision, out_of_bounds};
pub use episode::{EpisodeOutcome, run_episode, run_episode_headless};
pub use floor::Floor;
pub use mask::{Mask, SpriteSet};
pub use pipe::Pipe;
pub use state::{Arena, Entrant, EpisodeState, Phase, TerminationReason};
pub use tick::tick;
