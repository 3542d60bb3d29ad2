//! Flappy Gym - a side-scrolling obstacle course for evolving agents
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, pipes, collisions, episodes)
//! - `policy`: Decision functions agents plug into the simulation
//! - `config`: Immutable tuning constants threaded through the simulation
//! - `hall_of_fame`: Leaderboard of the best evaluated agents

pub mod config;
pub mod error;
pub mod hall_of_fame;
pub mod policy;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, MaskError, SimError};
pub use hall_of_fame::HallOfFame;
pub use policy::{LinearPolicy, Observation, Policy, Thresholded};

/// Default game constants (sprite sizes are the classic art scaled 2x)
pub mod consts {
    /// Bird spawn position
    pub const BIRD_START_X: f32 = 230.0;
    pub const BIRD_START_Y: f32 = 350.0;

    /// Velocity assigned on jump (negative = up)
    pub const JUMP_VELOCITY: f32 = -10.5;
    /// Quadratic coefficient of the displacement curve
    pub const GRAVITY: f32 = 1.5;
    /// Terminal fall speed (pixels per tick)
    pub const TERMINAL_DISPLACEMENT: f32 = 16.0;
    /// Extra lift applied while rising
    pub const RISE_BOOST: f32 = 2.0;

    /// Rotation (degrees)
    pub const MAX_ROTATION: f32 = 25.0;
    pub const MIN_ROTATION: f32 = -90.0;
    pub const ROTATION_VELOCITY: f32 = 20.0;
    /// Bird keeps its nose up while within this many pixels below its jump height
    pub const APEX_WINDOW: f32 = 50.0;
    /// Ticks per wing animation frame
    pub const ANIMATION_TIME: u32 = 5;

    /// Vertical opening between top and bottom pipe
    pub const PIPE_GAP: f32 = 200.0;
    /// Gap center is drawn from [MIN, MAX)
    pub const GAP_CENTER_MIN: i32 = 50;
    pub const GAP_CENTER_MAX: i32 = 450;
    /// Horizontal scroll speed shared by pipes and floor
    pub const SCROLL_VELOCITY: f32 = 5.0;
    pub const INITIAL_PIPE_X: f32 = 700.0;
    pub const SPAWN_PIPE_X: f32 = 600.0;

    /// Floor
    pub const FLOOR_Y: f32 = 730.0;
    pub const FLOOR_WIDTH: f32 = 672.0;

    /// Episode ends once the score exceeds this
    pub const MAX_SCORE: u32 = 250;

    /// Fitness policy
    pub const SURVIVAL_REWARD: f64 = 0.1;
    pub const CLEAR_BONUS: f64 = 10.0;
    pub const COLLISION_PENALTY: f64 = 1.0;

    /// Sprite sizes
    pub const BIRD_WIDTH: usize = 68;
    pub const BIRD_HEIGHT: usize = 48;
    pub const PIPE_WIDTH: usize = 104;
    pub const PIPE_HEIGHT: usize = 640;
}

/// Snap a world coordinate to the pixel grid
#[inline]
pub fn to_pixel(v: f32) -> i32 {
    v.round() as i32
}
