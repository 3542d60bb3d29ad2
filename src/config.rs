//! Simulation tuning
//!
//! Every constant the simulation reads lives in one immutable value that is
//! threaded explicitly into the arena. Defaults reproduce the classic game.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === World ===
    pub floor_y: f32,
    pub floor_width: f32,

    // === Bird kinematics ===
    pub bird_start_x: f32,
    pub bird_start_y: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub terminal_displacement: f32,
    pub rise_boost: f32,

    // === Rotation / animation ===
    pub max_rotation: f32,
    pub min_rotation: f32,
    pub rotation_velocity: f32,
    pub apex_window: f32,
    pub animation_time: u32,

    // === Pipes ===
    pub pipe_gap: f32,
    pub gap_center_min: i32,
    pub gap_center_max: i32,
    pub scroll_velocity: f32,
    pub initial_pipe_x: f32,
    pub spawn_pipe_x: f32,

    // === Episode / fitness ===
    pub max_score: u32,
    pub survival_reward: f64,
    pub clear_bonus: f64,
    pub collision_penalty: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            floor_y: FLOOR_Y,
            floor_width: FLOOR_WIDTH,

            bird_start_x: BIRD_START_X,
            bird_start_y: BIRD_START_Y,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            terminal_displacement: TERMINAL_DISPLACEMENT,
            rise_boost: RISE_BOOST,

            max_rotation: MAX_ROTATION,
            min_rotation: MIN_ROTATION,
            rotation_velocity: ROTATION_VELOCITY,
            apex_window: APEX_WINDOW,
            animation_time: ANIMATION_TIME,

            pipe_gap: PIPE_GAP,
            gap_center_min: GAP_CENTER_MIN,
            gap_center_max: GAP_CENTER_MAX,
            scroll_velocity: SCROLL_VELOCITY,
            initial_pipe_x: INITIAL_PIPE_X,
            spawn_pipe_x: SPAWN_PIPE_X,

            max_score: MAX_SCORE,
            survival_reward: SURVIVAL_REWARD,
            clear_bonus: CLEAR_BONUS,
            collision_penalty: COLLISION_PENALTY,
        }
    }
}

impl SimConfig {
    /// Parse a config, filling missing fields with defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gap_center_min >= self.gap_center_max {
            return Err(ConfigError::EmptyGapRange {
                min: self.gap_center_min,
                max: self.gap_center_max,
            });
        }
        for (name, value) in [
            ("scroll_velocity", self.scroll_velocity),
            ("floor_width", self.floor_width),
            ("pipe_gap", self.pipe_gap),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("bird_start_x", self.bird_start_x),
            ("bird_start_y", self.bird_start_y),
            ("jump_velocity", self.jump_velocity),
            ("gravity", self.gravity),
            ("terminal_displacement", self.terminal_displacement),
            ("rise_boost", self.rise_boost),
            ("floor_y", self.floor_y),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name, value });
            }
        }
        if self.animation_time == 0 {
            return Err(ConfigError::ZeroAnimationTime);
        }
        Ok(())
    }

    /// Config whose pipes always open at the same height (for replays and tests)
    pub fn with_fixed_gap(mut self, gap_center: i32) -> Self {
        self.gap_center_min = gap_center;
        self.gap_center_max = gap_center + 1;
        self
    }
}
