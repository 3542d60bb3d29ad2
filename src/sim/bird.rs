//! Bird kinematics
//!
//! Vertical motion is a closed-form curve restarted on every jump rather than an
//! integrated velocity: displacement depends only on ticks since the last jump.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Number of wing animation frames
pub const BIRD_FRAMES: usize = 3;

/// A bird entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bird {
    /// Index of the entrant (policy + fitness) driving this bird
    pub slot: usize,
    pub pos: Vec2,
    /// Velocity set by the last jump
    pub velocity: f32,
    /// Ticks since the last jump
    pub tick_count: u32,
    /// Nose angle in degrees
    pub angle: f32,
    /// Height at the last jump
    pub height: f32,
    /// Current silhouette frame
    pub frame: usize,
    /// Animation counter
    pub anim_count: u32,
}

impl Bird {
    pub fn new(slot: usize, pos: Vec2) -> Self {
        Self {
            slot,
            pos,
            velocity: 0.0,
            tick_count: 0,
            angle: 0.0,
            height: pos.y,
            frame: 0,
            anim_count: 0,
        }
    }

    /// Jump impulse
    pub fn jump(&mut self, config: &SimConfig) {
        self.velocity = config.jump_velocity;
        self.tick_count = 0;
        self.height = self.pos.y;
    }

    /// Advance one tick, returns the applied displacement
    pub fn advance(&mut self, config: &SimConfig) -> f32 {
        self.tick_count += 1;
        let displacement = displacement(config, self.velocity, self.tick_count);
        self.pos.y += displacement;

        if displacement < 0.0 || self.pos.y < self.height + config.apex_window {
            if self.angle < config.max_rotation {
                self.angle = config.max_rotation;
            }
        } else if self.angle > config.min_rotation {
            self.angle = (self.angle - config.rotation_velocity).max(config.min_rotation);
        }

        displacement
    }

    /// Step the wing flap cycle (0, 1, 2, 1, 0, ...)
    ///
    /// A diving bird holds its wings level on frame 1.
    pub fn animate(&mut self, config: &SimConfig) {
        let t = config.animation_time;
        self.anim_count += 1;

        if self.anim_count < t {
            self.frame = 0;
        } else if self.anim_count < t * 2 {
            self.frame = 1;
        } else if self.anim_count < t * 3 {
            self.frame = 2;
        } else if self.anim_count < t * 4 {
            self.frame = 1;
        } else if self.anim_count == t * 4 + 1 {
            self.frame = 0;
            self.anim_count = 0;
        }

        if self.angle <= -80.0 {
            self.frame = 1;
            self.anim_count = t * 2;
        }
    }
}

/// Displacement for the given tick of the jump curve
pub fn displacement(config: &SimConfig, velocity: f32, tick_count: u32) -> f32 {
    let t = tick_count as f32;
    let mut d = velocity * t + config.gravity * t * t;
    if d >= config.terminal_displacement {
        d = config.terminal_displacement;
    }
    if d < 0.0 {
        d -= config.rise_boost;
    }
    d
}
