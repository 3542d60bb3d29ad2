//! Pipe pairs
//!
//! A pipe is a top and bottom shape sharing an x position, with an opening of
//! fixed height between them.

use serde::{Deserialize, Serialize};

/// A gated pipe pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pipe {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top edge of the opening, drawn from the config's gap center range
    pub opening_y: f32,
    /// Origin (top-left y) of the top shape
    pub top: f32,
    /// Origin (top-left y) of the bottom shape
    pub bottom: f32,
    /// Shape width
    pub width: f32,
    /// Set once any bird gets past this pipe
    passed: bool,
}

impl Pipe {
    /// Build a pipe whose opening starts at `opening_y`
    ///
    /// `top_height` is the height of the top shape, which hangs upward from the
    /// opening.
    pub fn new(id: u32, x: f32, opening_y: f32, gap: f32, width: f32, top_height: f32) -> Self {
        Self {
            id,
            x,
            opening_y,
            top: opening_y - top_height,
            bottom: opening_y + gap,
            width,
            passed: false,
        }
    }

    /// Upper boundary of the opening
    pub fn gap_top(&self) -> f32 {
        self.opening_y
    }

    /// Lower boundary of the opening
    pub fn gap_bottom(&self) -> f32 {
        self.bottom
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn advance(&mut self, velocity: f32) {
        self.x -= velocity;
    }

    pub fn is_offscreen(&self) -> bool {
        self.right() < 0.0
    }

    pub fn has_been_passed(&self) -> bool {
        self.passed
    }

    /// Latch the pass flag if a bird at `agent_x` is past this pipe.
    ///
    /// Returns true only on the tick the latch closes.
    pub fn mark_passed(&mut self, agent_x: f32) -> bool {
        if !self.passed && self.x < agent_x {
            self.passed = true;
            return true;
        }
        false
    }
}
