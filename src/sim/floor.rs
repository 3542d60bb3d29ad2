//! Scrolling floor strip

use serde::{Deserialize, Serialize};

/// Two floor segments tiling horizontally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub y: f32,
    pub x1: f32,
    pub x2: f32,
    pub width: f32,
}

impl Floor {
    pub fn new(y: f32, width: f32) -> Self {
        Self {
            y,
            x1: 0.0,
            x2: width,
            width,
        }
    }

    /// Scroll left, moving a segment that fell off the left edge behind the other
    pub fn advance(&mut self, velocity: f32) {
        self.x1 -= velocity;
        self.x2 -= velocity;
        if self.x1 + self.width < 0.0 {
            self.x1 = self.x2 + self.width;
        }
        if self.x2 + self.width < 0.0 {
            self.x2 = self.x1 + self.width;
        }
    }
}
