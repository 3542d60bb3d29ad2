//! Collision detection
//!
//! Birds against pipes use silhouette overlap, so a bird grazing the corner next
//! to a pipe lip is not killed by its bounding box. Ground and ceiling are plain
//! coordinate checks.

use serde::{Deserialize, Serialize};

use super::bird::Bird;
use super::mask::SpriteSet;
use super::pipe::Pipe;
use crate::to_pixel;

/// Which half of a pipe pair was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipePart {
    Top,
    Bottom,
}

/// Where a bird touched a pipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipeContact {
    pub part: PipePart,
    /// First overlapping pixel in the bird silhouette's coordinates
    pub point: (usize, usize),
}

/// Check a bird's current silhouette against both halves of a pipe
pub fn bird_pipe_collision(bird: &Bird, pipe: &Pipe, sprites: &SpriteSet) -> Option<PipeContact> {
    let bird_mask = sprites.bird(bird.frame);
    let bird_y = to_pixel(bird.pos.y);
    let dx = to_pixel(pipe.x - bird.pos.x);

    let top_offset = (dx, to_pixel(pipe.top) - bird_y);
    let bottom_offset = (dx, to_pixel(pipe.bottom) - bird_y);

    if let Some(point) = bird_mask.overlap(&sprites.pipe_top, top_offset) {
        return Some(PipeContact {
            part: PipePart::Top,
            point,
        });
    }
    bird_mask
        .overlap(&sprites.pipe_bottom, bottom_offset)
        .map(|point| PipeContact {
            part: PipePart::Bottom,
            point,
        })
}

pub fn bird_hits_pipe(bird: &Bird, pipe: &Pipe, sprites: &SpriteSet) -> bool {
    bird_pipe_collision(bird, pipe, sprites).is_some()
}

/// Bird touched the floor or flew above the screen
pub fn out_of_bounds(bird: &Bird, sprites: &SpriteSet, floor_y: f32) -> bool {
    let height = sprites.bird(bird.frame).height() as f32;
    bird.pos.y + height >= floor_y || bird.pos.y < 0.0
}
