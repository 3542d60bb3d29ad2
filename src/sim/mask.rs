//! Opacity masks for pixel-accurate collision
//!
//! Each sprite frame is reduced once to a grid of opaque/transparent pixels.
//! Overlap tests only walk the rectangle where two grids intersect.

use serde::{Deserialize, Serialize};

use super::bird::BIRD_FRAMES;
use crate::consts::{BIRD_HEIGHT, BIRD_WIDTH, PIPE_HEIGHT, PIPE_WIDTH};
use crate::error::MaskError;

/// Alpha above this counts as opaque
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 127;

/// A 2-D boolean opacity grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MaskData")]
pub struct Mask {
    width: usize,
    height: usize,
    /// Row-major, `width * height` entries
    bits: Vec<bool>,
}

/// Unchecked serialized form of a [`Mask`]
#[derive(Deserialize)]
struct MaskData {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl TryFrom<MaskData> for Mask {
    type Error = MaskError;

    fn try_from(data: MaskData) -> Result<Self, Self::Error> {
        let expected = data.width * data.height;
        if data.bits.len() != expected {
            return Err(MaskError::BitCount {
                width: data.width,
                height: data.height,
                expected,
                actual: data.bits.len(),
            });
        }
        Ok(Self {
            width: data.width,
            height: data.height,
            bits: data.bits,
        })
    }
}

impl Mask {
    /// Fully transparent mask
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    /// Fully opaque mask
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![true; width * height],
        }
    }

    /// Build from a per-pixel predicate
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut bits = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self { width, height, bits }
    }

    /// Build from decoded RGBA8 pixels
    pub fn from_rgba(
        width: usize,
        height: usize,
        rgba: &[u8],
        alpha_threshold: u8,
    ) -> Result<Self, MaskError> {
        if width == 0 || height == 0 {
            return Err(MaskError::EmptyDimensions { width, height });
        }
        let expected = width * height * 4;
        if rgba.len() != expected {
            return Err(MaskError::BufferLength {
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        let bits = rgba
            .chunks_exact(4)
            .map(|px| px[3] > alpha_threshold)
            .collect();
        Ok(Self { width, height, bits })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Opacity at (x, y); out of range is transparent
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.bits[y * self.width + x]
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Upside-down copy
    pub fn flipped_vertical(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.get(x, self.height - 1 - y)
        })
    }

    /// First pixel (in this mask's coordinates) where both masks are opaque.
    ///
    /// `offset` is the position of `other`'s origin relative to this mask's origin.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(usize, usize)> {
        let (dx, dy) = (offset.0 as i64, offset.1 as i64);

        // Intersecting rectangle in self's coordinates
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i64).min(dx + other.width as i64);
        let y1 = (self.height as i64).min(dy + other.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            let row = y as usize * self.width;
            let other_row = (y - dy) as usize * other.width;
            for x in x0..x1 {
                if self.bits[row + x as usize] && other.bits[other_row + (x - dx) as usize] {
                    return Some((x as usize, y as usize));
                }
            }
        }
        None
    }
}

/// Silhouettes for every sprite the simulation collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSet {
    pub bird_frames: [Mask; BIRD_FRAMES],
    pub pipe_top: Mask,
    pub pipe_bottom: Mask,
}

impl SpriteSet {
    /// Assemble from host-provided masks; the top pipe is the bottom one flipped
    pub fn new(bird_frames: [Mask; BIRD_FRAMES], pipe_bottom: Mask) -> Self {
        Self {
            bird_frames,
            pipe_top: pipe_bottom.flipped_vertical(),
            pipe_bottom,
        }
    }

    /// Procedural silhouettes matching the classic sprite sizes
    pub fn builtin() -> Self {
        let bird_frames = [
            bird_silhouette(WingPose::Up),
            bird_silhouette(WingPose::Mid),
            bird_silhouette(WingPose::Down),
        ];
        Self::new(bird_frames, pipe_silhouette())
    }

    /// Silhouette for a bird animation frame
    pub fn bird(&self, frame: usize) -> &Mask {
        &self.bird_frames[frame.min(BIRD_FRAMES - 1)]
    }

    pub fn pipe_width(&self) -> usize {
        self.pipe_top.width()
    }

    pub fn pipe_top_height(&self) -> usize {
        self.pipe_top.height()
    }
}

impl Default for SpriteSet {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Clone, Copy)]
enum WingPose {
    Up,
    Mid,
    Down,
}

/// Oval body with a beak; the wing pokes out above or below the body
fn bird_silhouette(pose: WingPose) -> Mask {
    let (w, h) = (BIRD_WIDTH, BIRD_HEIGHT);
    // Body ellipse centered at (30, 24), radii 28 x 20
    let (cx, cy, rx, ry) = (30.0f32, 24.0f32, 28.0f32, 20.0f32);
    let wing_rows = match pose {
        WingPose::Up => 0..6,
        WingPose::Mid => 22..30,
        WingPose::Down => 42..48,
    };

    Mask::from_fn(w, h, |x, y| {
        let nx = (x as f32 + 0.5 - cx) / rx;
        let ny = (y as f32 + 0.5 - cy) / ry;
        let body = nx * nx + ny * ny <= 1.0;
        let beak = (56..w).contains(&x) && (20..30).contains(&y);
        let wing = (10..26).contains(&x) && wing_rows.contains(&y);
        body || beak || wing
    })
}

/// Pipe body with a wider lip at the opening end (bottom pipe orientation)
fn pipe_silhouette() -> Mask {
    const LIP_HEIGHT: usize = 48;
    const BODY_INSET: usize = 4;
    Mask::from_fn(PIPE_WIDTH, PIPE_HEIGHT, |x, y| {
        y < LIP_HEIGHT || (BODY_INSET..PIPE_WIDTH - BODY_INSET).contains(&x)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_identity() {
        let a = Mask::filled(4, 4);
        assert_eq!(a.overlap(&a, (0, 0)), Some((0, 0)));
    }

    #[test]
    fn test_overlap_disjoint() {
        let a = Mask::filled(4, 4);
        let b = Mask::filled(4, 4);
        assert_eq!(a.overlap(&b, (4, 0)), None);
        assert_eq!(a.overlap(&b, (0, -4)), None);
        assert_eq!(a.overlap(&b, (-10, -10)), None);
    }

    #[test]
    fn test_overlap_negative_offset() {
        let a = Mask::filled(4, 4);
        let b = Mask::filled(4, 4);
        // b's bottom-right corner pixel lands on a's (0, 0)
        assert_eq!(a.overlap(&b, (-3, -3)), Some((0, 0)));
    }

    #[test]
    fn test_overlap_ignores_transparent() {
        // Ring: opaque border, transparent interior
        let ring = Mask::from_fn(5, 5, |x, y| x == 0 || y == 0 || x == 4 || y == 4);
        let dot = Mask::filled(1, 1);
        assert_eq!(ring.overlap(&dot, (2, 2)), None);
        assert_eq!(ring.overlap(&dot, (4, 2)), Some((4, 2)));
        // Bounding boxes overlap but no opaque pixel is shared
        assert_eq!(ring.overlap(&Mask::filled(3, 3), (1, 1)), None);
        assert_eq!(ring.overlap(&Mask::new(5, 5), (0, 0)), None);
    }

    #[test]
    fn test_first_hit_is_row_major() {
        let a = Mask::filled(6, 6);
        let b = Mask::from_fn(3, 3, |x, y| x == 2 && y == 1);
        assert_eq!(a.overlap(&b, (1, 2)), Some((3, 3)));
    }

    #[test]
    fn test_from_rgba() {
        // 2x1: transparent, opaque
        let rgba = [0, 0, 0, 0, 255, 255, 255, 255];
        let m = Mask::from_rgba(2, 1, &rgba, DEFAULT_ALPHA_THRESHOLD).unwrap();
        assert!(!m.get(0, 0));
        assert!(m.get(1, 0));
        assert_eq!(m.count(), 1);
    }

    #[test]
    fn test_from_rgba_errors() {
        assert_eq!(
            Mask::from_rgba(0, 3, &[], DEFAULT_ALPHA_THRESHOLD),
            Err(MaskError::EmptyDimensions {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            Mask::from_rgba(2, 2, &[0; 15], DEFAULT_ALPHA_THRESHOLD),
            Err(MaskError::BufferLength {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn test_deserialize_checks_bit_count() {
        let short = serde_json::from_str::<Mask>(r#"{"width":4,"height":4,"bits":[false]}"#);
        assert!(short.is_err());

        let m = Mask::from_fn(3, 2, |x, y| x == y);
        let json = serde_json::to_string(&m).unwrap();
        let back: Mask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.overlap(&Mask::filled(3, 2), (0, 0)), Some((0, 0)));
    }

    #[test]
    fn test_mask_data_rejects_wrong_length() {
        let data = MaskData {
            width: 2,
            height: 2,
            bits: vec![true; 3],
        };
        assert_eq!(
            Mask::try_from(data),
            Err(MaskError::BitCount {
                width: 2,
                height: 2,
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_flip() {
        let m = Mask::from_fn(2, 3, |_, y| y == 0);
        let f = m.flipped_vertical();
        assert!(f.get(0, 2) && f.get(1, 2));
        assert!(!f.get(0, 0));
        assert_eq!(m.count(), f.count());
    }

    #[test]
    fn test_builtin_sizes() {
        let sprites = SpriteSet::builtin();
        for frame in &sprites.bird_frames {
            assert_eq!((frame.width(), frame.height()), (BIRD_WIDTH, BIRD_HEIGHT));
        }
        assert_eq!(sprites.pipe_width(), PIPE_WIDTH);
        assert_eq!(sprites.pipe_top_height(), PIPE_HEIGHT);
        // Lip sits at the opening end of each pipe
        assert!(sprites.pipe_bottom.get(0, 0));
        assert!(sprites.pipe_top.get(0, PIPE_HEIGHT - 1));
        assert!(!sprites.pipe_top.get(0, 0));
        // Wing frames differ
        assert_ne!(sprites.bird_frames[0], sprites.bird_frames[2]);
        assert!(sprites.bird_frames[0].get(12, 0));
        assert!(sprites.bird_frames[2].get(12, 47));
        assert!(!sprites.bird_frames[1].get(12, 0));
    }
}
