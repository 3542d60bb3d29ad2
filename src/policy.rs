//! Decision functions
//!
//! The optimizer owns each agent's brain. The simulation only asks it, once per
//! tick, whether to jump given what the bird can see.

use serde::{Deserialize, Serialize};

/// Output above this counts as "jump"
pub const JUMP_THRESHOLD: f32 = 0.5;

/// What a bird sees each tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Bird height (screen space, down is positive)
    pub y: f32,
    /// Distance to the lead pipe's top edge
    pub top_distance: f32,
    /// Distance to the lead pipe's bottom edge
    pub bottom_distance: f32,
}

impl Observation {
    pub fn new(y: f32, top: f32, bottom: f32) -> Self {
        Self {
            y,
            top_distance: (y - top).abs(),
            bottom_distance: (y - bottom).abs(),
        }
    }

    /// Network input vector
    pub fn as_inputs(&self) -> [f32; 3] {
        [self.y, self.top_distance, self.bottom_distance]
    }
}

/// A per-agent decision function
///
/// Implementations must not depend on simulation internals; they see only the
/// observation and answer "jump?".
pub trait Policy {
    fn decide(&self, observation: Observation) -> bool;
}

impl<F> Policy for F
where
    F: Fn(Observation) -> bool,
{
    fn decide(&self, observation: Observation) -> bool {
        self(observation)
    }
}

/// Adapts a numeric network output to a jump decision.
///
/// NaN and anything at or below the threshold mean "don't jump", so every output
/// maps to a decision.
#[derive(Debug, Clone, Copy)]
pub struct Thresholded<F>(pub F);

impl<F> Policy for Thresholded<F>
where
    F: Fn([f32; 3]) -> f32,
{
    fn decide(&self, observation: Observation) -> bool {
        (self.0)(observation.as_inputs()) > JUMP_THRESHOLD
    }
}

/// Single-neuron tanh policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPolicy {
    pub weights: [f32; 3],
    pub bias: f32,
}

impl LinearPolicy {
    pub fn new(weights: [f32; 3], bias: f32) -> Self {
        Self { weights, bias }
    }

    /// Random weights in [-1, 1)
    pub fn random<R: rand::Rng>(rng: &mut R) -> Self {
        Self {
            weights: [
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            ],
            bias: rng.random_range(-1.0..1.0),
        }
    }

    pub fn activate(&self, inputs: [f32; 3]) -> f32 {
        let sum: f32 = self
            .weights
            .iter()
            .zip(inputs.iter())
            .map(|(w, x)| w * x)
            .sum();
        (sum + self.bias).tanh()
    }
}

impl Policy for LinearPolicy {
    fn decide(&self, observation: Observation) -> bool {
        self.activate(observation.as_inputs()) > JUMP_THRESHOLD
    }
}
