//! Decision-makers ("phenomes") that map observations to actions.

use rand::{Rng, distr::Distribution};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use crate::protocol::{NUM_INPUTS, NUM_OUTPUTS};

/// Opaque function under evaluation.
///
/// The evaluator checks [`input_count`](Self::input_count) and
/// [`output_count`](Self::output_count) against the protocol sizes before the
/// first turn.
pub trait DecisionMaker {
    fn input_count(&self) -> usize;

    fn output_count(&self) -> usize;

    /// Clears any state carried over from earlier activations.
    fn reset_state(&mut self);

    /// Computes `outputs` from `inputs`.
    fn activate(&mut self, inputs: &[f64], outputs: &mut [f64]);
}

/// Single-layer network: `outputs = tanh(W * inputs + b)`.
///
/// Stateless, so [`reset_state`](DecisionMaker::reset_state) does nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPhenome {
    input_count: usize,
    output_count: usize,
    /// Row-major `output_count x input_count`.
    weights: Vec<f64>,
    biases: Vec<f64>,
}

impl LinearPhenome {
    /// # Panics
    ///
    /// Panics if the lengths of `weights` and `biases` do not match the counts.
    #[must_use]
    pub fn new(
        input_count: usize,
        output_count: usize,
        weights: Vec<f64>,
        biases: Vec<f64>,
    ) -> Self {
        assert_eq!(weights.len(), input_count * output_count);
        assert_eq!(biases.len(), output_count);
        Self {
            input_count,
            output_count,
            weights,
            biases,
        }
    }

    /// Creates a phenome sized for the game protocol with weights drawn from
    /// `N(0, std_dev^2)` and zero biases.
    ///
    /// # Panics
    ///
    /// Panics if `std_dev` is negative or not finite.
    #[must_use]
    pub fn random<R>(rng: &mut R, std_dev: f64) -> Self
    where
        R: Rng + ?Sized,
    {
        assert!(
            std_dev.is_finite() && std_dev >= 0.0,
            "standard deviation must be finite and non-negative: {std_dev}"
        );
        let normal = Normal::new(0.0, std_dev).expect("standard deviation was validated");
        let weights = (0..NUM_INPUTS * NUM_OUTPUTS)
            .map(|_| normal.sample(rng))
            .collect();
        Self::new(NUM_INPUTS, NUM_OUTPUTS, weights, vec![0.0; NUM_OUTPUTS])
    }

    /// Creates a phenome that ignores its inputs and always emits `outputs`.
    #[must_use]
    pub fn constant(outputs: [f64; NUM_OUTPUTS]) -> Self {
        let biases = outputs
            .iter()
            .map(|o| o.clamp(-0.999_999, 0.999_999).atanh())
            .collect();
        Self::new(
            NUM_INPUTS,
            NUM_OUTPUTS,
            vec![0.0; NUM_INPUTS * NUM_OUTPUTS],
            biases,
        )
    }

    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    #[must_use]
    pub fn biases(&self) -> &[f64] {
        &self.biases
    }
}

impl DecisionMaker for LinearPhenome {
    fn input_count(&self) -> usize {
        self.input_count
    }

    fn output_count(&self) -> usize {
        self.output_count
    }

    fn reset_state(&mut self) {}

    fn activate(&mut self, inputs: &[f64], outputs: &mut [f64]) {
        let rows = self.weights.chunks_exact(self.input_count);
        for ((out, row), bias) in outputs.iter_mut().zip(rows).zip(&self.biases) {
            let sum: f64 = row.iter().zip(inputs).map(|(w, x)| w * x).sum();
            *out = (sum + bias).tanh();
        }
    }
}
