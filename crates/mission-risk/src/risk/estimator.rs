use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT};

/// Layer widths of the risk network, input first.
pub const LAYER_SIZES: [usize; 4] = [FEATURE_COUNT, 12, 8, 1];

const INITIAL_WEIGHT_SPAN: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DenseLayer {
    /// One row of input weights per output neuron.
    weights: Vec<Vec<f64>>,
    biases: Vec<f64>,
}

impl DenseLayer {
    fn random<R: Rng + ?Sized>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        let mut draw = || rng.gen_range(-INITIAL_WEIGHT_SPAN..INITIAL_WEIGHT_SPAN);
        let weights = (0..outputs)
            .map(|_| (0..inputs).map(|_| draw()).collect())
            .collect();
        let biases = (0..outputs).map(|_| draw()).collect();
        Self { weights, biases }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.biases)
            .map(|(row, bias)| {
                let sum: f64 = row.iter().zip(input).map(|(w, x)| w * x).sum();
                sigmoid(sum + bias)
            })
            .collect()
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

/// Fully connected sigmoid network mapping a [`FeatureVector`] to a risk score in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskEstimator {
    layers: Vec<DenseLayer>,
}

impl RiskEstimator {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let layers = LAYER_SIZES
            .windows(2)
            .map(|pair| DenseLayer::random(pair[0], pair[1], rng))
            .collect();
        Self { layers }
    }

    /// Randomly initialised network; `None` draws the seed from OS entropy.
    pub fn seeded(seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::random(&mut rng)
    }

    pub fn parameter_count(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.biases.len() * (layer.weights.first().map_or(0, Vec::len) + 1))
            .sum()
    }

    pub fn predict(&self, features: &FeatureVector) -> f64 {
        self.activations(features)
            .last()
            .and_then(|output| output.first().copied())
            .unwrap_or(f64::NAN)
    }

    /// Activations of every layer, input included.
    fn activations(&self, features: &FeatureVector) -> Vec<Vec<f64>> {
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(features.as_slice().to_vec());
        for layer in &self.layers {
            let next = match activations.last() {
                Some(input) => layer.forward(input),
                None => break,
            };
            activations.push(next);
        }
        activations
    }

    /// One online back-propagation step towards `target`; returns the pre-update error.
    ///
    /// The output delta is `target - output` (cross-entropy gradient for a sigmoid unit);
    /// hidden deltas carry the sigmoid derivative.
    pub fn train_step(&mut self, features: &FeatureVector, target: f64, learning_rate: f64) -> f64 {
        let activations = self.activations(features);
        let output = activations
            .last()
            .and_then(|layer| layer.first().copied())
            .unwrap_or(0.0);
        let error = target - output;

        let mut deltas = vec![error];
        for index in (0..self.layers.len()).rev() {
            let input = &activations[index];

            let previous_deltas = if index > 0 {
                let layer = &self.layers[index];
                (0..input.len())
                    .map(|i| {
                        let downstream: f64 = layer
                            .weights
                            .iter()
                            .zip(&deltas)
                            .map(|(row, delta)| row[i] * delta)
                            .sum();
                        downstream * input[i] * (1.0 - input[i])
                    })
                    .collect()
            } else {
                Vec::new()
            };

            let layer = &mut self.layers[index];
            for ((row, bias), delta) in layer.weights.iter_mut().zip(&mut layer.biases).zip(&deltas)
            {
                for (weight, x) in row.iter_mut().zip(input) {
                    *weight += learning_rate * delta * x;
                }
                *bias += learning_rate * delta;
            }

            deltas = previous_deltas;
        }

        error
    }
}
