//! Neural network controllers for vehicles.
//!
//! Fixed-topology feedforward networks with tanh activation. Parameters can
//! be flattened into two streams (weights, biases) for persistence and
//! genetic recombination, and reconstructed losslessly.

use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flattened parameter lengths do not match the network architecture.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// Wrong total number of flattened weights.
    #[error("expected {expected} flattened weights for this architecture, got {actual}")]
    WeightCount {
        /// Element count the layer sizes require.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
    /// Wrong total number of flattened biases.
    #[error("expected {expected} flattened biases for this architecture, got {actual}")]
    BiasCount {
        /// Element count the layer sizes require.
        expected: usize,
        /// Element count actually supplied.
        actual: usize,
    },
}

/// A single layer transition: weight matrix and bias vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Weight matrix (`output_size` x `input_size`).
    pub weights: Array2<f64>,
    /// Bias vector (`output_size`).
    pub biases: Array1<f64>,
}

impl Layer {
    /// Performs a forward pass with tanh activation.
    #[inline]
    fn forward(&self, inputs: &Array1<f64>) -> Array1<f64> {
        let mut output = self.weights.dot(inputs);
        output += &self.biases;
        output.mapv_inplace(f64::tanh);
        output
    }
}

/// Feedforward network with a fixed layer-size sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brain {
    layer_sizes: Vec<usize>,
    layers: Vec<Layer>,
}

impl Brain {
    /// Creates a network with variance-scaled random weights and zero
    /// biases: each weight is standard-normal divided by the square root of
    /// the layer's input width.
    pub fn new_random<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Self {
        let layers = layer_sizes
            .windows(2)
            .map(|pair| {
                let (input, output) = (pair[0], pair[1]);
                Layer {
                    weights: Array2::random_using((output, input), StandardNormal, rng)
                        / (input as f64).sqrt(),
                    biases: Array1::zeros(output),
                }
            })
            .collect();

        Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        }
    }

    /// Reconstructs a network from two flattened parameter streams.
    ///
    /// Weights are consumed row-major per layer transition, biases per
    /// layer, both in layer order: the inverse of [`Brain::flatten`].
    /// Fails with [`ShapeError`] if either stream's total length does not
    /// match the architecture; no partially constructed value escapes.
    pub fn from_flattened(
        layer_sizes: &[usize],
        weights: &[f64],
        biases: &[f64],
    ) -> Result<Self, ShapeError> {
        let expected_weights: usize = layer_sizes.windows(2).map(|p| p[0] * p[1]).sum();
        let expected_biases: usize = layer_sizes[1..].iter().sum();

        if weights.len() != expected_weights {
            return Err(ShapeError::WeightCount {
                expected: expected_weights,
                actual: weights.len(),
            });
        }
        if biases.len() != expected_biases {
            return Err(ShapeError::BiasCount {
                expected: expected_biases,
                actual: biases.len(),
            });
        }

        let mut weight_offset = 0;
        let mut bias_offset = 0;
        let layers = layer_sizes
            .windows(2)
            .map(|pair| {
                let (input, output) = (pair[0], pair[1]);
                let weight_count = input * output;
                let layer = Layer {
                    weights: Array2::from_shape_vec(
                        (output, input),
                        weights[weight_offset..weight_offset + weight_count].to_vec(),
                    )
                    .expect("weight slice length matches the validated shape"),
                    biases: Array1::from_vec(biases[bias_offset..bias_offset + output].to_vec()),
                };
                weight_offset += weight_count;
                bias_offset += output;
                layer
            })
            .collect();

        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// Runs a forward pass. Every output component is produced by tanh.
    #[inline]
    pub fn predict(&self, inputs: &Array1<f64>) -> Array1<f64> {
        let mut output = inputs.clone();
        for layer in &self.layers {
            output = layer.forward(&output);
        }
        output
    }

    /// Flattens all parameters into `(weights, biases)` streams: weight
    /// matrices row-major in layer order, bias vectors in layer order.
    pub fn flatten(&self) -> (Vec<f64>, Vec<f64>) {
        let mut weights = Vec::new();
        let mut biases = Vec::new();
        for layer in &self.layers {
            weights.extend(layer.weights.iter().copied());
            biases.extend(layer.biases.iter().copied());
        }
        (weights, biases)
    }

    /// The layer-size sequence this network was built from.
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }
}
