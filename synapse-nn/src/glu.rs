use crate::window::{causal_windows, check_sequence};
use crate::{Activation, Dense};
use synapse_core::{SynapseError, Tensor};
use synapse_derive::Module;

/// Gated linear unit over sequences, from "Language Modelling with
/// Gated Convolutional Networks" by Dauphin et al.
///
/// A causal windowed projection produces 2 * hidden_dim channels, the
/// first half passes through, the second half is gated:
/// `out = a + activation(b)`. The window is causal, step t never sees
/// steps after t.
#[derive(Debug, Module)]
pub struct GatedLinearUnit {
    window: usize,
    hidden_dim: usize,
    activation: Activation,
    dense: Dense,
}

impl GatedLinearUnit {
    /// New gated linear unit with sigmoid gate activation.
    /// hidden_dim must be even.
    pub fn new(window: usize, hidden_dim: usize) -> Result<GatedLinearUnit, SynapseError> {
        if window < 1 {
            return Err(SynapseError::ShapeError(format!(
                "GatedLinearUnit window must be at least 1, got {window}"
            )));
        }
        if hidden_dim < 2 || hidden_dim % 2 != 0 {
            return Err(SynapseError::ShapeError(format!(
                "GatedLinearUnit hidden_dim must be divisible by 2, got {hidden_dim}"
            )));
        }
        Ok(GatedLinearUnit {
            window,
            hidden_dim,
            activation: Activation::Sigmoid,
            dense: Dense::new(2 * hidden_dim).with_input_rank(1)?,
        })
    }

    /// Set the gate activation
    pub fn with_activation(mut self, activation: Activation) -> GatedLinearUnit {
        self.activation = activation;
        self
    }

    /// Forward function for the gated linear unit.
    /// Input [batch, time, features], output [batch, time, hidden_dim].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        check_sequence(x)?;
        let windows = causal_windows(x, self.window)?;
        let projected = self.dense.forward(windows)?;
        let a = projected.narrow(-1, 0, self.hidden_dim)?;
        let b = projected.narrow(-1, self.hidden_dim, self.hidden_dim)?;
        Ok(a + self.activation.forward(b))
    }
}
