use crate::{Activation, Dense};
use synapse_core::{SynapseError, Tensor};
use synapse_derive::Module;

/// Position-wise feed forward block from "Attention Is All You Need"
/// by Vaswani et al. Two dense layers applied independently at every
/// time step, relu and dropout in between.
#[derive(Debug, Module)]
pub struct PositionwiseFeedForward {
    intermediate: Dense,
    dense: Dense,
    dropout_rate: f32,
}

impl PositionwiseFeedForward {
    /// New feed forward block projecting to intermediate_dim and back
    /// to model_dim
    pub fn new(
        model_dim: usize,
        intermediate_dim: usize,
        dropout_rate: f32,
    ) -> Result<PositionwiseFeedForward, SynapseError> {
        Ok(PositionwiseFeedForward {
            intermediate: Dense::new(intermediate_dim)
                .with_activation(Activation::Relu)
                .with_input_rank(1)?,
            dense: Dense::new(model_dim).with_input_rank(1)?,
            dropout_rate,
        })
    }

    /// Forward function for the feed forward block.
    /// Input [batch, time, model_dim], output has the same shape.
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        let inner = self.intermediate.forward(x)?.dropout(self.dropout_rate);
        self.dense.forward(inner)
    }
}
