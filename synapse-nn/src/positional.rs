use crate::window::check_sequence;
use crate::{Embedding, Init};
use synapse_core::{DType, SynapseError, Tensor};
use synapse_derive::Module;

/// Trainable positional embedding. Returns one embedding row per time
/// step of the input, broadcastable against it on the batch axis.
#[derive(Debug, Module)]
pub struct PositionalEmbedding {
    max_seq_length: usize,
    embedding: Embedding,
}

impl PositionalEmbedding {
    /// New positional embedding for sequences up to max_seq_length steps
    pub fn new(
        max_seq_length: usize,
        hidden_dim: usize,
        init: Init,
    ) -> Result<PositionalEmbedding, SynapseError> {
        Ok(PositionalEmbedding {
            max_seq_length,
            embedding: Embedding::new(max_seq_length, hidden_dim, init)?,
        })
    }

    /// Positional embedding with a pretrained table of shape
    /// [max_seq_length, hidden_dim]
    pub fn from_weight(weight: Tensor) -> Result<PositionalEmbedding, SynapseError> {
        let embedding = Embedding::from_weight(weight)?;
        Ok(PositionalEmbedding {
            max_seq_length: embedding.vocab_size(),
            embedding,
        })
    }

    /// Longest supported sequence
    pub fn max_seq_length(&self) -> usize {
        self.max_seq_length
    }

    /// Forward function for the positional embedding.
    /// Input [batch, time, features], output [1, time, hidden_dim].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        check_sequence(x)?;
        let time = x.shape()[1];
        if time > self.max_seq_length {
            return Err(SynapseError::ShapeError(format!(
                "Sequence of length {time} exceeds the maximum length {} of the positional embedding",
                self.max_seq_length
            )));
        }
        let positions = Tensor::arange(0..time as i64).unsqueeze(0)?;
        self.embedding.forward(&positions)
    }
}

/// Fixed sinusoidal positional embedding from "Attention Is All You
/// Need" by Vaswani et al. No parameters, the signal is a function of
/// the input shape only.
///
/// The first half of the channels carries sines, the second half
/// cosines, over a geometric progression of timescales. Positions
/// count from 1. For an odd number of channels the last channel is
/// zero padded.
#[derive(Debug, Clone)]
pub struct SinusoidalPositionalEmbedding {
    min_timescale: f32,
    max_timescale: f32,
}

impl Default for SinusoidalPositionalEmbedding {
    fn default() -> Self {
        SinusoidalPositionalEmbedding::new(1.0, 1.0e4)
    }
}

impl SinusoidalPositionalEmbedding {
    /// Sinusoidal embedding with the given timescale range
    pub fn new(min_timescale: f32, max_timescale: f32) -> SinusoidalPositionalEmbedding {
        SinusoidalPositionalEmbedding {
            min_timescale,
            max_timescale,
        }
    }

    /// Forward function for the sinusoidal embedding.
    /// Input [batch, time, features] with at least 4 feature channels,
    /// output [1, time, features].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        check_sequence(x)?;
        let time = x.shape()[1];
        let dim = x.shape()[-1i64];
        if dim < 4 {
            return Err(SynapseError::ShapeError(format!(
                "Sinusoidal embedding needs at least 4 feature channels, got {dim}"
            )));
        }
        let num_timescales = dim / 2;
        let log_timescale_increment =
            (self.max_timescale / self.min_timescale).ln() / (num_timescales - 1) as f32;
        let inv_timescales = (Tensor::arange(0..num_timescales as i64).cast(DType::F32)
            * (-log_timescale_increment))
            .exp()
            * self.min_timescale;
        let positions = Tensor::arange(1..time as i64 + 1)
            .cast(DType::F32)
            .unsqueeze(-1)?;
        let scaled_time = positions * inv_timescales;
        let signal = Tensor::cat(&[scaled_time.sin(), scaled_time.cos()], -1)?;
        let signal = if dim % 2 != 0 {
            signal.pad([(0, 1)])?
        } else {
            signal
        };
        signal.unsqueeze(0)
    }
}
