use crate::Init;
use synapse_core::{DType, SynapseError, Tensor};
use synapse_derive::Module;

/// Trainable embedding table. Maps integer ids to rows of the weight,
/// implemented as a one hot matrix product so it runs on the same ops
/// as everything else.
#[derive(Debug, Module)]
pub struct Embedding {
    vocab_size: usize,
    embed_dim: usize,
    /// The embedding table of shape [vocab_size, embed_dim]
    pub weight: Tensor,
}

impl Embedding {
    /// New embedding table initialized with init
    pub fn new(vocab_size: usize, embed_dim: usize, init: Init) -> Result<Embedding, SynapseError> {
        let weight = init.materialize([vocab_size, embed_dim], vocab_size, embed_dim)?;
        Ok(Embedding {
            vocab_size,
            embed_dim,
            weight,
        })
    }

    /// Embedding with a pretrained weight of shape [vocab_size, embed_dim]
    pub fn from_weight(weight: Tensor) -> Result<Embedding, SynapseError> {
        if weight.rank() != 2 {
            return Err(SynapseError::ShapeError(format!(
                "Embedding weight must have shape [vocab_size, embed_dim], got shape {}",
                weight.shape()
            )));
        }
        Ok(Embedding {
            vocab_size: weight.shape()[0],
            embed_dim: weight.shape()[1],
            weight,
        })
    }

    /// Number of rows in the table
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Width of each row
    pub fn embed_dim(&self) -> usize {
        self.embed_dim
    }

    /// Look up ids in the table. Ids must be an integer tensor, the
    /// output appends an embed_dim axis, so [batch, time] ids come out
    /// as [batch, time, embed_dim]. Ids outside 0..vocab_size map to
    /// zero vectors.
    pub fn forward(&self, ids: &Tensor) -> Result<Tensor, SynapseError> {
        if ids.dtype() != DType::I32 {
            return Err(SynapseError::DTypeError(format!(
                "Embedding ids must be {}, got {}",
                DType::I32,
                ids.dtype()
            )));
        }
        let rows = Tensor::arange(0..self.vocab_size as i64);
        let one_hot = ids.unsqueeze(-1)?.equal(rows)?.cast(DType::F32);
        one_hot.dot(&self.weight)
    }
}
