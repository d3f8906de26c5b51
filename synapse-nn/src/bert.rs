use crate::{Activation, Dense, Embedding, Init, LayerNorm, PositionalEmbedding};
use std::path::Path;
use synapse_core::{io, SynapseError, Tensor};
use synapse_derive::Module;

fn take_tensor(
    tensors: &mut Vec<(String, Tensor)>,
    name: &str,
) -> Result<Tensor, SynapseError> {
    match tensors.iter().position(|(n, _)| n == name) {
        Some(i) => Ok(tensors.swap_remove(i).1),
        None => Err(SynapseError::ParseError(format!(
            "Checkpoint does not contain tensor {name}"
        ))),
    }
}

/// BERT input embedding block. Word, positional and token type
/// embeddings are summed, layer normalized and passed through dropout.
#[derive(Debug, Module)]
pub struct BertEmbeddings {
    word_embeddings: Embedding,
    position_embeddings: PositionalEmbedding,
    token_type_embeddings: Embedding,
    layer_norm: LayerNorm,
    dropout_rate: f32,
}

impl BertEmbeddings {
    /// New randomly initialized BERT embedding block
    pub fn new(
        vocab_size: usize,
        token_type_vocab_size: usize,
        max_seq_length: usize,
        hidden_dim: usize,
        dropout_rate: f32,
    ) -> Result<BertEmbeddings, SynapseError> {
        Ok(BertEmbeddings {
            word_embeddings: Embedding::new(vocab_size, hidden_dim, Init::GlorotUniform)?,
            position_embeddings: PositionalEmbedding::new(
                max_seq_length,
                hidden_dim,
                Init::GlorotUniform,
            )?,
            token_type_embeddings: Embedding::new(
                token_type_vocab_size,
                hidden_dim,
                Init::GlorotUniform,
            )?,
            layer_norm: LayerNorm::new([hidden_dim]),
            dropout_rate,
        })
    }

    /// Load the embedding block from a saved checkpoint.
    /// Fails with a parse error when any of the expected tensors is
    /// missing.
    pub fn from_pretrained(
        path: impl AsRef<Path>,
        dropout_rate: f32,
    ) -> Result<BertEmbeddings, SynapseError> {
        let mut tensors = io::load(path)?;
        let word = take_tensor(&mut tensors, "bert/embeddings/word_embeddings")?;
        let position = take_tensor(&mut tensors, "bert/embeddings/position_embeddings")?;
        let token_type = take_tensor(&mut tensors, "bert/embeddings/token_type_embeddings")?;
        let gamma = take_tensor(&mut tensors, "bert/embeddings/LayerNorm/gamma")?;
        let beta = take_tensor(&mut tensors, "bert/embeddings/LayerNorm/beta")?;
        Ok(BertEmbeddings {
            word_embeddings: Embedding::from_weight(word)?,
            position_embeddings: PositionalEmbedding::from_weight(position)?,
            token_type_embeddings: Embedding::from_weight(token_type)?,
            layer_norm: LayerNorm::from_params(gamma, beta)?,
            dropout_rate,
        })
    }

    /// Forward function for the BERT embeddings.
    /// input_ids and token_type_ids are integer tensors of shape
    /// [batch, time], output is [batch, time, hidden_dim].
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
    ) -> Result<Tensor, SynapseError> {
        if input_ids.shape() != token_type_ids.shape() {
            return Err(SynapseError::ShapeError(format!(
                "Input ids with shape {} do not match token type ids with shape {}",
                input_ids.shape(),
                token_type_ids.shape()
            )));
        }
        let word = self.word_embeddings.forward(input_ids)?;
        let position = self.position_embeddings.forward(&word)?;
        let token_type = self.token_type_embeddings.forward(token_type_ids)?;
        let embedded = word + position + token_type;
        Ok(self.layer_norm.forward(&embedded)?.dropout(self.dropout_rate))
    }
}

/// BERT pooler. Projects the hidden state of the first time step
/// through a tanh dense layer.
#[derive(Debug, Module)]
pub struct BertPooler {
    dense: Dense,
}

impl BertPooler {
    /// New randomly initialized pooler
    pub fn new(hidden_dim: usize) -> BertPooler {
        BertPooler {
            dense: Dense::new(hidden_dim).with_activation(Activation::Tanh),
        }
    }

    /// Load the pooler from a saved checkpoint
    pub fn from_pretrained(path: impl AsRef<Path>) -> Result<BertPooler, SynapseError> {
        let mut tensors = io::load(path)?;
        let kernel = take_tensor(&mut tensors, "bert/pooler/dense/kernel")?;
        let bias = take_tensor(&mut tensors, "bert/pooler/dense/bias")?;
        if kernel.rank() != 2 {
            return Err(SynapseError::ShapeError(format!(
                "Pooler kernel must have shape [hidden_dim, hidden_dim], got shape {}",
                kernel.shape()
            )));
        }
        let hidden_dim = kernel.shape()[1];
        Ok(BertPooler {
            dense: Dense::new(hidden_dim)
                .with_activation(Activation::Tanh)
                .with_init(Init::Array(kernel))
                .with_init_bias(Init::Array(bias)),
        })
    }

    /// Forward function for the pooler.
    /// Input [batch, time, hidden_dim], output [batch, hidden_dim].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        crate::window::check_sequence(x)?;
        let first = x.narrow(1, 0, 1)?.squeeze(1)?;
        self.dense.forward(first)
    }
}
