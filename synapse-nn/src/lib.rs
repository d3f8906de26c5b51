//! nn layer factories for the synapse ML library
//!
//! Layers own their parameters and expose a `forward` method. Sequence
//! tensors are laid out as `[batch, time, features]`, axis 0 is always
//! the batch axis and axis 1 of a sequence tensor is the sequence axis.

#![forbid(unsafe_code)]
#![forbid(rustdoc::broken_intra_doc_links)]
#![forbid(rustdoc::private_intra_doc_links)]
#![forbid(missing_docs)]
#![forbid(rustdoc::missing_crate_level_docs)]
#![forbid(rustdoc::private_doc_tests)]
#![forbid(rustdoc::invalid_codeblock_attributes)]
#![forbid(rustdoc::invalid_html_tags)]
#![forbid(rustdoc::invalid_rust_codeblocks)]
#![forbid(rustdoc::bare_urls)]
#![forbid(rustdoc::unescaped_backticks)]
#![forbid(rustdoc::redundant_explicit_links)]

pub use synapse_derive::Module;

mod activation;
pub use activation::Activation;

mod init;
pub use init::Init;

mod dense;
pub use dense::Dense;

mod window;

// Normalization layers
mod layer_norm;
pub use layer_norm::LayerNorm;

// Recurrent and convolutional sequence layers
mod qrnn;
pub use qrnn::QRNN;

mod glu;
pub use glu::GatedLinearUnit;

mod lstm;
pub use lstm::WeightDroppedLSTM;

mod pooling;
pub use pooling::{SequentialMaxPooling, SequentialStride};

// Embeddings
mod embedding;
pub use embedding::Embedding;

mod positional;
pub use positional::{PositionalEmbedding, SinusoidalPositionalEmbedding};

mod bert;
pub use bert::{BertEmbeddings, BertPooler};

mod feed_forward;
pub use feed_forward::PositionwiseFeedForward;
