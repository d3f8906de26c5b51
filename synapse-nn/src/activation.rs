use synapse_core::Tensor;

/// Activation
#[derive(Debug, Clone, Default)]
pub enum Activation {
    /// Identity, passes input through unchanged
    #[default]
    Identity,
    /// Relu
    Relu,
    /// Sigmoid
    Sigmoid,
    /// Tanh
    Tanh,
    /// Gelu
    Gelu,
    /// Softmax over the last axis
    Softmax,
    /// Leaky relu
    LeakyRelu(f32),
}

impl Activation {
    /// Activation forward
    pub fn forward(&self, xs: impl Into<Tensor>) -> Tensor {
        let xs = xs.into();
        match self {
            Self::Identity => xs,
            Self::Relu => xs.relu(),
            Self::Sigmoid => xs.sigmoid(),
            Self::Tanh => xs.tanh(),
            Self::Gelu => xs.gelu(),
            Self::Softmax => xs.softmax(-1),
            &Self::LeakyRelu(negative_slope) => &xs.relu() - (negative_slope * (-xs).relu()),
        }
    }
}
