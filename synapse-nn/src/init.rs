use synapse_core::{Shape, SynapseError, Tensor};

/// Parameter initialization scheme
#[derive(Debug, Clone, Default)]
pub enum Init {
    /// Glorot uniform, limit sqrt(6 / (fan_in + fan_out))
    #[default]
    GlorotUniform,
    /// Uniform over -scale..scale
    Uniform(f32),
    /// Normal with zero mean and the given standard deviation
    Normal(f32),
    /// Constant value
    Constant(f32),
    /// User supplied weights, must match the requested shape
    Array(Tensor),
}

impl Init {
    /// Materialize a parameter tensor of the given shape.
    /// fan_in and fan_out only matter for [Init::GlorotUniform].
    pub fn materialize(
        &self,
        shape: impl Into<Shape>,
        fan_in: usize,
        fan_out: usize,
    ) -> Result<Tensor, SynapseError> {
        let shape = shape.into();
        Ok(match self {
            Init::GlorotUniform => {
                let limit = (6.0 / (fan_in + fan_out) as f32).sqrt();
                Tensor::uniform(shape, -limit..limit)
            }
            &Init::Uniform(scale) => Tensor::uniform(shape, -scale..scale),
            &Init::Normal(stdev) => Tensor::randn(shape) * stdev,
            &Init::Constant(value) => Tensor::full(shape, value),
            Init::Array(weights) => {
                if weights.shape() != &shape {
                    return Err(SynapseError::ShapeError(format!(
                        "Init array has shape {} but parameter requires shape {shape}",
                        weights.shape()
                    )));
                }
                weights.clone()
            }
        })
    }
}
