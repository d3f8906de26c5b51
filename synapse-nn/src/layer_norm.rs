use synapse_core::{Shape, SynapseError, Tensor};

/// Layer normalization over the trailing axes of the input
#[derive(Debug)]
pub struct LayerNorm {
    /// Learnable scale, one per normalized element
    pub weight: Option<Tensor>,
    /// Learnable shift, one per normalized element
    pub bias: Option<Tensor>,
    /// Small constant added to the variance
    pub eps: f32,
    d_dims: usize,
}

impl LayerNorm {
    /// New layer norm over the trailing axes described by
    /// normalized_shape, with unit scale and zero shift
    pub fn new(normalized_shape: impl Into<Shape>) -> LayerNorm {
        LayerNorm::new_scaled(normalized_shape, 1.0, 0.0)
    }

    /// Layer norm with scale and shift filled with the given constants
    pub fn new_scaled(
        normalized_shape: impl Into<Shape>,
        init_scale: f32,
        init_bias: f32,
    ) -> LayerNorm {
        let shape = normalized_shape.into();
        LayerNorm {
            d_dims: shape.rank(),
            weight: Some(Tensor::full(shape.clone(), init_scale)),
            bias: Some(Tensor::full(shape, init_bias)),
            eps: 1e-5,
        }
    }

    /// Layer norm with pretrained scale and shift of the same shape
    pub fn from_params(weight: Tensor, bias: Tensor) -> Result<LayerNorm, SynapseError> {
        if weight.shape() != bias.shape() {
            return Err(SynapseError::ShapeError(format!(
                "LayerNorm scale with shape {} does not match shift with shape {}",
                weight.shape(),
                bias.shape()
            )));
        }
        Ok(LayerNorm {
            d_dims: weight.rank(),
            weight: Some(weight),
            bias: Some(bias),
            eps: 1e-5,
        })
    }

    /// Forward function for layer norm
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        let axes = -(self.d_dims as i64)..0;
        let mut x = (x - x.mean(axes.clone())) / (x.var(axes) + self.eps).sqrt();
        if let Some(w) = &self.weight {
            x = x * w;
        }
        if let Some(b) = &self.bias {
            x = x + b;
        }
        Ok(x)
    }
}

impl<'a> IntoIterator for &'a LayerNorm {
    type Item = &'a Tensor;
    type IntoIter = std::vec::IntoIter<&'a Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        self.weight
            .iter()
            .chain(self.bias.iter())
            .collect::<Vec<&Tensor>>()
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a mut LayerNorm {
    type Item = &'a mut Tensor;
    type IntoIter = std::vec::IntoIter<&'a mut Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        self.weight
            .iter_mut()
            .chain(self.bias.iter_mut())
            .collect::<Vec<&mut Tensor>>()
            .into_iter()
    }
}
