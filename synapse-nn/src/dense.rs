use crate::{Activation, Init};
use std::cell::OnceCell;
use synapse_core::{Shape, SynapseError, Tensor};

/// Fully connected layer of the form `activation(x . W + b)`.
///
/// The output `shape` may describe a tensor, not just a vector. The
/// weight has shape `contracted_input_dims + shape` and is inferred at
/// the first application, so the layer can be constructed before the
/// input dimensions are known.
///
/// Inputs are `[batch, ...]`, the batch axis is never projected. Which
/// of the remaining axes are contracted is controlled by two mutually
/// exclusive settings:
/// - by default all axes after batch are contracted,
/// - [`with_input_rank(r)`](Dense::with_input_rank): only the last `r`
///   axes are contracted, everything in between is preserved,
/// - [`with_map_rank(m)`](Dense::with_map_rank): the `m` axes after
///   batch are preserved, everything after them is contracted.
///
/// ```rust
/// use synapse_core::Tensor;
/// use synapse_nn::Dense;
/// # fn main() -> Result<(), synapse_core::SynapseError> {
/// let f = Dense::new(5).with_input_rank(2)?;
/// let x = Tensor::randn([2, 10, 3, 3]);
/// let y = f.forward(x)?;
/// assert_eq!(y.shape(), &[2, 10, 5].into());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Dense {
    shape: Shape,
    activation: Activation,
    init: Init,
    init_bias: Option<Init>,
    input_rank: Option<usize>,
    map_rank: Option<usize>,
    weight: OnceCell<Tensor>,
    bias: OnceCell<Tensor>,
}

impl Dense {
    /// New dense layer with identity activation, glorot uniform weight
    /// init and zero initialized bias
    pub fn new(shape: impl Into<Shape>) -> Dense {
        Dense {
            shape: shape.into(),
            activation: Activation::Identity,
            init: Init::GlorotUniform,
            init_bias: Some(Init::Constant(0.0)),
            input_rank: None,
            map_rank: None,
            weight: OnceCell::new(),
            bias: OnceCell::new(),
        }
    }

    /// Set the activation applied to the output
    pub fn with_activation(mut self, activation: Activation) -> Dense {
        self.activation = activation;
        self
    }

    /// Set the weight initialization scheme
    pub fn with_init(mut self, init: Init) -> Dense {
        self.init = init;
        self
    }

    /// Enable or disable the bias term
    pub fn with_bias(mut self, bias: bool) -> Dense {
        self.init_bias = if bias { Some(Init::Constant(0.0)) } else { None };
        self
    }

    /// Set the bias initialization scheme, enables the bias term
    pub fn with_init_bias(mut self, init_bias: Init) -> Dense {
        self.init_bias = Some(init_bias);
        self
    }

    /// Contract only the last input_rank axes of the input
    pub fn with_input_rank(mut self, input_rank: usize) -> Result<Dense, SynapseError> {
        if self.map_rank.is_some() {
            return Err(SynapseError::ShapeError(
                "Dense: input_rank and map_rank cannot be specified at the same time".into(),
            ));
        }
        self.input_rank = Some(input_rank);
        Ok(self)
    }

    /// Preserve the map_rank axes after batch, contract the rest
    pub fn with_map_rank(mut self, map_rank: usize) -> Result<Dense, SynapseError> {
        if self.input_rank.is_some() {
            return Err(SynapseError::ShapeError(
                "Dense: input_rank and map_rank cannot be specified at the same time".into(),
            ));
        }
        self.map_rank = Some(map_rank);
        Ok(self)
    }

    /// Weight tensor, None before the first application
    pub fn weight(&self) -> Option<&Tensor> {
        self.weight.get()
    }

    /// Bias tensor, None before the first application or when disabled
    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.get()
    }

    /// Forward function for dense.
    /// The weight is materialized on the first call, later calls with a
    /// different contracted input shape fail with a shape error.
    pub fn forward(&self, x: impl Into<Tensor>) -> Result<Tensor, SynapseError> {
        let x = x.into();
        let rank = x.rank();
        if rank < 2 {
            return Err(SynapseError::ShapeError(format!(
                "Dense expects input of shape [batch, ...], got shape {}",
                x.shape()
            )));
        }
        let contracted = match (self.input_rank, self.map_rank) {
            (Some(r), None) => r,
            (None, Some(m)) => (rank - 1).saturating_sub(m),
            _ => rank - 1,
        };
        if contracted < 1 || contracted > rank - 1 {
            return Err(SynapseError::ShapeError(format!(
                "Dense cannot contract {contracted} axes of input with shape {}",
                x.shape()
            )));
        }
        let keep = rank - contracted;
        let in_dims: Vec<usize> = x.shape().iter().skip(keep).copied().collect();
        let out_dims: Vec<usize> = self.shape.iter().copied().collect();
        let w_shape: Shape = in_dims
            .iter()
            .chain(out_dims.iter())
            .copied()
            .collect::<Vec<usize>>()
            .into();
        let fan_in: usize = in_dims.iter().product();
        let fan_out: usize = out_dims.iter().product();
        let weight = if let Some(w) = self.weight.get() {
            w
        } else {
            let w = self.init.materialize(&w_shape, fan_in, fan_out)?;
            self.weight.get_or_init(|| w)
        };
        if weight.shape() != &w_shape {
            return Err(SynapseError::ShapeError(format!(
                "Dense weight was inferred with shape {} but input with shape {} requires shape {w_shape}",
                weight.shape(),
                x.shape()
            )));
        }
        let batch_dims: Vec<usize> = x.shape().iter().take(keep).copied().collect();
        let flat_batch: usize = batch_dims.iter().product();
        let x2 = x.reshape([flat_batch, fan_in])?;
        let w2 = weight.reshape([fan_in, fan_out])?;
        let mut y = x2.dot(&w2)?.reshape(
            batch_dims
                .into_iter()
                .chain(out_dims.iter().copied())
                .collect::<Vec<usize>>(),
        )?;
        if let Some(init_bias) = &self.init_bias {
            let bias = if let Some(b) = self.bias.get() {
                b
            } else {
                let b = init_bias.materialize(self.shape.clone(), fan_in, fan_out)?;
                self.bias.get_or_init(|| b)
            };
            y = y + bias;
        }
        Ok(self.activation.forward(y))
    }
}

impl<'a> IntoIterator for &'a Dense {
    type Item = &'a Tensor;
    type IntoIter = std::vec::IntoIter<&'a Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        self.weight
            .get()
            .into_iter()
            .chain(self.bias.get())
            .collect::<Vec<&Tensor>>()
            .into_iter()
    }
}

impl<'a> IntoIterator for &'a mut Dense {
    type Item = &'a mut Tensor;
    type IntoIter = std::vec::IntoIter<&'a mut Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        self.weight
            .get_mut()
            .into_iter()
            .chain(self.bias.get_mut())
            .collect::<Vec<&mut Tensor>>()
            .into_iter()
    }
}
