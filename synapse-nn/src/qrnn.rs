use crate::window::{causal_windows, check_sequence};
use crate::{Activation, Dense};
use synapse_core::{DType, SynapseError, Tensor};
use synapse_derive::Module;

/// Quasi-Recurrent Neural Network layer.
///
/// A causal windowed projection produces the z, f and o gate channels
/// in parallel over the whole sequence, the only recurrence left is the
/// cheap fo-pooling `c_t = f_t * c_t-1 + (1 - f_t) * z_t` with output
/// `h_t = o_t * c_t`. See "Quasi-Recurrent Neural Networks" by
/// J. Bradbury et al.
///
/// For window > 1 the sequence is left padded with window - 1 zero
/// steps before the projection, so no output depends on future steps.
#[derive(Debug, Module)]
pub struct QRNN {
    window: usize,
    hidden_dim: usize,
    activation: Activation,
    dense: Dense,
}

impl QRNN {
    /// New QRNN layer with tanh cell activation
    pub fn new(window: usize, hidden_dim: usize) -> Result<QRNN, SynapseError> {
        if window < 1 || hidden_dim < 1 {
            return Err(SynapseError::ShapeError(format!(
                "QRNN window and hidden_dim must be at least 1, got {window} and {hidden_dim}"
            )));
        }
        Ok(QRNN {
            window,
            hidden_dim,
            activation: Activation::Tanh,
            dense: Dense::new(3 * hidden_dim).with_input_rank(1)?,
        })
    }

    /// Set the cell activation
    pub fn with_activation(mut self, activation: Activation) -> QRNN {
        self.activation = activation;
        self
    }

    /// Forward function for QRNN, returns the hidden state sequence.
    /// Input [batch, time, features], output [batch, time, hidden_dim].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        self.forward_full(x).map(|(h, _)| h)
    }

    /// Forward returning both the hidden and the cell state sequences
    pub fn forward_full(&self, x: &Tensor) -> Result<(Tensor, Tensor), SynapseError> {
        check_sequence(x)?;
        let windows = causal_windows(x, self.window)?;
        let gates = self.dense.forward(windows)?;
        let hd = self.hidden_dim;
        let z = self.activation.forward(gates.narrow(-1, 0, hd)?);
        let f = gates.narrow(-1, hd, hd)?.sigmoid();
        let o = gates.narrow(-1, 2 * hd, hd)?.sigmoid();
        let time = x.shape()[1];
        let mut c = Tensor::zeros([x.shape()[0], 1, hd], DType::F32);
        let mut cells = Vec::with_capacity(time);
        for step in 0..time {
            let zt = z.narrow(1, step, 1)?;
            let ft = f.narrow(1, step, 1)?;
            c = &ft * &c + (1f32 - &ft) * &zt;
            cells.push(c.clone());
        }
        let c = Tensor::cat(&cells, 1)?;
        let h = o * &c;
        Ok((h, c))
    }
}
