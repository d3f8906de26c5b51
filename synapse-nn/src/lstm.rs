use crate::window::check_sequence;
use crate::{Activation, Init};
use synapse_core::{DType, SynapseError, Tensor};
use synapse_derive::Module;

/// LSTM with DropConnect on the hidden to hidden weight and
/// variational dropout on inputs and outputs, from "Regularizing and
/// Optimizing LSTM Language Models" by Merity et al.
///
/// All three dropout masks are sampled once per forward call and
/// shared across every time step, so a dropped connection stays
/// dropped for the whole sequence.
///
/// Gate order in the packed weights is input, forget, cell, output.
#[derive(Debug, Module)]
pub struct WeightDroppedLSTM {
    w_ih: Tensor,
    w_hh: Tensor,
    bias: Option<Tensor>,
    hidden_dim: usize,
    activation: Activation,
    dropconnect_rate: f32,
    input_dropout_rate: f32,
    output_dropout_rate: f32,
    go_backwards: bool,
    initial_value: f32,
}

impl WeightDroppedLSTM {
    /// New weight dropped LSTM.
    /// w_ih has shape [input_dim, 4 * hidden_dim], w_hh has shape
    /// [hidden_dim, 4 * hidden_dim], both glorot uniform initialized.
    pub fn new(
        input_dim: usize,
        hidden_dim: usize,
        dropconnect_rate: f32,
        input_dropout_rate: f32,
        output_dropout_rate: f32,
    ) -> Result<WeightDroppedLSTM, SynapseError> {
        Ok(WeightDroppedLSTM {
            w_ih: Init::GlorotUniform.materialize(
                [input_dim, 4 * hidden_dim],
                input_dim,
                4 * hidden_dim,
            )?,
            w_hh: Init::GlorotUniform.materialize(
                [hidden_dim, 4 * hidden_dim],
                hidden_dim,
                4 * hidden_dim,
            )?,
            bias: Some(Tensor::zeros([4 * hidden_dim], DType::F32)),
            hidden_dim,
            activation: Activation::Tanh,
            dropconnect_rate,
            input_dropout_rate,
            output_dropout_rate,
            go_backwards: false,
            initial_value: 0.0,
        })
    }

    /// Fill the initial hidden and cell states with value instead of
    /// zeros
    pub fn with_initial_state(mut self, value: f32) -> WeightDroppedLSTM {
        self.initial_value = value;
        self
    }

    /// Process the sequence from the last step to the first.
    /// The outputs stay in input order.
    pub fn with_go_backwards(mut self, go_backwards: bool) -> WeightDroppedLSTM {
        self.go_backwards = go_backwards;
        self
    }

    /// Set the cell activation
    pub fn with_activation(mut self, activation: Activation) -> WeightDroppedLSTM {
        self.activation = activation;
        self
    }

    /// Enable or disable the bias term
    pub fn with_bias(mut self, bias: bool) -> WeightDroppedLSTM {
        self.bias = if bias {
            Some(Tensor::zeros([4 * self.hidden_dim], DType::F32))
        } else {
            None
        };
        self
    }

    /// Forward function for the LSTM, returns the hidden state
    /// sequence. Input [batch, time, input_dim], output
    /// [batch, time, hidden_dim].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        self.forward_full(x, None).map(|(h, _)| h)
    }

    /// Forward returning both the hidden and the cell state sequences.
    /// The optional initial state is a pair of [batch, hidden_dim]
    /// tensors (h, c), zeros when absent.
    pub fn forward_full(
        &self,
        x: &Tensor,
        initial_state: Option<(&Tensor, &Tensor)>,
    ) -> Result<(Tensor, Tensor), SynapseError> {
        check_sequence(x)?;
        let input_dim = self.w_ih.shape()[0];
        if x.shape()[-1] != input_dim {
            return Err(SynapseError::ShapeError(format!(
                "LSTM expects {input_dim} input features, got shape {}",
                x.shape()
            )));
        }
        let batch = x.shape()[0];
        let time = x.shape()[1];
        let hd = self.hidden_dim;
        let x = if self.input_dropout_rate > 0.0 {
            let mask = Tensor::ones([batch, 1, input_dim], DType::F32)
                .dropout(self.input_dropout_rate);
            x * mask
        } else {
            x.clone()
        };
        let w_hh = if self.dropconnect_rate > 0.0 {
            let mask = Tensor::ones(self.w_hh.shape().clone(), DType::F32)
                .dropout(self.dropconnect_rate);
            &self.w_hh * mask
        } else {
            self.w_hh.clone()
        };
        let (mut h, mut c) = match initial_state {
            Some((h0, c0)) => (h0.unsqueeze(1)?, c0.unsqueeze(1)?),
            None => (
                Tensor::full([batch, 1, hd], self.initial_value),
                Tensor::full([batch, 1, hd], self.initial_value),
            ),
        };
        let steps: Box<dyn Iterator<Item = usize>> = if self.go_backwards {
            Box::new((0..time).rev())
        } else {
            Box::new(0..time)
        };
        let mut hiddens = Vec::with_capacity(time);
        let mut cells = Vec::with_capacity(time);
        for step in steps {
            let xt = x.narrow(1, step, 1)?;
            let mut gates = xt.dot(&self.w_ih)? + h.dot(&w_hh)?;
            if let Some(bias) = &self.bias {
                gates = gates + bias;
            }
            let i = gates.narrow(-1, 0, hd)?.sigmoid();
            let f = gates.narrow(-1, hd, hd)?.sigmoid();
            let g = self.activation.forward(gates.narrow(-1, 2 * hd, hd)?);
            let o = gates.narrow(-1, 3 * hd, hd)?.sigmoid();
            c = &f * &c + &i * &g;
            h = &o * self.activation.forward(&c);
            hiddens.push(h.clone());
            cells.push(c.clone());
        }
        if self.go_backwards {
            hiddens.reverse();
            cells.reverse();
        }
        let mut h_seq = Tensor::cat(&hiddens, 1)?;
        let c_seq = Tensor::cat(&cells, 1)?;
        if self.output_dropout_rate > 0.0 {
            let mask =
                Tensor::ones([batch, 1, hd], DType::F32).dropout(self.output_dropout_rate);
            h_seq = h_seq * mask;
        }
        Ok((h_seq, c_seq))
    }
}
