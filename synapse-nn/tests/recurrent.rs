use synapse_core::{SynapseError, Tensor};
use synapse_nn::{GatedLinearUnit, WeightDroppedLSTM, QRNN};

fn replace_step(x: &Tensor, step: usize) -> Result<Tensor, SynapseError> {
    let time = x.shape()[1];
    let features = x.shape()[2];
    let mut parts = Vec::new();
    if step > 0 {
        parts.push(x.narrow(1, 0, step)?);
    }
    parts.push(Tensor::randn([x.shape()[0], 1, features]));
    if step + 1 < time {
        parts.push(x.narrow(1, step + 1, time - step - 1)?);
    }
    Tensor::cat(&parts, 1)
}

#[test]
fn qrnn_shapes() -> Result<(), SynapseError> {
    let layer = QRNN::new(2, 4)?;
    let x = Tensor::randn([3, 5, 6]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[3, 5, 4].into());
    let (h, c) = layer.forward_full(&x)?;
    assert_eq!(h, y);
    assert_eq!(c.shape(), &[3, 5, 4].into());
    Ok(())
}

#[test]
fn qrnn_is_causal() -> Result<(), SynapseError> {
    let layer = QRNN::new(3, 2)?;
    let x = Tensor::randn([1, 6, 3]);
    let y1 = layer.forward(&x)?;
    // Changing the last step must not change earlier outputs
    let y2 = layer.forward(&replace_step(&x, 5)?)?;
    assert_eq!(y1.narrow(1, 0, 5)?, y2.narrow(1, 0, 5)?);
    Ok(())
}

#[test]
fn qrnn_errors() {
    assert!(QRNN::new(0, 2).is_err());
    assert!(QRNN::new(2, 0).is_err());
    let layer = QRNN::new(2, 2).unwrap();
    assert!(layer.forward(&Tensor::randn([5, 3])).is_err());
}

#[test]
fn glu_shapes() -> Result<(), SynapseError> {
    let layer = GatedLinearUnit::new(2, 4)?;
    let x = Tensor::randn([2, 5, 3]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 5, 4].into());
    Ok(())
}

#[test]
fn glu_is_causal() -> Result<(), SynapseError> {
    let layer = GatedLinearUnit::new(2, 4)?;
    let x = Tensor::randn([1, 6, 3]);
    let y1 = layer.forward(&x)?;
    let y2 = layer.forward(&replace_step(&x, 5)?)?;
    assert_eq!(y1.narrow(1, 0, 5)?, y2.narrow(1, 0, 5)?);
    Ok(())
}

#[test]
fn glu_errors() {
    // Half the channels gate the other half, so the count must be even
    assert!(GatedLinearUnit::new(2, 3).is_err());
    assert!(GatedLinearUnit::new(0, 4).is_err());
}

#[test]
fn lstm_shapes() -> Result<(), SynapseError> {
    let layer = WeightDroppedLSTM::new(3, 4, 0.0, 0.0, 0.0)?;
    let x = Tensor::randn([2, 5, 3]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 5, 4].into());
    let (h, c) = layer.forward_full(&x, None)?;
    assert_eq!(h, y);
    assert_eq!(c.shape(), &[2, 5, 4].into());
    assert_eq!((&layer).into_iter().count(), 3);
    Ok(())
}

#[test]
fn lstm_is_causal() -> Result<(), SynapseError> {
    let layer = WeightDroppedLSTM::new(3, 2, 0.0, 0.0, 0.0)?;
    let x = Tensor::randn([1, 6, 3]);
    let y1 = layer.forward(&x)?;
    let y2 = layer.forward(&replace_step(&x, 5)?)?;
    assert_eq!(y1.narrow(1, 0, 5)?, y2.narrow(1, 0, 5)?);
    Ok(())
}

#[test]
fn lstm_backwards() -> Result<(), SynapseError> {
    let layer = WeightDroppedLSTM::new(3, 2, 0.0, 0.0, 0.0)?.with_go_backwards(true);
    let x = Tensor::randn([1, 6, 3]);
    let y1 = layer.forward(&x)?;
    assert_eq!(y1.shape(), &[1, 6, 2].into());
    // A backwards pass only sees the current and later steps, so
    // changing the first step leaves later outputs unchanged
    let y2 = layer.forward(&replace_step(&x, 0)?)?;
    assert_eq!(y1.narrow(1, 1, 5)?, y2.narrow(1, 1, 5)?);
    Ok(())
}

#[test]
fn lstm_initial_state() -> Result<(), SynapseError> {
    let layer = WeightDroppedLSTM::new(3, 4, 0.0, 0.0, 0.0)?;
    let x = Tensor::randn([2, 5, 3]);
    let h0 = Tensor::zeros([2, 4], synapse_core::DType::F32);
    let c0 = Tensor::zeros([2, 4], synapse_core::DType::F32);
    let (h, _) = layer.forward_full(&x, Some((&h0, &c0)))?;
    let (h_zero, _) = layer.forward_full(&x, None)?;
    assert_eq!(h, h_zero);

    // A constant initial state fills both h and c
    let layer = WeightDroppedLSTM::new(3, 4, 0.0, 0.0, 0.0)?.with_initial_state(0.5);
    let s0 = Tensor::full([2, 4], 0.5);
    let (h, _) = layer.forward_full(&x, Some((&s0, &s0)))?;
    let (h_filled, _) = layer.forward_full(&x, None)?;
    assert_eq!(h, h_filled);
    Ok(())
}

#[test]
fn lstm_errors() {
    let layer = WeightDroppedLSTM::new(3, 4, 0.0, 0.0, 0.0).unwrap();
    // Wrong number of input features
    assert!(layer.forward(&Tensor::randn([2, 5, 2])).is_err());
    assert!(layer.forward(&Tensor::randn([2, 5])).is_err());
}
