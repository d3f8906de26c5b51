use synapse_core::{SynapseError, Tensor};
use synapse_nn::{LayerNorm, PositionwiseFeedForward};

#[test]
fn layer_norm() -> Result<(), SynapseError> {
    let norm = LayerNorm::new([4]);
    let x = Tensor::from([[1.0, 2.0, 3.0, 4.0]]);
    let y = norm.forward(&x)?;
    assert_eq!(y, [[-1.3416354, -0.4472118, 0.4472118, 1.3416354]]);
    // Normalized rows have zero mean
    assert_eq!(y.mean(-1), [[0.0]]);
    Ok(())
}

#[test]
fn layer_norm_scaled() -> Result<(), SynapseError> {
    let norm = LayerNorm::new_scaled([4], 2.0, 1.0);
    let x = Tensor::from([[1.0, 2.0, 3.0, 4.0]]);
    let y = norm.forward(&x)?;
    assert_eq!(y, [[-1.6832709, 0.1055764, 1.8944236, 3.6832709]]);
    Ok(())
}

#[test]
fn layer_norm_params() {
    assert!(LayerNorm::from_params(Tensor::ones([4], synapse_core::DType::F32), Tensor::zeros([3], synapse_core::DType::F32)).is_err());
    let norm = LayerNorm::new([4]);
    assert_eq!((&norm).into_iter().count(), 2);
}

#[test]
fn feed_forward() -> Result<(), SynapseError> {
    let layer = PositionwiseFeedForward::new(8, 16, 0.0)?;
    let x = Tensor::randn([2, 3, 8]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 3, 8].into());
    // Weights are cached after the first call
    assert_eq!(layer.forward(&x)?, y);
    Ok(())
}
