use synapse_core::{SynapseError, Tensor};
use synapse_nn::{Activation, Dense, Init};

#[test]
fn default_contraction() -> Result<(), SynapseError> {
    let layer = Dense::new(3).with_init(Init::Constant(0.5));
    assert!(layer.weight().is_none());
    let x = Tensor::ones([2, 4], synapse_core::DType::F32);
    let y = layer.forward(&x)?;
    assert_eq!(y, [[2.0, 2.0, 2.0], [2.0, 2.0, 2.0]]);
    assert!(layer.weight().is_some());
    assert!(layer.bias().is_some());

    // A second call with different input features fails, the weight
    // shape is already fixed
    let x = Tensor::ones([2, 5], synapse_core::DType::F32);
    assert!(layer.forward(&x).is_err());
    Ok(())
}

#[test]
fn known_weight() -> Result<(), SynapseError> {
    let w = Tensor::from([[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    let layer = Dense::new(2).with_init(Init::Array(w));
    let x = Tensor::from([[1.0, 2.0, 3.0]]);
    assert_eq!(layer.forward(&x)?, [[4.0, 5.0]]);

    let layer = Dense::new(2)
        .with_init(Init::Constant(1.0))
        .with_init_bias(Init::Constant(1.0));
    assert_eq!(layer.forward(&x)?, [[7.0, 7.0]]);

    let layer = Dense::new(1)
        .with_init(Init::Constant(1.0))
        .with_bias(false)
        .with_activation(Activation::Relu);
    let x = Tensor::from([[-1.0, -2.0], [1.0, 2.0]]);
    assert_eq!(layer.forward(&x)?, [[0.0], [3.0]]);
    assert!(layer.bias().is_none());
    Ok(())
}

#[test]
fn input_rank() -> Result<(), SynapseError> {
    let layer = Dense::new(5).with_input_rank(2)?;
    let x = Tensor::randn([2, 10, 3, 3]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 10, 5].into());
    assert_eq!(layer.weight().map(Tensor::shape), Some(&[3, 3, 5].into()));
    Ok(())
}

#[test]
fn map_rank() -> Result<(), SynapseError> {
    let layer = Dense::new(4).with_map_rank(1)?;
    let x = Tensor::randn([2, 10, 6]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 10, 4].into());
    assert_eq!(layer.weight().map(Tensor::shape), Some(&[6, 4].into()));
    Ok(())
}

#[test]
fn tensor_output_shape() -> Result<(), SynapseError> {
    let layer = Dense::new([4, 5]);
    let x = Tensor::randn([2, 3]);
    let y = layer.forward(&x)?;
    assert_eq!(y.shape(), &[2, 4, 5].into());
    assert_eq!(layer.weight().map(Tensor::shape), Some(&[3, 4, 5].into()));
    Ok(())
}

#[test]
fn rank_settings_are_exclusive() {
    assert!(Dense::new(3).with_input_rank(1).unwrap().with_map_rank(1).is_err());
    assert!(Dense::new(3).with_map_rank(1).unwrap().with_input_rank(1).is_err());
}

#[test]
fn rank_errors() {
    let layer = Dense::new(3);
    // Needs at least a batch axis and one feature axis
    assert!(layer.forward(Tensor::from([1.0, 2.0])).is_err());
    // Cannot preserve more axes than the input has
    let layer = Dense::new(3).with_map_rank(4).unwrap();
    assert!(layer.forward(Tensor::randn([2, 5])).is_err());
}
