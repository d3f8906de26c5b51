use synapse_core::{DType, SynapseError, Tensor};

#[test]
fn relu_neg() {
    let x = Tensor::from([-2, -1, 0, 1, 2]);
    assert_eq!(x.relu(), [0, 0, 0, 1, 2]);
    assert_eq!(-&x, [2, 1, 0, -1, -2]);
    let x = Tensor::from([-0.5, 0.5]);
    assert_eq!(x.relu(), [0.0, 0.5]);
}

#[test]
fn float_ops() {
    let x = Tensor::from([0.0, 1.0]);
    assert_eq!(x.exp(), [1.0, 2.7182817]);
    assert_eq!(x.sin(), [0.0, 0.84147096]);
    assert_eq!(x.cos(), [1.0, 0.5403023]);
    assert_eq!(x.tanh(), [0.0, 0.7615942]);
    assert_eq!(x.sigmoid(), [0.5, 0.7310586]);
    assert_eq!(Tensor::from([1.0, 4.0, 9.0]).sqrt(), [1.0, 2.0, 3.0]);
    assert_eq!(Tensor::from([1.0, 2.7182817]).ln(), [0.0, 1.0]);
    assert_eq!(Tensor::from([0.0]).gelu(), [0.0]);

    // Float ops promote integer inputs
    let x = Tensor::from([0, 1]);
    let y = x.tanh();
    assert_eq!(y.dtype(), DType::F32);
    assert_eq!(y, [0.0, 0.7615942]);
}

#[test]
fn cast() {
    let x = Tensor::from([1.7, -1.7, 0.2]);
    let y = x.cast(DType::I32);
    assert_eq!(y.dtype(), DType::I32);
    assert_eq!(y, [1, -1, 0]);
    assert_eq!(y.cast(DType::F32), [1.0, -1.0, 0.0]);
}

#[test]
fn constructors() -> Result<(), SynapseError> {
    assert_eq!(Tensor::zeros([2, 2], DType::I32), [[0, 0], [0, 0]]);
    assert_eq!(Tensor::ones([3], DType::F32), [1.0, 1.0, 1.0]);
    assert_eq!(Tensor::full([2], 2.5), [2.5, 2.5]);
    let x = Tensor::from_vec(vec![1, 2, 3, 4], [2, 2])?;
    assert_eq!(x, [[1, 2], [3, 4]]);
    assert!(Tensor::from_vec(vec![1, 2, 3], [2, 2]).is_err());

    let x = Tensor::uniform([100], -1.0..1.0);
    assert!(x.to_vec::<f32>().iter().all(|v| (-1.0..1.0).contains(v)));
    let x = Tensor::randn([4, 5]);
    assert_eq!(x.shape(), &[4, 5].into());
    assert_eq!(x.dtype(), DType::F32);
    Ok(())
}

#[test]
fn item_to_vec() {
    let x = Tensor::from([[5]]);
    assert_eq!(x.item::<i32>(), Some(5));
    assert_eq!(x.item::<f32>(), Some(5.0));
    let x = Tensor::from([1, 2]);
    assert_eq!(x.item::<i32>(), None);
    assert_eq!(x.to_vec::<f32>(), vec![1.0, 2.0]);
}

#[test]
fn dropout() {
    let x = Tensor::from([1.0, 2.0, 3.0]);
    // Rate zero passes through
    assert_eq!(x.dropout(0.0), [1.0, 2.0, 3.0]);
    // Survivors are scaled by 1/(1-rate)
    let y = Tensor::ones([1000], DType::F32).dropout(0.5);
    assert!(y.to_vec::<f32>().iter().all(|v| *v == 0.0 || *v == 2.0));
}
