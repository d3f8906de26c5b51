use synapse_core::{DType, SynapseError, Tensor};

#[test]
fn reshape() -> Result<(), SynapseError> {
    let x = Tensor::from([1, 2, 3, 4, 5, 6]);
    assert_eq!(x.reshape([2, 3])?, [[1, 2, 3], [4, 5, 6]]);
    assert_eq!(x.reshape([3, 2])?, [[1, 2], [3, 4], [5, 6]]);
    assert!(x.reshape([4, 2]).is_err());
    Ok(())
}

#[test]
fn expand() -> Result<(), SynapseError> {
    let x = Tensor::from([1, 2, 3]);
    assert_eq!(x.expand([2, 3])?, [[1, 2, 3], [1, 2, 3]]);
    let x = Tensor::from([[1], [2]]);
    assert_eq!(x.expand([2, 2])?, [[1, 1], [2, 2]]);
    assert!(Tensor::from([1, 2]).expand([2, 3]).is_err());
    Ok(())
}

#[test]
fn permute() -> Result<(), SynapseError> {
    let x = Tensor::from([[1, 2, 3], [4, 5, 6]]);
    assert_eq!(x.permute([1, 0])?, [[1, 4], [2, 5], [3, 6]]);
    assert_eq!(x.transpose()?, [[1, 4], [2, 5], [3, 6]]);
    let x = Tensor::arange(0..8).reshape([2, 2, 2])?;
    assert_eq!(x.permute([2, 0, 1])?, [[[0, 2], [4, 6]], [[1, 3], [5, 7]]]);
    assert!(x.permute([0, 1]).is_err());
    Ok(())
}

#[test]
fn pad() -> Result<(), SynapseError> {
    let x = Tensor::from([[1, 2], [3, 4]]);
    // Last axis only
    assert_eq!(x.pad([(1, 1)])?, [[0, 1, 2, 0], [0, 3, 4, 0]]);
    // Second to last axis, negative right crops
    assert_eq!(x.pad([(0, 0), (1, -1)])?, [[0, 0], [1, 2]]);
    assert_eq!(x.pad([(0, 0), (-1, 1)])?, [[3, 4], [0, 0]]);
    // Cropping more than the whole axis fails
    assert!(x.pad([(-1, -2)]).is_err());
    Ok(())
}

#[test]
fn narrow_stride() -> Result<(), SynapseError> {
    let x = Tensor::from([[1, 2, 3, 4], [5, 6, 7, 8]]);
    assert_eq!(x.narrow(1, 1, 2)?, [[2, 3], [6, 7]]);
    assert_eq!(x.narrow(-1, 0, 1)?, [[1], [5]]);
    assert_eq!(x.narrow(0, 1, 1)?, [[5, 6, 7, 8]]);
    assert!(x.narrow(1, 3, 2).is_err());

    let x = Tensor::arange(0..6);
    assert_eq!(x.stride_axis(0, 2)?, [0, 2, 4]);
    assert_eq!(x.stride_axis(0, 4)?, [0, 4]);
    assert!(x.stride_axis(0, 0).is_err());
    Ok(())
}

#[test]
fn squeeze_unsqueeze() -> Result<(), SynapseError> {
    let x = Tensor::from([[1, 2, 3]]);
    assert_eq!(x.squeeze(0)?, [1, 2, 3]);
    assert!(x.squeeze(1).is_err());
    let x = Tensor::from([1, 2, 3]);
    assert_eq!(x.unsqueeze(0)?, [[1, 2, 3]]);
    assert_eq!(x.unsqueeze(-1)?, [[1], [2], [3]]);
    Ok(())
}

#[test]
fn cat_stack() -> Result<(), SynapseError> {
    let x = Tensor::from([[1, 2], [3, 4]]);
    let y = Tensor::from([[5, 6]]);
    assert_eq!(
        Tensor::cat(&[x.clone(), y], 0)?,
        [[1, 2], [3, 4], [5, 6]]
    );
    let y = Tensor::from([[5], [6]]);
    assert_eq!(Tensor::cat(&[x.clone(), y], -1)?, [[1, 2, 5], [3, 4, 6]]);

    let a = Tensor::from([1, 2]);
    let b = Tensor::from([3, 4]);
    assert_eq!(Tensor::stack(&[a.clone(), b.clone()], 0)?, [[1, 2], [3, 4]]);
    assert_eq!(Tensor::stack(&[a, b], 1)?, [[1, 3], [2, 4]]);

    // dtype mismatch
    let x = Tensor::from([1, 2]);
    let y = Tensor::from([1.0, 2.0]);
    assert!(Tensor::cat(&[x, y], 0).is_err());
    // shape mismatch
    let x = Tensor::from([[1, 2]]);
    let y = Tensor::from([3, 4]);
    assert!(Tensor::cat(&[x, y], 0).is_err());
    Ok(())
}

#[test]
fn eye_arange() {
    assert_eq!(Tensor::eye(3, DType::I32), [[1, 0, 0], [0, 1, 0], [0, 0, 1]]);
    assert_eq!(Tensor::eye(2, DType::F32), [[1.0, 0.0], [0.0, 1.0]]);
    let x = Tensor::arange(-2..3);
    assert_eq!(x.dtype(), DType::I32);
    assert_eq!(x, [-2, -1, 0, 1, 2]);
}
