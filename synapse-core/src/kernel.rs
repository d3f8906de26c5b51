//! Raw buffer kernels. All buffers are contiguous in row major order,
//! shapes and strides are passed in by the caller.

use crate::axes::Axes;
use crate::scalar::Scalar;
use crate::shape::Shape;
use rayon::prelude::*;

/// Map index in the result buffer to index in a source buffer,
/// where sstrides are the source's strides laid out over the result's axes
/// (zero stride on broadcasted axes).
fn source_idx(i: usize, rshape: &Shape, rstrides: &Shape, sstrides: &Shape) -> usize {
    let mut j = 0;
    for a in 0..rshape.rank() {
        j += ((i / rstrides[a]) % rshape[a]) * sstrides[a];
    }
    j
}

pub(crate) fn unary<T: Scalar, T2: Scalar>(
    data: &[T],
    op: impl Fn(T) -> T2 + Sync + Send,
) -> Vec<T2> {
    data.par_iter().copied().map(op).collect()
}

/// Binary op with broadcasting. rshape must be the broadcasted shape
/// of xshape and yshape.
pub(crate) fn binary<T: Scalar, T2: Scalar>(
    xdata: &[T],
    xshape: &Shape,
    ydata: &[T],
    yshape: &Shape,
    rshape: &Shape,
    op: impl Fn(T, T) -> T2 + Sync + Send,
) -> Vec<T2> {
    if xshape == yshape {
        return xdata
            .par_iter()
            .copied()
            .zip(ydata.par_iter().copied())
            .map(|(x, y)| op(x, y))
            .collect();
    }
    let rstrides = rshape.strides();
    let xstrides = xshape.expand_strides(rshape, xshape.strides());
    let ystrides = yshape.expand_strides(rshape, yshape.strides());
    (0..rshape.numel())
        .into_par_iter()
        .map(|i| {
            op(
                xdata[source_idx(i, rshape, &rstrides, &xstrides)],
                ydata[source_idx(i, rshape, &rstrides, &ystrides)],
            )
        })
        .collect()
}

/// Materialize an expand of data from shape to rshape
pub(crate) fn expand<T: Scalar>(data: &[T], shape: &Shape, rshape: &Shape) -> Vec<T> {
    let rstrides = rshape.strides();
    let sstrides = shape.expand_strides(rshape, shape.strides());
    (0..rshape.numel())
        .into_par_iter()
        .map(|i| data[source_idx(i, rshape, &rstrides, &sstrides)])
        .collect()
}

pub(crate) fn permute<T: Scalar>(data: &[T], shape: &Shape, axes: &Axes) -> Vec<T> {
    let rshape = shape.permute(axes);
    let rstrides = rshape.strides();
    let strides = shape.strides();
    let sstrides: Shape = axes
        .iter()
        .map(|a| strides[*a])
        .collect::<Vec<usize>>()
        .into();
    (0..rshape.numel())
        .into_par_iter()
        .map(|i| data[source_idx(i, &rshape, &rstrides, &sstrides)])
        .collect()
}

/// Reduce along axes, keeping reduced dimensions with size 1.
/// init is the reduction identity (zero for sum, min value for max).
pub(crate) fn reduce<T: Scalar>(
    data: &[T],
    shape: &Shape,
    axes: &Axes,
    init: T,
    op: impl Fn(T, T) -> T,
) -> Vec<T> {
    let strides = shape.strides();
    let included_dims: Box<[usize]> = (0..shape.rank())
        .filter(|a| !axes.iter().any(|x| x == a))
        .collect();
    let rshape = shape.clone().reduce(axes);
    let rstrides = rshape.strides();
    let mut res: Vec<T> = core::iter::repeat(init).take(rshape.numel()).collect();
    for i in 0..shape.numel() {
        let mut j = 0;
        for dim in &*included_dims {
            j += ((i / strides[*dim]) % shape[*dim]) * rstrides[*dim];
        }
        res[j] = op(res[j], data[i]);
    }
    res
}

/// Pad with zeros, padding is laid out over all axes in order
/// (normalized by the caller). Negative padding crops.
pub(crate) fn pad<T: Scalar>(data: &[T], shape: &Shape, padding: &[(i64, i64)]) -> Vec<T> {
    let rank = shape.rank();
    let mut rdims: Vec<usize> = Vec::with_capacity(rank);
    for a in 0..rank {
        rdims.push((shape[a] as i64 + padding[a].0 + padding[a].1) as usize);
    }
    let rshape: Shape = rdims.into();
    let rstrides = rshape.strides();
    let strides = shape.strides();
    (0..rshape.numel())
        .into_par_iter()
        .map(|i| {
            let mut j = 0;
            for a in 0..rank {
                let coord = ((i / rstrides[a]) % rshape[a]) as i64 - padding[a].0;
                if coord < 0 || coord >= shape[a] as i64 {
                    return T::zero();
                }
                j += coord as usize * strides[a];
            }
            data[j]
        })
        .collect()
}

/// Gather len elements along axis starting at start with the given step
pub(crate) fn slice_strided<T: Scalar>(
    data: &[T],
    shape: &Shape,
    axis: usize,
    start: usize,
    step: usize,
    len: usize,
) -> Vec<T> {
    let mut rdims: Vec<usize> = shape.iter().copied().collect();
    rdims[axis] = len;
    let rshape: Shape = rdims.into();
    let rstrides = rshape.strides();
    let strides = shape.strides();
    (0..rshape.numel())
        .into_par_iter()
        .map(|i| {
            let mut j = 0;
            for a in 0..shape.rank() {
                let mut coord = (i / rstrides[a]) % rshape[a];
                if a == axis {
                    coord = start + coord * step;
                }
                j += coord * strides[a];
            }
            data[j]
        })
        .collect()
}

/// Batched matmul of x [b, m, k] and y [b, n, k], y is passed transposed
/// so that both inner loops run over contiguous memory.
pub(crate) fn matmul<T: Scalar>(
    x: &[T],
    yt: &[T],
    b: usize,
    m: usize,
    k: usize,
    n: usize,
) -> Vec<T> {
    let mut res: Vec<T> = core::iter::repeat(T::zero()).take(b * m * n).collect();
    res.par_chunks_mut(n).enumerate().for_each(|(ri, row)| {
        let batch = ri / m;
        let i = ri % m;
        let xrow = &x[(batch * m + i) * k..(batch * m + i + 1) * k];
        for (j, r) in row.iter_mut().enumerate() {
            let ycol = &yt[(batch * n + j) * k..(batch * n + j + 1) * k];
            let mut acc = T::zero();
            for l in 0..k {
                acc = acc.add(xrow[l].mul(ycol[l]));
            }
            *r = acc;
        }
    });
    res
}
