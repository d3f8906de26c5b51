use crate::axes::{Axes, IntoAxes};
use crate::dtype::DType;
use crate::error::SynapseError;
use crate::kernel;
use crate::scalar::Scalar;
use crate::shape::Shape;
use rand::Rng;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Data {
    F32(Vec<f32>),
    I32(Vec<i32>),
}

impl Data {
    fn dtype(&self) -> DType {
        match self {
            Data::F32(..) => DType::F32,
            Data::I32(..) => DType::I32,
        }
    }
}

/// Tensor is a multidimensional array of [Scalar] values.
/// All operations are evaluated eagerly into contiguous row major buffers.
/// Cloning is cheap, the underlying buffer is shared.
#[derive(Debug, Clone)]
pub struct Tensor {
    data: Rc<Data>,
    shape: Shape,
}

fn tensor(data: Data, shape: Shape) -> Tensor {
    Tensor {
        data: Rc::new(data),
        shape,
    }
}

impl Tensor {
    /// Create tensor from data with the given shape.
    /// Returns [SynapseError::ShapeError] if data length does not match shape.
    pub fn from_vec<T: Scalar>(
        data: Vec<T>,
        shape: impl Into<Shape>,
    ) -> Result<Tensor, SynapseError> {
        let shape = shape.into();
        if data.len() != shape.numel() {
            return Err(SynapseError::ShapeError(format!(
                "Cannot create tensor with shape {shape} from {} elements",
                data.len()
            )));
        }
        Ok(match T::dtype() {
            DType::F32 => tensor(
                Data::F32(data.into_iter().map(Scalar::into_f32).collect()),
                shape,
            ),
            DType::I32 => tensor(
                Data::I32(data.into_iter().map(Scalar::into_i32).collect()),
                shape,
            ),
        })
    }

    /// Tensor filled with zeros
    #[must_use]
    pub fn zeros(shape: impl Into<Shape>, dtype: DType) -> Tensor {
        let shape = shape.into();
        let n = shape.numel();
        match dtype {
            DType::F32 => tensor(Data::F32(vec![0.; n]), shape),
            DType::I32 => tensor(Data::I32(vec![0; n]), shape),
        }
    }

    /// Tensor filled with ones
    #[must_use]
    pub fn ones(shape: impl Into<Shape>, dtype: DType) -> Tensor {
        let shape = shape.into();
        let n = shape.numel();
        match dtype {
            DType::F32 => tensor(Data::F32(vec![1.; n]), shape),
            DType::I32 => tensor(Data::I32(vec![1; n]), shape),
        }
    }

    /// Tensor filled with value
    #[must_use]
    pub fn full<T: Scalar>(shape: impl Into<Shape>, value: T) -> Tensor {
        let shape = shape.into();
        let n = shape.numel();
        match T::dtype() {
            DType::F32 => tensor(Data::F32(vec![value.into_f32(); n]), shape),
            DType::I32 => tensor(Data::I32(vec![value.into_i32(); n]), shape),
        }
    }

    /// Identity matrix with shape [n, n]
    #[must_use]
    pub fn eye(n: usize, dtype: DType) -> Tensor {
        match dtype {
            DType::F32 => {
                let mut data = vec![0.; n * n];
                for i in 0..n {
                    data[i * n + i] = 1.;
                }
                tensor(Data::F32(data), [n, n].into())
            }
            DType::I32 => {
                let mut data = vec![0; n * n];
                for i in 0..n {
                    data[i * n + i] = 1;
                }
                tensor(Data::I32(data), [n, n].into())
            }
        }
    }

    /// 1d i32 tensor with values from range
    #[must_use]
    pub fn arange(range: core::ops::Range<i64>) -> Tensor {
        let data: Vec<i32> = range.map(|v| v as i32).collect();
        let shape: Shape = data.len().into();
        tensor(Data::I32(data), shape)
    }

    /// Tensor sampled from uniform distribution over range
    #[must_use]
    pub fn uniform(shape: impl Into<Shape>, range: core::ops::Range<f32>) -> Tensor {
        let shape = shape.into();
        let mut rng = rand::thread_rng();
        let data = (0..shape.numel())
            .map(|_| rng.gen_range(range.clone()))
            .collect();
        tensor(Data::F32(data), shape)
    }

    /// Tensor sampled from standard normal distribution,
    /// generated with Box-Muller transform
    #[must_use]
    pub fn randn(shape: impl Into<Shape>) -> Tensor {
        let shape = shape.into();
        let mut rng = rand::thread_rng();
        let data = (0..shape.numel())
            .map(|_| {
                let u1 = 1.0 - rng.gen::<f32>();
                let u2: f32 = rng.gen();
                (-2.0 * u1.ln()).sqrt() * (core::f32::consts::TAU * u2).cos()
            })
            .collect();
        tensor(Data::F32(data), shape)
    }

    /// Tensor's shape
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Tensor's rank
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of elements in tensor
    #[must_use]
    pub fn numel(&self) -> usize {
        self.shape.numel()
    }

    /// Tensor's dtype
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// Value of a single element tensor, None if the tensor has more elements
    #[must_use]
    pub fn item<T: Scalar>(&self) -> Option<T> {
        if self.numel() != 1 {
            return None;
        }
        self.to_vec::<T>().into_iter().next()
    }

    /// Tensor's data as a flat vector, converted to T if dtypes differ
    #[must_use]
    pub fn to_vec<T: Scalar>(&self) -> Vec<T> {
        match &*self.data {
            Data::F32(data) => data.iter().map(|x| T::from_f32(*x)).collect(),
            Data::I32(data) => data.iter().map(|x| T::from_i32(*x)).collect(),
        }
    }

    /// Cast tensor into dtype
    #[must_use]
    pub fn cast(&self, dtype: DType) -> Tensor {
        if self.dtype() == dtype {
            return self.clone();
        }
        match &*self.data {
            Data::F32(data) => tensor(
                Data::I32(kernel::unary(data, Scalar::into_i32)),
                self.shape.clone(),
            ),
            Data::I32(data) => tensor(
                Data::F32(kernel::unary(data, Scalar::into_f32)),
                self.shape.clone(),
            ),
        }
    }

    fn unary_same(
        &self,
        fop: impl Fn(f32) -> f32 + Sync + Send,
        iop: impl Fn(i32) -> i32 + Sync + Send,
    ) -> Tensor {
        match &*self.data {
            Data::F32(data) => tensor(Data::F32(kernel::unary(data, fop)), self.shape.clone()),
            Data::I32(data) => tensor(Data::I32(kernel::unary(data, iop)), self.shape.clone()),
        }
    }

    fn unary_float(&self, op: impl Fn(f32) -> f32 + Sync + Send) -> Tensor {
        let x = self.cast(DType::F32);
        let Data::F32(data) = &*x.data else { panic!() };
        tensor(Data::F32(kernel::unary(data, op)), x.shape.clone())
    }

    /// Elementwise ReLU
    #[must_use]
    pub fn relu(&self) -> Tensor {
        self.unary_same(Scalar::relu, Scalar::relu)
    }

    /// Elementwise sine
    #[must_use]
    pub fn sin(&self) -> Tensor {
        self.unary_float(Scalar::sin)
    }

    /// Elementwise cosine
    #[must_use]
    pub fn cos(&self) -> Tensor {
        self.unary_float(Scalar::cos)
    }

    /// Elementwise natural logarithm
    #[must_use]
    pub fn ln(&self) -> Tensor {
        self.unary_float(Scalar::ln)
    }

    /// Elementwise exponential
    #[must_use]
    pub fn exp(&self) -> Tensor {
        self.unary_float(Scalar::exp)
    }

    /// Elementwise hyperbolic tangent
    #[must_use]
    pub fn tanh(&self) -> Tensor {
        self.unary_float(Scalar::tanh)
    }

    /// Elementwise square root
    #[must_use]
    pub fn sqrt(&self) -> Tensor {
        self.unary_float(Scalar::sqrt)
    }

    /// Elementwise sigmoid
    #[must_use]
    pub fn sigmoid(&self) -> Tensor {
        self.unary_float(|x| 1.0 / (1.0 + (-x).exp()))
    }

    /// Elementwise gelu, tanh approximation
    #[must_use]
    pub fn gelu(&self) -> Tensor {
        self.unary_float(|x| {
            0.5 * x * (1.0 + ((2.0 / core::f32::consts::PI).sqrt() * (x + 0.044715 * x * x * x)).tanh())
        })
    }

    /// Zero random elements with probability rate,
    /// scale the rest by 1/(1-rate)
    #[must_use]
    pub fn dropout(&self, rate: f32) -> Tensor {
        if rate <= 0.0 {
            return self.clone();
        }
        let x = self.cast(DType::F32);
        let Data::F32(data) = &*x.data else { panic!() };
        let mut rng = rand::thread_rng();
        let scale = 1.0 / (1.0 - rate);
        let data = data
            .iter()
            .map(|v| if rng.gen::<f32>() < rate { 0.0 } else { v * scale })
            .collect();
        tensor(Data::F32(data), x.shape.clone())
    }

    fn binary_op(
        &self,
        rhs: &Tensor,
        fop: impl Fn(f32, f32) -> f32 + Sync + Send,
        iop: impl Fn(i32, i32) -> i32 + Sync + Send,
    ) -> Result<Tensor, SynapseError> {
        let (x, y) = if self.dtype() == rhs.dtype() {
            (self.clone(), rhs.clone())
        } else {
            (self.cast(DType::F32), rhs.cast(DType::F32))
        };
        let rshape = x.shape.broadcast(&y.shape)?;
        Ok(match &*x.data {
            Data::F32(xdata) => {
                let Data::F32(ydata) = &*y.data else { panic!() };
                tensor(
                    Data::F32(kernel::binary(xdata, &x.shape, ydata, &y.shape, &rshape, fop)),
                    rshape,
                )
            }
            Data::I32(xdata) => {
                let Data::I32(ydata) = &*y.data else { panic!() };
                tensor(
                    Data::I32(kernel::binary(xdata, &x.shape, ydata, &y.shape, &rshape, iop)),
                    rshape,
                )
            }
        })
    }

    /// Elementwise power with broadcasting
    pub fn pow(&self, rhs: impl Into<Tensor>) -> Result<Tensor, SynapseError> {
        self.binary_op(&rhs.into(), Scalar::pow, Scalar::pow)
    }

    /// Elementwise compare less than with broadcasting, 1 where true else 0
    pub fn cmplt(&self, rhs: impl Into<Tensor>) -> Result<Tensor, SynapseError> {
        self.binary_op(&rhs.into(), Scalar::cmplt, Scalar::cmplt)
    }

    /// Elementwise compare equal with broadcasting, 1 where true else 0
    pub fn equal(&self, rhs: impl Into<Tensor>) -> Result<Tensor, SynapseError> {
        self.binary_op(&rhs.into(), Scalar::cmpeq, Scalar::cmpeq)
    }

    /// Elementwise maximum with broadcasting
    pub fn maximum(&self, rhs: impl Into<Tensor>) -> Result<Tensor, SynapseError> {
        self.binary_op(&rhs.into(), Scalar::max, Scalar::max)
    }

    /// Change tensor's shape without changing its data.
    /// Returns [SynapseError::ShapeError] if the number of elements differs.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Tensor, SynapseError> {
        let shape = shape.into();
        if shape.numel() != self.numel() {
            return Err(SynapseError::ShapeError(format!(
                "Cannot reshape tensor with shape {} into shape {shape}",
                self.shape
            )));
        }
        Ok(Tensor {
            data: Rc::clone(&self.data),
            shape,
        })
    }

    /// Expand size one dimensions of tensor to shape
    pub fn expand(&self, shape: impl Into<Shape>) -> Result<Tensor, SynapseError> {
        let shape = shape.into();
        if shape.rank() < self.rank()
            || self
                .shape
                .iter()
                .rev()
                .zip(shape.iter().rev())
                .any(|(od, nd)| od != nd && *od != 1)
        {
            return Err(SynapseError::ShapeError(format!(
                "Cannot expand tensor with shape {} into shape {shape}",
                self.shape
            )));
        }
        if shape == self.shape {
            return Ok(self.clone());
        }
        Ok(match &*self.data {
            Data::F32(data) => tensor(
                Data::F32(kernel::expand(data, &self.shape, &shape)),
                shape,
            ),
            Data::I32(data) => tensor(
                Data::I32(kernel::expand(data, &self.shape, &shape)),
                shape,
            ),
        })
    }

    /// Reorder tensor's dimensions with axes
    pub fn permute(&self, axes: impl IntoAxes) -> Result<Tensor, SynapseError> {
        let axes = axes.into_axes(self.rank());
        if axes.len() != self.rank() {
            return Err(SynapseError::ShapeError(format!(
                "Cannot permute tensor with shape {} with {} axes",
                self.shape,
                axes.len()
            )));
        }
        let shape = self.shape.permute(&axes);
        Ok(match &*self.data {
            Data::F32(data) => tensor(Data::F32(kernel::permute(data, &self.shape, &axes)), shape),
            Data::I32(data) => tensor(Data::I32(kernel::permute(data, &self.shape, &axes)), shape),
        })
    }

    /// Swap tensor's last two dimensions
    pub fn transpose(&self) -> Result<Tensor, SynapseError> {
        if self.rank() < 2 {
            return Err(SynapseError::ShapeError(format!(
                "Cannot transpose tensor with shape {}",
                self.shape
            )));
        }
        let mut axes: Vec<i64> = (0..self.rank() as i64).collect();
        let rank = self.rank();
        axes.swap(rank - 1, rank - 2);
        self.permute(axes)
    }

    /// Pad tensor with zeros. Padding is a sequence of (left, right) pairs
    /// applied from the last axis backwards. Negative padding crops.
    pub fn pad(
        &self,
        padding: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<Tensor, SynapseError> {
        let padding: Vec<(i64, i64)> = padding.into_iter().collect();
        let shape = self.shape.pad(&padding)?;
        // lay padding out over all axes in order
        let rank = self.rank();
        let mut full = vec![(0i64, 0i64); rank];
        for (i, p) in padding.iter().enumerate() {
            full[rank - i - 1] = *p;
        }
        Ok(match &*self.data {
            Data::F32(data) => tensor(Data::F32(kernel::pad(data, &self.shape, &full)), shape),
            Data::I32(data) => tensor(Data::I32(kernel::pad(data, &self.shape, &full)), shape),
        })
    }

    /// Slice tensor along axis, keeping length elements from start
    pub fn narrow(&self, axis: i64, start: usize, length: usize) -> Result<Tensor, SynapseError> {
        let a = *axis.into_axes(self.rank()).iter().next().unwrap_or(&0);
        if start + length > self.shape[a] {
            return Err(SynapseError::ShapeError(format!(
                "Cannot narrow axis {axis} of tensor with shape {} to {start}..{}",
                self.shape,
                start + length
            )));
        }
        let mut dims: Vec<usize> = self.shape.iter().copied().collect();
        dims[a] = length;
        let shape: Shape = dims.into();
        Ok(match &*self.data {
            Data::F32(data) => tensor(
                Data::F32(kernel::slice_strided(data, &self.shape, a, start, 1, length)),
                shape,
            ),
            Data::I32(data) => tensor(
                Data::I32(kernel::slice_strided(data, &self.shape, a, start, 1, length)),
                shape,
            ),
        })
    }

    /// Keep every step-th element along axis, starting from the first
    pub fn stride_axis(&self, axis: i64, step: usize) -> Result<Tensor, SynapseError> {
        if step == 0 {
            return Err(SynapseError::ShapeError(
                "Cannot stride axis with step 0".into(),
            ));
        }
        let a = *axis.into_axes(self.rank()).iter().next().unwrap_or(&0);
        let length = (self.shape[a] + step - 1) / step;
        let mut dims: Vec<usize> = self.shape.iter().copied().collect();
        dims[a] = length;
        let shape: Shape = dims.into();
        Ok(match &*self.data {
            Data::F32(data) => tensor(
                Data::F32(kernel::slice_strided(data, &self.shape, a, 0, step, length)),
                shape,
            ),
            Data::I32(data) => tensor(
                Data::I32(kernel::slice_strided(data, &self.shape, a, 0, step, length)),
                shape,
            ),
        })
    }

    /// Remove size one dimension at axis
    pub fn squeeze(&self, axis: i64) -> Result<Tensor, SynapseError> {
        let a = *axis.into_axes(self.rank()).iter().next().unwrap_or(&0);
        if self.shape[a] != 1 {
            return Err(SynapseError::ShapeError(format!(
                "Cannot squeeze axis {axis} of tensor with shape {}",
                self.shape
            )));
        }
        let dims: Vec<usize> = self
            .shape
            .iter()
            .enumerate()
            .filter_map(|(i, d)| if i == a { None } else { Some(*d) })
            .collect();
        self.reshape(dims)
    }

    /// Insert size one dimension at axis
    pub fn unsqueeze(&self, axis: i64) -> Result<Tensor, SynapseError> {
        let a = *axis.into_axes(self.rank() + 1).iter().next().unwrap_or(&0);
        let mut dims: Vec<usize> = self.shape.iter().copied().collect();
        dims.insert(a, 1);
        self.reshape(dims)
    }

    /// Concatenate tensors along axis. All tensors must have the same dtype
    /// and the same shape on all other axes.
    pub fn cat(tensors: &[Tensor], axis: i64) -> Result<Tensor, SynapseError> {
        let Some(first) = tensors.first() else {
            return Err(SynapseError::ShapeError(
                "Cannot concatenate zero tensors".into(),
            ));
        };
        let rank = first.rank();
        let a = *axis.into_axes(rank).iter().next().unwrap_or(&0);
        let dtype = first.dtype();
        let mut cat_dim = 0;
        for t in tensors {
            if t.dtype() != dtype {
                return Err(SynapseError::DTypeError(format!(
                    "Cannot concatenate {} tensor with {dtype} tensor",
                    t.dtype()
                )));
            }
            if t.rank() != rank
                || t.shape
                    .iter()
                    .enumerate()
                    .any(|(i, d)| i != a && *d != first.shape[i])
            {
                return Err(SynapseError::ShapeError(format!(
                    "Cannot concatenate tensor with shape {} to tensor with shape {} along axis {axis}",
                    t.shape, first.shape
                )));
            }
            cat_dim += t.shape[a];
        }
        let mut dims: Vec<usize> = first.shape.iter().copied().collect();
        dims[a] = cat_dim;
        let shape: Shape = dims.into();
        let outer: usize = first.shape.iter().take(a).product();
        let inner: usize = first.shape.iter().skip(a + 1).product();
        Ok(match dtype {
            DType::F32 => {
                let data = cat_buffers(
                    &tensors
                        .iter()
                        .map(|t| {
                            let Data::F32(d) = &*t.data else { panic!() };
                            (d.as_slice(), t.shape[a])
                        })
                        .collect::<Vec<_>>(),
                    outer,
                    inner,
                );
                tensor(Data::F32(data), shape)
            }
            DType::I32 => {
                let data = cat_buffers(
                    &tensors
                        .iter()
                        .map(|t| {
                            let Data::I32(d) = &*t.data else { panic!() };
                            (d.as_slice(), t.shape[a])
                        })
                        .collect::<Vec<_>>(),
                    outer,
                    inner,
                );
                tensor(Data::I32(data), shape)
            }
        })
    }

    /// Stack tensors along a new dimension at axis
    pub fn stack(tensors: &[Tensor], axis: i64) -> Result<Tensor, SynapseError> {
        let unsqueezed = tensors
            .iter()
            .map(|t| t.unsqueeze(axis))
            .collect::<Result<Vec<Tensor>, SynapseError>>()?;
        Tensor::cat(&unsqueezed, axis)
    }

    fn sum_axes(&self, axes: &Axes) -> Tensor {
        let shape = self.shape.clone().reduce(axes);
        match &*self.data {
            Data::F32(data) => tensor(
                Data::F32(kernel::reduce(data, &self.shape, axes, 0.0, Scalar::add)),
                shape,
            ),
            Data::I32(data) => tensor(
                Data::I32(kernel::reduce(data, &self.shape, axes, 0, Scalar::add)),
                shape,
            ),
        }
    }

    fn mean_axes(&self, axes: &Axes) -> Tensor {
        let n: usize = axes.iter().map(|a| self.shape[*a]).product();
        self.cast(DType::F32).sum_axes(axes) * (1.0 / n as f32)
    }

    /// Sum along axes, reduced dimensions are kept with size 1
    #[must_use]
    pub fn sum(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        self.sum_axes(&axes)
    }

    /// Maximum along axes, reduced dimensions are kept with size 1
    #[must_use]
    pub fn max(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        let shape = self.shape.clone().reduce(&axes);
        match &*self.data {
            Data::F32(data) => tensor(
                Data::F32(kernel::reduce(
                    data,
                    &self.shape,
                    &axes,
                    <f32 as Scalar>::min_value(),
                    Scalar::max,
                )),
                shape,
            ),
            Data::I32(data) => tensor(
                Data::I32(kernel::reduce(
                    data,
                    &self.shape,
                    &axes,
                    <i32 as Scalar>::min_value(),
                    Scalar::max,
                )),
                shape,
            ),
        }
    }

    /// Mean along axes, reduced dimensions are kept with size 1.
    /// Result is always floating point.
    #[must_use]
    pub fn mean(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        self.mean_axes(&axes)
    }

    /// Variance along axes, reduced dimensions are kept with size 1
    #[must_use]
    pub fn var(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        let x = self.cast(DType::F32);
        let d = &x - x.mean_axes(&axes);
        (&d * &d).mean_axes(&axes)
    }

    /// Standard deviation along axes, reduced dimensions are kept with size 1
    #[must_use]
    pub fn std(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        self.var(axes).sqrt()
    }

    /// Softmax along axes
    #[must_use]
    pub fn softmax(&self, axes: impl IntoAxes) -> Tensor {
        let axes = axes.into_axes(self.rank());
        let x = self.cast(DType::F32);
        let e = (&x - x.max(axes.clone())).exp();
        &e / e.sum_axes(&axes)
    }

    /// Matrix multiplication, contracting the last axis of self
    /// with the second to last axis of rhs. Rank one operands are
    /// promoted to matrices and the inserted dimension is removed
    /// from the result. Leading batch dimensions are broadcasted.
    pub fn dot(&self, rhs: &Tensor) -> Result<Tensor, SynapseError> {
        let (x, y) = if self.dtype() == rhs.dtype() {
            (self.clone(), rhs.clone())
        } else {
            (self.cast(DType::F32), rhs.cast(DType::F32))
        };
        let x_vector = x.rank() == 1;
        let y_vector = y.rank() == 1;
        let x = if x_vector {
            x.reshape([1, x.shape[0]])?
        } else {
            x
        };
        let y = if y_vector {
            y.reshape([y.shape[0], 1])?
        } else {
            y
        };
        let k = x.shape[-1];
        if y.shape[-2] != k {
            return Err(SynapseError::ShapeError(format!(
                "Cannot multiply tensors with shapes {} and {}",
                self.shape, rhs.shape
            )));
        }
        let m = x.shape[-2];
        let n = y.shape[-1];
        let lx: Shape = x.shape[0..x.rank() as i64 - 2].into();
        let ly: Shape = y.shape[0..y.rank() as i64 - 2].into();
        let lb = lx.broadcast(&ly)?;
        let b = lb.numel();
        let x = broadcast_batch(&x, &lb, m, k)?.reshape([b, m, k])?;
        let y = broadcast_batch(&y, &lb, k, n)?.reshape([b, k, n])?;
        let yt = y.transpose()?;
        let res = match (&*x.data, &*yt.data) {
            (Data::F32(xdata), Data::F32(ytdata)) => tensor(
                Data::F32(kernel::matmul(xdata, ytdata, b, m, k, n)),
                [b, m, n].into(),
            ),
            (Data::I32(xdata), Data::I32(ytdata)) => tensor(
                Data::I32(kernel::matmul(xdata, ytdata, b, m, k, n)),
                [b, m, n].into(),
            ),
            _ => panic!(),
        };
        finish_dot(res, &lb, m, n, x_vector, y_vector)
    }
}

fn broadcast_batch(x: &Tensor, lb: &Shape, d0: usize, d1: usize) -> Result<Tensor, SynapseError> {
    let mut dims: Vec<usize> = lb.iter().copied().collect();
    dims.push(d0);
    dims.push(d1);
    x.expand(dims)
}

fn finish_dot(
    res: Tensor,
    lb: &Shape,
    m: usize,
    n: usize,
    x_vector: bool,
    y_vector: bool,
) -> Result<Tensor, SynapseError> {
    let mut dims: Vec<usize> = lb.iter().copied().collect();
    if !x_vector {
        dims.push(m);
    }
    if !y_vector {
        dims.push(n);
    }
    if dims.is_empty() {
        dims.push(1);
    }
    res.reshape(dims)
}

fn cat_buffers<T: Scalar>(parts: &[(&[T], usize)], outer: usize, inner: usize) -> Vec<T> {
    let total: usize = parts.iter().map(|(_, d)| d * inner).sum();
    let mut res = Vec::with_capacity(outer * total);
    for o in 0..outer {
        for (data, d) in parts {
            res.extend_from_slice(&data[o * d * inner..(o + 1) * d * inner]);
        }
    }
    res
}

impl core::fmt::Display for Tensor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("Tensor({}, {})", self.shape, self.dtype()))?;
        match &*self.data {
            Data::F32(data) => {
                if data.len() <= 32 {
                    f.write_fmt(format_args!(" {data:?}"))?;
                }
            }
            Data::I32(data) => {
                if data.len() <= 32 {
                    f.write_fmt(format_args!(" {data:?}"))?;
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        if self.shape != other.shape || self.dtype() != other.dtype() {
            return false;
        }
        match (&*self.data, &*other.data) {
            (Data::F32(x), Data::F32(y)) => {
                x.iter().zip(y).all(|(a, b)| a.is_equal(*b))
            }
            (Data::I32(x), Data::I32(y)) => x == y,
            _ => false,
        }
    }
}

impl<T: Scalar> From<T> for Tensor {
    fn from(value: T) -> Self {
        match T::dtype() {
            DType::F32 => tensor(Data::F32(vec![value.into_f32()]), 1.into()),
            DType::I32 => tensor(Data::I32(vec![value.into_i32()]), 1.into()),
        }
    }
}

impl From<&Tensor> for Tensor {
    fn from(value: &Tensor) -> Self {
        value.clone()
    }
}

impl<T: Scalar> From<Vec<T>> for Tensor {
    fn from(value: Vec<T>) -> Self {
        let shape: Shape = value.len().into();
        match T::dtype() {
            DType::F32 => tensor(
                Data::F32(value.into_iter().map(Scalar::into_f32).collect()),
                shape,
            ),
            DType::I32 => tensor(
                Data::I32(value.into_iter().map(Scalar::into_i32).collect()),
                shape,
            ),
        }
    }
}

impl<T: Scalar, const N: usize> From<[T; N]> for Tensor {
    fn from(value: [T; N]) -> Self {
        value.to_vec().into()
    }
}

impl<T: Scalar, const N: usize, const M: usize> From<[[T; N]; M]> for Tensor {
    fn from(value: [[T; N]; M]) -> Self {
        let data: Vec<T> = value.iter().flatten().copied().collect();
        let t: Tensor = data.into();
        Tensor {
            data: t.data,
            shape: [M, N].into(),
        }
    }
}

impl<T: Scalar, const N: usize, const M: usize, const L: usize> From<[[[T; N]; M]; L]> for Tensor {
    fn from(value: [[[T; N]; M]; L]) -> Self {
        let data: Vec<T> = value.iter().flatten().flatten().copied().collect();
        let t: Tensor = data.into();
        Tensor {
            data: t.data,
            shape: [L, M, N].into(),
        }
    }
}

impl<T: Scalar, const N: usize> PartialEq<[T; N]> for Tensor {
    fn eq(&self, other: &[T; N]) -> bool {
        if self.shape != [N].into() {
            return false;
        }
        self.to_vec::<T>()
            .into_iter()
            .zip(other.iter())
            .all(|(x, y)| x.is_equal(*y))
    }
}

impl<T: Scalar, const N: usize, const M: usize> PartialEq<[[T; N]; M]> for Tensor {
    fn eq(&self, other: &[[T; N]; M]) -> bool {
        if self.shape != [M, N].into() {
            return false;
        }
        self.to_vec::<T>()
            .into_iter()
            .zip(other.iter().flatten())
            .all(|(x, y)| x.is_equal(*y))
    }
}

impl<T: Scalar, const N: usize, const M: usize, const L: usize> PartialEq<[[[T; N]; M]; L]>
    for Tensor
{
    fn eq(&self, other: &[[[T; N]; M]; L]) -> bool {
        if self.shape != [L, M, N].into() {
            return false;
        }
        self.to_vec::<T>()
            .into_iter()
            .zip(other.iter().flatten().flatten())
            .all(|(x, y)| x.is_equal(*y))
    }
}

impl<'a> IntoIterator for &'a Tensor {
    type Item = &'a Tensor;
    type IntoIter = core::iter::Once<&'a Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        core::iter::once(self)
    }
}

impl<'a> IntoIterator for &'a mut Tensor {
    type Item = &'a mut Tensor;
    type IntoIter = core::iter::Once<&'a mut Tensor>;
    fn into_iter(self) -> Self::IntoIter {
        core::iter::once(self)
    }
}

impl core::ops::Neg for Tensor {
    type Output = Tensor;
    fn neg(self) -> Self::Output {
        self.unary_same(Scalar::neg, Scalar::neg)
    }
}

impl core::ops::Neg for &Tensor {
    type Output = Tensor;
    fn neg(self) -> Self::Output {
        self.unary_same(Scalar::neg, Scalar::neg)
    }
}

macro_rules! impl_binary_op {
    ($op_trait: ident, $op_fn: ident) => {
        impl<IT: Into<Tensor>> core::ops::$op_trait<IT> for Tensor {
            type Output = Tensor;
            /// # Panics
            /// Panics if the shapes cannot be broadcasted together.
            fn $op_fn(self, rhs: IT) -> Self::Output {
                match self.binary_op(&rhs.into(), Scalar::$op_fn, Scalar::$op_fn) {
                    Ok(t) => t,
                    Err(err) => panic!("{err}"),
                }
            }
        }

        impl<IT: Into<Tensor>> core::ops::$op_trait<IT> for &Tensor {
            type Output = Tensor;
            /// # Panics
            /// Panics if the shapes cannot be broadcasted together.
            fn $op_fn(self, rhs: IT) -> Self::Output {
                match self.binary_op(&rhs.into(), Scalar::$op_fn, Scalar::$op_fn) {
                    Ok(t) => t,
                    Err(err) => panic!("{err}"),
                }
            }
        }

        impl core::ops::$op_trait<Tensor> for f32 {
            type Output = Tensor;
            fn $op_fn(self, rhs: Tensor) -> Self::Output {
                core::ops::$op_trait::$op_fn(Tensor::from(self), rhs)
            }
        }

        impl core::ops::$op_trait<&Tensor> for f32 {
            type Output = Tensor;
            fn $op_fn(self, rhs: &Tensor) -> Self::Output {
                core::ops::$op_trait::$op_fn(Tensor::from(self), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add);
impl_binary_op!(Sub, sub);
impl_binary_op!(Mul, mul);
impl_binary_op!(Div, div);
