use crate::axes::Axes;
use crate::error::SynapseError;
use core::ops::Range;

fn to_usize_idx(index: i64, rank: usize) -> usize {
    (index + rank as i64) as usize % rank
}

/// Shape of tensor
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Shape(Box<[usize]>);

impl Shape {
    /// Get shape's rank
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.0.len()
    }

    /// Get number of elements in tensor with this shape
    /// (a product of it's dimensions).
    #[must_use]
    pub fn numel(&self) -> usize {
        self.0.iter().product()
    }

    /// Iter
    #[must_use]
    pub fn iter(&self) -> core::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// Get shape's strides
    #[must_use]
    pub fn strides(&self) -> Shape {
        let mut a = 1;
        Shape(
            self.0
                .iter()
                .rev()
                .map(|d| {
                    let t = a;
                    a *= d;
                    t
                })
                .collect::<Box<[usize]>>()
                .iter()
                .copied()
                .rev()
                .collect(),
        )
    }

    /// Permute shape's dimensions with axes
    #[must_use]
    pub fn permute(&self, axes: &Axes) -> Self {
        Self(axes.iter().map(|axis| self.0[*axis]).collect())
    }

    pub(crate) fn expand_strides(&self, shape: &Shape, mut old_strides: Shape) -> Shape {
        let mut vec = self.0.to_vec();
        while vec.len() < shape.rank() {
            vec.insert(0, 1);
            old_strides.0 = [0]
                .into_iter()
                .chain(old_strides.0.iter().copied())
                .collect();
        }
        let old_shape: Shape = vec.into();
        Shape(
            old_shape
                .into_iter()
                .zip(shape)
                .zip(&old_strides)
                .map(|((od, nd), st)| if od == nd { *st } else { 0 })
                .collect(),
        )
    }

    /// Reduce self along axes, keeping reduced dimensions with size 1
    #[must_use]
    pub fn reduce(self, axes: &Axes) -> Shape {
        let mut shape = self;
        for a in axes.iter() {
            shape.0[*a] = 1;
        }
        shape
    }

    /// Shape after padding, with padding applied from the last axis backwards.
    /// Negative padding crops the dimension.
    pub(crate) fn pad(&self, padding: &[(i64, i64)]) -> Result<Shape, SynapseError> {
        if padding.len() > self.rank() {
            return Err(SynapseError::ShapeError(format!(
                "Cannot pad {} axes of shape {self} with rank {}",
                padding.len(),
                self.rank()
            )));
        }
        let mut dims = self.0.to_vec();
        let rank = self.rank();
        for (i, (left, right)) in padding.iter().enumerate() {
            let axis = rank - i - 1;
            let d = dims[axis] as i64 + left + right;
            if d < 1 {
                return Err(SynapseError::ShapeError(format!(
                    "Padding ({left}, {right}) is too negative for dimension {} of shape {self}",
                    dims[axis]
                )));
            }
            dims[axis] = d as usize;
        }
        Ok(dims.into())
    }

    pub(crate) fn safetensors(&self) -> String {
        let mut res = String::from("[");
        for d in self.iter() {
            res.push_str(&d.to_string());
            res.push(',');
        }
        if self.rank() > 0 {
            res.pop();
        }
        res.push(']');
        res
    }

    pub(crate) fn from_safetensors(text: &str) -> Result<Shape, SynapseError> {
        text.split(',')
            .map(|d| {
                d.trim().parse::<usize>().map_err(|err| {
                    SynapseError::ParseError(format!("Could not parse safetensors shape: {err}"))
                })
            })
            .collect::<Result<Vec<usize>, SynapseError>>()
            .map(Shape::from)
    }

    /// Shape of the result of broadcasted binary operation between self and rhs.
    pub(crate) fn broadcast(&self, rhs: &Shape) -> Result<Shape, SynapseError> {
        let rank = self.rank().max(rhs.rank());
        let mut x = self.0.to_vec();
        let mut y = rhs.0.to_vec();
        while x.len() < rank {
            x.insert(0, 1);
        }
        while y.len() < rank {
            y.insert(0, 1);
        }
        let mut dims = Vec::with_capacity(rank);
        for (xd, yd) in x.into_iter().zip(y) {
            if xd == yd || xd == 1 || yd == 1 {
                dims.push(xd.max(yd));
            } else {
                return Err(SynapseError::ShapeError(format!(
                    "Shapes {self} and {rhs} can not be broadcasted together"
                )));
            }
        }
        Ok(dims.into())
    }
}

impl core::fmt::Display for Shape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        f.write_fmt(format_args!("{:?}", self.0))
    }
}

impl core::ops::Index<i32> for Shape {
    type Output = usize;
    fn index(&self, index: i32) -> &Self::Output {
        &self.0[to_usize_idx(i64::from(index), self.rank())]
    }
}

impl core::ops::Index<i64> for Shape {
    type Output = usize;
    fn index(&self, index: i64) -> &Self::Output {
        &self.0[to_usize_idx(index, self.rank())]
    }
}

impl core::ops::Index<usize> for Shape {
    type Output = usize;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl core::ops::Index<Range<i64>> for Shape {
    type Output = [usize];
    fn index(&self, index: Range<i64>) -> &Self::Output {
        let rank = self.rank();
        &self.0[to_usize_idx(index.start, rank)..to_usize_idx(index.end, rank)]
    }
}

impl From<Vec<usize>> for Shape {
    fn from(value: Vec<usize>) -> Self {
        Shape(value.into_iter().collect())
    }
}

impl From<&[usize]> for Shape {
    fn from(value: &[usize]) -> Self {
        Shape(value.iter().copied().collect())
    }
}

impl From<&Shape> for Shape {
    fn from(value: &Shape) -> Self {
        value.clone()
    }
}

impl From<usize> for Shape {
    fn from(value: usize) -> Self {
        Shape(Box::new([value]))
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(value: [usize; N]) -> Self {
        Shape(value.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Shape {
    type IntoIter = <&'a [usize] as IntoIterator>::IntoIter;
    type Item = &'a usize;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
