/// Axes of tensor, usually used in reduce and permute operations.
/// Create Axes with [`IntoAxes`], which normalizes negative axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axes(pub(crate) Box<[usize]>);

impl Axes {
    /// Iterate over axes
    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.into_iter()
    }

    /// Number of axes
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Is the set of axes empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices that sort these axes, used to invert permutes
    #[must_use]
    pub fn argsort(&self) -> Axes {
        let mut axes: Box<[(usize, usize)]> = self.0.iter().copied().enumerate().collect();
        axes.sort_by_key(|(_, v)| *v);
        Axes(axes.iter().map(|(k, _)| *k).collect())
    }
}

impl<'a> IntoIterator for &'a Axes {
    type IntoIter = <&'a [usize] as IntoIterator>::IntoIter;
    type Item = &'a usize;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Conversion into [Axes], normalizing negative axes against rank
pub trait IntoAxes {
    /// Convert self into axes
    fn into_axes(self, rank: usize) -> Axes;
}

impl IntoAxes for Axes {
    fn into_axes(self, _rank: usize) -> Axes {
        self
    }
}

impl IntoAxes for i64 {
    fn into_axes(self, rank: usize) -> Axes {
        Axes(Box::new([(self + rank as i64) as usize % rank]))
    }
}

impl IntoAxes for i32 {
    fn into_axes(self, rank: usize) -> Axes {
        i64::from(self).into_axes(rank)
    }
}

impl IntoAxes for &[i64] {
    fn into_axes(self, rank: usize) -> Axes {
        Axes(
            self.iter()
                .map(|a| (a + rank as i64) as usize % rank)
                .collect(),
        )
    }
}

impl<const N: usize> IntoAxes for [i64; N] {
    fn into_axes(self, rank: usize) -> Axes {
        self.as_slice().into_axes(rank)
    }
}

impl IntoAxes for Vec<i64> {
    fn into_axes(self, rank: usize) -> Axes {
        self.as_slice().into_axes(rank)
    }
}

impl IntoAxes for core::ops::Range<i64> {
    fn into_axes(self, rank: usize) -> Axes {
        self.collect::<Vec<i64>>().into_axes(rank)
    }
}

impl IntoAxes for () {
    fn into_axes(self, rank: usize) -> Axes {
        Axes((0..rank).collect())
    }
}
