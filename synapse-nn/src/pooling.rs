use crate::window::{check_sequence, shift_time};
use synapse_core::{SynapseError, Tensor};

/// Max pooling over the sequence axis.
///
/// The window at step t is built from zero filled shifted copies of
/// the sequence, stacked and reduced with max, then strided. With
/// `pad` (the default) the output keeps ceil(time / stride) steps and
/// even windows pad one step more on the future side than on the past
/// side. Without padding the window at step t covers steps
/// t..t+window, positions past the end see zeros.
#[derive(Debug, Clone)]
pub struct SequentialMaxPooling {
    window: usize,
    stride: usize,
    pad: bool,
    feature_pool: Option<(usize, usize)>,
}

impl SequentialMaxPooling {
    /// New sequence max pooling with padding enabled
    pub fn new(window: usize, stride: usize) -> Result<SequentialMaxPooling, SynapseError> {
        if window < 1 || stride < 1 {
            return Err(SynapseError::ShapeError(format!(
                "Pooling window and stride must be at least 1, got {window} and {stride}"
            )));
        }
        Ok(SequentialMaxPooling {
            window,
            stride,
            pad: true,
            feature_pool: None,
        })
    }

    /// Enable or disable padding at the sequence boundaries
    pub fn with_pad(mut self, pad: bool) -> SequentialMaxPooling {
        self.pad = pad;
        self
    }

    /// Also max pool the feature axis with the given window and
    /// stride, without padding
    pub fn with_feature_pool(
        mut self,
        window: usize,
        stride: usize,
    ) -> Result<SequentialMaxPooling, SynapseError> {
        if window < 1 || stride < 1 {
            return Err(SynapseError::ShapeError(format!(
                "Pooling window and stride must be at least 1, got {window} and {stride}"
            )));
        }
        self.feature_pool = Some((window, stride));
        Ok(self)
    }

    /// Forward function for sequence max pooling.
    /// Input [batch, time, features], output
    /// [batch, ceil(time / stride), features].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        check_sequence(x)?;
        let window = self.window as i64;
        let offsets: Vec<i64> = if self.pad {
            let future = if window % 2 == 1 {
                (window - 1) / 2
            } else {
                window / 2
            };
            let past = if window % 2 == 1 { future } else { future - 1 };
            (-future..=past).collect()
        } else {
            (-(window - 1)..=0).collect()
        };
        let shifts = offsets
            .into_iter()
            .map(|offset| shift_time(x, offset))
            .collect::<Result<Vec<Tensor>, SynapseError>>()?;
        let pooled = Tensor::stack(&shifts, 0)?.max(0).squeeze(0)?;
        let pooled = if self.stride > 1 {
            pooled.stride_axis(1, self.stride)?
        } else {
            pooled
        };
        match self.feature_pool {
            Some((window, stride)) => pool_features(&pooled, window, stride),
            None => Ok(pooled),
        }
    }
}

fn pool_features(x: &Tensor, window: usize, stride: usize) -> Result<Tensor, SynapseError> {
    let features = x.shape()[-1i64];
    if features < window {
        return Err(SynapseError::ShapeError(format!(
            "Cannot pool {features} features with window {window}"
        )));
    }
    let out = (features - window) / stride + 1;
    let windows = (0..out)
        .map(|i| Ok(x.narrow(-1, i * stride, window)?.max(-1)))
        .collect::<Result<Vec<Tensor>, SynapseError>>()?;
    Tensor::cat(&windows, -1)
}

/// Downsampling over the sequence axis, keeps every stride-th step
#[derive(Debug, Clone)]
pub struct SequentialStride {
    stride: usize,
}

impl SequentialStride {
    /// New sequence downsampler
    pub fn new(stride: usize) -> Result<SequentialStride, SynapseError> {
        if stride < 1 {
            return Err(SynapseError::ShapeError(format!(
                "Stride must be at least 1, got {stride}"
            )));
        }
        Ok(SequentialStride { stride })
    }

    /// Forward function for sequence striding.
    /// Input [batch, time, features], output
    /// [batch, ceil(time / stride), features].
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, SynapseError> {
        check_sequence(x)?;
        x.stride_axis(1, self.stride)
    }
}
