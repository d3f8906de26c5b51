//! Helpers for sequence layers. Windowed operations over the sequence
//! axis are emulated by materializing shifted copies of the input.

use synapse_core::{SynapseError, Tensor};

/// Check that x is a sequence tensor [batch, time, features]
pub(crate) fn check_sequence(x: &Tensor) -> Result<(), SynapseError> {
    if x.rank() != 3 {
        return Err(SynapseError::ShapeError(format!(
            "Expected sequence input of shape [batch, time, features], got shape {}",
            x.shape()
        )));
    }
    Ok(())
}

/// Shift x along the sequence axis, keeping its length and filling with
/// zeros. Positive offset looks back (value from offset steps in the
/// past), negative offset looks forward.
pub(crate) fn shift_time(x: &Tensor, offset: i64) -> Result<Tensor, SynapseError> {
    if offset == 0 {
        return Ok(x.clone());
    }
    x.pad([(0, 0), (offset, -offset)])
}

/// Causal window over the sequence axis: concatenation of the window
/// previous steps (oldest first, current step last) on the feature axis.
/// Output shape [batch, time, window * features].
pub(crate) fn causal_windows(x: &Tensor, window: usize) -> Result<Tensor, SynapseError> {
    check_sequence(x)?;
    if window < 1 {
        return Err(SynapseError::ShapeError(
            "Window must be at least 1".into(),
        ));
    }
    if window == 1 {
        return Ok(x.clone());
    }
    let shifts = (0..window)
        .map(|i| shift_time(x, (window - 1 - i) as i64))
        .collect::<Result<Vec<Tensor>, SynapseError>>()?;
    Tensor::cat(&shifts, -1)
}
