//! synapse-core is a small eager tensor engine.
//!
//! It provides the [Tensor] type with elementwise, movement, reduce
//! and matmul operations over f32 and i32 buffers, broadcasting,
//! and safetensors style serialization. It is the substrate for the
//! layer factories in synapse-nn and deliberately stays forward only,
//! there is no autograd and no accelerator backends.
//!
//! ```rust
//! use synapse_core::Tensor;
//! # fn main() -> Result<(), synapse_core::SynapseError> {
//! let x = Tensor::from([[1f32, 2., 3.], [4., 5., 6.]]);
//! let w = Tensor::from([[1f32, 0.], [0., 1.], [1., 1.]]);
//! let y = x.dot(&w)?;
//! assert_eq!(y, [[4f32, 5.], [10., 11.]]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod axes;
mod dtype;
mod error;
pub mod io;
mod kernel;
mod scalar;
mod shape;
mod tensor;

pub use axes::{Axes, IntoAxes};
pub use dtype::DType;
pub use error::SynapseError;
pub use scalar::Scalar;
pub use shape::Shape;
pub use tensor::Tensor;
