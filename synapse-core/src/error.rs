/// Error returned by tensor operations
#[derive(Debug)]
pub enum SynapseError {
    /// Shapes of tensors are incompatible with the operation
    ShapeError(String),
    /// DTypes of tensors are incompatible with the operation
    DTypeError(String),
    /// Error parsing some data
    ParseError(String),
    /// File system errors
    IoError(std::io::Error),
}

impl core::fmt::Display for SynapseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ShapeError(err) => f.write_fmt(format_args!("{err}")),
            Self::DTypeError(err) => f.write_fmt(format_args!("{err}")),
            Self::ParseError(err) => f.write_fmt(format_args!("{err}")),
            Self::IoError(err) => f.write_fmt(format_args!("{err}")),
        }
    }
}

impl std::error::Error for SynapseError {}

impl From<std::io::Error> for SynapseError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err)
    }
}
