use crate::dtype::DType;

/// Scalar trait is implemented for all [dtypes](DType)
pub trait Scalar: Clone + Copy + Sized + Send + Sync + core::fmt::Debug + core::fmt::Display + 'static {
    /// From f32
    fn from_f32(t: f32) -> Self;
    /// From i32
    fn from_i32(t: i32) -> Self;
    /// From little endian bytes
    fn from_le_bytes(bytes: &[u8]) -> Self;
    /// Into little endian bytes
    fn to_le_bytes(self) -> [u8; 4];
    /// Get dtype of Self
    fn dtype() -> DType;
    /// Get zero of Self
    fn zero() -> Self;
    /// Get one of Self
    fn one() -> Self;
    /// Convert self into f32
    fn into_f32(self) -> f32;
    /// Convert self into i32
    fn into_i32(self) -> i32;
    /// Neg
    fn neg(self) -> Self;
    /// ReLU
    fn relu(self) -> Self;
    /// Sin
    fn sin(self) -> Self;
    /// Cos
    fn cos(self) -> Self;
    /// Ln
    fn ln(self) -> Self;
    /// Exp
    fn exp(self) -> Self;
    /// Tanh
    fn tanh(self) -> Self;
    /// Square root of this scalar.
    fn sqrt(self) -> Self;
    /// Add
    fn add(self, rhs: Self) -> Self;
    /// Sub
    fn sub(self, rhs: Self) -> Self;
    /// Mul
    fn mul(self, rhs: Self) -> Self;
    /// Div
    fn div(self, rhs: Self) -> Self;
    /// Pow
    fn pow(self, rhs: Self) -> Self;
    /// Compare less than, 1 if true else 0
    fn cmplt(self, rhs: Self) -> Self;
    /// Compare equal, 1 if true else 0
    fn cmpeq(self, rhs: Self) -> Self;
    /// Max of two numbers
    fn max(self, rhs: Self) -> Self;
    /// Min value of this dtype
    fn min_value() -> Self;
    /// Very small value of scalar, very close to zero
    fn epsilon() -> Self;
    /// Comparison for scalars,
    /// if they are floats, this checks for diffs > Self::epsilon()
    fn is_equal(self, rhs: Self) -> bool;
}

impl Scalar for f32 {
    fn from_f32(t: f32) -> Self {
        t
    }

    fn from_i32(t: i32) -> Self {
        t as f32
    }

    fn from_le_bytes(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn to_le_bytes(self) -> [u8; 4] {
        f32::to_le_bytes(self)
    }

    fn dtype() -> DType {
        DType::F32
    }

    fn zero() -> Self {
        0.
    }

    fn one() -> Self {
        1.
    }

    fn into_f32(self) -> f32 {
        self
    }

    fn into_i32(self) -> i32 {
        self as i32
    }

    fn neg(self) -> Self {
        -self
    }

    fn relu(self) -> Self {
        self.max(0.)
    }

    fn sin(self) -> Self {
        f32::sin(self)
    }

    fn cos(self) -> Self {
        f32::cos(self)
    }

    fn ln(self) -> Self {
        f32::ln(self)
    }

    fn exp(self) -> Self {
        f32::exp(self)
    }

    fn tanh(self) -> Self {
        f32::tanh(self)
    }

    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }

    fn add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn sub(self, rhs: Self) -> Self {
        self - rhs
    }

    fn mul(self, rhs: Self) -> Self {
        self * rhs
    }

    fn div(self, rhs: Self) -> Self {
        self / rhs
    }

    fn pow(self, rhs: Self) -> Self {
        f32::powf(self, rhs)
    }

    fn cmplt(self, rhs: Self) -> Self {
        if self < rhs {
            1.
        } else {
            0.
        }
    }

    fn cmpeq(self, rhs: Self) -> Self {
        if self == rhs {
            1.
        } else {
            0.
        }
    }

    fn max(self, rhs: Self) -> Self {
        f32::max(self, rhs)
    }

    fn min_value() -> Self {
        f32::MIN
    }

    fn epsilon() -> Self {
        0.00001
    }

    fn is_equal(self, rhs: Self) -> bool {
        (self.is_nan() && rhs.is_nan()) || (self - rhs).abs() <= Self::epsilon()
    }
}

impl Scalar for i32 {
    fn from_f32(t: f32) -> Self {
        t as i32
    }

    fn from_i32(t: i32) -> Self {
        t
    }

    fn from_le_bytes(bytes: &[u8]) -> Self {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn to_le_bytes(self) -> [u8; 4] {
        i32::to_le_bytes(self)
    }

    fn dtype() -> DType {
        DType::I32
    }

    fn zero() -> Self {
        0
    }

    fn one() -> Self {
        1
    }

    fn into_f32(self) -> f32 {
        self as f32
    }

    fn into_i32(self) -> i32 {
        self
    }

    fn neg(self) -> Self {
        -self
    }

    fn relu(self) -> Self {
        Ord::max(self, 0)
    }

    fn sin(self) -> Self {
        (self as f32).sin() as i32
    }

    fn cos(self) -> Self {
        (self as f32).cos() as i32
    }

    fn ln(self) -> Self {
        (self as f32).ln() as i32
    }

    fn exp(self) -> Self {
        (self as f32).exp() as i32
    }

    fn tanh(self) -> Self {
        (self as f32).tanh() as i32
    }

    fn sqrt(self) -> Self {
        (self as f32).sqrt() as i32
    }

    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }

    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }

    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }

    fn div(self, rhs: Self) -> Self {
        self / rhs
    }

    fn pow(self, rhs: Self) -> Self {
        (self as f32).powf(rhs as f32) as i32
    }

    fn cmplt(self, rhs: Self) -> Self {
        i32::from(self < rhs)
    }

    fn cmpeq(self, rhs: Self) -> Self {
        i32::from(self == rhs)
    }

    fn max(self, rhs: Self) -> Self {
        Ord::max(self, rhs)
    }

    fn min_value() -> Self {
        i32::MIN
    }

    fn epsilon() -> Self {
        0
    }

    fn is_equal(self, rhs: Self) -> bool {
        self == rhs
    }
}
