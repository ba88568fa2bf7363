use core::ffi::c_int;
use core::fmt;
use tcrypto_sys::Status;

/// An error number reported by [`secure_memset`].
///
/// [`secure_memset`]: crate::secure_memset
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Errno(c_int);

impl Errno {
    /// Invalid argument, the destination was null.
    pub const EINVAL: Self = Self(22);
    /// Value too large, the requested length exceeded the destination.
    pub const EOVERFLOW: Self = Self(75);

    #[inline]
    pub(crate) const fn from_raw(raw: c_int) -> Self {
        Self(raw)
    }

    /// The raw error number.
    #[inline]
    pub const fn raw(self) -> c_int {
        self.0
    }
}

impl fmt::Display for Errno {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EINVAL => f.write_str("EINVAL"),
            Self::EOVERFLOW => f.write_str("EOVERFLOW"),
            Self(raw) => write!(f, "Errno({raw})")
        }
    }
}

std! { impl std::error::Error for Errno {} }

/// The coarse outcome of [`read_random`].
///
/// Provider statuses are collapsed into these three buckets so callers never depend on provider
/// specifics, see [`coarsen`] for the exact mapping.
///
/// [`read_random`]: crate::read_random
/// [`coarsen`]: crate::random::coarsen
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RandError {
    /// The output was empty or null, or the provider rejected an argument.
    InvalidParameter,
    /// A context could not be allocated.
    OutOfMemory,
    /// Any other provider failure.
    Unexpected,
}

impl RandError {
    /// The enclave status code for this error.
    pub const fn code(self) -> u32 {
        match self {
            Self::Unexpected => 0x0001,
            Self::InvalidParameter => 0x0002,
            Self::OutOfMemory => 0x0003,
        }
    }
}

impl fmt::Display for RandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter => f.write_str("RandError::InvalidParameter"),
            Self::OutOfMemory => f.write_str("RandError::OutOfMemory"),
            Self::Unexpected => f.write_str("RandError::Unexpected")
        }
    }
}

std! { impl std::error::Error for RandError {} }

impl From<RandError> for Status {
    /// A representative provider status for the bucket.
    fn from(value: RandError) -> Self {
        match value {
            RandError::InvalidParameter => Self::BAD_ARG,
            RandError::OutOfMemory => Self::NO_MEM,
            RandError::Unexpected => Self::ERR
        }
    }
}

/// Errors from an [`EntropySource`].
///
/// [`EntropySource`]: crate::EntropySource
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntropyError {
    /// The system entropy source is unavailable or failed to produce data.
    EntropyNotAvailable,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EntropyNotAvailable")
    }
}

std! { impl std::error::Error for EntropyError {} }
