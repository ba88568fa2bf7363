use core::ffi::c_int;
use core::fmt;

/// A provider status code.
///
/// The set of codes is open: providers may return codes this crate has no name for, and callers
/// must treat unknown codes as opaque failures rather than reject them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Status(c_int);

impl Status {
    /// The operation succeeded.
    pub const NO_ERR: Self = Self(0);
    /// Unclassified provider failure.
    pub const ERR: Self = Self(-2);
    /// The provider ran out of memory internally.
    pub const NO_MEM: Self = Self(-4);
    /// An argument failed validation.
    pub const BAD_ARG: Self = Self(-5);
    /// A size argument is inconsistent with a buffer or context.
    pub const SIZE: Self = Self(-6);
    /// A required pointer was null.
    pub const NULL_PTR: Self = Self(-8);
    /// Allocating a context failed.
    pub const MEM_ALLOC: Self = Self(-9);
    /// A value is outside its permitted range.
    pub const OUT_OF_RANGE: Self = Self(-11);
    /// The context passed is not of the kind the operation expects.
    pub const CONTEXT_MATCH: Self = Self(-13);
    /// A length argument is outside the supported range.
    pub const LENGTH: Self = Self(-15);

    /// Wrap a raw status code.
    #[inline]
    pub const fn from_raw(raw: c_int) -> Self {
        Self(raw)
    }

    /// The raw status code.
    #[inline]
    pub const fn raw(self) -> c_int {
        self.0
    }

    /// `true` for [`Status::NO_ERR`].
    #[inline]
    pub const fn is_ok(self) -> bool {
        self.0 == Self::NO_ERR.0
    }

    /// `true` for anything but [`Status::NO_ERR`].
    #[inline]
    pub const fn is_err(self) -> bool {
        !self.is_ok()
    }

    /// Convert into a `Result`, `Ok(())` for [`Status::NO_ERR`].
    ///
    /// # Errors
    ///
    /// Returns `self` for every other status.
    #[inline]
    pub const fn into_result(self) -> Result<(), Self> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// Collapse a `Result` back into a status code.
    #[inline]
    pub fn from_result<T>(res: Result<T, Self>) -> Self {
        match res {
            Ok(_) => Self::NO_ERR,
            Err(status) => status
        }
    }

    const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "NoErr",
            -2 => "Err",
            -4 => "NoMemErr",
            -5 => "BadArgErr",
            -6 => "SizeErr",
            -8 => "NullPtrErr",
            -9 => "MemAllocErr",
            -11 => "OutOfRangeErr",
            -13 => "ContextMatchErr",
            -15 => "LengthErr",
            _ => return None
        })
    }
}

impl Default for Status {
    #[inline]
    fn default() -> Self {
        Self::NO_ERR
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "Status({})", self.0)
        }
    }
}

impl fmt::Debug for Status {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}
