//! Bounded, Non-Elidable Memory Fill
//!
//! A plain fill right before a buffer is released is a dead store, and every serious optimizer
//! removes it. The fill here is dispatched through a function pointer that is read with a
//! volatile load, so the compiler can neither inline the target nor prove that the store is
//! unobserved.
use core::ffi::c_int;
use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};
use crate::error::Errno;

type FillFn = unsafe fn(*mut u8, u8, usize);

/// # Safety
///
/// `dst` must be valid for writes of `len` bytes.
unsafe fn fill(dst: *mut u8, byte: u8, len: usize) {
    ptr::write_bytes(dst, byte, len);
}

// Written once at compile time, only ever read through `read_volatile`.
static FILL: FillFn = fill;

/// # Safety
///
/// `dst` must be valid for writes of `len` bytes.
#[inline(never)]
unsafe fn volatile_fill(dst: *mut u8, byte: u8, len: usize) {
    let fill = ptr::read_volatile(ptr::addr_of!(FILL));
    fill(dst, byte, len);
    compiler_fence(Ordering::SeqCst);
}

std! {
    std::thread_local! {
        static LAST_ERRNO: core::cell::Cell<c_int> = const { core::cell::Cell::new(0) };
    }

    /// The error number recorded by the most recent failing [`memset_s`] on this thread.
    ///
    /// Successful calls do not reset the indicator, see [`clear_errno`].
    pub fn last_errno() -> Option<Errno> {
        match LAST_ERRNO.with(core::cell::Cell::get) {
            0 => None,
            raw => Some(Errno::from_raw(raw))
        }
    }

    /// Reset this thread's error indicator.
    pub fn clear_errno() {
        LAST_ERRNO.with(|errno| errno.set(0));
    }
}

#[inline]
fn record(errno: Errno) -> c_int {
    #[cfg(feature = "std")]
    LAST_ERRNO.with(|cell| cell.set(errno.raw()));

    errno.raw()
}

/// Write `n` bytes of value `c` at `s`, never more than `smax`.
///
/// `c` is converted to a byte by truncation, as C's `memset_s` does.
///
/// # Returns
///
/// * `0` on success.
/// * `EINVAL` if `s` is null, nothing is written.
/// * `EOVERFLOW` if `n > smax`. `smax` bytes are still written.
///
/// With the `std` feature a non-zero return is also stored in the thread-local indicator read by
/// [`last_errno`].
///
/// # Safety
///
/// If `s` is non-null it must be valid for writes of `smax` bytes.
pub unsafe fn memset_s(s: *mut u8, smax: usize, c: c_int, n: usize) -> c_int {
    if s.is_null() {
        return record(Errno::EINVAL);
    }

    let (n, res) = if n > smax {
        (smax, Err(Errno::EOVERFLOW))
    } else {
        (n, Ok(()))
    };

    volatile_fill(s, c as u8, n);

    match res {
        Ok(()) => 0,
        Err(errno) => record(errno)
    }
}

/// Fill the first `n` bytes of `dest` with `c`, in a way the optimizer will not remove.
///
/// The length of `dest` plays the role of `smax`.
///
/// # Errors
///
/// [`Errno::EOVERFLOW`] if `n > dest.len()`. The whole of `dest` is still filled before the error
/// is returned, so a caller mis-sizing a secret still gets it cleared.
///
/// # Example
///
/// ```
/// use tcrypto_common::{secure_memset, Errno};
///
/// let mut buf = [0u8; 16];
/// assert_eq!(secure_memset(&mut buf, 0xAA, 20), Err(Errno::EOVERFLOW));
/// assert_eq!(buf, [0xAA; 16]);
/// ```
pub fn secure_memset(dest: &mut [u8], c: u8, n: usize) -> Result<(), Errno> {
    let smax = dest.len();
    // SAFETY: a slice pointer is never null and valid for writes of its length.
    match unsafe { memset_s(dest.as_mut_ptr(), smax, c_int::from(c), n) } {
        0 => Ok(()),
        raw => Err(Errno::from_raw(raw))
    }
}

/// Zero all of `dest`, in a way the optimizer will not remove.
#[inline]
pub fn secure_zero(dest: &mut [u8]) {
    let len = dest.len();
    // SAFETY: a slice pointer is never null and valid for writes of its length.
    unsafe { volatile_fill(dest.as_mut_ptr(), 0, len) }
}
