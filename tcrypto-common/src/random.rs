//! Reading Random Bytes through the Provider PRNG
//!
//! Every call builds a fresh generator context, seeds it, draws the requested bytes and wipes the
//! context again. Nothing is cached between calls, so there is no shared state to synchronize and
//! no generator state outliving the call that used it.
use core::ffi::c_int;
use tcrypto_sys::{PrngProvider, Soft, Status};
use crate::ctx::OpaqueCtx;
use crate::error::RandError;

/// Collapse a provider status into the coarse [`RandError`] taxonomy.
///
/// | Status                                                  | Result                          |
/// |---------------------------------------------------------|---------------------------------|
/// | `NO_ERR`                                                | `Ok(())`                        |
/// | `NO_MEM`, `MEM_ALLOC`                                   | [`RandError::OutOfMemory`]      |
/// | `NULL_PTR`, `LENGTH`, `OUT_OF_RANGE`, `SIZE`, `BAD_ARG` | [`RandError::InvalidParameter`] |
/// | anything else                                           | [`RandError::Unexpected`]       |
///
/// # Errors
///
/// Any status other than [`Status::NO_ERR`], mapped per the table above.
pub const fn coarsen(status: Status) -> Result<(), RandError> {
    match status {
        Status::NO_ERR => Ok(()),
        Status::NO_MEM | Status::MEM_ALLOC => Err(RandError::OutOfMemory),
        Status::NULL_PTR
            | Status::LENGTH
            | Status::OUT_OF_RANGE
            | Status::SIZE
            | Status::BAD_ARG => Err(RandError::InvalidParameter),
        _ => Err(RandError::Unexpected)
    }
}

fn generate<P: PrngProvider>(out: &mut [u8]) -> Result<(), Status> {
    let n_bits = c_int::try_from(out.len())
        .ok()
        .and_then(|len| len.checked_mul(8))
        .ok_or(Status::LENGTH)?;

    let len = P::prng_get_size()?;
    let mut ctx = OpaqueCtx::alloc(len).map_err(|_| {
        log::debug!("failed to allocate a {len} byte generator context");
        Status::NO_MEM
    })?;

    P::prng_init(n_bits, ctx.as_bytes_mut())?;
    P::prng_gen(out, n_bits, ctx.as_bytes_mut())

    // `ctx` is wiped and released here on every path.
}

/// Fill `out` with random bytes from the [`Soft`] provider's generator.
///
/// # Errors
///
/// - [`RandError::InvalidParameter`]: `out` is empty, or too long to express in bits.
/// - [`RandError::OutOfMemory`]: the generator context could not be allocated.
/// - [`RandError::Unexpected`]: seeding or generation failed.
///
/// # Example
///
/// ```
/// use tcrypto_common::{read_random, RandError};
///
/// let mut key = [0u8; 32];
/// read_random(&mut key).unwrap();
///
/// assert_eq!(read_random(&mut []), Err(RandError::InvalidParameter));
/// ```
#[inline]
pub fn read_random(out: &mut [u8]) -> Result<(), RandError> {
    read_random_with::<Soft>(out)
}

/// [`read_random`] over an arbitrary [`PrngProvider`].
///
/// # Errors
///
/// See [`read_random`] and [`coarsen`].
pub fn read_random_with<P: PrngProvider>(out: &mut [u8]) -> Result<(), RandError> {
    if out.is_empty() { return Err(RandError::InvalidParameter) }

    generate::<P>(out).or_else(|status| {
        log::debug!("read_random of {} bytes failed: {status}", out.len());
        coarsen(status)
    })
}

/// [`read_random`] for a raw output pointer.
///
/// # Errors
///
/// [`RandError::InvalidParameter`] if `out` is null or `len` is zero, otherwise see
/// [`read_random`].
///
/// # Safety
///
/// If `out` is non-null it must be valid for writes of `len` bytes, and not be accessed through
/// any other pointer for the duration of the call.
pub unsafe fn read_random_raw(out: *mut u8, len: usize) -> Result<(), RandError> {
    if out.is_null() || len == 0 { return Err(RandError::InvalidParameter) }
    read_random(core::slice::from_raw_parts_mut(out, len))
}
