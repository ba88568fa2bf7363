//! System Entropy and the Provider Randomness Callback
//!
//! Providers ask for randomness through a [`BitSupplier`], a plain function filling a word array
//! with a number of bits. [`drng_generate`] is a bit supplier backed by the operating system's
//! entropy source, for when big number level randomness should come straight from the system
//! rather than from a user-seeded generator.
//!
//! [`BitSupplier`]: tcrypto_sys::BitSupplier
use core::ffi::{c_int, c_void};
use tcrypto_sys::{Status, Word, WORD_SIZE};
use crate::error::EntropyError;

/// A cryptographically secure source of random bytes.
pub trait EntropySource {
    /// Fill `dest` with random bytes.
    ///
    /// # Errors
    ///
    /// [`EntropyError::EntropyNotAvailable`] if the source failed to produce data.
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

/// The operating system's CSPRNG, via `getrandom`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemEntropySource;

impl EntropySource for SystemEntropySource {
    #[inline]
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), EntropyError> {
        getrandom::fill(dest).map_err(|_| EntropyError::EntropyNotAvailable)
    }
}

/// Fill `rand` with `n_bits` bits from the system entropy source.
///
/// This has the exact shape of [`BitSupplier`] so it can be handed to a provider. The opaque
/// `_ctx` parameter is only there for that shape and is never read.
///
/// Bytes are written in memory order, so on little-endian targets the first byte lands in the
/// least significant byte of `rand[0]`. Words past `n_bits / 8` bytes are left untouched.
///
/// # Returns
///
/// * [`Status::SIZE`]: `n_bits` is negative, not a multiple of 8, or larger than `rand` holds.
/// * [`Status::NULL_PTR`]: `rand` is `None`.
/// * [`Status::ERR`]: `n_bits` is zero, or the entropy source failed.
/// * [`Status::NO_ERR`]: otherwise.
///
/// # Example
///
/// ```
/// use tcrypto_common::{drng_generate, Status};
///
/// let mut words = [0u32; 8];
/// assert_eq!(drng_generate(Some(&mut words), 256, core::ptr::null_mut()), Status::NO_ERR);
/// assert_eq!(drng_generate(Some(&mut words), 12, core::ptr::null_mut()), Status::SIZE);
/// assert_eq!(drng_generate(None, 256, core::ptr::null_mut()), Status::NULL_PTR);
/// ```
///
/// [`BitSupplier`]: tcrypto_sys::BitSupplier
pub fn drng_generate(rand: Option<&mut [Word]>, n_bits: c_int, _ctx: *mut c_void) -> Status {
    drng_generate_with(&SystemEntropySource, rand, n_bits)
}

/// [`drng_generate`] over an arbitrary [`EntropySource`].
pub fn drng_generate_with<E>(source: &E, rand: Option<&mut [Word]>, n_bits: c_int) -> Status
    where E: EntropySource + ?Sized
{
    // must be byte aligned
    if n_bits < 0 || n_bits % 8 != 0 {
        return Status::SIZE;
    }

    let Some(rand) = rand else { return Status::NULL_PTR };

    let n_bytes = (n_bits / 8) as usize;
    // the system source rejects an empty request, which surfaces as a provider error.
    if n_bytes == 0 {
        log::error!("entropy source asked for zero bits");
        return Status::ERR;
    }

    let capacity = rand.len() * WORD_SIZE;
    if n_bytes > capacity {
        return Status::SIZE;
    }

    // SAFETY: `rand` is a live, exclusively borrowed slice of `capacity` bytes, and `u8` has no
    // alignment or validity requirements that a `Word` does not already satisfy.
    let bytes = unsafe {
        core::slice::from_raw_parts_mut(rand.as_mut_ptr().cast::<u8>(), capacity)
    };

    match source.fill_bytes(&mut bytes[..n_bytes]) {
        Ok(()) => Status::NO_ERR,
        Err(err) => {
            log::error!("entropy source failed while supplying {n_bits} bits: {err}");
            Status::ERR
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::test_utils::MockEntropySource;
    use tcrypto_sys::BitSupplier;

    const NULL: *mut c_void = core::ptr::null_mut();

    #[test]
    fn is_a_bit_supplier() {
        let supplier: BitSupplier = drng_generate;
        let mut words = [0 as Word; 4];
        assert_eq!(supplier(Some(&mut words), 128, NULL), Status::NO_ERR);
    }

    #[test]
    fn rejects_unaligned_bits_first() {
        // size is checked before the pointer, like the provider expects.
        assert_eq!(drng_generate(None, 7, NULL), Status::SIZE);
        assert_eq!(drng_generate(None, -8, NULL), Status::SIZE);
        assert_eq!(drng_generate(None, 8, NULL), Status::NULL_PTR);
    }

    #[test]
    fn rejects_more_bits_than_fit() {
        let mut words = [0 as Word; 2];
        assert_eq!(drng_generate(Some(&mut words), 72, NULL), Status::SIZE);
        assert_eq!(drng_generate(Some(&mut words), 64, NULL), Status::NO_ERR);
    }

    #[test]
    fn fills_only_requested_bytes() {
        let source = MockEntropySource::new(false);
        let mut words = [0 as Word; 2];

        assert_eq!(drng_generate_with(&source, Some(&mut words), 40), Status::NO_ERR);
        assert_eq!(words[0], 0xA5A5_A5A5);
        assert_eq!(words[1].to_ne_bytes(), [0xA5, 0, 0, 0]);
        assert_eq!(source.calls(), 1);
    }

    #[test]
    fn zero_bits_is_an_error() {
        let source = MockEntropySource::new(false);
        let mut words = [7 as Word; 1];

        assert_eq!(drng_generate_with(&source, Some(&mut words), 0), Status::ERR);
        assert_eq!(drng_generate(Some(&mut words), 0, NULL), Status::ERR);
        // the source is never consulted and the output is left alone.
        assert_eq!(source.calls(), 0);
        assert_eq!(words, [7]);

        // size and null checks still come first.
        assert_eq!(drng_generate(None, 0, NULL), Status::NULL_PTR);
    }

    #[test]
    fn source_failure_is_generic_error() {
        let source = MockEntropySource::new(true);
        let mut words = [0 as Word; 1];
        assert_eq!(drng_generate_with(&source, Some(&mut words), 32), Status::ERR);
    }

    #[test]
    fn system_source_produces_data() {
        let mut a = [0 as Word; 8];
        let mut b = [0 as Word; 8];
        assert_eq!(drng_generate(Some(&mut a), 256, NULL), Status::NO_ERR);
        assert_eq!(drng_generate(Some(&mut b), 256, NULL), Status::NO_ERR);
        assert_ne!(a, b);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn unaligned_bit_counts_are_size_errors(n_bits in any::<c_int>()) {
            prop_assume!(n_bits < 0 || n_bits % 8 != 0);
            let mut words = [0 as Word; 4];
            prop_assert_eq!(
                drng_generate(Some(&mut words), n_bits, core::ptr::null_mut()),
                Status::SIZE
            );
            prop_assert_eq!(drng_generate(None, n_bits, core::ptr::null_mut()), Status::SIZE);
        }
    }
}
