//! Big Number Contexts
//!
//! A [`BigNum`] owns an opaque big number context sized and initialized by a
//! [`BigNumProvider`]. Construction follows the provider protocol exactly:
//!
//! ```text
//!   size query --> allocate --> init --> (preload) --> handle
//!        |             |          |           |
//!        +-------------+----------+-----------+--> error, nothing escapes
//! ```
//!
//! The context buffer is owned from the moment it is allocated, so every failure after the
//! allocation releases it on the way out, and a handle only exists once every step succeeded.
//! Releasing a handle, whether through [`BigNum::secure_free`] or by dropping it, wipes the full
//! context before the memory goes back to the allocator.
use core::ffi::{c_int, c_void};
use core::fmt;
use core::marker::PhantomData;
use tcrypto_sys::{BigNumProvider, BitSupplier, Sign, Soft, Status, Word, WORD_SIZE};
use zeroize::ZeroizeOnDrop;
use crate::checked_words;
use crate::ctx::OpaqueCtx;
use crate::entropy::drng_generate;

/// A big number of a fixed word width, held in a provider-owned context.
///
/// # Generic `P`
///
/// The provider which sizes and interprets the context, [`Soft`] by default.
///
/// # Example
///
/// ```
/// use tcrypto_common::{bignum::BigNum, Sign};
///
/// // 0x0000000a_00000001, least significant word first.
/// let n: BigNum = BigNum::new(Some(&[1, 10]), 8).unwrap();
/// assert_eq!(n.word_len(), 2);
///
/// let mut out = [0u32; 2];
/// assert_eq!(n.words_into(&mut out), Ok((Sign::Positive, 2)));
/// assert_eq!(out, [1, 10]);
///
/// n.secure_free(8);
/// ```
pub struct BigNum<P: BigNumProvider = Soft> {
    ctx: OpaqueCtx,
    words: usize,
    _provider: PhantomData<fn() -> P>,
}

#[inline]
fn failed(step: &'static str) -> impl Fn(Status) -> Status {
    move |status| {
        log::debug!("big number construction failed at {step}: {status}");
        status
    }
}

impl<P: BigNumProvider> BigNum<P> {
    /// Create a big number context for `size_in_bytes / WORD_SIZE` words.
    ///
    /// # Arguments
    ///
    /// * `data` - Optional magnitude to preload, least significant word first. The value is
    ///   loaded as positive. Exactly `size_in_bytes / WORD_SIZE` words are read.
    /// * `size_in_bytes` - The width of the number in bytes.
    ///
    /// # Errors
    ///
    /// - [`Status::BAD_ARG`]: `size_in_bytes` is not positive, not a multiple of [`WORD_SIZE`],
    ///   or `data` holds fewer words than that.
    /// - [`Status::MEM_ALLOC`]: the context could not be allocated.
    /// - Any status the provider returned from its size query, init or preload.
    pub fn new(data: Option<&[Word]>, size_in_bytes: c_int) -> Result<Self, Status> {
        let words = checked_words(size_in_bytes).map_err(failed("argument validation"))?;
        let data = data
            .map(|data| data.get(..words).ok_or(Status::BAD_ARG))
            .transpose()
            .map_err(failed("preload"))?;
        let len = words as c_int;

        let ctx_len = P::big_num_get_size(len).map_err(failed("size query"))?;
        let mut ctx = OpaqueCtx::alloc(ctx_len).map_err(failed("allocation"))?;

        P::big_num_init(len, ctx.as_bytes_mut()).map_err(failed("init"))?;

        if let Some(data) = data {
            P::set_bn(Sign::Positive, data, ctx.as_bytes_mut()).map_err(failed("preload"))?;
        }

        Ok(Self { ctx, words, _provider: PhantomData })
    }

    /// Create a big number holding `words`, sized to exactly `words.len()` words.
    ///
    /// # Errors
    ///
    /// See [`new`]. An empty `words` is [`Status::BAD_ARG`].
    ///
    /// [`new`]: Self::new
    pub fn with_words(words: &[Word]) -> Result<Self, Status> {
        let size_in_bytes = words.len()
            .checked_mul(WORD_SIZE)
            .and_then(|size| c_int::try_from(size).ok())
            .ok_or(Status::BAD_ARG)?;

        Self::new(Some(words), size_in_bytes)
    }

    /// The width of the number in words.
    #[inline]
    pub const fn word_len(&self) -> usize {
        self.words
    }

    /// The width of the number in bytes, the `size_in_bytes` it was created with.
    #[inline]
    pub const fn size_in_bytes(&self) -> usize {
        self.words * WORD_SIZE
    }

    /// The size of the provider context in bytes.
    #[inline]
    pub const fn ctx_len(&self) -> usize {
        self.ctx.len()
    }

    /// Export the value into `out`, least significant word first.
    ///
    /// # Returns
    ///
    /// The sign and the number of significant words written.
    ///
    /// # Errors
    ///
    /// [`Status::SIZE`] if `out` is shorter than the value, or whatever the provider reports.
    #[inline]
    pub fn words_into(&self, out: &mut [Word]) -> Result<(Sign, usize), Status> {
        P::get_bn(self.ctx.as_bytes(), out)
    }

    /// Replace the value with `words` and `sign`.
    ///
    /// # Errors
    ///
    /// [`Status::SIZE`] if the magnitude does not fit, or whatever the provider reports.
    #[inline]
    pub fn set_words(&mut self, sign: Sign, words: &[Word]) -> Result<(), Status> {
        P::set_bn(sign, words, self.ctx.as_bytes_mut())
    }

    /// Replace the value with an `n_bits` wide random number from the system entropy source.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `n_bits` is not in `1..=word_len() * 32`, [`Status::ERR`] if the
    /// entropy source failed.
    #[inline]
    pub fn randomize(&mut self, n_bits: c_int) -> Result<(), Status> {
        self.randomize_with(n_bits, drng_generate, core::ptr::null_mut())
    }

    /// Replace the value with an `n_bits` wide random number drawn from `supplier`.
    ///
    /// `param` is handed to `supplier` untouched.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] for an unsupported `n_bits`, or whatever `supplier` reports.
    #[inline]
    pub fn randomize_with(
        &mut self,
        n_bits: c_int,
        supplier: BitSupplier,
        param: *mut c_void
    ) -> Result<(), Status> {
        P::prng_bn(self.ctx.as_bytes_mut(), n_bits, supplier, param)
    }

    /// Wipe the context and release it.
    ///
    /// `size_in_bytes` must be the size the number was created with. The context length is
    /// re-derived from it through the provider and compared with the allocation. The full
    /// allocation is wiped either way; a caller that lost track of the size is logged, not
    /// rewarded with an unwiped release.
    pub fn secure_free(self, size_in_bytes: c_int) {
        match checked_words(size_in_bytes).and_then(|words| P::big_num_get_size(words as c_int)) {
            Ok(len) if len == self.ctx.len() => {}
            Ok(len) => log::warn!(
                "secure_free: size {size_in_bytes} derives a {len} byte context, the context is \
                 {} bytes, wiping all of it",
                self.ctx.len()
            ),
            Err(status) => log::warn!(
                "secure_free: invalid size {size_in_bytes} ({status}), wiping the full {} byte \
                 context",
                self.ctx.len()
            )
        }

        // `OpaqueCtx` wipes its full length on drop.
        drop(self);
    }
}

can_panic! {
    impl<P: BigNumProvider> BigNum<P> {
        /// Export the value as a vector of its significant words.
        ///
        /// # Panics
        ///
        /// If the provider fails to export a context it initialized itself.
        #[track_caller]
        pub fn to_words(&self) -> alloc::vec::Vec<Word> {
            let mut out = alloc::vec![0 as Word; self.words];
            match self.words_into(&mut out) {
                Ok((_, len)) => {
                    out.truncate(len);
                    out
                }
                Err(status) => panic!("Failed to export big number: {status}")
            }
        }
    }
}

impl<P: BigNumProvider> ZeroizeOnDrop for BigNum<P> {}

impl<P: BigNumProvider> fmt::Debug for BigNum<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigNum {{ words: {}, ctx_len: {} }}", self.words, self.ctx.len())
    }
}

/// Create a big number context, writing the handle to `out`.
///
/// The out-parameter form of [`BigNum::new`]: `out` is cleared before any step that can fail and
/// only written once construction succeeded.
///
/// # Returns
///
/// [`Status::NO_ERR`] on success, [`Status::BAD_ARG`] if `out` is `None`, otherwise the error
/// [`BigNum::new`] would return.
pub fn bignum_new<P: BigNumProvider>(
    data: Option<&[Word]>,
    size_in_bytes: c_int,
    out: Option<&mut Option<BigNum<P>>>
) -> Status {
    let Some(out) = out else { return Status::BAD_ARG };
    *out = None;

    match BigNum::new(data, size_in_bytes) {
        Ok(bn) => {
            *out = Some(bn);
            Status::NO_ERR
        }
        Err(status) => status
    }
}

/// Wipe and release a big number context. `None` is a no-op.
///
/// See [`BigNum::secure_free`].
#[inline]
pub fn bignum_secure_free<P: BigNumProvider>(handle: Option<BigNum<P>>, size_in_bytes: c_int) {
    if let Some(handle) = handle {
        handle.secure_free(size_in_bytes);
    }
}



#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec;

    proptest! {
        #[test]
        fn valid_sizes_construct(words in 1usize..=64) {
            let size = (words * WORD_SIZE) as c_int;
            let mut out = None;

            prop_assert_eq!(bignum_new::<Soft>(None, size, Some(&mut out)), Status::NO_ERR);
            prop_assert!(out.is_some());
            bignum_secure_free(out, size);
        }

        #[test]
        fn invalid_sizes_are_bad_args(size in any::<c_int>()) {
            prop_assume!(size <= 0 || size as usize % WORD_SIZE != 0);
            let mut out = Some(BigNum::<Soft>::new(None, 4).unwrap());

            prop_assert_eq!(bignum_new(None, size, Some(&mut out)), Status::BAD_ARG);
            prop_assert!(out.is_none());
        }

        #[test]
        fn preload_round_trips(words in proptest::collection::vec(any::<Word>(), 1..64)) {
            let n = BigNum::<Soft>::with_words(&words).unwrap();
            let mut out = vec![0 as Word; words.len()];
            let (sign, len) = n.words_into(&mut out).unwrap();

            let significant = words.iter().rposition(|w| *w != 0).map_or(1, |top| top + 1);
            prop_assert_eq!(sign, Sign::Positive);
            prop_assert_eq!(len, significant);
            prop_assert_eq!(&out[..len], &words[..len]);
            n.secure_free((words.len() * WORD_SIZE) as c_int);
        }
    }
}
