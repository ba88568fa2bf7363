//! Provider Contract for `tcrypto`
//!
//! The helpers in `tcrypto-common` never look inside a provider context. They ask the provider
//! how many bytes a context needs, hand it a buffer of that size, and give the same buffer back
//! for every later call. This crate defines that contract: the provider's native [`Status`]
//! codes, the word type big numbers are expressed in, the [`BitSupplier`] callback shape, and
//! the [`BigNumProvider`], [`PrimeProvider`] and [`PrngProvider`] traits.
//!
//! [`Soft`] is a pure-Rust provider implementing all three traits, so the contract can be used
//! (and tested) without linking a vendor library.
#![cfg_attr(not(test), no_std)]
#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::all
)]
// contexts are at most a few kilobytes, every length is range checked before a cast.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod status;
pub mod soft;

pub use status::Status;
pub use soft::Soft;

use core::ffi::{c_int, c_void};

/// The unsigned word big number magnitudes are expressed in.
pub type Word = u32;

/// Size of a [`Word`] in bytes.
pub const WORD_SIZE: usize = core::mem::size_of::<Word>();

/// Largest big number the providers in this crate accept, in bits.
pub const MAX_BN_BITS: usize = 16384;

/// Largest big number the providers in this crate accept, in words.
pub const MAX_BN_WORDS: usize = MAX_BN_BITS / (WORD_SIZE * 8);

/// The sign of a big number.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Sign {
    Negative = 0,
    Positive = 1,
}

impl Sign {
    /// Decode the provider representation of a sign.
    ///
    /// # Errors
    ///
    /// Anything other than `0` or `1` is not a sign, [`Status::CONTEXT_MATCH`] is returned as the
    /// value could only have come from a corrupted context.
    pub const fn from_u32(raw: u32) -> Result<Self, Status> {
        match raw {
            0 => Ok(Self::Negative),
            1 => Ok(Self::Positive),
            _ => Err(Status::CONTEXT_MATCH)
        }
    }
}

/// The provider's randomness callback.
///
/// A bit supplier fills `rand` with `n_bits` random bits. The third argument is an opaque
/// parameter threaded through from whoever registered the supplier; the provider never inspects
/// it. A `None` output is how a null pointer is expressed.
pub type BitSupplier = fn(rand: Option<&mut [Word]>, n_bits: c_int, param: *mut c_void) -> Status;

/// Multi-precision integer contexts.
pub trait BigNumProvider {
    /// The number of bytes a context holding `len` words requires.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `len` is outside the range the provider supports.
    fn big_num_get_size(len: c_int) -> Result<usize, Status>;

    /// Initialize `ctx` in place for numbers of up to `len` words. The value is zero.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] for an unsupported `len`, [`Status::SIZE`] if `ctx` is smaller than
    /// [`big_num_get_size`] reported.
    ///
    /// [`big_num_get_size`]: BigNumProvider::big_num_get_size
    fn big_num_init(len: c_int, ctx: &mut [u8]) -> Result<(), Status>;

    /// Load `words` (least significant word first) with `sign` into `ctx`.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `words` is empty, [`Status::SIZE`] if the magnitude does not fit the
    /// context, [`Status::CONTEXT_MATCH`] if `ctx` is not a big number context.
    fn set_bn(sign: Sign, words: &[Word], ctx: &mut [u8]) -> Result<(), Status>;

    /// Export the value held in `ctx` into `out`, returning its sign and length in words.
    ///
    /// # Errors
    ///
    /// [`Status::SIZE`] if `out` cannot hold the value, [`Status::CONTEXT_MATCH`] if `ctx` is not
    /// a big number context.
    fn get_bn(ctx: &[u8], out: &mut [Word]) -> Result<(Sign, usize), Status>;

    /// Replace the value in `ctx` with a positive `n_bits` wide random number drawn from
    /// `supplier`.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `n_bits` is not in `1..=capacity`, otherwise whatever the supplier
    /// reports.
    fn prng_bn(
        ctx: &mut [u8],
        n_bits: c_int,
        supplier: BitSupplier,
        param: *mut c_void
    ) -> Result<(), Status>;
}

/// Prime generator contexts.
pub trait PrimeProvider {
    /// The number of bytes a prime generator for primes of up to `max_bits` requires.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `max_bits` is outside the supported range.
    fn prime_get_size(max_bits: c_int) -> Result<usize, Status>;

    /// Initialize `ctx` in place.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] for an unsupported `max_bits`, [`Status::SIZE`] if `ctx` is too small.
    fn prime_init(max_bits: c_int, ctx: &mut [u8]) -> Result<(), Status>;

    /// The `max_bits` the context was initialized with.
    ///
    /// # Errors
    ///
    /// [`Status::CONTEXT_MATCH`] if `ctx` is not a prime generator context.
    fn prime_max_bits(ctx: &[u8]) -> Result<c_int, Status>;
}

/// Pseudo random number generator contexts.
pub trait PrngProvider {
    /// The number of bytes a generator context requires.
    ///
    /// # Errors
    ///
    /// Implementations with a fixed context size never fail.
    fn prng_get_size() -> Result<usize, Status>;

    /// Initialize and seed `ctx` in place, using a seed of `seed_bits` bits.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] for an unsupported seed width, [`Status::SIZE`] if `ctx` is too small,
    /// [`Status::ERR`] if seeding failed.
    fn prng_init(seed_bits: c_int, ctx: &mut [u8]) -> Result<(), Status>;

    /// Write `n_bits` pseudo random bits into `out`.
    ///
    /// # Errors
    ///
    /// [`Status::LENGTH`] if `n_bits < 1`, [`Status::SIZE`] if `out` is too short,
    /// [`Status::CONTEXT_MATCH`] if `ctx` is not a generator context.
    fn prng_gen(out: &mut [u8], n_bits: c_int, ctx: &mut [u8]) -> Result<(), Status>;
}

#[inline]
#[must_use]
pub(crate) const fn words_for_bits(bits: usize) -> usize {
    (bits + (WORD_SIZE * 8) - 1) / (WORD_SIZE * 8)
}


#[cfg(kani)]
mod verify {
    use super::*;
    use kani::proof;

    #[proof]
    fn check_words_for_bits() {
        let bits: usize = kani::any();
        kani::assume(bits <= MAX_BN_BITS);

        let words = words_for_bits(bits);
        kani::assert(words * WORD_SIZE * 8 >= bits, "enough words for every bit");
        kani::assert(words == 0 || (words - 1) * WORD_SIZE * 8 < bits, "no spare word");
    }
}
