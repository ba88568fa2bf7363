//! Opaque Provider Contexts and Hardening Primitives
//!
//! The layer underneath an enclave's crypto API: it sizes, allocates, initializes and securely
//! releases the opaque contexts a multi-precision arithmetic provider works on, bridges the
//! provider's randomness callback to the operating system's entropy source, and supplies the two
//! primitives every secret-handling path leans on, a wipe the optimizer cannot remove
//! ([`secure_memset`]) and a constant-time comparison ([`consttime_memequal`]).
//!
//! Provider specifics live in [`tcrypto_sys`]. Every factory here is generic over the provider
//! and defaults to [`Soft`], the pure-Rust reference provider.
//!
//! # Example
//!
//! ```
//! use tcrypto_common::{bignum::BigNum, read_random, ct_eq};
//!
//! let n: BigNum = BigNum::with_words(&[0x0403_0201]).unwrap();
//! let mut out = [0u32; 1];
//! n.words_into(&mut out).unwrap();
//! assert_eq!(out, [0x0403_0201]);
//! n.secure_free(4);
//!
//! let mut a = [0u8; 32];
//! let mut b = [0u8; 32];
//! read_random(&mut a).unwrap();
//! read_random(&mut b).unwrap();
//! assert!(!ct_eq(a, b));
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(
    clippy::pedantic,
    clippy::nursery,
    clippy::all
)]
// lengths handed to the provider are range checked before every cast.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::inline_always)]

extern crate alloc;

#[macro_use]
mod macros;

mod ctx;
mod error;
pub mod ct;
pub mod memset;
pub mod entropy;
pub mod bignum;
pub mod prime;
pub mod random;

pub use error::{Errno, EntropyError, RandError};
pub use ct::{consttime_memequal, ct_eq};
pub use memset::{memset_s, secure_memset, secure_zero};
pub use entropy::{drng_generate, EntropySource, SystemEntropySource};
pub use bignum::{bignum_new, bignum_secure_free, BigNum};
pub use prime::{prime_new, PrimeGen};
pub use random::read_random;

std! {
    pub use memset::{clear_errno, last_errno};
}

pub use tcrypto_sys::{
    BigNumProvider, BitSupplier, PrimeProvider, PrngProvider, Sign, Soft, Status, Word, WORD_SIZE
};

use core::ffi::c_int;

/// Validate a caller-supplied big number size, returning it in words.
///
/// The size must be positive and a whole number of words.
#[inline]
pub(crate) const fn checked_words(size_in_bytes: c_int) -> Result<usize, Status> {
    if size_in_bytes <= 0 || (size_in_bytes as usize) % WORD_SIZE != 0 {
        Err(Status::BAD_ARG)
    } else {
        Ok(size_in_bytes as usize / WORD_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_validation() {
        assert_eq!(checked_words(0), Err(Status::BAD_ARG));
        assert_eq!(checked_words(-4), Err(Status::BAD_ARG));
        assert_eq!(checked_words(3), Err(Status::BAD_ARG));
        assert_eq!(checked_words(4), Ok(1));
        assert_eq!(checked_words(64), Ok(16));
    }
}
