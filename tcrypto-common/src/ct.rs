//! Constant-Time Comparison

use core::hint::black_box;

#[inline(always)]
fn volatile(byte: u8) -> u8 {
    unsafe { core::ptr::read_volatile(&byte) }
}

/// Map `0` to `1` and `[1, 256)` to `0` without a branch.
///
/// `!res` is not used as some compilers lower it to a branch on some targets. The accumulator
/// must be wider than eight bits so `0 - 1` borrows into bit 8.
#[inline(always)]
const fn fold(res: u32) -> u8 {
    (1 & (res.wrapping_sub(1) >> 8)) as u8
}

/// Compare the first `len` bytes of `b1` and `b2` in constant-time.
///
/// Every one of the `len` byte pairs is visited, there is no early exit. The running time depends
/// on `len` alone.
///
/// # Returns
///
/// * `1`: the first `len` bytes are equal (always the case for `len == 0`)
/// * `0`: otherwise
///
/// # Panics
///
/// If `len` is greater than the length of either slice. This check only depends on the lengths,
/// and happens before any byte is read.
///
/// # Example
///
/// ```
/// use tcrypto_common::consttime_memequal;
///
/// assert_eq!(consttime_memequal(b"abcd", b"abcd", 4), 1);
/// assert_eq!(consttime_memequal(b"abcd", b"abce", 4), 0);
/// assert_eq!(consttime_memequal(b"abcd", b"abce", 3), 1);
/// ```
#[must_use]
pub fn consttime_memequal(b1: &[u8], b2: &[u8], len: usize) -> u8 {
    let (b1, b2) = (&b1[..len], &b2[..len]);
    let mut res = 0u32;

    for (x, y) in b1.iter().zip(b2) {
        // the volatile read keeps LLVM from rewriting the accumulation into a compare and branch
        // once it notices only `res == 0` is observed.
        res |= u32::from(volatile(x ^ y));
    }

    fold(black_box(res))
}

/// Compare two slices in constant-time.
///
/// # Note
///
/// If the lengths of `a` and `b` differ this returns `false` immediately. Lengths are not
/// considered secret.
///
/// # Returns
///
/// `true` if `a == b`, `false` otherwise.
///
/// # Example
///
/// ```
/// use tcrypto_common::ct_eq;
///
/// assert!(ct_eq("hello", "hello"));
/// assert!(!ct_eq("hello", "hellO"));
/// assert!(!ct_eq("hello", "hello world"));
/// ```
#[must_use]
pub fn ct_eq<A: AsRef<[u8]>, B: AsRef<[u8]>>(a: A, b: B) -> bool {
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.len() != b.len() { return false }

    consttime_memequal(a, b, a.len()) == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_maps_zero_to_one() {
        assert_eq!(fold(0), 1);
        for res in 1..256 {
            assert_eq!(fold(res), 0, "fold({res}) must be 0");
        }
    }

    #[test]
    fn scenario_strings() {
        assert_eq!(consttime_memequal(b"abcd", b"abcd", 4), 1);
        assert_eq!(consttime_memequal(b"abcd", b"abce", 4), 0);
        assert_eq!(consttime_memequal(b"", b"", 0), 1);
    }

    #[test]
    fn every_position_is_checked() {
        let a = [0x5Au8; 33];
        for pos in 0..a.len() {
            let mut b = a;
            b[pos] ^= 0x80;
            assert_eq!(consttime_memequal(&a, &b, a.len()), 0, "difference at {pos} missed");
        }
    }

    #[test]
    fn only_prefix_is_compared() {
        assert_eq!(consttime_memequal(b"abcdX", b"abcdY", 4), 1);
        assert_eq!(consttime_memequal(b"abcd", b"abcdefgh", 4), 1);
    }

    #[test]
    #[should_panic]
    fn len_past_slice_panics() {
        let _ = consttime_memequal(b"abc", b"abcd", 4);
    }

    #[test]
    fn ct_eq_lengths() {
        assert!(ct_eq([0u8; 0], [0u8; 0]));
        assert!(!ct_eq([1u8], [0u8; 0]));
        assert!(ct_eq(b"same", b"same"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(10_000))]

        #[test]
        fn memequal_is_eq(
            a in proptest::collection::vec(any::<u8>(), 0..512),
            b in proptest::collection::vec(any::<u8>(), 0..512)
        ) {
            let len = a.len().min(b.len());
            let expected = a[..len] == b[..len];
            prop_assert_eq!(consttime_memequal(&a, &b, len) == 1, expected);
            prop_assert_eq!(ct_eq(&a, &b), a == b);
        }

        #[test]
        fn single_flip_is_detected(
            a in proptest::collection::vec(any::<u8>(), 1..512),
            pos in any::<prop::sample::Index>(),
            flip in 1u8..=255
        ) {
            let mut b: Vec<u8> = a.clone();
            let pos = pos.index(b.len());
            b[pos] ^= flip;

            prop_assert_eq!(consttime_memequal(&a, &b, a.len()), 0);
            prop_assert_eq!(consttime_memequal(&a, &a, a.len()), 1);
        }
    }
}

#[cfg(kani)]
mod verify {
    use super::*;
    use kani::proof;

    #[proof]
    fn check_fold() {
        let res: u32 = kani::any();
        kani::assume(res < 256);

        kani::assert((fold(res) == 1) == (res == 0), "fold maps 0 to 1 and [1, 256) to 0");
    }

    #[proof]
    #[kani::unwind(9)]
    fn check_memequal() {
        let a: [u8; 8] = kani::any();
        let b: [u8; 8] = kani::any();
        let len: usize = kani::any();
        kani::assume(len <= 8);

        let ct = consttime_memequal(&a, &b, len) == 1;
        kani::assert(ct == (a[..len] == b[..len]), "consttime_memequal agrees with ==");
    }
}
