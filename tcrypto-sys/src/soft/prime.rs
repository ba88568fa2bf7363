use core::ffi::c_int;

use super::{expect_tag, load, reset, store, tag, Soft, FIELD};
use crate::{words_for_bits, PrimeProvider, Status, MAX_BN_BITS, WORD_SIZE};

// | tag | max_bits | prime | candidate | witness | work |
const TAG: u32 = tag(b"PRIM");
const MAX_BITS: usize = FIELD;
const HEADER: usize = FIELD * 2;
const AREAS: usize = 4;

#[inline]
fn checked_bits(max_bits: c_int) -> Result<usize, Status> {
    if max_bits < 1 || max_bits as usize > MAX_BN_BITS {
        Err(Status::LENGTH)
    } else {
        Ok(max_bits as usize)
    }
}

#[inline]
const fn ctx_size(max_bits: usize) -> usize {
    HEADER + AREAS * words_for_bits(max_bits) * WORD_SIZE
}

impl PrimeProvider for Soft {
    fn prime_get_size(max_bits: c_int) -> Result<usize, Status> {
        checked_bits(max_bits).map(ctx_size)
    }

    fn prime_init(max_bits: c_int, ctx: &mut [u8]) -> Result<(), Status> {
        let bits = checked_bits(max_bits)?;
        let ctx = reset(ctx, ctx_size(bits))?;

        store(ctx, 0, TAG)?;
        store(ctx, MAX_BITS, bits as u32)
    }

    fn prime_max_bits(ctx: &[u8]) -> Result<c_int, Status> {
        expect_tag(ctx, TAG)?;
        let bits = load(ctx, MAX_BITS)? as usize;

        if bits == 0 || bits > MAX_BN_BITS || ctx.len() < ctx_size(bits) {
            return Err(Status::CONTEXT_MATCH);
        }

        Ok(bits as c_int)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec;

    #[test]
    fn size_covers_all_work_areas() {
        assert_eq!(Soft::prime_get_size(1), Ok(HEADER + AREAS * 4));
        assert_eq!(Soft::prime_get_size(1024), Ok(HEADER + AREAS * 128));
        assert_eq!(Soft::prime_get_size(1025), Ok(HEADER + AREAS * 132));
    }

    #[test]
    fn bit_range() {
        assert_eq!(Soft::prime_get_size(0), Err(Status::LENGTH));
        assert_eq!(Soft::prime_get_size(-1), Err(Status::LENGTH));
        assert_eq!(Soft::prime_get_size(MAX_BN_BITS as c_int + 1), Err(Status::LENGTH));
        assert!(Soft::prime_get_size(MAX_BN_BITS as c_int).is_ok());
    }

    #[test]
    fn init_records_max_bits() {
        let mut ctx = vec![0xFFu8; Soft::prime_get_size(521).unwrap()];
        Soft::prime_init(521, &mut ctx).unwrap();
        assert_eq!(Soft::prime_max_bits(&ctx), Ok(521));
        assert!(ctx[HEADER..].iter().all(|b| *b == 0));
    }

    #[test]
    fn init_rejects_short_context() {
        let mut ctx = vec![0u8; Soft::prime_get_size(256).unwrap() - 1];
        assert_eq!(Soft::prime_init(256, &mut ctx), Err(Status::SIZE));
    }

    #[test]
    fn uninitialized_context_is_rejected() {
        let ctx = [0u8; 64];
        assert_eq!(Soft::prime_max_bits(&ctx), Err(Status::CONTEXT_MATCH));
    }
}
