//! Pure-Rust Reference Provider
//!
//! `Soft` keeps every piece of its state inside the context blobs it is handed, exactly like a
//! vendor provider would: nothing is cached between calls, and a context is nothing more than
//! bytes until the provider reads it. Each context starts with a four byte tag naming its kind,
//! followed by little-endian `u32` fields.
//!
//! Layouts are private to this module and may change between releases; callers must only ever
//! size contexts through the `*_get_size` functions.

mod bignum;
mod prime;
mod prng;

use crate::Status;

/// The software provider.
///
/// Implements [`BigNumProvider`], [`PrimeProvider`] and [`PrngProvider`].
///
/// [`BigNumProvider`]: crate::BigNumProvider
/// [`PrimeProvider`]: crate::PrimeProvider
/// [`PrngProvider`]: crate::PrngProvider
#[derive(Copy, Clone, Debug, Default)]
pub struct Soft;

const FIELD: usize = 4;

#[inline]
const fn tag(name: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*name)
}

#[inline]
fn load(ctx: &[u8], offset: usize) -> Result<u32, Status> {
    ctx.get(offset..offset + FIELD)
        .and_then(|bytes| <[u8; FIELD]>::try_from(bytes).ok())
        .map(u32::from_le_bytes)
        .ok_or(Status::SIZE)
}

#[inline]
fn store(ctx: &mut [u8], offset: usize, value: u32) -> Result<(), Status> {
    ctx.get_mut(offset..offset + FIELD)
        .ok_or(Status::SIZE)?
        .copy_from_slice(&value.to_le_bytes());
    Ok(())
}

#[inline]
fn expect_tag(ctx: &[u8], expected: u32) -> Result<(), Status> {
    if load(ctx, 0)? == expected {
        Ok(())
    } else {
        Err(Status::CONTEXT_MATCH)
    }
}

/// Zero the first `len` bytes of `ctx`, the start state every `init` builds on.
#[inline]
fn reset(ctx: &mut [u8], len: usize) -> Result<&mut [u8], Status> {
    let region = ctx.get_mut(..len).ok_or(Status::SIZE)?;
    region.fill(0);
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_little_endian() {
        let mut ctx = [0u8; 8];
        store(&mut ctx, 4, 0x0403_0201).unwrap();
        assert_eq!(&ctx[4..], &[1, 2, 3, 4]);
        assert_eq!(load(&ctx, 4), Ok(0x0403_0201));
    }

    #[test]
    fn out_of_bounds_fields_are_size_errors() {
        let mut ctx = [0u8; 6];
        assert_eq!(load(&ctx, 4), Err(Status::SIZE));
        assert_eq!(store(&mut ctx, 4, 1), Err(Status::SIZE));
    }

    #[test]
    fn tags_are_checked() {
        let mut ctx = [0u8; 4];
        store(&mut ctx, 0, tag(b"TEST")).unwrap();
        assert!(expect_tag(&ctx, tag(b"TEST")).is_ok());
        assert_eq!(expect_tag(&ctx, tag(b"ELSE")), Err(Status::CONTEXT_MATCH));
        assert_eq!(expect_tag(&ctx[..2], tag(b"TEST")), Err(Status::SIZE));
    }
}
