use core::ffi::{c_int, c_void};
use zeroize::Zeroizing;

use super::{expect_tag, load, reset, store, tag, Soft, FIELD};
use crate::{
    words_for_bits, BigNumProvider, BitSupplier, Sign, Status, Word, MAX_BN_WORDS, WORD_SIZE
};

// | tag | sign | room | size | number[room] |
const TAG: u32 = tag(b"BGNM");
const SIGN: usize = FIELD;
const ROOM: usize = FIELD * 2;
const SIZE: usize = FIELD * 3;
const NUMBER: usize = FIELD * 4;

const WORD_BITS: usize = WORD_SIZE * 8;

#[inline]
fn checked_len(len: c_int) -> Result<usize, Status> {
    if len < 1 || len as usize > MAX_BN_WORDS {
        Err(Status::LENGTH)
    } else {
        Ok(len as usize)
    }
}

#[inline]
const fn ctx_size(room: usize) -> usize {
    NUMBER + room * WORD_SIZE
}

/// Validate the header of an initialized context, returning its capacity in words.
fn room(ctx: &[u8]) -> Result<usize, Status> {
    expect_tag(ctx, TAG)?;
    let room = load(ctx, ROOM)? as usize;

    if room == 0 || room > MAX_BN_WORDS || ctx.len() < ctx_size(room) {
        return Err(Status::CONTEXT_MATCH);
    }

    Ok(room)
}

#[inline]
fn load_word(ctx: &[u8], index: usize) -> Result<Word, Status> {
    load(ctx, NUMBER + index * WORD_SIZE)
}

#[inline]
fn store_word(ctx: &mut [u8], index: usize, word: Word) -> Result<(), Status> {
    store(ctx, NUMBER + index * WORD_SIZE, word)
}

/// Number of words once the most significant zero words are stripped, never less than one.
#[inline]
fn significant_len(words: &[Word]) -> usize {
    words.iter().rposition(|w| *w != 0).map_or(1, |top| top + 1)
}

impl BigNumProvider for Soft {
    fn big_num_get_size(len: c_int) -> Result<usize, Status> {
        checked_len(len).map(ctx_size)
    }

    fn big_num_init(len: c_int, ctx: &mut [u8]) -> Result<(), Status> {
        let room = checked_len(len)?;
        let ctx = reset(ctx, ctx_size(room))?;

        store(ctx, 0, TAG)?;
        store(ctx, SIGN, Sign::Positive as u32)?;
        store(ctx, ROOM, room as u32)?;
        store(ctx, SIZE, 1)
    }

    fn set_bn(sign: Sign, words: &[Word], ctx: &mut [u8]) -> Result<(), Status> {
        let room = room(ctx)?;
        if words.is_empty() { return Err(Status::LENGTH) }

        let len = significant_len(words);
        if len > room { return Err(Status::SIZE) }

        for (index, word) in words[..len].iter().enumerate() {
            store_word(ctx, index, *word)?;
        }
        for index in len..room {
            store_word(ctx, index, 0)?;
        }

        // zero has no sign, it is always stored as positive.
        let is_zero = len == 1 && words[0] == 0;
        let sign = if is_zero { Sign::Positive } else { sign };

        store(ctx, SIGN, sign as u32)?;
        store(ctx, SIZE, len as u32)
    }

    fn get_bn(ctx: &[u8], out: &mut [Word]) -> Result<(Sign, usize), Status> {
        let room = room(ctx)?;
        let len = load(ctx, SIZE)? as usize;

        if len == 0 || len > room { return Err(Status::CONTEXT_MATCH) }
        if out.len() < len { return Err(Status::SIZE) }

        let sign = Sign::from_u32(load(ctx, SIGN)?)?;

        for (index, word) in out[..len].iter_mut().enumerate() {
            *word = load_word(ctx, index)?;
        }

        Ok((sign, len))
    }

    fn prng_bn(
        ctx: &mut [u8],
        n_bits: c_int,
        supplier: BitSupplier,
        param: *mut c_void
    ) -> Result<(), Status> {
        let room = room(ctx)?;
        if n_bits < 1 || n_bits as usize > room * WORD_BITS {
            return Err(Status::LENGTH);
        }

        let n_bits = n_bits as usize;
        let len = words_for_bits(n_bits);
        let mut scratch = Zeroizing::new([0 as Word; MAX_BN_WORDS]);

        // suppliers are only ever asked for whole words, the excess is masked off below.
        supplier(Some(&mut scratch[..len]), (len * WORD_BITS) as c_int, param).into_result()?;

        let partial = n_bits % WORD_BITS;
        if partial != 0 {
            scratch[len - 1] &= (1 << partial) - 1;
        }

        Self::set_bn(Sign::Positive, &scratch[..len], ctx)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec;

    fn word_supplier(rand: Option<&mut [Word]>, _n_bits: c_int, _param: *mut c_void) -> Status {
        let Some(rand) = rand else { return Status::NULL_PTR };
        rand.fill(Word::MAX);
        Status::NO_ERR
    }

    proptest! {
        #[test]
        fn set_get_preserves_significant_words(
            words in proptest::collection::vec(any::<Word>(), 1..=64),
            negative in any::<bool>()
        ) {
            let room = words.len() as c_int;
            let mut ctx = vec![0u8; Soft::big_num_get_size(room).unwrap()];
            Soft::big_num_init(room, &mut ctx).unwrap();

            let sign = if negative { Sign::Negative } else { Sign::Positive };
            Soft::set_bn(sign, &words, &mut ctx).unwrap();

            let mut out = vec![0 as Word; words.len()];
            let (got_sign, len) = Soft::get_bn(&ctx, &mut out).unwrap();

            prop_assert_eq!(len, significant_len(&words));
            prop_assert_eq!(&out[..len], &words[..len]);
            if len == 1 && words[0] == 0 {
                prop_assert_eq!(got_sign, Sign::Positive);
            } else {
                prop_assert_eq!(got_sign, sign);
            }
        }

        #[test]
        fn random_values_never_exceed_width(n_bits in 1usize..=(8 * WORD_BITS)) {
            let mut ctx = vec![0u8; Soft::big_num_get_size(8).unwrap()];
            Soft::big_num_init(8, &mut ctx).unwrap();
            Soft::prng_bn(&mut ctx, n_bits as c_int, word_supplier, core::ptr::null_mut()).unwrap();

            let mut out = [0 as Word; 8];
            let (_, len) = Soft::get_bn(&ctx, &mut out).unwrap();

            // an all-ones supplier yields exactly `n_bits` set bits
            let ones: u32 = out[..len].iter().map(|w| w.count_ones()).sum();
            prop_assert_eq!(ones as usize, n_bits);
            prop_assert_eq!(len, words_for_bits(n_bits));
        }
    }
}
