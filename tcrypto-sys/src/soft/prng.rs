use core::ffi::c_int;
use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};
use zeroize::Zeroizing;

use super::{expect_tag, reset, store, tag, Soft, FIELD};
use crate::{PrngProvider, Status};

// | tag | seed_bits | key[32] | word_pos[16] |
const TAG: u32 = tag(b"PRNG");
const SEED_BITS: usize = FIELD;
const KEY: usize = FIELD * 2;
const KEY_LEN: usize = 32;
const POS: usize = KEY + KEY_LEN;
const POS_LEN: usize = 16;
const CTX_SIZE: usize = POS + POS_LEN;

/// Pull the generator state out of `ctx`. The key copy is wiped when dropped.
fn load_state(ctx: &[u8]) -> Result<(Zeroizing<[u8; KEY_LEN]>, u128), Status> {
    expect_tag(ctx, TAG)?;
    if ctx.len() < CTX_SIZE { return Err(Status::CONTEXT_MATCH) }

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&ctx[KEY..POS]);

    let mut pos = [0u8; POS_LEN];
    pos.copy_from_slice(&ctx[POS..CTX_SIZE]);

    Ok((key, u128::from_le_bytes(pos)))
}

impl PrngProvider for Soft {
    #[inline]
    fn prng_get_size() -> Result<usize, Status> {
        Ok(CTX_SIZE)
    }

    /// Keys a `ChaCha20` generator with 256 bits from the operating system. `seed_bits` is
    /// recorded in the context, the key width does not depend on it.
    fn prng_init(seed_bits: c_int, ctx: &mut [u8]) -> Result<(), Status> {
        if seed_bits < 1 { return Err(Status::LENGTH) }
        let ctx = reset(ctx, CTX_SIZE)?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        getrandom::fill(key.as_mut_slice()).map_err(|_| Status::ERR)?;

        store(ctx, 0, TAG)?;
        store(ctx, SEED_BITS, seed_bits as u32)?;
        ctx[KEY..POS].copy_from_slice(key.as_slice());

        Ok(())
    }

    fn prng_gen(out: &mut [u8], n_bits: c_int, ctx: &mut [u8]) -> Result<(), Status> {
        let (key, pos) = load_state(ctx)?;
        if n_bits < 1 { return Err(Status::LENGTH) }

        let n_bits = n_bits as usize;
        let n_bytes = (n_bits + 7) / 8;
        let out = out.get_mut(..n_bytes).ok_or(Status::SIZE)?;

        // `key` is wiped on return. The by-value seed and the generator's own key schedule are not,
        // `rand_chacha` 0.3 does not zeroize its state.
        let mut rng = ChaCha20Rng::from_seed(*key);
        rng.set_word_pos(pos);
        rng.fill_bytes(out);

        let partial = n_bits % 8;
        if partial != 0 {
            out[n_bytes - 1] &= (1u8 << partial) - 1;
        }

        ctx[POS..CTX_SIZE].copy_from_slice(&rng.get_word_pos().to_le_bytes());
        Ok(())
    }
}
