//! Prime Generator Contexts
use core::ffi::c_int;
use core::fmt;
use core::marker::PhantomData;
use tcrypto_sys::{PrimeProvider, Soft, Status};
use zeroize::ZeroizeOnDrop;
use crate::ctx::OpaqueCtx;

/// A prime generator for primes of up to `max_bits` bits.
///
/// The context holds candidate and witness state, it is wiped in full when the generator is
/// dropped.
///
/// # Example
///
/// ```
/// use tcrypto_common::{PrimeGen, Soft, Status};
///
/// let prime: PrimeGen = PrimeGen::new(1024).unwrap();
/// assert_eq!(prime.max_bits(), Ok(1024));
///
/// assert_eq!(PrimeGen::<Soft>::new(0).unwrap_err(), Status::BAD_ARG);
/// ```
pub struct PrimeGen<P: PrimeProvider = Soft> {
    ctx: OpaqueCtx,
    _provider: PhantomData<fn() -> P>,
}

impl<P: PrimeProvider> PrimeGen<P> {
    /// Create a prime generator context.
    ///
    /// # Errors
    ///
    /// - [`Status::BAD_ARG`]: `n_max_bits` is not positive.
    /// - [`Status::MEM_ALLOC`]: the context could not be allocated.
    /// - Any status the provider returned from its size query or init.
    pub fn new(n_max_bits: c_int) -> Result<Self, Status> {
        if n_max_bits <= 0 {
            log::debug!("prime generator construction rejected max bits {n_max_bits}");
            return Err(Status::BAD_ARG);
        }

        let len = P::prime_get_size(n_max_bits).map_err(|status| {
            log::debug!("prime generator size query for {n_max_bits} bits failed: {status}");
            status
        })?;

        let mut ctx = OpaqueCtx::alloc(len).map_err(|status| {
            log::debug!("prime generator allocation of {len} bytes failed: {status}");
            status
        })?;

        P::prime_init(n_max_bits, ctx.as_bytes_mut()).map_err(|status| {
            log::debug!("prime generator init failed: {status}");
            status
        })?;

        Ok(Self { ctx, _provider: PhantomData })
    }

    /// The largest prime, in bits, the generator was created for.
    ///
    /// # Errors
    ///
    /// Whatever the provider reports when reading its own context back.
    #[inline]
    pub fn max_bits(&self) -> Result<c_int, Status> {
        P::prime_max_bits(self.ctx.as_bytes())
    }

    /// The size of the provider context in bytes.
    #[inline]
    pub const fn ctx_len(&self) -> usize {
        self.ctx.len()
    }
}

impl<P: PrimeProvider> ZeroizeOnDrop for PrimeGen<P> {}

impl<P: PrimeProvider> fmt::Debug for PrimeGen<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimeGen {{ ctx_len: {} }}", self.ctx.len())
    }
}

/// Create a prime generator context, writing the handle to `out`.
///
/// `out` is cleared before any step that can fail and only written once construction succeeded.
///
/// # Returns
///
/// [`Status::NO_ERR`] on success, [`Status::BAD_ARG`] if `out` is `None`, otherwise the error
/// [`PrimeGen::new`] would return.
pub fn prime_new<P: PrimeProvider>(
    n_max_bits: c_int,
    out: Option<&mut Option<PrimeGen<P>>>
) -> Status {
    let Some(out) = out else { return Status::BAD_ARG };
    *out = None;

    match PrimeGen::new(n_max_bits) {
        Ok(prime) => {
            *out = Some(prime);
            Status::NO_ERR
        }
        Err(status) => status
    }
}
