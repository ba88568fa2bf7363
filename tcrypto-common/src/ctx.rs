//! Owned, provider-sized context buffers.
use alloc::alloc::{alloc_zeroed, dealloc, Layout};
use core::fmt;
use core::ptr::NonNull;
use tcrypto_sys::Status;
use zeroize::Zeroize;
use crate::memset::secure_zero;

/// Alignment of every context allocation. Providers may lay out contexts for wide loads.
pub(crate) const CTX_ALIGN: usize = 16;

/// A heap buffer of exactly the size a provider asked for.
///
/// The buffer is zero-initialized on allocation, and wiped with [`secure_zero`] over its full
/// length before it is released. It remembers its own length, so a release can never wipe less
/// than was allocated.
pub(crate) struct OpaqueCtx {
    ptr: NonNull<u8>,
    len: usize,
}

impl OpaqueCtx {
    /// Allocate `len` zeroed bytes.
    ///
    /// # Errors
    ///
    /// [`Status::MEM_ALLOC`] if `len` is zero, too large for a layout, or the allocator failed.
    pub fn alloc(len: usize) -> Result<Self, Status> {
        if len == 0 { return Err(Status::MEM_ALLOC) }

        let layout = Layout::from_size_align(len, CTX_ALIGN).map_err(|_| Status::MEM_ALLOC)?;

        // SAFETY: `layout` has a non-zero size.
        let raw = unsafe { alloc_zeroed(layout) };

        NonNull::new(raw)
            .map(|ptr| Self { ptr, len })
            .ok_or(Status::MEM_ALLOC)
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `ptr` points to `len` initialized bytes owned by `self`.
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: `ptr` points to `len` initialized bytes exclusively owned by `self`.
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Zero the whole buffer.
    #[inline]
    pub fn wipe(&mut self) {
        secure_zero(self.as_bytes_mut());
    }
}

impl Zeroize for OpaqueCtx {
    #[inline]
    fn zeroize(&mut self) {
        self.wipe();
    }
}

impl Drop for OpaqueCtx {
    fn drop(&mut self) {
        self.wipe();

        // SAFETY: the same layout `alloc` validated and allocated with.
        unsafe {
            dealloc(
                self.ptr.as_ptr(),
                Layout::from_size_align_unchecked(self.len, CTX_ALIGN)
            );
        }
    }
}

impl fmt::Debug for OpaqueCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueCtx {{ len: {} }}", self.len)
    }
}

// SAFETY: `OpaqueCtx` exclusively owns its allocation, all mutation goes through `&mut self`.
unsafe impl Send for OpaqueCtx {}

// SAFETY: shared references only ever read the buffer.
unsafe impl Sync for OpaqueCtx {}
