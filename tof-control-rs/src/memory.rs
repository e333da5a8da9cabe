//! Access to the controlling side's memory.
//!
//! Descriptors and data buffers live on the other side of a trust boundary
//! (another process, a host over a link, a shared window). The endpoint
//! never dereferences caller addresses itself; it goes through
//! [`CallerMemory`], which either copies the whole range or fails.

use core::ops::Range;

use crate::error::BoundaryCopyError;

/// Copies bytes across the boundary.
///
/// Implementations must copy all of `dst`/`src` or nothing and report
/// [`BoundaryCopyError`] otherwise.
pub trait CallerMemory {
    /// Check that `len` bytes at caller `address` are accessible, without
    /// copying anything.
    fn check(&self, address: u64, len: usize) -> Result<(), BoundaryCopyError>;

    /// Copy `dst.len()` bytes from caller `address` into `dst`.
    fn copy_in(&self, address: u64, dst: &mut [u8]) -> Result<(), BoundaryCopyError>;

    /// Copy `src` to caller `address`.
    fn copy_out(&mut self, address: u64, src: &[u8]) -> Result<(), BoundaryCopyError>;
}

impl<M: CallerMemory + ?Sized> CallerMemory for &mut M {
    fn check(&self, address: u64, len: usize) -> Result<(), BoundaryCopyError> {
        (**self).check(address, len)
    }

    fn copy_in(&self, address: u64, dst: &mut [u8]) -> Result<(), BoundaryCopyError> {
        (**self).copy_in(address, dst)
    }

    fn copy_out(&mut self, address: u64, src: &[u8]) -> Result<(), BoundaryCopyError> {
        (**self).copy_out(address, src)
    }
}

/// Caller memory exposed as one contiguous byte window mapped at `base`.
///
/// Anything outside `base..base + bytes.len()` is inaccessible.
pub struct MemoryWindow<'m> {
    base: u64,
    bytes: &'m mut [u8],
}

impl<'m> MemoryWindow<'m> {
    pub fn new(base: u64, bytes: &'m mut [u8]) -> Self {
        Self { base, bytes }
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn as_slice(&self) -> &[u8] {
        self.bytes
    }

    fn range(&self, address: u64, len: usize) -> Result<Range<usize>, BoundaryCopyError> {
        let fault = BoundaryCopyError { address, len };
        let start = address
            .checked_sub(self.base)
            .and_then(|start| usize::try_from(start).ok())
            .ok_or(fault)?;
        let end = start.checked_add(len).ok_or(fault)?;
        if end > self.bytes.len() {
            return Err(fault);
        }
        Ok(start..end)
    }
}

impl CallerMemory for MemoryWindow<'_> {
    fn check(&self, address: u64, len: usize) -> Result<(), BoundaryCopyError> {
        self.range(address, len).map(|_| ())
    }

    fn copy_in(&self, address: u64, dst: &mut [u8]) -> Result<(), BoundaryCopyError> {
        let range = self.range(address, dst.len())?;
        dst.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn copy_out(&mut self, address: u64, src: &[u8]) -> Result<(), BoundaryCopyError> {
        let range = self.range(address, src.len())?;
        self.bytes[range].copy_from_slice(src);
        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
