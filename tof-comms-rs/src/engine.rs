//! Chunked transfer engine.
//!
//! Splits one logical register transfer into backend-sized chunks. Chunks
//! are issued strictly in order, each at the base address plus the bytes
//! already moved, and the first failure aborts the transfer.
//!
//! This module is crate-private — consumers go through [`Device`] in
//! `device.rs` instead.
//!
//! [`Device`]: crate::Device

use crate::error::CommsError;
use crate::transport::{Direction, Transport};

/// Check that `len` bytes starting at `address` stay below `limit`, the
/// size of the register space the bus can reach.
///
/// A transfer that would run past the end is a caller error and is
/// rejected before any bus traffic, rather than wrapping around to 0x0000.
/// Pass [`Transport::address_limit`] of the bus in use.
pub fn check_span<E>(address: u16, len: usize, limit: usize) -> Result<(), CommsError<E>> {
    let end = usize::from(address).checked_add(len);
    match end {
        Some(end) if end <= limit => Ok(()),
        _ => Err(CommsError::AddressOverflow { address, len }),
    }
}

fn checked_chunk_size<T: Transport>(transport: &T) -> usize {
    let chunk_size = transport.chunk_size();
    debug_assert!(chunk_size > 0, "transport reported a zero chunk size");
    chunk_size
}

/// Read `buffer.len()` bytes starting at `address`, one chunk at a time.
pub(crate) async fn read<T: Transport>(
    transport: &mut T,
    address: u16,
    buffer: &mut [u8],
) -> Result<(), CommsError<T::Error>> {
    check_span(address, buffer.len(), transport.address_limit())?;
    let chunk_size = checked_chunk_size(transport);

    for (index, chunk) in buffer.chunks_mut(chunk_size).enumerate() {
        let offset = index * chunk_size;
        // In range: check_span bounds address + offset below the limit.
        let chunk_address = address + offset as u16;

        if let Err(e) = transport.read_chunk(chunk_address, chunk).await {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "chunk read failed at {=u16:#06x} (offset {})",
                chunk_address,
                offset
            );
            return Err(CommsError::transport(Direction::Read, offset, e));
        }
    }

    Ok(())
}

/// Write `data` starting at `address`, one chunk at a time.
pub(crate) async fn write<T: Transport>(
    transport: &mut T,
    address: u16,
    data: &[u8],
) -> Result<(), CommsError<T::Error>> {
    check_span(address, data.len(), transport.address_limit())?;
    let chunk_size = checked_chunk_size(transport);

    for (index, chunk) in data.chunks(chunk_size).enumerate() {
        let offset = index * chunk_size;
        let chunk_address = address + offset as u16;

        if let Err(e) = transport.write_chunk(chunk_address, chunk).await {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "chunk write failed at {=u16:#06x} (offset {})",
                chunk_address,
                offset
            );
            return Err(CommsError::transport(Direction::Write, offset, e));
        }
    }

    Ok(())
}

// ── Unit Tests ───────────────────────────────────────────────────────
