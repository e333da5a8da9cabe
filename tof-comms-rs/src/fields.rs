//! Fixed-width field extraction from raw register dumps.
//!
//! Calibration and result blocks come off the bus as plain byte buffers.
//! Fields are read at documented byte offsets with an explicit byte order
//! instead of reinterpreting the buffer as a struct. Every accessor returns
//! `None` when the field does not fit inside the buffer.

fn field<const N: usize>(buffer: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    buffer.get(offset..end)?.try_into().ok()
}

/// Byte at `offset`.
pub fn u8_at(buffer: &[u8], offset: usize) -> Option<u8> {
    buffer.get(offset).copied()
}

/// Big-endian `u16` at `offset`.
pub fn u16_be_at(buffer: &[u8], offset: usize) -> Option<u16> {
    field(buffer, offset).map(u16::from_be_bytes)
}

/// Little-endian `u16` at `offset`.
pub fn u16_le_at(buffer: &[u8], offset: usize) -> Option<u16> {
    field(buffer, offset).map(u16::from_le_bytes)
}

/// Little-endian `i16` at `offset`.
pub fn i16_le_at(buffer: &[u8], offset: usize) -> Option<i16> {
    field(buffer, offset).map(i16::from_le_bytes)
}

/// Big-endian `u32` at `offset`.
pub fn u32_be_at(buffer: &[u8], offset: usize) -> Option<u32> {
    field(buffer, offset).map(u32::from_be_bytes)
}

/// Little-endian `u32` at `offset`.
pub fn u32_le_at(buffer: &[u8], offset: usize) -> Option<u32> {
    field(buffer, offset).map(u32::from_le_bytes)
}

/// Little-endian `i32` at `offset`.
pub fn i32_le_at(buffer: &[u8], offset: usize) -> Option<i32> {
    field(buffer, offset).map(i32::from_le_bytes)
}

/// Reverse the byte order of every whole 32-bit word in `buffer`, in place.
///
/// The sensor streams its result blocks as big-endian words; this converts
/// them for little-endian field access. A trailing partial word is left
/// untouched.
pub fn swap_words(buffer: &mut [u8]) {
    for word in buffer.chunks_exact_mut(4) {
        word.reverse();
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: [u8; 8] = [0x12, 0x34, 0x56, 0x78, 0xFE, 0xFF, 0x9A, 0xBC];

    #[test]
    fn reads_fields_at_offsets() {
        assert_eq!(u8_at(&BLOCK, 7), Some(0xBC));
        assert_eq!(u16_be_at(&BLOCK, 0), Some(0x1234));
        assert_eq!(u16_le_at(&BLOCK, 0), Some(0x3412));
        assert_eq!(i16_le_at(&BLOCK, 4), Some(-2));
        assert_eq!(u32_be_at(&BLOCK, 0), Some(0x1234_5678));
        assert_eq!(u32_le_at(&BLOCK, 4), Some(0xBC9A_FFFE));
        assert_eq!(i32_le_at(&BLOCK, 0), Some(0x7856_3412));
    }

    #[test]
    fn out_of_range_fields_are_none() {
        assert_eq!(u8_at(&BLOCK, 8), None);
        assert_eq!(u16_be_at(&BLOCK, 7), None);
        assert_eq!(u32_le_at(&BLOCK, 5), None);
        assert_eq!(u32_be_at(&BLOCK, usize::MAX), None);
        assert_eq!(u16_le_at(&[], 0), None);
    }

    #[test]
    fn swap_words_reverses_each_word() {
        let mut buf = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        swap_words(&mut buf);
        assert_eq!(buf, [4, 3, 2, 1, 8, 7, 6, 5, 9, 10]);
    }

    #[test]
    fn swap_words_makes_big_endian_words_native() {
        let mut buf = 0xDEAD_BEEFu32.to_be_bytes();
        swap_words(&mut buf);
        assert_eq!(u32_le_at(&buf, 0), Some(0xDEAD_BEEF));
    }
}
