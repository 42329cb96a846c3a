//! This module contains the bit level building blocks to decode ASN.1 values encoded with the
//! Packed Encoding Rules (ITU-T X.691 | ISO/IEC 8825-2:2015), ALIGNED and UNALIGNED.
//!
//! Nothing in here owns the message. Every function receives a cursor - the remaining input as a
//! byte slice plus the number of bits already consumed from its first byte - and returns the
//! advanced cursor next to the decoded value. Value decoders composing these building blocks
//! live in [`crate::syn`].

pub mod err;
pub mod length;
pub mod realign;
pub mod whole_number;

pub use err::Error;
pub use err::ErrorKind;
pub use length::decode_length_determinant;
pub use length::Chunk;
pub use length::Chunks;
pub use length::length_determinant_count;
pub use length::LengthCount;
pub use length::LengthDeterminant;
pub use length::LengthForm;
pub use realign::advance;
pub use realign::byte_span;
pub use realign::realign_bits;
pub use whole_number::constrained_whole_number;
pub use whole_number::sign_extend;
pub use whole_number::unaligned_bits;
pub use whole_number::whole_number_up_to;
pub use whole_number::WholeNumberCase;

pub const BYTE_LEN: usize = 8;

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9.3.6
pub const ONE_OCTET_MAX: u64 = 127;

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9.3.7
pub const TWO_OCTET_MAX: u64 = 16383;

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9.3.8, the number of elements per multiple
pub const FRAGMENT_UNIT: u64 = 16 * 1024;

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9.3.8, NOTE
pub const MAX_FRAGMENT_MULTIPLIER: u64 = 4;

/// The number of bits needed to represent every offset in `0..=max_offset`, which is
/// `ceil(log2(max_offset + 1))`
#[inline]
pub const fn bits_for_max_offset(max_offset: u64) -> u32 {
    u64::BITS - max_offset.leading_zeros()
}

/// The number of bits needed to represent every value of a range with `range` values.
/// A `range` of zero is treated like a range of one.
#[inline]
pub const fn bits_for_range(range: u64) -> u32 {
    bits_for_max_offset(range.saturating_sub(1))
}

/// Skips the remaining bits of the current byte, if any
#[inline]
pub(crate) fn align(data: &[u8], shift: u8) -> Result<&[u8], Error> {
    if shift == 0 {
        Ok(data)
    } else {
        log::trace!("skipping {} bits to the next octet boundary", BYTE_LEN as u8 - shift);
        data.get(1..).ok_or_else(|| Error::buffer_too_short(1, 0))
    }
}
