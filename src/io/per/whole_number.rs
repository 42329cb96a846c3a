use crate::io::per::realign::{advance, byte_span, realign_bits};
use crate::io::per::{align, bits_for_range, Error, BYTE_LEN};
use byteorder::ByteOrder;
use byteorder::NetworkEndian;
use log::trace;

/// The largest number of octets the indefinite-length case accepts
pub const MAX_VALUE_OCTETS: usize = std::mem::size_of::<u64>();

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.5.7, the ALIGNED variant encodes a constrained
/// whole number in one of four ways depending on the range alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WholeNumberCase {
    /// 11.5.7.2: `range < 256`, the minimum number of bits, not octet-aligned
    BitField { bits: u32 },
    /// 11.5.7.3: `range == 256`, one octet, octet-aligned
    OneOctet,
    /// 11.5.7.4: `256 < range < 65536`, two octets, octet-aligned
    TwoOctet,
    /// `range >= 65536`, a length octet followed by that many octets, octet-aligned
    IndefiniteLength,
}

impl WholeNumberCase {
    pub const fn select(range: u64) -> Self {
        if range < 256 {
            WholeNumberCase::BitField {
                bits: bits_for_range(range),
            }
        } else if range == 256 {
            WholeNumberCase::OneOctet
        } else if range < 65536 {
            WholeNumberCase::TwoOctet
        } else {
            WholeNumberCase::IndefiniteLength
        }
    }

    /// Whether the cursor is moved to the next octet boundary before the value is read
    pub const fn forces_alignment(self) -> bool {
        !matches!(self, WholeNumberCase::BitField { .. })
    }
}

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.5, decodes a whole number in `0..range` and
/// returns it together with the advanced cursor
pub fn constrained_whole_number(
    data: &[u8],
    shift: u8,
    range: u64,
    aligned: bool,
) -> Result<(u64, &[u8], u8), Error> {
    if range == 0 {
        return Err(Error::input_parameters());
    }
    Error::ensure_shift(shift)?;
    Error::ensure_available(data, 1)?;

    let (value, data, shift) = if aligned {
        aligned_whole_number(data, shift, range)?
    } else {
        unaligned_bits(data, shift, bits_for_range(range))?
    };

    if value >= range {
        Err(Error::incorrect_decode())
    } else {
        Ok((value, data, shift))
    }
}

fn aligned_whole_number(data: &[u8], shift: u8, range: u64) -> Result<(u64, &[u8], u8), Error> {
    let case = WholeNumberCase::select(range);
    trace!("constrained whole number with range {} as {:?}", range, case);

    let (data, shift) = if case.forces_alignment() {
        (align(data, shift)?, 0)
    } else {
        (data, shift)
    };

    match case {
        WholeNumberCase::BitField { bits } => bit_field(data, shift, bits),
        WholeNumberCase::OneOctet => {
            Error::ensure_available(data, 1)?;
            Ok((u64::from(data[0]), &data[1..], 0))
        }
        WholeNumberCase::TwoOctet => {
            Error::ensure_available(data, 2)?;
            Ok((u64::from(NetworkEndian::read_u16(data)), &data[2..], 0))
        }
        WholeNumberCase::IndefiniteLength => indefinite_length(data),
    }
}

/// A length octet followed by that many octets of big-endian magnitude, at an octet boundary
fn indefinite_length(data: &[u8]) -> Result<(u64, &[u8], u8), Error> {
    Error::ensure_available(data, 1)?;
    let length = data[0];
    if length & 0x80 != 0 || usize::from(length) > MAX_VALUE_OCTETS {
        return Err(Error::incorrect_decode());
    }
    let length = usize::from(length);
    let data = &data[1..];
    Error::ensure_available(data, length)?;
    Ok((read_unsigned(&data[..length]), &data[length..], 0))
}

/// Like [`constrained_whole_number`], but the range is given by its largest offset so that a
/// range of all 2^64 values can be expressed. Such a range is read as 64 bits in the UNALIGNED
/// variant and in the indefinite-length form in the ALIGNED variant.
pub fn whole_number_up_to(
    data: &[u8],
    shift: u8,
    max_offset: u64,
    aligned: bool,
) -> Result<(u64, &[u8], u8), Error> {
    if let Some(range) = max_offset.checked_add(1) {
        return constrained_whole_number(data, shift, range, aligned);
    }
    Error::ensure_shift(shift)?;
    Error::ensure_available(data, 1)?;
    trace!("whole number over the full 64 bit range");
    if aligned {
        indefinite_length(align(data, shift)?)
    } else {
        unaligned_bits(data, shift, u64::BITS)
    }
}

/// Up to eight bits starting at `shift`, crossing into the next byte if needed
fn bit_field(data: &[u8], shift: u8, bits: u32) -> Result<(u64, &[u8], u8), Error> {
    debug_assert!(bits <= BYTE_LEN as u32);
    if bits == 0 {
        return Ok((0, data, shift));
    }

    let mask = (1u16 << bits) - 1;
    let end = u32::from(shift) + bits;
    if end <= BYTE_LEN as u32 {
        Error::ensure_available(data, 1)?;
        let value = (u16::from(data[0]) >> (BYTE_LEN as u32 - end)) & mask;
        if end == BYTE_LEN as u32 {
            Ok((u64::from(value), &data[1..], 0))
        } else {
            Ok((u64::from(value), data, end as u8))
        }
    } else {
        Error::ensure_available(data, 2)?;
        let window = NetworkEndian::read_u16(data);
        let value = (window >> (2 * BYTE_LEN as u32 - end)) & mask;
        Ok((u64::from(value), &data[1..], (end - BYTE_LEN as u32) as u8))
    }
}

/// The UNALIGNED variant: `bits` bits starting at `shift` as a big-endian unsigned magnitude,
/// regardless of octet boundaries
pub fn unaligned_bits(data: &[u8], shift: u8, bits: u32) -> Result<(u64, &[u8], u8), Error> {
    if bits > u64::BITS {
        return Err(Error::incorrect_decode());
    }
    let bit_len = bits as usize;
    Error::ensure_available(data, byte_span(shift, bit_len))?;

    let mut bytes = Vec::with_capacity(MAX_VALUE_OCTETS);
    realign_bits(data, shift, bit_len, &mut bytes)?;
    let (data, shift) = advance(data, shift, bit_len);
    Ok((read_unsigned(&bytes), data, shift))
}

#[inline]
fn read_unsigned(bytes: &[u8]) -> u64 {
    if bytes.is_empty() {
        0
    } else {
        NetworkEndian::read_uint(bytes, bytes.len())
    }
}

/// Extends a two's complement value that is `bit_width` bits wide to an `i64`, preserving its sign
#[inline]
pub const fn sign_extend(value: u64, bit_width: u32) -> i64 {
    if bit_width == 0 {
        0
    } else if bit_width >= u64::BITS {
        value as i64
    } else {
        let unused = u64::BITS - bit_width;
        ((value << unused) as i64) >> unused
    }
}
