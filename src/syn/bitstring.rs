//! ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 16, BIT STRING with fixed, constrained and
//! unconstrained length.
//!
//! The decoded value is right-justified: `ceil(bit_len / 8)` bytes where the first byte carries
//! the unused high bits as zeros and the last bit of the string is the lowest bit of the last
//! byte.

use crate::io::per::length::Chunks;
use crate::io::per::realign::{advance, byte_span, realign_bits};
use crate::io::per::{align, length_determinant_count, whole_number_up_to, Error};
use crate::io::per::{LengthCount, BYTE_LEN};
use crate::syn::PerDecode;
use log::trace;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedBitString {
    size: usize,
    aligned: bool,
    value: Vec<u8>,
}

impl FixedBitString {
    pub fn new(size: usize, aligned: bool) -> Self {
        Self {
            size,
            aligned,
            value: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn aligned(&self) -> bool {
        self.aligned
    }

    pub fn bit_len(&self) -> u64 {
        self.size as u64
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Whether the bit at `bit` counted from the first bit of the string is set
    pub fn is_bit_set(&self, bit: u64) -> bool {
        is_bit_set(&self.value, self.bit_len(), bit)
    }
}

impl PerDecode for FixedBitString {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value.clear();
        fixed_bit_string(data, shift, self.size, self.aligned, &mut self.value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstrainedBitString {
    lower_bound: usize,
    upper_bound: usize,
    aligned: bool,
    bit_len: usize,
    value: Vec<u8>,
}

impl ConstrainedBitString {
    pub fn new(lower_bound: usize, upper_bound: usize, aligned: bool) -> Self {
        Self {
            lower_bound,
            upper_bound,
            aligned,
            bit_len: 0,
            value: Vec::new(),
        }
    }

    pub fn lower_bound(&self) -> usize {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    pub fn aligned(&self) -> bool {
        self.aligned
    }

    /// The number of bits of the last decoded value
    pub fn bit_len(&self) -> u64 {
        self.bit_len as u64
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub fn is_bit_set(&self, bit: u64) -> bool {
        is_bit_set(&self.value, self.bit_len(), bit)
    }
}

impl PerDecode for ConstrainedBitString {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        if self.upper_bound < self.lower_bound {
            return Err(Error::input_parameters());
        }
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value.clear();
        self.bit_len = 0;

        let (size, data, shift) = if self.upper_bound == self.lower_bound {
            (self.upper_bound, data, shift)
        } else {
            let max_offset = (self.upper_bound - self.lower_bound) as u64;
            let (offset, data, shift) = whole_number_up_to(data, shift, max_offset, self.aligned)?;
            (self.lower_bound + offset as usize, data, shift)
        };

        let cursor = fixed_bit_string(data, shift, size, self.aligned, &mut self.value)?;
        self.bit_len = size;
        Ok(cursor)
    }
}

/// A BIT STRING whose length is given by a length determinant. Only the ALIGNED variant is
/// supported.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnconstrainedBitString {
    aligned: bool,
    bit_len: u64,
    value: Vec<u8>,
}

impl UnconstrainedBitString {
    pub fn new(aligned: bool) -> Self {
        Self {
            aligned,
            bit_len: 0,
            value: Vec::new(),
        }
    }

    pub fn aligned(&self) -> bool {
        self.aligned
    }

    pub fn bit_len(&self) -> u64 {
        self.bit_len
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    pub fn is_bit_set(&self, bit: u64) -> bool {
        is_bit_set(&self.value, self.bit_len, bit)
    }
}

impl PerDecode for UnconstrainedBitString {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        if !self.aligned {
            return Err(Error::input_parameters());
        }
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value.clear();
        self.bit_len = 0;

        let data = align(data, shift)?;
        let LengthCount { form, count, .. } = length_determinant_count(data, true)?;
        let bit_len = count as usize;

        let cursor = if form.is_fragment() {
            // fragments hold whole octets, only the final chunk may end within an octet
            let mut bits = Vec::with_capacity(byte_span(0, bit_len));
            let mut cursor = (data, 0);
            for chunk in Chunks::new(data, true) {
                let chunk = chunk?;
                trace!(
                    "bit string chunk of {} bits, {} of {} bits collected",
                    chunk.elements(),
                    bits.len() * BYTE_LEN,
                    bit_len
                );
                bits.extend_from_slice(chunk.payload);
                cursor = (chunk.rest, chunk.shift);
            }
            realign_bits(&bits, 0, bit_len, &mut self.value)?;
            cursor
        } else {
            let payload = &data[form.header_len()..];
            realign_bits(payload, 0, bit_len, &mut self.value)?;
            advance(payload, 0, bit_len)
        };

        self.bit_len = count;
        Ok(cursor)
    }
}

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 16.9 and 16.10, `size` bits at the cursor. Strings
/// longer than 16 bits start at an octet boundary in the ALIGNED variant.
pub(crate) fn fixed_bit_string<'a>(
    data: &'a [u8],
    shift: u8,
    size: usize,
    aligned: bool,
    value: &mut Vec<u8>,
) -> Result<(&'a [u8], u8), Error> {
    let (data, shift) = if size > 16 && aligned {
        (align(data, shift)?, 0)
    } else {
        (data, shift)
    };
    realign_bits(data, shift, size, value)?;
    Ok(advance(data, shift, size))
}

fn is_bit_set(value: &[u8], bit_len: u64, bit: u64) -> bool {
    if bit >= bit_len {
        return false;
    }
    match (value.len() as u64 * BYTE_LEN as u64).checked_sub(bit_len) {
        Some(lead) => {
            let pos = lead + bit;
            value
                .get((pos / BYTE_LEN as u64) as usize)
                .map(|b| *b & (0x80 >> (pos % BYTE_LEN as u64)) != 0)
                .unwrap_or(false)
        }
        None => false,
    }
}
