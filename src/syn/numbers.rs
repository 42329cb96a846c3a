use crate::io::per::whole_number::{unaligned_bits, MAX_VALUE_OCTETS};
use crate::io::per::{align, bits_for_max_offset, bits_for_range, Error, BYTE_LEN};
use crate::io::per::{constrained_whole_number, sign_extend, WholeNumberCase};
use crate::syn::PerDecode;
use byteorder::ByteOrder;
use byteorder::NetworkEndian;
use log::trace;

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 13, an INTEGER with `lower_bound < upper_bound`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstrainedInteger {
    lower_bound: i64,
    upper_bound: i64,
    aligned: bool,
    value: i64,
}

impl ConstrainedInteger {
    pub fn new(lower_bound: i64, upper_bound: i64, aligned: bool) -> Self {
        Self {
            lower_bound,
            upper_bound,
            aligned,
            value: 0,
        }
    }

    pub fn lower_bound(&self) -> i64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> i64 {
        self.upper_bound
    }

    pub fn aligned(&self) -> bool {
        self.aligned
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn into_value(self) -> i64 {
        self.value
    }

    /// The largest offset from the lower bound, `upper_bound - lower_bound`
    #[inline]
    fn max_offset(&self) -> u64 {
        self.upper_bound.wrapping_sub(self.lower_bound) as u64
    }

    /// For `range >= 65536` the value is not an offset but a two's complement integer of up to
    /// eight octets, preceded by its octet count minus one in as few bits as needed. Any count the
    /// field can carry is accepted, the bounds are checked on the value.
    fn decode_large<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        let octets = (bits_for_max_offset(self.max_offset()) as usize + BYTE_LEN - 1) / BYTE_LEN;
        let count_bits = bits_for_range(octets as u64);

        let (count, data, shift) = unaligned_bits(data, shift, count_bits)?;
        let count = count as usize + 1;
        trace!(
            "integer of {} octets, at most {} for {}..={}",
            count,
            octets,
            self.lower_bound,
            self.upper_bound
        );
        // `octets <= 8` keeps the count field at three bits at most
        debug_assert!(count <= MAX_VALUE_OCTETS);

        let data = align(data, shift)?;
        Error::ensure_available(data, count)?;
        let raw = NetworkEndian::read_uint(data, count);
        let value = sign_extend(raw, (count * BYTE_LEN) as u32);

        if value < self.lower_bound || value > self.upper_bound {
            return Err(Error::incorrect_decode());
        }
        self.value = value;
        Ok((&data[count..], 0))
    }
}

impl PerDecode for ConstrainedInteger {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        if self.lower_bound >= self.upper_bound {
            return Err(Error::input_parameters());
        }
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value = 0;

        let max_offset = self.max_offset();
        let (offset, data, shift) = match max_offset.checked_add(1) {
            Some(range) if !self.aligned => constrained_whole_number(data, shift, range, false)?,
            Some(range) if WholeNumberCase::select(range) != WholeNumberCase::IndefiniteLength => {
                constrained_whole_number(data, shift, range, true)?
            }
            // the range covers all 2^64 values
            None if !self.aligned => unaligned_bits(data, shift, u64::BITS)?,
            _ => return self.decode_large(data, shift),
        };

        if offset > max_offset {
            return Err(Error::incorrect_decode());
        }
        self.value = self.lower_bound.wrapping_add(offset as i64);
        Ok((data, shift))
    }
}
