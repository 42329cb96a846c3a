//! ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 17, OCTET STRING with fixed and constrained length

use crate::io::per::realign::{advance, realign_bits};
use crate::io::per::{align, whole_number_up_to, Error, BYTE_LEN};
use crate::syn::PerDecode;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedOctetString {
    size: usize,
    aligned: bool,
    value: Vec<u8>,
}

impl FixedOctetString {
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

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}

impl PerDecode for FixedOctetString {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value.clear();
        fixed_octet_string(data, shift, self.size, self.aligned, &mut self.value)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstrainedOctetString {
    lower_bound: usize,
    upper_bound: usize,
    aligned: bool,
    value: Vec<u8>,
}

impl ConstrainedOctetString {
    pub fn new(lower_bound: usize, upper_bound: usize, aligned: bool) -> Self {
        Self {
            lower_bound,
            upper_bound,
            aligned,
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

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn into_value(self) -> Vec<u8> {
        self.value
    }
}

impl PerDecode for ConstrainedOctetString {
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        if self.upper_bound < self.lower_bound {
            return Err(Error::input_parameters());
        }
        Error::ensure_shift(shift)?;
        Error::ensure_available(data, 1)?;
        self.value.clear();

        if self.upper_bound == self.lower_bound {
            return fixed_octet_string(data, shift, self.upper_bound, self.aligned, &mut self.value);
        }

        let max_offset = (self.upper_bound - self.lower_bound) as u64;
        let (offset, data, shift) = whole_number_up_to(data, shift, max_offset, self.aligned)?;
        let size = self.lower_bound + offset as usize;
        fixed_octet_string(data, shift, size, self.aligned, &mut self.value)
    }
}

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 17.6 to 17.8. In the ALIGNED variant strings of more
/// than two octets start at an octet boundary, shorter strings keep the shift of the cursor.
fn fixed_octet_string<'a>(
    data: &'a [u8],
    shift: u8,
    size: usize,
    aligned: bool,
    value: &mut Vec<u8>,
) -> Result<(&'a [u8], u8), Error> {
    let (data, shift) = if size > 2 && aligned {
        (align(data, shift)?, 0)
    } else {
        (data, shift)
    };

    if shift == 0 {
        Error::ensure_available(data, size)?;
        value.extend_from_slice(&data[..size]);
        return Ok((&data[size..], 0));
    }

    let bit_len = size
        .checked_mul(BYTE_LEN)
        .ok_or_else(|| Error::big_length(size as u64, (usize::MAX / BYTE_LEN) as u64))?;
    realign_bits(data, shift, bit_len, value)?;
    Ok(advance(data, shift, bit_len))
}
