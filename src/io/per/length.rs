//! ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9, the unconstrained length determinant.
//!
//! The determinant is octet-aligned and comes in three forms. Small lengths fit into one
//! octet, medium lengths into two, large lengths are split into fragments of multiples of
//! [`FRAGMENT_UNIT`] elements, each fragment preceded by its own header, until a one- or
//! two-octet header introduces the final, possibly empty, chunk.

use crate::io::per::realign::{advance, byte_span};
use crate::io::per::{Error, FRAGMENT_UNIT, MAX_FRAGMENT_MULTIPLIER};
use byteorder::ByteOrder;
use byteorder::NetworkEndian;
use log::trace;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthForm {
    /// `0xxxxxxx`, 11.9.3.6
    OneOctet(u8),
    /// `10xxxxxx xxxxxxxx`, 11.9.3.7
    TwoOctet(u16),
    /// `11xxxxxx xxxxxxxx`, 11.9.3.8, the multiplier of [`FRAGMENT_UNIT`] in `1..=4`
    Fragment(u16),
}

impl LengthForm {
    /// Reads the header at the start of `data`
    pub fn read(data: &[u8]) -> Result<Self, Error> {
        Error::ensure_available(data, 1)?;
        let first = data[0];
        if first & 0x80 == 0 {
            return Ok(LengthForm::OneOctet(first));
        }

        Error::ensure_available(data, 2)?;
        let value = NetworkEndian::read_u16(data) & 0x3FFF;
        if first & 0x40 == 0 {
            Ok(LengthForm::TwoOctet(value))
        } else if value == 0 || u64::from(value) > MAX_FRAGMENT_MULTIPLIER {
            Err(Error::incorrect_length(u64::from(value)))
        } else {
            Ok(LengthForm::Fragment(value))
        }
    }

    /// The number of octets the header itself occupies
    pub const fn header_len(self) -> usize {
        match self {
            LengthForm::OneOctet(_) => 1,
            LengthForm::TwoOctet(_) | LengthForm::Fragment(_) => 2,
        }
    }

    /// The number of elements that follow the header
    pub const fn count(self) -> u64 {
        match self {
            LengthForm::OneOctet(length) => length as u64,
            LengthForm::TwoOctet(length) => length as u64,
            LengthForm::Fragment(multiplier) => multiplier as u64 * FRAGMENT_UNIT,
        }
    }

    pub const fn is_fragment(self) -> bool {
        matches!(self, LengthForm::Fragment(_))
    }
}

/// One header of a length determinant and the payload it introduces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub form: LengthForm,
    /// The octets spanned by the payload. When counting bits, the last octet of a final chunk
    /// may only be partially occupied.
    pub payload: &'a [u8],
    /// The cursor behind the payload
    pub rest: &'a [u8],
    pub shift: u8,
}

impl Chunk<'_> {
    #[inline]
    pub const fn elements(&self) -> u64 {
        self.form.count()
    }
}

/// Walks the headers of a length determinant, yielding one [`Chunk`] per header. The walk ends
/// after the first one- or two-octet header or at the first error.
///
/// With `bits` set, the elements are bits and a fragment spans `count / 8` octets.
pub struct Chunks<'a> {
    data: &'a [u8],
    bits: bool,
    first: bool,
    finished: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(data: &'a [u8], bits: bool) -> Self {
        Self {
            data,
            bits,
            first: true,
            finished: false,
        }
    }

    fn read_chunk(&mut self) -> Result<Chunk<'a>, Error> {
        let form = LengthForm::read(self.data)?;
        let first = std::mem::replace(&mut self.first, false);
        let elements = form.count();
        if first && !form.is_fragment() && elements == 0 {
            return Err(Error::incorrect_length(0));
        }
        trace!("length determinant {:?} with {} elements", form, elements);

        let data = &self.data[form.header_len()..];
        let elements = elements as usize;
        let (span, rest, shift) = if self.bits {
            let span = byte_span(0, elements);
            Error::ensure_available(data, span)?;
            let (rest, shift) = advance(data, 0, elements);
            (span, rest, shift)
        } else {
            Error::ensure_available(data, elements)?;
            (elements, &data[elements..], 0)
        };

        self.data = rest;
        Ok(Chunk {
            form,
            payload: &data[..span],
            rest,
            shift,
        })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.read_chunk();
        if !matches!(&result, Ok(chunk) if chunk.form.is_fragment()) {
            self.finished = true;
        }
        Some(result)
    }
}

/// The result of [`decode_length_determinant`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDeterminant<'a> {
    /// The number of payload octets
    pub length: u64,
    /// Borrowed from the input unless the payload was fragmented
    pub payload: Cow<'a, [u8]>,
    /// The octets occupied by all headers and their payloads
    pub consumed: usize,
}

/// ITU-TX.691 | ISO/IEC 8825-2:2015, chapter 11.9.3.5 to 11.9.3.8, decodes an octet-aligned
/// length determinant that counts octets and slices the payload it introduces
pub fn decode_length_determinant(data: &[u8]) -> Result<LengthDeterminant<'_>, Error> {
    let mut chunks = Chunks::new(data, false);
    let first = match chunks.next() {
        Some(chunk) => chunk?,
        None => return Err(Error::buffer_too_short(1, data.len())),
    };

    let (payload, rest) = if first.form.is_fragment() {
        let mut payload = first.payload.to_vec();
        let mut rest = first.rest;
        for chunk in chunks {
            let chunk = chunk?;
            payload.extend_from_slice(chunk.payload);
            rest = chunk.rest;
        }
        (Cow::Owned(payload), rest)
    } else {
        (Cow::Borrowed(first.payload), first.rest)
    };

    Ok(LengthDeterminant {
        length: payload.len() as u64,
        payload,
        consumed: data.len() - rest.len(),
    })
}

/// The result of [`length_determinant_count`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthCount {
    /// The form of the first header
    pub form: LengthForm,
    /// The number of elements of all chunks
    pub count: u64,
    /// The octets occupied by all headers and their payloads, including a partially used last
    /// octet when counting bits
    pub consumed: usize,
}

/// Walks the same headers as [`decode_length_determinant`] but only sums up the elements. With
/// `bits` set, the elements are bits.
pub fn length_determinant_count(data: &[u8], bits: bool) -> Result<LengthCount, Error> {
    let form = LengthForm::read(data)?;
    let mut count = 0;
    let mut consumed = 0;
    for chunk in Chunks::new(data, bits) {
        let chunk = chunk?;
        count += chunk.elements();
        consumed = data.len() - chunk.rest.len() + usize::from(chunk.shift != 0);
    }
    Ok(LengthCount {
        form,
        count,
        consumed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::per::ErrorKind;

    fn fragmented(multipliers: &[u16], last: &[u8]) -> Vec<u8> {
        let mut data = Vec::new();
        let mut value = 0u8;
        for multiplier in multipliers {
            data.push(0xC0 | (multiplier >> 8) as u8);
            data.push(*multiplier as u8);
            for _ in 0..u64::from(*multiplier) * FRAGMENT_UNIT {
                data.push(value);
                value = value.wrapping_add(1);
            }
        }
        data.extend_from_slice(last);
        data
    }

    #[test]
    fn test_form_one_octet() {
        let form = LengthForm::read(&[0x05]).unwrap();
        assert_eq!(LengthForm::OneOctet(5), form);
        assert_eq!(1, form.header_len());
        assert_eq!(5, form.count());
    }

    #[test]
    fn test_form_two_octet() {
        let form = LengthForm::read(&[0x80, 0x80]).unwrap();
        assert_eq!(LengthForm::TwoOctet(128), form);
        assert_eq!(2, form.header_len());
        assert_eq!(
            LengthForm::TwoOctet(16383),
            LengthForm::read(&[0xBF, 0xFF]).unwrap()
        );
    }

    #[test]
    fn test_form_fragment() {
        let form = LengthForm::read(&[0xC0, 0x03]).unwrap();
        assert_eq!(LengthForm::Fragment(3), form);
        assert_eq!(3 * FRAGMENT_UNIT, form.count());
        assert!(form.is_fragment());
    }

    #[test]
    fn test_form_fragment_multiplier_out_of_range() {
        assert_eq!(
            &ErrorKind::IncorrectLength(0),
            LengthForm::read(&[0xC0, 0x00]).unwrap_err().kind()
        );
        assert_eq!(
            &ErrorKind::IncorrectLength(5),
            LengthForm::read(&[0xC0, 0x05]).unwrap_err().kind()
        );
        assert_eq!(
            &ErrorKind::IncorrectLength(0x101),
            LengthForm::read(&[0xC1, 0x01]).unwrap_err().kind()
        );
    }

    #[test]
    fn test_form_truncated() {
        assert!(matches!(
            LengthForm::read(&[]).unwrap_err().kind(),
            ErrorKind::BufferTooShort { .. }
        ));
        assert!(matches!(
            LengthForm::read(&[0x80]).unwrap_err().kind(),
            ErrorKind::BufferTooShort {
                needed: 2,
                available: 1
            }
        ));
    }

    #[test]
    fn test_decode_one_octet() {
        let data = [0x03, 0x01, 0x02, 0x03, 0x04];
        let det = decode_length_determinant(&data).unwrap();
        assert_eq!(3, det.length);
        assert_eq!(&[0x01, 0x02, 0x03][..], &det.payload[..]);
        assert!(matches!(det.payload, Cow::Borrowed(_)));
        assert_eq!(4, det.consumed);
    }

    #[test]
    fn test_decode_two_octet() {
        let mut data = vec![0x80, 0x81];
        data.extend((0..129).map(|v| v as u8));
        data.push(0xff);
        let det = decode_length_determinant(&data).unwrap();
        assert_eq!(129, det.length);
        assert_eq!(&data[2..131], &det.payload[..]);
        assert_eq!(131, det.consumed);
    }

    #[test]
    fn test_decode_zero_length() {
        assert_eq!(
            &ErrorKind::IncorrectLength(0),
            decode_length_determinant(&[0x00, 0x01])
                .unwrap_err()
                .kind()
        );
        assert_eq!(
            &ErrorKind::IncorrectLength(0),
            decode_length_determinant(&[0x80, 0x00])
                .unwrap_err()
                .kind()
        );
    }

    #[test]
    fn test_decode_payload_too_short() {
        assert_eq!(
            &ErrorKind::BufferTooShort {
                needed: 4,
                available: 3
            },
            decode_length_determinant(&[0x04, 0x01, 0x02, 0x03])
                .unwrap_err()
                .kind()
        );
    }

    #[test]
    fn test_decode_fragmented() {
        let data = fragmented(&[1, 2], &[0x02, 0xaa, 0xbb, 0xcc]);
        let det = decode_length_determinant(&data).unwrap();
        assert_eq!(3 * FRAGMENT_UNIT + 2, det.length);
        assert!(matches!(det.payload, Cow::Owned(_)));
        assert_eq!(&data[2..2 + 16384], &det.payload[..16384]);
        assert_eq!(
            &data[2 + 16384 + 2..2 + 16384 + 2 + 32768],
            &det.payload[16384..16384 + 32768]
        );
        assert_eq!(&[0xaa, 0xbb][..], &det.payload[3 * 16384..]);
        assert_eq!(data.len() - 1, det.consumed);
    }

    #[test]
    fn test_decode_fragmented_with_empty_final_chunk() {
        let data = fragmented(&[4], &[0x00]);
        let det = decode_length_determinant(&data).unwrap();
        assert_eq!(4 * FRAGMENT_UNIT, det.length);
        assert_eq!(data.len(), det.consumed);
    }

    #[test]
    fn test_decode_fragmented_with_two_octet_final_chunk() {
        let mut last = vec![0x81, 0x00];
        last.extend(std::iter::repeat(0x5a).take(256));
        let data = fragmented(&[1], &last);
        let det = decode_length_determinant(&data).unwrap();
        assert_eq!(FRAGMENT_UNIT + 256, det.length);
        assert_eq!(data.len(), det.consumed);
    }

    #[test]
    fn test_decode_fragmented_without_final_chunk() {
        let data = fragmented(&[1], &[]);
        assert!(matches!(
            decode_length_determinant(&data).unwrap_err().kind(),
            ErrorKind::BufferTooShort { .. }
        ));
    }

    #[test]
    fn test_decode_fragment_too_short() {
        let mut data = fragmented(&[1], &[0x00]);
        data.truncate(100);
        assert_eq!(
            &ErrorKind::BufferTooShort {
                needed: 16384,
                available: 98
            },
            decode_length_determinant(&data).unwrap_err().kind()
        );
    }

    #[test]
    fn test_decode_is_a_pure_reader() {
        let data = fragmented(&[1], &[0x01, 0x42]);
        let copy = data.clone();
        let first = decode_length_determinant(&data).unwrap();
        let second = decode_length_determinant(&data).unwrap();
        assert_eq!(first, second);
        assert_eq!(copy, data);
    }

    #[test]
    fn test_count_one_and_two_octet() {
        assert_eq!(
            LengthCount {
                form: LengthForm::OneOctet(0x20),
                count: 32,
                consumed: 5,
            },
            length_determinant_count(&[0x20, 0, 0, 0, 0], true).unwrap()
        );
        let mut data = vec![0x80, 0x80];
        data.extend([0u8; 16].iter());
        assert_eq!(
            LengthCount {
                form: LengthForm::TwoOctet(128),
                count: 128,
                consumed: 18,
            },
            length_determinant_count(&data, true).unwrap()
        );
    }

    #[test]
    fn test_count_zero() {
        assert_eq!(
            &ErrorKind::IncorrectLength(0),
            length_determinant_count(&[0x00], true).unwrap_err().kind()
        );
    }

    #[test]
    fn test_count_bits_skips_fragment_octets() {
        // one fragment of 16384 bits spans 2048 octets
        let mut data = vec![0xC0, 0x01];
        data.extend(std::iter::repeat(0xff).take(2048));
        data.extend_from_slice(&[0x0c, 0xab, 0xc0]);
        let count = length_determinant_count(&data, true).unwrap();
        assert_eq!(LengthForm::Fragment(1), count.form);
        assert_eq!(FRAGMENT_UNIT + 12, count.count);
        assert_eq!(data.len(), count.consumed);
    }

    #[test]
    fn test_count_octets() {
        let data = fragmented(&[2], &[0x01, 0x00]);
        let count = length_determinant_count(&data, false).unwrap();
        assert_eq!(2 * FRAGMENT_UNIT + 1, count.count);
        assert_eq!(data.len(), count.consumed);
    }

    #[test]
    fn test_count_empty() {
        assert!(matches!(
            length_determinant_count(&[], false).unwrap_err().kind(),
            ErrorKind::BufferTooShort { .. }
        ));
    }

    #[test]
    fn test_chunks_cursor_for_bits() {
        let data = [0x0c, 0xab, 0xc0, 0x77];
        let chunks = Chunks::new(&data, true)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(1, chunks.len());
        assert_eq!(&data[1..3], chunks[0].payload);
        assert_eq!(&data[2..], chunks[0].rest);
        assert_eq!(4, chunks[0].shift);
        assert_eq!(12, chunks[0].elements());
    }
}
