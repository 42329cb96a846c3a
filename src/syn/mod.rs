//! Value decoders for the ASN.1 types, built from the bit level engine in [`crate::io::per`].
//!
//! A decoder is created once with the static parameters of its field and can then decode any
//! number of occurrences of that field. Each [`PerDecode::decode`] call replaces the previously
//! decoded value and returns the cursor behind the field.

use crate::io::per::Error;

pub mod bitstring;
pub mod numbers;
pub mod octetstring;

pub use bitstring::ConstrainedBitString;
pub use bitstring::FixedBitString;
pub use bitstring::UnconstrainedBitString;
pub use numbers::ConstrainedInteger;
pub use octetstring::ConstrainedOctetString;
pub use octetstring::FixedOctetString;

pub trait PerDecode {
    /// Decodes the field at the cursor `(data, shift)` into the value storage of `self` and
    /// returns the cursor behind the field. On error, the value storage is unspecified.
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error>;
}

impl<T: PerDecode + ?Sized> PerDecode for &mut T {
    #[inline]
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        T::decode(self, data, shift)
    }
}

impl<T: PerDecode + ?Sized> PerDecode for Box<T> {
    #[inline]
    fn decode<'a>(&mut self, data: &'a [u8], shift: u8) -> Result<(&'a [u8], u8), Error> {
        T::decode(self, data, shift)
    }
}

/// Decodes the fields in order, threading the cursor from one field into the next
pub fn decode_all<'a>(
    fields: &mut [&mut dyn PerDecode],
    data: &'a [u8],
    shift: u8,
) -> Result<(&'a [u8], u8), Error> {
    fields
        .iter_mut()
        .try_fold((data, shift), |(data, shift), field| {
            field.decode(data, shift)
        })
}
