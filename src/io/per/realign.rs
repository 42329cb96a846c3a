use crate::io::per::{Error, BYTE_LEN};

/// The number of source bytes touched by `bit_len` bits starting `shift` bits into the first byte
#[inline]
pub const fn byte_span(shift: u8, bit_len: usize) -> usize {
    bit_len / BYTE_LEN + (shift as usize + bit_len % BYTE_LEN + BYTE_LEN - 1) / BYTE_LEN
}

/// Moves the cursor `(data, shift)` forward by `bit_len` bits. A partially consumed last byte
/// stays at the front of the returned slice.
///
/// The caller must have checked that `data` spans the bits.
#[inline]
pub fn advance(data: &[u8], shift: u8, bit_len: usize) -> (&[u8], u8) {
    let consumed = shift as usize + bit_len;
    (
        &data[consumed / BYTE_LEN..],
        (consumed % BYTE_LEN) as u8,
    )
}

/// Extracts `bit_len` bits that start `shift` bits into `src` and appends them to `dst`
/// right-justified in `ceil(bit_len / 8)` bytes: the injected high bits of the first appended
/// byte are zero and the last bit of the run becomes the lowest bit of the last appended byte.
///
/// Returns the padding, the number of bits left unconsumed in the last source byte of the span.
/// A non-zero padding means the next field starts at `8 - padding` within that byte.
///
/// Reads nothing past `src[byte_span(shift, bit_len) - 1]`.
pub fn realign_bits(src: &[u8], shift: u8, bit_len: usize, dst: &mut Vec<u8>) -> Result<u8, Error> {
    Error::ensure_shift(shift)?;
    let span = byte_span(shift, bit_len);
    Error::ensure_available(src, span)?;

    let padding = ((BYTE_LEN - (shift as usize + bit_len) % BYTE_LEN) % BYTE_LEN) as u8;
    let out_len = byte_span(0, bit_len);
    if out_len == 0 {
        return Ok(padding);
    }

    // high zero bits injected into the first output byte
    let first_nulls = (out_len * BYTE_LEN - bit_len) as u8;
    let first = dst.len();
    dst.reserve(out_len);

    if first_nulls == 0 && shift == 0 {
        dst.extend_from_slice(&src[..out_len]);
        return Ok(padding);
    }

    if shift >= first_nulls {
        // shift left, every output byte is made of src[i] and src[i + 1]
        let left = shift - first_nulls;
        if left == 0 {
            dst.extend_from_slice(&src[..out_len]);
        } else {
            let right = BYTE_LEN as u8 - left;
            dst.extend(
                src[..=out_len]
                    .windows(2)
                    .map(|w| (w[0] << left) | (w[1] >> right)),
            );
        }
    } else {
        // shift right, the first output byte is made of src[0] only
        let right = first_nulls - shift;
        let left = BYTE_LEN as u8 - right;
        dst.push(src[0] >> right);
        dst.extend(
            src[..out_len]
                .windows(2)
                .map(|w| (w[0] << left) | (w[1] >> right)),
        );
    }

    dst[first] &= 0xFF >> first_nulls;
    Ok(padding)
}
