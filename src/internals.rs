use alloc::vec;
use alloc::vec::Vec;
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Returns a new vector of the given length, with 0s left padded.
#[inline]
pub fn left_pad(input: &[u8], padded_len: usize) -> Result<Zeroizing<Vec<u8>>> {
    if input.len() > padded_len {
        return Err(Error::Overflow);
    }

    let mut out = Zeroizing::new(vec![0u8; padded_len]);
    out[padded_len - input.len()..].copy_from_slice(input);
    Ok(out)
}

/// Big-endian magnitude of `value` with no leading zero bytes. Zero encodes
/// as the empty string.
#[inline]
pub fn magnitude(value: &BigUint) -> Zeroizing<Vec<u8>> {
    if value.is_zero() {
        Zeroizing::new(Vec::new())
    } else {
        Zeroizing::new(value.to_bytes_be())
    }
}

/// Drop leading zero bytes.
#[inline]
pub fn strip_leading_zeros(input: &[u8]) -> &[u8] {
    let start = input.iter().position(|&b| b != 0).unwrap_or(input.len());
    &input[start..]
}

/// Length in bytes of `value`'s magnitude.
#[inline]
pub fn byte_len(value: &BigUint) -> usize {
    (value.bits() + 7) / 8
}
