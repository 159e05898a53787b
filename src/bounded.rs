//! Single bounded-integer fields.
//!
//! Every key component that crosses the wire is read through
//! [`read_bounded`], which enforces a byte-length range on the value's
//! magnitude and, optionally, that the value is reduced modulo some other
//! component. The four framings differ only in how the length is carried
//! and whether a sign byte can appear.

use num_bigint::BigUint;
use pkcs8::der::Tag;

use crate::asn1;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::internals::{magnitude, strip_leading_zeros};
use crate::params::Bounds;

/// Framing of a single integer.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IntegerEncoding {
    /// DER `INTEGER`.
    Der,
    /// DER `INTEGER` with an implicit context-specific tag `[n]`.
    DerTagged(u8),
    /// SSH `mpint`: 32-bit length, two's-complement big-endian value.
    Ssh,
    /// SSL/TLS: 16-bit length, unsigned big-endian value.
    Ssl,
    /// PGP MPI: 16-bit bit count, unsigned big-endian value.
    Pgp,
}

impl IntegerEncoding {
    fn der_tag(self) -> Option<Tag> {
        match self {
            IntegerEncoding::Der => Some(Tag::Integer),
            IntegerEncoding::DerTagged(n) => Some(asn1::context_tag(n, false)),
            _ => None,
        }
    }
}

/// Read one integer and check it against `bounds` and, if supplied,
/// `modulus`.
///
/// Out-of-range values yield [`Error::BadData`], truncated input
/// [`Error::Underflow`].
pub fn read_bounded(
    r: &mut Reader<'_>,
    encoding: IntegerEncoding,
    bounds: Bounds,
    modulus: Option<&BigUint>,
) -> Result<BigUint> {
    let value = match encoding {
        IntegerEncoding::Der | IntegerEncoding::DerTagged(_) => {
            let tag = encoding.der_tag().ok_or(Error::Internal)?;
            let len = asn1::read_tagged(r, tag)?;
            let raw = r.read_bytes(len)?;
            match raw.first() {
                None => return Err(Error::BadData),
                Some(b) if b & 0x80 != 0 => {
                    log::debug!("negative INTEGER rejected");
                    return Err(Error::BadData);
                }
                _ => strip_leading_zeros(raw),
            }
        }
        IntegerEncoding::Ssh => {
            let len = r.read_u32()? as usize;
            if len > bounds.max + 1 {
                log::debug!("mpint length {len} exceeds {}", bounds.max);
                return Err(Error::BadData);
            }
            let raw = r.read_bytes(len)?;
            if raw.first().map_or(false, |b| b & 0x80 != 0) {
                log::debug!("negative mpint rejected");
                return Err(Error::BadData);
            }
            strip_leading_zeros(raw)
        }
        IntegerEncoding::Ssl => {
            let len = usize::from(r.read_u16()?);
            if len > bounds.max {
                log::debug!("SSL integer length {len} exceeds {}", bounds.max);
                return Err(Error::BadData);
            }
            strip_leading_zeros(r.read_bytes(len)?)
        }
        IntegerEncoding::Pgp => {
            let bits = usize::from(r.read_u16()?);
            let len = (bits + 7) / 8;
            if len > bounds.max {
                log::debug!("MPI bit count {bits} too large");
                return Err(Error::BadData);
            }
            let raw = r.read_bytes(len)?;
            if significant_bits(raw) != bits {
                log::debug!("MPI bit count {bits} doesn't match value");
                return Err(Error::BadData);
            }
            raw
        }
    };

    check_bounded(value, bounds, modulus)
}

/// Range-check an unsigned big-endian magnitude that was framed elsewhere.
pub(crate) fn check_bounded(
    raw: &[u8],
    bounds: Bounds,
    modulus: Option<&BigUint>,
) -> Result<BigUint> {
    let raw = strip_leading_zeros(raw);
    if !bounds.contains(raw.len()) {
        log::debug!(
            "integer length {} outside [{}, {}]",
            raw.len(),
            bounds.min,
            bounds.max
        );
        return Err(Error::BadData);
    }

    let value = BigUint::from_bytes_be(raw);
    if let Some(modulus) = modulus {
        if &value >= modulus {
            log::debug!("integer not reduced modulo its bound");
            return Err(Error::BadData);
        }
    }
    Ok(value)
}

/// Write one integer in the given framing.
pub fn write_bounded(w: &mut Writer, value: &BigUint, encoding: IntegerEncoding) -> Result<()> {
    let bytes = magnitude(value);
    let sign_byte = bytes.first().map_or(false, |b| b & 0x80 != 0);

    match encoding {
        IntegerEncoding::Der | IntegerEncoding::DerTagged(_) => {
            let tag = encoding.der_tag().ok_or(Error::Internal)?;
            if bytes.is_empty() {
                asn1::write_header(w, tag, 1)?;
                return w.write_byte(0);
            }
            asn1::write_header(w, tag, bytes.len() + usize::from(sign_byte))?;
            if sign_byte {
                w.write_byte(0)?;
            }
            w.write_bytes(&bytes)
        }
        IntegerEncoding::Ssh => {
            let len = u32::try_from(bytes.len() + usize::from(sign_byte))
                .map_err(|_| Error::Overflow)?;
            w.write_u32(len)?;
            if sign_byte {
                w.write_byte(0)?;
            }
            w.write_bytes(&bytes)
        }
        IntegerEncoding::Ssl => {
            let len = u16::try_from(bytes.len()).map_err(|_| Error::Overflow)?;
            w.write_u16(len)?;
            w.write_bytes(&bytes)
        }
        IntegerEncoding::Pgp => {
            let bits = u16::try_from(value.bits()).map_err(|_| Error::Overflow)?;
            w.write_u16(bits)?;
            w.write_bytes(&bytes)
        }
    }
}

/// Number of bytes [`write_bounded`] emits for `value`.
pub fn encoded_len(value: &BigUint, encoding: IntegerEncoding) -> usize {
    let len = (value.bits() + 7) / 8;
    let sign_byte = usize::from(value.bits() % 8 == 0 && len > 0);
    match encoding {
        IntegerEncoding::Der | IntegerEncoding::DerTagged(_) => {
            let content = (len + sign_byte).max(1);
            let length_field = match content {
                0..=0x7f => 1,
                0x80..=0xff => 2,
                0x100..=0xffff => 3,
                _ => 4,
            };
            1 + length_field + content
        }
        IntegerEncoding::Ssh => 4 + len + sign_byte,
        IntegerEncoding::Ssl | IntegerEncoding::Pgp => 2 + len,
    }
}

/// Bit length of a big-endian magnitude, counting from its first non-zero bit.
fn significant_bits(raw: &[u8]) -> usize {
    match raw.first() {
        None => 0,
        Some(&first) => (raw.len() - 1) * 8 + (8 - first.leading_zeros() as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const SMALL: Bounds = Bounds::new(2, 4);

    fn roundtrip(value: &BigUint, encoding: IntegerEncoding) -> BigUint {
        let mut w = Writer::new();
        write_bounded(&mut w, value, encoding).unwrap();
        assert_eq!(w.len(), encoded_len(value, encoding));
        let encoded = w.into_vec();
        let mut r = Reader::new(&encoded);
        let decoded = read_bounded(&mut r, encoding, Bounds::new(0, 8), None).unwrap();
        assert!(r.finish().is_ok());
        decoded
    }

    #[test]
    fn test_encodings_roundtrip() {
        for value in [0u64, 1, 0x7f, 0x80, 0xff_ff, 0x0100_0000_0000] {
            let value = BigUint::from(value);
            for encoding in [
                IntegerEncoding::Der,
                IntegerEncoding::DerTagged(3),
                IntegerEncoding::Ssh,
                IntegerEncoding::Ssl,
                IntegerEncoding::Pgp,
            ] {
                assert_eq!(roundtrip(&value, encoding), value, "{encoding:?}");
            }
        }
    }

    #[test]
    fn test_wire_forms() {
        let value = BigUint::from(0x80_01u32);
        let mut w = Writer::new();
        write_bounded(&mut w, &value, IntegerEncoding::Der).unwrap();
        write_bounded(&mut w, &value, IntegerEncoding::Ssh).unwrap();
        write_bounded(&mut w, &value, IntegerEncoding::Ssl).unwrap();
        write_bounded(&mut w, &value, IntegerEncoding::Pgp).unwrap();
        assert_eq!(
            w.into_vec(),
            hex!("0203008001 00000003008001 00028001 00108001")
        );
    }

    #[test]
    fn test_length_bounds() {
        // One byte short of the minimum.
        let mut r = Reader::new(&hex!("020105"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Der, SMALL, None),
            Err(Error::BadData)
        );

        // Exactly the minimum and the maximum.
        let mut r = Reader::new(&hex!("02020105"));
        assert!(read_bounded(&mut r, IntegerEncoding::Der, SMALL, None).is_ok());
        let mut r = Reader::new(&hex!("020401020304"));
        assert!(read_bounded(&mut r, IntegerEncoding::Der, SMALL, None).is_ok());

        // Sign padding doesn't count towards the length.
        let mut r = Reader::new(&hex!("02050080020304"));
        assert!(read_bounded(&mut r, IntegerEncoding::Der, SMALL, None).is_ok());

        // One byte over.
        let mut r = Reader::new(&hex!("02050102030405"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Der, SMALL, None),
            Err(Error::BadData)
        );
    }

    #[test]
    fn test_modulus_bound() {
        let modulus = BigUint::from(0x0105u32);
        let mut r = Reader::new(&hex!("00020104"));
        assert!(read_bounded(&mut r, IntegerEncoding::Ssl, SMALL, Some(&modulus)).is_ok());
        let mut r = Reader::new(&hex!("00020105"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Ssl, SMALL, Some(&modulus)),
            Err(Error::BadData)
        );
    }

    #[test]
    fn test_negative_values_rejected() {
        let mut r = Reader::new(&hex!("02028001"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Der, SMALL, None),
            Err(Error::BadData)
        );
        let mut r = Reader::new(&hex!("000000028001"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Ssh, SMALL, None),
            Err(Error::BadData)
        );
    }

    #[test]
    fn test_mpi_bit_count_must_match() {
        let mut r = Reader::new(&hex!("000f8001"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Pgp, SMALL, None),
            Err(Error::BadData)
        );
        let mut r = Reader::new(&hex!("001080"));
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::Pgp, SMALL, None),
            Err(Error::Underflow)
        );
    }

    #[test]
    fn test_wrong_context_tag() {
        let mut w = Writer::new();
        write_bounded(&mut w, &BigUint::from(0x0102u32), IntegerEncoding::DerTagged(4)).unwrap();
        let encoded = w.into_vec();
        assert_eq!(encoded, hex!("84020102"));
        let mut r = Reader::new(&encoded);
        assert_eq!(
            read_bounded(&mut r, IntegerEncoding::DerTagged(3), SMALL, None),
            Err(Error::BadData)
        );
    }
}
