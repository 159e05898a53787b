//! DSA and ECDSA signature values.
//!
//! The `(r, s)` pair is carried as an ASN.1 SEQUENCE, as two PGP MPIs, or
//! in SSH form. SSH is the odd one out: DSA signatures there are a fixed
//! 40-byte blob of two 20-byte values, ECDSA signatures two `mpint`s.

use alloc::vec::Vec;
use num_bigint::BigUint;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithm::Family;
use crate::asn1;
use crate::bounded::{check_bounded, read_bounded, write_bounded, IntegerEncoding};
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::internals::left_pad;
use crate::params::{self, Bounds};

/// Size of each half of an SSH DSA signature.
const SSH_DLP_VALUE_SIZE: usize = 20;

/// Signature value encodings.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SignatureFormat {
    /// `SEQUENCE { INTEGER r, INTEGER s }`.
    Asn1,
    /// Two MPIs.
    Pgp,
    /// SSH signature blob contents.
    Ssh,
}

/// A DSA or ECDSA signature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DlSignature {
    /// `r`
    pub r: BigUint,
    /// `s`
    pub s: BigUint,
}

fn bounds(family: Family) -> Result<Bounds> {
    match family {
        Family::Dlp => Ok(params::DLP_SIG),
        Family::Ecc => Ok(params::ECC_SIG),
        Family::Rsa => Err(Error::NotAvailable),
    }
}

/// Encode `sig` for a key of `family`.
pub fn encode(sig: &DlSignature, format: SignatureFormat, family: Family) -> Result<Vec<u8>> {
    bounds(family)?;
    let mut w = Writer::new();

    match (format, family) {
        (SignatureFormat::Asn1, _) => asn1::write_sequence(&mut w, |w| {
            write_bounded(w, &sig.r, IntegerEncoding::Der)?;
            write_bounded(w, &sig.s, IntegerEncoding::Der)
        })?,
        (SignatureFormat::Pgp, _) => {
            write_bounded(&mut w, &sig.r, IntegerEncoding::Pgp)?;
            write_bounded(&mut w, &sig.s, IntegerEncoding::Pgp)?;
        }
        (SignatureFormat::Ssh, Family::Dlp) => {
            w.write_bytes(&left_pad(&sig.r.to_bytes_be(), SSH_DLP_VALUE_SIZE)?)?;
            w.write_bytes(&left_pad(&sig.s.to_bytes_be(), SSH_DLP_VALUE_SIZE)?)?;
        }
        (SignatureFormat::Ssh, _) => {
            write_bounded(&mut w, &sig.r, IntegerEncoding::Ssh)?;
            write_bounded(&mut w, &sig.s, IntegerEncoding::Ssh)?;
        }
    }
    Ok(w.into_vec())
}

/// Decode a signature for a key of `family`. Both values must be non-zero
/// and smaller than `max_range`, the subgroup or curve order.
pub fn decode(
    data: &[u8],
    max_range: &BigUint,
    format: SignatureFormat,
    family: Family,
) -> Result<DlSignature> {
    let bounds = bounds(family)?;
    let mut r = Reader::new(data);

    let sig = match (format, family) {
        (SignatureFormat::Asn1, _) => {
            let mut seq = asn1::read_sequence(&mut r)?;
            let r_value = read_bounded(&mut seq, IntegerEncoding::Der, bounds, Some(max_range))?;
            let s_value = read_bounded(&mut seq, IntegerEncoding::Der, bounds, Some(max_range))?;
            seq.finish()?;
            DlSignature {
                r: r_value,
                s: s_value,
            }
        }
        (SignatureFormat::Pgp, _) => DlSignature {
            r: read_bounded(&mut r, IntegerEncoding::Pgp, bounds, Some(max_range))?,
            s: read_bounded(&mut r, IntegerEncoding::Pgp, bounds, Some(max_range))?,
        },
        (SignatureFormat::Ssh, Family::Dlp) => {
            if data.len() != SSH_DLP_VALUE_SIZE * 2 {
                log::debug!("SSH DSA signature is {} bytes", data.len());
                return Err(Error::BadData);
            }
            DlSignature {
                r: check_bounded(r.read_bytes(SSH_DLP_VALUE_SIZE)?, bounds, Some(max_range))?,
                s: check_bounded(r.read_bytes(SSH_DLP_VALUE_SIZE)?, bounds, Some(max_range))?,
            }
        }
        (SignatureFormat::Ssh, _) => DlSignature {
            r: read_bounded(&mut r, IntegerEncoding::Ssh, bounds, Some(max_range))?,
            s: read_bounded(&mut r, IntegerEncoding::Ssh, bounds, Some(max_range))?,
        },
    };
    r.finish()?;
    Ok(sig)
}
