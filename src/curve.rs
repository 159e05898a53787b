//! Named elliptic curves.
//!
//! Only named curves are supported. Explicit curve parameters in any
//! format are rejected, so every lookup here is a fixed table.

use alloc::vec::Vec;
use const_oid::db::rfc5912;
use num_bigint::BigUint;
use pkcs8::ObjectIdentifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::cursor::Writer;
use crate::errors::{Error, Result};
use crate::internals::{byte_len, left_pad};
use crate::key::EccPoint;
use crate::params;

/// brainpoolP256r1.
pub const BRAINPOOL_P256_R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.7");
/// brainpoolP384r1.
pub const BRAINPOOL_P384_R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.11");
/// brainpoolP512r1.
pub const BRAINPOOL_P512_R1: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.36.3.3.2.8.1.1.13");

/// Named curves.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurveId {
    /// NIST P-256 / secp256r1.
    P256,
    /// NIST P-384 / secp384r1.
    P384,
    /// NIST P-521 / secp521r1.
    P521,
    /// brainpoolP256r1.
    BrainpoolP256,
    /// brainpoolP384r1.
    BrainpoolP384,
    /// brainpoolP512r1.
    BrainpoolP512,
}

const P256_P: &[u8] = b"ffffffff00000001000000000000000000000000ffffffffffffffffffffffff";
const P384_P: &[u8] = b"fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff";
const P521_P: &[u8] = b"01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff";
const BP256_P: &[u8] = b"a9fb57dba1eea9bc3e660a909d838d726e3bf623d52620282013481d1f6e5377";
const BP384_P: &[u8] = b"8cb91e82a3386d280f5d6f7e50e641df152f7109ed5456b412b1da197fb71123acd3a729901d1a71874700133107ec53";
const BP512_P: &[u8] = b"aadd9db8dbe9c48b3fd4e6ae33c9fc07cb308db3b3c9d20ed6639cca703308717d4d9b009bc66842aecda12ae6a380e62881ff2f2d82c68528aa6056583a48f3";

impl CurveId {
    /// Curve OID, as used in X.509 and (without tag and length) in OpenPGP.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            CurveId::P256 => rfc5912::SECP_256_R_1,
            CurveId::P384 => rfc5912::SECP_384_R_1,
            CurveId::P521 => rfc5912::SECP_521_R_1,
            CurveId::BrainpoolP256 => BRAINPOOL_P256_R1,
            CurveId::BrainpoolP384 => BRAINPOOL_P384_R1,
            CurveId::BrainpoolP512 => BRAINPOOL_P512_R1,
        }
    }

    /// Look up a curve by OID.
    pub fn from_oid(oid: &ObjectIdentifier) -> Result<Self> {
        match *oid {
            rfc5912::SECP_256_R_1 => Ok(CurveId::P256),
            rfc5912::SECP_384_R_1 => Ok(CurveId::P384),
            rfc5912::SECP_521_R_1 => Ok(CurveId::P521),
            BRAINPOOL_P256_R1 => Ok(CurveId::BrainpoolP256),
            BRAINPOOL_P384_R1 => Ok(CurveId::BrainpoolP384),
            BRAINPOOL_P512_R1 => Ok(CurveId::BrainpoolP512),
            _ => {
                log::debug!("unsupported curve {oid}");
                Err(Error::NotAvailable)
            }
        }
    }

    /// TLS `NamedCurve` value.
    pub fn ssl_id(self) -> u16 {
        match self {
            CurveId::P256 => 23,
            CurveId::P384 => 24,
            CurveId::P521 => 25,
            CurveId::BrainpoolP256 => 26,
            CurveId::BrainpoolP384 => 27,
            CurveId::BrainpoolP512 => 28,
        }
    }

    /// Look up a curve by TLS `NamedCurve` value.
    pub fn from_ssl_id(id: u16) -> Result<Self> {
        match id {
            23 => Ok(CurveId::P256),
            24 => Ok(CurveId::P384),
            25 => Ok(CurveId::P521),
            26 => Ok(CurveId::BrainpoolP256),
            27 => Ok(CurveId::BrainpoolP384),
            28 => Ok(CurveId::BrainpoolP512),
            _ => {
                log::debug!("unsupported TLS named curve {id}");
                Err(Error::NotAvailable)
            }
        }
    }

    /// SSH curve name. Brainpool curves have none.
    pub fn ssh_name(self) -> Option<&'static str> {
        match self {
            CurveId::P256 => Some("nistp256"),
            CurveId::P384 => Some("nistp384"),
            CurveId::P521 => Some("nistp521"),
            _ => None,
        }
    }

    /// Look up a curve by SSH name.
    pub fn from_ssh_name(name: &[u8]) -> Result<Self> {
        match name {
            b"nistp256" => Ok(CurveId::P256),
            b"nistp384" => Ok(CurveId::P384),
            b"nistp521" => Ok(CurveId::P521),
            _ => Err(Error::NotAvailable),
        }
    }

    /// Size of a field element in bytes.
    pub fn field_size(self) -> usize {
        match self {
            CurveId::P256 | CurveId::BrainpoolP256 => 32,
            CurveId::P384 | CurveId::BrainpoolP384 => 48,
            CurveId::P521 => 66,
            CurveId::BrainpoolP512 => 64,
        }
    }

    /// The field prime.
    pub fn field_prime(self) -> Result<BigUint> {
        let hex = match self {
            CurveId::P256 => P256_P,
            CurveId::P384 => P384_P,
            CurveId::P521 => P521_P,
            CurveId::BrainpoolP256 => BP256_P,
            CurveId::BrainpoolP384 => BP384_P,
            CurveId::BrainpoolP512 => BP512_P,
        };
        BigUint::parse_bytes(hex, 16).ok_or(Error::Internal)
    }

    /// OpenPGP ECDH KDF parameters: hash and key-wrap cipher IDs.
    pub(crate) fn pgp_kdf_params(self) -> (u8, u8) {
        // SHA2-256/AES-128, SHA2-384/AES-192, SHA2-512/AES-256
        match self.field_size() {
            0..=32 => (8, 7),
            33..=48 => (9, 8),
            _ => (10, 9),
        }
    }
}

/// Write an uncompressed point `0x04 || X || Y`.
pub fn encode_point(curve: CurveId, point: &EccPoint, w: &mut Writer) -> Result<()> {
    let size = curve.field_size();
    w.write_byte(0x04)?;
    w.write_bytes(&left_pad(&point.x.to_bytes_be(), size)?)?;
    w.write_bytes(&left_pad(&point.y.to_bytes_be(), size)?)
}

/// Encoded size of an uncompressed point on `curve`.
pub fn point_len(curve: CurveId) -> usize {
    1 + 2 * curve.field_size()
}

/// Parse an uncompressed point, checking both coordinates are field
/// elements.
pub fn decode_point(curve: CurveId, data: &[u8]) -> Result<EccPoint> {
    let size = curve.field_size();
    match data.first() {
        Some(0x04) => {}
        Some(0x02) | Some(0x03) => {
            log::debug!("compressed points aren't supported");
            return Err(Error::NotAvailable);
        }
        _ => return Err(Error::BadData),
    }
    if data.len() != point_len(curve) {
        log::debug!("point length {} doesn't match {curve:?}", data.len());
        return Err(Error::BadData);
    }

    let prime = curve.field_prime()?;
    let mut coordinates = Vec::with_capacity(2);
    for chunk in data[1..].chunks(size) {
        let value = BigUint::from_bytes_be(chunk);
        if !params::ECC_COORDINATE.contains(byte_len(&value)) || value >= prime {
            return Err(Error::BadData);
        }
        coordinates.push(value);
    }
    let y = coordinates.pop().ok_or(Error::Internal)?;
    let x = coordinates.pop().ok_or(Error::Internal)?;
    Ok(EccPoint { x, y })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [CurveId; 6] = [
        CurveId::P256,
        CurveId::P384,
        CurveId::P521,
        CurveId::BrainpoolP256,
        CurveId::BrainpoolP384,
        CurveId::BrainpoolP512,
    ];

    #[test]
    fn tables_are_consistent() {
        for curve in ALL {
            assert_eq!(CurveId::from_oid(&curve.oid()).unwrap(), curve);
            assert_eq!(CurveId::from_ssl_id(curve.ssl_id()).unwrap(), curve);
            if let Some(name) = curve.ssh_name() {
                assert_eq!(CurveId::from_ssh_name(name.as_bytes()).unwrap(), curve);
            }
            let prime = curve.field_prime().unwrap();
            assert_eq!(byte_len(&prime), curve.field_size());
        }
        assert_eq!(CurveId::from_ssl_id(22), Err(Error::NotAvailable));
        assert_eq!(CurveId::from_ssl_id(29), Err(Error::NotAvailable));
    }

    #[test]
    fn point_roundtrip() {
        let point = EccPoint {
            x: BigUint::from_bytes_be(&[0x11; 31]),
            y: BigUint::from_bytes_be(&[0x22; 32]),
        };
        let mut w = Writer::new();
        encode_point(CurveId::P256, &point, &mut w).unwrap();
        let encoded = w.into_vec();
        assert_eq!(encoded.len(), 65);
        assert_eq!(encoded[1], 0);
        assert_eq!(decode_point(CurveId::P256, &encoded).unwrap(), point);
    }

    #[test]
    fn point_outside_field_rejected() {
        let mut encoded = [0xffu8; 65];
        encoded[0] = 0x04;
        assert_eq!(decode_point(CurveId::P256, &encoded), Err(Error::BadData));

        encoded[0] = 0x02;
        assert_eq!(decode_point(CurveId::P256, &encoded[..33]), Err(Error::NotAvailable));
    }
}
