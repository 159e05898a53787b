//! Key identifiers.
//!
//! Three fingerprints are derived from a public key:
//!
//! - `cryptlib_id`: SHA-1 of the key's `SubjectPublicKeyInfo`.
//! - `pgp2_id`: the low 64 bits of an RSA modulus, as PGP 2 used.
//! - `openpgp_id`: the low 64 bits of the OpenPGP v4 fingerprint.

use digest::Digest;
use sha1::Sha1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::algorithm::{Algorithm, WireFormat};
use crate::context::FamilyCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::internals::left_pad;
use crate::key::{PublicKey, PublicKeyParts};
use crate::public::{dlp::write_reduced_spki, spki_algorithm};

/// Length of a cryptlib key ID.
pub const CRYPTLIB_ID_SIZE: usize = 20;

/// Length of a PGP key ID.
pub const PGP_ID_SIZE: usize = 8;

/// CTB for a public-key packet with a two-byte length.
const PGP_FINGERPRINT_CTB: u8 = 0x99;

/// Identifiers used to look a key up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeyIdentifiers {
    /// SHA-1 of the `SubjectPublicKeyInfo`.
    pub cryptlib_id: [u8; CRYPTLIB_ID_SIZE],
    /// Low 64 bits of the modulus, RSA only.
    pub pgp2_id: Option<[u8; PGP_ID_SIZE]>,
    /// Low 64 bits of the OpenPGP fingerprint. DH keys have no PGP form.
    pub openpgp_id: Option<[u8; PGP_ID_SIZE]>,
}

impl KeyIdentifiers {
    /// Derive all identifiers of `key`.
    pub fn for_key(key: &PublicKey) -> Result<Self> {
        Ok(Self {
            cryptlib_id: cryptlib_id(key)?,
            pgp2_id: pgp2_id(key)?,
            openpgp_id: openpgp_id(key)?,
        })
    }

    /// Derive identifiers from an encoded `SubjectPublicKeyInfo`.
    ///
    /// The PGP identifiers depend on the key's PGP creation time, which
    /// the SPKI doesn't carry.
    pub fn from_spki(der: &[u8], creation_time: u32) -> Result<Self> {
        let algorithm = spki_algorithm(der)?;
        let mut r = Reader::new(der);
        let key = FamilyCodec::for_algorithm(algorithm)
            .read_public(&mut r, algorithm, WireFormat::X509)?
            .value;
        r.finish()?;
        Self::for_key(&key.with_creation_time(creation_time))
    }
}

/// SHA-1 of the key's `SubjectPublicKeyInfo`. DLP keys without `q` or `y`
/// use a reduced encoding that leaves them out.
pub fn cryptlib_id(key: &PublicKey) -> Result<[u8; CRYPTLIB_ID_SIZE]> {
    let mut w = Writer::new();
    let reduced = match key.material().as_dlp() {
        Ok(dlp) => dlp.q.is_none() || dlp.y.is_none(),
        Err(_) => false,
    };
    if reduced {
        write_reduced_spki(&mut w, key)?;
    } else {
        FamilyCodec::for_algorithm(key.algorithm()).write_public(&mut w, key, WireFormat::X509)?;
    }
    Ok(Sha1::digest(w.as_slice()).into())
}

/// Low 64 bits of the modulus of an RSA key.
pub fn pgp2_id(key: &PublicKey) -> Result<Option<[u8; PGP_ID_SIZE]>> {
    let Ok(rsa) = key.material().as_rsa() else {
        return Ok(None);
    };
    let n = left_pad(&rsa.n().to_bytes_be(), rsa.size().max(PGP_ID_SIZE))?;
    let mut id = [0u8; PGP_ID_SIZE];
    id.copy_from_slice(&n[n.len() - PGP_ID_SIZE..]);
    Ok(Some(id))
}

/// Low 64 bits of SHA-1 over the v4 public-key packet, `0x99 || len || body`.
pub fn openpgp_id(key: &PublicKey) -> Result<Option<[u8; PGP_ID_SIZE]>> {
    if key.algorithm() == Algorithm::Dh {
        return Ok(None);
    }

    let mut body = Writer::new();
    FamilyCodec::for_algorithm(key.algorithm()).write_public(&mut body, key, WireFormat::Pgp)?;
    let len = u16::try_from(body.len()).map_err(|_| Error::Overflow)?;

    let mut hasher = Sha1::new();
    hasher.update([PGP_FINGERPRINT_CTB]);
    hasher.update(len.to_be_bytes());
    hasher.update(body.as_slice());
    let fingerprint = hasher.finalize();

    let mut id = [0u8; PGP_ID_SIZE];
    id.copy_from_slice(&fingerprint[fingerprint.len() - PGP_ID_SIZE..]);
    Ok(Some(id))
}
