//! `spki` and `pkcs8` trait support.
//!
//! Public keys go through the X.509 codec and private keys through the
//! PKCS#8 `PrivateKeyInfo` layout, so the PEM and DER helpers of both
//! crates work on [`PublicKey`] and [`PrivateKey`].

use core::convert::TryFrom;
use pkcs8::{
    der::Encode,
    spki::{self, Document, EncodePublicKey, SubjectPublicKeyInfoRef},
    EncodePrivateKey, PrivateKeyInfo, SecretDocument,
};
use zeroize::Zeroizing;

use crate::algorithm::{ActionPermissions, Algorithm, WireFormat};
use crate::context::FamilyCodec;
use crate::cursor::{Reader, Writer};
use crate::key::{PrivateKey, PublicKey};

#[cfg(feature = "serde")]
use serdect::serde::{de, ser, Deserialize, Serialize};

fn algorithm(oid: pkcs8::ObjectIdentifier) -> spki::Result<Algorithm> {
    Algorithm::from_oid(&oid).ok_or(spki::Error::OidUnknown { oid })
}

impl TryFrom<SubjectPublicKeyInfoRef<'_>> for PublicKey {
    type Error = spki::Error;

    fn try_from(spki: SubjectPublicKeyInfoRef<'_>) -> spki::Result<Self> {
        let algorithm = algorithm(spki.algorithm.oid)?;
        let der = spki.to_der()?;

        let mut r = Reader::new(&der);
        let key = FamilyCodec::for_algorithm(algorithm)
            .read_public(&mut r, algorithm, WireFormat::X509)?
            .value;
        r.finish()?;
        Ok(key)
    }
}

impl EncodePublicKey for PublicKey {
    fn to_public_key_der(&self) -> spki::Result<Document> {
        let mut w = Writer::new();
        FamilyCodec::for_algorithm(self.algorithm()).write_public(&mut w, self, WireFormat::X509)?;
        Ok(Document::try_from(w.as_slice())?)
    }
}

impl TryFrom<PrivateKeyInfo<'_>> for PrivateKey {
    type Error = pkcs8::Error;

    fn try_from(info: PrivateKeyInfo<'_>) -> pkcs8::Result<Self> {
        let algorithm = algorithm(info.algorithm.oid)?;
        let der = Zeroizing::new(info.to_der()?);

        let mut r = Reader::new(&der);
        let key = FamilyCodec::for_algorithm(algorithm)
            .read_private(&mut r, algorithm, None, WireFormat::Pkcs8Legacy)
            .map_err(spki::Error::from)?
            .value;
        r.finish().map_err(spki::Error::from)?;
        Ok(key)
    }
}

impl EncodePrivateKey for PrivateKey {
    fn to_pkcs8_der(&self) -> pkcs8::Result<SecretDocument> {
        let algorithm = self.public_key().algorithm();
        let mut w = Writer::new();
        FamilyCodec::for_algorithm(algorithm)
            .write_private(
                &mut w,
                self,
                WireFormat::Pkcs8Legacy,
                ActionPermissions::for_algorithm(algorithm),
            )
            .map_err(spki::Error::from)?;
        Ok(SecretDocument::try_from(w.as_slice())?)
    }
}

#[cfg(feature = "serde")]
impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serdect::serde::Serializer,
    {
        let der = self.to_public_key_der().map_err(ser::Error::custom)?;
        serdect::slice::serialize_hex_lower_or_bin(&der.as_bytes(), serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serdect::serde::Deserializer<'de>,
    {
        use spki::DecodePublicKey;

        let der_bytes = serdect::slice::deserialize_hex_or_bin_vec(deserializer)?;
        Self::from_public_key_der(&der_bytes).map_err(de::Error::custom)
    }
}
