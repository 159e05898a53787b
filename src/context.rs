//! Per-family codec selection and the key context that holds a loaded key.

use alloc::vec::Vec;
use zeroize::Zeroizing;

use crate::algorithm::{ActionPermissions, Algorithm, Family, WireFormat};
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, PrivateKey, PublicKey};
use crate::keyid::KeyIdentifiers;
use crate::private::PrivateKeyCodec;
use crate::public::PublicKeyCodec;

/// Reads and writes both halves of one key family.
pub(crate) trait KeyCodec: PublicKeyCodec + PrivateKeyCodec {}

impl<T: PublicKeyCodec + PrivateKeyCodec> KeyCodec for T {}

/// RSA codec.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RsaCodec;

/// DSA, DH and Elgamal codec.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DlpCodec;

/// ECDSA and ECDH codec.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct EccCodec;

/// Codec for one key family, chosen once when a context is created.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FamilyCodec {
    /// RSA.
    Rsa(RsaCodec),
    /// DSA, DH, Elgamal.
    Dlp(DlpCodec),
    /// ECDSA, ECDH.
    Ecc(EccCodec),
}

impl FamilyCodec {
    /// The codec for `algorithm`'s family.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm.family() {
            Family::Rsa => FamilyCodec::Rsa(RsaCodec),
            Family::Dlp => FamilyCodec::Dlp(DlpCodec),
            Family::Ecc => FamilyCodec::Ecc(EccCodec),
        }
    }

    fn codec(&self) -> &dyn KeyCodec {
        match self {
            FamilyCodec::Rsa(codec) => codec,
            FamilyCodec::Dlp(codec) => codec,
            FamilyCodec::Ecc(codec) => codec,
        }
    }

    /// Read a public key, see [`KeyContext::read_public`].
    pub(crate) fn read_public(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        format: WireFormat,
    ) -> Result<Decoded<PublicKey>> {
        self.codec().read_public(r, expected, format)
    }

    pub(crate) fn write_public(
        &self,
        w: &mut Writer,
        key: &PublicKey,
        format: WireFormat,
    ) -> Result<()> {
        self.codec().write_public(w, key, format)
    }

    pub(crate) fn read_private(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        public: Option<&PublicKey>,
        format: WireFormat,
    ) -> Result<Decoded<PrivateKey>> {
        self.codec().read_private(r, expected, public, format)
    }

    pub(crate) fn write_private(
        &self,
        w: &mut Writer,
        key: &PrivateKey,
        format: WireFormat,
        permissions: ActionPermissions,
    ) -> Result<()> {
        self.codec().write_private(w, key, format, permissions)
    }
}

/// A key being loaded or written: the algorithm, its family codec, and
/// whatever public and private components are bound so far.
///
/// A failed read leaves the context as it was.
#[derive(Clone, Debug)]
pub struct KeyContext {
    algorithm: Algorithm,
    codec: FamilyCodec,
    public: Option<PublicKey>,
    private: Option<PrivateKey>,
    permissions: ActionPermissions,
}

impl KeyContext {
    /// Create an empty context for `algorithm`.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            codec: FamilyCodec::for_algorithm(algorithm),
            public: None,
            private: None,
            permissions: ActionPermissions::NONE,
        }
    }

    /// Create a context around an existing public key.
    pub fn from_public_key(key: PublicKey) -> Self {
        let mut context = Self::new(key.algorithm());
        context.permissions = ActionPermissions::for_algorithm(key.algorithm());
        context.public = Some(key);
        context
    }

    /// Create a context around an existing private key.
    pub fn from_private_key(key: PrivateKey) -> Self {
        let mut context = Self::from_public_key(key.public_key().clone());
        context.private = Some(key);
        context
    }

    /// Algorithm the context was created for. A key read from a format
    /// that doesn't say whether an ECC key is for ECDSA or ECDH keeps this.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// The codec selected for the algorithm's family.
    pub fn codec(&self) -> FamilyCodec {
        self.codec
    }

    /// Public key, once loaded.
    pub fn public_key(&self) -> Option<&PublicKey> {
        self.public.as_ref()
    }

    /// Private key, once loaded.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private.as_ref()
    }

    /// Permissions implied by the formats the key was read from.
    pub fn permissions(&self) -> ActionPermissions {
        self.permissions
    }

    /// Read a public key. Any private key already bound is dropped.
    pub fn read_public(&mut self, r: &mut Reader<'_>, format: WireFormat) -> Result<()> {
        let mut scratch = r.clone();
        let decoded = self.codec.read_public(&mut scratch, self.algorithm, format)?;
        *r = scratch;

        log::trace!("read {:?} public key from {format:?}", decoded.value.algorithm());
        self.algorithm = decoded.value.algorithm();
        self.public = Some(decoded.value);
        self.private = None;
        self.permissions = decoded.permissions;
        Ok(())
    }

    /// Read private components, reusing the public key already loaded if
    /// there is one. The permissions of a loaded public key can only be
    /// narrowed by the private read.
    pub fn read_private(&mut self, r: &mut Reader<'_>, format: WireFormat) -> Result<()> {
        let mut scratch = r.clone();
        let decoded =
            self.codec
                .read_private(&mut scratch, self.algorithm, self.public.as_ref(), format)?;
        *r = scratch;

        log::trace!("read {:?} private key from {format:?}", self.algorithm);
        self.permissions = match self.public {
            Some(_) => self.permissions.intersect(decoded.permissions),
            None => decoded.permissions,
        };
        self.public = Some(decoded.value.public_key().clone());
        self.private = Some(decoded.value);
        Ok(())
    }

    /// Write the public key.
    pub fn write_public(&self, w: &mut Writer, format: WireFormat) -> Result<()> {
        let key = self.public.as_ref().ok_or(Error::NotAvailable)?;
        self.codec.write_public(w, key, format)
    }

    /// Write the private key, recording the context's permissions where
    /// the format can carry them.
    pub fn write_private(&self, w: &mut Writer, format: WireFormat) -> Result<()> {
        let key = self.private.as_ref().ok_or(Error::NotAvailable)?;
        self.codec.write_private(w, key, format, self.permissions)
    }

    /// Encode the public key into a new buffer.
    pub fn public_key_bytes(&self, format: WireFormat) -> Result<Vec<u8>> {
        let mut w = Writer::new();
        self.write_public(&mut w, format)?;
        Ok(w.into_vec())
    }

    /// Encode the private key into a buffer that is wiped on drop.
    pub fn private_key_bytes(&self, format: WireFormat) -> Result<Zeroizing<Vec<u8>>> {
        let mut w = Writer::new();
        self.write_private(&mut w, format)?;
        Ok(w.into_secret())
    }

    /// Identifiers of the loaded public key.
    pub fn key_ids(&self) -> Result<KeyIdentifiers> {
        let key = self.public.as_ref().ok_or(Error::NotAvailable)?;
        KeyIdentifiers::for_key(key)
    }
}
