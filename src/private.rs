//! Private-key readers and writers, one module per key family.
//!
//! Private components are always read in the presence of whatever public
//! key has already been loaded for the same object. Values the public key
//! already supplies are reused rather than re-read, and values that are
//! range-checked against a public modulus or prime can't be read without
//! it.

pub(crate) mod dlp;
pub(crate) mod ecc;
pub(crate) mod rsa;

use crate::algorithm::{ActionPermissions, Algorithm, WireFormat};
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, PrivateKey, PublicKey};

/// Reads and writes the private half of one key family.
pub(crate) trait PrivateKeyCodec {
    /// Read private components encoded in `format`. `public` is the public
    /// key already bound to the object, if any.
    fn read_private(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        public: Option<&PublicKey>,
        format: WireFormat,
    ) -> Result<Decoded<PrivateKey>>;

    /// Write the private components of `key` in `format`. `permissions`
    /// are recorded by formats that can carry them.
    fn write_private(
        &self,
        w: &mut Writer,
        key: &PrivateKey,
        format: WireFormat,
        permissions: ActionPermissions,
    ) -> Result<()>;
}

/// The preloaded public key, which must be for `expected`.
pub(crate) fn require_public(public: Option<&PublicKey>, expected: Algorithm) -> Result<&PublicKey> {
    match public {
        Some(key) if key.algorithm() == expected => Ok(key),
        Some(key) => {
            log::debug!(
                "private key for {expected:?} doesn't match {:?} public key",
                key.algorithm()
            );
            Err(Error::BadData)
        }
        None => {
            log::debug!("{expected:?} private key needs its public key loaded first");
            Err(Error::NotAvailable)
        }
    }
}
