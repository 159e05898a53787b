//! ECDSA and ECDH private keys: the secret scalar `d`.

use crate::algorithm::{ActionPermissions, Algorithm, WireFormat};
use crate::bounded::{read_bounded, write_bounded, IntegerEncoding};
use crate::context::EccCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, EccPrivate, PrivateKey, PrivateKeyMaterial, PublicKey};
use crate::params;
use crate::private::{require_public, PrivateKeyCodec};

impl PrivateKeyCodec for EccCodec {
    fn read_private(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        public: Option<&PublicKey>,
        format: WireFormat,
    ) -> Result<Decoded<PrivateKey>> {
        let encoding = match format {
            WireFormat::Pkcs8Current => IntegerEncoding::Der,
            WireFormat::Pgp => IntegerEncoding::Pgp,
            _ => return Err(Error::NotAvailable),
        };
        let public = require_public(public, expected)?;
        let d = read_bounded(r, encoding, params::ECC_D, None)?;

        Ok(Decoded {
            value: PrivateKey::new(public.clone(), PrivateKeyMaterial::Ecc(EccPrivate { d }))?,
            permissions: ActionPermissions::for_algorithm(expected),
        })
    }

    fn write_private(
        &self,
        w: &mut Writer,
        key: &PrivateKey,
        format: WireFormat,
        _permissions: ActionPermissions,
    ) -> Result<()> {
        let d = &key.material().as_ecc()?.d;

        match format {
            WireFormat::Pkcs8Current => write_bounded(w, d, IntegerEncoding::Der),
            WireFormat::Pgp => write_bounded(w, d, IntegerEncoding::Pgp),
            _ => Err(Error::NotAvailable),
        }
    }
}
