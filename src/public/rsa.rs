//! RSA public keys: `n` and `e`.

use num_bigint::BigUint;

use crate::algorithm::{pgp_id, ActionPermissions, Algorithm, Permission, WireFormat};
use crate::asn1;
use crate::bounded::{read_bounded, write_bounded, IntegerEncoding};
use crate::context::RsaCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, PublicKey, PublicKeyMaterial, PublicKeyParts, RsaPublic};
use crate::params::{self, MAX_PKCSIZE, MIN_PKCSIZE};
use crate::public::{
    read_pgp_header, read_spki, read_ssh_blob, read_ssh_string, write_pgp_header, write_spki,
    write_ssh_blob, write_ssh_string, PublicKeyCodec,
};

const SSH_NAME: &[u8] = b"ssh-rsa";

pub(crate) fn key(n: BigUint, e: BigUint) -> Result<PublicKey> {
    if e >= n {
        log::debug!("RSA public exponent not smaller than the modulus");
        return Err(Error::BadData);
    }
    PublicKey::new(Algorithm::Rsa, PublicKeyMaterial::Rsa(RsaPublic { n, e }))
}

/// Permissions for a PGP RSA key, by algorithm byte.
pub(crate) fn pgp_permissions(pgp_algorithm: u8) -> Result<ActionPermissions> {
    match pgp_algorithm {
        pgp_id::RSA => Ok(ActionPermissions::ALL),
        pgp_id::RSA_ENCRYPT_ONLY => Ok(ActionPermissions::crypt(Permission::InternalOnly)),
        pgp_id::RSA_SIGN_ONLY => Ok(ActionPermissions::sign(Permission::InternalOnly)),
        other => {
            log::debug!("PGP algorithm {other} isn't RSA");
            Err(Error::BadData)
        }
    }
}

impl PublicKeyCodec for RsaCodec {
    fn read_public(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        format: WireFormat,
    ) -> Result<Decoded<PublicKey>> {
        if expected != Algorithm::Rsa {
            return Err(Error::Internal);
        }

        match format {
            WireFormat::X509 => {
                let mut spki = read_spki(r, Algorithm::Rsa)?;
                asn1::read_optional_null(&mut spki.params)?;
                let mut seq = asn1::read_sequence(&mut spki.key)?;
                let n = read_bounded(&mut seq, IntegerEncoding::Der, params::RSA_N, None)?;
                let e = read_bounded(&mut seq, IntegerEncoding::Der, params::RSA_E, None)?;
                seq.finish()?;
                spki.finish()?;

                Ok(Decoded {
                    value: key(n, e)?,
                    permissions: ActionPermissions::ALL,
                })
            }
            WireFormat::Ssh2 => {
                let mut blob = read_ssh_blob(r)?;
                if read_ssh_string(&mut blob, 64)? != SSH_NAME {
                    log::debug!("SSH key blob isn't ssh-rsa");
                    return Err(Error::BadData);
                }
                let e = read_bounded(&mut blob, IntegerEncoding::Ssh, params::RSA_E, None)?;
                let n = read_bounded(&mut blob, IntegerEncoding::Ssh, params::RSA_N, None)?;
                blob.finish()?;

                Ok(Decoded {
                    value: key(n, e)?,
                    permissions: ActionPermissions {
                        sig_check: Permission::InternalOnly,
                        ..ActionPermissions::NONE
                    },
                })
            }
            WireFormat::Ssh1 => {
                let bits = r.read_u32()? as usize;
                if bits < MIN_PKCSIZE * 8 || bits > MAX_PKCSIZE * 8 {
                    log::debug!("SSHv1 key size {bits} out of range");
                    return Err(Error::BadData);
                }
                let e = read_bounded(r, IntegerEncoding::Pgp, params::RSA_E, None)?;
                let n = read_bounded(r, IntegerEncoding::Pgp, params::RSA_N, None)?;

                Ok(Decoded {
                    value: key(n, e)?,
                    permissions: ActionPermissions {
                        encrypt: Permission::InternalOnly,
                        ..ActionPermissions::NONE
                    },
                })
            }
            WireFormat::Pgp => {
                let header = read_pgp_header(r)?;
                let permissions = pgp_permissions(header.algorithm)?;
                let n = read_bounded(r, IntegerEncoding::Pgp, params::RSA_N, None)?;
                let e = read_bounded(r, IntegerEncoding::Pgp, params::RSA_E, Some(&n))?;

                Ok(Decoded {
                    value: key(n, e)?
                        .with_creation_time(header.creation_time)
                        .with_pgp_algorithm(header.algorithm),
                    permissions,
                })
            }
            _ => Err(Error::NotAvailable),
        }
    }

    fn write_public(&self, w: &mut Writer, key: &PublicKey, format: WireFormat) -> Result<()> {
        let rsa = key.material().as_rsa()?;

        match format {
            WireFormat::X509 => write_spki(w, Algorithm::Rsa, asn1::write_null, |w| {
                asn1::write_sequence(w, |w| {
                    write_bounded(w, rsa.n(), IntegerEncoding::Der)?;
                    write_bounded(w, rsa.e(), IntegerEncoding::Der)
                })
            }),
            WireFormat::Ssh2 => write_ssh_blob(w, |w| {
                write_ssh_string(w, SSH_NAME)?;
                write_bounded(w, rsa.e(), IntegerEncoding::Ssh)?;
                write_bounded(w, rsa.n(), IntegerEncoding::Ssh)
            }),
            WireFormat::Ssh1 => {
                w.write_u32(u32::try_from(rsa.n().bits()).map_err(|_| Error::Overflow)?)?;
                write_bounded(w, rsa.e(), IntegerEncoding::Pgp)?;
                write_bounded(w, rsa.n(), IntegerEncoding::Pgp)
            }
            WireFormat::Pgp => {
                let pgp_algorithm = match key.pgp_algorithm() {
                    Some(id @ (pgp_id::RSA | pgp_id::RSA_ENCRYPT_ONLY | pgp_id::RSA_SIGN_ONLY)) => id,
                    _ => pgp_id::RSA,
                };
                write_pgp_header(w, key.creation_time(), pgp_algorithm)?;
                write_bounded(w, rsa.n(), IntegerEncoding::Pgp)?;
                write_bounded(w, rsa.e(), IntegerEncoding::Pgp)
            }
            _ => Err(Error::NotAvailable),
        }
    }
}
