//! ECDSA and ECDH public keys on named curves.

use alloc::vec::Vec;
use num_bigint::BigUint;
use pkcs8::ObjectIdentifier;
use zeroize::Zeroizing;

use crate::algorithm::{pgp_id, ActionPermissions, Algorithm, Permission, WireFormat};
use crate::asn1;
use crate::bounded::{read_bounded, write_bounded, IntegerEncoding};
use crate::context::EccCodec;
use crate::curve::{decode_point, encode_point, CurveId};
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, EccPoint, EccPublic, PublicKey, PublicKeyMaterial};
use crate::params;
use crate::public::{
    is_explicit_params, read_pgp_header, read_spki, read_ssh_blob, read_ssh_string,
    write_pgp_header, write_spki, write_ssh_blob, write_ssh_string, PublicKeyCodec,
};

/// TLS `ECCurveType.named_curve`.
const SSL_NAMED_CURVE: u8 = 0x03;

/// Longest OID body accepted in a PGP key packet.
const MAX_PGP_OID: usize = 10;

fn permissions(algorithm: Algorithm) -> ActionPermissions {
    match algorithm {
        Algorithm::Ecdh => ActionPermissions::crypt(Permission::InternalOnly),
        _ => ActionPermissions::sign(Permission::InternalOnly),
    }
}

fn key(algorithm: Algorithm, curve: CurveId, point: Option<EccPoint>) -> Result<PublicKey> {
    PublicKey::new(algorithm, PublicKeyMaterial::Ecc(EccPublic { curve, point }))
}

fn read_point(curve: CurveId, data: &[u8]) -> Result<EccPoint> {
    if !params::ECC_POINT.contains(data.len()) {
        log::debug!("encoded point length {} out of range", data.len());
        return Err(Error::BadData);
    }
    decode_point(curve, data)
}

fn point_bytes(curve: CurveId, point: &EccPoint) -> Result<Zeroizing<Vec<u8>>> {
    let mut w = Writer::new();
    encode_point(curve, point, &mut w)?;
    Ok(w.into_secret())
}

/// `ecdsa-sha2-` or `ecdh-sha2-`.
fn ssh_prefix(algorithm: Algorithm) -> &'static [u8] {
    match algorithm {
        Algorithm::Ecdh => b"ecdh-sha2-",
        _ => b"ecdsa-sha2-",
    }
}

impl PublicKeyCodec for EccCodec {
    fn read_public(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        format: WireFormat,
    ) -> Result<Decoded<PublicKey>> {
        match format {
            WireFormat::X509 => {
                let mut spki = read_spki(r, expected)?;
                if is_explicit_params(&spki.params) {
                    log::debug!("explicit curve parameters aren't supported");
                    return Err(Error::NotAvailable);
                }
                let curve = CurveId::from_oid(&asn1::read_oid(&mut spki.params)?)?;
                let encoded = spki.key.read_bytes(spki.key.remaining())?;
                let point = read_point(curve, encoded)?;
                spki.finish()?;

                Ok(Decoded {
                    value: key(spki.algorithm, curve, Some(point))?,
                    permissions: permissions(spki.algorithm),
                })
            }
            WireFormat::Ssh2 => {
                let mut blob = read_ssh_blob(r)?;
                let name = read_ssh_string(&mut blob, 64)?;
                if name.len() < 18 || !name.starts_with(ssh_prefix(expected)) {
                    log::debug!("SSH key blob type doesn't match {expected:?}");
                    return Err(Error::BadData);
                }
                let curve_name = read_ssh_string(&mut blob, 64)?;
                if curve_name.len() != 8 {
                    return Err(Error::NotAvailable);
                }
                let curve = CurveId::from_ssh_name(curve_name)?;
                if &name[ssh_prefix(expected).len()..] != curve_name {
                    log::debug!("SSH key type names a different curve than {curve:?}");
                    return Err(Error::BadData);
                }
                let encoded = read_ssh_string(&mut blob, params::ECC_POINT.max)?;
                let point = read_point(curve, encoded)?;
                blob.finish()?;

                let permissions = match expected {
                    Algorithm::Ecdh => ActionPermissions::crypt(Permission::InternalOnly),
                    _ => ActionPermissions {
                        sig_check: Permission::InternalOnly,
                        ..ActionPermissions::NONE
                    },
                };
                Ok(Decoded {
                    value: key(expected, curve, Some(point))?,
                    permissions,
                })
            }
            WireFormat::SslLegacy | WireFormat::SslExtended => {
                if expected != Algorithm::Ecdh {
                    return Err(Error::NotAvailable);
                }
                if r.read_byte()? != SSL_NAMED_CURVE {
                    log::debug!("SSL ECC parameters don't use a named curve");
                    return Err(Error::BadData);
                }
                let curve = CurveId::from_ssl_id(r.read_u16()?)?;

                Ok(Decoded {
                    value: key(expected, curve, None)?,
                    permissions: ActionPermissions::crypt(Permission::InternalOnly),
                })
            }
            WireFormat::Pgp => {
                let header = read_pgp_header(r)?;
                if !header.is_open_pgp() {
                    log::debug!("ECC keys need an OpenPGP key packet");
                    return Err(Error::BadData);
                }
                let wanted = match expected {
                    Algorithm::Ecdh => pgp_id::ECDH,
                    _ => pgp_id::ECDSA,
                };
                if header.algorithm != wanted {
                    log::debug!("PGP algorithm {} doesn't match {expected:?}", header.algorithm);
                    return Err(Error::BadData);
                }

                let oid_len = usize::from(r.read_byte()?);
                if oid_len == 0 || oid_len > MAX_PGP_OID {
                    return Err(Error::BadData);
                }
                let oid = ObjectIdentifier::from_bytes(r.read_bytes(oid_len)?)?;
                let curve = CurveId::from_oid(&oid)?;

                let encoded = read_bounded(r, IntegerEncoding::Pgp, params::ECC_POINT, None)?;
                let point = read_point(curve, &Zeroizing::new(encoded.to_bytes_be()))?;

                if expected == Algorithm::Ecdh {
                    let kdf_len = r.read_byte()?;
                    let reserved = r.read_byte()?;
                    let hash = r.read_byte()?;
                    let cipher = r.read_byte()?;
                    if kdf_len != 3
                        || reserved != 1
                        || !(8..=10).contains(&hash)
                        || !(7..=9).contains(&cipher)
                    {
                        log::debug!("unsupported ECDH KDF parameters");
                        return Err(Error::BadData);
                    }
                }

                Ok(Decoded {
                    value: key(expected, curve, Some(point))?
                        .with_creation_time(header.creation_time)
                        .with_pgp_algorithm(header.algorithm),
                    permissions: permissions(expected),
                })
            }
            _ => Err(Error::NotAvailable),
        }
    }

    fn write_public(&self, w: &mut Writer, key: &PublicKey, format: WireFormat) -> Result<()> {
        let ecc = key.material().as_ecc()?;
        let algorithm = key.algorithm();
        let curve = ecc.curve;

        match format {
            WireFormat::SslLegacy | WireFormat::SslExtended => {
                if algorithm != Algorithm::Ecdh {
                    return Err(Error::NotAvailable);
                }
                w.write_byte(SSL_NAMED_CURVE)?;
                w.write_u16(curve.ssl_id())
            }
            WireFormat::X509 | WireFormat::Ssh2 | WireFormat::Pgp => {
                let point = ecc.point.as_ref().ok_or(Error::NotAvailable)?;
                let encoded = point_bytes(curve, point)?;

                match format {
                    WireFormat::X509 => write_spki(
                        w,
                        algorithm,
                        |w| asn1::write_oid(w, &curve.oid()),
                        |w| w.write_bytes(&encoded),
                    ),
                    WireFormat::Ssh2 => {
                        let name = curve.ssh_name().ok_or_else(|| {
                            log::debug!("{curve:?} has no SSH name");
                            Error::NotAvailable
                        })?;
                        write_ssh_blob(w, |w| {
                            let mut algorithm_name = ssh_prefix(algorithm).to_vec();
                            algorithm_name.extend_from_slice(name.as_bytes());
                            write_ssh_string(w, &algorithm_name)?;
                            write_ssh_string(w, name.as_bytes())?;
                            write_ssh_string(w, &encoded)
                        })
                    }
                    _ => {
                        let pgp_algorithm = match algorithm {
                            Algorithm::Ecdh => pgp_id::ECDH,
                            _ => pgp_id::ECDSA,
                        };
                        write_pgp_header(w, key.creation_time(), pgp_algorithm)?;
                        let oid = curve.oid();
                        let oid = oid.as_bytes();
                        w.write_byte(u8::try_from(oid.len()).map_err(|_| Error::Internal)?)?;
                        w.write_bytes(oid)?;
                        write_bounded(w, &BigUint::from_bytes_be(&encoded), IntegerEncoding::Pgp)?;
                        if algorithm == Algorithm::Ecdh {
                            let (hash, cipher) = curve.pgp_kdf_params();
                            w.write_bytes(&[3, 1, hash, cipher])?;
                        }
                        Ok(())
                    }
                }
            }
            _ => Err(Error::NotAvailable),
        }
    }
}
