//! DSA, DH and Elgamal public keys.
//!
//! The three algorithms share `p, q, g, y` but disagree about which of
//! them each format carries and in which order.

use num_bigint::BigUint;

use crate::algorithm::{pgp_id, ActionPermissions, Algorithm, Permission, WireFormat};
use crate::asn1;
use crate::bounded::{read_bounded, write_bounded, IntegerEncoding};
use crate::context::DlpCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, DlpPublic, PublicKey, PublicKeyMaterial};
use crate::params;
use crate::public::{
    read_pgp_header, read_spki, read_ssh_blob, read_ssh_string, write_pgp_header, write_spki,
    write_ssh_blob, write_ssh_string, PublicKeyCodec,
};

const SSH_DSS: &[u8] = b"ssh-dss";
const SSH_DH: &[u8] = b"ssh-dh";

/// DLP keys are only ever used internally: DSA signs, DH and Elgamal
/// encrypt.
fn permissions(algorithm: Algorithm) -> ActionPermissions {
    match algorithm {
        Algorithm::Dsa => ActionPermissions::sign(Permission::InternalOnly),
        _ => ActionPermissions::crypt(Permission::InternalOnly),
    }
}

pub(crate) fn key(algorithm: Algorithm, dlp: DlpPublic) -> Result<PublicKey> {
    PublicKey::new(algorithm, PublicKeyMaterial::Dlp(dlp))
}

/// Read the `p, q, g` / `p, g, q` parameter SEQUENCE.
pub(crate) fn read_domain_params(
    r: &mut Reader<'_>,
    algorithm: Algorithm,
) -> Result<(BigUint, BigUint, BigUint)> {
    let mut seq = asn1::read_sequence(r)?;
    let p = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_P, None)?;
    let (q, g) = if algorithm.has_reversed_params() {
        let g = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_G, Some(&p))?;
        let q = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_Q, Some(&p))?;
        (q, g)
    } else {
        let q = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_Q, Some(&p))?;
        let g = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_G, Some(&p))?;
        (q, g)
    };
    if algorithm == Algorithm::Dh {
        // X9.42 j and validationParms
        while !seq.is_empty() {
            asn1::skip_object(&mut seq)?;
        }
    }
    seq.finish()?;
    Ok((p, q, g))
}

pub(crate) fn write_domain_params(
    w: &mut Writer,
    algorithm: Algorithm,
    p: &BigUint,
    q: &BigUint,
    g: &BigUint,
) -> Result<()> {
    asn1::write_sequence(w, |w| {
        write_bounded(w, p, IntegerEncoding::Der)?;
        if algorithm.has_reversed_params() {
            write_bounded(w, g, IntegerEncoding::Der)?;
            write_bounded(w, q, IntegerEncoding::Der)
        } else {
            write_bounded(w, q, IntegerEncoding::Der)?;
            write_bounded(w, g, IntegerEncoding::Der)
        }
    })
}

/// SubjectPublicKeyInfo for keys that can't be written as X.509 because
/// they lack `q` or `y`. Missing `q` is left out of the parameters and a
/// missing `y` is written as zero. Only used as key-ID input.
pub(crate) fn write_reduced_spki(w: &mut Writer, key: &PublicKey) -> Result<()> {
    let dlp = key.material().as_dlp()?;
    let algorithm = key.algorithm();
    let zero = BigUint::default();

    write_spki(
        w,
        algorithm,
        |w| {
            asn1::write_sequence(w, |w| {
                write_bounded(w, &dlp.p, IntegerEncoding::Der)?;
                match &dlp.q {
                    Some(q) if algorithm.has_reversed_params() => {
                        write_bounded(w, &dlp.g, IntegerEncoding::Der)?;
                        write_bounded(w, q, IntegerEncoding::Der)
                    }
                    Some(q) => {
                        write_bounded(w, q, IntegerEncoding::Der)?;
                        write_bounded(w, &dlp.g, IntegerEncoding::Der)
                    }
                    None => write_bounded(w, &dlp.g, IntegerEncoding::Der),
                }
            })
        },
        |w| write_bounded(w, dlp.y.as_ref().unwrap_or(&zero), IntegerEncoding::Der),
    )
}

/// Map a PGP algorithm byte onto the DLP algorithm the caller expects.
fn check_pgp_algorithm(expected: Algorithm, pgp_algorithm: u8) -> Result<()> {
    let matches = match expected {
        Algorithm::Dsa => pgp_algorithm == pgp_id::DSA,
        Algorithm::Elgamal => {
            pgp_algorithm == pgp_id::ELGAMAL || pgp_algorithm == pgp_id::ELGAMAL_SIGN
        }
        _ => return Err(Error::NotAvailable),
    };
    if !matches {
        log::debug!("PGP algorithm {pgp_algorithm} doesn't match {expected:?}");
        return Err(Error::BadData);
    }
    Ok(())
}

impl PublicKeyCodec for DlpCodec {
    fn read_public(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        format: WireFormat,
    ) -> Result<Decoded<PublicKey>> {
        match format {
            WireFormat::X509 => {
                let mut spki = read_spki(r, expected)?;
                let (p, q, g) = read_domain_params(&mut spki.params, expected)?;
                let y = read_bounded(&mut spki.key, IntegerEncoding::Der, params::DLP_Y, Some(&p))?;
                spki.finish()?;

                Ok(Decoded {
                    value: key(
                        expected,
                        DlpPublic {
                            p,
                            q: Some(q),
                            g,
                            y: Some(y),
                        },
                    )?,
                    permissions: permissions(expected),
                })
            }
            WireFormat::Ssh2 => {
                let mut blob = read_ssh_blob(r)?;
                let name = read_ssh_string(&mut blob, 64)?;
                let dlp = match expected {
                    Algorithm::Dsa if name == SSH_DSS => {
                        let p = read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_P, None)?;
                        let q =
                            read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_Q, Some(&p))?;
                        let g =
                            read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_G, Some(&p))?;
                        let y =
                            read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_Y, Some(&p))?;
                        DlpPublic {
                            p,
                            q: Some(q),
                            g,
                            y: Some(y),
                        }
                    }
                    Algorithm::Dh if name == SSH_DH => {
                        let p = read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_P, None)?;
                        let g =
                            read_bounded(&mut blob, IntegerEncoding::Ssh, params::DLP_G, Some(&p))?;
                        DlpPublic {
                            p,
                            q: None,
                            g,
                            y: None,
                        }
                    }
                    Algorithm::Dsa | Algorithm::Dh => {
                        log::debug!("SSH key blob type doesn't match {expected:?}");
                        return Err(Error::BadData);
                    }
                    _ => return Err(Error::NotAvailable),
                };
                blob.finish()?;

                let permissions = match expected {
                    Algorithm::Dsa => ActionPermissions {
                        sig_check: Permission::InternalOnly,
                        ..ActionPermissions::NONE
                    },
                    _ => ActionPermissions::crypt(Permission::InternalOnly),
                };
                Ok(Decoded {
                    value: key(expected, dlp)?,
                    permissions,
                })
            }
            WireFormat::SslLegacy | WireFormat::SslExtended => {
                if expected != Algorithm::Dh {
                    return Err(Error::NotAvailable);
                }
                let p = read_bounded(r, IntegerEncoding::Ssl, params::DLP_P, None)?;
                let q = if format == WireFormat::SslExtended {
                    Some(read_bounded(r, IntegerEncoding::Ssl, params::DLP_Q, Some(&p))?)
                } else {
                    None
                };
                let g = read_bounded(r, IntegerEncoding::Ssl, params::DLP_G, Some(&p))?;

                Ok(Decoded {
                    value: key(expected, DlpPublic { p, q, g, y: None })?,
                    permissions: ActionPermissions::crypt(Permission::InternalOnly),
                })
            }
            WireFormat::Pgp => {
                let header = read_pgp_header(r)?;
                if !header.is_open_pgp() {
                    log::debug!("DLP keys need an OpenPGP key packet");
                    return Err(Error::BadData);
                }
                check_pgp_algorithm(expected, header.algorithm)?;

                let p = read_bounded(r, IntegerEncoding::Pgp, params::DLP_P, None)?;
                let q = if expected == Algorithm::Dsa {
                    Some(read_bounded(r, IntegerEncoding::Pgp, params::DLP_Q, Some(&p))?)
                } else {
                    None
                };
                let g = read_bounded(r, IntegerEncoding::Pgp, params::DLP_G, Some(&p))?;
                let y = read_bounded(r, IntegerEncoding::Pgp, params::DLP_Y, Some(&p))?;

                Ok(Decoded {
                    value: key(expected, DlpPublic { p, q, g, y: Some(y) })?
                        .with_creation_time(header.creation_time)
                        .with_pgp_algorithm(header.algorithm),
                    permissions: permissions(expected),
                })
            }
            _ => Err(Error::NotAvailable),
        }
    }

    fn write_public(&self, w: &mut Writer, key: &PublicKey, format: WireFormat) -> Result<()> {
        let dlp = key.material().as_dlp()?;
        let algorithm = key.algorithm();

        match format {
            WireFormat::X509 => {
                let (Some(q), Some(y)) = (&dlp.q, &dlp.y) else {
                    log::debug!("can't write {algorithm:?} key without q and y as X.509");
                    return Err(Error::NotAvailable);
                };
                write_spki(
                    w,
                    algorithm,
                    |w| write_domain_params(w, algorithm, &dlp.p, q, &dlp.g),
                    |w| write_bounded(w, y, IntegerEncoding::Der),
                )
            }
            WireFormat::Ssh2 => match algorithm {
                Algorithm::Dsa => {
                    let (Some(q), Some(y)) = (&dlp.q, &dlp.y) else {
                        return Err(Error::NotAvailable);
                    };
                    write_ssh_blob(w, |w| {
                        write_ssh_string(w, SSH_DSS)?;
                        write_bounded(w, &dlp.p, IntegerEncoding::Ssh)?;
                        write_bounded(w, q, IntegerEncoding::Ssh)?;
                        write_bounded(w, &dlp.g, IntegerEncoding::Ssh)?;
                        write_bounded(w, y, IntegerEncoding::Ssh)
                    })
                }
                Algorithm::Dh => write_ssh_blob(w, |w| {
                    write_ssh_string(w, SSH_DH)?;
                    write_bounded(w, &dlp.p, IntegerEncoding::Ssh)?;
                    write_bounded(w, &dlp.g, IntegerEncoding::Ssh)
                }),
                _ => Err(Error::NotAvailable),
            },
            WireFormat::SslLegacy | WireFormat::SslExtended => {
                if algorithm != Algorithm::Dh {
                    return Err(Error::NotAvailable);
                }
                write_bounded(w, &dlp.p, IntegerEncoding::Ssl)?;
                if format == WireFormat::SslExtended {
                    let q = dlp.q.as_ref().ok_or(Error::NotAvailable)?;
                    write_bounded(w, q, IntegerEncoding::Ssl)?;
                }
                write_bounded(w, &dlp.g, IntegerEncoding::Ssl)
            }
            WireFormat::Pgp => {
                let y = dlp.y.as_ref().ok_or(Error::NotAvailable)?;
                let pgp_algorithm = match algorithm {
                    Algorithm::Dsa => pgp_id::DSA,
                    Algorithm::Elgamal => match key.pgp_algorithm() {
                        Some(pgp_id::ELGAMAL_SIGN) => pgp_id::ELGAMAL_SIGN,
                        _ => pgp_id::ELGAMAL,
                    },
                    _ => return Err(Error::NotAvailable),
                };
                write_pgp_header(w, key.creation_time(), pgp_algorithm)?;
                write_bounded(w, &dlp.p, IntegerEncoding::Pgp)?;
                if algorithm == Algorithm::Dsa {
                    let q = dlp.q.as_ref().ok_or(Error::NotAvailable)?;
                    write_bounded(w, q, IntegerEncoding::Pgp)?;
                }
                write_bounded(w, &dlp.g, IntegerEncoding::Pgp)?;
                write_bounded(w, y, IntegerEncoding::Pgp)
            }
            _ => Err(Error::NotAvailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::public::spki_algorithm;

    fn test_params() -> DlpPublic {
        let mut p = [0xd7u8; 128];
        p[127] = 0x0b;
        DlpPublic {
            p: BigUint::from_bytes_be(&p),
            q: Some(BigUint::from_bytes_be(&[0x9b; 20])),
            g: BigUint::from(2u32),
            y: Some(BigUint::from_bytes_be(&[0x5a; 127])),
        }
    }

    fn roundtrip(algorithm: Algorithm, dlp: DlpPublic, format: WireFormat) -> Decoded<PublicKey> {
        let key = key(algorithm, dlp).unwrap();
        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &key, format).unwrap();
        let encoded = w.into_vec();
        let mut r = Reader::new(&encoded);
        let decoded = DlpCodec.read_public(&mut r, algorithm, format).unwrap();
        assert!(r.is_empty());
        assert_eq!(decoded.value.material(), key.material(), "{algorithm:?} {format:?}");
        decoded
    }

    #[test]
    fn test_x509_parameter_order() {
        let dsa = key(Algorithm::Dsa, test_params()).unwrap();
        let dh = key(Algorithm::Dh, test_params()).unwrap();

        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &dsa, WireFormat::X509).unwrap();
        let dsa_der = w.into_vec();
        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &dh, WireFormat::X509).unwrap();
        let dh_der = w.into_vec();

        // The INTEGER following p is q (20 bytes) for DSA and g (1 byte)
        // for DH.
        let q_bytes = [0x02, 0x15, 0x00, 0x9b];
        let g_bytes = [0x02, 0x01, 0x02];
        let find = |haystack: &[u8], needle: &[u8]| {
            haystack.windows(needle.len()).position(|w| w == needle)
        };
        assert!(find(&dsa_der, &q_bytes).unwrap() < find(&dsa_der, &g_bytes).unwrap());
        assert!(find(&dh_der, &g_bytes).unwrap() < find(&dh_der, &q_bytes).unwrap());

        assert_eq!(spki_algorithm(&dsa_der).unwrap(), Algorithm::Dsa);
        assert_eq!(spki_algorithm(&dh_der).unwrap(), Algorithm::Dh);

        for algorithm in [Algorithm::Dsa, Algorithm::Dh, Algorithm::Elgamal] {
            roundtrip(algorithm, test_params(), WireFormat::X509);
        }
    }

    #[test]
    fn test_x509_rejects_other_algorithm() {
        let dsa = key(Algorithm::Dsa, test_params()).unwrap();
        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &dsa, WireFormat::X509).unwrap();
        let encoded = w.into_vec();
        assert_eq!(
            DlpCodec.read_public(&mut Reader::new(&encoded), Algorithm::Elgamal, WireFormat::X509),
            Err(Error::BadData)
        );
    }

    #[test]
    fn test_x509_needs_q() {
        let dlp = DlpPublic {
            q: None,
            ..test_params()
        };
        let elgamal = key(Algorithm::Elgamal, dlp).unwrap();
        let mut w = Writer::new();
        assert_eq!(
            DlpCodec.write_public(&mut w, &elgamal, WireFormat::X509),
            Err(Error::NotAvailable)
        );

        let mut w = Writer::new();
        write_reduced_spki(&mut w, &elgamal).unwrap();
        assert_eq!(spki_algorithm(w.as_slice()).unwrap(), Algorithm::Elgamal);
    }

    #[test]
    fn test_ssh() {
        let dss = roundtrip(Algorithm::Dsa, test_params(), WireFormat::Ssh2);
        assert_eq!(dss.permissions.sig_check, Permission::InternalOnly);
        assert_eq!(dss.permissions.sign, Permission::None);

        let dh = DlpPublic {
            q: None,
            y: None,
            ..test_params()
        };
        let decoded = roundtrip(Algorithm::Dh, dh, WireFormat::Ssh2);
        assert_eq!(decoded.permissions, ActionPermissions::crypt(Permission::InternalOnly));
    }

    #[test]
    fn test_ssl() {
        let legacy = DlpPublic {
            q: None,
            y: None,
            ..test_params()
        };
        roundtrip(Algorithm::Dh, legacy, WireFormat::SslLegacy);

        let extended = DlpPublic {
            y: None,
            ..test_params()
        };
        roundtrip(Algorithm::Dh, extended, WireFormat::SslExtended);

        let dsa = key(Algorithm::Dsa, test_params()).unwrap();
        let mut w = Writer::new();
        assert_eq!(
            DlpCodec.write_public(&mut w, &dsa, WireFormat::SslLegacy),
            Err(Error::NotAvailable)
        );
    }

    #[test]
    fn test_pgp() {
        let dsa = roundtrip(Algorithm::Dsa, test_params(), WireFormat::Pgp);
        assert_eq!(dsa.value.pgp_algorithm(), Some(pgp_id::DSA));

        let elgamal = DlpPublic {
            q: None,
            ..test_params()
        };
        let decoded = roundtrip(Algorithm::Elgamal, elgamal, WireFormat::Pgp);
        assert_eq!(decoded.permissions, ActionPermissions::crypt(Permission::InternalOnly));

        let dh = key(Algorithm::Dh, test_params()).unwrap();
        let mut w = Writer::new();
        assert_eq!(
            DlpCodec.write_public(&mut w, &dh, WireFormat::Pgp),
            Err(Error::NotAvailable)
        );
    }

    #[test]
    fn test_pgp_v3_rejected() {
        let dsa = key(Algorithm::Dsa, test_params()).unwrap();
        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &dsa, WireFormat::Pgp).unwrap();
        let mut encoded = w.into_vec();
        encoded[0] = 3;
        assert_eq!(
            DlpCodec.read_public(&mut Reader::new(&encoded), Algorithm::Dsa, WireFormat::Pgp),
            Err(Error::BadData)
        );
    }

    #[test]
    fn test_y_must_be_reduced() {
        let mut dlp = test_params();
        dlp.y = Some(&dlp.p + 1u32);
        let dsa = key(Algorithm::Dsa, dlp).unwrap();
        let mut w = Writer::new();
        DlpCodec.write_public(&mut w, &dsa, WireFormat::Ssh2).unwrap();
        let encoded = w.into_vec();
        assert_eq!(
            DlpCodec.read_public(&mut Reader::new(&encoded), Algorithm::Dsa, WireFormat::Ssh2),
            Err(Error::BadData)
        );
    }
}
