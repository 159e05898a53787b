//! DSA, DH and Elgamal private keys: the secret exponent `x`.

use const_oid::db::rfc5912::ID_DSA;
use num_bigint::BigUint;
use pkcs8::der::Tag;

use crate::algorithm::{ActionPermissions, Algorithm, WireFormat};
use crate::asn1;
use crate::bounded::{read_bounded, write_bounded, IntegerEncoding};
use crate::context::DlpCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, DlpPrivate, DlpPublic, PrivateKey, PrivateKeyMaterial, PublicKey};
use crate::params;
use crate::private::{require_public, PrivateKeyCodec};
use crate::public::dlp::{key as public_key, read_domain_params, write_domain_params};

fn decoded(public: PublicKey, x: BigUint) -> Result<Decoded<PrivateKey>> {
    let permissions = ActionPermissions::for_algorithm(public.algorithm());
    Ok(Decoded {
        value: PrivateKey::new(public, PrivateKeyMaterial::Dlp(DlpPrivate { x }))?,
        permissions,
    })
}

fn read_current(r: &mut Reader<'_>, public: &PublicKey) -> Result<BigUint> {
    let p = &public.material().as_dlp()?.p;
    if asn1::peek_tag(r) == Some(Tag::Sequence) {
        // older versions wrapped x in a SEQUENCE
        let mut seq = asn1::read_sequence(r)?;
        let x = read_bounded(&mut seq, IntegerEncoding::Der, params::DLP_X, Some(p))?;
        seq.finish()?;
        return Ok(x);
    }
    read_bounded(r, IntegerEncoding::Der, params::DLP_X, Some(p))
}

/// PKCS#8 DSA, the only DLP algorithm other toolkits write this way.
fn read_legacy(r: &mut Reader<'_>, public: Option<&PublicKey>) -> Result<Decoded<PrivateKey>> {
    let mut seq = asn1::read_sequence(r)?;
    if asn1::read_short_integer(&mut seq)? != 0 {
        log::debug!("unsupported PKCS#8 version");
        return Err(Error::BadData);
    }
    let mut algorithm_id = asn1::read_sequence(&mut seq)?;
    let oid = asn1::read_oid(&mut algorithm_id)?;
    if oid != ID_DSA {
        log::debug!("PKCS#8 algorithm {oid} isn't DSA");
        return Err(Error::BadData);
    }

    let preloaded = public
        .map(|public| require_public(Some(public), Algorithm::Dsa))
        .transpose()?;
    let domain = match preloaded {
        Some(_) => {
            asn1::skip_object(&mut algorithm_id)?;
            None
        }
        None => Some(read_domain_params(&mut algorithm_id, Algorithm::Dsa)?),
    };
    algorithm_id.finish()?;

    let p = match (&domain, preloaded) {
        (Some((p, _, _)), _) => p,
        (None, Some(public)) => &public.material().as_dlp()?.p,
        (None, None) => return Err(Error::Internal),
    };
    let mut octets = asn1::read_octet_string(&mut seq)?;
    let x = read_bounded(&mut octets, IntegerEncoding::Der, params::DLP_X, Some(p))?;
    octets.finish()?;
    if asn1::peek_tag(&seq) == Some(asn1::context_tag(0, true)) {
        log::trace!("ignoring PKCS#8 attributes on a DSA key");
        asn1::skip_object(&mut seq)?;
    }
    seq.finish()?;

    let public = match (domain, preloaded) {
        (Some((p, q, g)), _) => {
            let y = g.modpow(&x, &p);
            public_key(
                Algorithm::Dsa,
                DlpPublic {
                    p,
                    q: Some(q),
                    g,
                    y: Some(y),
                },
            )?
        }
        (None, Some(public)) => public.clone(),
        (None, None) => return Err(Error::Internal),
    };
    decoded(public, x)
}

fn write_legacy(w: &mut Writer, key: &PrivateKey) -> Result<()> {
    let public = key.public_key();
    if public.algorithm() != Algorithm::Dsa {
        return Err(Error::NotAvailable);
    }
    let dlp = public.material().as_dlp()?;
    let q = dlp.q.as_ref().ok_or(Error::NotAvailable)?;
    let x = &key.material().as_dlp()?.x;

    asn1::write_sequence(w, |w| {
        asn1::write_short_integer(w, 0)?;
        asn1::write_sequence(w, |w| {
            asn1::write_oid(w, &ID_DSA)?;
            write_domain_params(w, Algorithm::Dsa, &dlp.p, q, &dlp.g)
        })?;
        asn1::write_constructed(w, Tag::OctetString, |w| {
            write_bounded(w, x, IntegerEncoding::Der)
        })
    })
}

impl PrivateKeyCodec for DlpCodec {
    fn read_private(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        public: Option<&PublicKey>,
        format: WireFormat,
    ) -> Result<Decoded<PrivateKey>> {
        match format {
            WireFormat::Pkcs8Current => {
                let public = require_public(public, expected)?;
                let x = read_current(r, public)?;
                decoded(public.clone(), x)
            }
            WireFormat::Pkcs8Legacy if expected == Algorithm::Dsa => read_legacy(r, public),
            WireFormat::Pgp if expected != Algorithm::Dh => {
                let public = require_public(public, expected)?;
                let p = &public.material().as_dlp()?.p;
                let x = read_bounded(r, IntegerEncoding::Pgp, params::DLP_X, Some(p))?;
                decoded(public.clone(), x)
            }
            _ => Err(Error::NotAvailable),
        }
    }

    fn write_private(
        &self,
        w: &mut Writer,
        key: &PrivateKey,
        format: WireFormat,
        _permissions: ActionPermissions,
    ) -> Result<()> {
        let x = &key.material().as_dlp()?.x;

        match format {
            WireFormat::Pkcs8Current => {
                if key.public_key().material().as_dlp()?.y_is_zero() {
                    // domain parameters only, nothing secret to store
                    return write_bounded(w, &BigUint::default(), IntegerEncoding::Der);
                }
                write_bounded(w, x, IntegerEncoding::Der)
            }
            WireFormat::Pkcs8Legacy => write_legacy(w, key),
            WireFormat::Pgp if key.public_key().algorithm() != Algorithm::Dh => {
                write_bounded(w, x, IntegerEncoding::Pgp)
            }
            _ => Err(Error::NotAvailable),
        }
    }
}
