//! RSA private keys.
//!
//! Three layouts are supported: the native context-tagged SEQUENCE, PKCS#8
//! wrapping a PKCS#1 `RSAPrivateKey`, and the plaintext MPIs of a PGP
//! secret-key packet.

use alloc::vec::Vec;
use const_oid::db::{rfc5280::ID_CE_KEY_USAGE, rfc5912::RSA_ENCRYPTION};
use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};
use pkcs1::UintRef;
use pkcs8::der::{Encode, Tag};
use zeroize::Zeroizing;

use crate::algorithm::{pgp_id, ActionPermissions, Algorithm, Permission, WireFormat};
use crate::asn1;
use crate::bounded::{check_bounded, read_bounded, write_bounded, IntegerEncoding};
use crate::context::RsaCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::internals::magnitude;
use crate::key::{
    CrtValues, Decoded, PrivateKey, PrivateKeyMaterial, PublicKey, PublicKeyParts, RsaPrivate,
};
use crate::params;
use crate::private::{require_public, PrivateKeyCodec};
use crate::public::rsa::{key as public_key, pgp_permissions};

// keyUsage bits, first octet
const DIGITAL_SIGNATURE: u8 = 0x80;
const NON_REPUDIATION: u8 = 0x40;
const KEY_ENCIPHERMENT: u8 = 0x20;
const DATA_ENCIPHERMENT: u8 = 0x10;
const KEY_AGREEMENT: u8 = 0x08;
const KEY_CERT_SIGN: u8 = 0x04;
const CRL_SIGN: u8 = 0x02;

const SIGN_USAGE: u8 = DIGITAL_SIGNATURE | NON_REPUDIATION | KEY_CERT_SIGN | CRL_SIGN;
const CRYPT_USAGE: u8 = KEY_ENCIPHERMENT | DATA_ENCIPHERMENT | KEY_AGREEMENT;

/// `e^-1 mod m`.
fn inverse(e: &BigUint, m: &BigUint) -> Result<BigUint> {
    e.clone()
        .mod_inverse(m)
        .and_then(|value| value.into_biguint())
        .ok_or_else(|| {
            log::debug!("RSA component has no inverse");
            Error::BadData
        })
}

/// Private exponent from the factors, `e^-1 mod (p-1)(q-1)`.
fn private_exponent(e: &BigUint, p: &BigUint, q: &BigUint) -> Result<Zeroizing<BigUint>> {
    let one = BigUint::one();
    let totient = Zeroizing::new((p - &one) * (q - &one));
    inverse(e, &totient).map(Zeroizing::new)
}

/// CRT values derived from `d` and the factors.
fn crt_values(d: &BigUint, p: &BigUint, q: &BigUint) -> Result<CrtValues> {
    let one = BigUint::one();
    Ok(CrtValues {
        exponent1: d % (p - &one),
        exponent2: d % (q - &one),
        coefficient: inverse(q, p)?,
    })
}

/// Check the private components belong to `n, e`.
fn validate(n: &BigUint, e: &BigUint, key: &RsaPrivate) -> Result<()> {
    if &(&key.p * &key.q) != n {
        log::debug!("RSA factors don't multiply to the modulus");
        return Err(Error::BadData);
    }

    let one = BigUint::one();
    if let Some(d) = &key.d {
        let lambda = Zeroizing::new((&key.p - &one).lcm(&(&key.q - &one)));
        if (d * e) % &*lambda != one {
            log::debug!("RSA private exponent doesn't invert the public exponent");
            return Err(Error::BadData);
        }
    }
    if let Some(crt) = &key.crt {
        if (&crt.coefficient * &key.q) % &key.p != one {
            log::debug!("RSA CRT coefficient is wrong");
            return Err(Error::BadData);
        }
    }
    Ok(())
}

fn private_key(public: PublicKey, material: RsaPrivate) -> Result<PrivateKey> {
    let rsa = public.material().as_rsa()?;
    validate(rsa.n(), rsa.e(), &material)?;
    PrivateKey::new(public, PrivateKeyMaterial::Rsa(material))
}

/// Read an optional `[tag]` INTEGER.
fn read_optional(
    r: &mut Reader<'_>,
    tag: u8,
    bounds: params::Bounds,
    modulus: Option<&BigUint>,
) -> Result<Option<BigUint>> {
    if asn1::peek_tag(r) != Some(asn1::context_tag(tag, false)) {
        return Ok(None);
    }
    read_bounded(r, IntegerEncoding::DerTagged(tag), bounds, modulus).map(Some)
}

/// All three CRT values or none of them.
fn crt_from_parts(
    exponent1: Option<BigUint>,
    exponent2: Option<BigUint>,
    coefficient: Option<BigUint>,
) -> Result<Option<CrtValues>> {
    match (exponent1, exponent2, coefficient) {
        (Some(exponent1), Some(exponent2), Some(coefficient)) => Ok(Some(CrtValues {
            exponent1,
            exponent2,
            coefficient,
        })),
        (None, None, None) => Ok(None),
        _ => {
            log::debug!("incomplete set of RSA CRT values");
            Err(Error::BadData)
        }
    }
}

fn read_current(r: &mut Reader<'_>, public: Option<&PublicKey>) -> Result<PrivateKey> {
    let mut seq = asn1::read_sequence(r)?;
    if asn1::peek_tag(&seq) == Some(asn1::context_tag(0, true)) {
        // some older writers wrapped the components in an explicit [0]
        seq = asn1::read_constructed(&mut seq, asn1::context_tag(0, true))?;
    }

    let public = match public {
        Some(public) => {
            let public = require_public(Some(public), Algorithm::Rsa)?.clone();
            for tag in [0, 1] {
                if asn1::peek_tag(&seq) == Some(asn1::context_tag(tag, false)) {
                    asn1::skip_object(&mut seq)?;
                }
            }
            public
        }
        None => {
            let n = read_optional(&mut seq, 0, params::RSA_N, None)?;
            let e = read_optional(&mut seq, 1, params::RSA_E, None)?;
            match (n, e) {
                (Some(n), Some(e)) => public_key(n, e)?,
                _ => {
                    log::debug!("RSA private key without a modulus or preloaded public key");
                    return Err(Error::NotAvailable);
                }
            }
        }
    };

    let n = public.material().as_rsa()?.n().clone();
    let d = read_optional(&mut seq, 2, params::RSA_D, Some(&n))?;
    let p = read_bounded(&mut seq, IntegerEncoding::DerTagged(3), params::RSA_FACTOR, Some(&n))?;
    let q = read_bounded(&mut seq, IntegerEncoding::DerTagged(4), params::RSA_FACTOR, Some(&n))?;
    let exponent1 = read_optional(&mut seq, 5, params::RSA_FACTOR, Some(&n))?;
    let exponent2 = read_optional(&mut seq, 6, params::RSA_FACTOR, Some(&n))?;
    let coefficient = read_optional(&mut seq, 7, params::RSA_FACTOR, Some(&n))?;
    seq.finish()?;

    let crt = crt_from_parts(exponent1, exponent2, coefficient)?;
    private_key(public, RsaPrivate { d, p, q, crt })
}

fn write_current(w: &mut Writer, key: &RsaPrivate) -> Result<()> {
    asn1::write_sequence(w, |w| {
        if let Some(d) = &key.d {
            write_bounded(w, d, IntegerEncoding::DerTagged(2))?;
        }
        write_bounded(w, &key.p, IntegerEncoding::DerTagged(3))?;
        write_bounded(w, &key.q, IntegerEncoding::DerTagged(4))?;
        if let Some(crt) = &key.crt {
            write_bounded(w, &crt.exponent1, IntegerEncoding::DerTagged(5))?;
            write_bounded(w, &crt.exponent2, IntegerEncoding::DerTagged(6))?;
            write_bounded(w, &crt.coefficient, IntegerEncoding::DerTagged(7))?;
        }
        Ok(())
    })
}

/// Permissions granted by a keyUsage BIT STRING.
fn key_usage_permissions(r: &mut Reader<'_>) -> Result<ActionPermissions> {
    let len = asn1::read_tagged(r, Tag::BitString)?;
    let bits = r.read_bytes(len)?;
    let usage = match bits {
        [unused, ..] if *unused > 7 => return Err(Error::BadData),
        [_, first, ..] => *first,
        _ => 0,
    };

    let mut permissions = ActionPermissions::NONE;
    if usage & SIGN_USAGE != 0 {
        permissions = permissions.union(ActionPermissions::sign(Permission::All));
    }
    if usage & CRYPT_USAGE != 0 {
        permissions = permissions.union(ActionPermissions::crypt(Permission::All));
    }
    Ok(permissions)
}

/// Walk the PKCS#8 `[0]` attributes looking for a keyUsage.
fn read_attributes(r: &mut Reader<'_>) -> Result<Option<ActionPermissions>> {
    let mut attributes = asn1::read_constructed(r, asn1::context_tag(0, true))?;
    let mut permissions = None;
    while !attributes.is_empty() {
        let mut attribute = asn1::read_sequence(&mut attributes)?;
        let oid = asn1::read_oid(&mut attribute)?;
        let mut values = asn1::read_constructed(&mut attribute, Tag::Set)?;
        if oid == ID_CE_KEY_USAGE {
            permissions = Some(key_usage_permissions(&mut values)?);
        } else {
            log::trace!("skipping PKCS#8 attribute {oid}");
            while !values.is_empty() {
                asn1::skip_object(&mut values)?;
            }
        }
        values.finish()?;
        attribute.finish()?;
    }
    Ok(permissions)
}

/// keyUsage for permissions narrower than "everything". `None` when the
/// key may be used for anything.
fn key_usage_bits(permissions: ActionPermissions) -> Option<u8> {
    let can_sign = permissions.sign != Permission::None || permissions.sig_check != Permission::None;
    let can_crypt = permissions.encrypt != Permission::None || permissions.decrypt != Permission::None;
    match (can_sign, can_crypt) {
        (true, true) => None,
        (true, false) => Some(DIGITAL_SIGNATURE),
        (false, true) => Some(KEY_ENCIPHERMENT),
        (false, false) => Some(0),
    }
}

fn write_key_usage(w: &mut Writer, usage: u8) -> Result<()> {
    asn1::write_constructed(w, asn1::context_tag(0, true), |w| {
        asn1::write_sequence(w, |w| {
            asn1::write_oid(w, &ID_CE_KEY_USAGE)?;
            asn1::write_constructed(w, Tag::Set, |w| {
                if usage == 0 {
                    asn1::write_header(w, Tag::BitString, 1)?;
                    return w.write_byte(0);
                }
                let unused = u8::try_from(usage.trailing_zeros()).map_err(|_| Error::Internal)?;
                asn1::write_header(w, Tag::BitString, 2)?;
                w.write_byte(unused)?;
                w.write_byte(usage)
            })
        })
    })
}

fn read_legacy(
    r: &mut Reader<'_>,
    public: Option<&PublicKey>,
) -> Result<Decoded<PrivateKey>> {
    let mut seq = asn1::read_sequence(r)?;
    let version = asn1::read_short_integer(&mut seq)?;
    if version > 1 {
        log::debug!("unsupported PKCS#8 version {version}");
        return Err(Error::BadData);
    }
    let mut algorithm_id = asn1::read_sequence(&mut seq)?;
    let oid = asn1::read_oid(&mut algorithm_id)?;
    if oid != RSA_ENCRYPTION {
        log::debug!("PKCS#8 algorithm {oid} isn't rsaEncryption");
        return Err(Error::BadData);
    }
    asn1::read_optional_null(&mut algorithm_id)?;
    algorithm_id.finish()?;

    let octets = asn1::read_octet_string(&mut seq)?;
    let inner = pkcs1::RsaPrivateKey::try_from(octets.remaining_slice())?;
    if inner.other_prime_infos.is_some() {
        log::debug!("multi-prime RSA keys aren't supported");
        return Err(Error::NotAvailable);
    }

    let permissions = if asn1::peek_tag(&seq) == Some(asn1::context_tag(0, true)) {
        read_attributes(&mut seq)?
    } else {
        None
    };
    if asn1::peek_tag(&seq) == Some(asn1::context_tag(1, false)) {
        // v2 publicKey, redundant with the modulus
        asn1::skip_object(&mut seq)?;
    }
    seq.finish()?;

    let public = match public {
        Some(public) => require_public(Some(public), Algorithm::Rsa)?.clone(),
        None => public_key(
            check_bounded(inner.modulus.as_bytes(), params::RSA_N, None)?,
            check_bounded(inner.public_exponent.as_bytes(), params::RSA_E, None)?,
        )?,
    };
    let n = public.material().as_rsa()?.n().clone();
    let factor = |value: UintRef<'_>| check_bounded(value.as_bytes(), params::RSA_FACTOR, Some(&n));

    let material = RsaPrivate {
        d: Some(check_bounded(
            inner.private_exponent.as_bytes(),
            params::RSA_D,
            Some(&n),
        )?),
        p: factor(inner.prime1)?,
        q: factor(inner.prime2)?,
        crt: Some(CrtValues {
            exponent1: factor(inner.exponent1)?,
            exponent2: factor(inner.exponent2)?,
            coefficient: factor(inner.coefficient)?,
        }),
    };

    Ok(Decoded {
        value: private_key(public, material)?,
        permissions: permissions.unwrap_or(ActionPermissions::ALL),
    })
}

fn write_legacy(
    w: &mut Writer,
    key: &PrivateKey,
    permissions: ActionPermissions,
) -> Result<()> {
    let public = key.public_key().material().as_rsa()?;
    let rsa = key.material().as_rsa()?;

    // never stored back, so every write recomputes them
    let computed_d;
    let d = match &rsa.d {
        Some(d) => d,
        None => {
            computed_d = private_exponent(public.e(), &rsa.p, &rsa.q)?;
            &*computed_d
        }
    };
    let computed_crt;
    let crt = match &rsa.crt {
        Some(crt) => crt,
        None => {
            computed_crt = crt_values(d, &rsa.p, &rsa.q)?;
            &computed_crt
        }
    };

    let modulus = magnitude(public.n());
    let public_exponent = magnitude(public.e());
    let private_exponent = magnitude(d);
    let prime1 = magnitude(&rsa.p);
    let prime2 = magnitude(&rsa.q);
    let exponent1 = magnitude(&crt.exponent1);
    let exponent2 = magnitude(&crt.exponent2);
    let coefficient = magnitude(&crt.coefficient);

    let mut inner = Zeroizing::new(Vec::new());
    pkcs1::RsaPrivateKey {
        modulus: UintRef::new(&modulus)?,
        public_exponent: UintRef::new(&public_exponent)?,
        private_exponent: UintRef::new(&private_exponent)?,
        prime1: UintRef::new(&prime1)?,
        prime2: UintRef::new(&prime2)?,
        exponent1: UintRef::new(&exponent1)?,
        exponent2: UintRef::new(&exponent2)?,
        coefficient: UintRef::new(&coefficient)?,
        other_prime_infos: None,
    }
    .encode_to_vec(&mut inner)?;

    asn1::write_sequence(w, |w| {
        asn1::write_short_integer(w, 0)?;
        asn1::write_sequence(w, |w| {
            asn1::write_oid(w, &RSA_ENCRYPTION)?;
            asn1::write_null(w)
        })?;
        asn1::write_constructed(w, Tag::OctetString, |w| w.write_bytes(&inner))?;
        match key_usage_bits(permissions) {
            Some(usage) => write_key_usage(w, usage),
            None => Ok(()),
        }
    })
}

/// PGP orders the factors `p < q` and stores `u = p^-1 mod q`, so its `p`
/// is our `q` and its `u` our CRT coefficient.
fn read_pgp(r: &mut Reader<'_>, public: Option<&PublicKey>) -> Result<Decoded<PrivateKey>> {
    let public = require_public(public, Algorithm::Rsa)?;
    let permissions = pgp_permissions(public.pgp_algorithm().unwrap_or(pgp_id::RSA))?;
    let n = public.material().as_rsa()?.n();

    let d = read_bounded(r, IntegerEncoding::Pgp, params::RSA_D, Some(n))?;
    let q = read_bounded(r, IntegerEncoding::Pgp, params::RSA_FACTOR, Some(n))?;
    let p = read_bounded(r, IntegerEncoding::Pgp, params::RSA_FACTOR, Some(n))?;
    let coefficient = read_bounded(r, IntegerEncoding::Pgp, params::RSA_FACTOR, Some(n))?;

    if p.is_zero() || q.is_zero() {
        return Err(Error::BadData);
    }
    let one = BigUint::one();
    let crt = CrtValues {
        exponent1: &d % (&p - &one),
        exponent2: &d % (&q - &one),
        coefficient,
    };
    let material = RsaPrivate {
        d: Some(d),
        p,
        q,
        crt: Some(crt),
    };

    Ok(Decoded {
        value: private_key(public.clone(), material)?,
        permissions,
    })
}

fn write_pgp(w: &mut Writer, key: &PrivateKey) -> Result<()> {
    let public = key.public_key().material().as_rsa()?;
    let rsa = key.material().as_rsa()?;

    let computed_d;
    let d = match &rsa.d {
        Some(d) => d,
        None => {
            computed_d = private_exponent(public.e(), &rsa.p, &rsa.q)?;
            &*computed_d
        }
    };
    let computed_crt;
    let crt = match &rsa.crt {
        Some(crt) => crt,
        None => {
            computed_crt = crt_values(d, &rsa.p, &rsa.q)?;
            &computed_crt
        }
    };

    write_bounded(w, d, IntegerEncoding::Pgp)?;
    write_bounded(w, &rsa.q, IntegerEncoding::Pgp)?;
    write_bounded(w, &rsa.p, IntegerEncoding::Pgp)?;
    write_bounded(w, &crt.coefficient, IntegerEncoding::Pgp)
}

impl PrivateKeyCodec for RsaCodec {
    fn read_private(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        public: Option<&PublicKey>,
        format: WireFormat,
    ) -> Result<Decoded<PrivateKey>> {
        if expected != Algorithm::Rsa {
            return Err(Error::Internal);
        }

        match format {
            WireFormat::Pkcs8Current => Ok(Decoded {
                value: read_current(r, public)?,
                permissions: ActionPermissions::for_algorithm(Algorithm::Rsa),
            }),
            WireFormat::Pkcs8Legacy => read_legacy(r, public),
            WireFormat::Pgp => read_pgp(r, public),
            _ => Err(Error::NotAvailable),
        }
    }

    fn write_private(
        &self,
        w: &mut Writer,
        key: &PrivateKey,
        format: WireFormat,
        permissions: ActionPermissions,
    ) -> Result<()> {
        let rsa = key.material().as_rsa()?;

        match format {
            WireFormat::Pkcs8Current => write_current(w, rsa),
            WireFormat::Pkcs8Legacy => write_legacy(w, key, permissions),
            WireFormat::Pgp => write_pgp(w, key),
            _ => Err(Error::NotAvailable),
        }
    }
}
