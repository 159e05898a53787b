//! Public-key readers and writers, one module per key family.
//!
//! The framing shared between families lives here: the X.509
//! `SubjectPublicKeyInfo` envelope, the SSH2 key blob and string types,
//! and the OpenPGP key packet header.

pub(crate) mod dlp;
pub(crate) mod ecc;
pub(crate) mod rsa;

use pkcs8::der::Tag;

use crate::algorithm::{Algorithm, WireFormat};
use crate::asn1;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{Decoded, PublicKey};

/// Oldest creation time accepted from a PGP key: the release of PGP 1.0.
const MIN_PGP_TIME: u32 = 0x2891_0000;

/// Reads and writes the public half of one key family.
pub(crate) trait PublicKeyCodec {
    /// Read a public key encoded in `format`. `expected` is the algorithm
    /// the caller is prepared to accept; an encoding that declares a
    /// different algorithm of the same family is rejected.
    fn read_public(
        &self,
        r: &mut Reader<'_>,
        expected: Algorithm,
        format: WireFormat,
    ) -> Result<Decoded<PublicKey>>;

    /// Write `key` in `format`.
    fn write_public(&self, w: &mut Writer, key: &PublicKey, format: WireFormat) -> Result<()>;
}

/// The two halves of a `SubjectPublicKeyInfo`, with the algorithm resolved.
pub(crate) struct Spki<'a> {
    pub algorithm: Algorithm,
    /// Whatever follows the OID inside the `AlgorithmIdentifier`.
    pub params: Reader<'a>,
    /// Contents of the `subjectPublicKey` BIT STRING.
    pub key: Reader<'a>,
}

impl<'a> Spki<'a> {
    /// Check both halves were fully consumed.
    pub fn finish(&self) -> Result<()> {
        self.params.finish()?;
        self.key.finish()
    }
}

/// Peek at the algorithm OID of a `SubjectPublicKeyInfo`.
pub(crate) fn spki_algorithm(data: &[u8]) -> Result<Algorithm> {
    let mut r = Reader::new(data);
    let mut outer = asn1::read_sequence(&mut r)?;
    let mut algorithm_id = asn1::read_sequence(&mut outer)?;
    let oid = asn1::read_oid(&mut algorithm_id)?;
    Algorithm::from_oid(&oid).ok_or_else(|| {
        log::debug!("unknown public key algorithm {oid}");
        Error::BadData
    })
}

pub(crate) fn read_spki<'a>(r: &mut Reader<'a>, expected: Algorithm) -> Result<Spki<'a>> {
    let mut outer = asn1::read_sequence(r)?;
    let mut algorithm_id = asn1::read_sequence(&mut outer)?;
    let oid = asn1::read_oid(&mut algorithm_id)?;
    let algorithm = match Algorithm::from_oid(&oid) {
        Some(algorithm) if expected.accepts(algorithm) => algorithm,
        _ => {
            log::debug!("SPKI algorithm {oid} doesn't match {expected:?}");
            return Err(Error::BadData);
        }
    };
    let algorithm = if algorithm == Algorithm::Ecdsa {
        expected
    } else {
        algorithm
    };
    let key = asn1::read_bit_string(&mut outer)?;
    outer.finish()?;

    Ok(Spki {
        algorithm,
        params: algorithm_id,
        key,
    })
}

/// Write a `SubjectPublicKeyInfo`. `params` writes the algorithm
/// parameters that follow the OID, `key` the BIT STRING payload.
pub(crate) fn write_spki<P, K>(w: &mut Writer, algorithm: Algorithm, params: P, key: K) -> Result<()>
where
    P: FnOnce(&mut Writer) -> Result<()>,
    K: FnOnce(&mut Writer) -> Result<()>,
{
    asn1::write_sequence(w, |w| {
        asn1::write_sequence(w, |w| {
            asn1::write_oid(w, &algorithm.oid())?;
            params(w)
        })?;
        asn1::write_bit_string(w, key)
    })
}

/// Read the outer length of an SSH2 public-key blob.
pub(crate) fn read_ssh_blob<'a>(r: &mut Reader<'a>) -> Result<Reader<'a>> {
    let len = r.read_u32()? as usize;
    r.sub_reader(len)
}

/// Write an SSH2 public-key blob around whatever `f` writes.
pub(crate) fn write_ssh_blob<F>(w: &mut Writer, f: F) -> Result<()>
where
    F: FnOnce(&mut Writer) -> Result<()>,
{
    let mut inner = Writer::new();
    f(&mut inner)?;
    write_ssh_string(w, inner.as_slice())
}

/// Read an SSH `string`, whose length is limited to `max`.
pub(crate) fn read_ssh_string<'a>(r: &mut Reader<'a>, max: usize) -> Result<&'a [u8]> {
    let len = r.read_u32()? as usize;
    if len > max {
        return Err(Error::BadData);
    }
    r.read_bytes(len)
}

pub(crate) fn write_ssh_string(w: &mut Writer, data: &[u8]) -> Result<()> {
    w.write_u32(u32::try_from(data.len()).map_err(|_| Error::Overflow)?)?;
    w.write_bytes(data)
}

/// Fields at the start of a PGP public-key packet body.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct PgpKeyHeader {
    pub version: u8,
    pub creation_time: u32,
    pub algorithm: u8,
}

impl PgpKeyHeader {
    pub fn is_open_pgp(&self) -> bool {
        self.version == 4
    }
}

pub(crate) fn read_pgp_header(r: &mut Reader<'_>) -> Result<PgpKeyHeader> {
    let version = r.read_byte()?;
    if !(2..=4).contains(&version) {
        log::debug!("unsupported PGP key version {version}");
        return Err(Error::BadData);
    }
    let creation_time = r.read_u32()?;
    if creation_time != 0 && creation_time < MIN_PGP_TIME {
        log::debug!("implausible PGP key creation time {creation_time}");
        return Err(Error::BadData);
    }
    if version < 4 {
        // validity period in days
        r.skip(2)?;
    }
    let algorithm = r.read_byte()?;

    Ok(PgpKeyHeader {
        version,
        creation_time,
        algorithm,
    })
}

pub(crate) fn write_pgp_header(w: &mut Writer, creation_time: u32, algorithm: u8) -> Result<()> {
    w.write_byte(4)?;
    w.write_u32(creation_time)?;
    w.write_byte(algorithm)
}

/// Explicit curve parameters show up as a SEQUENCE where a named-curve
/// OID was expected.
pub(crate) fn is_explicit_params(r: &Reader<'_>) -> bool {
    asn1::peek_tag(r) == Some(Tag::Sequence)
}
