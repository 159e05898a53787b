//! DER framing helpers on top of the `der` crate's tag/length primitives.

use alloc::vec::Vec;
use pkcs8::der::{
    asn1::{Null, ObjectIdentifier},
    Decode, Encode, Header, Length, Reader as _, SliceReader, Tag, TagNumber,
};

use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};

/// Context-specific tag `[number]`.
pub(crate) fn context_tag(number: u8, constructed: bool) -> Tag {
    Tag::ContextSpecific {
        constructed,
        number: TagNumber::new(number),
    }
}

/// Read a tag and length, leaving the reader at the start of the value.
pub(crate) fn read_header(r: &mut Reader<'_>) -> Result<Header> {
    let mut decoder = SliceReader::new(r.remaining_slice())?;
    let header = Header::decode(&mut decoder)?;
    let consumed = usize::try_from(decoder.position())?;
    r.skip(consumed)?;
    Ok(header)
}

/// Peek at the next tag without consuming anything.
pub(crate) fn peek_tag(r: &Reader<'_>) -> Option<Tag> {
    r.peek_byte().ok().and_then(|b| Tag::try_from(b).ok())
}

/// Read a header with the given tag and return the value length.
pub(crate) fn read_tagged(r: &mut Reader<'_>, tag: Tag) -> Result<usize> {
    let header = read_header(r)?;
    if header.tag != tag {
        log::debug!("expected ASN.1 tag {tag}, found {}", header.tag);
        return Err(Error::BadData);
    }
    let len = usize::try_from(header.length)?;
    if len > r.remaining() {
        return Err(Error::Underflow);
    }
    Ok(len)
}

/// Read a SEQUENCE header and return a reader scoped to its contents.
pub(crate) fn read_sequence<'a>(r: &mut Reader<'a>) -> Result<Reader<'a>> {
    let len = read_tagged(r, Tag::Sequence)?;
    r.sub_reader(len)
}

/// Read a constructed value with the given tag and return a scoped reader.
pub(crate) fn read_constructed<'a>(r: &mut Reader<'a>, tag: Tag) -> Result<Reader<'a>> {
    let len = read_tagged(r, tag)?;
    r.sub_reader(len)
}

/// Skip over one complete TLV.
pub(crate) fn skip_object(r: &mut Reader<'_>) -> Result<()> {
    let header = read_header(r)?;
    r.skip(usize::try_from(header.length)?)
}

pub(crate) fn read_oid(r: &mut Reader<'_>) -> Result<ObjectIdentifier> {
    let len = read_tagged(r, Tag::ObjectIdentifier)?;
    Ok(ObjectIdentifier::from_bytes(r.read_bytes(len)?)?)
}

/// Read a NULL if one is present.
pub(crate) fn read_optional_null(r: &mut Reader<'_>) -> Result<()> {
    if peek_tag(r) == Some(Tag::Null) && read_tagged(r, Tag::Null)? != 0 {
        return Err(Error::BadData);
    }
    Ok(())
}

/// Read a small non-negative INTEGER such as a version number.
pub(crate) fn read_short_integer(r: &mut Reader<'_>) -> Result<u8> {
    let len = read_tagged(r, Tag::Integer)?;
    match r.read_bytes(len)? {
        [value] if *value < 0x80 => Ok(*value),
        _ => Err(Error::BadData),
    }
}

/// Read a BIT STRING with no unused bits and return a reader over its payload.
pub(crate) fn read_bit_string<'a>(r: &mut Reader<'a>) -> Result<Reader<'a>> {
    let len = read_tagged(r, Tag::BitString)?;
    if len < 1 || r.read_byte()? != 0 {
        return Err(Error::BadData);
    }
    r.sub_reader(len - 1)
}

pub(crate) fn read_octet_string<'a>(r: &mut Reader<'a>) -> Result<Reader<'a>> {
    let len = read_tagged(r, Tag::OctetString)?;
    r.sub_reader(len)
}

pub(crate) fn write_header(w: &mut Writer, tag: Tag, len: usize) -> Result<()> {
    let header = Header::new(tag, Length::try_from(len)?)?;
    let mut buf = Vec::with_capacity(6);
    header.encode_to_vec(&mut buf)?;
    w.write_bytes(&buf)
}

/// Write `tag` around whatever `f` writes.
pub(crate) fn write_constructed<F>(w: &mut Writer, tag: Tag, f: F) -> Result<()>
where
    F: FnOnce(&mut Writer) -> Result<()>,
{
    let mut inner = Writer::new();
    f(&mut inner)?;
    write_header(w, tag, inner.len())?;
    w.write_bytes(inner.as_slice())
}

pub(crate) fn write_sequence<F>(w: &mut Writer, f: F) -> Result<()>
where
    F: FnOnce(&mut Writer) -> Result<()>,
{
    write_constructed(w, Tag::Sequence, f)
}

/// Write a BIT STRING with zero unused bits around whatever `f` writes.
pub(crate) fn write_bit_string<F>(w: &mut Writer, f: F) -> Result<()>
where
    F: FnOnce(&mut Writer) -> Result<()>,
{
    let mut inner = Writer::new();
    inner.write_byte(0)?;
    f(&mut inner)?;
    write_header(w, Tag::BitString, inner.len())?;
    w.write_bytes(inner.as_slice())
}

pub(crate) fn write_oid(w: &mut Writer, oid: &ObjectIdentifier) -> Result<()> {
    w.write_bytes(&oid.to_der()?)
}

pub(crate) fn write_null(w: &mut Writer) -> Result<()> {
    w.write_bytes(&Null.to_der()?)
}

pub(crate) fn write_short_integer(w: &mut Writer, value: u8) -> Result<()> {
    w.write_bytes(&value.to_der()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn test_sequence_roundtrip() {
        let mut w = Writer::new();
        write_sequence(&mut w, |w| {
            write_short_integer(w, 3)?;
            write_null(w)
        })
        .unwrap();
        let encoded = w.into_vec();
        assert_eq!(encoded, hex!("3005020103 0500"));

        let mut r = Reader::new(&encoded);
        let mut seq = read_sequence(&mut r).unwrap();
        assert_eq!(read_short_integer(&mut seq).unwrap(), 3);
        read_optional_null(&mut seq).unwrap();
        assert!(seq.finish().is_ok());
        assert!(r.finish().is_ok());
    }

    #[test]
    fn test_long_length() {
        let mut w = Writer::new();
        write_constructed(&mut w, Tag::OctetString, |w| w.write_bytes(&[0u8; 200])).unwrap();
        let encoded = w.into_vec();
        assert_eq!(&encoded[..3], &hex!("0481c8"));

        let mut r = Reader::new(&encoded);
        assert_eq!(read_octet_string(&mut r).unwrap().remaining(), 200);
    }

    #[test]
    fn test_truncated_value() {
        let mut r = Reader::new(&hex!("3005020103"));
        assert_eq!(read_sequence(&mut r).unwrap_err(), Error::Underflow);
    }

    #[test]
    fn test_wrong_tag() {
        let mut r = Reader::new(&hex!("310102"));
        assert_eq!(read_sequence(&mut r).unwrap_err(), Error::BadData);
    }

    #[test]
    fn test_context_tag() {
        let mut w = Writer::new();
        write_constructed(&mut w, context_tag(0, true), write_null).unwrap();
        assert_eq!(w.into_vec(), hex!("a0020500"));
    }
}
