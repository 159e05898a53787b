//! PGP packet framing: the cipher type byte (CTB) and length field in
//! front of every packet.
//!
//! Old-format CTBs (`10tttttl`) carry a 4-bit tag and a length type; new
//! format ones (`11tttttt`) a 6-bit tag followed by a one, two or five
//! byte length. Indeterminate and partial body lengths are only used for
//! streamed data, never for key material, so they're rejected.

use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};

/// Packet tags the scanner knows about.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PacketTag {
    /// Signature packet.
    Signature,
    /// Secret-key packet.
    SecretKey,
    /// Public-key packet.
    PublicKey,
    /// Secret-subkey packet.
    SecretSubkey,
    /// Marker packet.
    Marker,
    /// Trust packet.
    Trust,
    /// User ID packet.
    UserId,
    /// Public-subkey packet.
    PublicSubkey,
    /// User attribute packet.
    UserAttribute,
    /// Anything else.
    Other(u8),
}

impl From<u8> for PacketTag {
    fn from(tag: u8) -> Self {
        match tag {
            2 => PacketTag::Signature,
            5 => PacketTag::SecretKey,
            6 => PacketTag::PublicKey,
            7 => PacketTag::SecretSubkey,
            10 => PacketTag::Marker,
            12 => PacketTag::Trust,
            13 => PacketTag::UserId,
            14 => PacketTag::PublicSubkey,
            17 => PacketTag::UserAttribute,
            other => PacketTag::Other(other),
        }
    }
}

impl From<PacketTag> for u8 {
    fn from(tag: PacketTag) -> u8 {
        match tag {
            PacketTag::Signature => 2,
            PacketTag::SecretKey => 5,
            PacketTag::PublicKey => 6,
            PacketTag::SecretSubkey => 7,
            PacketTag::Marker => 10,
            PacketTag::Trust => 12,
            PacketTag::UserId => 13,
            PacketTag::PublicSubkey => 14,
            PacketTag::UserAttribute => 17,
            PacketTag::Other(other) => other,
        }
    }
}

impl PacketTag {
    /// Does this packet start a new key?
    pub fn is_primary_key(self) -> bool {
        matches!(self, PacketTag::PublicKey | PacketTag::SecretKey)
    }

    /// Is this a subkey packet?
    pub fn is_subkey(self) -> bool {
        matches!(self, PacketTag::PublicSubkey | PacketTag::SecretSubkey)
    }

    /// Does the packet carry secret key material?
    pub fn is_secret(self) -> bool {
        matches!(self, PacketTag::SecretKey | PacketTag::SecretSubkey)
    }

    /// Smallest body a well-formed packet of this type can have.
    pub fn min_body_len(self) -> usize {
        match self {
            PacketTag::Trust => 1,
            PacketTag::UserId => 2,
            PacketTag::Marker => 3,
            _ => 8,
        }
    }
}

/// One framed packet.
#[derive(Clone, Debug)]
pub struct Packet<'a> {
    /// Packet type.
    pub tag: PacketTag,
    /// Was the header in new format?
    pub new_format: bool,
    /// Packet body.
    pub body: Reader<'a>,
}

/// Read a packet header and split off its body.
pub fn read_packet<'a>(r: &mut Reader<'a>) -> Result<Packet<'a>> {
    let ctb = r.read_byte()?;
    if ctb & 0x80 == 0 {
        log::debug!("invalid CTB {ctb:#04x}");
        return Err(Error::BadData);
    }

    let new_format = ctb & 0x40 != 0;
    let (tag, len) = if new_format {
        (ctb & 0x3f, read_new_length(r)?)
    } else {
        ((ctb >> 2) & 0x0f, read_old_length(r, ctb & 0x03)?)
    };
    let tag = PacketTag::from(tag);
    log::trace!("packet {tag:?}, {len} bytes");

    Ok(Packet {
        tag,
        new_format,
        body: r.sub_reader(len)?,
    })
}

fn read_old_length(r: &mut Reader<'_>, length_type: u8) -> Result<usize> {
    match length_type {
        0 => Ok(r.read_byte()?.into()),
        1 => Ok(r.read_u16()?.into()),
        2 => usize::try_from(r.read_u32()?).map_err(|_| Error::Overflow),
        _ => {
            log::debug!("indeterminate-length packet");
            Err(Error::BadData)
        }
    }
}

fn read_new_length(r: &mut Reader<'_>) -> Result<usize> {
    let first = r.read_byte()?;
    match first {
        0..=191 => Ok(first.into()),
        192..=223 => {
            let second = r.read_byte()?;
            Ok(((usize::from(first) - 192) << 8) + 192 + usize::from(second))
        }
        255 => usize::try_from(r.read_u32()?).map_err(|_| Error::Overflow),
        _ => {
            log::debug!("partial body length {first:#04x}");
            Err(Error::BadData)
        }
    }
}

/// Write a packet header for a body of `len` bytes.
///
/// Tags that fit use the old format with the shortest length field, which
/// every PGP implementation reads; the rest use the new format.
pub fn write_packet_header(w: &mut Writer, tag: PacketTag, len: usize) -> Result<()> {
    let tag = u8::from(tag);
    let len32 = u32::try_from(len).map_err(|_| Error::Overflow)?;

    if tag < 16 {
        let ctb = 0x80 | (tag << 2);
        if let Ok(len) = u8::try_from(len32) {
            w.write_byte(ctb)?;
            w.write_byte(len)
        } else if let Ok(len) = u16::try_from(len32) {
            w.write_byte(ctb | 1)?;
            w.write_u16(len)
        } else {
            w.write_byte(ctb | 2)?;
            w.write_u32(len32)
        }
    } else {
        w.write_byte(0xc0 | tag)?;
        if len32 < 192 {
            w.write_byte(len32 as u8)
        } else if len32 < 8384 {
            w.write_byte((((len32 - 192) >> 8) + 192) as u8)?;
            w.write_byte(((len32 - 192) & 0xff) as u8)
        } else {
            w.write_byte(255)?;
            w.write_u32(len32)
        }
    }
}

/// Write a complete packet.
pub fn write_packet(w: &mut Writer, tag: PacketTag, body: &[u8]) -> Result<()> {
    write_packet_header(w, tag, body.len())?;
    w.write_bytes(body)
}
