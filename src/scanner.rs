//! PGP keyring scanner.
//!
//! A keyring is a flat run of packets. Each primary key packet opens a
//! personality; the subkey and user-ID packets that follow belong to it
//! until the next primary key. The scanner keeps going past packets it
//! can't make sense of, flagging what it got as [`ScanStatus::Incomplete`]
//! rather than failing the whole keyring.

use alloc::string::String;
use alloc::vec::Vec;
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::algorithm::{ActionPermissions, Algorithm, KeyUsage, WireFormat};
use crate::context::FamilyCodec;
use crate::cursor::{Reader, Writer};
use crate::errors::{Error, Result};
use crate::key::{PrivateKey, PublicKey};
use crate::keyid::{KeyIdentifiers, CRYPTLIB_ID_SIZE, PGP_ID_SIZE};
use crate::params::{MAX_PGP_OBJECTS, MAX_PGP_USERIDS};
use crate::pgp::{read_packet, write_packet, Packet, PacketTag};
use crate::public::read_pgp_header;

/// S2K usage byte for unprotected secret key material.
const S2K_PLAINTEXT: u8 = 0;

/// Did the scan read everything it was given?
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum ScanStatus {
    /// Every packet was understood.
    #[default]
    Complete,
    /// Something was skipped or couldn't be decoded.
    Incomplete,
}

/// Which key of a personality a lookup matched.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyMatch {
    /// The primary key, by PGP key ID, user ID or wildcard.
    Main,
    /// The subkey, by PGP key ID, user ID or wildcard.
    Subkey,
    /// The primary key, by its 20-byte cryptlib key ID.
    MainByCryptlibId,
    /// The subkey, by its 20-byte cryptlib key ID.
    SubkeyByCryptlibId,
}

impl KeyMatch {
    /// Was it the subkey that matched?
    pub fn is_subkey(self) -> bool {
        matches!(self, KeyMatch::Subkey | KeyMatch::SubkeyByCryptlibId)
    }
}

/// What a keyring lookup is looking for.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeySelector<'a> {
    /// The first key that passes the usage filter.
    Any,
    /// An 8-byte PGP key ID, OpenPGP or (for RSA) PGP 2, or a 20-byte
    /// cryptlib key ID.
    KeyId(&'a [u8]),
    /// A case-sensitive substring of one of the personality's user IDs.
    Name(&'a str),
}

/// One key of a personality, with its identifiers.
#[derive(Clone, Debug)]
pub struct PgpKey {
    public: PublicKey,
    private: Option<PrivateKey>,
    encrypted_secret: Option<Zeroizing<Vec<u8>>>,
    ids: KeyIdentifiers,
    permissions: ActionPermissions,
}

impl PgpKey {
    /// Wrap a public key.
    pub fn new(public: PublicKey) -> Result<Self> {
        let permissions = ActionPermissions::for_algorithm(public.algorithm());
        Self::with_permissions(public, permissions)
    }

    /// Wrap a private key. It is written out unprotected.
    pub fn from_private_key(private: PrivateKey) -> Result<Self> {
        let mut key = Self::new(private.public_key().clone())?;
        key.private = Some(private);
        Ok(key)
    }

    fn with_permissions(public: PublicKey, permissions: ActionPermissions) -> Result<Self> {
        Ok(Self {
            ids: KeyIdentifiers::for_key(&public)?,
            public,
            private: None,
            encrypted_secret: None,
            permissions,
        })
    }

    /// The public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Private components, if the packet carried them unprotected.
    pub fn private_key(&self) -> Option<&PrivateKey> {
        self.private.as_ref()
    }

    /// Passphrase-protected secret material, starting at the S2K usage
    /// byte. It is kept as-is.
    pub fn encrypted_secret(&self) -> Option<&[u8]> {
        self.encrypted_secret.as_deref().map(Vec::as_slice)
    }

    /// Identifiers of the public key.
    pub fn ids(&self) -> &KeyIdentifiers {
        &self.ids
    }

    /// Permissions implied by the key packet.
    pub fn permissions(&self) -> ActionPermissions {
        self.permissions
    }

    /// Does the key carry secret material, protected or not?
    pub fn is_secret(&self) -> bool {
        self.private.is_some() || self.encrypted_secret.is_some()
    }

    fn matches_pgp_id(&self, id: &[u8]) -> bool {
        let mut found = Choice::from(0);
        for candidate in [self.ids.openpgp_id, self.ids.pgp2_id].into_iter().flatten() {
            found |= candidate[..].ct_eq(id);
        }
        found.into()
    }

    fn matches_cryptlib_id(&self, id: &[u8]) -> bool {
        self.ids.cryptlib_id[..].ct_eq(id).into()
    }

    /// Decode a key packet body. Returns the key and whether the packet
    /// was OpenPGP (v4).
    fn decode(body: &mut Reader<'_>, secret: bool) -> Result<(Self, bool)> {
        let header = read_pgp_header(&mut body.clone())?;
        let algorithm = Algorithm::from_pgp_id(header.algorithm).ok_or_else(|| {
            log::debug!("unsupported PGP algorithm {}", header.algorithm);
            Error::NotAvailable
        })?;
        let codec = FamilyCodec::for_algorithm(algorithm);
        let public = codec.read_public(body, algorithm, WireFormat::Pgp)?;
        let mut key = Self::with_permissions(public.value, public.permissions)?;
        if secret {
            key.read_secret(body, codec)?;
        }
        body.finish()?;
        Ok((key, header.is_open_pgp()))
    }

    fn read_secret(&mut self, r: &mut Reader<'_>, codec: FamilyCodec) -> Result<()> {
        let usage = r.read_byte()?;
        if usage != S2K_PLAINTEXT {
            let rest = r.read_bytes(r.remaining())?;
            let mut secret = Zeroizing::new(Vec::with_capacity(rest.len() + 1));
            secret.push(usage);
            secret.extend_from_slice(rest);
            self.encrypted_secret = Some(secret);
            return Ok(());
        }

        let start = r.remaining_slice();
        let decoded =
            codec.read_private(r, self.public.algorithm(), Some(&self.public), WireFormat::Pgp)?;
        let mpis = &start[..start.len() - r.remaining()];
        if r.read_u16()? != checksum(mpis) {
            log::debug!("secret key checksum mismatch");
            return Err(Error::BadData);
        }
        self.private = Some(decoded.value);
        self.permissions = decoded.permissions;
        Ok(())
    }

    fn write_body(&self, w: &mut Writer) -> Result<()> {
        let codec = FamilyCodec::for_algorithm(self.public.algorithm());
        codec.write_public(w, &self.public, WireFormat::Pgp)?;

        if let Some(private) = &self.private {
            let mut mpis = Writer::new();
            codec.write_private(&mut mpis, private, WireFormat::Pgp, self.permissions)?;
            w.write_byte(S2K_PLAINTEXT)?;
            w.write_bytes(mpis.as_slice())?;
            w.write_u16(checksum(mpis.as_slice()))?;
        } else if let Some(secret) = &self.encrypted_secret {
            w.write_bytes(secret)?;
        }
        Ok(())
    }

    fn write_packet(&self, w: &mut Writer, primary: bool) -> Result<()> {
        let tag = match (primary, self.is_secret()) {
            (true, false) => PacketTag::PublicKey,
            (true, true) => PacketTag::SecretKey,
            (false, false) => PacketTag::PublicSubkey,
            (false, true) => PacketTag::SecretSubkey,
        };
        let mut body = Writer::new();
        self.write_body(&mut body)?;
        write_packet(w, tag, body.as_slice())
    }
}

/// Sum of the secret MPI bytes, mod 65536.
fn checksum(data: &[u8]) -> u16 {
    data.iter()
        .fold(0u16, |sum, byte| sum.wrapping_add(u16::from(*byte)))
}

/// A primary key with its subkey and user IDs.
#[derive(Clone, Debug)]
pub struct PgpPersonality {
    key: Option<PgpKey>,
    subkey: Option<PgpKey>,
    user_ids: Vec<Vec<u8>>,
    is_open_pgp: bool,
    is_complete: bool,
    status: ScanStatus,
}

impl PgpPersonality {
    /// Start a personality around `main`. Finish it with
    /// [`PgpPersonality::finish`] before writing.
    pub fn new(main: PgpKey) -> Self {
        Self {
            key: Some(main),
            subkey: None,
            user_ids: Vec::new(),
            is_open_pgp: true,
            is_complete: false,
            status: ScanStatus::Complete,
        }
    }

    /// Stand-in for a primary key that couldn't be decoded.
    fn placeholder() -> Self {
        Self {
            key: None,
            subkey: None,
            user_ids: Vec::new(),
            is_open_pgp: false,
            is_complete: false,
            status: ScanStatus::Incomplete,
        }
    }

    /// Attach a subkey, replacing any previous one.
    pub fn set_subkey(&mut self, subkey: PgpKey) {
        self.subkey = Some(subkey);
    }

    /// Append a user ID. It is kept byte for byte, UTF-8 or not.
    pub fn add_user_id(&mut self, user_id: impl AsRef<[u8]>) -> Result<()> {
        if self.user_ids.len() >= MAX_PGP_USERIDS {
            return Err(Error::Overflow);
        }
        self.user_ids.push(user_id.as_ref().to_vec());
        Ok(())
    }

    /// Mark assembly as finished.
    pub fn finish(&mut self) {
        self.is_complete = true;
    }

    /// The primary key. A personality whose key packet couldn't be decoded
    /// has none.
    pub fn main_key(&self) -> Option<&PgpKey> {
        self.key.as_ref()
    }

    /// The subkey.
    pub fn subkey(&self) -> Option<&PgpKey> {
        self.subkey.as_ref()
    }

    /// The key a lookup matched.
    pub fn matched_key(&self, which: KeyMatch) -> Option<&PgpKey> {
        if which.is_subkey() {
            self.subkey.as_ref()
        } else {
            self.key.as_ref()
        }
    }

    /// User IDs in packet order, as raw bytes.
    pub fn user_ids(&self) -> &[Vec<u8>] {
        &self.user_ids
    }

    /// User ID at `index`.
    pub fn user_id(&self, index: usize) -> Option<&[u8]> {
        self.user_ids.get(index).map(Vec::as_slice)
    }

    /// Number of user IDs held.
    pub fn last_user_id(&self) -> usize {
        self.user_ids.len()
    }

    /// Was the primary key an OpenPGP (v4) packet?
    pub fn is_open_pgp(&self) -> bool {
        self.is_open_pgp
    }

    /// Has assembly finished?
    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Did scanning this personality succeed?
    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Emit the key, user-ID and subkey packets.
    pub fn write(&self, w: &mut Writer) -> Result<()> {
        let key = match &self.key {
            Some(key) if self.is_complete => key,
            _ => return Err(Error::NotAvailable),
        };
        key.write_packet(w, true)?;
        for user_id in &self.user_ids {
            write_packet(w, PacketTag::UserId, user_id)?;
        }
        if let Some(subkey) = &self.subkey {
            subkey.write_packet(w, false)?;
        }
        Ok(())
    }

    fn has_user_id(&self, name: &str) -> bool {
        self.user_ids
            .iter()
            .any(|id| String::from_utf8_lossy(id).contains(name))
    }

    /// Check the main key, then the subkey. A key that can't be used for
    /// `usage` is passed over.
    fn matches(&self, selector: KeySelector<'_>, usage: Option<KeyUsage>) -> Option<KeyMatch> {
        let candidates = [
            (&self.key, KeyMatch::Main, KeyMatch::MainByCryptlibId),
            (&self.subkey, KeyMatch::Subkey, KeyMatch::SubkeyByCryptlibId),
        ];
        candidates.into_iter().find_map(|(key, by_pgp_id, by_cryptlib_id)| {
            let key = key.as_ref()?;
            if usage.is_some_and(|usage| !key.permissions.permits(usage)) {
                return None;
            }
            match selector {
                KeySelector::Any => Some(by_pgp_id),
                KeySelector::KeyId(id) if id.len() == CRYPTLIB_ID_SIZE => {
                    key.matches_cryptlib_id(id).then_some(by_cryptlib_id)
                }
                KeySelector::KeyId(id) => key.matches_pgp_id(id).then_some(by_pgp_id),
                KeySelector::Name(name) => self.has_user_id(name).then_some(by_pgp_id),
            }
        })
    }
}

/// Personalities read from one or more keyrings.
#[derive(Clone, Debug, Default)]
pub struct PgpKeyring {
    personalities: Vec<PgpPersonality>,
    status: ScanStatus,
}

impl PgpKeyring {
    /// Create an empty keyring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `data` into a new keyring.
    pub fn scan(data: &[u8]) -> Self {
        let mut keyring = Self::new();
        keyring.scan_into(data);
        keyring
    }

    /// Scan `data`, appending to the personalities already held.
    pub fn scan_into(&mut self, data: &[u8]) {
        let mut r = Reader::new(data);
        let mut current: Option<PgpPersonality> = None;

        while !r.is_empty() {
            let packet = match read_packet(&mut r) {
                Ok(packet) => packet,
                Err(err) => {
                    log::warn!(
                        "stopping keyring scan at offset {}: {err}",
                        r.position()
                    );
                    self.status = ScanStatus::Incomplete;
                    if let Some(personality) = current.as_mut() {
                        personality.status = ScanStatus::Incomplete;
                    }
                    break;
                }
            };

            if packet.tag.is_primary_key() {
                if let Some(done) = current.take() {
                    self.personalities.push(done);
                }
                if self.personalities.len() >= MAX_PGP_OBJECTS {
                    log::warn!("keyring holds {MAX_PGP_OBJECTS} personalities, stopping scan");
                    self.status = ScanStatus::Incomplete;
                    return;
                }
                current = Some(self.open_personality(packet));
                continue;
            }

            match current.as_mut() {
                // packets belonging to an undecodable key are dropped
                Some(personality) if personality.key.is_none() => {
                    log::trace!("discarding {:?} after undecodable key", packet.tag);
                }
                Some(personality) => {
                    if let Err(err) = Self::attach(personality, packet) {
                        log::debug!("bad packet in personality: {err}");
                        personality.status = ScanStatus::Incomplete;
                        self.status = ScanStatus::Incomplete;
                    }
                }
                None => match packet.tag {
                    PacketTag::Marker | PacketTag::Signature | PacketTag::Trust => {}
                    PacketTag::Other(tag) => log::trace!("skipping packet type {tag}"),
                    tag => {
                        log::warn!("{tag:?} packet before any primary key");
                        self.status = ScanStatus::Incomplete;
                    }
                },
            }
        }

        if let Some(done) = current.take() {
            self.personalities.push(done);
        }
    }

    fn open_personality(&mut self, mut packet: Packet<'_>) -> PgpPersonality {
        let decoded = check_len(&packet)
            .and_then(|()| PgpKey::decode(&mut packet.body, packet.tag.is_secret()));
        match decoded {
            Ok((key, is_open_pgp)) => PgpPersonality {
                is_open_pgp,
                is_complete: true,
                ..PgpPersonality::new(key)
            },
            Err(err) => {
                log::debug!("undecodable {:?} packet: {err}", packet.tag);
                self.status = ScanStatus::Incomplete;
                PgpPersonality::placeholder()
            }
        }
    }

    fn attach(personality: &mut PgpPersonality, mut packet: Packet<'_>) -> Result<()> {
        if let PacketTag::Other(tag) = packet.tag {
            log::trace!("skipping packet type {tag}");
            return Ok(());
        }
        check_len(&packet)?;

        match packet.tag {
            tag if tag.is_subkey() => {
                if personality.subkey.is_some() {
                    log::trace!("skipping additional subkey");
                    return Ok(());
                }
                let (subkey, _) = PgpKey::decode(&mut packet.body, tag.is_secret())?;
                personality.subkey = Some(subkey);
            }
            PacketTag::UserId => {
                if personality.user_ids.len() >= MAX_PGP_USERIDS {
                    log::warn!("skipping user ID past the first {MAX_PGP_USERIDS}");
                    return Ok(());
                }
                personality.user_ids.push(packet.body.remaining_slice().to_vec());
            }
            _ => {}
        }
        Ok(())
    }

    /// Add a personality built with [`PgpPersonality::new`].
    pub fn add(&mut self, personality: PgpPersonality) -> Result<()> {
        if self.personalities.len() >= MAX_PGP_OBJECTS {
            return Err(Error::Overflow);
        }
        self.personalities.push(personality);
        Ok(())
    }

    /// Personalities in keyring order.
    pub fn personalities(&self) -> &[PgpPersonality] {
        &self.personalities
    }

    /// Number of personalities.
    pub fn len(&self) -> usize {
        self.personalities.len()
    }

    /// Is the keyring empty?
    pub fn is_empty(&self) -> bool {
        self.personalities.is_empty()
    }

    /// [`ScanStatus::Incomplete`] if any scan skipped data.
    pub fn status(&self) -> ScanStatus {
        self.status
    }

    /// Find the first personality with a key matching `selector` that can
    /// be used for `usage`. Within a personality the main key is tried
    /// before the subkey, so without a usage a name or wildcard lookup
    /// returns the main key.
    pub fn find(
        &self,
        selector: KeySelector<'_>,
        usage: Option<KeyUsage>,
    ) -> Result<(&PgpPersonality, KeyMatch)> {
        if let KeySelector::KeyId(id) = selector {
            if id.len() != PGP_ID_SIZE && id.len() != CRYPTLIB_ID_SIZE {
                return Err(Error::BadData);
            }
        }
        self.personalities
            .iter()
            .find_map(|personality| {
                personality
                    .matches(selector, usage)
                    .map(|which| (personality, which))
            })
            .ok_or(Error::NotFound)
    }

    /// Find the personality whose main key or subkey has the key ID `id`:
    /// 8 bytes for a PGP key ID, 20 for a cryptlib key ID.
    pub fn find_by_key_id(&self, id: &[u8]) -> Result<(&PgpPersonality, KeyMatch)> {
        self.find(KeySelector::KeyId(id), None)
    }

    /// Find the first personality with a user ID containing `name`.
    /// Matching is case-sensitive; user IDs that aren't UTF-8 are matched
    /// with invalid sequences replaced.
    pub fn find_by_name(&self, name: &str) -> Result<&PgpPersonality> {
        self.find(KeySelector::Name(name), None)
            .map(|(personality, _)| personality)
    }

    /// Find the first key usable for `usage`.
    pub fn find_by_usage(&self, usage: KeyUsage) -> Result<(&PgpPersonality, KeyMatch)> {
        self.find(KeySelector::Any, Some(usage))
    }
}

fn check_len(packet: &Packet<'_>) -> Result<()> {
    if packet.body.remaining() < packet.tag.min_body_len() {
        log::debug!(
            "{:?} packet of {} bytes is too short",
            packet.tag,
            packet.body.remaining()
        );
        return Err(Error::BadData);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveId;
    use crate::key::fixtures::{dlp_key, dlp_public, ecc_key, rsa_key, rsa_public};
    use hex_literal::hex;

    fn personality(main: PgpKey, user_ids: &[&str], subkey: Option<PgpKey>) -> Vec<u8> {
        let mut personality = PgpPersonality::new(main);
        for id in user_ids {
            personality.add_user_id(id).unwrap();
        }
        if let Some(subkey) = subkey {
            personality.set_subkey(subkey);
        }
        personality.finish();
        let mut w = Writer::new();
        personality.write(&mut w).unwrap();
        w.into_vec()
    }

    #[test]
    fn test_secret_key_roundtrip() {
        let main = PgpKey::from_private_key(rsa_key()).unwrap();
        let sub = PgpKey::from_private_key(ecc_key(Algorithm::Ecdh, CurveId::P256)).unwrap();
        let data = personality(main, &["alice"], Some(sub));
        assert_eq!(data[0], 0x95);

        let keyring = PgpKeyring::scan(&data);
        assert_eq!(keyring.status(), ScanStatus::Complete);
        let scanned = &keyring.personalities()[0];
        let main = scanned.main_key().unwrap().private_key().unwrap();
        assert_eq!(main.material(), rsa_key().material());
        let sub = scanned.subkey().unwrap().private_key().unwrap();
        assert_eq!(sub.material(), ecc_key(Algorithm::Ecdh, CurveId::P256).material());
        assert_eq!(scanned.user_id(0), Some(&b"alice"[..]));
    }

    #[test]
    fn test_checksum_mismatch() {
        let main = PgpKey::from_private_key(dlp_key(Algorithm::Dsa)).unwrap();
        let mut data = personality(main, &["bob"], None);
        // last byte of the first packet is the checksum
        let end = 3 + usize::from(u16::from_be_bytes([data[1], data[2]]));
        data[end - 1] ^= 1;

        let keyring = PgpKeyring::scan(&data);
        assert_eq!(keyring.status(), ScanStatus::Incomplete);
        assert!(keyring.personalities()[0].main_key().is_none());
        // the user ID belonged to the broken key
        assert!(keyring.personalities()[0].user_ids().is_empty());
    }

    #[test]
    fn test_encrypted_secret_kept_opaque() {
        let mut body = Writer::new();
        FamilyCodec::for_algorithm(Algorithm::Dsa)
            .write_public(&mut body, &dlp_public(Algorithm::Dsa), WireFormat::Pgp)
            .unwrap();
        let protected = hex!("fe 09 03 0102030405060708 ff aabbccdd");
        body.write_bytes(&protected).unwrap();
        let mut w = Writer::new();
        write_packet(&mut w, PacketTag::SecretKey, body.as_slice()).unwrap();
        let data = w.into_vec();

        let keyring = PgpKeyring::scan(&data);
        let key = keyring.personalities()[0].main_key().unwrap();
        assert!(key.private_key().is_none());
        assert!(key.is_secret());
        assert_eq!(key.encrypted_secret(), Some(&protected[..]));

        // written back unchanged
        let mut out = Writer::new();
        keyring.personalities()[0].write(&mut out).unwrap();
        assert_eq!(out.as_slice(), &data[..]);
    }

    #[test]
    fn test_capacity() {
        let one = personality(PgpKey::new(rsa_public()).unwrap(), &["carol"], None);
        let data = one.repeat(MAX_PGP_OBJECTS + 1);

        let keyring = PgpKeyring::scan(&data);
        assert_eq!(keyring.len(), MAX_PGP_OBJECTS);
        assert_eq!(keyring.status(), ScanStatus::Incomplete);

        let mut keyring = keyring;
        assert_eq!(
            keyring.add(PgpPersonality::new(PgpKey::new(rsa_public()).unwrap())),
            Err(Error::Overflow)
        );
    }

    #[test]
    fn test_user_id_cap() {
        let mut personality = PgpPersonality::new(PgpKey::new(rsa_public()).unwrap());
        for _ in 0..MAX_PGP_USERIDS {
            personality.add_user_id("dave").unwrap();
        }
        assert_eq!(personality.add_user_id("dave"), Err(Error::Overflow));
    }

    #[test]
    fn test_write_needs_finish() {
        let personality = PgpPersonality::new(PgpKey::new(rsa_public()).unwrap());
        let mut w = Writer::new();
        assert_eq!(personality.write(&mut w), Err(Error::NotAvailable));
        assert_eq!(PgpPersonality::placeholder().write(&mut w), Err(Error::NotAvailable));
    }

    #[test]
    fn test_user_id_bytes_kept() {
        let user_id = b"Ren\xe9 <rene@example.org>";
        let mut keyring_data = personality(PgpKey::new(rsa_public()).unwrap(), &[], None);
        let mut w = Writer::new();
        write_packet(&mut w, PacketTag::UserId, user_id).unwrap();
        keyring_data.extend_from_slice(w.as_slice());

        let keyring = PgpKeyring::scan(&keyring_data);
        let scanned = &keyring.personalities()[0];
        assert_eq!(scanned.user_id(0), Some(&user_id[..]));
        assert!(keyring.find_by_name("rene@example").is_ok());

        let mut out = Writer::new();
        scanned.write(&mut out).unwrap();
        assert_eq!(out.as_slice(), &keyring_data[..]);
    }

    #[test]
    fn test_usage_picks_subkey() {
        let main = PgpKey::new(dlp_public(Algorithm::Dsa)).unwrap();
        let sub = PgpKey::new(ecc_key(Algorithm::Ecdh, CurveId::P256).public_key().clone()).unwrap();
        let sub_ids = *sub.ids();
        let data = personality(main, &["erin"], Some(sub));
        let keyring = PgpKeyring::scan(&data);

        let (_, which) = keyring.find(KeySelector::Name("erin"), None).unwrap();
        assert_eq!(which, KeyMatch::Main);
        let (found, which) = keyring.find(KeySelector::Name("erin"), Some(KeyUsage::Crypt)).unwrap();
        assert_eq!(which, KeyMatch::Subkey);
        assert_eq!(found.matched_key(which).unwrap().ids(), &sub_ids);
        assert_eq!(keyring.find_by_usage(KeyUsage::Sign).unwrap().1, KeyMatch::Main);

        let (_, which) = keyring
            .find(KeySelector::KeyId(&sub_ids.cryptlib_id), Some(KeyUsage::Crypt))
            .unwrap();
        assert_eq!(which, KeyMatch::SubkeyByCryptlibId);
        assert_eq!(
            keyring
                .find(KeySelector::KeyId(&sub_ids.cryptlib_id), Some(KeyUsage::Sign))
                .err(),
            Some(Error::NotFound)
        );
    }

    #[test]
    fn test_placeholder_never_matches() {
        let mut keyring = PgpKeyring::new();
        keyring.add(PgpPersonality::placeholder()).unwrap();
        assert_eq!(keyring.find(KeySelector::Any, None).err(), Some(Error::NotFound));
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[0xff; 258]), 0x00fe);
    }
}
