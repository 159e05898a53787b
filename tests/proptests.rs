//! Property-based tests.

use keycodec::{
    bounded::{encoded_len, read_bounded, write_bounded, IntegerEncoding},
    cursor::{Reader, Writer},
    key::RsaPublic,
    params::Bounds,
    pgp::{read_packet, write_packet, PacketTag},
    signature::{self, DlSignature, SignatureFormat},
    Algorithm, BigUint, Error, Family, KeyContext, PublicKey, PublicKeyMaterial, WireFormat,
};
use proptest::prelude::*;

const ENCODINGS: [IntegerEncoding; 5] = [
    IntegerEncoding::Der,
    IntegerEncoding::DerTagged(3),
    IntegerEncoding::Ssh,
    IntegerEncoding::Ssl,
    IntegerEncoding::Pgp,
];

prop_compose! {
    /// Big-endian magnitude of exactly `len` significant bytes.
    fn magnitude(len: usize)(first in 1u8.., rest in proptest::collection::vec(any::<u8>(), len - 1)) -> Vec<u8> {
        let mut bytes = vec![first];
        bytes.extend_from_slice(&rest);
        bytes
    }
}

prop_compose! {
    fn rsa_public()(n in magnitude(128), e in prop_oneof![Just(3u32), Just(17), Just(65_537)]) -> PublicKey {
        PublicKey::new(
            Algorithm::Rsa,
            PublicKeyMaterial::Rsa(RsaPublic {
                n: BigUint::from_bytes_be(&n),
                e: BigUint::from(e),
            }),
        )
        .unwrap()
    }
}

proptest! {
    #[test]
    fn bounded_roundtrip(len in 1usize..=64, seed in any::<u64>(), encoding in proptest::sample::select(ENCODINGS.to_vec())) {
        let bytes: Vec<u8> = (0..len).map(|i| (seed.rotate_left(i as u32 * 7) as u8) | u8::from(i == 0)).collect();
        let value = BigUint::from_bytes_be(&bytes);
        let bounds = Bounds::new(len, len);

        let mut w = Writer::new();
        write_bounded(&mut w, &value, encoding).unwrap();
        let encoded = w.into_vec();
        prop_assert_eq!(encoded.len(), encoded_len(&value, encoding));

        let mut r = Reader::new(&encoded);
        prop_assert_eq!(read_bounded(&mut r, encoding, bounds, None).unwrap(), value.clone());
        prop_assert!(r.is_empty());

        // one byte short of the minimum
        let mut r = Reader::new(&encoded);
        prop_assert_eq!(
            read_bounded(&mut r, encoding, Bounds::new(len + 1, len + 1), None),
            Err(Error::BadData)
        );

        // not reduced modulo itself
        let mut r = Reader::new(&encoded);
        prop_assert_eq!(read_bounded(&mut r, encoding, bounds, Some(&value)), Err(Error::BadData));
    }

    #[test]
    fn bounded_truncation(bytes in magnitude(20), encoding in proptest::sample::select(ENCODINGS.to_vec()), cut in 1usize..20) {
        let value = BigUint::from_bytes_be(&bytes);
        let mut w = Writer::new();
        write_bounded(&mut w, &value, encoding).unwrap();
        let encoded = w.into_vec();

        let mut r = Reader::new(&encoded[..encoded.len() - cut]);
        prop_assert_eq!(read_bounded(&mut r, encoding, Bounds::new(1, 64), None), Err(Error::Underflow));
    }

    #[test]
    fn rsa_public_roundtrip(key in rsa_public()) {
        let source = KeyContext::from_public_key(key.clone());
        for format in [WireFormat::X509, WireFormat::Ssh1, WireFormat::Ssh2, WireFormat::Pgp] {
            let encoded = source.public_key_bytes(format).unwrap();
            let mut context = KeyContext::new(Algorithm::Rsa);
            context.read_public(&mut Reader::new(&encoded), format).unwrap();
            prop_assert_eq!(context.public_key().unwrap().material(), key.material());
            prop_assert_eq!(context.key_ids().unwrap().pgp2_id, source.key_ids().unwrap().pgp2_id);
        }
    }

    #[test]
    fn ssh_dsa_signature_is_40_bytes(r in magnitude(16), s in 1usize..=20, seed in any::<u8>()) {
        let sig = DlSignature {
            r: BigUint::from_bytes_be(&r),
            s: BigUint::from_bytes_be(&vec![seed | 1; s]),
        };
        let encoded = signature::encode(&sig, SignatureFormat::Ssh, Family::Dlp).unwrap();
        prop_assert_eq!(encoded.len(), 40);
        if s >= 16 {
            let q = BigUint::from_bytes_be(&[0x01; 21]);
            prop_assert_eq!(signature::decode(&encoded, &q, SignatureFormat::Ssh, Family::Dlp).unwrap(), sig);
        }
    }

    #[test]
    fn packet_framing(len in 0usize..70_000, tag in prop_oneof![Just(PacketTag::UserId), Just(PacketTag::UserAttribute), Just(PacketTag::Other(40))]) {
        let body = vec![0x5a; len];
        let mut w = Writer::new();
        write_packet(&mut w, tag, &body).unwrap();
        let encoded = w.into_vec();

        let mut r = Reader::new(&encoded);
        let packet = read_packet(&mut r).unwrap();
        prop_assert_eq!(packet.tag, tag);
        prop_assert_eq!(packet.body.remaining_slice(), &body[..]);
        prop_assert!(r.is_empty());
    }
}
