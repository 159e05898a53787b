//! Test vectors produced by other implementations: SPKI and PKCS#8 from
//! OpenSSL via pyca/cryptography, key IDs from SHA-1 over the encodings.

use hex_literal::hex;
use keycodec::{
    cursor::Reader,
    keyid::{cryptlib_id, openpgp_id},
    pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePrivateKey, EncodePublicKey},
    Algorithm, CurveId, KeyContext, KeyIdentifiers, PrivateKey, PublicKey, PublicKeyMaterial,
    WireFormat,
};

const RSA_SPKI: &[u8] = &hex!(
    "30819f300d06092a864886f70d010101050003818d0030818902818100d0941e"
    "63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8"
    "e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054"
    "c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f72"
    "1f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9020301"
    "0001"
);

const RSA_PKCS8: &[u8] = &hex!(
    "30820277020100300d06092a864886f70d0101010500048202613082025d0201"
    "0002818100d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f069"
    "9ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85"
    "f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c449"
    "94af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc69555022"
    "58336987d902030100010281805ff4a47e690ea338573e3d8b3fea5c32378ff4"
    "296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3"
    "f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430"
    "f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f"
    "00b83b51dab8ba930d88826801024100e882d12d5f0be26a80359f13c08210bd"
    "cbf759dfee695313efa8886919659b064e3c656a267af6275ed1af89a5dfe9e2"
    "5b31a02bafbd59445b7507a22989a681024100e5a65cfa668bd857d59135a78c"
    "18c8adb7c222368e9d74abad8e83299f7ac3c2ad7aa44ddb05deea6d9b20dbaf"
    "09a8615284a17c72d3723240334685ea7e2559024100a327c8e8f19d4150428f"
    "5e055a3ceaca846a19e30d45534ad60d894b56caf9b1bf0c9a8d965b0a882dfd"
    "2e1485154ee5cbe052e8d4f525c2d5fa9554b1992a0102410091f17ceb411a24"
    "7e056287f79787f498b9cc2d1400e43dce10b91dcfe8e30adf80820d42d12b54"
    "f4247dce8eee193421cd602e843930f944c81a0dfa730081d9024075915a4547"
    "70b49082423761244ccec65a6e48ae9966344b675610facad9162fa5bd1cc510"
    "8c322c2fb3c144f807773a2c7d097f63e5c8d3bd8ce8efac2ade04"
);

const DSA_SPKI: &[u8] = &hex!(
    "308201b73082012b06072a8648ce3804013082011e02818100fbd699d98ecc82"
    "0c491215d4d3713bf8acc34306b824fa97a8ce56a42571ea68e60b68eb0c7e92"
    "962aa87fef784ad2ceae483f27deda9c6a59351cf09aaef818fe766347925c58"
    "a1a940cbc841345987fc22c7f58a7aac11c2c02892928bda1479108ee8b55900"
    "46c4c0aa8e2ee9c88e7ee32235ffe81d80d1201806c0afb34f021500f0ee1354"
    "32584ab4d00dcb861f7775e5eeb630ad02818067c41474c8b409431032d76496"
    "1b5a82b211f1c513d58b433724748a81bc358a9d9aee94429c807575a982b4f2"
    "4aae2f041de67f226b3e5d8a078d37353f52332b34ce4c463eb6d573bb6ce53e"
    "61c2d7330149b36dcb480421e2fa87bb77f3284f1a3814ac4777f0f599dc4d4a"
    "839ccb0e7a8ae27cb15a21ea2dd27dff1824790381850002818100b99125968a"
    "2cdbbfcf71e10e47854bf180ca46da8ed2f40f8dcad19614df3c929753a51de8"
    "1b5d671eebb9383ccdb3ed996fdd9266f522a46797ce6dda5e4d63d0afeb4c01"
    "0fe228003fe8381ba5081df665976705f7e4da28f85c426b1f021106c6327507"
    "0b995247ace25988516382bcae77cbfbbbd14ebbc8a36a410537c6"
);

const DSA_PKCS8: &[u8] = &hex!(
    "3082014a0201003082012b06072a8648ce3804013082011e02818100fbd699d9"
    "8ecc820c491215d4d3713bf8acc34306b824fa97a8ce56a42571ea68e60b68eb"
    "0c7e92962aa87fef784ad2ceae483f27deda9c6a59351cf09aaef818fe766347"
    "925c58a1a940cbc841345987fc22c7f58a7aac11c2c02892928bda1479108ee8"
    "b5590046c4c0aa8e2ee9c88e7ee32235ffe81d80d1201806c0afb34f021500f0"
    "ee135432584ab4d00dcb861f7775e5eeb630ad02818067c41474c8b409431032"
    "d764961b5a82b211f1c513d58b433724748a81bc358a9d9aee94429c807575a9"
    "82b4f24aae2f041de67f226b3e5d8a078d37353f52332b34ce4c463eb6d573bb"
    "6ce53e61c2d7330149b36dcb480421e2fa87bb77f3284f1a3814ac4777f0f599"
    "dc4d4a839ccb0e7a8ae27cb15a21ea2dd27dff182479041602143b926b1f0dce"
    "df64310f033f3444d9a0f44ec59d"
);

const P256_SPKI: &[u8] = &hex!(
    "3059301306072a8648ce3d020106082a8648ce3d030107034200044f22b608b1"
    "4e6336d0a633b3b7a67b00a9665271a80a3ee3f4f5318edbb83b6c806d78cc75"
    "dea5dec3ec47db35d653f0ce52ea2339db17c7f4249bacb4931d27"
);

const P384_SPKI: &[u8] = &hex!(
    "3076301006072a8648ce3d020106052b81040022036200043cbfe3ac5898ac38"
    "0163a5307e952d58c0b4800643580eb90020ddb8082bf4c1b1b28b62bf98a992"
    "4ccd8e4ebe2c9bc45cd96a92434f3219299ac629709ece6002f59a25e293cd49"
    "05ed4ff154eb7e4ccb3a35b7aba4133ff56905b828147fcb"
);

fn load_public(algorithm: Algorithm, spki: &[u8]) -> KeyContext {
    let mut context = KeyContext::new(algorithm);
    let mut r = Reader::new(spki);
    context.read_public(&mut r, WireFormat::X509).unwrap();
    assert!(r.is_empty());
    context
}

#[test]
fn rsa_spki() {
    let context = load_public(Algorithm::Rsa, RSA_SPKI);
    assert_eq!(context.public_key_bytes(WireFormat::X509).unwrap(), RSA_SPKI);

    let ids = context.key_ids().unwrap();
    assert_eq!(ids.cryptlib_id, hex!("3505a80575ceb63f1a556cad8db57fcd3c4a5862"));
    assert_eq!(ids.pgp2_id, Some(hex!("55502258336987d9")));

    let dated = context.public_key().unwrap().clone().with_creation_time(0x5e0b_e100);
    assert_eq!(openpgp_id(&dated).unwrap(), Some(hex!("3c65521f5fdcc9c3")));
}

#[test]
fn rsa_pkcs8() {
    let mut context = KeyContext::new(Algorithm::Rsa);
    context
        .read_private(&mut Reader::new(RSA_PKCS8), WireFormat::Pkcs8Legacy)
        .unwrap();
    assert_eq!(context.public_key_bytes(WireFormat::X509).unwrap(), RSA_SPKI);
    assert_eq!(
        &context.private_key_bytes(WireFormat::Pkcs8Legacy).unwrap()[..],
        RSA_PKCS8
    );

    // the same bytes through the pkcs8 traits
    let key = PrivateKey::from_pkcs8_der(RSA_PKCS8).unwrap();
    assert_eq!(key.to_pkcs8_der().unwrap().as_bytes(), RSA_PKCS8);
}

#[test]
fn rsa_pkcs8_with_preloaded_public_key() {
    let mut context = load_public(Algorithm::Rsa, RSA_SPKI);
    context
        .read_private(&mut Reader::new(RSA_PKCS8), WireFormat::Pkcs8Legacy)
        .unwrap();

    // and out again in the native layout
    let native = context.private_key_bytes(WireFormat::Pkcs8Current).unwrap();
    let mut reloaded = load_public(Algorithm::Rsa, RSA_SPKI);
    reloaded
        .read_private(&mut Reader::new(&native), WireFormat::Pkcs8Current)
        .unwrap();
    assert_eq!(reloaded.private_key(), context.private_key());
}

#[test]
fn dsa_spki() {
    let context = load_public(Algorithm::Dsa, DSA_SPKI);
    assert_eq!(context.public_key_bytes(WireFormat::X509).unwrap(), DSA_SPKI);

    let ids = context.key_ids().unwrap();
    assert_eq!(ids.cryptlib_id, hex!("bab7b46c8db748573979c9be0e796276f1b72224"));
    assert_eq!(ids.pgp2_id, None);
    assert_eq!(ids.openpgp_id, Some(hex!("97b3cfe7c2950ff9")));
}

#[test]
fn dsa_pkcs8_recomputes_public_value() {
    let mut context = KeyContext::new(Algorithm::Dsa);
    context
        .read_private(&mut Reader::new(DSA_PKCS8), WireFormat::Pkcs8Legacy)
        .unwrap();
    // y = g^x mod p matches the published key
    assert_eq!(context.public_key_bytes(WireFormat::X509).unwrap(), DSA_SPKI);
    assert_eq!(
        &context.private_key_bytes(WireFormat::Pkcs8Legacy).unwrap()[..],
        DSA_PKCS8
    );
}

#[test]
fn ecc_spki() {
    for (spki, curve, cryptlib) in [
        (P256_SPKI, CurveId::P256, hex!("27340ad380956fcd53ab46bb0c18f35709283b22")),
        (P384_SPKI, CurveId::P384, hex!("8e9fa099998f20f311a000943f4316a862dfab19")),
    ] {
        let context = load_public(Algorithm::Ecdsa, spki);
        let key = context.public_key().unwrap();
        match key.material() {
            PublicKeyMaterial::Ecc(ecc) => assert_eq!(ecc.curve, curve),
            other => panic!("unexpected key material {other:?}"),
        }
        assert_eq!(context.public_key_bytes(WireFormat::X509).unwrap(), spki);
        assert_eq!(cryptlib_id(key).unwrap(), cryptlib);
    }

    let ids = KeyIdentifiers::from_spki(P256_SPKI, 0).unwrap();
    assert_eq!(ids.openpgp_id, Some(hex!("f37fa827cea29830")));
}

#[test]
fn spki_traits() {
    for spki in [RSA_SPKI, DSA_SPKI, P256_SPKI] {
        let key = PublicKey::from_public_key_der(spki).unwrap();
        assert_eq!(key.to_public_key_der().unwrap().as_bytes(), spki);
    }
}

#[test]
fn ssh_and_pgp_agree_on_ids() {
    let context = load_public(Algorithm::Dsa, DSA_SPKI);
    let expected = context.key_ids().unwrap();

    for format in [WireFormat::Ssh2, WireFormat::Pgp] {
        let encoded = context.public_key_bytes(format).unwrap();
        let mut reloaded = KeyContext::new(Algorithm::Dsa);
        reloaded
            .read_public(&mut Reader::new(&encoded), format)
            .unwrap();
        assert_eq!(reloaded.key_ids().unwrap(), expected, "{format:?}");
    }
}
