//! In-memory key material.

use core::fmt;
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::algorithm::{ActionPermissions, Algorithm, Family};
use crate::curve::CurveId;
use crate::errors::{Error, Result};

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// RSA public components.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RsaPublic {
    /// Modulus
    pub n: BigUint,
    /// Public exponent
    pub e: BigUint,
}

impl PublicKeyParts for RsaPublic {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

/// DLP domain parameters and public value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DlpPublic {
    /// Prime modulus.
    pub p: BigUint,
    /// Subgroup order. PGP, SSH and SSL sources don't carry it for DH and
    /// Elgamal.
    pub q: Option<BigUint>,
    /// Generator.
    pub g: BigUint,
    /// Public value `g^x mod p`. DH parameters exchanged over SSH or SSL
    /// don't carry it.
    pub y: Option<BigUint>,
}

/// Affine point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EccPoint {
    /// x coordinate.
    pub x: BigUint,
    /// y coordinate.
    pub y: BigUint,
}

/// ECC named curve and public point.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EccPublic {
    /// Curve the point lies on.
    pub curve: CurveId,
    /// Public point `Q`. SSL key exchange parameters name only the curve.
    pub point: Option<EccPoint>,
}

/// Public components of a key, by family.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublicKeyMaterial {
    /// RSA.
    Rsa(RsaPublic),
    /// DSA, DH or Elgamal.
    Dlp(DlpPublic),
    /// ECDSA or ECDH.
    Ecc(EccPublic),
}

impl PublicKeyMaterial {
    /// The family these components belong to.
    pub fn family(&self) -> Family {
        match self {
            PublicKeyMaterial::Rsa(_) => Family::Rsa,
            PublicKeyMaterial::Dlp(_) => Family::Dlp,
            PublicKeyMaterial::Ecc(_) => Family::Ecc,
        }
    }

    pub(crate) fn as_rsa(&self) -> Result<&RsaPublic> {
        match self {
            PublicKeyMaterial::Rsa(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }

    pub(crate) fn as_dlp(&self) -> Result<&DlpPublic> {
        match self {
            PublicKeyMaterial::Dlp(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }

    pub(crate) fn as_ecc(&self) -> Result<&EccPublic> {
        match self {
            PublicKeyMaterial::Ecc(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }
}

/// A public key: algorithm, components and the PGP metadata that feeds
/// into its OpenPGP key ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey {
    algorithm: Algorithm,
    material: PublicKeyMaterial,
    creation_time: u32,
    pgp_algorithm: Option<u8>,
}

impl PublicKey {
    /// Bind components to an algorithm. The algorithm's family must match
    /// the components.
    pub fn new(algorithm: Algorithm, material: PublicKeyMaterial) -> Result<Self> {
        if algorithm.family() != material.family() {
            return Err(Error::BadData);
        }
        Ok(Self {
            algorithm,
            material,
            creation_time: 0,
            pgp_algorithm: None,
        })
    }

    /// Set the PGP creation time (seconds since the epoch, 0 if unknown).
    pub fn with_creation_time(mut self, creation_time: u32) -> Self {
        self.creation_time = creation_time;
        self
    }

    pub(crate) fn with_pgp_algorithm(mut self, pgp_algorithm: u8) -> Self {
        self.pgp_algorithm = Some(pgp_algorithm);
        self
    }

    /// Algorithm the key is used with.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Public components.
    pub fn material(&self) -> &PublicKeyMaterial {
        &self.material
    }

    /// PGP creation time, 0 if unknown.
    pub fn creation_time(&self) -> u32 {
        self.creation_time
    }

    /// PGP algorithm byte the key was read with, if it came from PGP.
    pub fn pgp_algorithm(&self) -> Option<u8> {
        self.pgp_algorithm
    }
}

/// Value read from the wire along with the permissions its format implies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Decoded<T> {
    /// The decoded value.
    pub value: T,
    /// Actions the encoding permits.
    pub permissions: ActionPermissions,
}

/// RSA CRT values.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct CrtValues {
    /// `d mod (p-1)`
    pub exponent1: BigUint,
    /// `d mod (q-1)`
    pub exponent2: BigUint,
    /// `q^-1 mod p`
    pub coefficient: BigUint,
}

/// RSA private components.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct RsaPrivate {
    /// Private exponent, recomputed from the factors when absent.
    pub d: Option<BigUint>,
    /// First prime factor.
    pub p: BigUint,
    /// Second prime factor.
    pub q: BigUint,
    /// CRT values, all present or all absent.
    pub crt: Option<CrtValues>,
}

/// DLP private exponent.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct DlpPrivate {
    /// Secret exponent.
    pub x: BigUint,
}

/// ECC private scalar.
#[derive(Clone, Eq, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct EccPrivate {
    /// Secret scalar.
    pub d: BigUint,
}

/// Private components of a key, by family.
#[derive(Clone, Eq, PartialEq)]
pub enum PrivateKeyMaterial {
    /// RSA.
    Rsa(RsaPrivate),
    /// DSA, DH or Elgamal.
    Dlp(DlpPrivate),
    /// ECDSA or ECDH.
    Ecc(EccPrivate),
}

impl PrivateKeyMaterial {
    /// The family these components belong to.
    pub fn family(&self) -> Family {
        match self {
            PrivateKeyMaterial::Rsa(_) => Family::Rsa,
            PrivateKeyMaterial::Dlp(_) => Family::Dlp,
            PrivateKeyMaterial::Ecc(_) => Family::Ecc,
        }
    }

    pub(crate) fn as_rsa(&self) -> Result<&RsaPrivate> {
        match self {
            PrivateKeyMaterial::Rsa(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }

    pub(crate) fn as_dlp(&self) -> Result<&DlpPrivate> {
        match self {
            PrivateKeyMaterial::Dlp(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }

    pub(crate) fn as_ecc(&self) -> Result<&EccPrivate> {
        match self {
            PrivateKeyMaterial::Ecc(key) => Ok(key),
            _ => Err(Error::Internal),
        }
    }
}

impl fmt::Debug for PrivateKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKeyMaterial::Rsa(key) => f
                .debug_struct("RsaPrivate")
                .field("has_d", &key.d.is_some())
                .field("has_crt", &key.crt.is_some())
                .finish_non_exhaustive(),
            PrivateKeyMaterial::Dlp(_) => f.debug_struct("DlpPrivate").finish_non_exhaustive(),
            PrivateKeyMaterial::Ecc(_) => f.debug_struct("EccPrivate").finish_non_exhaustive(),
        }
    }
}

/// Private components bound to the public key they belong to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrivateKey {
    public: PublicKey,
    material: PrivateKeyMaterial,
}

impl PrivateKey {
    /// Pair private components with a public key of the same family.
    pub fn new(public: PublicKey, material: PrivateKeyMaterial) -> Result<Self> {
        if public.material().family() != material.family() {
            return Err(Error::BadData);
        }
        Ok(Self { public, material })
    }

    /// The public half.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Private components.
    pub fn material(&self) -> &PrivateKeyMaterial {
        &self.material
    }
}

impl DlpPublic {
    /// Is the public value missing or zero?
    pub(crate) fn y_is_zero(&self) -> bool {
        self.y.as_ref().map_or(true, Zero::is_zero)
    }
}

/// RSA-1024 key from the Wycheproof `rsa_oaep_misc_test` vectors.
#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const N: &[u8] = b"d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9";
    pub const D: &[u8] = b"5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc183622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801";
    pub const P: &[u8] = b"e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b064e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681";
    pub const Q: &[u8] = b"e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559";
    pub const EXP1: &[u8] = b"a327c8e8f19d4150428f5e055a3ceaca846a19e30d45534ad60d894b56caf9b1bf0c9a8d965b0a882dfd2e1485154ee5cbe052e8d4f525c2d5fa9554b1992a01";
    pub const EXP2: &[u8] = b"91f17ceb411a247e056287f79787f498b9cc2d1400e43dce10b91dcfe8e30adf80820d42d12b54f4247dce8eee193421cd602e843930f944c81a0dfa730081d9";
    pub const COEFF: &[u8] = b"75915a454770b49082423761244ccec65a6e48ae9966344b675610facad9162fa5bd1cc5108c322c2fb3c144f807773a2c7d097f63e5c8d3bd8ce8efac2ade04";

    pub fn big(hex: &[u8]) -> BigUint {
        BigUint::parse_bytes(hex, 16).unwrap()
    }

    pub fn rsa_public() -> PublicKey {
        PublicKey::new(
            Algorithm::Rsa,
            PublicKeyMaterial::Rsa(RsaPublic {
                n: big(N),
                e: BigUint::from(65_537u32),
            }),
        )
        .unwrap()
    }

    pub fn rsa_private(with_d: bool, with_crt: bool) -> RsaPrivate {
        RsaPrivate {
            d: with_d.then(|| big(D)),
            p: big(P),
            q: big(Q),
            crt: with_crt.then(|| CrtValues {
                exponent1: big(EXP1),
                exponent2: big(EXP2),
                coefficient: big(COEFF),
            }),
        }
    }

    pub fn rsa_key() -> PrivateKey {
        PrivateKey::new(rsa_public(), PrivateKeyMaterial::Rsa(rsa_private(true, true))).unwrap()
    }

    /// Synthetic DLP parameters: the values are in range but `p` isn't prime.
    pub fn dlp_public(algorithm: Algorithm) -> PublicKey {
        let mut p = [0xd7u8; 128];
        p[127] = 0x0b;
        PublicKey::new(
            algorithm,
            PublicKeyMaterial::Dlp(DlpPublic {
                p: BigUint::from_bytes_be(&p),
                q: Some(BigUint::from_bytes_be(&[0x9b; 20])),
                g: BigUint::from(2u32),
                y: Some(BigUint::from_bytes_be(&[0x5a; 127])),
            }),
        )
        .unwrap()
    }

    pub fn dlp_key(algorithm: Algorithm) -> PrivateKey {
        PrivateKey::new(
            dlp_public(algorithm),
            PrivateKeyMaterial::Dlp(DlpPrivate {
                x: BigUint::from_bytes_be(&[0x3b; 20]),
            }),
        )
        .unwrap()
    }

    pub fn ecc_public(algorithm: Algorithm, curve: CurveId) -> PublicKey {
        let size = curve.field_size();
        PublicKey::new(
            algorithm,
            PublicKeyMaterial::Ecc(EccPublic {
                curve,
                point: Some(EccPoint {
                    x: BigUint::from_bytes_be(&alloc::vec![0x3c; size - 1]),
                    y: BigUint::from_bytes_be(&alloc::vec![0x41; size - 1]),
                }),
            }),
        )
        .unwrap()
    }

    pub fn ecc_key(algorithm: Algorithm, curve: CurveId) -> PrivateKey {
        PrivateKey::new(
            ecc_public(algorithm, curve),
            PrivateKeyMaterial::Ecc(EccPrivate {
                d: BigUint::from_bytes_be(&alloc::vec![0x1d; curve.field_size() - 1]),
            }),
        )
        .unwrap()
    }
}
