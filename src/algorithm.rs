//! Algorithms, wire formats and action permissions.

use const_oid::db::rfc5912;
use pkcs8::ObjectIdentifier;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Elgamal, as assigned under the cryptlib arc.
pub const ID_ELGAMAL: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.6.1.4.1.3029.1.2.1");

/// Public-key algorithms understood by the codec.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    /// RSA.
    Rsa,
    /// DSA.
    Dsa,
    /// Diffie-Hellman.
    Dh,
    /// Elgamal.
    Elgamal,
    /// ECDSA.
    Ecdsa,
    /// ECDH.
    Ecdh,
}

/// Key families sharing a component layout.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Family {
    /// `n, e`.
    Rsa,
    /// `p, q, g, y`.
    Dlp,
    /// Named curve and point.
    Ecc,
}

impl Algorithm {
    /// The component layout this algorithm uses.
    pub fn family(self) -> Family {
        match self {
            Algorithm::Rsa => Family::Rsa,
            Algorithm::Dsa | Algorithm::Dh | Algorithm::Elgamal => Family::Dlp,
            Algorithm::Ecdsa | Algorithm::Ecdh => Family::Ecc,
        }
    }

    /// Does the X.509 encoding put `g` before `q`?
    ///
    /// DSA parameters are `p, q, g`; the X9.42 layout used for DH and
    /// Elgamal is `p, g, q`.
    pub fn has_reversed_params(self) -> bool {
        matches!(self, Algorithm::Dh | Algorithm::Elgamal)
    }

    /// Algorithm OID used when writing an X.509 `AlgorithmIdentifier`.
    pub fn oid(self) -> ObjectIdentifier {
        match self {
            Algorithm::Rsa => rfc5912::RSA_ENCRYPTION,
            Algorithm::Dsa => rfc5912::ID_DSA,
            Algorithm::Dh => rfc5912::DHPUBLICNUMBER,
            Algorithm::Elgamal => ID_ELGAMAL,
            // ECDH keys are written as generic EC public keys.
            Algorithm::Ecdsa | Algorithm::Ecdh => rfc5912::ID_EC_PUBLIC_KEY,
        }
    }

    /// Map an X.509 algorithm OID back to an algorithm.
    pub fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        match *oid {
            rfc5912::RSA_ENCRYPTION => Some(Algorithm::Rsa),
            rfc5912::ID_DSA => Some(Algorithm::Dsa),
            rfc5912::DHPUBLICNUMBER => Some(Algorithm::Dh),
            ID_ELGAMAL => Some(Algorithm::Elgamal),
            rfc5912::ID_EC_PUBLIC_KEY => Some(Algorithm::Ecdsa),
            rfc5912::ID_EC_DH => Some(Algorithm::Ecdh),
            _ => None,
        }
    }

    /// Map a PGP public-key algorithm byte to an algorithm.
    pub fn from_pgp_id(id: u8) -> Option<Self> {
        match id {
            pgp_id::RSA | pgp_id::RSA_ENCRYPT_ONLY | pgp_id::RSA_SIGN_ONLY => Some(Algorithm::Rsa),
            pgp_id::ELGAMAL | pgp_id::ELGAMAL_SIGN => Some(Algorithm::Elgamal),
            pgp_id::DSA => Some(Algorithm::Dsa),
            pgp_id::ECDH => Some(Algorithm::Ecdh),
            pgp_id::ECDSA => Some(Algorithm::Ecdsa),
            _ => None,
        }
    }

    /// Does a key read under `found` satisfy a context expecting `self`?
    ///
    /// `id-ecPublicKey` doesn't say whether the key is for signing or key
    /// agreement, so either ECC algorithm accepts it.
    pub(crate) fn accepts(self, found: Algorithm) -> bool {
        self == found || (self == Algorithm::Ecdh && found == Algorithm::Ecdsa)
    }
}

/// PGP public-key algorithm identifiers.
pub mod pgp_id {
    /// RSA, encrypt or sign.
    pub const RSA: u8 = 1;
    /// RSA, encrypt only.
    pub const RSA_ENCRYPT_ONLY: u8 = 2;
    /// RSA, sign only.
    pub const RSA_SIGN_ONLY: u8 = 3;
    /// Elgamal, encrypt only.
    pub const ELGAMAL: u8 = 16;
    /// DSA.
    pub const DSA: u8 = 17;
    /// ECDH.
    pub const ECDH: u8 = 18;
    /// ECDSA.
    pub const ECDSA: u8 = 19;
    /// Elgamal, encrypt or sign (deprecated).
    pub const ELGAMAL_SIGN: u8 = 20;
}

/// Wire and file encodings.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WireFormat {
    /// X.509 `SubjectPublicKeyInfo`.
    X509,
    /// SSHv1 public key, RSA only.
    Ssh1,
    /// SSHv2 public-key blob.
    Ssh2,
    /// SSL/TLS key exchange parameters.
    SslLegacy,
    /// SSL/TLS key exchange parameters including `q`.
    SslExtended,
    /// OpenPGP / PGP 2 key packet body.
    Pgp,
    /// Native private-key layout.
    Pkcs8Current,
    /// PKCS#8 `PrivateKeyInfo`, as written by other toolkits.
    Pkcs8Legacy,
}

/// Who may invoke an action on a key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Permission {
    /// Nobody.
    #[default]
    None,
    /// Only the library itself, e.g. as part of a protocol exchange.
    InternalOnly,
    /// Anyone.
    All,
}

/// What a key is wanted for when picking one out of a keyring.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KeyUsage {
    /// Encryption or key agreement.
    Crypt,
    /// Signing or signature checks.
    Sign,
}

/// Per-action permissions derived while reading a key.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionPermissions {
    /// Encrypt / key agreement.
    pub encrypt: Permission,
    /// Decrypt.
    pub decrypt: Permission,
    /// Sign.
    pub sign: Permission,
    /// Signature check.
    pub sig_check: Permission,
}

impl ActionPermissions {
    /// Every action open to everyone.
    pub const ALL: Self = Self {
        encrypt: Permission::All,
        decrypt: Permission::All,
        sign: Permission::All,
        sig_check: Permission::All,
    };

    /// Nothing permitted.
    pub const NONE: Self = Self {
        encrypt: Permission::None,
        decrypt: Permission::None,
        sign: Permission::None,
        sig_check: Permission::None,
    };

    /// Encrypt and decrypt at `level`.
    pub const fn crypt(level: Permission) -> Self {
        Self {
            encrypt: level,
            decrypt: level,
            sign: Permission::None,
            sig_check: Permission::None,
        }
    }

    /// Sign and signature check at `level`.
    pub const fn sign(level: Permission) -> Self {
        Self {
            encrypt: Permission::None,
            decrypt: Permission::None,
            sign: level,
            sig_check: level,
        }
    }

    /// Combine two permission sets, keeping the more permissive level for
    /// each action.
    pub fn union(self, other: Self) -> Self {
        Self {
            encrypt: self.encrypt.max(other.encrypt),
            decrypt: self.decrypt.max(other.decrypt),
            sign: self.sign.max(other.sign),
            sig_check: self.sig_check.max(other.sig_check),
        }
    }

    /// Can the key be used for `usage` at all?
    pub fn permits(self, usage: KeyUsage) -> bool {
        let (a, b) = match usage {
            KeyUsage::Crypt => (self.encrypt, self.decrypt),
            KeyUsage::Sign => (self.sign, self.sig_check),
        };
        a != Permission::None || b != Permission::None
    }

    /// Restrict to what both permission sets allow.
    pub fn intersect(self, other: Self) -> Self {
        Self {
            encrypt: self.encrypt.min(other.encrypt),
            decrypt: self.decrypt.min(other.decrypt),
            sign: self.sign.min(other.sign),
            sig_check: self.sig_check.min(other.sig_check),
        }
    }

    /// Usual permissions for a key of this algorithm when the format
    /// doesn't say otherwise.
    pub fn for_algorithm(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Rsa => Self::ALL,
            Algorithm::Dsa | Algorithm::Ecdsa => Self::sign(Permission::InternalOnly),
            Algorithm::Dh | Algorithm::Elgamal | Algorithm::Ecdh => {
                Self::crypt(Permission::InternalOnly)
            }
        }
    }
}
