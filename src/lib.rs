#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo_small.png")]
#![warn(missing_docs)]

//! # Supported layouts
//!
//! | Family | X.509 | SSH1 | SSH2 | SSL | PGP | PKCS#8 current | PKCS#8 legacy |
//! |---|---|---|---|---|---|---|---|
//! | RSA | ✓ | ✓ | ✓ | | ✓ | ✓ | ✓ |
//! | DSA | ✓ | | ✓ | | ✓ | ✓ | ✓ |
//! | DH | ✓ | | ✓ | ✓ | | ✓ | |
//! | Elgamal | ✓ | | | | ✓ | ✓ | |
//! | ECDSA, ECDH | ✓ | | ✓ | ✓ | ✓ | ✓ | |
//!
//! # Usage
//!
//! ## Loading a key
//!
//! A [`KeyContext`] is created for an algorithm and then fed the public
//! and private halves, in whatever format they arrive in. Once loaded, the
//! key can be written in any other format the family supports.
//!
//! ```
//! use hex_literal::hex;
//! use keycodec::{cursor::Reader, Algorithm, KeyContext, WireFormat};
//!
//! let spki = hex!(
//!     "30819f300d06092a864886f70d010101050003818d0030818902818100"
//!     "d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285"
//!     "e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770"
//!     "b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e"
//!     "719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9"
//!     "0203010001"
//! );
//!
//! let mut context = KeyContext::new(Algorithm::Rsa);
//! context.read_public(&mut Reader::new(&spki), WireFormat::X509)?;
//!
//! let ssh = context.public_key_bytes(WireFormat::Ssh2)?;
//! assert_eq!(&ssh[4..15], b"\x00\x00\x00\x07ssh-rsa");
//!
//! let ids = context.key_ids()?;
//! assert_eq!(ids.pgp2_id, Some(hex!("55502258336987d9")));
//! # Ok::<(), keycodec::Error>(())
//! ```
//!
//! ## PGP keyrings
//!
//! [`scanner::PgpKeyring`] groups the packets of a keyring into
//! personalities: a primary key, an optional subkey and its user IDs.
//! Packets that can't be decoded are skipped and the keyring is flagged
//! [`scanner::ScanStatus::Incomplete`].
//!
//! ```
//! use keycodec::scanner::{PgpKeyring, ScanStatus};
//! use keycodec::Error;
//!
//! let keyring = PgpKeyring::scan(&[]);
//! assert!(keyring.is_empty());
//! assert_eq!(keyring.status(), ScanStatus::Complete);
//! assert_eq!(keyring.find_by_name("alice").err(), Some(Error::NotFound));
//! ```
//!
//! ## PKCS#8 and SPKI
//!
//! [`PublicKey`] implements the [`spki`] encoding traits and [`PrivateKey`]
//! the [`pkcs8`] ones, so the PEM helpers of those crates work as well:
//!
//! - [`pkcs8::DecodePublicKey`]: decode public keys from SPKI
//! - [`pkcs8::EncodePublicKey`]: encode public keys to SPKI
//! - [`pkcs8::DecodePrivateKey`]: decode RSA and DSA private keys from PKCS#8
//! - [`pkcs8::EncodePrivateKey`]: encode RSA and DSA private keys to PKCS#8
//!
//! [`pkcs8::DecodePublicKey`]: https://docs.rs/pkcs8/latest/pkcs8/trait.DecodePublicKey.html
//! [`pkcs8::EncodePublicKey`]: https://docs.rs/pkcs8/latest/pkcs8/trait.EncodePublicKey.html

#[cfg(doctest)]
pub struct ReadmeDoctests;

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use num_bigint::BigUint;

pub mod algorithm;
pub mod bounded;
pub mod context;
pub mod cursor;
pub mod curve;
pub mod errors;
pub mod key;
pub mod keyid;
pub mod params;
pub mod pgp;
pub mod scanner;
pub mod signature;

mod asn1;
mod encoding;
mod internals;
mod private;
mod public;

pub use pkcs1;
pub use pkcs8;
pub use spki;

pub use crate::{
    algorithm::{ActionPermissions, Algorithm, Family, KeyUsage, Permission, WireFormat},
    context::{FamilyCodec, KeyContext},
    curve::CurveId,
    errors::{Error, Result},
    key::{PrivateKey, PrivateKeyMaterial, PublicKey, PublicKeyMaterial, PublicKeyParts},
    keyid::KeyIdentifiers,
    signature::{DlSignature, SignatureFormat},
};
