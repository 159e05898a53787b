//! Size limits for key components.
//!
//! All lengths are in bytes and refer to the magnitude of the value, with
//! sign padding and leading zero bytes stripped.

/// Smallest modulus/prime accepted for RSA and DLP keys (1008 bits).
pub const MIN_PKCSIZE: usize = 126;

/// Largest modulus/prime accepted for RSA and DLP keys (4096 bits).
pub const MAX_PKCSIZE: usize = 512;

/// Smallest ECC field size (one byte short of 256 bits).
pub const MIN_PKCSIZE_ECC: usize = 31;

/// Largest ECC component size (576 bits).
pub const MAX_PKCSIZE_ECC: usize = 72;

/// Maximum number of personalities a PGP keyring holds.
pub const MAX_PGP_OBJECTS: usize = 16;

/// Maximum number of user IDs retained per PGP personality.
pub const MAX_PGP_USERIDS: usize = 16;

/// Inclusive byte-length range for a single integer field.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Bounds {
    /// Shortest permitted length.
    pub min: usize,
    /// Longest permitted length.
    pub max: usize,
}

impl Bounds {
    /// Create a new range.
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Does `len` fall within this range?
    pub const fn contains(&self, len: usize) -> bool {
        len >= self.min && len <= self.max
    }
}

pub(crate) const RSA_N: Bounds = Bounds::new(MIN_PKCSIZE, MAX_PKCSIZE);
pub(crate) const RSA_E: Bounds = Bounds::new(1, 4);
pub(crate) const RSA_D: Bounds = Bounds::new(MIN_PKCSIZE, MAX_PKCSIZE);
pub(crate) const RSA_FACTOR: Bounds = Bounds::new(MIN_PKCSIZE / 2 - 1, MAX_PKCSIZE);

pub(crate) const DLP_P: Bounds = Bounds::new(MIN_PKCSIZE, MAX_PKCSIZE);
pub(crate) const DLP_G: Bounds = Bounds::new(1, MAX_PKCSIZE);
pub(crate) const DLP_Q: Bounds = Bounds::new(16, MAX_PKCSIZE);
pub(crate) const DLP_Y: Bounds = Bounds::new(MIN_PKCSIZE - 1, MAX_PKCSIZE);
pub(crate) const DLP_X: Bounds = Bounds::new(16, MAX_PKCSIZE);
pub(crate) const DLP_SIG: Bounds = Bounds::new(16, MAX_PKCSIZE);

pub(crate) const ECC_COORDINATE: Bounds = Bounds::new(MIN_PKCSIZE_ECC / 2, MAX_PKCSIZE_ECC);
pub(crate) const ECC_D: Bounds = Bounds::new(MIN_PKCSIZE_ECC / 2, MAX_PKCSIZE_ECC);
pub(crate) const ECC_SIG: Bounds = Bounds::new(MIN_PKCSIZE_ECC / 2, MAX_PKCSIZE_ECC);

/// Encoded uncompressed point: `0x04 || X || Y`.
pub(crate) const ECC_POINT: Bounds = Bounds::new(
    ECC_COORDINATE.min * 2 + 1,
    MAX_PKCSIZE_ECC * 2 + 1,
);
