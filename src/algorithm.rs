use num_enum::TryFromPrimitive;
use sha2::digest::crypto_common::BlockSizeUser;
use sha2::digest::{Digest, FixedOutputReset, Update};
use sha2::{Sha256, Sha512};

use crate::error::InvalidConfiguration;

// Field sizes in the fs-verity descriptor:
// https://www.kernel.org/doc/html/latest/filesystems/fsverity.html#fs-verity-descriptor
pub const MAX_DIGEST_SIZE: usize = 64;
pub const MAX_SALT_SIZE: usize = 32;

/// Hard cap on tree depth, matching FS_VERITY_MAX_LEVELS in the kernel.
/// Eight levels cover any data size a u64 can express at the minimum
/// branching factor.
pub const MAX_LEVELS: usize = 8;

/// Block size used when none is given. The kernel requires the block size to
/// equal the system page size, which is 4096 nearly everywhere.
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

static ZEROES: [u8; 128] = [0u8; 128];

/// The supported hash algorithms, numbered as in the fs-verity kernel API.
///
/// Converts to and from the `sha256` / `sha512` spellings used by the
/// `fsverity` tools ([`std::fmt::Display`] / [`std::str::FromStr`]), and to
/// and from the kernel's numeric identifiers (`as u8` / [`TryFromPrimitive`]).
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Debug,
    parse_display::Display,
    parse_display::FromStr,
    TryFromPrimitive,
)]
#[display(style = "lowercase")]
#[repr(u8)]
pub enum Algorithm {
    /// The default algorithm of the `fsverity` tools.
    Sha256 = 1,
    Sha512 = 2,
}

impl Algorithm {
    /// Size in bytes of the digests this algorithm produces.
    pub fn digest_size(self) -> usize {
        match self {
            Algorithm::Sha256 => 32,
            Algorithm::Sha512 => 64,
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::Sha256
    }
}

/// The digest function consumed by the Merkle tree and descriptor hashing.
///
/// Any RustCrypto hash with a fixed output size can implement this; the tree
/// logic never looks inside the hash, it only needs a kernel algorithm id and
/// the zero-padding helpers below.
pub trait BlockHash: Digest + BlockSizeUser + FixedOutputReset + Clone {
    /// Kernel identifier for this hash function.
    const ALGORITHM: Algorithm;

    /// Feed `data` followed by zero bytes up to `padded_len` in total.
    /// Panics if `data` is longer than `padded_len`.
    fn update_zero_padded(&mut self, data: &[u8], padded_len: usize) {
        Update::update(self, data);
        self.update_zeroes(padded_len - data.len());
    }

    /// Feed `amount` zero bytes.
    fn update_zeroes(&mut self, amount: usize) {
        let (whole, tail) = (amount / ZEROES.len(), amount % ZEROES.len());
        for _ in 0..whole {
            Update::update(self, &ZEROES);
        }
        if tail != 0 {
            Update::update(self, &ZEROES[..tail]);
        }
    }
}

impl BlockHash for Sha256 {
    const ALGORITHM: Algorithm = Algorithm::Sha256;
}

impl BlockHash for Sha512 {
    const ALGORITHM: Algorithm = Algorithm::Sha512;
}

/// A hash state preloaded with the salt, zero-padded to a whole number of the
/// hash function's input blocks. The kernel prepares every block hash and the
/// descriptor hash from this same state.
pub(crate) fn salted_state<D: BlockHash>(salt: &[u8]) -> D {
    let mut state = D::new();
    // runs at most once for salts within MAX_SALT_SIZE
    for chunk in salt.chunks(D::block_size()) {
        state.update_zero_padded(chunk, D::block_size());
    }
    state
}

/// Checks shared by the hasher constructors and [`crate::Descriptor`].
pub(crate) fn validate_params(
    algorithm: Algorithm,
    block_size: usize,
    salt: &[u8],
) -> Result<(), InvalidConfiguration> {
    if !block_size.is_power_of_two() {
        return Err(InvalidConfiguration::BlockSizeNotPowerOfTwo(block_size));
    }
    // at least two digests per block, so every level compresses
    if block_size < 2 * algorithm.digest_size() {
        return Err(InvalidConfiguration::BlockSizeTooSmall {
            block_size,
            algorithm,
        });
    }
    if salt.len() > MAX_SALT_SIZE {
        return Err(InvalidConfiguration::SaltTooLong(salt.len()));
    }
    Ok(())
}
