use sha2::digest::{FixedOutput, Output, Update};

use crate::algorithm::{salted_state, validate_params, Algorithm, BlockHash, MAX_DIGEST_SIZE};
use crate::error::InvalidConfiguration;

/// Packed size of the fs-verity descriptor. The layout is fixed; every field
/// beyond the salt is zero-padded to its full width.
pub const DESCRIPTOR_SIZE: usize = 256;

/// The fs-verity descriptor: the Merkle root plus the parameters it was
/// computed under. Its salted digest, not the root itself, is the fs-verity
/// measurement of a file.
///
/// Packed little-endian layout, byte for byte as the kernel hashes it:
///
/// | offset | size | field                              |
/// |--------|------|------------------------------------|
/// | 0      | 1    | version, always 1                  |
/// | 1      | 1    | algorithm id                       |
/// | 2      | 1    | log2 of the block size             |
/// | 3      | 1    | salt length                        |
/// | 4      | 4    | reserved (sig_size), zero          |
/// | 8      | 8    | data size                          |
/// | 16     | 64   | root hash, zero-padded             |
/// | 80     | 32   | salt, zero-padded                  |
/// | 112    | 144  | reserved, zero                     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Descriptor {
    algorithm: Algorithm,
    block_size: usize,
    salt: Box<[u8]>,
    data_size: u64,
    root_hash: Box<[u8]>,
}

impl Descriptor {
    /// Checks the same parameter rules as the hashers, plus that `root_hash`
    /// is exactly one digest of `algorithm`.
    pub fn new(
        algorithm: Algorithm,
        block_size: usize,
        salt: &[u8],
        data_size: u64,
        root_hash: &[u8],
    ) -> Result<Self, InvalidConfiguration> {
        validate_params(algorithm, block_size, salt)?;
        if root_hash.len() != algorithm.digest_size() {
            return Err(InvalidConfiguration::RootSizeMismatch {
                got: root_hash.len(),
                expected: algorithm.digest_size(),
                algorithm,
            });
        }
        Ok(Self {
            algorithm,
            block_size,
            salt: salt.into(),
            data_size,
            root_hash: root_hash.into(),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    pub fn root_hash(&self) -> &[u8] {
        &self.root_hash
    }

    /// Serialize into the exact wire layout.
    pub fn pack(&self) -> [u8; DESCRIPTOR_SIZE] {
        let mut out = [0u8; DESCRIPTOR_SIZE];
        out[0] = 1;
        out[1] = self.algorithm as u8;
        out[2] = self.block_size.trailing_zeros() as u8;
        out[3] = self.salt.len() as u8;
        // 4..8 reserved
        out[8..16].copy_from_slice(&self.data_size.to_le_bytes());
        // root and salt sit in fixed-width fields, zero-padded to the end
        out[16..16 + self.root_hash.len()].copy_from_slice(&self.root_hash);
        let salt_field = 16 + MAX_DIGEST_SIZE;
        out[salt_field..salt_field + self.salt.len()].copy_from_slice(&self.salt);
        // 112..256 reserved
        out
    }

    /// The fs-verity measurement: the salted digest of the packed descriptor.
    /// `D` must be the algorithm named in the descriptor.
    pub fn measure<D: BlockHash>(&self) -> Output<D> {
        debug_assert_eq!(D::ALGORITHM, self.algorithm);
        let mut state: D = salted_state(&self.salt);
        Update::update(&mut state, &self.pack());
        state.finalize_fixed()
    }
}
