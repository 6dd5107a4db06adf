use thiserror::Error;

use crate::algorithm::Algorithm;

/// Problems with hashing parameters, reported when a hasher or descriptor is
/// constructed. Once construction succeeds, feeding data cannot fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidConfiguration {
    #[error("block size {0} is not a power of two")]
    BlockSizeNotPowerOfTwo(usize),

    #[error("block size {block_size} cannot hold two {algorithm} digests")]
    BlockSizeTooSmall {
        block_size: usize,
        algorithm: Algorithm,
    },

    #[error("salt is {0} bytes, the kernel allows at most 32")]
    SaltTooLong(usize),

    #[error("root hash is {got} bytes but {algorithm} digests are {expected}")]
    RootSizeMismatch {
        got: usize,
        expected: usize,
        algorithm: Algorithm,
    },
}
