//! Streaming fs-verity measurements in pure Rust.
//!
//! fs-verity identifies a file by a single digest: a Merkle tree is built
//! over the file's contents in fixed-size, zero-padded blocks, and the tree's
//! root is packed into a small descriptor together with the hashing
//! parameters and the file size. The digest of that descriptor is the
//! measurement the Linux kernel enforces and the `fsverity` tools print.
//!
//! This crate computes that measurement incrementally: data can be fed in
//! chunks of any size, memory use stays logarithmic in the file size, and
//! the result only depends on the concatenated bytes.
//!
//! ```
//! use sha2::Digest;
//! use veritree::VeritySha256;
//!
//! let mut hasher = VeritySha256::new();
//! hasher.update(b"hello world");
//! let measurement = hasher.finalize();
//! assert_eq!(
//!     hex::encode(measurement),
//!     "1e2eaa4202d750a41174ee454970b92c1bc2f925b1e35076d8c7d5f56362ba64",
//! );
//! ```
//!
//! [`VerityHasher`] also implements [`std::io::Write`], so files can be fed
//! with `std::io::copy` without loading them into memory. When the algorithm
//! is picked at runtime, build a boxed hasher from [`VerityParams`].
//!
//! Enabling or measuring verity on actual files through the kernel ioctls is
//! out of scope here; this crate only computes the digests.

mod algorithm;
mod block;
mod descriptor;
mod error;
mod hasher;
mod tree;

pub use algorithm::{
    Algorithm, BlockHash, DEFAULT_BLOCK_SIZE, MAX_DIGEST_SIZE, MAX_LEVELS, MAX_SALT_SIZE,
};
pub use descriptor::{Descriptor, DESCRIPTOR_SIZE};
pub use error::InvalidConfiguration;
pub use hasher::{VerityDigestWrite, VerityHasher, VerityParams, VeritySha256, VeritySha512};
