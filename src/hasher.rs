use std::io::Write;

use sha2::digest::{
    DynDigest, FixedOutput, FixedOutputReset, HashMarker, Output, OutputSizeUser, Reset, Update,
};
use sha2::{Sha256, Sha512};

use crate::algorithm::{validate_params, Algorithm, BlockHash, DEFAULT_BLOCK_SIZE};
use crate::descriptor::Descriptor;
use crate::error::InvalidConfiguration;
use crate::tree::MerkleTree;

/// Streaming fs-verity measurement.
///
/// Feed data through the [`sha2::digest::Digest`] interface or
/// [`std::io::Write`] (so `io::copy` works), in chunks of any size. The
/// finalized value is the digest of the fs-verity descriptor, the same value
/// `fsverity digest` and the `FS_IOC_MEASURE_VERITY` ioctl report.
#[derive(Clone)]
pub struct VerityHasher<D: BlockHash = Sha256> {
    block_size: usize,
    /// Kept around beyond tree construction: the final descriptor hash needs
    /// the salt bytes themselves.
    salt: Box<[u8]>,
    tree: MerkleTree<D>,
}

/// Alias for `VerityHasher<Sha256>`.
pub type VeritySha256 = VerityHasher<Sha256>;

/// Alias for `VerityHasher<Sha512>`.
pub type VeritySha512 = VerityHasher<Sha512>;

impl<D: BlockHash> VerityHasher<D> {
    /// A hasher with no salt and the standard 4096-byte block size. This is
    /// what every deployed fs-verity file uses in practice.
    pub fn new() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            salt: Box::default(),
            tree: MerkleTree::new(&[], DEFAULT_BLOCK_SIZE),
        }
    }

    /// A hasher with the given salt, which is mixed into every block hash
    /// and into the descriptor hash. At most 32 bytes.
    pub fn with_salt(salt: &[u8]) -> Result<Self, InvalidConfiguration> {
        Self::with_params(salt, DEFAULT_BLOCK_SIZE)
    }

    /// A hasher with the given salt and block size.
    ///
    /// The block size must be a power of two at least twice the digest size.
    /// Note the kernel only accepts trees built with the system page size, so
    /// other block sizes are for interop with fs-verity-shaped formats, not
    /// for files the kernel will verify.
    pub fn with_params(salt: &[u8], block_size: usize) -> Result<Self, InvalidConfiguration> {
        validate_params(D::ALGORITHM, block_size, salt)?;
        Ok(Self {
            block_size,
            salt: salt.into(),
            tree: MerkleTree::new(salt, block_size),
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        D::ALGORITHM
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Consume the hasher and return the Merkle root and total data size
    /// instead of the descriptor digest. The root alone does not identify
    /// the data; it must be interpreted together with the size.
    pub fn into_root(self) -> (Output<D>, u64) {
        self.tree.finalize()
    }

    fn measure(tree: MerkleTree<D>, salt: &[u8], block_size: usize) -> Output<D> {
        let (root, data_size) = tree.finalize();
        let descriptor = Descriptor::new(D::ALGORITHM, block_size, salt, data_size, &root)
            .expect("hasher parameters were validated at construction");
        descriptor.measure::<D>()
    }
}

impl<D: BlockHash> Default for VerityHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: BlockHash> HashMarker for VerityHasher<D> {}

impl<D: BlockHash> Update for VerityHasher<D> {
    fn update(&mut self, data: &[u8]) {
        self.tree.update(data);
    }
}

impl<D: BlockHash> OutputSizeUser for VerityHasher<D> {
    type OutputSize = D::OutputSize;
}

impl<D: BlockHash> FixedOutput for VerityHasher<D> {
    fn finalize_into(self, out: &mut Output<Self>) {
        *out = Self::measure(self.tree, &self.salt, self.block_size);
    }
}

/// Back to an empty stream, keeping the salt and block size.
impl<D: BlockHash> Reset for VerityHasher<D> {
    fn reset(&mut self) {
        self.tree = MerkleTree::new(&self.salt, self.block_size);
    }
}

impl<D: BlockHash> FixedOutputReset for VerityHasher<D> {
    fn finalize_into_reset(&mut self, out: &mut Output<Self>) {
        let tree = std::mem::replace(&mut self.tree, MerkleTree::new(&self.salt, self.block_size));
        *out = Self::measure(tree, &self.salt, self.block_size);
    }
}

impl<D: BlockHash> Write for VerityHasher<D> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tree.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Object-safe hasher for when the algorithm is only known at runtime.
/// Use [`VerityParams::build`] to get one.
pub trait VerityDigestWrite: DynDigest + Write {}

impl<D: BlockHash + 'static> VerityDigestWrite for VerityHasher<D> {}

/// Runtime-selected hashing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerityParams {
    pub algorithm: Algorithm,
    pub block_size: usize,
    pub salt: Box<[u8]>,
}

impl Default for VerityParams {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            salt: Box::default(),
        }
    }
}

impl VerityParams {
    /// Build a hasher for these parameters, dispatching on the algorithm.
    pub fn build(&self) -> Result<Box<dyn VerityDigestWrite>, InvalidConfiguration> {
        Ok(match self.algorithm {
            Algorithm::Sha256 => Box::new(VerityHasher::<Sha256>::with_params(
                &self.salt,
                self.block_size,
            )?),
            Algorithm::Sha512 => Box::new(VerityHasher::<Sha512>::with_params(
                &self.salt,
                self.block_size,
            )?),
        })
    }
}
