use sha2::digest::Output;

use crate::algorithm::{salted_state, BlockHash, MAX_LEVELS};
use crate::block::PaddedBlock;

/// Incremental Merkle tree over fixed-size, zero-padded blocks.
///
/// `levels[0]` absorbs raw input. When the block at level `i` completes, its
/// digest is appended to the block at level `i + 1` (created on demand), and
/// the completion can cascade upward like a carry in a base-`digests_per_block`
/// counter. Only one hash state is kept per level, so memory use is
/// logarithmic in the input size no matter how the input is chunked.
///
/// Invariants between `update` calls:
///
/// - level 0, once created, is never empty. It *may* be completely full: a
///   full leaf is only rolled up when more input arrives, which is what makes
///   a single-block input hash to that block's digest with no parent level.
/// - levels above 0 always have room for at least one more digest. Together
///   with the previous point this means the final flush hands every level
///   exactly one digest from below, never two.
/// - a digest is never split across two blocks (digest sizes divide every
///   valid block size, and inner levels keep a digest's worth of room).
#[derive(Clone)]
pub(crate) struct MerkleTree<D: BlockHash> {
    block_size: usize,
    digest_size: usize,
    /// Template for fresh blocks; its hash state already contains the salt.
    fresh: PaddedBlock<D>,
    levels: Vec<PaddedBlock<D>>,
    total_size: u64,
}

impl<D: BlockHash> MerkleTree<D> {
    /// Callers validate `salt` and `block_size` first; see
    /// [`crate::algorithm::validate_params`].
    pub(crate) fn new(salt: &[u8], block_size: usize) -> Self {
        Self {
            block_size,
            digest_size: D::ALGORITHM.digest_size(),
            fresh: PaddedBlock::new(salted_state(salt), block_size),
            levels: Vec::new(),
            total_size: 0,
        }
    }

    /// Absorb a chunk of input. Chunks can have any size, including zero;
    /// only the concatenation of all chunks matters.
    pub(crate) fn update(&mut self, data: &[u8]) {
        self.total_size += data.len() as u64;

        for chunk in data.chunks(self.block_size) {
            let mut carry: Output<D>;
            let mut pending: &[u8] = chunk;
            let mut at_leaves = true;

            for level in self.levels.iter_mut() {
                pending = level.absorb_overflowing(pending);
                if at_leaves {
                    // a full leaf stays put until more input arrives
                    if pending.is_empty() {
                        break;
                    }
                } else if level.remaining() >= self.digest_size {
                    break;
                }

                // roll this block up; the leftover seeds its replacement
                let digest = level.finalize_and_reset_from(&self.fresh);
                level.absorb(pending);
                carry = digest;
                pending = &carry;
                at_leaves = false;
            }

            // the carry outgrew every existing level: new root level
            if !pending.is_empty() {
                assert!(self.levels.len() < MAX_LEVELS);
                let mut top = self.fresh.clone();
                top.absorb(pending);
                self.levels.push(top);
            }
        }
    }

    /// Flush every level bottom-up and return the Merkle root together with
    /// the total number of input bytes.
    ///
    /// Zero-length input never created a level; its root is defined as all
    /// zeroes, which is what the kernel reports for empty files.
    pub(crate) fn finalize(mut self) -> (Output<D>, u64) {
        let mut root: Output<D> = Default::default();
        let mut carry: &[u8] = &[];
        for mut level in std::mem::take(&mut self.levels) {
            level.absorb(carry);
            root = level.finalize();
            carry = &root;
        }
        (root, self.total_size)
    }
}
