use sha2::digest::{FixedOutput, FixedOutputReset, Output, Update};

use crate::algorithm::BlockHash;

/// One fixed-size Merkle tree block: a running hash state plus the number of
/// bytes still missing. The block's data is never stored, only hashed.
/// Finalizing zero-pads whatever is missing, which is the fs-verity rule for
/// blocks that end short (last leaf of the file, or an inner block with fewer
/// children than fit).
#[derive(Clone)]
pub(crate) struct PaddedBlock<D: BlockHash> {
    state: D,
    remaining: usize,
}

impl<D: BlockHash> PaddedBlock<D> {
    /// `state` is typically a salted state from
    /// [`crate::algorithm::salted_state`].
    pub(crate) fn new(state: D, block_size: usize) -> Self {
        Self {
            state,
            remaining: block_size,
        }
    }

    /// Bytes still missing before the block is full.
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// Absorb data that must fit in the block.
    pub(crate) fn absorb(&mut self, data: &[u8]) {
        Update::update(&mut self.state, data);
        self.remaining = self
            .remaining
            .checked_sub(data.len())
            .expect("data does not fit in the block");
    }

    /// Absorb as much as fits, returning the tail that did not.
    pub(crate) fn absorb_overflowing<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        let (head, tail) = data.split_at(self.remaining.min(data.len()));
        self.absorb(head);
        tail
    }

    /// Zero-pad to the end of the block and return its digest, consuming it.
    pub(crate) fn finalize(mut self) -> Output<D> {
        self.state.update_zeroes(self.remaining);
        self.state.finalize_fixed()
    }

    /// Zero-pad, emit the digest, and become a copy of `template` again.
    pub(crate) fn finalize_and_reset_from(&mut self, template: &Self) -> Output<D> {
        self.state.update_zeroes(self.remaining);
        let digest = self.state.finalize_fixed_reset();
        self.clone_from(template);
        digest
    }
}

#[cfg(test)]
mod tests {
    use sha2::{Digest, Sha256};

    use super::*;

    fn empty_block(size: usize) -> PaddedBlock<Sha256> {
        PaddedBlock::new(Sha256::new(), size)
    }

    #[test]
    fn short_block_is_zero_padded() {
        let mut block = empty_block(4096);
        block.absorb(b"some data");

        let mut padded = vec![0u8; 4096];
        padded[..9].copy_from_slice(b"some data");

        assert_eq!(block.finalize(), Sha256::digest(&padded));
    }

    #[test]
    fn untouched_block_hashes_all_zeroes() {
        let block = empty_block(64);
        assert_eq!(block.finalize(), Sha256::digest([0u8; 64]));
    }

    #[test]
    fn overflow_is_handed_back() {
        let mut block = empty_block(8);
        let tail = block.absorb_overflowing(b"0123456789");
        assert_eq!(tail, b"89");
        assert_eq!(block.remaining(), 0);
        assert_eq!(block.finalize(), Sha256::digest(b"01234567"));
    }

    #[test]
    fn reset_from_template_restores_the_salted_state() {
        let mut seeded = Sha256::new();
        Digest::update(&mut seeded, b"prefix");
        let template = PaddedBlock::new(seeded, 16);

        let mut block = template.clone();
        block.absorb(b"aaaa");
        let first = block.finalize_and_reset_from(&template);
        assert_eq!(block.remaining(), 16);

        block.absorb(b"aaaa");
        let second = block.finalize_and_reset_from(&template);
        assert_eq!(first, second);
    }
}
