use std::ops::{Index, IndexMut, Range};

use crate::{ACTIVATION_MAX, BLOCK_SIZE, Block};

/// Input/output activations of a network that is `B` blocks wide.
///
/// The caller fills the buffer with the network input, calls
/// [`NeuralNet::evaluate`](crate::NeuralNet::evaluate), and reads the output from the
/// same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoBuffer<const B: usize> {
    blocks: [Block; B],
}

impl<const B: usize> Default for IoBuffer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const B: usize> IoBuffer<B> {
    /// Number of slots in the buffer.
    pub const LEN: usize = B * BLOCK_SIZE;

    /// Creates a buffer with every slot set to zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            blocks: [[0; BLOCK_SIZE]; B],
        }
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block; B] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut [Block; B] {
        &mut self.blocks
    }

    /// Returns all slots as one flat slice.
    #[must_use]
    pub fn as_slice(&self) -> &[i16] {
        self.blocks.as_flattened()
    }

    pub fn as_mut_slice(&mut self) -> &mut [i16] {
        self.blocks.as_flattened_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = i16> + '_ {
        self.as_slice().iter().copied()
    }

    /// Resets every slot to zero.
    pub fn clear(&mut self) {
        self.blocks = [[0; BLOCK_SIZE]; B];
    }

    /// Replaces every non-zero slot in `range` by `i8::MAX` (fixed-point ~1.0).
    ///
    /// Zero slots stay zero, so the range turns into a vector of binary features.
    pub fn binarize(&mut self, range: Range<usize>) {
        for value in &mut self.as_mut_slice()[range] {
            *value = if *value == 0 { 0 } else { ACTIVATION_MAX };
        }
    }
}

impl<const B: usize> Index<usize> for IoBuffer<B> {
    type Output = i16;

    fn index(&self, index: usize) -> &Self::Output {
        &self.blocks[index / BLOCK_SIZE][index % BLOCK_SIZE]
    }
}

impl<const B: usize> IndexMut<usize> for IoBuffer<B> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.blocks[index / BLOCK_SIZE][index % BLOCK_SIZE]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_crosses_blocks() {
        let mut io = IoBuffer::<3>::new();
        io[BLOCK_SIZE + 2] = 42;
        assert_eq!(io.blocks()[1][2], 42);
        assert_eq!(io.as_slice()[BLOCK_SIZE + 2], 42);
        assert_eq!(IoBuffer::<3>::LEN, 48);
    }

    #[test]
    fn test_binarize_only_touches_range() {
        let mut io = IoBuffer::<1>::new();
        io[0] = 3;
        io[1] = -7;
        io[2] = 0;
        io[5] = 9;
        io.binarize(0..4);
        assert_eq!(io[0], ACTIVATION_MAX);
        assert_eq!(io[1], ACTIVATION_MAX);
        assert_eq!(io[2], 0);
        assert_eq!(io[5], 9);
    }
}
