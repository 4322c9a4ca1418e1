//! Fixed-point forward-pass kernels.
//!
//! Both kernels must agree bit for bit: the per-lane product is a wrapping 16-bit
//! multiply followed by an arithmetic shift, lanes are folded in index order with
//! saturating addition, and the bias stage is a saturating add clipped to `i8`.

use crate::{ACTIVATION_MAX, ACTIVATION_MIN, BLOCK_SIZE, Block, FIXED_POINT_SHIFT, IoBuffer};

pub(crate) trait Kernel {
    /// Sum of `(w * x) >> 7` over all lanes of all blocks.
    fn weighted_sum(weights: &[Block], input: &[Block]) -> i16;

    /// `clip(bias + sum)` for one block.
    fn activate(sums: &Block, biases: &Block) -> Block;
}

#[derive(Debug)]
pub(crate) struct ScalarKernel;

impl Kernel for ScalarKernel {
    fn weighted_sum(weights: &[Block], input: &[Block]) -> i16 {
        debug_assert_eq!(weights.len(), input.len());
        let mut acc: i16 = 0;
        for (w_block, x_block) in weights.iter().zip(input) {
            for (w, x) in w_block.iter().zip(x_block) {
                acc = acc.saturating_add(w.wrapping_mul(*x) >> FIXED_POINT_SHIFT);
            }
        }
        acc
    }

    fn activate(sums: &Block, biases: &Block) -> Block {
        let mut out = [0; BLOCK_SIZE];
        for ((o, s), b) in out.iter_mut().zip(sums).zip(biases) {
            *o = b.saturating_add(*s).clamp(ACTIVATION_MIN, ACTIVATION_MAX);
        }
        out
    }
}

#[cfg(feature = "simd")]
#[derive(Debug)]
pub(crate) struct SimdKernel;

#[cfg(feature = "simd")]
impl Kernel for SimdKernel {
    fn weighted_sum(weights: &[Block], input: &[Block]) -> i16 {
        use wide::i16x16;

        debug_assert_eq!(weights.len(), input.len());
        let mut acc: i16 = 0;
        for (w_block, x_block) in weights.iter().zip(input) {
            let products = (i16x16::from(*w_block) * i16x16::from(*x_block)) >> 7_i32;
            for lane in products.to_array() {
                acc = acc.saturating_add(lane);
            }
        }
        acc
    }

    fn activate(sums: &Block, biases: &Block) -> Block {
        use wide::i16x16;

        let min = i16x16::splat(ACTIVATION_MIN);
        let max = i16x16::splat(ACTIVATION_MAX);
        i16x16::from(*biases)
            .saturating_add(i16x16::from(*sums))
            .min(max)
            .max(min)
            .to_array()
    }
}

/// Runs all `layers` over `io` in place.
///
/// `params` holds the layers back to back as described in the crate docs.
pub(crate) fn forward<K, const B: usize>(params: &[Block], layers: usize, io: &mut IoBuffer<B>)
where
    K: Kernel,
{
    let neurons = B * BLOCK_SIZE;
    let blocks_per_layer = neurons * B + B;
    assert_eq!(params.len(), blocks_per_layer * layers);

    let mut scratch = IoBuffer::<B>::new();
    for layer in params.chunks_exact(blocks_per_layer) {
        let (weights, biases) = layer.split_at(neurons * B);
        for (neuron, neuron_weights) in weights.chunks_exact(B).enumerate() {
            scratch[neuron] = K::weighted_sum(neuron_weights, io.blocks());
        }
        for ((out, sums), bias) in io
            .blocks_mut()
            .iter_mut()
            .zip(scratch.blocks())
            .zip(biases)
        {
            *out = K::activate(sums, bias);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_weighted_sum_rescales_each_product() {
        let mut w = [0; BLOCK_SIZE];
        let mut x = [0; BLOCK_SIZE];
        // 128 * 127 >> 7 == 127
        w[0] = 128;
        x[0] = 127;
        // -128 * 1 >> 7 == -1
        w[1] = -128;
        x[1] = 1;
        // 1 * 127 >> 7 == 0
        w[2] = 1;
        x[2] = 127;
        assert_eq!(ScalarKernel::weighted_sum(&[w], &[x]), 126);
    }

    #[test]
    fn test_scalar_weighted_sum_saturates() {
        let w = [255; BLOCK_SIZE];
        let x = [127; BLOCK_SIZE];
        let sum = ScalarKernel::weighted_sum(&[w; 20], &[x; 20]);
        assert_eq!(sum, i16::MAX);
    }

    #[test]
    fn test_scalar_activate_clips_to_i8() {
        let mut sums = [0; BLOCK_SIZE];
        let mut biases = [0; BLOCK_SIZE];
        sums[0] = 300;
        biases[1] = -200;
        sums[2] = i16::MAX;
        biases[2] = 10;
        sums[3] = 5;
        biases[3] = -2;
        let out = ScalarKernel::activate(&sums, &biases);
        assert_eq!(out[0], 127);
        assert_eq!(out[1], -128);
        assert_eq!(out[2], 127);
        assert_eq!(out[3], 3);
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_simd_matches_scalar() {
        use rand::{Rng as _, SeedableRng as _};
        use rand_pcg::Pcg32;

        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let weights: Vec<Block> = (0..4)
                .map(|_| std::array::from_fn(|_| rng.random_range(-255..=255)))
                .collect();
            let input: Vec<Block> = (0..4)
                .map(|_| std::array::from_fn(|_| rng.random_range(-128..=127)))
                .collect();
            assert_eq!(
                SimdKernel::weighted_sum(&weights, &input),
                ScalarKernel::weighted_sum(&weights, &input),
            );

            let sums: Block = std::array::from_fn(|_| rng.random());
            let biases: Block = std::array::from_fn(|_| rng.random_range(-255..=255));
            assert_eq!(
                SimdKernel::activate(&sums, &biases),
                ScalarKernel::activate(&sums, &biases),
            );
        }
    }
}
