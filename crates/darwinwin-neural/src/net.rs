use std::{fmt, ops::RangeInclusive};

use rand::Rng;

use crate::{
    BLOCK_SIZE, Block, BrainFormatError, IoBuffer,
    kernel::{self, ScalarKernel},
};

/// Fully connected network with `L` layers, each `B` blocks wide.
///
/// The parameter buffer is allocated once with a size derived from `B` and `L` and is
/// never resized. Mutation and crossbreeding operate on [`params`](Self::params) /
/// [`params_mut`](Self::params_mut) as one flat `i16` slice.
#[derive(Clone, PartialEq, Eq)]
pub struct NeuralNet<const B: usize, const L: usize> {
    params: Box<[Block]>,
}

impl<const B: usize, const L: usize> fmt::Debug for NeuralNet<B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuralNet")
            .field("layers", &L)
            .field("neurons_per_layer", &Self::NEURONS)
            .field("params", &Self::PARAM_COUNT)
            .finish_non_exhaustive()
    }
}

impl<const B: usize, const L: usize> NeuralNet<B, L> {
    pub const LAYERS: usize = L;
    pub const NEURONS: usize = B * BLOCK_SIZE;
    pub const WEIGHTS_PER_LAYER: usize = Self::NEURONS * Self::NEURONS;
    pub const BIASES_PER_LAYER: usize = Self::NEURONS;
    pub const PARAMS_PER_LAYER: usize = Self::WEIGHTS_PER_LAYER + Self::BIASES_PER_LAYER;
    pub const PARAM_COUNT: usize = Self::PARAMS_PER_LAYER * L;
    const BLOCK_COUNT: usize = Self::PARAM_COUNT / BLOCK_SIZE;

    /// Legal range for weights and biases.
    ///
    /// Inputs never exceed `i8` magnitude, so products stay within `i16`.
    pub const PARAM_RANGE: RangeInclusive<i16> = -255..=255;

    /// Size of the blob produced by [`to_bytes`](Self::to_bytes).
    pub const BYTE_LEN: usize = Self::PARAM_COUNT * size_of::<i16>();

    /// Creates a network with every weight and bias set to zero.
    #[must_use]
    pub fn zeroed() -> Self {
        Self {
            params: vec![[0; BLOCK_SIZE]; Self::BLOCK_COUNT].into_boxed_slice(),
        }
    }

    /// Creates a network with parameters drawn uniformly from [`PARAM_RANGE`](Self::PARAM_RANGE).
    #[must_use]
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut net = Self::zeroed();
        for p in net.params_mut() {
            *p = rng.random_range(Self::PARAM_RANGE);
        }
        net
    }

    #[must_use]
    pub fn params(&self) -> &[i16] {
        self.params.as_flattened()
    }

    pub fn params_mut(&mut self) -> &mut [i16] {
        self.params.as_flattened_mut()
    }

    /// Weights of `neuron` in `layer`, one per input slot.
    #[must_use]
    pub fn neuron_weights(&self, layer: usize, neuron: usize) -> &[i16] {
        assert!(layer < L && neuron < Self::NEURONS);
        let start = layer * Self::PARAMS_PER_LAYER + neuron * Self::NEURONS;
        &self.params()[start..start + Self::NEURONS]
    }

    #[must_use]
    pub fn layer_biases(&self, layer: usize) -> &[i16] {
        assert!(layer < L);
        let start = layer * Self::PARAMS_PER_LAYER + Self::WEIGHTS_PER_LAYER;
        &self.params()[start..start + Self::BIASES_PER_LAYER]
    }

    pub fn set_neuron_weight(&mut self, layer: usize, neuron: usize, input: usize, value: i16) {
        assert!(layer < L && neuron < Self::NEURONS && input < Self::NEURONS);
        let index = layer * Self::PARAMS_PER_LAYER + neuron * Self::NEURONS + input;
        self.params_mut()[index] = value;
    }

    pub fn set_bias(&mut self, layer: usize, neuron: usize, value: i16) {
        assert!(layer < L && neuron < Self::NEURONS);
        let index = layer * Self::PARAMS_PER_LAYER + Self::WEIGHTS_PER_LAYER + neuron;
        self.params_mut()[index] = value;
    }

    /// Runs the forward pass, replacing the input in `io` by the network output.
    ///
    /// Uses the vectorized kernel when the `simd` feature is enabled.
    pub fn evaluate(&self, io: &mut IoBuffer<B>) {
        #[cfg(feature = "simd")]
        kernel::forward::<kernel::SimdKernel, B>(&self.params, L, io);
        #[cfg(not(feature = "simd"))]
        kernel::forward::<ScalarKernel, B>(&self.params, L, io);
    }

    /// Runs the forward pass with the portable scalar kernel.
    pub fn evaluate_scalar(&self, io: &mut IoBuffer<B>) {
        kernel::forward::<ScalarKernel, B>(&self.params, L, io);
    }

    /// Encodes the parameters as little-endian `i16` values.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.params().iter().flat_map(|p| p.to_le_bytes()).collect()
    }

    /// Decodes a blob produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BrainFormatError> {
        if bytes.len() != Self::BYTE_LEN {
            return Err(BrainFormatError {
                expected: Self::BYTE_LEN,
                actual: bytes.len(),
            });
        }
        let mut net = Self::zeroed();
        for (p, chunk) in net.params_mut().iter_mut().zip(bytes.chunks_exact(2)) {
            *p = i16::from_le_bytes([chunk[0], chunk[1]]);
        }
        Ok(net)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    type SmallNet = NeuralNet<1, 2>;

    #[test]
    fn test_sizes_follow_topology() {
        assert_eq!(SmallNet::NEURONS, 16);
        assert_eq!(SmallNet::PARAMS_PER_LAYER, 16 * 16 + 16);
        assert_eq!(SmallNet::PARAM_COUNT, (16 * 16 + 16) * 2);
        assert_eq!(SmallNet::zeroed().params().len(), SmallNet::PARAM_COUNT);
        assert_eq!(NeuralNet::<5, 4>::PARAM_COUNT, (80 * 80 + 80) * 4);
    }

    #[test]
    fn test_random_params_in_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        let net = NeuralNet::<2, 2>::random(&mut rng);
        assert!(
            net.params()
                .iter()
                .all(|p| NeuralNet::<2, 2>::PARAM_RANGE.contains(p))
        );
    }

    #[test]
    fn test_identity_like_layer() {
        // Single layer, neuron i copies input i at scale 1.0 (128 in Q7).
        let mut net = NeuralNet::<1, 1>::zeroed();
        for i in 0..16 {
            net.set_neuron_weight(0, i, i, 128);
        }
        net.set_bias(0, 3, 10);

        let mut io = IoBuffer::<1>::new();
        io[0] = 50;
        io[1] = -60;
        io[3] = 100;
        net.evaluate(&mut io);

        assert_eq!(io[0], 50);
        assert_eq!(io[1], -60);
        assert_eq!(io[2], 0);
        // 100 + 10 is still inside the i8 range
        assert_eq!(io[3], 110);
    }

    #[test]
    fn test_output_is_clipped_between_layers() {
        let mut net = NeuralNet::<1, 2>::zeroed();
        // Layer 0: neuron 0 = 2.0 * input 0, saturates to 127.
        net.set_neuron_weight(0, 0, 0, 255);
        // Layer 1: neuron 0 = 1.0 * neuron 0 of layer 0.
        net.set_neuron_weight(1, 0, 0, 128);

        let mut io = IoBuffer::<1>::new();
        io[0] = 127;
        net.evaluate(&mut io);
        assert_eq!(io[0], 127);

        let mut io = IoBuffer::<1>::new();
        io[0] = -128;
        net.evaluate(&mut io);
        assert_eq!(io[0], -128);
    }

    #[test]
    fn test_evaluate_matches_scalar() {
        let mut rng = Pcg32::seed_from_u64(99);
        let net = NeuralNet::<3, 3>::random(&mut rng);
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut io = IoBuffer::<3>::new();
            for v in io.as_mut_slice() {
                *v = rng.random_range(-128..=127);
            }
            let mut expected = io.clone();
            net.evaluate(&mut io);
            net.evaluate_scalar(&mut expected);
            assert_eq!(io, expected);
        }
    }

    #[test]
    fn test_evaluate_does_not_mutate_params() {
        let mut rng = Pcg32::seed_from_u64(3);
        let net = NeuralNet::<2, 2>::random(&mut rng);
        let before = net.clone();
        let mut io = IoBuffer::<2>::new();
        io[0] = 127;
        net.evaluate(&mut io);
        assert_eq!(net, before);
    }

    #[test]
    fn test_bytes_round_trip() {
        let mut rng = Pcg32::seed_from_u64(5);
        let net = NeuralNet::<1, 2>::random(&mut rng);
        let bytes = net.to_bytes();
        assert_eq!(bytes.len(), NeuralNet::<1, 2>::BYTE_LEN);
        assert_eq!(NeuralNet::<1, 2>::from_bytes(&bytes).unwrap(), net);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = NeuralNet::<1, 2>::from_bytes(&[0; 10]).unwrap_err();
        assert_eq!(err.actual, 10);
        assert_eq!(err.expected, NeuralNet::<1, 2>::BYTE_LEN);
    }
}
