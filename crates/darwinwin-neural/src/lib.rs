//! Quantized fixed-topology neural network used as an actor's brain.
//!
//! Networks in this crate are never trained by gradient descent. They are plain
//! parameter buffers evaluated with integer arithmetic, and improved externally by
//! evolutionary search (see the `darwinwin-training` crate).
//!
//! # Topology
//!
//! A network has `L` fully connected layers, each `B` blocks wide, where a block is
//! [`BLOCK_SIZE`] lanes of `i16` (one 256-bit vector). Every layer maps `B * BLOCK_SIZE`
//! inputs to the same number of outputs, so the same [`IoBuffer`] is overwritten in
//! place layer by layer.
//!
//! # Parameter Layout
//!
//! ```text
//! layer 0: neuron 0 weights (N values), neuron 1 weights, ..., neuron N-1 weights, N biases
//! layer 1: ...
//! ```
//!
//! All values are signed Q7 fixed point (`128` represents `1.0`).
//!
//! # Forward Pass
//!
//! For each neuron the products `weight * input` are computed with wrapping 16-bit
//! multiplication and rescaled with an arithmetic right shift by 7. The rescaled
//! products are summed with saturating addition in input order. The bias is then added
//! with saturating addition and the result is clipped to the `i8` range, which is the
//! activation function.
//!
//! With the `simd` feature (enabled by default) the per-block multiply and rescale
//! and the bias stage run on [`wide`] vectors. The scalar kernel is always compiled
//! and produces bit-identical results.
//!
//! # Example
//!
//! ```
//! use darwinwin_neural::{IoBuffer, NeuralNet};
//!
//! let net = NeuralNet::<2, 3>::zeroed();
//! let mut io = IoBuffer::<2>::new();
//! io[0] = 127;
//! net.evaluate(&mut io);
//! assert!(io.iter().all(|v| v == 0));
//! ```

pub use self::{io_buffer::*, net::*};

mod io_buffer;
mod kernel;
mod net;

/// Number of `i16` lanes in one block (one 256-bit vector).
pub const BLOCK_SIZE: usize = 16;

/// One vector-width chunk of parameters or activations.
pub type Block = [i16; BLOCK_SIZE];

/// Number of fractional bits of the fixed-point representation.
pub const FIXED_POINT_SHIFT: u32 = 7;

/// Activation floor (hard clip).
pub const ACTIVATION_MIN: i16 = i8::MIN as i16;
/// Activation ceiling (hard clip).
pub const ACTIVATION_MAX: i16 = i8::MAX as i16;

/// A serialized network blob did not have the expected size.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("brain blob has {actual} bytes, expected {expected}")]
pub struct BrainFormatError {
    pub expected: usize,
    pub actual: usize,
}
