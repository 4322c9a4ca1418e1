//! Brain topology and the translation between simulation state and network slots.
//!
//! # Input Layout
//!
//! | Slots | Content |
//! |---|---|
//! | `0..64` | View cone, one slot per flag bit (`8 * cell + bit`), `0` or `127` |
//! | `64..70` | Stats in [`Stat`] order, shifted to `value - 128` |
//! | `76..80` | Previous step's feedback |
//!
//! # Output Layout
//!
//! | Slots | Content |
//! |---|---|
//! | `0..8` | Action weights in [`Action`] order |
//! | `76..80` | Feedback for the next step |

use darwinwin_neural::{IoBuffer, NeuralNet};
use rand::Rng;

use crate::{
    core::{ConePosition, ViewCone},
    engine::{
        action::Action,
        stats::{Stat, Stats},
    },
};

/// Number of 16-lane blocks per layer.
pub const BRAIN_LAYER_BLOCKS: usize = 5;
/// Number of layers.
pub const BRAIN_LAYERS: usize = 4;
/// Number of trailing slots fed back into the next step.
pub const FEEDBACK_LEN: usize = 4;

pub type Brain = NeuralNet<BRAIN_LAYER_BLOCKS, BRAIN_LAYERS>;
pub type BrainIo = IoBuffer<BRAIN_LAYER_BLOCKS>;

const CONE_SLOTS: usize = ConePosition::COUNT * 8;
const STAT_SLOTS_START: usize = CONE_SLOTS;
const FEEDBACK_START: usize = BrainIo::LEN - FEEDBACK_LEN;

const _: () = assert!(STAT_SLOTS_START + Stat::COUNT <= FEEDBACK_START);
const _: () = assert!(Action::COUNT <= FEEDBACK_START);

/// Recurrent state carried from one step to the next.
pub type Feedback = [i16; FEEDBACK_LEN];

/// Writes the network input for one step into `io`.
pub fn encode_input(io: &mut BrainIo, cone: &ViewCone, stats: &Stats, feedback: &Feedback) {
    io.clear();
    for (cell, flags) in cone.to_bytes().into_iter().enumerate() {
        for bit in 0..8 {
            io[cell * 8 + bit] = i16::from(flags & (1 << bit));
        }
    }
    io.binarize(0..CONE_SLOTS);

    for (i, value) in stats.values().iter().enumerate() {
        io[STAT_SLOTS_START + i] = i16::from(*value) - 128;
    }

    for (i, value) in feedback.iter().enumerate() {
        io[FEEDBACK_START + i] = *value;
    }
}

/// Extracts the trailing feedback slots from the network output.
#[must_use]
pub fn extract_feedback(io: &BrainIo) -> Feedback {
    std::array::from_fn(|i| io[FEEDBACK_START + i])
}

/// Samples an action from the action weights in the network output.
///
/// Negative weights count as zero. An action is drawn with probability proportional
/// to its weight; if every weight is zero no action is taken.
pub fn sample_action<R>(io: &BrainIo, rng: &mut R) -> Option<Action>
where
    R: Rng + ?Sized,
{
    let weights: [u16; Action::COUNT] = std::array::from_fn(|i| io[i].max(0).unsigned_abs());
    let total: u16 = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let mut remaining = rng.random_range(0..total);
    for (action, weight) in Action::ALL.into_iter().zip(weights) {
        if remaining < weight {
            return Some(action);
        }
        remaining -= weight;
    }
    unreachable!("sampled value exceeds total action weight")
}
