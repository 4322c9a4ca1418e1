//! Tile grid simulation for brain-driven actors.
//!
//! This crate contains the deterministic world model:
//!
//! - [`core`] - Static data structures: [`TileFlags`], [`Level`], [`Orientation`] and the
//!   [`ViewCone`] sensor.
//! - [`engine`] - Everything that changes over time: actor [`Stats`], the [`Action`]
//!   resolver, the per-step loop driving an actor's [`Brain`], level generation and the
//!   manual control [`Sandbox`].
//!
//! # Step Order
//!
//! Every simulated step of an [`Actor`] runs in a fixed order:
//!
//! 1. Sense the view cone from the current level
//! 2. Apply the passive stat update (idle cost, air, digestion)
//! 3. Encode the cone, stats and previous feedback into the brain input and evaluate it
//! 4. Sample one action from the brain output and apply it
//!
//! # Example
//!
//! ```
//! use darwinwin_engine::{Actor, Brain, Level, Orientation, Position};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(0);
//! let mut level = Level::new();
//! let mut actor = Actor::new(Position::new(16, 16), Orientation::Up, Brain::random(&mut rng));
//!
//! while actor.is_viable() {
//!     actor.step(&mut level, &mut rng);
//! }
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// No non-collidable spawn tile was found within the retry budget.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no free spawn tile found after {attempts} attempts")]
pub struct PlacementError {
    pub attempts: usize,
}

/// A manual control request was rejected. No state was modified.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ControlError {
    #[display("tile ({x}, {y}) is outside the level")]
    TileOutOfRange { x: i64, y: i64 },
    #[display("tile value {value:#04x} sets runtime-only flags")]
    RuntimeFlags { value: u8 },
    #[display("unknown action id {id}")]
    UnknownAction { id: i64 },
    #[display("actor is out of energy or air")]
    ActorNotViable,
    #[display("malformed request: {message}")]
    Malformed { message: String },
}
