//! Actor state, the action resolver and the simulation step.
//!
//! - [`Stats`] - Bounded stat vector with the clamped-add primitive
//! - [`Action`] - The eight actions and their costs
//! - [`Actor`] - Position, orientation, stats, feedback and brain; owns the step loop
//! - [`brain`] - Network topology, input encoding and action sampling
//! - [`LevelGenerator`] - Boundary for procedural level generation
//! - [`Sandbox`] - Manual control surface for one actor on one level
//!
//! Simulation constants are collected in [`economy`].

pub use self::{action::*, actor::*, brain::*, control::*, level_gen::*, stats::*};

mod action;
mod actor;
pub mod brain;
mod control;
pub mod economy;
mod level_gen;
mod stats;
