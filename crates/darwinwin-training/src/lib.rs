//! Evolutionary training of actor brains.
//!
//! Brains are never trained by gradient descent. Candidates ([`genetic::Gene`]) are
//! scored by letting their actor live on a level ([`fitness`]), and the best ones are
//! recombined and mutated ([`policy`]) into the next generation.
//!
//! # Island Model
//!
//! ```text
//! IslandScheduler
//!     | per batch: new level, shared spawn tile
//!     v
//! Island 0   Island 1   ...   Island N-1      (independent generations, in parallel)
//!     |          |                 |
//!     +----------+---- barrier ----+
//!                |
//!        global top `survivors`
//!                |
//!     reseed every island with copies
//! ```
//!
//! Islands only exchange genes at the barrier, which keeps diversity between
//! synchronization points while still spreading good brains.
//!
//! # Modules
//!
//! - [`genetic`] - [`Gene`](genetic::Gene), [`Island`](genetic::Island) and the per-generation cycle
//! - [`policy`] - Mutation and crossbreeding operators
//! - [`fitness`] - Scoring by simulation
//! - [`scheduler`] - Batches, the barrier and the global reseed
//! - [`session`] - Current level and the training-enabled switch
//! - [`config`] - Serializable run parameters
//! - [`stats`] - Fitness statistics for logging
//!
//! # Example
//!
//! ```
//! use darwinwin_engine::Brain;
//! use darwinwin_training::{
//!     config::TrainingConfig,
//!     scheduler::IslandScheduler,
//!     session::{TrainingSession, TrainingSwitch},
//! };
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let config = TrainingConfig {
//!     islands: 1,
//!     survivors: 2,
//!     children: 2,
//!     generations_per_level: 1,
//!     max_steps: 10,
//!     ..TrainingConfig::default()
//! };
//! let mut rng = Pcg32::seed_from_u64(0);
//! let brains = (0..2).map(|_| Brain::random(&mut rng));
//! let mut scheduler = IslandScheduler::new(&config, 0, brains)?;
//! let mut session = TrainingSession::new(TrainingSwitch::new());
//! if let Some(report) = scheduler.run_batch(&mut session) {
//!     println!("best score: {:?}", report.best.score());
//! }
//! # Ok::<(), darwinwin_training::scheduler::SchedulerError>(())
//! ```

pub mod config;
pub mod fitness;
pub mod genetic;
pub mod policy;
pub mod scheduler;
pub mod session;
pub mod stats;
