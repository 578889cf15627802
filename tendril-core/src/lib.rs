//! Core turn-based 2D plant growth simulation library.
//!
//! Main components:
//! - [`environment`] — world bounds and terrain zones.
//! - [`plant`] — plant nodes and the growth arena.
//! - [`powers`] — player-allocated power counters and the point ledger.
//! - [`config`] — global tuning for the growth rules.
//! - [`phases`] — per-turn simulation phases (growth, thickening, branching).
//! - [`state`] — the aggregate game state and turn engine entry points.
//! - [`error`] — failures raised by directed actions.
//! - [`rng`] — seedable deterministic RNG helper.
//! - [`types`] — shared type aliases and IDs.

pub mod config;
pub mod environment;
pub mod error;
pub mod phases;
pub mod plant;
pub mod powers;
pub mod rng;
pub mod state;
pub mod types;
