//! The aggregate game state and the turn engine entry points.
//!
//! All entry points are pure with respect to the caller's state: they
//! take `&GameState` and hand back a fresh value. The surrounding
//! application owns a single current state and replaces it wholesale
//! after each call; the engine keeps no references into a state it has
//! already returned.

use crate::{
    config::Config,
    environment::Environment,
    error::EngineError,
    phases,
    plant::{Plant, PlantNode},
    powers::{PowerKind, Powers},
    types::NodeId,
};
use glam::Vec2;
use log::info;
use rand::Rng;
use std::f32::consts::TAU;

/// Color every plant starts with, inherited down the structure.
const ROOT_COLOR: [u8; 3] = [0x4a, 0xde, 0x80];

/// Everything the simulation knows about one session.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub plant: Plant,
    /// 0 before initialization, 1 immediately after.
    pub turn: u32,
    pub powers: Powers,
    pub environment: Environment,
}

/// Read-only summary for display.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlantStats {
    pub total_nodes: usize,
    pub total_length: f32,
    pub growing_tip_count: usize,
    pub turn: u32,
}

/// Produces the turn-1 state: a single root tip at the origin.
///
/// The root gets a uniformly random initial heading and random
/// curviness state within the configured clamps. Powers start at zero.
pub fn initialize(environment: Environment, cfg: &Config, rng: &mut impl Rng) -> GameState {
    let root = PlantNode {
        pos: Vec2::ZERO,
        parent: None,
        children: Vec::new(),
        is_growing_tip: true,
        thickness: cfg.root_thickness,
        color: ROOT_COLOR,
        creation_turn: 1,
        heading: rng.random_range(0.0..TAU),
        curviness: rng.random_range(-cfg.curviness_limit..=cfg.curviness_limit),
        curviness_rate: rng.random_range(-cfg.curviness_rate_limit..=cfg.curviness_rate_limit),
    };
    info!("new game: root heading {:.3} rad", root.heading);
    GameState {
        plant: Plant::new(root),
        turn: 1,
        powers: Powers::default(),
        environment,
    }
}

/// Runs one full turn: growth, thickening, branching, commit.
///
/// The caller is responsible for incrementing and supplying the turn
/// number; it is assigned to the returned state after the phases run.
/// Bulk phases never fail — individual tips or nodes that cannot act
/// degrade to no-ops and the turn completes.
pub fn advance_turn(
    state: &GameState,
    turn: u32,
    cfg: &Config,
    rng: &mut impl Rng,
) -> GameState {
    let mut next = state.clone();
    phases::growth_phase(&mut next.plant, &next.powers, &next.environment, cfg, turn, rng);
    phases::thickening_phase(&mut next.plant, &next.powers, cfg);
    phases::branching_phase(&mut next.plant, &next.powers, &next.environment, cfg, turn, rng);
    next.turn = turn;
    next
}

/// Grows one specific tip, reporting failures instead of skipping.
///
/// Unlike the bulk pipeline, a directed action surfaces its reason:
/// an unknown or already-converted id is [`EngineError::InvalidTipReference`],
/// and a placement outside the bounds is [`EngineError::OutOfBounds`].
/// On error the prior state is untouched (nothing partial is applied).
/// The child is created with `turn` as its creation turn; the turn
/// counter itself is not advanced.
pub fn grow_tip(
    state: &GameState,
    tip_id: NodeId,
    turn: u32,
    cfg: &Config,
    rng: &mut impl Rng,
) -> Result<GameState, EngineError> {
    let tip = state
        .plant
        .get(tip_id)
        .filter(|n| n.is_growing_tip)
        .ok_or(EngineError::InvalidTipReference { id: tip_id })?;

    let distance = phases::growth_distance(&state.powers, cfg);
    let step = phases::step_tip(tip, distance, cfg, rng);
    if !state.environment.contains(step.pos) {
        return Err(EngineError::OutOfBounds {
            x: step.pos.x,
            y: step.pos.y,
        });
    }

    let child = PlantNode {
        pos: step.pos,
        parent: Some(tip_id),
        children: Vec::new(),
        is_growing_tip: true,
        thickness: (tip.thickness - cfg.growth_thickness_drop).max(cfg.thickness_floor),
        color: tip.color,
        creation_turn: turn,
        heading: step.heading,
        curviness: step.curviness,
        curviness_rate: step.curviness_rate,
    };
    let mut next = state.clone();
    next.plant.extend_tip(tip_id, child);
    Ok(next)
}

/// Spends one earned point on the named power.
///
/// ### Errors
/// [`EngineError::InsufficientPower`] when no spendable point remains;
/// the prior state is untouched.
pub fn allocate(state: &GameState, kind: PowerKind) -> Result<GameState, EngineError> {
    let mut next = state.clone();
    next.powers.allocate(kind, next.turn)?;
    Ok(next)
}

/// Derived read-only summary of a state. Idempotent; never mutates.
pub fn stats(state: &GameState) -> PlantStats {
    PlantStats {
        total_nodes: state.plant.len(),
        total_length: state.plant.total_length(),
        growing_tip_count: state.plant.growing_tips.len(),
        turn: state.turn,
    }
}
