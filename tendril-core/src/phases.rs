//! Per-turn simulation phases for the plant growth pipeline.
//!
//! One turn runs three phases in fixed order:
//! 1. [`growth_phase`] — every growing tip takes a curving step forward
//!    and hands tip status to its new child.
//! 2. [`thickening_phase`] — a global thickening budget, proportional
//!    to total plant length and the resilience power, is spread evenly
//!    across all nodes.
//! 3. [`branching_phase`] — recently created non-tip nodes may spawn a
//!    lateral branch at a fixed angular offset.
//!
//! Later phases depend on the node set produced by earlier ones, so
//! the order is not interchangeable. None of the phases fail: a tip
//! that cannot place its child (out of bounds) simply skips the turn
//! and remains a growing tip.

use crate::{
    config::Config,
    environment::Environment,
    plant::{Plant, PlantNode},
    powers::Powers,
    types::NodeId,
};
use glam::Vec2;
use log::debug;
use rand::Rng;

/// Distance a tip (or a fresh branch) advances this turn.
///
/// A fixed base plus a linear bonus per allocated growth point. Used
/// identically by [`growth_phase`], [`branching_phase`], and the
/// directed single-tip action.
pub fn growth_distance(powers: &Powers, cfg: &Config) -> f32 {
    cfg.base_growth_distance + cfg.growth_distance_per_point * powers.growth as f32
}

/// One advance of the bounded random walk a tip performs each turn.
///
/// The curviness rate receives a small uniform perturbation and is
/// clamped; the curviness integrates the new rate and is clamped; the
/// heading integrates the new curviness. Because the rate itself moves
/// slowly, the heading drifts smoothly instead of jumping.
pub(crate) struct TipStep {
    pub pos: Vec2,
    pub heading: f32,
    pub curviness: f32,
    pub curviness_rate: f32,
}

pub(crate) fn step_tip(
    tip: &PlantNode,
    distance: f32,
    cfg: &Config,
    rng: &mut impl Rng,
) -> TipStep {
    let jitter = rng.random_range(-cfg.curviness_rate_jitter..=cfg.curviness_rate_jitter);
    let curviness_rate = (tip.curviness_rate + jitter)
        .clamp(-cfg.curviness_rate_limit, cfg.curviness_rate_limit);
    let curviness =
        (tip.curviness + curviness_rate).clamp(-cfg.curviness_limit, cfg.curviness_limit);
    let heading = tip.heading + curviness;
    TipStep {
        pos: tip.pos + distance * Vec2::from_angle(heading),
        heading,
        curviness,
        curviness_rate,
    }
}

/// Grows every current tip one step forward.
///
/// The tip id list is snapshotted up front, so children created during
/// the pass are not grown again within the same turn. For each tip:
///
/// 1. Missing or already-converted ids are skipped (defensive no-op).
/// 2. A [`TipStep`] is computed from the tip's walk state.
/// 3. If the proposed position leaves the environment bounds, the tip
///    does not grow this turn: it stays flagged, stays in the tip
///    list, and is retried next turn.
/// 4. Otherwise a child is appended via [`Plant::extend_tip`]: it
///    inherits the color, loses `growth_thickness_drop` thickness
///    (floored), carries the updated walk state, and takes over tip
///    status from its parent.
///
/// The walk state is stored on the child; the parent's own recorded
/// heading and curviness never change after creation.
///
/// ### Returns
/// Ids of the nodes created this phase, in creation order.
pub fn growth_phase(
    plant: &mut Plant,
    powers: &Powers,
    env: &Environment,
    cfg: &Config,
    turn: u32,
    rng: &mut impl Rng,
) -> Vec<NodeId> {
    let distance = growth_distance(powers, cfg);
    let tip_ids: Vec<NodeId> = plant.growing_tips.clone();
    let mut new_ids = Vec::with_capacity(tip_ids.len());

    for id in tip_ids {
        let Some(tip) = plant.get(id) else { continue };
        if !tip.is_growing_tip {
            continue;
        }

        let step = step_tip(tip, distance, cfg, rng);
        if !env.contains(step.pos) {
            continue; // blocked; the tip is retried next turn
        }

        let child = PlantNode {
            pos: step.pos,
            parent: Some(id),
            children: Vec::new(),
            is_growing_tip: true,
            thickness: (tip.thickness - cfg.growth_thickness_drop).max(cfg.thickness_floor),
            color: tip.color,
            creation_turn: turn,
            heading: step.heading,
            curviness: step.curviness,
            curviness_rate: step.curviness_rate,
        };
        new_ids.push(plant.extend_tip(id, child));
    }
    new_ids
}

/// Spreads this turn's thickening budget evenly across all nodes.
///
/// The budget is `total plant length x resilience factor`, where the
/// factor is a small base plus a linear resilience bonus. Every node
/// (root, tips, everything) receives the same flat increment, which
/// makes the distribution order-independent and globally fair rather
/// than per-branch proportional.
pub fn thickening_phase(plant: &mut Plant, powers: &Powers, cfg: &Config) {
    let total_length = plant.total_length();
    let factor = cfg.base_resilience_factor + cfg.resilience_per_point * powers.resilience as f32;
    let per_node = total_length * factor / plant.len().max(1) as f32;
    for node in &mut plant.nodes {
        node.thickness += per_node;
    }
}

/// Whether a node may spawn a lateral branch this turn.
///
/// Growing tips never branch directly; branching only happens from
/// nodes already superseded by forward growth, and only while they are
/// at most `branch_window` turns old. A node is re-evaluated every
/// turn it remains inside the window, so it can branch more than once
/// before aging out.
fn branch_eligible(node: &PlantNode, turn: u32, cfg: &Config) -> bool {
    !node.is_growing_tip && node.age(turn) <= cfg.branch_window
}

/// Gives every eligible node an independent chance to spawn a branch.
///
/// The activation probability is a base (zero by default) plus a
/// linear branchiness bonus, drawn once per eligible node per turn.
/// A successful draw proposes a child at the parent's recorded heading
/// plus `branch_angle`, at the same distance forward growth would use;
/// out-of-bounds proposals are skipped silently. A placed branch is a
/// fresh growing tip with newly randomized curviness state, fully
/// independent of its parent's walk.
///
/// Nodes appended during the pass are not themselves evaluated.
///
/// ### Returns
/// Ids of the branches created this phase, in creation order.
pub fn branching_phase(
    plant: &mut Plant,
    powers: &Powers,
    env: &Environment,
    cfg: &Config,
    turn: u32,
    rng: &mut impl Rng,
) -> Vec<NodeId> {
    let chance = cfg.base_branch_chance + cfg.branch_chance_per_point * powers.branchiness as f32;
    let distance = growth_distance(powers, cfg);
    let mut new_ids = Vec::new();

    for id in 0..plant.len() {
        let node = &plant.nodes[id];
        if !branch_eligible(node, turn, cfg) {
            continue;
        }
        if rng.random::<f32>() >= chance {
            continue;
        }

        let heading = node.heading + cfg.branch_angle;
        let pos = node.pos + distance * Vec2::from_angle(heading);
        if !env.contains(pos) {
            continue;
        }

        let child = PlantNode {
            pos,
            parent: Some(id),
            children: Vec::new(),
            is_growing_tip: true,
            thickness: (node.thickness - cfg.branch_thickness_drop).max(cfg.thickness_floor),
            color: node.color,
            creation_turn: turn,
            heading,
            curviness: rng.random_range(-cfg.curviness_limit..=cfg.curviness_limit),
            curviness_rate: rng
                .random_range(-cfg.curviness_rate_limit..=cfg.curviness_rate_limit),
        };
        let child_id = plant.add_branch(id, child);
        debug!("turn {turn}: node {id} branched into {child_id}");
        new_ids.push(child_id);
    }
    new_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Bounds, Environment};
    use crate::rng::create_rng;

    fn tiny_env(half: f32) -> Environment {
        Environment::new(
            Bounds::new(Vec2::new(-half, -half), Vec2::new(half, half)),
            Vec::new(),
        )
    }

    fn root() -> PlantNode {
        PlantNode {
            pos: Vec2::ZERO,
            parent: None,
            children: Vec::new(),
            is_growing_tip: true,
            thickness: 2.0,
            color: [0x4a, 0xde, 0x80],
            creation_turn: 1,
            heading: 0.0,
            curviness: 0.0,
            curviness_rate: 0.0,
        }
    }

    #[test]
    fn growth_phase_extends_the_root_tip() {
        let mut plant = Plant::new(root());
        let powers = Powers::default();
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(1);

        let new_ids = growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);

        assert_eq!(new_ids, vec![1]);
        assert_eq!(plant.len(), 2);
        assert_eq!(plant.growing_tips, vec![1]);
        assert!(!plant.nodes[0].is_growing_tip);

        let child = &plant.nodes[1];
        assert_eq!(child.parent, Some(0));
        assert_eq!(child.creation_turn, 2);
        assert_eq!(child.color, plant.nodes[0].color);
        // Base distance with zero growth power.
        let dist = (child.pos - plant.nodes[0].pos).length();
        assert!((dist - 1.5).abs() < 1e-5, "distance was {dist}");
        // Thickness drops by 0.3, still above the floor.
        assert!((child.thickness - 1.7).abs() < 1e-6);
        assert!(plant.tips_consistent());
    }

    #[test]
    fn growth_distance_scales_with_growth_power() {
        let cfg = Config::default();
        let powers = Powers {
            growth: 3,
            ..Powers::default()
        };
        assert_eq!(growth_distance(&powers, &cfg), 3.0);

        let mut plant = Plant::new(root());
        let env = Environment::default();
        let mut rng = create_rng(2);
        growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);
        let dist = (plant.nodes[1].pos - plant.nodes[0].pos).length();
        assert!((dist - 3.0).abs() < 1e-5, "distance was {dist}");
    }

    #[test]
    fn blocked_tip_stays_a_growing_tip() {
        // Bounds too small for a 1.5-unit step in any direction.
        let env = tiny_env(1.0);
        let mut plant = Plant::new(root());
        let before = plant.nodes[0].clone();
        let powers = Powers::default();
        let cfg = Config::default();
        let mut rng = create_rng(3);

        let new_ids = growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);

        assert!(new_ids.is_empty());
        assert_eq!(plant.len(), 1);
        assert_eq!(plant.growing_tips, vec![0]);
        assert_eq!(plant.nodes[0], before);
        assert!(plant.tips_consistent());
    }

    #[test]
    fn children_created_this_pass_are_not_grown_again() {
        let mut plant = Plant::new(root());
        let powers = Powers::default();
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(4);

        let new_ids = growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);
        // One tip in, one child out — never a chain of two in one pass.
        assert_eq!(new_ids.len(), 1);
        assert_eq!(plant.len(), 2);
    }

    #[test]
    fn curviness_and_rate_stay_clamped_for_all_seeds() {
        let powers = Powers::default();
        let env = Environment::default();
        let cfg = Config::default();

        for seed in 0..10 {
            let mut rng = create_rng(seed);
            let mut plant = Plant::new(root());
            for turn in 2..40 {
                growth_phase(&mut plant, &powers, &env, &cfg, turn, &mut rng);
            }
            for node in &plant.nodes {
                assert!(node.curviness.abs() <= cfg.curviness_limit + 1e-6);
                assert!(node.curviness_rate.abs() <= cfg.curviness_rate_limit + 1e-6);
            }
        }
    }

    #[test]
    fn thickening_distributes_budget_evenly() {
        let mut plant = Plant::new(root());
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(5);
        growth_phase(&mut plant, &Powers::default(), &env, &cfg, 2, &mut rng);

        let total_length = plant.total_length();
        assert!((total_length - 1.5).abs() < 1e-5);

        let before: Vec<f32> = plant.nodes.iter().map(|n| n.thickness).collect();
        let powers = Powers {
            resilience: 2,
            ..Powers::default()
        };
        thickening_phase(&mut plant, &powers, &cfg);

        // factor = 0.02 + 2 * 0.01, split across two nodes
        let expected = total_length * 0.04 / 2.0;
        for (node, old) in plant.nodes.iter().zip(before) {
            assert!((node.thickness - (old + expected)).abs() < 1e-6);
        }
    }

    #[test]
    fn thickening_a_lone_root_is_a_no_op() {
        let mut plant = Plant::new(root());
        thickening_phase(&mut plant, &Powers::default(), &Config::default());
        assert_eq!(plant.nodes[0].thickness, 2.0);
    }

    #[test]
    fn zero_branchiness_never_branches() {
        let powers = Powers::default();
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(6);
        let mut plant = Plant::new(root());

        for turn in 2..=9 {
            growth_phase(&mut plant, &powers, &env, &cfg, turn, &mut rng);
            thickening_phase(&mut plant, &powers, &cfg);
            let branches = branching_phase(&mut plant, &powers, &env, &cfg, turn, &mut rng);
            assert!(branches.is_empty());
        }
        // Eight turns of pure forward growth: a single unbranched path.
        assert_eq!(plant.len(), 9);
        assert_eq!(plant.growing_tips.len(), 1);
    }

    #[test]
    fn saturated_branchiness_branches_every_eligible_node() {
        // 25 points x 0.04 = activation probability 1.0.
        let powers = Powers {
            branchiness: 25,
            ..Powers::default()
        };
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(7);

        let mut plant = Plant::new(root());
        growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);

        // Node 0 is now a non-tip created on turn 1, inside the window.
        let branches = branching_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);
        assert_eq!(branches, vec![2]);

        let branch = &plant.nodes[2];
        assert_eq!(branch.parent, Some(0));
        assert!(branch.is_growing_tip);
        assert_eq!(branch.creation_turn, 2);
        // Branch heading is the parent's recorded heading plus the offset.
        assert!((branch.heading - (plant.nodes[0].heading + cfg.branch_angle)).abs() < 1e-6);
        // Thickness drop of 0.5 from the parent's current thickness.
        assert!((branch.thickness - (plant.nodes[0].thickness - 0.5)).abs() < 1e-6);
        assert!(plant.tips_consistent());
    }

    #[test]
    fn branch_eligibility_ends_strictly_after_the_window() {
        let cfg = Config::default();
        let mut node = root();
        node.is_growing_tip = false;
        node.creation_turn = 1;

        // Inside the window, boundary included.
        assert!(branch_eligible(&node, 1, &cfg));
        assert!(branch_eligible(&node, 9, &cfg)); // age 8 == window
        // Strictly past the window, permanently out.
        assert!(!branch_eligible(&node, 10, &cfg));
        assert!(!branch_eligible(&node, 50, &cfg));

        // Growing tips never branch regardless of age.
        node.is_growing_tip = true;
        assert!(!branch_eligible(&node, 2, &cfg));
    }

    #[test]
    fn aged_out_node_no_longer_branches_even_when_saturated() {
        let powers = Powers {
            branchiness: 25,
            ..Powers::default()
        };
        let env = Environment::default();
        let cfg = Config::default();
        let mut rng = create_rng(8);

        let mut plant = Plant::new(root());
        growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);

        // Past the root's window (creation turn 1 + window 8): no draw,
        // no branch. The grown child at turn 2 is also out of window.
        let branches = branching_phase(&mut plant, &powers, &env, &cfg, 11, &mut rng);
        assert!(branches.is_empty());
    }

    #[test]
    fn out_of_bounds_branch_is_skipped_silently() {
        let powers = Powers {
            branchiness: 25,
            ..Powers::default()
        };
        // A flat strip: room to grow straight ahead, none for a branch
        // that heads 30 degrees upward.
        let env = Environment::new(
            Bounds::new(Vec2::new(-10.0, -0.5), Vec2::new(10.0, 0.5)),
            Vec::new(),
        );
        let cfg = Config::default();
        let mut rng = create_rng(9);

        let mut plant = Plant::new(root());
        let grown = growth_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);
        // Heading ~0 with at most one turn of curviness stays inside.
        assert_eq!(grown.len(), 1);

        let before = plant.len();
        let branches = branching_phase(&mut plant, &powers, &env, &cfg, 2, &mut rng);
        // Node 0's branch would land at y = 1.5 * sin(30deg) = 0.75.
        assert!(branches.is_empty());
        assert_eq!(plant.len(), before);
        assert!(plant.tips_consistent());
    }
}
