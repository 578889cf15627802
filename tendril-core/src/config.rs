use std::f32::consts::PI;

/// Global tuning for the growth, thickening, and branching rules.
///
/// All angular values are in radians. The defaults reproduce the
/// balance of the original game: modest per-turn growth, no branching
/// at all until branchiness points are allocated, and a slow global
/// thickening driven by total plant length.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Distance a tip advances per turn before power bonuses.
    pub base_growth_distance: f32,
    /// Extra growth distance per allocated growth point.
    pub growth_distance_per_point: f32,

    /// Thickness of the root node at initialization.
    pub root_thickness: f32,
    /// Lower bound for any node's thickness.
    pub thickness_floor: f32,
    /// Thickness lost by a forward-growth child relative to its parent.
    pub growth_thickness_drop: f32,
    /// Thickness lost by a lateral branch relative to its parent.
    pub branch_thickness_drop: f32,

    /// Thickening factor before resilience bonuses.
    pub base_resilience_factor: f32,
    /// Extra thickening factor per allocated resilience point.
    pub resilience_per_point: f32,

    /// Branch activation probability before branchiness bonuses.
    pub base_branch_chance: f32,
    /// Extra activation probability per allocated branchiness point.
    pub branch_chance_per_point: f32,
    /// Angular offset of a lateral branch from its parent's heading.
    pub branch_angle: f32,
    /// Number of turns after creation during which a node may branch.
    pub branch_window: u32,

    /// Clamp for a node's personal heading bias.
    pub curviness_limit: f32,
    /// Clamp for the per-turn change of the heading bias.
    pub curviness_rate_limit: f32,
    /// Half-range of the uniform perturbation applied to the rate each turn.
    pub curviness_rate_jitter: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_growth_distance: 1.5,
            growth_distance_per_point: 0.5,
            root_thickness: 2.0,
            thickness_floor: 0.8,
            growth_thickness_drop: 0.3,
            branch_thickness_drop: 0.5,
            base_resilience_factor: 0.02,
            resilience_per_point: 0.01,
            base_branch_chance: 0.0,
            branch_chance_per_point: 0.04,
            branch_angle: PI / 6.0, // 30 degrees
            branch_window: 8,
            curviness_limit: PI / 12.0,        // +/- 15 degrees
            curviness_rate_limit: PI / 180.0,  // +/- 1 degree per turn
            curviness_rate_jitter: PI / 600.0, // +/- 0.3 degrees
        }
    }
}
