use crate::powers::PowerKind;
use crate::types::NodeId;
use thiserror::Error;

/// Failures surfaced by directed, single-target engine actions.
///
/// The bulk per-turn phases never raise these: a tip that cannot grow
/// or a node whose parent cannot be resolved simply becomes a no-op
/// for that turn. Only directed actions (growing one specific tip,
/// spending one specific power point) report failure, and a failed
/// action leaves the prior state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EngineError {
    /// The requested id does not exist or is no longer a growing tip.
    #[error("node {id} does not exist or is not a growing tip")]
    InvalidTipReference { id: NodeId },

    /// A directed placement would land outside the environment bounds.
    #[error("position ({x:.2}, {y:.2}) is outside the environment bounds")]
    OutOfBounds { x: f32, y: f32 },

    /// No spendable point (or stored charge) of the named power remains.
    #[error("no {kind} point available")]
    InsufficientPower { kind: PowerKind },
}
