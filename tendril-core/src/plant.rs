use crate::types::NodeId;
use glam::Vec2;

/// A single point in the plant structure.
///
/// After creation only `thickness` and `is_growing_tip` may change;
/// everything else is frozen, including position. The heading and
/// curviness values record the walk state used when the node was
/// created and seed the walk of its forward-growth child.
#[derive(Clone, Debug, PartialEq)]
pub struct PlantNode {
    pub pos: Vec2,
    /// `None` only for the root.
    pub parent: Option<NodeId>,
    /// Append-only; ordered by creation.
    pub children: Vec<NodeId>,
    /// Set while the node has not yet spawned its forward-growth child.
    pub is_growing_tip: bool,
    pub thickness: f32,
    /// Cosmetic tag inherited from the parent (RGB).
    pub color: [u8; 3],
    pub creation_turn: u32,
    /// Heading used when this node was placed, in radians.
    pub heading: f32,
    /// Personal heading bias, clamped by the config.
    pub curviness: f32,
    /// Per-turn change of the bias, clamped by the config.
    pub curviness_rate: f32,
}

impl PlantNode {
    /// Turns elapsed since this node was created.
    pub fn age(&self, turn: u32) -> u32 {
        turn.saturating_sub(self.creation_turn)
    }
}

/// The plant's node arena plus the live growing-tip id list.
///
/// Nodes only ever point to a parent created strictly before them, so
/// the graph is structurally acyclic. Nothing is ever removed; ids are
/// stable for the lifetime of the plant. The tip list is kept exactly
/// in sync with the `is_growing_tip` flags by the mutation helpers
/// below — phases must go through [`Plant::extend_tip`] and
/// [`Plant::add_branch`] rather than touching the fields directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Plant {
    pub nodes: Vec<PlantNode>,
    pub growing_tips: Vec<NodeId>,
}

impl Plant {
    /// Creates a plant consisting of a single root tip.
    pub fn new(root: PlantNode) -> Self {
        debug_assert!(root.parent.is_none());
        debug_assert!(root.is_growing_tip);
        Self {
            nodes: vec![root],
            growing_tips: vec![0],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&PlantNode> {
        self.nodes.get(id)
    }

    /// The parent node of `id`, if `id` is valid and not the root.
    pub fn parent_of(&self, id: NodeId) -> Option<&PlantNode> {
        self.nodes
            .get(id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(p))
    }

    /// Extends a growing tip forward: the tip stops being a tip, the
    /// child becomes one, and the tip list swaps the old id for the new.
    ///
    /// The three updates happen together so the tip list and the flags
    /// never disagree between phases.
    ///
    /// ### Returns
    /// The id of the newly appended child.
    pub fn extend_tip(&mut self, tip: NodeId, child: PlantNode) -> NodeId {
        debug_assert_eq!(child.parent, Some(tip));
        debug_assert!(child.is_growing_tip);
        let id = self.nodes.len();
        self.nodes.push(child);
        self.nodes[tip].is_growing_tip = false;
        self.nodes[tip].children.push(id);
        if let Some(slot) = self.growing_tips.iter_mut().find(|t| **t == tip) {
            *slot = id;
        } else {
            self.growing_tips.push(id);
        }
        id
    }

    /// Appends a lateral branch child as a fresh growing tip.
    ///
    /// The parent keeps its (non-tip) status; the child id is appended
    /// to its children and to the tip list.
    ///
    /// ### Returns
    /// The id of the newly appended child.
    pub fn add_branch(&mut self, parent: NodeId, child: PlantNode) -> NodeId {
        debug_assert_eq!(child.parent, Some(parent));
        debug_assert!(child.is_growing_tip);
        let id = self.nodes.len();
        self.nodes.push(child);
        self.nodes[parent].children.push(id);
        self.growing_tips.push(id);
        id
    }

    /// Length of the segment from `id` back to its parent.
    ///
    /// Zero for the root and for any node whose parent cannot be
    /// resolved (a recoverable accounting gap, not an error).
    pub fn segment_length(&self, id: NodeId) -> f32 {
        match (self.nodes.get(id), self.parent_of(id)) {
            (Some(node), Some(parent)) => (node.pos - parent.pos).length(),
            _ => 0.0,
        }
    }

    /// Sum of all parent-to-child segment lengths.
    ///
    /// Shared by the thickening phase and the stats summary so the
    /// lookup-and-measure logic lives in exactly one place.
    pub fn total_length(&self) -> f32 {
        (0..self.nodes.len()).map(|id| self.segment_length(id)).sum()
    }

    /// Whether the tip list and the per-node flags agree.
    ///
    /// The mutation helpers maintain this; it is checked in tests after
    /// every phase hand-off.
    pub fn tips_consistent(&self) -> bool {
        let flagged: Vec<NodeId> = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.is_growing_tip.then_some(id))
            .collect();
        let mut listed = self.growing_tips.clone();
        listed.sort_unstable();
        listed.dedup();
        listed == flagged && self.growing_tips.len() == flagged.len()
    }
}
