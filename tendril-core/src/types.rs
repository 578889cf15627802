/// Identifier for a node in a [`crate::plant::Plant`].
///
/// This is an index into `Plant::nodes`, and is only meaningful within
/// the lifetime of a given `Plant` instance. The arena is append-only
/// and nodes are never removed, so an id is never reused.
pub type NodeId = usize;
