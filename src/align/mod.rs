//! Span-to-node alignment: candidate collection over the tree, antichain
//! reduction, edge-tolerance validation, and subtree membership.

mod collect;
mod membership;
mod resolve;

pub use membership::collect_subtree;
pub use resolve::Aligner;
