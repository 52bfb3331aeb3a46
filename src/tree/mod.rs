//! The immutable syntax tree the resolver queries: arena nodes with source
//! spans, parent lookup, ancestry chains, and the [`AlignedNode`] sum type
//! results are expressed in.

mod arena;
mod builder;
mod node;

pub use arena::{NodeCategory, NodeId, NodeKind, SyntaxTree};
pub use builder::TreeBuilder;
pub use node::{AlignedNode, AnyNode, TypeRef, TypeRefKey};
