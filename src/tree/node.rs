use crate::source::Span;
use crate::tree::arena::{NodeCategory, NodeId, SyntaxTree};
use std::hash::{Hash, Hasher};

/// Opaque identity of a type reference: owning node plus index within that
/// node's reference list. Two type references are the same reference iff
/// their keys are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRefKey {
    pub owner: NodeId,
    pub index: u32,
}

/// A type reference, held by value. The tree does not give these a stable
/// address of their own, so each use site carries its own copy; identity
/// lives in the key, not the copy.
#[derive(Debug, Clone, Copy)]
pub struct TypeRef {
    pub key: TypeRefKey,
    pub span: Span,
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

/// A generic handle over anything ancestry queries can reason about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnyNode {
    Node(NodeId),
    TypeRef(TypeRefKey),
}

/// A resolved tree node: exactly one of statement-or-expression,
/// declaration, or type reference.
///
/// The enum makes the "exactly one" invariant structural. Statements and
/// declarations are referenced by arena id (the tree's permanent storage);
/// type references travel by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AlignedNode {
    Stmt(NodeId),
    Decl(NodeId),
    TypeRef(TypeRef),
}

impl AlignedNode {
    pub fn stmt(tree: &SyntaxTree, id: NodeId) -> Self {
        debug_assert_eq!(tree.kind(id).category(), NodeCategory::Stmt);
        AlignedNode::Stmt(id)
    }

    pub fn decl(tree: &SyntaxTree, id: NodeId) -> Self {
        debug_assert_eq!(tree.kind(id).category(), NodeCategory::Decl);
        AlignedNode::Decl(id)
    }

    pub fn type_ref(tr: TypeRef) -> Self {
        AlignedNode::TypeRef(tr)
    }

    pub fn span(&self, tree: &SyntaxTree) -> Span {
        match self {
            AlignedNode::Stmt(id) | AlignedNode::Decl(id) => tree.span(*id),
            AlignedNode::TypeRef(tr) => tr.span,
        }
    }

    /// Generic handle for ancestry queries.
    pub fn any(&self) -> AnyNode {
        match self {
            AlignedNode::Stmt(id) | AlignedNode::Decl(id) => AnyNode::Node(*id),
            AlignedNode::TypeRef(tr) => AnyNode::TypeRef(tr.key),
        }
    }

    pub fn is_stmt(&self) -> bool {
        matches!(self, AlignedNode::Stmt(_))
    }

    pub fn is_decl(&self) -> bool {
        matches!(self, AlignedNode::Decl(_))
    }

    pub fn is_type_ref(&self) -> bool {
        matches!(self, AlignedNode::TypeRef(_))
    }
}
