use crate::source::Span;
use crate::tree::arena::{NodeData, NodeId, NodeKind, SyntaxTree};
use crate::tree::node::TypeRefKey;

/// Incremental constructor for an immutable [`SyntaxTree`].
///
/// Intended for upstream tree producers and for tests; once `finish` is
/// called the tree never changes. Parents must be added before children, so
/// arena order is a pre-order of the tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the root node. Must be the first node added.
    pub fn root(&mut self, kind: NodeKind, span: Span) -> NodeId {
        assert!(self.nodes.is_empty(), "root must be the first node");
        self.nodes.push(NodeData {
            kind,
            span,
            parent: None,
            children: Vec::new(),
            type_refs: Vec::new(),
        });
        NodeId(0)
    }

    /// Add a child of an existing node.
    pub fn child(&mut self, parent: NodeId, kind: NodeKind, span: Span) -> NodeId {
        assert!(
            (parent.0 as usize) < self.nodes.len(),
            "parent must exist before its children"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            span,
            parent: Some(parent),
            children: Vec::new(),
            type_refs: Vec::new(),
        });
        self.nodes[parent.0 as usize].children.push(id);
        id
    }

    /// Anchor a type reference at an existing node.
    pub fn type_ref(&mut self, owner: NodeId, span: Span) -> TypeRefKey {
        assert!(
            (owner.0 as usize) < self.nodes.len(),
            "owner must exist before its type references"
        );
        let refs = &mut self.nodes[owner.0 as usize].type_refs;
        let index = refs.len() as u32;
        refs.push(span);
        TypeRefKey { owner, index }
    }

    pub fn finish(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}
