use crate::source::Span;
use crate::tree::node::{AnyNode, TypeRef, TypeRefKey};
use serde::{Deserialize, Serialize};

/// Index of a node in a [`SyntaxTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Broad node category: statement-or-expression, or declaration.
///
/// Type references are not arena nodes; the tree stores them by value on
/// their owning node (see [`TypeRef`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Stmt,
    Decl,
}

/// The node kinds the resolver distinguishes. C-flavored, matching the
/// trees an upstream frontend produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    // Statements and expressions
    CompoundStmt,
    ExprStmt,
    DeclStmt,
    IfStmt,
    WhileStmt,
    ReturnStmt,
    BinaryOp,
    UnaryOp,
    Assign,
    Call,
    Paren,
    DeclRef,
    Member,
    IntLiteral,
    StringLiteral,
    InitList,
    // Compiler-synthesized sugar with no independent textual footprint
    ImplicitCast,
    ImplicitValueInit,
    DesignatedInit,
    // Declarations
    TranslationUnit,
    FunctionDecl,
    VarDecl,
    ParmDecl,
    FieldDecl,
    RecordDecl,
    EnumDecl,
    TypedefDecl,
}

impl NodeKind {
    pub fn category(self) -> NodeCategory {
        use NodeKind::*;
        match self {
            CompoundStmt | ExprStmt | DeclStmt | IfStmt | WhileStmt | ReturnStmt | BinaryOp
            | UnaryOp | Assign | Call | Paren | DeclRef | Member | IntLiteral | StringLiteral
            | InitList | ImplicitCast | ImplicitValueInit | DesignatedInit => NodeCategory::Stmt,
            TranslationUnit | FunctionDecl | VarDecl | ParmDecl | FieldDecl | RecordDecl
            | EnumDecl | TypedefDecl => NodeCategory::Decl,
        }
    }

    /// Synthesized nodes that never correspond to written text.
    pub fn is_implicit(self) -> bool {
        matches!(self, NodeKind::ImplicitCast | NodeKind::ImplicitValueInit)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Spans of type references anchored at this node, stored by value.
    pub type_refs: Vec<Span>,
}

/// An immutable, externally-built syntax tree.
///
/// The resolver only reads from it: span queries, parent lookup, and full
/// traversals. Construction goes through [`TreeBuilder`].
///
/// [`TreeBuilder`]: crate::tree::TreeBuilder
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<NodeData>,
}

impl SyntaxTree {
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0 as usize].kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.0 as usize].span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0 as usize].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0 as usize].children
    }

    /// Type references anchored at `id`, materialized by value.
    pub fn type_refs_of(&self, id: NodeId) -> impl Iterator<Item = TypeRef> + '_ {
        self.nodes[id.0 as usize]
            .type_refs
            .iter()
            .enumerate()
            .map(move |(index, span)| TypeRef {
                key: TypeRefKey {
                    owner: id,
                    index: index as u32,
                },
                span: *span,
            })
    }

    /// The ordered ancestor chain of `node`, nearest parent first, up to and
    /// including the root. The node itself is not in the chain.
    pub fn ancestors(&self, node: AnyNode) -> Vec<AnyNode> {
        let mut chain = Vec::new();
        let mut cursor = match node {
            AnyNode::Node(id) => self.parent(id),
            // A type reference's nearest ancestor is its owning node.
            AnyNode::TypeRef(key) => Some(key.owner),
        };
        while let Some(id) = cursor {
            chain.push(AnyNode::Node(id));
            cursor = self.parent(id);
        }
        chain
    }
}
