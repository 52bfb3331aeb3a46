//! Subtree membership: expand one resolved node into the sets downstream
//! tagging passes consume.

use crate::tree::{AlignedNode, NodeCategory, NodeId, SyntaxTree};
use std::collections::HashSet;

/// Record which nodes belong to `node`'s subtree.
///
/// Statements are walked iteratively in pre-order, collecting every
/// statement-category descendant including `node` itself. A declaration
/// contributes only itself; walking a declaration's body is the caller's
/// job, invoked on the body node separately.
pub fn collect_subtree(
    tree: &SyntaxTree,
    node: &AlignedNode,
    stmts: &mut HashSet<NodeId>,
    decls: &mut HashSet<NodeId>,
) {
    match node {
        AlignedNode::Stmt(id) => {
            let mut stack = vec![*id];
            while let Some(cur) = stack.pop() {
                if !stmts.insert(cur) {
                    continue;
                }
                for &child in tree.children(cur) {
                    if tree.kind(child).category() == NodeCategory::Stmt {
                        stack.push(child);
                    }
                }
            }
        }
        AlignedNode::Decl(id) => {
            decls.insert(*id);
        }
        AlignedNode::TypeRef(_) => {
            // TODO: determine why collecting type-reference subtrees broke
            // matching before re-enabling it here.
        }
    }
}
