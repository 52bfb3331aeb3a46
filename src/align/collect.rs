//! Candidate collection: full-tree traversals per node category, gathering
//! every node whose range aligns with a target under one of the predicate
//! family members.

use crate::scan::code_token_starts;
use crate::source::{FilePos, SourceMap, Span};
use crate::target::Token;
use crate::tree::{AlignedNode, NodeCategory, NodeKind, SyntaxTree};

/// A node aligns with an expansion when its range, read in spelling space,
/// begins and ends where the macro invocation was written.
fn aligns_with_expansion(node_span: Span, invocation: Span) -> bool {
    node_span.begin.spelling() == invocation.begin.spelling()
        && node_span.end.spelling() == invocation.end.spelling()
}

/// A node aligns with a code range when its range, with macro expansion
/// resolved to the outermost call site, lies within the supplied file
/// positions. Whether the range contains nothing beyond the matched nodes
/// is decided later by the resolver's edge-tolerance check, not here.
fn aligns_with_range(node_span: Span, begin: FilePos, end: FilePos) -> bool {
    let node_begin = node_span.begin.expansion();
    let node_end = node_span.end.expansion();
    node_begin.buffer == begin.buffer
        && node_end.buffer == end.buffer
        && node_begin >= begin
        && node_end <= end
}

/// A node is spelled from a token list when both ends of its spelling range
/// coincide with the start of some token in the list, and every non-comment
/// token the node covers comes from the list too. Endpoints alone would
/// accept a node covering unrelated text between two non-adjacent tokens.
fn is_spelled_from_tokens(map: &SourceMap, node_span: Span, tokens: &[Token]) -> bool {
    let begin = node_span.begin.spelling();
    let end = node_span.end.spelling();
    let starts_at = |pos: FilePos| tokens.iter().any(|t| t.spelling_start() == pos);
    if !starts_at(begin) || !starts_at(end) {
        return false;
    }
    // [begin, end): the end token itself is covered by the endpoint check.
    code_token_starts(map, begin, end).iter().all(|&p| starts_at(p))
}

/// Statement kinds excluded from whole-target alignment: synthesized nodes
/// plus designated-initializer sugar, none of which have an independent
/// textual footprint.
fn excluded_for_whole_target(kind: NodeKind) -> bool {
    kind.is_implicit() || kind == NodeKind::DesignatedInit
}

fn collect(
    tree: &SyntaxTree,
    stmt_excluded: impl Fn(NodeKind) -> bool,
    matches: impl Fn(Span) -> bool,
) -> Vec<AlignedNode> {
    let mut out = Vec::new();

    // Statements and expressions
    for id in tree.node_ids() {
        let kind = tree.kind(id);
        if kind.category() != NodeCategory::Stmt || stmt_excluded(kind) {
            continue;
        }
        if matches(tree.span(id)) {
            out.push(AlignedNode::stmt(tree, id));
        }
    }

    // Declarations. The translation unit is a synthesized container, never
    // a textual construct, so it can never be an alignment result.
    for id in tree.node_ids() {
        let kind = tree.kind(id);
        if kind.category() != NodeCategory::Decl || kind == NodeKind::TranslationUnit {
            continue;
        }
        if matches(tree.span(id)) {
            out.push(AlignedNode::decl(tree, id));
        }
    }

    // Type references
    for id in tree.node_ids() {
        for tr in tree.type_refs_of(id) {
            if matches(tr.span) {
                out.push(AlignedNode::type_ref(tr));
            }
        }
    }

    out
}

/// Every node aligned with a macro invocation's spelling range.
pub(crate) fn expansion_candidates(tree: &SyntaxTree, invocation: Span) -> Vec<AlignedNode> {
    collect(tree, excluded_for_whole_target, |span| {
        aligns_with_expansion(span, invocation)
    })
}

/// Every node aligned with a caller-supplied file range.
pub(crate) fn range_candidates(
    tree: &SyntaxTree,
    begin: FilePos,
    end: FilePos,
) -> Vec<AlignedNode> {
    collect(tree, excluded_for_whole_target, |span| {
        aligns_with_range(span, begin, end)
    })
}

/// Every node spelled purely from one argument's tokens, at any depth.
/// Designated initializers are legitimate argument spellings, so only the
/// synthesized kinds are excluded here.
pub(crate) fn argument_candidates(
    tree: &SyntaxTree,
    map: &SourceMap,
    tokens: &[Token],
) -> Vec<AlignedNode> {
    if tokens.is_empty() {
        return Vec::new();
    }
    collect(tree, NodeKind::is_implicit, |span| {
        is_spelled_from_tokens(map, span, tokens)
    })
}
