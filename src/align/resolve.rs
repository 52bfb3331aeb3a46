//! The alignment resolver: collect candidates, reduce to the top-level
//! antichain, validate the edges, and commit all-or-nothing.

use crate::align::collect;
use crate::scan::{end_of_token, has_tokens_between, swallow_trailing_terminator};
use crate::source::{BufferId, FilePos, SourceMap};
use crate::target::{CodeRangeTask, MacroExpansion};
use crate::tree::{AlignedNode, AnyNode, SyntaxTree};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Read-side alignment engine over one immutable tree and its sources.
///
/// Each resolution is an independent, deterministic query; no state persists
/// between targets, so distinct targets may be resolved in parallel.
pub struct Aligner<'a> {
    tree: &'a SyntaxTree,
    map: &'a SourceMap,
}

impl<'a> Aligner<'a> {
    pub fn new(tree: &'a SyntaxTree, map: &'a SourceMap) -> Self {
        Self { tree, map }
    }

    /// Resolve one macro expansion, writing results into its `ast_roots`,
    /// `aligned_root`, and per-argument `aligned_roots` fields.
    pub fn resolve_expansion(&self, exp: &mut MacroExpansion) {
        let candidates = collect::expansion_candidates(self.tree, exp.spelling_range);
        let mut top = self.top_level(candidates);

        if let Some((min_begin, max_end)) = self.envelope(&top, |n| {
            let s = n.span(self.tree);
            (s.begin.spelling(), s.end.spelling())
        }) {
            // Prefer the macro definition token boundary: it cannot capture
            // trailing call-site punctuation such as a user-written ';'.
            let (boundary_begin, boundary_end) = self.expansion_boundary(exp);
            let max_end_tok = end_of_token(self.map, max_end);

            let leading = has_tokens_between(self.map, boundary_begin, min_begin);
            let trailing = has_tokens_between(self.map, max_end_tok, boundary_end);
            if leading || trailing {
                debug!(
                    name = %exp.name,
                    leading,
                    trailing,
                    "discarding aligned roots: extra tokens at expansion edges"
                );
                top.clear();
            }
        }

        exp.ast_roots = top;
        exp.aligned_root = match exp.ast_roots.as_slice() {
            [only] => Some(only.clone()),
            _ => None,
        };

        // Argument alignment keeps every match at any depth: no antichain
        // reduction, no edge check.
        for arg in &mut exp.arguments {
            arg.aligned_roots = collect::argument_candidates(self.tree, self.map, &arg.tokens);
        }
    }

    /// Resolve every expansion independently, fanning out across threads.
    /// A failed alignment empties that expansion's result and nothing else.
    pub fn resolve_expansions(&self, expansions: &mut [MacroExpansion]) {
        expansions
            .par_iter_mut()
            .for_each(|exp| self.resolve_expansion(exp));
    }

    /// Resolve one code-range task against `buffer`. Returns the top-level
    /// aligned node set; empty means "no exact alignment". The task itself
    /// is never mutated.
    pub fn resolve_range(&self, task: &CodeRangeTask, buffer: BufferId) -> Vec<AlignedNode> {
        let Some((range_begin, range_end)) = task.file_range(self.map, buffer) else {
            debug!(task = %task, "range does not resolve to positions in the buffer");
            return Vec::new();
        };

        let candidates = collect::range_candidates(self.tree, range_begin, range_end);
        let mut top = self.top_level(candidates);

        // Envelope in expansion space: tokens expanded from macros are
        // measured where the range lives.
        if let Some((min_begin, max_end)) = self.envelope(&top, |n| {
            let s = n.span(self.tree);
            (s.begin.expansion(), s.end.expansion())
        }) {
            let range_end_tok = end_of_token(self.map, range_end);
            let mut max_end_tok = end_of_token(self.map, max_end);

            // A single caller-written terminator after the roots is tolerated.
            if let Some(past) = swallow_trailing_terminator(self.map, max_end_tok, range_end_tok) {
                max_end_tok = past;
            }

            let leading = has_tokens_between(self.map, range_begin, min_begin);
            let trailing = has_tokens_between(self.map, max_end_tok, range_end_tok);
            if leading || trailing {
                debug!(
                    task = %task,
                    leading,
                    trailing,
                    "discarding aligned roots: extra tokens at range edges"
                );
                top.clear();
            }
        }

        top
    }

    /// Resolve every task independently against `buffer`.
    pub fn resolve_ranges(
        &self,
        tasks: &[CodeRangeTask],
        buffer: BufferId,
    ) -> Vec<Vec<AlignedNode>> {
        tasks
            .par_iter()
            .map(|task| self.resolve_range(task, buffer))
            .collect()
    }

    /// Drop every candidate that is a tree descendant of another candidate,
    /// leaving an antichain under the parent relation.
    fn top_level(&self, candidates: Vec<AlignedNode>) -> Vec<AlignedNode> {
        // Ancestor chains are memoized per candidate for the pair scan.
        let ancestors: Vec<Vec<AnyNode>> = candidates
            .iter()
            .map(|c| self.tree.ancestors(c.any()))
            .collect();

        let mut top = Vec::with_capacity(candidates.len());
        'next: for (i, candidate) in candidates.iter().enumerate() {
            for possible_ancestor in &candidates {
                if ancestors[i].contains(&possible_ancestor.any()) {
                    trace!(?candidate, ?possible_ancestor, "descendant removed");
                    continue 'next;
                }
            }
            top.push(candidate.clone());
        }
        top
    }

    /// Edge boundary for an expansion target: the definition token span when
    /// available, else the invocation's own spelling range.
    fn expansion_boundary(&self, exp: &MacroExpansion) -> (FilePos, FilePos) {
        match (exp.definition_tokens.first(), exp.definition_tokens.last()) {
            (Some(first), Some(last)) => (first.spelling_start(), last.spelling_end()),
            _ => {
                let begin = exp.spelling_range.begin.spelling();
                let end = end_of_token(self.map, exp.spelling_range.end.spelling());
                (begin, end)
            }
        }
    }

    /// Tight envelope over a node set: earliest begin and latest end under
    /// the caller-chosen projection. `None` for an empty set.
    fn envelope(
        &self,
        nodes: &[AlignedNode],
        project: impl Fn(&AlignedNode) -> (FilePos, FilePos),
    ) -> Option<(FilePos, FilePos)> {
        let mut iter = nodes.iter().map(&project);
        let (mut min_begin, mut max_end) = iter.next()?;
        for (begin, end) in iter {
            if begin < min_begin {
                min_begin = begin;
            }
            if end > max_end {
                max_end = end;
            }
        }
        Some((min_begin, max_end))
    }
}
