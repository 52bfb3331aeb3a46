//! Property tests for the scanner's tolerance rules and the resolver's
//! antichain / all-or-nothing guarantees.

use proptest::prelude::*;
use span_align::scan::{end_of_token, has_non_comment_tokens_between, swallow_trailing_terminator};
use span_align::{
    Aligner, FilePos, LocSpace, MacroExpansion, NodeKind, SourceMap, Span, TreeBuilder,
};

fn map_with(text: &str) -> (SourceMap, span_align::BufferId) {
    let mut map = SourceMap::new();
    let id = map.add_buffer("prop.c", text);
    (map, id)
}

/// Comment interior that cannot terminate a block comment early.
fn comment_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.]{0,40}"
}

proptest! {
    #[test]
    fn comment_only_intervals_are_transparent(line in comment_text(), block in comment_text()) {
        let text = format!("//{line}\n/* {block} */ ");
        let (map, id) = map_with(&text);
        let a = span_align::Loc::file(FilePos::new(id, 0));
        let b = span_align::Loc::file(FilePos::new(id, text.len() as u32));
        prop_assert!(!has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
    }

    #[test]
    fn one_code_token_defeats_transparency(block in comment_text(), ident in "[a-z][a-z0-9]{0,8}") {
        let text = format!("/* {block} */ {ident} ");
        let (map, id) = map_with(&text);
        let a = span_align::Loc::file(FilePos::new(id, 0));
        let b = span_align::Loc::file(FilePos::new(id, text.len() as u32));
        prop_assert!(has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
    }

    #[test]
    fn swallow_consumes_at_most_one_terminator(pad in "[ \t]{0,5}", extra in 0u32..3) {
        // A run of `extra + 2` terminators after the padding: exactly one may
        // ever be swallowed, whatever the limit allows.
        let terminators = ";".repeat(extra as usize + 2);
        let text = format!("{pad}{terminators}");
        let (map, id) = map_with(&text);
        let pos = FilePos::new(id, pad.len() as u32);
        let limit = FilePos::new(id, text.len() as u32);

        match swallow_trailing_terminator(&map, pos, limit) {
            Some(past) => {
                prop_assert_eq!(past.offset, pos.offset + 1);
                // The rest of the run is still there to be found.
                let a = span_align::Loc::file(past);
                let b = span_align::Loc::file(limit);
                prop_assert!(has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
            }
            None => prop_assert!(pos >= limit),
        }
    }
}

/// Random parent links for nodes 1..n: a parent's index always precedes
/// the child's.
fn arbitrary_tree(n: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<prop::sample::Index>(), n - 1).prop_map(|picks| {
        picks
            .iter()
            .enumerate()
            .map(|(i, pick)| pick.index(i + 1))
            .collect()
    })
}

proptest! {
    #[test]
    fn resolved_roots_form_an_antichain(
        parents in arbitrary_tree(8),
        spans in prop::collection::vec((0u32..12, 0u32..12), 7),
        target in (0u32..12, 0u32..12),
    ) {
        let text = "a b c d e f g h i j k l";
        let (map, id) = map_with(text);

        let mut b = TreeBuilder::new();
        let root = b.root(NodeKind::TranslationUnit, Span::file(id, 0, 22));
        let mut ids = vec![root];
        for (i, &p) in parents.iter().enumerate() {
            let (x, y) = spans[i];
            let (begin, end) = (x.min(y), x.max(y));
            ids.push(b.child(ids[p], NodeKind::ExprStmt, Span::file(id, begin, end)));
        }
        let tree = b.finish();

        let (tx, ty) = target;
        let mut exp = MacroExpansion::new(
            "M",
            Span::file(id, tx.min(ty), tx.max(ty)),
            vec![],
            vec![],
        );
        Aligner::new(&tree, &map).resolve_expansion(&mut exp);

        // No root may be an ancestor of another root.
        for a in &exp.ast_roots {
            for c in &exp.ast_roots {
                prop_assert!(!tree.ancestors(c.any()).contains(&a.any()) || a == c);
            }
        }
        // All-or-nothing with an exact predicate: every committed root's
        // spelling range is the invocation range itself.
        for r in &exp.ast_roots {
            prop_assert_eq!(
                r.span(&tree).begin.spelling(),
                exp.spelling_range.begin.spelling()
            );
            prop_assert_eq!(
                r.span(&tree).end.spelling(),
                exp.spelling_range.end.spelling()
            );
        }
        prop_assert_eq!(exp.aligned_root.is_some(), exp.ast_roots.len() == 1);
    }

    #[test]
    fn end_of_token_never_moves_backwards(offset in 0u32..23) {
        let text = "ab + cde /*x*/ fg; hij";
        let (map, id) = map_with(text);
        let pos = FilePos::new(id, offset);
        let end = end_of_token(&map, pos);
        prop_assert!(end >= pos);
        prop_assert!(end.offset as usize <= text.len());
    }
}
