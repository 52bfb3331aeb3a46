use crate::scan::lexer::{raw_tokens, RawToken};
use crate::source::{FilePos, Loc, LocSpace, SourceMap};

/// Returns whether any token other than a comment begins in the half-open
/// interval `[a, b)`, with both ends projected into `space`.
///
/// Fails closed: invalid positions, reversed intervals, and positions that
/// resolve to different buffers all report "no extra tokens". The policy
/// favors permissive alignment over false rejection on degenerate input.
pub fn has_non_comment_tokens_between(map: &SourceMap, a: Loc, b: Loc, space: LocSpace) -> bool {
    if !a.is_valid() || !b.is_valid() {
        return false;
    }
    has_tokens_between(map, a.project(space), b.project(space))
}

pub(crate) fn has_tokens_between(map: &SourceMap, a: FilePos, b: FilePos) -> bool {
    if !a.is_valid() || !b.is_valid() || a.buffer != b.buffer || a.offset >= b.offset {
        return false;
    }
    let Some(window) = map.slice(a.buffer, a.offset, b.offset) else {
        return false;
    };
    raw_tokens(window)
        .iter()
        .any(|lexeme| lexeme.token.map_or(true, |t| !t.is_comment()))
}

/// Starts of every non-comment token in the half-open interval `[a, b)`,
/// in buffer order. Degenerate input yields no starts.
pub(crate) fn code_token_starts(map: &SourceMap, a: FilePos, b: FilePos) -> Vec<FilePos> {
    if !a.is_valid() || !b.is_valid() || a.buffer != b.buffer || a.offset >= b.offset {
        return Vec::new();
    }
    let Some(window) = map.slice(a.buffer, a.offset, b.offset) else {
        return Vec::new();
    };
    raw_tokens(window)
        .iter()
        .filter(|lexeme| lexeme.token.map_or(true, |t| !t.is_comment()))
        .map(|lexeme| FilePos::new(a.buffer, a.offset + lexeme.start))
        .collect()
}

/// Peeks at most one token starting at `pos`. If it is a statement
/// terminator whose end lies at or before `limit`, returns the position just
/// past it; otherwise returns `None` and the caller's position stands.
///
/// This models a user-written `;` after a macro invocation: it belongs to no
/// tree node's span but must not count as trailing extra text.
pub fn swallow_trailing_terminator(
    map: &SourceMap,
    pos: FilePos,
    limit: FilePos,
) -> Option<FilePos> {
    if !pos.is_valid() || !limit.is_valid() || pos.buffer != limit.buffer || pos.offset >= limit.offset
    {
        return None;
    }
    let window = map.slice(pos.buffer, pos.offset, limit.offset)?;
    let first = raw_tokens(window).into_iter().next()?;
    if first.token != Some(RawToken::Terminator) {
        return None;
    }
    // The window is bounded by limit, so the terminator's end cannot exceed it.
    Some(FilePos::new(pos.buffer, pos.offset + first.end))
}

/// Position just past the token that starts at `pos`. Returns `pos`
/// unchanged when no token starts there.
pub fn end_of_token(map: &SourceMap, pos: FilePos) -> FilePos {
    if !pos.is_valid() {
        return pos;
    }
    let Some(text) = map.text(pos.buffer) else {
        return pos;
    };
    if pos.offset as usize > text.len() {
        return pos;
    }
    let Some(rest) = text.get(pos.offset as usize..) else {
        return pos;
    };
    match raw_tokens(rest).first() {
        // Only a token that begins exactly at pos counts.
        Some(lexeme) if lexeme.start == 0 => FilePos::new(pos.buffer, pos.offset + lexeme.end),
        _ => pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BufferId;

    fn map_with(text: &str) -> (SourceMap, BufferId) {
        let mut map = SourceMap::new();
        let id = map.add_buffer("test.c", text);
        (map, id)
    }

    fn file(buffer: BufferId, offset: u32) -> Loc {
        Loc::file(FilePos::new(buffer, offset))
    }

    #[test]
    fn finds_code_between_positions() {
        let (map, id) = map_with("x = y + 1;");
        let a = file(id, 0);
        let b = file(id, 9);
        assert!(has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
    }

    #[test]
    fn comments_are_transparent() {
        let (map, id) = map_with("/* one */ // two\nx");
        let x = map.text(id).unwrap().find('x').unwrap() as u32;
        let a = file(id, 0);
        assert!(!has_non_comment_tokens_between(
            &map,
            a,
            file(id, x),
            LocSpace::Spelling
        ));
        // Including x itself flips the answer.
        assert!(has_non_comment_tokens_between(
            &map,
            a,
            file(id, x + 1),
            LocSpace::Spelling
        ));
    }

    #[test]
    fn half_open_interval_excludes_token_at_end() {
        let (map, id) = map_with("   ;");
        // [0, 3) is all whitespace; the terminator begins at 3.
        assert!(!has_non_comment_tokens_between(
            &map,
            file(id, 0),
            file(id, 3),
            LocSpace::Spelling
        ));
        assert!(has_non_comment_tokens_between(
            &map,
            file(id, 0),
            file(id, 4),
            LocSpace::Spelling
        ));
    }

    #[test]
    fn fails_closed_on_degenerate_input() {
        let (map, id) = map_with("x y z");
        let a = file(id, 4);
        let b = file(id, 1);
        // Reversed
        assert!(!has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
        // Equal
        assert!(!has_non_comment_tokens_between(&map, a, a, LocSpace::Spelling));
        // Invalid
        assert!(!has_non_comment_tokens_between(
            &map,
            Loc::invalid(),
            b,
            LocSpace::Spelling
        ));
        // Cross-buffer
        let mut map2 = map.clone();
        let other = map2.add_buffer("other.c", "aaaa");
        assert!(!has_non_comment_tokens_between(
            &map2,
            file(id, 0),
            file(other, 3),
            LocSpace::Spelling
        ));
    }

    #[test]
    fn space_selection_changes_the_answer() {
        let (map, id) = map_with("MACRO_BODY   abc   CALL_SITE");
        let sp_a = FilePos::new(id, 0);
        let sp_b = FilePos::new(id, 10);
        // Expansion window [16, 19) is the whitespace run before CALL_SITE.
        let ex_a = FilePos::new(id, 16);
        let ex_b = FilePos::new(id, 19);
        let a = Loc::in_expansion(sp_a, ex_a);
        let b = Loc::in_expansion(sp_b, ex_b);
        // Spelling window covers MACRO_BODY; expansion window covers spaces.
        assert!(has_non_comment_tokens_between(&map, a, b, LocSpace::Spelling));
        assert!(!has_non_comment_tokens_between(&map, a, b, LocSpace::Expansion));
    }

    #[test]
    fn swallows_exactly_one_terminator() {
        let (map, id) = map_with("x = 1;;");
        let first_semi = 5u32;
        let limit = FilePos::new(id, 7);
        let after = swallow_trailing_terminator(&map, FilePos::new(id, first_semi), limit)
            .expect("first terminator should be swallowed");
        assert_eq!(after.offset, 6);
        // The second terminator is still there for the edge check to find.
        assert!(has_tokens_between(&map, after, limit));
    }

    #[test]
    fn swallow_skips_nothing_without_terminator() {
        let (map, id) = map_with("x = 1 + 2;");
        let pos = FilePos::new(id, 6);
        let limit = FilePos::new(id, 10);
        assert_eq!(swallow_trailing_terminator(&map, pos, limit), None);
    }

    #[test]
    fn swallow_tolerates_leading_whitespace() {
        let (map, id) = map_with("x   ;");
        let after = swallow_trailing_terminator(&map, FilePos::new(id, 1), FilePos::new(id, 5))
            .expect("terminator after whitespace should be swallowed");
        assert_eq!(after.offset, 5);
    }

    #[test]
    fn swallow_rejects_comment_first() {
        // A comment before the terminator means the next raw token is not a
        // terminator, so nothing moves.
        let (map, id) = map_with("x /* c */ ;");
        assert_eq!(
            swallow_trailing_terminator(&map, FilePos::new(id, 1), FilePos::new(id, 11)),
            None
        );
    }

    #[test]
    fn end_of_token_spans_whole_token() {
        let (map, id) = map_with("counter = 1");
        assert_eq!(end_of_token(&map, FilePos::new(id, 0)).offset, 7);
        // Position between tokens: nothing starts there.
        assert_eq!(end_of_token(&map, FilePos::new(id, 7)).offset, 7);
    }
}
