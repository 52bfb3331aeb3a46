//! Targets of resolution: macro expansions (with their arguments) and
//! arbitrary code ranges. Produced by upstream trackers; the resolver only
//! appends results into the owned result fields.

use crate::source::{FilePos, Loc, Span};
use crate::tree::AlignedNode;
use serde::{Deserialize, Serialize};

/// One token of a macro definition or argument spelling, as recorded by the
/// upstream macro tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub loc: Loc,
    pub len: u32,
}

impl Token {
    pub fn new(loc: Loc, len: u32) -> Self {
        Self { loc, len }
    }

    /// Where the token's text begins, as written.
    pub fn spelling_start(&self) -> FilePos {
        self.loc.spelling()
    }

    /// Position just past the token's text, as written.
    pub fn spelling_end(&self) -> FilePos {
        let start = self.loc.spelling();
        FilePos::new(start.buffer, start.offset + self.len)
    }
}

/// One spelled argument of a macro call.
///
/// `aligned_roots` accumulates every node whose spelling derives purely from
/// this argument's tokens, at any nesting depth. Arguments are not expected
/// to resolve to a single top-level construct, so no antichain filtering or
/// edge-tolerance check applies to them.
#[derive(Debug, Clone, Default)]
pub struct MacroArgument {
    pub name: String,
    pub tokens: Vec<Token>,
    pub aligned_roots: Vec<AlignedNode>,
}

impl MacroArgument {
    pub fn new(name: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self {
            name: name.into(),
            tokens,
            aligned_roots: Vec::new(),
        }
    }
}

/// A macro expansion to align: the invocation's spelling range, the
/// definition tokens (the macro body as written), and the spelled arguments.
///
/// The resolver fills `ast_roots` with the top-level aligned node set and
/// `aligned_root` with its sole element when the set is a singleton — a
/// convenience view for consumers that only care about 1:1 alignment.
#[derive(Debug, Clone)]
pub struct MacroExpansion {
    pub name: String,
    pub spelling_range: Span,
    pub definition_tokens: Vec<Token>,
    pub arguments: Vec<MacroArgument>,
    pub ast_roots: Vec<AlignedNode>,
    pub aligned_root: Option<AlignedNode>,
}

impl MacroExpansion {
    pub fn new(
        name: impl Into<String>,
        spelling_range: Span,
        definition_tokens: Vec<Token>,
        arguments: Vec<MacroArgument>,
    ) -> Self {
        Self {
            name: name.into(),
            spelling_range,
            definition_tokens,
            arguments,
            ast_roots: Vec::new(),
            aligned_root: None,
        }
    }
}

/// A requested code-range analysis: a 1-based line/column interval plus an
/// opaque metadata payload round-tripped unchanged into the report.
///
/// The interval's end names the start of its last token, consistent with
/// node span ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRangeTask {
    #[serde(default)]
    pub name: String,
    pub begin_line: u32,
    pub begin_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    #[serde(default)]
    pub extra_info: serde_json::Value,
}

impl CodeRangeTask {
    /// Translate the interval into file positions in `buffer`. `None` when
    /// either endpoint does not exist in the buffer.
    pub fn file_range(
        &self,
        map: &crate::source::SourceMap,
        buffer: crate::source::BufferId,
    ) -> Option<(FilePos, FilePos)> {
        let begin = map.pos_at(buffer, self.begin_line, self.begin_col)?;
        let end = map.pos_at(buffer, self.end_line, self.end_col)?;
        Some((begin, end))
    }
}

impl std::fmt::Display for CodeRangeTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}:{}-{}:{}]",
            if self.name.is_empty() { "<range>" } else { &self.name },
            self.begin_line,
            self.begin_col,
            self.end_line,
            self.end_col
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BufferId, SourceMap};

    #[test]
    fn token_spelling_bounds() {
        let tok = Token::new(Loc::file(FilePos::new(BufferId(0), 10)), 5);
        assert_eq!(tok.spelling_start().offset, 10);
        assert_eq!(tok.spelling_end().offset, 15);
    }

    #[test]
    fn task_deserializes_camel_case_with_nested_extra_info() {
        let json = r#"{
            "name": "t1",
            "beginLine": 3, "beginCol": 5,
            "endLine": 3, "endCol": 12,
            "extraInfo": {"tags": ["a", "b"], "depth": 2}
        }"#;
        let task: CodeRangeTask = serde_json::from_str(json).unwrap();
        assert_eq!(task.begin_line, 3);
        assert_eq!(task.end_col, 12);
        assert_eq!(task.extra_info["tags"][1], "b");
    }

    #[test]
    fn task_extra_info_defaults_to_null() {
        let json = r#"{"beginLine": 1, "beginCol": 1, "endLine": 1, "endCol": 2}"#;
        let task: CodeRangeTask = serde_json::from_str(json).unwrap();
        assert!(task.extra_info.is_null());
        assert!(task.name.is_empty());
    }

    #[test]
    fn file_range_translates_both_ends() {
        let mut map = SourceMap::new();
        let id = map.add_buffer("t.c", "ab\ncdef\n");
        let task = CodeRangeTask {
            name: String::new(),
            begin_line: 2,
            begin_col: 1,
            end_line: 2,
            end_col: 4,
            extra_info: serde_json::Value::Null,
        };
        let (b, e) = task.file_range(&map, id).unwrap();
        assert_eq!(b.offset, 3);
        assert_eq!(e.offset, 6);
    }
}
