//! Serializable reports: the JSON shape consumers of a resolution run see.
//!
//! Reports are plain data built from resolved targets; positions are
//! translated back to 1-based line/column pairs so downstream tooling never
//! needs the flat offsets.

use crate::source::{SourceMap, Span};
use crate::target::{CodeRangeTask, MacroExpansion};
use crate::tree::{AlignedNode, NodeCategory, SyntaxTree};
use serde::Serialize;

/// One resolved node, positioned in its buffer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootReport {
    pub category: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<crate::tree::NodeKind>,
    pub file: String,
    pub begin_line: u32,
    pub begin_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl RootReport {
    pub fn from_node(node: &AlignedNode, tree: &SyntaxTree, map: &SourceMap) -> Self {
        let (category, kind) = match node {
            AlignedNode::Stmt(id) | AlignedNode::Decl(id) => {
                let kind = tree.kind(*id);
                let category = match kind.category() {
                    NodeCategory::Stmt => "stmt",
                    NodeCategory::Decl => "decl",
                };
                (category, Some(kind))
            }
            AlignedNode::TypeRef(_) => ("type_ref", None),
        };
        let (file, begin, end) = locate(node.span(tree), map);
        Self {
            category,
            kind,
            file,
            begin_line: begin.0,
            begin_col: begin.1,
            end_line: end.0,
            end_col: end.1,
        }
    }
}

/// Spelling-space line/column endpoints of a span, with the buffer name.
/// Unknown positions collapse to 0:0, which no valid report ever contains.
fn locate(span: Span, map: &SourceMap) -> (String, (u32, u32), (u32, u32)) {
    let begin = span.begin.spelling();
    let file = map
        .buffer(begin.buffer)
        .map(|b| b.name().to_owned())
        .unwrap_or_default();
    let begin_lc = map.line_col(begin).unwrap_or((0, 0));
    let end_lc = map.line_col(span.end.spelling()).unwrap_or((0, 0));
    (file, begin_lc, end_lc)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgumentReport {
    pub name: String,
    pub aligned_roots: Vec<RootReport>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionReport {
    pub name: String,
    /// True iff the expansion aligned 1:1 with a single node.
    pub aligned: bool,
    pub ast_roots: Vec<RootReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aligned_root: Option<RootReport>,
    pub arguments: Vec<ArgumentReport>,
}

impl ExpansionReport {
    pub fn new(exp: &MacroExpansion, tree: &SyntaxTree, map: &SourceMap) -> Self {
        let report = |n: &AlignedNode| RootReport::from_node(n, tree, map);
        Self {
            name: exp.name.clone(),
            aligned: exp.aligned_root.is_some(),
            ast_roots: exp.ast_roots.iter().map(report).collect(),
            aligned_root: exp.aligned_root.as_ref().map(report),
            arguments: exp
                .arguments
                .iter()
                .map(|arg| ArgumentReport {
                    name: arg.name.clone(),
                    aligned_roots: arg.aligned_roots.iter().map(report).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeReport {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub begin_line: u32,
    pub begin_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    /// True iff the range resolved to at least one top-level node.
    pub aligned: bool,
    pub ast_roots: Vec<RootReport>,
    /// Caller metadata, passed through untouched.
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub extra_info: serde_json::Value,
}

impl RangeReport {
    pub fn new(
        task: &CodeRangeTask,
        roots: &[AlignedNode],
        tree: &SyntaxTree,
        map: &SourceMap,
    ) -> Self {
        Self {
            name: task.name.clone(),
            begin_line: task.begin_line,
            begin_col: task.begin_col,
            end_line: task.end_line,
            end_col: task.end_col,
            aligned: !roots.is_empty(),
            ast_roots: roots
                .iter()
                .map(|n| RootReport::from_node(n, tree, map))
                .collect(),
            extra_info: task.extra_info.clone(),
        }
    }
}

/// The full output of one resolution run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    pub expansions: Vec<ExpansionReport>,
    pub ranges: Vec<RangeReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Span;
    use crate::tree::{NodeKind, TreeBuilder};

    fn fixture() -> (SourceMap, SyntaxTree) {
        let mut map = SourceMap::new();
        let id = map.add_buffer("f.c", "x = 1;\ny = 2;\n");
        let mut b = TreeBuilder::new();
        let root = b.root(NodeKind::TranslationUnit, Span::file(id, 0, 11));
        b.child(root, NodeKind::Assign, Span::file(id, 0, 4));
        b.child(root, NodeKind::Assign, Span::file(id, 7, 11));
        (map, b.finish())
    }

    #[test]
    fn root_report_uses_one_based_lines_and_cols() {
        let (map, tree) = fixture();
        let second = crate::tree::NodeId(2);
        let report = RootReport::from_node(&AlignedNode::Stmt(second), &tree, &map);
        assert_eq!(report.category, "stmt");
        assert_eq!(report.file, "f.c");
        assert_eq!((report.begin_line, report.begin_col), (2, 1));
        assert_eq!((report.end_line, report.end_col), (2, 5));
    }

    #[test]
    fn expansion_report_mirrors_singleton_convenience() {
        let (map, tree) = fixture();
        let mut exp = MacroExpansion::new("M", Span::file(crate::source::BufferId(0), 0, 4), vec![], vec![]);
        exp.ast_roots = vec![AlignedNode::Stmt(crate::tree::NodeId(1))];
        exp.aligned_root = exp.ast_roots.first().cloned();

        let report = ExpansionReport::new(&exp, &tree, &map);
        assert!(report.aligned);
        assert_eq!(report.ast_roots.len(), 1);
        assert!(report.aligned_root.is_some());
    }

    #[test]
    fn range_report_round_trips_extra_info() {
        let (map, tree) = fixture();
        let task = CodeRangeTask {
            name: "t".into(),
            begin_line: 1,
            begin_col: 1,
            end_line: 1,
            end_col: 5,
            extra_info: serde_json::json!({"origin": "review"}),
        };
        let report = RangeReport::new(&task, &[], &tree, &map);
        assert!(!report.aligned);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["extraInfo"]["origin"], "review");
    }

    #[test]
    fn null_extra_info_is_omitted_from_json() {
        let (map, tree) = fixture();
        let task = CodeRangeTask {
            name: String::new(),
            begin_line: 1,
            begin_col: 1,
            end_line: 1,
            end_col: 2,
            extra_info: serde_json::Value::Null,
        };
        let json = serde_json::to_value(RangeReport::new(&task, &[], &tree, &map)).unwrap();
        assert!(json.get("extraInfo").is_none());
        assert!(json.get("name").is_none());
    }
}
