//! The analysis bundle: one JSON document carrying the source buffers, the
//! externally-built syntax tree, and the macro expansions to resolve.
//!
//! Buffers may carry an xxh3 fingerprint of their text; when present it is
//! verified at load time so stale bundles are caught before any resolution
//! runs against the wrong source.

use crate::source::{BufferId, FilePos, Loc, SourceMap, Span};
use crate::target::{MacroArgument, MacroExpansion, Token};
use crate::tree::{NodeId, NodeKind, SyntaxTree, TreeBuilder};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("failed to read bundle from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse bundle JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },

    #[error("source '{name}' does not match its fingerprint (expected {expected:016x}, got {actual:016x})")]
    Fingerprint {
        name: String,
        expected: u64,
        actual: u64,
    },

    #[error("malformed bundle: {message}")]
    Structure { message: String },
}

fn structure(message: impl Into<String>) -> BundleError {
    BundleError::Structure {
        message: message.into(),
    }
}

/// A loaded bundle, ready for resolution.
#[derive(Debug)]
pub struct Analysis {
    pub map: SourceMap,
    pub tree: SyntaxTree,
    pub expansions: Vec<MacroExpansion>,
    /// The buffer code-range tasks are interpreted against.
    pub main_buffer: BufferId,
}

impl Analysis {
    pub fn from_json(input: &str) -> Result<Self, BundleError> {
        let raw: RawBundle =
            serde_json::from_str(input).map_err(|source| BundleError::Json { source })?;
        raw.into_analysis()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BundleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| BundleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawBundle {
    sources: Vec<RawSource>,
    #[serde(default)]
    main_source: Option<String>,
    nodes: Vec<RawNode>,
    #[serde(default)]
    expansions: Vec<RawExpansion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSource {
    name: String,
    text: String,
    #[serde(default)]
    fingerprint: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    kind: NodeKind,
    /// Index of the parent node; absent only for the root. Nodes are listed
    /// in pre-order, so a parent always precedes its children.
    #[serde(default)]
    parent: Option<u32>,
    span: RawSpan,
    #[serde(default)]
    type_refs: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpan {
    begin: RawLoc,
    end: RawLoc,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct RawLoc {
    buffer: u32,
    offset: u32,
    /// Outermost call site, for positions spelled inside a macro. Absent
    /// means the position is not macro-expanded.
    #[serde(default)]
    expansion_buffer: Option<u32>,
    #[serde(default)]
    expansion_offset: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawExpansion {
    name: String,
    spelling_range: RawSpan,
    #[serde(default)]
    definition_tokens: Vec<RawToken>,
    #[serde(default)]
    arguments: Vec<RawArgument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToken {
    loc: RawLoc,
    len: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArgument {
    #[serde(default)]
    name: String,
    #[serde(default)]
    tokens: Vec<RawToken>,
}

impl RawBundle {
    fn into_analysis(self) -> Result<Analysis, BundleError> {
        if self.sources.is_empty() {
            return Err(structure("bundle has no sources"));
        }

        let mut map = SourceMap::new();
        let mut buffers = Vec::with_capacity(self.sources.len());
        for src in &self.sources {
            if let Some(expected) = src.fingerprint {
                let actual = xxh3_64(src.text.as_bytes());
                if actual != expected {
                    return Err(BundleError::Fingerprint {
                        name: src.name.clone(),
                        expected,
                        actual,
                    });
                }
            }
            buffers.push(map.add_buffer(src.name.as_str(), src.text.as_str()));
        }

        let main_buffer = match &self.main_source {
            None => buffers[0],
            Some(name) => {
                let index = self
                    .sources
                    .iter()
                    .position(|s| &s.name == name)
                    .ok_or_else(|| structure(format!("mainSource '{name}' is not a source")))?;
                buffers[index]
            }
        };

        let resolve_loc = |loc: RawLoc| -> Result<Loc, BundleError> {
            let buffer_of = |index: u32| -> Result<BufferId, BundleError> {
                buffers
                    .get(index as usize)
                    .copied()
                    .ok_or_else(|| structure(format!("buffer index {index} out of range")))
            };
            let spelling = FilePos::new(buffer_of(loc.buffer)?, loc.offset);
            match (loc.expansion_buffer, loc.expansion_offset) {
                (None, None) => Ok(Loc::file(spelling)),
                (Some(b), Some(o)) => Ok(Loc::in_expansion(spelling, FilePos::new(buffer_of(b)?, o))),
                _ => Err(structure(
                    "expansionBuffer and expansionOffset must be given together",
                )),
            }
        };
        let resolve_span = |span: &RawSpan| -> Result<Span, BundleError> {
            Ok(Span::new(resolve_loc(span.begin)?, resolve_loc(span.end)?))
        };
        let resolve_token = |tok: &RawToken| -> Result<Token, BundleError> {
            Ok(Token::new(resolve_loc(tok.loc)?, tok.len))
        };

        if self.nodes.is_empty() {
            return Err(structure("bundle has no tree nodes"));
        }
        let mut builder = TreeBuilder::new();
        for (index, node) in self.nodes.iter().enumerate() {
            let span = resolve_span(&node.span)?;
            let id = match (index, node.parent) {
                (0, None) => builder.root(node.kind, span),
                (0, Some(_)) => return Err(structure("first node must be the parentless root")),
                (_, None) => return Err(structure(format!("node {index} has no parent"))),
                (i, Some(parent)) => {
                    if parent as usize >= i {
                        return Err(structure(format!(
                            "node {i} refers to parent {parent} that does not precede it"
                        )));
                    }
                    builder.child(NodeId(parent), node.kind, span)
                }
            };
            for tr in &node.type_refs {
                builder.type_ref(id, resolve_span(tr)?);
            }
        }
        let tree = builder.finish();

        let mut expansions = Vec::with_capacity(self.expansions.len());
        for raw in &self.expansions {
            let definition_tokens = raw
                .definition_tokens
                .iter()
                .map(&resolve_token)
                .collect::<Result<Vec<_>, _>>()?;
            let arguments = raw
                .arguments
                .iter()
                .map(|arg| {
                    let tokens = arg
                        .tokens
                        .iter()
                        .map(&resolve_token)
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(MacroArgument::new(arg.name.clone(), tokens))
                })
                .collect::<Result<Vec<_>, BundleError>>()?;
            expansions.push(MacroExpansion::new(
                raw.name.clone(),
                resolve_span(&raw.spelling_range)?,
                definition_tokens,
                arguments,
            ));
        }

        Ok(Analysis {
            map,
            tree,
            expansions,
            main_buffer,
        })
    }
}
