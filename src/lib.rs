//! Span Align: resolving macro expansions and code ranges to syntax-tree nodes
//!
//! Given an externally-built, immutable syntax tree and its source buffers,
//! this crate answers one question: which tree nodes does a source span
//! exactly cover? Targets are macro expansions (with their argument token
//! lists) or arbitrary line/column ranges; answers are antichains of
//! top-level nodes, validated by a raw token scan so no significant code
//! leaks across the edges.
//!
//! # Architecture
//!
//! Resolution is a pure read-side query: the [`Aligner`] collects candidate
//! nodes per category, drops descendants of other candidates, and commits
//! the survivors all-or-nothing after an edge-tolerance check (comments are
//! transparent, one trailing `;` is swallowed for range targets). Failure to
//! align is a defined outcome, not an error.
//!
//! # Example
//!
//! ```no_run
//! use span_align::{Aligner, Analysis};
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let analysis = Analysis::from_path("analysis.json")?;
//! let aligner = Aligner::new(&analysis.tree, &analysis.map);
//! let mut expansions = analysis.expansions;
//! aligner.resolve_expansions(&mut expansions);
//! for exp in &expansions {
//!     match &exp.aligned_root {
//!         Some(root) => println!("{} aligns 1:1 with {:?}", exp.name, root),
//!         None => println!("{} has no 1:1 alignment", exp.name),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod align;
pub mod bundle;
pub mod output;
pub mod report;
pub mod scan;
pub mod source;
pub mod target;
pub mod tasks;
pub mod tree;

// Re-exports
pub use align::{collect_subtree, Aligner};
pub use bundle::{Analysis, BundleError};
pub use report::{AlignmentReport, ExpansionReport, RangeReport, RootReport};
pub use source::{BufferId, FilePos, Loc, LocSpace, SourceMap, Span};
pub use target::{CodeRangeTask, MacroArgument, MacroExpansion, Token};
pub use tasks::{load_from_path, load_from_str, TaskError, TaskList};
pub use tree::{AlignedNode, NodeCategory, NodeId, NodeKind, SyntaxTree, TreeBuilder};
