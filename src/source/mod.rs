//! Source buffers, flat positions, and the dual coordinate spaces
//! (spelling vs. expansion) the alignment predicates compare in.

mod map;
mod span;

pub use map::{SourceBuffer, SourceMap};
pub use span::{BufferId, FilePos, Loc, LocSpace, Span};
