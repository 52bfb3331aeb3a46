//! Raw, macro-oblivious token scanning over flat buffer slices.
//!
//! The scanner answers two questions for the alignment resolver: "is there
//! meaningful (non-comment) text between two positions?" and "does a single
//! statement terminator immediately follow?". Both are pure functions of the
//! buffer and the positions; no state persists between calls.

mod lexer;
mod scanner;

pub use lexer::{raw_tokens, RawLexeme, RawToken};
pub use scanner::{end_of_token, has_non_comment_tokens_between, swallow_trailing_terminator};
pub(crate) use scanner::{code_token_starts, has_tokens_between};
