use serde::{Deserialize, Serialize};

/// Identifier of a source buffer registered in a [`SourceMap`].
///
/// [`SourceMap`]: crate::source::SourceMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BufferId(pub u32);

impl BufferId {
    /// Sentinel for "no buffer". Positions carrying it are invalid.
    pub const INVALID: BufferId = BufferId(u32::MAX);
}

/// A flat position: buffer identity plus byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FilePos {
    pub buffer: BufferId,
    pub offset: u32,
}

impl FilePos {
    pub fn new(buffer: BufferId, offset: u32) -> Self {
        Self { buffer, offset }
    }

    pub fn invalid() -> Self {
        Self {
            buffer: BufferId::INVALID,
            offset: 0,
        }
    }

    pub fn is_valid(self) -> bool {
        self.buffer != BufferId::INVALID
    }
}

/// Which coordinate space a location should be read in.
///
/// `Spelling` is where the text was literally written; `Expansion` is where
/// it lands after macro substitution is resolved to its outermost call site.
/// The two spaces coincide for tokens written outside any macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocSpace {
    Spelling,
    Expansion,
}

/// A source location carrying both coordinate spaces.
///
/// Alignment predicates must pick a space explicitly; collapsing the two
/// silently breaks alignment for nested-macro cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loc {
    spelling: FilePos,
    expansion: FilePos,
}

impl Loc {
    /// A location for text written directly in a file (both spaces equal).
    pub fn file(pos: FilePos) -> Self {
        Self {
            spelling: pos,
            expansion: pos,
        }
    }

    /// A location for text spelled at `spelling` but expanded at `expansion`
    /// (i.e. inside a macro body or argument).
    pub fn in_expansion(spelling: FilePos, expansion: FilePos) -> Self {
        Self {
            spelling,
            expansion,
        }
    }

    pub fn invalid() -> Self {
        Self::file(FilePos::invalid())
    }

    pub fn is_valid(self) -> bool {
        self.spelling.is_valid() && self.expansion.is_valid()
    }

    pub fn spelling(self) -> FilePos {
        self.spelling
    }

    pub fn expansion(self) -> FilePos {
        self.expansion
    }

    pub fn project(self, space: LocSpace) -> FilePos {
        match space {
            LocSpace::Spelling => self.spelling,
            LocSpace::Expansion => self.expansion,
        }
    }
}

/// A source range. `end` points at the *start* of the last token of the
/// range; use [`end_of_token`] to extend it past that token when a
/// character-precise boundary is needed.
///
/// [`end_of_token`]: crate::scan::end_of_token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub begin: Loc,
    pub end: Loc,
}

impl Span {
    pub fn new(begin: Loc, end: Loc) -> Self {
        Self { begin, end }
    }

    /// A range of file-space text within one buffer.
    pub fn file(buffer: BufferId, begin: u32, end: u32) -> Self {
        Self {
            begin: Loc::file(FilePos::new(buffer, begin)),
            end: Loc::file(FilePos::new(buffer, end)),
        }
    }

    pub fn is_valid(self) -> bool {
        self.begin.is_valid() && self.end.is_valid()
    }
}
