use crate::source::span::{BufferId, FilePos};

/// One registered source buffer: a name and its full text.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    name: String,
    text: String,
    /// Byte offset of the first character of each line.
    line_starts: Vec<u32>,
}

impl SourceBuffer {
    fn new(name: String, text: String) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            name,
            text,
            line_starts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Read-only registry of source buffers with line/column translation.
///
/// The map owns the flat text the token scanner lexes over; everything else
/// in the crate refers into it via [`FilePos`].
#[derive(Debug, Clone, Default)]
pub struct SourceMap {
    buffers: Vec<SourceBuffer>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_buffer(&mut self, name: impl Into<String>, text: impl Into<String>) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(SourceBuffer::new(name.into(), text.into()));
        id
    }

    pub fn buffer(&self, id: BufferId) -> Option<&SourceBuffer> {
        self.buffers.get(id.0 as usize)
    }

    pub fn buffers(&self) -> impl Iterator<Item = &SourceBuffer> {
        self.buffers.iter()
    }

    pub fn text(&self, id: BufferId) -> Option<&str> {
        self.buffer(id).map(SourceBuffer::text)
    }

    /// Slice of a buffer between two byte offsets. `None` when the buffer is
    /// unknown, the offsets are out of bounds, or the interval is reversed.
    pub fn slice(&self, buffer: BufferId, begin: u32, end: u32) -> Option<&str> {
        let text = self.text(buffer)?;
        if begin > end || end as usize > text.len() {
            return None;
        }
        text.get(begin as usize..end as usize)
    }

    /// Translate a 1-based line/column pair to a flat position. A column may
    /// point one past the line's content (onto the newline, or the end of
    /// text for the last line), but never onto a later line.
    pub fn pos_at(&self, buffer: BufferId, line: u32, col: u32) -> Option<FilePos> {
        if line == 0 || col == 0 {
            return None;
        }
        let buf = self.buffer(buffer)?;
        let line_start = *buf.line_starts.get(line as usize - 1)?;
        let line_end = match buf.line_starts.get(line as usize) {
            Some(next_start) => next_start - 1,
            None => buf.text.len() as u32,
        };
        let offset = line_start.checked_add(col - 1)?;
        if offset > line_end {
            return None;
        }
        Some(FilePos::new(buffer, offset))
    }

    /// Translate a flat position back to a 1-based line/column pair.
    pub fn line_col(&self, pos: FilePos) -> Option<(u32, u32)> {
        let buf = self.buffer(pos.buffer)?;
        if pos.offset as usize > buf.text.len() {
            return None;
        }
        let line = match buf.line_starts.binary_search(&pos.offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let col = pos.offset - buf.line_starts[line];
        Some((line as u32 + 1, col + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(text: &str) -> (SourceMap, BufferId) {
        let mut map = SourceMap::new();
        let id = map.add_buffer("test.c", text);
        (map, id)
    }

    #[test]
    fn pos_at_first_line() {
        let (map, id) = map_with("int x;\nint y;\n");
        assert_eq!(map.pos_at(id, 1, 1), Some(FilePos::new(id, 0)));
        assert_eq!(map.pos_at(id, 1, 5), Some(FilePos::new(id, 4)));
    }

    #[test]
    fn pos_at_later_line() {
        let (map, id) = map_with("int x;\nint y;\n");
        assert_eq!(map.pos_at(id, 2, 1), Some(FilePos::new(id, 7)));
        assert_eq!(map.pos_at(id, 2, 5), Some(FilePos::new(id, 11)));
    }

    #[test]
    fn pos_at_rejects_zero_based() {
        let (map, id) = map_with("int x;\n");
        assert_eq!(map.pos_at(id, 0, 1), None);
        assert_eq!(map.pos_at(id, 1, 0), None);
    }

    #[test]
    fn pos_at_rejects_out_of_range() {
        let (map, id) = map_with("int x;\n");
        assert_eq!(map.pos_at(id, 9, 1), None);
        assert_eq!(map.pos_at(BufferId(7), 1, 1), None);
    }

    #[test]
    fn pos_at_rejects_columns_past_the_line() {
        let (map, id) = map_with("ab\ncdef\n");
        // Column 5 of line 1 would land on 'c', column 9 past the buffer.
        assert_eq!(map.pos_at(id, 1, 5), None);
        assert_eq!(map.pos_at(id, 1, 9), None);
        assert_eq!(map.pos_at(id, 1, u32::MAX), None);
        // One past the content (the newline) is still addressable.
        assert_eq!(map.pos_at(id, 1, 3), Some(FilePos::new(id, 2)));
        assert_eq!(map.pos_at(id, 2, 5), Some(FilePos::new(id, 7)));
    }

    #[test]
    fn line_col_round_trip() {
        let (map, id) = map_with("a\nbb\nccc\n");
        for (line, col) in [(1, 1), (2, 2), (3, 3), (3, 1)] {
            let pos = map.pos_at(id, line, col).unwrap();
            assert_eq!(map.line_col(pos), Some((line, col)));
        }
    }

    #[test]
    fn slice_bounds_checked() {
        let (map, id) = map_with("hello");
        assert_eq!(map.slice(id, 1, 4), Some("ell"));
        assert_eq!(map.slice(id, 4, 1), None);
        assert_eq!(map.slice(id, 0, 99), None);
    }
}
