use serde::Serialize;

/// A byte offset within a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ByteOffset(u32);

impl ByteOffset {
    #[must_use]
    pub fn new(offset: u32) -> Self {
        Self(offset)
    }

    #[must_use]
    pub fn from_usize(offset: usize) -> Self {
        Self(u32::try_from(offset).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.0
    }
}

/// A zero-based line and column position within a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineCol((u32, u32));

impl LineCol {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self((line, column))
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.0 .0
    }

    #[must_use]
    pub fn column(&self) -> u32 {
        self.0 .1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    start: u32,
    length: u32,
}

impl Span {
    #[must_use]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    #[must_use]
    pub fn from_parts(start: usize, length: usize) -> Self {
        let start_u32 = u32::try_from(start).unwrap_or(u32::MAX);
        let length_u32 = u32::try_from(length).unwrap_or(u32::MAX.saturating_sub(start_u32));
        Span::new(start_u32, length_u32)
    }

    /// Construct a span from half-open byte bounds.
    #[must_use]
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self::from_parts(start, end.saturating_sub(start))
    }

    #[must_use]
    pub fn start(self) -> u32 {
        self.start
    }

    #[must_use]
    pub fn start_usize(self) -> usize {
        self.start as usize
    }

    #[must_use]
    pub fn end(self) -> u32 {
        self.start + self.length
    }

    #[must_use]
    pub fn end_usize(self) -> usize {
        self.end() as usize
    }

    #[must_use]
    pub fn length(self) -> u32 {
        self.length
    }

    #[must_use]
    pub fn length_usize(self) -> usize {
        self.length as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }

    /// Whether `offset` falls within the closed bounds of this span.
    #[must_use]
    pub fn covers(self, offset: u32) -> bool {
        offset >= self.start && offset <= self.end()
    }

    #[must_use]
    pub fn start_offset(&self) -> ByteOffset {
        ByteOffset(self.start)
    }

    #[must_use]
    pub fn end_offset(&self) -> ByteOffset {
        ByteOffset(self.start.saturating_add(self.length))
    }

    /// Convert this span to start and end line/column positions using the given line index.
    #[must_use]
    pub fn to_line_col(&self, line_index: &LineIndex) -> (LineCol, LineCol) {
        let start = line_index.to_line_col(self.start_offset());
        let end = line_index.to_line_col(self.end_offset());
        (start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex(Vec<u32>);

impl LineIndex {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut starts = Vec::with_capacity(256);
        starts.push(0);

        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    starts.push(u32::try_from(i + 1).unwrap_or_default());
                    i += 1;
                }
                b'\r' => {
                    if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        starts.push(u32::try_from(i + 2).unwrap_or_default());
                        i += 2;
                    } else {
                        starts.push(u32::try_from(i + 1).unwrap_or_default());
                        i += 1;
                    }
                }
                _ => i += 1,
            }
        }

        LineIndex(starts)
    }

    #[must_use]
    pub fn to_line_col(&self, offset: ByteOffset) -> LineCol {
        if self.0.is_empty() {
            return LineCol::new(0, 0);
        }

        let line = match self.0.binary_search(&offset.0) {
            Ok(exact) => exact,
            Err(0) => 0,
            Err(next) => next - 1,
        };

        let line_start = self.0[line];
        let column = offset.0.saturating_sub(line_start);

        LineCol::new(u32::try_from(line).unwrap_or_default(), column)
    }

    #[must_use]
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.0.get(line as usize).copied()
    }

    /// Byte offset of a zero-based line/column position.
    #[must_use]
    pub fn to_offset(&self, pos: LineCol) -> Option<ByteOffset> {
        let line_start = self.line_start(pos.line())?;
        Some(ByteOffset(line_start + pos.column()))
    }

    #[must_use]
    pub fn lines(&self) -> &[u32] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_unix_endings() {
        let text = "line1\nline2\nline3";
        let index = LineIndex::from_text(text);
        assert_eq!(index.lines(), &[0, 6, 12]);
    }

    #[test]
    fn test_line_index_windows_endings() {
        let text = "line1\r\nline2\r\nline3";
        let index = LineIndex::from_text(text);
        assert_eq!(index.lines(), &[0, 7, 14]);
    }

    #[test]
    fn test_line_index_empty() {
        let text = "";
        let index = LineIndex::from_text(text);
        assert_eq!(index.lines(), &[0]);
    }

    #[test]
    fn test_to_line_col_with_crlf() {
        let text = "hello\r\nworld";
        let index = LineIndex::from_text(text);

        assert_eq!(index.to_line_col(ByteOffset::new(0)), LineCol::new(0, 0));
        assert_eq!(index.to_line_col(ByteOffset::new(7)), LineCol::new(1, 0));
        assert_eq!(index.to_line_col(ByteOffset::new(8)), LineCol::new(1, 1));
    }

    #[test]
    fn test_roundtrip_offset() {
        let text = "var a;\nvar b;\n";
        let index = LineIndex::from_text(text);
        let pos = index.to_line_col(ByteOffset::new(9));
        assert_eq!(pos, LineCol::new(1, 2));
        assert_eq!(index.to_offset(pos), Some(ByteOffset::new(9)));
    }

    #[test]
    fn test_span_covers() {
        let span = Span::from_bounds(4, 10);
        assert!(span.covers(4));
        assert!(span.covers(10));
        assert!(!span.covers(3));
        assert!(!span.covers(11));
    }
}
