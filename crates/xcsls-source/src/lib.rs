mod map;
mod span;

pub use map::SourceMap;
pub use map::SourceMapEntry;
pub use span::ByteOffset;
pub use span::LineCol;
pub use span::LineIndex;
pub use span::Span;
