//! Byte-offset ranges, spans and edit descriptions.
//!
//! Every position handed out by the scanner and stored on a syntax node is a
//! byte offset into the UTF-8 source text. A node's `pos` includes its leading
//! trivia; its `end` is exclusive.

use std::fmt;
use std::ops::Range;

/// A byte offset into source text.
pub type TextPos = u32;

/// A span in source text, defined by a start position and a length.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self {
            start: pos,
            length: 0,
        }
    }

    /// The end position of this span (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }

    #[inline]
    pub fn overlaps(&self, other: &TextSpan) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.start as usize..self.end() as usize
    }

    /// Return a new span covering both this span and the other.
    pub fn union(&self, other: &TextSpan) -> TextSpan {
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        TextSpan::from_bounds(start, end)
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A `[pos, end)` range. Node and list positions use this form.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        Self { pos, end }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.pos && pos < self.end
    }

    /// Whether `other` lies entirely within this range.
    #[inline]
    pub fn encloses(&self, other: TextRange) -> bool {
        self.pos <= other.pos && other.end <= self.end
    }

    /// Both ends moved by `delta` bytes.
    #[inline]
    pub fn shifted(&self, delta: i64) -> TextRange {
        TextRange::new(shift_pos(self.pos, delta), shift_pos(self.end, delta))
    }
}

#[inline]
fn shift_pos(pos: TextPos, delta: i64) -> TextPos {
    (pos as i64 + delta).max(0) as TextPos
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

impl From<TextSpan> for TextRange {
    fn from(span: TextSpan) -> Self {
        TextRange::new(span.start, span.end())
    }
}

/// A single contiguous edit: the old text under `span` was replaced by
/// `new_length` bytes of new text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextChangeRange {
    pub span: TextSpan,
    pub new_length: TextPos,
}

impl TextChangeRange {
    pub fn new(span: TextSpan, new_length: TextPos) -> Self {
        Self { span, new_length }
    }

    /// The change that leaves text untouched.
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// Build the change range from the replaced region and the inserted text.
    pub fn replacement(start: TextPos, old_length: TextPos, inserted: &str) -> Self {
        Self::new(TextSpan::new(start, old_length), inserted.len() as TextPos)
    }

    #[inline]
    pub fn is_unchanged(&self) -> bool {
        self.span.is_empty() && self.new_length == 0
    }

    /// The span the replacement occupies in the new text.
    #[inline]
    pub fn new_span(&self) -> TextSpan {
        TextSpan::new(self.span.start, self.new_length)
    }

    /// Signed growth of the text caused by this change.
    #[inline]
    pub fn delta(&self) -> i64 {
        self.new_length as i64 - self.span.length as i64
    }

    /// Apply the change to `old_text`, producing the new text.
    ///
    /// Returns `None` when the span is out of bounds or not on a char
    /// boundary, or when `replacement` has a different length than the
    /// change declares.
    pub fn apply(&self, old_text: &str, replacement: &str) -> Option<String> {
        let range = self.span.to_range();
        if replacement.len() != self.new_length as usize
            || range.end > old_text.len()
            || !old_text.is_char_boundary(range.start)
            || !old_text.is_char_boundary(range.end)
        {
            return None;
        }
        let mut text = String::with_capacity(old_text.len() - range.len() + replacement.len());
        text.push_str(&old_text[..range.start]);
        text.push_str(replacement);
        text.push_str(&old_text[range.end..]);
        Some(text)
    }
}

impl fmt::Debug for TextChangeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} => {}", self.span, self.new_length)
    }
}

/// Line and column information derived from source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    /// 0-based line number.
    pub line: u32,
    /// 0-based column in bytes.
    pub character: u32,
}

impl LineAndColumn {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A map from byte offsets to line numbers, built from source text.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                b'\n' => line_starts.push((i + 1) as u32),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Get the line number (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        LineAndColumn {
            line,
            character: pos - line_start,
        }
    }

    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn line_starts(&self) -> &[TextPos] {
        &self.line_starts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_span() {
        let span = TextSpan::new(5, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(5));
        assert!(span.contains(14));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_range_shift_and_enclose() {
        let range = TextRange::new(10, 20);
        assert_eq!(range.shifted(5), TextRange::new(15, 25));
        assert_eq!(range.shifted(-3), TextRange::new(7, 17));
        assert!(range.encloses(TextRange::new(10, 20)));
        assert!(range.encloses(TextRange::new(12, 12)));
        assert!(!range.encloses(TextRange::new(9, 12)));
    }

    #[test]
    fn test_change_range_apply() {
        let old = "function f(){ return 1; }";
        let change = TextChangeRange::replacement(21, 1, "42");
        assert_eq!(change.delta(), 1);
        assert_eq!(change.new_span(), TextSpan::new(21, 2));
        assert_eq!(
            change.apply(old, "42").as_deref(),
            Some("function f(){ return 42; }")
        );
        assert!(change.apply(old, "4").is_none());
        assert!(TextChangeRange::replacement(100, 1, "x").apply(old, "x").is_none());
    }

    #[test]
    fn test_unchanged() {
        assert!(TextChangeRange::unchanged().is_unchanged());
        assert!(!TextChangeRange::replacement(0, 0, "a").is_unchanged());
    }

    #[test]
    fn test_line_map() {
        let map = LineMap::new("line1\nline2\r\nline3");
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0);
        assert_eq!(map.line_of(6), 1);
        assert_eq!(map.line_of(13), 2);

        let lc = map.line_and_column_of(8);
        assert_eq!(lc, LineAndColumn::new(1, 2));
    }
}
