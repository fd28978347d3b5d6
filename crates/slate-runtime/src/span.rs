//! Source location tracking
//!
//! Spans record the byte range and source line of every token and syntax
//! node, so diagnostics can point back at the offending code.

use serde::{Deserialize, Serialize};

/// A region of source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Source line (1-based) the region starts on
    pub line: u32,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, line: u32) -> Self {
        Self { start, end, line }
    }

    /// Placeholder span for synthesized code with no source location
    pub fn dummy() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 0,
        }
    }

    /// Span covering both `self` and `other`
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: match (self.line, other.line) {
                (0, line) | (line, 0) => line,
                (a, b) => a.min(b),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(3, 7, 2);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 7);
        assert_eq!(span.line, 2);
    }

    #[test]
    fn test_span_merge() {
        let a = Span::new(3, 7, 2);
        let b = Span::new(10, 14, 3);
        let merged = a.merge(b);
        assert_eq!(merged.start, 3);
        assert_eq!(merged.end, 14);
        assert_eq!(merged.line, 2);
    }

    #[test]
    fn test_merge_with_dummy_keeps_real_line() {
        let real = Span::new(5, 9, 4);
        assert_eq!(Span::dummy().merge(real).line, 4);
    }
}
