//! Source location tracking for AST nodes.
//!
//! Every node handed to the rewrite engine carries a `Span`. Nodes the engine
//! synthesizes reuse the span of the node they replace, so diagnostics and
//! runtime failures still point at the user's source.
//!
//! # Examples
//!
//! ```
//! use nullsafe_syntax::span::Span;
//!
//! let left = Span::new(0, 10, 1, 1);
//! let right = Span::new(15, 25, 2, 4);
//! let merged = Span::merge(left, right);
//!
//! assert_eq!(merged.start, 0);
//! assert_eq!(merged.end, 25);
//! assert_eq!(merged.line, 1);
//! ```

use std::fmt;

/// A byte range in a source file plus the line/column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the span start (0-indexed)
    pub start: usize,

    /// Byte offset of the span end (exclusive)
    pub end: usize,

    /// Line of the span start (1-indexed, 0 for synthetic spans)
    pub line: usize,

    /// Column of the span start (1-indexed, in bytes)
    pub col: usize,
}

impl Span {
    /// Creates a span from byte offsets and the start position.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// A span that does not correspond to any source text.
    #[must_use]
    pub const fn synthetic() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Returns `true` for spans created by [`Span::synthetic`].
    #[must_use]
    pub const fn is_synthetic(&self) -> bool {
        self.line == 0
    }

    /// Creates a span covering `left` through `right`.
    #[must_use]
    pub const fn merge(left: Span, right: Span) -> Self {
        Self {
            start: left.start,
            end: right.end,
            line: left.line,
            col: left.col,
        }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span has zero length.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_synthetic() {
            write!(f, "<generated>")
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

/// Implemented by every node that knows where it came from.
pub trait Spanned {
    /// Returns the source span of this item.
    fn span(&self) -> Span;
}

impl Spanned for Span {
    fn span(&self) -> Span {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_merge() {
        let merged = Span::merge(Span::new(4, 8, 1, 5), Span::new(10, 30, 3, 2));
        assert_eq!(merged, Span::new(4, 30, 1, 5));
        assert_eq!(merged.len(), 26);
    }

    #[test]
    fn test_span_display() {
        assert_eq!(Span::new(0, 10, 5, 10).to_string(), "5:10");
        assert_eq!(Span::synthetic().to_string(), "<generated>");
    }

    #[test]
    fn test_synthetic_span() {
        let span = Span::synthetic();
        assert!(span.is_synthetic());
        assert!(span.is_empty());
        assert!(!Span::new(1, 2, 1, 2).is_synthetic());
    }
}
