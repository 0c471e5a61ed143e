//! Source location tracking (byte offsets).

use serde::Serialize;

/// A half-open byte range `[start, end)` into a source file.
///
/// Spans cover exactly the tokens of a construct; leading and trailing
/// trivia (whitespace, comments) are never part of a span. Synthesized
/// nodes carry [`Span::SYNTHETIC`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Marker span for nodes fabricated during lowering.
    pub const SYNTHETIC: Span = Span {
        start: u32::MAX,
        end: u32::MAX,
    };

    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end || (start == u32::MAX && end == u32::MAX));
        Span { start, end }
    }

    /// Zero-length span at a position (parser error anchors).
    pub fn empty(pos: u32) -> Self {
        Span {
            start: pos,
            end: pos,
        }
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_synthetic(&self) -> bool {
        self.start == u32::MAX
    }

    /// Smallest span covering both `self` and `other`.
    pub fn union(&self, other: Span) -> Span {
        if self.is_synthetic() {
            return other;
        }
        if other.is_synthetic() {
            return *self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// The source text this span covers.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        if self.is_synthetic() {
            return "";
        }
        let start = self.start as usize;
        let end = (self.end as usize).min(source.len());
        if start < end { &source[start..end] } else { "" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_ignores_synthetic_spans() {
        let a = Span::new(4, 10);
        assert_eq!(a.union(Span::SYNTHETIC), a);
        assert_eq!(Span::SYNTHETIC.union(a), a);
        assert_eq!(a.union(Span::new(0, 6)), Span::new(0, 10));
    }

    #[test]
    fn text_slices_source() {
        let src = "let x = 1;";
        assert_eq!(Span::new(4, 5).text(src), "x");
        assert_eq!(Span::SYNTHETIC.text(src), "");
    }
}
