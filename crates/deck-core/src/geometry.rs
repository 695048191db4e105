#![forbid(unsafe_code)]

//! Scroll-axis geometry.

/// A half-open extent `[start, start + len)` along the scroll axis.
///
/// Sections and the viewport are both described as spans in document
/// coordinates (0 at the top of the first section).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Leading edge (inclusive).
    pub start: u32,
    /// Length along the scroll axis.
    pub len: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    /// Trailing edge (exclusive).
    #[inline]
    pub const fn end(&self) -> u32 {
        self.start.saturating_add(self.len)
    }

    /// Check if the span has zero length.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if a coordinate falls inside the span.
    #[inline]
    pub const fn contains(&self, pos: u32) -> bool {
        pos >= self.start && pos < self.end()
    }

    /// The overlapping part of two spans, or `None` if they don't overlap.
    #[inline]
    pub fn intersection(&self, other: &Span) -> Option<Span> {
        let start = self.start.max(other.start);
        let end = self.end().min(other.end());
        (start < end).then(|| Span::new(start, end - start))
    }

    /// Fraction of this span that lies inside `viewport`, in `[0.0, 1.0]`.
    ///
    /// The ratio is relative to `self`, so a section taller than the
    /// viewport never reaches `1.0`. Empty spans report `0.0`.
    pub fn visible_ratio(&self, viewport: &Span) -> f32 {
        if self.is_empty() {
            return 0.0;
        }
        match self.intersection(viewport) {
            Some(overlap) => (f64::from(overlap.len) / f64::from(self.len)) as f32,
            None => 0.0,
        }
    }
}
