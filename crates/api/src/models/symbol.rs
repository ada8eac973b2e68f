use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A position in source text. Lines are 1-based, columns 0-based, matching
/// the upstream grammar parsers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct Point {
    pub line: u32,
    pub column: u32,
}

impl Point {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    pub fn is_valid(&self) -> bool {
        self.line >= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Range {
    pub start: Point,
    pub end: Point,
}

impl Range {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Shorthand for `Range::new(Point::new(..), Point::new(..))`.
    pub fn of(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self::new(Point::new(start_line, start_col), Point::new(end_line, end_col))
    }

    /// Start must not come after end, line-major.
    pub fn is_well_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Number of lines covered, inclusive.
    pub fn line_span(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line) + 1
    }

    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Range::of(1, 0, 1, 10).is_well_ordered());
        assert!(Range::of(1, 5, 1, 5).is_well_ordered());
        assert!(!Range::of(2, 0, 1, 10).is_well_ordered());
        assert!(!Range::of(1, 8, 1, 3).is_well_ordered());
    }

    #[test]
    fn line_span_is_inclusive() {
        assert_eq!(Range::of(3, 0, 3, 12).line_span(), 1);
        assert_eq!(Range::of(3, 0, 7, 0).line_span(), 5);
    }
}
