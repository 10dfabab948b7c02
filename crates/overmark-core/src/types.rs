//! Core types for overmark

use serde::{Deserialize, Serialize};

/// Represents a position in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Byte offset within the line
    pub offset: usize,
}

impl Position {
    /// Create a new position
    pub fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// Represents a span on a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start position
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Span {
    /// Create a new span from start and end positions
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Byte length of the span, zero when it crosses lines backwards.
    pub fn len(&self) -> usize {
        if self.start.line == self.end.line {
            self.end.offset.saturating_sub(self.start.offset)
        } else {
            0
        }
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
