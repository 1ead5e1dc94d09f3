// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Source location tracking.
//!
//! Every token and diagnostic carries a [`Position`] indicating where in the
//! source it originated. Positions track row and column (both 1-based, the
//! coordinates diagnostics are keyed by) plus a byte offset for integration
//! with [`miette`] source labels.

/// A position in the source text.
///
/// # Examples
///
/// ```
/// use pascaline_core::source_analysis::Position;
///
/// let pos = Position::new(3, 14, 57);
/// assert_eq!(pos.row(), 3);
/// assert_eq!(pos.column(), 14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    row: u32,
    column: u32,
    offset: u32,
}

impl Position {
    /// Creates a position from a row, column, and byte offset.
    #[must_use]
    pub const fn new(row: u32, column: u32, offset: u32) -> Self {
        Self {
            row,
            column,
            offset,
        }
    }

    /// The 1-based source row.
    #[must_use]
    pub const fn row(self) -> u32 {
        self.row
    }

    /// The 1-based column within the row.
    #[must_use]
    pub const fn column(self) -> u32 {
        self.column
    }

    /// The byte offset from the start of the source.
    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

impl From<Position> for miette::SourceSpan {
    fn from(pos: Position) -> Self {
        (pos.offset as usize, 1).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_accessors() {
        let pos = Position::new(2, 5, 17);
        assert_eq!(pos.row(), 2);
        assert_eq!(pos.column(), 5);
        assert_eq!(pos.offset(), 17);
    }

    #[test]
    fn position_display() {
        assert_eq!(Position::new(12, 3, 0).to_string(), "12:3");
    }

    #[test]
    fn position_default_is_start_of_source() {
        let pos = Position::default();
        assert_eq!(pos.row(), 1);
        assert_eq!(pos.column(), 1);
        assert_eq!(pos.offset(), 0);
    }
}
