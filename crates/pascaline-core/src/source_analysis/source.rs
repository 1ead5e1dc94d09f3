// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Character sources for the lexer.
//!
//! The lexer pulls characters one at a time through the [`CharacterSource`]
//! trait rather than slicing a string directly, so the file-reading and
//! listing layers can live outside the core. [`StringSource`] adapts any
//! in-memory string and is what the tests (and most library callers) use.

use super::Position;

/// A supplier of source characters with row/column tracking.
///
/// End of stream is permanent: once `next_char` returns `None`, every
/// subsequent call must also return `None`.
pub trait CharacterSource {
    /// Returns the next character, or `None` at end of input.
    fn next_char(&mut self) -> Option<char>;

    /// The position of the character most recently returned by `next_char`.
    ///
    /// Before the first call this is the start of the source.
    fn position(&self) -> Position;
}

/// A [`CharacterSource`] over an in-memory string.
///
/// # Examples
///
/// ```
/// use pascaline_core::source_analysis::{CharacterSource, StringSource};
///
/// let mut source = StringSource::new("ab\nc");
/// assert_eq!(source.next_char(), Some('a'));
/// assert_eq!(source.position().row(), 1);
/// source.next_char();
/// source.next_char();
/// assert_eq!(source.next_char(), Some('c'));
/// assert_eq!(source.position().row(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct StringSource {
    chars: std::vec::IntoIter<char>,
    /// Position of the most recently returned character.
    current: Position,
    /// Position the next character will be returned at.
    next: Position,
}

impl StringSource {
    /// Creates a source over the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect::<Vec<_>>().into_iter(),
            current: Position::default(),
            next: Position::default(),
        }
    }
}

impl CharacterSource for StringSource {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "sources over 4GB are not supported"
    )]
    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.current = self.next;
        let offset = self.next.offset() + c.len_utf8() as u32;
        self.next = if c == '\n' {
            Position::new(self.next.row() + 1, 1, offset)
        } else {
            Position::new(self.next.row(), self.next.column() + 1, offset)
        };
        Some(c)
    }

    fn position(&self) -> Position {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_characters_in_order() {
        let mut source = StringSource::new("xy");
        assert_eq!(source.next_char(), Some('x'));
        assert_eq!(source.next_char(), Some('y'));
        assert_eq!(source.next_char(), None);
        // End of stream is permanent
        assert_eq!(source.next_char(), None);
    }

    #[test]
    fn tracks_rows_and_columns() {
        let mut source = StringSource::new("ab\ncd");
        source.next_char(); // a
        assert_eq!(source.position(), Position::new(1, 1, 0));
        source.next_char(); // b
        assert_eq!(source.position(), Position::new(1, 2, 1));
        source.next_char(); // \n
        assert_eq!(source.position(), Position::new(1, 3, 2));
        source.next_char(); // c
        assert_eq!(source.position(), Position::new(2, 1, 3));
        source.next_char(); // d
        assert_eq!(source.position(), Position::new(2, 2, 4));
    }

    #[test]
    fn offsets_count_utf8_bytes() {
        let mut source = StringSource::new("é!");
        source.next_char();
        assert_eq!(source.position().offset(), 0);
        source.next_char();
        assert_eq!(source.position().offset(), 2);
    }

    #[test]
    fn empty_source_is_immediately_exhausted() {
        let mut source = StringSource::new("");
        assert_eq!(source.next_char(), None);
        assert_eq!(source.position(), Position::default());
    }
}
