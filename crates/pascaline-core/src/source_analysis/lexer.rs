// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for Pascaline source code.
//!
//! The lexer is hand-written for maximum control over error recovery. It
//! pulls characters one at a time from a [`CharacterSource`] and classifies
//! them into [`Token`]s on demand: the recognizer calls [`next_symbol`]
//! for each token it needs.
//!
//! # Design principles
//!
//! - **Error recovery**: a malformed lexeme produces a coded diagnostic and
//!   the lexer skips to the next whitespace boundary, so one bad token never
//!   desynchronizes more than one lexeme.
//! - **One-token pushback**: `1..5` is disambiguated from `1.5` by emitting
//!   the integer constant and queueing a synthetic `..` token for the next
//!   call. The pushback buffer holds at most one token.
//! - **Transparent comments**: a closed `(* ... *)` comment yields the next
//!   real token as if the comment were whitespace.
//!
//! [`next_symbol`]: LexicalAnalyzer::next_symbol

use ecow::EcoString;
use tracing::trace;

use crate::diagnostics::DiagnosticSink;

use super::{CharacterSource, LexError, LexErrorKind, Position, Token, TokenKind};

/// The maximum length of a character-string constant.
pub const MAX_STRING_LENGTH: usize = 80;

/// A lexer that tokenizes Pascaline source code.
///
/// # Examples
///
/// ```
/// use pascaline_core::diagnostics::DiagnosticSink;
/// use pascaline_core::source_analysis::{LexicalAnalyzer, StringSource, TokenKind};
///
/// let mut sink = DiagnosticSink::default();
/// let mut lexer = LexicalAnalyzer::new(StringSource::new("x := 1"));
/// lexer.next_symbol(&mut sink);
/// assert!(matches!(lexer.current().unwrap().kind, TokenKind::Identifier(_)));
/// ```
#[derive(Debug)]
pub struct LexicalAnalyzer<S> {
    source: S,
    /// The character under examination, one ahead of everything consumed.
    current_char: Option<char>,
    /// Position where the token being scanned began.
    token_pos: Position,
    /// Single-slot pushback buffer (`..` disambiguation).
    pushback: Option<Token>,
    /// The most recently produced token.
    current: Option<Token>,
    /// Error raised by the most recent `next_symbol` call, if any.
    error: Option<LexError>,
    finished: bool,
    started: bool,
}

impl<S: CharacterSource> LexicalAnalyzer<S> {
    /// Creates a lexer over the given character source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            current_char: None,
            token_pos: Position::default(),
            pushback: None,
            current: None,
            error: None,
            finished: false,
            started: false,
        }
    }

    /// The most recently produced token.
    ///
    /// `None` before the first [`next_symbol`](Self::next_symbol) call and
    /// after the character source is exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Returns `true` once the character source is exhausted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The error raised by the most recent `next_symbol` call, if any.
    ///
    /// The recognizer's fetch loop re-fetches while this is set, so the
    /// grammar never sees an erroneous lexeme as a valid token.
    #[must_use]
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// The position of the most recently examined character.
    ///
    /// Used by the recognizer to place diagnostics once the source is
    /// exhausted and no current token exists.
    #[must_use]
    pub fn position(&self) -> Position {
        self.source.position()
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        self.current_char = self.source.next_char();
    }

    /// Advances exactly one token.
    ///
    /// On success the token is available through [`current`](Self::current).
    /// On a lexical error the error is reported to `sink`, no token is
    /// produced for this call, and the lexer skips to the next whitespace
    /// boundary. At end of input the lexer marks itself finished.
    pub fn next_symbol(&mut self, sink: &mut DiagnosticSink) {
        self.error = None;

        if let Some(token) = self.pushback.take() {
            self.current = Some(token);
            return;
        }

        if !self.started {
            self.started = true;
            self.advance();
        }

        while matches!(self.current_char, Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }

        let Some(c) = self.current_char else {
            self.finished = true;
            self.current = None;
            return;
        };

        self.token_pos = self.source.position();
        self.current = None;
        self.scan_symbol(c, sink);

        if self.error.is_some() {
            self.skip_to_whitespace();
        }
    }

    /// Reports a lexical error for the token being scanned.
    fn report(&mut self, kind: LexErrorKind, sink: &mut DiagnosticSink) {
        let error = LexError::new(kind, self.token_pos);
        trace!(code = error.code(), pos = %self.token_pos, "lexical error");
        sink.report(error.code(), self.token_pos);
        self.error = Some(error);
    }

    /// Skips forward to the next whitespace boundary after an error.
    fn skip_to_whitespace(&mut self) {
        while matches!(self.current_char, Some(c) if !matches!(c, ' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    /// Produces a token at the current token position.
    fn produce(&mut self, kind: TokenKind) {
        self.current = Some(Token::new(kind, self.token_pos));
    }

    /// Classifies a token from its first character.
    fn scan_symbol(&mut self, c: char, sink: &mut DiagnosticSink) {
        match c {
            '0'..='9' => self.scan_number(sink),
            '\'' => self.scan_string(sink),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),
            '<' => {
                self.advance();
                match self.current_char {
                    Some('=') => {
                        self.advance();
                        self.produce(TokenKind::LessEquals);
                    }
                    Some('>') => {
                        self.advance();
                        self.produce(TokenKind::NotEquals);
                    }
                    _ => self.produce(TokenKind::Less),
                }
            }
            '>' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.produce(TokenKind::GreaterEquals);
                } else {
                    self.produce(TokenKind::Greater);
                }
            }
            ':' => {
                self.advance();
                if self.current_char == Some('=') {
                    self.advance();
                    self.produce(TokenKind::Assign);
                } else {
                    self.produce(TokenKind::Colon);
                }
            }
            '(' => {
                self.advance();
                if self.current_char == Some('*') {
                    self.advance();
                    self.scan_comment(sink);
                } else {
                    self.produce(TokenKind::LeftParen);
                }
            }
            '.' => {
                self.advance();
                if self.current_char == Some('.') {
                    self.advance();
                    self.produce(TokenKind::TwoDots);
                } else {
                    self.produce(TokenKind::Dot);
                }
            }
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '=' => self.single(TokenKind::Equals),
            ')' => self.single(TokenKind::RightParen),
            '[' => self.single(TokenKind::LeftBracket),
            ']' => self.single(TokenKind::RightBracket),
            ',' => self.single(TokenKind::Comma),
            '^' => self.single(TokenKind::Arrow),
            ';' => self.single(TokenKind::Semicolon),
            _ => self.report(LexErrorKind::IllegalCharacter(c), sink),
        }
    }

    /// Produces a single-character token and advances past it.
    fn single(&mut self, kind: TokenKind) {
        self.advance();
        self.produce(kind);
    }

    /// Scans an integer or real constant.
    ///
    /// A second decimal separator immediately after the first means the
    /// digits belong to a subrange (`1..5`): the digits seen so far become
    /// an integer constant and a `..` token is queued for the next call.
    fn scan_number(&mut self, sink: &mut DiagnosticSink) {
        let mut text = String::new();
        let mut has_separator = false;

        loop {
            match self.current_char {
                Some(c @ '0'..='9') => {
                    text.push(c);
                    self.advance();
                }
                Some('.') if !has_separator => {
                    let dot_pos = self.source.position();
                    self.advance();
                    if self.current_char == Some('.') {
                        // Subrange operator: back off to the integer and
                        // queue the `..` for the next call.
                        self.advance();
                        self.finish_integer(&text, sink);
                        if self.error.is_none() {
                            self.pushback = Some(Token::new(TokenKind::TwoDots, dot_pos));
                        }
                        return;
                    }
                    has_separator = true;
                    text.push('.');
                }
                _ => break,
            }
        }

        if has_separator {
            match text.parse::<f64>() {
                Ok(value) if value.is_finite() => self.produce(TokenKind::RealConstant(value)),
                _ => self.report(LexErrorKind::InvalidReal, sink),
            }
        } else {
            self.finish_integer(&text, sink);
        }
    }

    /// Parses accumulated digits as an integer constant.
    fn finish_integer(&mut self, text: &str, sink: &mut DiagnosticSink) {
        match text.parse::<i32>() {
            Ok(value) => self.produce(TokenKind::IntConstant(value)),
            Err(_) => self.report(LexErrorKind::IntegerOutOfRange, sink),
        }
    }

    /// Scans a character-string constant between single quotes.
    fn scan_string(&mut self, sink: &mut DiagnosticSink) {
        self.advance(); // opening quote
        let mut text = EcoString::new();

        loop {
            match self.current_char {
                None | Some('\n') => {
                    self.report(LexErrorKind::InvalidString, sink);
                    return;
                }
                Some('\'') => {
                    self.advance(); // closing quote
                    break;
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }

        if text.is_empty() {
            self.report(LexErrorKind::InvalidString, sink);
        } else if text.len() > MAX_STRING_LENGTH {
            self.report(LexErrorKind::StringTooLong, sink);
        } else {
            self.produce(TokenKind::CharConstant(text));
        }
    }

    /// Scans an identifier or reserved word.
    fn scan_identifier(&mut self) {
        let mut text = EcoString::new();
        while let Some(c) = self.current_char {
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match TokenKind::keyword(&text) {
            Some(keyword) => self.produce(keyword),
            None => self.produce(TokenKind::Identifier(text)),
        }
    }

    /// Consumes a `(* ... *)` comment, then fetches the next real token.
    ///
    /// The opening `(*` has already been consumed.
    fn scan_comment(&mut self, sink: &mut DiagnosticSink) {
        let mut prev = ' ';
        loop {
            match self.current_char {
                None => {
                    self.report(LexErrorKind::UnterminatedComment, sink);
                    return;
                }
                Some(c) => {
                    self.advance();
                    if prev == '*' && c == ')' {
                        break;
                    }
                    prev = c;
                }
            }
        }
        // The comment is transparent: deliver whatever follows it.
        self.next_symbol(sink);
    }
}

/// Convenience: lex an entire string, collecting tokens and diagnostics.
///
/// Mostly useful in tests; the recognizer drives the lexer incrementally.
#[must_use]
pub fn lex(source: &str) -> (Vec<Token>, Vec<crate::diagnostics::Diagnostic>) {
    let mut sink = DiagnosticSink::default();
    let mut lexer = LexicalAnalyzer::new(super::StringSource::new(source));
    let mut tokens = Vec::new();
    while !lexer.is_finished() {
        lexer.next_symbol(&mut sink);
        if let Some(token) = lexer.current() {
            tokens.push(token.clone());
        }
    }
    (tokens, sink.into_diagnostics())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, _) = lex(source);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn error_codes(source: &str) -> Vec<u16> {
        let (_, diagnostics) = lex(source);
        diagnostics.into_iter().map(|d| d.code).collect()
    }

    #[test]
    fn lexes_operators_and_punctuation() {
        assert_eq!(
            kinds("+ - * / = <> < <= > >= := : ; , . .. ^ ( ) [ ]"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Equals,
                TokenKind::NotEquals,
                TokenKind::Less,
                TokenKind::LessEquals,
                TokenKind::Greater,
                TokenKind::GreaterEquals,
                TokenKind::Assign,
                TokenKind::Colon,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Dot,
                TokenKind::TwoDots,
                TokenKind::Arrow,
                TokenKind::LeftParen,
                TokenKind::RightParen,
                TokenKind::LeftBracket,
                TokenKind::RightBracket,
            ]
        );
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        assert_eq!(
            kinds("program demo begin end if then while myVar _tmp"),
            vec![
                TokenKind::Program,
                TokenKind::Identifier("demo".into()),
                TokenKind::Begin,
                TokenKind::End,
                TokenKind::If,
                TokenKind::Then,
                TokenKind::While,
                TokenKind::Identifier("myVar".into()),
                TokenKind::Identifier("_tmp".into()),
            ]
        );
    }

    #[test]
    fn lexes_integer_and_real_constants() {
        assert_eq!(kinds("42"), vec![TokenKind::IntConstant(42)]);
        assert_eq!(kinds("1.5"), vec![TokenKind::RealConstant(1.5)]);
        assert_eq!(kinds("0.25"), vec![TokenKind::RealConstant(0.25)]);
    }

    #[test]
    fn subrange_disambiguates_from_real() {
        assert_eq!(
            kinds("1..5"),
            vec![
                TokenKind::IntConstant(1),
                TokenKind::TwoDots,
                TokenKind::IntConstant(5),
            ]
        );
    }

    #[test]
    fn subrange_pushback_token_has_dot_position() {
        let (tokens, _) = lex("12..5");
        assert_eq!(tokens[1].kind, TokenKind::TwoDots);
        assert_eq!(tokens[1].pos.column(), 3);
    }

    #[test]
    fn integer_overflow_is_a_lexical_error() {
        assert_eq!(error_codes("99999999999"), vec![203]);
        // i32::MAX itself is fine
        assert_eq!(kinds("2147483647"), vec![TokenKind::IntConstant(i32::MAX)]);
    }

    #[test]
    fn string_constants() {
        assert_eq!(kinds("'a'"), vec![TokenKind::CharConstant("a".into())]);
        assert_eq!(
            kinds("'hello world'"),
            vec![TokenKind::CharConstant("hello world".into())]
        );
    }

    #[test]
    fn unterminated_string_reports_once_and_resumes_next_line() {
        let (tokens, diagnostics) = lex("'abc\nx");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, 75);
        assert_eq!(tokens, vec![Token::new(
            TokenKind::Identifier("x".into()),
            crate::source_analysis::Position::new(2, 1, 5),
        )]);
    }

    #[test]
    fn empty_string_is_an_error() {
        assert_eq!(error_codes("''"), vec![75]);
    }

    #[test]
    fn overlong_string_is_an_error() {
        let long = format!("'{}'", "x".repeat(MAX_STRING_LENGTH + 1));
        assert_eq!(error_codes(&long), vec![76]);
    }

    #[test]
    fn comments_are_transparent() {
        assert_eq!(
            kinds("x (* a comment\nspanning lines *) y"),
            vec![
                TokenKind::Identifier("x".into()),
                TokenKind::Identifier("y".into()),
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        assert_eq!(error_codes("(* never closed"), vec![86]);
    }

    #[test]
    fn illegal_character_skips_to_whitespace() {
        let (tokens, diagnostics) = lex("@@@ x");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, 6);
        assert_eq!(
            tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Identifier("x".into())]
        );
    }

    #[test]
    fn tokens_carry_positions() {
        let (tokens, _) = lex("x :=\n  1");
        assert_eq!(tokens[0].pos.row(), 1);
        assert_eq!(tokens[0].pos.column(), 1);
        assert_eq!(tokens[1].pos.column(), 3);
        assert_eq!(tokens[2].pos.row(), 2);
        assert_eq!(tokens[2].pos.column(), 3);
    }

    #[test]
    fn trailing_dot_after_digits_is_a_real() {
        // `1.` parses as the real constant 1.0; the separator was consumed
        assert_eq!(kinds("1."), vec![TokenKind::RealConstant(1.0)]);
    }

    #[test]
    fn finishes_on_empty_input() {
        let (tokens, diagnostics) = lex("   \n  ");
        assert!(tokens.is_empty());
        assert!(diagnostics.is_empty());
    }
}
