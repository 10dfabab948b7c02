//! Line cursor handed to the tokenizer.
//!
//! [`StringStream`] walks a single line, with read-only access to the lines
//! that follow it for lookahead. All regex matching is anchored at the
//! current position: patterns are expected to start with `^`.

use regex::{Captures, Regex};

/// Width of a tab stop when measuring indentation.
pub const TAB_SIZE: usize = 4;

/// Cursor over one line of text.
#[derive(Debug, Clone)]
pub struct StringStream<'a> {
    line: &'a str,
    pos: usize,
    start: usize,
    line_number: usize,
    following: &'a [&'a str],
}

impl<'a> StringStream<'a> {
    /// Create a cursor at the start of `line`.
    pub fn new(line: &'a str) -> Self {
        Self {
            line,
            pos: 0,
            start: 0,
            line_number: 0,
            following: &[],
        }
    }

    /// Set the 0-based line number of this line in the document.
    pub fn with_line_number(mut self, line_number: usize) -> Self {
        self.line_number = line_number;
        self
    }

    /// Provide the raw text of the lines after this one.
    pub fn with_following(mut self, following: &'a [&'a str]) -> Self {
        self.following = following;
        self
    }

    /// The whole line.
    pub fn string(&self) -> &'a str {
        self.line
    }

    /// Byte offset of the cursor.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Byte offset where the current token started.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Mark the cursor as the start of the next token.
    pub fn begin_token(&mut self) {
        self.start = self.pos;
    }

    /// Text consumed since [`begin_token`](Self::begin_token).
    pub fn current(&self) -> &'a str {
        &self.line[self.start..self.pos]
    }

    /// Unconsumed rest of the line.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// At the start of the line.
    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    /// At the end of the line.
    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character right before the cursor.
    pub fn prev_char(&self) -> Option<char> {
        self.line[..self.pos].chars().next_back()
    }

    /// Consume one character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `lit` if the rest starts with it.
    pub fn eat_str(&mut self, lit: &str) -> bool {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Whether the rest starts with `lit`, without consuming.
    pub fn looking_at(&self, lit: &str) -> bool {
        self.rest().starts_with(lit)
    }

    /// Consume characters while `pred` holds, returning how many bytes moved.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let before = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.pos - before
    }

    /// Match an anchored regex against the rest, optionally consuming it.
    ///
    /// Empty matches never consume.
    pub fn match_regex(&mut self, re: &Regex, consume: bool) -> Option<Captures<'a>> {
        let rest: &'a str = &self.line[self.pos..];
        let caps = re.captures(rest)?;
        let whole = caps.get(0)?;
        if whole.start() != 0 {
            return None;
        }
        if consume {
            self.pos += whole.end();
        }
        Some(caps)
    }

    /// Consume the rest of the line.
    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }

    /// Whether the line has only whitespace.
    pub fn is_blank_line(&self) -> bool {
        self.line.trim().is_empty()
    }

    /// Indentation of the line in columns, tabs advancing to the next stop.
    pub fn indentation(&self) -> usize {
        let mut col = 0;
        for c in self.line.chars() {
            match c {
                ' ' => col += 1,
                '\t' => col += TAB_SIZE - col % TAB_SIZE,
                _ => break,
            }
        }
        col
    }

    /// Raw text of the `n`th following line (1 is the next line).
    pub fn lookahead(&self, n: usize) -> Option<&'a str> {
        n.checked_sub(1).and_then(|i| self.following.get(i).copied())
    }

    /// 0-based line number.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_and_peek() {
        let mut s = StringStream::new("aé");
        assert!(s.sol());
        assert_eq!(s.peek(), Some('a'));
        assert_eq!(s.next_char(), Some('a'));
        assert_eq!(s.prev_char(), Some('a'));
        assert_eq!(s.next_char(), Some('é'));
        assert!(s.eol());
        assert_eq!(s.next_char(), None);
    }

    #[test]
    fn test_match_regex_anchored() {
        let re = Regex::new(r"^#+").unwrap();
        let mut s = StringStream::new("## x");
        assert!(s.match_regex(&re, false).is_some());
        assert_eq!(s.pos(), 0);
        assert!(s.match_regex(&re, true).is_some());
        assert_eq!(s.pos(), 2);
        assert!(s.match_regex(&re, true).is_none());
    }

    #[test]
    fn test_current_token_text() {
        let mut s = StringStream::new("hello world");
        s.begin_token();
        s.eat_while(|c| c != ' ');
        assert_eq!(s.current(), "hello");
        s.begin_token();
        assert!(s.eat_str(" w"));
        assert_eq!(s.current(), " w");
        assert!(!s.eat_str("x"));
    }

    #[test]
    fn test_indentation_with_tabs() {
        assert_eq!(StringStream::new("    x").indentation(), 4);
        assert_eq!(StringStream::new("\tx").indentation(), 4);
        assert_eq!(StringStream::new("  \tx").indentation(), 4);
        assert_eq!(StringStream::new("x").indentation(), 0);
    }

    #[test]
    fn test_lookahead() {
        let following = ["|-|-|", "next"];
        let s = StringStream::new("|a|b|")
            .with_line_number(3)
            .with_following(&following);
        assert_eq!(s.lookahead(1), Some("|-|-|"));
        assert_eq!(s.lookahead(2), Some("next"));
        assert_eq!(s.lookahead(3), None);
        assert_eq!(s.lookahead(0), None);
        assert_eq!(s.line_number(), 3);
    }
}
