//! Incremental highlighting on top of the tokenizer.
//!
//! [`Highlighter`] plays the part of an editor host: it keeps the state
//! entering every line, and after an edit re-tokenizes only until the state
//! flowing out of a line matches what was cached for the next one.

use crate::stream::StringStream;
use crate::tokenizer::Tokenizer;
use log::debug;
use overmark_core::{OvermarkError, Position, Result, Span, TokenizerState};

/// One classified span of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledToken {
    /// Where the token sits in the document
    pub span: Span,
    /// The covered text
    pub text: String,
    /// Space separated tags, `None` when the overlay has nothing to add
    pub tags: Option<String>,
}

impl StyledToken {
    fn new(line: usize, start: usize, end: usize, text: &str, tags: Option<String>) -> Self {
        Self {
            span: Span::new(Position::new(line, start), Position::new(line, end)),
            text: text.to_string(),
            tags,
        }
    }

    /// Whether the token carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_deref()
            .is_some_and(|tags| tags.split(' ').any(|t| t == tag))
    }

    /// Iterate the individual tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.as_deref().unwrap_or_default().split_whitespace()
    }
}

/// Tokenize a whole line, advancing `state` to the state entering the next
/// line.
///
/// Whitespace-only lines go through [`Tokenizer::blank_line`]. A token that
/// asked to be combined is merged into the previous one when both carry the
/// same tags.
pub fn tokenize_line(
    tokenizer: &Tokenizer,
    line: &str,
    line_number: usize,
    following: &[&str],
    state: &mut TokenizerState,
) -> Vec<StyledToken> {
    if line.trim().is_empty() {
        return match tokenizer.blank_line(state) {
            Some(tags) => vec![StyledToken::new(line_number, 0, line.len(), line, Some(tags))],
            None => Vec::new(),
        };
    }

    let mut stream = StringStream::new(line)
        .with_line_number(line_number)
        .with_following(following);
    let mut tokens: Vec<StyledToken> = Vec::new();

    while !stream.eol() {
        let tags = tokenizer.token(&mut stream, state);
        if state.combine {
            if let Some(last) = tokens.last_mut() {
                if last.span.end.offset == stream.start() && last.tags == tags {
                    last.span.end.offset = stream.pos();
                    last.text.push_str(stream.current());
                    continue;
                }
            }
        }
        tokens.push(StyledToken::new(
            line_number,
            stream.start(),
            stream.pos(),
            stream.current(),
            tags,
        ));
    }

    // Only meaningful within a line; keeps cached states comparable.
    state.combine = false;
    tokens
}

/// Line-oriented document with cached per-line tokenizer states.
///
/// # Example
///
/// ```
/// use overmark_parser::{Highlighter, Tokenizer};
///
/// let mut doc = Highlighter::new(Tokenizer::new());
/// doc.set_text("one\n```\ncode\n```");
/// assert!(doc.line_tokens(2).unwrap()[0].has_tag("codeblock"));
///
/// doc.edit_line(1, "not a fence").unwrap();
/// assert!(!doc.line_tokens(2).unwrap().iter().any(|t| t.has_tag("codeblock")));
/// ```
#[derive(Debug, Clone)]
pub struct Highlighter {
    tokenizer: Tokenizer,
    lines: Vec<String>,
    /// `states[i]` enters line `i`; the last entry is the document's exit state
    states: Vec<TokenizerState>,
    tokens: Vec<Vec<StyledToken>>,
}

impl Highlighter {
    /// Create an empty document.
    pub fn new(tokenizer: Tokenizer) -> Self {
        let start = tokenizer.start_state();
        Self {
            tokenizer,
            lines: Vec::new(),
            states: vec![start],
            tokens: Vec::new(),
        }
    }

    /// The tokenizer in use.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Replace the whole document and tokenize it from the top.
    pub fn set_text(&mut self, text: &str) {
        self.set_lines(text.lines());
    }

    /// Replace the whole document with already split lines.
    pub fn set_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = lines.into_iter().map(Into::into).collect();
        self.tokens = vec![Vec::new(); self.lines.len()];
        self.states.clear();
        self.states.push(self.tokenizer.start_state());
        let len = self.lines.len();
        self.rescan(0, len);
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of a line.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Tokens of a line.
    pub fn line_tokens(&self, index: usize) -> Option<&[StyledToken]> {
        self.tokens.get(index).map(Vec::as_slice)
    }

    /// State entering a line.
    pub fn entry_state(&self, index: usize) -> Option<&TokenizerState> {
        if index < self.lines.len() {
            self.states.get(index)
        } else {
            None
        }
    }

    /// State after the last line.
    pub fn exit_state(&self) -> &TokenizerState {
        &self.states[self.states.len() - 1]
    }

    /// Replace the text of a line, returning how many lines were
    /// re-tokenized.
    pub fn edit_line(&mut self, index: usize, text: &str) -> Result<usize> {
        self.check_index(index, self.lines.len())?;
        self.lines[index] = text.to_string();
        Ok(self.rescan(index.saturating_sub(1), index))
    }

    /// Insert a line before `index` (`index == len()` appends).
    pub fn insert_line(&mut self, index: usize, text: &str) -> Result<usize> {
        self.check_index(index, self.lines.len() + 1)?;
        self.lines.insert(index, text.to_string());
        self.tokens.insert(index, Vec::new());
        let entry = self.states[index].clone();
        self.states.insert(index + 1, entry);
        self.renumber(index + 1);
        Ok(self.rescan(index.saturating_sub(1), index))
    }

    /// Remove a line.
    pub fn remove_line(&mut self, index: usize) -> Result<usize> {
        self.check_index(index, self.lines.len())?;
        self.lines.remove(index);
        self.tokens.remove(index);
        self.states.remove(index + 1);
        self.renumber(index);
        Ok(self.rescan(index.saturating_sub(1), index))
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(OvermarkError::LineOutOfRange {
                line: index,
                len: self.lines.len(),
            })
        }
    }

    fn renumber(&mut self, from: usize) {
        for (line, tokens) in self.tokens.iter_mut().enumerate().skip(from) {
            for token in tokens {
                token.span.start.line = line;
                token.span.end.line = line;
            }
        }
    }

    /// Re-tokenize from line `from`, at least through line `must_reach`,
    /// then until the exit state matches the cached entry of the next line.
    fn rescan(&mut self, from: usize, must_reach: usize) -> usize {
        let following: Vec<&str> = self.lines.iter().map(String::as_str).collect();
        let mut scanned = 0;

        for i in from..self.lines.len() {
            let mut state = self.states[i].clone();
            self.tokens[i] = tokenize_line(&self.tokenizer, &self.lines[i], i, &following[i + 1..], &mut state);
            scanned += 1;

            let next = i + 1;
            if next < self.states.len() {
                if i >= must_reach && self.states[next] == state {
                    break;
                }
                self.states[next] = state;
            } else {
                self.states.push(state);
            }
        }

        debug!("re-tokenized {} line(s) starting at line {}", scanned, from);
        scanned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overmark_core::BlockMode;

    fn highlighter(text: &str) -> Highlighter {
        let mut doc = Highlighter::new(Tokenizer::new());
        doc.set_text(text);
        doc
    }

    #[test]
    fn test_tokenize_line_spans() {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        let tokens = tokenize_line(&tokenizer, "a *b*", 4, &[], &mut state);

        assert_eq!(tokens[0].text, "a ");
        assert_eq!(tokens[1].span, Span::new(Position::new(4, 2), Position::new(4, 3)));
        assert_eq!(tokens[2].text, "b");
        assert!(tokens[2].has_tag("em"));
        assert_eq!(tokens[2].tags().collect::<Vec<_>>(), vec!["em"]);
    }

    #[test]
    fn test_tokenize_blank_line_in_fence() {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        tokenize_line(&tokenizer, "```", 0, &[], &mut state);
        let tokens = tokenize_line(&tokenizer, "  ", 1, &[], &mut state);

        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].has_tag("line-codeblock"));
        assert_eq!(tokens[0].span.len(), 2);
    }

    #[test]
    fn test_quote_continuation_combines() {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        state.quote_level = 1;
        let tokens = tokenize_line(&tokenizer, "lazy", 0, &[], &mut state);

        // One combined prefix char, then the rest of the line.
        assert_eq!(tokens[0].text, "l");
        assert_eq!(tokens[1].text, "azy");
        assert!(!state.combine);
    }

    #[test]
    fn test_set_text_caches_states() {
        let doc = highlighter("```\ncode\n```\ntext");
        assert_eq!(doc.len(), 4);
        assert_eq!(doc.entry_state(1).unwrap().block, BlockMode::CodeFence);
        assert_eq!(doc.entry_state(3).unwrap().block, BlockMode::None);
        assert!(doc.entry_state(4).is_none());
        assert_eq!(doc.exit_state().block, BlockMode::None);
    }

    #[test]
    fn test_edit_converges_quickly() {
        let mut doc = highlighter("one\ntwo\nthree\nfour");
        assert_eq!(doc.edit_line(2, "THREE").unwrap(), 2);
        assert_eq!(doc.line(2), Some("THREE"));
    }

    #[test]
    fn test_edit_propagates_fence_change() {
        let mut doc = highlighter("a\n```\ncode\n```\nb");
        assert!(doc.line_tokens(2).unwrap()[0].has_tag("codeblock"));

        let scanned = doc.edit_line(1, "x").unwrap();
        assert_eq!(scanned, 5);
        assert!(!doc.line_tokens(2).unwrap().iter().any(|t| t.has_tag("codeblock")));
        // The old closer now opens a fence that swallows the last line.
        assert!(doc.line_tokens(4).unwrap()[0].has_tag("codeblock"));
        assert_eq!(doc.exit_state().block, BlockMode::CodeFence);
    }

    #[test]
    fn test_insert_and_remove_lines() {
        let mut doc = highlighter("a\nb");
        doc.insert_line(1, "```").unwrap();
        assert_eq!(doc.len(), 3);
        assert!(doc.line_tokens(2).unwrap()[0].has_tag("codeblock"));
        assert_eq!(doc.line_tokens(2).unwrap()[0].span.start.line, 2);

        doc.remove_line(1).unwrap();
        assert_eq!(doc.len(), 2);
        assert!(!doc.line_tokens(1).unwrap().iter().any(|t| t.has_tag("codeblock")));
        assert_eq!(doc.line_tokens(1).unwrap()[0].span.start.line, 1);
    }

    #[test]
    fn test_edit_line_above_table_title() {
        let mut doc = highlighter("a | b\nplain");
        assert!(doc.exit_state().table_id.is_none());

        doc.edit_line(1, "--|--").unwrap();
        assert!(doc.line_tokens(0).unwrap().iter().any(|t| t.has_tag("table-title-sep")));
    }

    #[test]
    fn test_out_of_range() {
        let mut doc = highlighter("a");
        assert!(matches!(
            doc.edit_line(1, "x"),
            Err(OvermarkError::LineOutOfRange { line: 1, len: 1 })
        ));
        assert!(doc.remove_line(3).is_err());
        assert!(doc.insert_line(1, "b").is_ok());
    }
}
