//! Line-resumable Markdown overlay tokenizer.
//!
//! [`Tokenizer::token`] classifies the next span of a line and advances a
//! [`TokenizerState`]. It is meant to run next to a regular Markdown
//! tokenizer: it returns `None` wherever it has nothing to add, and the
//! host merges both tag streams.
//!
//! Every call consumes at least one character.

use crate::stream::{StringStream, TAB_SIZE};
use crate::tags::{self, TagList};
use log::trace;
use overmark_core::{BlockMode, InlineStyle, LinkState, MathDelimiter, TokenizerState};
use regex::Regex;
use std::sync::LazyLock;

// =============================================================================
// Regex patterns
// =============================================================================

/// Code fence opener, up to three spaces of indentation
static FENCE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}```").unwrap());

/// Code fence closer: three backticks alone on the line
static FENCE_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ {0,3}```\s*$").unwrap());

/// Setext underline, matched against the trimmed line
static SETEXT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(-{3,}|={3,})$").unwrap());

/// Blockquote markers: `>` optionally separated by blanks
static QUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>(?:[ \t]*>)*[ \t]*").unwrap());

/// ATX header marker
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})(?:\s|$)").unwrap());

/// List bullet, with leading indentation
static LIST_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([*\-+]|[0-9]+[.)])\s+").unwrap());

/// Table title separator line: `|---|:---:|`
static TABLE_SEP_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|?(\s*:?\s*-+\s*:?\s*\|)*\s*:?\s*-+\s*:?\s*\|?\s*$").unwrap()
});

/// One cell of a table separator line, with its padding
static TABLE_SEP_CELL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?::\s*)?-+(?:\s*:)?\s*").unwrap());

/// Inline code span, possibly unterminated
static INLINE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`[^`]*`?").unwrap());

/// Single-dollar math that closes on the same line
static INLINE_MATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$(?:[^$\\]|\\.)+\$").unwrap());

/// Math content up to the next delimiter or backslash
static MATH_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^$\\]+").unwrap());

/// Backslash followed by any character
static ESCAPED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\\.").unwrap());

/// Link URL content up to a title, escape or the closing paren
static LINK_URL_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^[^)"\\]+"#).unwrap());

/// Quoted link title, possibly unterminated
static LINK_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^"(?:[^"\\]|\\.)*"?"#).unwrap());

/// Characters that cannot start any token
static MEANINGLESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\\\[\]`$|*_~]+").unwrap());

// =============================================================================
// Types
// =============================================================================

/// Switches for the optional syntax families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Recognize `$...$` and `$$...$$`
    pub math: bool,
    /// Recognize pipe tables
    pub tables: bool,
    /// Recognize legacy 4-space indented code
    pub indented_code: bool,
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        Self {
            math: true,
            tables: true,
            indented_code: true,
        }
    }
}

/// Outcome of one stage of a `token` call.
enum Step {
    /// The call is done, with this classification
    Emit(Option<String>),
    /// Nothing produced yet, let the next stage look
    Continue,
}

/// Markdown overlay tokenizer.
///
/// Holds only options; all scanning state lives in [`TokenizerState`], so
/// one tokenizer can serve any number of documents.
///
/// # Example
///
/// ```
/// use overmark_parser::{StringStream, Tokenizer};
///
/// let tokenizer = Tokenizer::new();
/// let mut state = tokenizer.start_state();
/// let mut stream = StringStream::new("## Title");
///
/// let tags = tokenizer.token(&mut stream, &mut state);
/// assert_eq!(stream.current(), "##");
/// assert!(tags.unwrap().contains("header-2"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    options: TokenizerOptions,
}

impl Tokenizer {
    /// Create a tokenizer with every syntax family enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer with specific options.
    pub fn with_options(options: TokenizerOptions) -> Self {
        Self { options }
    }

    /// The options this tokenizer was built with.
    pub fn options(&self) -> &TokenizerOptions {
        &self.options
    }

    /// State at the start of a document.
    pub fn start_state(&self) -> TokenizerState {
        TokenizerState::new()
    }

    /// Independent snapshot of `state`.
    pub fn copy_state(&self, state: &TokenizerState) -> TokenizerState {
        state.clone()
    }

    /// Advance `state` over an empty line.
    ///
    /// Returns the code block background inside a fence, `None` otherwise.
    pub fn blank_line(&self, state: &mut TokenizerState) -> Option<String> {
        state.reset_for_blank_line();
        state.combine = false;
        if state.block == BlockMode::CodeFence {
            Some(tags::CODE_FENCE_BLANK.to_string())
        } else {
            None
        }
    }

    /// Classify the next token of `stream`.
    ///
    /// The consumed text is available as `stream.current()` afterwards.
    pub fn token(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Option<String> {
        stream.begin_token();
        state.combine = false;
        let out = self.dispatch(stream, state);
        if stream.pos() == stream.start() && !stream.eol() {
            trace!(
                "line {}: forcing progress at byte {}",
                stream.line_number(),
                stream.pos()
            );
            stream.next_char();
        }
        out
    }

    fn dispatch(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Option<String> {
        if stream.sol() {
            state.at_beginning = true;
            // These two never outlive the line that entered them.
            if matches!(
                state.block,
                BlockMode::ListIndent { .. } | BlockMode::TableSeparatorRow
            ) {
                state.block = BlockMode::None;
            }
        }

        match state.block {
            BlockMode::CodeFence => return self.code_fence(stream, state),
            BlockMode::Math(delim) => return self.math(stream, state, delim),
            _ => {}
        }

        if stream.sol() {
            if stream.is_blank_line() {
                stream.skip_to_end();
                return self.blank_line(state);
            }
            if let Step::Emit(out) = self.line_prefix(stream, state) {
                return out;
            }
        }

        if let BlockMode::ListIndent { index } = state.block {
            if let Step::Emit(out) = self.list_indent(stream, state, index) {
                return out;
            }
        }

        let out = self.inline(stream, state);
        if stream.current().chars().any(|c| !c.is_whitespace()) {
            state.at_beginning = false;
        }
        out
    }

    // =========================================================================
    // Block sub-scanners
    // =========================================================================

    fn code_fence(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Option<String> {
        if stream.sol() && stream.match_regex(&FENCE_CLOSE_RE, true).is_some() {
            trace!("line {}: code fence closed", stream.line_number());
            state.block = BlockMode::None;
            // A rule right after a fence is not a setext underline.
            state.prev_line_is_empty = true;
            return Some(tags::CODE_FENCE_END.to_string());
        }
        stream.skip_to_end();
        Some(tags::CODE_FENCE_CONTENT.to_string())
    }

    fn math(
        &self,
        stream: &mut StringStream<'_>,
        state: &mut TokenizerState,
        delim: MathDelimiter,
    ) -> Option<String> {
        if stream.eat_str(delim.as_str()) {
            trace!("line {}: math {} closed", stream.line_number(), delim);
            state.block = BlockMode::None;
            return Some(tags::MATH_END.to_string());
        }
        if stream.match_regex(&ESCAPED_RE, true).is_none()
            && stream.match_regex(&MATH_RUN_RE, true).is_none()
        {
            stream.next_char();
        }
        Some(tags::MATH.to_string())
    }

    fn line_prefix(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Step {
        let line = stream.string();

        if state.is_in_table() {
            state.table_row += 1;
            state.table_column = 0;
            state.block = if state.table_row == 1 && TABLE_SEP_LINE_RE.is_match(line) {
                BlockMode::TableSeparatorRow
            } else {
                BlockMode::None
            };
        }

        if stream.match_regex(&FENCE_OPEN_RE, true).is_some() {
            trace!("line {}: code fence opened", stream.line_number());
            state.block = BlockMode::CodeFence;
            return Step::Emit(Some(tags::CODE_FENCE_BEGIN.to_string()));
        }

        if self.options.indented_code && state.list_depth() == 0 && stream.indentation() >= 4 {
            stream.skip_to_end();
            return Step::Emit(Some(tags::INDENTED_CODE.to_string()));
        }

        if !state.prev_line_is_empty {
            if let Some(caps) = SETEXT_RE.captures(line.trim()) {
                let level = if caps[1].starts_with('=') { 1 } else { 2 };
                stream.skip_to_end();
                let mut tags = TagList::new();
                tags.push(tags::HEADER_LINE)
                    .push_level(tags::HEADER_LINE, level)
                    .push(tags::HEADER_MARKER)
                    .push(tags::SETEXT_UNDERLINE);
                return Step::Emit(tags.finish());
            }
        }

        state.prev_line_is_empty = false;

        if let Some(caps) = stream.match_regex(&QUOTE_RE, true) {
            let level = caps[0].matches('>').count();
            state.quote_level = level;
            let mut tags = TagList::new();
            tags.push(tags::QUOTE_LINE)
                .push_level(tags::QUOTE_LINE, level)
                .push(tags::QUOTE_MARKER)
                .push_level(tags::QUOTE, level);
            return Step::Emit(tags.finish());
        }

        if state.quote_level > 0 {
            if stream.next_char().is_some_and(|c| !c.is_whitespace()) {
                state.at_beginning = false;
            }
            state.combine = true;
            let mut tags = TagList::new();
            tags.push(tags::QUOTE_LINE)
                .push_level(tags::QUOTE_LINE, state.quote_level)
                .push_level(tags::QUOTE, state.quote_level);
            return Step::Emit(tags.finish());
        }

        if stream.match_regex(&HEADER_RE, false).is_some() {
            let level = stream.eat_while(|c| c == '#');
            state.combine = true;
            state.at_beginning = false;
            let mut tags = TagList::new();
            tags.push(tags::HEADER_LINE)
                .push_level(tags::HEADER_LINE, level)
                .push(tags::HEADER_MARKER)
                .push_level("header", level);
            return Step::Emit(tags.finish());
        }

        // A leading `-` cell of a separator row is not a bullet.
        if state.block != BlockMode::TableSeparatorRow
            && (state.list_depth() > 0 || LIST_BULLET_RE.is_match(stream.rest()))
        {
            rebuild_list_indents(&mut state.list_indents, stream.indentation());
            state.block = BlockMode::ListIndent { index: 0 };
        }

        Step::Continue
    }

    fn list_indent(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState, index: usize) -> Step {
        let level = state.list_depth();
        if index >= level {
            state.block = BlockMode::None;
            return Step::Continue;
        }
        state.combine = true;

        let first = index == 0;
        let mut index = index;
        let mut tags = TagList::new();

        if first && state.list_indents[0] == 0 {
            if level == 1 {
                // Nothing to consume before the bullet: take the bullet itself.
                state.block = BlockMode::None;
                tags.push(tags::LIST_LINE).push_level(tags::LIST_LINE, 1);
                if stream.match_regex(&LIST_BULLET_RE, true).is_some() {
                    tags.push(tags::LIST_BULLET);
                } else if stream.next_char().is_some_and(|c| !c.is_whitespace()) {
                    state.at_beginning = false;
                }
                return Step::Emit(tags.finish());
            }
            tags.push_level(tags::LIST_INDENT, 1)
                .push(tags::LIST_INDENT_MISSING);
            index = 1;
        }

        let width = state.list_indents[index];
        let mut consumed = 0;
        let mut corrupted = false;
        while consumed < width {
            match stream.peek() {
                Some(' ') => consumed += 1,
                Some('\t') => consumed += TAB_SIZE,
                _ => {
                    corrupted = true;
                    break;
                }
            }
            stream.next_char();
        }

        if corrupted {
            trace!(
                "line {}: corrupted list indent at level {}",
                stream.line_number(),
                index + 1
            );
            state.block = BlockMode::None;
            if stream.pos() == stream.start() {
                return Step::Continue;
            }
            tags.push(tags::LIST_INDENT)
                .push_level(tags::LIST_INDENT, index + 1)
                .push(tags::LIST_INDENT_CORRUPTED);
            if first {
                tags.push(tags::LIST_LINE).push_level(tags::LIST_LINE, level);
            }
            return Step::Emit(tags.finish());
        }

        tags.push(tags::LIST_INDENT)
            .push_level(tags::LIST_INDENT, index + 1);
        if first {
            tags.push(tags::LIST_LINE).push_level(tags::LIST_LINE, level);
        }

        index += 1;
        if index >= level {
            state.block = BlockMode::None;
            if stream.match_regex(&LIST_BULLET_RE, true).is_some() {
                tags.push(tags::LIST_BULLET);
            }
        } else {
            state.block = BlockMode::ListIndent { index };
        }
        Step::Emit(tags.finish())
    }

    // =========================================================================
    // Inline content
    // =========================================================================

    fn inline(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Option<String> {
        if state.block == BlockMode::TableSeparatorRow
            && stream.match_regex(&TABLE_SEP_CELL_RE, true).is_some()
        {
            return Some(tags::TABLE_SEPARATOR_DASH.to_string());
        }

        // The escaped character is taken before anything can react to it.
        if state.styles.escape {
            stream.next_char();
            let out = self.style_tags(state).finish();
            state.styles.escape = false;
            return out;
        }

        if stream.match_regex(&INLINE_CODE_RE, true).is_some() {
            return None;
        }

        if self.options.math {
            if let Some(delim) = open_math(stream) {
                trace!("line {}: math {} opened", stream.line_number(), delim);
                state.block = BlockMode::Math(delim);
                return Some(tags::MATH_BEGIN.to_string());
            }
        }

        if self.options.tables
            && stream.peek() == Some('|')
            && !state.styles.any()
            && state.list_depth() == 0
            && (state.block.is_none() || state.block == BlockMode::TableSeparatorRow)
        {
            if let Step::Emit(out) = self.table_pipe(stream, state) {
                return out;
            }
        }

        if let Step::Emit(out) = self.link(stream, state) {
            return out;
        }

        if stream.match_regex(&ESCAPED_RE, false).is_some() {
            stream.next_char();
            state.styles.escape = true;
            return self.style_tags(state).finish();
        }

        if let Step::Emit(out) = self.toggle_style(stream, state) {
            return out;
        }

        if stream.match_regex(&MEANINGLESS_RE, true).is_none() {
            stream.next_char();
        }
        self.style_tags(state).finish()
    }

    fn table_pipe(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Step {
        let mut new_table = None;
        if !state.is_in_table() {
            let leading = stream.string().trim_start().starts_with('|');
            let has_separator = stream
                .lookahead(1)
                .is_some_and(|next| TABLE_SEP_LINE_RE.is_match(next));
            if !leading && !has_separator {
                return Step::Continue;
            }
            trace!("line {}: table started", stream.line_number());
            state.start_table(stream.line_number());
            new_table = Some(has_separator);
        }
        stream.next_char();

        let mut tags = TagList::new();
        if state.table_column == 0 {
            tags.push(tags::TABLE_LINE)
                .push(tags::TABLE_ROW)
                .push_level(tags::TABLE_ROW, state.table_row);
        }
        if let Some(has_separator) = new_table {
            tags.push(tags::TABLE_TITLE);
            if has_separator {
                tags.push(tags::TABLE_TITLE_HAS_SEPARATOR);
            }
        }
        tags.push(tags::TABLE_SEPARATOR)
            .push_level(tags::TABLE_SEPARATOR, state.table_column);
        state.table_column += 1;
        Step::Emit(tags.finish())
    }

    fn link(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Step {
        match state.link {
            LinkState::None => {
                if stream.peek() != Some('[') {
                    return Step::Continue;
                }
                let rest = stream.rest();
                let Some(close) = find_bracket_close(rest) else {
                    return Step::Continue;
                };
                let inner = &rest[1..close];
                let after = &rest[close + 1..];

                let next = if state.at_beginning && after.starts_with(':') {
                    LinkState::FootnoteName
                } else if !after.starts_with('(') && !after.starts_with('[') {
                    if inner.starts_with('^') {
                        LinkState::FootnoteRefLead
                    } else {
                        LinkState::BareLink
                    }
                } else {
                    LinkState::LinkText
                };

                stream.next_char();
                if next == LinkState::FootnoteName {
                    stream.eat_str("^");
                }
                state.link = next;
                Step::Emit(self.link_formatting(state))
            }
            LinkState::FootnoteRefLead => {
                stream.eat_str("^");
                state.link = LinkState::FootnoteRef;
                Step::Emit(self.link_formatting(state))
            }
            LinkState::FootnoteRef | LinkState::BareLink | LinkState::LinkText => {
                if stream.peek() != Some(']') {
                    return Step::Continue;
                }
                let out = self.link_formatting(state);
                stream.next_char();
                state.link = if state.link == LinkState::LinkText && stream.looking_at("(") {
                    LinkState::LinkUrl
                } else {
                    LinkState::None
                };
                Step::Emit(out)
            }
            LinkState::FootnoteName => {
                if !stream.looking_at("]:") {
                    return Step::Continue;
                }
                let out = self.link_formatting(state);
                stream.eat_str("]:");
                state.link = LinkState::None;
                Step::Emit(out)
            }
            LinkState::LinkUrl => {
                if stream.looking_at(")") {
                    let out = self.link_formatting(state);
                    stream.next_char();
                    state.link = LinkState::None;
                    return Step::Emit(out);
                }
                if stream.match_regex(&LINK_TITLE_RE, true).is_none()
                    && stream.match_regex(&ESCAPED_RE, true).is_none()
                    && stream.match_regex(&LINK_URL_RUN_RE, true).is_none()
                {
                    stream.next_char();
                }
                Step::Emit(self.style_tags(state).finish())
            }
        }
    }

    fn toggle_style(&self, stream: &mut StringStream<'_>, state: &mut TokenizerState) -> Step {
        let (style, len) = if stream.looking_at("**") || stream.looking_at("__") {
            (InlineStyle::Strong, 2)
        } else if stream.looking_at("~~") {
            (InlineStyle::Strikethrough, 2)
        } else if matches!(stream.peek(), Some('*' | '_')) {
            (InlineStyle::Emphasis, 1)
        } else {
            return Step::Continue;
        };

        // Only a closing delimiter may sit right after a word character.
        let mid_word = stream.prev_char().is_some_and(is_word_char);
        if mid_word && !state.styles.is_set(style) {
            return Step::Continue;
        }

        let out = self.style_tags(state).finish();
        for _ in 0..len {
            stream.next_char();
        }
        state.styles.toggle(style);
        Step::Emit(out)
    }

    /// Tags of the open link sub-state and inline styles.
    fn style_tags(&self, state: &TokenizerState) -> TagList {
        let mut tags = TagList::new();
        if let Some(tag) = tags::link_tag(state.link) {
            tags.push(tag);
        }
        for style in state.styles.active() {
            tags.push(tags::style_tag(style));
        }
        tags
    }

    fn link_formatting(&self, state: &TokenizerState) -> Option<String> {
        let mut tags = self.style_tags(state);
        tags.push(tags::LINK_FORMATTING);
        tags.finish()
    }
}

/// Rebuild the list indent stack for a line indented by `indentation`
/// columns.
///
/// Levels are kept while the indentation covers them; whatever is left
/// opens one deeper level. The stack is never left empty.
///
/// # Example
///
/// ```
/// use overmark_parser::tokenizer::rebuild_list_indents;
///
/// let mut stack = vec![2, 4];
/// rebuild_list_indents(&mut stack, 7);
/// assert_eq!(stack, vec![2, 4, 1]);
/// ```
pub fn rebuild_list_indents(stack: &mut Vec<usize>, indentation: usize) {
    let mut remaining = indentation;
    let mut kept = 0;
    for &width in stack.iter() {
        if remaining < width {
            break;
        }
        remaining -= width;
        kept += 1;
    }
    stack.truncate(kept);
    if remaining > 0 {
        stack.push(remaining);
    }
    if stack.is_empty() {
        stack.push(0);
    }
}

/// Consume a math opener, if the rest starts with one.
fn open_math(stream: &mut StringStream<'_>) -> Option<MathDelimiter> {
    if stream.eat_str("$$") {
        return Some(MathDelimiter::Double);
    }
    if stream.match_regex(&INLINE_MATH_RE, false).is_some() {
        stream.eat_str("$");
        return Some(MathDelimiter::Single);
    }
    None
}

/// Byte offset of the `]` balancing the `[` that `text` starts with.
fn find_bracket_close(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
