//! Core enums for overmark tokenizing state.
//!
//! These enums represent the mutually-exclusive sub-states the tokenizer
//! can be in while it walks a line.

use serde::{Deserialize, Serialize};

/// The mutually-exclusive link / footnote sub-state.
///
/// At most one of these is active at a time; they are independent from
/// the inline styles, so link text may also be emphasized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkState {
    /// Not inside any link-like span
    #[default]
    None,
    /// Text part of `[text](url)` or `[text][ref]`
    LinkText,
    /// URL part of `[text](url)`
    LinkUrl,
    /// `[reference]` with no following `(url)` or `[ref]`
    BareLink,
    /// Name part of a footnote reference `[^name]`
    FootnoteRef,
    /// The `[` of a footnote reference, before its `^`
    FootnoteRefLead,
    /// Name part of a footnote definition `[^name]:`
    FootnoteName,
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkState::None => write!(f, "none"),
            LinkState::LinkText => write!(f, "link-text"),
            LinkState::LinkUrl => write!(f, "link-url"),
            LinkState::BareLink => write!(f, "bare-link"),
            LinkState::FootnoteRef => write!(f, "footnote-ref"),
            LinkState::FootnoteRefLead => write!(f, "footnote-ref-lead"),
            LinkState::FootnoteName => write!(f, "footnote-name"),
        }
    }
}

/// Independently toggled inline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InlineStyle {
    /// `~~text~~`
    Strikethrough,
    /// `*text*` or `_text_`
    Emphasis,
    /// `**text**` or `__text__`
    Strong,
    /// The character after a backslash
    Escape,
}

impl InlineStyle {
    /// All styles, in tag emission order.
    pub const ALL: [InlineStyle; 4] = [
        InlineStyle::Strikethrough,
        InlineStyle::Emphasis,
        InlineStyle::Strong,
        InlineStyle::Escape,
    ];
}

impl std::fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InlineStyle::Strikethrough => write!(f, "strikethrough"),
            InlineStyle::Emphasis => write!(f, "emphasis"),
            InlineStyle::Strong => write!(f, "strong"),
            InlineStyle::Escape => write!(f, "escape"),
        }
    }
}

/// Delimiter of an inline or display math span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MathDelimiter {
    /// `$...$`, must close on the same line
    Single,
    /// `$$...$$`, may span lines
    Double,
}

impl MathDelimiter {
    /// The literal delimiter text.
    pub fn as_str(&self) -> &'static str {
        match self {
            MathDelimiter::Single => "$",
            MathDelimiter::Double => "$$",
        }
    }
}

impl std::fmt::Display for MathDelimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which block sub-scanner owns character consumption.
///
/// The payload carries what used to be a loosely-typed "extra" slot: the
/// math delimiter, or the current index into the list indent stack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockMode {
    /// Regular inline content
    #[default]
    None,
    /// Inside `$...$` or `$$...$$`
    Math(MathDelimiter),
    /// Consuming list indentation at the start of a line
    ListIndent {
        /// Index into the list indent stack of the next unit to consume
        index: usize,
    },
    /// Inside a ``` fenced code block
    CodeFence,
    /// On the `|---|---|` line right after a table title row
    TableSeparatorRow,
}

impl BlockMode {
    /// Whether no block sub-scanner is active.
    pub fn is_none(&self) -> bool {
        matches!(self, BlockMode::None)
    }
}

impl std::fmt::Display for BlockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockMode::None => write!(f, "none"),
            BlockMode::Math(delim) => write!(f, "math({})", delim),
            BlockMode::ListIndent { index } => write!(f, "list-indent({})", index),
            BlockMode::CodeFence => write!(f, "code-fence"),
            BlockMode::TableSeparatorRow => write!(f, "table-separator-row"),
        }
    }
}
