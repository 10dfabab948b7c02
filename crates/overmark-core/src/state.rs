//! Resumable tokenizer state.
//!
//! The [`TokenizerState`] struct is everything the tokenizer needs to pick
//! up scanning at the start of any line. Hosts keep one per line boundary
//! and hand a clone back in when a line is re-tokenized.

use crate::enums::{BlockMode, InlineStyle, LinkState};
use serde::{Deserialize, Serialize};

/// The independently toggled inline styles.
///
/// Each flag is toggled by its own delimiter, in any order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InlineStyles {
    /// `~~` is open
    pub strikethrough: bool,
    /// `*` or `_` is open
    pub emphasis: bool,
    /// `**` or `__` is open
    pub strong: bool,
    /// The next character is escaped
    pub escape: bool,
}

impl InlineStyles {
    /// Whether the given style is open.
    pub fn is_set(&self, style: InlineStyle) -> bool {
        match style {
            InlineStyle::Strikethrough => self.strikethrough,
            InlineStyle::Emphasis => self.emphasis,
            InlineStyle::Strong => self.strong,
            InlineStyle::Escape => self.escape,
        }
    }

    /// Set or clear a style.
    pub fn set(&mut self, style: InlineStyle, on: bool) {
        match style {
            InlineStyle::Strikethrough => self.strikethrough = on,
            InlineStyle::Emphasis => self.emphasis = on,
            InlineStyle::Strong => self.strong = on,
            InlineStyle::Escape => self.escape = on,
        }
    }

    /// Flip a style, returning its new value.
    pub fn toggle(&mut self, style: InlineStyle) -> bool {
        let on = !self.is_set(style);
        self.set(style, on);
        on
    }

    /// Whether any style is open.
    pub fn any(&self) -> bool {
        self.strikethrough || self.emphasis || self.strong || self.escape
    }

    /// Iterate the open styles in tag emission order.
    pub fn active(&self) -> impl Iterator<Item = InlineStyle> + '_ {
        InlineStyle::ALL.into_iter().filter(|s| self.is_set(*s))
    }

    /// Close every style.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Resumable tokenizer state.
///
/// Cloning is a deep copy: the list indent stack of a clone is its own
/// vector, so several snapshots can be advanced independently.
///
/// # Example
///
/// ```
/// use overmark_core::TokenizerState;
///
/// let mut state = TokenizerState::new();
/// state.list_indents = vec![2, 4];
/// let copy = state.clone();
/// state.list_indents.push(1);
/// assert_eq!(copy.list_indents, vec![2, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerState {
    /// No content has been seen yet on the content part of this line
    pub at_beginning: bool,
    /// Whether the previous line was blank (setext underline detection)
    pub prev_line_is_empty: bool,
    /// Ask the host to merge this token with an adjacent same-tagged one
    pub combine: bool,
    /// Blockquote nesting depth
    pub quote_level: usize,
    /// Line the current table started on; volatile across edits
    pub table_id: Option<usize>,
    /// Column counter of the current table row
    pub table_column: usize,
    /// Row counter of the current table, 0 being the title row
    pub table_row: usize,
    /// Required indent width of every open list level
    pub list_indents: Vec<usize>,
    /// Open link / footnote sub-state
    pub link: LinkState,
    /// Active block sub-scanner
    pub block: BlockMode,
    /// Open inline styles
    pub styles: InlineStyles,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizerState {
    /// State at the very start of a document.
    ///
    /// # Example
    ///
    /// ```
    /// use overmark_core::{BlockMode, TokenizerState};
    /// let state = TokenizerState::new();
    /// assert!(state.at_beginning);
    /// assert!(state.prev_line_is_empty);
    /// assert_eq!(state.block, BlockMode::None);
    /// ```
    pub fn new() -> Self {
        Self {
            at_beginning: true,
            prev_line_is_empty: true,
            combine: false,
            quote_level: 0,
            table_id: None,
            table_column: 0,
            table_row: 0,
            list_indents: Vec::new(),
            link: LinkState::None,
            block: BlockMode::None,
            styles: InlineStyles::default(),
        }
    }

    /// Current list nesting depth.
    pub fn list_depth(&self) -> usize {
        self.list_indents.len()
    }

    /// Whether a table is being scanned.
    pub fn is_in_table(&self) -> bool {
        self.table_id.is_some()
    }

    /// Start tracking a new table that begins on `line`.
    pub fn start_table(&mut self, line: usize) {
        self.table_id = Some(line);
        self.table_row = 0;
        self.table_column = 0;
    }

    /// Forget the current table.
    pub fn end_table(&mut self) {
        self.table_id = None;
        self.table_row = 0;
        self.table_column = 0;
    }

    /// Reset what a blank line breaks.
    ///
    /// Quotes, lists, tables, inline styles and any open link span end
    /// here. Fenced code and math blocks carry on past the blank line.
    ///
    /// # Example
    ///
    /// ```
    /// use overmark_core::TokenizerState;
    /// let mut state = TokenizerState::new();
    /// state.quote_level = 2;
    /// state.styles.strong = true;
    /// state.reset_for_blank_line();
    /// assert_eq!(state.quote_level, 0);
    /// assert!(!state.styles.any());
    /// ```
    pub fn reset_for_blank_line(&mut self) {
        self.at_beginning = true;
        self.prev_line_is_empty = true;
        self.quote_level = 0;
        self.list_indents.clear();
        self.end_table();
        self.styles.clear();
        self.link = LinkState::None;
        if matches!(
            self.block,
            BlockMode::ListIndent { .. } | BlockMode::TableSeparatorRow
        ) {
            self.block = BlockMode::None;
        }
    }
}
