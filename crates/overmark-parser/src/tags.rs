//! Tag vocabulary emitted by the tokenizer.
//!
//! Tags are space separated in the output string. Tags starting with
//! `line-` ask the host for a line-wide effect (background shading and the
//! like) on top of span styling.

use overmark_core::{InlineStyle, LinkState};
use std::borrow::Cow;

/// Prefix that marks a line-wide tag.
pub const LINE_PREFIX: &str = "line-";

pub const CODE_FENCE_BEGIN: &str = "line-codeblock line-codeblock-begin formatting-code-block";
pub const CODE_FENCE_CONTENT: &str = "line-codeblock codeblock";
pub const CODE_FENCE_END: &str = "line-codeblock line-codeblock-end formatting-code-block";
/// Background of a blank line inside a fence.
pub const CODE_FENCE_BLANK: &str = "line-codeblock";
pub const INDENTED_CODE: &str = "line-indented-code indented-code";

pub const MATH_BEGIN: &str = "math math-begin formatting-math";
pub const MATH: &str = "math";
pub const MATH_END: &str = "math math-end formatting-math";

pub const HEADER_LINE: &str = "line-header";
pub const HEADER_MARKER: &str = "formatting-header";
pub const SETEXT_UNDERLINE: &str = "setext-underline";

pub const QUOTE_LINE: &str = "line-quote";
pub const QUOTE_MARKER: &str = "formatting-quote";
pub const QUOTE: &str = "quote";

pub const LIST_LINE: &str = "line-list";
pub const LIST_INDENT: &str = "list-indent";
/// Zero-width stand-in for a level whose indent width is 0.
pub const LIST_INDENT_MISSING: &str = "list-indent-missing";
pub const LIST_INDENT_CORRUPTED: &str = "list-indent-corrupted";
pub const LIST_BULLET: &str = "list-bullet";

pub const TABLE_LINE: &str = "line-table";
pub const TABLE_TITLE: &str = "table-title";
/// The title row is followed by a `|---|` separator row.
pub const TABLE_TITLE_HAS_SEPARATOR: &str = "table-title-sep";
pub const TABLE_ROW: &str = "line-table-row";
pub const TABLE_SEPARATOR: &str = "table-sep";
pub const TABLE_SEPARATOR_DASH: &str = "table-sep-dash";

/// Marks the bracket that opens a link-like span.
pub const LINK_FORMATTING: &str = "formatting-link";

/// Tag for an open inline style.
pub const fn style_tag(style: InlineStyle) -> &'static str {
    match style {
        InlineStyle::Strikethrough => "strikethrough",
        InlineStyle::Emphasis => "em",
        InlineStyle::Strong => "strong",
        InlineStyle::Escape => "escape",
    }
}

/// Tag for a link sub-state, `None` outside links.
pub const fn link_tag(link: LinkState) -> Option<&'static str> {
    match link {
        LinkState::None => None,
        LinkState::LinkText => Some("link-text"),
        LinkState::LinkUrl => Some("link-url"),
        LinkState::BareLink => Some("bare-link"),
        LinkState::FootnoteRef => Some("footnote-ref"),
        LinkState::FootnoteRefLead => Some("footnote-ref-lead"),
        LinkState::FootnoteName => Some("footnote-name"),
    }
}

/// Whether a single tag requests a line-wide effect.
pub fn is_line_tag(tag: &str) -> bool {
    tag.starts_with(LINE_PREFIX)
}

/// Accumulates tags for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<Cow<'static, str>>,
}

impl TagList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a static tag (may itself hold several space separated tags).
    pub fn push(&mut self, tag: &'static str) -> &mut Self {
        self.tags.push(Cow::Borrowed(tag));
        self
    }

    /// Append `prefix-level`, e.g. `line-quote-2`.
    pub fn push_level(&mut self, prefix: &'static str, level: usize) -> &mut Self {
        self.tags.push(Cow::Owned(format!("{}-{}", prefix, level)));
        self
    }

    /// Join into the output string, `None` when empty.
    pub fn finish(self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list_has_no_classification() {
        assert_eq!(TagList::new().finish(), None);
    }

    #[test]
    fn test_push_and_levels() {
        let mut tags = TagList::new();
        tags.push(QUOTE_LINE)
            .push_level(QUOTE_LINE, 2)
            .push(QUOTE_MARKER);
        assert_eq!(
            tags.finish().as_deref(),
            Some("line-quote line-quote-2 formatting-quote")
        );
    }

    #[test]
    fn test_static_tables() {
        assert_eq!(style_tag(InlineStyle::Emphasis), "em");
        assert_eq!(link_tag(LinkState::None), None);
        assert_eq!(link_tag(LinkState::BareLink), Some("bare-link"));
        assert!(is_line_tag("line-codeblock"));
        assert!(!is_line_tag("codeblock"));
    }
}
