//! Overmark Parser
//!
//! A line-resumable Markdown overlay tokenizer, meant to run alongside an
//! editor's regular Markdown mode and add what it misses: nested list
//! indentation, pipe tables, footnotes, math and friends.
//!
//! # Overview
//!
//! The tokenizer is fed one line at a time through a [`StringStream`].
//! Each call to [`Tokenizer::token`] consumes at least one character and
//! returns a space separated tag string, or `None`. All scanning state lives
//! in an [`overmark_core::TokenizerState`] that can be cloned at any line
//! boundary and resumed later.
//!
//! # Example
//!
//! ```
//! use overmark_parser::{tokenize_line, Tokenizer};
//!
//! let tokenizer = Tokenizer::new();
//! let mut state = tokenizer.start_state();
//!
//! let tokens = tokenize_line(&tokenizer, "- see [^1]", 0, &[], &mut state);
//! assert!(tokens[0].has_tag("list-bullet"));
//! assert!(tokens.iter().any(|t| t.has_tag("footnote-ref")));
//! ```

pub mod highlight;
pub mod stream;
pub mod tags;
pub mod tokenizer;

pub use highlight::{tokenize_line, Highlighter, StyledToken};
pub use stream::{StringStream, TAB_SIZE};
pub use tags::TagList;
pub use tokenizer::{rebuild_list_indents, Tokenizer, TokenizerOptions};
