//! Overmark Core
//!
//! This crate provides the resumable tokenizer state and error definitions
//! for the overmark Markdown overlay tokenizer.
//!
//! # Overview
//!
//! The core crate contains:
//! - [`TokenizerState`] - The per-line resumable state record
//! - [`InlineStyles`] - The independently toggled inline styles
//! - [`LinkState`], [`BlockMode`], [`MathDelimiter`], [`InlineStyle`] - State enums
//! - [`OvermarkError`] - Error types
//! - [`Position`], [`Span`] - Source location types

pub mod enums;
pub mod error;
pub mod state;
pub mod types;

pub use enums::{BlockMode, InlineStyle, LinkState, MathDelimiter};
pub use error::{OvermarkError, Result};
pub use state::{InlineStyles, TokenizerState};
pub use types::{Position, Span};
