//! Feature flags configuration.
//!
//! This module contains the `FeaturesConfig` struct which switches the
//! optional syntax families of the tokenizer on and off.

use overmark_parser::TokenizerOptions;
use serde::{Deserialize, Serialize};

/// Feature flags configuration.
///
/// Controls which syntax families the tokenizer recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeaturesConfig {
    /// Recognize `$...$` and `$$...$$` math.
    /// Default: true
    #[serde(default = "default_true")]
    pub math: bool,

    /// Recognize pipe tables.
    /// Default: true
    #[serde(default = "default_true")]
    pub tables: bool,

    /// Treat lines indented by 4+ columns outside lists as code.
    /// Default: true
    #[serde(default = "default_true")]
    pub indented_code: bool,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            math: true,
            tables: true,
            indented_code: true,
        }
    }
}

impl FeaturesConfig {
    /// Merge another FeaturesConfig into this one.
    ///
    /// TOML has no "unset" state, so every field is copied from `other`;
    /// fields missing from an override file come back as their defaults.
    pub fn merge(&mut self, other: &FeaturesConfig) {
        self.math = other.math;
        self.tables = other.tables;
        self.indented_code = other.indented_code;
    }

    /// Tokenizer options for these flags.
    ///
    /// # Example
    ///
    /// ```
    /// use overmark_config::FeaturesConfig;
    ///
    /// let features = FeaturesConfig { tables: false, ..Default::default() };
    /// let options = features.tokenizer_options();
    /// assert!(options.math);
    /// assert!(!options.tables);
    /// ```
    pub fn tokenizer_options(&self) -> TokenizerOptions {
        TokenizerOptions {
            math: self.math,
            tables: self.tables,
            indented_code: self.indented_code,
        }
    }
}

fn default_true() -> bool {
    true
}
