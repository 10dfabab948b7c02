//! Output configuration for the `overmark` command.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How tokenized documents are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One row per tagged token
    #[default]
    Tokens,
    /// The source text, styled for the terminal
    Paint,
    /// Each line followed by the state leaving it
    State,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tokens" => Ok(OutputFormat::Tokens),
            "paint" => Ok(OutputFormat::Paint),
            "state" => Ok(OutputFormat::State),
            other => Err(format!(
                "unknown format '{}' (expected tokens, paint or state)",
                other
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tokens => write!(f, "tokens"),
            OutputFormat::Paint => write!(f, "paint"),
            OutputFormat::State => write!(f, "state"),
        }
    }
}

/// When to emit terminal colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve against whether stdout is a terminal.
    pub fn enabled(&self, is_tty: bool) -> bool {
        match self {
            ColorChoice::Auto => is_tty,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!(
                "unknown color choice '{}' (expected auto, always or never)",
                other
            )),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutputConfig {
    /// Output format.
    /// Default: "tokens"
    #[serde(default)]
    pub format: OutputFormat,

    /// Color mode.
    /// Default: "auto"
    #[serde(default)]
    pub color: ColorChoice,
}

impl OutputConfig {
    /// Merge another OutputConfig into this one.
    pub fn merge(&mut self, other: &OutputConfig) {
        self.format = other.format;
        self.color = other.color;
    }
}
