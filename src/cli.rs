//! Command-line interface for overmark.

use clap::Parser;
use overmark_config::{ColorChoice, OutputFormat};
use std::path::PathBuf;

/// Overmark - Markdown overlay tokenizer.
///
/// Tokenizes Markdown documents line by line and prints the tags an editor
/// would use to highlight them.
#[derive(Parser, Debug)]
#[command(
    name = "overmark",
    author = "Overmark Contributors",
    version,
    about = "Line-resumable Markdown overlay tokenizer",
    after_help = "Examples:\n  \
                  overmark README.md\n  \
                  cat notes.md | overmark -f paint\n  \
                  overmark -f state --no-tables table.md\n  \
                  overmark -c '[features]\\nMath = false' doc.md"
)]
pub struct Cli {
    /// Input files to process (reads from stdin if not provided)
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(short = 'l', long = "loglevel", default_value = "warn")]
    pub log_level: String,

    /// Use a custom config file or inline TOML
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Output format: tokens, paint or state
    #[arg(short = 'f', long = "format")]
    pub format: Option<OutputFormat>,

    /// When to use colors: auto, always or never
    #[arg(long = "color", value_name = "WHEN")]
    pub color: Option<ColorChoice>,

    /// Do not recognize $math$
    #[arg(long = "no-math")]
    pub no_math: bool,

    /// Do not recognize pipe tables
    #[arg(long = "no-tables")]
    pub no_tables: bool,

    /// Do not treat 4-space indented lines as code
    #[arg(long = "no-indented-code")]
    pub no_indented_code: bool,

    /// Show configuration paths and exit
    #[arg(long = "paths")]
    pub show_paths: bool,
}

impl Cli {
    /// Check if we should read from stdin.
    pub fn should_read_stdin(&self) -> bool {
        self.files.is_empty()
    }
}

/// Show paths information.
pub fn show_paths() {
    use overmark_config::Config;

    let config_path = Config::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(not found)".to_string());

    println!("paths:");
    println!("  config                {}", config_path);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_default() {
        let cli = Cli::parse_from(["overmark"]);
        assert!(cli.files.is_empty());
        assert_eq!(cli.log_level, "warn");
        assert!(cli.format.is_none());
        assert!(cli.color.is_none());
        assert!(!cli.no_math);
        assert!(cli.should_read_stdin());
    }

    #[test]
    fn test_cli_parse_with_file() {
        let cli = Cli::parse_from(["overmark", "test.md"]);
        assert_eq!(cli.files, vec![PathBuf::from("test.md")]);
        assert!(!cli.should_read_stdin());
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::parse_from([
            "overmark",
            "-l", "debug",
            "-f", "state",
            "--color", "never",
            "--no-tables",
            "--no-indented-code",
            "file.md",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.format, Some(OutputFormat::State));
        assert_eq!(cli.color, Some(ColorChoice::Never));
        assert!(cli.no_tables);
        assert!(cli.no_indented_code);
        assert!(!cli.no_math);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["overmark", "-f", "html"]).is_err());
    }
}
