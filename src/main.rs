//! Overmark - Markdown overlay tokenizer.
//!
//! This binary tokenizes Markdown files (or stdin) with the overlay
//! tokenizer and prints the result as a token list, as styled text, or as
//! the per-line state dump.

mod cli;
mod render;

use clap::Parser as ClapParser;
use cli::Cli;
use log::{debug, error, info, LevelFilter};
use overmark_config::Config;
use overmark_parser::{Highlighter, Tokenizer, TokenizerOptions};
use std::io::{self, Write};

fn main() {
    let cli = <Cli as ClapParser>::parse();

    // Handle --paths flag
    if cli.show_paths {
        cli::show_paths();
        return;
    }

    setup_logging(&cli.log_level);
    info!("Overmark v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&cli) {
        error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Set up logging based on the log level argument.
fn setup_logging(level: &str) {
    let filter = match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Warn,
    };

    env_logger::Builder::new()
        .filter_level(filter)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

/// Main application logic.
fn run(cli: &Cli) -> io::Result<()> {
    let config = load_config(cli);
    let tokenizer = Tokenizer::with_options(create_options(cli, &config));
    debug!("Tokenizer options: {:?}", tokenizer.options());

    let format = cli.format.unwrap_or(config.output.format);
    let color = cli
        .color
        .unwrap_or(config.output.color)
        .enabled(atty::is(atty::Stream::Stdout));
    debug!("Output format: {}, color: {}", format, color);

    let mut doc = Highlighter::new(tokenizer);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.should_read_stdin() {
        info!("Reading from stdin");
        doc.set_text(&io::read_to_string(io::stdin())?);
        render::write_document(&mut out, &doc, format, color)?;
    } else {
        for path in &cli.files {
            info!("Processing file: {}", path.display());
            doc.set_text(&std::fs::read_to_string(path)?);
            render::write_document(&mut out, &doc, format, color)?;
        }
    }

    out.flush()
}

/// Load configuration, applying the `--config` override when given.
///
/// A broken config is reported and skipped rather than fatal.
fn load_config(cli: &Cli) -> Config {
    let mut config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load config: {}", e);
        Config::default()
    });

    if let Some(ref config_arg) = cli.config {
        match Config::parse_override(config_arg) {
            Ok(override_config) => {
                config.merge(&override_config);
                debug!("Merged config override: {}", config_arg);
            }
            Err(e) => error!("Failed to apply config {}: {}", config_arg, e),
        }
    }

    config
}

/// Tokenizer options from the config, narrowed by the `--no-*` flags.
fn create_options(cli: &Cli, config: &Config) -> TokenizerOptions {
    let mut options = config.features.tokenizer_options();

    if cli.no_math {
        options.math = false;
    }
    if cli.no_tables {
        options.tables = false;
    }
    if cli.no_indented_code {
        options.indented_code = false;
    }

    options
}
