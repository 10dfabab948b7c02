//! Output formats of the `overmark` command.

use crossterm::style::{Attribute, Color, ContentStyle};
use overmark_config::OutputFormat;
use overmark_parser::{tags, Highlighter, StyledToken};
use std::io::{self, Write};

/// Write a tokenized document in the requested format.
pub fn write_document<W: Write>(
    out: &mut W,
    doc: &Highlighter,
    format: OutputFormat,
    color: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Tokens => write_tokens(out, doc),
        OutputFormat::Paint => write_paint(out, doc, color),
        OutputFormat::State => write_state(out, doc),
    }
}

/// One row per tagged token: `line:start-end<TAB>tags<TAB>"text"`.
fn write_tokens<W: Write>(out: &mut W, doc: &Highlighter) -> io::Result<()> {
    for index in 0..doc.len() {
        for token in doc.line_tokens(index).unwrap_or_default() {
            if let Some(ref tags) = token.tags {
                writeln!(
                    out,
                    "{}:{}-{}\t{}\t{:?}",
                    index + 1,
                    token.span.start.offset,
                    token.span.end.offset,
                    tags,
                    token.text
                )?;
            }
        }
    }
    Ok(())
}

fn write_paint<W: Write>(out: &mut W, doc: &Highlighter, color: bool) -> io::Result<()> {
    for index in 0..doc.len() {
        let tokens = doc.line_tokens(index).unwrap_or_default();
        if tokens.is_empty() || !color {
            writeln!(out, "{}", doc.line(index).unwrap_or_default())?;
            continue;
        }
        let base = line_style(tokens);
        for token in tokens {
            write!(out, "{}", token_style(token, base).apply(&token.text))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Each line followed by the state leaving it, as TOML.
fn write_state<W: Write>(out: &mut W, doc: &Highlighter) -> io::Result<()> {
    for index in 0..doc.len() {
        writeln!(out, "{:>4} | {}", index + 1, doc.line(index).unwrap_or_default())?;
        let state = doc.entry_state(index + 1).unwrap_or_else(|| doc.exit_state());
        let text = toml::to_string(state).map_err(io::Error::other)?;
        for row in text.lines().filter(|row| !row.is_empty()) {
            writeln!(out, "       {}", row)?;
        }
    }
    Ok(())
}

/// Style every token of a line starts from, set by its `line-` tags.
fn line_style(tokens: &[StyledToken]) -> ContentStyle {
    let mut style = ContentStyle::new();
    let line_tags = tokens
        .iter()
        .flat_map(StyledToken::tags)
        .filter(|tag| tags::is_line_tag(tag));
    for tag in line_tags {
        match tag {
            "line-header" => {
                style.foreground_color = Some(Color::Blue);
                style.attributes.set(Attribute::Bold);
            }
            "line-codeblock" | "line-indented-code" => {
                style.background_color = Some(Color::AnsiValue(236));
            }
            "line-quote" => style.foreground_color = Some(Color::Green),
            _ => {}
        }
    }
    style
}

/// Terminal style for a token's tags, on top of the line style.
fn token_style(token: &StyledToken, base: ContentStyle) -> ContentStyle {
    let mut style = base;
    for tag in token.tags() {
        match tag {
            "formatting-header" => {
                style.foreground_color = Some(Color::Blue);
                style.attributes.set(Attribute::Bold);
            }
            "strong" => style.attributes.set(Attribute::Bold),
            "em" => style.attributes.set(Attribute::Italic),
            "strikethrough" => style.attributes.set(Attribute::CrossedOut),
            "codeblock" | "formatting-code-block" | "indented-code" => {
                style.foreground_color = Some(Color::DarkYellow);
            }
            "math" => style.foreground_color = Some(Color::Magenta),
            "link-text" | "bare-link" | "footnote-ref" | "footnote-name" => {
                style.foreground_color = Some(Color::Cyan);
            }
            "link-url" => {
                style.foreground_color = Some(Color::DarkCyan);
                style.attributes.set(Attribute::Underlined);
            }
            "formatting-quote" => style.foreground_color = Some(Color::Green),
            "table-sep" | "table-sep-dash" | "list-bullet" => {
                style.foreground_color = Some(Color::DarkGrey);
            }
            "escape" => style.attributes.set(Attribute::Dim),
            _ => {}
        }
    }
    style
}
