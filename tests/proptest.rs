//! Property-based tests for overmark.
//!
//! These tests use proptest to generate Markdown-heavy random lines and
//! verify the tokenizer's progress, reset and resumability guarantees.

use proptest::prelude::*;

use overmark_core::{BlockMode, LinkState};
use overmark_parser::{tokenize_line, Highlighter, StringStream, Tokenizer};

/// Generate a random line biased towards Markdown punctuation.
fn markdown_line() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex(r"[ \t>#*_~`$|\[\]()^:\-+0-9a-z.\\]{0,40}").unwrap(),
        prop::string::string_regex(r"[\x20-\x7E]{0,80}").unwrap(),
        Just("```".to_string()),
        Just("$$".to_string()),
        Just(String::new()),
        Just("|-|-|".to_string()),
    ]
}

/// Generate a random document.
fn markdown_doc() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(markdown_line(), 0..25)
}

proptest! {
    /// Every call to `token` consumes at least one character.
    #[test]
    fn token_always_progresses(doc in markdown_doc()) {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        let lines: Vec<&str> = doc.iter().map(String::as_str).collect();

        for (i, line) in lines.iter().enumerate() {
            if line.trim().is_empty() {
                tokenizer.blank_line(&mut state);
                continue;
            }
            let mut stream = StringStream::new(line)
                .with_line_number(i)
                .with_following(&lines[i + 1..]);
            while !stream.eol() {
                let before = stream.pos();
                tokenizer.token(&mut stream, &mut state);
                prop_assert!(stream.pos() > before, "no progress on {:?} at {}", line, before);
            }
        }
    }

    /// Tokens of a line tile it exactly.
    #[test]
    fn tokens_cover_line(doc in markdown_doc()) {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        let lines: Vec<&str> = doc.iter().map(String::as_str).collect();

        for (i, line) in lines.iter().enumerate() {
            let tokens = tokenize_line(&tokenizer, line, i, &lines[i + 1..], &mut state);
            if line.trim().is_empty() {
                continue;
            }
            let joined: String = tokens.iter().map(|t| t.text.as_str()).collect();
            prop_assert_eq!(&joined, line);
        }
    }

    /// A blank line clears quotes, lists, tables, inline styles and links.
    #[test]
    fn blank_line_resets(doc in markdown_doc()) {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        let lines: Vec<&str> = doc.iter().map(String::as_str).collect();
        for (i, line) in lines.iter().enumerate() {
            tokenize_line(&tokenizer, line, i, &lines[i + 1..], &mut state);
        }

        tokenizer.blank_line(&mut state);

        prop_assert_eq!(state.quote_level, 0);
        prop_assert!(state.list_indents.is_empty());
        prop_assert!(state.table_id.is_none());
        prop_assert!(!state.styles.any());
        prop_assert_eq!(state.link, LinkState::None);
        let block_reset = !matches!(
            state.block,
            BlockMode::ListIndent { .. } | BlockMode::TableSeparatorRow
        );
        prop_assert!(block_reset);
    }

    /// A copied state is unaffected by advancing the original.
    #[test]
    fn copy_state_is_independent(doc in markdown_doc(), split in 0usize..25) {
        let tokenizer = Tokenizer::new();
        let mut state = tokenizer.start_state();
        let lines: Vec<&str> = doc.iter().map(String::as_str).collect();
        let split = split.min(lines.len());

        for (i, line) in lines.iter().enumerate().take(split) {
            tokenize_line(&tokenizer, line, i, &lines[i + 1..], &mut state);
        }
        let copy = tokenizer.copy_state(&state);
        let snapshot = copy.clone();

        for (i, line) in lines.iter().enumerate().skip(split) {
            tokenize_line(&tokenizer, line, i, &lines[i + 1..], &mut state);
        }
        prop_assert_eq!(copy, snapshot);
    }

    /// Editing a line leaves the highlighter exactly where a full rescan would.
    #[test]
    fn edit_matches_full_scan(doc in markdown_doc(), index in 0usize..25, text in markdown_line()) {
        prop_assume!(!doc.is_empty());
        let index = index % doc.len();

        let mut incremental = Highlighter::new(Tokenizer::new());
        incremental.set_lines(doc.iter().map(String::as_str));
        incremental.edit_line(index, &text).unwrap();

        let mut edited = doc.clone();
        edited[index] = text;
        let mut full = Highlighter::new(Tokenizer::new());
        full.set_lines(edited.iter().map(String::as_str));

        prop_assert_eq!(incremental.len(), full.len());
        for i in 0..full.len() {
            prop_assert_eq!(incremental.line_tokens(i), full.line_tokens(i));
            prop_assert_eq!(incremental.entry_state(i), full.entry_state(i));
        }
        prop_assert_eq!(incremental.exit_state(), full.exit_state());
    }

    /// Inserting then removing lines keeps tokens in sync with a full rescan.
    #[test]
    fn insert_remove_match_full_scan(doc in markdown_doc(), index in 0usize..25, text in markdown_line()) {
        let index = index % (doc.len() + 1);

        let mut incremental = Highlighter::new(Tokenizer::new());
        incremental.set_lines(doc.iter().map(String::as_str));
        incremental.insert_line(index, &text).unwrap();

        let mut edited = doc.clone();
        edited.insert(index, text);
        let mut full = Highlighter::new(Tokenizer::new());
        full.set_lines(edited.iter().map(String::as_str));
        for i in 0..full.len() {
            prop_assert_eq!(incremental.line_tokens(i), full.line_tokens(i));
        }

        incremental.remove_line(index).unwrap();
        let mut full = Highlighter::new(Tokenizer::new());
        full.set_lines(doc.iter().map(String::as_str));
        for i in 0..full.len() {
            prop_assert_eq!(incremental.line_tokens(i), full.line_tokens(i));
        }
    }
}
