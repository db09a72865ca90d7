//! Parsing of comma-delimited word lists.
//!
//! Each line is `source,translation`. The line is split at the first comma,
//! so translations may themselves contain commas.

use thiserror::Error;

use crate::model::WordPair;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ImportError {
    #[error("no word pairs found in input")]
    Empty,
}

/// Outcome of parsing a word list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedWordList {
    pub pairs: Vec<WordPair>,
    /// 1-based line numbers that could not be parsed.
    pub failed_lines: Vec<usize>,
}

impl ParsedWordList {
    #[must_use]
    pub fn imported(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed_lines.len()
    }
}

/// Parses one `source,translation` line.
#[must_use]
pub fn parse_line(line: &str) -> Option<WordPair> {
    let (source, target) = line.split_once(',')?;
    WordPair::new(source, target).ok()
}

/// Parses every line of `input`. Blank lines count as failures.
///
/// # Errors
///
/// Returns `ImportError::Empty` if the input has no lines at all.
pub fn parse_word_list(input: &str) -> Result<ParsedWordList, ImportError> {
    let mut parsed = ParsedWordList::default();
    let mut seen_any = false;

    for (idx, line) in input.lines().enumerate() {
        seen_any = true;
        match parse_line(line) {
            Some(pair) => parsed.pairs.push(pair),
            None => parsed.failed_lines.push(idx + 1),
        }
    }

    if !seen_any {
        return Err(ImportError::Empty);
    }
    Ok(parsed)
}
