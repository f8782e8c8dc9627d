//! Parsers for the two shapes of model output the filters ask for.
//!
//! List mode is all-or-nothing: the whole reply must be one JSON array of ids.
//! Record-stream mode parses one JSON object per line and keeps going past
//! malformed lines, reporting how many it skipped.

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;

use crate::PaperSiftError;

/// Removes Markdown code fences (with or without a language tag).
pub fn strip_code_fences(text: &str) -> String {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"```[A-Za-z]*").expect("valid fence regex"));
    fence.replace_all(text, "").trim().to_string()
}

/// Parses a reply expected to be a single JSON array of string ids.
pub fn parse_id_list(text: &str) -> Result<Vec<String>, PaperSiftError> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str::<Vec<String>>(&cleaned).map_err(|err| PaperSiftError::ParseFailed {
        output: text.to_string(),
        reason: err.to_string(),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordStream<T> {
    pub records: Vec<T>,
    /// Non-empty lines that did not deserialize into a record.
    pub failures: usize,
}

impl<T> Default for RecordStream<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: 0,
        }
    }
}

/// Normalizes a line-per-record reply into one candidate JSON object per line.
pub fn clean_record_stream(text: &str) -> Vec<String> {
    static TRAILING_COMMA: OnceLock<Regex> = OnceLock::new();
    let trailing_comma = TRAILING_COMMA
        .get_or_init(|| Regex::new(r",\s*\}").expect("valid trailing comma regex"));

    let without_fences = strip_code_fences(text);
    without_fences
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != "[" && *line != "]")
        .map(|line| {
            let line = trailing_comma.replace_all(line, "}");
            let line = line.trim_end_matches(',').trim_end();
            let line = match line.strip_prefix('[') {
                Some(rest) if rest.trim_start().starts_with('{') => rest.trim_start(),
                _ => line,
            };
            let line = match line.strip_suffix(']') {
                Some(rest) if rest.trim_end().ends_with('}') => rest.trim_end(),
                _ => line,
            };
            line.trim_end_matches(',').to_string()
        })
        .collect()
}

/// Parses each cleaned line independently, skipping and counting failures.
pub fn parse_record_stream<T: DeserializeOwned>(text: &str) -> RecordStream<T> {
    let mut stream = RecordStream::default();
    for line in clean_record_stream(text) {
        match serde_json::from_str::<T>(&line) {
            Ok(record) => stream.records.push(record),
            Err(err) => {
                stream.failures += 1;
                tracing::debug!(line = %line, error = %err, "failed to parse model output line");
            }
        }
    }
    stream
}
