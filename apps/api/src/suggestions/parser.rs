//! Turns free-form model output into a clean list of candidate questions.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Preferred separator requested from the model.
pub const DELIMITER: &str = "||";

static LIST_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r?\n|•|\d+\.|- ").expect("LIST_SPLIT: invalid regex pattern")
});

static LEADING_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-•\d.)\s]+").expect("LEADING_MARKERS: invalid regex pattern")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE: invalid regex pattern"));

/// Splits on `||` when present, otherwise on newlines, bullets and numbering,
/// then normalizes each piece and drops the empty ones.
pub fn split_candidates(text: &str) -> Vec<String> {
    let pieces: Vec<&str> = if text.contains(DELIMITER) {
        text.split(DELIMITER).collect()
    } else {
        LIST_SPLIT.split(text).collect()
    };

    pieces
        .into_iter()
        .map(normalize_question)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strips list markers and one pair of surrounding quotes, collapses
/// whitespace, and drops trailing pipes.
pub fn normalize_question(raw: &str) -> String {
    let mut s = LEADING_MARKERS.replace(raw, "").trim().to_string();

    let quoted = s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')));
    if quoted {
        s = s[1..s.len() - 1].to_string();
    }

    let s = WHITESPACE.replace_all(&s, " ");
    s.trim().trim_end_matches('|').trim().to_string()
}

/// Keeps the first occurrence of each item, compared case-insensitively.
pub fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}

/// Removes items that exactly match an excluded entry, ignoring case and
/// surrounding whitespace.
pub fn filter_excluded(items: Vec<String>, exclude: &[String]) -> Vec<String> {
    if exclude.is_empty() {
        return items;
    }
    let excluded: HashSet<String> = exclude.iter().map(|e| exclusion_key(e)).collect();
    items
        .into_iter()
        .filter(|item| !excluded.contains(&exclusion_key(item)))
        .collect()
}

pub fn exclusion_key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Full pass over one model response: split, dedup, exclude.
pub fn parse_suggestions(text: &str, exclude: &[String]) -> Vec<String> {
    filter_excluded(dedup_case_insensitive(split_candidates(text)), exclude)
}
