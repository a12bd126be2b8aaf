//! Fuzzy title search
//!
//! Titles are scored with a partial ratio: the shorter string is slid across
//! the longer one and the best-aligned window decides the score. A query that
//! is a fragment of a title ("aveng" in "Avengers") therefore scores 100
//! rather than being penalised for the missing suffix.

use serde::Serialize;

/// Default number of hits returned by [`fuzzy_match`] callers that don't pick one
pub const DEFAULT_LIMIT: usize = 5;

/// Scores below this are not considered a match
pub const DEFAULT_MIN_SCORE: u8 = 60;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TitleMatch {
    /// Position of the title in the scanned sequence (the catalog row)
    pub index: usize,
    pub title: String,
    /// 0-100
    pub score: u8,
}

/// Lowercases and replaces everything but letters and digits with spaces
pub fn normalize(s: &str) -> String {
    let mapped: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .flat_map(char::to_lowercase)
        .collect();
    mapped.trim().to_string()
}

/// Best similarity between the shorter string and any aligned window of the longer one
///
/// Both inputs are compared as given; call [`normalize`] first for
/// case-insensitive matching.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    partial_ratio_chars(&a, &b, &mut Scratch::default())
}

/// Buffers reused across windows and titles so a scan doesn't allocate per window
#[derive(Default)]
struct Scratch {
    needle: Vec<char>,
    window: Vec<char>,
}

/// Char-slice scorer behind [`partial_ratio`]
fn partial_ratio_chars(a: &[char], b: &[char], scratch: &mut Scratch) -> u8 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return 0;
    }

    let m = short.len();
    let n = long.len();
    let mut best_distance = m;

    scratch.needle.clear();
    scratch.needle.extend_from_slice(short);

    // Every window is at most m chars long, so similarity is 1 - distance / m
    let mut consider = |slice: &[char]| -> bool {
        scratch.window.clear();
        scratch.window.extend_from_slice(slice);
        let distance = strsim::generic_levenshtein(&scratch.needle, &scratch.window);
        if distance < best_distance {
            best_distance = distance;
        }
        best_distance == 0
    };

    // Windows hanging off the left edge
    for len in 1..m {
        if consider(&long[..len]) {
            return 100;
        }
    }
    for start in 0..=(n - m) {
        if consider(&long[start..start + m]) {
            return 100;
        }
    }
    // Windows hanging off the right edge
    for len in (1..m).rev() {
        if consider(&long[n - len..]) {
            return 100;
        }
    }

    ((1.0 - best_distance as f64 / m as f64) * 100.0).round() as u8
}

/// Ranks `titles` against `query`
///
/// All candidates are scored, ordered by score descending (ties keep input
/// order), truncated to `limit`, and finally filtered by `min_score`.
pub fn fuzzy_match<'a, I>(query: &str, titles: I, limit: usize, min_score: u8) -> Vec<TitleMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    if query.trim().is_empty() {
        return Vec::new();
    }

    let query: Vec<char> = normalize(query).chars().collect();
    if query.is_empty() {
        return Vec::new();
    }

    let mut title_chars = Vec::new();
    let mut scratch = Scratch::default();

    let mut scored: Vec<(usize, &str, u8)> = titles
        .into_iter()
        .enumerate()
        .map(|(index, title)| {
            title_chars.clear();
            title_chars.extend(normalize(title).chars());
            let score = partial_ratio_chars(&query, &title_chars, &mut scratch);
            (index, title, score)
        })
        .collect();

    // sort_by is stable, so equal scores keep catalog order
    scored.sort_by(|a, b| b.2.cmp(&a.2));

    scored
        .into_iter()
        .take(limit)
        .filter(|(_, _, score)| *score >= min_score)
        .map(|(index, title, score)| TitleMatch {
            index,
            title: title.to_string(),
            score,
        })
        .collect()
}
