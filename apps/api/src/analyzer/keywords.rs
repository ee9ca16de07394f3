//! Frequency-ranked keyword extraction with stop-word filtering.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

pub const MAX_KEYWORDS: usize = 20;

/// Tokens of this many characters or fewer carry no topical signal.
const MAX_IGNORED_TOKEN_CHARS: usize = 3;

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "from",
        "up", "about", "into", "through", "during", "before", "after", "above", "below",
        "between", "among", "this", "that", "these", "those", "is", "are", "was", "were", "be",
        "been", "being", "have", "has", "had", "do", "does", "did", "will", "would", "could",
        "should", "may", "might", "must", "can", "shall",
    ]
    .into_iter()
    .collect()
});

/// Word characters are ASCII letters, digits and `_`; anything else, accented
/// letters included, becomes a token break.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s]").expect("non-word pattern is valid"));

pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Ranks the words of `text` by how often they occur.
///
/// Text is lower-cased and punctuation becomes whitespace. Short tokens and
/// stop words are dropped. The sort is stable, so equally frequent words keep
/// the order in which they first appeared. At most `MAX_KEYWORDS` are returned.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");

    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for token in cleaned.split_whitespace() {
        if token.chars().count() <= MAX_IGNORED_TOKEN_CHARS || is_stop_word(token) {
            continue;
        }
        match positions.get(token) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(token, counts.len());
                counts.push((token, 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token.to_string())
        .collect()
}
