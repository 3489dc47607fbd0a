//! Relevance scoring for term matches
//!
//! Every function here returns a multiplier for a posting's field weight.
//! The constants are calibration values shared by all callers and are not
//! normalized across modes.

/// Multiplier for a prefix-mode match
pub const PREFIX_FACTOR: f64 = 0.8;
/// Multiplier for a substring-mode match at the start of the term
pub const SUBSTRING_LEADING_FACTOR: f64 = 0.8;
/// Multiplier for a substring-mode match anywhere else in the term
pub const SUBSTRING_INNER_FACTOR: f64 = 0.6;

/// Fuzzy relevance of an identical term
pub const FUZZY_IDENTICAL: f64 = 1.0;
/// Fuzzy relevance of a term that starts with the query
pub const FUZZY_PREFIX: f64 = 0.8;
/// Fuzzy relevance of a term that contains the query
pub const FUZZY_CONTAINS: f64 = 0.6;
/// Scale applied to edit-distance similarity
pub const FUZZY_EDIT_FACTOR: f64 = 0.4;
/// Similarity must exceed this for an edit-distance match to count
pub const FUZZY_MIN_SIMILARITY: f64 = 0.5;

/// Relevance of `term` for a prefix query
pub fn prefix_relevance(query: &str, term: &str) -> Option<f64> {
    term.starts_with(query).then_some(PREFIX_FACTOR)
}

/// Relevance of `term` for a substring query
pub fn substring_relevance(query: &str, term: &str) -> Option<f64> {
    term.find(query).map(|pos| {
        if pos == 0 {
            SUBSTRING_LEADING_FACTOR
        } else {
            SUBSTRING_INNER_FACTOR
        }
    })
}

/// Relevance of `term` for a fuzzy query, in [0, 1]
///
/// Tiers: identical, prefix, containment, then scaled edit-distance
/// similarity when it exceeds [`FUZZY_MIN_SIMILARITY`]. Returns 0.0 when
/// nothing applies.
pub fn fuzzy_relevance(query: &str, term: &str) -> f64 {
    if query.is_empty() || term.is_empty() {
        return 0.0;
    }
    if term == query {
        return FUZZY_IDENTICAL;
    }
    if term.starts_with(query) {
        return FUZZY_PREFIX;
    }
    if term.contains(query) {
        return FUZZY_CONTAINS;
    }

    let similarity = edit_similarity(query, term);
    if similarity > FUZZY_MIN_SIMILARITY {
        similarity * FUZZY_EDIT_FACTOR
    } else {
        0.0
    }
}

/// `1 - distance / max_len`, with lengths counted in characters
pub fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

/// Calculate Levenshtein distance between two strings
///
/// Unit cost insertion, deletion and substitution over Unicode scalar
/// values. Dynamic programming with O(m*n) time and O(min(m,n)) space; the
/// full table is always computed.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let len1 = s1_chars.len();
    let len2 = s2_chars.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Use smaller string for columns to minimize space
    let (shorter, longer) = if len1 <= len2 {
        (&s1_chars, &s2_chars)
    } else {
        (&s2_chars, &s1_chars)
    };
    let short_len = shorter.len();

    let mut prev_row: Vec<usize> = (0..=short_len).collect();
    let mut curr_row = vec![0; short_len + 1];

    for (i, long_ch) in longer.iter().enumerate() {
        curr_row[0] = i + 1;

        for j in 1..=short_len {
            let cost = usize::from(*long_ch != shorter[j - 1]);

            curr_row[j] = std::cmp::min(
                std::cmp::min(
                    prev_row[j] + 1,     // deletion
                    curr_row[j - 1] + 1, // insertion
                ),
                prev_row[j - 1] + cost, // substitution
            );
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[short_len]
}
