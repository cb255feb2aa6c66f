/// Lower-cases `text` and turns every run of non-alphanumeric characters into
/// a single space.
pub fn normalize(text: &str) -> String {
    let mapped: String = text
        .chars()
        .flat_map(|c| {
            let keep = c.is_alphanumeric();
            c.to_lowercase().map(move |l| if keep { l } else { ' ' })
        })
        .collect();
    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Distinct tokens of length >= 2 from the normalized text, in first-seen order.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in normalize(text).split(' ') {
        if word.chars().count() >= 2 && !tokens.iter().any(|t| t == word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}

/// True when `term` occurs in `haystack` without alphanumeric neighbours.
/// Both sides are expected to be lower-cased already. Works on raw text
/// (so "c++" or "ci/cd" can be found) as well as on normalized text.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(idx, found)| {
        let before = haystack[..idx].chars().next_back();
        let after = haystack[idx + found.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize("Electrical Engineer, Lithium Refinery"), "electrical engineer lithium refinery");
        assert_eq!(normalize("  B.S. in EE -- (Power)  "), "b s in ee power");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_tokenize_drops_short_and_duplicate_words() {
        let tokens = tokenize("A Senior engineer / engineer II");
        assert_eq!(tokens, vec!["senior", "engineer", "ii"]);
        assert!(tokenize("!!!").is_empty());
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("senior java developer", "java"));
        assert!(!contains_term("senior javascript developer", "java"));
        assert!(contains_term("expert in c++, python", "c++"));
        assert!(contains_term("built ci/cd pipelines", "ci/cd"));
        assert!(contains_term("electronics engineer", "electronics"));
        assert!(!contains_term("anything", ""));
    }
}
