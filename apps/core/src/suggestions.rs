use crate::model::fold_case;

pub const DEFAULT_SUGGESTION_LIMIT: usize = 4;

pub const DEFAULT_POPULAR_TERMS: [&str; 10] = [
    "Quran",
    "Hadith",
    "Prayer",
    "Islamic History",
    "Fiqh",
    "Prophet Muhammad",
    "Salah",
    "Zakat",
    "Hajj",
    "Ramadan",
];

pub fn default_pool() -> Vec<String> {
    DEFAULT_POPULAR_TERMS.iter().map(|term| term.to_string()).collect()
}

/// Filters `pool` by case-insensitive substring match, keeping pool order.
/// The raw query leads the list unless the pool already holds it verbatim.
pub fn suggest<S: AsRef<str>>(query: &str, pool: &[S], limit: usize) -> Vec<String> {
    if limit == 0 {
        return Vec::new();
    }

    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let folded_query = fold_case(trimmed);
    let mut suggestions = Vec::with_capacity(limit);

    let in_pool = pool.iter().any(|term| term.as_ref() == trimmed);
    if !in_pool {
        suggestions.push(trimmed.to_string());
    }

    for term in pool.iter().map(AsRef::as_ref) {
        if suggestions.len() >= limit {
            break;
        }
        if fold_case(term).contains(&folded_query) && !suggestions.iter().any(|s| s == term) {
            suggestions.push(term.to_string());
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_partial_query() {
        let got = suggest("Qur", &DEFAULT_POPULAR_TERMS, 4);
        assert_eq!(got, vec!["Qur".to_string(), "Quran".to_string()]);
    }

    #[test]
    fn exact_pool_term_is_not_duplicated() {
        let got = suggest("Hajj", &DEFAULT_POPULAR_TERMS, 4);
        assert_eq!(got, vec!["Hajj".to_string()]);
    }

    #[test]
    fn different_case_still_prepends_literal() {
        let got = suggest("hajj", &DEFAULT_POPULAR_TERMS, 4);
        assert_eq!(got, vec!["hajj".to_string(), "Hajj".to_string()]);
    }

    #[test]
    fn respects_limit_in_pool_order() {
        let got = suggest("a", &DEFAULT_POPULAR_TERMS, 4);
        assert_eq!(got.len(), 4);
        assert_eq!(got[0], "a");
        assert_eq!(&got[1..], ["Quran", "Hadith", "Prayer"]);
    }

    #[test]
    fn empty_query_or_zero_limit_yields_nothing() {
        assert!(suggest("   ", &DEFAULT_POPULAR_TERMS, 4).is_empty());
        assert!(suggest("Quran", &DEFAULT_POPULAR_TERMS, 0).is_empty());
    }

    #[test]
    fn repeated_pool_terms_appear_once() {
        let pool = ["Quran", "Quran", "Qurbani"];
        let got = suggest("Qu", &pool, 4);
        assert_eq!(got, vec!["Qu", "Quran", "Qurbani"]);
    }

    #[test]
    fn unmatched_query_stands_alone() {
        let got = suggest("Tafsir", &DEFAULT_POPULAR_TERMS, 4);
        assert_eq!(got, vec!["Tafsir".to_string()]);
    }
}
