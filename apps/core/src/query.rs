pub const MIN_SUGGEST_CHARS: usize = 2;

/// True once the raw input is long enough to drive the suggestion dropdown.
pub fn should_suggest(query: &str) -> bool {
    query.chars().count() >= MIN_SUGGEST_CHARS
}

pub fn is_submittable(query: &str) -> bool {
    !query.trim().is_empty()
}

pub fn submittable_term(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_do_not_suggest() {
        assert!(!should_suggest(""));
        assert!(!should_suggest("Q"));
        assert!(!should_suggest("ح"));
        assert!(should_suggest("Qu"));
    }

    #[test]
    fn whitespace_is_not_submittable() {
        assert!(!is_submittable(""));
        assert!(!is_submittable("  \t "));
        assert!(is_submittable(" zakat "));
        assert_eq!(submittable_term(" zakat "), Some("zakat"));
        assert_eq!(submittable_term("   "), None);
    }
}
