use crate::chunker::word_count;

/// Estimated spoken duration of `text`, in seconds, at `words_per_minute`.
pub fn estimate_duration(text: &str, words_per_minute: f64) -> f64 {
    if words_per_minute <= 0.0 {
        return 0.0;
    }
    (word_count(text) as f64 / words_per_minute) * 60.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_150_words_is_one_minute() {
        let text = vec!["word"; 150].join(" ");
        assert_eq!(estimate_duration(&text, 150.0), 60.0);
    }

    #[test]
    fn test_empty_text_is_zero() {
        assert_eq!(estimate_duration("", 150.0), 0.0);
        assert_eq!(estimate_duration("   ", 150.0), 0.0);
    }

    #[test]
    fn test_non_positive_rate_is_zero() {
        assert_eq!(estimate_duration("a few words", 0.0), 0.0);
    }
}
