mod analyze;
mod download;
mod health;
mod metrics;
mod search;

pub use analyze::analyze_handler;
pub use download::download_handler;
pub use health::health_handler;
pub use metrics::metrics_handler;
pub use search::search_handler;

// Cap a free-text field and strip surrounding whitespace before it goes
// anywhere near an upstream prompt or query string
pub(crate) fn sanitize_text(input: &str, max_chars: usize) -> String {
    input
        .chars()
        .take(max_chars)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::sanitize_text;

    #[test]
    fn sanitize_truncates_then_trims() {
        assert_eq!(sanitize_text("  pasta  ", 100), "pasta");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
        assert_eq!(sanitize_text("ab    ", 4), "ab");
        assert_eq!(sanitize_text("   ", 100), "");
    }

    #[test]
    fn sanitize_counts_characters_not_bytes() {
        assert_eq!(sanitize_text("créme brûlée", 5), "créme");
    }
}
