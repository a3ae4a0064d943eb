//! The four aspect judges
//!
//! Each judge specializes the generic worker with its prompt text and its
//! deterministic heuristic scorer. The heuristic arithmetic is the fallback
//! contract of the system and is covered by tests in each module.

mod content;
mod images;
mod metadata;
mod metafields;

pub use content::ContentJudge;
pub use images::ImageJudge;
pub use metadata::MetadataJudge;
pub use metafields::MetafieldJudge;

/// Shared heuristic feedback shape so fallback results are distinguishable
/// from AI-generated ones by their prefix
pub(crate) fn fallback_feedback(aspect_label: &str, score: i32, suggestion_count: usize) -> String {
    format!(
        "Fallback analysis: {} scored heuristically. Overall score: {}/100. {} suggestions provided.",
        aspect_label, score, suggestion_count
    )
}

/// Unweighted mean of integer scores, rounded to nearest
pub(crate) fn mean_score(scores: &[i32]) -> i32 {
    if scores.is_empty() {
        return 0;
    }
    let sum: i32 = scores.iter().sum();
    (sum as f64 / scores.len() as f64).round() as i32
}

/// Truncate to `max` characters and append an ellipsis
pub(crate) fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    let truncated: String = text.chars().take(max).collect();
    format!("{}...", truncated.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_score_rounds_to_nearest() {
        assert_eq!(mean_score(&[45, 20]), 33);
        assert_eq!(mean_score(&[60, 75]), 68);
        assert_eq!(mean_score(&[]), 0);
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdef", 3), "abc...");
        let long = "a".repeat(80);
        assert_eq!(truncate_with_ellipsis(&long, 57).chars().count(), 60);
    }
}
