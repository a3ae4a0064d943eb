//! Model response schema, validity gate, and repair pass
//!
//! Workers ask the backend for a JSON object with an overall score, a field
//! score array, a suggestion array, and a feedback string. The backend is
//! trusted only so far: the payload is re-parsed into the strict types here,
//! optionally gated for telltale malformed output, and then normalized by an
//! explicit repair pass that backfills zero scores and empty prose.

use serde::Deserialize;

use crate::report::{
    clamp_score, suggestion_id, AnalysisResult, AnalysisType, FieldScore, Priority, Suggestion,
    SuggestionType,
};
use seoscan_core::{Error, Result};

/// Feedback fragments that mark a placeholder, not a finished analysis
const PLACEHOLDER_PHRASES: &[&str] = &["in progress", "Please wait"];

/// Raw response shape; sections are optional at parse time so the gate and
/// repair pass can decide what is salvageable
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    #[serde(default)]
    pub score: Option<i32>,
    #[serde(default)]
    pub field_scores: Option<Vec<ModelFieldScore>>,
    #[serde(default)]
    pub suggestions: Option<Vec<ModelSuggestion>>,
    #[serde(default)]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelFieldScore {
    pub field: String,
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSuggestion {
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub priority: Priority,
    pub field: String,
    #[serde(default)]
    pub current: String,
    #[serde(default)]
    pub suggested: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Strict validity gate; rejection routes the caller to heuristic fallback
pub fn validate_strict(response: &ModelResponse) -> Result<()> {
    let field_scores = response
        .field_scores
        .as_ref()
        .ok_or_else(|| Error::InvalidResponse("missing fieldScores".to_string()))?;
    if response.suggestions.is_none() {
        return Err(Error::InvalidResponse("missing suggestions".to_string()));
    }
    let feedback = response
        .feedback
        .as_ref()
        .ok_or_else(|| Error::InvalidResponse("missing feedback".to_string()))?;

    if response.score.unwrap_or(0) == 0 && field_scores.is_empty() {
        return Err(Error::InvalidResponse(
            "zero score with no field scores".to_string(),
        ));
    }

    for phrase in PLACEHOLDER_PHRASES {
        if feedback.contains(phrase) {
            return Err(Error::InvalidResponse(format!(
                "placeholder feedback: {:?}",
                phrase
            )));
        }
    }

    Ok(())
}

/// Description text for a repaired field score, by score band
pub(crate) fn band_description(field: &str, score: i32) -> String {
    if score < 60 {
        format!("{} needs significant improvement", field)
    } else if score < 80 {
        format!("{} needs minor optimization", field)
    } else {
        format!("{} is well optimized", field)
    }
}

/// Derive a field score from the suggestions attached to that field
fn score_from_suggestions(suggestions: &[Suggestion], field: &str) -> i32 {
    let for_field: Vec<&Suggestion> = suggestions.iter().filter(|s| s.field == field).collect();
    if for_field.is_empty() {
        70
    } else if for_field.iter().any(|s| s.priority == Priority::High) {
        45
    } else if for_field.iter().any(|s| s.priority == Priority::Medium) {
        65
    } else {
        75
    }
}

/// Repair pass: turn a parsed model response into a complete `AnalysisResult`
///
/// Zero field scores and empty descriptions are recomputed from the field's
/// suggestions; a zero overall score becomes the unweighted mean of the
/// repaired field scores; empty feedback is synthesized. Every score is
/// clamped to [0, 100] on the way out.
pub fn repair(aspect: AnalysisType, product_id: &str, response: ModelResponse) -> AnalysisResult {
    let suggestions: Vec<Suggestion> = response
        .suggestions
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(seq, s)| Suggestion {
            id: suggestion_id(aspect, product_id, &s.field, seq),
            suggestion_type: s.suggestion_type,
            priority: s.priority,
            field: s.field,
            current: s.current,
            suggested: s.suggested,
            reason: s.reason,
            impact: s.impact,
            image_url: s.image_url,
        })
        .collect();

    let field_scores: Vec<FieldScore> = response
        .field_scores
        .unwrap_or_default()
        .into_iter()
        .map(|fs| {
            if fs.score == 0 || fs.description.trim().is_empty() {
                let score = score_from_suggestions(&suggestions, &fs.field);
                FieldScore {
                    description: band_description(&fs.field, score),
                    field: fs.field,
                    score,
                }
            } else {
                FieldScore {
                    field: fs.field,
                    score: clamp_score(fs.score),
                    description: fs.description,
                }
            }
        })
        .collect();

    let mut score = response.score.unwrap_or(0);
    if score == 0 && !field_scores.is_empty() {
        let sum: i32 = field_scores.iter().map(|fs| fs.score).sum();
        score = (sum as f64 / field_scores.len() as f64).round() as i32;
    }
    let score = clamp_score(score);

    let feedback = match response.feedback {
        Some(text) if !text.trim().is_empty() => text,
        _ => format!(
            "{} analysis completed. Overall score: {}/100. {} suggestions provided.",
            aspect.label(),
            score,
            suggestions.len()
        ),
    };

    AnalysisResult {
        score,
        suggestions,
        analysis_type: aspect,
        feedback,
        field_scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ModelResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_repair_backfills_zero_field_score_from_suggestions() {
        let response = parse(json!({
            "score": 0,
            "fieldScores": [
                {"field": "Product Title", "score": 0, "description": ""},
                {"field": "Product Description", "score": 90, "description": "solid copy"}
            ],
            "suggestions": [
                {"type": "title", "priority": "high", "field": "Product Title",
                 "current": "Shirt", "suggested": "Organic Cotton Shirt - Soft Everyday Tee",
                 "reason": "too short", "impact": "better CTR"}
            ],
            "feedback": "ok"
        }));

        let result = repair(AnalysisType::ProductContent, "p1", response);
        assert_eq!(result.field_scores[0].score, 45);
        assert_eq!(
            result.field_scores[0].description,
            "Product Title needs significant improvement"
        );
        assert_eq!(result.field_scores[1].score, 90);
        // overall backfilled as mean of repaired field scores
        assert_eq!(result.score, 68);
    }

    #[test]
    fn test_repair_field_without_suggestions_gets_base_seventy() {
        let response = parse(json!({
            "score": 0,
            "fieldScores": [{"field": "SEO Title", "score": 0, "description": ""}],
            "suggestions": [],
            "feedback": ""
        }));

        let result = repair(AnalysisType::SeoMetadata, "p1", response);
        assert_eq!(result.field_scores[0].score, 70);
        assert_eq!(
            result.field_scores[0].description,
            "SEO Title needs minor optimization"
        );
        assert_eq!(result.score, 70);
        assert_eq!(
            result.feedback,
            "SEO metadata analysis completed. Overall score: 70/100. 0 suggestions provided."
        );
    }

    #[test]
    fn test_repair_medium_priority_yields_sixty_five() {
        let response = parse(json!({
            "score": 80,
            "fieldScores": [{"field": "Meta Description", "score": 0, "description": ""}],
            "suggestions": [
                {"type": "meta-description", "priority": "medium", "field": "Meta Description",
                 "current": "a", "suggested": "b", "reason": "short", "impact": "snippet"}
            ],
            "feedback": "ok"
        }));

        let result = repair(AnalysisType::SeoMetadata, "p1", response);
        assert_eq!(result.field_scores[0].score, 65);
        assert_eq!(result.score, 80);
    }

    #[test]
    fn test_repair_clamps_out_of_range_scores() {
        let response = parse(json!({
            "score": 140,
            "fieldScores": [{"field": "Product Title", "score": 130, "description": "great"}],
            "suggestions": [],
            "feedback": "ok"
        }));

        let result = repair(AnalysisType::ProductContent, "p1", response);
        assert_eq!(result.score, 100);
        assert_eq!(result.field_scores[0].score, 100);
    }

    #[test]
    fn test_repair_assigns_uniform_suggestion_ids() {
        let response = parse(json!({
            "score": 50,
            "fieldScores": [],
            "suggestions": [
                {"type": "alt-text", "priority": "low", "field": "Image 1 Alt Text",
                 "current": "", "suggested": "Red shirt on a table", "reason": "missing", "impact": "a11y"}
            ],
            "feedback": "ok"
        }));

        let result = repair(AnalysisType::Images, "p9", response);
        assert_eq!(result.suggestions[0].id, "images:p9:image-1-alt-text:0");
    }

    #[test]
    fn test_strict_gate_rejects_placeholder_feedback() {
        let response = parse(json!({
            "score": 70,
            "fieldScores": [{"field": "x", "score": 70, "description": "d"}],
            "suggestions": [],
            "feedback": "Analysis in progress"
        }));
        assert!(validate_strict(&response).is_err());
    }

    #[test]
    fn test_strict_gate_rejects_zero_score_without_field_scores() {
        let response = parse(json!({
            "score": 0,
            "fieldScores": [],
            "suggestions": [],
            "feedback": "done"
        }));
        assert!(validate_strict(&response).is_err());
    }

    #[test]
    fn test_strict_gate_rejects_missing_sections() {
        let response = parse(json!({"score": 70}));
        assert!(validate_strict(&response).is_err());
    }

    #[test]
    fn test_strict_gate_accepts_complete_response() {
        let response = parse(json!({
            "score": 70,
            "fieldScores": [{"field": "x", "score": 70, "description": "d"}],
            "suggestions": [],
            "feedback": "done"
        }));
        assert!(validate_strict(&response).is_ok());
    }
}
