//! Image judge: alt text quality and URL SEO-friendliness

use regex::Regex;

use crate::input::ImageInput;
use crate::judges::{fallback_feedback, mean_score, truncate_with_ellipsis};
use crate::report::{
    suggestion_id, AnalysisResult, AnalysisType, FieldScore, Priority, Suggestion, SuggestionType,
};
use crate::schema::band_description;
use crate::worker::AspectJudge;

const OVERALL_FIELD: &str = "Overall Image Quality";

/// Judges each image's alt text (presence, 10-125 character range,
/// descriptive-word heuristics) and its URL's SEO-friendliness
///
/// This judge runs the strict response gate: the image prompt is the one the
/// backend most often answers with placeholder text, so malformed responses
/// are rejected and routed to the heuristic.
pub struct ImageJudge {
    descriptive_re: Regex,
}

impl ImageJudge {
    pub fn new() -> Self {
        Self {
            descriptive_re: Regex::new(
                r"(?i)\b(shows|displays|features|contains|depicts|illustrates)\b",
            )
            .unwrap(),
        }
    }

    /// Score a URL for SEO-friendliness: named product paths beat generic
    /// CDN file dumps
    ///
    /// The numeric-suffix match needs at least two digits; a single digit
    /// appears in almost any CDN filename and carries no signal.
    fn url_score(&self, product_id: &str, url: &str) -> i32 {
        let numeric_suffix: String = product_id
            .chars()
            .rev()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .chars()
            .rev()
            .collect();

        if url.contains("product")
            || (numeric_suffix.len() >= 2 && url.contains(&numeric_suffix))
        {
            85
        } else if url.contains("/files/") && (url.ends_with(".png") || url.ends_with(".jpg")) {
            60
        } else {
            40
        }
    }
}

impl Default for ImageJudge {
    fn default() -> Self {
        Self::new()
    }
}

impl AspectJudge for ImageJudge {
    type Input = Vec<ImageInput>;

    fn aspect(&self) -> AnalysisType {
        AnalysisType::Images
    }

    fn persona(&self) -> &'static str {
        "You are an image SEO and accessibility specialist who judges product \
        image alt text and file URLs."
    }

    fn task_prompt(&self, _product_id: &str, input: &Self::Input) -> String {
        let mut task = String::from(
            "Analyze these product images. For image N, score the fields \
            \"Image N Alt Text\" and \"Image N URL\", then add an \
            \"Overall Image Quality\" field score.\n",
        );
        for (i, image) in input.iter().enumerate() {
            task.push_str(&format!(
                "Image {}: alt text (ideal 10-125 characters): {:?}, url: {}\n",
                i + 1,
                image.alt_text,
                image.image_url.as_deref().unwrap_or("(none)")
            ));
        }
        task
    }

    fn strict_gate(&self) -> bool {
        true
    }

    fn heuristic(&self, product_id: &str, input: &Self::Input) -> AnalysisResult {
        let mut suggestions = Vec::new();
        let mut field_scores = Vec::new();

        for (i, image) in input.iter().enumerate() {
            let alt_field = format!("Image {} Alt Text", i + 1);
            let alt_len = image.alt_text.chars().count();

            let alt_score = if image.alt_text.trim().is_empty() {
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, &alt_field, suggestions.len()),
                    suggestion_type: SuggestionType::AltText,
                    priority: Priority::High,
                    field: alt_field.clone(),
                    current: image.alt_text.clone(),
                    suggested: "Product photo showing the item's design, color, and key details"
                        .to_string(),
                    reason: "Image has no alt text, which hurts both accessibility and image search"
                        .to_string(),
                    impact: "Alt text is required for image search indexing and screen readers"
                        .to_string(),
                    image_url: image.image_url.clone(),
                });
                20
            } else if alt_len < 10 {
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, &alt_field, suggestions.len()),
                    suggestion_type: SuggestionType::AltText,
                    priority: Priority::Medium,
                    field: alt_field.clone(),
                    current: image.alt_text.clone(),
                    suggested: format!(
                        "Product photo showing {} in detail",
                        image.alt_text.trim()
                    ),
                    reason: "Alt text is under 10 characters and says little about the image"
                        .to_string(),
                    impact: "Descriptive alt text improves image search rankings".to_string(),
                    image_url: image.image_url.clone(),
                });
                60
            } else if alt_len > 125 {
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, &alt_field, suggestions.len()),
                    suggestion_type: SuggestionType::AltText,
                    priority: Priority::Low,
                    field: alt_field.clone(),
                    current: image.alt_text.clone(),
                    suggested: truncate_with_ellipsis(&image.alt_text, 120),
                    reason: "Alt text is over 125 characters; screen readers truncate long text"
                        .to_string(),
                    impact: "Concise alt text reads better and loses nothing in search".to_string(),
                    image_url: image.image_url.clone(),
                });
                75
            } else if self.descriptive_re.is_match(&image.alt_text) {
                85
            } else {
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, &alt_field, suggestions.len()),
                    suggestion_type: SuggestionType::AltText,
                    priority: Priority::Low,
                    field: alt_field.clone(),
                    current: image.alt_text.clone(),
                    suggested: format!("Image shows {}", image.alt_text.trim()),
                    reason: "Alt text lacks a descriptive verb anchoring what the image depicts"
                        .to_string(),
                    impact: "Descriptive phrasing helps search engines understand the image"
                        .to_string(),
                    image_url: image.image_url.clone(),
                });
                70
            };

            field_scores.push(FieldScore {
                description: band_description(&alt_field, alt_score),
                field: alt_field,
                score: alt_score,
            });

            if let Some(url) = &image.image_url {
                let url_field = format!("Image {} URL", i + 1);
                let url_score = self.url_score(product_id, url);
                field_scores.push(FieldScore {
                    description: band_description(&url_field, url_score),
                    field: url_field,
                    score: url_score,
                });
            }
        }

        let per_image_scores: Vec<i32> = field_scores.iter().map(|fs| fs.score).collect();
        let overall = if per_image_scores.is_empty() {
            50
        } else {
            mean_score(&per_image_scores)
        };

        field_scores.push(FieldScore {
            field: OVERALL_FIELD.to_string(),
            score: overall,
            description: if input.is_empty() {
                "No product images to evaluate".to_string()
            } else {
                band_description(OVERALL_FIELD, overall)
            },
        });

        AnalysisResult {
            score: overall,
            feedback: fallback_feedback(self.aspect().label(), overall, suggestions.len()),
            suggestions,
            analysis_type: self.aspect(),
            field_scores,
        }
    }
}
