//! Metafields judge: title-tag and description-tag metafield quality

use crate::input::MetafieldInput;
use crate::judges::{fallback_feedback, mean_score};
use crate::report::{
    clamp_score, suggestion_id, AnalysisResult, AnalysisType, FieldScore, Priority, Suggestion,
    SuggestionType,
};
use crate::schema::band_description;
use crate::worker::AspectJudge;

const METAFIELDS_FIELD: &str = "SEO Metafields";
const STRUCTURED_DATA_FIELD: &str = "Structured Data";
const SCHEMA_MARKUP_FIELD: &str = "Schema Markup";

const METAFIELDS_BASELINE: i32 = 85;
const STRUCTURED_DATA_BASELINE: i32 = 80;
const SCHEMA_MARKUP_BASELINE: i32 = 75;

/// Whether a metafield value has the shape of a title tag: short prose,
/// no markup
pub fn is_likely_title_tag(value: &str) -> bool {
    let len = value.chars().count();
    (10..=100).contains(&len) && !value.contains('<')
}

/// Whether a metafield value has the shape of a description tag: longer
/// prose, no embedded script/style
pub fn is_likely_description_tag(value: &str) -> bool {
    value.chars().count() > 50 && !value.contains("<script") && !value.contains("<style")
}

/// Judges presence and quality of title-tag-like and description-tag-like
/// metafields, plus derived structured-data/schema-markup readiness
pub struct MetafieldJudge;

impl MetafieldJudge {
    /// Key substring matches win over value-shape matches across the whole
    /// list; otherwise a well-keyed description tag earlier in the list gets
    /// claimed as the title tag by its value shape alone.
    fn find_title_tag<'a>(metafields: &'a [MetafieldInput]) -> Option<&'a MetafieldInput> {
        metafields
            .iter()
            .find(|m| m.key.to_lowercase().contains("title"))
            .or_else(|| metafields.iter().find(|m| is_likely_title_tag(&m.value)))
    }

    fn find_description_tag<'a>(
        metafields: &'a [MetafieldInput],
        title_tag: Option<&MetafieldInput>,
    ) -> Option<&'a MetafieldInput> {
        let not_title = |m: &&MetafieldInput| title_tag.map_or(true, |t| !std::ptr::eq(*m, t));
        metafields
            .iter()
            .filter(not_title)
            .find(|m| m.key.to_lowercase().contains("description"))
            .or_else(|| {
                metafields
                    .iter()
                    .filter(not_title)
                    .find(|m| is_likely_description_tag(&m.value))
            })
    }
}

impl AspectJudge for MetafieldJudge {
    type Input = Vec<MetafieldInput>;

    fn aspect(&self) -> AnalysisType {
        AnalysisType::Metafields
    }

    fn persona(&self) -> &'static str {
        "You are a structured-data SEO specialist who judges Shopify metafields \
        used for title tags, description tags, and schema markup."
    }

    fn task_prompt(&self, _product_id: &str, input: &Self::Input) -> String {
        let mut task = format!(
            "Analyze these SEO metafields. Score the fields \"{}\", \"{}\" and \"{}\".\n",
            METAFIELDS_FIELD, STRUCTURED_DATA_FIELD, SCHEMA_MARKUP_FIELD
        );
        if input.is_empty() {
            task.push_str("The product has no SEO-relevant metafields.\n");
        }
        for metafield in input {
            task.push_str(&format!(
                "{}.{}: {:?}\n",
                metafield.namespace, metafield.key, metafield.value
            ));
        }
        task
    }

    fn heuristic(&self, product_id: &str, input: &Self::Input) -> AnalysisResult {
        let mut suggestions = Vec::new();
        let mut metafields_score = METAFIELDS_BASELINE;

        let title_tag = Self::find_title_tag(input);
        match title_tag {
            None => {
                metafields_score -= 25;
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, METAFIELDS_FIELD, suggestions.len()),
                    suggestion_type: SuggestionType::Metafield,
                    priority: Priority::High,
                    field: "global.title_tag".to_string(),
                    current: String::new(),
                    suggested: "Premium Quality Products | Shop Online Today".to_string(),
                    reason: "No title-tag metafield exists, so the page title cannot be \
                        overridden for search"
                        .to_string(),
                    impact: "A dedicated title tag gives direct control over the search snippet"
                        .to_string(),
                    image_url: None,
                });
            }
            Some(tag) if tag.value.chars().count() < 30 => {
                metafields_score -= 15;
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, METAFIELDS_FIELD, suggestions.len()),
                    suggestion_type: SuggestionType::Metafield,
                    priority: Priority::Medium,
                    field: format!("{}.{}", tag.namespace, tag.key),
                    current: tag.value.clone(),
                    suggested: format!("{} | Shop Online Today", tag.value),
                    reason: "Title-tag metafield is under 30 characters".to_string(),
                    impact: "Fuller title tags rank for more queries".to_string(),
                    image_url: None,
                });
            }
            Some(_) => {}
        }

        match Self::find_description_tag(input, title_tag) {
            None => {
                metafields_score -= 25;
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, METAFIELDS_FIELD, suggestions.len()),
                    suggestion_type: SuggestionType::Metafield,
                    priority: Priority::High,
                    field: "global.description_tag".to_string(),
                    current: String::new(),
                    suggested: "Shop our collection of quality products with fast, free \
                        shipping, easy 30-day returns, and dedicated customer support."
                        .to_string(),
                    reason: "No description-tag metafield exists for the search snippet"
                        .to_string(),
                    impact: "A description tag controls what shoppers see before clicking"
                        .to_string(),
                    image_url: None,
                });
            }
            Some(tag) if tag.value.chars().count() < 100 => {
                metafields_score -= 15;
                suggestions.push(Suggestion {
                    id: suggestion_id(self.aspect(), product_id, METAFIELDS_FIELD, suggestions.len()),
                    suggestion_type: SuggestionType::Metafield,
                    priority: Priority::Medium,
                    field: format!("{}.{}", tag.namespace, tag.key),
                    current: tag.value.clone(),
                    suggested: format!(
                        "{} Enjoy fast shipping, easy returns, and dedicated support.",
                        tag.value
                    ),
                    reason: "Description-tag metafield is under 100 characters".to_string(),
                    impact: "Fuller descriptions fill the search snippet".to_string(),
                    image_url: None,
                });
            }
            Some(_) => {}
        }

        // Many open optimization opportunities imply the structured-data
        // story is weak too.
        let opportunities = suggestions.len();
        let structured_score = if opportunities > 3 {
            STRUCTURED_DATA_BASELINE - 20
        } else {
            STRUCTURED_DATA_BASELINE
        };
        let schema_score = if opportunities > 3 {
            SCHEMA_MARKUP_BASELINE - 25
        } else {
            SCHEMA_MARKUP_BASELINE
        };

        let metafields_score = clamp_score(metafields_score);
        let score = mean_score(&[metafields_score, structured_score, schema_score]);

        AnalysisResult {
            score,
            feedback: fallback_feedback(self.aspect().label(), score, suggestions.len()),
            suggestions,
            analysis_type: self.aspect(),
            field_scores: vec![
                FieldScore {
                    field: METAFIELDS_FIELD.to_string(),
                    score: metafields_score,
                    description: band_description(METAFIELDS_FIELD, metafields_score),
                },
                FieldScore {
                    field: STRUCTURED_DATA_FIELD.to_string(),
                    score: structured_score,
                    description: band_description(STRUCTURED_DATA_FIELD, structured_score),
                },
                FieldScore {
                    field: SCHEMA_MARKUP_FIELD.to_string(),
                    score: schema_score,
                    description: band_description(SCHEMA_MARKUP_FIELD, schema_score),
                },
            ],
        }
    }
}
