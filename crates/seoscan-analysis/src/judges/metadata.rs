//! SEO metadata judge: SEO title and meta description

use crate::input::SeoMetadataInput;
use crate::judges::{fallback_feedback, mean_score, truncate_with_ellipsis};
use crate::report::{
    suggestion_id, AnalysisResult, AnalysisType, FieldScore, Priority, Suggestion, SuggestionType,
};
use crate::schema::band_description;
use crate::worker::AspectJudge;

const SEO_TITLE_FIELD: &str = "SEO Title";
const META_DESCRIPTION_FIELD: &str = "Meta Description";

/// Judges the SEO title (30-60 characters) and the meta description
/// (120-160 characters ideal for SERP snippet display)
pub struct MetadataJudge;

impl AspectJudge for MetadataJudge {
    type Input = SeoMetadataInput;

    fn aspect(&self) -> AnalysisType {
        AnalysisType::SeoMetadata
    }

    fn persona(&self) -> &'static str {
        "You are a technical SEO specialist who judges page titles and meta \
        descriptions for search result snippet quality."
    }

    fn task_prompt(&self, _product_id: &str, input: &Self::Input) -> String {
        format!(
            "Analyze this product's SEO metadata. Score the fields \"{}\" and \"{}\".\n\
            SEO title (ideal 30-60 characters): {}\n\
            Meta description (ideal 120-160 characters): {}",
            SEO_TITLE_FIELD, META_DESCRIPTION_FIELD, input.seo_title, input.seo_description
        )
    }

    fn heuristic(&self, product_id: &str, input: &Self::Input) -> AnalysisResult {
        let mut suggestions = Vec::new();

        let title_len = input.seo_title.chars().count();
        let title_score = if input.seo_title.trim().is_empty() {
            suggestions.push(Suggestion {
                id: suggestion_id(self.aspect(), product_id, SEO_TITLE_FIELD, suggestions.len()),
                suggestion_type: SuggestionType::Title,
                priority: Priority::High,
                field: SEO_TITLE_FIELD.to_string(),
                current: input.seo_title.clone(),
                suggested: "Shop Quality Products Online | Fast, Free Shipping".to_string(),
                reason: "No SEO title is set, so search engines fall back to the page title"
                    .to_string(),
                impact: "A dedicated SEO title is the strongest on-page ranking signal"
                    .to_string(),
                image_url: None,
            });
            25
        } else if !(30..=60).contains(&title_len) {
            let suggested = if title_len < 30 {
                format!("{} | Shop Online Today", input.seo_title)
            } else {
                truncate_with_ellipsis(&input.seo_title, 57)
            };
            suggestions.push(Suggestion {
                id: suggestion_id(self.aspect(), product_id, SEO_TITLE_FIELD, suggestions.len()),
                suggestion_type: SuggestionType::Title,
                priority: Priority::High,
                field: SEO_TITLE_FIELD.to_string(),
                current: input.seo_title.clone(),
                suggested,
                reason: "SEO title is outside the 30-60 character range shown in search results"
                    .to_string(),
                impact: "Titles in range display fully and earn more clicks".to_string(),
                image_url: None,
            });
            60
        } else {
            75
        };

        let description_len = input.seo_description.chars().count();
        let description_score = if input.seo_description.trim().is_empty() {
            suggestions.push(Suggestion {
                id: suggestion_id(
                    self.aspect(),
                    product_id,
                    META_DESCRIPTION_FIELD,
                    suggestions.len(),
                ),
                suggestion_type: SuggestionType::MetaDescription,
                priority: Priority::High,
                field: META_DESCRIPTION_FIELD.to_string(),
                current: input.seo_description.clone(),
                suggested: "Browse our collection of quality products with fast, free shipping, \
                    easy 30-day returns, and dedicated customer support on every order."
                    .to_string(),
                reason: "No meta description is set, so search engines improvise the snippet"
                    .to_string(),
                impact: "A written snippet materially improves click-through rate".to_string(),
                image_url: None,
            });
            30
        } else if !(120..=160).contains(&description_len) {
            let suggested = if description_len < 120 {
                format!(
                    "{} Enjoy fast shipping, easy returns, and dedicated support on every order.",
                    input.seo_description
                )
            } else {
                truncate_with_ellipsis(&input.seo_description, 157)
            };
            suggestions.push(Suggestion {
                id: suggestion_id(
                    self.aspect(),
                    product_id,
                    META_DESCRIPTION_FIELD,
                    suggestions.len(),
                ),
                suggestion_type: SuggestionType::MetaDescription,
                priority: Priority::Medium,
                field: META_DESCRIPTION_FIELD.to_string(),
                current: input.seo_description.clone(),
                suggested,
                reason: "Meta description is outside the 120-160 character snippet range"
                    .to_string(),
                impact: "In-range snippets display fully without truncation".to_string(),
                image_url: None,
            });
            65
        } else {
            75
        };

        let score = mean_score(&[title_score, description_score]);

        AnalysisResult {
            score,
            feedback: fallback_feedback(self.aspect().label(), score, suggestions.len()),
            suggestions,
            analysis_type: self.aspect(),
            field_scores: vec![
                FieldScore {
                    field: SEO_TITLE_FIELD.to_string(),
                    score: title_score,
                    description: band_description(SEO_TITLE_FIELD, title_score),
                },
                FieldScore {
                    field: META_DESCRIPTION_FIELD.to_string(),
                    score: description_score,
                    description: band_description(META_DESCRIPTION_FIELD, description_score),
                },
            ],
        }
    }
}
