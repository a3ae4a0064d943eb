//! Product content judge: title and description quality

use crate::input::ProductContentInput;
use crate::judges::{fallback_feedback, mean_score, truncate_with_ellipsis};
use crate::report::{
    suggestion_id, AnalysisResult, AnalysisType, FieldScore, Priority, Suggestion, SuggestionType,
};
use crate::schema::band_description;
use crate::transformer::NO_DESCRIPTION;
use crate::worker::AspectJudge;

const TITLE_FIELD: &str = "Product Title";
const DESCRIPTION_FIELD: &str = "Product Description";

/// Judges the customer-facing title (30-60 characters ideal) and the
/// plain-text description (presence, length, engagement)
pub struct ContentJudge;

impl AspectJudge for ContentJudge {
    type Input = ProductContentInput;

    fn aspect(&self) -> AnalysisType {
        AnalysisType::ProductContent
    }

    fn persona(&self) -> &'static str {
        "You are an expert e-commerce copywriter and SEO consultant who judges \
        product titles and descriptions for search visibility and customer engagement."
    }

    fn task_prompt(&self, _product_id: &str, input: &Self::Input) -> String {
        let mut task = format!(
            "Analyze this product's content. Score the fields \"{}\" and \"{}\".\n\
            Title (ideal 30-60 characters): {}\n\
            Description: {}",
            TITLE_FIELD, DESCRIPTION_FIELD, input.title, input.description
        );
        if let Some(prior) = &input.prior_analysis {
            task.push_str(&format!(
                "\nPrior analysis scored {}/100 on {}.",
                prior.score,
                prior.analyzed_at.format("%Y-%m-%d")
            ));
        }
        task
    }

    fn heuristic(&self, product_id: &str, input: &Self::Input) -> AnalysisResult {
        let mut suggestions = Vec::new();

        let title_len = input.title.chars().count();
        let title_score = if title_len < 30 {
            let suggested = if input.title.is_empty() {
                "Premium Quality Product - Shop the Collection".to_string()
            } else {
                format!("{} - Premium Quality, Built to Last", input.title)
            };
            suggestions.push(Suggestion {
                id: suggestion_id(self.aspect(), product_id, TITLE_FIELD, suggestions.len()),
                suggestion_type: SuggestionType::Title,
                priority: Priority::High,
                field: TITLE_FIELD.to_string(),
                current: input.title.clone(),
                suggested,
                reason: "Title is shorter than 30 characters, which limits search visibility"
                    .to_string(),
                impact: "Longer, descriptive titles rank for more queries and improve click-through"
                    .to_string(),
                image_url: None,
            });
            45
        } else if title_len > 60 {
            suggestions.push(Suggestion {
                id: suggestion_id(self.aspect(), product_id, TITLE_FIELD, suggestions.len()),
                suggestion_type: SuggestionType::Title,
                priority: Priority::Medium,
                field: TITLE_FIELD.to_string(),
                current: input.title.clone(),
                suggested: truncate_with_ellipsis(&input.title, 57),
                reason: "Title exceeds 60 characters and will be cut off in search results"
                    .to_string(),
                impact: "A concise title keeps the full message visible in the SERP".to_string(),
                image_url: None,
            });
            65
        } else {
            80
        };

        let description_missing =
            input.description.trim().is_empty() || input.description == NO_DESCRIPTION;
        let description_len = input.description.chars().count();
        let description_score = if description_missing {
            suggestions.push(Suggestion {
                id: suggestion_id(
                    self.aspect(),
                    product_id,
                    DESCRIPTION_FIELD,
                    suggestions.len(),
                ),
                suggestion_type: SuggestionType::Description,
                priority: Priority::High,
                field: DESCRIPTION_FIELD.to_string(),
                current: input.description.clone(),
                suggested: format!(
                    "Discover {}. Thoughtfully designed and built from quality materials, \
                    it fits seamlessly into your everyday routine. Order today and enjoy \
                    fast shipping with easy returns.",
                    if input.title.is_empty() {
                        "this product"
                    } else {
                        &input.title
                    }
                ),
                reason: "Product has no description, so search engines have nothing to index"
                    .to_string(),
                impact: "Descriptions are a primary ranking signal for product pages".to_string(),
                image_url: None,
            });
            20
        } else if description_len < 100 {
            suggestions.push(Suggestion {
                id: suggestion_id(
                    self.aspect(),
                    product_id,
                    DESCRIPTION_FIELD,
                    suggestions.len(),
                ),
                suggestion_type: SuggestionType::Description,
                priority: Priority::Medium,
                field: DESCRIPTION_FIELD.to_string(),
                current: input.description.clone(),
                suggested: format!(
                    "{} Enjoy fast shipping, easy returns, and dedicated customer support \
                    on every order.",
                    input.description
                ),
                reason: "Description is under 100 characters and gives little for search engines \
                    or shoppers to work with"
                    .to_string(),
                impact: "Richer descriptions improve rankings and conversion".to_string(),
                image_url: None,
            });
            50
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
                    field: TITLE_FIELD.to_string(),
                    score: title_score,
                    description: band_description(TITLE_FIELD, title_score),
                },
                FieldScore {
                    field: DESCRIPTION_FIELD.to_string(),
                    score: description_score,
                    description: band_description(DESCRIPTION_FIELD, description_score),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, description: &str) -> ProductContentInput {
        ProductContentInput {
            product_id: "p1".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            suggestion_history: Vec::new(),
            prior_analysis: None,
        }
    }

    #[test]
    fn test_empty_title_and_missing_description() {
        let result = ContentJudge.heuristic("p1", &input("", NO_DESCRIPTION));

        assert_eq!(result.field_scores[0].score, 45);
        assert_eq!(result.field_scores[1].score, 20);
        assert_eq!(result.score, 33);
        assert_eq!(result.suggestions.len(), 2);
        assert_eq!(result.suggestions[0].priority, Priority::High);
        assert_eq!(result.suggestions[0].id, "content:p1:product-title:0");
        assert!(result.feedback.starts_with("Fallback analysis:"));
    }

    #[test]
    fn test_good_title_and_description() {
        let result = ContentJudge.heuristic(
            "p1",
            &input(
                "Organic Cotton Crew Neck T-Shirt - Navy",
                &"A well-made shirt. ".repeat(8),
            ),
        );

        assert_eq!(result.field_scores[0].score, 80);
        assert_eq!(result.field_scores[1].score, 75);
        assert_eq!(result.score, 78);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_long_title_gets_medium_suggestion() {
        let long_title = "Ultra Premium Deluxe Organic Cotton Crew Neck T-Shirt in Navy Blue XXL";
        let result = ContentJudge.heuristic("p1", &input(long_title, &"d".repeat(120)));

        assert_eq!(result.field_scores[0].score, 65);
        assert_eq!(result.suggestions.len(), 1);
        assert_eq!(result.suggestions[0].priority, Priority::Medium);
        assert!(result.suggestions[0].suggested.ends_with("..."));
    }

    #[test]
    fn test_short_description_scores_fifty() {
        let result = ContentJudge.heuristic(
            "p1",
            &input("Organic Cotton Crew Neck T-Shirt - Navy", "Nice shirt."),
        );

        assert_eq!(result.field_scores[1].score, 50);
        assert_eq!(result.score, 65);
    }

    #[test]
    fn test_heuristic_is_idempotent() {
        let judge_input = input("", "");
        let first = ContentJudge.heuristic("p1", &judge_input);
        let second = ContentJudge.heuristic("p1", &judge_input);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
