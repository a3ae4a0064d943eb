//! Shared prompt scaffolding for the analysis workers
//!
//! Each worker concatenates its role persona with the common formatting
//! contract, then appends the brand-voice fragment when one is supplied.

use seoscan_core::BrandContext;

/// JSON shape every worker asks the backend to produce
pub const RESPONSE_SCHEMA: &str = r#"{
  "score": <integer 0-100, overall score for this aspect>,
  "fieldScores": [
    {"field": <string, exact field name given in the task>, "score": <integer 0-100>, "description": <string>}
  ],
  "suggestions": [
    {"type": <"title"|"description"|"meta-description"|"alt-text"|"structured-data"|"metafield"|"keywords"|"duplicate-content">,
     "priority": <"high"|"medium"|"low">,
     "field": <string>,
     "current": <string, the content as it is now>,
     "suggested": <string, the concrete replacement content - never an instruction>,
     "reason": <string>,
     "impact": <string>}
  ],
  "feedback": <string, short prose summary of this aspect>
}"#;

/// Formatting rules shared by all four workers
const FORMAT_INSTRUCTIONS: &str = "Score each named field from 0 to 100 and provide concrete, \
ready-to-use replacement content in every suggestion. Never suggest that content should be \
written; write it. Keep feedback to two sentences.";

/// Build the system instruction: persona, formatting contract, optional brand voice
pub fn build_system(persona: &str, brand: Option<&BrandContext>) -> String {
    let mut system = format!("{} {}", persona, FORMAT_INSTRUCTIONS);
    if let Some(brand) = brand {
        system.push(' ');
        system.push_str(&brand.prompt_fragment());
    }
    system
}
