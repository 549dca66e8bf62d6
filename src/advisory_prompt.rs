//! Assembly of the advisory request sent to the text-generation collaborator.
//!
//! Pure text construction: the builder names the crop, the five guidance
//! topics, and the measured parameters. It never translates anything itself;
//! for the alternate language it only instructs the downstream generator.

use crate::feature_pipeline::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Response language requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Te,
}

impl Language {
    fn instruction(self) -> Option<&'static str> {
        match self {
            Language::En => None,
            Language::Te => Some("Please provide the response in Telugu language."),
        }
    }
}

/// Build the structured advisory prompt for `crop`.
///
/// The output always contains the crop name and all seven feature values
/// formatted to one decimal place; when `follow_up` is present the prompt
/// ends with it.
pub fn build_prompt(
    crop: &str,
    features: &FeatureVector,
    language: Language,
    follow_up: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Provide detailed agricultural guidance for {crop} cultivation, focusing on:\n\
         1. Optimal cultivation process\n\
         2. Recommended fertilizers\n\
         3. Pest prevention strategies\n\
         4. Best cultivation seasons\n\
         5. Key growth requirements\n"
    );

    if let Some(instruction) = language.instruction() {
        prompt.push('\n');
        prompt.push_str(instruction);
        prompt.push('\n');
    }

    let values = features.as_array();
    let _ = write!(
        prompt,
        "\nDetailed Soil and Environmental Parameters:\n\
         - Nitrogen: {:.1}\n\
         - Phosphorus: {:.1}\n\
         - Potassium: {:.1}\n\
         - Temperature: {:.1}°C\n\
         - Humidity: {:.1}%\n\
         - pH: {:.1}\n\
         - Rainfall: {:.1} mm\n\
         \nProvide comprehensive agricultural insights taking these specific parameters into account.",
        values[0], values[1], values[2], values[3], values[4], values[5], values[6]
    );

    if let Some(question) = follow_up {
        let _ = write!(prompt, "\n\nLatest User Query: {question}");
    }

    prompt
}
