//! Clarifying-question generation and budget validation.
//!
//! The planner prefers the local category heuristics; only when those have
//! nothing to say does it ask the model, and a model that misbehaves
//! produces an empty question list rather than an error. Budget validation
//! speaks in the fixed `REALISTIC` / `LOW $N` sentinel strings and fails
//! open on anything else.

use regex::Regex;

use crate::analyze::{analyze_query, Category};
use crate::api::ModelClient;
use crate::extract::{parse_array, ModelJson};
use crate::product::{ClarifyingQuestion, QuestionKind};

/// Most clarifying questions ever put to the user in one session.
const MAX_QUESTIONS: usize = 3;

/// Sentinel for a budget within the typical range.
pub const BUDGET_REALISTIC: &str = "REALISTIC";

/// Outcome of parsing a budget-validation sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetCheck {
    Realistic,
    Low { suggested_minimum: Option<u32> },
}

/// Generates clarifying questions, locally when possible and via the model
/// otherwise. Never fails outward.
pub struct QuestionPlanner<'a> {
    model: &'a ModelClient,
}

impl<'a> QuestionPlanner<'a> {
    pub fn new(model: &'a ModelClient) -> Self {
        Self { model }
    }

    /// Up to three typed questions for the query. The empty vec means "no
    /// clarification available" and is not an error.
    pub async fn generate(&self, query: &str, budget: Option<f64>) -> Vec<ClarifyingQuestion> {
        let analysis = analyze_query(query, budget);

        if !analysis.suggested_questions.is_empty() {
            return analysis
                .suggested_questions
                .iter()
                .map(|text| shape_question(text, analysis.category))
                .collect();
        }

        self.generate_via_model(query, budget).await
    }

    async fn generate_via_model(&self, query: &str, budget: Option<f64>) -> Vec<ClarifyingQuestion> {
        let budget_line = match budget {
            Some(budget) if budget > 0.0 => format!("Their budget is: ${}", budget),
            _ => "They have not stated a budget.".to_string(),
        };
        let prompt = format!(
            "A user is looking to buy: {query}\n\
             {budget_line}\n\n\
             Generate 1-3 questions that would help determine the best product \
             recommendation. Only include questions that are necessary - if you \
             already have enough information to make a good recommendation, \
             include fewer questions. These questions should:\n\
             1. Focus on the most important parameters for this product category\n\
             2. Help clarify the specific use case and requirements\n\
             3. Cover different aspects (not redundant)\n\
             4. Consider the budget constraints when generating questions\n\n\
             Format your response as a JSON array of objects with 'question' and \
             'type' fields. The 'type' should be one of: 'multiple_choice', \
             'open_ended', or 'boolean'. For multiple_choice, include an \
             'options' array.\n\n\
             Return ONLY the JSON array, with no markdown formatting, no \
             backticks, and no explanations."
        );

        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(_) => return Vec::new(),
        };

        match parse_array::<ClarifyingQuestion>(&reply) {
            ModelJson::Parsed(questions) => questions
                .into_iter()
                .filter(|question| {
                    question.kind != QuestionKind::MultipleChoice || !question.options.is_empty()
                })
                .take(MAX_QUESTIONS)
                .collect(),
            ModelJson::Unparsed(_) => Vec::new(),
        }
    }
}

/// Check a budget against the typical range for the query's category.
/// Returns one of the two sentinel strings.
pub fn validate_budget(query: &str, budget: f64) -> String {
    let analysis = analyze_query(query, None);
    if budget < analysis.price_range.min {
        format!("LOW ${}", analysis.price_range.min as u32)
    } else {
        BUDGET_REALISTIC.to_string()
    }
}

/// Parse a budget-validation sentinel. Anything that is not a recognizable
/// `LOW` sentinel counts as realistic so a misbehaving model never blocks
/// the flow.
pub fn parse_budget_feedback(feedback: &str) -> BudgetCheck {
    if !feedback.starts_with("LOW") {
        return BudgetCheck::Realistic;
    }

    let suggested_minimum = Regex::new(r"\$(\d+)")
        .ok()
        .and_then(|re| re.captures(feedback).and_then(|c| c.get(1).map(|m| m.as_str().to_string())))
        .and_then(|digits| digits.parse().ok());
    BudgetCheck::Low { suggested_minimum }
}

/// Give a suggested question the type and options its phrasing implies.
fn shape_question(text: &str, category: Category) -> ClarifyingQuestion {
    let lower = text.to_lowercase();

    if lower.contains("how much") || lower.contains("how many") {
        ClarifyingQuestion::open_ended(text)
    } else if lower.contains("do you") || lower.contains("are you") || lower.contains("would you") {
        ClarifyingQuestion::boolean(text)
    } else {
        ClarifyingQuestion::multiple_choice(text, options_for(&lower, category))
    }
}

fn options_for(lower: &str, category: Category) -> Vec<String> {
    if lower.contains("use") || lower.contains("purpose") {
        if category == Category::Computers {
            return strings(&[
                "Everyday browsing and office work",
                "Gaming",
                "Video/photo editing",
                "Programming/development",
                "Business/professional use",
            ]);
        }
        if category == Category::Electronics && lower.contains("phone") {
            return strings(&[
                "Social media and communication",
                "Photography and video",
                "Gaming",
                "Business/professional use",
                "Basic usage (calls, texts, light apps)",
            ]);
        }
    }

    if lower.contains("coffee") {
        if lower.contains("type") {
            return strings(&[
                "Drip coffee maker",
                "Espresso machine",
                "Single-serve pod machine",
                "French press",
                "Pour-over system",
            ]);
        }
        if lower.contains("cups") || lower.contains("brew") {
            return strings(&[
                "Just for myself (1-2 cups)",
                "Small household (3-4 cups)",
                "Family size (5-10 cups)",
                "Large quantity (10+ cups)",
            ]);
        }
    }

    if category == Category::Computers && lower.contains("storage") {
        return strings(&[
            "256GB SSD",
            "512GB SSD",
            "1TB SSD",
            "1TB HDD",
            "Combination of SSD and HDD",
        ]);
    }
    if category == Category::Computers && lower.contains("ram") {
        return strings(&["4GB", "8GB", "16GB", "32GB or more"]);
    }

    strings(&["Option 1", "Option 2", "Option 3", "Option 4"])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_how_much_questions_are_open_ended() {
        let question = shape_question("How much RAM do you need?", Category::Computers);
        assert_eq!(question.kind, QuestionKind::OpenEnded);
        assert!(question.options.is_empty());
    }

    #[test]
    fn test_do_you_questions_are_boolean() {
        let question = shape_question("Do you need 5G connectivity?", Category::Electronics);
        assert_eq!(question.kind, QuestionKind::Boolean);

        let question = shape_question("Would you like a thermal carafe?", Category::HomeKitchen);
        assert_eq!(question.kind, QuestionKind::Boolean);
    }

    #[test]
    fn test_computer_use_case_options() {
        let question = shape_question(
            "What will you primarily use this computer for?",
            Category::Computers,
        );
        assert_eq!(question.kind, QuestionKind::MultipleChoice);
        assert!(question.options.contains(&"Gaming".to_string()));
        assert_eq!(question.options.len(), 5);
    }

    #[test]
    fn test_coffee_type_options() {
        let question = shape_question(
            "What type of coffee maker are you looking for?",
            Category::HomeKitchen,
        );
        assert!(question.options.contains(&"Espresso machine".to_string()));
    }

    #[test]
    fn test_generic_question_gets_placeholder_options() {
        let question = shape_question("Which color scheme?", Category::SmartHome);
        assert_eq!(
            question.options,
            vec!["Option 1", "Option 2", "Option 3", "Option 4"]
        );
    }

    #[test]
    fn test_validate_budget_sentinels() {
        // Gaming laptops start at $800.
        assert_eq!(validate_budget("gaming laptop", 500.0), "LOW $800");
        assert_eq!(validate_budget("gaming laptop", 1200.0), "REALISTIC");
        // No intrinsic minimum for unrecognized categories.
        assert_eq!(validate_budget("garden hose", 5.0), "REALISTIC");
    }

    #[test]
    fn test_parse_budget_feedback_round_trip() {
        assert_eq!(
            parse_budget_feedback("LOW $450"),
            BudgetCheck::Low {
                suggested_minimum: Some(450)
            }
        );
        assert_eq!(
            parse_budget_feedback("LOW"),
            BudgetCheck::Low {
                suggested_minimum: None
            }
        );
        assert_eq!(parse_budget_feedback("REALISTIC"), BudgetCheck::Realistic);
        // Fail open: unrecognized model output never blocks the flow.
        assert_eq!(
            parse_budget_feedback("your budget seems fine to me"),
            BudgetCheck::Realistic
        );
    }
}
