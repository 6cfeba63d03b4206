//! Shared query heuristics: category detection, keyword and attribute
//! extraction, price-range estimation, and suggested clarifying questions.
//!
//! The question planner, the budget validator, and the mock catalog all
//! read the same analysis so their views of one query agree.

use regex::Regex;

/// Broad product category inferred from the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Computers,
    Electronics,
    SmartHome,
    HomeKitchen,
}

impl Category {
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Computers => "Computers",
            Category::Electronics => "Electronics",
            Category::SmartHome => "Smart Home",
            Category::HomeKitchen => "Home & Kitchen",
        }
    }
}

/// Typical price band for the inferred category, in dollars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Everything the heuristics could read out of one query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnalysis {
    pub category: Category,
    pub keywords: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub suggested_questions: Vec<String>,
    pub price_range: PriceRange,
}

impl QueryAnalysis {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Analyze a free-text shopping query. A positive `budget` overrides the
/// estimated price range to `0..budget`; passing `None` keeps the
/// category-intrinsic range, which is what budget validation needs.
pub fn analyze_query(query: &str, budget: Option<f64>) -> QueryAnalysis {
    let lower = query.to_lowercase();

    let category = detect_category(&lower);
    let keywords = extract_keywords(&lower);
    let attributes = detect_attributes(query, &lower);
    let price_range = estimate_price_range(category, &lower, &attributes, budget);
    let suggested_questions = suggest_questions(category, &lower, &attributes);

    QueryAnalysis {
        category,
        keywords,
        attributes,
        suggested_questions,
        price_range,
    }
}

fn detect_category(lower: &str) -> Category {
    if lower.contains("laptop") || lower.contains("computer") {
        Category::Computers
    } else if lower.contains("phone") || lower.contains("smartphone") {
        Category::Electronics
    } else if lower.contains("coffee") || lower.contains("espresso") {
        Category::HomeKitchen
    } else if lower.contains("smart") || lower.contains("alexa") || lower.contains("speaker") {
        Category::SmartHome
    } else {
        Category::Electronics
    }
}

fn extract_keywords(lower: &str) -> Vec<String> {
    let cleaned = Regex::new(r"[^\w\s]")
        .map(|re| re.replace_all(lower, "").into_owned())
        .unwrap_or_else(|_| lower.to_string());
    cleaned
        .split_whitespace()
        .filter(|word| word.len() > 2)
        .map(str::to_string)
        .collect()
}

fn detect_attributes(query: &str, lower: &str) -> Vec<(String, String)> {
    let mut attributes: Vec<(String, String)> = Vec::new();
    let computer = lower.contains("laptop") || lower.contains("computer");

    if lower.contains("gaming") && computer {
        attributes.push(("Use Case".to_string(), "Gaming".to_string()));
        attributes.push(("Graphics".to_string(), "Dedicated".to_string()));
    }
    if lower.contains("business") && computer {
        attributes.push(("Use Case".to_string(), "Business".to_string()));
    }

    if let Some(captures) = capture(r"(?i)(\d+)\s?GB RAM", query) {
        attributes.push(("RAM".to_string(), format!("{}GB", captures[0])));
    }
    if let Some(captures) = capture(r"(?i)(\d+)\s?(GB|TB) (SSD|HDD)", query) {
        attributes.push((
            "Storage".to_string(),
            format!("{}{} {}", captures[0], captures[1], captures[2]),
        ));
    }

    if lower.contains("espresso") {
        attributes.push(("Type".to_string(), "Espresso Machine".to_string()));
    } else if lower.contains("drip") {
        attributes.push(("Type".to_string(), "Drip Coffee Maker".to_string()));
    } else if lower.contains("single") || lower.contains("k-cup") || lower.contains("pod") {
        attributes.push(("Type".to_string(), "Single Serve".to_string()));
    }

    attributes
}

fn estimate_price_range(
    category: Category,
    lower: &str,
    attributes: &[(String, String)],
    budget: Option<f64>,
) -> PriceRange {
    if let Some(budget) = budget {
        if budget > 0.0 {
            return PriceRange { min: 0.0, max: budget };
        }
    }

    let attribute = |name: &str| {
        attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    match category {
        Category::Computers => match attribute("Use Case") {
            Some("Gaming") => PriceRange { min: 800.0, max: 2500.0 },
            Some("Business") => PriceRange { min: 500.0, max: 1500.0 },
            _ => PriceRange { min: 300.0, max: 2000.0 },
        },
        Category::Electronics if lower.contains("phone") => {
            PriceRange { min: 200.0, max: 1200.0 }
        }
        Category::HomeKitchen if lower.contains("coffee") => match attribute("Type") {
            Some("Espresso Machine") => PriceRange { min: 200.0, max: 800.0 },
            Some("Single Serve") => PriceRange { min: 50.0, max: 200.0 },
            _ => PriceRange { min: 30.0, max: 300.0 },
        },
        _ => PriceRange { min: 0.0, max: 2000.0 },
    }
}

fn suggest_questions(
    category: Category,
    lower: &str,
    attributes: &[(String, String)],
) -> Vec<String> {
    let has = |name: &str| attributes.iter().any(|(key, _)| key == name);
    let mut questions: Vec<String> = Vec::new();

    match category {
        Category::Computers => {
            if !has("Use Case") {
                questions.push("What will you primarily use this computer for?".to_string());
            }
            if !has("RAM") {
                questions.push("How much RAM do you need?".to_string());
            }
            if !has("Storage") {
                questions.push("How much storage space do you require?".to_string());
            }
        }
        Category::Electronics if lower.contains("phone") => {
            questions.push("Do you prefer Android or iOS?".to_string());
            questions.push("How important is camera quality to you?".to_string());
            questions.push("Do you need 5G connectivity?".to_string());
        }
        Category::HomeKitchen if lower.contains("coffee") => {
            if !has("Type") {
                questions.push("What type of coffee maker are you looking for?".to_string());
            }
            questions.push("How many cups do you typically brew at once?".to_string());
            questions.push("Do you prefer programmable features?".to_string());
        }
        _ => {}
    }

    questions.truncate(3);
    questions
}

fn capture(pattern: &str, text: &str) -> Option<Vec<String>> {
    let re = Regex::new(pattern).ok()?;
    let captures = re.captures(text)?;
    Some(
        captures
            .iter()
            .skip(1)
            .flatten()
            .map(|group| group.as_str().to_string())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_detection_order() {
        assert_eq!(analyze_query("gaming laptop", None).category, Category::Computers);
        assert_eq!(analyze_query("smartphone", None).category, Category::Electronics);
        assert_eq!(analyze_query("espresso machine", None).category, Category::HomeKitchen);
        assert_eq!(analyze_query("smart speaker", None).category, Category::SmartHome);
        assert_eq!(analyze_query("headphones", None).category, Category::Electronics);
        // "smart coffee maker" hits the coffee check before the smart one.
        assert_eq!(analyze_query("smart coffee maker", None).category, Category::HomeKitchen);
    }

    #[test]
    fn test_keywords_drop_punctuation_and_short_words() {
        let analysis = analyze_query("a 15\" laptop, for dev-work!", None);
        assert_eq!(analysis.keywords, vec!["laptop", "for", "devwork"]);
    }

    #[test]
    fn test_gaming_laptop_attributes_and_range() {
        let analysis = analyze_query("gaming laptop 16GB RAM", None);

        assert_eq!(analysis.attribute("Use Case"), Some("Gaming"));
        assert_eq!(analysis.attribute("Graphics"), Some("Dedicated"));
        assert_eq!(analysis.attribute("RAM"), Some("16GB"));
        assert_eq!(analysis.price_range, PriceRange { min: 800.0, max: 2500.0 });
    }

    #[test]
    fn test_storage_attribute_captures_unit_and_kind() {
        let analysis = analyze_query("laptop 512 GB SSD", None);
        assert_eq!(analysis.attribute("Storage"), Some("512GB SSD"));
    }

    #[test]
    fn test_coffee_type_ranges() {
        assert_eq!(
            analyze_query("espresso machine for coffee", None).price_range,
            PriceRange { min: 200.0, max: 800.0 }
        );
        assert_eq!(
            analyze_query("single serve coffee maker", None).price_range,
            PriceRange { min: 50.0, max: 200.0 }
        );
        assert_eq!(
            analyze_query("coffee maker", None).price_range,
            PriceRange { min: 30.0, max: 300.0 }
        );
    }

    #[test]
    fn test_budget_overrides_estimated_range() {
        let analysis = analyze_query("gaming laptop", Some(600.0));
        assert_eq!(analysis.price_range, PriceRange { min: 0.0, max: 600.0 });
    }

    #[test]
    fn test_suggested_questions_skip_known_attributes() {
        let analysis = analyze_query("gaming laptop 16GB RAM", None);
        assert_eq!(
            analysis.suggested_questions,
            vec!["How much storage space do you require?"]
        );

        let analysis = analyze_query("laptop", None);
        assert_eq!(analysis.suggested_questions.len(), 3);
    }

    #[test]
    fn test_phone_questions_are_fixed() {
        let analysis = analyze_query("smartphone for my phone needs", None);
        assert_eq!(
            analysis.suggested_questions,
            vec![
                "Do you prefer Android or iOS?",
                "How important is camera quality to you?",
                "Do you need 5G connectivity?"
            ]
        );
    }

    #[test]
    fn test_unknown_category_yields_no_questions() {
        assert!(analyze_query("garden hose", None).suggested_questions.is_empty());
    }
}
