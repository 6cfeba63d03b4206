//! Query optimization: term extraction from clarifying answers and sort
//! strategy selection.
//!
//! Both halves read the same requirement pairs but are independent. Term
//! extraction grows the catalog query with up to three salient tokens;
//! sort selection picks the server-side ordering hint from price/quality
//! signals in the answers.

use regex::Regex;

use crate::catalog::{SortOrder, SortStrategy};
use crate::product::RequirementSet;

/// Most extracted terms ever appended to a query. More makes the catalog
/// search overly specific.
const MAX_TERMS: usize = 3;

/// Answers that carry no extractable signal regardless of length.
const SKIP_ANSWERS: [&str; 4] = ["yes", "no", "maybe", "not sure"];

/// Budgets under this are treated as price-sensitive even without an
/// explicit signal in the answers.
const PRICE_SENSITIVE_BUDGET: f64 = 100.0;

/// Append up to three terms extracted from the requirement answers to the
/// original query. Terms are deduplicated preserving first-seen order; when
/// nothing is extracted the query comes back untouched.
pub fn optimize(query: &str, requirements: &RequirementSet) -> String {
    let query_lower = query.to_lowercase();
    let mut terms: Vec<String> = Vec::new();

    for (question, answer) in requirements.iter() {
        let question_lower = question.to_lowercase();
        let answer_lower = answer.to_lowercase();

        if answer.len() < 3 || SKIP_ANSWERS.contains(&answer_lower.as_str()) {
            continue;
        }

        if question_lower.contains("brand") || question_lower.contains("manufacturer") {
            terms.extend(regex_tokens(r"\b[A-Z][a-zA-Z]*\b", answer));
        }

        if question_lower.contains("size") || question_lower.contains("inch") {
            terms.extend(regex_tokens(
                r#"\d+(\.\d+)?["”]?\s*inch(es)?|\d+(\.\d+)?["”]?"#,
                answer,
            ));
        }

        if question_lower.contains("feature") || question_lower.contains("important") {
            for clause in split_clauses(answer) {
                if clause.len() > 3 {
                    terms.push(clause);
                }
            }
        }

        if query_lower.contains("laptop") {
            if question_lower.contains("gaming")
                && (answer_lower.contains("yes") || answer_lower.contains("gaming"))
            {
                terms.push("gaming".to_string());
            }

            if question_lower.contains("memory") || question_lower.contains("ram") {
                terms.extend(regex_tokens(r"(?i)\d+\s*gb|gigabyte", answer));
            }

            if question_lower.contains("processor") || question_lower.contains("cpu") {
                if answer_lower.contains("intel")
                    || answer_lower.contains("i5")
                    || answer_lower.contains("i7")
                {
                    terms.push("Intel".to_string());
                    for tier in ["i5", "i7", "i9"] {
                        if answer_lower.contains(tier) {
                            terms.push(tier.to_string());
                        }
                    }
                }
                if answer_lower.contains("amd") || answer_lower.contains("ryzen") {
                    terms.push("AMD".to_string());
                    if answer_lower.contains("ryzen") {
                        terms.push("Ryzen".to_string());
                    }
                }
            }
        }

        if query_lower.contains("headphone") {
            if (question_lower.contains("wireless") || question_lower.contains("bluetooth"))
                && (answer_lower.contains("yes")
                    || answer_lower.contains("wireless")
                    || answer_lower.contains("bluetooth"))
            {
                terms.push("wireless".to_string());
                terms.push("bluetooth".to_string());
            }

            if (question_lower.contains("noise") || question_lower.contains("cancellation"))
                && (answer_lower.contains("yes")
                    || answer_lower.contains("noise")
                    || answer_lower.contains("cancellation"))
            {
                terms.push("noise cancelling".to_string());
            }
        }
    }

    let mut selected: Vec<String> = Vec::new();
    for term in terms {
        if !selected.contains(&term) {
            selected.push(term);
        }
        if selected.len() == MAX_TERMS {
            break;
        }
    }

    if selected.is_empty() {
        query.to_string()
    } else {
        format!("{} {}", query, selected.join(" "))
    }
}

/// Pick the server-side sort from the requirement answers and budget.
///
/// Precedence: price sensitivity (explicit, or any budget under $100) wins
/// over quality focus, which wins over mere budget presence; with none of
/// those the catalog's relevance ordering stands and nothing is sent.
pub fn select_sort(
    budget: Option<f64>,
    requirements: &RequirementSet,
) -> (Option<SortStrategy>, Option<SortOrder>) {
    let mut price_sensitive = false;
    let mut quality_focused = false;

    for (question, answer) in requirements.iter() {
        let question_lower = question.to_lowercase();
        let answer_lower = answer.to_lowercase();

        if question_lower.contains("budget")
            || question_lower.contains("price")
            || question_lower.contains("cost")
        {
            if answer_lower.contains("important")
                || answer_lower.contains("concerned")
                || answer_lower.contains("low")
                || answer_lower.contains("cheap")
            {
                price_sensitive = true;
            }
        }

        if question_lower.contains("quality") || question_lower.contains("important feature") {
            if answer_lower.contains("high quality")
                || answer_lower.contains("best")
                || answer_lower.contains("premium")
                || answer_lower.contains("reliable")
            {
                quality_focused = true;
            }
        }
    }

    let has_budget = budget.map(|b| b > 0.0).unwrap_or(false);
    let tight_budget = budget.map(|b| b > 0.0 && b < PRICE_SENSITIVE_BUDGET).unwrap_or(false);

    if price_sensitive || tight_budget {
        (Some(SortStrategy::Price), Some(SortOrder::Ascending))
    } else if quality_focused {
        (Some(SortStrategy::CustomerRating), None)
    } else if has_budget {
        (Some(SortStrategy::Bestseller), None)
    } else {
        (None, None)
    }
}

fn regex_tokens(pattern: &str, text: &str) -> Vec<String> {
    Regex::new(pattern)
        .map(|re| re.find_iter(text).map(|m| m.as_str().to_string()).collect())
        .unwrap_or_default()
}

fn split_clauses(answer: &str) -> Vec<String> {
    Regex::new(r",|\sand\s")
        .map(|re| {
            re.split(answer)
                .map(|clause| clause.trim().to_string())
                .collect()
        })
        .unwrap_or_else(|_| vec![answer.trim().to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirements(pairs: &[(&str, &str)]) -> RequirementSet {
        let mut set = RequirementSet::new();
        for (question, answer) in pairs {
            set.insert(question, answer);
        }
        set
    }

    #[test]
    fn test_empty_requirements_leave_query_untouched() {
        assert_eq!(optimize("gaming laptop", &RequirementSet::new()), "gaming laptop");
    }

    #[test]
    fn test_skip_list_answers_contribute_nothing() {
        for answer in ["yes", "No", "MAYBE", "Not Sure"] {
            let set = requirements(&[("Which brand do you prefer?", answer)]);
            assert_eq!(optimize("laptop", &set), "laptop", "answer {:?}", answer);
        }
        // Short answers are skipped too, even off the list.
        let set = requirements(&[("Which brand do you prefer?", "HP")]);
        assert_eq!(optimize("laptop", &set), "laptop");
    }

    #[test]
    fn test_brand_answers_yield_capitalized_tokens() {
        let set = requirements(&[("Which brand do you prefer?", "I like Dell or Lenovo")]);
        assert_eq!(optimize("laptop", &set), "laptop I Dell Lenovo");
    }

    #[test]
    fn test_feature_clauses_split_on_commas_and_and() {
        let set = requirements(&[(
            "What features are important to you?",
            "backlit keyboard, long battery and light weight",
        )]);
        assert_eq!(
            optimize("laptop", &set),
            "laptop backlit keyboard long battery light weight"
        );
    }

    #[test]
    fn test_at_most_three_terms_no_duplicates() {
        let set = requirements(&[
            ("What features are important?", "fast, quiet, light, cheap"),
            ("Any other important feature?", "fast, durable"),
        ]);
        let optimized = optimize("laptop", &set);
        assert_eq!(optimized, "laptop fast quiet light");
    }

    #[test]
    fn test_gaming_laptop_scenario() {
        let set = requirements(&[("What will you use it for?", "Gaming")]);
        let optimized = optimize("gaming laptop", &set);

        assert!(optimized.starts_with("gaming laptop"));
        assert!(optimized.contains("Gaming") || optimized.contains("gaming"));
        let extra_terms = optimized["gaming laptop".len()..].split_whitespace().count();
        assert!(extra_terms <= 3);

        let (sort, order) = select_sort(Some(1000.0), &set);
        assert_eq!(sort, Some(SortStrategy::Bestseller));
        assert_eq!(order, None);
    }

    #[test]
    fn test_headphones_wireless_scenario() {
        let set = requirements(&[("Do you want wireless?", "Yes, bluetooth please")]);
        let optimized = optimize("headphones", &set);

        assert!(optimized.contains("wireless"));
        assert!(optimized.contains("bluetooth"));
        assert_eq!(select_sort(None, &set), (None, None));
    }

    #[test]
    fn test_cpu_answers_pick_vendor_and_tier() {
        let set = requirements(&[("Which processor do you want?", "an intel i7 would be nice")]);
        assert_eq!(optimize("laptop", &set), "laptop Intel i7");

        let set = requirements(&[("Which cpu?", "amd ryzen")]);
        assert_eq!(optimize("laptop", &set), "laptop AMD Ryzen");
    }

    #[test]
    fn test_ram_answers_extract_gigabytes() {
        let set = requirements(&[("How much RAM do you need?", "at least 16GB")]);
        assert_eq!(optimize("laptop", &set), "laptop 16GB");
    }

    #[test]
    fn test_price_sensitivity_beats_quality_focus() {
        let set = requirements(&[
            ("Is price a concern?", "yes, keeping the cost low matters"),
            ("How important is quality?", "I want the best premium build"),
        ]);
        assert_eq!(
            select_sort(Some(1000.0), &set),
            (Some(SortStrategy::Price), Some(SortOrder::Ascending))
        );
    }

    #[test]
    fn test_quality_focus_selects_customer_rating() {
        let set = requirements(&[("How important is quality?", "premium and reliable please")]);
        assert_eq!(
            select_sort(None, &set),
            (Some(SortStrategy::CustomerRating), None)
        );
    }

    #[test]
    fn test_small_budget_forces_price_ascending() {
        assert_eq!(
            select_sort(Some(99.0), &RequirementSet::new()),
            (Some(SortStrategy::Price), Some(SortOrder::Ascending))
        );
        assert_eq!(
            select_sort(Some(100.0), &RequirementSet::new()),
            (Some(SortStrategy::Bestseller), None)
        );
    }

    #[test]
    fn test_selection_is_deterministic() {
        let set = requirements(&[("Is price a concern?", "cost is important")]);
        let first = select_sort(Some(500.0), &set);
        for _ in 0..10 {
            assert_eq!(select_sort(Some(500.0), &set), first);
        }
    }
}
