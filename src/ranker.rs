//! Relevance scoring and ranking of candidate records.
//!
//! Small candidate sets are scored locally; larger ones are handed to the
//! model with a structured prompt. Every failure on the delegated path
//! degrades to the deterministic rating/popularity fallback, so ranking
//! never raises past its own boundary.

use serde::Deserialize;
use serde_json::json;

use crate::api::ModelClient;
use crate::extract::{parse_array, ModelJson};
use crate::product::{ProductRecord, RankedRecommendation, RequirementSet};

/// How many records the delegated prompt projects. Anything past this has
/// already lost on the catalog's own ordering.
const PROJECTION_LIMIT: usize = 15;

const LOCAL_REASON: &str = "Good overall match for your search";
const FALLBACK_REASON: &str = "Based on customer ratings and popularity";

/// One entry of the model's ranking reply. `id` indexes the projection.
#[derive(Debug, Deserialize)]
struct RankedEntry {
    id: usize,
    score: f64,
    #[serde(default)]
    reasons: Vec<String>,
}

pub struct Ranker<'a> {
    model: &'a ModelClient,
}

impl<'a> Ranker<'a> {
    pub fn new(model: &'a ModelClient) -> Self {
        Self { model }
    }

    /// Rank `records` against the requirements and return at most
    /// `max_results` recommendations. Never returns an error.
    pub async fn rank<'r>(
        &self,
        records: &'r [ProductRecord],
        requirements: &RequirementSet,
        max_results: usize,
    ) -> Vec<RankedRecommendation<'r>> {
        if records.is_empty() || max_results == 0 {
            return Vec::new();
        }

        if records.len() <= max_results {
            return local_rank(records);
        }

        let prompt = build_prompt(records, requirements);
        let reply = match self.model.generate(&prompt).await {
            Ok(reply) => reply,
            Err(_) => return fallback_rank(records, max_results),
        };

        match parse_array::<RankedEntry>(&reply) {
            ModelJson::Parsed(entries) if !entries.is_empty() => {
                apply_model_ranking(records, entries, max_results)
            }
            // An empty array would rank a non-empty candidate list to
            // nothing; treat it like a parse failure.
            _ => fallback_rank(records, max_results),
        }
    }
}

/// Score every record by its rating alone. Used when the candidate set is
/// already no larger than the requested result count.
fn local_rank(records: &[ProductRecord]) -> Vec<RankedRecommendation<'_>> {
    let mut ranked: Vec<RankedRecommendation> = records
        .iter()
        .map(|record| RankedRecommendation {
            record,
            score: f64::from(record.rating) * 20.0,
            reasons: vec![LOCAL_REASON.to_string()],
        })
        .collect();
    sort_descending(&mut ranked);
    ranked
}

/// Deterministic scoring from rating and review volume, used whenever the
/// delegated path cannot deliver.
fn fallback_rank(records: &[ProductRecord], max_results: usize) -> Vec<RankedRecommendation<'_>> {
    let mut ranked: Vec<RankedRecommendation> = records
        .iter()
        .map(|record| RankedRecommendation {
            record,
            score: fallback_score(record),
            reasons: vec![FALLBACK_REASON.to_string()],
        })
        .collect();
    sort_descending(&mut ranked);
    ranked.truncate(max_results);
    ranked
}

fn fallback_score(record: &ProductRecord) -> f64 {
    let mut score = f64::from(record.rating) * 10.0;
    if record.review_count > 0 {
        score += 10.0 * f64::from(record.review_count).log10();
    }
    score
}

fn apply_model_ranking<'r>(
    records: &'r [ProductRecord],
    mut entries: Vec<RankedEntry>,
    max_results: usize,
) -> Vec<RankedRecommendation<'r>> {
    entries.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut seen: Vec<usize> = Vec::new();
    let mut ranked: Vec<RankedRecommendation> = Vec::new();

    for entry in entries {
        if ranked.len() == max_results {
            break;
        }
        let Some(record) = records.get(entry.id) else {
            continue;
        };
        if seen.contains(&entry.id) {
            continue;
        }
        seen.push(entry.id);

        let mut reasons: Vec<String> = entry
            .reasons
            .into_iter()
            .filter(|reason| !reason.trim().is_empty())
            .take(3)
            .collect();
        if reasons.is_empty() {
            reasons.push(FALLBACK_REASON.to_string());
        }

        ranked.push(RankedRecommendation {
            record,
            score: entry.score.clamp(0.0, 100.0),
            reasons,
        });
    }

    if ranked.is_empty() {
        return fallback_rank(records, max_results);
    }
    ranked
}

fn sort_descending(ranked: &mut [RankedRecommendation<'_>]) {
    // Stable: ties keep the catalog order.
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

fn build_prompt(records: &[ProductRecord], requirements: &RequirementSet) -> String {
    let projection: Vec<serde_json::Value> = records
        .iter()
        .take(PROJECTION_LIMIT)
        .enumerate()
        .map(|(index, record)| {
            json!({
                "id": index,
                "name": record.name,
                "price": record.sale_price,
                "brand": record.brand,
                "rating": record.rating,
                "review_count": record.review_count,
                "description": record.short_description,
            })
        })
        .collect();

    let requirement_lines: String = requirements
        .iter()
        .map(|(question, answer)| format!("- {}: {}\n", question, answer))
        .collect();
    let requirement_block = if requirement_lines.is_empty() {
        "The user gave no further requirements.".to_string()
    } else {
        format!("The user's requirements:\n{}", requirement_lines)
    };

    format!(
        "You are ranking products for a shopper.\n\n\
         {requirement_block}\n\
         Candidate products as JSON:\n{products}\n\n\
         Score how well each product matches the requirements. Respond with a \
         JSON array of objects with fields 'id' (the candidate id above), \
         'score' (0-100), and 'reasons' (2-3 short strings explaining the \
         score). Return ONLY the JSON array, with no markdown formatting and \
         no explanations.",
        products = serde_json::to_string_pretty(&projection).unwrap_or_else(|_| "[]".to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, rating: f32, review_count: u32) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Acme".to_string(),
            sale_price: 100.0,
            original_price: None,
            rating,
            review_count,
            short_description: String::new(),
            long_description: String::new(),
            features: Vec::new(),
            specifications: Vec::new(),
            category_path: String::new(),
            image_url: None,
            product_url: String::new(),
            in_stock: true,
        }
    }

    #[test]
    fn test_local_rank_scores_rating_times_twenty() {
        let records = vec![record("a", 3.5, 10), record("b", 4.5, 10)];
        let ranked = local_rank(&records);

        assert_eq!(ranked[0].record.id, "b");
        assert_eq!(ranked[0].score, 90.0);
        assert_eq!(ranked[1].score, 70.0);
        assert_eq!(ranked[0].reasons, vec![LOCAL_REASON]);
    }

    #[test]
    fn test_local_rank_ties_keep_catalog_order() {
        let records = vec![record("first", 4.0, 5), record("second", 4.0, 500)];
        let ranked = local_rank(&records);
        assert_eq!(ranked[0].record.id, "first");
        assert_eq!(ranked[1].record.id, "second");
    }

    #[test]
    fn test_fallback_score_formula() {
        // rating*10 plus 10*log10(reviews); no log term at zero reviews.
        assert_eq!(fallback_score(&record("a", 4.0, 0)), 40.0);
        assert_eq!(fallback_score(&record("b", 4.0, 100)), 60.0);
        assert_eq!(fallback_score(&record("c", 4.0, 1000)), 70.0);
    }

    #[test]
    fn test_fallback_rank_truncates_and_labels() {
        let records: Vec<ProductRecord> = (0..8)
            .map(|i| record(&i.to_string(), i as f32 / 2.0, 10 * i))
            .collect();
        let ranked = fallback_rank(&records, 5);

        assert_eq!(ranked.len(), 5);
        assert!(ranked.windows(2).all(|pair| pair[0].score >= pair[1].score));
        assert!(ranked.iter().all(|r| r.reasons == vec![FALLBACK_REASON]));
        assert_eq!(ranked[0].record.id, "7");
    }

    #[test]
    fn test_model_ranking_maps_ids_and_orders_by_score() {
        let records: Vec<ProductRecord> =
            (0..20).map(|i| record(&i.to_string(), 4.0, 10)).collect();
        let entries = vec![
            RankedEntry { id: 2, score: 70.0, reasons: vec!["fits budget".into(), "well reviewed".into()] },
            RankedEntry { id: 0, score: 95.0, reasons: vec!["exact match".into(), "great specs".into()] },
            RankedEntry { id: 4, score: 40.0, reasons: vec!["partial match".into(), "fewer reviews".into()] },
            RankedEntry { id: 1, score: 88.0, reasons: vec!["close match".into(), "good value".into()] },
            RankedEntry { id: 3, score: 55.0, reasons: vec!["acceptable".into(), "in stock".into()] },
        ];

        let ranked = apply_model_ranking(&records, entries, 5);
        let ids: Vec<&str> = ranked.iter().map(|r| r.record.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1", "2", "3", "4"]);
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_model_ranking_skips_bad_ids_and_duplicates() {
        let records: Vec<ProductRecord> =
            (0..6).map(|i| record(&i.to_string(), 4.0, 10)).collect();
        let entries = vec![
            RankedEntry { id: 99, score: 100.0, reasons: vec![] },
            RankedEntry { id: 1, score: 90.0, reasons: vec![] },
            RankedEntry { id: 1, score: 80.0, reasons: vec![] },
            RankedEntry { id: 2, score: 150.0, reasons: vec!["  ".into()] },
        ];

        let ranked = apply_model_ranking(&records, entries, 3);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].record.id, "1");
        assert_eq!(ranked[1].record.id, "2");
        // Scores clamp to the 0-100 scale and blank reasons fall back.
        assert_eq!(ranked[1].score, 100.0);
        assert_eq!(ranked[1].reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_model_ranking_with_only_bad_ids_falls_back() {
        let records: Vec<ProductRecord> =
            (0..4).map(|i| record(&i.to_string(), 4.0, 10)).collect();
        let entries = vec![RankedEntry { id: 50, score: 90.0, reasons: vec![] }];

        let ranked = apply_model_ranking(&records, entries, 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].reasons, vec![FALLBACK_REASON]);
    }

    #[test]
    fn test_prompt_projects_at_most_fifteen_records() {
        let records: Vec<ProductRecord> =
            (0..20).map(|i| record(&i.to_string(), 4.0, 10)).collect();
        let prompt = build_prompt(&records, &RequirementSet::new());

        assert!(prompt.contains("\"id\": 14"));
        assert!(!prompt.contains("\"id\": 15"));
        assert!(prompt.contains("no further requirements"));
    }

    #[test]
    fn test_prompt_embeds_requirement_pairs() {
        let mut requirements = RequirementSet::new();
        requirements.insert("What will you use it for?", "Gaming");
        let records = vec![record("a", 4.0, 10)];

        let prompt = build_prompt(&records, &requirements);
        assert!(prompt.contains("- What will you use it for?: Gaming"));
    }
}
