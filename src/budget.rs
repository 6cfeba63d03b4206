//! Budget filtering over a candidate record list.

use crate::product::ProductRecord;

/// Headroom allowed above the stated budget before a record is cut.
const BUDGET_HEADROOM: f64 = 1.1;

/// Drop records priced more than 10% over `budget`.
///
/// A non-positive budget expresses no constraint and returns the input
/// unchanged. When the ceiling would cut every record from a non-empty
/// list, the filtering decision is discarded and the original list comes
/// back instead, so an overly strict budget never manufactures an empty
/// result page. That trade-off can hide a genuine "nothing affordable"
/// situation; the interactive flow warns about low budgets separately
/// before the search runs.
pub fn filter_by_budget(records: Vec<ProductRecord>, budget: f64) -> Vec<ProductRecord> {
    if budget <= 0.0 {
        return records;
    }

    let ceiling = budget * BUDGET_HEADROOM;
    let filtered: Vec<ProductRecord> = records
        .iter()
        .filter(|record| record.sale_price <= ceiling)
        .cloned()
        .collect();

    if filtered.is_empty() && !records.is_empty() {
        return records;
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, sale_price: f64) -> ProductRecord {
        ProductRecord {
            id: id.to_string(),
            name: format!("Product {}", id),
            brand: "Acme".to_string(),
            sale_price,
            original_price: None,
            rating: 4.0,
            review_count: 100,
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
    fn test_non_positive_budget_is_identity() {
        let records = vec![priced("a", 500.0), priced("b", 2000.0)];
        assert_eq!(filter_by_budget(records.clone(), 0.0), records);
        assert_eq!(filter_by_budget(records.clone(), -50.0), records);
    }

    #[test]
    fn test_records_over_the_ceiling_are_cut() {
        let records = vec![priced("a", 90.0), priced("b", 110.0), priced("c", 111.0)];
        let filtered = filter_by_budget(records, 100.0);

        // Ceiling is 110: "c" at 111 falls out, "b" squeaks through.
        let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_all_over_budget_falls_back_to_unfiltered() {
        let records = vec![priced("a", 1200.0), priced("b", 1500.0)];
        let filtered = filter_by_budget(records.clone(), 100.0);
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_empty_input_stays_empty() {
        assert!(filter_by_budget(Vec::new(), 100.0).is_empty());
    }

    #[test]
    fn test_zero_priced_records_survive_any_budget() {
        let records = vec![priced("free", 0.0), priced("pricey", 5000.0)];
        let filtered = filter_by_budget(records, 100.0);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "free");
    }
}
