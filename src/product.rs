use serde::{Deserialize, Serialize};

/// One catalog entry, as returned by the product API or the mock catalog.
///
/// `sale_price` is always non-negative. `original_price`, when present, is
/// usually above the sale price but the upstream feed does not enforce it,
/// so nothing here may assume that it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub sale_price: f64,
    pub original_price: Option<f64>,
    pub rating: f32,
    pub review_count: u32,
    pub short_description: String,
    pub long_description: String,
    pub features: Vec<String>,
    pub specifications: Vec<(String, String)>,
    pub category_path: String,
    pub image_url: Option<String>,
    pub product_url: String,
    pub in_stock: bool,
}

impl ProductRecord {
    /// Case-insensitive lookup of a specification value by name.
    pub fn specification(&self, name: &str) -> Option<&str> {
        self.specifications
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// The clarifying question→answer pairs collected during one session.
///
/// Keys are normalized once at insertion (trimmed, internal whitespace
/// collapsed). Insertion order is preserved because later stages break ties
/// on it; inserting an existing key replaces the answer in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementSet {
    entries: Vec<(String, String)>,
}

impl RequirementSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: &str, answer: &str) {
        let key = normalize_key(question);
        if let Some(entry) = self.entries.iter_mut().find(|(q, _)| *q == key) {
            entry.1 = answer.to_string();
        } else {
            self.entries.push((key, answer.to_string()));
        }
    }

    pub fn answer(&self, question: &str) -> Option<&str> {
        let key = normalize_key(question);
        self.entries
            .iter()
            .find(|(q, _)| *q == key)
            .map(|(_, a)| a.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(q, a)| (q.as_str(), a.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_key(question: &str) -> String {
    question.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// How a clarifying question should be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    OpenEnded,
    Boolean,
}

/// A question put to the user to narrow down requirements.
///
/// `options` is non-empty exactly when `kind` is `MultipleChoice`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClarifyingQuestion {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl ClarifyingQuestion {
    pub fn multiple_choice(question: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            question: question.into(),
            kind: QuestionKind::MultipleChoice,
            options,
        }
    }

    pub fn open_ended(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            kind: QuestionKind::OpenEnded,
            options: Vec::new(),
        }
    }

    pub fn boolean(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            kind: QuestionKind::Boolean,
            options: Vec::new(),
        }
    }
}

/// One ranked result, borrowing its record from the candidate list.
/// Score is on the 0-100 scale; `reasons` carries one to three entries.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecommendation<'a> {
    pub record: &'a ProductRecord,
    pub score: f64,
    pub reasons: Vec<String>,
}
