//! AI-guided product recommendation pipeline: clarifying questions, query
//! optimization, catalog search, budget filtering, and ranking.

pub mod analyze;
pub mod api;
pub mod app;
pub mod budget;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod mock_catalog;
pub mod optimizer;
pub mod output;
pub mod product;
pub mod questions;
pub mod ranker;
pub mod taxonomy;
pub mod transcript;

pub use app::AdvisorApp;
pub use catalog::{CatalogClient, CatalogPage, ProductSource, SearchRequest};
pub use config::Config;
pub use error::{AdvisorError, AdvisorResult};
pub use product::{ClarifyingQuestion, ProductRecord, RankedRecommendation, RequirementSet};
