use anyhow::Result;
use dialoguer::{Confirm, Input, Select};

use crate::api::ModelClient;
use crate::budget::filter_by_budget;
use crate::catalog::{CatalogClient, ProductSource, SearchRequest, MAX_PAGE_SIZE};
use crate::config::Config;
use crate::error::AdvisorResult;
use crate::mock_catalog::MockCatalog;
use crate::optimizer::{optimize, select_sort};
use crate::output::OutputHandler;
use crate::product::{ClarifyingQuestion, QuestionKind, RequirementSet};
use crate::questions::{parse_budget_feedback, validate_budget, BudgetCheck, QuestionPlanner};
use crate::ranker::Ranker;
use crate::transcript::{EntryKind, Transcript};

/// How many recommendations the interactive flow presents.
const DEFAULT_RESULT_COUNT: usize = 5;

///// Owns the configured clients and drives the linear advisor flow:
/// questions, search, filter, rank, render. One instance per process.
pub struct AdvisorApp {
    output: OutputHandler,
    model: ModelClient,
    source: Box<dyn ProductSource>,
    transcript: Transcript,
}

impl AdvisorApp {
    pub fn new(config: &Config, use_mock: bool, debug: bool) -> Self {
        let model = ModelClient::new(
            &config.ai.provider,
            &config.ai.api_url,
            &config.ai.api_key,
            &config.ai.model,
        );
        let source: Box<dyn ProductSource> = if use_mock {
            Box::new(MockCatalog::new())
        } else {
            Box::new(CatalogClient::new(&config.catalog))
        };

        Self {
            output: OutputHandler::new().with_debug(debug),
            model,
            source,
            transcript: Transcript::new(),
        }
    }

    /// The default interactive advisor session, restarting on request.
    pub async fn run_interactive(&mut self) -> Result<()> {
        self.output.print_banner();

        loop {
            self.run_session().await?;

            let again = Confirm::new()
                .with_prompt("Search for something else?")
                .default(false)
                .interact()?;
            if !again {
                break;
            }
        }

        self.dump_transcript();
        Ok(())
    }

    async fn run_session(&mut self) -> Result<()> {
        let query: String = Input::new()
            .with_prompt("What are you shopping for?")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("please enter a product to search for")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        let query = query.trim().to_string();
        self.transcript.record(EntryKind::Query, &query);

        let budget: f64 = Input::new()
            .with_prompt("What is your budget in dollars? (0 for no budget)")
            .default(0.0)
            .interact_text()?;
        let budget = if budget > 0.0 { Some(budget) } else { None };

        if let Some(amount) = budget {
            if !self.confirm_budget(&query, amount)? {
                return Ok(());
            }
        }

        let spinner = self.output.spinner("Thinking about what matters for this purchase...");
        let planner = QuestionPlanner::new(&self.model);
        let questions = planner.generate(&query, budget).await;
        spinner.finish_and_clear();

        let requirements = self.ask_questions(&questions)?;

        if let Err(error) = self.run_pipeline(&query, budget, &requirements, DEFAULT_RESULT_COUNT).await {
            self.transcript.record(EntryKind::Error, error.to_string());
            self.output
                .error("Unable to fetch product recommendations. Please try again.");
            self.output.debug(&error.to_string());
        }
        Ok(())
    }

    /// Warn when the budget sits below the typical range for the category
    /// and let the user decide whether to push on.
    fn confirm_budget(&mut self, query: &str, amount: f64) -> Result<bool> {
        let feedback = validate_budget(query, amount);
        match parse_budget_feedback(&feedback) {
            BudgetCheck::Realistic => Ok(true),
            BudgetCheck::Low { suggested_minimum } => {
                let message = match suggested_minimum {
                    Some(minimum) => format!(
                        "Your budget of ${amount} is lower than typical for this product. \
                         Most {query} start around ${minimum}."
                    ),
                    None => format!(
                        "Your budget of ${amount} is lower than typical for this product."
                    ),
                };
                self.output.system(&message);
                self.transcript.record(EntryKind::Feedback, &message);

                Ok(Confirm::new()
                    .with_prompt("Continue with this budget anyway?")
                    .default(true)
                    .interact()?)
            }
        }
    }

    fn ask_questions(&mut self, questions: &[ClarifyingQuestion]) -> Result<RequirementSet> {
        let mut requirements = RequirementSet::new();

        for (index, question) in questions.iter().enumerate() {
            self.output
                .question_header(index + 1, questions.len(), &question.question);
            self.transcript.record(EntryKind::Question, &question.question);

            let answer = match question.kind {
                QuestionKind::MultipleChoice => {
                    let choice = Select::new()
                        .items(&question.options)
                        .default(0)
                        .interact()?;
                    question.options[choice].clone()
                }
                QuestionKind::Boolean => {
                    let yes = Confirm::new().with_prompt("").default(true).interact()?;
                    if yes { "Yes".to_string() } else { "No".to_string() }
                }
                QuestionKind::OpenEnded => Input::new()
                    .with_prompt("Your answer")
                    .allow_empty(true)
                    .interact_text()?,
            };

            self.transcript.record(EntryKind::Answer, &answer);
            requirements.insert(&question.question, &answer);
        }

        Ok(requirements)
    }

    /// One-shot pipeline without the question flow.
    pub async fn run_search(
        &mut self,
        query: &str,
        budget: Option<f64>,
        limit: usize,
    ) -> Result<()> {
        self.transcript.record(EntryKind::Query, query);
        let requirements = RequirementSet::new();
        let result = self.run_pipeline(query, budget, &requirements, limit).await;

        if let Err(error) = &result {
            self.transcript.record(EntryKind::Error, error.to_string());
            self.output
                .error("Unable to fetch product recommendations. Please try again.");
        }
        self.dump_transcript();
        result.map_err(Into::into)
    }

    /// Optimize, search, filter, rank, render. Fails only on catalog
    /// errors; question generation and ranking degrade internally.
    async fn run_pipeline(
        &mut self,
        query: &str,
        budget: Option<f64>,
        requirements: &RequirementSet,
        limit: usize,
    ) -> AdvisorResult<()> {
        let augmented = optimize(query, requirements);
        let (sort, order) = select_sort(budget, requirements);
        self.output.debug(&format!("optimized query: {}", augmented));

        let spinner = self.output.spinner("Searching the catalog...");
        let category_id = self.source.find_category(query).await;

        let mut request = SearchRequest::new(augmented).with_page_size(MAX_PAGE_SIZE);
        if let Some(category_id) = category_id {
            request = request.with_category(category_id);
        }
        if let Some(sort) = sort {
            request = request.with_sort(sort);
        }
        if let Some(order) = order {
            request = request.with_order(order);
        }

        let page = match self.source.search(&request).await {
            Ok(page) => page,
            Err(error) => {
                spinner.finish_and_clear();
                return Err(error);
            }
        };
        spinner.finish_and_clear();
        self.output.debug(&format!(
            "catalog returned {} of {} records",
            page.records.len(),
            page.total_count
        ));

        let candidates = filter_by_budget(page.records, budget.unwrap_or(0.0));
        if candidates.is_empty() {
            self.output.info("No products found for this search.");
            self.transcript.record(EntryKind::Results, "no products");
            return Ok(());
        }

        let spinner = self.output.spinner("Ranking the best matches...");
        let ranker = Ranker::new(&self.model);
        let recommendations = ranker.rank(&candidates, requirements, limit).await;
        spinner.finish_and_clear();

        self.output.success(&format!(
            "Found {} recommendation{} for you:",
            recommendations.len(),
            if recommendations.len() == 1 { "" } else { "s" }
        ));
        for (rank, recommendation) in recommendations.iter().enumerate() {
            self.output.print_recommendation(rank, recommendation);
        }
        self.transcript.record(
            EntryKind::Results,
            format!("{} recommendations", recommendations.len()),
        );
        Ok(())
    }

    /// List currently trending catalog products.
    pub async fn run_trending(&mut self) -> Result<()> {
        let spinner = self.output.spinner("Fetching trending products...");
        let page = self.source.trending().await;
        spinner.finish_and_clear();

        let page = page?;
        if page.records.is_empty() {
            self.output.info("Nothing is trending right now.");
            return Ok(());
        }

        self.output.success("Trending products:");
        for record in &page.records {
            self.output.print_product_line(record);
        }
        Ok(())
    }

    fn dump_transcript(&self) {
        if self.output.is_debug() && !self.transcript.is_empty() {
            self.output.system("Session transcript:");
            print!("{}", self.transcript);
        }
    }
}
