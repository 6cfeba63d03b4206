use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::product::{ProductRecord, RankedRecommendation};

/// Badges for the top ranked results, in rank order.
const BADGES: [&str; 3] = ["Best Match", "Runner Up", "Also Great"];

/// Console rendering for the advisor flow.
pub struct OutputHandler {
    debug: bool,
}

impl OutputHandler {
    pub fn new() -> Self {
        Self { debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn print_banner(&self) {
        println!("{}", style("╔═══════════════════════════════════════╗").cyan().bold());
        println!("{}", style("║   AISLE - AI shopping recommendations ║").cyan().bold());
        println!("{}", style("╚═══════════════════════════════════════╝").cyan().bold());
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), style(message).red());
    }

    pub fn system(&self, message: &str) {
        println!("{}", style(message).yellow().dim());
    }

    pub fn debug(&self, message: &str) {
        if self.debug {
            eprintln!("{} {}", style("→").dim(), style(message).dim());
        }
    }

    pub fn question_header(&self, index: usize, total: usize, question: &str) {
        println!();
        println!(
            "{} {}",
            style(format!("[{}/{}]", index, total)).dim(),
            style(question).bold()
        );
    }

    /// Spinner for the long-running pipeline stages.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner
    }

    /// Full recommendation card: badge, name, price, rating, reasons, link.
    pub fn print_recommendation(&self, rank: usize, recommendation: &RankedRecommendation<'_>) {
        let record = recommendation.record;
        let badge = BADGES.get(rank).copied().unwrap_or("Recommended");

        println!();
        println!(
            "{} {}",
            style(format!(" {} ", badge)).black().on_cyan().bold(),
            style(&record.name).bold()
        );
        println!("   {}", self.format_price(record));
        println!(
            "   {} {}",
            style(format!("{:.1}★", record.rating)).yellow(),
            style(format!("({} reviews)", record.review_count)).dim()
        );
        for reason in &recommendation.reasons {
            println!("   {} {}", style("•").dim(), reason);
        }
        if !record.product_url.is_empty() {
            println!("   {}", style(&record.product_url).blue().underlined());
        }
        if self.debug {
            eprintln!("   {}", style(format!("score: {:.1}", recommendation.score)).dim());
        }
    }

    /// Compact single line, used by the trending listing.
    pub fn print_product_line(&self, record: &ProductRecord) {
        println!(
            "  {} {} - {}",
            style("•").dim(),
            record.name,
            style(format!("${:.2}", record.sale_price)).green()
        );
    }

    fn format_price(&self, record: &ProductRecord) -> String {
        let sale = style(format!("${:.2}", record.sale_price)).green().bold();
        match record.original_price {
            Some(original) if original > record.sale_price => {
                format!("{} {}", sale, style(format!("${:.2}", original)).dim().strikethrough())
            }
            _ => sale.to_string(),
        }
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
