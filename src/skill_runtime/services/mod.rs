//! Orchestration of the executable skills over their outbound ports.

mod scrape;
mod slack;
mod text;
mod transaction;

pub use scrape::{SCRAPE_LIMIT, SCRAPE_WINDOW_SECONDS, ScrapeService, ScrapeServiceError};
pub use slack::{SlackDelivery, SlackNotifier, SlackServiceError};
pub use text::TextAnalysisService;
pub use transaction::{TransactionAnalyzer, TxReport, TxServiceError};
