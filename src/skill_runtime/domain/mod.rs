//! Pure logic behind the executable skills.

mod analysis;
mod rate_limit;
mod scrape;
mod slack;
mod transform;
mod tx_risk;
mod xml;

pub use analysis::{
    AnalysisSource, AnalysisText, Entity, InvalidAnalysisText, LocalAnalyzer, Sentiment,
    TextAnalysis,
};
pub use rate_limit::FixedWindowLimiter;
pub use scrape::{ExtractType, ScrapeInputError, ScrapePlan, ScrapeRequest, ScrapeResult};
pub use slack::{
    AlertPriority, SlackInputError, SlackNotification, SlackRequest, SlackTemplate, TemplateField,
};
pub use transform::{
    DataFormat, TransformError, TransformOptions, TransformOutcome, TransformRequest, transform,
};
pub use tx_risk::{
    AccountAccess, Chain, EvmReceipt, EvmTransaction, InvalidTxReference, RiskAssessment,
    RiskLevel, RiskPattern, SolanaTransaction, TxAnalysisRequest, assess_evm, assess_solana,
    capped_score, format_units,
};
