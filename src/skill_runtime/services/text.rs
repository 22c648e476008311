//! Text analysis with a remote model and a local fallback.

use crate::skill_runtime::{
    domain::{
        AnalysisSource, AnalysisText, InvalidAnalysisText, LocalAnalyzer, Sentiment, TextAnalysis,
    },
    ports::{CompletionClient, RemoteAnalysis},
};
use std::sync::Arc;

const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Analyses text remotely when a backend is configured, locally otherwise.
pub struct TextAnalysisService<P>
where
    P: CompletionClient + ?Sized,
{
    remote: Option<Arc<P>>,
    local: Arc<LocalAnalyzer>,
}

impl<P> Clone for TextAnalysisService<P>
where
    P: CompletionClient + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            local: Arc::clone(&self.local),
        }
    }
}

impl<P> TextAnalysisService<P>
where
    P: CompletionClient + ?Sized,
{
    /// Creates the service. Without `remote` every call is answered locally.
    #[must_use]
    pub fn new(remote: Option<Arc<P>>, local: LocalAnalyzer) -> Self {
        Self {
            remote,
            local: Arc::new(local),
        }
    }

    /// Analyses `text`.
    ///
    /// Backend failures are logged and answered by the local analyser with
    /// source `local-fallback`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidAnalysisText`] for empty or oversized input.
    pub async fn analyze(&self, text: String) -> Result<TextAnalysis, InvalidAnalysisText> {
        let input = AnalysisText::new(text)?;
        let Some(remote) = &self.remote else {
            return Ok(self.local.analyze(&input, AnalysisSource::Local));
        };

        match remote.analyze(input.as_str()).await {
            Ok(analysis) => Ok(from_remote(analysis, &input)),
            Err(err) => {
                tracing::warn!(error = %err, "completion backend failed, using local analysis");
                Ok(self.local.analyze(&input, AnalysisSource::LocalFallback))
            }
        }
    }
}

fn from_remote(analysis: RemoteAnalysis, input: &AnalysisText) -> TextAnalysis {
    let RemoteAnalysis {
        sentiment,
        entities,
        summary,
        usage,
    } = analysis;
    TextAnalysis {
        source: AnalysisSource::Openai,
        sentiment: sentiment
            .as_deref()
            .map_or(Sentiment::Neutral, Sentiment::from_label),
        entities,
        summary: summary
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| format!("{}...", input.prefix(SUMMARY_FALLBACK_CHARS))),
        usage,
    }
}
