//! OpenAI chat-completions adapter for text analysis.

use crate::skill_runtime::ports::{CompletionClient, OutboundError, OutboundResult, RemoteAnalysis};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

/// Model used for analysis.
pub const ANALYSIS_MODEL: &str = "gpt-4o-mini";
const MAX_TOKENS: u32 = 1000;
const SYSTEM_PROMPT: &str = "You are a text analysis engine. Analyze the provided text and \
return a JSON object with:\n\
- sentiment: \"positive\", \"negative\", \"neutral\", or \"mixed\"\n\
- entities: array of objects with {name, type, relevance} where type can be \"PERSON\", \
\"ORGANIZATION\", \"LOCATION\", \"PRODUCT\", \"EVENT\", \"DATE\", \"MONEY\", \"PERCENT\", \"OTHER\"\n\
- summary: a concise 1-2 sentence summary\n\n\
Return ONLY valid JSON, no markdown formatting.";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: Url,
}

impl OpenAiCompletionClient {
    /// Creates a client posting to `{base_url}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`OutboundError::InvalidResponse`] when the base URL cannot
    /// be extended.
    pub fn new(client: reqwest::Client, api_key: String, base_url: &Url) -> OutboundResult<Self> {
        let mut endpoint = base_url.clone();
        endpoint
            .path_segments_mut()
            .map_err(|()| OutboundError::invalid_response("base URL cannot have a path"))?
            .pop_if_empty()
            .extend(["chat", "completions"]);
        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn analyze(&self, text: &str) -> OutboundResult<RemoteAnalysis> {
        let body = json!({
            "model": ANALYSIS_MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": text},
            ],
            "response_format": {"type": "json_object"},
            "max_tokens": MAX_TOKENS,
        });
        let completion: ChatCompletion = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(OutboundError::transport)?
            .json()
            .await
            .map_err(OutboundError::transport)?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_else(|| "{}".to_owned());
        let mut analysis: RemoteAnalysis =
            serde_json::from_str(&content).map_err(OutboundError::invalid_response)?;
        analysis.usage = completion.usage;
        Ok(analysis)
    }
}
