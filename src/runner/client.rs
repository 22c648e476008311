//! `reqwest` implementation of [`MarketplaceApi`].

use super::api::{
    AgentStatusReport, JobPreferences, MarketplaceApi, OpenJob, PublishedSkill, Registration,
    RunnerError, RunnerResult,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

const API_PREFIX: &str = "api/v1";

#[derive(Debug, Deserialize)]
struct Failure {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegisteredAgent {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    agent: RegisteredAgent,
    api_key: String,
    claim_url: String,
    verification_code: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    agent: AgentStatusReport,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    messages: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct JobsResponse {
    #[serde(default)]
    jobs: Vec<OpenJob>,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    skill: PublishedSkill,
}

/// HTTP client for a ClawOS server.
#[derive(Debug, Clone)]
pub struct HttpMarketplaceApi {
    client: Client,
    base: String,
}

impl HttpMarketplaceApi {
    /// Creates a client for the server at `api_url`.
    #[must_use]
    pub fn new(client: Client, api_url: &Url) -> Self {
        Self {
            client,
            base: api_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{API_PREFIX}{path}", self.base)
    }

    fn authorized(builder: RequestBuilder, api_key: &str) -> RequestBuilder {
        builder.bearer_auth(api_key)
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> RunnerResult<T> {
        let response = builder.send().await.map_err(RunnerError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(RunnerError::transport)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Failure>(&body)
                .ok()
                .and_then(|failure| failure.error)
                .unwrap_or_else(|| status.to_string());
            return Err(RunnerError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&body).map_err(|err| RunnerError::InvalidResponse(err.to_string()))
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn register(&self, name: &str, description: &str) -> RunnerResult<Registration> {
        let request = self
            .client
            .post(self.url("/agents/register"))
            .json(&json!({ "name": name, "description": description }));
        let response: RegisterResponse = Self::send(request).await?;
        Ok(Registration {
            agent_id: response.agent.id,
            name: response.agent.name,
            api_key: response.api_key,
            claim_url: response.claim_url,
            verification_code: response.verification_code,
        })
    }

    async fn status(&self, api_key: &str) -> RunnerResult<AgentStatusReport> {
        let request = Self::authorized(self.client.get(self.url("/agents/status")), api_key);
        let response: StatusResponse = Self::send(request).await?;
        Ok(response.agent)
    }

    async fn recent_message_count(&self, api_key: &str, limit: u32) -> RunnerResult<usize> {
        let request = Self::authorized(self.client.get(self.url("/chat/recent")), api_key)
            .query(&[("limit", limit)]);
        let response: MessagesResponse = Self::send(request).await?;
        Ok(response.messages.len())
    }

    async fn open_jobs(
        &self,
        api_key: &str,
        preferences: JobPreferences,
        limit: u32,
    ) -> RunnerResult<Vec<OpenJob>> {
        let mut query = vec![("status", "open".to_owned()), ("limit", limit.to_string())];
        if let Some(value) = preferences.category {
            query.push(("category", value));
        }
        if let Some(value) = preferences.job_type {
            query.push(("type", value));
        }
        let request =
            Self::authorized(self.client.get(self.url("/jobs")), api_key).query(&query);
        let response: JobsResponse = Self::send(request).await?;
        Ok(response.jobs)
    }

    async fn publish_skill(&self, api_key: &str, skill: &Value) -> RunnerResult<PublishedSkill> {
        let request = Self::authorized(self.client.post(self.url("/skills")), api_key).json(skill);
        let response: PublishResponse = Self::send(request).await?;
        Ok(response.skill)
    }

    async fn accept_job(&self, api_key: &str, job_id: &str) -> RunnerResult<()> {
        let path = format!("/jobs/{job_id}/accept");
        let request = Self::authorized(self.client.post(self.url(&path)), api_key);
        let _accepted: Value = Self::send(request).await?;
        Ok(())
    }

    async fn post_log(
        &self,
        api_key: &str,
        level: &str,
        message: &str,
        metadata: &Value,
    ) -> RunnerResult<()> {
        let request = Self::authorized(self.client.post(self.url("/logs")), api_key).json(
            &json!({ "level": level, "message": message, "metadata": metadata }),
        );
        let _logged: Value = Self::send(request).await?;
        Ok(())
    }

    async fn post_chat(&self, api_key: &str, content: &str) -> RunnerResult<()> {
        let request = Self::authorized(self.client.post(self.url("/chat")), api_key)
            .json(&json!({ "content": content }));
        let _posted: Value = Self::send(request).await?;
        Ok(())
    }
}
