//! Slack webhook payloads and Block Kit templates.

use minijinja::{Environment, ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

const SLACK_HOST_MARKER: &str = "hooks.slack.com";
const MAX_MESSAGE_CHARS: usize = 4000;
const MAX_USERNAME_CHARS: usize = 21;

const SUCCESS_TEMPLATE: &str = r#"[
  {"type": "header", "text": {"type": "plain_text", "text": {{ ("✅ " ~ title) | json_string }}, "emoji": true} },
  {"type": "section", "text": {"type": "mrkdwn", "text": {{ message | json_string }} } }
]"#;

const ERROR_TEMPLATE: &str = r#"[
  {"type": "header", "text": {"type": "plain_text", "text": {{ ("❌ " ~ title) | json_string }}, "emoji": true} },
  {"type": "section", "text": {"type": "mrkdwn", "text": {{ message | json_string }} } }
]"#;

const INFO_TEMPLATE: &str = r#"[
  {"type": "header", "text": {"type": "plain_text", "text": {{ ("ℹ️ " ~ title) | json_string }}, "emoji": true} },
  {"type": "section", "fields": [
    {%- for field in fields %}
    {"type": "mrkdwn", "text": {{ field | json_string }} }{% if not loop.last %},{% endif %}
    {%- endfor %}
  ]}
]"#;

const ALERT_TEMPLATE: &str = r#"[
  {"type": "header", "text": {"type": "plain_text", "text": {{ ("🚨 " ~ title) | json_string }}, "emoji": true} },
  {"type": "section", "text": {"type": "mrkdwn", "text": {{ description | json_string }} } },
  {"type": "context", "elements": [
    {"type": "mrkdwn", "text": {{ ("Priority: *" ~ (priority | upper) ~ "*") | json_string }} }
  ]}
]"#;

/// One labelled value in an `info` template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
    /// Bold label.
    pub title: String,
    /// Value under the label.
    pub value: String,
    /// Accepted for compatibility; Block Kit lays fields out itself.
    #[serde(default)]
    pub short: Option<bool>,
}

/// Alert urgency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    /// Low.
    Low,
    /// Medium.
    #[default]
    Medium,
    /// High.
    High,
}

impl AlertPriority {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// Predefined Block Kit layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum SlackTemplate {
    /// Header with a check mark and a body.
    Success {
        /// Header text.
        title: String,
        /// Body text.
        message: String,
    },
    /// Header with a cross and a body.
    Error {
        /// Header text.
        title: String,
        /// Body text.
        message: String,
    },
    /// Header and a grid of labelled values.
    Info {
        /// Header text.
        title: String,
        /// Labelled values.
        fields: Vec<TemplateField>,
    },
    /// Header, description and a priority footer.
    Alert {
        /// Header text.
        title: String,
        /// Body text.
        description: String,
        /// Urgency.
        #[serde(default)]
        priority: AlertPriority,
    },
}

impl SlackTemplate {
    /// Usage hints for each template, keyed by name.
    #[must_use]
    pub fn catalogue() -> Map<String, Value> {
        [
            ("success", "Use with: { title: string, message: string }"),
            ("error", "Use with: { title: string, message: string }"),
            ("info", "Use with: { title: string, fields: array }"),
            (
                "alert",
                "Use with: { title: string, description: string, priority: string }",
            ),
        ]
        .into_iter()
        .map(|(name, hint)| (name.to_owned(), Value::String(hint.to_owned())))
        .collect()
    }

    /// Renders the template into Block Kit blocks.
    ///
    /// # Errors
    ///
    /// Returns [`SlackInputError::Template`] when rendering fails.
    pub fn render(&self) -> Result<Vec<Value>, SlackInputError> {
        let mut environment = Environment::new();
        environment.add_filter("json_string", json_string);
        let rendered = match self {
            Self::Success { title, message } => environment.render_str(
                SUCCESS_TEMPLATE,
                minijinja::context! { title, message },
            ),
            Self::Error { title, message } => environment.render_str(
                ERROR_TEMPLATE,
                minijinja::context! { title, message },
            ),
            Self::Info { title, fields } => {
                let lines: Vec<String> = fields
                    .iter()
                    .map(|field| format!("*{}*\n{}", field.title, field.value))
                    .collect();
                environment.render_str(INFO_TEMPLATE, minijinja::context! { title, fields => lines })
            }
            Self::Alert {
                title,
                description,
                priority,
            } => environment.render_str(
                ALERT_TEMPLATE,
                minijinja::context! { title, description, priority => priority.as_str() },
            ),
        }
        .map_err(|err| SlackInputError::Template(err.to_string()))?;

        serde_json::from_str(&rendered).map_err(|err| SlackInputError::Template(err.to_string()))
    }

    fn fallback_text(&self) -> &str {
        match self {
            Self::Success { title, .. }
            | Self::Error { title, .. }
            | Self::Info { title, .. }
            | Self::Alert { title, .. } => title,
        }
    }
}

fn json_string(value: &str) -> Result<String, minijinja::Error> {
    serde_json::to_string(value)
        .map_err(|err| minijinja::Error::new(ErrorKind::InvalidOperation, err.to_string()))
}

/// Notification input as submitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlackRequest {
    /// Incoming webhook URL.
    pub webhook_url: String,
    /// Plain message text.
    #[serde(default)]
    pub message: Option<String>,
    /// Raw Block Kit blocks.
    #[serde(default)]
    pub blocks: Option<Vec<Value>>,
    /// Legacy attachments.
    #[serde(default)]
    pub attachments: Option<Vec<Value>>,
    /// Predefined layout rendered into blocks.
    #[serde(default)]
    pub template: Option<SlackTemplate>,
    /// Parent message for threaded replies.
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Bot display name.
    #[serde(default)]
    pub username: Option<String>,
    /// Bot emoji icon.
    #[serde(default)]
    pub icon_emoji: Option<String>,
    /// Bot image icon.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Link preview toggle.
    #[serde(default)]
    pub unfurl_links: Option<bool>,
    /// Media preview toggle.
    #[serde(default)]
    pub unfurl_media: Option<bool>,
}

/// Invalid notification input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlackInputError {
    /// Not a Slack incoming webhook.
    #[error("Must be a valid Slack webhook URL")]
    InvalidWebhook,
    /// No message, blocks, attachments or template.
    #[error("Must provide at least one of: message, blocks, attachments, or template")]
    EmptyNotification,
    /// Message is empty or longer than 4000 characters.
    #[error("message must be between 1 and 4000 characters")]
    InvalidMessage,
    /// Username longer than 21 characters.
    #[error("username must be at most 21 characters")]
    UsernameTooLong,
    /// Icon URL is not absolute.
    #[error("iconUrl must be a valid URL")]
    InvalidIconUrl,
    /// Template rendering failed.
    #[error("template rendering failed: {0}")]
    Template(String),
}

/// Validated webhook call.
#[derive(Debug, Clone, PartialEq)]
pub struct SlackNotification {
    webhook: Url,
    payload: Value,
    thread_ts: Option<String>,
}

impl SlackNotification {
    /// Validates a request and builds the webhook payload.
    ///
    /// # Errors
    ///
    /// Returns [`SlackInputError`] describing the first invalid field.
    pub fn new(request: SlackRequest) -> Result<Self, SlackInputError> {
        let webhook = Url::parse(&request.webhook_url)
            .ok()
            .filter(|_| request.webhook_url.contains(SLACK_HOST_MARKER))
            .ok_or(SlackInputError::InvalidWebhook)?;
        if request
            .message
            .as_ref()
            .is_some_and(|text| text.is_empty() || text.chars().count() > MAX_MESSAGE_CHARS)
        {
            return Err(SlackInputError::InvalidMessage);
        }
        if request
            .username
            .as_ref()
            .is_some_and(|name| name.chars().count() > MAX_USERNAME_CHARS)
        {
            return Err(SlackInputError::UsernameTooLong);
        }
        if request
            .icon_url
            .as_deref()
            .is_some_and(|icon| Url::parse(icon).is_err())
        {
            return Err(SlackInputError::InvalidIconUrl);
        }
        if request.message.is_none()
            && request.blocks.is_none()
            && request.attachments.is_none()
            && request.template.is_none()
        {
            return Err(SlackInputError::EmptyNotification);
        }

        let mut blocks = request.blocks;
        let mut text = request.message;
        if let Some(template) = &request.template {
            blocks.get_or_insert_with(Vec::new).extend(template.render()?);
            text.get_or_insert_with(|| template.fallback_text().to_owned());
        }

        let mut payload = Map::new();
        insert_some(&mut payload, "text", text.map(Value::String));
        insert_some(&mut payload, "blocks", blocks.map(Value::Array));
        insert_some(&mut payload, "attachments", request.attachments.map(Value::Array));
        insert_some(&mut payload, "thread_ts", request.thread_ts.clone().map(Value::String));
        insert_some(&mut payload, "username", request.username.map(Value::String));
        insert_some(&mut payload, "icon_emoji", request.icon_emoji.map(Value::String));
        insert_some(&mut payload, "icon_url", request.icon_url.map(Value::String));
        insert_some(&mut payload, "unfurl_links", request.unfurl_links.map(Value::Bool));
        insert_some(&mut payload, "unfurl_media", request.unfurl_media.map(Value::Bool));

        Ok(Self {
            webhook,
            payload: Value::Object(payload),
            thread_ts: request.thread_ts,
        })
    }

    /// Returns the webhook URL.
    #[must_use]
    pub const fn webhook(&self) -> &Url {
        &self.webhook
    }

    /// Returns the JSON body to post.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Returns the parent thread, if replying.
    #[must_use]
    pub fn thread_ts(&self) -> Option<&str> {
        self.thread_ts.as_deref()
    }
}

fn insert_some(payload: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(present) = value {
        payload.insert(key.to_owned(), present);
    }
}
