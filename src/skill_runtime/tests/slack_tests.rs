//! Tests for Slack payload building and delivery.

use std::sync::Arc;

use crate::skill_runtime::{
    domain::{
        AlertPriority, SlackInputError, SlackNotification, SlackRequest, SlackTemplate,
        TemplateField,
    },
    ports::{MockWebhookPoster, WebhookReply},
    services::{SlackNotifier, SlackServiceError},
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const WEBHOOK: &str = "https://hooks.slack.com/services/T000/B000/XXXX";

#[fixture]
fn base() -> SlackRequest {
    SlackRequest {
        webhook_url: WEBHOOK.to_owned(),
        ..SlackRequest::default()
    }
}

fn block_texts(payload: &Value) -> Vec<String> {
    payload
        .get("blocks")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .map(Value::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[case("https://example.com/hook")]
#[case("hooks.slack.com")]
fn non_slack_webhooks_are_rejected(base: SlackRequest, #[case] url: &str) {
    let result = SlackNotification::new(SlackRequest {
        webhook_url: url.to_owned(),
        message: Some("hi".to_owned()),
        ..base
    });
    assert_eq!(result, Err(SlackInputError::InvalidWebhook));
}

#[rstest]
fn a_notification_needs_content(base: SlackRequest) {
    assert_eq!(
        SlackNotification::new(base),
        Err(SlackInputError::EmptyNotification)
    );
}

#[rstest]
fn overlong_usernames_are_rejected(base: SlackRequest) {
    let result = SlackNotification::new(SlackRequest {
        message: Some("hi".to_owned()),
        username: Some("u".repeat(22)),
        ..base
    });
    assert_eq!(result, Err(SlackInputError::UsernameTooLong));
}

#[rstest]
fn plain_messages_map_to_snake_case_payloads(base: SlackRequest) {
    let notification = SlackNotification::new(SlackRequest {
        message: Some("deployed".to_owned()),
        thread_ts: Some("1700000000.000100".to_owned()),
        icon_emoji: Some(":rocket:".to_owned()),
        unfurl_links: Some(false),
        ..base
    })
    .expect("valid notification");

    assert_eq!(
        notification.payload(),
        &json!({
            "text": "deployed",
            "thread_ts": "1700000000.000100",
            "icon_emoji": ":rocket:",
            "unfurl_links": false,
        })
    );
    assert_eq!(notification.thread_ts(), Some("1700000000.000100"));
}

#[rstest]
fn success_template_renders_header_and_fallback(base: SlackRequest) {
    let notification = SlackNotification::new(SlackRequest {
        template: Some(SlackTemplate::Success {
            title: "Deploy \"api\"".to_owned(),
            message: "All green".to_owned(),
        }),
        ..base
    })
    .expect("valid notification");

    let payload = notification.payload();
    assert_eq!(payload.get("text"), Some(&json!("Deploy \"api\"")));
    let blocks = block_texts(payload);
    assert_eq!(blocks.len(), 2);
    assert!(blocks.first().is_some_and(|b| b.contains("✅ Deploy \\\"api\\\"")));
}

#[rstest]
fn alert_template_shows_upper_case_priority() {
    let blocks = SlackTemplate::Alert {
        title: "Disk".to_owned(),
        description: "Almost full".to_owned(),
        priority: AlertPriority::High,
    }
    .render()
    .expect("template renders");

    assert_eq!(blocks.len(), 3);
    assert_eq!(
        blocks.last(),
        Some(&json!({
            "type": "context",
            "elements": [{"type": "mrkdwn", "text": "Priority: *HIGH*"}],
        }))
    );
}

#[rstest]
fn info_template_lists_fields() {
    let blocks = SlackTemplate::Info {
        title: "Build".to_owned(),
        fields: vec![
            TemplateField {
                title: "Branch".to_owned(),
                value: "main".to_owned(),
                short: Some(true),
            },
            TemplateField {
                title: "Status".to_owned(),
                value: "passed".to_owned(),
                short: None,
            },
        ],
    }
    .render()
    .expect("template renders");

    let fields = blocks
        .get(1)
        .and_then(|section| section.get("fields"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    assert_eq!(
        fields,
        vec![
            json!({"type": "mrkdwn", "text": "*Branch*\nmain"}),
            json!({"type": "mrkdwn", "text": "*Status*\npassed"}),
        ]
    );
}

#[rstest]
fn templates_parse_from_tagged_json() {
    let template: SlackTemplate = serde_json::from_value(json!({
        "name": "alert",
        "title": "CPU",
        "description": "Hot",
    }))
    .expect("template parses");
    assert_eq!(
        template,
        SlackTemplate::Alert {
            title: "CPU".to_owned(),
            description: "Hot".to_owned(),
            priority: AlertPriority::Medium,
        }
    );
}

#[rstest]
fn catalogue_lists_every_template() {
    let names: Vec<String> = SlackTemplate::catalogue().keys().cloned().collect();
    assert_eq!(names, ["success", "error", "info", "alert"]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ok_replies_are_delivered(base: SlackRequest) {
    let mut poster = MockWebhookPoster::new();
    poster
        .expect_post_json()
        .withf(|url, payload| {
            url.as_str() == WEBHOOK && payload.get("text") == Some(&json!("hello"))
        })
        .times(1)
        .returning(|_, _| {
            Ok(WebhookReply {
                status: 200,
                body: "ok".to_owned(),
            })
        });
    let notifier = SlackNotifier::new(Arc::new(poster), Arc::new(DefaultClock));

    let delivery = notifier
        .notify(SlackRequest {
            message: Some("hello".to_owned()),
            thread_ts: Some("1.2".to_owned()),
            ..base
        })
        .await
        .expect("delivery succeeds");

    assert!(delivery.message_id.starts_with("slack_"));
    assert_eq!(delivery.thread_ts.as_deref(), Some("1.2"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn refused_payloads_surface_the_body(base: SlackRequest) {
    let mut poster = MockWebhookPoster::new();
    poster.expect_post_json().returning(|_, _| {
        Ok(WebhookReply {
            status: 400,
            body: "invalid_blocks".to_owned(),
        })
    });
    let notifier = SlackNotifier::new(Arc::new(poster), Arc::new(DefaultClock));

    let result = notifier
        .notify(SlackRequest {
            message: Some("hello".to_owned()),
            ..base
        })
        .await;

    assert!(matches!(
        result,
        Err(SlackServiceError::Rejected { status: 400, ref body }) if body == "invalid_blocks"
    ));
}
