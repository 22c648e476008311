//! Tests for HTML extraction, the request limiter and the scrape service.

use std::sync::{Arc, Mutex, PoisonError};

use crate::skill_runtime::{
    domain::{
        ExtractType, FixedWindowLimiter, ScrapeInputError, ScrapePlan, ScrapeRequest,
    },
    ports::{FetchedPage, MockPageFetcher},
    services::{SCRAPE_LIMIT, ScrapeService, ScrapeServiceError},
};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::json;

const PAGE: &str = r#"<html><head><title> Catalogue </title></head><body>
  <h1>Products</h1>
  <p class="item">Lamp</p><p class="item">Chair</p><p class="item">Lamp</p><p class="item">  </p>
  <a href="/about">About us</a>
  <a href="https://example.org/about">Elsewhere</a>
  <a href="https://shop.test/about">Duplicate</a>
  <a href="contact"></a>
  <img src="img/logo.png" alt="Logo"><img src="img/logo.png">
</body></html>"#;

/// Clock that only moves when told to.
struct StepClock {
    now: Mutex<DateTime<Utc>>,
}

impl StepClock {
    fn new() -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single().expect("valid")),
        }
    }

    fn advance(&self, seconds: i64) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += Duration::seconds(seconds);
    }
}

impl Clock for StepClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn request(extract_type: ExtractType, selector: &str) -> ScrapeRequest {
    ScrapeRequest {
        url: "https://shop.test/products/".to_owned(),
        selector: selector.to_owned(),
        extract_type,
        attribute: None,
        headers: Default::default(),
    }
}

fn page(status: u16, reason: &str, body: &str) -> FetchedPage {
    FetchedPage {
        status,
        reason: reason.to_owned(),
        body: body.to_owned(),
    }
}

#[rstest]
fn text_values_are_trimmed_and_unique() {
    let plan = ScrapePlan::new(request(ExtractType::Text, "p.item")).expect("valid plan");
    let result = plan.extract(PAGE);
    assert_eq!(result.title, "Catalogue");
    assert_eq!(result.data, vec![json!("Lamp"), json!("Chair")]);
    assert_eq!(result.count, 2);
}

#[rstest]
fn links_resolve_against_the_page_and_deduplicate() {
    let plan = ScrapePlan::new(request(ExtractType::Links, "body")).expect("valid plan");
    let result = plan.extract(PAGE);
    assert_eq!(
        result.data,
        vec![
            json!({"url": "https://shop.test/about", "text": "About us"}),
            json!({"url": "https://example.org/about", "text": "Elsewhere"}),
            json!({"url": "https://shop.test/products/contact", "text": "contact"}),
        ]
    );
}

#[rstest]
fn images_keep_the_first_alt_text() {
    let plan = ScrapePlan::new(request(ExtractType::Images, "body")).expect("valid plan");
    let result = plan.extract(PAGE);
    assert_eq!(
        result.data,
        vec![json!({"url": "https://shop.test/products/img/logo.png", "alt": "Logo"})]
    );
}

#[rstest]
fn attribute_extraction_reads_the_named_attribute() {
    let plan = ScrapePlan::new(ScrapeRequest {
        attribute: Some("href".to_owned()),
        ..request(ExtractType::Attribute, "a")
    })
    .expect("valid plan");
    let result = plan.extract(PAGE);
    assert_eq!(result.count, 4);
    assert_eq!(result.data.first(), Some(&json!("/about")));
}

#[rstest]
#[case("<html><body><h1>Heading</h1></body></html>", "Heading")]
#[case("<html><body><p>plain</p></body></html>", "No title")]
fn title_falls_back_to_heading_then_placeholder(#[case] html: &str, #[case] expected: &str) {
    let plan = ScrapePlan::new(request(ExtractType::Text, "p")).expect("valid plan");
    assert_eq!(plan.extract(html).title, expected);
}

#[rstest]
fn attribute_mode_requires_a_name() {
    let result = ScrapePlan::new(request(ExtractType::Attribute, "a"));
    assert!(matches!(result, Err(ScrapeInputError::MissingAttribute)));
}

#[rstest]
#[case("ftp://shop.test/file")]
#[case("not a url")]
fn only_web_urls_are_accepted(#[case] url: &str) {
    let result = ScrapePlan::new(ScrapeRequest {
        url: url.to_owned(),
        ..request(ExtractType::Text, "body")
    });
    assert!(matches!(result, Err(ScrapeInputError::InvalidUrl(_))));
}

#[rstest]
fn malformed_selectors_are_rejected() {
    let result = ScrapePlan::new(request(ExtractType::Text, "p[["));
    assert!(matches!(result, Err(ScrapeInputError::InvalidSelector(_))));
}

#[rstest]
fn limiter_denies_past_the_limit_and_resets_after_the_window() {
    let clock = Arc::new(StepClock::new());
    let limiter = FixedWindowLimiter::new(3, Duration::seconds(60), Arc::clone(&clock));

    assert!((0..3).all(|_| limiter.try_acquire("10.0.0.1")));
    assert!(!limiter.try_acquire("10.0.0.1"));
    assert!(limiter.try_acquire("10.0.0.2"));

    clock.advance(60);
    assert!(!limiter.try_acquire("10.0.0.1"));
    clock.advance(1);
    assert!(limiter.try_acquire("10.0.0.1"));
}

#[rstest]
fn limiter_forgets_clients_whose_windows_have_ended() {
    let clock = Arc::new(StepClock::new());
    let limiter = FixedWindowLimiter::new(3, Duration::seconds(60), Arc::clone(&clock));

    for client in ["10.0.0.1", "10.0.0.2", "10.0.0.3"] {
        assert!(limiter.try_acquire(client));
    }
    assert_eq!(limiter.tracked_clients(), 3);

    clock.advance(61);
    assert!(limiter.try_acquire("10.0.0.4"));

    assert_eq!(limiter.tracked_clients(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_relays_upstream_failures() {
    let mut fetcher = MockPageFetcher::new();
    fetcher
        .expect_fetch()
        .times(1)
        .returning(|_, _| Ok(page(404, "Not Found", "")));
    let service = ScrapeService::new(Arc::new(fetcher), Arc::new(StepClock::new()));

    let result = service
        .scrape("client", request(ExtractType::Text, "body"))
        .await;

    assert!(matches!(
        result,
        Err(ScrapeServiceError::Upstream { status: 404, .. })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn service_rate_limits_each_client() {
    let mut fetcher = MockPageFetcher::new();
    fetcher
        .expect_fetch()
        .times(usize::try_from(SCRAPE_LIMIT).expect("limit fits"))
        .returning(|_, _| Ok(page(200, "OK", PAGE)));
    let service = ScrapeService::new(Arc::new(fetcher), Arc::new(StepClock::new()));

    for _ in 0..SCRAPE_LIMIT {
        service
            .scrape("client", request(ExtractType::Text, "h1"))
            .await
            .expect("within limit");
    }
    let denied = service
        .scrape("client", request(ExtractType::Text, "h1"))
        .await;

    assert!(matches!(denied, Err(ScrapeServiceError::RateLimited)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_requests_do_not_consume_quota_or_fetch() {
    let fetcher = MockPageFetcher::new();
    let service = ScrapeService::new(Arc::new(fetcher), Arc::new(StepClock::new()));

    let result = service
        .scrape("client", request(ExtractType::Attribute, "a"))
        .await;

    assert!(matches!(
        result,
        Err(ScrapeServiceError::Input(ScrapeInputError::MissingAttribute))
    ));
}
