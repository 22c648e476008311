//! Scrape requests and HTML extraction.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use url::Url;

const NO_TITLE: &str = "No title";

/// What to pull out of each matched element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractType {
    /// Trimmed text content; empty strings are skipped.
    #[default]
    Text,
    /// Inner HTML.
    Html,
    /// One named attribute.
    Attribute,
    /// Every anchor on the page, as `{url, text}`.
    Links,
    /// Every image on the page, as `{url, alt}`.
    Images,
}

fn default_selector() -> String {
    "body".to_owned()
}

/// Scrape input as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// Page to fetch.
    pub url: String,
    /// CSS selector for `text`, `html` and `attribute` extraction.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Extraction mode.
    #[serde(default)]
    pub extract_type: ExtractType,
    /// Attribute name for [`ExtractType::Attribute`].
    #[serde(default)]
    pub attribute: Option<String>,
    /// Extra request headers, overriding the defaults.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Invalid scrape input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeInputError {
    /// URL is not an absolute http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Selector failed to parse.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),
    /// Attribute extraction without an attribute name.
    #[error("Attribute name required when extractType is \"attribute\"")]
    MissingAttribute,
}

/// A validated scrape plan.
#[derive(Debug, Clone)]
pub struct ScrapePlan {
    url: Url,
    url_text: String,
    selector_text: String,
    selector: Selector,
    mode: Extraction,
    headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Extraction {
    Text,
    Html,
    Attribute(String),
    Links,
    Images,
}

impl ScrapePlan {
    /// Validates a request.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeInputError`] for a bad URL, a bad selector or a
    /// missing attribute name.
    pub fn new(request: ScrapeRequest) -> Result<Self, ScrapeInputError> {
        let url = Url::parse(&request.url)
            .ok()
            .filter(|parsed| matches!(parsed.scheme(), "http" | "https"))
            .ok_or_else(|| ScrapeInputError::InvalidUrl(request.url.clone()))?;
        let selector = Selector::parse(&request.selector)
            .map_err(|err| ScrapeInputError::InvalidSelector(err.to_string()))?;
        let mode = match request.extract_type {
            ExtractType::Text => Extraction::Text,
            ExtractType::Html => Extraction::Html,
            ExtractType::Attribute => Extraction::Attribute(
                request
                    .attribute
                    .filter(|name| !name.trim().is_empty())
                    .ok_or(ScrapeInputError::MissingAttribute)?,
            ),
            ExtractType::Links => Extraction::Links,
            ExtractType::Images => Extraction::Images,
        };
        Ok(Self {
            url,
            url_text: request.url,
            selector_text: request.selector,
            selector,
            mode,
            headers: request.headers,
        })
    }

    /// Returns the page URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the caller's extra headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns the extraction mode.
    #[must_use]
    pub const fn extract_type(&self) -> ExtractType {
        match self.mode {
            Extraction::Text => ExtractType::Text,
            Extraction::Html => ExtractType::Html,
            Extraction::Attribute(_) => ExtractType::Attribute,
            Extraction::Links => ExtractType::Links,
            Extraction::Images => ExtractType::Images,
        }
    }

    /// Extracts data from a fetched page.
    #[must_use]
    pub fn extract(&self, html: &str) -> ScrapeResult {
        let document = Html::parse_document(html);
        let data = match &self.mode {
            Extraction::Text => unique_values(
                document
                    .select(&self.selector)
                    .map(element_text)
                    .filter(|text| !text.is_empty()),
            ),
            Extraction::Html => {
                unique_values(document.select(&self.selector).map(|element| element.inner_html()))
            }
            Extraction::Attribute(name) => unique_values(
                document
                    .select(&self.selector)
                    .filter_map(|element| element.value().attr(name))
                    .filter(|value| !value.is_empty())
                    .map(str::to_owned),
            ),
            Extraction::Links => self.resources(&document, "a", "href", |element, href| {
                let text = element_text(element);
                let label = if text.is_empty() { href.to_owned() } else { text };
                json!({"url": "", "text": label})
            }),
            Extraction::Images => self.resources(&document, "img", "src", |element, _| {
                json!({"url": "", "alt": element.value().attr("alt").unwrap_or_default()})
            }),
        };

        ScrapeResult {
            title: page_title(&document),
            url: self.url_text.clone(),
            selector: self.selector_text.clone(),
            extract_type: self.extract_type(),
            count: data.len(),
            data,
        }
    }

    /// Collects `tag` elements carrying `attribute`, resolving the attribute
    /// against the page URL and keeping the first entry per resolved URL.
    fn resources(
        &self,
        document: &Html,
        tag: &str,
        attribute: &str,
        describe: impl Fn(ElementRef<'_>, &str) -> Value,
    ) -> Vec<Value> {
        let Ok(selector) = Selector::parse(tag) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for element in document.select(&selector) {
            let Some(reference) = element.value().attr(attribute).filter(|r| !r.is_empty())
            else {
                continue;
            };
            let resolved = self.resolve(reference);
            if !seen.insert(resolved.clone()) {
                continue;
            }
            let mut item = describe(element, reference);
            if let Some(fields) = item.as_object_mut() {
                fields.insert("url".to_owned(), Value::String(resolved));
            }
            items.push(item);
        }
        items
    }

    /// Absolute references are kept verbatim; others are joined to the page.
    fn resolve(&self, reference: &str) -> String {
        if reference.starts_with("http") {
            return reference.to_owned();
        }
        self.url
            .join(reference)
            .map_or_else(|_| reference.to_owned(), String::from)
    }
}

/// Extraction output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// `<title>`, else the first `<h1>`, else `No title`.
    pub title: String,
    /// Page URL.
    pub url: String,
    /// Selector used.
    pub selector: String,
    /// Extraction mode.
    pub extract_type: ExtractType,
    /// Extracted values.
    pub data: Vec<Value>,
    /// Number of extracted values.
    pub count: usize,
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}

fn first_text(document: &Html, tag: &str) -> Option<String> {
    let selector = Selector::parse(tag).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn page_title(document: &Html) -> String {
    first_text(document, "title")
        .or_else(|| first_text(document, "h1"))
        .unwrap_or_else(|| NO_TITLE.to_owned())
}

fn unique_values(values: impl Iterator<Item = String>) -> Vec<Value> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(value.clone()))
        .map(Value::String)
        .collect()
}
