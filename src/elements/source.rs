use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::elements::{ElementSet, ElementsError};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// One strategy for obtaining the element set of a satellite.
#[async_trait]
pub trait ElementSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, norad_id: u32) -> Result<ElementSet, ElementsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// JSON object or array carrying the lines, raw text accepted as well
    JsonOrText,
    Text,
}

/// Element source backed by an HTTP GET. The URL template may contain a
/// `{norad_id}` placeholder.
pub struct HttpSource {
    name: String,
    url_template: String,
    format: BodyFormat,
    timeout: Duration,
    client: Client,
}

impl HttpSource {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        format: BodyFormat,
        client: Client,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            format,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            client,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self, norad_id: u32) -> String {
        self.url_template.replace("{norad_id}", &norad_id.to_string())
    }
}

#[async_trait]
impl ElementSource for HttpSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, norad_id: u32) -> Result<ElementSet, ElementsError> {
        let url = self.url(norad_id);
        log::debug!("requesting element set from {}", url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ElementsError::from_reqwest(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(ElementsError::Status(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ElementsError::from_reqwest(e, self.timeout))?;

        match self.format {
            BodyFormat::JsonOrText => parse_response_body(&body),
            BodyFormat::Text => ElementSet::from_text(&body),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TleRecord {
    tle: Option<String>,
    header: Option<String>,
    line1: Option<String>,
    line2: Option<String>,
}

impl TleRecord {
    /// Entries that are not objects of the expected shape yield nothing.
    fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    fn element_set(&self) -> Option<ElementSet> {
        if let Some(set) = self
            .tle
            .as_deref()
            .and_then(|tle| ElementSet::from_text(tle).ok())
        {
            return Some(set);
        }

        let text = format!("{}\n{}", self.line1.as_deref()?, self.line2.as_deref()?);
        let mut set = ElementSet::from_text(&text).ok()?;
        set.name = self.header.clone();
        Some(set)
    }
}

/// Structured payload first, then a raw line scan of the same body.
pub fn parse_response_body(body: &str) -> Result<ElementSet, ElementsError> {
    let structured = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Array(entries)) => entries
            .into_iter()
            .filter_map(TleRecord::from_value)
            .find_map(|record| record.element_set()),
        Ok(value) => TleRecord::from_value(value).and_then(|record| record.element_set()),
        Err(_) => None,
    };

    match structured {
        Some(set) => Ok(set),
        None => ElementSet::from_text(body),
    }
}
