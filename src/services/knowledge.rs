use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::KnowledgeConfig;
use crate::kernel::collaborators::KnowledgeSource;
use crate::kernel::knowledge::LookupOutcome;

const USER_AGENT: &str = concat!("lumo/", env!("CARGO_PKG_VERSION"));

/// Encyclopedia summaries from the MediaWiki REST and action APIs.
#[derive(Clone)]
pub struct WikipediaClient {
    client: Client,
    base_url: String,
    sentences: usize,
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    #[serde(default)]
    extract: String,
}

#[derive(Deserialize)]
struct ParseResponse {
    parse: ParsedLinks,
}

#[derive(Deserialize)]
struct ParsedLinks {
    #[serde(default)]
    links: Vec<PageLink>,
}

#[derive(Deserialize)]
struct PageLink {
    ns: i64,
    title: String,
    #[serde(default)]
    exists: bool,
}

impl WikipediaClient {
    pub fn new(config: &KnowledgeConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sentences: config.sentences,
        }
    }

    fn api_url(&self, params: &[(&str, &str)]) -> Result<Url> {
        Ok(Url::parse_with_params(&format!("{}/w/api.php", self.base_url), params)?)
    }

    /// Best matching article title for free text, if any.
    async fn suggest(&self, topic: &str) -> Result<Option<String>> {
        let url = self.api_url(&[
            ("action", "opensearch"),
            ("search", topic),
            ("limit", "1"),
            ("namespace", "0"),
            ("format", "json"),
        ])?;
        let body: serde_json::Value = self.client.get(url).send().await?.error_for_status()?.json().await?;
        Ok(suggested_title(&body))
    }

    /// Article links of a disambiguation page, in page order.
    async fn candidates(&self, title: &str) -> Result<Vec<String>> {
        let url = self.api_url(&[
            ("action", "parse"),
            ("page", title),
            ("prop", "links"),
            ("format", "json"),
            ("formatversion", "2"),
        ])?;
        let body: ParseResponse = self.client.get(url).send().await?.error_for_status()?.json().await?;
        Ok(candidate_titles(body))
    }

    async fn lookup(&self, topic: &str) -> Result<LookupOutcome> {
        let Some(title) = self.suggest(topic).await? else {
            return Ok(LookupOutcome::NotFound);
        };
        debug!(%title, "Suggested article");

        let segment = title.replace(' ', "_");
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("base url cannot carry a path"))?
            .pop_if_empty()
            .extend(["api", "rest_v1", "page", "summary", segment.as_str()]);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(LookupOutcome::NotFound);
        }
        let page: PageSummary = response.error_for_status()?.json().await?;

        match classify_page(page, self.sentences) {
            PageOutcome::Article(summary) => Ok(LookupOutcome::Summary(summary)),
            PageOutcome::Disambiguation { title } => {
                Ok(LookupOutcome::Disambiguation(self.candidates(&title).await?))
            }
        }
    }
}

/// What a fetched summary page turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    Article(String),
    Disambiguation { title: String },
}

fn classify_page(page: PageSummary, sentences: usize) -> PageOutcome {
    if page.kind == "disambiguation" {
        PageOutcome::Disambiguation { title: page.title }
    } else {
        PageOutcome::Article(first_sentences(&page.extract, sentences))
    }
}

/// First title of an opensearch response (`[query, [titles], [descs], [urls]]`).
fn suggested_title(body: &serde_json::Value) -> Option<String> {
    body.get(1)
        .and_then(|titles| titles.get(0))
        .and_then(|title| title.as_str())
        .map(String::from)
}

/// Existing main-namespace links, in page order. The first one is the retry target.
fn candidate_titles(response: ParseResponse) -> Vec<String> {
    response
        .parse
        .links
        .into_iter()
        .filter(|link| link.ns == 0 && link.exists)
        .map(|link| link.title)
        .collect()
}

impl KnowledgeSource for WikipediaClient {
    async fn summarize(&mut self, topic: &str) -> LookupOutcome {
        match self.lookup(topic).await {
            Ok(outcome) => outcome,
            Err(e) => LookupOutcome::Error(format!("{:#}", e)),
        }
    }
}

/// Keeps the first `count` sentences. A sentence ends at `.`, `!` or `?`
/// followed by whitespace or end of text.
pub fn first_sentences(text: &str, count: usize) -> String {
    let text = text.trim();
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == count {
                    return text[..i + c.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}
