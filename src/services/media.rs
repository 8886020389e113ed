use anyhow::Result;
use reqwest::{Client, Url};
use tracing::debug;

const RESULTS_URL: &str = "https://www.youtube.com/results";
const WATCH_URL: &str = "https://www.youtube.com/watch";
const VIDEO_ID_LEN: usize = 11;

/// Finds the first video for a query on the video site.
#[derive(Clone)]
pub struct VideoResolver {
    client: Client,
}

impl VideoResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn results_url(query: &str) -> Result<Url> {
        Ok(Url::parse_with_params(RESULTS_URL, &[("search_query", query)])?)
    }

    pub fn watch_url(video_id: &str) -> Result<Url> {
        Ok(Url::parse_with_params(WATCH_URL, &[("v", video_id)])?)
    }

    /// Watch page of the top result, or the results page when none is found.
    pub async fn resolve(&self, query: &str) -> Result<Url> {
        let results = Self::results_url(query)?;
        let html = self.client.get(results.clone()).send().await?.error_for_status()?.text().await?;
        match first_video_id(&html) {
            Some(id) => {
                debug!(%id, "Resolved first video result");
                Self::watch_url(&id)
            }
            None => Ok(results),
        }
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// First 11-character video id embedded in a results page.
pub fn first_video_id(html: &str) -> Option<String> {
    ["\"videoId\":\"", "watch?v="]
        .iter()
        .filter_map(|marker| {
            html.match_indices(marker).find_map(|(at, m)| {
                let candidate: String = html[at + m.len()..].chars().take(VIDEO_ID_LEN).collect();
                (candidate.len() == VIDEO_ID_LEN && candidate.chars().all(is_id_char)).then_some(candidate)
            })
        })
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_video_id() {
        let html = r#"{"x":1,"videoId":"dQw4w9WgXcQ","y":"videoId":"aaaaaaaaaaa"}"#;
        assert_eq!(first_video_id(html).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn falls_back_to_watch_links() {
        let html = r#"<a href="/watch?v=abcdefghijk&t=1">"#;
        assert_eq!(first_video_id(html).as_deref(), Some("abcdefghijk"));
    }

    #[test]
    fn no_id_in_page() {
        assert_eq!(first_video_id("<html>nothing</html>"), None);
    }

    #[test]
    fn results_url_encodes_query() {
        let url = VideoResolver::results_url("lo fi beats").unwrap();
        assert_eq!(url.as_str(), "https://www.youtube.com/results?search_query=lo+fi+beats");
    }
}
