use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// HTTP side of a lookup. One client is shared across words; no caching, no retries.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    origin: String,
    base: Url,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = Url::parse(&settings.origin).map_err(|e| Error::InvalidUrl {
            url: settings.origin.clone(),
            reason: e.to_string(),
        })?;
        let timeout = settings.timeout();
        let client = Client::builder()
            .default_headers(header_map(settings)?)
            .timeout(timeout)
            .build()
            .map_err(|source| Error::Transport { url: settings.origin.clone(), source })?;

        Ok(Fetcher {
            client,
            origin: settings.origin.trim_end_matches('/').to_string(),
            base,
            timeout,
        })
    }

    /// Site origin used to absolutize media links.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// `{origin}/dictionary/{dictionary}/{word}`; inner whitespace in `word`
    /// becomes `-` the way the site slugs multi-word entries.
    pub fn page_url(&self, dictionary: &str, word: &str) -> Result<Url> {
        let slug = word.split_whitespace().collect::<Vec<_>>().join("-");
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::InvalidUrl {
                url: self.origin.clone(),
                reason: "origin cannot be a base url".to_string(),
            })?
            .pop_if_empty()
            .extend(["dictionary", dictionary, slug.as_str()]);
        Ok(url)
    }

    pub async fn fetch(&self, url: Url) -> Result<String> {
        info!(url = %url, "fetching page");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, %status, "dictionary returned non-success status");
        }
        response
            .error_for_status()
            .map_err(|e| self.classify(&url, e))?
            .text()
            .await
            .map_err(|e| self.classify(&url, e))
    }

    fn classify(&self, url: &Url, source: reqwest::Error) -> Error {
        if source.is_timeout() {
            Error::Timeout { url: url.to_string(), timeout: self.timeout }
        } else {
            Error::Transport { url: url.to_string(), source }
        }
    }
}

fn header_map(settings: &Settings) -> Result<HeaderMap> {
    let invalid = |name: &str| Error::InvalidHeader { name: name.to_string() };

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&settings.user_agent).map_err(|_| invalid("User-Agent"))?,
    );
    for (name, value) in &settings.headers {
        let header = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid(name.as_str()))?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid(name.as_str()))?;
        headers.insert(header, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_dictionary_urls() {
        let fetcher = Fetcher::new(&Settings::default()).unwrap();
        assert_eq!(
            fetcher.page_url("english", "reconnaissance").unwrap().as_str(),
            "https://dictionary.cambridge.org/dictionary/english/reconnaissance"
        );
        assert_eq!(
            fetcher.page_url("english-french", "  look  after ").unwrap().as_str(),
            "https://dictionary.cambridge.org/dictionary/english-french/look-after"
        );
        assert_eq!(fetcher.origin(), "https://dictionary.cambridge.org");
    }

    #[test]
    fn origin_with_trailing_slash() {
        let settings = Settings { origin: "http://localhost:8080/".into(), ..Default::default() };
        let fetcher = Fetcher::new(&settings).unwrap();
        assert_eq!(fetcher.origin(), "http://localhost:8080");
        assert_eq!(
            fetcher.page_url("english", "a").unwrap().as_str(),
            "http://localhost:8080/dictionary/english/a"
        );
    }

    #[test]
    fn custom_headers_override_user_agent() {
        let mut settings = Settings::default();
        settings.headers.insert("User-Agent".into(), "test-agent".into());
        settings.headers.insert("Accept-Language".into(), "en-GB".into());
        let headers = header_map(&settings).unwrap();
        assert_eq!(headers.get(USER_AGENT).unwrap(), "test-agent");
        assert_eq!(headers.get("accept-language").unwrap(), "en-GB");
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut settings = Settings::default();
        settings.headers.insert("Bad Header".into(), "x".into());
        assert!(matches!(header_map(&settings), Err(Error::InvalidHeader { .. })));

        let settings = Settings { origin: "not a url".into(), ..Default::default() };
        assert!(matches!(Fetcher::new(&settings), Err(Error::InvalidUrl { .. })));
    }
}
