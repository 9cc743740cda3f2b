//! Search retrieval: provider request, link parsing, filtering

use super::links::{LinkFilter, LinkList};
use crate::config::SearchSettings;
use crate::engines::Engine;
use crate::error::SearchError;
use crate::network::HttpClient;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info};

/// Something that turns a search query into ranked source URLs
#[async_trait]
pub trait LinkRetriever: Send + Sync {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<LinkList, SearchError>;
}

/// Retrieves links from a single search engine
pub struct SearchRetriever {
    client: HttpClient,
    engine: Arc<dyn Engine>,
    filter: LinkFilter,
    timeout: Duration,
}

impl SearchRetriever {
    pub fn new(client: HttpClient, engine: Arc<dyn Engine>, settings: &SearchSettings) -> Self {
        let denylist = settings
            .denylist
            .iter()
            .map(String::as_str)
            .chain(engine.own_domains())
            .map(String::from)
            .collect::<Vec<_>>();

        Self {
            client,
            filter: LinkFilter::new(denylist),
            timeout: Duration::from_secs_f64(settings.timeout),
            engine,
        }
    }

    /// Set the search timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl LinkRetriever for SearchRetriever {
    async fn retrieve(&self, query: &str, limit: usize) -> Result<LinkList, SearchError> {
        let engine_name = self.engine.name().to_string();
        let request = self.engine.request(query);

        debug!("Searching {} with timeout {:?}", engine_name, self.timeout);

        let response = match timeout(
            self.timeout,
            self.client.execute_with_timeout(request, self.timeout),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(SearchError::Timeout {
                    engine: engine_name,
                    seconds: self.timeout.as_secs_f64(),
                })
            }
            Ok(Err(e)) => {
                return Err(SearchError::Request {
                    engine: engine_name,
                    source: e,
                })
            }
            Err(_) => {
                return Err(SearchError::Timeout {
                    engine: engine_name,
                    seconds: self.timeout.as_secs_f64(),
                })
            }
        };

        let candidates = self.engine.response(response)?;
        let candidate_count = candidates.len();
        let links = self.filter.apply(candidates, limit);

        info!(
            "Engine {} returned {} candidate links, kept {}",
            engine_name,
            candidate_count,
            links.len()
        );

        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::google::Google;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RESULT_PAGE: &str = r#"
        <html><body>
          <a href="/url?q=https://en.wikipedia.org/wiki/Paris&amp;sa=U">1</a>
          <a href="/url?q=https://en.wikipedia.org/wiki/Paris&amp;sa=U">1 again</a>
          <a href="/url?q=https://www.youtube.com/watch%3Fv%3D1&amp;sa=U">video</a>
          <a href="/url?q=https://en.wikipedia.org/wiki/France&amp;sa=U">same host</a>
          <a href="/url?q=https://support.google.com/websearch&amp;sa=U">provider</a>
          <a href="/url?q=https://www.britannica.com/place/Paris&amp;sa=U">2</a>
          <a href="/url?q=https://www.parisinfo.com/&amp;sa=U">3</a>
          <a href="/url?q=https://www.france24.com/en/&amp;sa=U">4</a>
          <a href="/url?q=https://www.lonelyplanet.com/france/paris&amp;sa=U">5</a>
          <a href="/url?q=https://www.bbc.co.uk/news/paris&amp;sa=U">6</a>
        </body></html>
    "#;

    async fn retriever_for(server: &MockServer, settings: SearchSettings) -> SearchRetriever {
        let engine = Arc::new(Google::with_base_url(format!("{}/search", server.uri())));
        SearchRetriever::new(HttpClient::new().unwrap(), engine, &settings)
    }

    #[tokio::test]
    async fn test_retrieve_filters_and_truncates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "capital of France"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(RESULT_PAGE, "text/html"),
            )
            .mount(&server)
            .await;

        let retriever = retriever_for(&server, SearchSettings::default()).await;
        let links = retriever.retrieve("capital of France", 5).await.unwrap();

        assert_eq!(
            links.as_slice(),
            &[
                "https://en.wikipedia.org/wiki/Paris".to_string(),
                "https://www.britannica.com/place/Paris".to_string(),
                "https://www.parisinfo.com/".to_string(),
                "https://www.france24.com/en/".to_string(),
                "https://www.lonelyplanet.com/france/paris".to_string(),
            ][..]
        );
    }

    #[tokio::test]
    async fn test_engine_domain_always_denied() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(
                    r#"<a href="/url?q=https://support.google.com/x&amp;sa=U">x</a>"#,
                    "text/html",
                ),
            )
            .mount(&server)
            .await;

        let settings = SearchSettings {
            denylist: vec![],
            ..SearchSettings::default()
        };
        let retriever = retriever_for(&server, settings).await;
        let links = retriever.retrieve("x", 5).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_is_search_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let retriever = retriever_for(&server, SearchSettings::default()).await;
        let err = retriever.retrieve("x", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let retriever = retriever_for(&server, SearchSettings::default())
            .await
            .with_timeout(Duration::from_millis(50));
        let err = retriever.retrieve("x", 5).await.unwrap_err();
        assert!(matches!(err, SearchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_provider() {
        let engine = Arc::new(Google::with_base_url("http://127.0.0.1:9/search"));
        let retriever =
            SearchRetriever::new(HttpClient::new().unwrap(), engine, &SearchSettings::default());
        let err = retriever.retrieve("x", 5).await.unwrap_err();
        assert!(matches!(
            err,
            SearchError::Request { .. } | SearchError::Timeout { .. }
        ));
    }
}
