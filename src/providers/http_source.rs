use crate::core::PageSource;
use crate::providers::util::with_retry;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::debug;

/// Fetches the source page over HTTP.
pub struct HttpPageSource {
    url: String,
}

impl HttpPageSource {
    pub fn new(url: &str) -> Self {
        HttpPageSource {
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self) -> Result<String> {
        debug!("Requesting source page from {}", self.url);

        let client = reqwest::Client::builder()
            .user_agent("bankcap/0.1")
            .build()?;
        let response = with_retry(|| async { client.get(&self.url).send().await }, 3, 500)
            .await
            .with_context(|| format!("Failed to send request to {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Source page {} returned HTTP {}", self.url, status));
        }

        let markup = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", self.url))?;

        if markup.trim().is_empty() {
            return Err(anyhow!("Received empty page from {}", self.url));
        }

        debug!("Fetched {} bytes of markup", markup.len());
        Ok(markup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_page_mock_server(body: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wiki/List_of_largest_banks"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_page_fetch() {
        let body = "<table><tbody><tr><td>1</td></tr></tbody></table>";
        let mock_server = create_page_mock_server(body, 200).await;
        let url = format!("{}/wiki/List_of_largest_banks", mock_server.uri());

        let markup = HttpPageSource::new(&url).fetch().await.unwrap();
        assert_eq!(markup, body);
    }

    #[tokio::test]
    async fn test_page_fetch_error_status() {
        let mock_server = create_page_mock_server("Not Found", 404).await;
        let url = format!("{}/wiki/List_of_largest_banks", mock_server.uri());

        let err = HttpPageSource::new(&url).fetch().await.unwrap_err();
        assert!(err.to_string().contains("returned HTTP 404"));
    }

    #[tokio::test]
    async fn test_page_fetch_empty_body() {
        let mock_server = create_page_mock_server("  ", 200).await;
        let url = format!("{}/wiki/List_of_largest_banks", mock_server.uri());

        let err = HttpPageSource::new(&url).fetch().await.unwrap_err();
        assert_eq!(err.to_string(), format!("Received empty page from {url}"));
    }
}
