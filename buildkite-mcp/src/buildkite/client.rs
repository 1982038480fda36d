//! `reqwest` implementation of [`BuildkiteApi`]

use super::{ApiError, ApiRequest, BuildkiteApi};
use crate::config::ApiConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use url::Url;

/// `User-Agent` sent with every request
pub fn user_agent(version: &str) -> String {
    format!(
        "buildkite-mcp-server/{version} ({}; {})",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Buildkite REST API client authenticated with a bearer token
#[derive(Debug, Clone)]
pub struct HttpBuildkiteClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpBuildkiteClient {
    /// Build a client from resolved API configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured header is not valid HTTP or the
    /// underlying HTTP client cannot be constructed.
    pub fn new(config: &ApiConfig, user_agent: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ApiError::InvalidHeader(AUTHORIZATION.to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(key.clone()))?;
            let value =
                HeaderValue::from_str(value).map_err(|_| ApiError::InvalidHeader(key.clone()))?;
            headers.insert(name, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Resolve a request against the base URL, percent-encoding each segment
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty();
            segments.extend(&request.segments);
        }
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Parse a download URL, accepting only the base URL's origin.
    ///
    /// Every request carries the bearer token, so URLs on any other scheme,
    /// host or port are rejected before anything is sent.
    pub fn download_url(&self, url: &str) -> Result<Url, ApiError> {
        let parsed = Url::parse(url).map_err(|e| ApiError::InvalidUrl(format!("{url}: {e}")))?;
        if parsed.origin() != self.base_url.origin() {
            return Err(ApiError::ForeignHost(
                parsed.host_str().unwrap_or_default().to_string(),
            ));
        }
        Ok(parsed)
    }
}

#[async_trait::async_trait]
impl BuildkiteApi for HttpBuildkiteClient {
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = ?request.method, path = %request.path(), "Sending Buildkite API request");

        let mut builder = self.http.request(request.method.into(), url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            tracing::debug!(status = status.as_u16(), path = %request.path(), "Buildkite API request failed");
            return Err(ApiError::from_status(status.as_u16(), body));
        }

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.download_url(url)?;
        tracing::debug!(url = %url, "Downloading from Buildkite API");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ApiError::from_status(status.as_u16(), body));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpBuildkiteClient {
        let config = ApiConfig::new("test-token", base_url).unwrap();
        HttpBuildkiteClient::new(&config, &user_agent("test")).unwrap()
    }

    #[test]
    fn test_user_agent_format() {
        let agent = user_agent("1.2.3");
        assert!(agent.starts_with("buildkite-mcp-server/1.2.3 ("));
        assert!(agent.contains(std::env::consts::OS));
        assert!(agent.ends_with(')'));
    }

    #[test]
    fn test_url_for_joins_and_encodes_segments() {
        let client = client("https://api.buildkite.com/");
        let request = ApiRequest::get(["v2", "organizations", "acme", "pipelines", "my pipeline"])
            .with_query("branch", "feature/x");

        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.buildkite.com/v2/organizations/acme/pipelines/my%20pipeline?branch=feature%2Fx"
        );
    }

    #[test]
    fn test_url_for_respects_base_path() {
        let client = client("http://localhost:8080/proxy/");
        let url = client.url_for(&ApiRequest::get(["v2", "user"])).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v2/user");
    }

    #[test]
    fn test_download_url_must_match_api_origin() {
        let client = client("https://api.buildkite.com/");

        let url = client
            .download_url("https://api.buildkite.com/v2/organizations/acme/artifacts/1/download")
            .unwrap();
        assert_eq!(url.host_str(), Some("api.buildkite.com"));

        for foreign in [
            "https://evil.example.com/v2/steal",
            "http://api.buildkite.com/v2/user",
            "https://api.buildkite.com:8443/v2/user",
        ] {
            assert!(
                matches!(client.download_url(foreign), Err(ApiError::ForeignHost(_))),
                "{foreign} should be rejected"
            );
        }
        assert!(matches!(
            client.download_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_download_to_foreign_host_sends_nothing() {
        let client = client("https://api.buildkite.com/");
        let result = client.download("https://evil.example.com/artifact").await;
        assert!(matches!(result, Err(ApiError::ForeignHost(host)) if host == "evil.example.com"));
    }

    #[test]
    fn test_invalid_extra_header_is_rejected() {
        let config = ApiConfig::new("test-token", "https://api.buildkite.com/")
            .unwrap()
            .with_headers(vec![("bad header".to_string(), "value".to_string())]);
        let result = HttpBuildkiteClient::new(&config, "agent");
        assert!(matches!(result, Err(ApiError::InvalidHeader(_))));
    }
}
