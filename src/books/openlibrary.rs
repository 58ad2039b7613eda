//! Open Library subject search.

use super::types::Book;
use crate::transport::{build_http_client, HttpClientConfig};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

/// Source of candidate books for a subject label.
#[async_trait]
pub trait BookSource: Send + Sync {
    async fn books_for_subject(&self, subject: &str, limit: usize) -> Result<Vec<Book>>;
}

/// Open Library subject key: trimmed, lowercased, spaces replaced by `_`.
pub fn subject_key(subject: &str) -> String {
    subject.trim().to_lowercase().replace(' ', "_")
}

pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    pub fn builder() -> OpenLibraryClientBuilder {
        OpenLibraryClientBuilder::new()
    }

    fn subject_url(&self, key: &str, limit: usize) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                Error::configuration_with_context(
                    "base URL cannot carry a path",
                    ErrorContext::new()
                        .with_details(self.base_url.clone())
                        .with_source("openlibrary"),
                )
            })?
            .pop_if_empty()
            .push("subjects")
            .push(&format!("{}.json", key));
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct SubjectResponse {
    #[serde(default)]
    works: Vec<Work>,
}

#[derive(Debug, Deserialize)]
struct Work {
    title: String,
    #[serde(default)]
    authors: Vec<WorkAuthor>,
    #[serde(default)]
    description: Option<Description>,
}

#[derive(Debug, Deserialize)]
struct WorkAuthor {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) | Self::Typed { value: s } => s,
        }
    }
}

#[async_trait]
impl BookSource for OpenLibraryClient {
    async fn books_for_subject(&self, subject: &str, limit: usize) -> Result<Vec<Book>> {
        let key = subject_key(subject);
        let url = self.subject_url(&key, limit)?;
        let response = self.http_client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(
                subject = key.as_str(),
                http_status = status.as_u16(),
                "subject lookup returned no results"
            );
            return Ok(Vec::new());
        }
        let body: SubjectResponse = response.json().await?;
        Ok(body
            .works
            .into_iter()
            .map(|w| Book {
                title: w.title,
                authors: w.authors.into_iter().map(|a| a.name).collect(),
                description: w.description.map(Description::into_text),
                subject: Some(subject.to_string()),
            })
            .collect())
    }
}

pub struct OpenLibraryClientBuilder {
    base_url: Option<String>,
    http_client: Option<reqwest::Client>,
    http_config: HttpClientConfig,
}

impl OpenLibraryClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            http_client: None,
            http_config: HttpClientConfig::default(),
        }
    }
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }
    pub fn http_config(mut self, config: HttpClientConfig) -> Self {
        self.http_config = config;
        self
    }

    pub fn build(self) -> Result<OpenLibraryClient> {
        let http_client = match self.http_client {
            Some(c) => c,
            None => build_http_client(&self.http_config)?,
        };
        Ok(OpenLibraryClient {
            http_client,
            base_url: self
                .base_url
                .unwrap_or_else(|| "https://openlibrary.org".to_string()),
        })
    }
}

impl Default for OpenLibraryClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_key_normalization() {
        assert_eq!(subject_key("  Science Fiction "), "science_fiction");
        assert_eq!(subject_key("history"), "history");
    }

    #[test]
    fn test_subject_url() {
        let client = OpenLibraryClient::builder()
            .base_url("https://openlibrary.org/")
            .build()
            .unwrap();
        let url = client.subject_url("science_fiction", 20).unwrap();
        assert_eq!(
            url.as_str(),
            "https://openlibrary.org/subjects/science_fiction.json?limit=20"
        );
    }

    #[test]
    fn test_description_shapes() {
        let work: Work = serde_json::from_str(
            r#"{"title": "Dune", "description": {"type": "/type/text", "value": "Spice."}}"#,
        )
        .unwrap();
        assert_eq!(work.description.map(Description::into_text).unwrap(), "Spice.");

        let work: Work = serde_json::from_str(r#"{"title": "Dune", "description": "Spice."}"#).unwrap();
        assert_eq!(work.description.map(Description::into_text).unwrap(), "Spice.");
    }
}
