//! HTTP client for the Medias API.

use anyhow::{Context, Result};
use medias_core::models::{Media, Tag};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
const API_PREFIX: &str = "/api/v1";

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}

#[derive(Debug, Deserialize)]
pub struct TagList {
    pub data: Vec<Tag>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct CreateMediaBody<'a> {
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub mime_type: &'a str,
    pub size: i64,
    pub sha256: &'a str,
    pub tags: &'a [String],
}

#[derive(Debug, Serialize)]
struct CreateTagBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Reservation returned by `POST /media`. `created` is false when an existing reservation
/// was handed back.
#[derive(Debug)]
pub struct Reservation {
    pub media: Media,
    pub created: bool,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create client from `MEDIAS_API_URL`, defaulting to a local server.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("MEDIAS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    pub async fn create_media(&self, body: &CreateMediaBody<'_>) -> Result<Reservation> {
        let response = self
            .client
            .post(self.api_url("/media"))
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        let created = response.status() == StatusCode::CREATED;
        let envelope: DataEnvelope<Media> = parse_json(response).await?;
        Ok(Reservation {
            media: envelope.data,
            created,
        })
    }

    pub async fn finalize_media(&self, id: Uuid) -> Result<Media> {
        let response = self
            .client
            .post(self.api_url(&format!("/media/{}/finalize", id)))
            .send()
            .await
            .context("Failed to send request")?;
        let envelope: DataEnvelope<Media> = parse_json(response).await?;
        Ok(envelope.data)
    }

    pub async fn get_media(&self, id: Uuid) -> Result<Media> {
        let response = self
            .client
            .get(self.api_url(&format!("/media/{}", id)))
            .send()
            .await
            .context("Failed to send request")?;
        let envelope: DataEnvelope<Media> = parse_json(response).await?;
        Ok(envelope.data)
    }

    pub async fn create_tag(&self, name: &str, description: Option<&str>) -> Result<Tag> {
        let response = self
            .client
            .post(self.api_url("/tags"))
            .json(&CreateTagBody { name, description })
            .send()
            .await
            .context("Failed to send request")?;
        let envelope: DataEnvelope<Tag> = parse_json(response).await?;
        Ok(envelope.data)
    }

    pub async fn list_tags(&self, limit: Option<i64>, offset: Option<i64>) -> Result<TagList> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(l) = limit {
            query.push(("limit", l.to_string()));
        }
        if let Some(o) = offset {
            query.push(("offset", o.to_string()));
        }

        let response = self
            .client
            .get(self.api_url("/tags"))
            .query(&query)
            .send()
            .await
            .context("Failed to send request")?;
        parse_json(response).await
    }

    /// PUT file contents to a presigned upload URL.
    pub async fn upload_to_presigned(
        &self,
        url: &str,
        contents: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let size = contents.len();
        let response = self
            .client
            .put(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(contents)
            .send()
            .await
            .context("Failed to upload file")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "Upload failed with status {}: {}",
                status,
                error_text
            ));
        }

        tracing::info!(size, "File uploaded");
        Ok(())
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "API request failed with status {}: {}",
            status,
            error_text
        ));
    }

    response
        .json()
        .await
        .context("Failed to parse response as JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_joins_prefix() {
        let client = ApiClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.api_url("/media/abc/finalize"),
            "http://localhost:8080/api/v1/media/abc/finalize"
        );
    }

    #[test]
    fn create_body_uses_title_for_filename() {
        let tags = vec!["soccer".to_string()];
        let body = CreateMediaBody {
            title: "clip.mp4",
            description: None,
            mime_type: "video/mp4",
            size: 500,
            sha256: "abc123",
            tags: &tags,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["title"], "clip.mp4");
        assert_eq!(json["tags"][0], "soccer");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn tag_list_parses_envelope() {
        let raw = serde_json::json!({
            "data": [{
                "id": "6f1c1d64-3f5e-4d56-9a43-0c7a0d7d6b1a",
                "name": "soccer",
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-01T00:00:00Z"
            }],
            "pagination": {"limit": 50, "offset": 0, "total": 1}
        });
        let list: TagList = serde_json::from_value(raw).unwrap();
        assert_eq!(list.data[0].name, "soccer");
        assert_eq!(
            list.pagination,
            Pagination {
                limit: 50,
                offset: 0,
                total: 1
            }
        );
    }
}
