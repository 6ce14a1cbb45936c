use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// A novel project. World-setting fields are filled in by the creation
/// wizard; the backend owns the lifecycle, the client holds transient
/// copies only.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub world_time_period: Option<String>,
    #[serde(default)]
    pub world_location: Option<String>,
    #[serde(default)]
    pub world_atmosphere: Option<String>,
    #[serde(default)]
    pub world_rules: Option<String>,
    #[serde(default)]
    pub narrative_perspective: Option<String>,
    #[serde(default)]
    pub target_words: Option<u64>,
    #[serde(default)]
    pub current_words: Option<u64>,
    #[serde(default)]
    pub chapter_count: Option<u32>,
    #[serde(default)]
    pub character_count: Option<u32>,
    #[serde(default)]
    pub wizard_status: Option<String>,
    #[serde(default)]
    pub wizard_step: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_perspective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_count: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_atmosphere: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_perspective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi { client: self }
    }
}

impl ProjectsApi<'_> {
    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        self.client.get_json("projects").await
    }

    pub async fn get(&self, id: &str) -> Result<Project, ApiError> {
        self.client.get_json(&format!("projects/{id}")).await
    }

    pub async fn create(&self, data: &ProjectCreate) -> Result<Project, ApiError> {
        self.client.post_json("projects", data).await
    }

    pub async fn update(&self, id: &str, data: &ProjectUpdate) -> Result<Project, ApiError> {
        self.client.put_json(&format!("projects/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_empty(&format!("projects/{id}")).await
    }

    /// Download the chapter export for a project and write it to `out`.
    /// Returns the number of bytes written.
    pub async fn export(&self, id: &str, out: &Path) -> Result<u64, ApiError> {
        let url = self.client.endpoint(&format!("projects/{id}/export"))?;
        let response = self.client.send(self.client.request(Method::GET, url)).await?;
        let mut file = tokio::fs::File::create(out)
            .await
            .map_err(|err| ApiError::Request(format!("cannot create {}: {err}", out.display())))?;
        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk =
                chunk.map_err(|err| ApiError::Stream(format!("export interrupted: {err}")))?;
            file.write_all(&chunk)
                .await
                .map_err(|err| ApiError::Request(format!("write failed: {err}")))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|err| ApiError::Request(format!("write failed: {err}")))?;
        Ok(written)
    }
}
