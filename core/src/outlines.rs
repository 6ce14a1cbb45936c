use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::Paginated;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chapter-level outline entry. `structure` carries the raw structured
/// plan as the generator produced it.
#[derive(Debug, Clone, Deserialize)]
pub struct Outline {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub structure: Option<String>,
    pub order_index: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineCreate {
    pub project_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutlineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<u32>,
}

/// New ordering for a project's outlines: ids in their target sequence.
#[derive(Debug, Clone, Serialize)]
pub struct OutlineReorderRequest {
    pub project_id: String,
    pub outline_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutlineReorderResponse {
    pub message: String,
    pub updated_outlines: u64,
    pub updated_chapters: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOutlineRequest {
    pub project_id: String,
    pub chapter_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_perspective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub struct OutlinesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn outlines(&self) -> OutlinesApi<'_> {
        OutlinesApi { client: self }
    }
}

impl OutlinesApi<'_> {
    pub async fn list(&self, project_id: &str) -> Result<Vec<Outline>, ApiError> {
        let page: Paginated<Outline> = self
            .client
            .get_json(&format!("outlines/project/{project_id}"))
            .await?;
        Ok(page.items)
    }

    pub async fn get(&self, id: &str) -> Result<Outline, ApiError> {
        self.client.get_json(&format!("outlines/{id}")).await
    }

    pub async fn create(&self, data: &OutlineCreate) -> Result<Outline, ApiError> {
        self.client.post_json("outlines", data).await
    }

    pub async fn update(&self, id: &str, data: &OutlineUpdate) -> Result<Outline, ApiError> {
        self.client.put_json(&format!("outlines/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_empty(&format!("outlines/{id}")).await
    }

    pub async fn reorder(
        &self,
        data: &OutlineReorderRequest,
    ) -> Result<OutlineReorderResponse, ApiError> {
        self.client.post_json("outlines/reorder", data).await
    }

    /// Blocking (non-streaming) outline generation.
    pub async fn generate(&self, data: &GenerateOutlineRequest) -> Result<Vec<Outline>, ApiError> {
        let page: Paginated<Outline> = self.client.post_json("outlines/generate", data).await?;
        Ok(page.items)
    }
}
