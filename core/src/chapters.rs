use crate::client::ApiClient;
use crate::error::ApiError;
use crate::stream::{GeneratedText, StreamOptions, StreamSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub project_id: String,
    pub chapter_number: u32,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub word_count: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterCreate {
    pub project_id: String,
    pub title: String,
    pub chapter_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Chapter number and word count are owned by the backend: ordering
/// changes go through outline reordering, the count is derived.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChapterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Whether a chapter's prerequisites (all earlier chapters written) are
/// satisfied, with the state of each preceding chapter.
#[derive(Debug, Clone, Deserialize)]
pub struct CanGenerateResponse {
    pub can_generate: bool,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub previous_chapters: Vec<PreviousChapter>,
    pub chapter_number: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviousChapter {
    pub id: String,
    pub chapter_number: u32,
    pub title: String,
    pub has_content: bool,
    pub word_count: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChapterGenerateRequest {
    /// Writing style to apply; omitted means no style prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<i64>,
}

pub struct ChaptersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn chapters(&self) -> ChaptersApi<'_> {
        ChaptersApi { client: self }
    }
}

impl ChaptersApi<'_> {
    pub async fn list(&self, project_id: &str) -> Result<Vec<Chapter>, ApiError> {
        self.client
            .get_json(&format!("chapters/project/{project_id}"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Chapter, ApiError> {
        self.client.get_json(&format!("chapters/{id}")).await
    }

    pub async fn create(&self, data: &ChapterCreate) -> Result<Chapter, ApiError> {
        self.client.post_json("chapters", data).await
    }

    pub async fn update(&self, id: &str, data: &ChapterUpdate) -> Result<Chapter, ApiError> {
        self.client.put_json(&format!("chapters/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_empty(&format!("chapters/{id}")).await
    }

    pub async fn can_generate(&self, id: &str) -> Result<CanGenerateResponse, ApiError> {
        self.client
            .get_json(&format!("chapters/{id}/can-generate"))
            .await
    }

    /// Stream AI drafting for a chapter. Text deltas arrive through the
    /// progress callback; the completed draft (assembled text plus the
    /// reported word count) is delivered once at the end.
    pub async fn generate_stream(
        &self,
        id: &str,
        request: &ChapterGenerateRequest,
        options: StreamOptions<GeneratedText>,
    ) -> StreamSummary {
        self.client
            .stream_text_post(&format!("chapters/{id}/generate-stream"), request, options)
            .await
    }
}
