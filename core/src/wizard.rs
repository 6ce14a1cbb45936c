use crate::characters::Character;
use crate::client::ApiClient;
use crate::stream::{StreamOptions, StreamSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wizard endpoints. Every call here opens a generation stream: progress
/// and text deltas flow through the options callbacks, the typed final
/// payload arrives in the `result` frame.
pub struct WizardApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn wizard(&self) -> WizardApi<'_> {
        WizardApi { client: self }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldBuildingRequest {
    pub title: String,
    pub description: String,
    pub theme: String,
    pub genre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative_perspective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// The world setting the wizard produced, together with the project it
/// created or updated.
#[derive(Debug, Clone, Deserialize)]
pub struct WorldBuilding {
    pub project_id: String,
    #[serde(default)]
    pub time_period: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub atmosphere: Option<String>,
    #[serde(default)]
    pub rules: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardCharactersRequest {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_context: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedCharacters {
    pub message: String,
    pub count: u32,
    #[serde(default)]
    pub batches: Option<u32>,
    pub characters: Vec<Character>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardOutlineRequest {
    pub project_id: String,
    pub chapter_count: u32,
    pub narrative_perspective: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_words: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Abbreviated outline rows as the wizard reports them; the full records
/// come from the outlines API afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineDigest {
    pub order_index: u32,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedOutline {
    pub message: String,
    pub count: u32,
    pub outlines: Vec<OutlineDigest>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorldBuildingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupCounts {
    pub characters: u64,
    pub outlines: u64,
    pub chapters: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CleanupSummary {
    pub message: String,
    pub deleted: CleanupCounts,
}

impl WizardApi<'_> {
    /// Step 1: generate the world setting and create the project.
    pub async fn world_building(
        &self,
        request: &WorldBuildingRequest,
        options: StreamOptions<WorldBuilding>,
    ) -> StreamSummary {
        self.client
            .stream_post("wizard-stream/world-building", request, options)
            .await
    }

    /// Step 2: generate the cast in batches.
    pub async fn characters(
        &self,
        request: &WizardCharactersRequest,
        options: StreamOptions<GeneratedCharacters>,
    ) -> StreamSummary {
        self.client
            .stream_post("wizard-stream/characters", request, options)
            .await
    }

    /// Step 3: generate the opening outline.
    pub async fn outline(
        &self,
        request: &WizardOutlineRequest,
        options: StreamOptions<GeneratedOutline>,
    ) -> StreamSummary {
        self.client
            .stream_post("wizard-stream/outline", request, options)
            .await
    }

    /// Edit the stored world setting without regenerating it.
    pub async fn update_world_building(
        &self,
        project_id: &str,
        update: &WorldBuildingUpdate,
        options: StreamOptions<WorldBuilding>,
    ) -> StreamSummary {
        self.client
            .stream_post(
                &format!("wizard-stream/world-building/{project_id}"),
                update,
                options,
            )
            .await
    }

    /// Throw the world setting away and generate a fresh one.
    pub async fn regenerate_world_building(
        &self,
        project_id: &str,
        request: &RegenerateRequest,
        options: StreamOptions<WorldBuilding>,
    ) -> StreamSummary {
        self.client
            .stream_post(
                &format!("wizard-stream/world-building/{project_id}/regenerate"),
                request,
                options,
            )
            .await
    }

    /// Delete the project and everything the wizard created for it, for
    /// when the user backs out of the flow.
    pub async fn cleanup(
        &self,
        project_id: &str,
        options: StreamOptions<CleanupSummary>,
    ) -> StreamSummary {
        self.client
            .stream_post(
                &format!("wizard-stream/cleanup/{project_id}"),
                &serde_json::json!({}),
                options,
            )
            .await
    }
}
