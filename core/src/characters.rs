use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A character or organization in a project. Organizations reuse the
/// character record with `is_organization` set and the organization
/// fields populated.
#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub is_organization: bool,
    #[serde(default)]
    pub role_type: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub appearance: Option<String>,
    #[serde(default)]
    pub relationships: Option<String>,
    #[serde(default)]
    pub organization_type: Option<String>,
    #[serde(default)]
    pub organization_purpose: Option<String>,
    #[serde(default)]
    pub organization_members: Option<String>,
    #[serde(default)]
    pub traits: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CharacterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCharacterRequest {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_context: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

pub struct CharactersApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn characters(&self) -> CharactersApi<'_> {
        CharactersApi { client: self }
    }
}

impl CharactersApi<'_> {
    pub async fn list(&self, project_id: &str) -> Result<Vec<Character>, ApiError> {
        self.client
            .get_json(&format!("characters/project/{project_id}"))
            .await
    }

    pub async fn get(&self, id: &str) -> Result<Character, ApiError> {
        self.client.get_json(&format!("characters/{id}")).await
    }

    pub async fn update(&self, id: &str, data: &CharacterUpdate) -> Result<Character, ApiError> {
        self.client.put_json(&format!("characters/{id}"), data).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete_empty(&format!("characters/{id}")).await
    }

    /// Blocking (non-streaming) single-character generation.
    pub async fn generate(&self, data: &GenerateCharacterRequest) -> Result<Character, ApiError> {
        self.client.post_json("characters/generate", data).await
    }
}
