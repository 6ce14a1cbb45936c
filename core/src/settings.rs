use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user generation settings: which AI provider and model to use, and
/// the sampling knobs passed through to it.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub api_provider: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub preferences: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteSettingsResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableModels {
    pub provider: String,
    pub models: Vec<ModelOption>,
    #[serde(default)]
    pub count: Option<u64>,
}

pub struct SettingsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi { client: self }
    }
}

impl SettingsApi<'_> {
    pub async fn get(&self) -> Result<Settings, ApiError> {
        self.client.get_json("settings").await
    }

    pub async fn save(&self, data: &SettingsUpdate) -> Result<Settings, ApiError> {
        self.client.post_json("settings", data).await
    }

    pub async fn update(&self, data: &SettingsUpdate) -> Result<Settings, ApiError> {
        self.client.put_json("settings", data).await
    }

    pub async fn delete(&self) -> Result<DeleteSettingsResponse, ApiError> {
        self.client.delete_json("settings").await
    }

    /// Probe a provider for its model list with explicit credentials, so
    /// the settings screen can validate a key before saving it.
    pub async fn available_models(
        &self,
        api_key: &str,
        api_base_url: &str,
        provider: &str,
    ) -> Result<AvailableModels, ApiError> {
        self.client
            .get_json_with_query(
                "settings/models",
                &[
                    ("api_key", api_key),
                    ("api_base_url", api_base_url),
                    ("provider", provider),
                ],
            )
            .await
    }
}
