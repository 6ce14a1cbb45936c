use crate::client::ApiClient;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A writing style. A null `project_id` marks a platform preset: visible
/// to every project, immutable and non-deletable from the client. A style
/// owned by a project is custom and fully mutable by that project.
#[derive(Debug, Clone, Deserialize)]
pub struct WritingStyle {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<String>,
    pub name: String,
    pub style_type: StyleKind,
    #[serde(default)]
    pub preset_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub prompt_content: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub order_index: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// How the style came to be. Note that a custom style seeded from a
/// preset keeps `Preset` here while carrying a project id; ownership is
/// decided by `project_id`, never by this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Preset,
    Custom,
}

impl WritingStyle {
    pub fn is_preset(&self) -> bool {
        self.project_id.is_none()
    }

    pub fn is_custom(&self) -> bool {
        !self.is_preset()
    }
}

/// A platform preset template, identified by a string key rather than a
/// database id.
#[derive(Debug, Clone, Deserialize)]
pub struct PresetStyle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub prompt_content: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WritingStyleCreate {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_type: Option<StyleKind>,
    /// Seed the new style from a preset template; explicit fields win.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_content: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WritingStyleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetDefaultResponse {
    pub message: String,
    pub project_id: String,
    pub style_id: i64,
    pub style_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct StyleListResponse {
    #[allow(dead_code)]
    total: u64,
    styles: Vec<WritingStyle>,
}

/// The styles available to one project, in backend order: presets first,
/// then the project's custom styles. The deletion and edit guards live
/// here so a forbidden action is rejected before any network I/O.
#[derive(Debug, Clone)]
pub struct StyleCatalog {
    styles: Vec<WritingStyle>,
}

impl StyleCatalog {
    pub fn new(styles: Vec<WritingStyle>) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> &[WritingStyle] {
        &self.styles
    }

    pub fn get(&self, style_id: i64) -> Option<&WritingStyle> {
        self.styles.iter().find(|style| style.id == style_id)
    }

    pub fn presets(&self) -> impl Iterator<Item = &WritingStyle> {
        self.styles.iter().filter(|style| style.is_preset())
    }

    pub fn customs(&self) -> impl Iterator<Item = &WritingStyle> {
        self.styles.iter().filter(|style| style.is_custom())
    }

    pub fn default_style(&self) -> Option<&WritingStyle> {
        self.styles.iter().find(|style| style.is_default)
    }

    /// Presets are read-only; everything custom may be edited.
    pub fn ensure_editable(&self, style_id: i64) -> Result<&WritingStyle, ApiError> {
        let style = self.require(style_id)?;
        if style.is_preset() {
            return Err(ApiError::Precondition(
                "preset styles cannot be modified".to_string(),
            ));
        }
        Ok(style)
    }

    /// A style may be deleted when it is custom, not the project default,
    /// and not the last custom style left on its project.
    pub fn ensure_deletable(&self, style_id: i64) -> Result<&WritingStyle, ApiError> {
        let style = self.require(style_id)?;
        if style.is_preset() {
            return Err(ApiError::Precondition(
                "preset styles cannot be deleted".to_string(),
            ));
        }
        if style.is_default {
            return Err(ApiError::Precondition(
                "the default style cannot be deleted; pick another default first".to_string(),
            ));
        }
        let siblings = self
            .styles
            .iter()
            .filter(|other| other.project_id == style.project_id)
            .count();
        if siblings <= 1 {
            return Err(ApiError::Precondition(
                "a project must keep at least one style".to_string(),
            ));
        }
        Ok(style)
    }

    fn require(&self, style_id: i64) -> Result<&WritingStyle, ApiError> {
        self.get(style_id).ok_or_else(|| {
            ApiError::Precondition(format!("style {style_id} is not in this project's catalog"))
        })
    }
}

#[derive(Debug, Serialize)]
struct SetDefaultRequest<'a> {
    project_id: &'a str,
}

pub struct StylesApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn styles(&self) -> StylesApi<'_> {
        StylesApi { client: self }
    }
}

impl StylesApi<'_> {
    pub async fn presets(&self) -> Result<Vec<PresetStyle>, ApiError> {
        self.client.get_json("writing-styles/presets/list").await
    }

    pub async fn for_project(&self, project_id: &str) -> Result<StyleCatalog, ApiError> {
        let response: StyleListResponse = self
            .client
            .get_json(&format!("writing-styles/project/{project_id}"))
            .await?;
        Ok(StyleCatalog::new(response.styles))
    }

    pub async fn create(&self, data: &WritingStyleCreate) -> Result<WritingStyle, ApiError> {
        self.client.post_json("writing-styles", data).await
    }

    /// Update a custom style. Presets are rejected before any request is
    /// made.
    pub async fn update(
        &self,
        style: &WritingStyle,
        data: &WritingStyleUpdate,
    ) -> Result<WritingStyle, ApiError> {
        if style.is_preset() {
            let err = ApiError::Precondition("preset styles cannot be modified".to_string());
            self.client.report(&err);
            return Err(err);
        }
        self.client
            .put_json(&format!("writing-styles/{}", style.id), data)
            .await
    }

    /// Delete a custom style, subject to the catalog guards. Rejected
    /// requests never reach the network.
    pub async fn delete(&self, catalog: &StyleCatalog, style_id: i64) -> Result<(), ApiError> {
        if let Err(err) = catalog.ensure_deletable(style_id) {
            self.client.report(&err);
            return Err(err);
        }
        self.client
            .delete_empty(&format!("writing-styles/{style_id}"))
            .await
    }

    pub async fn set_default(
        &self,
        style_id: i64,
        project_id: &str,
    ) -> Result<SetDefaultResponse, ApiError> {
        self.client
            .post_json(
                &format!("writing-styles/{style_id}/set-default"),
                &SetDefaultRequest { project_id },
            )
            .await
    }

    /// Ensure a project has its style list seeded; returns the catalog
    /// either way.
    pub async fn initialize(&self, project_id: &str) -> Result<StyleCatalog, ApiError> {
        let response: StyleListResponse = self
            .client
            .post_json(
                &format!("writing-styles/project/{project_id}/initialize"),
                &serde_json::json!({}),
            )
            .await?;
        Ok(StyleCatalog::new(response.styles))
    }
}
