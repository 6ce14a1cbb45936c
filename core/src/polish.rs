use crate::client::ApiClient;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct PolishTextRequest {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolishTextResponse {
    pub polished_text: String,
}

#[derive(Debug, Serialize)]
struct PolishBatchRequest<'a> {
    texts: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolishBatchResponse {
    pub polished_texts: Vec<String>,
}

pub struct PolishApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn polish(&self) -> PolishApi<'_> {
        PolishApi { client: self }
    }
}

impl PolishApi<'_> {
    pub async fn text(&self, data: &PolishTextRequest) -> Result<PolishTextResponse, ApiError> {
        self.client.post_json("polish", data).await
    }

    pub async fn batch(&self, texts: &[String]) -> Result<PolishBatchResponse, ApiError> {
        self.client
            .post_json("polish/batch", &PolishBatchRequest { texts })
            .await
    }
}
