use serde::Deserialize;

/// Plain `{message}` acknowledgement used by several endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `{total, items}` list envelope used by the outline collections.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub items: Vec<T>,
}
