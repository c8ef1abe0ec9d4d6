use serde::{Deserialize, Serialize};

/// Parameters for list/query operations.
///
/// Page-style pagination: `page` is 1-based and converted to an
/// offset by the service layer. `limit` is capped there as well.
#[derive(Debug, Clone, Deserialize)]
pub struct ListParams {
    /// Maximum number of results per page.
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: usize,

    /// Sort field.
    #[serde(default)]
    pub sort: Option<String>,
}

fn default_limit() -> usize {
    20
}

fn default_page() -> usize {
    1
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            page: default_page(),
            sort: None,
        }
    }
}

impl ListParams {
    /// Hard cap on page size, regardless of what the client asks for.
    pub const MAX_LIMIT: usize = 100;

    /// Build params from optional query-string values.
    pub fn from_query(page: Option<usize>, limit: Option<usize>, sort: Option<String>) -> Self {
        Self {
            limit: limit.unwrap_or_else(default_limit),
            page: page.unwrap_or_else(default_page),
            sort,
        }
    }

    /// Effective page size after capping.
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, Self::MAX_LIMIT)
    }

    /// Row offset for the requested page.
    pub fn offset(&self) -> usize {
        self.page.max(1).saturating_sub(1) * self.effective_limit()
    }
}

/// Result wrapper for list operations.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    /// Total number of pages for the effective limit.
    pub pages: usize,
}

impl<T: Serialize> ListResult<T> {
    pub fn new(items: Vec<T>, total: usize, params: &ListParams) -> Self {
        let limit = params.effective_limit();
        Self {
            items,
            total,
            page: params.page.max(1),
            pages: total.div_ceil(limit).max(1),
        }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
