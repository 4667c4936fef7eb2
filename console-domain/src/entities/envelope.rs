// Response envelope and pagination entities

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::utils::{lenient_text, lenient_u64, optional_u32};

/// `{ code, message, data }` wrapper every endpoint answers with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default)]
    pub data: Value,
    /// Top-level fields beyond the envelope, e.g. flat sync results.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            code: 0,
            message: String::new(),
            data,
            extra: Map::new(),
        }
    }

    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(self.data.clone()).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Upstream page body: `{ list, total, page?, pageSize? }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total: u64,
    #[serde(default, deserialize_with = "optional_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "optional_u32")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> PagedList<T> {
    /// Missing or zero page counters fall back to what was requested.
    pub fn into_page(self, requested_page: u32, requested_page_size: u32) -> PageResult<T> {
        PageResult {
            items: self.list,
            total: self.total,
            page: self.page.filter(|p| *p > 0).unwrap_or(requested_page),
            page_size: self
                .page_size
                .filter(|p| *p > 0)
                .unwrap_or(requested_page_size),
        }
    }
}
