// Order sync request

use serde::Serialize;

/// Filters forwarded to the order sync job. Every field is optional; the
/// backend defaults to the orders paid on the previous day.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncOrderRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy_online_order_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub includes_soft_del: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_tag: Option<i64>,
}
