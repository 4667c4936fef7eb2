// Shop entity and sync outcome

use serde::{Deserialize, Serialize};

use crate::entities::ApiEnvelope;
use crate::utils::{id_string, lenient_text, lenient_u64, optional_millis, scalar_u64};
use crate::value_objects::{AuthExpiredStatus, EpochMillis, ShopStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(default, deserialize_with = "id_string")]
    pub shop_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub platform: String,
    #[serde(default)]
    pub status: ShopStatus,
    #[serde(default)]
    pub auth_expired_status: AuthExpiredStatus,
    #[serde(default)]
    pub site_code: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub time_zone_id: Option<String>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub create_time: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub expire_time: Option<EpochMillis>,
    #[serde(default)]
    pub is_deleted: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub count: u64,
}

impl SyncOutcome {
    /// Reads the outcome from `data`, or from the flat top level when the
    /// backend answers without nesting.
    pub fn from_envelope(envelope: &ApiEnvelope) -> Option<Self> {
        if envelope.data.get("success").is_some() {
            if let Ok(outcome) = serde_json::from_value(envelope.data.clone()) {
                return Some(outcome);
            }
        }
        let success = envelope.extra.get("success")?.as_bool()?;
        let count = envelope.extra.get("count").and_then(scalar_u64).unwrap_or(0);
        Some(Self {
            success,
            message: envelope.message.clone(),
            count,
        })
    }
}
