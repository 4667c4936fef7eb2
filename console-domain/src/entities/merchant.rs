// Merchant entity

use serde::{Deserialize, Serialize};

use crate::utils::{id_string, lenient_text, optional_millis};
use crate::value_objects::{EpochMillis, MerchantStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: MerchantStatus,
    #[serde(default, deserialize_with = "optional_millis")]
    pub created_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub updated_at: Option<EpochMillis>,
    #[serde(default)]
    pub admin: Option<MerchantAdmin>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantAdmin {
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMerchantDto {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMerchantDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MerchantStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merchant_decodes_numeric_id_and_string_dates() {
        let merchant: Merchant = serde_json::from_value(json!({
            "id": 3,
            "name": "Acme",
            "description": null,
            "status": "ACTIVE",
            "createdAt": "2024-01-02T03:04:05.000Z",
            "updatedAt": "2024-01-02T03:04:05.000Z",
            "admin": { "email": "ops@acme.test", "name": "Ops" }
        }))
        .expect("decode merchant");

        assert_eq!(merchant.id, "3");
        assert_eq!(merchant.status, MerchantStatus::Active);
        assert!(merchant.created_at.is_some());
        assert_eq!(merchant.admin.map(|a| a.email), Some("ops@acme.test".to_string()));
    }

    #[test]
    fn update_dto_skips_absent_fields() {
        let dto = UpdateMerchantDto {
            status: Some(MerchantStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&dto).expect("encode"), json!({ "status": "INACTIVE" }));
    }
}
