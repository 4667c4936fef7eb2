// Influencer search result

use serde::{Deserialize, Serialize};

use crate::utils::{id_string, lenient_f64, lenient_text, lenient_u64, optional_millis};
use crate::value_objects::EpochMillis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerSearchItem {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub task_definition_id: String,
    #[serde(default, deserialize_with = "id_string")]
    pub task_instance_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub task_url: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub influencer_name: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub influencer_followers: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub country_region: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub fastmoss_detail_url: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub product_sales_count: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub product_sales_amount: f64,
    #[serde(default, deserialize_with = "id_string")]
    pub influencer_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub sale_amount_show: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: String,
    #[serde(default, deserialize_with = "optional_millis")]
    pub created_at: Option<EpochMillis>,
    #[serde(default, deserialize_with = "optional_millis")]
    pub updated_at: Option<EpochMillis>,
}
