// Status value objects
//
// Upstream status strings are closed sets. Anything unrecognized is kept as
// `Unknown(raw)` so a new backend value never breaks decoding.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::lenient_text;

/// Status as it arrives on the wire: a string, another scalar or null.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawStatus(pub String);

impl<'de> Deserialize<'de> for RawStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        lenient_text(deserializer).map(RawStatus)
    }
}

/// Lifecycle state shared by task instances and sub-tasks.
///
/// ```text
/// pending → processing → completed
///                      → failed
/// ```
///
/// Transitions are driven by the backend and only observed here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStatus", into = "String")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Unknown(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Processing => "processing",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Unknown(String::new())
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "processing" => TaskStatus::Processing,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Unknown(s.trim().to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        TaskStatus::from(s.as_str())
    }
}

impl From<RawStatus> for TaskStatus {
    fn from(raw: RawStatus) -> Self {
        TaskStatus::from(raw.0.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merchant status. Deleting a merchant flips it to `Inactive`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStatus", into = "String")]
pub enum MerchantStatus {
    Active,
    Inactive,
    Unknown(String),
}

impl MerchantStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MerchantStatus::Active => "ACTIVE",
            MerchantStatus::Inactive => "INACTIVE",
            MerchantStatus::Unknown(raw) => raw.as_str(),
        }
    }

    /// Strict parse for user input; unknown values are rejected instead of kept.
    pub fn parse(s: &str) -> Option<Self> {
        match MerchantStatus::from(s) {
            MerchantStatus::Unknown(_) => None,
            known => Some(known),
        }
    }
}

impl Default for MerchantStatus {
    fn default() -> Self {
        MerchantStatus::Unknown(String::new())
    }
}

impl From<&str> for MerchantStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => MerchantStatus::Active,
            "INACTIVE" => MerchantStatus::Inactive,
            _ => MerchantStatus::Unknown(s.trim().to_string()),
        }
    }
}

impl From<String> for MerchantStatus {
    fn from(s: String) -> Self {
        MerchantStatus::from(s.as_str())
    }
}

impl From<RawStatus> for MerchantStatus {
    fn from(raw: RawStatus) -> Self {
        MerchantStatus::from(raw.0.as_str())
    }
}

impl From<MerchantStatus> for String {
    fn from(status: MerchantStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for MerchantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStatus", into = "String")]
pub enum ShopStatus {
    Lock,
    Unlock,
    Unknown(String),
}

impl ShopStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ShopStatus::Lock => "LOCK",
            ShopStatus::Unlock => "UNLOCK",
            ShopStatus::Unknown(raw) => raw.as_str(),
        }
    }
}

impl Default for ShopStatus {
    fn default() -> Self {
        ShopStatus::Unknown(String::new())
    }
}

impl From<&str> for ShopStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "LOCK" => ShopStatus::Lock,
            "UNLOCK" => ShopStatus::Unlock,
            _ => ShopStatus::Unknown(s.trim().to_string()),
        }
    }
}

impl From<String> for ShopStatus {
    fn from(s: String) -> Self {
        ShopStatus::from(s.as_str())
    }
}

impl From<RawStatus> for ShopStatus {
    fn from(raw: RawStatus) -> Self {
        ShopStatus::from(raw.0.as_str())
    }
}

impl From<ShopStatus> for String {
    fn from(status: ShopStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawStatus", into = "String")]
pub enum AuthExpiredStatus {
    Normal,
    Expired,
    NoAuth,
    Unknown(String),
}

impl AuthExpiredStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AuthExpiredStatus::Normal => "NORMAL",
            AuthExpiredStatus::Expired => "EXPIRED",
            AuthExpiredStatus::NoAuth => "NO_AUTH",
            AuthExpiredStatus::Unknown(raw) => raw.as_str(),
        }
    }
}

impl Default for AuthExpiredStatus {
    fn default() -> Self {
        AuthExpiredStatus::Unknown(String::new())
    }
}

impl From<&str> for AuthExpiredStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => AuthExpiredStatus::Normal,
            "EXPIRED" => AuthExpiredStatus::Expired,
            "NO_AUTH" => AuthExpiredStatus::NoAuth,
            _ => AuthExpiredStatus::Unknown(s.trim().to_string()),
        }
    }
}

impl From<String> for AuthExpiredStatus {
    fn from(s: String) -> Self {
        AuthExpiredStatus::from(s.as_str())
    }
}

impl From<RawStatus> for AuthExpiredStatus {
    fn from(raw: RawStatus) -> Self {
        AuthExpiredStatus::from(raw.0.as_str())
    }
}

impl From<AuthExpiredStatus> for String {
    fn from(status: AuthExpiredStatus) -> Self {
        status.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_parses_known_values_case_insensitively() {
        assert_eq!(TaskStatus::from("Processing"), TaskStatus::Processing);
        assert_eq!(TaskStatus::from(" failed "), TaskStatus::Failed);
        assert!(TaskStatus::Completed.is_terminal());
        assert!(!TaskStatus::Pending.is_terminal());
    }

    #[test]
    fn unknown_status_is_kept_instead_of_failing() {
        let status: TaskStatus = serde_json::from_str("\"paused\"").expect("decode");
        assert_eq!(status, TaskStatus::Unknown("paused".to_string()));
        assert!(!status.is_terminal());

        let shop: ShopStatus = serde_json::from_str("\"FROZEN\"").expect("decode");
        assert_eq!(shop.as_str(), "FROZEN");

        let missing: TaskStatus = serde_json::from_str("null").expect("decode null");
        assert_eq!(missing, TaskStatus::default());
    }

    #[test]
    fn non_string_status_becomes_unknown() {
        let status: TaskStatus = serde_json::from_str("2").expect("decode number");
        assert_eq!(status, TaskStatus::Unknown("2".to_string()));

        let status: MerchantStatus = serde_json::from_str("true").expect("decode bool");
        assert_eq!(status, MerchantStatus::Unknown("true".to_string()));

        let status: AuthExpiredStatus = serde_json::from_str("[1]").expect("decode array");
        assert_eq!(status, AuthExpiredStatus::default());
    }

    #[test]
    fn merchant_status_strict_parse_rejects_unknown() {
        assert_eq!(MerchantStatus::parse("active"), Some(MerchantStatus::Active));
        assert_eq!(MerchantStatus::parse("archived"), None);
    }

    #[test]
    fn statuses_serialize_to_wire_strings() {
        let json = serde_json::to_string(&AuthExpiredStatus::NoAuth).expect("encode");
        assert_eq!(json, "\"NO_AUTH\"");
        let json = serde_json::to_string(&TaskStatus::Processing).expect("encode");
        assert_eq!(json, "\"processing\"");
    }
}
