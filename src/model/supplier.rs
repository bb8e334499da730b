use crate::model::RecordId;
use serde::{Deserialize, Serialize};

/// A registered supplier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(default, skip_serializing_if = "RecordId::is_unsaved")]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub contact_person: String,
    #[serde(default)]
    pub address: String,
}
