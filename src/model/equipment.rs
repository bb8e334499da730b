use crate::model::{date_prefix, RecordId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Operational state of a piece of equipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentStatus {
    Active,
    UnderMaintenance,
    Damaged,
    Retired,
}

/// A tracked piece of laboratory equipment
///
/// Equipment never expires; only its quantity feeds the stock status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    #[serde(default, skip_serializing_if = "RecordId::is_unsaved")]
    pub id: RecordId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,

    #[serde(default, with = "date_prefix", skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<NaiveDate>,

    /// Units on hand
    pub quantity: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Reorder threshold in units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equipment_status_wire_names() {
        let equipment: Equipment = serde_json::from_value(json!({
            "id": 3,
            "name": "Centrifuge",
            "status": "UNDER_MAINTENANCE",
            "quantity": 2,
            "purchaseDate": "2021-09-14"
        }))
        .unwrap();

        assert_eq!(equipment.status, Some(EquipmentStatus::UnderMaintenance));
        assert_eq!(equipment.purchase_date, NaiveDate::from_ymd_opt(2021, 9, 14));
        assert_eq!(equipment.min_quantity, None);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result: Result<Equipment, _> = serde_json::from_value(json!({
            "name": "Pipette",
            "status": "LOST",
            "quantity": 1
        }));
        assert!(result.is_err());
    }
}
