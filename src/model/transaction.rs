//! Inventory movements

use crate::model::{date_prefix, RecordId};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an inventory movement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    #[default]
    #[serde(alias = "in")]
    In,
    #[serde(alias = "out")]
    Out,
    #[serde(alias = "adjustment")]
    Adjustment,
}

/// Reference from a transaction to another resource.
///
/// The backend serialises references as bare ids, while list views that
/// expand them carry `{ "id": .., "name": .. }` objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceRef {
    Id(RecordId),
    Expanded {
        id: RecordId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

impl ResourceRef {
    #[must_use]
    pub fn id(&self) -> &RecordId {
        match self {
            ResourceRef::Id(id) => id,
            ResourceRef::Expanded { id, .. } => id,
        }
    }

    /// Display name, when the reference was expanded
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            ResourceRef::Id(_) => None,
            ResourceRef::Expanded { name, .. } => name.as_deref(),
        }
    }
}

/// A single stock movement tying equipment, chemical and supplier together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    #[serde(default, skip_serializing_if = "RecordId::is_unsaved")]
    pub id: RecordId,

    #[serde(default, alias = "equipmentId", skip_serializing_if = "Option::is_none")]
    pub equipment: Option<ResourceRef>,

    #[serde(default, alias = "chemicalId", skip_serializing_if = "Option::is_none")]
    pub chemical: Option<ResourceRef>,

    #[serde(default, alias = "supplierId", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<ResourceRef>,

    pub quantity: Decimal,

    #[serde(default, alias = "transaction_type")]
    pub transaction_type: TransactionType,

    #[serde(default, with = "date_prefix", skip_serializing_if = "Option::is_none")]
    pub transaction_date: Option<NaiveDate>,

    /// Server-side creation time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<NaiveDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_transaction_with_bare_reference_ids() {
        let tx: InventoryTransaction = serde_json::from_value(json!({
            "id": 9,
            "equipment": 1,
            "chemical": 2,
            "supplier": 3,
            "quantity": 10,
            "transactionType": "OUT",
            "transactionDate": "2024-05-02",
            "timestamp": "2024-05-02T08:15:30.123456"
        }))
        .unwrap();

        assert_eq!(tx.transaction_type, TransactionType::Out);
        assert_eq!(tx.chemical.as_ref().map(ResourceRef::id), Some(&RecordId::Int(2)));
        assert_eq!(tx.chemical.as_ref().and_then(ResourceRef::name), None);
        assert!(tx.timestamp.is_some());
    }

    #[test]
    fn test_transaction_form_payload() {
        let tx: InventoryTransaction = serde_json::from_value(json!({
            "equipmentId": 1,
            "chemicalId": 2,
            "supplierId": 3,
            "quantity": 4.5,
            "transaction_type": "adjustment",
            "transactionDate": "2024-05-02T00:00:00.000Z"
        }))
        .unwrap();

        assert!(tx.id.is_unsaved());
        assert_eq!(tx.transaction_type, TransactionType::Adjustment);
        assert_eq!(tx.transaction_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(tx.supplier.as_ref().map(ResourceRef::id), Some(&RecordId::Int(3)));
    }

    #[test]
    fn test_expanded_reference_keeps_name() {
        let tx: InventoryTransaction = serde_json::from_value(json!({
            "chemical": { "id": 2, "name": "Ethanol" },
            "quantity": 1
        }))
        .unwrap();

        assert_eq!(tx.chemical.as_ref().and_then(ResourceRef::name), Some("Ethanol"));
        assert_eq!(tx.transaction_type, TransactionType::In);
        assert_eq!(tx.transaction_date, None);
    }
}
