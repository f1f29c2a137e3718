// Catalog data model - flat rows in, processor trees out
//
// FlatRecord mirrors one denormalized row of the processor/payment/scheme
// join. Processor -> PaymentType -> Scheme is the hierarchy every fetch
// strategy must produce: a strict tree, each level owning its children.

use serde::{Deserialize, Serialize};

// ============================================================================
// FLAT RECORD (source row)
// ============================================================================

/// One denormalized row from the flat join query.
///
/// `processor_id`/`processor_name`/`partner_code` repeat across rows that
/// share a processor. `payment_type` is `None` for processors without any
/// payment rows; `scheme_code`/`scheme_name` are `None` for payment rows
/// without a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatRecord {
    pub processor_id: String,
    pub processor_name: String,
    pub partner_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_name: Option<String>,
}

// ============================================================================
// HIERARCHY ENTITIES
// ============================================================================

/// Leaf entity. Identity is `scheme_code`; two rows with the same code under
/// one payment type are the same scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheme {
    pub scheme_code: String,
    pub scheme_name: String,
}

/// Mid-level entity. Identity is `payment_type` within its processor; owns
/// its schemes, unique by `scheme_code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentType {
    pub payment_type: String,
    pub schemes: Vec<Scheme>,
}

/// Root entity. Identity is `processor_id`; owns its payment types, unique
/// by `payment_type`. A processor with no payment rows has an empty list,
/// never a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Processor {
    pub processor_id: String,
    pub processor_name: String,
    pub partner_code: String,
    pub payment_types: Vec<PaymentType>,
}
