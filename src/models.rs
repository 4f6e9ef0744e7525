//! Canonical, provider-neutral policy records produced by normalization.
//!
//! Field names carry `serde` renames so that an external writer
//! serializing these records emits the stable key schema
//! (`"not-subjects"`, `"operator"`, `"value-type"`, ...).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumDiscriminants, EnumString};

/// One normalized access-control rule.
///
/// `id` is `"<document-id>:<statement-index>"`, unique per document.
/// Wildcards in actions, resources, and subjects have already been
/// rewritten to the `<.*>` pattern marker.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub version: String,
    pub allowed: bool,
    pub subjects: Vec<String>,
    #[serde(rename = "not-subjects")]
    pub not_subjects: Vec<String>,
    pub resources: Vec<String>,
    #[serde(rename = "not-resources")]
    pub not_resources: Vec<String>,
    pub actions: Vec<String>,
    #[serde(rename = "not-actions")]
    pub not_actions: Vec<String>,
    pub conditions: Vec<Condition>,
}

impl Policy {
    /// Render the record with the stable output key schema.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// A named operator plus key/value constraint narrowing when a policy
/// applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "operator")]
    pub operation: String,
    pub key: String,
    pub values: ConditionValues,
    #[serde(rename = "value-type")]
    pub value_type: ConditionValueType,
}

/// Homogeneous condition values: all strings, all 64-bit integers, or
/// all booleans. The discriminant enum [`ConditionValueType`] is the
/// `value-type` tag (`"string"`, `"int64"`, `"bool"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, EnumDiscriminants)]
#[serde(untagged)]
#[strum_discriminants(name(ConditionValueType))]
#[strum_discriminants(derive(Display, EnumString, Serialize, Deserialize))]
#[strum_discriminants(strum(serialize_all = "lowercase"))]
#[strum_discriminants(serde(rename_all = "lowercase"))]
pub enum ConditionValues {
    String(Vec<String>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
}

impl ConditionValues {
    /// The `value-type` tag matching the active variant.
    pub fn value_type(&self) -> ConditionValueType {
        ConditionValueType::from(self)
    }
}
