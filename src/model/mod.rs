//! Entity graph model: typed, identified records with nested attribute
//! values and typed outgoing relationships, mirroring the MDM wire shape.
//!
//! Pure data structures; no I/O. Attribute lookup is typed map access with
//! an explicit absent result instead of nested defaulting on raw JSON.

pub mod codes;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn default_slot_id() -> String {
    codes::SLOT_FIRST.to_string()
}

/// A single master-data entity.
///
/// Unknown sibling fields of the wire format (e.g. system metadata the
/// query returns alongside `data`) are captured in `extra` and round-trip
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Human label; cleared whenever an entity is re-identified (downstream
    /// naming is derived, never copied across a clone).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub data: EntityData,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Attribute and relationship payload of an entity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityData {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Vec<RelationshipRecord>>,
}

/// An attribute-value record: an ordered sequence of value entries.
///
/// Multiple attributes may carry denormalized copies of the same fact (a
/// supplier number appears on the supplier-article and on each of its trade
/// items); each copy is maintained independently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeValue {
    #[serde(default)]
    pub values: Vec<ValueEntry>,
}

/// One value entry within an attribute-value record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEntry {
    #[serde(default = "default_slot_id")]
    pub id: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A typed edge to a target `(type, id)` pair, optionally carrying its own
/// properties and attribute-value records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipRecord {
    #[serde(default = "default_slot_id")]
    pub id: String,
    #[serde(rename = "relTo", default, skip_serializing_if = "Option::is_none")]
    pub rel_to: Option<RelTo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<RelProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, AttributeValue>>,
}

/// Relationship target reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelTo {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
}

/// Directional/typing properties of a relationship record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(rename = "relationshipType", default, skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
}

impl Entity {
    /// First value of the given attribute, as a string slice.
    ///
    /// Returns `None` for an absent attribute, an empty value list or a
    /// non-string payload.
    pub fn attribute_str(&self, code: &str) -> Option<&str> {
        self.data
            .attributes
            .get(code)?
            .values
            .first()?
            .value
            .as_str()
    }

    /// Upsert an attribute with a single internally sourced value entry.
    pub fn set_attribute(&mut self, code: &str, value: impl Into<Value>) {
        self.data
            .attributes
            .insert(code.to_string(), AttributeValue::single(value));
    }

    /// Append a relationship record under the given relationship type.
    pub fn push_relationship(&mut self, rel_type: &str, record: RelationshipRecord) {
        self.data
            .relationships
            .entry(rel_type.to_string())
            .or_default()
            .push(record);
    }

    /// Total number of relationship records across all relationship types.
    pub fn relationship_record_count(&self) -> usize {
        self.data.relationships.values().map(Vec::len).sum()
    }
}

impl AttributeValue {
    /// A record holding one value entry with the default slot id, locale
    /// and internal provenance tag.
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            values: vec![ValueEntry {
                id: codes::SLOT_FIRST.to_string(),
                value: value.into(),
                locale: Some(codes::LOCALE_DEFAULT.to_string()),
                source: Some(codes::SOURCE_INTERNAL.to_string()),
            }],
        }
    }
}

impl RelationshipRecord {
    /// A record with the default slot id pointing at `(entity_type, id)`.
    pub fn to(entity_type: &str, id: &str) -> Self {
        Self {
            id: codes::SLOT_FIRST.to_string(),
            rel_to: Some(RelTo {
                id: id.to_string(),
                entity_type: entity_type.to_string(),
            }),
            properties: None,
            attributes: None,
        }
    }

    /// Set the relationship-type property (and optionally a direction).
    pub fn with_properties(mut self, relationship_type: &str, direction: Option<&str>) -> Self {
        self.properties = Some(RelProperties {
            direction: direction.map(str::to_string),
            relationship_type: Some(relationship_type.to_string()),
        });
        self
    }

    /// Attach an attribute-value record to the relationship itself.
    pub fn with_attribute(mut self, code: &str, value: AttributeValue) -> Self {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(code.to_string(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity_json() -> &'static str {
        r#"{
            "id": "e-1",
            "type": "exartikel",
            "name": "Testartikel",
            "data": {
                "attributes": {
                    "axartikelnrsap": {
                        "values": [
                            {"id": "1_0_0", "value": "777", "locale": "de-DE", "source": "internal"}
                        ]
                    }
                },
                "relationships": {
                    "relxliefzuart": [
                        {
                            "id": "1_0_0",
                            "relTo": {"id": "SUP-1", "type": "exlieferant"},
                            "properties": {"direction": "both", "relationshipType": "relxliefzuart"}
                        }
                    ]
                }
            }
        }"#
    }

    #[test]
    fn test_wire_shape_roundtrip() {
        let entity: Entity = serde_json::from_str(sample_entity_json()).unwrap();
        assert_eq!(entity.entity_type, "exartikel");
        assert_eq!(entity.attribute_str("axartikelnrsap"), Some("777"));

        let rels = &entity.data.relationships["relxliefzuart"];
        assert_eq!(rels.len(), 1);
        let rel_to = rels[0].rel_to.as_ref().unwrap();
        assert_eq!(rel_to.id, "SUP-1");
        assert_eq!(rel_to.entity_type, "exlieferant");

        // Wire field names survive serialization.
        let out = serde_json::to_value(&entity).unwrap();
        assert_eq!(out["type"], "exartikel");
        assert_eq!(
            out["data"]["relationships"]["relxliefzuart"][0]["relTo"]["type"],
            "exlieferant"
        );
        assert_eq!(
            out["data"]["relationships"]["relxliefzuart"][0]["properties"]["relationshipType"],
            "relxliefzuart"
        );
    }

    #[test]
    fn test_unknown_fields_roundtrip() {
        let raw = r#"{"id": "e-2", "type": "extradeitem", "properties": {"createdDate": "2024-01-01"}}"#;
        let entity: Entity = serde_json::from_str(raw).unwrap();
        assert!(entity.extra.contains_key("properties"));

        let out = serde_json::to_value(&entity).unwrap();
        assert_eq!(out["properties"]["createdDate"], "2024-01-01");
    }

    #[test]
    fn test_attribute_str_absent() {
        let entity: Entity = serde_json::from_str(r#"{"id": "e-3", "type": "exartikel"}"#).unwrap();
        assert_eq!(entity.attribute_str("axartikelnrsap"), None);
    }

    #[test]
    fn test_set_attribute_overwrites() {
        let mut entity: Entity =
            serde_json::from_str(sample_entity_json()).unwrap();
        entity.set_attribute(codes::ATTR_SAP_ARTICLE_NR, "445201");
        assert_eq!(entity.attribute_str(codes::ATTR_SAP_ARTICLE_NR), Some("445201"));

        let attr = &entity.data.attributes[codes::ATTR_SAP_ARTICLE_NR];
        assert_eq!(attr.values.len(), 1);
        assert_eq!(attr.values[0].locale.as_deref(), Some(codes::LOCALE_DEFAULT));
        assert_eq!(attr.values[0].source.as_deref(), Some(codes::SOURCE_INTERNAL));
    }

    #[test]
    fn test_push_relationship_appends() {
        let mut entity: Entity = serde_json::from_str(sample_entity_json()).unwrap();
        entity.push_relationship(
            codes::REL_SUPPLIER_TO_ARTICLE,
            RelationshipRecord::to(codes::TYPE_SUPPLIER, "SUP-2"),
        );
        assert_eq!(entity.data.relationships[codes::REL_SUPPLIER_TO_ARTICLE].len(), 2);
        assert_eq!(entity.relationship_record_count(), 2);
    }

    #[test]
    fn test_record_builder_with_attribute() {
        let record = RelationshipRecord::to(codes::TYPE_SUPPLIER, "SUP-1")
            .with_properties(codes::REL_SUPPLIER_TO_ARTICLE, Some("both"))
            .with_attribute(codes::ATTR_DEFAULT_SUPPLIER, AttributeValue::single(false));

        let props = record.properties.as_ref().unwrap();
        assert_eq!(props.direction.as_deref(), Some("both"));
        let flag = &record.attributes.as_ref().unwrap()[codes::ATTR_DEFAULT_SUPPLIER];
        assert_eq!(flag.values[0].value, serde_json::Value::Bool(false));
    }
}
