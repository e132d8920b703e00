//! Structured MDM query payloads.
//!
//! Requests are assembled from typed structs instead of placeholder
//! substitution in a JSON template, so a malformed value can never produce
//! an invalid request body.

use crate::model::codes;
use crate::model::Entity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which attribute/relationship fields a query should return for one
/// entity type. Deserialized from the clone-config profiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityQuerySpec {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub relationships: Vec<String>,
    #[serde(default)]
    pub relationship_attributes: Vec<String>,
}

/// Top-level query request body.
#[derive(Debug, Clone, Serialize)]
pub struct QueryPayload {
    pub params: QueryParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryParams {
    pub query: EntityQuery,
    pub fields: FieldSpec,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityQuery {
    pub filters: QueryFilters,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryFilters {
    #[serde(rename = "typesCriterion")]
    pub types_criterion: Vec<String>,
    #[serde(rename = "attributesCriterion", skip_serializing_if = "Vec::is_empty")]
    pub attributes_criterion: Vec<BTreeMap<String, AttributeCriterion>>,
}

/// Exact-match criterion on one attribute.
#[derive(Debug, Clone, Serialize)]
pub struct AttributeCriterion {
    pub exacts: Vec<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(rename = "valueContexts")]
    pub value_contexts: Vec<ValueContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValueContext {
    pub source: String,
    pub locale: String,
}

/// Requested result fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldSpec {
    pub attributes: Vec<String>,
    pub relationships: Vec<String>,
    #[serde(rename = "relationshipAttributes")]
    pub relationship_attributes: Vec<String>,
}

impl FieldSpec {
    /// Request attributes only, no relationship data.
    pub fn attributes_only(attributes: Vec<String>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }
}

impl QueryPayload {
    /// Query entities of `entity_type` whose `attribute_code` exactly
    /// matches `value` in the internal de-DE context.
    pub fn exact_match(entity_type: &str, attribute_code: &str, value: &str, fields: FieldSpec) -> Self {
        let criterion = AttributeCriterion {
            exacts: vec![value.to_string()],
            value_type: "_STRING".to_string(),
            value_contexts: vec![ValueContext {
                source: codes::SOURCE_INTERNAL.to_string(),
                locale: codes::LOCALE_DEFAULT.to_string(),
            }],
        };
        let mut by_code = BTreeMap::new();
        by_code.insert(attribute_code.to_string(), criterion);

        Self {
            params: QueryParams {
                query: EntityQuery {
                    filters: QueryFilters {
                        types_criterion: vec![entity_type.to_string()],
                        attributes_criterion: vec![by_code],
                    },
                },
                fields,
            },
        }
    }

    /// Query built from a clone-config entity spec, filtered by the
    /// configured identifier attribute.
    pub fn for_spec(spec: &EntityQuerySpec, identifier_attribute: &str, identifier: &str) -> Self {
        Self::exact_match(
            &spec.entity_type,
            identifier_attribute,
            identifier,
            FieldSpec {
                attributes: spec.attributes.clone(),
                relationships: spec.relationships.clone(),
                relationship_attributes: spec.relationship_attributes.clone(),
            },
        )
    }
}

/// Query response envelope.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: QueryResponseBody,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResponseBody {
    #[serde(default)]
    pub entities: Vec<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wire_shape() {
        let payload = QueryPayload::exact_match(
            codes::TYPE_SUPPLIER,
            codes::ATTR_SUPPLIER_NR,
            "900",
            FieldSpec::attributes_only(vec![codes::ATTR_NAME_ONE.to_string()]),
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["params"]["query"]["filters"]["typesCriterion"][0], "exlieferant");

        let criterion = &json["params"]["query"]["filters"]["attributesCriterion"][0]["axlieferantennr"];
        assert_eq!(criterion["exacts"][0], "900");
        assert_eq!(criterion["type"], "_STRING");
        assert_eq!(criterion["valueContexts"][0]["source"], "internal");
        assert_eq!(criterion["valueContexts"][0]["locale"], "de-DE");

        assert_eq!(json["params"]["fields"]["attributes"][0], "axnameeins");
        assert!(json["params"]["fields"]["relationshipAttributes"]
            .as_array()
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_for_spec_carries_requested_fields() {
        let spec: EntityQuerySpec = serde_json::from_value(serde_json::json!({
            "type": "exlieferantenartikel",
            "attributes": ["axlieferantennr", "axnameeins"],
            "relationships": ["relxtradeitemzuliefartikel"],
            "relationship_attributes": ["arelxregellieferant"]
        }))
        .unwrap();

        let payload = QueryPayload::for_spec(&spec, "axartikelnrsap", "777");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["params"]["query"]["filters"]["typesCriterion"][0], "exlieferantenartikel");
        assert!(json["params"]["query"]["filters"]["attributesCriterion"][0]["axartikelnrsap"]
            .is_object());
        assert_eq!(
            json["params"]["fields"]["relationships"][0],
            "relxtradeitemzuliefartikel"
        );
        assert_eq!(
            json["params"]["fields"]["relationshipAttributes"][0],
            "arelxregellieferant"
        );
    }

    #[test]
    fn test_response_defaults_to_empty() {
        let response: QueryResponse = serde_json::from_str("{}").unwrap();
        assert!(response.response.entities.is_empty());
    }
}
