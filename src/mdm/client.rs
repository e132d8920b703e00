//! HTTP client for the MDM entity query endpoint.
//!
//! Owns the authenticated fetch of entity working sets, the supplier
//! lookup and the single-attribute reads the article-number issuer needs.

use crate::error::{MdmCloneError, Result};
use crate::mdm::query::{EntityQuerySpec, FieldSpec, QueryPayload, QueryResponse};
use crate::model::codes;
use crate::model::Entity;
use crate::switch::{ResolvedSupplier, SupplierDirectory};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Caller identity and client credentials sent with every MDM request.
#[derive(Debug, Clone)]
pub struct MdmCredentials {
    pub user_id: String,
    pub user_email: String,
    pub client_id: String,
    pub client_secret: String,
}

/// MDM query client. Cheap to clone; the underlying connection pool is
/// shared.
#[derive(Clone)]
pub struct MdmClient {
    client: Client,
    query_url: String,
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| MdmCloneError::Config(format!("Invalid header value for {}", name)))
}

impl MdmClient {
    /// Create a client with the RDP auth headers pre-applied.
    pub fn new(query_url: String, credentials: &MdmCredentials) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rdp-version", HeaderValue::from_static("8.1"));
        headers.insert("x-rdp-clientId", HeaderValue::from_static("rdpclient"));
        headers.insert("x-rdp-userId", header_value("x-rdp-userId", &credentials.user_id)?);
        headers.insert(
            "x-rdp-useremail",
            header_value("x-rdp-useremail", &credentials.user_email)?,
        );
        headers.insert("x-rdp-userRoles", HeaderValue::from_static("[\"systemadmin\"]"));
        headers.insert(
            "auth-client-id",
            header_value("auth-client-id", &credentials.client_id)?,
        );
        headers.insert(
            "auth-client-secret",
            header_value("auth-client-secret", &credentials.client_secret)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Ok(Self { client, query_url })
    }

    /// POST a query and return the matched entities.
    pub async fn query(&self, payload: &QueryPayload) -> Result<Vec<Entity>> {
        let response = self
            .client
            .post(&self.query_url)
            .json(payload)
            .send()
            .await?
            .error_for_status()?;

        let result: QueryResponse = response.json().await?;
        Ok(result.response.entities)
    }

    /// Fetch the working set for one clone run: one query per configured
    /// entity spec, filtered by the identifier attribute, concatenated in
    /// spec order.
    pub async fn fetch_entities(
        &self,
        identifier: &str,
        identifier_attribute: &str,
        specs: &[EntityQuerySpec],
    ) -> Result<Vec<Entity>> {
        let mut all_entities = Vec::new();

        for spec in specs {
            let payload = QueryPayload::for_spec(spec, identifier_attribute, identifier);
            let entities = self.query(&payload).await?;

            if entities.is_empty() {
                log::warn!("{}: no entities found", spec.entity_type);
            } else {
                log::info!("{}: {} entities found", spec.entity_type, entities.len());
            }
            all_entities.extend(entities);
        }

        Ok(all_entities)
    }

    /// Read one attribute value from the first entity of `entity_type`
    /// whose `filter_attribute` exactly matches `filter_value`.
    ///
    /// Returns `None` when nothing matches or the matched entity does not
    /// carry the attribute.
    pub async fn read_attribute(
        &self,
        entity_type: &str,
        filter_attribute: &str,
        filter_value: &str,
        attribute: &str,
    ) -> Result<Option<String>> {
        let payload = QueryPayload::exact_match(
            entity_type,
            filter_attribute,
            filter_value,
            FieldSpec::attributes_only(vec![attribute.to_string()]),
        );

        let entities = self.query(&payload).await?;
        Ok(entities
            .first()
            .and_then(|e| e.attribute_str(attribute))
            .map(str::to_string))
    }
}

impl SupplierDirectory for MdmClient {
    async fn find_supplier(&self, supplier_nr: &str) -> Result<ResolvedSupplier> {
        let payload = QueryPayload::exact_match(
            codes::TYPE_SUPPLIER,
            codes::ATTR_SUPPLIER_NR,
            supplier_nr,
            FieldSpec::attributes_only(vec![codes::ATTR_NAME_ONE.to_string()]),
        );

        let entities = self.query(&payload).await?;
        let supplier = entities
            .first()
            .ok_or_else(|| MdmCloneError::SupplierNotFound(supplier_nr.to_string()))?;

        Ok(ResolvedSupplier {
            id: supplier.id.clone(),
            name: supplier.attribute_str(codes::ATTR_NAME_ONE).map(str::to_string),
        })
    }
}
