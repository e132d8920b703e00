//! Identity issuance for cloned entities.
//!
//! All entity types receive an opaque UUID, except articles: those get a
//! real SAP article number through a four-step chain (token, classification
//! code, numbering-sequence key, sequence value). Any missing intermediate
//! result aborts the issuing call; no retry is attempted here.

use crate::error::{MdmCloneError, Result};
use crate::mdm::MdmClient;
use crate::model::codes;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// Supplies new identities for cloned entities.
///
/// `issue_opaque` never fails; the issuer's uniqueness guarantee is relied
/// upon without a re-check against the batch. `issue_article_number` is the
/// externally sequenced path reserved for article entities.
#[allow(async_fn_in_trait)]
pub trait IdentityIssuer {
    /// Generate an opaque unique identity.
    fn issue_opaque(&self) -> String;

    /// Obtain a new article number, seeded by the identifier of the article
    /// being cloned.
    async fn issue_article_number(&self, seed_identifier: &str) -> Result<String>;
}

/// Token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

/// Article-number issuer backed by the SAP numbering service.
///
/// The classification code and sequence key are read from MDM; only the
/// token and the final sequence value come from SAP itself.
pub struct SapIssuer {
    client: Client,
    mdm: MdmClient,
    token_url: String,
    token_auth: String,
    sequence_url: String,
}

impl SapIssuer {
    /// Create a new issuer.
    ///
    /// # Arguments
    ///
    /// * `mdm` - client for the classification/sequence-key reads
    /// * `token_url` - SAP token endpoint
    /// * `token_auth` - value of the `Authorization` header for the token call
    /// * `sequence_url` - numbering endpoint, containing the `{nummernkreis}`
    ///   placeholder for the sequence key
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation)
    pub fn new(mdm: MdmClient, token_url: String, token_auth: String, sequence_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            mdm,
            token_url,
            token_auth,
            sequence_url,
        }
    }

    /// Obtain an access token from the SAP token endpoint.
    async fn fetch_token(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.token_url)
            .header("Authorization", &self.token_auth)
            .send()
            .await
            .map_err(|e| MdmCloneError::IssuerUnavailable(format!("Network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MdmCloneError::IssuerUnavailable(format!(
                "Token endpoint returned {}",
                status
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| MdmCloneError::IssuerUnavailable(format!("Invalid token response: {}", e)))?;

        match token.access_token {
            Some(t) if !t.is_empty() => Ok(t),
            _ => Err(MdmCloneError::IssuerUnavailable(
                "Token response carried no access_token".to_string(),
            )),
        }
    }

    /// Request a sequence value for the given numbering-sequence key.
    async fn fetch_sequence_value(&self, token: &str, sequence_key: &str) -> Result<String> {
        let url = self.sequence_url.replace("{nummernkreis}", sequence_key);

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

impl IdentityIssuer for SapIssuer {
    fn issue_opaque(&self) -> String {
        Uuid::new_v4().to_string()
    }

    async fn issue_article_number(&self, seed_identifier: &str) -> Result<String> {
        let token = self.fetch_token().await?;

        // Classification code of the article being cloned.
        let classification = self
            .mdm
            .read_attribute(
                codes::TYPE_ARTICLE,
                codes::ATTR_SAP_ARTICLE_NR,
                seed_identifier,
                codes::ATTR_ARTICLE_KIND,
            )
            .await?
            .ok_or_else(|| MdmCloneError::ClassificationNotFound(seed_identifier.to_string()))?;

        // Numbering-sequence key referenced by the classification.
        let sequence_key = self
            .mdm
            .read_attribute(
                codes::TYPE_ARTICLE_KIND_REF,
                "value",
                &classification,
                codes::ATTR_NUMBER_RANGE,
            )
            .await?
            .ok_or_else(|| MdmCloneError::SequenceKeyNotFound(classification.clone()))?;

        let raw = self.fetch_sequence_value(&token, &sequence_key).await?;
        let number = normalize_issued_number(&raw);

        if number.is_empty() {
            return Err(MdmCloneError::EmptyIssuedValue);
        }

        log::info!("Issued article number {} (sequence {})", number, sequence_key);
        Ok(number)
    }
}

/// Strip whitespace and the leading zero-padding the numbering service
/// returns (e.g. "00000001401096" -> "1401096").
pub fn normalize_issued_number(raw: &str) -> String {
    let padding = Regex::new(r"^0+").expect("Invalid regex pattern");
    padding.replace(raw.trim(), "").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_padding() {
        assert_eq!(normalize_issued_number("00000001401096"), "1401096");
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(normalize_issued_number("  0001401096\n"), "1401096");
    }

    #[test]
    fn test_normalize_all_zeros_is_empty() {
        assert_eq!(normalize_issued_number("0000"), "");
    }

    #[test]
    fn test_normalize_unpadded_value_unchanged() {
        assert_eq!(normalize_issued_number("445201"), "445201");
    }

    // The four-step chain itself needs live MDM/SAP endpoints; covered by
    // the mock issuers in the remap and switch tests.
}
