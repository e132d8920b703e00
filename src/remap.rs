//! Identity remapping: assign fresh ids to a batch of cross-referencing
//! entities and rewrite every internal reference consistently.
//!
//! Two explicit stages: stage 1 walks the unmodified input and produces the
//! complete old->new mapping, stage 2 consumes the originals and produces
//! rewritten copies. Stage 2 never observes partially rewritten state, so
//! self-references and forward references resolve regardless of input order.

use crate::error::{MdmCloneError, Result};
use crate::issuer::IdentityIssuer;
use crate::model::codes;
use crate::model::Entity;
use std::collections::BTreeMap;

/// Old->new id mapping, grouped by entity type.
pub type IdMapping = BTreeMap<String, BTreeMap<String, String>>;

/// Result of a remap run.
#[derive(Debug)]
pub struct RemapOutcome {
    /// Rewritten entities, one per input entity, in input order.
    pub entities: Vec<Entity>,
    /// The mapping applied, returned for audit/persistence.
    pub mapping: IdMapping,
    /// The externally issued article number, if the batch held an article.
    pub issued_article_nr: Option<String>,
}

/// Assign new identities to every entity and rewrite internal references.
///
/// Article entities get a real article number from the issuer (seeded with
/// `seed_identifier`); all other types get opaque ids. The issued number is
/// denormalized into the article-number attribute of every entity in the
/// batch. Relationship targets outside the batch pass through untouched.
///
/// A batch with more than one article entity is rejected: each of them
/// would need its own issued number, and the denormalized attribute can
/// only carry one.
pub async fn remap(
    entities: Vec<Entity>,
    seed_identifier: &str,
    issuer: &impl IdentityIssuer,
) -> Result<RemapOutcome> {
    let article_count = entities
        .iter()
        .filter(|e| e.entity_type == codes::TYPE_ARTICLE)
        .count();
    if article_count > 1 {
        return Err(MdmCloneError::MultipleArticles(article_count));
    }

    // Stage 1: assignment. No rewriting happens until every entity has a
    // new identity.
    let mut mapping: IdMapping = BTreeMap::new();
    let mut issued_article_nr = None;

    for entity in &entities {
        let new_id = if entity.entity_type == codes::TYPE_ARTICLE {
            let number = issuer.issue_article_number(seed_identifier).await?;
            issued_article_nr = Some(number.clone());
            number
        } else {
            issuer.issue_opaque()
        };

        mapping
            .entry(entity.entity_type.clone())
            .or_default()
            .insert(entity.id.clone(), new_id);
    }

    // Stage 2: rewrite against the completed mapping.
    let cloned = entities
        .into_iter()
        .map(|mut entity| {
            if let Some(new_id) = mapping
                .get(&entity.entity_type)
                .and_then(|ids| ids.get(&entity.id))
            {
                entity.id = new_id.clone();
            }
            entity.name = None;

            if let Some(number) = &issued_article_nr {
                entity.set_attribute(codes::ATTR_SAP_ARTICLE_NR, number.as_str());
            }

            for records in entity.data.relationships.values_mut() {
                for record in records.iter_mut() {
                    if let Some(rel_to) = &mut record.rel_to {
                        if let Some(new_target) = mapping
                            .get(&rel_to.entity_type)
                            .and_then(|ids| ids.get(&rel_to.id))
                        {
                            rel_to.id = new_target.clone();
                        }
                    }
                }
            }

            entity
        })
        .collect::<Vec<_>>();

    log::info!(
        "Remapped {} entities ({} article number issued)",
        cloned.len(),
        if issued_article_nr.is_some() { "1" } else { "no" }
    );

    Ok(RemapOutcome {
        entities: cloned,
        mapping,
        issued_article_nr,
    })
}
