//! Supplier switch: replicate an article's supplier-specific branch onto a
//! new supplier.
//!
//! The root article gains a relationship to the new supplier; every
//! supplier-article and its trade items are deep-copied, re-identified and
//! denormalized to the new supplier context. The originals of that branch
//! family are replaced, not merged: they do not appear in the output.

use crate::error::{MdmCloneError, Result};
use crate::issuer::IdentityIssuer;
use crate::model::codes;
use crate::model::{AttributeValue, Entity, RelationshipRecord, ValueEntry};

/// Supplier identity resolved from the source system.
#[derive(Debug, Clone)]
pub struct ResolvedSupplier {
    /// Internal entity id.
    pub id: String,
    /// Display name, if the supplier record carries one.
    pub name: Option<String>,
}

/// Lookup of a supplier's internal identity by supplier number.
#[allow(async_fn_in_trait)]
pub trait SupplierDirectory {
    /// Resolve the supplier with the given supplier number.
    ///
    /// Fails with [`MdmCloneError::SupplierNotFound`] when no match exists.
    async fn find_supplier(&self, supplier_nr: &str) -> Result<ResolvedSupplier>;
}

/// Default-supplier flag as written on the new article->supplier relation:
/// locale-tagged, no provenance tag, explicitly `false`.
fn not_default_supplier() -> AttributeValue {
    AttributeValue {
        values: vec![ValueEntry {
            id: codes::SLOT_FIRST.to_string(),
            value: serde_json::Value::Bool(false),
            locale: Some(codes::LOCALE_DEFAULT.to_string()),
            source: None,
        }],
    }
}

/// Re-parent the article's supplier branch onto a new supplier.
///
/// `root_identifier` is the article's stable business identifier, used as
/// the target of the new trade-item->article relations. Missing attribute
/// values and dangling trade-item references degrade gracefully; only a
/// failed supplier lookup or an absent article entity abort the run.
pub async fn switch_supplier(
    entities: Vec<Entity>,
    root_identifier: &str,
    new_supplier_nr: &str,
    directory: &impl SupplierDirectory,
    issuer: &impl IdentityIssuer,
) -> Result<Vec<Entity>> {
    let supplier = directory.find_supplier(new_supplier_nr).await?;
    let supplier_name = supplier.name.clone().unwrap_or_default();
    log::info!("Resolved supplier {} -> {}", new_supplier_nr, supplier.id);

    let mut root = entities
        .iter()
        .find(|e| e.entity_type == codes::TYPE_ARTICLE)
        .cloned()
        .ok_or_else(|| MdmCloneError::RootEntityMissing(codes::TYPE_ARTICLE.to_string()))?;

    let old_supplier_articles: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.entity_type == codes::TYPE_SUPPLIER_ARTICLE)
        .collect();
    let old_trade_items: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.entity_type == codes::TYPE_TRADE_ITEM)
        .collect();

    // Root fields feeding the denormalized copies. Absent values yield
    // empty fields downstream, never a failure.
    let article_nr = root
        .attribute_str(codes::ATTR_SAP_ARTICLE_NR)
        .unwrap_or_default()
        .to_string();
    let business_id = root
        .attribute_str(codes::ATTR_IDENTIFIER)
        .unwrap_or_default()
        .to_string();
    let display_name = root.attribute_str(codes::ATTR_MDM_NAME).map(str::to_string);

    // New supplier relation on the root, explicitly not the default one.
    // The root keeps its own identity; only this operation's copies are
    // re-identified.
    root.push_relationship(
        codes::REL_SUPPLIER_TO_ARTICLE,
        RelationshipRecord::to(codes::TYPE_SUPPLIER, &supplier.id)
            .with_properties(codes::REL_SUPPLIER_TO_ARTICLE, Some("both"))
            .with_attribute(codes::ATTR_DEFAULT_SUPPLIER, not_default_supplier()),
    );
    root.id = business_id;
    root.name = display_name;

    let mut created: Vec<Entity> = Vec::new();

    for old_article in &old_supplier_articles {
        let mut replica = (*old_article).clone();
        replica.id = format!("{}-{}", article_nr, new_supplier_nr);
        replica.name = None;

        // Denormalized supplier/article facts, overwritten for the new
        // supplier context.
        replica.set_attribute(codes::ATTR_SUPPLIER_NR, new_supplier_nr);
        replica.set_attribute(codes::ATTR_NAME_ONE, supplier_name.as_str());
        replica.set_attribute(codes::ATTR_SAP_ARTICLE_NR, article_nr.as_str());
        replica.set_attribute(
            codes::ATTR_MDM_NAME,
            format!("{}-{}-{}", article_nr, supplier_name, new_supplier_nr),
        );
        replica.set_attribute(
            codes::ATTR_IDENTIFIER,
            format!("{}-{}", article_nr, new_supplier_nr),
        );

        // The old supplier links are discarded wholesale, not merged.
        replica.data.relationships.insert(
            codes::REL_SUPPLIER_TO_SUPPLIER_ARTICLE.to_string(),
            vec![RelationshipRecord::to(codes::TYPE_SUPPLIER, &supplier.id)],
        );

        // Replicate the trade items the old supplier-article referenced.
        let mut replica_item_refs: Vec<RelationshipRecord> = Vec::new();
        let referenced = old_article
            .data
            .relationships
            .get(codes::REL_TRADE_ITEM_TO_SUPPLIER_ARTICLE)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for reference in referenced {
            let Some(target) = &reference.rel_to else {
                continue;
            };
            let Some(original_item) = old_trade_items.iter().find(|t| t.id == target.id) else {
                log::warn!(
                    "Trade item {} referenced by {} not in working set, skipping",
                    target.id,
                    old_article.id
                );
                continue;
            };

            let mut item = (*original_item).clone();
            item.id = issuer.issue_opaque();
            item.name = None;
            item.push_relationship(
                codes::REL_TRADE_ITEM_TO_ARTICLE,
                RelationshipRecord::to(codes::TYPE_ARTICLE, root_identifier)
                    .with_properties(codes::REL_TRADE_ITEM_TO_ARTICLE, None),
            );
            item.set_attribute(codes::ATTR_SAP_ARTICLE_NR, article_nr.as_str());
            item.set_attribute(codes::ATTR_NAME_ONE, supplier_name.as_str());
            item.set_attribute(codes::ATTR_SUPPLIER_NR, new_supplier_nr);

            replica_item_refs.push(RelationshipRecord::to(codes::TYPE_TRADE_ITEM, &item.id));
            created.push(item);
        }

        for item_ref in replica_item_refs {
            replica.push_relationship(codes::REL_TRADE_ITEM_TO_SUPPLIER_ARTICLE, item_ref);
        }

        // Multiple supplier branches can coexist under one root: appended,
        // never replacing existing entries.
        root.push_relationship(
            codes::REL_ARTICLE_TO_SUPPLIER_ARTICLE,
            RelationshipRecord::to(codes::TYPE_SUPPLIER_ARTICLE, &replica.id),
        );

        created.push(replica);
    }

    log::info!(
        "Supplier switch created {} entities ({} supplier-article branches)",
        created.len(),
        old_supplier_articles.len()
    );

    // Updated root + untouched bystanders + replicas. The old branch family
    // is fully superseded.
    let mut result = vec![root];
    result.extend(entities.into_iter().filter(|e| {
        e.entity_type != codes::TYPE_ARTICLE
            && e.entity_type != codes::TYPE_SUPPLIER_ARTICLE
            && e.entity_type != codes::TYPE_TRADE_ITEM
    }));
    result.extend(created);
    Ok(result)
}
