//! End-to-end clone run: fetch the working set, apply exactly one of the
//! two core transformations, persist locally, then upload (or, in debug
//! mode, write the would-be import file instead).

use crate::config::{CloneConfig, Config, ProcessType};
use crate::error::Result;
use crate::issuer::IdentityIssuer;
use crate::mdm::{EntityUploader, MdmClient};
use crate::remap;
use crate::store::{self, ImportEnvelope};
use crate::switch;

/// What a finished run reports back to the caller.
pub struct RunOutcome {
    /// Article number issued during a remap run, if any.
    pub issued_article_nr: Option<String>,
    /// Entity type of the processed profile (for the result deep link).
    pub entity_type: String,
}

/// Execute one clone run for `identifier` under the given profile.
#[allow(clippy::too_many_arguments)]
pub async fn run_clone_process(
    identifier: &str,
    clone_config_name: &str,
    clone_cfg: &CloneConfig,
    config: &Config,
    mdm: &MdmClient,
    issuer: &impl IdentityIssuer,
    uploader: &EntityUploader,
    supplier_nr: Option<&str>,
) -> Result<RunOutcome> {
    log::info!("Starting processing for {}", identifier);

    let entities = mdm
        .fetch_entities(
            identifier,
            &clone_cfg.identifier_attribute,
            &clone_cfg.entity_configs,
        )
        .await?;

    let mut issued_article_nr = None;
    let entities = match (clone_cfg.process_type, supplier_nr) {
        (Some(ProcessType::SupplierSwitch), Some(nr)) => {
            log::info!("Supplier switch requested, target supplier {}", nr);
            switch::switch_supplier(entities, identifier, nr, mdm, issuer).await?
        }
        _ if clone_cfg.clone_mode => {
            let outcome = remap::remap(entities, identifier, issuer).await?;
            store::save_json(
                &outcome.mapping,
                &config.storage.data_dir.join("id_mapping.json"),
            )?;
            issued_article_nr = outcome.issued_article_nr;
            outcome.entities
        }
        _ => entities,
    };

    let entities_path = config.storage.data_dir.join("get_entities.json");
    store::save_json(&entities, &entities_path)?;

    if clone_cfg.debug {
        log::info!("Debug mode active, nothing is sent");
        store::save_json(
            &ImportEnvelope::debug(entities),
            &config.storage.data_dir.join("send_entities.json"),
        )?;
    } else {
        uploader.upload(&entities_path, clone_config_name).await?;
    }

    Ok(RunOutcome {
        issued_article_nr,
        entity_type: clone_cfg.entity_type.clone(),
    })
}
