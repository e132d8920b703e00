use anyhow::{Context, Result};
use clap::Parser;
use mdmclone::config::{CloneConfig, Config};
use mdmclone::issuer::SapIssuer;
use mdmclone::mdm::{EntityUploader, MdmClient, MdmCredentials};
use mdmclone::runner;

#[derive(Parser, Debug)]
#[command(name = "mdmclone")]
#[command(about = "Clone master-data entity graphs or switch an article's supplier branch")]
struct Args {
    /// Clone profile under the clone-config directory (e.g. exartikel_STANDARD)
    #[arg(long = "clone")]
    clone_config: String,

    /// Article number or identifier of the entity to process
    #[arg(long = "articlenr")]
    article_nr: String,

    /// New supplier number (supplier-switch profiles only)
    #[arg(long)]
    supplier: Option<String>,
}

/// Resolve a secret named by the configuration from the environment.
fn env_secret(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| {
        format!(
            "Environment variable {} not set. Set it in your .env file or as an environment variable.",
            name
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();

    log::info!("Starting Mdmclone v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");

    let clone_cfg = CloneConfig::load(&config.clone_config_path(&args.clone_config))?;
    if let Some(display_name) = &clone_cfg.display_name {
        log::info!("Profile: {}", display_name);
    }

    let credentials = MdmCredentials {
        user_id: config.mdm.user_id.clone(),
        user_email: config.mdm.user_email.clone(),
        client_id: env_secret(&config.mdm.client_id_env)?,
        client_secret: env_secret(&config.mdm.client_secret_env)?,
    };
    let mdm = MdmClient::new(config.mdm.query_url.clone(), &credentials)?;

    let issuer = SapIssuer::new(
        mdm.clone(),
        config.numbering.token_url.clone(),
        env_secret(&config.numbering.token_auth_env)?,
        config.numbering.sequence_url.clone(),
    );
    let uploader = EntityUploader::new(config.mdm.upload_url.clone());

    let outcome = runner::run_clone_process(
        &args.article_nr,
        &args.clone_config,
        &clone_cfg,
        &config,
        &mdm,
        &issuer,
        &uploader,
        args.supplier.as_deref(),
    )
    .await?;

    if let Some(number) = &outcome.issued_article_nr {
        println!("New SAP article number: {}", number);
        if let Some(base_url) = &config.mdm.base_url {
            println!(
                "Article is being created: {}/entity-manage?id={}&type={}",
                base_url, number, outcome.entity_type
            );
        }
    }

    Ok(())
}
