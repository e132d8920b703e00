use crate::mdm::EntityQuerySpec;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub mdm: MdmConfig,
    pub numbering: NumberingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// MDM endpoint configuration
///
/// Secrets are referenced by environment-variable name and resolved at
/// startup; the configuration file itself never holds credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct MdmConfig {
    /// Entity query endpoint.
    pub query_url: String,
    /// Blob import endpoint; must contain the `Filename` placeholder.
    pub upload_url: String,
    /// Optional UI base URL for entity-manage deep links.
    #[serde(default)]
    pub base_url: Option<String>,
    pub user_id: String,
    pub user_email: String,
    #[serde(default = "default_client_id_env")]
    pub client_id_env: String,
    #[serde(default = "default_client_secret_env")]
    pub client_secret_env: String,
}

/// SAP numbering service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    pub token_url: String,
    #[serde(default = "default_token_auth_env")]
    pub token_auth_env: String,
    /// Numbering endpoint; must contain the `{nummernkreis}` placeholder.
    pub sequence_url: String,
}

/// Local storage locations
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_clone_config_dir")]
    pub clone_config_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            clone_config_dir: default_clone_config_dir(),
        }
    }
}

fn default_client_id_env() -> String {
    "MDM_CLIENT_ID".to_string()
}

fn default_client_secret_env() -> String {
    "MDM_CLIENT_SECRET".to_string()
}

fn default_token_auth_env() -> String {
    "SAP_TOKEN_AUTH".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_clone_config_dir() -> PathBuf {
    PathBuf::from("config/clone")
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in MDMCLONE_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("MDMCLONE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config_str = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .context("Failed to parse config.toml")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("mdm.query_url", &self.mdm.query_url),
            ("mdm.upload_url", &self.mdm.upload_url),
            ("numbering.token_url", &self.numbering.token_url),
        ] {
            Url::parse(value).with_context(|| format!("{} is not a valid URL: {}", name, value))?;
        }

        if !self.mdm.upload_url.contains("Filename") {
            anyhow::bail!(
                "mdm.upload_url must contain the Filename placeholder: {}",
                self.mdm.upload_url
            );
        }

        if !self.numbering.sequence_url.contains("{nummernkreis}") {
            anyhow::bail!(
                "numbering.sequence_url must contain the {{nummernkreis}} placeholder: {}",
                self.numbering.sequence_url
            );
        }

        // Secrets must be resolvable at startup, not at first use.
        // (dotenv already loaded in Config::load)
        for env_name in [
            &self.mdm.client_id_env,
            &self.mdm.client_secret_env,
            &self.numbering.token_auth_env,
        ] {
            std::env::var(env_name).with_context(|| {
                format!(
                    "Environment variable {} not set. Set it in your .env file or as an environment variable.",
                    env_name
                )
            })?;
        }

        Ok(())
    }

    /// Path of a clone-config profile by name.
    pub fn clone_config_path(&self, name: &str) -> PathBuf {
        self.storage.clone_config_dir.join(format!("{}.json", name))
    }
}

/// One clone profile: which entities to fetch for a run and how to process
/// them.
#[derive(Debug, Clone, Deserialize)]
pub struct CloneConfig {
    #[serde(default)]
    pub display_name: Option<String>,
    /// Entity type the identifier addresses (used for the result deep link).
    pub entity_type: String,
    /// Attribute the fetch queries filter on.
    pub identifier_attribute: String,
    pub entity_configs: Vec<EntityQuerySpec>,
    /// Assign new identities to the fetched working set.
    #[serde(rename = "clone", default)]
    pub clone_mode: bool,
    /// Persist the would-be import file instead of uploading.
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub process_type: Option<ProcessType>,
}

/// Specialized processing variants a profile can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    SupplierSwitch,
}

impl CloneConfig {
    /// Load a clone profile from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read clone config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse clone config: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serialize config tests that mutate process-wide env so they don't race.
    static CONFIG_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn test_config_toml() -> &'static str {
        r#"
[mdm]
query_url = "https://mdm.example.com/entityappservice/get"
upload_url = "https://blob.example.com/import/Filename?sig=abc"
base_url = "https://mdm.example.com/app"
user_id = "clone-user"
user_email = "clone-user@example.com"

[numbering]
token_url = "https://sap.example.com/oauth/token"
sequence_url = "https://sap.example.com/number/{nummernkreis}/next"

[storage]
data_dir = "data"
clone_config_dir = "config/clone"
"#
    }

    fn with_config_env(config_path: &std::path::Path, secrets: bool, f: impl FnOnce()) {
        let vars = ["MDM_CLIENT_ID", "MDM_CLIENT_SECRET", "SAP_TOKEN_AUTH"];
        let original_config = std::env::var("MDMCLONE_CONFIG").ok();
        std::env::set_var("MDMCLONE_CONFIG", config_path.to_str().unwrap());
        for var in vars {
            if secrets {
                std::env::set_var(var, "test-secret");
            } else {
                std::env::remove_var(var);
            }
        }
        f();
        std::env::remove_var("MDMCLONE_CONFIG");
        for var in vars {
            std::env::remove_var(var);
        }
        if let Some(val) = original_config {
            std::env::set_var("MDMCLONE_CONFIG", val);
        }
    }

    #[test]
    fn test_config_load_success() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, test_config_toml()).unwrap();

        with_config_env(&config_path, true, || {
            let config = Config::load();
            assert!(config.is_ok(), "Config::load() failed: {:?}", config.err());
            let config = config.unwrap();
            assert_eq!(config.mdm.user_id, "clone-user");
            assert_eq!(config.mdm.client_id_env, "MDM_CLIENT_ID");
            assert_eq!(config.storage.data_dir, PathBuf::from("data"));
            assert_eq!(
                config.clone_config_path("exartikel_STANDARD"),
                PathBuf::from("config/clone/exartikel_STANDARD.json")
            );
        });
    }

    #[test]
    fn test_config_missing_secrets() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, test_config_toml()).unwrap();

        with_config_env(&config_path, false, || {
            let config = Config::load();
            assert!(config.is_err(), "Expected missing secret error");
            assert!(config.unwrap_err().to_string().contains("MDM_CLIENT_ID"));
        });
    }

    #[test]
    fn test_config_upload_url_needs_placeholder() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let content = test_config_toml()
            .replace("https://blob.example.com/import/Filename?sig=abc", "https://blob.example.com/import");
        fs::write(&config_path, content).unwrap();

        with_config_env(&config_path, true, || {
            let config = Config::load();
            assert!(config.is_err());
            assert!(config.unwrap_err().to_string().contains("Filename"));
        });
    }

    #[test]
    fn test_config_invalid_path() {
        let _lock = CONFIG_TEST_LOCK.lock().unwrap();
        let original = std::env::var("MDMCLONE_CONFIG").ok();
        std::env::set_var("MDMCLONE_CONFIG", "nonexistent.toml");
        let config = Config::load();
        assert!(config.is_err());
        std::env::remove_var("MDMCLONE_CONFIG");
        if let Some(v) = original {
            std::env::set_var("MDMCLONE_CONFIG", v);
        }
    }

    #[test]
    fn test_clone_config_parse() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exartikel_STANDARD.json");
        fs::write(
            &path,
            r#"{
                "display_name": "Standard clone",
                "entity_type": "exartikel",
                "identifier_attribute": "axartikelnrsap",
                "entity_configs": [
                    {
                        "type": "exartikel",
                        "attributes": ["axartikelnrsap", "axidentifier"],
                        "relationships": ["relxliefzuart"],
                        "relationship_attributes": ["arelxregellieferant"]
                    }
                ],
                "clone": true
            }"#,
        )
        .unwrap();

        let clone_cfg = CloneConfig::load(&path).unwrap();
        assert_eq!(clone_cfg.entity_type, "exartikel");
        assert!(clone_cfg.clone_mode);
        assert!(!clone_cfg.debug);
        assert!(clone_cfg.process_type.is_none());
        assert_eq!(clone_cfg.entity_configs.len(), 1);
        assert_eq!(clone_cfg.entity_configs[0].attributes.len(), 2);
    }

    #[test]
    fn test_clone_config_supplier_switch() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("exartikel_LIEFERANTENWECHSEL.json");
        fs::write(
            &path,
            r#"{
                "entity_type": "exartikel",
                "identifier_attribute": "axidentifier",
                "entity_configs": [],
                "process_type": "supplier_switch"
            }"#,
        )
        .unwrap();

        let clone_cfg = CloneConfig::load(&path).unwrap();
        assert_eq!(clone_cfg.process_type, Some(ProcessType::SupplierSwitch));
    }
}
