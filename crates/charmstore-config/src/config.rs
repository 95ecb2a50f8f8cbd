use std::{
    collections::HashSet,
    fs,
    path::PathBuf,
    sync::{LazyLock, OnceLock, PoisonError, RwLock},
};

use charmstore_utils::path::{catalog_data_dir, resolve_path, xdg_config_home, APP_DIR};
use documented::{Documented, DocumentedFields};
use regex::Regex;
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_document,
    error::{ConfigError, Result},
};

/// ACL entry granting access to every caller, authenticated or not.
pub const EVERYONE: &str = "everyone";

/// Pseudo-series marking a bundle rather than a single charm.
pub const BUNDLE_SERIES: &str = "bundle";

/// Catalog service configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Root directory for catalog data.
    /// Default: $XDG_DATA_HOME/charmstore
    pub root_path: String,

    /// Path to the SQLite catalog database.
    /// Default: $CHARMSTORE_ROOT/catalog.db
    pub db_path: Option<String>,

    /// Series given priority when a reference does not name a series.
    /// Default: ["lucid", "precise", "trusty"]
    pub lts_series: Option<Vec<String>>,

    /// Read ACL assigned to a package the first time it is published.
    /// Default: ["everyone"]
    pub default_read_acl: Option<Vec<String>>,

    /// If true, archive fetches increment the download counter.
    /// Default: true
    pub record_downloads: Option<bool>,

    /// Maximum number of entities shown by `list`.
    /// Default: 50
    pub list_limit: Option<usize>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("CHARMSTORE_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join(APP_DIR).join("config.toml"),
    })
});

pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    *global_config = Some(config);
    Ok(())
}

pub fn get_config() -> Config {
    {
        let config_guard = CONFIG.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(config) = config_guard.as_ref() {
            return config.clone();
        }
    }

    let mut config_guard = CONFIG.write().unwrap_or_else(PoisonError::into_inner);
    config_guard
        .get_or_insert_with(Config::default_config)
        .clone()
}

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .to_path_buf()
}

pub fn set_config_path(path: PathBuf) {
    let mut config_path = CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner);
    *config_path = path;
}

pub fn default_lts_series() -> Vec<String> {
    ["lucid", "precise", "trusty"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn series_re() -> &'static Regex {
    static SERIES_RE: OnceLock<Regex> = OnceLock::new();
    SERIES_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*$").unwrap())
}

/// Reports whether `name` is a well-formed series: a lowercase letter
/// followed by lowercase letters or digits. Shared by config validation and
/// reference parsing.
pub fn is_valid_series_name(name: &str) -> bool {
    series_re().is_match(name)
}

impl Config {
    pub fn default_config() -> Self {
        let root_path = std::env::var("CHARMSTORE_ROOT")
            .unwrap_or_else(|_| catalog_data_dir().display().to_string());

        Self {
            db_path: Some(format!("{root_path}/catalog.db")),
            root_path,
            lts_series: Some(default_lts_series()),
            default_read_acl: Some(vec![EVERYONE.to_string()]),
            record_downloads: Some(true),
            list_limit: Some(50),
        }
    }

    /// Loads the configuration file, falling back to the defaults when it
    /// does not exist.
    pub fn new() -> Result<Self> {
        let config_path = config_path();

        let mut config = match fs::read_to_string(&config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    path = %config_path.display(),
                    "config file not found, using defaults"
                );
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        let lts = self.lts_series.get_or_insert_with(default_lts_series);
        for series in lts.iter() {
            if series == BUNDLE_SERIES {
                return Err(ConfigError::ReservedSeries);
            }
            if !is_valid_series_name(series) {
                return Err(ConfigError::InvalidSeries(series.clone()));
            }
        }

        let acl = self
            .default_read_acl
            .get_or_insert_with(|| vec![EVERYONE.to_string()]);
        if let Some(entry) = acl.iter().find(|entry| entry.trim().is_empty()) {
            return Err(ConfigError::InvalidAclEntry(entry.clone()));
        }

        self.record_downloads.get_or_insert(true);
        self.list_limit.get_or_insert(50);

        Ok(())
    }

    pub fn get_root_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("CHARMSTORE_ROOT") {
            return Ok(resolve_path(&env_path)?);
        }
        Ok(resolve_path(&self.root_path)?)
    }

    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("CHARMSTORE_DB") {
            return Ok(resolve_path(&env_path)?);
        }
        if let Some(db_path) = &self.db_path {
            return Ok(resolve_path(db_path)?);
        }
        Ok(self.get_root_path()?.join("catalog.db"))
    }

    /// The configured LTS series as a lookup set.
    pub fn lts_set(&self) -> HashSet<String> {
        self.lts_series
            .clone()
            .unwrap_or_else(default_lts_series)
            .into_iter()
            .collect()
    }

    pub fn default_read_acl(&self) -> Vec<String> {
        self.default_read_acl
            .clone()
            .unwrap_or_else(|| vec![EVERYONE.to_string()])
    }

    pub fn records_downloads(&self) -> bool {
        self.record_downloads.unwrap_or(true)
    }

    pub fn list_limit(&self) -> usize {
        self.list_limit.unwrap_or(50)
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_document::<Config>(&mut doc)?;

        Ok(doc)
    }
}

pub fn generate_default_config() -> Result<()> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let def_config = Config::default_config();
    let annotated_doc = def_config.to_annotated_document()?;

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&config_path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        config_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::EnvGuard;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.lts_series, Some(default_lts_series()));
        assert_eq!(config.default_read_acl, Some(vec!["everyone".to_string()]));
        assert_eq!(config.record_downloads, Some(true));
        assert_eq!(config.list_limit, Some(50));
    }

    #[test]
    fn test_lts_set_contains_defaults() {
        let config = Config::default_config();
        let lts = config.lts_set();

        assert!(lts.contains("precise"));
        assert!(lts.contains("trusty"));
        assert!(!lts.contains("utopic"));
    }

    #[test]
    fn test_resolve_rejects_bundle_lts() {
        let mut config = Config::default_config();
        config.lts_series = Some(vec!["trusty".into(), "bundle".into()]);

        assert!(matches!(config.resolve(), Err(ConfigError::ReservedSeries)));
    }

    #[test]
    fn test_resolve_rejects_malformed_series() {
        let mut config = Config::default_config();
        config.lts_series = Some(vec!["Trusty".into()]);
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidSeries(s)) if s == "Trusty"
        ));

        config.lts_series = Some(vec!["14.04".into()]);
        assert!(matches!(config.resolve(), Err(ConfigError::InvalidSeries(_))));
    }

    #[test]
    fn test_resolve_rejects_blank_acl_entry() {
        let mut config = Config::default_config();
        config.default_read_acl = Some(vec!["alice".into(), " ".into()]);

        assert!(matches!(
            config.resolve(),
            Err(ConfigError::InvalidAclEntry(_))
        ));
    }

    #[test]
    fn test_resolve_sets_defaults() {
        let mut config = Config::default_config();
        config.lts_series = None;
        config.default_read_acl = None;
        config.record_downloads = None;
        config.list_limit = None;

        config.resolve().unwrap();

        assert_eq!(config.lts_series, Some(default_lts_series()));
        assert_eq!(config.default_read_acl, Some(vec!["everyone".to_string()]));
        assert_eq!(config.record_downloads, Some(true));
        assert_eq!(config.list_limit, Some(50));
    }

    #[test]
    fn test_series_name_validation() {
        assert!(is_valid_series_name("trusty"));
        assert!(is_valid_series_name("win2012"));
        assert!(!is_valid_series_name(""));
        assert!(!is_valid_series_name("2trusty"));
        assert!(!is_valid_series_name("trusty-lts"));
        assert!(!is_valid_series_name("tr\u{fc}sty"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(deserialized.root_path, config.root_path);
        assert_eq!(deserialized.lts_series, config.lts_series);
    }

    #[test]
    fn test_partial_config_file() {
        let mut config: Config = toml::from_str(
            r#"
            root_path = "/srv/charmstore"
            lts_series = ["trusty", "xenial"]
            "#,
        )
        .unwrap();
        config.resolve().unwrap();

        assert!(config.lts_set().contains("xenial"));
        assert!(!config.lts_set().contains("precise"));
        assert!(config.records_downloads());
    }

    #[test]
    #[serial]
    fn test_db_path_env_override() {
        let _env = EnvGuard::set(&[("CHARMSTORE_DB", "/custom/catalog.db")]);
        let config = Config::default_config();
        assert_eq!(
            config.get_db_path().unwrap(),
            PathBuf::from("/custom/catalog.db")
        );
    }

    #[test]
    #[serial]
    fn test_generate_default_config_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charmstore").join("config.toml");
        let previous = config_path();
        set_config_path(path.clone());

        generate_default_config().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Read ACL assigned"));
        assert!(matches!(
            generate_default_config(),
            Err(ConfigError::ConfigAlreadyExists)
        ));

        set_config_path(previous);
    }
}
