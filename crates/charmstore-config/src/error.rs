use charmstore_utils::error::{PathError, UtilsError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(charmstore_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(charmstore_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(charmstore_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid series name in lts_series: {0:?}")]
    #[diagnostic(
        code(charmstore_config::invalid_series),
        help("Series names start with a lowercase letter followed by lowercase letters or digits")
    )]
    InvalidSeries(String),

    #[error("The 'bundle' pseudo-series cannot be marked as LTS")]
    #[diagnostic(
        code(charmstore_config::reserved_series),
        help("Remove 'bundle' from lts_series")
    )]
    ReservedSeries,

    #[error("Invalid ACL entry: {0:?}")]
    #[diagnostic(
        code(charmstore_config::invalid_acl),
        help("ACL entries are user names or the literal 'everyone'")
    )]
    InvalidAclEntry(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(charmstore_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(charmstore_config::utils))]
    Utils(#[from] UtilsError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(charmstore_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(charmstore_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

impl From<PathError> for ConfigError {
    fn from(err: PathError) -> Self {
        Self::Utils(UtilsError::Path(err))
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
