//! Package references.
//!
//! A reference names a published artifact, possibly only partially. The
//! textual form is `[cs:][~user/][series/]name[-revision]`; the `cs:` schema
//! is optional on input and always present on display.

use std::{fmt, str::FromStr, sync::OnceLock};

use charmstore_config::config::is_valid_series_name;
use regex::Regex;

use crate::error::CatalogError;

const SCHEMA: &str = "cs";

fn name_re() -> &'static Regex {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    NAME_RE.get_or_init(|| Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]*[a-z][a-z0-9]*)*$").unwrap())
}

fn user_re() -> &'static Regex {
    static USER_RE: OnceLock<Regex> = OnceLock::new();
    USER_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-zA-Z0-9+.-]+$").unwrap())
}

/// A parsed package identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    /// Owning namespace; `None` for promulgated packages.
    pub user: Option<String>,
    pub name: String,
    /// Platform release, or the `bundle` pseudo-series.
    pub series: Option<String>,
    pub revision: Option<u32>,
}

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            user: None,
            name: name.into(),
            series: None,
            revision: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.series = Some(series.into());
        self
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// True when both series and revision are known.
    pub fn is_fully_qualified(&self) -> bool {
        self.series.is_some() && self.revision.is_some()
    }

    /// The base identity: same user and name, no series or revision.
    pub fn base(&self) -> Reference {
        Reference {
            user: self.user.clone(),
            name: self.name.clone(),
            series: None,
            revision: None,
        }
    }

    /// Whether `other` shares this reference's base identity.
    pub fn same_base(&self, other: &Reference) -> bool {
        self.user == other.user && self.name == other.name
    }

    /// Owner as stored in the catalog, where promulgated packages use `""`.
    pub fn owner(&self) -> &str {
        self.user.as_deref().unwrap_or_default()
    }

    /// The textual form without the schema prefix, as used in request paths.
    pub fn path(&self) -> String {
        let mut path = String::new();
        if let Some(user) = &self.user {
            path.push('~');
            path.push_str(user);
            path.push('/');
        }
        if let Some(series) = &self.series {
            path.push_str(series);
            path.push('/');
        }
        path.push_str(&self.name);
        if let Some(revision) = self.revision {
            path.push('-');
            path.push_str(&revision.to_string());
        }
        path
    }

    pub fn parse(input: &str) -> Result<Self, CatalogError> {
        Self::try_from(input)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEMA}:{}", self.path())
    }
}

impl TryFrom<&str> for Reference {
    type Error = CatalogError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let input = value.trim();
        let invalid = |reason: &str| CatalogError::invalid_reference(input, reason);

        let rest = match input.split_once(':') {
            Some((SCHEMA, rest)) => rest,
            Some((schema, _)) => {
                return Err(invalid(&format!("unsupported schema {schema:?}")));
            }
            None => input,
        };
        if rest.is_empty() {
            return Err(invalid("reference can't be empty"));
        }

        let mut parts: Vec<&str> = rest.split('/').collect();

        let user = match parts.first() {
            Some(first) if first.starts_with('~') => {
                let user = &first[1..];
                if !user_re().is_match(user) {
                    return Err(invalid(&format!("invalid user name {user:?}")));
                }
                parts.remove(0);
                Some(user.to_string())
            }
            _ => None,
        };

        let (series, name_part) = match parts.as_slice() {
            [name] => (None, *name),
            [series, name] => (Some(*series), *name),
            _ => return Err(invalid("too many path elements")),
        };

        if let Some(series) = series {
            if !is_valid_series_name(series) {
                return Err(invalid(&format!("invalid series {series:?}")));
            }
        }

        let (name, revision) = match name_part.rsplit_once('-') {
            Some((name, rev))
                if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) =>
            {
                let revision = rev
                    .parse::<u32>()
                    .map_err(|_| invalid(&format!("revision {rev:?} out of range")))?;
                (name, Some(revision))
            }
            _ => (name_part, None),
        };

        if !name_re().is_match(name) {
            return Err(invalid(&format!("invalid name {name:?}")));
        }

        Ok(Reference {
            user,
            name: name.to_string(),
            series: series.map(String::from),
            revision,
        })
    }
}

impl FromStr for Reference {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
