//! Resolution of user supplied paths for the catalog root, database and
//! config file.

use std::{env, path::PathBuf};

use crate::error::{PathError, PathResult};

/// Directory name used under the XDG base directories.
pub const APP_DIR: &str = "charmstore";

/// Expands `~`, `$VAR` and `${VAR}` in `path` and anchors the result at the
/// current directory when it is relative.
///
/// # Errors
///
/// * [`PathError::Empty`] for a blank path
/// * [`PathError::MissingEnvVar`] when a referenced variable is unset
/// * [`PathError::UnclosedVariable`] for `${VAR` without the closing brace
/// * [`PathError::CurrentDir`] if the working directory is unavailable
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let expanded = PathBuf::from(expand(path)?);
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    let cwd = env::current_dir().map_err(|source| PathError::CurrentDir { source })?;
    Ok(cwd.join(expanded))
}

/// `$HOME`, or `/` when unset.
pub fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

pub fn xdg_config_home() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config")
}

pub fn xdg_data_home() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", ".local/share")
}

/// Default location of catalog data: `$XDG_DATA_HOME/charmstore`.
pub fn catalog_data_dir() -> PathBuf {
    xdg_data_home().join(APP_DIR)
}

fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(fallback))
}

fn lookup(var: &str, input: &str) -> PathResult<String> {
    match var {
        "HOME" => Ok(home_dir().to_string_lossy().into_owned()),
        "XDG_CONFIG_HOME" => Ok(xdg_config_home().to_string_lossy().into_owned()),
        "XDG_DATA_HOME" => Ok(xdg_data_home().to_string_lossy().into_owned()),
        _ => {
            env::var(var).map_err(|_| {
                PathError::MissingEnvVar {
                    var: var.to_string(),
                    input: input.to_string(),
                }
            })
        }
    }
}

fn expand(input: &str) -> PathResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    if let Some(stripped) = rest.strip_prefix('~') {
        out.push_str(&home_dir().to_string_lossy());
        rest = stripped;
    }

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            let end = braced.find('}').ok_or_else(|| {
                PathError::UnclosedVariable {
                    input: format!("${{{braced}"),
                }
            })?;
            out.push_str(&lookup(&braced[..end], input)?);
            rest = &braced[end + 1..];
            continue;
        }

        let len = after
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if len == 0 {
            out.push('$');
        } else {
            out.push_str(&lookup(&after[..len], input)?);
        }
        rest = &after[len..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_expand_plain_and_braced() {
        env::set_var("CHARMSTORE_TEST_VAR", "blobs");
        assert_eq!(expand("$CHARMSTORE_TEST_VAR/x").unwrap(), "blobs/x");
        assert_eq!(expand("/srv/${CHARMSTORE_TEST_VAR}.db").unwrap(), "/srv/blobs.db");
        env::remove_var("CHARMSTORE_TEST_VAR");
    }

    #[test]
    fn test_expand_errors() {
        assert!(matches!(
            expand("${CHARMSTORE_UNCLOSED"),
            Err(PathError::UnclosedVariable { .. })
        ));
        assert!(matches!(
            expand("$THIS_VAR_DOESNT_EXIST_ANYWHERE"),
            Err(PathError::MissingEnvVar { .. })
        ));
    }

    #[test]
    fn test_lone_dollar_is_kept() {
        assert_eq!(expand("price$/x").unwrap(), "price$/x");
        assert_eq!(expand("tail$").unwrap(), "tail$");
    }

    #[test]
    #[serial]
    fn test_tilde_and_xdg_defaults() {
        env::set_var("HOME", "/tmp/home");
        env::remove_var("XDG_CONFIG_HOME");
        env::remove_var("XDG_DATA_HOME");

        assert_eq!(resolve_path("~/store").unwrap(), PathBuf::from("/tmp/home/store"));
        assert_eq!(xdg_config_home(), PathBuf::from("/tmp/home/.config"));
        assert_eq!(
            catalog_data_dir(),
            PathBuf::from("/tmp/home/.local/share/charmstore")
        );

        env::set_var("XDG_DATA_HOME", "/tmp/data");
        assert_eq!(xdg_data_home(), PathBuf::from("/tmp/data"));
        env::remove_var("XDG_DATA_HOME");
    }

    #[test]
    fn test_resolve_empty_path() {
        assert!(matches!(resolve_path("   "), Err(PathError::Empty)));
    }

    #[test]
    fn test_resolve_relative_path_is_absolute() {
        let resolved = resolve_path("relative/catalog.db").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("relative/catalog.db"));
    }
}
