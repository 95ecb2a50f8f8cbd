//! Renders field documentation of a config struct as TOML comments.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, DocumentMut, Item, RawString};
use tracing::warn;

use crate::error::{ConfigError, Result};

/// Formats `docs` as a block of `#` comment lines.
fn comment_block(docs: &str) -> String {
    let mut block = String::new();
    for line in docs.lines() {
        block.push('#');
        if !line.is_empty() {
            block.push(' ');
            block.push_str(line);
        }
        block.push('\n');
    }
    block
}

/// Prepends `docs` to whatever comments `decor` already carries.
///
/// An existing non-blank comment is separated from the new block by an
/// empty `#` line.
pub fn push_doc_comment(decor: &mut Decor, docs: &str) {
    let existing = decor
        .prefix()
        .and_then(RawString::as_str)
        .unwrap_or_default()
        .to_string();
    let separator = match existing.lines().last() {
        Some(last) if !last.is_empty() => "#\n",
        _ => "",
    };
    decor.set_prefix(format!("{existing}{separator}{}", comment_block(docs)));
}

/// Writes the docs of `T` above each key of the root table of `doc`. The
/// struct-level docs head the first key, since the root table has no
/// header of its own.
///
/// Keys that `T` does not document are left bare.
pub fn annotate_document<T>(doc: &mut DocumentMut) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    let mut header = Some(T::DOCS);

    for (mut key, item) in doc.as_table_mut().iter_mut() {
        if let Some(docs) = header.take() {
            push_doc_comment(key.leaf_decor_mut(), docs);
        }

        let Ok(docs) = T::get_field_docs(key.get()) else {
            warn!(
                field = key.get(),
                config = type_name::<T>(),
                "no documentation for config field"
            );
            continue;
        };

        match item {
            Item::None => return Err(ConfigError::UnexpectedTomlItem(key.get().to_string())),
            Item::Value(_) => push_doc_comment(key.leaf_decor_mut(), docs),
            Item::Table(table) => push_doc_comment(table.decor_mut(), docs),
            Item::ArrayOfTables(tables) => {
                if let Some(first) = tables.iter_mut().next() {
                    push_doc_comment(first.decor_mut(), docs);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn prefix(decor: &Decor) -> &str {
        decor.prefix().and_then(RawString::as_str).unwrap()
    }

    #[test]
    fn test_comment_block() {
        assert_eq!(comment_block("LTS series"), "# LTS series\n");
        assert_eq!(comment_block("a\n\nb"), "# a\n#\n# b\n");
    }

    #[test]
    fn test_push_doc_comment_separates_existing() {
        let mut decor = Decor::new("# existing\n", "");
        push_doc_comment(&mut decor, "More");
        assert_eq!(prefix(&decor), "# existing\n#\n# More\n");

        let mut decor = Decor::new("", "");
        push_doc_comment(&mut decor, "Fresh");
        assert_eq!(prefix(&decor), "# Fresh\n");
    }

    #[test]
    fn test_annotated_config_document() {
        let doc = Config::default_config()
            .to_annotated_document()
            .unwrap()
            .to_string();

        assert!(doc.starts_with("# Catalog service configuration"));
        assert!(doc.contains("# Series given priority"));
        assert!(doc.contains("# Default: 50\nlist_limit = 50"));
    }
}
