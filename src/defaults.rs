//! Compiled default content and the page-script format.
//!
//! Default content ships as a page script of the form
//! `window.PUBLISHING_TAB_CONTENT = { ... };` whose object literal is
//! JSON5 (unquoted keys, single-quoted strings). The same format is read
//! from alternative defaults files and written by [`export_script`].

use std::path::{Path, PathBuf};

use crate::content::ContentTree;

/// Global the page scripts read the content tree from.
pub const CONTENT_GLOBAL: &str = "window.PUBLISHING_TAB_CONTENT";

const BUILTIN_SCRIPT: &str = include_str!("../assets/tab-content.js");

/// Failure to read or parse a defaults file.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("failed to read defaults {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("defaults are not a valid object literal: {0}")]
    Syntax(#[from] json5::Error),
    #[error("defaults do not describe a content tree: {0}")]
    Shape(#[from] serde_json::Error),
}

/// The default tree compiled into the binary.
///
/// # Errors
/// Returns an error only if the bundled script is malformed.
pub fn builtin_defaults() -> Result<ContentTree, ContentError> {
    parse_content_script(BUILTIN_SCRIPT)
}

/// Read a defaults file: a page script, a bare JSON5 object, or JSON.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_defaults_file(path: &Path) -> Result<ContentTree, ContentError> {
    let source = std::fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_content_script(&source)
}

/// Parse a content tree out of a page script or bare object literal.
///
/// # Errors
/// Returns an error if the object literal is invalid or has the wrong shape.
pub fn parse_content_script(source: &str) -> Result<ContentTree, ContentError> {
    let literal = object_literal(source);
    let value: serde_json::Value = json5::from_str(literal)?;
    Ok(serde_json::from_value(value)?)
}

fn object_literal(source: &str) -> &str {
    let trimmed = source.trim();
    let Some((_, rhs)) = trimmed.split_once('=') else {
        return trimmed;
    };
    if !trimmed.starts_with("window.") {
        return trimmed;
    }
    rhs.trim().trim_end_matches(';').trim_end()
}

/// Render a tree as a page script that can replace the shipped defaults.
///
/// # Errors
/// Returns an error if the tree cannot be serialized.
pub fn export_script(tree: &ContentTree) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(tree)?;
    Ok(format!("{CONTENT_GLOBAL} = {json};"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Block, CONTACT_TAB};

    #[test]
    fn test_builtin_defaults_parse() {
        let tree = builtin_defaults().unwrap();
        assert_eq!(
            tree.keys().collect::<Vec<_>>(),
            vec!["publishing", "authors", "selfPublishing", "bookstore", "contact"]
        );
        let contact = tree.get(CONTACT_TAB).unwrap();
        assert_eq!(contact.title, "Contact");
        let details = contact.contact_details.as_ref().unwrap();
        assert_eq!(details.phone_number.as_deref(), Some("+48 123 456 789"));

        let store = tree.get("bookstore").unwrap().store.as_ref().unwrap();
        assert_eq!(store.kind, "sellastic");
        assert_eq!(store.arguments.len(), 5);

        let authors = tree.get("authors").unwrap();
        assert!(authors.body.iter().any(Block::is_form));
    }

    #[test]
    fn test_single_quote_escapes_survive() {
        let tree = builtin_defaults().unwrap();
        let Block::List { items } = &tree.get("publishing").unwrap().body[2] else {
            panic!("expected list");
        };
        assert!(items[0].contains("children's literature"));
    }

    #[test]
    fn test_parse_plain_json_and_bare_literal() {
        let json = r#"{"a": {"title": "A", "body": ["x"]}}"#;
        assert_eq!(parse_content_script(json).unwrap().get("a").unwrap().title, "A");

        let literal = "{ a: { title: 'A=B', body: [] } }";
        assert_eq!(
            parse_content_script(literal).unwrap().get("a").unwrap().title,
            "A=B"
        );
    }

    #[test]
    fn test_export_round_trips() {
        let tree = builtin_defaults().unwrap();
        let script = export_script(&tree).unwrap();
        assert!(script.starts_with("window.PUBLISHING_TAB_CONTENT = {\n  \"publishing\""));
        assert!(script.ends_with("};"));
        assert_eq!(parse_content_script(&script).unwrap(), tree);
    }

    #[test]
    fn test_malformed_defaults_report_errors() {
        assert!(matches!(
            parse_content_script("window.X = { a: ;"),
            Err(ContentError::Syntax(_))
        ));
        assert!(matches!(
            parse_content_script("{ a: { body: 'not a list' } }"),
            Err(ContentError::Shape(_))
        ));
    }

    #[test]
    fn test_load_defaults_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_defaults_file(&dir.path().join("missing.js"));
        assert!(matches!(result, Err(ContentError::Read { .. })));
    }
}
