//! Plain terminal rendering of the effective tree.
//!
//! The site itself renders in the browser; this is the same layout for a
//! terminal, used by the CLI to preview content.

use crossterm::style::Stylize;
use serde_json::Value;
use unicode_width::UnicodeWidthStr;

use crate::contact::{mailto_link, normalise_contact_details, tel_link};
use crate::content::{Block, ContentTree, FormSpec, StoreWidget};

/// Layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum display width of a line
    pub width: usize,
    /// Emit ANSI styling
    pub styled: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            styled: false,
        }
    }
}

/// Render the tab strip, marking `active`.
pub fn render_tabs(tree: &ContentTree, active: Option<&str>) -> String {
    tree.iter()
        .map(|(key, content)| {
            let label = if content.title.is_empty() {
                key
            } else {
                content.title.as_str()
            };
            if active == Some(key) {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

/// Render one tab, `None` if the tree has no such key.
pub fn render_tab(tree: &ContentTree, key: &str, options: &RenderOptions) -> Option<String> {
    let content = tree.get(key)?;
    let width = options.width.max(20);
    let mut out = Vec::new();

    let underline = "=".repeat(content.title.width().clamp(1, width));
    if options.styled {
        out.push(content.title.as_str().bold().to_string());
    } else {
        out.push(content.title.clone());
    }
    out.push(underline);

    for block in &content.body {
        out.push(String::new());
        match block {
            Block::Text(text) => out.extend(wrap(text, width, "", "")),
            Block::List { items } => {
                for item in items {
                    out.extend(wrap(item, width, "  • ", "    "));
                }
            }
            Block::Form(spec) => out.extend(render_form(spec, width)),
        }
    }

    if let Some(store) = &content.store {
        out.push(String::new());
        out.extend(render_store(key, store, width));
    }

    if let Some(details) = content
        .contact_details
        .as_ref()
        .and_then(normalise_contact_details)
    {
        out.push(String::new());
        if let Some(phone) = details.phone_number.as_deref() {
            let label = details.phone_label.as_deref().unwrap_or_default();
            out.push(format!("{label}: {phone} <{}>", tel_link(phone)));
        }
        if let Some(email) = details.email_address.as_deref() {
            let label = details.email_label.as_deref().unwrap_or_default();
            out.push(format!(
                "{label}: {email} <{}>",
                mailto_link(email, None, None)
            ));
        }
        if let Some(endpoint) = details.form_endpoint.as_deref() {
            out.push(format!("Contact form → {endpoint}"));
        }
    }

    Some(out.join("\n"))
}

fn render_form(spec: &FormSpec, width: usize) -> Vec<String> {
    let label = spec
        .0
        .get("submitLabel")
        .and_then(Value::as_str)
        .unwrap_or("Form");
    let mut lines = vec![format!("[form: {label}]")];
    let fields = spec.0.get("fields").and_then(Value::as_array);
    for field in fields.into_iter().flatten() {
        let text = |name: &str| field.get(name).and_then(Value::as_str);
        let name = text("label").or_else(|| text("name")).unwrap_or("field");
        let mut line = format!("{name} ({})", text("type").unwrap_or("text"));
        if field.get("required").and_then(Value::as_bool) == Some(true) {
            line.push_str(", required");
        }
        if let Some(options) = field.get("options").and_then(Value::as_array) {
            let options: Vec<&str> = options.iter().filter_map(Value::as_str).collect();
            line.push_str(&format!(": {}", options.join(" / ")));
        }
        lines.extend(wrap(&line, width, "  - ", "    "));
    }
    lines
}

/// Widget arguments with the container `id=` argument guaranteed.
pub fn store_arguments(key: &str, store: &StoreWidget) -> Vec<String> {
    let container = store
        .container_id
        .clone()
        .unwrap_or_else(|| format!("{}-store-{key}", store.kind));
    let mut args = store.arguments.clone();
    if !args.iter().any(|arg| arg.trim().starts_with("id=")) {
        args.push(format!("id={container}"));
    }
    args
}

fn render_store(key: &str, store: &StoreWidget, width: usize) -> Vec<String> {
    let loading = store
        .loading_message
        .as_deref()
        .unwrap_or("Loading bookstore…");
    let mut lines = vec![format!("[{} storefront] {loading}", store.kind)];
    if let Some(url) = &store.script_url {
        lines.push(format!("  script: {url}"));
    }
    lines.extend(wrap(
        &store_arguments(key, store).join(", "),
        width,
        "  args: ",
        "        ",
    ));
    lines
}

/// Greedy word wrap by display width.
fn wrap(text: &str, width: usize, first_prefix: &str, rest_prefix: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = first_prefix.to_string();
    let mut line_has_word = false;
    for word in text.split_whitespace() {
        let needed = usize::from(line_has_word) + word.width();
        if line_has_word && line.width() + needed > width {
            lines.push(std::mem::replace(&mut line, rest_prefix.to_string()));
            line_has_word = false;
        }
        if line_has_word {
            line.push(' ');
        }
        line.push_str(word);
        line_has_word = true;
    }
    if line_has_word || lines.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ContactDetails, TabContent};

    fn tree() -> ContentTree {
        [
            (
                "publishing".to_string(),
                TabContent::new(
                    "Publishing House",
                    vec![Block::text("We publish books."), Block::list(["Fiction", "Poetry"])],
                ),
            ),
            (
                "contact".to_string(),
                TabContent::new("Contact", vec![]).with_contact_details(ContactDetails {
                    phone_number: Some("+48 123 456 789".to_string()),
                    email_address: Some("kontakt@dom.pl".to_string()),
                    ..ContactDetails::default()
                }),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_render_title_paragraph_and_list() {
        let out = render_tab(&tree(), "publishing", &RenderOptions::default()).unwrap();
        assert_eq!(
            out,
            "Publishing House\n================\n\nWe publish books.\n\n  • Fiction\n  • Poetry"
        );
    }

    #[test]
    fn test_render_unknown_tab_is_none() {
        assert!(render_tab(&tree(), "nope", &RenderOptions::default()).is_none());
    }

    #[test]
    fn test_render_contact_links() {
        let out = render_tab(&tree(), "contact", &RenderOptions::default()).unwrap();
        assert!(out.contains("Phone: +48 123 456 789 <tel:+48123456789>"));
        assert!(out.contains("Email: kontakt@dom.pl <mailto:kontakt@dom.pl>"));
        assert!(out.contains("Contact form → https://formsubmit.co/ajax/kontakt%40dom.pl"));
    }

    #[test]
    fn test_contact_without_channels_is_not_rendered() {
        let mut tree = tree();
        tree.insert(
            "contact",
            TabContent::new("Contact", vec![]).with_contact_details(ContactDetails {
                phone_label: Some("Phone".to_string()),
                ..ContactDetails::default()
            }),
        );
        let out = render_tab(&tree, "contact", &RenderOptions::default()).unwrap();
        assert_eq!(out, "Contact\n=======");
    }

    #[test]
    fn test_render_tabs_marks_active() {
        assert_eq!(
            render_tabs(&tree(), Some("contact")),
            " Publishing House |[Contact]"
        );
    }

    #[test]
    fn test_store_arguments_add_missing_id() {
        let store = StoreWidget {
            kind: "sellastic".to_string(),
            arguments: vec!["categoryView=grid".to_string()],
            ..StoreWidget::default()
        };
        assert_eq!(
            store_arguments("bookstore", &store),
            vec!["categoryView=grid", "id=sellastic-store-bookstore"]
        );

        let with_id = StoreWidget {
            arguments: vec![" id=custom".to_string()],
            ..store
        };
        assert_eq!(store_arguments("bookstore", &with_id), vec![" id=custom"]);
    }

    #[test]
    fn test_wrap_respects_display_width() {
        let lines = wrap("ąąą ććć ęęę", 8, "", "");
        assert_eq!(lines, vec!["ąąą ććć", "ęęę"]);
        let lines = wrap("alpha beta", 9, "  • ", "    ");
        assert_eq!(lines, vec!["  • alpha", "    beta"]);
    }

    #[test]
    fn test_wrap_keeps_overlong_words_whole() {
        assert_eq!(wrap("supercalifragilistic", 5, "", ""), vec!["supercalifragilistic"]);
    }
}
