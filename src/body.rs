//! Plain-text form of a tab body.
//!
//! The editor shows a body as text: one paragraph per block, list items
//! prefixed with `- `, blocks separated by a blank line. Parsing reverses
//! that, so `parse_body(&serialize_body(blocks)) == blocks` for any body made
//! of trimmed, single-line paragraphs and non-empty list items.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::content::Block;

static SEGMENT_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("segment break pattern is valid"));
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-•]\s*").expect("list marker pattern is valid"));

/// Render blocks as editable text.
///
/// Form blocks have no text form and are skipped, as are empty paragraphs
/// and empty lists.
pub fn serialize_body(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter_map(|block| match block {
            Block::Text(text) => Some(text.clone()),
            Block::List { items } => Some(
                items
                    .iter()
                    .map(|item| format!("- {item}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Block::Form(_) => None,
        })
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse editor text back into blocks.
///
/// A segment whose every line starts with `-` or `•` becomes a list;
/// anything else is joined into a single paragraph.
pub fn parse_body(input: &str) -> Vec<Block> {
    SEGMENT_BREAK
        .split(input)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(segment: &str) -> Block {
    let lines: Vec<&str> = segment
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let items: Vec<String> = lines
        .iter()
        .filter(|line| LIST_MARKER.is_match(line))
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if !items.is_empty() && items.len() == lines.len() {
        Block::List { items }
    } else {
        Block::Text(lines.join(" "))
    }
}

/// Put the form blocks of `original` back into a freshly parsed body.
///
/// Each form block returns to its original index, clamped to the end of
/// the new body, keeping the relative order of form blocks.
pub fn merge_form_blocks(mut parsed: Vec<Block>, original: &[Block]) -> Vec<Block> {
    for (index, block) in original.iter().enumerate() {
        if block.is_form() {
            let at = index.min(parsed.len());
            parsed.insert(at, block.clone());
        }
    }
    parsed
}
