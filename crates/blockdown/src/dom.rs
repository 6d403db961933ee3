//! DOM helper tables and the inline-run grouper.

use crate::node::{Document, NodeId};

/// Text-level elements. Runs of these (and text nodes) at the top level
/// are coalesced into one synthesized paragraph instead of becoming
/// separate blocks.
pub const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "br", "code", "em", "i", "s", "small", "span", "strong", "sub", "sup", "u",
];

/// Elements that are only worth keeping when they actually carry text.
/// Everything else (images, embeds, rules) is retained unconditionally.
pub const TEXT_BEARING_ELEMENTS: &[&str] = &[
    "b", "blockquote", "body", "code", "del", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6",
    "i", "p", "pre", "s", "span", "strong", "sub", "sup", "table", "u",
];

/// Is this tag a text-level (inline) element?
pub fn is_inline_tag(tag: &str) -> bool {
    INLINE_ELEMENTS.contains(&tag)
}

/// Is this node inline for grouping purposes? Text nodes always are.
pub fn is_inline(doc: &Document, id: NodeId) -> bool {
    doc.is_text(id) || doc.tag(id).map(is_inline_tag).unwrap_or(false)
}

/// Entirely-whitespace test; covers non-breaking spaces.
pub fn is_whitespace(s: &str) -> bool {
    s.chars().all(char::is_whitespace)
}

/// Wrapper retention: keep a text-bearing element only if its trimmed
/// text content is non-empty. A paragraph holding nothing but a
/// non-breaking space produces no block; an image never needs text.
pub fn should_keep_wrapper(doc: &Document, id: NodeId) -> bool {
    match doc.tag(id) {
        Some(tag) if TEXT_BEARING_ELEMENTS.contains(&tag) => {
            !doc.text_content(id).trim().is_empty()
        }
        _ => true,
    }
}

/// Coalesce maximal runs of inline/text nodes into synthesized `<p>`
/// wrappers, leaving non-inline nodes untouched and preserving order.
pub fn group_inline_nodes(doc: &mut Document, nodes: &[NodeId]) -> Vec<NodeId> {
    let mut result = Vec::with_capacity(nodes.len());
    let mut run: Option<NodeId> = None;

    for &node in nodes {
        if is_inline(doc, node) {
            let wrapper = match run {
                Some(wrapper) => wrapper,
                None => {
                    let wrapper = doc.create_element("p");
                    result.push(wrapper);
                    run = Some(wrapper);
                    wrapper
                }
            };
            doc.append_child(wrapper, node);
        } else {
            run = None;
            result.push(node);
        }
    }

    result
}

/// Collapse whitespace runs to single spaces.
pub(crate) fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_whitespace = false;
    for c in s.chars() {
        if c.is_whitespace() {
            if !prev_was_whitespace {
                result.push(' ');
                prev_was_whitespace = true;
            }
        } else {
            result.push(c);
            prev_was_whitespace = false;
        }
    }
    result
}

/// Collect a table's rows as lists of cell ids, in document order.
/// Rows nested under `thead`/`tbody`/`tfoot` are flattened.
pub fn table_rows(doc: &Document, table: NodeId) -> Vec<Vec<NodeId>> {
    let mut rows = Vec::new();
    collect_rows(doc, table, &mut rows);
    rows
}

fn collect_rows(doc: &Document, node: NodeId, rows: &mut Vec<Vec<NodeId>>) {
    for &child in doc.children(node) {
        match doc.tag(child) {
            Some("tr") => {
                let cells = doc
                    .children(child)
                    .iter()
                    .copied()
                    .filter(|&cell| doc.is_tag(cell, "th") || doc.is_tag(cell, "td"))
                    .collect();
                rows.push(cells);
            }
            Some("thead") | Some("tbody") | Some("tfoot") => collect_rows(doc, child, rows),
            _ => {}
        }
    }
}
