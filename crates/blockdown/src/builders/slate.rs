//! Slate rich-text and table encoding.
//!
//! The encoder deserializes an element's subtree into a slate value tree.
//! Known tags map to slate element types; unknown tags are spliced away,
//! keeping their children. `<br>` turns into a newline inside the nearest
//! text leaf. Whitespace-only text survives as a single space only when it
//! sits next to an inline sibling; between block siblings it is dropped.

use blockdown_core::{
    Block, CellKind, SlateBlock, SlateNode, SlateTableBlock, Table, TableCell, TableRow,
};
use serde_json::json;

use crate::dom::{collapse_whitespace, is_inline_tag, is_whitespace, table_rows};
use crate::ids::generate_id;
use crate::node::{Document, NodeId};

/// Build a slate rich-text block from one element.
pub fn slate_text_block(doc: &Document, el: NodeId) -> Block {
    let value = match doc.tag(el).and_then(slate_element_kind) {
        Some(kind) => vec![slate_element(doc, el, kind)],
        None => {
            let mut nodes = deserialize_children(doc, el);
            if nodes.is_empty() {
                nodes.push(SlateNode::text(""));
            }
            nodes
        }
    };
    let plaintext = value.iter().map(SlateNode::plaintext).collect();
    Block::Slate(SlateBlock { plaintext, value })
}

/// Build a slate table block. A table without header cells receives a
/// synthesized invisible header row and `hideHeaders`.
pub fn slate_table_block(doc: &Document, el: NodeId) -> Block {
    let source_rows = table_rows(doc, el);
    let has_header = source_rows
        .first()
        .map(|cells| cells.iter().any(|&cell| doc.is_tag(cell, "th")))
        .unwrap_or(false);

    let mut table: Table<Vec<SlateNode>> = Table::default();

    if !has_header && !source_rows.is_empty() {
        let columns = source_rows[0].len();
        table.hide_headers = Some(true);
        table.rows.push(TableRow {
            key: generate_id(),
            cells: (0..columns)
                .map(|_| TableCell {
                    key: generate_id(),
                    kind: CellKind::Header,
                    value: vec![SlateNode::element("p", vec![SlateNode::text("")])],
                })
                .collect(),
        });
    }

    for cells in source_rows {
        table.rows.push(TableRow {
            key: generate_id(),
            cells: cells
                .into_iter()
                .map(|cell| TableCell {
                    key: generate_id(),
                    kind: if doc.is_tag(cell, "th") {
                        CellKind::Header
                    } else {
                        CellKind::Data
                    },
                    value: vec![slate_element(doc, cell, "div")],
                })
                .collect(),
        });
    }

    Block::SlateTable(SlateTableBlock { table })
}

/// Slate element type for a tag, `None` for tags that get spliced away.
fn slate_element_kind(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "p" => "p",
        "div" => "div",
        "blockquote" => "blockquote",
        "pre" => "pre",
        "ul" => "ul",
        "ol" => "ol",
        "li" => "li",
        "dl" => "dl",
        "dt" => "dt",
        "dd" => "dd",
        "b" | "strong" => "strong",
        "i" | "em" => "em",
        "s" | "del" => "s",
        "u" => "u",
        "sub" => "sub",
        "sup" => "sup",
        "code" => "code",
        "a" => "link",
        "h1" => "h1",
        "h2" => "h2",
        "h3" => "h3",
        "h4" => "h4",
        "h5" => "h5",
        "h6" => "h6",
        _ => return None,
    })
}

fn slate_element(doc: &Document, el: NodeId, kind: &str) -> SlateNode {
    let mut children = deserialize_children(doc, el);
    if children.is_empty() {
        children.push(SlateNode::text(""));
    }
    if kind == "link" {
        SlateNode::element_with_data(
            kind,
            json!({
                "url": doc.attr(el, "href"),
                "target": doc.attr(el, "target"),
                "title": doc.attr(el, "title"),
            }),
            children,
        )
    } else {
        SlateNode::element(kind, children)
    }
}

fn deserialize_children(doc: &Document, el: NodeId) -> Vec<SlateNode> {
    let children = doc.children(el);
    let mut out: Vec<SlateNode> = Vec::new();

    for (index, &child) in children.iter().enumerate() {
        if doc.is_comment(child) {
            continue;
        }
        if let Some(content) = doc.text(child) {
            if is_whitespace(content) {
                if has_inline_element_neighbor(doc, children, index) {
                    push_text(&mut out, " ");
                }
            } else {
                push_text(&mut out, &collapse_whitespace(content));
            }
            continue;
        }
        match doc.tag(child) {
            Some("br") => push_text(&mut out, "\n"),
            Some(tag) => match slate_element_kind(tag) {
                Some(kind) => out.push(slate_element(doc, child, kind)),
                None => {
                    // unknown wrapper: splice its children in place
                    for node in deserialize_children(doc, child) {
                        match node {
                            SlateNode::Text(leaf) => push_text(&mut out, &leaf.text),
                            element => out.push(element),
                        }
                    }
                }
            },
            None => {}
        }
    }

    out
}

/// Is the nearest element sibling on either side an inline element?
/// Decides whether whitespace-only text is meaningful.
fn has_inline_element_neighbor(doc: &Document, children: &[NodeId], index: usize) -> bool {
    let previous = children[..index]
        .iter()
        .rev()
        .find(|&&n| doc.is_element(n));
    let next = children[index + 1..].iter().find(|&&n| doc.is_element(n));
    [previous, next].into_iter().flatten().any(|&n| {
        doc.tag(n).map(is_inline_tag).unwrap_or(false)
    })
}

/// Append a text chunk, merging into a preceding text leaf. A space
/// directly before a newline is invisible and gets dropped.
fn push_text(out: &mut Vec<SlateNode>, chunk: &str) {
    if chunk.is_empty() {
        return;
    }
    if let Some(SlateNode::Text(leaf)) = out.last_mut() {
        if chunk.starts_with('\n') {
            while leaf.text.ends_with(' ') {
                leaf.text.pop();
            }
        }
        leaf.text.push_str(chunk);
    } else {
        out.push(SlateNode::text(chunk));
    }
}
