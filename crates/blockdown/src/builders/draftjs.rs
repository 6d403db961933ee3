//! Draftjs rich-text and table encoding.
//!
//! Draftjs stores rich text as a flat list of content blocks with style
//! and entity ranges over their text. Offsets count UTF-16 code units.

use blockdown_core::{
    Block, CellKind, DraftBlock, DraftContent, DraftEntity, DraftEntityRange, DraftStyleRange,
    DraftTableBlock, DraftTextBlock, Table, TableCell, TableRow,
};
use indexmap::IndexMap;

use crate::dom::{collapse_whitespace, is_inline_tag, is_whitespace, table_rows};
use crate::ids::generate_id;
use crate::node::{Document, NodeId};

/// Build a draftjs rich-text block from one element.
pub fn draft_text_block(doc: &Document, el: NodeId) -> Block {
    Block::Draft(DraftTextBlock {
        text: draft_content(doc, el),
    })
}

/// Build a draftjs table block; cells carry raw draft content. A table
/// without header cells receives a synthesized invisible header row.
pub fn draft_table_block(doc: &Document, el: NodeId) -> Block {
    let source_rows = table_rows(doc, el);
    let has_header = source_rows
        .first()
        .map(|cells| cells.iter().any(|&cell| doc.is_tag(cell, "th")))
        .unwrap_or(false);

    let mut table: Table<DraftContent> = Table::default();

    if !has_header && !source_rows.is_empty() {
        let columns = source_rows[0].len();
        table.hide_headers = Some(true);
        table.rows.push(TableRow {
            key: generate_id(),
            cells: (0..columns)
                .map(|_| TableCell {
                    key: generate_id(),
                    kind: CellKind::Header,
                    value: empty_content(),
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
                    value: draft_content(doc, cell),
                })
                .collect(),
        });
    }

    Block::DraftTable(DraftTableBlock { table })
}

fn draft_content(doc: &Document, el: NodeId) -> DraftContent {
    let mut content = DraftContent {
        blocks: Vec::new(),
        entity_map: IndexMap::new(),
    };
    emit_blocks(doc, el, 0, &mut content);
    if content.blocks.is_empty() {
        content.blocks.push(empty_block("unstyled"));
    }
    content
}

fn empty_content() -> DraftContent {
    DraftContent {
        blocks: vec![empty_block("unstyled")],
        entity_map: IndexMap::new(),
    }
}

fn empty_block(kind: &str) -> DraftBlock {
    DraftBlock {
        key: generate_id(),
        text: String::new(),
        kind: kind.to_string(),
        depth: 0,
        inline_style_ranges: Vec::new(),
        entity_ranges: Vec::new(),
        data: IndexMap::new(),
    }
}

/// Draftjs block type for a leaf tag.
fn block_kind(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "p" | "dt" | "dd" => "unstyled",
        "h1" => "header-one",
        "h2" => "header-two",
        "h3" => "header-three",
        "h4" => "header-four",
        "h5" => "header-five",
        "h6" => "header-six",
        "blockquote" => "blockquote",
        "pre" => "code-block",
        _ => return None,
    })
}

fn emit_blocks(doc: &Document, node: NodeId, depth: u32, content: &mut DraftContent) {
    if let Some(text) = doc.text(node) {
        if !is_whitespace(text) {
            let block = leaf_block(doc, node, "unstyled", depth, content);
            content.blocks.push(block);
        }
        return;
    }
    if !doc.is_element(node) {
        return;
    }

    match doc.tag(node).unwrap_or_default() {
        tag @ ("ul" | "ol") => {
            let kind = if tag == "ol" {
                "ordered-list-item"
            } else {
                "unordered-list-item"
            };
            for &child in doc.children(node) {
                if doc.is_tag(child, "li") {
                    emit_list_item(doc, child, kind, depth, content);
                }
            }
        }
        "dl" => {
            for &child in doc.children(node) {
                if doc.is_tag(child, "dt") || doc.is_tag(child, "dd") {
                    let block = leaf_block(doc, child, "unstyled", depth, content);
                    content.blocks.push(block);
                }
            }
        }
        tag => match block_kind(tag) {
            Some(kind) => {
                let block = leaf_block(doc, node, kind, depth, content);
                content.blocks.push(block);
            }
            None if has_block_child(doc, node) => {
                for &child in doc.children(node) {
                    emit_blocks(doc, child, depth, content);
                }
            }
            None => {
                let block = leaf_block(doc, node, "unstyled", depth, content);
                content.blocks.push(block);
            }
        },
    }
}

fn emit_list_item(doc: &Document, li: NodeId, kind: &str, depth: u32, content: &mut DraftContent) {
    let block = leaf_block(doc, li, kind, depth, content);
    content.blocks.push(block);
    // nested lists become deeper sibling blocks
    for &child in doc.children(li) {
        if doc.is_tag(child, "ul") || doc.is_tag(child, "ol") {
            emit_blocks(doc, child, depth + 1, content);
        }
    }
}

fn has_block_child(doc: &Document, node: NodeId) -> bool {
    doc.children(node).iter().any(|&child| {
        doc.tag(child)
            .map(|tag| !is_inline_tag(tag))
            .unwrap_or(false)
    })
}

#[derive(Default)]
struct InlineCollector {
    text: String,
    len: u32,
    styles: Vec<DraftStyleRange>,
    entities: Vec<DraftEntityRange>,
}

impl InlineCollector {
    fn push_str(&mut self, s: &str) {
        self.len += s.encode_utf16().count() as u32;
        self.text.push_str(s);
    }
}

fn leaf_block(
    doc: &Document,
    node: NodeId,
    kind: &str,
    depth: u32,
    content: &mut DraftContent,
) -> DraftBlock {
    let mut collector = InlineCollector::default();
    collect_inline(doc, node, &mut collector, &mut content.entity_map);
    DraftBlock {
        key: generate_id(),
        text: collector.text,
        kind: kind.to_string(),
        depth,
        inline_style_ranges: collector.styles,
        entity_ranges: collector.entities,
        data: IndexMap::new(),
    }
}

fn style_for(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "b" | "strong" => "BOLD",
        "i" | "em" => "ITALIC",
        "u" => "UNDERLINE",
        "s" | "del" => "STRIKETHROUGH",
        "code" => "CODE",
        _ => return None,
    })
}

fn collect_inline(
    doc: &Document,
    node: NodeId,
    out: &mut InlineCollector,
    entity_map: &mut IndexMap<String, DraftEntity>,
) {
    if let Some(text) = doc.text(node) {
        if is_whitespace(text) && out.text.is_empty() {
            return;
        }
        out.push_str(&collapse_whitespace(text));
        return;
    }
    if !doc.is_element(node) {
        return;
    }

    match doc.tag(node).unwrap_or_default() {
        "br" => out.push_str("\n"),
        // nested lists are emitted as their own blocks, not inline text
        "ul" | "ol" => {}
        "a" => {
            let start = out.len;
            for &child in doc.children(node) {
                collect_inline(doc, child, out, entity_map);
            }
            let length = out.len - start;
            if let Some(href) = doc.attr(node, "href") {
                if length > 0 {
                    let key = entity_map.len() as u32;
                    let mut data = IndexMap::new();
                    data.insert("url".to_string(), href.to_string());
                    entity_map.insert(
                        key.to_string(),
                        DraftEntity {
                            kind: "LINK".to_string(),
                            mutability: "MUTABLE".to_string(),
                            data,
                        },
                    );
                    out.entities.push(DraftEntityRange {
                        offset: start,
                        length,
                        key,
                    });
                }
            }
        }
        other => {
            let style = style_for(other);
            let start = out.len;
            for &child in doc.children(node) {
                collect_inline(doc, child, out, entity_map);
            }
            if let Some(style) = style {
                let length = out.len - start;
                if length > 0 {
                    out.styles.push(DraftStyleRange {
                        offset: start,
                        length,
                        style: style.to_string(),
                    });
                }
            }
        }
    }
}
