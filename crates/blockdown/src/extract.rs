//! The block extractor.
//!
//! Depth-first, children before self: inner matches are detached from the
//! tree before their ancestors are examined, so a wrapper emptied by
//! extraction no longer counts its former content as text. A single
//! consumed-node set is threaded through the whole traversal (shared with
//! the top-level driver loop); the legend lookahead both consumes and
//! detaches the legend paragraph so it can never re-emit elsewhere.

use std::collections::HashSet;

use blockdown_core::Block;

use crate::builders::{block_from_element, has_dedicated_builder};
use crate::convert::TextSchema;
use crate::dom::should_keep_wrapper;
use crate::node::{Document, NodeId};

/// Marker paragraph class for image captions.
const IMAGE_LEGEND_CLASS: &str = "richtext__imagelegend";

/// Shared traversal state: the top-level node list being iterated (for
/// the legend lookahead) and the consumed-node set.
pub(crate) struct TraversalContext<'a> {
    pub top_nodes: &'a [NodeId],
    pub top_index: usize,
    pub schema: TextSchema,
    pub consumed: &'a mut HashSet<NodeId>,
}

/// Extract every block owned by `node`'s subtree, in document order.
///
/// `link` carries the URL of the nearest enclosing anchor down the
/// recursion; anchors update it for their descendants.
pub(crate) fn extract_blocks(
    doc: &mut Document,
    node: NodeId,
    link: Option<String>,
    cx: &mut TraversalContext<'_>,
) -> Vec<Block> {
    let mut blocks = Vec::new();
    if !doc.is_element(node) {
        return blocks;
    }

    let mut link = link;
    if doc.is_tag(node, "a") {
        link = doc.attr(node, "href").map(String::from);
    }

    for child in doc.children(node).to_vec() {
        if cx.consumed.contains(&child) {
            continue;
        }
        blocks.extend(extract_blocks(doc, child, link.clone(), cx));
    }

    if has_dedicated_builder(doc, node) {
        doc.detach(node);
        let caption = if doc.is_tag(node, "img") {
            adopt_legend(doc, cx)
        } else {
            None
        };
        if should_keep_wrapper(doc, node) {
            blocks.push(block_from_element(
                doc,
                node,
                cx.schema,
                link.as_deref(),
                caption,
            ));
        }
    }

    blocks
}

/// Legend lookahead for an image: the next node at the top-level
/// enumeration, or one of its direct children, may be a legend paragraph.
/// On a match its text becomes the caption and the legend is consumed.
pub(crate) fn adopt_legend(doc: &mut Document, cx: &mut TraversalContext<'_>) -> Option<String> {
    let &next = cx.top_nodes.get(cx.top_index + 1)?;
    let legend = if is_legend(doc, next) {
        Some(next)
    } else {
        doc.children(next)
            .iter()
            .copied()
            .find(|&child| is_legend(doc, child))
    }?;

    cx.consumed.insert(legend);
    let text = doc.text_content(legend);
    doc.detach(legend);
    Some(text)
}

fn is_legend(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "p") && doc.has_class(node, IMAGE_LEGEND_CLASS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_html;
    use serde_json::json;

    fn extract_first(html: &str) -> (Vec<Block>, usize) {
        let mut doc = parse_html(html);
        let top: Vec<_> = doc.children(doc.root()).to_vec();
        let mut consumed = HashSet::new();
        let mut cx = TraversalContext {
            top_nodes: &top,
            top_index: 0,
            schema: TextSchema::Slate,
            consumed: &mut consumed,
        };
        let blocks = extract_blocks(&mut doc, top[0], None, &mut cx);
        (blocks, consumed.len())
    }

    #[test]
    fn image_nested_three_levels_deep_is_extracted_once() {
        let (blocks, _) = extract_first("<div><div><div><img src=\"image.jpeg\"></div></div></div>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(serde_json::to_value(&blocks[0]).unwrap()["@type"], "image");
    }

    #[test]
    fn image_inside_heading_precedes_the_heading_block() {
        let (blocks, _) = extract_first("<h2><img src=\"face.jpg\">Jane Doe</h2>");
        assert_eq!(blocks.len(), 2);
        let values: Vec<_> = blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .collect();
        assert_eq!(values[0]["@type"], "image");
        assert_eq!(values[1]["@type"], "heading");
        // the detached image no longer contributes to the heading text
        assert_eq!(values[1]["heading"], "Jane Doe");
    }

    #[test]
    fn link_context_reaches_nested_images() {
        let (blocks, _) =
            extract_first("<p><a href=\"https://plone.org\"><img src=\"image.jpeg\"></a></p>");
        assert_eq!(blocks.len(), 1);
        let value = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(
            value["href"],
            json!([{"@id": "https://plone.org", "title": "plone.org"}])
        );
    }

    #[test]
    fn legend_paragraph_is_adopted_and_consumed() {
        let mut doc = parse_html(
            "<p><img src=\"a.png\"></p><p class=\"richtext__imagelegend\">A caption</p>",
        );
        let top: Vec<_> = doc.children(doc.root()).to_vec();
        let mut consumed = HashSet::new();
        let mut cx = TraversalContext {
            top_nodes: &top,
            top_index: 0,
            schema: TextSchema::Slate,
            consumed: &mut consumed,
        };
        let blocks = extract_blocks(&mut doc, top[0], None, &mut cx);
        assert_eq!(blocks.len(), 1);
        let value = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(value["description"], "A caption");
        assert!(consumed.contains(&top[1]));
    }

    #[test]
    fn heading_emptied_by_extraction_is_dropped() {
        let (blocks, _) = extract_first("<h2><img src=\"only.jpg\"></h2>");
        assert_eq!(blocks.len(), 1);
        assert_eq!(serde_json::to_value(&blocks[0]).unwrap()["@type"], "image");
    }

    #[test]
    fn nested_table_with_text_is_extracted_after_its_image() {
        let (blocks, _) = extract_first(
            "<div><table><tbody><tr><td>text in table<img src=\"image.png\"></td></tr></tbody></table></div>",
        );
        let kinds: Vec<_> = blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap()["@type"].clone())
            .collect();
        assert_eq!(kinds, vec![json!("image"), json!("slateTable")]);
    }

    #[test]
    fn empty_nested_table_is_dropped_after_image_extraction() {
        let (blocks, _) = extract_first(
            "<div><table><tbody><tr><td><div><img src=\"image.png\"></div></td></tr></tbody></table></div>",
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(serde_json::to_value(&blocks[0]).unwrap()["@type"], "image");
    }
}
