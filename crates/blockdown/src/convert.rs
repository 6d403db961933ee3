//! The conversion driver and the container state machine.
//!
//! The driver normalizes the top-level node list, then walks it once,
//! routing marker paragraphs to the container state machine and everything
//! else through the block extractor. Container state is an explicit value
//! owned by the loop; nothing global.

use std::collections::HashSet;
use std::fmt;
use std::mem;
use std::str::FromStr;

use tracing::debug;

use blockdown_core::{AccordionBlock, Block, ContainerData, Panel, PanelKind, TabsBlock};

use crate::builders::block_from_element;
use crate::dom::{group_inline_nodes, is_whitespace, should_keep_wrapper};
use crate::extract::{adopt_legend, extract_blocks, TraversalContext};
use crate::html::parse_html;
use crate::ids::generate_id;
use crate::node::{Document, NodeId};
use crate::BlockdownError;

/// Marker paragraph class opening an accordion panel.
const ACCORDION_MARKER_CLASS: &str = "tiny_accordeon_title";
/// Marker paragraph class opening a tab panel.
const TABS_MARKER_CLASS: &str = "tiny_tabnavigation_title";

/// Output schema family for plain text and tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSchema {
    #[default]
    Slate,
    Draftjs,
}

impl FromStr for TextSchema {
    type Err = BlockdownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slate" => Ok(TextSchema::Slate),
            "draftjs" => Ok(TextSchema::Draftjs),
            other => Err(BlockdownError::UnknownSchema(other.to_string())),
        }
    }
}

impl fmt::Display for TextSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TextSchema::Slate => "slate",
            TextSchema::Draftjs => "draftjs",
        })
    }
}

/// Options for [`HtmlConverter`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Schema family used for plain-text and table blocks.
    pub schema: TextSchema,
}

/// The main service for converting HTML to content blocks.
pub struct HtmlConverter {
    options: ConvertOptions,
}

impl HtmlConverter {
    /// Create a converter with default options (slate schema).
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
        }
    }

    /// Create a converter with custom options.
    pub fn with_options(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Get the current options.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert markup text to an ordered block list.
    ///
    /// Total over any input the parser accepts: empty, whitespace-only or
    /// malformed markup yields a (possibly empty) list, never an error.
    pub fn convert(&self, html: &str) -> Vec<Block> {
        let mut doc = parse_html(html);
        convert_document(&mut doc, self.options.schema)
    }
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert markup text to an ordered block list with the given schema.
pub fn convert_from_html(html: &str, schema: TextSchema) -> Vec<Block> {
    HtmlConverter::with_options(ConvertOptions { schema }).convert(html)
}

/// Container flavor, fixed when the first marker paragraph is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Accordion,
    Tabs,
}

impl ContainerKind {
    fn panel_kind(self) -> PanelKind {
        match self {
            ContainerKind::Accordion => PanelKind::AccordionPanel,
            ContainerKind::Tabs => PanelKind::Tab,
        }
    }
}

/// Is this node a marker paragraph, and of which flavor?
fn marker_kind(doc: &Document, node: NodeId) -> Option<ContainerKind> {
    if !doc.is_tag(node, "p") {
        return None;
    }
    if doc.has_class(node, TABS_MARKER_CLASS) {
        Some(ContainerKind::Tabs)
    } else if doc.has_class(node, ACCORDION_MARKER_CLASS) {
        Some(ContainerKind::Accordion)
    } else {
        None
    }
}

struct OpenContainer {
    kind: ContainerKind,
    /// Index in the top-level result where the first marker occurred;
    /// the finished container is inserted there.
    anchor: usize,
    data: ContainerData,
    current: Panel,
}

/// Explicit state threaded through the driver loop.
///
/// `NONE` until the first marker; from then on exactly one container is
/// open and every extracted block lands in its current panel. The kind is
/// fixed at the first marker: a later marker of the other flavor merely
/// opens another panel.
#[derive(Default)]
struct ContainerState {
    open: Option<OpenContainer>,
}

impl ContainerState {
    fn on_marker(&mut self, doc: &Document, marker: NodeId, kind: ContainerKind, anchor: usize) {
        let title = doc.text_content(marker);
        match &mut self.open {
            None => {
                debug!(?kind, %title, "opening container");
                self.open = Some(OpenContainer {
                    kind,
                    anchor,
                    data: ContainerData::default(),
                    current: Panel::new(kind.panel_kind(), title, generate_id()),
                });
            }
            Some(open) => {
                debug!(%title, "starting next panel");
                let next = Panel::new(open.kind.panel_kind(), title, generate_id());
                let finished = mem::replace(&mut open.current, next);
                open.data.push_panel(finished);
            }
        }
    }

    /// Route blocks into the open panel, or hand them back for the
    /// top-level result.
    fn absorb(&mut self, blocks: Vec<Block>) -> Option<Vec<Block>> {
        match &mut self.open {
            Some(open) => {
                for block in blocks {
                    open.current.push_block(generate_id(), block);
                }
                None
            }
            None => Some(blocks),
        }
    }

    /// Close the current panel and emit the container, if one is open.
    fn finish(self, result: &mut Vec<Block>) {
        if let Some(mut open) = self.open {
            open.data.push_panel(open.current);
            debug!(panels = open.data.blocks_layout.items.len(), "closing container");
            let block = match open.kind {
                ContainerKind::Accordion => Block::Accordion(AccordionBlock::new(open.data)),
                ContainerKind::Tabs => Block::Tabs(TabsBlock::new(open.data)),
            };
            let at = open.anchor.min(result.len());
            result.insert(at, block);
        }
    }
}

/// Normalize the root's child list: drop comments and whitespace-only
/// text, unwrap a single enclosing `div`, and group inline runs into
/// synthesized paragraphs.
fn preprocess(doc: &mut Document) -> Vec<NodeId> {
    let mut nodes = filtered_children(doc, doc.root());
    if nodes.len() == 1 && doc.is_tag(nodes[0], "div") {
        nodes = filtered_children(doc, nodes[0]);
    }
    group_inline_nodes(doc, &nodes)
}

fn filtered_children(doc: &Document, parent: NodeId) -> Vec<NodeId> {
    doc.children(parent)
        .iter()
        .copied()
        .filter(|&node| {
            if doc.is_comment(node) {
                return false;
            }
            match doc.text(node) {
                Some(content) => !is_whitespace(content),
                None => true,
            }
        })
        .collect()
}

/// Run one full conversion over a parsed document.
pub(crate) fn convert_document(doc: &mut Document, schema: TextSchema) -> Vec<Block> {
    let top = preprocess(doc);
    debug!(nodes = top.len(), %schema, "converting top-level nodes");

    let mut consumed: HashSet<NodeId> = HashSet::new();
    let mut state = ContainerState::default();
    let mut result: Vec<Block> = Vec::new();

    for (index, &node) in top.iter().enumerate() {
        if consumed.contains(&node) {
            continue;
        }
        if let Some(kind) = marker_kind(doc, node) {
            state.on_marker(doc, node, kind, result.len());
            continue;
        }
        let blocks = extract_top_level(doc, node, index, &top, schema, &mut consumed);
        if let Some(blocks) = state.absorb(blocks) {
            result.extend(blocks);
        }
    }

    state.finish(&mut result);
    debug!(blocks = result.len(), "conversion finished");
    result
}

/// Extract the blocks owned by one top-level node: its children first,
/// then (wrapper retention permitting) one block for the node itself.
/// Standalone images short-circuit with the legend lookahead.
fn extract_top_level(
    doc: &mut Document,
    node: NodeId,
    index: usize,
    top: &[NodeId],
    schema: TextSchema,
    consumed: &mut HashSet<NodeId>,
) -> Vec<Block> {
    if !doc.is_element(node) {
        return Vec::new();
    }

    let mut cx = TraversalContext {
        top_nodes: top,
        top_index: index,
        schema,
        consumed,
    };

    if doc.is_tag(node, "img") {
        doc.detach(node);
        let caption = adopt_legend(doc, &mut cx);
        return vec![block_from_element(doc, node, schema, None, caption)];
    }

    let link = doc.attr(node, "href").map(String::from);
    let mut blocks = Vec::new();
    for child in doc.children(node).to_vec() {
        if cx.consumed.contains(&child) {
            continue;
        }
        blocks.extend(extract_blocks(doc, child, link.clone(), &mut cx));
    }
    if should_keep_wrapper(doc, node) {
        blocks.push(block_from_element(doc, node, schema, None, None));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn kinds(blocks: &[Block]) -> Vec<Value> {
        blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap()["@type"].clone())
            .collect()
    }

    #[test]
    fn schema_parses_from_wire_names() {
        assert_eq!("slate".parse::<TextSchema>().unwrap(), TextSchema::Slate);
        assert_eq!("draftjs".parse::<TextSchema>().unwrap(), TextSchema::Draftjs);
        assert!(matches!(
            "markdown".parse::<TextSchema>(),
            Err(BlockdownError::UnknownSchema(_))
        ));
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_no_blocks() {
        assert!(convert_from_html("", TextSchema::Slate).is_empty());
        assert!(convert_from_html("   \n\t ", TextSchema::Slate).is_empty());
        assert!(convert_from_html("<!-- only a comment -->", TextSchema::Slate).is_empty());
    }

    #[test]
    fn whitespace_paragraph_yields_no_blocks() {
        assert!(convert_from_html("<p>&nbsp;</p>", TextSchema::Slate).is_empty());
        assert!(convert_from_html("<p> </p>", TextSchema::Slate).is_empty());
    }

    #[test]
    fn single_wrapping_div_is_unwrapped() {
        let blocks = convert_from_html(
            "<div><p>one</p><p>two</p></div>",
            TextSchema::Slate,
        );
        assert_eq!(kinds(&blocks), vec![json!("slate"), json!("slate")]);
    }

    #[test]
    fn top_level_order_is_preserved() {
        let blocks = convert_from_html(
            "<p>intro</p><h2>title</h2><img src=\"a.png\"><p>outro</p>",
            TextSchema::Slate,
        );
        assert_eq!(
            kinds(&blocks),
            vec![json!("slate"), json!("heading"), json!("image"), json!("slate")]
        );
    }

    #[test]
    fn inline_runs_split_around_block_elements() {
        let blocks = convert_from_html(
            "text with a <div>block element</div> and more text",
            TextSchema::Slate,
        );
        assert_eq!(blocks.len(), 3);
        let values: Vec<_> = blocks
            .iter()
            .map(|b| serde_json::to_value(b).unwrap())
            .collect();
        assert_eq!(
            values[0]["value"],
            json!([{"type": "p", "children": [{"text": "text with a "}]}])
        );
        assert_eq!(
            values[1]["value"],
            json!([{"type": "div", "children": [{"text": "block element"}]}])
        );
        assert_eq!(
            values[2]["value"],
            json!([{"type": "p", "children": [{"text": " and more text"}]}])
        );
    }

    #[test]
    fn standalone_image_adopts_following_legend() {
        let blocks = convert_from_html(
            "<img src=\"a.png\"><p class=\"richtext__imagelegend\">A caption</p>",
            TextSchema::Slate,
        );
        assert_eq!(blocks.len(), 1);
        let value = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(value["@type"], "image");
        assert_eq!(value["description"], "A caption");
    }

    #[test]
    fn accordion_markers_fold_following_blocks_into_panels() {
        let blocks = convert_from_html(
            "<p class=\"tiny_accordeon_title\">First</p><p>a</p><p>b</p>\
             <p class=\"tiny_accordeon_title\">Second</p><p>c</p>",
            TextSchema::Slate,
        );
        assert_eq!(blocks.len(), 1);
        let value = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(value["@type"], "accordion");
        let items = value["data"]["blocks_layout"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        let first = &value["data"]["blocks"][items[0].as_str().unwrap()];
        assert_eq!(first["title"], "First");
        assert_eq!(first["@type"], "accordionPanel");
        assert_eq!(first["blocks_layout"]["items"].as_array().unwrap().len(), 2);
        let second = &value["data"]["blocks"][items[1].as_str().unwrap()];
        assert_eq!(second["title"], "Second");
        assert_eq!(second["blocks_layout"]["items"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn container_is_emitted_at_its_first_marker_position() {
        let blocks = convert_from_html(
            "<p>before</p><p class=\"tiny_tabnavigation_title\">Tab</p><p>inside</p>",
            TextSchema::Slate,
        );
        assert_eq!(kinds(&blocks), vec![json!("slate"), json!("tabs_block")]);
    }

    #[test]
    fn no_marker_no_container() {
        let blocks = convert_from_html("<p>just text</p>", TextSchema::Slate);
        assert_eq!(kinds(&blocks), vec![json!("slate")]);
    }

    // The container kind stays fixed at the first marker; a later marker
    // of the other flavor only opens another panel. Inherited behavior,
    // kept on purpose.
    #[test]
    fn mixed_markers_keep_first_container_kind() {
        let blocks = convert_from_html(
            "<p class=\"tiny_accordeon_title\">A</p><p>one</p>\
             <p class=\"tiny_tabnavigation_title\">B</p><p>two</p>",
            TextSchema::Slate,
        );
        assert_eq!(blocks.len(), 1);
        let value = serde_json::to_value(&blocks[0]).unwrap();
        assert_eq!(value["@type"], "accordion");
        let items = value["data"]["blocks_layout"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        let titles: Vec<_> = items
            .iter()
            .map(|id| value["data"]["blocks"][id.as_str().unwrap()]["title"].clone())
            .collect();
        assert_eq!(titles, vec![json!("A"), json!("B")]);
    }

    #[test]
    fn panel_identifiers_are_opaque_but_consistent() {
        let blocks = convert_from_html(
            "<p class=\"tiny_accordeon_title\">Only</p><p>content</p>",
            TextSchema::Slate,
        );
        let value = serde_json::to_value(&blocks[0]).unwrap();
        let items = value["data"]["blocks_layout"]["items"].as_array().unwrap();
        let panel = &value["data"]["blocks"][items[0].as_str().unwrap()];
        // the layout id matches the panel's own id field
        assert_eq!(panel["id"], items[0].clone());
        let inner_items = panel["blocks_layout"]["items"].as_array().unwrap();
        assert_eq!(inner_items.len(), 1);
        assert_eq!(
            panel["blocks"][inner_items[0].as_str().unwrap()]["@type"],
            "slate"
        );
    }

    #[test]
    fn draftjs_schema_selects_draft_builders() {
        let blocks = convert_from_html("<p>text</p>", TextSchema::Draftjs);
        assert_eq!(kinds(&blocks), vec![json!("text")]);
        let blocks = convert_from_html(
            "<table><tr><td>x</td></tr></table>",
            TextSchema::Draftjs,
        );
        assert_eq!(kinds(&blocks), vec![json!("table")]);
    }

    #[test]
    fn converter_service_defaults_to_slate() {
        let converter = HtmlConverter::new();
        let blocks = converter.convert("<p>text</p>");
        assert_eq!(kinds(&blocks), vec![json!("slate")]);
        assert_eq!(converter.options().schema, TextSchema::Slate);
    }
}
