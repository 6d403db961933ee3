//! Accordion and tab-set container blocks.
//!
//! A container aggregates blocks into titled panels. Panels and the blocks
//! inside them are keyed by opaque process-generated identifiers; the
//! `blocks_layout.items` list carries their order, and the id-keyed maps
//! preserve insertion order so the serialized object reads in document
//! order as well.

use indexmap::IndexMap;
use serde::Serialize;

use crate::block::Block;

/// Ordered identifier list, serialized as `{"items": [...]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Layout {
    pub items: Vec<String>,
}

/// Panel map plus layout, shared by both container kinds.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ContainerData {
    pub blocks: IndexMap<String, Panel>,
    pub blocks_layout: Layout,
}

impl ContainerData {
    /// Append a finished panel, keeping map and layout in step.
    pub fn push_panel(&mut self, panel: Panel) {
        self.blocks_layout.items.push(panel.id.clone());
        self.blocks.insert(panel.id.clone(), panel);
    }
}

/// Accordion container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccordionBlock {
    pub collapsed: bool,
    pub data: ContainerData,
    pub filtering: bool,
    pub non_exclusive: bool,
    pub right_arrows: bool,
}

impl AccordionBlock {
    pub fn new(data: ContainerData) -> Self {
        Self {
            collapsed: false,
            data,
            filtering: false,
            non_exclusive: false,
            right_arrows: true,
        }
    }
}

/// Tab-set container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabsBlock {
    pub variation: String,
    pub data: ContainerData,
}

impl TabsBlock {
    pub fn new(data: ContainerData) -> Self {
        Self {
            variation: "default".to_string(),
            data,
        }
    }
}

/// Panel flavor, matching its container kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PanelKind {
    #[serde(rename = "accordionPanel")]
    AccordionPanel,
    #[serde(rename = "tab")]
    Tab,
}

/// One titled sub-section of a container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    #[serde(rename = "@type")]
    pub kind: PanelKind,
    pub title: String,
    pub blocks: IndexMap<String, Block>,
    pub blocks_layout: Layout,
    pub id: String,
}

impl Panel {
    pub fn new(kind: PanelKind, title: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            blocks: IndexMap::new(),
            blocks_layout: Layout::default(),
            id: id.into(),
        }
    }

    /// Append a block under a fresh identifier.
    pub fn push_block(&mut self, id: impl Into<String>, block: Block) {
        let id = id.into();
        self.blocks_layout.items.push(id.clone());
        self.blocks.insert(id, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Alignment, HeadingBlock};

    fn heading() -> Block {
        Block::Heading(HeadingBlock {
            alignment: Alignment::Left,
            heading: "T".to_string(),
            tag: "h2".to_string(),
        })
    }

    #[test]
    fn panel_keeps_block_order() {
        let mut panel = Panel::new(PanelKind::AccordionPanel, "First", "p1");
        panel.push_block("a", heading());
        panel.push_block("b", heading());
        assert_eq!(panel.blocks_layout.items, vec!["a", "b"]);
        assert_eq!(panel.blocks.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn accordion_serializes_defaults() {
        let mut data = ContainerData::default();
        data.push_panel(Panel::new(PanelKind::AccordionPanel, "First", "p1"));
        let value = serde_json::to_value(AccordionBlock::new(data)).unwrap();
        assert_eq!(value["right_arrows"], true);
        assert_eq!(value["collapsed"], false);
        assert_eq!(value["data"]["blocks_layout"]["items"][0], "p1");
        assert_eq!(value["data"]["blocks"]["p1"]["@type"], "accordionPanel");
    }

    #[test]
    fn tabs_serialize_variation() {
        let value = serde_json::to_value(TabsBlock::new(ContainerData::default())).unwrap();
        assert_eq!(value["variation"], "default");
    }
}
