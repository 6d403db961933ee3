//! Draftjs raw content.
//!
//! The draftjs schema stores rich text as a flat list of content blocks
//! with style and entity ranges over their text, plus an entity map for
//! links. Offsets count UTF-16 code units.

use indexmap::IndexMap;
use serde::Serialize;

use crate::slate::Table;

/// Rich text block in the draftjs schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftTextBlock {
    pub text: DraftContent,
}

/// Table block in the draftjs schema; cell values are raw draft content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftTableBlock {
    pub table: Table<DraftContent>,
}

/// Raw draftjs content: content blocks plus the entity map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftContent {
    pub blocks: Vec<DraftBlock>,
    #[serde(rename = "entityMap")]
    pub entity_map: IndexMap<String, DraftEntity>,
}

/// One draftjs content block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub depth: u32,
    #[serde(rename = "inlineStyleRanges")]
    pub inline_style_ranges: Vec<DraftStyleRange>,
    #[serde(rename = "entityRanges")]
    pub entity_ranges: Vec<DraftEntityRange>,
    pub data: IndexMap<String, String>,
}

/// A styled span of a content block's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftStyleRange {
    pub offset: u32,
    pub length: u32,
    pub style: String,
}

/// An entity-bearing span of a content block's text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftEntityRange {
    pub offset: u32,
    pub length: u32,
    pub key: u32,
}

/// An entry of the entity map (links).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub mutability: String,
    pub data: IndexMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_block_field_names() {
        let block = DraftBlock {
            key: "abc12".to_string(),
            text: "bold".to_string(),
            kind: "unstyled".to_string(),
            depth: 0,
            inline_style_ranges: vec![DraftStyleRange {
                offset: 0,
                length: 4,
                style: "BOLD".to_string(),
            }],
            entity_ranges: Vec::new(),
            data: IndexMap::new(),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "unstyled");
        assert_eq!(value["inlineStyleRanges"][0]["style"], "BOLD");
        assert_eq!(value["entityRanges"], serde_json::json!([]));
    }

    #[test]
    fn entity_map_key_name() {
        let mut entity_map = IndexMap::new();
        let mut data = IndexMap::new();
        data.insert("url".to_string(), "https://example.org".to_string());
        entity_map.insert(
            "0".to_string(),
            DraftEntity {
                kind: "LINK".to_string(),
                mutability: "MUTABLE".to_string(),
                data,
            },
        );
        let content = DraftContent {
            blocks: Vec::new(),
            entity_map,
        };
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value["entityMap"]["0"]["type"], "LINK");
    }
}
