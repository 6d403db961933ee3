//! Slate value trees and the shared table shape.
//!
//! Slate rich text is a tree of element nodes (`{"type", "children"}`,
//! links additionally carry a `data` payload) and text leaves
//! (`{"text"}`). Tables reuse one shape for both schema families; only the
//! cell value type differs.

use serde::Serialize;

/// One node of a slate value tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlateNode {
    Element(SlateElement),
    Text(SlateText),
}

impl SlateNode {
    /// Build a text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        SlateNode::Text(SlateText { text: text.into() })
    }

    /// Build an element node without a data payload.
    pub fn element(kind: impl Into<String>, children: Vec<SlateNode>) -> Self {
        SlateNode::Element(SlateElement {
            kind: kind.into(),
            data: None,
            children,
        })
    }

    /// Build an element node with a data payload (links).
    pub fn element_with_data(
        kind: impl Into<String>,
        data: serde_json::Value,
        children: Vec<SlateNode>,
    ) -> Self {
        SlateNode::Element(SlateElement {
            kind: kind.into(),
            data: Some(data),
            children,
        })
    }

    /// Concatenated text of all leaves under this node.
    pub fn plaintext(&self) -> String {
        match self {
            SlateNode::Text(leaf) => leaf.text.clone(),
            SlateNode::Element(el) => el
                .children
                .iter()
                .map(SlateNode::plaintext)
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

/// A text leaf.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateText {
    pub text: String,
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateElement {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub children: Vec<SlateNode>,
}

/// Rich text block in the slate schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateBlock {
    pub plaintext: String,
    pub value: Vec<SlateNode>,
}

/// Table block in the slate schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlateTableBlock {
    pub table: Table<Vec<SlateNode>>,
}

/// Header or data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Header,
    Data,
}

/// Table shape shared by both schema families.
///
/// The style flags are fixed by the editor's table implementation; only
/// `hideHeaders` varies (set when a headerless source table received a
/// synthesized invisible header row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<V> {
    pub basic: bool,
    pub celled: bool,
    pub compact: bool,
    pub fixed: bool,
    pub inverted: bool,
    pub striped: bool,
    #[serde(rename = "hideHeaders", skip_serializing_if = "Option::is_none")]
    pub hide_headers: Option<bool>,
    pub rows: Vec<TableRow<V>>,
}

impl<V> Default for Table<V> {
    fn default() -> Self {
        Self {
            basic: false,
            celled: true,
            compact: false,
            fixed: true,
            inverted: false,
            striped: false,
            hide_headers: None,
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow<V> {
    pub key: String,
    pub cells: Vec<TableCell<V>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell<V> {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub value: V,
}
