//! Block records.
//!
//! Every block serializes to a JSON object tagged by `"@type"`. The field
//! shapes match what the block editor stores verbatim, so serialization is
//! the contract here; the Rust types exist to make the converter total.

use indexmap::IndexMap;
use serde::Serialize;

use crate::container::{AccordionBlock, TabsBlock};
use crate::draft::{DraftTableBlock, DraftTextBlock};
use crate::slate::{SlateBlock, SlateTableBlock};

/// One unit of editable content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "@type")]
pub enum Block {
    /// Standalone image with classification and optional caption/link.
    #[serde(rename = "image")]
    Image(ImageBlock),

    /// Hosted or embedded video.
    #[serde(rename = "video")]
    Video(VideoBlock),

    /// Raw markup kept verbatim (unrecognized embeds).
    #[serde(rename = "html")]
    Html(HtmlBlock),

    /// Heading extracted from `h1`..`h6`.
    #[serde(rename = "heading")]
    Heading(HeadingBlock),

    /// Call-to-action link styled as a button.
    #[serde(rename = "__button")]
    Button(ButtonBlock),

    /// Rich text in the slate schema.
    #[serde(rename = "slate")]
    Slate(SlateBlock),

    /// Table in the slate schema.
    #[serde(rename = "slateTable")]
    SlateTable(SlateTableBlock),

    /// Rich text in the draftjs schema.
    #[serde(rename = "text")]
    Draft(DraftTextBlock),

    /// Table in the draftjs schema.
    #[serde(rename = "table")]
    DraftTable(DraftTableBlock),

    /// Accordion container holding titled panels.
    #[serde(rename = "accordion")]
    Accordion(AccordionBlock),

    /// Tab-set container holding titled panels.
    #[serde(rename = "tabs_block")]
    Tabs(TabsBlock),
}

/// Horizontal placement of a block or its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Layout format of an image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Full content width.
    Large,
    /// One third of the content width.
    Third,
    /// Half of the content width.
    Half,
    /// Portrait orientation.
    Portrait,
}

/// Rendered size class of an image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    S,
    M,
    L,
}

/// A link reference carried by image and button blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkTarget {
    #[serde(rename = "@id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Image block.
///
/// `data` holds pass-through `data-*` attributes from the source element,
/// flattened into the record under their camelCased names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub url: String,
    pub alt: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<Vec<LinkTarget>>,
    pub format: ImageFormat,
    pub align: Alignment,
    pub size: ImageSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub data: IndexMap<String, String>,
}

/// Video block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoBlock {
    pub url: String,
}

/// Verbatim markup block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HtmlBlock {
    pub html: String,
}

/// Heading block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadingBlock {
    pub alignment: Alignment,
    pub heading: String,
    pub tag: String,
}

/// Visual style variant of a button block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariation {
    Black,
    White,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonStyles {
    pub variation: ButtonVariation,
}

/// Call-to-action block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonBlock {
    pub title: String,
    pub href: Vec<LinkTarget>,
    pub inneralign: Alignment,
    pub styles: ButtonStyles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_block_serializes_tagged_and_flattened() {
        let mut data = IndexMap::new();
        data.insert("linktype".to_string(), "image".to_string());

        let block = Block::Image(ImageBlock {
            url: "image.jpeg".to_string(),
            alt: String::new(),
            title: String::new(),
            href: None,
            format: ImageFormat::Large,
            align: Alignment::Center,
            size: ImageSize::L,
            description: None,
            data,
        });

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "@type": "image",
                "url": "image.jpeg",
                "alt": "",
                "title": "",
                "format": "large",
                "align": "center",
                "size": "l",
                "linktype": "image",
            })
        );
    }

    #[test]
    fn button_block_serializes_styles() {
        let block = Block::Button(ButtonBlock {
            title: "Go".to_string(),
            href: vec![LinkTarget {
                id: "https://example.org".to_string(),
                title: Some("Go".to_string()),
            }],
            inneralign: Alignment::Left,
            styles: ButtonStyles {
                variation: ButtonVariation::Black,
            },
        });

        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "@type": "__button",
                "title": "Go",
                "href": [{"@id": "https://example.org", "title": "Go"}],
                "inneralign": "left",
                "styles": {"variation": "black"},
            })
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let block = Block::Heading(HeadingBlock {
            alignment: Alignment::Left,
            heading: "Title".to_string(),
            tag: "h2".to_string(),
        });
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["@type"], "heading");
        assert_eq!(value["alignment"], "left");
        assert!(value.get("href").is_none());
    }
}
