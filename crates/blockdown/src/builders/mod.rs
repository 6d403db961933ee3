//! Per-tag block builders.
//!
//! Each builder is a pure mapping from one element (plus limited context)
//! to one block record. Structural decisions — which elements get here,
//! and in what order — belong to the extractor, not to these functions.

pub mod draftjs;
pub mod slate;

use once_cell::sync::Lazy;
use regex::Regex;

use blockdown_core::{
    Alignment, Block, ButtonBlock, ButtonStyles, ButtonVariation, HeadingBlock, HtmlBlock,
    ImageBlock, ImageFormat, ImageSize, LinkTarget, VideoBlock,
};

use crate::convert::TextSchema;
use crate::node::{Document, NodeId};

/// Tags whose elements always become standalone blocks.
pub const ELEMENTS_WITH_CONVERTERS: &[&str] =
    &["img", "video", "table", "iframe", "h1", "h2", "h3", "h4", "h5", "h6"];

const BUTTON_PRIMARY_CLASS: &str = "tiny_link_button_primary";
const BUTTON_SECONDARY_CLASS: &str = "tiny_link_button_secondary";

/// Does this element own a dedicated builder (and therefore get detached
/// and converted on its own)?
pub fn has_dedicated_builder(doc: &Document, el: NodeId) -> bool {
    match doc.tag(el) {
        Some(tag) if ELEMENTS_WITH_CONVERTERS.contains(&tag) => true,
        _ => is_button_link(doc, el),
    }
}

/// An anchor styled as a call-to-action button.
pub fn is_button_link(doc: &Document, el: NodeId) -> bool {
    doc.is_tag(el, "a")
        && (doc.has_class(el, BUTTON_PRIMARY_CLASS) || doc.has_class(el, BUTTON_SECONDARY_CLASS))
}

/// Build the block for one element, dispatching on its tag. Elements
/// without a dedicated builder fall back to the schema-selected rich-text
/// builder.
pub fn block_from_element(
    doc: &Document,
    el: NodeId,
    schema: TextSchema,
    link: Option<&str>,
    caption: Option<String>,
) -> Block {
    match doc.tag(el) {
        Some("img") => image_block(doc, el, link, caption),
        Some("video") => video_block(doc, el),
        Some("iframe") => iframe_block(doc, el),
        Some("table") => match schema {
            TextSchema::Slate => slate::slate_table_block(doc, el),
            TextSchema::Draftjs => draftjs::draft_table_block(doc, el),
        },
        Some("h1") | Some("h2") | Some("h3") | Some("h4") | Some("h5") | Some("h6") => {
            heading_block(doc, el)
        }
        _ if is_button_link(doc, el) => button_block(doc, el),
        _ => match schema {
            TextSchema::Slate => slate::slate_text_block(doc, el),
            TextSchema::Draftjs => draftjs::draft_text_block(doc, el),
        },
    }
}

/// Classification table for editor-assigned image classes. The element's
/// first class with an entry wins.
const IMAGE_CLASS_FORMATS: &[(&str, ImageFormat, Alignment)] = &[
    ("fhnw-tiny-large", ImageFormat::Large, Alignment::Center),
    ("fhnw-tiny-large-float", ImageFormat::Large, Alignment::Left),
    ("fhnw-tiny-onethird-no-float", ImageFormat::Third, Alignment::Center),
    ("fhnw-tiny-onethird", ImageFormat::Third, Alignment::Left),
    ("fhnw-tiny-square", ImageFormat::Half, Alignment::Center),
    ("fhnw-tiny-square-float", ImageFormat::Half, Alignment::Left),
    ("fhnw-tiny-portrait", ImageFormat::Portrait, Alignment::Left),
];

/// Build an image block.
///
/// `link` is the URL of the nearest enclosing anchor, if any; `caption`
/// the text of an adopted legend paragraph.
pub fn image_block(
    doc: &Document,
    el: NodeId,
    link: Option<&str>,
    caption: Option<String>,
) -> Block {
    let src = doc.attr(el, "src").unwrap_or("");
    // Strip any image-scaling path suffix.
    let url = match src.find("/@@images") {
        Some(at) => &src[..at],
        None => src,
    };

    let href = link.map(|href| {
        vec![LinkTarget {
            id: href.to_string(),
            title: href.split_once("://").map(|(_, rest)| rest.to_string()),
        }]
    });

    let class_match = doc
        .classes(el)
        .find_map(|class| IMAGE_CLASS_FORMATS.iter().find(|(name, _, _)| *name == class));

    let (format, align, size) = match class_match {
        Some(&(_, format, align)) => (format, align, ImageSize::L),
        None => {
            // Legacy classification: alignment class, then scale suffix.
            let (align, mut size) = match align_from_class_name(doc.attr(el, "class").unwrap_or(""))
            {
                Alignment::Left => (Alignment::Left, ImageSize::M),
                Alignment::Right => (Alignment::Right, ImageSize::M),
                Alignment::Center => (Alignment::Center, ImageSize::L),
            };
            if let Some(scale) = scale_from_url(src) {
                size = match scale {
                    "large" => ImageSize::L,
                    "thumb" | "tile" => ImageSize::S,
                    _ => ImageSize::M,
                };
            }
            (ImageFormat::Large, align, size)
        }
    };

    Block::Image(ImageBlock {
        url: url.to_string(),
        alt: doc.attr(el, "alt").unwrap_or("").to_string(),
        title: doc.attr(el, "title").unwrap_or("").to_string(),
        href,
        format,
        align,
        size,
        description: caption,
        data: doc.data_attrs(el).into_iter().collect(),
    })
}

/// Legacy alignment classification from the class attribute.
fn align_from_class_name(class_name: &str) -> Alignment {
    if class_name.contains("image-left") {
        Alignment::Left
    } else if class_name.contains("image-right") {
        Alignment::Right
    } else {
        Alignment::Center
    }
}

/// Named scale of an `/@@images/<field>/<scale>` URL suffix.
fn scale_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/@@images/")?;
    let mut segments = rest.split('/');
    segments.next()?;
    segments.next().filter(|scale| !scale.is_empty())
}

/// Build a video block. An empty `src` falls back to the first `<source>`
/// child; recognized YouTube URLs are rewritten to their short form.
pub fn video_block(doc: &Document, el: NodeId) -> Block {
    let mut src = doc.attr(el, "src").unwrap_or("").to_string();
    if src.is_empty() {
        let first_child = doc.children(el).iter().copied().find(|&c| doc.is_element(c));
        if let Some(child) = first_child {
            if doc.is_tag(child, "source") {
                src = doc.attr(child, "src").unwrap_or("").to_string();
            }
        }
    }
    let url = match youtube_video_id(&src) {
        Some(id) => format!("https://youtu.be/{id}"),
        None => src,
    };
    Block::Video(VideoBlock { url })
}

/// Build a block for an embed frame: a video block for recognized
/// YouTube URLs, otherwise the raw markup kept verbatim.
pub fn iframe_block(doc: &Document, el: NodeId) -> Block {
    let src = doc.attr(el, "src").unwrap_or("");
    match youtube_video_id(src) {
        Some(id) => Block::Video(VideoBlock {
            url: format!("https://youtu.be/{id}"),
        }),
        None => Block::Html(HtmlBlock {
            html: doc.outer_html(el),
        }),
    }
}

/// Build a heading block.
pub fn heading_block(doc: &Document, el: NodeId) -> Block {
    Block::Heading(HeadingBlock {
        alignment: Alignment::Left,
        heading: doc.text_content(el),
        tag: doc.tag(el).unwrap_or("h2").to_string(),
    })
}

/// Build a call-to-action block from a button-classed anchor.
pub fn button_block(doc: &Document, el: NodeId) -> Block {
    let title = doc.text_content(el);
    Block::Button(ButtonBlock {
        href: vec![LinkTarget {
            id: doc.attr(el, "href").unwrap_or("").to_string(),
            title: Some(title.clone()),
        }],
        title,
        inneralign: Alignment::Left,
        styles: ButtonStyles {
            variation: if doc.has_class(el, BUTTON_PRIMARY_CLASS) {
                ButtonVariation::Black
            } else {
                ButtonVariation::White
            },
        },
    })
}

static YOUTUBE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:youtu\.be/|/v/|/u/\w/|embed/|watch\?)\??v?=?([^#&?]*)").unwrap()
});

/// Extract the 11-character YouTube video id from a hosting URL.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let captures = YOUTUBE_ID.captures(url)?;
    let id = captures.get(1)?.as_str();
    (id.len() == 11).then(|| id.to_string())
}
