//! # blockdown
//!
//! Convert HTML documents to editor content blocks.
//!
//! Editors author rich text as HTML; block-based editors store a
//! normalized sequence of typed records instead. This crate walks the
//! parsed tree, decides which elements become standalone blocks (images,
//! videos, embeds, headings, tables, call-to-action links), merges the
//! rest into rich-text blocks, and folds two marker-paragraph conventions
//! into accordion/tab containers — all while preserving document order.
//!
//! The conversion is total: any input the parser accepts produces a
//! (possibly empty) block list, never an error.
//!
//! ## Example
//!
//! ```rust
//! use blockdown::{convert_from_html, TextSchema};
//! use blockdown_core::Block;
//!
//! let blocks = convert_from_html("<h2>Hello World</h2>", TextSchema::Slate);
//! assert_eq!(blocks.len(), 1);
//! assert!(matches!(blocks[0], Block::Heading(_)));
//! ```
//!
//! Plain-text and table blocks are encoded in one of two schema families,
//! selected per call:
//!
//! ```rust
//! use blockdown::{HtmlConverter, ConvertOptions, TextSchema};
//!
//! let converter = HtmlConverter::with_options(ConvertOptions {
//!     schema: "draftjs".parse::<TextSchema>()?,
//! });
//! let blocks = converter.convert("<p>Some text</p>");
//! assert_eq!(blocks.len(), 1);
//! # Ok::<(), blockdown::BlockdownError>(())
//! ```

pub mod html;
pub mod node;

mod builders;
mod convert;
mod dom;
mod extract;
mod ids;

pub use builders::{
    block_from_element, button_block, heading_block, iframe_block, image_block, is_button_link,
    video_block, youtube_video_id,
};
pub use convert::{convert_from_html, ConvertOptions, HtmlConverter, TextSchema};
pub use dom::{group_inline_nodes, is_inline, is_whitespace, should_keep_wrapper};
pub use html::parse_html;
pub use node::{Document, NodeId, NodeKind};

pub use blockdown_core::Block;

/// Error type for blockdown operations.
///
/// The conversion itself is total; only the API boundary (parsing a
/// schema selector) can fail.
#[derive(Debug, thiserror::Error)]
pub enum BlockdownError {
    #[error("unknown text schema: {0}")]
    UnknownSchema(String),
}

pub type Result<T> = std::result::Result<T, BlockdownError>;
