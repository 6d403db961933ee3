//! # blockdown-core
//!
//! Data model for editor content blocks.
//!
//! A conversion produces an ordered sequence of [`Block`] records. Every
//! record is a tagged JSON object whose `"@type"` field names the kind;
//! the remaining fields depend on the kind. Two rich-text schema families
//! are supported for plain text and tables (`slate` and `draftjs`), and
//! two grouping containers (`accordion` and `tabs_block`) aggregate blocks
//! into titled panels.
//!
//! This crate only defines the shapes and their serde serialization. The
//! conversion engine that produces them lives in the `blockdown` crate.

mod block;
mod container;
mod draft;
mod slate;

pub use block::{
    Alignment, Block, ButtonBlock, ButtonStyles, ButtonVariation, HeadingBlock, HtmlBlock,
    ImageBlock, ImageFormat, ImageSize, LinkTarget, VideoBlock,
};
pub use container::{AccordionBlock, ContainerData, Layout, Panel, PanelKind, TabsBlock};
pub use draft::{
    DraftBlock, DraftContent, DraftEntity, DraftEntityRange, DraftStyleRange, DraftTableBlock,
    DraftTextBlock,
};
pub use slate::{
    CellKind, SlateBlock, SlateElement, SlateNode, SlateTableBlock, SlateText, Table, TableCell,
    TableRow,
};
