//! HTML parsing into the node arena.
//!
//! Parsing is lenient per html5ever's fragment rules: malformed, unclosed
//! or unknown markup never fails, it just produces the recovered tree.
//! Text and comment nodes are preserved so the preprocessor can decide
//! what to drop.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::{Document, NodeId};

/// Parse markup text into an owned [`Document`].
pub fn parse_html(html: &str) -> Document {
    let parsed = Html::parse_fragment(html);
    let mut doc = Document::new();
    let root = doc.root();
    // parse_fragment wraps the content in a synthetic <html> element;
    // its children are the top-level nodes of the input.
    convert_children(&mut doc, root, parsed.root_element());
    doc
}

fn convert_children(doc: &mut Document, parent: NodeId, element: ElementRef) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                let id = doc.create_text(&text.text);
                doc.append_child(parent, id);
            }
            ScraperNode::Comment(comment) => {
                let id = doc.create_comment(&comment.comment);
                doc.append_child(parent, id);
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    let id = doc.create_element(child_element.value().name());
                    for (name, value) in child_element.value().attrs() {
                        doc.set_attr(id, name, value);
                    }
                    doc.append_child(parent, id);
                    convert_children(doc, id, child_element);
                }
            }
            _ => {}
        }
    }
}
