//! Owned DOM node arena.
//!
//! The conversion walks and mutates one document tree. Nodes live in a
//! flat arena addressed by copyable [`NodeId`]s; parents hold ordered
//! child-id lists. Converted elements are detached in place, but callers
//! always iterate over a snapshot of a child list taken before any
//! mutation, so a detach can never invalidate a traversal in progress.

use indexmap::IndexMap;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The synthetic document root.
    Fragment,
    /// An element with a lowercase tag name and its attributes.
    Element {
        name: String,
        attrs: IndexMap<String, String>,
    },
    /// A text node.
    Text(String),
    /// A comment node; preserved by parsing, dropped by the preprocessor.
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// An owned, mutable document tree.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Create an empty document holding only the fragment root.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Fragment,
            }],
        }
    }

    /// The fragment root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: name.to_lowercase(),
            attrs: IndexMap::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeKind::Text(content.to_string()))
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(NodeKind::Comment(content.to_string()))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Remove a node from its parent's child list. The node itself (and
    /// its subtree) stays alive in the arena and can still be read.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Ordered child ids. Callers that mutate during traversal must clone
    /// this slice first.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Comment(_))
    }

    /// Lowercase tag name, for element nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// True when the node is an element with the given tag name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Literal content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Text(content) => Some(content.as_str()),
            _ => None,
        }
    }

    /// Attribute value by (case-insensitive) name.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs.get(&name.to_lowercase()).map(String::as_str),
            _ => None,
        }
    }

    /// Set an attribute on an element node.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id.0].kind {
            attrs.insert(name.to_lowercase(), value.to_string());
        }
    }

    /// The element's class names, whitespace-split.
    pub fn classes(&self, id: NodeId) -> impl Iterator<Item = &str> {
        self.attr(id, "class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.classes(id).any(|c| c == class)
    }

    /// `data-*` attributes with camelCased key names, in attribute order.
    pub fn data_attrs(&self, id: NodeId) -> Vec<(String, String)> {
        match &self.nodes[id.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .filter_map(|(name, value)| {
                    name.strip_prefix("data-")
                        .map(|rest| (camel_case(rest), value.clone()))
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Concatenated text of the node and its descendants. Comments
    /// contribute nothing; detached subtrees are no longer reachable and
    /// therefore no longer counted.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(content) => content.clone(),
            NodeKind::Comment(_) => String::new(),
            _ => self
                .children(id)
                .iter()
                .map(|&child| self.text_content(child))
                .collect::<Vec<_>>()
                .join(""),
        }
    }

    /// Reconstruct the node's markup, used when an embed is kept verbatim.
    pub fn outer_html(&self, id: NodeId) -> String {
        match &self.nodes[id.0].kind {
            NodeKind::Text(content) => content.clone(),
            NodeKind::Comment(content) => format!("<!--{}-->", content),
            NodeKind::Fragment => self.inner_html(id),
            NodeKind::Element { name, attrs } => {
                let attrs = attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{}=\"{}\"", k, escape_html_attr(v))
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" ");
                let open = if attrs.is_empty() {
                    format!("<{}>", name)
                } else {
                    format!("<{} {}>", name, attrs)
                };
                if is_void_element(name) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(id), name)
                }
            }
        }
    }

    /// Reconstruct the markup of the node's children.
    pub fn inner_html(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .map(|&child| self.outer_html(child))
            .collect::<Vec<_>>()
            .join("")
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Void (self-closing) HTML elements.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// `data-` attribute suffix to camelCase: `linktype` stays, `foo-bar`
/// becomes `fooBar`.
fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}
