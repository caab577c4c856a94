// src/models/document.rs

//! Owned, immutable HTML tree.
//!
//! `scraper::Html` is not `Send`, so the parsed tree is copied into a flat,
//! pre-ordered node list that can sit behind an `Arc` and be walked from
//! several threads at once. Only elements and text survive the copy; comments,
//! doctypes and processing instructions carry no extractable text.

use ego_tree::iter::Edge;
use scraper::Html;

use crate::error::ParseError;
use crate::models::RawDocument;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Payload of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with its lowercase local name
    Element(String),
    /// Character data
    Text(String),
}

/// A node plus the extent of its subtree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Element attributes as (local name, value); empty for text
    attrs: Vec<(String, String)>,
    /// Exclusive end index of this node's subtree in `Document::nodes`
    end: usize,
}

impl Node {
    /// Whether this node is an element named `tag`.
    pub fn is_element(&self, tag: &str) -> bool {
        matches!(&self.kind, NodeKind::Element(name) if name == tag)
    }

    /// Value of the attribute `name`, matched ASCII case-insensitively.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Parsed page, queryable by tag name.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
    recovered_errors: usize,
}

impl Document {
    /// Decode raw bytes and parse them.
    ///
    /// Markup errors are recovered the way browsers recover them; only bytes
    /// that are not valid UTF-8 are rejected.
    pub fn from_raw(raw: &RawDocument) -> Result<Self, ParseError> {
        let bytes = raw.body.strip_prefix(UTF8_BOM).unwrap_or(raw.body.as_slice());
        let text = std::str::from_utf8(bytes).map_err(|error| ParseError::Undecodable {
            source_name: raw.source.clone(),
            charset: raw.charset(),
            error,
        })?;
        let document = Self::parse(text);
        if document.recovered_errors > 0 {
            log::debug!(
                "Recovered from {} markup errors in {}",
                document.recovered_errors,
                raw.source
            );
        }
        Ok(document)
    }

    /// Parse an HTML string.
    pub fn parse(html: &str) -> Self {
        let parsed = Html::parse_document(html);
        let mut nodes: Vec<Node> = Vec::new();
        let mut open: Vec<usize> = Vec::new();

        for edge in parsed.tree.root().traverse() {
            match edge {
                Edge::Open(node) => {
                    let (kind, attrs) = match node.value() {
                        scraper::Node::Element(element) => {
                            open.push(nodes.len());
                            let attrs = element
                                .attrs()
                                .map(|(key, value)| (key.to_string(), value.to_string()))
                                .collect();
                            (NodeKind::Element(element.name().to_ascii_lowercase()), attrs)
                        }
                        scraper::Node::Text(text) => (NodeKind::Text(str::to_owned(text)), Vec::new()),
                        _ => continue,
                    };
                    let index = nodes.len();
                    nodes.push(Node {
                        kind,
                        attrs,
                        end: index + 1,
                    });
                }
                Edge::Close(node) => {
                    if node.value().is_element() {
                        if let Some(index) = open.pop() {
                            nodes[index].end = nodes.len();
                        }
                    }
                }
            }
        }

        Self {
            nodes,
            recovered_errors: parsed.errors.len(),
        }
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of the first element named `tag` satisfying `predicate`.
    pub fn find_element(&self, tag: &str, predicate: impl Fn(&Node) -> bool) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.is_element(tag) && predicate(n))
    }

    /// Number of elements named `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.nodes.iter().filter(|n| n.is_element(tag)).count()
    }

    /// Concatenated descendant text of the node at `index`.
    pub fn text_content(&self, index: usize) -> String {
        let Some(node) = self.nodes.get(index) else {
            return String::new();
        };
        match &node.kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Element(_) => self.nodes[index + 1..node.end]
                .iter()
                .filter_map(|n| match &n.kind {
                    NodeKind::Text(text) => Some(text.as_str()),
                    NodeKind::Element(_) => None,
                })
                .collect(),
        }
    }

    /// Markup errors the parser recovered from.
    pub fn recovered_errors(&self) -> usize {
        self.recovered_errors
    }
}
