//! Document parsing
//!
//! Raw input is parsed once into an immutable arena of element and text
//! nodes. Parents are indices into the arena, so the tree owns nothing but
//! its own `Vec` and can be walked in both directions.

use scraper::{Html, Node};
use serde::{Deserialize, Serialize};

/// Format tag sent alongside a raw document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Html,
    /// Opaque text; no structural matching
    Json,
}

/// Index of a node inside its `Document`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Element {
        tag: String,
        children: Vec<NodeId>,
        parent: Option<NodeId>,
    },
    Text {
        content: String,
        parent: Option<NodeId>,
    },
}

impl DocumentNode {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            DocumentNode::Element { parent, .. } | DocumentNode::Text { parent, .. } => *parent,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, DocumentNode::Element { .. })
    }
}

/// Parsed document. Node ids are assigned in document (pre-)order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    format: DocumentFormat,
    nodes: Vec<DocumentNode>,
    body: Option<NodeId>,
}

/// Parse raw input into a document tree. Never fails: HTML parsing is
/// error-tolerant and anything else becomes a single text node.
pub fn parse(raw: &str, format: DocumentFormat) -> Document {
    let document = match format {
        DocumentFormat::Html => parse_html(raw),
        DocumentFormat::Json => Document::opaque(raw, format),
    };
    tracing::debug!(
        format = ?format,
        nodes = document.len(),
        has_body = document.body.is_some(),
        "parsed document"
    );
    document
}

fn parse_html(raw: &str) -> Document {
    let html = Html::parse_document(raw);
    let mut nodes: Vec<DocumentNode> = Vec::new();
    let mut body = None;

    // Pre-order walk; children are pushed reversed so they pop in order
    let mut stack = vec![(*html.root_element(), None::<NodeId>)];
    while let Some((node_ref, parent)) = stack.pop() {
        let id = NodeId(nodes.len());
        match node_ref.value() {
            Node::Element(el) => {
                let tag = el.name().to_ascii_lowercase();
                if tag == "body" && body.is_none() {
                    body = Some(id);
                }
                nodes.push(DocumentNode::Element {
                    tag,
                    children: Vec::new(),
                    parent,
                });
                for child in node_ref.children().rev() {
                    stack.push((child, Some(id)));
                }
            }
            Node::Text(text) => {
                let content: &str = text;
                nodes.push(DocumentNode::Text {
                    content: content.to_string(),
                    parent,
                });
            }
            // Comments, doctypes, processing instructions
            _ => continue,
        }

        if let Some(DocumentNode::Element { children, .. }) = parent.map(|p| &mut nodes[p.0]) {
            children.push(id);
        }
    }

    Document {
        format: DocumentFormat::Html,
        nodes,
        body,
    }
}

impl Document {
    /// Minimal tree: one text node holding the raw content
    fn opaque(raw: &str, format: DocumentFormat) -> Self {
        Self {
            format,
            nodes: vec![DocumentNode::Text {
                content: raw.to_string(),
                parent: None,
            }],
            body: None,
        }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Whether the document has element structure to match against
    pub fn is_structured(&self) -> bool {
        self.format == DocumentFormat::Html
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The outermost content container (`<body>`)
    pub fn body(&self) -> Option<NodeId> {
        self.body
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &DocumentNode {
        &self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            DocumentNode::Element { children, .. } => children,
            DocumentNode::Text { .. } => &[],
        }
    }

    /// Tag name for element nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            DocumentNode::Element { tag, .. } => Some(tag),
            DocumentNode::Text { .. } => None,
        }
    }

    /// All element ids in document order
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|id| self.node(*id).is_element())
    }

    /// All text node ids in document order
    pub fn text_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids().filter(|id| !self.node(*id).is_element())
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Concatenated descendant text in document order
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.node(current) {
                DocumentNode::Text { content, .. } => out.push_str(content),
                DocumentNode::Element { children, .. } => {
                    stack.extend(children.iter().rev());
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_body_container() {
        let doc = parse("<div><h2>Alpha</h2><p>x</p></div>", DocumentFormat::Html);

        let body = doc.body().unwrap();
        assert_eq!(doc.tag(body), Some("body"));
        assert_eq!(doc.tag(doc.root()), Some("html"));

        let div = doc.children(body)[0];
        assert_eq!(doc.tag(div), Some("div"));
        let tags: Vec<_> = doc.children(div).iter().map(|c| doc.tag(*c).unwrap()).collect();
        assert_eq!(tags, vec!["h2", "p"]);
        assert_eq!(doc.text_content(div), "Alphax");
    }

    #[test]
    fn test_every_node_but_root_has_parent() {
        let doc = parse(
            "<ul><li>One</li><li>Two <b>bold</b></li></ul><!-- note -->",
            DocumentFormat::Html,
        );

        assert_eq!(doc.parent(doc.root()), None);
        for i in 1..doc.len() {
            let id = NodeId(i);
            let parent = doc.parent(id).expect("non-root node has a parent");
            assert!(doc.children(parent).contains(&id));
            // Pre-order ids: parents come first
            assert!(parent < id);
        }
    }

    #[test]
    fn test_elements_in_document_order() {
        let doc = parse("<section><h1>T</h1><p>a</p></section><p>b</p>", DocumentFormat::Html);
        let tags: Vec<_> = doc.elements().map(|id| doc.tag(id).unwrap().to_string()).collect();
        assert_eq!(tags, vec!["html", "head", "body", "section", "h1", "p", "p"]);
    }

    #[test]
    fn test_malformed_markup_is_tolerated() {
        let doc = parse("<div><p>unclosed <span>nested</div></p>>>", DocumentFormat::Html);
        assert!(doc.body().is_some());
        assert!(doc.text_content(doc.root()).contains("nested"));
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = "<table><tr><td>1</td><td>2</td></tr></table>";
        assert_eq!(parse(raw, DocumentFormat::Html), parse(raw, DocumentFormat::Html));
    }

    #[test]
    fn test_json_is_single_text_node() {
        let raw = r#"{"items": [{"name": "<b>x</b>"}]}"#;
        let doc = parse(raw, DocumentFormat::Json);

        assert_eq!(doc.len(), 1);
        assert!(!doc.is_structured());
        assert_eq!(doc.body(), None);
        assert_eq!(doc.text_content(doc.root()), raw);
        assert_eq!(doc.elements().count(), 0);
    }

    #[test]
    fn test_format_serde() {
        let format: DocumentFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(format, DocumentFormat::Json);
        assert_eq!(serde_json::to_string(&DocumentFormat::Html).unwrap(), r#""html""#);
    }
}
