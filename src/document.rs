//! Parsed page tree
//!
//! A thin wrapper over `scraper::Html` exposing just the queries the
//! extractors need, addressed by node id so the tree can be mutated
//! (subtrees detached) between queries.
//!
//! Extraction is destructive: once an extractor has run, the document no
//! longer looks like the page that was fetched.

use crate::error::ExtractionError;
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};

/// Identifier of a node inside a [`ParsedDocument`]
pub type NodeId = ego_tree::NodeId;

/// A parsed HTML page
pub struct ParsedDocument {
    html: Html,
}

impl std::fmt::Debug for ParsedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedDocument")
            .field("nodes", &self.html.tree.nodes().count())
            .finish()
    }
}

fn compile(selector: &str) -> Result<Selector, ExtractionError> {
    Selector::parse(selector)
        .map_err(|e| ExtractionError::InvalidSelector(format!("{}: {:?}", selector, e)))
}

impl ParsedDocument {
    /// Parse a full HTML document
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Wrap an already parsed document
    pub fn from_html(html: Html) -> Self {
        Self { html }
    }

    fn node(&self, id: NodeId) -> Option<NodeRef<'_, Node>> {
        self.html.tree.get(id)
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.node(id).and_then(ElementRef::wrap)
    }

    /// Attached elements matching `selector`, in document order.
    ///
    /// `Html::select` walks the tree's node storage, which still holds the
    /// contents of detached subtrees, so the walk starts from the root node
    /// instead.
    fn matching<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = NodeId> + 'a {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |e| selector.matches(e))
            .map(|e| e.id())
    }

    /// First element in document order matching `selector`
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeId>, ExtractionError> {
        let selector = compile(selector)?;
        let first = self.matching(&selector).next();
        Ok(first)
    }

    /// All elements in document order matching `selector`
    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, ExtractionError> {
        let selector = compile(selector)?;
        let all = self.matching(&selector).collect();
        Ok(all)
    }

    /// Descendants of `scope` (not `scope` itself) matching `selector`
    pub fn select_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, ExtractionError> {
        let selector = compile(selector)?;
        let Some(scope_ref) = self.element(scope) else {
            return Ok(Vec::new());
        };
        Ok(scope_ref
            .select(&selector)
            .map(|e| e.id())
            .filter(|id| *id != scope)
            .collect())
    }

    /// First descendant of `scope` matching `selector`
    pub fn select_first_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Option<NodeId>, ExtractionError> {
        Ok(self.select_within(scope, selector)?.into_iter().next())
    }

    /// Concatenated text of the whole subtree
    pub fn text(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(node) => node
                .descendants()
                .filter_map(|n| n.value().as_text().map(|t| &**t))
                .collect(),
            None => String::new(),
        }
    }

    /// Text of the node's immediate text children only
    pub fn direct_text(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(node) => node
                .children()
                .filter_map(|n| n.value().as_text().map(|t| &**t))
                .collect(),
            None => String::new(),
        }
    }

    /// Text of the entire document
    pub fn full_text(&self) -> String {
        self.text(self.html.tree.root().id())
    }

    /// Lowercase tag name, `None` for non-element nodes
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .and_then(|n| n.value().as_element())
            .map(|e| e.name())
    }

    /// Whether the element carries `class` in its class list
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id)
            .and_then(|n| n.value().as_element())
            .map(|e| e.classes().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Class list joined by single spaces
    pub fn class_string(&self, id: NodeId) -> String {
        self.node(id)
            .and_then(|n| n.value().as_element())
            .map(|e| e.classes().collect::<Vec<_>>().join(" "))
            .unwrap_or_default()
    }

    /// Parent node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent()).map(|p| p.id())
    }

    /// Ancestors from the parent upwards
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(node) => node.ancestors().map(|a| a.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Every following sibling, text nodes included
    pub fn next_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(node) => node.next_siblings().map(|s| s.id()).collect(),
            None => Vec::new(),
        }
    }

    /// Following siblings that are elements
    pub fn next_element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(node) => node
                .next_siblings()
                .filter(|s| s.value().is_element())
                .map(|s| s.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Element children of a node
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            Some(node) => node
                .children()
                .filter(|c| c.value().is_element())
                .map(|c| c.id())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Attached text nodes whose content contains `needle`, in document order
    pub fn text_nodes_containing(&self, needle: &str) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|n| n.value().as_text().is_some_and(|t| t.contains(needle)))
            .map(|n| n.id())
            .collect()
    }

    /// If the element's content is a single chain of only-children ending in
    /// one text node, that text.
    pub fn sole_string(&self, id: NodeId) -> Option<String> {
        let mut current = self.node(id)?;
        loop {
            let mut children = current.children();
            let only = children.next()?;
            if children.next().is_some() {
                return None;
            }
            if let Some(text) = only.value().as_text() {
                return Some(text.to_string());
            }
            if !only.value().is_element() {
                return None;
            }
            current = only;
        }
    }

    /// Remove a node and its subtree from the document
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Whether the node is still reachable from the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.html.tree.root().id();
        id == root || self.ancestors(id).last() == Some(&root)
    }
}
