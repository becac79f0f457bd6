use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

/// Class-list mutation on a single element.
pub trait ClassList {
    /// Flips `class` and reports whether it is present afterwards.
    fn toggle_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
}

/// The slice of a page document the affordances touch.
pub trait Document {
    type Element: ClassList;

    fn body(&self) -> anyhow::Result<Self::Element>;
    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
}

impl<D: Document + ?Sized> Document for &D {
    type Element = D::Element;

    fn body(&self) -> anyhow::Result<Self::Element> {
        (**self).body()
    }

    fn element_by_id(&self, id: &str) -> Option<Self::Element> {
        (**self).element_by_id(id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Node {
    Body,
    Id(String),
}

type ClassMap = HashMap<Node, BTreeSet<String>>;

/// An in-memory document: a body plus any number of elements addressable by id.
///
/// Handles returned from it share state with the document, like DOM nodes do.
/// `Default` yields a document without a body; use [`HeadlessDocument::new`] for a page.
#[derive(Debug, Clone, Default)]
pub struct HeadlessDocument {
    nodes: Rc<RefCell<ClassMap>>,
}

impl HeadlessDocument {
    pub fn new() -> Self {
        let doc = Self::default();
        doc.nodes.borrow_mut().insert(Node::Body, BTreeSet::new());
        doc
    }

    /// Adds an element with the given id (no classes). Re-inserting keeps its classes.
    pub fn with_element(self, id: &str) -> Self {
        self.nodes
            .borrow_mut()
            .entry(Node::Id(id.to_string()))
            .or_default();
        self
    }

    pub fn body_classes(&self) -> Vec<String> {
        self.classes(&Node::Body)
    }

    pub fn element_classes(&self, id: &str) -> Option<Vec<String>> {
        let node = Node::Id(id.to_string());
        self.nodes
            .borrow()
            .contains_key(&node)
            .then(|| self.classes(&node))
    }

    fn classes(&self, node: &Node) -> Vec<String> {
        self.nodes
            .borrow()
            .get(node)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn handle(&self, node: Node) -> HeadlessElement {
        HeadlessElement {
            nodes: Rc::clone(&self.nodes),
            node,
        }
    }
}

impl Document for HeadlessDocument {
    type Element = HeadlessElement;

    fn body(&self) -> anyhow::Result<HeadlessElement> {
        if !self.nodes.borrow().contains_key(&Node::Body) {
            anyhow::bail!("document has no body");
        }
        Ok(self.handle(Node::Body))
    }

    fn element_by_id(&self, id: &str) -> Option<HeadlessElement> {
        let node = Node::Id(id.to_string());
        if self.nodes.borrow().contains_key(&node) {
            Some(self.handle(node))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessElement {
    nodes: Rc<RefCell<ClassMap>>,
    node: Node,
}

impl ClassList for HeadlessElement {
    fn toggle_class(&self, class: &str) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        let set = nodes.entry(self.node.clone()).or_default();
        if set.remove(class) {
            false
        } else {
            set.insert(class.to_string());
            true
        }
    }

    fn add_class(&self, class: &str) {
        self.nodes
            .borrow_mut()
            .entry(self.node.clone())
            .or_default()
            .insert(class.to_string());
    }

    fn has_class(&self, class: &str) -> bool {
        self.nodes
            .borrow()
            .get(&self.node)
            .is_some_and(|set| set.contains(class))
    }
}
