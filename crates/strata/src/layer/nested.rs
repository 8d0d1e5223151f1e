use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use tracing::trace;

use crate::{
    Cleanup, ElementId,
    dom::Document,
    error::{Error, Result},
};

/// One node of the nested-layer tree.
struct NestedNode {
    /// Document the roots live in.
    document: Document,
    /// This layer's root while it is open.
    root: Cell<Option<ElementId>>,
    /// Roots of layers registered beneath this one, directly or through a
    /// descendant.
    children: RefCell<Vec<ElementId>>,
    /// Enclosing layer, if any.
    parent: Option<LayerContext>,
}

/// A layer's handle in the nested-layer tree.
///
/// A layer rendered logically inside another open layer (a submenu inside a
/// menu inside a dialog) is constructed with its parent's context and
/// registers its root there when it opens. Registration is forwarded up the
/// whole chain, so every ancestor knows the nested root is "inside" it, even
/// when the nested root is rendered elsewhere in the document.
#[derive(Clone)]
pub struct LayerContext {
    /// Shared node.
    node: Rc<NestedNode>,
}

impl fmt::Debug for LayerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerContext")
            .field("root", &self.node.root.get())
            .field("nested", &self.node.children.borrow())
            .field("has_parent", &self.node.parent.is_some())
            .finish()
    }
}

impl LayerContext {
    /// Construct a context, optionally beneath a parent.
    pub fn new(document: Document, parent: Option<Self>) -> Self {
        Self {
            node: Rc::new(NestedNode {
                document,
                root: Cell::new(None),
                children: RefCell::new(Vec::new()),
                parent,
            }),
        }
    }

    /// Resolve a required enclosing layer.
    ///
    /// APIs that only make sense inside another layer use this to fail fast
    /// when constructed outside one.
    pub fn require(parent: Option<&Self>, consumer: &'static str) -> Result<Self> {
        parent
            .cloned()
            .ok_or(Error::MissingProvider { consumer })
    }

    /// The enclosing layer's context.
    pub fn parent(&self) -> Option<&Self> {
        self.node.parent.as_ref()
    }

    /// This layer's root while it is open.
    pub fn root(&self) -> Option<ElementId> {
        self.node.root.get()
    }

    /// Record this layer's root.
    pub(crate) fn set_root(&self, root: Option<ElementId>) {
        self.node.root.set(root);
    }

    /// Do two handles refer to the same layer?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Register `child` as nested beneath this layer and every ancestor.
    ///
    /// The returned cleanup undoes every registration it made. Registering the
    /// same root twice needs two releases to remove it.
    pub fn register_nested_layer(&self, child: ElementId) -> Cleanup {
        self.node.children.borrow_mut().push(child);
        trace!(?child, "nested layer registered");
        let node = Rc::downgrade(&self.node);
        let own = Cleanup::new(move || {
            if let Some(node) = node.upgrade() {
                let mut children = node.children.borrow_mut();
                if let Some(i) = children.iter().position(|c| *c == child) {
                    children.remove(i);
                }
            }
        });
        match &self.node.parent {
            Some(parent) => own.and(parent.register_nested_layer(child)),
            None => own,
        }
    }

    /// Roots registered beneath this layer.
    pub fn nested_layers(&self) -> Vec<ElementId> {
        self.node.children.borrow().clone()
    }

    /// Is `element` inside this layer's root or any nested layer root?
    pub fn is_element_in_layer_tree(&self, element: ElementId) -> bool {
        let doc = &self.node.document;
        if self.root().is_some_and(|root| doc.contains(root, element)) {
            return true;
        }
        self.node
            .children
            .borrow()
            .iter()
            .any(|child| doc.contains(*child, element))
    }
}
