use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use slotmap::SlotMap;

use super::{
    element::{Axis, ElementData, Namespace, ScrollMetrics},
    event::{Event, EventKind},
    style::InlineStyle,
};
use crate::{
    Cleanup, ElementId, ListenerId,
    error::{Error, Result},
};

/// Default viewport width for a fresh document.
const DEFAULT_WIDTH: f64 = 1024.0;
/// Default viewport height for a fresh document.
const DEFAULT_HEIGHT: f64 = 768.0;

/// Listener callback.
pub type Callback = Rc<dyn Fn(&Event)>;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerTarget {
    /// The document itself.
    Document,
    /// A specific element.
    Element(ElementId),
}

/// Window metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Window width including any vertical scrollbar.
    pub inner_width: f64,
    /// Window height including any horizontal scrollbar.
    pub inner_height: f64,
    /// Horizontal window scroll offset.
    pub scroll_x: f64,
    /// Vertical window scroll offset.
    pub scroll_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            inner_width: DEFAULT_WIDTH,
            inner_height: DEFAULT_HEIGHT,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// A registered listener.
struct Listener {
    /// Attachment point.
    target: ListenerTarget,
    /// Event type listened for.
    kind: EventKind,
    /// Capture phase rather than bubble phase.
    capture: bool,
    /// Handler.
    callback: Callback,
    /// Set when the listener is removed, so an in-flight dispatch skips it.
    removed: Rc<Cell<bool>>,
}

/// Arena and listener storage behind a [`Document`].
struct DocumentState {
    /// Element arena.
    elements: SlotMap<ElementId, ElementData>,
    /// The body element; the root of the connected tree.
    body: ElementId,
    /// Window metrics.
    viewport: Viewport,
    /// Listener storage.
    listeners: SlotMap<ListenerId, Listener>,
    /// Document-level listeners in registration order.
    document_listeners: Vec<ListenerId>,
    /// Number of subsystems currently overriding body styles.
    body_holds: usize,
    /// The body carried an empty `style` attribute when the first hold was
    /// taken.
    body_kept_empty: bool,
}

impl DocumentState {
    /// Walk from `el` to the top of its tree, `el` first.
    fn ancestry(&self, el: ElementId) -> Vec<ElementId> {
        let mut path = Vec::new();
        let mut current = Some(el);
        while let Some(id) = current {
            let Some(data) = self.elements.get(id) else {
                break;
            };
            path.push(id);
            current = data.parent;
        }
        path
    }

    /// Is `b` equal to `a` or one of its descendants?
    fn contains(&self, a: ElementId, b: ElementId) -> bool {
        if !self.elements.contains_key(a) {
            return false;
        }
        let mut current = Some(b);
        while let Some(id) = current {
            if id == a {
                return true;
            }
            current = self.elements.get(id).and_then(|d| d.parent);
        }
        false
    }

    /// Unlink `el` from its parent's child list.
    fn unlink(&mut self, el: ElementId) {
        let Some(parent) = self.elements.get_mut(el).and_then(|d| d.parent.take()) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(parent) {
            p.children.retain(|c| *c != el);
        }
    }

    /// Remove a listener by id, flagging it for any in-flight dispatch.
    fn remove_listener(&mut self, id: ListenerId) {
        let Some(listener) = self.listeners.remove(id) else {
            return;
        };
        listener.removed.set(true);
        match listener.target {
            ListenerTarget::Document => self.document_listeners.retain(|l| *l != id),
            ListenerTarget::Element(el) => {
                if let Some(data) = self.elements.get_mut(el) {
                    data.listeners.retain(|l| *l != id);
                }
            }
        }
    }

    /// Snapshot the callbacks of `ids` that match an event kind and phase.
    fn matching(
        &self,
        ids: &[ListenerId],
        kind: EventKind,
        capture: Option<bool>,
    ) -> Vec<(Callback, Rc<Cell<bool>>)> {
        ids.iter()
            .filter_map(|id| self.listeners.get(*id))
            .filter(|l| l.kind == kind && capture.is_none_or(|c| l.capture == c))
            .map(|l| (l.callback.clone(), l.removed.clone()))
            .collect()
    }
}

/// An in-process document: an element tree rooted at `body`, window metrics
/// and event listeners.
///
/// `Document` is a cheap handle; clones share the same tree. No internal
/// borrow is held while listeners run, so listeners may freely mutate the
/// document and register or remove other listeners.
#[derive(Clone)]
pub struct Document {
    /// Shared state.
    state: Rc<RefCell<DocumentState>>,
}

/// A non-owning handle to a [`Document`].
#[derive(Clone)]
pub struct WeakDocument {
    /// Weak shared state.
    state: Weak<RefCell<DocumentState>>,
}

impl WeakDocument {
    /// Recover the document if it is still alive.
    pub fn upgrade(&self) -> Option<Document> {
        self.state.upgrade().map(|state| Document { state })
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("Document")
            .field("elements", &s.elements.len())
            .field("listeners", &s.listeners.len())
            .field("viewport", &s.viewport)
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing only a body element, with no scrollbar.
    pub fn new() -> Self {
        let mut elements = SlotMap::with_key();
        let mut body_data = ElementData::new("body", Namespace::Html);
        body_data.offset_width = DEFAULT_WIDTH;
        let body = elements.insert(body_data);
        Self {
            state: Rc::new(RefCell::new(DocumentState {
                elements,
                body,
                viewport: Viewport::default(),
                listeners: SlotMap::with_key(),
                document_listeners: Vec::new(),
                body_holds: 0,
                body_kept_empty: false,
            })),
        }
    }

    /// Produce a non-owning handle.
    pub fn downgrade(&self) -> WeakDocument {
        WeakDocument {
            state: Rc::downgrade(&self.state),
        }
    }

    /// Do two handles refer to the same document?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// The body element.
    pub fn body(&self) -> ElementId {
        self.state.borrow().body
    }

    /// Create a detached HTML element.
    pub fn create_element(&self, tag: &str) -> ElementId {
        self.create(tag, Namespace::Html)
    }

    /// Create a detached SVG element.
    pub fn create_svg_element(&self, tag: &str) -> ElementId {
        self.create(tag, Namespace::Svg)
    }

    /// Create a detached element in a namespace.
    fn create(&self, tag: &str, namespace: Namespace) -> ElementId {
        self.state
            .borrow_mut()
            .elements
            .insert(ElementData::new(tag, namespace))
    }

    /// Append `child` as the last child of `parent`, moving it if it is
    /// already attached elsewhere.
    pub fn append_child(&self, parent: ElementId, child: ElementId) -> Result<()> {
        let mut s = self.state.borrow_mut();
        if !s.elements.contains_key(parent) {
            return Err(Error::ElementNotFound(parent));
        }
        if !s.elements.contains_key(child) {
            return Err(Error::ElementNotFound(child));
        }
        if child == s.body {
            return Err(Error::Hierarchy("body cannot be re-parented".into()));
        }
        if s.contains(child, parent) {
            return Err(Error::Hierarchy(
                "cannot append an element into its own subtree".into(),
            ));
        }
        s.unlink(child);
        s.elements[child].parent = Some(parent);
        s.elements[parent].children.push(child);
        Ok(())
    }

    /// Detach `el` from its parent. The element and its subtree stay alive
    /// but are no longer connected.
    pub fn detach(&self, el: ElementId) {
        self.state.borrow_mut().unlink(el);
    }

    /// Remove `el` and its subtree from the document, dropping their
    /// listeners. Removing the body is ignored.
    pub fn remove(&self, el: ElementId) {
        let mut s = self.state.borrow_mut();
        if el == s.body || !s.elements.contains_key(el) {
            return;
        }
        s.unlink(el);
        let mut stack = vec![el];
        while let Some(id) = stack.pop() {
            let Some(data) = s.elements.remove(id) else {
                continue;
            };
            stack.extend(data.children);
            for listener in data.listeners {
                if let Some(l) = s.listeners.remove(listener) {
                    l.removed.set(true);
                }
            }
        }
    }

    /// Does the element still exist in the arena?
    pub fn exists(&self, el: ElementId) -> bool {
        self.state.borrow().elements.contains_key(el)
    }

    /// Parent of `el`.
    pub fn parent(&self, el: ElementId) -> Option<ElementId> {
        self.state.borrow().elements.get(el).and_then(|d| d.parent)
    }

    /// Children of `el` in document order.
    pub fn children(&self, el: ElementId) -> Vec<ElementId> {
        self.state
            .borrow()
            .elements
            .get(el)
            .map(|d| d.children.clone())
            .unwrap_or_default()
    }

    /// Tag name of `el`.
    pub fn tag(&self, el: ElementId) -> Option<String> {
        self.state.borrow().elements.get(el).map(|d| d.tag.clone())
    }

    /// Namespace of `el`.
    pub fn namespace(&self, el: ElementId) -> Option<Namespace> {
        self.state.borrow().elements.get(el).map(|d| d.namespace)
    }

    /// Is `b` equal to `a` or one of its descendants? False if `a` is gone.
    pub fn contains(&self, a: ElementId, b: ElementId) -> bool {
        self.state.borrow().contains(a, b)
    }

    /// Is `el` attached to the body?
    pub fn is_connected(&self, el: ElementId) -> bool {
        let s = self.state.borrow();
        s.ancestry(el).last() == Some(&s.body)
    }

    /// Ancestors of `el`, starting with `el` itself.
    pub fn ancestry(&self, el: ElementId) -> Vec<ElementId> {
        self.state.borrow().ancestry(el)
    }

    /// A copy of the element's inline style.
    pub fn style(&self, el: ElementId) -> Option<InlineStyle> {
        self.state.borrow().elements.get(el).map(|d| d.style.clone())
    }

    /// Value of one inline style property.
    pub fn style_property(&self, el: ElementId, name: &str) -> Option<String> {
        self.state
            .borrow()
            .elements
            .get(el)
            .and_then(|d| d.style.get(name).map(str::to_string))
    }

    /// Set one inline style property. An empty value removes it.
    pub fn set_style_property(&self, el: ElementId, name: &str, value: &str) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el) {
            d.style.set(name, value);
        }
    }

    /// Remove one inline style property, returning its old value.
    pub fn remove_style_property(&self, el: ElementId, name: &str) -> Option<String> {
        self.state
            .borrow_mut()
            .elements
            .get_mut(el)
            .and_then(|d| d.style.remove(name))
    }

    /// Replace the `style` attribute with parsed `css_text`.
    pub fn set_style_attribute(&self, el: ElementId, css_text: &str) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el) {
            d.style = InlineStyle::parse(css_text);
        }
    }

    /// Remove the `style` attribute entirely.
    pub fn remove_style_attribute(&self, el: ElementId) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el) {
            d.style.remove_attribute();
        }
    }

    /// Does the element carry a `style` attribute?
    pub fn has_style_attribute(&self, el: ElementId) -> bool {
        self.state
            .borrow()
            .elements
            .get(el)
            .is_some_and(|d| d.style.has_attribute())
    }

    /// Remove the `style` attribute if no declarations remain.
    pub fn prune_style_attribute(&self, el: ElementId) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el)
            && d.style.is_empty()
        {
            d.style.remove_attribute();
        }
    }

    /// Take a hold on the body's inline style before overriding properties.
    ///
    /// The first hold records whether the body carried an empty `style`
    /// attribute, so that the attribute's presence is restored exactly once
    /// every hold is released, whatever order the holders release in.
    pub(crate) fn hold_body_style(&self) {
        let mut s = self.state.borrow_mut();
        if s.body_holds == 0 {
            let body = s.body;
            s.body_kept_empty = s
                .elements
                .get(body)
                .is_some_and(|d| d.style.has_attribute() && d.style.is_empty());
        }
        s.body_holds += 1;
    }

    /// Release a hold taken with [`Document::hold_body_style`]. Releasing the
    /// last hold removes an emptied `style` attribute unless one was present
    /// before the first hold.
    pub(crate) fn release_body_style(&self) {
        let prune = {
            let mut s = self.state.borrow_mut();
            s.body_holds = s.body_holds.saturating_sub(1);
            s.body_holds == 0 && !s.body_kept_empty
        };
        if prune {
            self.prune_style_attribute(self.body());
        }
    }

    /// Layout width of `el`.
    pub fn offset_width(&self, el: ElementId) -> f64 {
        self.state
            .borrow()
            .elements
            .get(el)
            .map_or(0.0, |d| d.offset_width)
    }

    /// Set the layout width of `el`.
    pub fn set_offset_width(&self, el: ElementId, width: f64) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el) {
            d.offset_width = width;
        }
    }

    /// Scroll metrics of `el`.
    pub fn scroll_metrics(&self, el: ElementId) -> Option<ScrollMetrics> {
        self.state.borrow().elements.get(el).map(|d| d.scroll)
    }

    /// Set the scroll metrics of `el`.
    pub fn set_scroll_metrics(&self, el: ElementId, metrics: ScrollMetrics) {
        if let Some(d) = self.state.borrow_mut().elements.get_mut(el) {
            d.scroll = metrics;
        }
    }

    /// Is `el` a scroll container along `axis` with overflowing content?
    pub fn is_scroll_container(&self, el: ElementId, axis: Axis) -> bool {
        self.state
            .borrow()
            .elements
            .get(el)
            .is_some_and(|d| d.is_scroll_container(axis))
    }

    /// Window metrics.
    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    /// Set the window width.
    pub fn set_inner_width(&self, width: f64) {
        self.state.borrow_mut().viewport.inner_width = width;
    }

    /// Scroll the window.
    pub fn scroll_to(&self, x: f64, y: f64) {
        let mut s = self.state.borrow_mut();
        s.viewport.scroll_x = x;
        s.viewport.scroll_y = y;
    }

    /// Register a listener. The returned cleanup removes it.
    ///
    /// Listening on an element that no longer exists registers nothing.
    pub fn add_listener(
        &self,
        target: ListenerTarget,
        kind: EventKind,
        capture: bool,
        callback: impl Fn(&Event) + 'static,
    ) -> Cleanup {
        let id = {
            let mut s = self.state.borrow_mut();
            if let ListenerTarget::Element(el) = target
                && !s.elements.contains_key(el)
            {
                return Cleanup::noop();
            }
            let id = s.listeners.insert(Listener {
                target,
                kind,
                capture,
                callback: Rc::new(callback),
                removed: Rc::new(Cell::new(false)),
            });
            match target {
                ListenerTarget::Document => s.document_listeners.push(id),
                ListenerTarget::Element(el) => s.elements[el].listeners.push(id),
            }
            id
        };
        let weak = self.downgrade();
        Cleanup::new(move || {
            if let Some(doc) = weak.upgrade() {
                doc.state.borrow_mut().remove_listener(id);
            }
        })
    }

    /// Register a document-level listener.
    pub fn add_document_listener(
        &self,
        kind: EventKind,
        capture: bool,
        callback: impl Fn(&Event) + 'static,
    ) -> Cleanup {
        self.add_listener(ListenerTarget::Document, kind, capture, callback)
    }

    /// Register a bubble-phase listener on an element.
    pub fn add_element_listener(
        &self,
        el: ElementId,
        kind: EventKind,
        callback: impl Fn(&Event) + 'static,
    ) -> Cleanup {
        self.add_listener(ListenerTarget::Element(el), kind, false, callback)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    /// Dispatch an event: document capture listeners, element capture
    /// listeners from the top down, target listeners, element bubble listeners
    /// from the bottom up, then document bubble listeners.
    ///
    /// Returns false if a listener prevented the default action.
    pub fn dispatch(&self, event: &Event) -> bool {
        let kind = event.kind();
        let path = event
            .target()
            .map(|t| self.ancestry(t))
            .unwrap_or_default();

        let doc_capture = {
            let s = self.state.borrow();
            s.matching(&s.document_listeners, kind, Some(true))
        };
        if !Self::invoke(&doc_capture, event) {
            return !event.default_prevented();
        }

        for (i, el) in path.iter().enumerate().rev() {
            let phase = if i == 0 { None } else { Some(true) };
            if !self.invoke_on(*el, kind, phase, event) {
                return !event.default_prevented();
            }
        }
        for el in path.iter().skip(1) {
            if !self.invoke_on(*el, kind, Some(false), event) {
                return !event.default_prevented();
            }
        }

        let doc_bubble = {
            let s = self.state.borrow();
            s.matching(&s.document_listeners, kind, Some(false))
        };
        Self::invoke(&doc_bubble, event);
        !event.default_prevented()
    }

    /// Invoke the listeners on one element. Returns false if propagation
    /// stopped.
    fn invoke_on(
        &self,
        el: ElementId,
        kind: EventKind,
        capture: Option<bool>,
        event: &Event,
    ) -> bool {
        let listeners = {
            let s = self.state.borrow();
            match s.elements.get(el) {
                Some(d) => s.matching(&d.listeners, kind, capture),
                None => Vec::new(),
            }
        };
        Self::invoke(&listeners, event)
    }

    /// Invoke a snapshot of listeners, skipping any removed mid-dispatch.
    /// Returns false if propagation stopped.
    fn invoke(listeners: &[(Callback, Rc<Cell<bool>>)], event: &Event) -> bool {
        for (callback, removed) in listeners {
            if !removed.get() {
                callback(event);
            }
        }
        !event.propagation_stopped()
    }
}
