//! Escape-key arbitration between stacked layers.
//!
//! Every open layer that closes on Escape holds its own document `keydown`
//! listener. Only the topmost layer consumes the key: it prevents the default
//! action and closes. Every other layer ignores the event and leaves it
//! untouched, and a listener that sees an already-consumed event does nothing,
//! so one Escape press closes exactly one layer. A layer that bypasses the
//! topmost check still yields while the topmost layer closes on Escape.

use std::{
    cell::{Cell, RefCell},
    mem,
    rc::Rc,
};

use tracing::{debug, trace};

use crate::{
    Cleanup, ElementId,
    dom::{Document, Event, EventKind},
    layer::LayerRegistry,
};

/// Key value that dismisses layers.
pub const ESCAPE: &str = "Escape";

/// Shared listener state.
struct EscapeState {
    /// Registry used to find the topmost layer.
    layers: LayerRegistry,
    /// Root of the layer this listener belongs to.
    root: Cell<Option<ElementId>>,
    /// Handle Escape even when the layer is not topmost.
    bypass_top_most: Cell<bool>,
    /// Called first; may prevent default to keep the layer open.
    on_key_down: Option<Rc<dyn Fn(&Event)>>,
    /// Closes the layer.
    on_escape: Box<dyn Fn()>,
    /// Root recorded as an Escape handler in the registry while active.
    handler: Cell<Option<ElementId>>,
    /// Held document listener.
    listener: RefCell<Cleanup>,
}

impl EscapeState {
    /// Handle a document `keydown`.
    fn key_down(&self, event: &Event) {
        if event.key() != Some(ESCAPE) || event.default_prevented() {
            return;
        }
        let Some(root) = self.root.get() else {
            return;
        };
        if !self.layers.is_top_most_layer(root)
            && (!self.bypass_top_most.get() || self.layers.top_most_handles_escape())
        {
            trace!(?root, "escape ignored by non-topmost layer");
            return;
        }
        if let Some(hook) = &self.on_key_down {
            hook(event);
            if event.default_prevented() {
                debug!(?root, "escape dismissal cancelled");
                return;
            }
        }
        event.prevent_default();
        debug!(?root, "escape consumed");
        (self.on_escape)();
    }
}

/// One layer's Escape-key subscription.
pub struct EscapeKey {
    /// Document listened on.
    document: Document,
    /// Shared state.
    state: Rc<EscapeState>,
}

impl EscapeKey {
    /// Construct an inactive subscription.
    pub fn new(
        document: Document,
        layers: LayerRegistry,
        on_key_down: Option<Rc<dyn Fn(&Event)>>,
        on_escape: impl Fn() + 'static,
    ) -> Self {
        Self {
            document,
            state: Rc::new(EscapeState {
                layers,
                root: Cell::new(None),
                bypass_top_most: Cell::new(false),
                on_key_down,
                on_escape: Box::new(on_escape),
                handler: Cell::new(None),
                listener: RefCell::new(Cleanup::noop()),
            }),
        }
    }

    /// Set the root of the owning layer.
    pub fn set_root(&self, root: Option<ElementId>) {
        self.state.root.set(root);
    }

    /// Handle Escape regardless of stacking position.
    pub fn set_bypass_top_most(&self, bypass: bool) {
        self.state.bypass_top_most.set(bypass);
    }

    /// Is the listener registered?
    pub fn is_active(&self) -> bool {
        self.state.listener.borrow().is_armed()
    }

    /// Register or remove the listener. Callers pass
    /// `is_open && close_on_esc`.
    pub fn set_active(&self, active: bool) {
        if active == self.is_active() {
            return;
        }
        if active {
            let state = Rc::downgrade(&self.state);
            let cleanup = self
                .document
                .add_document_listener(EventKind::KeyDown, false, move |e| {
                    if let Some(state) = state.upgrade() {
                        state.key_down(e);
                    }
                });
            *self.state.listener.borrow_mut() = cleanup;
            let root = self.state.root.get();
            if let Some(root) = root {
                self.state.layers.set_escape_handler(root, true);
            }
            self.state.handler.set(root);
        } else {
            let mut listener = mem::take(&mut *self.state.listener.borrow_mut());
            listener.release();
            if let Some(root) = self.state.handler.take() {
                self.state.layers.set_escape_handler(root, false);
            }
        }
    }
}

impl Drop for EscapeKey {
    fn drop(&mut self) {
        self.set_active(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    struct Entry {
        root: ElementId,
        closes: Rc<Cell<usize>>,
        _registration: Cleanup,
        key: EscapeKey,
    }

    fn open(doc: &Document, layers: &LayerRegistry) -> Result<Entry> {
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root)?;
        let registration = layers.register(root, false)?;
        let closes = Rc::new(Cell::new(0));
        let c = closes.clone();
        let key = EscapeKey::new(doc.clone(), layers.clone(), None, move || c.set(c.get() + 1));
        key.set_root(Some(root));
        key.set_active(true);
        Ok(Entry {
            root,
            closes,
            _registration: registration,
            key,
        })
    }

    #[test]
    fn only_topmost_consumes() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let a = open(&doc, &layers)?;
        let b = open(&doc, &layers)?;

        let allowed = doc.dispatch(&Event::key_down(None, ESCAPE));
        assert!(!allowed);
        assert_eq!(a.closes.get(), 0);
        assert_eq!(b.closes.get(), 1);

        let b_root = b.root;
        drop(b);
        assert!(!layers.contains(b_root));
        doc.dispatch(&Event::key_down(None, ESCAPE));
        assert_eq!(a.closes.get(), 1);
        Ok(())
    }

    #[test]
    fn other_keys_pass_through() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let a = open(&doc, &layers)?;
        assert!(doc.dispatch(&Event::key_down(None, "Enter")));
        assert_eq!(a.closes.get(), 0);
        Ok(())
    }

    #[test]
    fn bypass_handles_when_not_topmost() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let a = open(&doc, &layers)?;
        let b = open(&doc, &layers)?;
        b.key.set_active(false);
        a.key.set_bypass_top_most(true);
        doc.dispatch(&Event::key_down(None, ESCAPE));
        assert_eq!(a.closes.get(), 1);
        assert_eq!(b.closes.get(), 0);
        Ok(())
    }

    #[test]
    fn bypass_yields_to_topmost_handler() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let a = open(&doc, &layers)?;
        let b = open(&doc, &layers)?;
        a.key.set_bypass_top_most(true);
        assert!(layers.top_most_handles_escape());

        doc.dispatch(&Event::key_down(None, ESCAPE));
        assert_eq!(a.closes.get(), 0);
        assert_eq!(b.closes.get(), 1);

        drop(b);
        doc.dispatch(&Event::key_down(None, ESCAPE));
        assert_eq!(a.closes.get(), 1);
        Ok(())
    }

    #[test]
    fn hook_can_cancel() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let root = doc.create_element("div");
        doc.append_child(doc.body(), root)?;
        let _r = layers.register(root, false)?;
        let closes = Rc::new(Cell::new(0));
        let c = closes.clone();
        let key = EscapeKey::new(
            doc.clone(),
            layers.clone(),
            Some(Rc::new(|e: &Event| e.prevent_default())),
            move || c.set(c.get() + 1),
        );
        key.set_root(Some(root));
        key.set_active(true);
        doc.dispatch(&Event::key_down(None, ESCAPE));
        assert_eq!(closes.get(), 0);
        Ok(())
    }

    #[test]
    fn inactive_has_no_listener() -> Result<()> {
        let doc = Document::new();
        let layers = LayerRegistry::new(doc.clone());
        let a = open(&doc, &layers)?;
        assert_eq!(doc.listener_count(), 1);
        a.key.set_active(false);
        assert_eq!(doc.listener_count(), 0);
        Ok(())
    }
}
