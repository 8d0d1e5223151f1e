//! Outside pointer interaction detection.
//!
//! An [`InteractOutside`] watches pointer presses and releases anywhere in the
//! document and reports the ones that land outside a root element. Detection
//! has two phases: a press outside calls `on_interact_outside_start`
//! immediately, and a release outside following an outside press calls
//! `on_interact_outside`. Consumers dismiss on whichever phase suits them.

use std::{
    cell::{Cell, RefCell},
    mem,
    rc::{Rc, Weak},
};

use tracing::trace;

use crate::{
    Cleanup, ElementId,
    dom::{Button, Document, Event, EventKind},
};

/// Outside interaction callback.
pub type Handler = Box<dyn Fn(&Event)>;

/// Classify a pointer event as outside `root`.
///
/// An event is outside when it comes from the primary button, its target is
/// still connected, and `root` does not contain the target. With no root (for
/// instance during teardown) nothing is outside.
pub fn is_event_outside(document: &Document, root: Option<ElementId>, event: &Event) -> bool {
    if event.button().is_some_and(|b| b != Button::Primary) {
        trace!(button = ?event.button(), "ignoring non-primary pointer event");
        return false;
    }
    let Some(target) = event.target() else {
        return false;
    };
    if !document.is_connected(target) {
        trace!(?target, "ignoring event on disconnected target");
        return false;
    }
    match root {
        Some(root) => !document.contains(root, target),
        None => false,
    }
}

/// Shared detector state.
struct DetectorState {
    /// Watched document.
    document: Document,
    /// Root the detector reports relative to.
    root: Cell<Option<ElementId>>,
    /// An outside press is waiting for its release.
    pending: Cell<bool>,
    /// Listener registration is suppressed.
    disabled: Cell<bool>,
    /// Called on an outside press.
    on_start: Handler,
    /// Called on an outside release after an outside press.
    on_outside: Handler,
    /// Held document listeners.
    listeners: RefCell<Cleanup>,
}

impl DetectorState {
    /// Handle a capture-phase `pointerdown`.
    fn pointer_down(&self, event: &Event) {
        if is_event_outside(&self.document, self.root.get(), event) {
            self.pending.set(true);
            (self.on_start)(event);
        } else {
            self.pending.set(false);
        }
    }

    /// Handle a capture-phase `pointerup`.
    fn pointer_up(&self, event: &Event) {
        let pending = self.pending.replace(false);
        if pending && is_event_outside(&self.document, self.root.get(), event) {
            (self.on_outside)(event);
        }
    }
}

/// Detects pointer interaction outside a root element.
pub struct InteractOutside {
    /// Shared state; listeners hold weak references.
    state: Rc<DetectorState>,
}

impl InteractOutside {
    /// Construct a detector. It starts disabled and without a root.
    pub fn new(
        document: Document,
        on_interact_outside_start: impl Fn(&Event) + 'static,
        on_interact_outside: impl Fn(&Event) + 'static,
    ) -> Self {
        Self {
            state: Rc::new(DetectorState {
                document,
                root: Cell::new(None),
                pending: Cell::new(false),
                disabled: Cell::new(true),
                on_start: Box::new(on_interact_outside_start),
                on_outside: Box::new(on_interact_outside),
                listeners: RefCell::new(Cleanup::noop()),
            }),
        }
    }

    /// Set the root interactions are classified against.
    pub fn set_root(&self, root: Option<ElementId>) {
        self.state.root.set(root);
    }

    /// The current root.
    pub fn root(&self) -> Option<ElementId> {
        self.state.root.get()
    }

    /// Is the detector disabled?
    pub fn is_disabled(&self) -> bool {
        self.state.disabled.get()
    }

    /// Enable or disable the detector. Disabling removes its document
    /// listeners entirely.
    pub fn set_disabled(&self, disabled: bool) {
        if self.state.disabled.replace(disabled) == disabled {
            return;
        }
        if disabled {
            self.state.pending.set(false);
            let mut listeners = mem::take(&mut *self.state.listeners.borrow_mut());
            listeners.release();
        } else {
            let cleanup = self.listen();
            *self.state.listeners.borrow_mut() = cleanup;
        }
    }

    /// Register the capture-phase document listeners.
    fn listen(&self) -> Cleanup {
        let doc = &self.state.document;
        let on_down: Weak<DetectorState> = Rc::downgrade(&self.state);
        let on_up = on_down.clone();
        let down = doc.add_document_listener(EventKind::PointerDown, true, move |e| {
            if let Some(state) = on_down.upgrade() {
                state.pointer_down(e);
            }
        });
        let up = doc.add_document_listener(EventKind::PointerUp, true, move |e| {
            if let Some(state) = on_up.upgrade() {
                state.pointer_up(e);
            }
        });
        down.and(up)
    }
}

impl Drop for InteractOutside {
    fn drop(&mut self) {
        self.set_disabled(true);
    }
}
