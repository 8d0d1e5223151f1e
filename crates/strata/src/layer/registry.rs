use std::{cell::RefCell, rc::Rc};

use tracing::{debug, warn};

use crate::{
    Cleanup, ElementId,
    dom::Document,
    error::{Error, Result},
};

/// Body style property gated by modal layers.
const POINTER_EVENTS: &str = "pointer-events";

/// The `pointer-events` value a layer root should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEvents {
    /// Re-enable interaction for this subtree.
    Auto,
    /// Block interaction for this subtree.
    None,
}

impl PointerEvents {
    /// The CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::None => "none",
        }
    }
}

/// The body's `pointer-events` before the first modal layer opened.
#[derive(Debug, Clone)]
struct PointerEventsSnapshot {
    /// Previous inline value, if any.
    value: Option<String>,
}

/// Ordered stacks of open layers.
#[derive(Debug, Default)]
struct LayerStack {
    /// Every open layer root, oldest first.
    visible: Vec<ElementId>,
    /// Open modal layer roots, oldest first. Always a subsequence of
    /// `visible`.
    modal: Vec<ElementId>,
    /// Body pointer-events captured when `modal` became non-empty.
    snapshot: Option<PointerEventsSnapshot>,
    /// Roots currently listening for Escape.
    escape: Vec<ElementId>,
}

impl LayerStack {
    /// Position of `root` in the visible stack.
    fn index_of(&self, root: ElementId) -> Option<usize> {
        self.visible.iter().position(|r| *r == root)
    }
}

/// The global registry of open layers.
///
/// Position in the visible stack stands in for stacking order: layers are
/// appended when they open and removed when they close, so the last entry is
/// the most recently opened layer. The registry also gates body pointer events
/// while any modal layer is open.
#[derive(Clone)]
pub struct LayerRegistry {
    /// Document whose body is gated.
    document: Document,
    /// Shared stacks.
    state: Rc<RefCell<LayerStack>>,
}

impl LayerRegistry {
    /// Construct an empty registry for `document`.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            state: Rc::new(RefCell::new(LayerStack::default())),
        }
    }

    /// Register an open layer. The returned cleanup unregisters it.
    ///
    /// Registering a root that no longer exists is a no-op. Registering a root
    /// that is already visible is an error: stacking order is derived from
    /// positions in the visible stack, which requires each root to appear once.
    pub fn register(&self, root: ElementId, modal: bool) -> Result<Cleanup> {
        if !self.document.exists(root) {
            return Ok(Cleanup::noop());
        }
        let first_modal = {
            let mut s = self.state.borrow_mut();
            if s.index_of(root).is_some() {
                warn!(?root, "rejecting duplicate layer registration");
                return Err(Error::DuplicateLayer(root));
            }
            s.visible.push(root);
            if modal {
                s.modal.push(root);
            }
            debug!(?root, modal, depth = s.visible.len(), "layer registered");
            modal && s.modal.len() == 1
        };
        if first_modal {
            self.block_body();
        }
        let state = Rc::downgrade(&self.state);
        let document = self.document.downgrade();
        Ok(Cleanup::new(move || {
            if let (Some(state), Some(document)) = (state.upgrade(), document.upgrade()) {
                Self { document, state }.unregister(root);
            }
        }))
    }

    /// Remove `root` from both stacks. Removing an absent root is a no-op.
    pub fn unregister(&self, root: ElementId) {
        let restore = {
            let mut s = self.state.borrow_mut();
            let Some(idx) = s.index_of(root) else {
                return;
            };
            s.visible.remove(idx);
            let was_modal = match s.modal.iter().position(|r| *r == root) {
                Some(i) => {
                    s.modal.remove(i);
                    true
                }
                None => false,
            };
            debug!(?root, depth = s.visible.len(), "layer unregistered");
            if was_modal && s.modal.is_empty() {
                s.snapshot.take()
            } else {
                None
            }
        };
        if let Some(snapshot) = restore {
            self.restore_body(snapshot);
        }
    }

    /// Snapshot the body's pointer-events and block interaction.
    fn block_body(&self) {
        let body = self.document.body();
        let value = self.document.style_property(body, POINTER_EVENTS);
        self.state.borrow_mut().snapshot = Some(PointerEventsSnapshot { value });
        self.document.hold_body_style();
        self.document
            .set_style_property(body, POINTER_EVENTS, PointerEvents::None.as_str());
        debug!("body pointer events disabled");
    }

    /// Restore the body's pointer-events from a snapshot.
    fn restore_body(&self, snapshot: PointerEventsSnapshot) {
        let body = self.document.body();
        match snapshot.value {
            Some(v) => self.document.set_style_property(body, POINTER_EVENTS, &v),
            None => {
                self.document.remove_style_property(body, POINTER_EVENTS);
            }
        }
        self.document.release_body_style();
        debug!("body pointer events restored");
    }

    /// Open layer roots, oldest first.
    pub fn visible_layers(&self) -> Vec<ElementId> {
        self.state.borrow().visible.clone()
    }

    /// Open modal layer roots, oldest first.
    pub fn visible_modal_layers(&self) -> Vec<ElementId> {
        self.state.borrow().modal.clone()
    }

    /// Number of open layers.
    pub fn len(&self) -> usize {
        self.state.borrow().visible.len()
    }

    /// Are no layers open?
    pub fn is_empty(&self) -> bool {
        self.state.borrow().visible.is_empty()
    }

    /// Is `root` registered?
    pub fn contains(&self, root: ElementId) -> bool {
        self.state.borrow().index_of(root).is_some()
    }

    /// The most recently opened layer.
    pub fn top_most_layer(&self) -> Option<ElementId> {
        self.state.borrow().visible.last().copied()
    }

    /// The most recently opened modal layer.
    pub fn top_most_modal_layer(&self) -> Option<ElementId> {
        self.state.borrow().modal.last().copied()
    }

    /// Is `root` the most recently opened layer?
    pub fn is_top_most_layer(&self, root: ElementId) -> bool {
        self.top_most_layer() == Some(root)
    }

    /// Record whether `root` currently closes on Escape. Each enable is
    /// matched by one disable.
    pub fn set_escape_handler(&self, root: ElementId, handles: bool) {
        let mut s = self.state.borrow_mut();
        if handles {
            s.escape.push(root);
        } else if let Some(i) = s.escape.iter().position(|r| *r == root) {
            s.escape.remove(i);
        }
    }

    /// Does the topmost layer close on Escape?
    pub fn top_most_handles_escape(&self) -> bool {
        let s = self.state.borrow();
        s.visible.last().is_some_and(|top| s.escape.contains(top))
    }

    /// Is interaction with the body blocked by an open modal layer?
    pub fn is_body_pointer_events_disabled(&self) -> bool {
        !self.state.borrow().modal.is_empty()
    }

    /// May `root` receive pointer events?
    ///
    /// True for every layer at or above the topmost modal layer. With no modal
    /// layer open nothing is blocked, so this is true for any root.
    pub fn is_pointer_events_enabled(&self, root: ElementId) -> bool {
        let s = self.state.borrow();
        let Some(top_modal) = s.modal.last() else {
            return true;
        };
        match (s.index_of(root), s.index_of(*top_modal)) {
            (Some(own), Some(blocking)) => own >= blocking,
            _ => false,
        }
    }

    /// Is `root` open beneath the topmost modal layer?
    pub fn is_below_pointer_blocking_layer(&self, root: ElementId) -> bool {
        self.contains(root) && !self.is_pointer_events_enabled(root)
    }

    /// The pointer-events override `root` should apply, if any.
    pub fn pointer_events_for(&self, root: ElementId) -> Option<PointerEvents> {
        if !self.is_body_pointer_events_disabled() || !self.contains(root) {
            return None;
        }
        Some(if self.is_pointer_events_enabled(root) {
            PointerEvents::Auto
        } else {
            PointerEvents::None
        })
    }
}
