//! Reference-counted background scroll locking.
//!
//! Any number of consumers can request a lock at once. The body styles are
//! applied when the first request arrives and reverted when the last one
//! leaves; requests in between only change which request is active. The
//! active request (the most recent) decides how wheel and touch gestures are
//! intercepted.

mod body_style;
pub mod intercept;

use std::{
    cell::{Cell, RefCell},
    fmt, mem,
    rc::{Rc, Weak},
};

use slotmap::SlotMap;
use tracing::{debug, trace};

use self::{
    body_style::BodyStyle,
    intercept::{Gesture, is_pinch, should_cancel},
};
use crate::{
    Cleanup, Config, ElementId, LockId,
    dom::{Document, Event, EventKind, TouchPoint, WeakDocument},
};

/// Options for one scroll-lock request. Unset options take the service
/// configuration's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollLockOptions {
    /// Restore the window scroll position when the last lock is released.
    pub scroll_back: Option<bool>,
    /// Element whose contents may still scroll.
    pub permit: Option<ElementId>,
    /// Let pinch-zoom gestures through.
    pub allow_pinch_zoom: Option<bool>,
}

impl ScrollLockOptions {
    /// Set `scroll_back`.
    pub fn scroll_back(mut self, scroll_back: bool) -> Self {
        self.scroll_back = Some(scroll_back);
        self
    }

    /// Set the permitted element.
    pub fn permit(mut self, permit: ElementId) -> Self {
        self.permit = Some(permit);
        self
    }

    /// Set `allow_pinch_zoom`.
    pub fn allow_pinch_zoom(mut self, allow: bool) -> Self {
        self.allow_pinch_zoom = Some(allow);
        self
    }
}

/// A request with defaults resolved.
#[derive(Debug, Clone, Copy)]
struct Request {
    /// Element whose contents may still scroll.
    permit: Option<ElementId>,
    /// Let pinch-zoom gestures through.
    allow_pinch_zoom: bool,
    /// Restore the window scroll position on unlock.
    scroll_back: bool,
}

/// The lock stack.
#[derive(Default)]
struct LockState {
    /// Requests by id.
    requests: SlotMap<LockId, Request>,
    /// Held request ids, oldest first.
    order: Vec<LockId>,
    /// Body snapshot while locked.
    body: Option<BodyStyle>,
    /// Last touch point seen, for computing touch deltas.
    last_touch: Option<TouchPoint>,
    /// Interception listeners while locked.
    listeners: Cleanup,
}

impl LockState {
    /// The active request.
    fn active(&self) -> Option<Request> {
        self.order
            .last()
            .and_then(|id| self.requests.get(*id))
            .copied()
    }
}

/// The global scroll-lock stack for one document.
#[derive(Clone)]
pub struct ScrollLocks {
    /// Locked document.
    document: Document,
    /// Service configuration.
    config: Rc<Config>,
    /// Shared stack.
    state: Rc<RefCell<LockState>>,
}

impl fmt::Debug for ScrollLocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("ScrollLocks")
            .field("order", &s.order)
            .field("locked", &s.body.is_some())
            .finish()
    }
}

impl ScrollLocks {
    /// An empty stack for `document`.
    pub fn new(document: Document, config: Rc<Config>) -> Self {
        Self {
            document,
            config,
            state: Rc::new(RefCell::new(LockState::default())),
        }
    }

    /// Number of held requests.
    pub fn len(&self) -> usize {
        self.state.borrow().order.len()
    }

    /// Are no requests held?
    pub fn is_empty(&self) -> bool {
        self.state.borrow().order.is_empty()
    }

    /// Are the body lock styles applied?
    pub fn is_locked(&self) -> bool {
        self.state.borrow().body.is_some()
    }

    /// Held request ids, oldest first.
    pub fn stack(&self) -> Vec<LockId> {
        self.state.borrow().order.clone()
    }

    /// The request that currently intercepts gestures.
    pub fn active(&self) -> Option<LockId> {
        self.state.borrow().order.last().copied()
    }

    /// Create a request. It is pushed onto the stack immediately if `enabled`
    /// and stays there until disabled or dropped.
    pub fn request(&self, enabled: bool, options: ScrollLockOptions) -> ScrollLock {
        let lock = ScrollLock {
            locks: self.clone(),
            request: Request {
                permit: options.permit,
                allow_pinch_zoom: options
                    .allow_pinch_zoom
                    .unwrap_or(self.config.allow_pinch_zoom),
                scroll_back: options
                    .scroll_back
                    .unwrap_or(self.config.restore_scroll_position),
            },
            id: Cell::new(None),
        };
        lock.set_enabled(enabled);
        lock
    }

    /// Push a request, locking the body on the first one.
    fn push(&self, request: Request) -> LockId {
        let (id, first) = {
            let mut s = self.state.borrow_mut();
            let id = s.requests.insert(request);
            s.order.push(id);
            debug!(?id, depth = s.order.len(), "scroll lock acquired");
            (id, s.order.len() == 1)
        };
        if first {
            let body = BodyStyle::lock(&self.document, &self.config, request.scroll_back);
            let listeners = self.intercept();
            let mut s = self.state.borrow_mut();
            s.body = Some(body);
            s.listeners = listeners;
        }
        id
    }

    /// Remove a request, unlocking the body when the stack empties. Removing
    /// an absent request is a no-op.
    fn pop(&self, id: LockId) {
        let released = {
            let mut s = self.state.borrow_mut();
            let Some(idx) = s.order.iter().position(|r| *r == id) else {
                return;
            };
            s.order.remove(idx);
            s.requests.remove(id);
            debug!(?id, depth = s.order.len(), "scroll lock released");
            if s.order.is_empty() {
                s.last_touch = None;
                Some((s.body.take(), mem::take(&mut s.listeners)))
            } else {
                None
            }
        };
        if let Some((body, mut listeners)) = released {
            listeners.release();
            if let Some(body) = body {
                body.restore(&self.document);
            }
        }
    }

    /// Register the gesture listeners for the active request.
    fn intercept(&self) -> Cleanup {
        let listen = |kind: EventKind| {
            let state = Rc::downgrade(&self.state);
            let document = self.document.downgrade();
            self.document.add_document_listener(kind, true, move |e| {
                intercept_gesture(&state, &document, e);
            })
        };
        listen(EventKind::Wheel)
            .and(listen(EventKind::TouchStart))
            .and(listen(EventKind::TouchMove))
    }
}

/// Cancel a wheel or touch gesture the active request does not permit.
fn intercept_gesture(state: &Weak<RefCell<LockState>>, document: &WeakDocument, event: &Event) {
    let (Some(state), Some(document)) = (state.upgrade(), document.upgrade()) else {
        return;
    };
    let gesture = match event.kind() {
        EventKind::Wheel => {
            Gesture::from_wheel(event.detail(), document.viewport().inner_height)
        }
        EventKind::TouchStart | EventKind::TouchMove => {
            let Some(point) = event.touches().first().copied() else {
                return;
            };
            let last = state.borrow_mut().last_touch.replace(point);
            if event.kind() == EventKind::TouchStart {
                return;
            }
            last.map(|last| Gesture::from_touch(last, point))
        }
        _ => None,
    };
    let Some(request) = state.borrow().active() else {
        return;
    };
    if is_pinch(event.detail()) {
        if request.allow_pinch_zoom {
            trace!("pinch zoom passed through scroll lock");
        } else {
            trace!("pinch zoom cancelled by scroll lock");
            event.prevent_default();
        }
        return;
    }
    let Some(gesture) = gesture else {
        return;
    };
    let Some(target) = event.target() else {
        return;
    };
    if should_cancel(&document, target, request.permit, gesture) {
        trace!(?target, ?gesture, "scroll gesture cancelled");
        event.prevent_default();
    }
}

/// One consumer's scroll-lock request.
///
/// The request holds its place on the stack while enabled. Dropping it
/// releases it.
pub struct ScrollLock {
    /// Owning stack.
    locks: ScrollLocks,
    /// Resolved options.
    request: Request,
    /// Stack id while held.
    id: Cell<Option<LockId>>,
}

impl fmt::Debug for ScrollLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLock")
            .field("id", &self.id.get())
            .field("permit", &self.request.permit)
            .finish()
    }
}

impl ScrollLock {
    /// Stack id while held.
    pub fn id(&self) -> Option<LockId> {
        self.id.get()
    }

    /// Is the request on the stack?
    pub fn is_held(&self) -> bool {
        self.id.get().is_some()
    }

    /// Is this the request that intercepts gestures?
    pub fn is_active(&self) -> bool {
        self.is_held() && self.locks.active() == self.id.get()
    }

    /// Hold or release the lock.
    pub fn set_enabled(&self, enabled: bool) {
        match (enabled, self.id.get()) {
            (true, None) => self.id.set(Some(self.locks.push(self.request))),
            (false, Some(id)) => {
                self.id.set(None);
                self.locks.pop(id);
            }
            _ => {}
        }
    }

    /// Move the request into a cleanup that releases it.
    pub fn into_cleanup(self) -> Cleanup {
        Cleanup::new(move || self.set_enabled(false))
    }
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.set_enabled(false);
    }
}
