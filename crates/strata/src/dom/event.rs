//! Events dispatched through a [`Document`](super::Document).

use std::cell::Cell;

use crate::ElementId;

/// Event types the coordination layer listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `pointerdown`
    PointerDown,
    /// `pointerup`
    PointerUp,
    /// `focusin`
    FocusIn,
    /// `focusout`
    FocusOut,
    /// `keydown`
    KeyDown,
    /// `wheel`
    Wheel,
    /// `touchstart`
    TouchStart,
    /// `touchmove`
    TouchMove,
}

/// Pointer button, numbered as the `button` field of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Main button, usually the left button or a touch contact.
    Primary,
    /// Auxiliary button, usually the wheel button.
    Auxiliary,
    /// Secondary button, usually the right button.
    Secondary,
    /// Browser back button.
    Back,
    /// Browser forward button.
    Forward,
}

impl Button {
    /// The numeric `button` value.
    pub fn code(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Auxiliary => 1,
            Self::Secondary => 2,
            Self::Back => 3,
            Self::Forward => 4,
        }
    }
}

/// Unit of wheel deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeltaMode {
    /// Deltas are pixels.
    #[default]
    Pixel,
    /// Deltas are lines.
    Line,
    /// Deltas are pages.
    Page,
}

/// One touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    /// Client x coordinate.
    pub x: f64,
    /// Client y coordinate.
    pub y: f64,
}

impl TouchPoint {
    /// Construct a touch point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Type-specific event payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    /// Pointer press or release.
    Pointer {
        /// Button that changed state.
        button: Button,
    },
    /// Focus moving into or out of the target.
    Focus {
        /// The element on the other side of the focus move.
        related_target: Option<ElementId>,
    },
    /// Key press.
    Key {
        /// Key value, e.g. `"Escape"`.
        key: String,
    },
    /// Wheel rotation.
    Wheel {
        /// Horizontal delta.
        delta_x: f64,
        /// Vertical delta.
        delta_y: f64,
        /// Delta unit.
        mode: DeltaMode,
        /// Control key held; trackpad pinch gestures arrive this way.
        ctrl_key: bool,
    },
    /// Touch contact change.
    Touch {
        /// Active touch contacts.
        touches: Vec<TouchPoint>,
    },
}

/// A dispatched event.
#[derive(Debug)]
pub struct Event {
    /// Event type.
    kind: EventKind,
    /// Dispatch target; `None` dispatches to document listeners only.
    target: Option<ElementId>,
    /// Type-specific payload.
    detail: Detail,
    /// Can the default action be prevented?
    cancelable: bool,
    /// Has a listener prevented the default action?
    default_prevented: Cell<bool>,
    /// Has a listener stopped propagation?
    propagation_stopped: Cell<bool>,
}

impl Event {
    /// Construct an event.
    pub fn new(kind: EventKind, target: Option<ElementId>, detail: Detail) -> Self {
        let cancelable = !matches!(kind, EventKind::FocusIn | EventKind::FocusOut);
        Self {
            kind,
            target,
            detail,
            cancelable,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    /// A `pointerdown` on `target`.
    pub fn pointer_down(target: ElementId, button: Button) -> Self {
        Self::new(
            EventKind::PointerDown,
            Some(target),
            Detail::Pointer { button },
        )
    }

    /// A `pointerup` on `target`.
    pub fn pointer_up(target: ElementId, button: Button) -> Self {
        Self::new(
            EventKind::PointerUp,
            Some(target),
            Detail::Pointer { button },
        )
    }

    /// A `keydown` with the given key value.
    pub fn key_down(target: Option<ElementId>, key: &str) -> Self {
        Self::new(
            EventKind::KeyDown,
            target,
            Detail::Key {
                key: key.to_string(),
            },
        )
    }

    /// A `focusout` from `target` towards `related_target`.
    pub fn focus_out(target: ElementId, related_target: Option<ElementId>) -> Self {
        Self::new(
            EventKind::FocusOut,
            Some(target),
            Detail::Focus { related_target },
        )
    }

    /// A `focusin` on `target` from `related_target`.
    pub fn focus_in(target: ElementId, related_target: Option<ElementId>) -> Self {
        Self::new(
            EventKind::FocusIn,
            Some(target),
            Detail::Focus { related_target },
        )
    }

    /// A pixel-mode `wheel` over `target`.
    pub fn wheel(target: ElementId, delta_x: f64, delta_y: f64) -> Self {
        Self::new(
            EventKind::Wheel,
            Some(target),
            Detail::Wheel {
                delta_x,
                delta_y,
                mode: DeltaMode::Pixel,
                ctrl_key: false,
            },
        )
    }

    /// A `touchstart` on `target`.
    pub fn touch_start(target: ElementId, touches: Vec<TouchPoint>) -> Self {
        Self::new(EventKind::TouchStart, Some(target), Detail::Touch { touches })
    }

    /// A `touchmove` on `target`.
    pub fn touch_move(target: ElementId, touches: Vec<TouchPoint>) -> Self {
        Self::new(EventKind::TouchMove, Some(target), Detail::Touch { touches })
    }

    /// Event type.
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Dispatch target.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    /// Type-specific payload.
    pub fn detail(&self) -> &Detail {
        &self.detail
    }

    /// Pointer button, for pointer events.
    pub fn button(&self) -> Option<Button> {
        match self.detail {
            Detail::Pointer { button } => Some(button),
            _ => None,
        }
    }

    /// Related target, for focus events.
    pub fn related_target(&self) -> Option<ElementId> {
        match self.detail {
            Detail::Focus { related_target } => related_target,
            _ => None,
        }
    }

    /// Key value, for key events.
    pub fn key(&self) -> Option<&str> {
        match &self.detail {
            Detail::Key { key } => Some(key),
            _ => None,
        }
    }

    /// Touch contacts, for touch events.
    pub fn touches(&self) -> &[TouchPoint] {
        match &self.detail {
            Detail::Touch { touches } => touches,
            _ => &[],
        }
    }

    /// Can the default action be prevented?
    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Mark the event as non-cancelable.
    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Prevent the default action. Ignored for non-cancelable events.
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    /// Has the default action been prevented?
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop the event from reaching further targets.
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    /// Has propagation been stopped?
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}
