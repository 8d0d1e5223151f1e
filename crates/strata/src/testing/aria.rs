use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use crate::{Cleanup, ElementId, aria::AriaHider, dom::Document};

/// An [`AriaHider`] that records what it was asked to keep visible and how
/// many hidings are outstanding.
#[derive(Debug, Clone, Default)]
pub struct RecordingAriaHider {
    /// Roots passed to each call, in call order.
    calls: Rc<RefCell<Vec<Vec<ElementId>>>>,
    /// Hidings not yet reversed.
    outstanding: Rc<Cell<usize>>,
}

impl RecordingAriaHider {
    /// Construct a recorder with no calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Roots passed to each call.
    pub fn calls(&self) -> Vec<Vec<ElementId>> {
        self.calls.borrow().clone()
    }

    /// Number of hidings not yet reversed.
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }
}

impl AriaHider for RecordingAriaHider {
    fn hide_outside(&self, _document: &Document, roots: &[ElementId]) -> Cleanup {
        self.calls.borrow_mut().push(roots.to_vec());
        self.outstanding.set(self.outstanding.get() + 1);
        let outstanding = self.outstanding.clone();
        Cleanup::new(move || outstanding.set(outstanding.get() - 1))
    }
}
