//! The assistive-technology hiding collaborator.
//!
//! While a modal layer is open, everything outside it should be hidden from
//! assistive technology. Walking sibling subtrees and toggling `aria-hidden`
//! is left to an [`AriaHider`] implementation supplied by the host; strata
//! only calls it with the roots to keep visible and holds the returned
//! [`Cleanup`] until the modal layer closes.

use crate::{Cleanup, ElementId, dom::Document};

/// Hides everything outside a set of roots from assistive technology.
pub trait AriaHider {
    /// Hide every element outside `roots`. The returned cleanup must exactly
    /// reverse the hiding.
    fn hide_outside(&self, document: &Document, roots: &[ElementId]) -> Cleanup;
}

/// An [`AriaHider`] that hides nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAriaHider;

impl AriaHider for NoopAriaHider {
    fn hide_outside(&self, _document: &Document, _roots: &[ElementId]) -> Cleanup {
        Cleanup::noop()
    }
}

impl<F> AriaHider for F
where
    F: Fn(&Document, &[ElementId]) -> Cleanup,
{
    fn hide_outside(&self, document: &Document, roots: &[ElementId]) -> Cleanup {
        self(document, roots)
    }
}
