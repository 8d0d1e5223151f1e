use std::{
    cell::{Cell, RefCell},
    fmt, mem,
    rc::{Rc, Weak},
};

use tracing::{debug, trace, warn};

use crate::{
    Cleanup, DismissOn, ElementId, Scope, ScrollLockOptions, Strata,
    dom::{Event, EventKind},
    error::Result,
    escape::EscapeKey,
    interact_outside::InteractOutside,
    layer::{LayerContext, PointerEvents},
};

/// Inline style property a layer root uses to opt back into interaction.
const POINTER_EVENTS: &str = "pointer-events";

/// A dismissal hook. Calling `prevent_default` on the event keeps the layer
/// open.
pub type Hook = Rc<dyn Fn(&Event)>;

/// Decides whether interaction with an element may close a layer.
pub type ElementFilter = Rc<dyn Fn(ElementId) -> bool>;

/// Per-layer behaviour, fixed when the layer is constructed.
#[derive(Clone)]
pub struct LayerOptions {
    /// Block background interaction, hide the background from assistive
    /// technology and lock scrolling while open.
    modal: bool,
    /// Close on Escape.
    close_on_esc: bool,
    /// Close on pointer or focus interaction outside the layer tree.
    close_on_interact_outside: bool,
    /// Lock scrolling while open. Defaults to `modal`.
    prevent_scroll: Option<bool>,
    /// Handle Escape even when not topmost.
    bypass_top_most_layer_check: bool,
    /// Outside dismissal phase; defaults to the service configuration.
    dismiss_on: Option<DismissOn>,
    /// Enclosing layer.
    parent: Option<LayerContext>,
    /// Elements whose subtrees never count as outside.
    exclude: Vec<ElementId>,
    /// Consumer filter for outside interaction.
    should_close_on_interact_outside: Option<ElementFilter>,
    /// Called on Escape before closing.
    on_escape_key_down: Option<Hook>,
    /// Called on an outside pointer press before closing.
    on_pointer_down_outside: Option<Hook>,
    /// Called on focus moving outside before closing.
    on_focus_outside: Option<Hook>,
    /// Called on any outside interaction before closing.
    on_interact_outside: Option<Hook>,
    /// Close request handler.
    on_close: Option<Rc<dyn Fn()>>,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            modal: false,
            close_on_esc: true,
            close_on_interact_outside: true,
            prevent_scroll: None,
            bypass_top_most_layer_check: false,
            dismiss_on: None,
            parent: None,
            exclude: Vec::new(),
            should_close_on_interact_outside: None,
            on_escape_key_down: None,
            on_pointer_down_outside: None,
            on_focus_outside: None,
            on_interact_outside: None,
            on_close: None,
        }
    }
}

impl fmt::Debug for LayerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerOptions")
            .field("modal", &self.modal)
            .field("close_on_esc", &self.close_on_esc)
            .field("close_on_interact_outside", &self.close_on_interact_outside)
            .field("prevent_scroll", &self.prevent_scroll)
            .field("bypass_top_most_layer_check", &self.bypass_top_most_layer_check)
            .field("dismiss_on", &self.dismiss_on)
            .field("parent", &self.parent)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl LayerOptions {
    /// Options for a modal layer.
    pub fn modal() -> Self {
        Self::default().with_modal(true)
    }

    /// Set whether the layer is modal.
    pub fn with_modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    /// Set whether Escape closes the layer.
    pub fn close_on_esc(mut self, close: bool) -> Self {
        self.close_on_esc = close;
        self
    }

    /// Set whether outside interaction closes the layer.
    pub fn close_on_interact_outside(mut self, close: bool) -> Self {
        self.close_on_interact_outside = close;
        self
    }

    /// Lock background scrolling while open, independent of `modal`.
    pub fn prevent_scroll(mut self, prevent: bool) -> Self {
        self.prevent_scroll = Some(prevent);
        self
    }

    /// Handle Escape even when another layer is on top.
    pub fn bypass_top_most_layer_check(mut self, bypass: bool) -> Self {
        self.bypass_top_most_layer_check = bypass;
        self
    }

    /// Choose the outside dismissal phase.
    pub fn dismiss_on(mut self, dismiss_on: DismissOn) -> Self {
        self.dismiss_on = Some(dismiss_on);
        self
    }

    /// Nest the layer beneath `parent`.
    pub fn parent(mut self, parent: LayerContext) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Never treat interaction with `element` or its descendants as outside.
    pub fn exclude(mut self, element: ElementId) -> Self {
        self.exclude.push(element);
        self
    }

    /// Only close when `filter` accepts the outside element.
    pub fn should_close_on_interact_outside(
        mut self,
        filter: impl Fn(ElementId) -> bool + 'static,
    ) -> Self {
        self.should_close_on_interact_outside = Some(Rc::new(filter));
        self
    }

    /// Hook Escape presses.
    pub fn on_escape_key_down(mut self, hook: impl Fn(&Event) + 'static) -> Self {
        self.on_escape_key_down = Some(Rc::new(hook));
        self
    }

    /// Hook outside pointer presses. Runs on the press in either dismiss
    /// phase; preventing default keeps the layer open through the matching
    /// click.
    pub fn on_pointer_down_outside(mut self, hook: impl Fn(&Event) + 'static) -> Self {
        self.on_pointer_down_outside = Some(Rc::new(hook));
        self
    }

    /// Hook focus leaving the layer tree.
    pub fn on_focus_outside(mut self, hook: impl Fn(&Event) + 'static) -> Self {
        self.on_focus_outside = Some(Rc::new(hook));
        self
    }

    /// Hook every outside interaction.
    pub fn on_interact_outside(mut self, hook: impl Fn(&Event) + 'static) -> Self {
        self.on_interact_outside = Some(Rc::new(hook));
        self
    }

    /// Handle close requests. Without a handler the layer closes itself.
    pub fn on_close(mut self, on_close: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(on_close));
        self
    }
}

/// Shared layer state.
struct LayerInner {
    /// The coordinating service.
    strata: Strata,
    /// Construction options.
    options: LayerOptions,
    /// Root element while mounted.
    root: Cell<Option<ElementId>>,
    /// Is the layer open?
    open: Cell<bool>,
    /// Is the layer modal?
    modal: Cell<bool>,
    /// Close request handler.
    on_close: RefCell<Option<Rc<dyn Fn()>>>,
    /// This layer's node in the nested-layer tree.
    context: LayerContext,
    /// Escape subscription.
    escape: EscapeKey,
    /// Outside pointer detector.
    outside: InteractOutside,
    /// Global resources held while open and mounted.
    session: RefCell<Scope>,
    /// The last outside press was cancelled by its hook.
    press_cancelled: Cell<bool>,
}

impl LayerInner {
    /// Outside dismissal phase in effect.
    fn dismiss_on(&self) -> DismissOn {
        self.options
            .dismiss_on
            .unwrap_or(self.strata.config().dismiss_on)
    }

    /// Does this layer lock scrolling while open?
    fn prevent_scroll(&self) -> bool {
        self.options.prevent_scroll.unwrap_or(self.modal.get())
    }

    /// Is a session holding global resources?
    fn is_registered(&self) -> bool {
        self.root
            .get()
            .is_some_and(|root| self.strata.layers().contains(root))
    }

    /// May interaction with `element` close this layer?
    fn should_close(&self, element: ElementId) -> bool {
        let doc = self.strata.document();
        if self.context.is_element_in_layer_tree(element) {
            return false;
        }
        if self.options.exclude.iter().any(|ex| doc.contains(*ex, element)) {
            return false;
        }
        self.options
            .should_close_on_interact_outside
            .as_ref()
            .is_none_or(|filter| filter(element))
    }

    /// Acquire every global resource for an open, mounted layer.
    fn acquire(&self) -> Result<()> {
        self.release();
        let Some(root) = self.root.get() else {
            return Ok(());
        };
        let doc = self.strata.document();
        if !doc.exists(root) {
            return Ok(());
        }
        let modal = self.modal.get();
        let mut scope = Scope::new();
        scope.defer(self.strata.layers().register(root, modal)?);
        if let Some(parent) = self.context.parent() {
            scope.defer(parent.register_nested_layer(root));
        }
        self.context.set_root(Some(root));
        let context = self.context.clone();
        scope.defer_fn(move || context.set_root(None));
        if modal {
            scope.defer(self.strata.aria_hider().hide_outside(doc, &[root]));
        }
        if self.prevent_scroll() {
            let lock = self
                .strata
                .scroll_locks()
                .request(true, ScrollLockOptions::default().permit(root));
            scope.defer(lock.into_cleanup());
        }
        *self.session.borrow_mut() = scope;

        self.outside.set_root(Some(root));
        self.outside
            .set_disabled(!self.options.close_on_interact_outside);
        self.escape.set_root(Some(root));
        self.escape.set_active(self.options.close_on_esc);
        debug!(?root, modal, "layer opened");
        Ok(())
    }

    /// Release everything `acquire` took, in reverse order.
    fn release(&self) {
        self.escape.set_active(false);
        self.escape.set_root(None);
        self.outside.set_disabled(true);
        self.outside.set_root(None);
        let mut session = mem::take(&mut *self.session.borrow_mut());
        if !session.is_empty() {
            session.release();
            debug!(root = ?self.root.get(), "layer closed");
        }
    }

    /// Open or close.
    fn set_open(&self, open: bool) -> Result<()> {
        if self.open.replace(open) == open {
            return Ok(());
        }
        if open {
            self.acquire().inspect_err(|_| self.open.set(false))
        } else {
            self.release();
            Ok(())
        }
    }

    /// Ask the owner to close, or close directly if there is no handler.
    fn dismiss(&self) {
        let on_close = self.on_close.borrow().clone();
        match on_close {
            Some(on_close) => on_close(),
            None => {
                if let Err(e) = self.set_open(false) {
                    warn!(%e, "failed to close layer");
                }
            }
        }
    }

    /// Handle an outside pointer interaction reported by the detector.
    fn pointer_outside(&self, event: &Event, phase: DismissOn) {
        let press = phase == DismissOn::PointerDown;
        if press {
            self.press_cancelled.set(false);
        }
        if !self.open.get() || (!press && self.dismiss_on() != DismissOn::Click) {
            return;
        }
        let (Some(root), Some(target)) = (self.root.get(), event.target()) else {
            return;
        };
        if self.strata.layers().is_below_pointer_blocking_layer(root) {
            trace!(?root, "outside interaction ignored below a modal layer");
            return;
        }
        if !self.should_close(target) {
            trace!(?root, ?target, "interaction inside layer tree");
            return;
        }
        if press {
            if let Some(hook) = &self.options.on_pointer_down_outside {
                hook(event);
            }
            if self.dismiss_on() == DismissOn::Click {
                self.press_cancelled.set(event.default_prevented());
                return;
            }
        } else if self.press_cancelled.take() {
            debug!(?root, "outside dismissal cancelled on press");
            return;
        }
        if let Some(hook) = &self.options.on_interact_outside {
            hook(event);
        }
        if event.default_prevented() {
            debug!(?root, "outside dismissal cancelled");
            return;
        }
        debug!(?root, ?target, "dismissing on outside interaction");
        self.dismiss();
    }

    /// Handle focus leaving the root.
    fn focus_outside(&self, event: &Event) {
        if !self.open.get() || !self.options.close_on_interact_outside {
            return;
        }
        let (Some(root), Some(related)) = (self.root.get(), event.related_target()) else {
            return;
        };
        if !self.should_close(related) {
            return;
        }
        // Focus events cannot be cancelled; hooks get a cancelable copy.
        let outside = Event::new(EventKind::FocusOut, event.target(), event.detail().clone())
            .with_cancelable(true);
        if let Some(hook) = &self.options.on_focus_outside {
            hook(&outside);
        }
        if let Some(hook) = &self.options.on_interact_outside {
            hook(&outside);
        }
        if outside.default_prevented() {
            debug!(?root, "focus dismissal cancelled");
            return;
        }
        debug!(?root, ?related, "dismissing on focus outside");
        self.dismiss();
    }
}

impl Drop for LayerInner {
    fn drop(&mut self) {
        self.release();
    }
}

/// One overlay instance.
///
/// A component constructs a `Layer` when it mounts, gives it a root element
/// with [`Layer::mount`], and drives it with [`Layer::set_open`]. While open
/// and mounted the layer is registered in the global stack, nested under its
/// parent, and listening for Escape and outside interaction; modal layers also
/// block background pointer events, hide the background from assistive
/// technology and lock scrolling. Everything is released on close, unmount or
/// drop.
pub struct Layer {
    /// Shared state; listeners hold weak references.
    inner: Rc<LayerInner>,
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("root", &self.inner.root.get())
            .field("open", &self.inner.open.get())
            .field("modal", &self.inner.modal.get())
            .finish()
    }
}

impl Layer {
    /// Construct a closed, unmounted layer.
    pub fn new(strata: &Strata, options: LayerOptions) -> Self {
        let document = strata.document().clone();
        let inner = Rc::new_cyclic(|weak: &Weak<LayerInner>| {
            let on_escape = weak.clone();
            let escape = EscapeKey::new(
                document.clone(),
                strata.layers().clone(),
                options.on_escape_key_down.clone(),
                move || {
                    if let Some(inner) = on_escape.upgrade() {
                        inner.dismiss();
                    }
                },
            );
            escape.set_bypass_top_most(options.bypass_top_most_layer_check);
            let (on_down, on_up) = (weak.clone(), weak.clone());
            let outside = InteractOutside::new(
                document.clone(),
                move |e| {
                    if let Some(inner) = on_down.upgrade() {
                        inner.pointer_outside(e, DismissOn::PointerDown);
                    }
                },
                move |e| {
                    if let Some(inner) = on_up.upgrade() {
                        inner.pointer_outside(e, DismissOn::Click);
                    }
                },
            );
            LayerInner {
                strata: strata.clone(),
                root: Cell::new(None),
                open: Cell::new(false),
                modal: Cell::new(options.modal),
                on_close: RefCell::new(options.on_close.clone()),
                context: LayerContext::new(document.clone(), options.parent.clone()),
                escape,
                outside,
                session: RefCell::new(Scope::new()),
                press_cancelled: Cell::new(false),
                options,
            }
        });
        Self { inner }
    }

    /// Attach the layer to its root element. An open layer registers at once.
    pub fn mount(&self, root: ElementId) -> Result<()> {
        if self.inner.root.replace(Some(root)) == Some(root) {
            return Ok(());
        }
        if self.inner.open.get() {
            self.inner.acquire()?;
        }
        Ok(())
    }

    /// Detach the layer from its root, releasing everything it holds.
    pub fn unmount(&self) {
        self.inner.release();
        self.inner.root.set(None);
    }

    /// The mounted root.
    pub fn root(&self) -> Option<ElementId> {
        self.inner.root.get()
    }

    /// Open or close the layer.
    ///
    /// Opening fails with [`Error::DuplicateLayer`](crate::error::Error) if
    /// another open layer already uses the same root; the layer stays closed.
    pub fn set_open(&self, open: bool) -> Result<()> {
        self.inner.set_open(open)
    }

    /// Open the layer.
    pub fn open(&self) -> Result<()> {
        self.set_open(true)
    }

    /// Close the layer.
    pub fn close(&self) {
        self.inner.open.set(false);
        self.inner.release();
    }

    /// Is the layer open?
    pub fn is_open(&self) -> bool {
        self.inner.open.get()
    }

    /// Is the layer modal?
    pub fn is_modal(&self) -> bool {
        self.inner.modal.get()
    }

    /// Change modality. An open layer re-registers with the new value.
    pub fn set_modal(&self, modal: bool) -> Result<()> {
        if self.inner.modal.replace(modal) == modal {
            return Ok(());
        }
        if self.inner.is_registered() {
            self.inner.acquire()?;
        }
        Ok(())
    }

    /// Replace the close request handler.
    pub fn set_on_close(&self, on_close: impl Fn() + 'static) {
        *self.inner.on_close.borrow_mut() = Some(Rc::new(on_close));
    }

    /// Request dismissal: calls the close handler, or closes the layer if
    /// there is none.
    pub fn dismiss(&self) {
        self.inner.dismiss();
    }

    /// This layer's node in the nested-layer tree, for constructing children.
    pub fn context(&self) -> LayerContext {
        self.inner.context.clone()
    }

    /// A weak handle to this layer.
    pub fn handle(&self) -> LayerHandle {
        LayerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Is this the most recently opened layer?
    pub fn is_top_most(&self) -> bool {
        self.inner
            .root
            .get()
            .is_some_and(|root| self.inner.strata.layers().is_top_most_layer(root))
    }

    /// Is `element` inside this layer or any layer nested beneath it?
    pub fn is_element_in_layer_tree(&self, element: ElementId) -> bool {
        self.inner.context.is_element_in_layer_tree(element)
    }

    /// The `pointer-events` value the root should carry, or `None` when no
    /// override is needed.
    pub fn pointer_events(&self) -> Option<PointerEvents> {
        self.inner
            .root
            .get()
            .and_then(|root| self.inner.strata.layers().pointer_events_for(root))
    }

    /// Write [`Layer::pointer_events`] to the root's inline style.
    pub fn sync_pointer_events(&self) -> Option<PointerEvents> {
        let root = self.inner.root.get()?;
        let doc = self.inner.strata.document();
        let value = self.pointer_events();
        match value {
            Some(v) => doc.set_style_property(root, POINTER_EVENTS, v.as_str()),
            None => {
                doc.remove_style_property(root, POINTER_EVENTS);
            }
        }
        value
    }

    /// Handle a `focusout` from the root or its descendants. Focus moving to
    /// an element outside the layer tree dismisses the layer.
    pub fn handle_focus_out(&self, event: &Event) {
        self.inner.focus_outside(event);
    }

    /// Listen for `focusout` on the mounted root. Does nothing when unmounted.
    pub fn bind_focus_out(&self) -> Cleanup {
        let Some(root) = self.inner.root.get() else {
            return Cleanup::noop();
        };
        let inner = Rc::downgrade(&self.inner);
        self.inner
            .strata
            .document()
            .add_element_listener(root, EventKind::FocusOut, move |e| {
                if let Some(inner) = inner.upgrade() {
                    inner.focus_outside(e);
                }
            })
    }
}

/// A weak reference to a [`Layer`], for close handlers and other code that
/// must not keep the layer alive.
#[derive(Clone)]
pub struct LayerHandle {
    /// The referenced layer.
    inner: Weak<LayerInner>,
}

impl fmt::Debug for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerHandle")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl LayerHandle {
    /// Is the layer alive and open?
    pub fn is_open(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.open.get())
    }

    /// Close the layer if it is alive.
    pub fn close(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.open.set(false);
            inner.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{Document, dom::Button, error::Error};

    fn attach(doc: &Document) -> Result<ElementId> {
        let el = doc.create_element("div");
        doc.append_child(doc.body(), el)?;
        Ok(el)
    }

    fn open(strata: &Strata, options: LayerOptions) -> Result<Layer> {
        let layer = strata.layer(options);
        layer.mount(attach(strata.document())?)?;
        layer.open()?;
        Ok(layer)
    }

    #[test]
    fn open_registers_close_releases() -> Result<()> {
        let strata = Strata::new(Document::new());
        let layer = open(&strata, LayerOptions::default())?;
        let root = layer.root();
        assert_eq!(strata.layers().visible_layers(), root.into_iter().collect::<Vec<_>>());
        assert!(layer.is_top_most());
        layer.close();
        assert!(strata.layers().is_empty());
        assert_eq!(strata.document().listener_count(), 0);
        Ok(())
    }

    #[test]
    fn open_before_mount() -> Result<()> {
        let strata = Strata::new(Document::new());
        let layer = strata.layer(LayerOptions::default());
        layer.open()?;
        assert!(strata.layers().is_empty());
        let root = attach(strata.document())?;
        layer.mount(root)?;
        assert!(strata.layers().contains(root));
        layer.unmount();
        assert!(strata.layers().is_empty());
        assert!(layer.is_open());
        Ok(())
    }

    #[test]
    fn duplicate_root_stays_closed() -> Result<()> {
        let strata = Strata::new(Document::new());
        let a = open(&strata, LayerOptions::default())?;
        let b = strata.layer(LayerOptions::default());
        let root = a.root().ok_or(Error::Hierarchy("unmounted".into()))?;
        b.mount(root)?;
        assert_eq!(b.open(), Err(Error::DuplicateLayer(root)));
        assert!(!b.is_open());
        assert_eq!(strata.layers().len(), 1);
        Ok(())
    }

    #[test]
    fn modal_session() -> Result<()> {
        let strata = Strata::new(Document::new());
        let doc = strata.document().clone();
        let layer = open(&strata, LayerOptions::modal())?;
        assert_eq!(doc.style_property(doc.body(), "pointer-events").as_deref(), Some("none"));
        assert_eq!(doc.style_property(doc.body(), "overflow").as_deref(), Some("hidden"));
        assert_eq!(layer.sync_pointer_events(), Some(PointerEvents::Auto));
        drop(layer);
        assert!(!doc.has_style_attribute(doc.body()));
        assert!(strata.scroll_locks().is_empty());
        Ok(())
    }

    #[test]
    fn set_modal_reregisters() -> Result<()> {
        let strata = Strata::new(Document::new());
        let layer = open(&strata, LayerOptions::default())?;
        assert!(strata.layers().visible_modal_layers().is_empty());
        layer.set_modal(true)?;
        assert_eq!(strata.layers().visible_modal_layers().len(), 1);
        assert_eq!(strata.scroll_locks().len(), 1);
        layer.set_modal(false)?;
        assert!(strata.layers().visible_modal_layers().is_empty());
        assert!(strata.scroll_locks().is_empty());
        Ok(())
    }

    #[test]
    fn dismiss_without_handler_closes() -> Result<()> {
        let strata = Strata::new(Document::new());
        let layer = open(&strata, LayerOptions::default())?;
        strata.document().dispatch(&Event::key_down(None, "Escape"));
        assert!(!layer.is_open());
        assert!(strata.layers().is_empty());
        Ok(())
    }

    #[test]
    fn click_phase() -> Result<()> {
        let strata = Strata::new(Document::new());
        let doc = strata.document().clone();
        let outside = attach(&doc)?;
        let layer = open(&strata, LayerOptions::default().dismiss_on(DismissOn::Click))?;
        doc.dispatch(&Event::pointer_down(outside, Button::Primary));
        assert!(layer.is_open());
        doc.dispatch(&Event::pointer_up(outside, Button::Primary));
        assert!(!layer.is_open());
        Ok(())
    }

    #[test]
    fn press_hook_runs_in_click_phase() -> Result<()> {
        let strata = Strata::new(Document::new());
        let doc = strata.document().clone();
        let outside = attach(&doc)?;
        let presses = Rc::new(Cell::new(0));
        let p = presses.clone();
        let layer = open(
            &strata,
            LayerOptions::default()
                .dismiss_on(DismissOn::Click)
                .on_pointer_down_outside(move |e| {
                    p.set(p.get() + 1);
                    if p.get() == 1 {
                        e.prevent_default();
                    }
                }),
        )?;

        doc.dispatch(&Event::pointer_down(outside, Button::Primary));
        doc.dispatch(&Event::pointer_up(outside, Button::Primary));
        assert_eq!(presses.get(), 1);
        assert!(layer.is_open());

        doc.dispatch(&Event::pointer_down(outside, Button::Primary));
        assert_eq!(presses.get(), 2);
        assert!(layer.is_open());
        doc.dispatch(&Event::pointer_up(outside, Button::Primary));
        assert!(!layer.is_open());
        Ok(())
    }

    #[test]
    fn excluded_trigger() -> Result<()> {
        let strata = Strata::new(Document::new());
        let doc = strata.document().clone();
        let trigger = attach(&doc)?;
        let icon = doc.create_svg_element("svg");
        doc.append_child(trigger, icon)?;
        let layer = open(&strata, LayerOptions::default().exclude(trigger))?;
        doc.dispatch(&Event::pointer_down(icon, Button::Primary));
        assert!(layer.is_open());
        Ok(())
    }

    #[test]
    fn handle_is_weak() -> Result<()> {
        let strata = Strata::new(Document::new());
        let layer = open(&strata, LayerOptions::default())?;
        let handle = layer.handle();
        assert!(handle.is_open());
        handle.close();
        assert!(!layer.is_open());
        drop(layer);
        assert!(!handle.is_open());
        handle.close();
        Ok(())
    }
}
