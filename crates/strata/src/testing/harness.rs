use std::{cell::Cell, rc::Rc};

use super::RecordingAriaHider;
use crate::{
    Config, ElementId, Layer, LayerOptions, Strata,
    dom::{Button, Document, Event, TouchPoint},
    error::Result,
};

/// Counts close requests from a layer's `on_close`.
#[derive(Debug, Clone, Default)]
pub struct CloseCounter {
    /// Requests so far.
    count: Rc<Cell<usize>>,
}

impl CloseCounter {
    /// Construct a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests so far.
    pub fn count(&self) -> usize {
        self.count.get()
    }

    /// A callback that increments the counter.
    pub fn callback(&self) -> impl Fn() + 'static {
        let count = self.count.clone();
        move || count.set(count.get() + 1)
    }
}

/// A document and a [`Strata`] service with a recording aria-hide
/// collaborator. Tests build elements and layers through the harness and drive
/// them with gestures.
pub struct Harness {
    /// The service under test.
    pub strata: Strata,
    /// The document the service coordinates.
    pub document: Document,
    /// The installed aria-hide collaborator.
    pub aria: RecordingAriaHider,
}

/// Builder for creating a test harness with a fluent API.
#[derive(Debug, Default)]
pub struct HarnessBuilder {
    /// Width of the vertical window scrollbar.
    scrollbar_width: f64,
    /// Service configuration.
    config: Config,
}

impl HarnessBuilder {
    /// Simulate a visible vertical scrollbar of `width` pixels.
    pub fn scrollbar_width(mut self, width: f64) -> Self {
        self.scrollbar_width = width;
        self
    }

    /// Use a service configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Build the harness with the configured settings.
    pub fn build(self) -> Harness {
        let document = Document::new();
        let inner = document.viewport().inner_width;
        document.set_offset_width(document.body(), inner - self.scrollbar_width);
        let aria = RecordingAriaHider::new();
        let strata = Strata::builder(document.clone())
            .config(self.config)
            .aria_hider(aria.clone())
            .build();
        Harness {
            strata,
            document,
            aria,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    /// Create a harness builder.
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    /// A harness with default configuration and no scrollbar.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The document body.
    pub fn body(&self) -> ElementId {
        self.document.body()
    }

    /// Create an element under `parent`.
    pub fn element(&self, parent: ElementId, tag: &str) -> Result<ElementId> {
        let el = self.document.create_element(tag);
        self.document.append_child(parent, el)?;
        Ok(el)
    }

    /// Create an element directly under the body.
    pub fn attach(&self, tag: &str) -> Result<ElementId> {
        self.element(self.body(), tag)
    }

    /// A layer mounted on a fresh root under the body, not yet open.
    pub fn layer(&self, options: LayerOptions) -> Result<Layer> {
        let layer = self.strata.layer(options);
        layer.mount(self.attach("div")?)?;
        Ok(layer)
    }

    /// A layer mounted on a fresh root under the body and opened.
    pub fn open_layer(&self, options: LayerOptions) -> Result<Layer> {
        let layer = self.layer(options)?;
        layer.open()?;
        Ok(layer)
    }

    /// The mounted root of `layer`.
    pub fn root_of(layer: &Layer) -> ElementId {
        layer.root().unwrap_or_default()
    }

    /// Dispatch a primary-button press on `target`.
    pub fn pointer_down(&self, target: ElementId) -> bool {
        self.document
            .dispatch(&Event::pointer_down(target, Button::Primary))
    }

    /// Dispatch a primary-button release on `target`.
    pub fn pointer_up(&self, target: ElementId) -> bool {
        self.document
            .dispatch(&Event::pointer_up(target, Button::Primary))
    }

    /// Press and release the primary button on `target`.
    pub fn click(&self, target: ElementId) {
        self.pointer_down(target);
        self.pointer_up(target);
    }

    /// Press Escape with nothing focused. Returns false if a layer consumed
    /// the key.
    pub fn escape(&self) -> bool {
        self.document.dispatch(&Event::key_down(None, "Escape"))
    }

    /// Move focus from `from` to `to`.
    pub fn focus_out(&self, from: ElementId, to: Option<ElementId>) {
        self.document.dispatch(&Event::focus_out(from, to));
    }

    /// Scroll the wheel vertically over `target`. Returns false if the
    /// scroll was cancelled.
    pub fn wheel(&self, target: ElementId, delta_y: f64) -> bool {
        self.document.dispatch(&Event::wheel(target, 0.0, delta_y))
    }

    /// Drag one finger vertically over `target`. Returns false if the move
    /// was cancelled.
    pub fn touch_drag(&self, target: ElementId, from_y: f64, to_y: f64) -> bool {
        self.document
            .dispatch(&Event::touch_start(target, vec![TouchPoint::new(0.0, from_y)]));
        self.document
            .dispatch(&Event::touch_move(target, vec![TouchPoint::new(0.0, to_y)]))
    }

    /// The body's `style` attribute, or `None` if it has none.
    pub fn body_style(&self) -> Option<String> {
        let body = self.body();
        self.document
            .has_style_attribute(body)
            .then(|| self.document.style(body).map(|s| s.to_string()))
            .flatten()
    }

    /// One inline property of the body.
    pub fn body_property(&self, name: &str) -> Option<String> {
        self.document.style_property(self.body(), name)
    }
}
