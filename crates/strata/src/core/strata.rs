use std::{fmt, rc::Rc};

use crate::{
    Config,
    aria::{AriaHider, NoopAriaHider},
    dom::Document,
    layer::{Layer, LayerOptions, LayerRegistry},
    scroll_lock::ScrollLocks,
};

/// Shared service state.
struct StrataInner {
    /// The document every layer is rooted in.
    document: Document,
    /// Service configuration.
    config: Rc<Config>,
    /// Visible and modal layer stacks.
    layers: LayerRegistry,
    /// Scroll-lock request stack.
    scroll_locks: ScrollLocks,
    /// Assistive-technology hiding collaborator.
    aria: Rc<dyn AriaHider>,
}

/// The process-wide coordination service.
///
/// A `Strata` owns the global registries (visible layers, modal layers and the
/// scroll-lock stack) for one document. It is a cheap handle: clone it into
/// every component that opens layers. Registries are only mutated through
/// their accessor methods.
#[derive(Clone)]
pub struct Strata {
    /// Shared state.
    inner: Rc<StrataInner>,
}

impl fmt::Debug for Strata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Strata")
            .field("layers", &self.inner.layers.visible_layers())
            .field("scroll_locks", &self.inner.scroll_locks.len())
            .finish()
    }
}

/// Builder for a [`Strata`] service.
pub struct StrataBuilder {
    /// Document to coordinate.
    document: Document,
    /// Service configuration.
    config: Config,
    /// Aria-hide collaborator.
    aria: Rc<dyn AriaHider>,
}

impl StrataBuilder {
    /// Use a configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use an aria-hide collaborator.
    pub fn aria_hider(mut self, aria: impl AriaHider + 'static) -> Self {
        self.aria = Rc::new(aria);
        self
    }

    /// Build the service.
    pub fn build(self) -> Strata {
        let config = Rc::new(self.config);
        Strata {
            inner: Rc::new(StrataInner {
                layers: LayerRegistry::new(self.document.clone()),
                scroll_locks: ScrollLocks::new(self.document.clone(), config.clone()),
                document: self.document,
                config,
                aria: self.aria,
            }),
        }
    }
}

impl Strata {
    /// Start building a service for `document`.
    pub fn builder(document: Document) -> StrataBuilder {
        StrataBuilder {
            document,
            config: Config::default(),
            aria: Rc::new(NoopAriaHider),
        }
    }

    /// A service for `document` with default configuration.
    pub fn new(document: Document) -> Self {
        Self::builder(document).build()
    }

    /// The coordinated document.
    pub fn document(&self) -> &Document {
        &self.inner.document
    }

    /// Service configuration.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// The layer registry.
    pub fn layers(&self) -> &LayerRegistry {
        &self.inner.layers
    }

    /// The scroll-lock stack.
    pub fn scroll_locks(&self) -> &ScrollLocks {
        &self.inner.scroll_locks
    }

    /// The aria-hide collaborator.
    pub fn aria_hider(&self) -> &dyn AriaHider {
        self.inner.aria.as_ref()
    }

    /// Construct a layer coordinated by this service.
    pub fn layer(&self, options: LayerOptions) -> Layer {
        Layer::new(self, options)
    }
}
