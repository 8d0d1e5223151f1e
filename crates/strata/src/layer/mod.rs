//! Layers: the global registry, the nested-layer tree and the per-overlay
//! facade that composes them with the outside-interaction detector, the
//! Escape arbiter and the scroll-lock stack.

/// The layer facade.
mod facade;
/// The nested-layer tree.
mod nested;
/// The global layer registry.
mod registry;

pub use facade::{ElementFilter, Hook, Layer, LayerHandle, LayerOptions};
pub use nested::LayerContext;
pub use registry::{LayerRegistry, PointerEvents};
