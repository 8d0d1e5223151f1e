//! The document model layers are rooted in.
//!
//! A [`Document`] owns an element tree rooted at `body`, the inline styles of
//! those elements, window metrics, and event listeners. Dispatch follows the
//! capture/target/bubble ordering that the coordination layer relies on.

/// Document handle and dispatch.
mod document;
/// Element state and scroll metrics.
mod element;
/// Event types.
pub mod event;
/// Inline style declarations.
pub mod style;

pub use document::{Callback, Document, ListenerTarget, Viewport, WeakDocument};
pub use element::{Axis, Namespace, ScrollMetrics};
pub use event::{Button, DeltaMode, Detail, Event, EventKind, TouchPoint};
pub use style::InlineStyle;
