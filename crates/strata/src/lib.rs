//! Strata: layered dismissal coordination for overlay surfaces.
//!
//! Strata is the shared machinery behind popovers, menus, dialogs and other
//! transient surfaces that stack on top of application content. It tracks the
//! stacking order of open layers, decides which layer owns an Escape press or
//! an outside click, blocks background pointer interaction and scrolling while
//! modal layers are open, and guarantees that every global mutation is undone
//! when a layer closes, regardless of the order layers close in.
//!
//! # Quick Start
//!
//! The main entry points are:
//! - [`Strata`] - The process-wide service holding the registries
//! - [`Layer`] - The per-overlay facade a component drives
//! - [`Document`] - The document model layers are rooted in
//!
//! # Module Organization
//!
//! - [`dom`] - Elements, inline styles, events and listeners
//! - [`layer`] - Layer registry, nested-layer tree and the layer facade
//! - [`scroll_lock`] - Reference-counted background scroll locking
//! - [`interact_outside`] - Outside pointer interaction detection
//! - [`escape`] - Escape-key arbitration between stacked layers

#![warn(missing_docs)]

// Internal core module - re-export specific items below
mod core;

// Public modules
pub mod aria;
pub mod dom;
pub mod escape;
pub mod interact_outside;
pub mod layer;
pub mod scroll_lock;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use self::core::{
    Cleanup, Config, DismissOn, ElementId, ListenerId, LockId, Scope, ScrollbarGutter, Strata,
    StrataBuilder,
};
pub use self::core::{config, error};

pub use dom::{Document, Event, EventKind};
pub use layer::{Layer, LayerContext, LayerHandle, LayerOptions, LayerRegistry, PointerEvents};
pub use scroll_lock::{ScrollLock, ScrollLockOptions, ScrollLocks};
