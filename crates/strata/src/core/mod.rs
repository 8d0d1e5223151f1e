//! Core types shared by every part of the crate.

/// Scoped release handles.
pub mod cleanup;
/// Service configuration.
pub mod config;
/// Core error types.
pub mod error;
/// Arena key types.
pub mod id;
/// The process-wide service object.
pub mod strata;

pub use cleanup::{Cleanup, Scope};
pub use config::{Config, DismissOn, ScrollbarGutter};
pub use id::{ElementId, ListenerId, LockId};
pub use strata::{Strata, StrataBuilder};
