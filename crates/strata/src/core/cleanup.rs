use std::{fmt, mem};

use scopeguard::ScopeGuard;

/// Boxed release action.
type Release = Box<dyn FnOnce()>;

/// Run a boxed release action. Used as the guard's drop function.
fn run_release(release: Release) {
    release();
}

/// A pending release of a global resource.
///
/// Every global mutation in strata (a listener, a registry entry, a body style
/// override) is paired with a `Cleanup`. The release runs exactly once: either
/// explicitly through [`Cleanup::release`], or when the handle is dropped.
/// Releasing an already-released handle is a no-op.
#[must_use = "dropping a Cleanup releases the resource immediately"]
#[derive(Default)]
pub struct Cleanup {
    /// Armed guard; `None` once released.
    guard: Option<ScopeGuard<Release, fn(Release)>>,
}

impl Cleanup {
    /// Wrap a release action.
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            guard: Some(scopeguard::guard(
                Box::new(release) as Release,
                run_release as fn(Release),
            )),
        }
    }

    /// A cleanup with nothing to release.
    pub fn noop() -> Self {
        Self::default()
    }

    /// Is there still something to release?
    pub fn is_armed(&self) -> bool {
        self.guard.is_some()
    }

    /// Run the release action if it has not run yet.
    pub fn release(&mut self) {
        // Dropping the guard runs the action.
        self.guard.take();
    }

    /// Compose two cleanups. The result releases `other` first, then `self`,
    /// undoing acquisitions in reverse order.
    pub fn and(self, other: Self) -> Self {
        if !other.is_armed() {
            return self;
        }
        if !self.is_armed() {
            return other;
        }
        let mut first = other;
        let mut second = self;
        Self::new(move || {
            first.release();
            second.release();
        })
    }
}

impl fmt::Debug for Cleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cleanup")
            .field("armed", &self.is_armed())
            .finish()
    }
}

/// A stack of cleanups released in reverse acquisition order.
///
/// This is the lifecycle scope for everything a layer holds while it is open.
#[derive(Debug, Default)]
pub struct Scope {
    /// Held cleanups, in acquisition order.
    cleanups: Vec<Cleanup>,
}

impl Scope {
    /// Construct an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a cleanup until the scope is released.
    pub fn defer(&mut self, cleanup: Cleanup) {
        if cleanup.is_armed() {
            self.cleanups.push(cleanup);
        }
    }

    /// Hold an arbitrary release action until the scope is released.
    pub fn defer_fn(&mut self, release: impl FnOnce() + 'static) {
        self.cleanups.push(Cleanup::new(release));
    }

    /// Number of held cleanups.
    pub fn len(&self) -> usize {
        self.cleanups.len()
    }

    /// Does the scope hold nothing?
    pub fn is_empty(&self) -> bool {
        self.cleanups.is_empty()
    }

    /// Release every held cleanup, most recent first.
    pub fn release(&mut self) {
        while let Some(mut cleanup) = self.cleanups.pop() {
            cleanup.release();
        }
    }

    /// Collapse the scope into a single cleanup.
    pub fn into_cleanup(mut self) -> Cleanup {
        if self.is_empty() {
            return Cleanup::noop();
        }
        let cleanups = mem::take(&mut self.cleanups);
        Cleanup::new(move || {
            let mut scope = Self { cleanups };
            scope.release();
        })
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.release();
    }
}
