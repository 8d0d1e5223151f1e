/// Recording collaborators.
pub mod aria;
/// Harness for layer testing.
pub mod harness;

pub use aria::RecordingAriaHider;
pub use harness::{CloseCounter, Harness, HarnessBuilder};

/// Install a `tracing` subscriber that writes through the test harness.
/// Safe to call from every test.
pub fn init_tracing() {
    if let Err(e) = tracing_subscriber::fmt().with_test_writer().try_init() {
        tracing::trace!(%e, "subscriber already installed");
    }
}
