//! Morn logs through [`tracing`] under the `morn` target and never installs a subscriber
//! on its own. Applications that do not have one yet can call [`init`].

use tracing_subscriber::EnvFilter;

pub(crate) const TARGET: &str = "morn";

/// Installs a formatting subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive` (e.g. `"info"` or `"morn=debug"`).
/// Calling it again after a subscriber is set is a no-op.
pub fn init(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
