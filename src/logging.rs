//! Tracing subscriber set-up for applications embedding the client
//!
//! The library itself only emits `tracing` events. Binaries call [`init`]
//! once at start-up; `RUST_LOG` refines the filter.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber at `info` level
///
/// Returns `false` when a global subscriber was already installed.
pub fn init() -> bool {
    init_with_level(Level::INFO)
}

/// Install a fmt subscriber with `level` added to the `RUST_LOG` filter
pub fn init_with_level(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_with_level(Level::DEBUG);
        assert!(!init());
    }
}
