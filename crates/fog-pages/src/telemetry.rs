use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `filter` (e.g. `"info"` or
/// `"fog_pages=debug"`). `RUST_LOG` takes precedence when set.
///
/// Returns `false` if a subscriber was already installed or the filter does
/// not parse; the existing subscriber is left in place.
pub fn init_tracing(filter: &str) -> bool {
    let filter = match EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(filter)) {
        Ok(filter) => filter,
        Err(_) => return false,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
