//! Logger setup.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialise the global logger once; later calls are ignored.
///
/// `RUST_LOG` wins over `filter`, which follows the env_logger filter
/// syntax (`info`, `lvgl_core=debug,warn`).
pub fn init_logging(filter: &str) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match std::env::var("RUST_LOG") {
            Ok(env_filter) => builder.parse_filters(&env_filter),
            Err(_) => builder.parse_filters(filter),
        };
        builder.format_timestamp(None);
        builder.init();

        log::debug!("logging initialized");
    });
}
