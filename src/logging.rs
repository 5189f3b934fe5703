use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once, early in `main`.
///
/// `RUST_LOG` wins when set. Otherwise the level is `info`, or `debug` when
/// `verbose` is set.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(default_level(verbose));
        }

        builder.init();

        log::debug!("logging initialized");
    });
}

fn default_level(verbose: bool) -> log::LevelFilter {
    if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    }
}
