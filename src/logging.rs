use std::backtrace::Backtrace;

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(rust_log: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(rust_log));
    if fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
        return;
    }
    set_panic_hook();
}

fn set_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let message = if let Some(message) = info.payload().downcast_ref::<&str>() {
            *message
        } else if let Some(message) = info.payload().downcast_ref::<String>() {
            message.as_str()
        } else {
            "unknown panic"
        };

        let backtrace = Backtrace::capture();

        match info.location() {
            Some(location) => tracing::error!(
                panic = %message,
                location = %location,
                backtrace = %backtrace,
                "panic"
            ),
            None => tracing::error!(panic = %message, backtrace = %backtrace, "panic"),
        }
    }));
}
