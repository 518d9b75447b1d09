//! Logging setup for the terminal host.
//!
//! Logs go to stderr so the status line on stdout stays readable. The
//! filter comes from `POMOTICK_LOG` (EnvFilter syntax, default `warn`);
//! `POMOTICK_DEBUG=1` additionally raises everything under `pomotick` to
//! `debug`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Target prefixes: covers the binary, pomotick_core and the `pomotick::timer` target.
const DEBUG_DIRECTIVE: &str = "pomotick=debug";

fn filter(base: &str, debug_logging: bool) -> EnvFilter {
    let mut filter = EnvFilter::try_new(base).unwrap_or_else(|e| {
        eprintln!("ignoring invalid POMOTICK_LOG '{base}': {e}");
        EnvFilter::new("warn")
    });
    if debug_logging {
        if let Ok(directive) = DEBUG_DIRECTIVE.parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

pub fn init() {
    let base = std::env::var("POMOTICK_LOG").unwrap_or_else(|_| "warn".to_string());
    let debug_logging = std::env::var("POMOTICK_DEBUG").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let registry = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter(&base, debug_logging));
    if let Err(e) = registry.try_init() {
        eprintln!("logging already initialized: {e}");
        return;
    }

    tracing::debug!(filter = %base, debug_logging, "logging initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_adds_crate_directives() {
        let rendered = filter("warn", true).to_string();
        assert!(rendered.contains("pomotick=debug"));
        assert!(rendered.contains("warn"));
    }

    #[test]
    fn invalid_base_falls_back_to_warn() {
        let rendered = filter("pomotick=loud", false).to_string();
        assert_eq!(rendered, "warn");
    }
}
