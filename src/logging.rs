//! Tracing subscriber setup for hosts embedding the console core.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,import_console=debug";

/// Installs a stderr fmt subscriber. `RUST_LOG` takes precedence over
/// `filter`; `None` falls back to `info,import_console=debug`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_logging(filter: Option<&str>) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("import console logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        let _ = init_logging(Some("warn"));
        assert!(!init_logging(None));
    }
}
