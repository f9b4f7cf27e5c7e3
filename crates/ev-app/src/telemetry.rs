//! Opt-in log output for hosts embedding the dashboard.
//!
//! The library only emits `tracing` events. Hosts either install their own
//! subscriber or call [`init_tracing`] once at startup with the loaded
//! [`AppConfig`].

use crate::config::AppConfig;

const FALLBACK_FILTER: &str = "info";

/// The filter directive to install: `RUST_LOG` when set, else the config's
/// `log_filter`, else `info`.
pub fn filter_directive(config: &AppConfig, rust_log: Option<&str>) -> String {
    [rust_log, Some(config.log_filter.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or(FALLBACK_FILTER)
        .to_string()
}

/// Install a compact `fmt` subscriber filtered per [`filter_directive`].
///
/// Returns `false` without the `telemetry` feature, or when the host already
/// installed a global subscriber. An unparsable directive falls back to
/// `info`.
#[must_use]
pub fn init_tracing(config: &AppConfig) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let rust_log = std::env::var("RUST_LOG").ok();
        let directive = filter_directive(config, rust_log.as_deref());
        let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(FALLBACK_FILTER));
        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(filter = %directive, "tracing initialized");
        }
        installed
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = config;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(filter: &str) -> AppConfig {
        AppConfig {
            log_filter: filter.into(),
            ..AppConfig::default()
        }
    }

    #[test]
    fn config_filter_is_used() {
        assert_eq!(filter_directive(&config("ev_store=debug"), None), "ev_store=debug");
    }

    #[test]
    fn rust_log_wins_over_config() {
        assert_eq!(filter_directive(&config("ev_store=debug"), Some("warn")), "warn");
    }

    #[test]
    fn blank_values_fall_back() {
        assert_eq!(filter_directive(&config("ev_app=trace"), Some("  ")), "ev_app=trace");
        assert_eq!(filter_directive(&config(""), None), "info");
    }

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn disabled_without_feature() {
        assert!(!init_tracing(&AppConfig::default()));
    }
}
