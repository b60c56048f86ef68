use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub const LOG_ENV: &str = "DOCSENSE_LOG";

/// Filter directive for a `-v` count: 0 → warn, 1 → info, 2+ → debug.
pub fn filter_for_verbosity(verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    format!("docsense={level},sqlx=warn")
}

/// Install the stderr fmt subscriber.
///
/// `DOCSENSE_LOG` wins over `-v`; it takes a plain level ("debug") or a full
/// filter directive ("docsense=trace,sqlx=info").
pub fn init_tracing(verbosity: u8) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(level) if is_plain_level(&level) => {
            format!("docsense={}", level.trim().to_ascii_lowercase())
        }
        Ok(directive) if !directive.trim().is_empty() => directive,
        _ => filter_for_verbosity(verbosity),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 1)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(filter_for_verbosity(0), "docsense=warn,sqlx=warn");
        assert_eq!(filter_for_verbosity(1), "docsense=info,sqlx=warn");
        assert_eq!(filter_for_verbosity(4), "docsense=debug,sqlx=warn");
    }

    #[test]
    fn plain_levels() {
        assert!(is_plain_level("DEBUG"));
        assert!(!is_plain_level("docsense=debug"));
    }
}
