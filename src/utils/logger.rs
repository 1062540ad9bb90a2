use tracing_subscriber::fmt::time::uptime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset; other crates only surface warnings.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "cruise_prices=debug,lettre=info,warn"
    } else {
        "cruise_prices=info,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// One run is short; elapsed time since start reads better than wall-clock
/// stamps when judging how long the page took to render.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(uptime())
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .without_time()
                .json()
                // CloudWatch 已有時間戳，欄位攤平方便查詢
                .flatten_event(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "cruise_prices=info,warn");
        assert!(default_directives(true).starts_with("cruise_prices=debug"));
    }

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            assert!(default_directives(verbose)
                .parse::<EnvFilter>()
                .is_ok());
        }
    }
}
