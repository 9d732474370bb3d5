//! Tracing subscriber setup.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Directives used when `RUST_LOG` is unset.
fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "fremantle=info,fremantle_data=info,fremantle_metrics=info,fremantle_output=info,warn",
        _ => "fremantle=debug,fremantle_data=debug,fremantle_metrics=debug,fremantle_output=debug,info",
    }
}

/// Install the global subscriber. Logs go to stderr so that exported data on
/// stdout stays clean.
pub(crate) fn init(format: LogFormat, verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(e) = result {
        eprintln!("Warning: logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in 0..3 {
            assert!(default_directives(verbose).parse::<EnvFilter>().is_ok());
        }
    }
}
