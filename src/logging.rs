//! Tracing setup for the command-line tool.
//!
//! Terminal output goes to stderr so stdout stays clean for CSV results.
//! Verbosity flags win over `RUST_LOG`; without them `RUST_LOG` is honoured
//! and the default level is WARN.

use std::sync::OnceLock;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Colored human-readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
    /// Single-line format
    Compact,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    /// INFO level
    pub verbose: bool,
    /// DEBUG level
    pub debug: bool,
    /// ERROR only
    pub quiet: bool,
    pub format: LogFormat,
}

impl LoggingConfig {
    fn level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else if self.debug {
            Level::DEBUG
        } else if self.verbose {
            Level::INFO
        } else {
            Level::WARN
        }
    }

    fn explicit(&self) -> bool {
        self.verbose || self.debug || self.quiet
    }

    pub fn filter(&self) -> EnvFilter {
        let directive = format!(
            "payment_tokenizer={},warn",
            self.level().as_str().to_lowercase()
        );
        if self.explicit() {
            EnvFilter::new(directive)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
        }
    }
}

static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Installs the global subscriber. Later calls are ignored.
pub fn init_tracing(config: LoggingConfig) {
    if TRACING_INITIALIZED.get().is_some() {
        return;
    }

    let filter = config.filter();
    let result = match config.format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_ansi(true)
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .try_init(),
    };
    if let Err(e) = result {
        eprintln!("Warning: failed to install tracing subscriber: {e}");
    }

    let _ = TRACING_INITIALIZED.set(());
}
