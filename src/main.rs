use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payment_tokenizer::application::card::CardClient;
use payment_tokenizer::application::dispatch::TokenizeDispatcher;
use payment_tokenizer::config::{Authorization, ClientConfig};
use payment_tokenizer::context::ClientContext;
use payment_tokenizer::domain::ports::TokenizationClientRef;
use payment_tokenizer::infrastructure::analytics::TracingAnalyticsReporter;
use payment_tokenizer::infrastructure::http::HttpTokenizationClient;
use payment_tokenizer::infrastructure::risk::RiskDataCollector;
use payment_tokenizer::infrastructure::sandbox::SandboxGateway;
use payment_tokenizer::interfaces::csv::card_reader::CardReader;
use payment_tokenizer::interfaces::csv::result_writer::ResultWriter;
use payment_tokenizer::logging::{LogFormat, LoggingConfig, init_tracing};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input cards CSV file
    input: PathBuf,

    /// Merchant configuration JSON. Defaults to a sandbox configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tokenization key or client authorization fingerprint
    #[arg(long, default_value = "sandbox_localcli_sandboxmerchant")]
    authorization: String,

    /// Gateway client API URL. Without it the built-in sandbox gateway is used.
    #[arg(long)]
    gateway_url: Option<String>,

    /// Log at INFO level
    #[arg(short, long)]
    verbose: bool,

    /// Log at DEBUG level, including invocation state transitions
    #[arg(short, long)]
    debug: bool,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(LoggingConfig {
        verbose: cli.verbose,
        debug: cli.debug,
        quiet: cli.quiet,
        format: cli.log_format,
    });

    let authorization = Authorization::parse(&cli.authorization).into_diagnostic()?;
    let config = match &cli.config {
        Some(path) => ClientConfig::from_path(path).into_diagnostic()?,
        None => ClientConfig::from_authorization(&authorization),
    };

    let tokenization: TokenizationClientRef = match &cli.gateway_url {
        Some(url) => Arc::new(
            HttpTokenizationClient::new(config.request_timeout())
                .into_diagnostic()?
                .with_base_url(url),
        ),
        None => Arc::new(SandboxGateway::new()),
    };

    // Drain risk submissions in the background
    let (collector, mut submissions) = RiskDataCollector::new(64);
    tokio::spawn(async move {
        while let Some(data) = submissions.recv().await {
            tracing::debug!(nonce = %data.nonce, correlation_id = %data.correlation_id, "risk data submitted");
        }
    });

    let dispatcher = TokenizeDispatcher::new(
        tokenization,
        Arc::new(collector),
        Arc::new(TracingAnalyticsReporter),
    );
    let client = CardClient::new(dispatcher);
    let context = ClientContext::new(config, authorization);

    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CardReader::new(file);
    let stdout = io::stdout();
    let mut writer = ResultWriter::new(stdout.lock());

    for (index, card_result) in reader.cards().enumerate() {
        let row = index + 1;
        match card_result {
            Ok(card) => {
                let mut outcome = None;
                client
                    .tokenize(&context, card, |result| outcome = Some(result))
                    .await;
                if let Some(outcome) = outcome {
                    writer.write_outcome(row, &outcome).into_diagnostic()?;
                }
            }
            Err(e) => {
                eprintln!("Error reading card row {}: {}", row, e);
            }
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}
