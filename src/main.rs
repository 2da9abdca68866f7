use std::sync::Arc;

use rand::seq::SliceRandom;

use xdscan::cli::Cli;
use xdscan::config::Config;
use xdscan::errors::Result;
use xdscan::inputs::gather_domains;
use xdscan::output::write_report;
use xdscan::{ConsoleObserver, HttpPolicyFetcher, LivenessClassifier, Scanner};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Load configuration
    let mut config = Config::from_env();
    config.merge_with_cli(&cli);

    if let Err(e) = config.validate() {
        if cli.error_enabled() {
            eprintln!("Configuration error: {}", e);
        }
        std::process::exit(2);
    }

    // Assemble the candidate list from every input source
    let (mut domains, rejected) = gather_domains(&cli)?;
    if cli.warn_enabled() {
        for entry in &rejected {
            eprintln!("Skipping unusable input entry: {entry}");
        }
    }
    if domains.is_empty() {
        if cli.error_enabled() {
            eprintln!("Error: no domains to scan. Use --domains, --input or --alexa.");
        }
        std::process::exit(2);
    }
    if cli.randomize {
        domains.shuffle(&mut rand::rng());
    }

    let observer = Arc::new(ConsoleObserver::new(cli.verbose, cli.no_color));
    let fetcher = Arc::new(HttpPolicyFetcher::new(&config.network)?);
    let classifier = Arc::new(LivenessClassifier::new(&config.network));

    let scanner = Scanner::new(
        domains,
        config.scan.concurrency,
        fetcher,
        classifier,
        observer.clone(),
    );

    // An OS interrupt becomes a cooperative cancel: dispatch stops, the
    // in-flight pipelines drain, and partial results are still persisted.
    let cancel = scanner.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nUser exit.");
            cancel.cancel();
        }
    });

    let report = scanner.run().await?;

    observer.formatter().print_summary(&report);

    if let Some(ref path) = cli.output {
        write_report(path, &report.results)?;
        if cli.error_enabled() {
            println!("Results written to {}", path.display());
        }
    }

    Ok(())
}
