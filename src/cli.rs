use std::path::PathBuf;

use clap::Parser;

/// Command-line interface definition.
/// Provides options for sourcing the domain list, tuning the scan and
/// persisting results.
///
/// Verbosity levels:
/// 0 - findings only
/// 1 - progress (default)
/// 2 - warnings + progress
/// 5 - trace/debug
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Check crossdomain.xml files for wildcard grants and expired (hijackable) domains"
)]
pub struct Cli {
    /// Domains to check
    #[arg(long, short = 'd', value_name = "DOMAIN", num_args = 1..)]
    pub domains: Vec<String>,

    /// Input file containing one domain per line
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Read domains from Alexa-formatted csv file(s) (rank,domain)
    #[arg(long, short = 'a', value_name = "CSV", num_args = 1..)]
    pub alexa: Vec<PathBuf>,

    /// Randomize the order in which hosts are scanned
    #[arg(long = "randomize-hosts", short = 'r')]
    pub randomize: bool,

    /// Output file to store the results
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// HTTP request timeout in seconds
    #[arg(long = "http-timeout", short = 't', default_value_t = 3)]
    pub http_timeout: u64,

    /// Maximum concurrent domain pipelines
    #[arg(long, short = 'c', default_value_t = 16)]
    pub concurrency: usize,

    /// Verbosity level (0,1,2,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are warning-level messages enabled?
    pub fn warn_enabled(&self) -> bool {
        self.verbose >= 2
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }
}
