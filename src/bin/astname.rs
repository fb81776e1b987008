//! Asteroid identifier lookup
//!
//! Resolves asteroid numbers, NAIFIDs, names and provisional designations
//! against the JPL DASTCOM index file, downloading the index on first use and
//! refreshing it once it is older than 30 days.
//!
//! Usage:
//!   cargo run --bin astname -- 64 79 Angelina "1976 YG"

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{ArgAction, CommandFactory, Parser};
use log::debug;

use astname::data::{freshness, Freshness};
use astname::report::{write_footer, write_json, write_matches};
use astname::{
    classify, ensure_fresh, AstnameError, CacheStatus, Config, Fetch, HttpFetcher, IndexFile,
    IndexSource, Query, Result, StaleReason,
};

const EXAMPLES: &str = "\
Examples:
  astname 64
  astname 64 79
  astname Angelina
Use double quotes if special characters are present in the asteroid name:
  astname \"Prokof'ev\"
Use double quotes also when searching for a provisional designation:
  astname \"1976 YG\"
In extreme cases use backslashes to make the input reach the program intact:
  astname \"G\\!kun\\|\\|\\'homdima\"
Integers between 2000000 and 50000000 are treated as NAIFIDs, other integers
as asteroid numbers. Decimal numbers are refused. The search is not case
sensitive. Pass --help anywhere on the command line to print this text.";

/// Asteroid name, number and NAIFID lookup
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Looks up asteroid numbers, names, NAIFIDs and provisional designations in the JPL DASTCOM index",
    long_about = None,
    after_help = EXAMPLES,
    disable_help_flag = true
)]
struct Args {
    /// Directory holding the cached DASTCOM.IDX
    #[arg(long, env = "ASTNAME_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// URL the index file is downloaded from
    #[arg(long, env = "ASTNAME_INDEX_URL")]
    index_url: Option<String>,

    /// Re-download the index once it is older than this many days
    #[arg(long, env = "ASTNAME_MAX_AGE_DAYS", default_value_t = 30)]
    max_age_days: u64,

    /// HTTP timeout for the download, in seconds
    #[arg(long, default_value_t = 600)]
    timeout_secs: u64,

    /// Print one JSON object per query instead of text blocks
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print usage and exit
    #[arg(long, action = ArgAction::SetTrue, hide = true)]
    help: bool,

    /// Asteroid numbers, NAIFIDs, names or provisional designations
    #[arg(allow_negative_numbers = true)]
    tokens: Vec<String>,
}

impl Args {
    fn config(&self) -> Config {
        let mut config = Config::new()
            .with_max_age(Duration::from_secs(self.max_age_days.saturating_mul(86_400)))
            .with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir);
        }
        if let Some(url) = &self.index_url {
            config = config.with_index_url(url.as_str());
        }
        config
    }
}

/// What the command line asks for once every token has been classified
#[derive(Debug, PartialEq)]
enum Plan<'a> {
    Help,
    Lookup(Vec<(&'a str, Query)>),
}

/// Classify all tokens up front so bad input is refused before any download
fn plan(tokens: &[String], help: bool) -> Result<Plan<'_>> {
    if help {
        return Ok(Plan::Help);
    }
    if tokens.is_empty() {
        return Err(AstnameError::NoInput);
    }

    let mut queries = Vec::with_capacity(tokens.len());
    for (i, token) in tokens.iter().enumerate() {
        if token == "--help" {
            return Ok(Plan::Help);
        }
        let query = classify(token);
        if query.is_rejected() {
            return Err(AstnameError::InvalidInput {
                position: i + 1,
                token: token.clone(),
            });
        }
        queries.push((token.as_str(), query));
    }
    Ok(Plan::Lookup(queries))
}

fn print_usage() {
    let mut command = Args::command();
    println!("{}", command.render_help());
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Bring the cached index up to date, telling the user what is going on.
///
/// The fetcher is only built when the index is missing or stale.
fn prepare_index<F, M>(config: &Config, make_fetcher: M) -> Result<IndexFile>
where
    F: Fetch,
    M: FnOnce(&Config) -> Result<F>,
{
    let source = IndexSource::from(config);

    match freshness(&source)? {
        Freshness::Fresh(age) => {
            debug!("Index file is {} days old", age.as_secs() / 86_400);
            return IndexFile::open(source.path());
        }
        Freshness::Missing => println!("No index file was found! Downloading..."),
        Freshness::Stale(_) => println!(
            "Index file {} is older than {} days! Downloading...",
            source.path().display(),
            source.max_age().as_secs() / 86_400
        ),
    }

    let fetcher = make_fetcher(config)?;
    match &ensure_fresh(&fetcher, &source)? {
        CacheStatus::KeptStale {
            reason: StaleReason::FetchFailed(reason),
        } => {
            println!("{}", reason);
            println!("Download failed! Using old index file...");
        }
        CacheStatus::KeptStale {
            reason: StaleReason::Undersized { old_size, new_size },
        } => {
            println!(
                "Warning! The downloaded index file is smaller than the old one ({} < {} bytes). Using old index file...",
                new_size, old_size
            );
        }
        other => debug!("Index status: {:?}", other),
    }

    IndexFile::open(source.path())
}

fn run(args: &Args) -> Result<()> {
    let queries = match plan(&args.tokens, args.help)? {
        Plan::Help => {
            print_usage();
            return Ok(());
        }
        Plan::Lookup(queries) => queries,
    };

    let index = prepare_index(&args.config(), |config| HttpFetcher::new(config.timeout()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (token, query) in &queries {
        let records = index.find(query)?;
        if args.json {
            write_json(&mut out, token, &records)?;
        } else {
            write_matches(&mut out, token, &records)?;
        }
    }
    if !args.json {
        write_footer(&mut out)?;
    }
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            if matches!(e, AstnameError::InvalidInput { .. }) {
                print_usage();
            }
            ExitCode::FAILURE
        }
    }
}
