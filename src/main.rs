// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! `freqsetgen`: command-line front end.
//!
//! ```text
//! freqsetgen [options] N "POOL" ["MANDATORY"] [MIN_SEP] [MAX_SECS] [checkInstances]
//! freqsetgen [options] --config REQUEST.json [N "POOL" ...]
//! freqsetgen table F1 F2 ...
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use freqset_search::engine::{install_signal_handler, PsCensus};
use freqset_search::error::{ConfigError, FreqSetResult, ParseError};
use freqset_search::freq::{parse_freq_list, sort_dedup};
use freqset_search::logging::{init_subscriber, Verbosity};
use freqset_search::snapshot::{FileSink, ReportFormat, ResultSink, SearchReport};
use freqset_search::{imd, run_search, CancellationToken, DriverState, SearchRequest};

const DEFAULT_OUTPUT_DIR: &str = "fsgresults";
const CHECK_INSTANCES_ARG: &str = "checkInstances";

fn usage() {
    eprintln!(
        "Usage:\n  \
  freqsetgen [--out PATH] [--format json|text] [--config FILE.json] [-v|-q] \
N \"POOL\" [\"MANDATORY\"] [MIN_SEP] [MAX_SECS] [checkInstances]\n  \
  freqsetgen table F1 F2 ...\n\n  \
  Frequency lists are separated by spaces or commas, e.g. \"5645 5685 5760\""
    );
}

enum Command {
    Search(Vec<String>),
    Table(Vec<String>),
}

struct CliArgs {
    out: Option<PathBuf>,
    format: ReportFormat,
    config: Option<PathBuf>,
    verbosity: Verbosity,
    command: Command,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self, ParseError> {
        let mut out = None;
        let mut format = ReportFormat::default();
        let mut config = None;
        let mut verbose = false;
        let mut quiet = false;
        let mut positional = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--out" | "-o" => {
                    let value = iter.next().ok_or(ParseError::MissingArgument("--out PATH"))?;
                    out = Some(PathBuf::from(value));
                }
                "--format" => {
                    let value = iter
                        .next()
                        .ok_or(ParseError::MissingArgument("--format json|text"))?;
                    format = ReportFormat::from_str(value)
                        .map_err(|_| ParseError::UnknownOption(format!("--format {value}")))?;
                }
                "--config" => {
                    let value = iter
                        .next()
                        .ok_or(ParseError::MissingArgument("--config FILE"))?;
                    config = Some(PathBuf::from(value));
                }
                "-v" | "--verbose" => verbose = true,
                "-q" | "--quiet" => quiet = true,
                flag if flag.starts_with("--") => {
                    return Err(ParseError::UnknownOption(flag.to_owned()));
                }
                _ => positional.push(arg.clone()),
            }
        }

        let command = if positional.first().is_some_and(|first| first == "table") {
            Command::Table(positional.split_off(1))
        } else if positional.is_empty() && config.is_none() {
            return Err(ParseError::MissingArgument("number of frequencies"));
        } else {
            Command::Search(positional)
        };
        Ok(Self {
            out,
            format,
            config,
            verbosity: Verbosity::from_flags(verbose, quiet),
            command,
        })
    }
}

fn parse_number<T: FromStr<Err = std::num::ParseIntError>>(token: &str) -> Result<T, ParseError> {
    let token = token.trim();
    token.parse().map_err(|source| ParseError::InvalidNumber {
        token: token.to_owned(),
        source,
    })
}

/// Request from an optional JSON file, overridden by positional arguments.
fn build_request(config: Option<&Path>, positional: &[String]) -> FreqSetResult<SearchRequest> {
    let mut request = match config {
        Some(path) => SearchRequest::from_json_file(path)?,
        None => SearchRequest::default(),
    };
    let required = config.is_none();
    let mut args = positional.iter();

    match args.next() {
        Some(token) => {
            let requested: i64 = parse_number(token)?;
            request.set_size = usize::try_from(requested)
                .map_err(|_| ConfigError::SetSizeTooSmall { requested })?;
        }
        None if required => return Err(ParseError::MissingArgument("number of frequencies").into()),
        None => {}
    }
    match args.next() {
        Some(token) => request.candidates = parse_freq_list(token)?,
        None if required => return Err(ParseError::MissingArgument("possible frequencies").into()),
        None => {}
    }
    if let Some(token) = args.next() {
        request.mandatory = parse_freq_list(token)?;
    }
    if let Some(token) = args.next() {
        request.min_separation = parse_number(token)?;
    }
    if let Some(token) = args.next() {
        request.max_run_time_secs = parse_number(token)?;
    }
    if let Some(token) = args.next() {
        request.check_instances = token == CHECK_INSTANCES_ARG;
    }
    if let Some(extra) = args.next() {
        return Err(ParseError::UnknownOption(extra.clone()).into());
    }
    Ok(request)
}

fn default_output_path(format: ReportFormat) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    Path::new(DEFAULT_OUTPUT_DIR).join(format!("r{}.{}", millis, format.extension()))
}

fn print_table(tokens: &[String]) -> ExitCode {
    let freqs = match parse_freq_list(&tokens.join(" ")) {
        Ok(freqs) => sort_dedup(&freqs),
        Err(err) => {
            println!("Error parsing numeric input:  {err}");
            return ExitCode::FAILURE;
        }
    };
    if freqs.is_empty() {
        usage();
        return ExitCode::FAILURE;
    }
    print!("{}", imd::rate(&freqs));
    ExitCode::SUCCESS
}

fn search(cli: &CliArgs, positional: &[String]) -> ExitCode {
    let path = cli
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(cli.format));
    let mut sink = FileSink::new(&path, cli.format);

    let request = match build_request(cli.config.as_deref(), positional) {
        Ok(request) => request,
        Err(err) => {
            let message = err.status_message();
            println!("{message}");
            sink.publish(&SearchReport::failure(message), true);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let listener = match install_signal_handler(&cancel) {
        Ok(listener) => Some(listener),
        Err(err) => {
            warn!(error = %err, "continuing without signal handling");
            None
        }
    };
    let outcome = run_search(&request, Some(&PsCensus), &mut sink, &cancel);
    if let Some(listener) = listener {
        listener.stop();
    }

    if let Some(message) = &outcome.message {
        println!("{message}");
    }
    if outcome.state != DriverState::Failed {
        println!("------------------------------------------");
        for entry in &outcome.entries {
            println!("{entry}");
        }
    }
    info!(path = %path.display(), state = %outcome.state, "results written");

    if outcome.state == DriverState::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            usage();
            return ExitCode::from(2);
        }
    };
    init_subscriber(cli.verbosity);

    match &cli.command {
        Command::Table(tokens) => print_table(tokens),
        Command::Search(positional) => search(&cli, positional),
    }
}
