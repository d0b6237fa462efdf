//! JSON-lines front end for the search worker.
//!
//! Reads one wire message per line from stdin, forwards it to the worker and
//! prints every current `result` to stdout as one JSON line. Logs go to
//! stderr; the level is taken from `CHESS_BOT_LOG` (default `warn`).

use std::env;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::filter::LevelFilter;

use chess_bot::board::{SearchOptions, Strategy};
use chess_bot::engine::{SearchWorker, WorkerConfig, WorkerMessage};

const USAGE: &str = "usage: chess_bot [--depth N] [--nodes N] [--breadth N] \
                     [--strategy minimax|greedy|random] [--seed N]";

const LOG_ENV: &str = "CHESS_BOT_LOG";

/// Level named by `CHESS_BOT_LOG`, or `warn` when unset or unparseable.
fn log_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(LevelFilter::WARN)
}

/// Route `log` records from the library to stderr.
fn init_logging() {
    let level = log_level(env::var(LOG_ENV).ok().as_deref());
    if let Err(err) = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("failed to install logger: {err}");
    }
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} needs a value"))?;
    value
        .parse()
        .map_err(|_| format!("invalid value '{value}' for {flag}"))
}

/// `Ok(None)` means help was requested.
fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Option<WorkerConfig>, String> {
    let mut config = WorkerConfig::default();
    let mut options = SearchOptions::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--depth" => config = config.with_depth(parse_value(&arg, args.next())?),
            "--nodes" => options = options.with_node_budget(parse_value(&arg, args.next())?),
            "--breadth" => options = options.with_breadth_cap(parse_value(&arg, args.next())?),
            "--strategy" => {
                let strategy: Strategy = parse_value(&arg, args.next())?;
                config = config.with_strategy(strategy);
            }
            "--seed" => config = config.with_seed(parse_value(&arg, args.next())?),
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(Some(config.with_options(options)))
}

fn write_result(message: &WorkerMessage) {
    match message.to_json() {
        Ok(line) => {
            let mut out = io::stdout().lock();
            if writeln!(out, "{line}").and_then(|()| out.flush()).is_err() {
                log::warn!("failed to write result for session {}", message.session_id());
            }
        }
        Err(err) => log::error!("failed to encode result: {err}"),
    }
}

fn main() -> ExitCode {
    init_logging();

    let config = match parse_args(env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };
    log::info!(
        "depth {} nodes {} breadth {} strategy {}",
        config.depth,
        config.options.node_budget,
        config.options.breadth_cap,
        config.strategy
    );

    let worker = match SearchWorker::spawn(config, |message| write_result(&message)) {
        Ok(worker) => worker,
        Err(err) => {
            eprintln!("failed to start search worker: {err}");
            return ExitCode::FAILURE;
        }
    };

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("failed to read stdin: {err}");
                return ExitCode::FAILURE;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let message = match WorkerMessage::from_json(line) {
            Ok(message) => message,
            Err(err) => {
                log::error!("{err}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(err) = worker.post(message) {
            log::error!("{err}");
            break;
        }
    }

    match worker.shutdown() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
