//! gridroute: route through waypoints on an obstacle grid from the command line.
//!
//! Reads a JSON request (file or stdin), writes a JSON response (file or
//! stdout). An unreachable waypoint still produces a response with
//! `"success": false` and exit status 0; malformed requests exit with 2 and
//! engine faults with 1.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use gridroute_paths::{
    ErrorKind, PathFindingResult, RouteError, RouteRequest, SearchLimits, WaypointRouter,
};

/// Exit status for a request the engine rejected as malformed.
const EXIT_INVALID_REQUEST: u8 = 2;
/// Exit status for any other failure.
const EXIT_INTERNAL: u8 = 1;

/// Compute a route visiting waypoints in order on an obstacle grid
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Request file (JSON). Reads stdin when omitted
    #[clap(long, short, value_parser)]
    input: Option<PathBuf>,

    /// Response file. Writes stdout when omitted
    #[clap(long, short, value_parser)]
    output: Option<PathBuf>,

    /// Search limits file (JSON: {"maxExpansions": N, "timeBudgetMs": N})
    #[clap(long, value_parser)]
    limits: Option<PathBuf>,

    /// Abort after expanding this many nodes across all segments
    #[clap(long)]
    max_expansions: Option<usize>,

    /// Abort after this many milliseconds of routing
    #[clap(long)]
    time_budget_ms: Option<u64>,

    /// Pretty-print the response
    #[clap(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let limits = load_limits(args)?;
    let input = read_input(args.input.as_deref())?;

    let result = route_json(&input, limits)?;
    log::info!(
        "success={} cells={} nodes_explored={} time={:.3}ms",
        result.success,
        result.path.len(),
        result.nodes_explored,
        result.execution_time_ms
    );

    let body = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .context("failed to encode response")?;
    write_output(args.output.as_deref(), &body)
}

/// Parse a request and route it.
fn route_json(input: &str, limits: SearchLimits) -> Result<PathFindingResult> {
    let request: RouteRequest =
        serde_json::from_str(input).context("request is not a valid route request")?;
    let result = WaypointRouter::with_limits(limits)
        .route(&request)
        .context("routing failed")?;
    Ok(result)
}

/// Limits from `--limits`, overridden by the individual flags.
fn load_limits(args: &Args) -> Result<SearchLimits> {
    let mut limits = match &args.limits {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read limits file {}", path.display()))?;
            let limits: SearchLimits = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse limits file {}", path.display()))?;
            log::info!("Loaded search limits from {}", path.display());
            limits
        }
        None => SearchLimits::default(),
    };
    if let Some(n) = args.max_expansions {
        limits.max_expansions = Some(n);
    }
    if let Some(ms) = args.time_budget_ms {
        limits.time_budget_ms = Some(ms);
    }
    log::debug!("search limits: {limits:?}");
    Ok(limits)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, body: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, format!("{body}\n"))
            .with_context(|| format!("failed to write response to {}", path.display())),
        None => {
            let mut out = io::stdout().lock();
            writeln!(out, "{body}").context("failed to write response to stdout")
        }
    }
}

/// Map a failure to an exit status: malformed requests are the caller's
/// fault, everything else is ours.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    if let Some(route_err) = err.downcast_ref::<RouteError>() {
        return match route_err.kind() {
            ErrorKind::Validation => EXIT_INVALID_REQUEST,
            ErrorKind::Internal => EXIT_INTERNAL,
        };
    }
    if let Some(json_err) = err.downcast_ref::<serde_json::Error>() {
        if json_err.is_syntax() || json_err.is_data() || json_err.is_eof() {
            return EXIT_INVALID_REQUEST;
        }
    }
    EXIT_INTERNAL
}
