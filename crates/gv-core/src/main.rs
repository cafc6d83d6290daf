//! gv - Gamma distribution sampler and evaluator.
//!
//! Draws variates from Gamma(shape, scale) and evaluates its density and
//! cumulative distribution. Payloads go to stdout, logs to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};
use gv_core::config::{load_config, ResolvedConfig};
use gv_core::exit_codes::ExitCode;
use gv_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel};
use gv_core::{GammaError, GammaParams, GammaVariate, NumericalGamma, RngSource};
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Gamma distribution sampler and evaluator
#[derive(Parser)]
#[command(name = "gv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log format on stderr
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Single JSON document on stdout
    Json,
    /// Plain text, one value per line
    Human,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw variates from Gamma(shape, scale)
    Sample(SampleArgs),

    /// Evaluate the density at one or more points
    Pdf(PdfArgs),

    /// Evaluate the cumulative distribution at one or more points
    Cdf(CdfArgs),

    /// Print summary statistics of Gamma(shape, scale)
    Describe(ParamArgs),
}

#[derive(Args, Debug)]
struct ParamArgs {
    /// Shape parameter a (alpha, k), > 0
    #[arg(long, short = 'a', allow_negative_numbers = true)]
    shape: f64,

    /// Scale parameter b (theta = 1/beta), > 0
    #[arg(long, short = 'b', allow_negative_numbers = true)]
    scale: f64,
}

#[derive(Args, Debug)]
struct SampleArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Number of variates to draw
    #[arg(long, short = 'n', default_value_t = 1)]
    count: u64,

    /// Seed for a reproducible stream (overrides config and GV_SEED)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct PdfArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Report ln f(x) instead of f(x)
    #[arg(long)]
    log: bool,

    /// Points to evaluate
    #[arg(required = true, allow_negative_numbers = true)]
    x: Vec<f64>,
}

#[derive(Args, Debug)]
struct CdfArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Report the survival function 1 - F(x) instead of F(x)
    #[arg(long)]
    upper: bool,

    /// Points to evaluate
    #[arg(required = true, allow_negative_numbers = true)]
    x: Vec<f64>,
}

fn main() {
    let cli = Cli::parse();

    let resolved = load_config(cli.global.config.as_deref());

    let cli_level = if cli.global.quiet {
        Some(LogLevel::Error)
    } else if cli.global.verbose > 0 {
        let base = resolved
            .as_ref()
            .ok()
            .and_then(|r| r.config.logging.level)
            .unwrap_or_default();
        Some((0..cli.global.verbose).fold(base, |level, _| level.louder()))
    } else {
        None
    };

    let mut log_config = LogConfig::default();
    if let Ok(r) = &resolved {
        if let Some(level) = r.config.logging.level {
            log_config = log_config.with_level(level);
        }
        if let Some(format) = r.config.logging.format {
            log_config = log_config.with_format(format);
        }
    }
    init_logging(&log_config.layered(cli_level, cli.global.log_format));

    let resolved = match resolved {
        Ok(r) => r,
        Err(e) => {
            let exit_code = output_error(&cli.global, &GammaError::from(e));
            std::process::exit(exit_code.as_i32());
        }
    };
    info!(
        event = event_names::CONFIG_LOADED,
        source = %resolved.source,
        path = ?resolved.path,
        max_iterations = resolved.config.sampler.max_iterations,
        seed = ?resolved.config.sampler.seed,
        "configuration resolved"
    );

    let exit_code = match &cli.command {
        Commands::Sample(args) => run_sample(&cli.global, &resolved, args),
        Commands::Pdf(args) => run_pdf(&cli.global, args),
        Commands::Cdf(args) => run_cdf(&cli.global, args),
        Commands::Describe(args) => run_describe(&cli.global, args),
    };

    std::process::exit(exit_code.as_i32());
}

fn run_sample(global: &GlobalOpts, resolved: &ResolvedConfig, args: &SampleArgs) -> ExitCode {
    let sampler = &resolved.config.sampler;
    let seed = args.seed.or(sampler.seed);
    let source = match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_os(),
    };
    let variate = GammaVariate::new(&source, &source, NumericalGamma)
        .with_max_iterations(sampler.max_iterations);

    let (a, b) = (args.params.shape, args.params.scale);
    let draws = match variate.samples(a, b) {
        Ok(iter) => {
            debug!(
                event = event_names::BATCH_STARTED,
                shape = a,
                scale = b,
                count = args.count,
                seed = ?seed,
                "sampling"
            );
            iter.take(usize::try_from(args.count).unwrap_or(usize::MAX))
                .collect::<Result<Vec<f64>, _>>()
        }
        Err(e) => Err(e),
    };
    let draws = match draws {
        Ok(draws) => draws,
        Err(e) => return output_error(global, &e),
    };
    debug!(
        event = event_names::BATCH_FINISHED,
        count = draws.len(),
        "sampling done"
    );

    let payload = json!({
        "command": "sample",
        "shape": a,
        "scale": b,
        "seed": seed,
        "count": draws.len(),
        "samples": draws,
    });
    emit(global, &payload, |out| {
        for x in &draws {
            writeln!(out, "{}", x)?;
        }
        Ok(())
    })
}

fn run_pdf(global: &GlobalOpts, args: &PdfArgs) -> ExitCode {
    let variate = GammaVariate::thread_local();
    let (a, b) = (args.params.shape, args.params.scale);
    let function = if args.log { "log_pdf" } else { "pdf" };
    evaluate(global, function, a, b, &args.x, |x| {
        if args.log {
            variate.log_pdf(x, a, b)
        } else {
            variate.pdf(x, a, b)
        }
    })
}

fn run_cdf(global: &GlobalOpts, args: &CdfArgs) -> ExitCode {
    let variate = GammaVariate::thread_local();
    let (a, b) = (args.params.shape, args.params.scale);
    let function = if args.upper { "survival" } else { "cdf" };
    evaluate(global, function, a, b, &args.x, |x| {
        if args.upper {
            variate.survival(x, a, b)
        } else {
            variate.cdf(x, a, b)
        }
    })
}

fn evaluate(
    global: &GlobalOpts,
    function: &str,
    a: f64,
    b: f64,
    points: &[f64],
    f: impl Fn(f64) -> gv_core::Result<f64>,
) -> ExitCode {
    let values = match points.iter().map(|&x| f(x)).collect::<Result<Vec<f64>, _>>() {
        Ok(values) => values,
        Err(e) => return output_error(global, &e),
    };

    let rows: Vec<_> = points
        .iter()
        .zip(&values)
        .map(|(x, value)| json!({ "x": x, "value": value }))
        .collect();
    let payload = json!({
        "command": function,
        "shape": a,
        "scale": b,
        "points": rows,
    });
    emit(global, &payload, |out| {
        for (x, value) in points.iter().zip(&values) {
            writeln!(out, "{}\t{}", x, value)?;
        }
        Ok(())
    })
}

fn run_describe(global: &GlobalOpts, args: &ParamArgs) -> ExitCode {
    let params = match GammaParams::new(args.shape, args.scale) {
        Ok(params) => params,
        Err(e) => return output_error(global, &e),
    };

    let payload = json!({
        "command": "describe",
        "shape": params.shape(),
        "scale": params.scale(),
        "rate": 1.0 / params.scale(),
        "mean": params.mean(),
        "variance": params.variance(),
        "std_dev": params.variance().sqrt(),
        "skewness": params.skewness(),
        "excess_kurtosis": params.excess_kurtosis(),
    });
    emit(global, &payload, |out| {
        writeln!(out, "shape:           {}", params.shape())?;
        writeln!(out, "scale:           {}", params.scale())?;
        writeln!(out, "rate:            {}", 1.0 / params.scale())?;
        writeln!(out, "mean:            {}", params.mean())?;
        writeln!(out, "variance:        {}", params.variance())?;
        writeln!(out, "std_dev:         {}", params.variance().sqrt())?;
        writeln!(out, "skewness:        {}", params.skewness())?;
        writeln!(out, "excess_kurtosis: {}", params.excess_kurtosis())
    })
}

/// Write a payload to stdout in the selected format.
fn emit(
    global: &GlobalOpts,
    payload: &serde_json::Value,
    human: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> ExitCode {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let written = match global.format {
        OutputFormat::Json => serde_json::to_writer_pretty(&mut out, payload)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(out)),
        OutputFormat::Human => human(&mut out),
    };
    match written.and_then(|()| out.flush()) {
        Ok(()) => ExitCode::Clean,
        Err(e) => {
            eprintln!("gv: failed to write output: {}", e);
            ExitCode::IoError
        }
    }
}

/// Report an error on stderr in the selected format.
fn output_error(global: &GlobalOpts, error: &GammaError) -> ExitCode {
    let exit_code = ExitCode::from(error);
    match global.format {
        OutputFormat::Json => {
            let response = json!({
                "status": "error",
                "exit_code": exit_code.code_name(),
                "error": error.report(),
            });
            eprintln!("{:#}", response);
        }
        OutputFormat::Human => {
            eprintln!("error: {}", error);
            eprintln!("hint: {}", error.remediation());
        }
    }
    exit_code
}
