use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use slog_config::SlogConfig;
use slog_core::alloc::ArenaStats;
use slog_core::sink::NullSink;
use slog_core::{call_site, Field, FieldArena, FieldBuilder, Level, Logger};
use slog_telemetry::{MeteredSink, MetricsRecorder};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write one log line built from `key=value` fields
    Emit(EmitArgs),
    /// Measure formatting throughput into a null sink
    Bench(BenchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct EmitArgs {
    /// Configuration file; defaults to config/slog.yaml and SLOG_* variables
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Level token, e.g. info, WARN or SLOG_ERROR
    #[arg(short, long, default_value = "info")]
    pub level: String,
    /// Message text
    pub message: String,
    /// Extra fields; values are typed as null, bool, integer, float or string
    pub fields: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BenchArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Lines to emit
    #[arg(long, default_value_t = 100_000)]
    pub lines: usize,
    /// Extra fields per line
    #[arg(long, default_value_t = 8)]
    pub fields: usize,
    /// Print Prometheus metrics after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

/// A command-line field value with its inferred type.
#[derive(Debug, Clone, PartialEq)]
pub enum CliValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl CliValue {
    pub fn infer(raw: &str) -> Self {
        match raw {
            "null" => return CliValue::Null,
            "true" => return CliValue::Bool(true),
            "false" => return CliValue::Bool(false),
            _ => {}
        }
        if let Ok(i) = raw.parse::<i64>() {
            return CliValue::Integer(i);
        }
        match raw.parse::<f64>() {
            Ok(x) if x.is_finite() => CliValue::Float(x),
            _ => CliValue::String(raw.to_string()),
        }
    }

    fn field<'b>(&'b self, f: FieldBuilder<'b>, key: &'b str) -> Field<'b> {
        match self {
            CliValue::Null => f.null(key),
            CliValue::Bool(b) => f.bool(key, *b),
            CliValue::Integer(i) => f.integer(key, *i),
            CliValue::Float(x) => f.float(key, *x),
            CliValue::String(s) => f.string(key, s),
        }
    }
}

/// Splits `key=value`. The value may itself contain `=`.
pub fn parse_field(arg: &str) -> anyhow::Result<(String, CliValue)> {
    match arg.split_once('=') {
        Some((key, _)) if key.is_empty() => bail!("field `{arg}` has an empty key"),
        Some((key, value)) => Ok((key.to_string(), CliValue::infer(value))),
        None => bail!("field `{arg}` is not of the form key=value"),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<SlogConfig> {
    let config = match path {
        Some(path) => SlogConfig::load_from_path(path),
        None => SlogConfig::load(),
    };
    config.context("loading configuration")
}

pub fn run_emit(args: EmitArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let logger = config.build_logger()?;
    let level: Level = args.level.parse()?;
    let fields = args
        .fields
        .iter()
        .map(|arg| parse_field(arg))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let arena = FieldArena::with_options(config.arena.to_options());
    let f = arena.builder();
    logger
        .log(
            &arena,
            call_site!(),
            level,
            &args.message,
            fields.iter().map(|(key, value)| value.field(f, key)),
        )
        .context("writing log line")?;
    Ok(())
}

pub fn run_bench(args: BenchArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_ref())?;
    let metrics = Arc::new(MetricsRecorder::new()?);
    let logger = Logger::new(Arc::new(MeteredSink::new(NullSink, Arc::clone(&metrics))))
        .with_format(config.format.to_options());
    let stats = Arc::new(ArenaStats::new());
    let mut arena = FieldArena::with_stats(config.arena.to_options(), Arc::clone(&stats));
    let keys: Vec<String> = (0..args.fields).map(|i| format!("field_{i}")).collect();

    info!(lines = args.lines, fields = args.fields, "starting benchmark");
    let start = Instant::now();
    for n in 0..args.lines {
        {
            let f = arena.builder();
            let fields = keys.iter().enumerate().map(|(i, key)| match i % 3 {
                0 => f.integer(key, n as i64),
                1 => f.string(key, "bench \"value\"\n"),
                _ => f.float(key, n as f64 / 3.0),
            });
            // Dropped lines are counted by the metered sink.
            let _ = logger.log(&arena, call_site!(), Level::Info, "benchmark line", fields);
        }
        arena.reset();
    }
    let elapsed = start.elapsed();

    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 { args.lines as f64 / secs } else { f64::INFINITY };
    println!(
        "{} lines in {:.3}s ({:.0} lines/s), {} bytes, {} dropped",
        metrics.lines_written.get(),
        secs,
        rate,
        metrics.bytes_written.get(),
        metrics.lines_dropped.get(),
    );
    println!(
        "arena: {} nodes, {} node growths, {} output growths, {} resets",
        stats.nodes_allocated(),
        stats.node_growths(),
        stats.output_growths(),
        stats.resets(),
    );
    if args.metrics {
        print!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn infers_value_types() {
        assert_eq!(CliValue::infer("null"), CliValue::Null);
        assert_eq!(CliValue::infer("false"), CliValue::Bool(false));
        assert_eq!(CliValue::infer("233"), CliValue::Integer(233));
        assert_eq!(CliValue::infer("-7"), CliValue::Integer(-7));
        assert_eq!(CliValue::infer("18.5"), CliValue::Float(18.5));
        assert_eq!(CliValue::infer("NaN"), CliValue::String("NaN".into()));
        assert_eq!(CliValue::infer("qaqland"), CliValue::String("qaqland".into()));
        assert_eq!(CliValue::infer(""), CliValue::String(String::new()));
    }

    #[test]
    fn parses_key_value_pairs() {
        assert_eq!(
            parse_field("url=http://x/?a=b").unwrap(),
            ("url".to_string(), CliValue::String("http://x/?a=b".into()))
        );
        assert!(parse_field("=1").is_err());
        assert!(parse_field("bare").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    proptest! {
        #[test]
        fn any_integer_is_inferred_as_integer(i in any::<i64>()) {
            prop_assert_eq!(CliValue::infer(&i.to_string()), CliValue::Integer(i));
        }

        #[test]
        fn key_never_contains_separator(key in "[a-z_]{1,12}", value in ".*") {
            let (k, _) = parse_field(&format!("{key}={value}")).unwrap();
            prop_assert_eq!(k, key);
        }
    }
}
