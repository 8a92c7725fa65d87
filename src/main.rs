// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use the_dagstream::config::{EngineOptions, OperatorRegistry};
use the_dagstream::engine::Engine;

const DEFAULT_SNAPSHOT_INTERVAL_SECS: u64 = 5;

/// Command-line settings
struct CliArgs {
    config_path: String,
    options: EngineOptions,
    snapshot_interval: Duration,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <config.yaml> [--slow-threshold-ms N] [--qps-window N] [--snapshot-interval-secs N]\n\
         Example: {} configs/num-pipeline.yaml --slow-threshold-ms 200",
        program, program
    )
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = value.with_context(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .with_context(|| format!("invalid value for {}: '{}'", flag, value))
}

fn parse_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let program = args.first().map(String::as_str).unwrap_or("the-dagstream");
    let mut config_path = None;
    let mut options = EngineOptions::default();
    let mut snapshot_interval = Duration::from_secs(DEFAULT_SNAPSHOT_INTERVAL_SECS);

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--slow-threshold-ms" => {
                options = options.with_slow_threshold_ms(parse_value(arg, iter.next())?);
            }
            "--qps-window" => {
                options = options.with_qps_window_capacity(parse_value(arg, iter.next())?);
            }
            "--snapshot-interval-secs" => {
                snapshot_interval = Duration::from_secs(parse_value::<u64>(arg, iter.next())?.max(1));
            }
            "-h" | "--help" => bail!(usage(program)),
            flag if flag.starts_with("--") => bail!("unknown option '{}'\n{}", flag, usage(program)),
            path if config_path.is_none() => config_path = Some(path.to_string()),
            extra => bail!("unexpected argument '{}'\n{}", extra, usage(program)),
        }
    }

    Ok(CliArgs {
        config_path: config_path.with_context(|| usage(program))?,
        options,
        snapshot_interval,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let file = File::open(&cli.config_path)
        .with_context(|| format!("failed to open {}", cli.config_path))?;

    let engine = Engine::with_options(OperatorRegistry::with_builtin_operators().freeze(), cli.options);
    let root = CancellationToken::new();
    engine
        .run(&root, BufReader::new(file))
        .with_context(|| format!("failed to run {}", cli.config_path))?;

    println!("🚀 Running {} (Ctrl-C to stop)", cli.config_path);

    let mut snapshots = tokio::time::interval(cli.snapshot_interval);
    snapshots.tick().await;
    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
            _ = snapshots.tick() => {
                if let Some(dot) = engine.render_dot() {
                    println!("{}", dot);
                }
            }
        }
    }

    println!("Shutting down...");
    engine.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_with_options() {
        let cli = parse_args(&args(&[
            "the-dagstream",
            "configs/num-pipeline.yaml",
            "--slow-threshold-ms",
            "150",
            "--qps-window",
            "16",
            "--snapshot-interval-secs",
            "2",
        ]))
        .unwrap();

        assert_eq!(cli.config_path, "configs/num-pipeline.yaml");
        assert_eq!(cli.options.slow_threshold, Some(Duration::from_millis(150)));
        assert_eq!(cli.options.qps_window_capacity, 16);
        assert_eq!(cli.snapshot_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_parse_args_requires_config() {
        assert!(parse_args(&args(&["the-dagstream"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_bad_values() {
        assert!(parse_args(&args(&["the-dagstream", "g.yaml", "--qps-window", "many"])).is_err());
        assert!(parse_args(&args(&["the-dagstream", "g.yaml", "--qps-window"])).is_err());
        assert!(parse_args(&args(&["the-dagstream", "g.yaml", "--verbose"])).is_err());
    }
}
