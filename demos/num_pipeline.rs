// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Number pipeline demo.
//!
//! A custom random generator feeds two transforms (double and treble) whose
//! outputs meet in a single printer. Every five seconds the live graph is
//! printed as Graphviz DOT; after ten snapshots the engine shuts down.
//!
//! ```text
//! cargo run --example num_pipeline
//! ```

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use the_dagstream::config::OperatorRegistry;
use the_dagstream::engine::{Engine, NodeContext};
use the_dagstream::traits::{FnFactory, FnOperator, Operator};

const CONFIG: &str = r#"
engine:
  RandomGen:
    module: randomGen
    parent: []
    queueSize: 1
    parallels: 1
  Double:
    module: double
    parent: [RandomGen]
    queueSize: 10
    parallels: 2
  Treble:
    module: treble
    parent: [RandomGen]
    queueSize: 10
    parallels: 2
  Print:
    module: print
    parent: [Double, Treble]
    queueSize: 10
    parallels: 1
"#;

fn random_gen() -> Arc<dyn Operator> {
    FnOperator::shared(|cancel: CancellationToken, ctx: NodeContext| async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {
                    let value = rand::rng().random_range(0..=i64::from(i32::MAX));
                    ctx.collect(Value::from(value)).await;
                }
            }
        }
    })
}

fn scale(factor: i64) -> Arc<dyn Operator> {
    FnOperator::shared(move |cancel: CancellationToken, ctx: NodeContext| async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                message = ctx.message_queue().recv() => match message {
                    Some(value) => {
                        if let Some(num) = value.as_i64() {
                            ctx.collect(Value::from(num.wrapping_mul(factor))).await;
                        }
                    }
                    None => return Ok(()),
                },
            }
        }
    })
}

fn print() -> Arc<dyn Operator> {
    FnOperator::shared(|cancel: CancellationToken, ctx: NodeContext| async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                message = ctx.message_queue().recv() => match message {
                    Some(value) => ctx.logger().info(&ctx, format_args!("{}: Dump value {}", ctx.name(), value)),
                    None => return Ok(()),
                },
            }
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut registry = OperatorRegistry::new();
    registry.register(FnFactory::new("randomGen", |_name: &str, _config: &serde_yaml::Value| Ok(random_gen())))?;
    registry.register(FnFactory::new("double", |_name: &str, _config: &serde_yaml::Value| Ok(scale(2))))?;
    registry.register(FnFactory::new("treble", |_name: &str, _config: &serde_yaml::Value| Ok(scale(3))))?;
    registry.register(FnFactory::new("print", |_name: &str, _config: &serde_yaml::Value| Ok(print())))?;

    let engine = Engine::new(registry.freeze());
    engine.run(&CancellationToken::new(), CONFIG.as_bytes())?;

    for _ in 0..10 {
        tokio::time::sleep(Duration::from_secs(5)).await;
        if let Some(dot) = engine.render_dot() {
            println!("{}", dot);
        }
    }

    engine.shutdown().await;
    Ok(())
}
