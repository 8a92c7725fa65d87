// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::operators::*;
use crate::config::OperatorRegistry;
use crate::errors::RegistryError;
use crate::traits::{Operator, OperatorFactory};

/// Operator type names served by [`LocalOperatorFactory`].
pub const BUILTIN_OPERATORS: &[&str] = &[
    "source/sequence",
    "timer/interval",
    "timer/cronjob",
    "transform/multiply",
    "sink/printer",
    "sink/blackhole",
];

/// Factory for one of the in-process builtin operator types.
///
/// The operator type name determines which operator is built:
/// - "source/sequence" -> SequenceSource (`start`, `step`, `endMarker`)
/// - "timer/interval" -> IntervalTimer (`interval` in milliseconds)
/// - "timer/cronjob" -> CronjobTimer (`jobs`: list of `cronjob` + `tag`)
/// - "transform/multiply" -> MultiplyTransform (`factor`)
/// - "sink/printer" -> PrinterSink
/// - "sink/blackhole" -> BlackholeSink
#[derive(Debug, Clone, Copy)]
pub struct LocalOperatorFactory {
    name: &'static str,
}

impl LocalOperatorFactory {
    /// Factory for a builtin type, or `None` if `name` is not builtin.
    pub fn for_type(name: &str) -> Option<Self> {
        BUILTIN_OPERATORS
            .iter()
            .copied()
            .find(|builtin| *builtin == name)
            .map(|name| Self { name })
    }

    /// Check if an operator type is builtin
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN_OPERATORS.contains(&name)
    }
}

impl OperatorFactory for LocalOperatorFactory {
    fn name(&self) -> &str {
        self.name
    }

    fn create(
        &self,
        _instance_name: &str,
        config: &serde_yaml::Value,
    ) -> anyhow::Result<Arc<dyn Operator>> {
        match self.name {
            "source/sequence" => Ok(Arc::new(SequenceSource::from_config(config)?)),
            "timer/interval" => Ok(Arc::new(IntervalTimer::from_config(config)?)),
            "timer/cronjob" => Ok(Arc::new(CronjobTimer::from_config(config)?)),
            "transform/multiply" => Ok(Arc::new(MultiplyTransform::from_config(config)?)),
            "sink/printer" => Ok(Arc::new(PrinterSink)),
            "sink/blackhole" => Ok(Arc::new(BlackholeSink)),
            other => Err(anyhow::anyhow!("Unknown builtin operator: '{}'", other)),
        }
    }
}

/// Register every builtin operator type.
///
/// Fails on the first name already present in `registry`.
pub fn register_builtin_operators(registry: &mut OperatorRegistry) -> Result<(), RegistryError> {
    for &name in BUILTIN_OPERATORS {
        registry.register(LocalOperatorFactory { name })?;
    }
    Ok(())
}
